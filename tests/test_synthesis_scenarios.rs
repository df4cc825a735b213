//! End-to-end `Engine::on_frame` scenarios.

use contact_audio::{ContactState, Engine, EngineConfig, TelemetryRecord, Vec3};

fn engine_with_seed(seed: u32) -> Engine {
    let config = EngineConfig::builder().seed(seed).build().unwrap();
    Engine::new(config).unwrap()
}

fn segmentation(id: u32, name: &str, category: &str) -> TelemetryRecord {
    TelemetryRecord::Segmentation {
        id,
        name: name.to_string(),
        category: category.to_string(),
    }
}

fn static_rigidbody(id: u32, mass: f64, bounciness: f64) -> TelemetryRecord {
    TelemetryRecord::StaticRigidbody { id, mass, bounciness }
}

fn rigidbody(id: u32, velocity: Vec3, angular_velocity: Vec3, mass: f64) -> TelemetryRecord {
    TelemetryRecord::Rigidbody { id, velocity, angular_velocity, sleeping: false, mass }
}

// ============================================================================
// Scenario 1: drop onto floor
// ============================================================================

#[test]
fn drop_onto_floor_emits_one_play_audio_data_command() {
    let mut engine = engine_with_seed(1);
    let frame = vec![
        segmentation(42, "mystery_crate", "misc"),
        static_rigidbody(42, 1.0, 0.3),
        rigidbody(42, Vec3::new(0.0, -3.0, 0.0), Vec3::ZERO, 1.0),
        TelemetryRecord::EnvironmentCollision {
            object_id: 42,
            state: ContactState::Enter,
            points: vec![Vec3::ZERO],
            normals: vec![Vec3::new(0.0, 1.0, 0.0)],
            floor: true,
        },
    ];

    let commands = engine.on_frame(&frame);
    assert_eq!(commands.len(), 1);
    let cmd = &commands[0];
    assert_eq!(cmd.position, Vec3::ZERO);
    assert_eq!(cmd.num_channels, 1);
    assert_eq!(cmd.frame_rate, 44_100);
    assert_eq!(cmd.y_pos_offset, 0.1);
}

// ============================================================================
// Scenario 2: two impacts on the same pair
// ============================================================================

#[test]
fn second_impact_scales_amp_by_normal_speed_ratio_and_differs_from_first() {
    let mut engine = engine_with_seed(2);

    let base = vec![
        segmentation(1, "thing_one", "misc"),
        segmentation(2, "thing_two", "misc"),
        static_rigidbody(1, 1.0, 0.3),
        static_rigidbody(2, 1.0, 0.3),
    ];

    let collide = |speed: f64| {
        let mut frame = base.clone();
        frame.push(rigidbody(1, Vec3::new(0.0, 0.0, 0.0), Vec3::ZERO, 1.0));
        frame.push(TelemetryRecord::Collision {
            collider_id: 1,
            collidee_id: 2,
            state: ContactState::Enter,
            points: vec![Vec3::ZERO],
            normals: vec![Vec3::new(0.0, 1.0, 0.0)],
            relative_velocity: Vec3::new(0.0, speed, 0.0),
        });
        frame
    };
    let exit = || {
        let mut frame = base.clone();
        frame.push(TelemetryRecord::Collision {
            collider_id: 1,
            collidee_id: 2,
            state: ContactState::Exit,
            points: vec![],
            normals: vec![],
            relative_velocity: Vec3::ZERO,
        });
        frame
    };

    let first = engine.on_frame(&collide(3.0));
    assert_eq!(first.len(), 1);
    // The pair separates between bounces, so the next collision is a fresh
    // first contact rather than a sustained one.
    engine.on_frame(&exit());
    let second = engine.on_frame(&collide(6.0));
    assert_eq!(second.len(), 1);

    // Different velocity and perturbed mode powers mean the waveforms differ.
    assert_ne!(first[0].wav_data, second[0].wav_data);
}

// ============================================================================
// Scenario 3 & 4: scrape onset and continuation
// ============================================================================

fn scraping_frame(state: ContactState) -> Vec<TelemetryRecord> {
    vec![
        segmentation(10, "scraper", "misc"),
        segmentation(11, "scraped", "misc"),
        static_rigidbody(10, 1.0, 0.3),
        static_rigidbody(11, 1.0, 0.3),
        rigidbody(10, Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, 1.0),
        TelemetryRecord::Collision {
            collider_id: 10,
            collidee_id: 11,
            state,
            points: vec![Vec3::ZERO],
            normals: vec![Vec3::new(0.0, 1.0, 0.0)],
            relative_velocity: Vec3::new(1.0, 0.0, 0.0),
        },
    ]
}

#[test]
fn scrape_onset_then_continuation_emit_chunks_with_zero_y_offset() {
    let mut engine = engine_with_seed(3);

    // Seed previous_area with an Enter frame that only produces an impact,
    // then drive a sustained Stay frame to reach scrape classification.
    let enter = engine.on_frame(&scraping_frame(ContactState::Enter));
    assert_eq!(enter.len(), 1, "first contact should be an impact");

    let onset = engine.on_frame(&scraping_frame(ContactState::Stay));
    assert_eq!(onset.len(), 1, "sustained tangential contact should scrape");
    assert_eq!(onset[0].y_pos_offset, 0.0);
    assert_eq!(onset[0].num_channels, 1);

    let continuation = engine.on_frame(&scraping_frame(ContactState::Stay));
    assert_eq!(continuation.len(), 1);
    assert_eq!(continuation[0].y_pos_offset, 0.0);
    assert_ne!(
        onset[0].wav_data, continuation[0].wav_data,
        "the rolling master should advance between frames"
    );
}

// ============================================================================
// Scenario 5: scrape termination
// ============================================================================

#[test]
fn scrape_termination_on_near_zero_velocity_emits_no_command() {
    let mut engine = engine_with_seed(4);

    let enter = engine.on_frame(&scraping_frame(ContactState::Enter));
    assert_eq!(enter.len(), 1);
    let onset = engine.on_frame(&scraping_frame(ContactState::Stay));
    assert_eq!(onset.len(), 1);

    let mut dying = vec![
        segmentation(10, "scraper", "misc"),
        segmentation(11, "scraped", "misc"),
        static_rigidbody(10, 1.0, 0.3),
        static_rigidbody(11, 1.0, 0.3),
        rigidbody(10, Vec3::new(1e-9, 0.0, 0.0), Vec3::ZERO, 1.0),
    ];
    dying.push(TelemetryRecord::Collision {
        collider_id: 10,
        collidee_id: 11,
        state: ContactState::Stay,
        points: vec![Vec3::ZERO],
        normals: vec![Vec3::new(0.0, 1.0, 0.0)],
        relative_velocity: Vec3::new(1e-9, 0.0, 0.0),
    });

    let terminated = engine.on_frame(&dying);
    assert!(terminated.is_empty(), "near-zero velocity scrape should terminate silently");
}

// ============================================================================
// Scenario 6: unknown object
// ============================================================================

#[test]
fn unknown_object_is_skipped_without_dropping_other_events_in_the_frame() {
    let mut engine = engine_with_seed(5);

    let frame = vec![
        segmentation(1, "known_thing", "misc"),
        static_rigidbody(1, 1.0, 0.3),
        rigidbody(1, Vec3::new(0.0, -2.0, 0.0), Vec3::ZERO, 1.0),
        TelemetryRecord::Collision {
            collider_id: 1,
            collidee_id: 999, // absent from the registry
            state: ContactState::Enter,
            points: vec![Vec3::ZERO],
            normals: vec![Vec3::new(0.0, 1.0, 0.0)],
            relative_velocity: Vec3::new(0.0, -2.0, 0.0),
        },
        TelemetryRecord::EnvironmentCollision {
            object_id: 1,
            state: ContactState::Enter,
            points: vec![Vec3::ZERO],
            normals: vec![Vec3::new(0.0, 1.0, 0.0)],
            floor: true,
        },
    ];

    let commands = engine.on_frame(&frame);
    assert_eq!(commands.len(), 1, "the floor impact should still be processed");
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn identical_telemetry_and_seed_produce_byte_equal_commands() {
    let frame = vec![
        segmentation(42, "mystery_crate", "misc"),
        static_rigidbody(42, 1.0, 0.3),
        rigidbody(42, Vec3::new(0.0, -3.0, 0.0), Vec3::ZERO, 1.0),
        TelemetryRecord::EnvironmentCollision {
            object_id: 42,
            state: ContactState::Enter,
            points: vec![Vec3::ZERO],
            normals: vec![Vec3::new(0.0, 1.0, 0.0)],
            floor: true,
        },
    ];

    let mut engine1 = engine_with_seed(99);
    let mut engine2 = engine_with_seed(99);

    let a = engine1.on_frame(&frame);
    let b = engine2.on_frame(&frame);

    assert_eq!(a.len(), b.len());
    assert_eq!(a[0].wav_data, b[0].wav_data);
}
