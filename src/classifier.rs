//! Collision classification: turns raw per-frame manifolds into at most one
//! significant `CollisionEvent` per primary object.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::registry::StaticAudioRegistry;
use crate::telemetry::{ContactState, TelemetryRecord};
use crate::vec3::Vec3;

/// Relative tolerance used to decide whether contact area is "roughly
/// stable" between frames for a sustained contact.
const AREA_STABILITY_TOLERANCE: f64 = 0.3;
/// Angular speed above which a sustained contact is treated as a roll
/// (non-synthesized) rather than a scrape.
const ROLL_ANGULAR_THRESHOLD: f64 = 0.1;
/// Velocity magnitude below which a first contact is still classified as
/// `None` (too gentle to be worth synthesizing).
const MIN_IMPACT_MAGNITUDE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    Impact,
    Scrape,
    None,
}

#[derive(Debug, Clone)]
pub struct CollisionEvent {
    pub primary_id: u32,
    pub secondary_id: Option<u32>,
    pub collision_type: CollisionType,
    pub velocity: Vec3,
    pub magnitude: f64,
    pub area: f64,
    pub contact_points: Vec<Vec3>,
    pub contact_normals: Vec<Vec3>,
}

/// Per-primary contact-area history, the classifier's only persistent
/// state.
#[derive(Debug, Default)]
pub struct Classifier {
    previous_area: HashMap<u32, f64>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.previous_area.clear();
    }

    /// Classifies one frame's manifolds, returning at most one event per
    /// primary object id. Manifolds referencing an object absent from the
    /// registry are dropped (logged as `UnknownObject`); the rest of the
    /// frame is still processed.
    pub fn classify(&mut self, frame: &[TelemetryRecord], registry: &StaticAudioRegistry) -> HashMap<u32, CollisionEvent> {
        let velocities = collect_velocities(frame);
        let mut candidates: HashMap<u32, CollisionEvent> = HashMap::new();

        for record in frame {
            match record {
                TelemetryRecord::Collision {
                    collider_id,
                    collidee_id,
                    state,
                    points,
                    normals,
                    relative_velocity,
                } => {
                    let (Some(a), Some(b)) = (registry.get(*collider_id), registry.get(*collidee_id)) else {
                        log::debug!(
                            "{}",
                            EngineError::UnknownObject {
                                id: if registry.get(*collider_id).is_none() { *collider_id } else { *collidee_id }
                            }
                        );
                        continue;
                    };
                    let (primary, secondary) = if a.mass <= b.mass { (a, b) } else { (b, a) };

                    if *state == ContactState::Exit {
                        self.previous_area.remove(&primary.object_id);
                        continue;
                    }

                    let area = points.len() as f64;
                    let angular = velocities.get(&primary.object_id).map(|v| v.1.norm()).unwrap_or(0.0)
                        .max(velocities.get(&secondary.object_id).map(|v| v.1.norm()).unwrap_or(0.0));

                    let event = classify_one(
                        primary.object_id,
                        Some(secondary.object_id),
                        *relative_velocity,
                        area,
                        angular,
                        *state,
                        self.previous_area.get(&primary.object_id).copied(),
                        points,
                        normals,
                    );

                    self.record_and_keep_best(&mut candidates, event);
                }
                TelemetryRecord::EnvironmentCollision { object_id, state, points, normals, floor: _ } => {
                    let Some(obj) = registry.get(*object_id) else {
                        log::debug!("{}", EngineError::UnknownObject { id: *object_id });
                        continue;
                    };

                    if *state == ContactState::Exit {
                        self.previous_area.remove(&obj.object_id);
                        continue;
                    }

                    let velocity = velocities.get(&obj.object_id).map(|v| v.0).unwrap_or(Vec3::ZERO);
                    let angular = velocities.get(&obj.object_id).map(|v| v.1.norm()).unwrap_or(0.0);
                    let area = points.len() as f64;

                    let event = classify_one(
                        obj.object_id,
                        None,
                        velocity,
                        area,
                        angular,
                        *state,
                        self.previous_area.get(&obj.object_id).copied(),
                        points,
                        normals,
                    );

                    self.record_and_keep_best(&mut candidates, event);
                }
                _ => {}
            }
        }

        for event in candidates.values() {
            self.previous_area.insert(event.primary_id, event.area);
        }

        candidates
    }

    fn record_and_keep_best(&self, candidates: &mut HashMap<u32, CollisionEvent>, event: CollisionEvent) {
        if event.collision_type == CollisionType::None {
            return;
        }
        match candidates.get(&event.primary_id) {
            Some(existing) if existing.magnitude >= event.magnitude => {}
            _ => {
                candidates.insert(event.primary_id, event);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn classify_one(
    primary_id: u32,
    secondary_id: Option<u32>,
    velocity: Vec3,
    area: f64,
    angular: f64,
    state: ContactState,
    previous_area: Option<f64>,
    points: &[Vec3],
    normals: &[Vec3],
) -> CollisionEvent {
    let magnitude = velocity.norm();

    let collision_type = if magnitude == 0.0 {
        CollisionType::None
    } else if previous_area.is_none() && magnitude < MIN_IMPACT_MAGNITUDE {
        CollisionType::None
    } else if state == ContactState::Enter && previous_area.is_none() {
        CollisionType::Impact
    } else if angular > ROLL_ANGULAR_THRESHOLD {
        CollisionType::None
    } else if let Some(prev) = previous_area {
        let stable = ((area - prev).abs() / prev.max(f64::EPSILON)) < AREA_STABILITY_TOLERANCE;
        let normal_component = normals
            .first()
            .map(|n| velocity.dot(&n.normalize()).abs())
            .unwrap_or(0.0);
        let tangential_component = (magnitude * magnitude - normal_component * normal_component).max(0.0).sqrt();
        if stable && tangential_component > normal_component {
            CollisionType::Scrape
        } else {
            CollisionType::None
        }
    } else {
        CollisionType::None
    };

    CollisionEvent {
        primary_id,
        secondary_id,
        collision_type,
        velocity,
        magnitude,
        area,
        contact_points: points.to_vec(),
        contact_normals: normals.to_vec(),
    }
}

fn collect_velocities(frame: &[TelemetryRecord]) -> HashMap<u32, (Vec3, Vec3)> {
    let mut map = HashMap::new();
    for record in frame {
        match record {
            TelemetryRecord::Rigidbody { id, velocity, angular_velocity, .. }
            | TelemetryRecord::RobotJointVelocity { id, velocity, angular_velocity, .. } => {
                map.insert(*id, (*velocity, *angular_velocity));
            }
            _ => {}
        }
    }
    map
}
