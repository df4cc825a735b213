//! The engine facade: orchestrates classification, impact synthesis, and
//! scrape synthesis, and owns all mutable per-run state.

use std::collections::HashMap;

use rand_pcg::Pcg32;

use crate::classifier::{Classifier, CollisionEvent, CollisionType};
use crate::collision_info::{CollisionAudioInfo, CollisionAudioStore};
use crate::command::{PlayCommand, PlayCommandKind};
use crate::error::{EngineError, EngineResult};
use crate::material::{AudioMaterial, MaterialModeBank};
use crate::modes::Modes;
use crate::registry::{ObjectInit, StaticAudio, StaticAudioRegistry};
use crate::rng;
use crate::scrape_state::ScrapeStateStore;
use crate::synth::{self, synth_impact, ScrapeStep};
use crate::telemetry::TelemetryRecord;
use crate::vec3::Vec3;

/// Construction-time engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub initial_amp: f64,
    pub prevent_distortion: bool,
    pub logging: bool,
    pub static_audio_overrides: HashMap<String, StaticAudio>,
    pub resonance_audio: bool,
    pub floor: AudioMaterial,
    pub seed: u32,
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for [`EngineConfig`], in the teacher's `Spec::builder` idiom.
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    initial_amp: f64,
    prevent_distortion: bool,
    logging: bool,
    static_audio_overrides: HashMap<String, StaticAudio>,
    resonance_audio: bool,
    floor: AudioMaterial,
    seed: u32,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self {
            initial_amp: 0.5,
            prevent_distortion: true,
            logging: false,
            static_audio_overrides: HashMap::new(),
            resonance_audio: false,
            floor: AudioMaterial::WoodMedium,
            seed: 0,
        }
    }
}

impl EngineConfigBuilder {
    pub fn initial_amp(mut self, value: f64) -> Self {
        self.initial_amp = value;
        self
    }

    pub fn prevent_distortion(mut self, value: bool) -> Self {
        self.prevent_distortion = value;
        self
    }

    pub fn logging(mut self, value: bool) -> Self {
        self.logging = value;
        self
    }

    pub fn static_audio_overrides(mut self, overrides: HashMap<String, StaticAudio>) -> Self {
        self.static_audio_overrides = overrides;
        self
    }

    pub fn resonance_audio(mut self, value: bool) -> Self {
        self.resonance_audio = value;
        self
    }

    pub fn floor(mut self, material: AudioMaterial) -> Self {
        self.floor = material;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> EngineResult<EngineConfig> {
        if !(self.initial_amp > 0.0 && self.initial_amp < 1.0) {
            return Err(EngineError::config_invalid(format!(
                "initial_amp must be in (0, 1), got {}",
                self.initial_amp
            )));
        }
        Ok(EngineConfig {
            initial_amp: self.initial_amp,
            prevent_distortion: self.prevent_distortion,
            logging: self.logging,
            static_audio_overrides: self.static_audio_overrides,
            resonance_audio: self.resonance_audio,
            floor: self.floor,
            seed: self.seed,
        })
    }
}

/// One accumulated mode-property record, mirroring the reference
/// implementation's `log_modes` structured-log-as-data behavior.
#[derive(Debug, Clone)]
pub struct ModeLogEntry {
    pub primary_id: u32,
    pub secondary_id: Option<u32>,
    pub primary_modes: Modes,
    pub secondary_modes: Modes,
}

/// Owns all mutable engine state: the static registry, per-pair impact and
/// scrape caches, the classifier's contact-area history, and the seeded
/// RNG streams used for mode sampling and power perturbation.
pub struct Engine {
    config: EngineConfig,
    bank: MaterialModeBank,
    registry: StaticAudioRegistry,
    classifier: Classifier,
    collision_audio: CollisionAudioStore,
    scrape_state: ScrapeStateStore,
    rng_modes: Pcg32,
    rng_perturb: Pcg32,
    next_command_id: u32,
    mode_log: Vec<ModeLogEntry>,
    statics_cached: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let bank = MaterialModeBank::new()?;
        let rng_modes = rng::create_rng(rng::derive_component_seed(config.seed, "mode_sampling"));
        let rng_perturb = rng::create_rng(rng::derive_component_seed(config.seed, "power_perturbation"));
        let registry = StaticAudioRegistry::new(config.static_audio_overrides.clone());

        Ok(Self {
            config,
            bank,
            registry,
            classifier: Classifier::new(),
            collision_audio: CollisionAudioStore::new(),
            scrape_state: ScrapeStateStore::new(),
            rng_modes,
            rng_perturb,
            next_command_id: 0,
            mode_log: Vec::new(),
            statics_cached: false,
        })
    }

    /// The accumulated per-collision mode-property log, for callers that
    /// want structured data rather than text logging.
    pub fn mode_log(&self) -> &[ModeLogEntry] {
        &self.mode_log
    }

    /// Clears all mutable state and re-validates `initial_amp`.
    pub fn reset(&mut self, initial_amp: f64) -> EngineResult<()> {
        if !(initial_amp > 0.0 && initial_amp < 1.0) {
            return Err(EngineError::config_invalid(format!(
                "initial_amp must be in (0, 1), got {initial_amp}"
            )));
        }
        self.config.initial_amp = initial_amp;
        self.registry.clear();
        self.collision_audio.clear();
        self.scrape_state.clear();
        self.classifier.reset();
        self.mode_log.clear();
        self.statics_cached = false;
        Ok(())
    }

    /// Advances the engine by one frame of telemetry, returning any audio
    /// playback commands produced. Never fails: per-frame synthesis errors
    /// are absorbed and logged.
    pub fn on_frame(&mut self, frame: &[TelemetryRecord]) -> Vec<PlayCommand> {
        if !self.statics_cached {
            self.populate_statics(frame);
            self.statics_cached = true;
        }

        let events = self.classifier.classify(frame, &self.registry);
        let mut commands = Vec::new();

        for event in events.values() {
            let command = match event.collision_type {
                CollisionType::Impact => self.handle_impact(event),
                CollisionType::Scrape => self.handle_scrape(event),
                CollisionType::None => None,
            };
            if let Some(command) = command {
                commands.push(command);
            }
        }

        commands
    }

    fn populate_statics(&mut self, frame: &[TelemetryRecord]) {
        let mut names: HashMap<u32, (String, String)> = HashMap::new();
        let mut physics: HashMap<u32, (f64, f64)> = HashMap::new();

        for record in frame {
            match record {
                TelemetryRecord::Segmentation { id, name, category } => {
                    names.insert(*id, (name.clone(), category.clone()));
                }
                TelemetryRecord::StaticRigidbody { id, mass, bounciness } => {
                    physics.insert(*id, (*mass, *bounciness));
                }
                _ => {}
            }
        }

        let objects: Vec<ObjectInit> = names
            .into_iter()
            .map(|(id, (name, category))| {
                let (mass, bounciness) = physics.get(&id).copied().unwrap_or((1.0, 0.3));
                ObjectInit { id, name, category, mass, bounciness }
            })
            .collect();
        self.registry.populate(&objects);

        for record in frame {
            if let TelemetryRecord::StaticRobot { id, name, mass } = record {
                self.registry.insert_robot_joint(*id, name.clone(), *mass);
            }
        }
    }

    fn secondary_static(&self, secondary_id: Option<u32>) -> Option<StaticAudio> {
        match secondary_id {
            Some(id) => self.registry.get(id).cloned(),
            None => Some(StaticAudio::floor(self.config.floor)),
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_command_id & 0x00FF_FFFF;
        self.next_command_id = self.next_command_id.wrapping_add(1);
        id
    }

    fn handle_impact(&mut self, event: &CollisionEvent) -> Option<PlayCommand> {
        let primary = self.registry.get(event.primary_id)?.clone();
        let secondary = self.secondary_static(event.secondary_id)?;
        let pair_key = event.secondary_id.unwrap_or(0);
        let resonance = (primary.resonance + secondary.resonance) / 2.0;

        if self.collision_audio.get(pair_key, event.primary_id).is_none() {
            let primary_modes = match self.bank.sample(&primary.mode_key(), &mut self.rng_modes) {
                Ok(m) => m,
                Err(err) => {
                    log::debug!("impact skipped: {err}");
                    return None;
                }
            };
            let secondary_modes = match self.bank.sample(&secondary.mode_key(), &mut self.rng_modes) {
                Ok(m) => m,
                Err(err) => {
                    log::debug!("impact skipped: {err}");
                    return None;
                }
            };
            let amp = primary.amp * self.config.initial_amp;
            self.collision_audio.get_or_insert_with(pair_key, event.primary_id, || {
                CollisionAudioInfo::new(primary_modes, secondary_modes, amp)
            });
        }

        let normal_speed = normal_speed(event);
        let mass = primary.mass.min(secondary.mass);

        let pcm = {
            let info = self.collision_audio.get_mut(pair_key, event.primary_id)?;
            if info.count == 0 {
                info.init_speed = normal_speed;
            } else {
                perturb_powers(&mut info.primary_modes, &mut self.rng_perturb);
                perturb_powers(&mut info.secondary_modes, &mut self.rng_perturb);
                info.amp *= normal_speed / info.init_speed.max(f64::EPSILON);
            }

            let pcm = match synth_impact(&info.primary_modes, &info.secondary_modes, mass, resonance) {
                Ok(pcm) => pcm,
                Err(EngineError::SynthesisEmpty) => {
                    log::debug!("synthesis empty for pair ({pair_key}, {})", event.primary_id);
                    return None;
                }
                Err(err) => {
                    log::debug!("impact synthesis failed: {err}");
                    return None;
                }
            };

            let mut amp = info.amp;
            if self.config.prevent_distortion {
                amp = amp.clamp(-0.99, 0.99);
            }
            info.count += 1;

            self.mode_log.push(ModeLogEntry {
                primary_id: event.primary_id,
                secondary_id: event.secondary_id,
                primary_modes: info.primary_modes.clone(),
                secondary_modes: info.secondary_modes.clone(),
            });

            normalize_and_scale(&pcm, amp)
        };

        let position = Vec3::centroid(&event.contact_points);
        let kind = if self.config.resonance_audio { PlayCommandKind::PlayPointSourceData } else { PlayCommandKind::PlayAudioData };
        let id = self.next_id();

        Some(PlayCommand::new(kind, id, position, &pcm, 0.1))
    }

    fn handle_scrape(&mut self, event: &CollisionEvent) -> Option<PlayCommand> {
        let primary = self.registry.get(event.primary_id)?.clone();
        let secondary = self.secondary_static(event.secondary_id)?;
        let pair_key = event.secondary_id.unwrap_or(0);
        let resonance = (primary.resonance + secondary.resonance) / 2.0;

        if self.collision_audio.get(pair_key, event.primary_id).is_none() {
            let primary_modes = self.bank.sample(&primary.mode_key(), &mut self.rng_modes).ok()?;
            let secondary_modes = self.bank.sample(&secondary.mode_key(), &mut self.rng_modes).ok()?;
            let amp = primary.amp * self.config.initial_amp;
            self.collision_audio.get_or_insert_with(pair_key, event.primary_id, || {
                CollisionAudioInfo::new(primary_modes, secondary_modes, amp)
            });
        }
        let info = self.collision_audio.get(pair_key, event.primary_id)?;

        let (state, cursor) = self.scrape_state.state_and_cursor(event.primary_id, pair_key, event.magnitude);
        let step_result = synth::scrape::step(state, cursor, event.magnitude, &info.primary_modes, &info.secondary_modes, resonance);

        let window = match step_result {
            Ok(ScrapeStep::Chunk(window)) => window,
            Ok(ScrapeStep::Terminated) => {
                self.scrape_state.remove(event.primary_id, pair_key);
                if self.config.logging {
                    log::debug!("{}", EngineError::ScrapeTermination(event.primary_id, pair_key));
                }
                return None;
            }
            Err(err) => {
                log::debug!("scrape synthesis failed: {err}");
                return None;
            }
        };

        let position = Vec3::centroid(&event.contact_points);
        let kind = if self.config.resonance_audio { PlayCommandKind::PlayPointSourceData } else { PlayCommandKind::PlayAudioData };
        let id = self.next_id();

        Some(PlayCommand::new(kind, id, position, &window, 0.0))
    }
}

fn normal_speed(event: &CollisionEvent) -> f64 {
    if event.contact_normals.is_empty() {
        return event.magnitude;
    }
    let sum: f64 = event
        .contact_normals
        .iter()
        .map(|n| event.velocity.dot(&n.normalize()).abs())
        .sum();
    sum / event.contact_normals.len() as f64
}

fn normalize_and_scale(pcm: &[f64], amp: f64) -> Vec<f64> {
    let peak = pcm.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
    if peak > f64::EPSILON {
        pcm.iter().map(|s| (s / peak) * amp).collect()
    } else {
        pcm.to_vec()
    }
}

/// Perturbs each retained mode's onset power by `Normal(0, 2)`, so
/// successive impacts on the same pair differ audibly. Box-Muller, as
/// elsewhere in this crate (`material::bank`), since `rand_distr` is not a
/// dependency.
fn perturb_powers(modes: &mut Modes, rng: &mut Pcg32) {
    use rand::Rng;
    for power in modes.powers.iter_mut() {
        let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = rng.gen_range(0.0..1.0);
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        *power += 2.0 * z0;
    }
}
