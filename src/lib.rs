//! Contact-sound synthesis engine
//!
//! A physics-driven contact-sound synthesis engine: it consumes per-frame
//! physics telemetry (rigid-body velocities, collision manifolds) from a
//! simulation host and emits audio playback commands for impacts and
//! scrapes between objects and between objects and the floor. Sounds are
//! synthesized from modal acoustic models keyed by material and size,
//! driven by contact kinematics (normal-component velocity, contact time,
//! mass).
//!
//! # Determinism
//!
//! All synthesis is deterministic given a fixed construction seed: the
//! engine owns a seeded PCG32 RNG stream (two derived sub-streams, one for
//! mode sampling and one for impact-power perturbation), following the same
//! BLAKE3-seed-derivation discipline as [`rng`].
//!
//! # Example
//!
//! ```ignore
//! use contact_audio::{Engine, EngineConfig};
//!
//! let config = EngineConfig::builder().seed(42).build()?;
//! let mut engine = Engine::new(config)?;
//! let commands = engine.on_frame(&telemetry_frame);
//! ```
//!
//! # Crate Structure
//!
//! - [`engine`] - the `Engine` facade: frame orchestration, reset, config
//! - [`classifier`] - turns raw manifolds into `Impact`/`Scrape`/`None` events
//! - [`synth`] - modal synthesis: the impact and scrape audio paths
//! - [`material`] - the material mode bank (84 `(material, size)` distributions)
//! - [`registry`] - per-object static acoustic descriptor resolution
//! - [`telemetry`] - input frame records
//! - [`command`] - outbound playback descriptors
//! - [`rng`] - deterministic RNG with BLAKE3 seed derivation
//! - [`wav`] - PCM/WAV encoding helpers

pub mod classifier;
pub mod collision_info;
pub mod command;
pub mod convolve;
pub mod engine;
pub mod error;
pub mod material;
pub mod modes;
pub mod registry;
pub mod rng;
pub mod scrape_state;
pub mod surface;
pub mod synth;
pub mod telemetry;
pub mod vec3;
pub mod wav;

pub use command::{PlayCommand, PlayCommandKind};
pub use engine::{Engine, EngineConfig, EngineConfigBuilder, ModeLogEntry};
pub use error::{EngineError, EngineResult};
pub use material::{AudioMaterial, SizeBucket};
pub use telemetry::{ContactState, TelemetryRecord};
pub use vec3::Vec3;
