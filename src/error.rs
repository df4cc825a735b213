//! Error types for the contact-sound synthesis engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while constructing or driving the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `initial_amp` (or another constructor/reset parameter) is out of range.
    #[error("invalid engine configuration: {message}")]
    ConfigInvalid {
        /// Description of the invalid field.
        message: String,
    },

    /// The material mode bank failed to populate a `(material, size)` key it is
    /// supposed to own. Indicates a bug in the embedded data tables, not a
    /// per-frame condition.
    #[error("missing material mode data for key '{key}'")]
    MissingMaterialData {
        /// The `"{material}_{size}"` lookup key that was missing.
        key: String,
    },

    /// Telemetry referenced an object id with no static audio data.
    #[error("unknown object id: {id}")]
    UnknownObject {
        /// The unresolved object id.
        id: u32,
    },

    /// Mode synthesis produced an empty impulse response.
    #[error("synthesis produced an empty impulse response")]
    SynthesisEmpty,

    /// A scrape pair terminated (one-pixel slide or rolling-master growth cap).
    #[error("scrape terminated for pair ({0}, {1})")]
    ScrapeTermination(u32, u32),
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }
}
