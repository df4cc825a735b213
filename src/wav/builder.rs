//! WAV file writer builder pattern.

use super::format::WavFormat;
use super::writer::{samples_to_pcm16, write_wav_to_vec};

/// WAV file writer builder.
#[derive(Debug)]
pub struct WavWriter {
    format: WavFormat,
}

impl WavWriter {
    /// Creates a new WAV writer with mono format.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            format: WavFormat::mono(sample_rate),
        }
    }

    /// Writes mono samples to a byte vector.
    pub fn write_mono(&self, samples: &[f64]) -> Vec<u8> {
        let pcm = samples_to_pcm16(samples);
        write_wav_to_vec(&self.format, &pcm)
    }

    /// Returns the PCM data hash for Tier 1 validation.
    ///
    /// # Arguments
    /// * `samples` - Mono audio samples
    ///
    /// # Returns
    /// BLAKE3 hash of the PCM data (not the full WAV file)
    pub fn pcm_hash_mono(&self, samples: &[f64]) -> String {
        let pcm = samples_to_pcm16(samples);
        blake3::hash(&pcm).to_hex().to_string()
    }
}
