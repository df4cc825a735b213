//! WAV file generation result type.

use super::format::WavFormat;
use super::writer::{pcm16_to_bytes, samples_to_pcm16, write_wav_to_vec};

/// Result of WAV file generation.
#[derive(Debug)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of PCM data only (for Tier 1 validation).
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples (mono).
    pub num_samples: usize,
}

impl WavResult {
    /// Creates a WavResult from mono f64 samples.
    pub fn from_mono(samples: &[f64], sample_rate: u32) -> Self {
        let pcm = samples_to_pcm16(samples);
        Self::from_pcm_bytes(pcm, samples.len(), sample_rate)
    }

    /// Creates a WavResult from already-quantized mono 16-bit samples.
    pub fn from_pcm16(samples: &[i16], sample_rate: u32) -> Self {
        let pcm = pcm16_to_bytes(samples);
        Self::from_pcm_bytes(pcm, samples.len(), sample_rate)
    }

    fn from_pcm_bytes(pcm: Vec<u8>, num_samples: usize, sample_rate: u32) -> Self {
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let format = WavFormat::mono(sample_rate);
        let wav_data = write_wav_to_vec(&format, &pcm);

        Self {
            wav_data,
            pcm_hash,
            sample_rate,
            num_samples,
        }
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate as f64
    }
}
