//! Sampled mode sets and the modal synthesis that turns them into PCM.

use std::f64::consts::PI;

/// Sample rate used throughout the engine's internal synthesis pipeline.
pub const SAMPLE_RATE: f64 = 44100.0;

/// A sampled instance of a material's mode distribution: ten damped
/// sinusoids, each with a frequency (Hz), onset power (dB), and decay time
/// (ms, post-sampling).
///
/// Invariants: every frequency is `>= 20 Hz`; every decay time is `>= 1 ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct Modes {
    pub frequencies: [f64; 10],
    pub powers: [f64; 10],
    pub decay_times: [f64; 10],
}

impl Modes {
    pub fn new(frequencies: [f64; 10], powers: [f64; 10], decay_times: [f64; 10]) -> Self {
        Self {
            frequencies,
            powers,
            decay_times,
        }
    }

    /// Synthesizes a decaying sinusoidal mixture at [`SAMPLE_RATE`].
    ///
    /// Each mode `i` contributes
    /// `10^(p_i/20) * sin(2*pi*f_i*t) * exp(-t * 6.9 / tau_i)` where
    /// `tau_i = decay_times[i] * resonance / 1000` seconds (the time at
    /// which the mode has decayed 60 dB). The output length is governed by
    /// the longest-lived mode.
    pub fn sum_modes(&self, resonance: f64) -> Vec<f64> {
        let taus: Vec<f64> = self
            .decay_times
            .iter()
            .map(|t| (t * resonance / 1000.0).max(1e-6))
            .collect();

        let longest_tau = taus.iter().cloned().fold(0.0_f64, f64::max);
        let num_samples = ((longest_tau * SAMPLE_RATE).ceil() as usize).max(1);

        let mut output = vec![0.0; num_samples];
        for n in 0..num_samples {
            let t = n as f64 / SAMPLE_RATE;
            let mut sample = 0.0;
            for i in 0..10 {
                let amplitude = 10f64.powf(self.powers[i] / 20.0);
                let phase = 2.0 * PI * self.frequencies[i] * t;
                let envelope = (-t * 6.9 / taus[i]).exp();
                sample += amplitude * phase.sin() * envelope;
            }
            output[n] = sample;
        }
        output
    }
}

/// Element-wise sum of two impulse responses, zero-padded to the longer
/// length.
pub fn mode_add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let len = a.len().max(b.len());
    let mut out = vec![0.0; len];
    for (i, slot) in out.iter_mut().enumerate() {
        let va = a.get(i).copied().unwrap_or(0.0);
        let vb = b.get(i).copied().unwrap_or(0.0);
        *slot = va + vb;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flat_modes() -> Modes {
        Modes::new([440.0; 10], [-6.0; 10], [50.0; 10])
    }

    #[test]
    fn sum_modes_is_nonempty_and_decays() {
        let modes = flat_modes();
        let pcm = modes.sum_modes(0.45);
        assert!(!pcm.is_empty());

        let head_energy: f64 = pcm[0..10].iter().map(|s| s.abs()).sum();
        let tail_energy: f64 = pcm[pcm.len() - 10..].iter().map(|s| s.abs()).sum();
        assert!(
            tail_energy < head_energy,
            "tail energy {tail_energy} should be less than head energy {head_energy}"
        );
    }

    #[test]
    fn sum_modes_is_deterministic() {
        let modes = flat_modes();
        let a = modes.sum_modes(0.45);
        let b = modes.sum_modes(0.45);
        assert_eq!(a, b);
    }

    #[test]
    fn mode_add_zero_pads_shorter() {
        let a = vec![1.0, 1.0, 1.0];
        let b = vec![2.0, 2.0];
        let summed = mode_add(&a, &b);
        assert_eq!(summed, vec![3.0, 3.0, 1.0]);
    }

    #[test]
    fn mode_add_is_commutative_in_length() {
        let a = vec![1.0, 1.0];
        let b = vec![2.0, 2.0, 2.0];
        assert_eq!(mode_add(&a, &b), mode_add(&b, &a));
    }
}
