//! Impact synthesis: two objects' modes convolved with a mass-scaled force pulse.

use std::f64::consts::PI;

use crate::convolve::fftconvolve;
use crate::error::{EngineError, EngineResult};
use crate::modes::{mode_add, Modes, SAMPLE_RATE};

const MAX_CONTACT_TIME: f64 = 2e-3;

/// Synthesizes an impact PCM pulse from two objects' modes, the smaller
/// object's mass, and the pair's resonance.
///
/// Contact time `T = min(0.001 * mass, 2ms)` governs the width of a
/// half-sine force pulse that is convolved with the summed modal impulse
/// response, then normalized to unit peak amplitude.
pub fn synth_impact(modes1: &Modes, modes2: &Modes, mass: f64, resonance: f64) -> EngineResult<Vec<f64>> {
    let h1 = modes1.sum_modes(resonance);
    let h2 = modes2.sum_modes(resonance);
    let h = mode_add(&h1, &h2);

    if h.is_empty() {
        return Err(EngineError::SynthesisEmpty);
    }

    let contact_time = (0.001 * mass).min(MAX_CONTACT_TIME);
    let pulse_len = ((contact_time * SAMPLE_RATE).ceil() as usize).max(1);
    let force = half_sine_pulse(pulse_len);

    let mut convolved = fftconvolve(&h, &force);
    normalize_peak(&mut convolved);

    Ok(convolved)
}

fn half_sine_pulse(num_samples: usize) -> Vec<f64> {
    if num_samples <= 1 {
        return vec![1.0];
    }
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / (num_samples - 1) as f64 * PI;
            t.sin()
        })
        .collect()
}

fn normalize_peak(signal: &mut [f64]) {
    let peak = signal.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
    if peak > f64::EPSILON {
        for s in signal.iter_mut() {
            *s /= peak;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flat_modes() -> Modes {
        Modes::new([440.0; 10], [-6.0; 10], [50.0; 10])
    }

    #[test]
    fn synth_impact_is_normalized_to_unit_peak() {
        let modes = flat_modes();
        let pcm = synth_impact(&modes, &modes, 1.0, 0.45).unwrap();
        let peak = pcm.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-6, "peak was {peak}");
    }

    #[test]
    fn synth_impact_is_deterministic() {
        let modes = flat_modes();
        let a = synth_impact(&modes, &modes, 2.0, 0.45).unwrap();
        let b = synth_impact(&modes, &modes, 2.0, 0.45).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn contact_time_clamps_at_two_milliseconds() {
        // Mass of 1000 kg would otherwise imply a 1 second contact time.
        let modes = flat_modes();
        let pcm_heavy = synth_impact(&modes, &modes, 1000.0, 0.45).unwrap();
        let pcm_at_cap = synth_impact(&modes, &modes, 2.0, 0.45).unwrap();
        // Both should have been convolved with a 2ms-capped pulse, so their
        // lengths (dominated by h's length plus the pulse) should match.
        assert_eq!(pcm_heavy.len(), pcm_at_cap.len());
    }

    #[test]
    fn half_sine_pulse_starts_and_ends_near_zero() {
        let pulse = half_sine_pulse(88);
        assert!(pulse[0].abs() < 1e-9);
        assert!(pulse[pulse.len() - 1].abs() < 1e-6);
    }
}
