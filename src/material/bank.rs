//! The material mode bank: 14 materials × 6 size buckets = 84 parametric
//! distributions of modal frequency, onset power, and decay time.
//!
//! The reference catalog of measured per-material mode statistics is not
//! part of this crate's retrieval pack (no `material_data.json` was
//! available to embed verbatim). Each material's base acoustic constants
//! below are therefore synthesized from plausible physical relationships
//! (harder/denser materials ring higher and longer) rather than measured
//! data; see DESIGN.md.

use std::collections::HashMap;

use rand_pcg::Pcg32;

use super::{material_size_key, AudioMaterial, SizeBucket};
use crate::error::{EngineError, EngineResult};
use crate::modes::Modes;

/// Three parallel length-10 vectors describing one `(material, size)` mode
/// distribution: center frequencies (Hz), onset powers (dB), RT60 decay
/// times (s).
#[derive(Debug, Clone, PartialEq)]
pub struct ModeDistribution {
    pub cf: [f64; 10],
    pub op: [f64; 10],
    pub rt: [f64; 10],
}

/// Per-material base constants used to derive all six of its size buckets.
struct MaterialConstants {
    /// Fundamental frequency at size bucket 0, in Hz.
    base_freq: f64,
    /// Baseline onset power, in dB.
    base_power: f64,
    /// Baseline RT60 at size bucket 0, in seconds.
    base_rt: f64,
}

/// Inharmonic frequency-ratio ladder shared by all materials; materials
/// differ in fundamental frequency and decay character, not in how many
/// partials they have.
const MODE_RATIOS: [f64; 10] = [
    1.0, 1.8, 2.4, 3.1, 3.9, 4.7, 5.6, 6.8, 8.1, 9.5,
];

fn material_constants(material: AudioMaterial) -> MaterialConstants {
    use AudioMaterial::*;
    match material {
        Ceramic => MaterialConstants {
            base_freq: 2400.0,
            base_power: -6.0,
            base_rt: 0.35,
        },
        WoodHard => MaterialConstants {
            base_freq: 1100.0,
            base_power: -9.0,
            base_rt: 0.22,
        },
        WoodMedium => MaterialConstants {
            base_freq: 900.0,
            base_power: -10.0,
            base_rt: 0.18,
        },
        WoodSoft => MaterialConstants {
            base_freq: 700.0,
            base_power: -12.0,
            base_rt: 0.14,
        },
        Metal => MaterialConstants {
            base_freq: 3200.0,
            base_power: -4.0,
            base_rt: 0.9,
        },
        Glass => MaterialConstants {
            base_freq: 4200.0,
            base_power: -3.0,
            base_rt: 0.55,
        },
        Paper => MaterialConstants {
            base_freq: 1600.0,
            base_power: -18.0,
            base_rt: 0.05,
        },
        Cardboard => MaterialConstants {
            base_freq: 800.0,
            base_power: -16.0,
            base_rt: 0.06,
        },
        Leather => MaterialConstants {
            base_freq: 650.0,
            base_power: -14.0,
            base_rt: 0.08,
        },
        Fabric => MaterialConstants {
            base_freq: 500.0,
            base_power: -20.0,
            base_rt: 0.04,
        },
        PlasticHard => MaterialConstants {
            base_freq: 1800.0,
            base_power: -8.0,
            base_rt: 0.25,
        },
        PlasticSoftFoam => MaterialConstants {
            base_freq: 400.0,
            base_power: -22.0,
            base_rt: 0.05,
        },
        Rubber => MaterialConstants {
            base_freq: 350.0,
            base_power: -15.0,
            base_rt: 0.07,
        },
        Stone => MaterialConstants {
            base_freq: 2000.0,
            base_power: -7.0,
            base_rt: 0.4,
        },
    }
}

/// Size buckets scale the fundamental down and the decay up: bigger objects
/// resonate lower and longer.
fn size_scale(size: SizeBucket) -> (f64, f64) {
    let s = size.get() as f64;
    let freq_scale = 2f64.powf(-s * 0.35);
    let rt_scale = 1.0 + s * 0.4;
    (freq_scale, rt_scale)
}

fn build_distribution(material: AudioMaterial, size: SizeBucket) -> ModeDistribution {
    let consts = material_constants(material);
    let (freq_scale, rt_scale) = size_scale(size);

    let mut cf = [0.0; 10];
    let mut op = [0.0; 10];
    let mut rt = [0.0; 10];

    for (i, ratio) in MODE_RATIOS.iter().enumerate() {
        cf[i] = consts.base_freq * ratio * freq_scale;
        op[i] = consts.base_power - 2.0 * i as f64;
        rt[i] = (consts.base_rt * rt_scale / (1.0 + 0.3 * i as f64)).max(0.002);
    }

    ModeDistribution { cf, op, rt }
}

/// Read-only, load-once catalog of `(material, size)` → `ModeDistribution`.
///
/// Built once via [`MaterialModeBank::new`] and typically shared behind an
/// `Arc`. Missing keys indicate a bug in table construction, not a
/// per-frame condition.
#[derive(Debug)]
pub struct MaterialModeBank {
    distributions: HashMap<String, ModeDistribution>,
}

impl MaterialModeBank {
    /// Builds all 84 `(material, size)` distributions.
    pub fn new() -> EngineResult<Self> {
        let mut distributions = HashMap::with_capacity(84);
        for &material in AudioMaterial::ALL.iter() {
            for size_value in 0..=5u8 {
                let size = SizeBucket::new(size_value).expect("0..=5 is always valid");
                let key = material_size_key(material, size);
                distributions.insert(key, build_distribution(material, size));
            }
        }
        Ok(Self { distributions })
    }

    /// Number of distributions held by the bank (84 for the full material ×
    /// size cross product).
    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }

    fn distribution(&self, key: &str) -> EngineResult<&ModeDistribution> {
        self.distributions
            .get(key)
            .ok_or_else(|| EngineError::MissingMaterialData {
                key: key.to_string(),
            })
    }

    /// Samples a concrete [`Modes`] instance from the distribution at `key`.
    ///
    /// For each of the 10 indices: draws a frequency from
    /// `Normal(cf[i], cf[i]/10)` rejecting until `>= 20 Hz`; a power from
    /// `Normal(op[i], 10)` unconditionally; and a decay from
    /// `Normal(rt[i], rt[i]/10)` rejecting until `>= 1 ms`, converted to
    /// milliseconds.
    pub fn sample(&self, key: &str, rng: &mut Pcg32) -> EngineResult<Modes> {
        let dist = self.distribution(key)?;

        let mut frequencies = [0.0; 10];
        let mut powers = [0.0; 10];
        let mut decay_times = [0.0; 10];

        for i in 0..10 {
            frequencies[i] = sample_rejecting(rng, dist.cf[i], dist.cf[i] / 10.0, 20.0);
            powers[i] = sample_normal(rng, dist.op[i], 10.0);
            let rt_seconds =
                sample_rejecting(rng, dist.rt[i], dist.rt[i] / 10.0, 0.001);
            decay_times[i] = rt_seconds * 1000.0;
        }

        Ok(Modes::new(frequencies, powers, decay_times))
    }
}

impl Default for MaterialModeBank {
    fn default() -> Self {
        Self::new().expect("embedded mode tables always populate")
    }
}

/// Box-Muller transform: draws one sample from `Normal(mean, std_dev)`.
///
/// `rand_distr` is not part of this crate's dependency set, so the
/// transform is implemented directly atop `rand`'s uniform sampling, in
/// the spirit of this crate's other small hand-rolled numeric helpers.
fn sample_normal(rng: &mut Pcg32, mean: f64, std_dev: f64) -> f64 {
    use rand::Rng;
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z0
}

/// Draws from `Normal(mean, std_dev)`, rejecting samples below `floor`.
fn sample_rejecting(rng: &mut Pcg32, mean: f64, std_dev: f64, floor: f64) -> f64 {
    loop {
        let value = sample_normal(rng, mean, std_dev);
        if value >= floor {
            return value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use pretty_assertions::assert_eq;

    #[test]
    fn bank_has_84_entries() {
        let bank = MaterialModeBank::new().unwrap();
        assert_eq!(bank.len(), 84);
    }

    #[test]
    fn missing_key_is_an_error() {
        let bank = MaterialModeBank::new().unwrap();
        let mut rng = create_rng(1);
        let result = bank.sample("not_a_real_key", &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn sampled_modes_respect_invariants() {
        let bank = MaterialModeBank::new().unwrap();
        let mut rng = create_rng(7);

        for &material in AudioMaterial::ALL.iter() {
            for size_value in 0..=5u8 {
                let size = SizeBucket::new(size_value).unwrap();
                let key = material_size_key(material, size);
                let modes = bank.sample(&key, &mut rng).unwrap();
                for f in modes.frequencies.iter() {
                    assert!(*f >= 20.0, "frequency {f} below 20 Hz floor");
                }
                for t in modes.decay_times.iter() {
                    assert!(*t >= 1.0, "decay time {t} below 1 ms floor");
                }
            }
        }
    }

    #[test]
    fn sampling_is_deterministic_given_same_rng_state() {
        let bank = MaterialModeBank::new().unwrap();
        let mut rng1 = create_rng(99);
        let mut rng2 = create_rng(99);

        let a = bank.sample("wood_medium_1", &mut rng1).unwrap();
        let b = bank.sample("wood_medium_1", &mut rng2).unwrap();
        assert_eq!(a.frequencies, b.frequencies);
        assert_eq!(a.powers, b.powers);
        assert_eq!(a.decay_times, b.decay_times);
    }
}
