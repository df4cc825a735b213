//! Scrape-surface micro-roughness profile.
//!
//! The reference implementation loads a measured roughness profile from a
//! packaged asset; no such measurement is present in this crate's retrieval
//! pack, so the profile here is a deterministic procedural stand-in (a sum
//! of incommensurate sine harmonics) rather than measured data. See
//! DESIGN.md. It is concatenated with itself once at construction so
//! windowed reads near the tail never run out of bounds.

use std::sync::OnceLock;

/// Meters per pixel of the surface profile, from the reference
/// implementation's scrape kinematics.
pub const SCRAPE_M_PER_PIXEL: f64 = 1394.068e-9;

/// Length of a single (non-duplicated) profile pass.
pub const PROFILE_LEN: usize = 8192;

/// Minimum samples that must remain before the single-pass profile end
/// before the cursor wraps back to zero.
pub const WRAP_MARGIN: usize = 100;

fn build_profile() -> Vec<f64> {
    let single: Vec<f64> = (0..PROFILE_LEN)
        .map(|i| {
            let x = i as f64;
            0.6 * (x * 0.013).sin() + 0.3 * (x * 0.047).sin() + 0.1 * (x * 0.191).sin()
        })
        .collect();

    let mut doubled = single.clone();
    doubled.extend(single);
    doubled
}

static PROFILE: OnceLock<Vec<f64>> = OnceLock::new();

/// Returns the wrap-safe surface profile (length `2 * PROFILE_LEN`).
pub fn profile() -> &'static [f64] {
    PROFILE.get_or_init(build_profile)
}

/// First derivative of the profile by central finite difference, scaled by
/// [`SCRAPE_M_PER_PIXEL`].
pub fn first_derivative() -> Vec<f64> {
    let p = profile();
    let mut d = vec![0.0; p.len()];
    for i in 1..p.len() - 1 {
        d[i] = (p[i + 1] - p[i - 1]) / (2.0 * SCRAPE_M_PER_PIXEL);
    }
    d
}

/// Second derivative of the profile by central finite difference, scaled by
/// [`SCRAPE_M_PER_PIXEL`].
pub fn second_derivative() -> Vec<f64> {
    let p = profile();
    let mut d = vec![0.0; p.len()];
    let step_sq = SCRAPE_M_PER_PIXEL * SCRAPE_M_PER_PIXEL;
    for i in 1..p.len() - 1 {
        d[i] = (p[i + 1] - 2.0 * p[i] + p[i - 1]) / step_sq;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn profile_is_wrap_safe_doubled_length() {
        assert_eq!(profile().len(), PROFILE_LEN * 2);
    }

    #[test]
    fn profile_is_deterministic() {
        assert_eq!(profile(), profile());
    }

    #[test]
    fn derivatives_have_matching_length() {
        assert_eq!(first_derivative().len(), profile().len());
        assert_eq!(second_derivative().len(), profile().len());
    }
}
