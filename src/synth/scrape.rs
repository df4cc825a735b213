//! Scrape synthesis: a continuous contact is driven by the surface
//! micro-roughness profile rather than a single impulse, and accumulates
//! into a rolling "master" buffer so that successive frames of the same
//! scrape stay phase-continuous.

use crate::error::{EngineError, EngineResult};
use crate::modes::{mode_add, Modes};
use crate::surface::{self, SCRAPE_M_PER_PIXEL};

const RESAMPLE_LEN: usize = 4010;
const FADE_MS: f64 = 4.0;
const TARGET_DBFS: f64 = -20.0;
const GAUSSIAN_SIGMA: f64 = 10.0;
/// 5 seconds at 44.1kHz; the rolling master buffer never grows past this.
const MASTER_CAP_SAMPLES: usize = 220_500;
/// 50ms of silence at 44.1kHz, inserted between scrape chunks in the master.
const SILENCE_MS_SAMPLES: usize = 2205;
/// 100ms window extracted from the master each frame, at 44.1kHz.
const WINDOW_SAMPLES: usize = 4410;

/// Per-pair persistent state for an ongoing scrape contact.
#[derive(Debug, Clone)]
pub struct ScrapeState {
    master: Vec<i16>,
    event_count: u32,
    start_velocity: f64,
}

impl ScrapeState {
    pub fn new(start_velocity: f64) -> Self {
        Self {
            master: Vec::new(),
            event_count: 0,
            start_velocity,
        }
    }

    pub fn start_velocity(&self) -> f64 {
        self.start_velocity
    }

    pub fn event_count(&self) -> u32 {
        self.event_count
    }
}

/// Outcome of a single scrape frame.
#[derive(Debug, Clone)]
pub enum ScrapeStep {
    /// A 100ms PCM window to play this frame.
    Chunk(Vec<i16>),
    /// The scrape has run out of surface to traverse (one-pixel slide) or
    /// hit the rolling-master growth cap; the pair's state should be dropped.
    Terminated,
}

/// Advances one scraping contact by one frame.
///
/// `cursor` is the shared surface-profile read position, advanced here and
/// wrapped back to zero when the profile runs low on remaining samples.
#[allow(clippy::too_many_arguments)]
pub fn step(
    state: &mut ScrapeState,
    cursor: &mut usize,
    velocity: f64,
    modes1: &Modes,
    modes2: &Modes,
    resonance: f64,
) -> EngineResult<ScrapeStep> {
    let mag = velocity.abs().min(5.0);
    let db = -80.0 + (mag * mag / 25.0) * 68.0;

    let h = impact_response(modes1, modes2, resonance)?;

    let num_pts = (((mag / 1000.0) / SCRAPE_M_PER_PIXEL).floor() as usize).max(1);
    if num_pts <= 1 {
        return Ok(ScrapeStep::Terminated);
    }

    let projected_len = state.master.len() + (SILENCE_MS_SAMPLES + WINDOW_SAMPLES);
    if projected_len > MASTER_CAP_SAMPLES {
        return Ok(ScrapeStep::Terminated);
    }

    let d1 = surface::first_derivative();
    let d2 = surface::second_derivative();

    let start = *cursor;
    let end = (start + num_pts).min(d1.len());
    if end <= start {
        return Ok(ScrapeStep::Terminated);
    }

    let resampled_d1 = resample(&d1[start..end], RESAMPLE_LEN);
    let resampled_d2 = resample(&d2[start..end], RESAMPLE_LEN);

    let new_cursor = start + num_pts;
    let remaining = surface::PROFILE_LEN.saturating_sub(new_cursor);
    *cursor = if remaining < surface::WRAP_MARGIN { 0 } else { new_cursor };

    let vert_raw: Vec<f64> = resampled_d2.iter().map(|d| (d * d / 1000.0).tanh()).collect();
    let vert = gaussian_smooth(&vert_raw, GAUSSIAN_SIGMA);
    let vert_norm = normalize_peak(&vert);

    let mut force: Vec<f64> = vec![0.0; RESAMPLE_LEN];
    for i in 0..RESAMPLE_LEN {
        force[i] = vert_norm[i] + 0.2 * resampled_d1[i];
    }
    let force = normalize_peak(&force);

    let target_amp = db_to_amplitude(TARGET_DBFS);
    let mut force: Vec<f64> = force.iter().map(|s| s * target_amp).collect();
    apply_fade(&mut force, FADE_MS);

    let convolved = crate::convolve::fftconvolve(&force, &h);
    let mut convolved = normalize_peak(&convolved);
    let gain = db_to_amplitude(db);
    for s in convolved.iter_mut() {
        *s *= gain;
    }

    let chunk_i16: Vec<i16> = convolved
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0).round() as i16)
        .collect();

    overlay_into_master(state, &chunk_i16);

    let offset = state.event_count as usize * WINDOW_SAMPLES;
    let window = extract_window(&state.master, offset, WINDOW_SAMPLES);
    state.event_count += 1;

    Ok(ScrapeStep::Chunk(window))
}

fn ms_to_samples(ms: f64) -> usize {
    (ms / 1000.0 * crate::modes::SAMPLE_RATE).round() as usize
}

fn overlay_into_master(state: &mut ScrapeState, chunk: &[i16]) {
    let silence = vec![0i16; SILENCE_MS_SAMPLES];
    match state.event_count {
        0 => {
            state.master = chunk.to_vec();
            state.master.extend_from_slice(&silence);
        }
        1 => {
            let mut other = silence.clone();
            other.extend_from_slice(chunk);
            overlay(&mut state.master, &other);
        }
        n => {
            let mut padded = Vec::with_capacity(silence.len() * n as usize + chunk.len());
            for _ in 0..n {
                padded.extend_from_slice(&silence);
            }
            padded.extend_from_slice(chunk);

            state.master.extend_from_slice(&silence);
            overlay(&mut state.master, &padded);
        }
    }
}

/// Pointwise-adds `other` onto `master` starting at position 0, extending
/// `master` if `other` is longer (pydub's `overlay` semantics).
fn overlay(master: &mut Vec<i16>, other: &[i16]) {
    if other.len() > master.len() {
        master.resize(other.len(), 0);
    }
    for (m, &o) in master.iter_mut().zip(other.iter()) {
        *m = m.saturating_add(o);
    }
}

fn extract_window(master: &[i16], offset: usize, len: usize) -> Vec<i16> {
    let mut window = vec![0i16; len];
    if offset >= master.len() {
        return window;
    }
    let end = (offset + len).min(master.len());
    window[..end - offset].copy_from_slice(&master[offset..end]);
    window
}

fn resample(data: &[f64], out_len: usize) -> Vec<f64> {
    if data.is_empty() {
        return vec![0.0; out_len];
    }
    if data.len() == 1 {
        return vec![data[0]; out_len];
    }

    let mut out = vec![0.0; out_len];
    let scale = (data.len() - 1) as f64 / (out_len - 1).max(1) as f64;
    for (i, slot) in out.iter_mut().enumerate() {
        let pos = i as f64 * scale;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(data.len() - 1);
        let frac = pos - lo as f64;
        *slot = data[lo] * (1.0 - frac) + data[hi] * frac;
    }
    out
}

fn gaussian_smooth(data: &[f64], sigma: f64) -> Vec<f64> {
    let radius = (sigma * 3.0).ceil() as isize;
    let mut kernel = Vec::with_capacity((radius * 2 + 1) as usize);
    let mut sum = 0.0;
    for k in -radius..=radius {
        let w = (-((k * k) as f64) / (2.0 * sigma * sigma)).exp();
        kernel.push(w);
        sum += w;
    }
    for w in kernel.iter_mut() {
        *w /= sum;
    }

    let n = data.len() as isize;
    (0..n)
        .map(|i| {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let offset = k as isize - radius;
                let idx = (i + offset).clamp(0, n - 1);
                acc += data[idx as usize] * w;
            }
            acc
        })
        .collect()
}

fn apply_fade(signal: &mut [f64], fade_ms: f64) {
    let fade_samples = ms_to_samples(fade_ms).min(signal.len() / 2);
    for i in 0..fade_samples {
        let gain = i as f64 / fade_samples as f64;
        signal[i] *= gain;
        let tail = signal.len() - 1 - i;
        signal[tail] *= gain;
    }
}

fn normalize_peak(signal: &[f64]) -> Vec<f64> {
    let peak = signal.iter().fold(0.0_f64, |acc, &s| acc.max(s.abs()));
    if peak > f64::EPSILON {
        signal.iter().map(|s| s / peak).collect()
    } else {
        signal.to_vec()
    }
}

fn db_to_amplitude(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// The undriven modal impulse response for a pair, shared by the impact and
/// scrape paths (see `synth::impact::synth_impact`, which additionally
/// convolves this with a contact-time force pulse).
fn impact_response(modes1: &Modes, modes2: &Modes, resonance: f64) -> EngineResult<Vec<f64>> {
    let h1 = modes1.sum_modes(resonance);
    let h2 = modes2.sum_modes(resonance);
    let h = mode_add(&h1, &h2);
    if h.is_empty() {
        return Err(EngineError::SynthesisEmpty);
    }
    Ok(h)
}
