//! FFT-based linear convolution, the direct analogue of
//! `scipy.signal.fftconvolve` used by this engine's synthesis ancestry.

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

/// Convolves `a` and `b`, returning a signal of length `a.len() + b.len() - 1`.
///
/// Both operands are zero-padded to the next power-of-two FFT length at
/// least as large as the full convolution length, transformed, multiplied
/// in the frequency domain, and inverse-transformed.
pub fn fftconvolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let full_len = a.len() + b.len() - 1;
    let fft_len = full_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut buf_a = to_complex_padded(a, fft_len);
    let mut buf_b = to_complex_padded(b, fft_len);

    fft.process(&mut buf_a);
    fft.process(&mut buf_b);

    for (x, y) in buf_a.iter_mut().zip(buf_b.iter()) {
        *x *= y;
    }

    ifft.process(&mut buf_a);

    let scale = 1.0 / fft_len as f64;
    buf_a
        .into_iter()
        .take(full_len)
        .map(|c| c.re * scale)
        .collect()
}

fn to_complex_padded(samples: &[f64], len: usize) -> Vec<Complex64> {
    let mut buf = vec![Complex64::new(0.0, 0.0); len];
    for (slot, &s) in buf.iter_mut().zip(samples.iter()) {
        *slot = Complex64::new(s, 0.0);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn convolve_with_impulse_is_identity() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        let impulse = vec![1.0];
        let result = fftconvolve(&signal, &impulse);
        assert_eq!(result.len(), 4);
        for (a, b) in result.iter().zip(signal.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn convolve_output_length() {
        let a = vec![1.0; 5];
        let b = vec![1.0; 3];
        let result = fftconvolve(&a, &b);
        assert_eq!(result.len(), 7);
    }

    #[test]
    fn convolve_empty_input_is_empty() {
        assert!(fftconvolve(&[], &[1.0, 2.0]).is_empty());
        assert!(fftconvolve(&[1.0], &[]).is_empty());
    }

    #[test]
    fn convolve_matches_direct_computation() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![0.0, 1.0, 0.5];
        let result = fftconvolve(&a, &b);

        // Direct convolution for comparison.
        let mut expected = vec![0.0; a.len() + b.len() - 1];
        for (i, &av) in a.iter().enumerate() {
            for (j, &bv) in b.iter().enumerate() {
                expected[i + j] += av * bv;
            }
        }

        for (got, want) in result.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }
}
