//! # Spectral reconstruction
//!
//! Legacy grid files store 3D variables as truncated toroidal Fourier series. For every
//! `(x, y)` point the periodic axis holds `2m + 1` values:
//!
//! ```text
//! DC, r1, i1, r2, i2, ... , rm, im
//! ```
//!
//! the real and imaginary parts of each positive frequency harmonic up to the maximum mode
//! number `m`. Reconstruction builds the complex spectrum that a mesh with `nz` local z
//! points and `zperiod` periods per `2π` can represent, and synthesises `nz` real samples
//! with an inverse real DFT. Harmonics that are not multiples of `zperiod`, or that are above
//! the Nyquist limit of the local resolution, are dropped.

use crate::loader::Inconsistent;
use derive_more::Display;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Number of exact periods of the periodic coordinate in `2π`, `round(2π / zlength)`
pub fn zperiod(zlength: f64) -> Result<usize, Inconsistent> {
    let periods = (2. * PI / zlength).round();

    if !periods.is_finite() || periods < 1. {
        return Err(Inconsistent::InvalidZPeriod { zlength });
    }

    Ok(periods as usize)
}

/// Maximum mode number held by a stored toroidal series of `stored_len` values
pub fn max_mode(stored_len: usize) -> usize {
    stored_len.saturating_sub(1) / 2
}

/// Which toroidal mode numbers a spectral read will use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ModeRange {
    #[display(fmt = "n = 0")]
    DcOnly,
    #[display(fmt = "n = 0, {_0}")]
    Single(usize),
    #[display(fmt = "n = 0, {first} ... {last}")]
    Range { first: usize, last: usize },
}

/// Modes read from a file with `maxmode` harmonics onto a mesh with `nz` z points and
/// `zperiod` periods. The highest mode is limited by both the file and the z resolution.
pub fn mode_range(maxmode: usize, zperiod: usize, nz: usize) -> ModeRange {
    if zperiod == 0 || zperiod > maxmode {
        return ModeRange::DcOnly;
    }

    let last = ((maxmode / zperiod) * zperiod).min((nz / 2) * zperiod);

    if last < zperiod {
        ModeRange::DcOnly
    } else if last == zperiod {
        ModeRange::Single(zperiod)
    } else {
        ModeRange::Range {
            first: zperiod,
            last,
        }
    }
}

/// Positive frequency spectrum of length `nz / 2 + 1` built from one stored toroidal series
pub fn harmonic_spectrum(raw: &[f64], zperiod: usize, nz: usize) -> Vec<Complex64> {
    let maxmode = max_mode(raw.len());
    let mut spectrum = vec![Complex64::new(0., 0.); nz / 2 + 1];

    spectrum[0] = Complex64::new(raw.first().copied().unwrap_or(0.), 0.);

    for (i, coefficient) in spectrum.iter_mut().enumerate().skip(1) {
        let modenr = i * zperiod;

        if modenr >= 1 && modenr <= maxmode {
            *coefficient = Complex64::new(raw[2 * modenr - 1], raw[2 * modenr]);
        }
    }

    spectrum
}

/// Inverse real DFT of a fixed length, reusing its FFT plan between rows
pub struct Synthesis {
    fft: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex64>,
}

impl Synthesis {
    pub fn new(n: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_inverse(n),
            buffer: vec![Complex64::new(0., 0.); n],
        }
    }

    /// Write `out[j] = Σ_k c_k exp(2πi jk / n)` over the Hermitian completion of the positive
    /// frequency `spectrum`. The imaginary parts of the DC and Nyquist terms are ignored and
    /// entries above `n / 2` are unused.
    pub fn process(&mut self, spectrum: &[Complex64], out: &mut [f64]) {
        let n = self.buffer.len();

        if n == 0 {
            return;
        }

        self.buffer
            .iter_mut()
            .for_each(|value| *value = Complex64::new(0., 0.));

        for (k, coefficient) in spectrum.iter().enumerate().take(n / 2 + 1) {
            if k == 0 {
                self.buffer[0] = Complex64::new(coefficient.re, 0.);
            } else if 2 * k == n {
                self.buffer[k] = Complex64::new(coefficient.re, 0.);
            } else {
                self.buffer[k] = *coefficient;
                self.buffer[n - k] = coefficient.conj();
            }
        }

        self.fft.process(&mut self.buffer);

        out.iter_mut()
            .zip(self.buffer.iter())
            .for_each(|(sample, value)| *sample = value.re);
    }
}

/// Synthesise `n` real samples from a positive frequency spectrum
pub fn irfft(spectrum: &[Complex64], n: usize) -> Vec<f64> {
    let mut out = vec![0.; n];
    Synthesis::new(n).process(spectrum, &mut out);
    out
}

/// Forward real DFT normalised by `1 / n`, returning the `n / 2 + 1` positive frequencies.
/// `irfft(&rfft(x), x.len())` reproduces `x`.
pub fn rfft(samples: &[f64]) -> Vec<Complex64> {
    let n = samples.len();

    if n == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex64> = samples.iter().map(|x| Complex64::new(*x, 0.)).collect();
    fft.process(&mut buffer);

    let norm = 1. / n as f64;
    buffer.truncate(n / 2 + 1);
    buffer.iter_mut().for_each(|value| *value *= norm);

    buffer
}

/// Pack a positive frequency spectrum into the stored `DC, r1, i1, ...` layout, keeping
/// `maxmode` harmonics. Missing harmonics are written as zero.
pub fn pack_harmonics(spectrum: &[Complex64], maxmode: usize) -> Vec<f64> {
    let mut raw = vec![0.; 2 * maxmode + 1];

    if let Some(dc) = spectrum.first() {
        raw[0] = dc.re;
    }

    for (mode, coefficient) in spectrum.iter().enumerate().skip(1).take(maxmode) {
        raw[2 * mode - 1] = coefficient.re;
        raw[2 * mode] = coefficient.im;
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn zperiod_rounds_to_nearest() {
        assert_eq!(zperiod(2. * PI).unwrap(), 1);
        assert_eq!(zperiod(2. * PI / 5.).unwrap(), 5);
        assert_eq!(zperiod(2. * PI / 4.9).unwrap(), 5);
        assert!(zperiod(3. * 2. * PI).is_err());
    }

    #[test]
    fn dc_only_is_uniform() {
        let out = irfft(&[Complex64::new(3.5, 0.)], 8);
        assert_close(&out, &[3.5; 8]);
    }

    #[test]
    fn single_harmonic_is_a_cosine() {
        let n = 8;
        let spectrum = [Complex64::new(1., 0.), Complex64::new(0.5, 0.)];
        let out = irfft(&spectrum, n);

        let expected: Vec<f64> = (0..n)
            .map(|j| 1. + (2. * PI * j as f64 / n as f64).cos())
            .collect();

        assert_close(&out, &expected);
    }

    #[test]
    fn rfft_inverts_irfft() {
        let samples = [0.3, -1.2, 4.0, 2.5, 0.0, 1.0, -0.7];
        let out = irfft(&rfft(&samples), samples.len());
        assert_close(&out, &samples);

        let samples = [0.3, -1.2, 4.0, 2.5, 0.0, 1.0];
        let out = irfft(&rfft(&samples), samples.len());
        assert_close(&out, &samples);
    }

    #[test]
    fn spectrum_skips_modes_not_multiple_of_zperiod() {
        // DC, mode 1, mode 2, mode 3, mode 4
        let raw = [1., 10., 11., 20., 21., 30., 31., 40., 41.];
        let spectrum = harmonic_spectrum(&raw, 2, 8);

        assert_eq!(spectrum.len(), 5);
        assert_eq!(spectrum[0], Complex64::new(1., 0.));
        assert_eq!(spectrum[1], Complex64::new(20., 21.));
        assert_eq!(spectrum[2], Complex64::new(40., 41.));
        assert_eq!(spectrum[3], Complex64::new(0., 0.));
        assert_eq!(spectrum[4], Complex64::new(0., 0.));
    }

    #[test]
    fn spectrum_limited_by_local_resolution() {
        let raw = [1., 10., 11., 20., 21., 30., 31.];
        let spectrum = harmonic_spectrum(&raw, 1, 2);

        assert_eq!(spectrum, vec![Complex64::new(1., 0.), Complex64::new(10., 11.)]);
    }

    #[test]
    fn pack_then_build_spectrum() {
        let spectrum = [
            Complex64::new(2., 0.),
            Complex64::new(0.25, -0.5),
            Complex64::new(0.1, 0.2),
        ];
        let raw = pack_harmonics(&spectrum, 2);

        assert_eq!(raw, vec![2., 0.25, -0.5, 0.1, 0.2]);
        assert_eq!(harmonic_spectrum(&raw, 1, 4), spectrum.to_vec());
    }

    #[test]
    fn mode_ranges() {
        assert_eq!(mode_range(0, 1, 16), ModeRange::DcOnly);
        assert_eq!(mode_range(4, 5, 16), ModeRange::DcOnly);
        assert_eq!(mode_range(5, 5, 16), ModeRange::Single(5));
        assert_eq!(
            mode_range(12, 2, 16),
            ModeRange::Range { first: 2, last: 12 }
        );
        // limited by nz / 2 = 2 harmonics
        assert_eq!(mode_range(12, 2, 4), ModeRange::Range { first: 2, last: 4 });
        assert_eq!(mode_range(12, 2, 1), ModeRange::DcOnly);
        assert_eq!(
            ModeRange::Range { first: 2, last: 4 }.to_string(),
            "n = 0, 2 ... 4"
        );
    }

    #[test]
    fn empty_synthesis_writes_nothing() {
        let spectrum = [Complex64::new(1., 0.)];
        let mut out: [f64; 0] = [];

        Synthesis::new(0).process(&spectrum, &mut out);
        assert!(irfft(&spectrum, 0).is_empty());
    }
}
