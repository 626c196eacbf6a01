//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a generic second-order IIR filter and the four response shapes
//! exposed to callers through [`FilterType`]: low-pass, high-pass, band-pass
//! and notch.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.

use core::f32::consts::PI;
use core::fmt;
use core::str::FromStr;

use libm::{cosf, sinf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw `(b0, b1, b2, a0, a1, a2)` coefficients, not yet normalized by `a0`.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

/// Smallest Q handed to the coefficient formulas. Q of zero divides by zero.
const MIN_Q: f32 = 1.0e-4;

/// Lowest frequency handed to the coefficient formulas, in Hz.
const MIN_FREQUENCY: f32 = 1.0;

/// Response shape of a biquad filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Passes content below the cutoff.
    #[default]
    Lowpass,
    /// Passes content above the cutoff.
    Highpass,
    /// Passes a band around the center frequency.
    Bandpass,
    /// Rejects a band around the center frequency.
    Notch,
}

impl FilterType {
    /// Every filter type, in declaration order.
    pub const ALL: [FilterType; 4] = [
        FilterType::Lowpass,
        FilterType::Highpass,
        FilterType::Bandpass,
        FilterType::Notch,
    ];

    /// Canonical lowercase name (`"lowpass"`, `"highpass"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::Lowpass => "lowpass",
            FilterType::Highpass => "highpass",
            FilterType::Bandpass => "bandpass",
            FilterType::Notch => "notch",
        }
    }

    /// Calculates raw coefficients for this response shape.
    ///
    /// Frequency is clamped to `[1 Hz, 0.49 * sample_rate]` and Q to a small
    /// positive floor so that any stored parameter value yields a stable
    /// filter.
    pub fn coefficients(self, frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
        let nyquist_guard = sample_rate * 0.49;
        let frequency = frequency.clamp(MIN_FREQUENCY, nyquist_guard.max(MIN_FREQUENCY));
        let q = q.max(MIN_Q);
        match self {
            FilterType::Lowpass => lowpass_coefficients(frequency, q, sample_rate),
            FilterType::Highpass => highpass_coefficients(frequency, q, sample_rate),
            FilterType::Bandpass => bandpass_coefficients(frequency, q, sample_rate),
            FilterType::Notch => notch_coefficients(frequency, q, sample_rate),
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known [`FilterType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter type '{0}' (expected lowpass, highpass, bandpass or notch)")]
pub struct ParseFilterTypeError(pub String);

impl FromStr for FilterType {
    type Err = ParseFilterTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseFilterTypeError(s.to_string()))
    }
}

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the biquad coefficients, normalizing by `a0`.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Loads a coefficient tuple as returned by [`FilterType::coefficients`].
    pub fn load(&mut self, coefficients: Coefficients) {
        let (b0, b1, b2, a0, a1, a2) = coefficients;
        self.set_coefficients(b0, b1, b2, a0, a1, a2);
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the delay lines without touching the coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared RBJ intermediates: `(cos(w0), alpha)`.
#[inline]
fn omega_terms(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    (cosf(omega), sinf(omega) / (2.0 * q))
}

/// Calculates low-pass filter coefficients using the RBJ cookbook formula.
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (0.707 gives a Butterworth response)
/// * `sample_rate` - Sample rate in Hz
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);
    (
        (1.0 - cos_omega) / 2.0,
        1.0 - cos_omega,
        (1.0 - cos_omega) / 2.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Calculates high-pass filter coefficients using the RBJ cookbook formula.
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);
    (
        (1.0 + cos_omega) / 2.0,
        -(1.0 + cos_omega),
        (1.0 + cos_omega) / 2.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Calculates band-pass filter coefficients (constant 0 dB peak gain).
///
/// Bandwidth is `frequency / q`.
pub fn bandpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);
    (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_omega, 1.0 - alpha)
}

/// Calculates notch (band-reject) filter coefficients.
pub fn notch_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);
    (
        1.0,
        -2.0 * cos_omega,
        1.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}
