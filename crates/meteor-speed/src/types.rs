//! Core types for meteor speed estimation
//!
//! The estimator consumes a 1-D magnitude spectrum, typically one row or
//! column of the 2-D Fourier transform of a frame containing a meteor streak.
//! A streak that is repeated (or exposed twice) across the refresh interval
//! shows up as a periodic pattern in the image, and that period appears in
//! the spectrum as two dominant peaks whose spacing is inversely
//! proportional to the spatial displacement:
//!
//! ```text
//!   |M(k)|
//!     ^        center
//!     |          *
//!     |          |          secondary
//!     |          |             *
//!     |   .      |      .      |      .
//!     +----------+-------------+-----------> k
//!                <--- Δk ----->
//!
//!   pixel distance = N / Δk
//! ```

use num_complex::Complex64;

/// Type alias for complex frequency bins
pub type Complex = Complex64;

/// A single magnitude sample of the spectrum
pub type Magnitude = f64;

/// Result type for speed estimation
pub type SpeedResult<T> = Result<T, SpeedError>;

/// Errors that can occur while estimating a meteor speed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeedError {
    #[error("Spectrum is empty")]
    EmptySpectrum,

    #[error("Spectrum sample {index} is not finite")]
    NonFiniteSample { index: usize },

    #[error("Not enough peaks: expected at least 2, found {found}")]
    InsufficientPeaks { found: usize },

    #[error("Frequency distance between peaks is zero")]
    ZeroFrequencyDistance,

    #[error("Invalid {name}: {value}. Must be finite and positive")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Check that a scalar parameter is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> SpeedResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SpeedError::InvalidParameter { name, value })
    }
}

/// Magnitudes of complex frequency bins.
pub fn magnitudes(bins: &[Complex]) -> Vec<Magnitude> {
    bins.iter().map(|z| z.norm()).collect()
}
