//! Peak Detector
//!
//! Finds the local maxima of a magnitude spectrum and ranks them so the two
//! dominant peaks can be measured.
//!
//! A sample is a peak when the discrete derivative changes sign across it.
//! The derivative is taken with edge replication, so it is zero at both ends:
//!
//! ```text
//! m:   m0    m1    m2   ...  m(N-1)
//! d:  0   m1-m0  m2-m1  ...        0
//!
//! peak at i  <=>  d[i] > 0  &&  d[i+1] < 0
//! ```
//!
//! The first and last samples therefore never qualify, and neither does any
//! sample on a flat plateau.
//!
//! ## Example
//!
//! ```rust
//! use meteor_speed::peak_detector::{find_local_maxima, PeakDetector};
//!
//! let spectrum = vec![0.0, 1.0, 0.2, 0.1, 3.0, 0.1, 0.0, 2.0, 0.5];
//! let peaks = find_local_maxima(&spectrum);
//! let indices: Vec<usize> = peaks.iter().map(|p| p.index).collect();
//! assert_eq!(indices, vec![1, 4, 7]);
//!
//! let pair = PeakDetector::default().dominant_pair(&spectrum).unwrap();
//! assert_eq!(pair.center.index, 4);
//! assert_eq!(pair.secondary.index, 7);
//! ```

use crate::types::{Magnitude, SpeedError, SpeedResult};

/// Detected peak information.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakInfo {
    /// Bin index of the peak
    pub index: usize,
    /// Peak magnitude
    pub magnitude: f64,
    /// Estimated fractional index (from parabolic interpolation)
    pub fractional_index: f64,
}

/// The two strongest peaks of a spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakPair {
    /// Strongest peak
    pub center: PeakInfo,
    /// Second strongest peak
    pub secondary: PeakInfo,
}

impl PeakPair {
    /// Bin separation between the two peaks.
    pub fn bin_distance(&self) -> usize {
        self.center.index.abs_diff(self.secondary.index)
    }

    /// Separation between the interpolated peak positions.
    pub fn fractional_distance(&self) -> f64 {
        (self.center.fractional_index - self.secondary.fractional_index).abs()
    }
}

/// Find every local maximum of `magnitude`, in ascending index order.
pub fn find_local_maxima(magnitude: &[Magnitude]) -> Vec<PeakInfo> {
    let n = magnitude.len();
    let mut peaks = Vec::new();

    for i in 1..n.saturating_sub(1) {
        let rising = magnitude[i] - magnitude[i - 1];
        let falling = magnitude[i + 1] - magnitude[i];

        if rising > 0.0 && falling < 0.0 {
            let frac = parabolic_interpolation(magnitude[i - 1], magnitude[i], magnitude[i + 1]);
            peaks.push(PeakInfo {
                index: i,
                magnitude: magnitude[i],
                fractional_index: i as f64 + frac,
            });
        }
    }

    peaks
}

/// Sort peaks by magnitude, strongest first.
///
/// Equal magnitudes rank the higher index first.
pub fn rank_peaks(mut peaks: Vec<PeakInfo>) -> Vec<PeakInfo> {
    peaks.sort_by(|a, b| {
        b.magnitude
            .total_cmp(&a.magnitude)
            .then(b.index.cmp(&a.index))
    });
    peaks
}

/// The two largest local maxima of `magnitude` with default detection settings.
pub fn dominant_pair(magnitude: &[Magnitude]) -> SpeedResult<PeakPair> {
    PeakDetector::default().dominant_pair(magnitude)
}

/// Peak detector with an optional magnitude threshold.
#[derive(Debug, Clone, Default)]
pub struct PeakDetector {
    /// Peaks at or below this magnitude are ignored
    threshold: Option<f64>,
}

impl PeakDetector {
    /// Create a detector that keeps every local maximum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector that ignores peaks at or below `threshold`.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: Some(threshold),
        }
    }

    /// Get threshold.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Set threshold.
    pub fn set_threshold(&mut self, threshold: Option<f64>) {
        self.threshold = threshold;
    }

    /// Local maxima that pass the threshold, in ascending index order.
    pub fn find_peaks(&self, magnitude: &[Magnitude]) -> Vec<PeakInfo> {
        let peaks = find_local_maxima(magnitude);
        match self.threshold {
            Some(t) => peaks.into_iter().filter(|p| p.magnitude > t).collect(),
            None => peaks,
        }
    }

    /// Select the two strongest peaks of a spectrum.
    pub fn dominant_pair(&self, magnitude: &[Magnitude]) -> SpeedResult<PeakPair> {
        validate_spectrum(magnitude)?;

        let ranked = rank_peaks(self.find_peaks(magnitude));
        tracing::trace!(peaks = ranked.len(), "local maxima ranked");

        let mut iter = ranked.into_iter();
        match (iter.next(), iter.next()) {
            (Some(center), Some(secondary)) => Ok(PeakPair { center, secondary }),
            (first, _) => Err(SpeedError::InsufficientPeaks {
                found: usize::from(first.is_some()),
            }),
        }
    }
}

fn validate_spectrum(magnitude: &[Magnitude]) -> SpeedResult<()> {
    if magnitude.is_empty() {
        return Err(SpeedError::EmptySpectrum);
    }
    if let Some(index) = magnitude.iter().position(|m| !m.is_finite()) {
        return Err(SpeedError::NonFiniteSample { index });
    }
    Ok(())
}

/// Parabolic interpolation to find fractional peak offset.
///
/// Given three consecutive samples (y_minus1, y_0, y_plus1) where y_0 is the
/// peak, returns the fractional offset from the center sample.
fn parabolic_interpolation(y_m1: f64, y_0: f64, y_p1: f64) -> f64 {
    let denom = y_m1 - 2.0 * y_0 + y_p1;
    if denom.abs() < 1e-30 {
        0.0
    } else {
        0.5 * (y_m1 - y_p1) / denom
    }
}
