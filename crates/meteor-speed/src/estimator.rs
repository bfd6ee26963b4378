//! # Meteor Speed Estimator
//!
//! Runs the full chain on one magnitude spectrum:
//!
//! ```text
//! magnitude[] → local maxima → two strongest → Δk → pixel distance
//!             → pixel/ms, pixel/s → m/s, km/h, km/s
//! ```
//!
//! Every stage logs its intermediate values through `tracing`, and the
//! returned [`SpeedEstimate`] renders the same report via `Display`.
//!
//! ## Example
//!
//! ```rust
//! use meteor_speed::estimator::{meteor_speed, EstimatorConfig, MeteorSpeedEstimator};
//!
//! let mut spectrum = vec![0.0; 100];
//! spectrum[50] = 10.0;
//! spectrum[60] = 4.0;
//!
//! let speed = meteor_speed(&spectrum).unwrap();
//! assert!((speed - 100_000.0).abs() < 1e-6);
//!
//! let estimator = MeteorSpeedEstimator::new(EstimatorConfig {
//!     refresh_duration_ms: 40.0,
//!     dist_per_pixel_m: 250.0,
//!     ..Default::default()
//! });
//! let estimate = estimator.estimate(&spectrum).unwrap();
//! assert_eq!(estimate.freq_distance, 10.0);
//! println!("{}", estimate);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::conversion::{
    freq_dist_to_pixel_dist, ms_to_kmh, ms_to_kms, pixel_speed, pixel_speed_to_real_speed,
    DEFAULT_DIST_PER_PIXEL_M, DEFAULT_REFRESH_DURATION_MS,
};
use crate::peak_detector::{PeakDetector, PeakInfo};
use crate::types::{magnitudes, require_positive, Complex, Magnitude, SpeedError, SpeedResult};

/// Estimator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Time between frames in milliseconds
    pub refresh_duration_ms: f64,
    /// Ground distance covered by one pixel, in metres
    pub dist_per_pixel_m: f64,
    /// Ignore peaks at or below this magnitude
    pub min_peak_magnitude: Option<f64>,
    /// Measure the peak separation between interpolated (sub-bin) positions
    pub interpolate: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            refresh_duration_ms: DEFAULT_REFRESH_DURATION_MS,
            dist_per_pixel_m: DEFAULT_DIST_PER_PIXEL_M,
            min_peak_magnitude: None,
            interpolate: false,
        }
    }
}

impl EstimatorConfig {
    /// Check that the scalar parameters are usable.
    pub fn validate(&self) -> SpeedResult<()> {
        require_positive("refresh_duration_ms", self.refresh_duration_ms)?;
        require_positive("dist_per_pixel_m", self.dist_per_pixel_m)?;
        if let Some(value) = self.min_peak_magnitude {
            if !value.is_finite() {
                return Err(SpeedError::InvalidParameter {
                    name: "min_peak_magnitude",
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Every intermediate value of one estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedEstimate {
    /// Strongest peak
    pub center: PeakInfo,
    /// Second strongest peak
    pub secondary: PeakInfo,
    /// Number of bins in the spectrum
    pub spectrum_len: usize,
    /// Separation between the two peaks, in bins
    pub freq_distance: f64,
    /// Spatial period in pixels
    pub pixel_distance: f64,
    /// Refresh duration used, in milliseconds
    pub refresh_duration_ms: f64,
    /// Pixels per millisecond
    pub pixel_speed_per_ms: f64,
    /// Pixels per second
    pub pixel_speed_per_s: f64,
    /// Metres per pixel used
    pub dist_per_pixel_m: f64,
    /// Physical speed in m/s
    pub speed_m_per_s: f64,
}

impl SpeedEstimate {
    /// Physical speed in km/h.
    pub fn speed_km_per_h(&self) -> f64 {
        ms_to_kmh(self.speed_m_per_s)
    }

    /// Physical speed in km/s.
    pub fn speed_km_per_s(&self) -> f64 {
        ms_to_kms(self.speed_m_per_s)
    }
}

impl fmt::Display for SpeedEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Peaks at bins {} and {} ({:.2} bins apart)",
            self.center.index, self.secondary.index, self.freq_distance
        )?;
        writeln!(f, "Pixel distance: {:.2}", self.pixel_distance)?;
        writeln!(f)?;
        writeln!(f, "(Refresh duration: {:.1} ms)", self.refresh_duration_ms)?;
        writeln!(f, "Pixel speed: {:.2} pixel/ms", self.pixel_speed_per_ms)?;
        writeln!(f, "             {:.2} pixel/s", self.pixel_speed_per_s)?;
        writeln!(f)?;
        writeln!(f, "(Distance per pixel: {:.2} m)", self.dist_per_pixel_m)?;
        writeln!(f, "Real speed: {:.2} m/s", self.speed_m_per_s)?;
        writeln!(f, "            {:.2} km/h", self.speed_km_per_h())?;
        write!(f, "            {:.2} km/s", self.speed_km_per_s())
    }
}

/// Meteor speed estimator.
#[derive(Debug, Clone)]
pub struct MeteorSpeedEstimator {
    config: EstimatorConfig,
    detector: PeakDetector,
}

impl Default for MeteorSpeedEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl MeteorSpeedEstimator {
    /// Create an estimator with the given parameters.
    pub fn new(config: EstimatorConfig) -> Self {
        let detector = match config.min_peak_magnitude {
            Some(t) => PeakDetector::with_threshold(t),
            None => PeakDetector::new(),
        };
        Self { config, detector }
    }

    /// Get configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the meteor speed from a magnitude spectrum.
    #[tracing::instrument(level = "debug", skip_all, fields(len = magnitude.len()))]
    pub fn estimate(&self, magnitude: &[Magnitude]) -> SpeedResult<SpeedEstimate> {
        self.config.validate()?;

        let pair = self.detector.dominant_pair(magnitude)?;
        let freq_distance = if self.config.interpolate {
            pair.fractional_distance()
        } else {
            pair.bin_distance() as f64
        };
        tracing::debug!(
            center = pair.center.index,
            secondary = pair.secondary.index,
            freq_distance,
            "dominant peaks"
        );

        let pixel_distance = freq_dist_to_pixel_dist(freq_distance, magnitude.len())?;
        let pixel = pixel_speed(pixel_distance, self.config.refresh_duration_ms)?;
        let speed = pixel_speed_to_real_speed(pixel.per_s, self.config.dist_per_pixel_m)?;

        tracing::info!(
            m_per_s = speed,
            km_per_h = ms_to_kmh(speed),
            "meteor speed estimated"
        );

        Ok(SpeedEstimate {
            center: pair.center,
            secondary: pair.secondary,
            spectrum_len: magnitude.len(),
            freq_distance,
            pixel_distance,
            refresh_duration_ms: self.config.refresh_duration_ms,
            pixel_speed_per_ms: pixel.per_ms,
            pixel_speed_per_s: pixel.per_s,
            dist_per_pixel_m: self.config.dist_per_pixel_m,
            speed_m_per_s: speed,
        })
    }

    /// Estimate from complex frequency bins, using their magnitudes.
    pub fn estimate_complex(&self, bins: &[Complex]) -> SpeedResult<SpeedEstimate> {
        self.estimate(&magnitudes(bins))
    }
}

/// Estimate the meteor speed in m/s with default parameters
/// (100 ms refresh, 1000 m per pixel).
pub fn meteor_speed(magnitude: &[Magnitude]) -> SpeedResult<f64> {
    MeteorSpeedEstimator::default()
        .estimate(magnitude)
        .map(|e| e.speed_m_per_s)
}
