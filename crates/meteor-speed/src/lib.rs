//! # Meteor Speed Estimation
//!
//! Estimates the real-world speed of a meteor from a 1-D magnitude spectrum,
//! typically a row or column of the 2-D Fourier transform of a frame that
//! contains the meteor streak.
//!
//! ## Signal Flow
//!
//! ```text
//! |FFT| → local maxima → two strongest peaks → Δk
//!       → pixel distance (N / Δk)
//!       → pixel speed (÷ refresh duration)
//!       → real speed (× metres per pixel) → m/s, km/h, km/s
//! ```
//!
//! Computing the spectrum itself is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use meteor_speed::prelude::*;
//!
//! let mut spectrum = vec![0.0; 128];
//! spectrum[64] = 12.0;
//! spectrum[72] = 5.0;
//!
//! let estimator = MeteorSpeedEstimator::new(EstimatorConfig::default());
//! let estimate = estimator.estimate(&spectrum).unwrap();
//!
//! // 128 bins / 8 bins apart = 16 px per 100 ms
//! assert!((estimate.pixel_distance - 16.0).abs() < 1e-9);
//! assert!((estimate.speed_m_per_s - 160_000.0).abs() < 1e-6);
//! ```

pub mod config;
pub mod conversion;
pub mod estimator;
pub mod observe;
pub mod peak_detector;
pub mod types;

// Re-export main types
pub use config::{ConfigError, MeteorConfig};
pub use estimator::{meteor_speed, EstimatorConfig, MeteorSpeedEstimator, SpeedEstimate};
pub use peak_detector::{PeakDetector, PeakInfo, PeakPair};
pub use types::{Complex, Magnitude, SpeedError, SpeedResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::conversion::{
        freq_dist_to_pixel_dist, pixel_dist_to_pixel_speed, pixel_speed_to_real_speed,
    };
    pub use crate::estimator::{meteor_speed, EstimatorConfig, MeteorSpeedEstimator, SpeedEstimate};
    pub use crate::peak_detector::{PeakDetector, PeakInfo};
    pub use crate::types::{SpeedError, SpeedResult};
}
