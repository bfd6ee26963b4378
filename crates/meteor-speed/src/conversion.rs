//! Unit Conversions
//!
//! Three steps take a peak separation in the frequency domain to a physical
//! speed:
//!
//! ```text
//! freq distance Δk ──► pixel distance = N / Δk
//!                  ──► pixel speed    = pixel distance / refresh (ms) × 1000
//!                  ──► real speed     = pixel speed × metres per pixel
//! ```
//!
//! Every step is linear in its inputs, so the chain is trivially invertible.
//!
//! ## Example
//!
//! ```rust
//! use meteor_speed::conversion::*;
//!
//! let pixel_dist = freq_dist_to_pixel_dist(10.0, 100).unwrap();
//! assert!((pixel_dist - 10.0).abs() < 1e-9);
//!
//! let pixel_speed = pixel_dist_to_pixel_speed(pixel_dist, DEFAULT_REFRESH_DURATION_MS).unwrap();
//! assert!((pixel_speed - 100.0).abs() < 1e-9);
//!
//! let real = pixel_speed_to_real_speed(pixel_speed, DEFAULT_DIST_PER_PIXEL_M).unwrap();
//! assert!((real - 100_000.0).abs() < 1e-6);
//! assert!((ms_to_kmh(real) - 360_000.0).abs() < 1e-6);
//! ```

use crate::types::{require_positive, SpeedError, SpeedResult};

/// Default time between frames, in milliseconds.
pub const DEFAULT_REFRESH_DURATION_MS: f64 = 100.0;

/// Default ground distance covered by one pixel, in metres.
pub const DEFAULT_DIST_PER_PIXEL_M: f64 = 1000.0;

/// Convert the peak separation in the spectrum into a spatial period in pixels.
///
/// - `freq_dist`: Distance in bins between the two dominant peaks
/// - `spectrum_len`: Number of bins in the spectrum
pub fn freq_dist_to_pixel_dist(freq_dist: f64, spectrum_len: usize) -> SpeedResult<f64> {
    if freq_dist == 0.0 {
        return Err(SpeedError::ZeroFrequencyDistance);
    }
    let freq_dist = require_positive("freq_dist", freq_dist)?;
    if spectrum_len == 0 {
        return Err(SpeedError::EmptySpectrum);
    }

    let pixel_dist = 1.0 / (freq_dist / spectrum_len as f64);
    tracing::debug!(freq_dist, spectrum_len, pixel_dist, "pixel distance");
    Ok(pixel_dist)
}

/// Pixel speed in both units the report uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpeed {
    /// Pixels per millisecond
    pub per_ms: f64,
    /// Pixels per second
    pub per_s: f64,
}

/// Convert a pixel distance covered in one refresh interval into a pixel speed.
pub fn pixel_speed(pixel_dist: f64, refresh_duration_ms: f64) -> SpeedResult<PixelSpeed> {
    let refresh_duration_ms = require_positive("refresh_duration_ms", refresh_duration_ms)?;
    let per_ms = pixel_dist / refresh_duration_ms;
    let per_s = per_ms * 1000.0;
    tracing::debug!(refresh_duration_ms, pixel_per_ms = per_ms, pixel_per_s = per_s, "pixel speed");
    Ok(PixelSpeed { per_ms, per_s })
}

/// Convert a pixel distance covered in one refresh interval into pixels per second.
pub fn pixel_dist_to_pixel_speed(pixel_dist: f64, refresh_duration_ms: f64) -> SpeedResult<f64> {
    pixel_speed(pixel_dist, refresh_duration_ms).map(|s| s.per_s)
}

/// Convert a speed in pixels per second into metres per second.
pub fn pixel_speed_to_real_speed(pixel_speed: f64, dist_per_pixel_m: f64) -> SpeedResult<f64> {
    let dist_per_pixel_m = require_positive("dist_per_pixel_m", dist_per_pixel_m)?;
    let real_speed = pixel_speed * dist_per_pixel_m;
    tracing::debug!(
        dist_per_pixel_m,
        m_per_s = real_speed,
        km_per_h = ms_to_kmh(real_speed),
        km_per_s = ms_to_kms(real_speed),
        "real speed"
    );
    Ok(real_speed)
}

/// m/s → km/h
#[inline]
pub fn ms_to_kmh(speed_ms: f64) -> f64 {
    speed_ms * 3.6
}

/// m/s → km/s
#[inline]
pub fn ms_to_kms(speed_ms: f64) -> f64 {
    speed_ms / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_dist() {
        assert_relative_eq!(freq_dist_to_pixel_dist(10.0, 100).unwrap(), 10.0);
        assert_relative_eq!(freq_dist_to_pixel_dist(4.0, 256).unwrap(), 64.0);
        assert_relative_eq!(freq_dist_to_pixel_dist(0.5, 8).unwrap(), 16.0);
    }

    #[test]
    fn test_pixel_dist_inverse_in_freq_dist() {
        let a = freq_dist_to_pixel_dist(6.0, 120).unwrap();
        let b = freq_dist_to_pixel_dist(12.0, 120).unwrap();
        assert_relative_eq!(a, 2.0 * b, epsilon = 1e-12);
    }

    #[test]
    fn test_pixel_dist_linear_in_len() {
        let a = freq_dist_to_pixel_dist(5.0, 100).unwrap();
        let b = freq_dist_to_pixel_dist(5.0, 300).unwrap();
        assert_relative_eq!(b, 3.0 * a, epsilon = 1e-12);
    }

    #[test]
    fn test_pixel_dist_errors() {
        assert_eq!(freq_dist_to_pixel_dist(0.0, 100), Err(SpeedError::ZeroFrequencyDistance));
        assert_eq!(freq_dist_to_pixel_dist(3.0, 0), Err(SpeedError::EmptySpectrum));
        assert!(matches!(
            freq_dist_to_pixel_dist(-2.0, 100),
            Err(SpeedError::InvalidParameter { name: "freq_dist", .. })
        ));
        assert!(freq_dist_to_pixel_dist(f64::NAN, 100).is_err());
    }

    #[test]
    fn test_pixel_speed() {
        let speed = pixel_speed(10.0, 100.0).unwrap();
        assert_relative_eq!(speed.per_ms, 0.1);
        assert_relative_eq!(speed.per_s, speed.per_ms * 1000.0);
        assert_relative_eq!(pixel_dist_to_pixel_speed(10.0, 100.0).unwrap(), 100.0);
        assert_relative_eq!(pixel_dist_to_pixel_speed(10.0, 40.0).unwrap(), 250.0);
    }

    #[test]
    fn test_pixel_speed_scaling() {
        let base = pixel_dist_to_pixel_speed(8.0, 50.0).unwrap();
        // Doubling the refresh interval halves the speed
        assert_relative_eq!(pixel_dist_to_pixel_speed(8.0, 100.0).unwrap(), base / 2.0);
        // Doubling the distance doubles it
        assert_relative_eq!(pixel_dist_to_pixel_speed(16.0, 50.0).unwrap(), base * 2.0);
    }

    #[test]
    fn test_pixel_speed_rejects_bad_refresh() {
        assert!(matches!(
            pixel_dist_to_pixel_speed(10.0, 0.0),
            Err(SpeedError::InvalidParameter { name: "refresh_duration_ms", .. })
        ));
        assert!(pixel_dist_to_pixel_speed(10.0, -5.0).is_err());
    }

    #[test]
    fn test_real_speed() {
        assert_relative_eq!(pixel_speed_to_real_speed(100.0, 1000.0).unwrap(), 100_000.0);
        assert_relative_eq!(pixel_speed_to_real_speed(2.5, 12.0).unwrap(), 30.0);
        assert_relative_eq!(
            pixel_speed_to_real_speed(100.0, 2000.0).unwrap(),
            2.0 * pixel_speed_to_real_speed(100.0, 1000.0).unwrap()
        );
        assert!(matches!(
            pixel_speed_to_real_speed(1.0, f64::INFINITY),
            Err(SpeedError::InvalidParameter { name: "dist_per_pixel_m", .. })
        ));
    }

    #[test]
    fn test_derived_units() {
        assert_relative_eq!(ms_to_kmh(10.0), 36.0);
        assert_relative_eq!(ms_to_kms(42_000.0), 42.0);
    }
}
