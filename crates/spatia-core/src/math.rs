//! Level conversions and small numeric helpers.
//!
//! All functions are allocation-free and `no_std` friendly.

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use spatia_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are treated as `1e-10` (-200 dB).
///
/// # Example
/// ```rust
/// use spatia_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Clamp a value to the unit interval.
#[inline]
pub fn clamp_unit(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Clamp a value to [-1, 1].
#[inline]
pub fn clamp_signed_unit(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_linear_roundtrip() {
        for db in [-96.0f32, -40.0, -12.0, -6.0, 0.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} -> {back}");
        }
    }

    #[test]
    fn linear_to_db_floors_non_positive() {
        assert!((linear_to_db(0.0) - (-200.0)).abs() < 0.01);
        assert!((linear_to_db(-1.0) - (-200.0)).abs() < 0.01);
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_signed_unit(-1.0001), -1.0);
    }
}
