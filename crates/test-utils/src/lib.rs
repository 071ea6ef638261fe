//! Fixtures and assertions shared by the dashboard test suites.
//!
//! - [`fixtures`]: polygon rings, a banded rule set, the reference instant
//!   `t0` and small series built from `(hour, value)` pairs
//! - [`generators`]: long synthetic hourly series, optionally with gaps
//! - [`assert_approx_eq!`] and [`assert_latlng_approx_eq!`]
//!
//! Pulled in as a dev-dependency (`test-utils = { path = "../test-utils" }`)
//! and used as `use test_utils::{assert_approx_eq, rings, t0};`.

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of two `LatLng` values.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_latlng_approx_eq;
///
/// assert_latlng_approx_eq!(LatLng::new(1.0001, 2.0001), LatLng::new(1.0, 2.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_latlng_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left;
        let right = $right;
        $crate::assert_approx_eq!(left.lat, right.lat, $epsilon);
        $crate::assert_approx_eq!(left.lng, right.lng, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    use dashboard_common::LatLng;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_latlng_approx_eq_passes() {
        assert_latlng_approx_eq!(LatLng::new(1.0001, 2.0001), LatLng::new(1.0, 2.0), 0.001);
    }
}
