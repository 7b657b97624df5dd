//! Common Utilities
//!
//! Provides numeric helpers used across the deployment generator

use num_traits::ToPrimitive;
use tracing::trace;

/// Ratio between row spacing and inter-site distance on a triangular lattice
pub fn hex_row_factor() -> f64 {
    0.75_f64.sqrt()
}

/// Vertical distance between two adjacent rows of a hexagonal site grid
pub fn hex_row_spacing(inter_site_distance: f64) -> f64 {
    inter_site_distance * hex_row_factor()
}

/// Round a non-negative real quantity to an entity count
///
/// Rounds half away from zero. Negative and NaN inputs saturate to zero;
/// `None` when the rounded value does not fit in a `u32`.
pub fn round_count(value: f64) -> Option<u32> {
    if value.is_nan() || value <= 0.0 {
        return Some(0);
    }
    let count = value.round().to_u32();
    trace!("Rounded {} to count {:?}", value, count);
    count
}
