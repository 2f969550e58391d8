//! Conversion to logarithmic radar meteorology units.

use ndarray::{Array1, ArrayView1};

/// Linear value to decibels, `10·log10(x)`.
///
/// Zero maps to negative infinity and negative inputs to NaN.
#[inline(always)]
pub fn logify(value: f64) -> f64 {
    10.0 * value.log10()
}

/// Elementwise [`logify`].
pub fn logify_arr(values: ArrayView1<f64>) -> Array1<f64> {
    values.mapv(logify)
}

/// Decibels back to a linear value.
#[inline(always)]
pub fn delogify(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}
