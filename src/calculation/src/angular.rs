//! Angular moments of the particle orientation distribution.
//!
//! Seven coefficients `a1..a7` carry the effect of canting on every
//! polarimetric cross term (Ryzhkov, 2001). They are computed once per
//! orientation model and reused for all observables of a run.

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, RadarResult};

/// Number of angular moment coefficients.
pub const NUM_MOMENTS: usize = 7;

/// Orientation moments `[a1, a2, a3, a4, a5, a6, a7]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularMoments(
    /// Coefficients a1..a7
    pub [f64; NUM_MOMENTS],
);

impl AngularMoments {
    /// Moments for a 2D Gaussian canting distribution.
    ///
    /// # Arguments
    /// * `width_deg` - Standard deviation of the canting angle in degrees
    pub fn gaussian(width_deg: f64) -> Self {
        let width_rad = width_deg.to_radians();
        let r = (-2.0 * width_rad * width_rad).exp();
        let r4 = r.powi(4);

        let plus = 3.0 / 8.0 + 0.5 * r + r4 / 8.0;
        let minus = 3.0 / 8.0 - 0.5 * r + r4 / 8.0;

        Self([
            0.25 * (1.0 + r).powi(2),
            0.25 * (1.0 - r * r),
            plus * plus,
            minus * plus,
            plus * (1.0 - r4) / 8.0,
            0.0,
            0.5 * r * (1.0 + r),
        ])
    }

    /// Perfectly aligned particles (zero canting width).
    pub fn aligned() -> Self {
        Self::gaussian(0.0)
    }

    /// Build moments from a slice of exactly seven values.
    pub fn from_slice(values: &[f64]) -> RadarResult<Self> {
        let moments: [f64; NUM_MOMENTS] =
            values.try_into().map_err(|_| RadarError::InvalidMoments {
                expected: NUM_MOMENTS,
                actual: values.len(),
            })?;
        Ok(Self(moments))
    }

    /// All seven coefficients in order.
    pub fn as_array(&self) -> &[f64; NUM_MOMENTS] {
        &self.0
    }

    /// Coefficient a1.
    pub fn a1(&self) -> f64 {
        self.0[0]
    }

    /// Coefficient a2.
    pub fn a2(&self) -> f64 {
        self.0[1]
    }

    /// Coefficient a3.
    pub fn a3(&self) -> f64 {
        self.0[2]
    }

    /// Coefficient a4.
    pub fn a4(&self) -> f64 {
        self.0[3]
    }

    /// Coefficient a5.
    pub fn a5(&self) -> f64 {
        self.0[4]
    }

    /// Coefficient a6.
    pub fn a6(&self) -> f64 {
        self.0[5]
    }

    /// Coefficient a7.
    pub fn a7(&self) -> f64 {
        self.0[6]
    }
}

impl Default for AngularMoments {
    fn default() -> Self {
        Self::aligned()
    }
}
