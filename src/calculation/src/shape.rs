//! Depolarization (shape) factors for spheroidal particles.
//!
//! The aspect ratio `alp = c/a` of a spheroid with semi-axis `c` along the
//! symmetry axis and `a` in the horizontal plane decides which closed form
//! applies (Bohren & Huffman, 1983). Each particle is classified once into a
//! [`SpheroidShape`] and the factor formula dispatches on that tag.
//!
//! Close to the sphere the closed forms cancel catastrophically, so both
//! branches switch to their common power series in `x = 1 - 1/alp²` there.

use ndarray::{Array1, ArrayView1};

use crate::error::{RadarError, RadarResult};

/// Sphere value of `lv`.
const ONE_THIRD: f64 = 1.0 / 3.0;

/// `|x|` below which the near-sphere series replaces the closed forms.
const SERIES_RADIUS: f64 = 0.1;

/// Series terms; the remainder at `|x| = 0.1` is below 1e-20.
const SERIES_TERMS: i32 = 20;

/// Geometric class of a spheroid, decided from its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpheroidShape {
    /// Flattened spheroid, `alp < 1`
    Oblate,
    /// Elongated spheroid, `alp > 1`
    Prolate,
    /// `alp == 1` exactly
    Sphere,
}

impl SpheroidShape {
    /// Classify an aspect ratio.
    ///
    /// The sphere class is selected by exact floating-point equality, so an
    /// aspect ratio of `1.0 + 1e-15` goes through the prolate branch, whose
    /// near-sphere series meets 1/3 there. NaN, infinite, and non-positive
    /// ratios fit no class and are rejected.
    pub fn classify(aspect_ratio: f64) -> RadarResult<Self> {
        Self::classify_at(0, aspect_ratio)
    }

    fn classify_at(index: usize, aspect_ratio: f64) -> RadarResult<Self> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(RadarError::InvalidAspectRatio {
                index,
                value: aspect_ratio,
            });
        }
        Ok(if aspect_ratio < 1.0 {
            SpheroidShape::Oblate
        } else if aspect_ratio > 1.0 {
            SpheroidShape::Prolate
        } else {
            SpheroidShape::Sphere
        })
    }

    /// Shape factors for this class at `aspect_ratio`.
    #[inline(always)]
    fn factors(self, aspect_ratio: f64) -> ShapeFactors {
        match self {
            SpheroidShape::Oblate => oblate_factors(aspect_ratio),
            SpheroidShape::Prolate => prolate_factors(aspect_ratio),
            SpheroidShape::Sphere => ShapeFactors::from_vertical(ONE_THIRD),
        }
    }
}

/// `lv = 1/3 - 2·Σ x^k / ((2k+1)(2k+3))`, shared by both shapes near the sphere.
fn near_sphere_vertical(x: f64) -> f64 {
    let mut power = 1.0;
    let mut sum = 0.0;
    for k in 1..=SERIES_TERMS {
        power *= x;
        let k = f64::from(k);
        sum += power / ((2.0 * k + 1.0) * (2.0 * k + 3.0));
    }
    ONE_THIRD - 2.0 * sum
}

/// Oblate branch with `f = sqrt(1/alp² - 1)` and `g = 1/f`.
///
/// `lh` is evaluated from its own closed form, `g·((1+g²)·atan f - g)/2`, so
/// thin plates keep a positive `lh` even after `lv` has rounded to 1 (below
/// `alp ≈ 1e-16`).
fn oblate_factors(alp: f64) -> ShapeFactors {
    let s = ((1.0 - alp) * (1.0 + alp)).sqrt();
    let f = s / alp;
    if f * f < SERIES_RADIUS {
        return ShapeFactors::from_vertical(near_sphere_vertical(-f * f));
    }
    let g = alp / s;
    let atan = f.atan();
    let scale = 1.0 + g * g;
    ShapeFactors {
        lh: g * (scale * atan - g) / 2.0,
        lv: scale * (1.0 - g * atan),
    }
}

/// Prolate branch with `f = sqrt(1 - 1/alp²)`.
///
/// Uses `(1-f²)/f² = 1/(alp²-1)` and `atanh f = ln(1+f) + ln(alp)`, which stay
/// finite for needles of any length.
fn prolate_factors(alp: f64) -> ShapeFactors {
    let inv = 1.0 / alp;
    let f2 = (1.0 - inv) * (1.0 + inv);
    if f2 < SERIES_RADIUS {
        return ShapeFactors::from_vertical(near_sphere_vertical(f2));
    }
    let f = f2.sqrt();
    let atanh = f.ln_1p() + alp.ln();
    ShapeFactors::from_vertical(inv * inv / f2 * (atanh / f - 1.0))
}

/// Horizontal and vertical depolarization factors of one spheroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFactors {
    /// Horizontal factor, `(1 - lv) / 2`
    pub lh: f64,
    /// Vertical (symmetry axis) factor
    pub lv: f64,
}

impl ShapeFactors {
    #[inline(always)]
    fn from_vertical(lv: f64) -> Self {
        Self {
            lh: (1.0 - lv) / 2.0,
            lv,
        }
    }

    /// Solve the shape factors for a single aspect ratio.
    pub fn solve(aspect_ratio: f64) -> RadarResult<Self> {
        let shape = SpheroidShape::classify(aspect_ratio)?;
        Ok(Self::from_shape(shape, aspect_ratio))
    }

    /// Shape factors for an already classified particle.
    #[inline(always)]
    pub fn from_shape(shape: SpheroidShape, aspect_ratio: f64) -> Self {
        shape.factors(aspect_ratio)
    }

    /// Solve the shape factors elementwise.
    ///
    /// # Returns
    /// `(lh, lv)` arrays with the same length as `aspect_ratio`. The first
    /// element that cannot be classified aborts with its index.
    pub fn solve_arr(aspect_ratio: ArrayView1<f64>) -> RadarResult<(Array1<f64>, Array1<f64>)> {
        let n = aspect_ratio.len();
        let mut lh = Array1::<f64>::zeros(n);
        let mut lv = Array1::<f64>::zeros(n);

        for (i, &alp) in aspect_ratio.iter().enumerate() {
            let shape = SpheroidShape::classify_at(i, alp)?;
            let factors = Self::from_shape(shape, alp);
            lh[i] = factors.lh;
            lv[i] = factors.lv;
        }

        Ok((lh, lv))
    }
}
