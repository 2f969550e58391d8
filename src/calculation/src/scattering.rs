//! Rayleigh scattering amplitudes of homogeneous and core-shell spheroids.
//!
//! Formulas follow Bohren & Huffman (1983) for particles much smaller than the
//! radar wavelength. Each calculator comes in a single-particle form and an
//! array form over many particles with heterogeneous aspect ratios; the array
//! form gives the same values as looping the single-particle form.
//!
//! The same functions produce forward-scattering amplitudes for Kdp. The
//! Rayleigh approximation makes no distinction between the two, so only the
//! caller decides how an amplitude is used.
//!
//! Singular inputs are not errors here. A dielectric constant of exactly one
//! or a vanishing core-shell denominator yields non-finite amplitudes that the
//! caller is expected to detect.

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

use crate::error::{RadarError, RadarResult};
use crate::shape::ShapeFactors;

/// Horizontal and vertical scattering amplitudes for a set of particles.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteringAmplitudes {
    /// Horizontal co-polar amplitude per particle or bin
    pub shh: Array1<Complex64>,
    /// Vertical co-polar amplitude per particle or bin
    pub svv: Array1<Complex64>,
}

impl ScatteringAmplitudes {
    /// Pair up horizontal and vertical amplitudes of equal length.
    pub fn new(shh: Array1<Complex64>, svv: Array1<Complex64>) -> RadarResult<Self> {
        if shh.len() != svv.len() {
            return Err(RadarError::length("svv", shh.len(), svv.len()));
        }
        Ok(Self { shh, svv })
    }

    /// Number of particles or bins.
    pub fn len(&self) -> usize {
        self.shh.len()
    }

    /// True when no amplitudes are stored.
    pub fn is_empty(&self) -> bool {
        self.shh.is_empty()
    }

    /// True when every amplitude is finite.
    pub fn is_finite(&self) -> bool {
        self.shh.iter().chain(self.svv.iter()).all(|s| s.is_finite())
    }
}

/// Spheroid dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spheroid {
    /// Extent along the symmetry axis
    pub thickness: f64,
    /// Extent in the horizontal plane
    pub max_dim: f64,
}

impl Spheroid {
    /// Creates a spheroid from its two dimensions.
    pub const fn new(thickness: f64, max_dim: f64) -> Self {
        Self { thickness, max_dim }
    }

    /// Aspect ratio `c/a` of the semi-axes.
    #[inline(always)]
    pub fn aspect_ratio(&self) -> f64 {
        (self.thickness / 2.0) / (self.max_dim / 2.0)
    }

    /// Radius of the sphere with the same volume, `(c·a²)^(1/3)`.
    #[inline(always)]
    pub fn equivalent_radius(&self) -> f64 {
        let c = self.thickness / 2.0;
        let a = self.max_dim / 2.0;
        (c * a * a).cbrt()
    }

    /// Volume prefactor `π²(2r)³ / (6λ²)` shared by both polarizations.
    #[inline(always)]
    pub fn common_factor(&self, wavelength: f64) -> f64 {
        let d = 2.0 * self.equivalent_radius();
        PI * PI * d * d * d / (6.0 * wavelength * wavelength)
    }
}

/// How the core volume fraction of a two-layer spheroid is derived from the
/// fractional core depth.
///
/// Two definitions exist for the same quantity and neither has been settled
/// as canonical, so callers must name the one they use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreVolumeFraction {
    /// `volf = frac³`, the core scaled uniformly inside the particle
    CubedDepth,
    /// `volf = (1 - frac)·(1 - frac·c/a)²`, a shell of relative depth `frac`
    ShellDepth,
}

impl CoreVolumeFraction {
    /// Core volume fraction for a core depth fraction and aspect ratio.
    #[inline(always)]
    pub fn volume_fraction(self, core_depth_frac: f64, aspect_ratio: f64) -> f64 {
        match self {
            CoreVolumeFraction::CubedDepth => core_depth_frac.powi(3),
            CoreVolumeFraction::ShellDepth => {
                let shell = 1.0 - core_depth_frac * aspect_ratio;
                (1.0 - core_depth_frac) * shell * shell
            }
        }
    }
}

/// A dielectric of exactly 1 has no finite amplitude; it is reported as an
/// infinite real value instead of the NaN that complex division by zero gives.
#[inline(always)]
fn homogeneous_amplitude(common: f64, l: f64, diel: Complex64) -> Complex64 {
    let contrast = diel - 1.0;
    if contrast.re == 0.0 && contrast.im == 0.0 {
        return Complex64::new(f64::INFINITY, 0.0);
    }
    common / (l + 1.0 / contrast)
}

#[inline(always)]
fn two_layer_amplitude(
    common: f64,
    l: f64,
    core: Complex64,
    shell: Complex64,
    volf: f64,
) -> Complex64 {
    let contrast = core - shell;
    let inner = shell + contrast * l * (1.0 - volf);
    let numer = (shell - 1.0) * inner + volf * shell * contrast;
    let denom = inner * (1.0 + (shell - 1.0) * l) + volf * l * shell * contrast;
    common * numer / denom
}

/// Scattering amplitudes `(shh, svv)` of one homogeneous spheroid.
///
/// # Arguments
/// * `diel` - Complex dielectric constant of the particle
/// * `thickness` - Extent along the symmetry axis
/// * `max_dim` - Extent in the horizontal plane
/// * `wavelength` - Radar wavelength, in the same unit as the dimensions
pub fn scatter_spheroid(
    diel: Complex64,
    thickness: f64,
    max_dim: f64,
    wavelength: f64,
) -> RadarResult<(Complex64, Complex64)> {
    let particle = Spheroid::new(thickness, max_dim);
    let factors = ShapeFactors::solve(particle.aspect_ratio())?;
    let common = particle.common_factor(wavelength);

    Ok((
        homogeneous_amplitude(common, factors.lh, diel),
        homogeneous_amplitude(common, factors.lv, diel),
    ))
}

/// Scattering amplitudes `(shh, svv)` of one core-shell spheroid.
///
/// # Arguments
/// * `diel_core` - Dielectric constant of the inner layer
/// * `diel_shell` - Dielectric constant of the outer layer
/// * `core_depth_frac` - Fractional core depth in `[0, 1]`
/// * `model` - Definition used to turn `core_depth_frac` into a volume fraction
pub fn scatter_two_layer_spheroid(
    diel_core: Complex64,
    diel_shell: Complex64,
    thickness: f64,
    max_dim: f64,
    wavelength: f64,
    core_depth_frac: f64,
    model: CoreVolumeFraction,
) -> RadarResult<(Complex64, Complex64)> {
    let particle = Spheroid::new(thickness, max_dim);
    let alp = particle.aspect_ratio();
    let factors = ShapeFactors::solve(alp)?;
    let common = particle.common_factor(wavelength);
    let volf = model.volume_fraction(core_depth_frac, alp);

    Ok((
        two_layer_amplitude(common, factors.lh, diel_core, diel_shell, volf),
        two_layer_amplitude(common, factors.lv, diel_core, diel_shell, volf),
    ))
}

/// Geometry of an array of particles, validated and classified.
struct ParticleArray {
    common: Array1<f64>,
    aspect_ratio: Array1<f64>,
    lh: Array1<f64>,
    lv: Array1<f64>,
}

impl ParticleArray {
    fn new(thickness: ArrayView1<f64>, max_dim: ArrayView1<f64>, wavelength: f64) -> RadarResult<Self> {
        if thickness.len() != max_dim.len() {
            return Err(RadarError::length("max_dim", thickness.len(), max_dim.len()));
        }

        let particles: Vec<Spheroid> = thickness
            .iter()
            .zip(max_dim.iter())
            .map(|(&t, &d)| Spheroid::new(t, d))
            .collect();

        let aspect_ratio: Array1<f64> = particles.iter().map(Spheroid::aspect_ratio).collect();
        let common: Array1<f64> = particles.iter().map(|p| p.common_factor(wavelength)).collect();
        let (lh, lv) = ShapeFactors::solve_arr(aspect_ratio.view())?;

        tracing::trace!(particles = particles.len(), wavelength, "classified spheroid array");

        Ok(Self {
            common,
            aspect_ratio,
            lh,
            lv,
        })
    }

    fn len(&self) -> usize {
        self.common.len()
    }
}

/// Stretch a dielectric array to `n` elements. A single value applies to all
/// particles; otherwise there must be one value per particle.
fn broadcast_dielectric<'b>(
    what: &'static str,
    diel: &'b ArrayView1<'_, Complex64>,
    n: usize,
) -> RadarResult<ArrayView1<'b, Complex64>> {
    diel.broadcast(n)
        .ok_or_else(|| RadarError::length(what, n, diel.len()))
}

/// Scattering amplitudes of many homogeneous spheroids.
///
/// `diel` holds either one dielectric constant shared by all particles or one
/// per particle.
pub fn scatter_spheroid_arr(
    diel: ArrayView1<Complex64>,
    thickness: ArrayView1<f64>,
    max_dim: ArrayView1<f64>,
    wavelength: f64,
) -> RadarResult<ScatteringAmplitudes> {
    let particles = ParticleArray::new(thickness, max_dim, wavelength)?;
    let n = particles.len();
    let diel = broadcast_dielectric("diel", &diel, n)?;

    let mut shh = Array1::<Complex64>::zeros(n);
    let mut svv = Array1::<Complex64>::zeros(n);

    for i in 0..n {
        shh[i] = homogeneous_amplitude(particles.common[i], particles.lh[i], diel[i]);
        svv[i] = homogeneous_amplitude(particles.common[i], particles.lv[i], diel[i]);
    }

    Ok(ScatteringAmplitudes { shh, svv })
}

/// Scattering amplitudes of many core-shell spheroids.
///
/// Core and shell dielectrics each broadcast like in [`scatter_spheroid_arr`].
pub fn scatter_two_layer_spheroid_arr(
    diel_core: ArrayView1<Complex64>,
    diel_shell: ArrayView1<Complex64>,
    thickness: ArrayView1<f64>,
    max_dim: ArrayView1<f64>,
    wavelength: f64,
    core_depth_frac: f64,
    model: CoreVolumeFraction,
) -> RadarResult<ScatteringAmplitudes> {
    let particles = ParticleArray::new(thickness, max_dim, wavelength)?;
    let n = particles.len();
    let core = broadcast_dielectric("diel_core", &diel_core, n)?;
    let shell = broadcast_dielectric("diel_shell", &diel_shell, n)?;

    let mut shh = Array1::<Complex64>::zeros(n);
    let mut svv = Array1::<Complex64>::zeros(n);

    for i in 0..n {
        let volf = model.volume_fraction(core_depth_frac, particles.aspect_ratio[i]);
        let common = particles.common[i];
        shh[i] = two_layer_amplitude(common, particles.lh[i], core[i], shell[i], volf);
        svv[i] = two_layer_amplitude(common, particles.lv[i], core[i], shell[i], volf);
    }

    Ok(ScatteringAmplitudes { shh, svv })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    const WAVL_X: f64 = 32.1;

    fn assert_complex_eq(a: Complex64, b: Complex64) {
        assert_relative_eq!(a.re, b.re, max_relative = 1e-12);
        assert_relative_eq!(a.im, b.im, max_relative = 1e-12);
    }

    #[test]
    fn test_spheroid_geometry() {
        let p = Spheroid::new(1.0, 4.0);
        assert_eq!(p.aspect_ratio(), 0.25);
        // c = 0.5, a = 2 -> r = (0.5 * 4)^(1/3) = 2^(1/3)
        assert_relative_eq!(p.equivalent_radius(), 2.0_f64.cbrt(), epsilon = 1e-14);
        let d = 2.0 * 2.0_f64.cbrt();
        assert_relative_eq!(
            p.common_factor(WAVL_X),
            PI * PI * d.powi(3) / (6.0 * WAVL_X * WAVL_X),
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_sphere_symmetry() {
        let diel = Complex64::new(3.0, 0.0);
        let (shh, svv) = scatter_spheroid(diel, 2.0, 2.0, WAVL_X).unwrap();
        assert_complex_eq(shh, svv);

        // Clausius-Mossotti: K = (ε-1)/(ε+2) -> s = common * 3K
        let common = Spheroid::new(2.0, 2.0).common_factor(WAVL_X);
        assert_relative_eq!(shh.re, common * 3.0 * 2.0 / 5.0, max_relative = 1e-12);
        assert_relative_eq!(shh.im, 0.0, epsilon = 1e-18);
    }

    #[test]
    fn test_oblate_horizontal_dominates() {
        let diel = Complex64::new(3.16835, 0.0089);
        let (shh, svv) = scatter_spheroid(diel, 0.2, 2.0, WAVL_X).unwrap();
        assert!(shh.norm() > svv.norm());

        let (shh, svv) = scatter_spheroid(diel, 4.0, 1.0, WAVL_X).unwrap();
        assert!(shh.norm() < svv.norm());
    }

    #[test]
    fn test_unit_dielectric_is_not_an_error() {
        let result = scatter_spheroid(Complex64::new(1.0, 0.0), 1.0, 2.0, WAVL_X);
        let (shh, svv) = result.unwrap();
        assert!(shh.norm().is_infinite());
        assert!(svv.norm().is_infinite());

        let diel = array![Complex64::new(1.0, 0.0), Complex64::new(3.0, 0.0)];
        let edges = array![1.0, 2.0];
        let amps = scatter_spheroid_arr(diel.view(), edges.view(), (&edges * 2.0).view(), WAVL_X).unwrap();
        assert!(amps.shh[0].norm().is_infinite());
        assert!(amps.shh[1].is_finite());
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let diel = Complex64::new(3.0, 0.0);
        assert!(scatter_spheroid(diel, 0.0, 2.0, WAVL_X).is_err());
        assert!(scatter_spheroid(diel, f64::NAN, 2.0, WAVL_X).is_err());
        assert!(scatter_spheroid(diel, 1.0, 0.0, WAVL_X).is_err());
    }

    #[test]
    fn test_two_layer_uniform_matches_homogeneous() {
        let eps = Complex64::new(2.5, 0.01);
        let (hh, vv) = scatter_spheroid(eps, 0.5, 3.0, WAVL_X).unwrap();
        for model in [CoreVolumeFraction::CubedDepth, CoreVolumeFraction::ShellDepth] {
            let (shh, svv) =
                scatter_two_layer_spheroid(eps, eps, 0.5, 3.0, WAVL_X, 0.4, model).unwrap();
            assert_complex_eq(shh, hh);
            assert_complex_eq(svv, vv);
        }
    }

    #[test]
    fn test_two_layer_limits() {
        let core = Complex64::new(3.16835, 0.0089);
        let shell = Complex64::new(44.593, 41.449);

        // Full core depth: the particle is all core
        let (hh_core, vv_core) = scatter_spheroid(core, 0.5, 2.0, WAVL_X).unwrap();
        let (shh, svv) = scatter_two_layer_spheroid(
            core, shell, 0.5, 2.0, WAVL_X, 1.0, CoreVolumeFraction::CubedDepth,
        )
        .unwrap();
        assert_complex_eq(shh, hh_core);
        assert_complex_eq(svv, vv_core);

        // Zero core depth: the particle is all shell
        let (hh_shell, vv_shell) = scatter_spheroid(shell, 0.5, 2.0, WAVL_X).unwrap();
        let (shh, svv) = scatter_two_layer_spheroid(
            core, shell, 0.5, 2.0, WAVL_X, 0.0, CoreVolumeFraction::CubedDepth,
        )
        .unwrap();
        assert_complex_eq(shh, hh_shell);
        assert_complex_eq(svv, vv_shell);
    }

    #[test]
    fn test_volume_fraction_models() {
        assert_eq!(CoreVolumeFraction::CubedDepth.volume_fraction(0.5, 0.25), 0.125);
        // (1 - 0.5) * (1 - 0.5 * 0.25)^2 = 0.5 * 0.765625
        assert_relative_eq!(
            CoreVolumeFraction::ShellDepth.volume_fraction(0.5, 0.25),
            0.3828125,
            epsilon = 1e-15
        );
        assert_eq!(CoreVolumeFraction::ShellDepth.volume_fraction(0.0, 0.3), 1.0);
    }

    #[test]
    fn test_array_matches_scalar_loop() {
        let diel = array![Complex64::new(1.8, 0.003)];
        let thickness = array![0.2, 1.0, 3.0, 0.5];
        let max_dim = array![1.0, 1.0, 1.5, 4.0];

        let amps =
            scatter_spheroid_arr(diel.view(), thickness.view(), max_dim.view(), WAVL_X).unwrap();
        assert_eq!(amps.len(), 4);

        for i in 0..thickness.len() {
            let (shh, svv) = scatter_spheroid(diel[0], thickness[i], max_dim[i], WAVL_X).unwrap();
            assert_complex_eq(amps.shh[i], shh);
            assert_complex_eq(amps.svv[i], svv);
        }
    }

    #[test]
    fn test_two_layer_array_matches_scalar_loop() {
        let core = array![Complex64::new(3.16835, 0.0089), Complex64::new(3.0, 0.01)];
        let shell = array![Complex64::new(1.5, 0.002)];
        let thickness = array![0.3, 2.0];
        let max_dim = array![1.2, 2.0];
        let model = CoreVolumeFraction::ShellDepth;

        let amps = scatter_two_layer_spheroid_arr(
            core.view(),
            shell.view(),
            thickness.view(),
            max_dim.view(),
            WAVL_X,
            0.3,
            model,
        )
        .unwrap();

        for i in 0..2 {
            let (shh, svv) = scatter_two_layer_spheroid(
                core[i], shell[0], thickness[i], max_dim[i], WAVL_X, 0.3, model,
            )
            .unwrap();
            assert_complex_eq(amps.shh[i], shh);
            assert_complex_eq(amps.svv[i], svv);
        }
    }

    #[test]
    fn test_array_length_checks() {
        let diel = array![Complex64::new(3.0, 0.0), Complex64::new(3.0, 0.0)];
        let thickness = array![0.2, 0.4, 0.6];
        let max_dim = array![1.0, 1.0, 1.0];
        let err = scatter_spheroid_arr(diel.view(), thickness.view(), max_dim.view(), WAVL_X)
            .unwrap_err();
        assert!(err.is_shape_error());

        let short = array![1.0, 1.0];
        let one = array![Complex64::new(3.0, 0.0)];
        assert!(scatter_spheroid_arr(one.view(), thickness.view(), short.view(), WAVL_X).is_err());
    }

    #[test]
    fn test_amplitudes_new_checks_length() {
        let a = array![Complex64::new(1.0, 0.0)];
        let b = array![Complex64::new(1.0, 0.0), Complex64::new(2.0, 0.0)];
        assert!(ScatteringAmplitudes::new(a.clone(), b).is_err());
        let amps = ScatteringAmplitudes::new(a.clone(), a).unwrap();
        assert!(amps.is_finite());
        assert!(!amps.is_empty());
    }
}
