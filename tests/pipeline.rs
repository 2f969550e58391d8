//! End-to-end runs from size distribution to radar observables.

use approx::assert_relative_eq;
use ndarray::{Array1, array};
use num_complex::Complex64;

use radar_simulate::constants::{Constants, reflectivity_factor};
use radar_simulate::dielectric::snow_dielectric;
use radar_simulate::distribution::{self, ContinuousDistribution, DiscreteDistribution, SizeIntegration};
use radar_simulate::observables::{ObservableCalculator, calculate_everything, calculate_everything_log};
use radar_simulate::scattering::{
    CoreVolumeFraction, scatter_spheroid, scatter_spheroid_arr, scatter_two_layer_spheroid_arr,
};
use radar_simulate::{AngularMoments, logify};

#[test]
fn test_sphere_has_unit_zdr() {
    let constants = Constants::x_band();
    let edges = Array1::linspace(0.1, 5.0, 50);
    let dist = distribution::exponential(1e3, 1.0, edges.view()).unwrap();
    let diel = array![Complex64::new(3.0, 0.0)];

    let amps = scatter_spheroid_arr(diel.view(), edges.view(), edges.view(), 32.1).unwrap();
    for (shh, svv) in amps.shh.iter().zip(amps.svv.iter()) {
        assert_relative_eq!(shh.re, svv.re, max_relative = 1e-12);
    }

    let moments = AngularMoments::gaussian(10.0);
    let obs = calculate_everything(&amps, &amps, &constants, &dist, &moments).unwrap();
    assert_relative_eq!(obs.zdr, 1.0, epsilon = 1e-10);
    assert_relative_eq!(obs.rhohv, 1.0, epsilon = 1e-10);
    assert!(obs.kdp.abs() < 1e-10 * obs.zh);

    let log = obs.to_log();
    assert_relative_eq!(log.zdr, 0.0, epsilon = 1e-9);
}

#[test]
fn test_single_sphere_reflectivity() {
    // One particle per unit volume: Z = C·|s|²
    let (shh, _) = scatter_spheroid(Complex64::new(3.0, 0.0), 2.0, 2.0, 32.1).unwrap();
    let dist = DiscreteDistribution::new(array![1.0]);
    let moments = AngularMoments::aligned();
    let calc = ObservableCalculator::new(32.1, 0.93, &dist, &moments);

    let amps = radar_simulate::ScatteringAmplitudes::new(array![shh], array![shh]).unwrap();
    assert_relative_eq!(
        calc.zh(&amps).unwrap(),
        reflectivity_factor(32.1, 0.93) * shh.norm_sqr(),
        max_relative = 1e-14
    );
}

#[test]
fn test_snow_pipeline_continuous_vs_discrete() {
    let constants = Constants::x_band();
    let edges = Array1::linspace(0.2, 12.0, 400);
    let thickness = &edges * 0.25;
    let diel = array![snow_dielectric(120.0, &constants)];
    let amps = scatter_spheroid_arr(diel.view(), thickness.view(), edges.view(), constants.wavelength).unwrap();
    let moments = AngularMoments::gaussian(15.0);

    let continuous = distribution::gamma(2.0, 5e3, 0.6, edges.view()).unwrap();

    // The same population as per-bin weights sampled at the edges, weighted by
    // the local bin width, approximates the continuous integral
    let widths = continuous.dmax_dim();
    let n = continuous.n();
    let weights: Array1<f64> = (0..n.len())
        .map(|i| {
            let left = if i > 0 { widths[i - 1] } else { 0.0 };
            let right = if i < widths.len() { widths[i] } else { 0.0 };
            n[i] * 0.5 * (left + right)
        })
        .collect();
    let discrete = DiscreteDistribution::new(weights);

    let c = calculate_everything(&amps, &amps, &constants, &continuous, &moments).unwrap();
    let d = calculate_everything(&amps, &amps, &constants, &discrete, &moments).unwrap();

    assert_relative_eq!(c.zh, d.zh, max_relative = 1e-3);
    assert_relative_eq!(c.zdr, d.zdr, max_relative = 1e-3);
    assert_relative_eq!(c.kdp, d.kdp, max_relative = 1e-3);
    assert_relative_eq!(c.rhohv, d.rhohv, max_relative = 1e-6);

    assert!(c.zdr > 1.0);
    assert!(c.kdp > 0.0);
    assert!(c.ldr > 0.0);
}

#[test]
fn test_log_pipeline_units() {
    let constants = Constants::s_band();
    let edges = Array1::linspace(0.5, 8.0, 100);
    let thickness = &edges * 0.4;
    let diel = array![snow_dielectric(200.0, &constants)];
    let amps = scatter_spheroid_arr(diel.view(), thickness.view(), edges.view(), constants.wavelength).unwrap();
    let dist = distribution::exponential(8e3, 0.9, edges.view()).unwrap();
    let moments = AngularMoments::gaussian(25.0);

    let lin = calculate_everything(&amps, &amps, &constants, &dist, &moments).unwrap();
    let log = calculate_everything_log(&amps, &amps, &constants, &dist, &moments).unwrap();

    assert_eq!(log.zh, logify(lin.zh));
    assert_eq!(log.ldr, logify(lin.ldr));
    assert_eq!(log.kdp, lin.kdp);
    assert_eq!(log.rhohv, lin.rhohv);
    assert!(log.ldr < 0.0);
}

#[test]
fn test_melting_layer_two_layer_particles() {
    let constants = Constants::x_band();
    let edges = Array1::linspace(0.5, 6.0, 60);
    let thickness = &edges * 0.5;
    let core = array![snow_dielectric(300.0, &constants)];
    let shell = array![constants.eps_liquid];
    let dist = distribution::exponential(2e3, 1.2, edges.view()).unwrap();
    let moments = AngularMoments::gaussian(10.0);

    let wet = scatter_two_layer_spheroid_arr(
        core.view(),
        shell.view(),
        thickness.view(),
        edges.view(),
        constants.wavelength,
        0.9,
        CoreVolumeFraction::CubedDepth,
    )
    .unwrap();
    let dry = scatter_spheroid_arr(core.view(), thickness.view(), edges.view(), constants.wavelength).unwrap();

    let z_wet = calculate_everything(&wet, &wet, &constants, &dist, &moments).unwrap();
    let z_dry = calculate_everything(&dry, &dry, &constants, &dist, &moments).unwrap();

    // A liquid coating brightens the particles
    assert!(z_wet.zh > z_dry.zh);
    assert!(z_wet.is_finite());
}

#[test]
fn test_boundary_validation() {
    let edges = array![0.1, 0.2, 0.3];
    let dist = ContinuousDistribution::new(array![1.0, 2.0, 3.0], array![0.1, 0.1]).unwrap();
    assert_eq!(dist.len(), edges.len());

    let diel = array![Complex64::new(2.0, 0.0)];
    let amps = scatter_spheroid_arr(diel.view(), edges.view(), edges.view(), 32.1).unwrap();
    let moments = AngularMoments::aligned();

    // Per-bin weights with one fewer element than the amplitudes
    let wrong = DiscreteDistribution::new(array![1.0, 2.0]);
    let err = calculate_everything(&amps, &amps, &Constants::x_band(), &wrong, &moments).unwrap_err();
    assert!(err.is_shape_error());

    assert!(distribution::exponential(1.0, 1.0, array![0.3, 0.2].view()).is_err());
}
