//! Python bindings for the radar simulation library.
//!
//! NOTE: This module requires the `python-bindings` feature to be enabled.
//! Compile with: `cargo build --features python-bindings --release`
//!
//! Usage in Python:
//! ```python
//! import numpy as np
//! import radar_simulate as rs
//! shh, svv = rs.scat_spheroid_arr(np.array([1.8+0.003j]), thickness, max_dim, 32.1)
//! zh, zv, zdr, kdp, rhohv, ldr = rs.calculate_everything(
//!     shh, svv, 32.1, n, rs.angular_gaussian(10.0), dmax_dim=dmax_dim, log=True)
//! obs = rs.calculate_everything(
//!     shh, svv, 100.0, n, moments, shh_fwd=fh, svv_fwd=fv, kw2=0.93, as_dict=True)
//! ```

use std::collections::HashMap;

use ndarray::Array1;
use num_complex::Complex64;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::angular::AngularMoments;
use crate::constants::{Constants, KW2};
use crate::distribution::{ContinuousDistribution, DiscreteDistribution, SizeIntegration};
use crate::error::RadarError;
use crate::observables::{ObservableCalculator, RadarObservables};
use crate::scattering::{ScatteringAmplitudes, scatter_spheroid, scatter_spheroid_arr};
use crate::units;

impl From<RadarError> for PyErr {
    fn from(err: RadarError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Observables as returned to Python: zh, zv, zdr, kdp, rhohv, ldr.
type ObservableTuple = (f64, f64, f64, f64, f64, f64);

fn to_tuple(obs: RadarObservables) -> ObservableTuple {
    (obs.zh, obs.zv, obs.zdr, obs.kdp, obs.rhohv, obs.ldr)
}

fn amplitudes(
    shh: &PyReadonlyArray1<'_, Complex64>,
    svv: &PyReadonlyArray1<'_, Complex64>,
) -> PyResult<ScatteringAmplitudes> {
    Ok(ScatteringAmplitudes::new(shh.as_array().to_owned(), svv.as_array().to_owned())?)
}

fn observables_with<D: SizeIntegration>(
    back: &ScatteringAmplitudes,
    forward: &ScatteringAmplitudes,
    wavelength: f64,
    kw2: f64,
    distribution: &D,
    moments: &AngularMoments,
    log: bool,
) -> PyResult<RadarObservables> {
    let calc = ObservableCalculator::new(wavelength, kw2, distribution, moments);
    let obs = if log {
        calc.everything_log(back, forward)?
    } else {
        calc.everything(back, forward)?
    };
    Ok(obs)
}

/// Scattering amplitudes of a single homogeneous spheroid.
#[pyfunction]
#[pyo3(name = "scat_spheroid")]
pub fn py_scat_spheroid(
    diel: Complex64,
    thickness: f64,
    max_dim: f64,
    wavelength: f64,
) -> PyResult<(Complex64, Complex64)> {
    Ok(scatter_spheroid(diel, thickness, max_dim, wavelength)?)
}

/// Scattering amplitudes of an array of homogeneous spheroids.
#[pyfunction]
#[pyo3(name = "scat_spheroid_arr")]
pub fn py_scat_spheroid_arr<'py>(
    py: Python<'py>,
    diel: PyReadonlyArray1<'py, Complex64>,
    thickness: PyReadonlyArray1<'py, f64>,
    max_dim: PyReadonlyArray1<'py, f64>,
    wavelength: f64,
) -> PyResult<(&'py PyArray1<Complex64>, &'py PyArray1<Complex64>)> {
    let amps = scatter_spheroid_arr(diel.as_array(), thickness.as_array(), max_dim.as_array(), wavelength)?;
    Ok((amps.shh.into_pyarray(py), amps.svv.into_pyarray(py)))
}

/// Angular moments of a Gaussian canting distribution.
#[pyfunction]
#[pyo3(name = "angular_gaussian")]
pub fn py_angular_gaussian(width_deg: f64) -> Vec<f64> {
    AngularMoments::gaussian(width_deg).as_array().to_vec()
}

/// Linear value to decibels.
#[pyfunction]
#[pyo3(name = "logify")]
pub fn py_logify(value: f64) -> f64 {
    units::logify(value)
}

/// All six observables. Passing `dmax_dim` selects the continuous rule with
/// edge-sampled `n`; without it `n` is one weight per bin.
///
/// `shh_fwd`/`svv_fwd` are the forward amplitudes used for Kdp and default to
/// the backscatter pair. `kw2` defaults to the water reference value.
/// With `as_dict` the result is a name to value mapping instead of a tuple.
#[pyfunction]
#[pyo3(
    name = "calculate_everything",
    signature = (shh, svv, wavelength, n, ang_moments, dmax_dim=None, log=false,
                 shh_fwd=None, svv_fwd=None, kw2=None, as_dict=false)
)]
pub fn py_calculate_everything(
    py: Python<'_>,
    shh: PyReadonlyArray1<'_, Complex64>,
    svv: PyReadonlyArray1<'_, Complex64>,
    wavelength: f64,
    n: PyReadonlyArray1<'_, f64>,
    ang_moments: Vec<f64>,
    dmax_dim: Option<PyReadonlyArray1<'_, f64>>,
    log: bool,
    shh_fwd: Option<PyReadonlyArray1<'_, Complex64>>,
    svv_fwd: Option<PyReadonlyArray1<'_, Complex64>>,
    kw2: Option<f64>,
    as_dict: bool,
) -> PyResult<PyObject> {
    let back = amplitudes(&shh, &svv)?;
    let forward = match (&shh_fwd, &svv_fwd) {
        (Some(fh), Some(fv)) => Some(amplitudes(fh, fv)?),
        (None, None) => None,
        _ => {
            return Err(PyValueError::new_err(
                "shh_fwd and svv_fwd must be given together",
            ));
        }
    };
    let forward = forward.as_ref().unwrap_or(&back);
    let moments = AngularMoments::from_slice(&ang_moments)?;
    let kw2 = kw2.unwrap_or(KW2);
    let n: Array1<f64> = n.as_array().to_owned();

    let obs = match dmax_dim {
        Some(widths) => {
            let dist = ContinuousDistribution::new(n, widths.as_array().to_owned())?;
            observables_with(&back, forward, wavelength, kw2, &dist, &moments, log)?
        }
        None => {
            let dist = DiscreteDistribution::new(n);
            observables_with(&back, forward, wavelength, kw2, &dist, &moments, log)?
        }
    };

    Ok(if as_dict {
        obs.get_summary().into_py(py)
    } else {
        to_tuple(obs).into_py(py)
    })
}

/// Reference constants of a radar band (`"x"` or `"s"`) for display.
#[pyfunction]
#[pyo3(name = "band_summary")]
pub fn py_band_summary(band: &str) -> PyResult<HashMap<String, String>> {
    let constants = match band.to_ascii_lowercase().as_str() {
        "x" => Constants::x_band(),
        "s" => Constants::s_band(),
        other => return Err(PyValueError::new_err(format!("unknown band: {other}"))),
    };
    Ok(constants.summary())
}

/// Get version information.
#[pyfunction]
#[pyo3(name = "version_info")]
pub fn py_version_info() -> (u32, u32, u32) {
    (
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
    )
}

#[pymodule]
fn radar_simulate(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    // Scattering
    m.add_function(wrap_pyfunction!(py_scat_spheroid, m)?)?;
    m.add_function(wrap_pyfunction!(py_scat_spheroid_arr, m)?)?;

    // Moments and observables
    m.add_function(wrap_pyfunction!(py_angular_gaussian, m)?)?;
    m.add_function(wrap_pyfunction!(py_calculate_everything, m)?)?;

    // Utility functions
    m.add_function(wrap_pyfunction!(py_logify, m)?)?;
    m.add_function(wrap_pyfunction!(py_band_summary, m)?)?;
    m.add_function(wrap_pyfunction!(py_version_info, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("__doc__", "Simulate polarimetric radar variables from particle size distributions")?;

    Ok(())
}
