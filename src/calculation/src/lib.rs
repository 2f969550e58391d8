//! Polarimetric radar variable simulation from particle size distributions.
//!
//! This library provides:
//! - Depolarization factors of oblate, prolate, and spherical particles
//! - Rayleigh scattering amplitudes of homogeneous and core-shell spheroids
//! - Exponential and gamma size distributions with continuous and discrete
//!   integration rules
//! - Angular moments of Gaussian canting distributions
//! - Zh, Zv, Zdr, Kdp, RhoHV, and LDR from amplitudes and distributions
//!
//! # Features
//!
//! - **Pure**: every function is a deterministic transformation of its inputs
//! - **Vectorized**: array variants over `ndarray` match the scalar formulas
//! - **Python bindings**: Optional PyO3 bindings for seamless Python integration
//!
//! # Example
//!
//! ```
//! use ndarray::Array1;
//! use radar_simulate::{
//!     AngularMoments, Constants, distribution, observables::calculate_everything_log,
//!     scattering::scatter_spheroid_arr,
//! };
//!
//! let constants = Constants::x_band();
//! let max_dim = Array1::linspace(0.1, 10.0, 100);
//! let thickness = &max_dim * 0.2;
//! let dist = distribution::exponential(1e3, 0.5, max_dim.view()).unwrap();
//!
//! let diel = Array1::from_elem(1, radar_simulate::dielectric::snow_dielectric(200.0, &constants));
//! let amps = scatter_spheroid_arr(diel.view(), thickness.view(), max_dim.view(), constants.wavelength).unwrap();
//!
//! let moments = AngularMoments::gaussian(10.0);
//! let obs = calculate_everything_log(&amps, &amps, &constants, &dist, &moments).unwrap();
//! assert!(obs.zdr > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::doc_markdown)]
#![allow(clippy::too_many_arguments)]

pub mod angular;
pub mod constants;
pub mod dielectric;
pub mod distribution;
pub mod error;
pub mod observables;
pub mod scattering;
pub mod shape;
pub mod units;

// Optional Python bindings
#[cfg(feature = "python-bindings")]
pub mod python;

// Re-export key types and functions for easy use
pub use angular::AngularMoments;
pub use constants::Constants;
pub use distribution::{ContinuousDistribution, DiscreteDistribution, SizeIntegration};
pub use error::{RadarError, RadarResult};
pub use observables::{ObservableCalculator, RadarObservables};
pub use scattering::{CoreVolumeFraction, ScatteringAmplitudes, Spheroid};
pub use shape::{ShapeFactors, SpheroidShape};
pub use units::logify;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
