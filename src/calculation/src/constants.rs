//! Physical constants and radar band parameters.
//!
//! Every calculator takes its reference values from a [`Constants`] value
//! instead of module-level globals, so the same code can run at X band, S band,
//! or any custom band within one program.

use std::collections::HashMap;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Dielectric factor |K_w|² of liquid water used to normalize reflectivity.
pub const KW2: f64 = 0.93;

/// Bulk density of solid ice (kg/m³).
pub const RHO_ICE: f64 = 920.0;

/// X-band reference wavelength (mm).
pub const WAVELENGTH_X: f64 = 32.1;

/// S-band reference wavelength (mm).
pub const WAVELENGTH_S: f64 = 100.0;

/// Ice dielectric constant at X band.
pub const EPS_ICE_X: Complex64 = Complex64::new(3.16835, 0.0089);

/// Ice dielectric constant at S band.
pub const EPS_ICE_S: Complex64 = Complex64::new(3.16835, 0.02492);

/// Liquid water dielectric constant at X band.
pub const EPS_LIQ_X: Complex64 = Complex64::new(44.593, 41.449);

/// Liquid water dielectric constant at S band.
pub const EPS_LIQ_S: Complex64 = Complex64::new(80.255, 24.313);

/// Reference constants for one radar band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    /// Reference dielectric factor |K_w|² (dimensionless)
    pub kw2: f64,

    /// Radar wavelength (mm)
    /// Geometry passed to the scattering functions must use the same unit.
    pub wavelength: f64,

    /// Dielectric constant of solid ice at this wavelength
    pub eps_ice: Complex64,

    /// Dielectric constant of liquid water at this wavelength
    pub eps_liquid: Complex64,

    /// Ice density (kg/m³), used for Maxwell-Garnett mixing
    pub rho_ice: f64,
}

impl Constants {
    /// X-band constants, the default band.
    pub const fn new() -> Self {
        Self {
            kw2: KW2,
            wavelength: WAVELENGTH_X,
            eps_ice: EPS_ICE_X,
            eps_liquid: EPS_LIQ_X,
            rho_ice: RHO_ICE,
        }
    }

    /// X-band constants (λ = 32.1 mm).
    pub const fn x_band() -> Self {
        Self::new()
    }

    /// S-band constants (λ = 100 mm).
    pub const fn s_band() -> Self {
        Self {
            kw2: KW2,
            wavelength: WAVELENGTH_S,
            eps_ice: EPS_ICE_S,
            eps_liquid: EPS_LIQ_S,
            rho_ice: RHO_ICE,
        }
    }

    /// Create constants for a custom band.
    /// A missing `kw2` falls back to the liquid-water value of 0.93.
    pub fn custom(
        wavelength: f64,
        eps_ice: Complex64,
        eps_liquid: Complex64,
        kw2: Option<f64>,
    ) -> Self {
        Self {
            kw2: kw2.unwrap_or(KW2),
            wavelength,
            eps_ice,
            eps_liquid,
            rho_ice: RHO_ICE,
        }
    }

    /// Reflectivity prefactor C = 4·λ⁴ / (π⁴·|K_w|²).
    #[inline(always)]
    pub fn reflectivity_factor(&self) -> f64 {
        reflectivity_factor(self.wavelength, self.kw2)
    }

    /// Get a summary of constants as a hash map for reporting.
    pub fn summary(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("|K_w|²".to_string(), format!("{:.3}", self.kw2));
        map.insert("λ (mm)".to_string(), format!("{:.2}", self.wavelength));
        map.insert("ε_ice".to_string(), format!("{:.5}", self.eps_ice));
        map.insert("ε_liquid".to_string(), format!("{:.3}", self.eps_liquid));
        map.insert("ρ_ice (kg/m³)".to_string(), format!("{:.1}", self.rho_ice));
        map
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self::new()
    }
}

/// Reflectivity prefactor for an arbitrary wavelength and dielectric factor.
#[inline(always)]
pub fn reflectivity_factor(wavelength: f64, kw2: f64) -> f64 {
    4.0 * wavelength.powi(4) / (std::f64::consts::PI.powi(4) * kw2)
}
