//! Effective dielectric constants of ice-air mixtures.

use num_complex::Complex64;

use crate::constants::{Constants, RHO_ICE};

/// Maxwell-Garnett dielectric constant of snow with air as the matrix.
///
/// # Arguments
/// * `rho_snow` - Bulk density of the snow (kg/m³)
/// * `eps_ice` - Dielectric constant of solid ice at the radar wavelength
pub fn maxwell_garnett(rho_snow: f64, eps_ice: Complex64) -> Complex64 {
    maxwell_garnett_with(rho_snow, RHO_ICE, eps_ice)
}

/// Maxwell-Garnett mixing with the ice density and dielectric taken from `constants`.
pub fn snow_dielectric(rho_snow: f64, constants: &Constants) -> Complex64 {
    maxwell_garnett_with(rho_snow, constants.rho_ice, constants.eps_ice)
}

fn maxwell_garnett_with(rho_snow: f64, rho_ice: f64, eps_ice: Complex64) -> Complex64 {
    let fraction = rho_snow / rho_ice;
    let factor = (eps_ice - 1.0) / (eps_ice + 2.0);
    (1.0 + 2.0 * fraction * factor) / (1.0 - fraction * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EPS_ICE_X;
    use approx::assert_relative_eq;

    #[test]
    fn test_mixing_limits() {
        // No ice: vacuum
        let air = maxwell_garnett(0.0, EPS_ICE_X);
        assert_eq!(air, Complex64::new(1.0, 0.0));

        // Solid ice recovers the ice dielectric constant
        let ice = maxwell_garnett(RHO_ICE, EPS_ICE_X);
        assert_relative_eq!(ice.re, EPS_ICE_X.re, max_relative = 1e-12);
        assert_relative_eq!(ice.im, EPS_ICE_X.im, max_relative = 1e-9);
    }

    #[test]
    fn test_snow_is_between_air_and_ice() {
        let snow = snow_dielectric(100.0, &Constants::x_band());
        assert!(snow.re > 1.0 && snow.re < EPS_ICE_X.re);
        assert!(snow.im > 0.0 && snow.im < EPS_ICE_X.im);
        assert_eq!(snow, maxwell_garnett(100.0, EPS_ICE_X));
    }
}
