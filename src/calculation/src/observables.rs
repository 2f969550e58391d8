//! Bulk polarimetric radar observables from scattering amplitudes.
//!
//! The calculator combines per-bin amplitudes, a size distribution, and the
//! angular moments of the orientation distribution into Zh, Zv, Zdr, Kdp,
//! RhoHV, and LDR. With `C = 4λ⁴/(π⁴|K_w|²)` and `d = shh - svv`:
//!
//! - `Zh = C ∫ |shh|² - 2 Re(shh*·d)·a2 + |d|²·a4 dN`
//! - `Zv = C ∫ |shh|² - 2 Re(shh*·d)·a1 + |d|²·a3 dN`
//! - `Kdp = 0.18 λ/π ∫ Re(d)·a7 dN`, from forward amplitudes
//! - `RhoHV = C |∫ |shh|² + |d|²·a5 - shh*·d·a1 - shh·d*·a2 dN| / sqrt(Zh·Zv)`
//! - `LDR = C ∫ |d|²·a5 dN / Zh`
//!
//! The integration rule `dN` comes from the distribution, see
//! [`crate::distribution`]. Reflectivities are in mm⁶/m³ when the
//! wavelength and dimensions are in millimetres and concentrations per m³.

use std::collections::HashMap;
use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::angular::AngularMoments;
use crate::constants::{Constants, reflectivity_factor};
use crate::distribution::SizeIntegration;
use crate::error::{RadarError, RadarResult};
use crate::scattering::ScatteringAmplitudes;
use crate::units::logify;

/// The six polarimetric observables of one particle population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarObservables {
    /// Horizontal reflectivity factor
    pub zh: f64,
    /// Vertical reflectivity factor
    pub zv: f64,
    /// Differential reflectivity
    pub zdr: f64,
    /// Specific differential phase (deg/km)
    pub kdp: f64,
    /// Co-polar correlation coefficient
    pub rhohv: f64,
    /// Linear depolarization ratio
    pub ldr: f64,
}

impl RadarObservables {
    /// Convert Zh, Zv, Zdr, and LDR to decibels. Kdp and RhoHV are unchanged.
    pub fn to_log(&self) -> Self {
        Self {
            zh: logify(self.zh),
            zv: logify(self.zv),
            zdr: logify(self.zdr),
            kdp: self.kdp,
            rhohv: self.rhohv,
            ldr: logify(self.ldr),
        }
    }

    /// True when every observable is finite.
    pub fn is_finite(&self) -> bool {
        [self.zh, self.zv, self.zdr, self.kdp, self.rhohv, self.ldr]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Get the observables as a dictionary for reporting.
    pub fn get_summary(&self) -> HashMap<String, f64> {
        let mut summary = HashMap::new();
        summary.insert("zh".to_string(), self.zh);
        summary.insert("zv".to_string(), self.zv);
        summary.insert("zdr".to_string(), self.zdr);
        summary.insert("kdp".to_string(), self.kdp);
        summary.insert("rhohv".to_string(), self.rhohv);
        summary.insert("ldr".to_string(), self.ldr);
        summary
    }
}

/// Integrates scattering amplitudes over a size distribution.
#[derive(Debug, Clone, Copy)]
pub struct ObservableCalculator<'a, D: SizeIntegration> {
    wavelength: f64,
    kw2: f64,
    distribution: &'a D,
    moments: &'a AngularMoments,
}

impl<'a, D: SizeIntegration> ObservableCalculator<'a, D> {
    /// Create a calculator.
    ///
    /// # Arguments
    /// * `wavelength` - Radar wavelength, same unit as the particle dimensions
    /// * `kw2` - Reference dielectric factor |K_w|²
    /// * `distribution` - Integration weights, one per amplitude
    /// * `moments` - Orientation moments a1..a7
    pub fn new(wavelength: f64, kw2: f64, distribution: &'a D, moments: &'a AngularMoments) -> Self {
        Self {
            wavelength,
            kw2,
            distribution,
            moments,
        }
    }

    /// Create a calculator using the wavelength and |K_w|² of a band.
    pub fn from_constants(constants: &Constants, distribution: &'a D, moments: &'a AngularMoments) -> Self {
        Self::new(constants.wavelength, constants.kw2, distribution, moments)
    }

    #[inline(always)]
    fn prefactor(&self) -> f64 {
        reflectivity_factor(self.wavelength, self.kw2)
    }

    fn check(&self, amps: &ScatteringAmplitudes) -> RadarResult<()> {
        if amps.svv.len() != amps.shh.len() {
            return Err(RadarError::length("svv", amps.shh.len(), amps.svv.len()));
        }
        if amps.len() != self.distribution.len() {
            return Err(RadarError::length("amplitudes", self.distribution.len(), amps.len()));
        }
        Ok(())
    }

    /// Integrate a real function of `(shh, svv)`.
    fn integrate_real<F>(&self, amps: &ScatteringAmplitudes, f: F) -> RadarResult<f64>
    where
        F: Fn(Complex64, Complex64) -> f64,
    {
        self.check(amps)?;
        let param: Vec<f64> = amps
            .shh
            .iter()
            .zip(amps.svv.iter())
            .map(|(&shh, &svv)| f(shh, svv))
            .collect();
        self.distribution.integrate(&param)
    }

    /// Shared form of Zh and Zv; `a_cross` and `a_diff` pick the polarization.
    fn reflectivity(&self, amps: &ScatteringAmplitudes, a_cross: f64, a_diff: f64) -> RadarResult<f64> {
        let total = self.integrate_real(amps, |shh, svv| {
            let diff = shh - svv;
            shh.norm_sqr() - 2.0 * (shh.conj() * diff).re * a_cross + diff.norm_sqr() * a_diff
        })?;
        Ok(total * self.prefactor())
    }

    /// Horizontal reflectivity factor from backscatter amplitudes.
    pub fn zh(&self, back: &ScatteringAmplitudes) -> RadarResult<f64> {
        self.reflectivity(back, self.moments.a2(), self.moments.a4())
    }

    /// Vertical reflectivity factor from backscatter amplitudes.
    pub fn zv(&self, back: &ScatteringAmplitudes) -> RadarResult<f64> {
        self.reflectivity(back, self.moments.a1(), self.moments.a3())
    }

    /// Differential reflectivity `Zh/Zv` (linear).
    pub fn zdr(&self, back: &ScatteringAmplitudes) -> RadarResult<f64> {
        Ok(self.zh(back)? / self.zv(back)?)
    }

    /// Specific differential phase.
    ///
    /// `forward` must hold forward-scattering amplitudes. In the Rayleigh
    /// regime these come from the same calculators as the backscatter ones.
    pub fn kdp(&self, forward: &ScatteringAmplitudes) -> RadarResult<f64> {
        let a7 = self.moments.a7();
        let total = self.integrate_real(forward, |shh, svv| (shh - svv).re * a7)?;
        Ok(total * 0.18 * self.wavelength / PI)
    }

    /// Co-polar correlation coefficient.
    pub fn rhohv(&self, back: &ScatteringAmplitudes) -> RadarResult<f64> {
        let zh = self.zh(back)?;
        let zv = self.zv(back)?;
        self.rhohv_with(back, zh, zv)
    }

    fn rhohv_with(&self, back: &ScatteringAmplitudes, zh: f64, zv: f64) -> RadarResult<f64> {
        self.check(back)?;
        let (a1, a2, a5) = (self.moments.a1(), self.moments.a2(), self.moments.a5());
        let param: Vec<Complex64> = back
            .shh
            .iter()
            .zip(back.svv.iter())
            .map(|(&shh, &svv)| {
                let diff = shh - svv;
                Complex64::from(shh.norm_sqr() + diff.norm_sqr() * a5)
                    - shh.conj() * diff * a1
                    - shh * diff.conj() * a2
            })
            .collect();
        let total = self.distribution.integrate(&param)?;
        Ok(total.norm() * self.prefactor() / (zh * zv).sqrt())
    }

    /// Linear depolarization ratio (linear).
    pub fn ldr(&self, back: &ScatteringAmplitudes) -> RadarResult<f64> {
        let zh = self.zh(back)?;
        self.ldr_with(back, zh)
    }

    fn ldr_with(&self, back: &ScatteringAmplitudes, zh: f64) -> RadarResult<f64> {
        let a5 = self.moments.a5();
        let total = self.integrate_real(back, |shh, svv| (shh - svv).norm_sqr() * a5)?;
        Ok(total * self.prefactor() / zh)
    }

    /// All six observables in linear units.
    ///
    /// Zh and Zv are integrated once and reused for Zdr, RhoHV, and LDR. The
    /// values equal those of the individual methods.
    pub fn everything(
        &self,
        back: &ScatteringAmplitudes,
        forward: &ScatteringAmplitudes,
    ) -> RadarResult<RadarObservables> {
        let zh = self.zh(back)?;
        let zv = self.zv(back)?;

        let observables = RadarObservables {
            zh,
            zv,
            zdr: zh / zv,
            kdp: self.kdp(forward)?,
            rhohv: self.rhohv_with(back, zh, zv)?,
            ldr: self.ldr_with(back, zh)?,
        };

        if !observables.is_finite() {
            tracing::debug!(?observables, "non-finite radar observables");
        }

        Ok(observables)
    }

    /// All six observables with Zh, Zv, Zdr, and LDR in decibels.
    pub fn everything_log(
        &self,
        back: &ScatteringAmplitudes,
        forward: &ScatteringAmplitudes,
    ) -> RadarResult<RadarObservables> {
        Ok(self.everything(back, forward)?.to_log())
    }
}

/// Compute all six observables for one band in linear units.
pub fn calculate_everything<D: SizeIntegration>(
    back: &ScatteringAmplitudes,
    forward: &ScatteringAmplitudes,
    constants: &Constants,
    distribution: &D,
    moments: &AngularMoments,
) -> RadarResult<RadarObservables> {
    ObservableCalculator::from_constants(constants, distribution, moments).everything(back, forward)
}

/// Compute all six observables for one band, reflectivities and LDR in dB.
pub fn calculate_everything_log<D: SizeIntegration>(
    back: &ScatteringAmplitudes,
    forward: &ScatteringAmplitudes,
    constants: &Constants,
    distribution: &D,
    moments: &AngularMoments,
) -> RadarResult<RadarObservables> {
    ObservableCalculator::from_constants(constants, distribution, moments).everything_log(back, forward)
}
