//! SiPM photon detection efficiency.
//!
//! The PDE curve is a piecewise-linear function of wavelength, clamped flat
//! outside the tabulated range. The default curve is the Hamamatsu table used
//! for the readout SiPM; it is built once on first use and shared read-only.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::utilities::{interpolate_linear, is_strictly_ascending};

const HAMAMATSU_WAVELENGTH_NM: [f64; 22] = [
    280.0, 300.0, 320.0, 340.0, 360.0, 380.0, 400.0, 420.0, 440.0, 450.0, 460.0, 480.0, 500.0,
    550.0, 600.0, 650.0, 700.0, 750.0, 800.0, 850.0, 890.0, 900.0,
];

const HAMAMATSU_PDE_PERCENT: [f64; 22] = [
    0.0, 2.0, 3.0, 10.0, 17.0, 26.0, 35.0, 38.0, 39.5, 40.0, 39.8, 39.2, 39.0, 32.5, 27.0, 20.0,
    15.5, 11.5, 9.0, 5.5, 4.5, 4.0,
];

/// Default SiPM PDE curve.
pub static HAMAMATSU_PDE: Lazy<PdeTable> = Lazy::new(|| {
    PdeTable::from_percent(HAMAMATSU_WAVELENGTH_NM.to_vec(), HAMAMATSU_PDE_PERCENT.to_vec())
        .unwrap_or_else(|e| panic!("built-in PDE table is malformed: {}", e))
});

/// Wavelength-dependent detection probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdeTable {
    /// Wavelengths [nm], strictly ascending
    wavelengths: Vec<f64>,
    /// Detection probability in [0, 1] at each wavelength
    efficiencies: Vec<f64>,
}

impl PdeTable {
    /// Build a table from efficiencies given in percent.
    pub fn from_percent(wavelengths: Vec<f64>, percent: Vec<f64>) -> Result<Self> {
        if wavelengths.len() != percent.len() {
            return Err(SimError::table(
                "pde",
                format!(
                    "{} wavelengths but {} efficiencies",
                    wavelengths.len(),
                    percent.len()
                ),
            ));
        }
        if wavelengths.is_empty() {
            return Err(SimError::table("pde", "table has no rows"));
        }
        if !is_strictly_ascending(&wavelengths) {
            return Err(SimError::table("pde", "wavelengths must be strictly ascending"));
        }
        if let Some(bad) = percent.iter().find(|p| !(0.0..=100.0).contains(*p)) {
            return Err(SimError::table(
                "pde",
                format!("efficiency {} % outside [0, 100]", bad),
            ));
        }
        Ok(Self {
            wavelengths,
            efficiencies: percent.into_iter().map(|p| p / 100.0).collect(),
        })
    }

    /// The built-in Hamamatsu curve.
    pub fn hamamatsu() -> &'static PdeTable {
        &HAMAMATSU_PDE
    }

    /// Detection probability at `wavelength_nm`.
    pub fn at(&self, wavelength_nm: f64) -> f64 {
        interpolate_linear(&self.wavelengths, &self.efficiencies, wavelength_nm)
    }

    /// Bernoulli gate: detected iff `u < PDE(wavelength)`.
    pub fn detects(&self, wavelength_nm: f64, u: f64) -> bool {
        u < self.at(wavelength_nm)
    }

    /// Tabulated range [nm]
    pub fn domain(&self) -> (f64, f64) {
        (self.wavelengths[0], self.wavelengths[self.wavelengths.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }
}

/// PDE of the default SiPM at `wavelength_nm`.
pub fn pde(wavelength_nm: f64) -> f64 {
    HAMAMATSU_PDE.at(wavelength_nm)
}

/// Detection gate against the default SiPM curve.
pub fn is_detected(wavelength_nm: f64, u: f64) -> bool {
    HAMAMATSU_PDE.detects(wavelength_nm, u)
}
