//! Optical material catalogue for the scintillator, fiber and readout.
//!
//! Properties are tabulated on the wavelength grid of the EJ-212 emission
//! measurement (400-520 nm) and can be queried by wavelength or by photon
//! energy. Emission spectra support inverse-CDF wavelength sampling.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{wavelength_from_energy, M, NS};
use crate::error::{Result, SimError};
use crate::utilities::{bracket, cumulative_trapezoid, interpolate_linear, is_strictly_ascending};

/// Wavelength grid [nm] shared by all tabulated properties, ascending.
pub const WAVELENGTH_GRID_NM: [f64; 22] = [
    400.0, 405.0, 410.0, 415.0, 420.0, 423.0, 425.0, 430.0, 435.0, 440.0, 445.0, 450.0, 455.0,
    460.0, 465.0, 470.0, 475.0, 480.0, 490.0, 500.0, 510.0, 520.0,
];

/// EJ-212 relative emission on [`WAVELENGTH_GRID_NM`].
const EJ212_EMISSION: [f64; 22] = [
    0.05, 0.18, 0.42, 0.75, 0.95, 1.00, 0.90, 0.75, 0.70, 0.70, 0.65, 0.55, 0.45, 0.38, 0.30,
    0.25, 0.20, 0.16, 0.10, 0.07, 0.05, 0.03,
];

/// Wavelength-dependent material properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    RefractiveIndex,
    AbsorptionLength,
    ScintillationComponent,
    WlsAbsorptionLength,
    WlsComponent,
    Reflectivity,
}

/// Scalar material properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstProperty {
    /// photons / MeV
    ScintillationYield,
    ResolutionScale,
    /// ns
    ScintillationTimeConstant,
    /// ns
    ScintillationRiseTime,
    /// ns
    WlsTimeConstant,
}

/// A property tabulated against wavelength
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTable {
    wavelengths: Vec<f64>,
    values: Vec<f64>,
}

impl PropertyTable {
    pub fn new(wavelengths: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if wavelengths.len() != values.len() {
            return Err(SimError::table(
                "property",
                format!("{} wavelengths but {} values", wavelengths.len(), values.len()),
            ));
        }
        if wavelengths.len() < 2 {
            return Err(SimError::table("property", "need at least 2 rows"));
        }
        if !is_strictly_ascending(&wavelengths) {
            return Err(SimError::table("property", "wavelengths must be strictly ascending"));
        }
        Ok(Self { wavelengths, values })
    }

    /// Same value at every grid point
    pub fn constant(value: f64) -> Self {
        Self {
            wavelengths: WAVELENGTH_GRID_NM.to_vec(),
            values: vec![value; WAVELENGTH_GRID_NM.len()],
        }
    }

    /// Values computed per grid wavelength
    pub fn from_fn(f: impl Fn(f64) -> f64) -> Self {
        Self {
            wavelengths: WAVELENGTH_GRID_NM.to_vec(),
            values: WAVELENGTH_GRID_NM.iter().map(|&wl| f(wl)).collect(),
        }
    }

    pub fn at_wavelength(&self, wavelength_nm: f64) -> f64 {
        interpolate_linear(&self.wavelengths, &self.values, wavelength_nm)
    }

    /// Value for a photon of total energy `energy` [MeV]
    pub fn at_energy(&self, energy: f64) -> f64 {
        self.at_wavelength(wavelength_from_energy(energy))
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Inverse-CDF sampler over a tabulated spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSampler {
    wavelengths: Vec<f64>,
    cdf: Vec<f64>,
}

impl SpectrumSampler {
    pub fn new(spectrum: &PropertyTable) -> Result<Self> {
        if spectrum.values.iter().any(|&v| v < 0.0) {
            return Err(SimError::table("spectrum", "negative intensity"));
        }
        let cdf = cumulative_trapezoid(&spectrum.wavelengths, &spectrum.values);
        let total = cdf[cdf.len() - 1];
        if total <= 0.0 {
            return Err(SimError::table("spectrum", "spectrum integrates to zero"));
        }
        Ok(Self {
            wavelengths: spectrum.wavelengths.clone(),
            cdf: cdf.into_iter().map(|c| c / total).collect(),
        })
    }

    /// Wavelength [nm] distributed as the spectrum
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        let last = self.cdf.len() - 1;
        if u >= self.cdf[last] {
            return self.wavelengths[last];
        }
        let i = bracket(&self.cdf, u);
        let span = self.cdf[i + 1] - self.cdf[i];
        if span <= 0.0 {
            return self.wavelengths[i];
        }
        let t = (u - self.cdf[i]) / span;
        self.wavelengths[i] + t * (self.wavelengths[i + 1] - self.wavelengths[i])
    }
}

/// Bulk optical material
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalMaterial {
    pub name: String,
    /// g/cm3
    pub density: f64,
    /// (element symbol, atom fraction)
    pub composition: Vec<(String, f64)>,
    pub properties: HashMap<Property, PropertyTable>,
    pub const_properties: HashMap<ConstProperty, f64>,
}

impl OpticalMaterial {
    pub fn new(name: &str, density: f64) -> Self {
        Self {
            name: name.to_string(),
            density,
            composition: Vec::new(),
            properties: HashMap::new(),
            const_properties: HashMap::new(),
        }
    }

    /// Add an element by atom count or fraction; fractions are normalised on read.
    pub fn add_element(&mut self, symbol: &str, amount: f64) -> &mut Self {
        self.composition.push((symbol.to_string(), amount));
        self
    }

    pub fn add_property(&mut self, key: Property, table: PropertyTable) -> &mut Self {
        self.properties.insert(key, table);
        self
    }

    pub fn add_const_property(&mut self, key: ConstProperty, value: f64) -> &mut Self {
        self.const_properties.insert(key, value);
        self
    }

    pub fn property(&self, key: Property) -> Option<&PropertyTable> {
        self.properties.get(&key)
    }

    pub fn const_property(&self, key: ConstProperty) -> Option<f64> {
        self.const_properties.get(&key).copied()
    }

    /// Atom fractions normalised to 1
    pub fn atom_fractions(&self) -> Vec<(String, f64)> {
        let total: f64 = self.composition.iter().map(|(_, a)| a).sum();
        if total <= 0.0 {
            return Vec::new();
        }
        self.composition
            .iter()
            .map(|(s, a)| (s.clone(), a / total))
            .collect()
    }
}

/// WLS absorption length in the PS core, blue absorbed strongly
fn wls_absorption_length(wavelength_nm: f64) -> f64 {
    match wavelength_nm {
        wl if wl >= 500.0 => 20.0 * M,
        wl if wl >= 480.0 => 6.0 * M,
        wl if wl >= 460.0 => 3.0 * M,
        wl if wl >= 440.0 => 1.0 * M,
        wl if wl >= 420.0 => 0.4 * M,
        _ => 0.3 * M,
    }
}

/// Green WLS re-emission, Gaussian around 500 nm
fn wls_emission(wavelength_nm: f64) -> f64 {
    let (mu, sigma) = (500.0, 15.0);
    let g = (-0.5 * ((wavelength_nm - mu) / sigma).powi(2)).exp();
    if (460.0..=580.0).contains(&wavelength_nm) {
        g
    } else {
        0.02 * g
    }
}

/// Named materials of the detector
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    materials: HashMap<String, OpticalMaterial>,
    /// Reflectivity of the PTFE wrapping surface
    pub wrap_reflectivity: PropertyTable,
}

pub const EJ212: &str = "EJ212";
pub const PS_CORE: &str = "PS_Core";
pub const PMMA_CLAD: &str = "PMMA_Clad";
pub const OPTICAL_GLUE: &str = "OpticalGlue";
pub const AIR: &str = "G4_AIR";
pub const SILICON: &str = "G4_Si";

/// Catalogue built once and shared read-only.
pub static CATALOG: Lazy<MaterialCatalog> = Lazy::new(MaterialCatalog::standard);

impl MaterialCatalog {
    pub fn standard() -> Self {
        let mut materials = HashMap::new();

        let mut scint = OpticalMaterial::new(EJ212, 1.023);
        scint
            .add_element("C", 4.69e22)
            .add_element("H", 5.17e22)
            .add_property(Property::RefractiveIndex, PropertyTable::constant(1.58))
            .add_property(Property::AbsorptionLength, PropertyTable::constant(2.5 * M))
            .add_property(
                Property::ScintillationComponent,
                PropertyTable {
                    wavelengths: WAVELENGTH_GRID_NM.to_vec(),
                    values: EJ212_EMISSION.to_vec(),
                },
            )
            .add_const_property(ConstProperty::ScintillationYield, 10_000.0)
            .add_const_property(ConstProperty::ResolutionScale, 1.0)
            .add_const_property(ConstProperty::ScintillationTimeConstant, 2.4 * NS)
            .add_const_property(ConstProperty::ScintillationRiseTime, 0.9 * NS);
        materials.insert(EJ212.to_string(), scint);

        let mut core = OpticalMaterial::new(PS_CORE, 1.05);
        core.add_element("C", 8.0)
            .add_element("H", 8.0)
            .add_property(Property::RefractiveIndex, PropertyTable::constant(1.59))
            .add_property(Property::AbsorptionLength, PropertyTable::constant(12.0 * M))
            .add_property(
                Property::WlsAbsorptionLength,
                PropertyTable::from_fn(wls_absorption_length),
            )
            .add_property(Property::WlsComponent, PropertyTable::from_fn(wls_emission))
            .add_const_property(ConstProperty::WlsTimeConstant, 7.0 * NS);
        materials.insert(PS_CORE.to_string(), core);

        let mut clad = OpticalMaterial::new(PMMA_CLAD, 1.18);
        clad.add_element("C", 5.0)
            .add_element("H", 8.0)
            .add_element("O", 2.0)
            .add_property(Property::RefractiveIndex, PropertyTable::constant(1.49))
            .add_property(Property::AbsorptionLength, PropertyTable::constant(20.0 * M));
        materials.insert(PMMA_CLAD.to_string(), clad);

        let mut glue = OpticalMaterial::new(OPTICAL_GLUE, 1.18);
        glue.add_element("C", 5.0)
            .add_element("H", 10.0)
            .add_property(Property::RefractiveIndex, PropertyTable::constant(1.465))
            .add_property(Property::AbsorptionLength, PropertyTable::constant(10.0 * M));
        materials.insert(OPTICAL_GLUE.to_string(), glue);

        let mut air = OpticalMaterial::new(AIR, 1.20479e-3);
        air.add_property(Property::RefractiveIndex, PropertyTable::constant(1.0003));
        materials.insert(AIR.to_string(), air);

        let mut si = OpticalMaterial::new(SILICON, 2.33);
        si.add_element("Si", 1.0)
            .add_property(Property::RefractiveIndex, PropertyTable::constant(1.55));
        materials.insert(SILICON.to_string(), si);

        Self {
            materials,
            wrap_reflectivity: PropertyTable::constant(0.98),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OpticalMaterial> {
        self.materials.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
