//! Seam to the particle-transport engine and a parameterised fast model.
//!
//! A full toolkit tracks every step and optical boundary itself and only
//! calls back into the user actions. [`FastOpticalTransport`] replaces that
//! with a straight-line chord through the scintillator and a chain of
//! survival probabilities for the scintillation light, enough to drive the
//! stepping action and the SiPM with realistic numbers.

use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{energy_from_wavelength, CM, MIP_STOPPING_POWER};
use crate::error::{Result, SimError};
use crate::event::EventAction;
use crate::fast_rng::FastRng;
use crate::geometry::DetectorLayout;
use crate::materials::{
    ConstProperty, Property, PropertyTable, SpectrumSampler, CATALOG, EJ212, PS_CORE,
};
use crate::particle::{Particle, ParticleKind};
use crate::settings::Settings;
use crate::sipm::SipmDetector;
use crate::stepping::{Step, SteppingAction};

/// Below this mean the photon count is Poisson, above it Gaussian
const POISSON_LIMIT: f64 = 10.0;

/// What a transport engine sees of the user actions during one event
pub struct EventContext<'a> {
    pub rng: &'a mut FastRng,
    event: Option<&'a mut EventAction>,
    stepping: &'a SteppingAction,
    sipm: &'a SipmDetector,
}

impl<'a> EventContext<'a> {
    pub fn new(
        rng: &'a mut FastRng,
        event: Option<&'a mut EventAction>,
        stepping: &'a SteppingAction,
        sipm: &'a SipmDetector,
    ) -> Self {
        Self {
            rng,
            event,
            stepping,
            sipm,
        }
    }

    /// Report a finished step to the stepping action.
    pub fn step(&mut self, step: &Step) {
        self.stepping.user_stepping(step, self.event.as_deref_mut());
    }

    /// An optical photon of total energy `energy` [MeV] entered the SiPM.
    pub fn optical_photon_at_sipm(&mut self, energy: f64) -> bool {
        self.sipm.process_hit(
            ParticleKind::OpticalPhoton,
            energy,
            &mut *self.rng,
            self.event.as_deref_mut(),
        )
    }
}

/// Carries a primary through the detector, calling back into `ctx`.
pub trait Transport {
    fn transport(&mut self, primary: &Particle, ctx: &mut EventContext<'_>) -> Result<()>;

    /// Pick up changed settings between runs.
    fn configure(&mut self, _settings: &Settings) -> Result<()> {
        Ok(())
    }
}

/// Light collection parameters of the fast model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticsParams {
    /// Probability a scintillation photon reaches the fiber
    pub light_capture: f64,
    /// Fraction of WLS light trapped and guided towards the SiPM
    pub trapping_efficiency: f64,
    /// Effective number of core crossings before a photon escapes the fiber
    pub wls_path_factor: f64,
}

impl Default for OpticsParams {
    fn default() -> Self {
        Self {
            light_capture: 0.10,
            trapping_efficiency: 0.054,
            wls_path_factor: 500.0,
        }
    }
}

impl OpticsParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("light_capture", self.light_capture),
            ("trapping_efficiency", self.trapping_efficiency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::parameter(
                    name,
                    format!("probability must be within [0, 1], got {}", value),
                ));
            }
        }
        if !(self.wls_path_factor.is_finite() && self.wls_path_factor >= 0.0) {
            return Err(SimError::parameter(
                "wls_path_factor",
                format!("must be finite and >= 0, got {}", self.wls_path_factor),
            ));
        }
        Ok(())
    }
}

/// Straight-line chord model of the scintillator, fiber and SiPM chain
#[derive(Debug, Clone)]
pub struct FastOpticalTransport {
    pub params: OpticsParams,
    layout: DetectorLayout,
    /// MeV / mm
    stopping_power: f64,
    /// photons / MeV
    light_yield: f64,
    resolution_scale: f64,
    scint_emission: SpectrumSampler,
    wls_emission: SpectrumSampler,
    wls_absorption: PropertyTable,
    core_absorption: PropertyTable,
}

fn catalog_property(material: &str, key: Property) -> Result<&'static PropertyTable> {
    CATALOG
        .get(material)
        .and_then(|m| m.property(key))
        .ok_or_else(|| SimError::table(material, format!("missing {:?}", key)))
}

fn catalog_const(material: &str, key: ConstProperty) -> Result<f64> {
    CATALOG
        .get(material)
        .and_then(|m| m.const_property(key))
        .ok_or_else(|| SimError::table(material, format!("missing {:?}", key)))
}

impl FastOpticalTransport {
    pub fn new(layout: DetectorLayout, params: OpticsParams) -> Result<Self> {
        params.validate()?;
        let density = CATALOG
            .get(EJ212)
            .map(|m| m.density)
            .ok_or_else(|| SimError::table(EJ212, "not in catalogue"))?;

        Ok(Self {
            params,
            layout,
            // MeV cm2/g * g/cm3 = MeV/cm
            stopping_power: MIP_STOPPING_POWER * density / CM,
            light_yield: catalog_const(EJ212, ConstProperty::ScintillationYield)?,
            resolution_scale: catalog_const(EJ212, ConstProperty::ResolutionScale)?,
            scint_emission: SpectrumSampler::new(catalog_property(
                EJ212,
                Property::ScintillationComponent,
            )?)?,
            wls_emission: SpectrumSampler::new(catalog_property(PS_CORE, Property::WlsComponent)?)?,
            wls_absorption: catalog_property(PS_CORE, Property::WlsAbsorptionLength)?.clone(),
            core_absorption: catalog_property(PS_CORE, Property::AbsorptionLength)?.clone(),
        })
    }

    /// Energy loss per mm in the scintillator
    pub fn stopping_power(&self) -> f64 {
        self.stopping_power
    }

    /// Number of scintillation photons for a deposit `edep` [MeV]
    pub fn photon_count<R: Rng + ?Sized>(&self, edep: f64, rng: &mut R) -> Result<u64> {
        let mean = self.light_yield * edep;
        if mean <= 0.0 {
            return Ok(0);
        }
        let n = if mean < POISSON_LIMIT {
            let poisson = Poisson::new(mean)
                .map_err(|e| SimError::parameter("photon_mean", e.to_string()))?;
            poisson.sample(rng)
        } else {
            let sigma = self.resolution_scale * mean.sqrt();
            let normal = Normal::new(mean, sigma)
                .map_err(|e| SimError::parameter("photon_sigma", e.to_string()))?;
            normal.sample(rng).round()
        };
        Ok(n.max(0.0) as u64)
    }

    /// Follow one scintillation photon produced at height `z` [mm]; returns
    /// the wavelength [nm] of the photon reaching the SiPM, if any.
    pub fn propagate_photon<R: Rng + ?Sized>(&self, z: f64, rng: &mut R) -> Option<f64> {
        let blue = self.scint_emission.sample(rng);
        if rng.gen::<f64>() >= self.params.light_capture {
            return None;
        }

        let core_diameter = 2.0 * self.layout.fiber_core_radius;
        let path = core_diameter * self.params.wls_path_factor;
        let p_shift = 1.0 - (-path / self.wls_absorption.at_wavelength(blue)).exp();
        if rng.gen::<f64>() >= p_shift {
            return None;
        }

        let green = self.wls_emission.sample(rng);
        if rng.gen::<f64>() >= self.params.trapping_efficiency {
            return None;
        }

        let distance = (self.layout.fiber_end_z() - z).max(0.0);
        let survival = (-distance / self.core_absorption.at_wavelength(green)).exp();
        if rng.gen::<f64>() >= survival {
            return None;
        }
        Some(green)
    }
}

impl Transport for FastOpticalTransport {
    fn configure(&mut self, settings: &Settings) -> Result<()> {
        settings.optics.validate()?;
        self.params = settings.optics.clone();
        self.layout = settings.layout.clone();
        Ok(())
    }

    fn transport(&mut self, primary: &Particle, ctx: &mut EventContext<'_>) -> Result<()> {
        // only ionising primaries are modelled; neutrals pass through
        if !primary.kind.is_charged() {
            trace!(kind = primary.kind.name(), "neutral primary not transported");
            return Ok(());
        }
        let scint = self.layout.scintillator();
        let Some((t_enter, t_exit)) = scint.intersect(primary.position, primary.direction) else {
            trace!(kind = primary.kind.name(), "primary misses the scintillator");
            return Ok(());
        };

        let chord = t_exit - t_enter;
        let edep = primary.energy.min(self.stopping_power * chord);
        if edep <= 0.0 {
            return Ok(());
        }
        // ranging out shortens the track
        let track = edep / self.stopping_power;
        ctx.step(&Step {
            particle: primary.kind,
            energy_deposit: edep,
            length: track,
        });

        let n_photons = self.photon_count(edep, &mut *ctx.rng)?;
        let mut arrived = 0u64;
        for _ in 0..n_photons {
            let t = t_enter + ctx.rng.uniform() * track;
            let z = primary.position[2] + t * primary.direction[2];
            if let Some(wavelength) = self.propagate_photon(z, &mut *ctx.rng) {
                arrived += 1;
                ctx.optical_photon_at_sipm(energy_from_wavelength(wavelength));
            }
        }
        trace!(
            edep_mev = edep,
            chord_mm = chord,
            photons = n_photons,
            at_sipm = arrived,
            "primary transported"
        );
        Ok(())
    }
}
