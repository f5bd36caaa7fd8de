use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::constants::{GEV, MEV, MM};
use crate::error::Result;
use crate::geometry::DetectorLayout;
use crate::particle::{Particle, ParticleKind};
use crate::stats::{sample_disk, AngularDistribution, EnergyDistribution};

/// Which primaries the run shoots, chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// 3 GeV mu- from far upstream, aimed at the entrance face
    CosmicMuon,
    /// Sr-90 / Y-90 electrons leaving a collimator
    BetaSource,
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosmic" | "cosmic_muon" | "muon" => Ok(SourceMode::CosmicMuon),
            "beta" | "beta_source" | "sr90" => Ok(SourceMode::BetaSource),
            other => Err(format!(
                "unknown source mode '{}', expected 'cosmic' or 'beta'",
                other
            )),
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::CosmicMuon => write!(f, "cosmic"),
            SourceMode::BetaSource => write!(f, "beta"),
        }
    }
}

/// Beta emitter with its spectrum endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaEmitter {
    pub name: &'static str,
    /// Endpoint energy [MeV]
    pub endpoint: f64,
}

impl BetaEmitter {
    pub fn spectrum(&self) -> EnergyDistribution {
        EnergyDistribution::BetaSpectrum {
            endpoint: self.endpoint,
        }
    }
}

pub const SR90: BetaEmitter = BetaEmitter {
    name: "Sr-90",
    endpoint: 0.546 * MEV,
};

pub const Y90: BetaEmitter = BetaEmitter {
    name: "Y-90",
    endpoint: 2.28 * MEV,
};

/// Unit vector from `from` towards `to`, never pointing to -x.
///
/// Coincident points give +x.
pub fn aim_direction(from: [f64; 3], to: [f64; 3]) -> [f64; 3] {
    let v = Vector3::from(to) - Vector3::from(from);
    match v.try_normalize(f64::EPSILON) {
        Some(u) => [u.x.abs(), u.y, u.z],
        None => [1.0, 0.0, 0.0],
    }
}

/// Primary generator for the two source configurations
#[derive(Debug, Clone)]
pub struct PrimaryGenerator {
    pub mode: SourceMode,
    /// Aim every primary at `target` instead of sampling the collimator cone
    pub aim_at_center: bool,
    pub layout: DetectorLayout,
    /// Aiming point on the entrance face [mm]
    pub target: [f64; 3],
    pub cosmic_start: [f64; 3],
    /// Kinetic energy of the cosmic muon [MeV]
    pub cosmic_energy: f64,
    /// Emitters picked with equal probability in beta mode
    pub emitters: [BetaEmitter; 2],
}

impl PrimaryGenerator {
    pub fn new(mode: SourceMode, aim_at_center: bool, layout: DetectorLayout) -> Self {
        let entrance = layout.entrance_center();
        Self {
            mode,
            aim_at_center,
            target: [entrance[0], -2.0 * MM, 0.0],
            cosmic_start: [-200.0 * MM, 0.0, 0.0],
            cosmic_energy: 3.0 * GEV,
            emitters: [SR90, Y90],
            layout,
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Particle> {
        let primary = match self.mode {
            SourceMode::CosmicMuon => self.cosmic(rng)?,
            SourceMode::BetaSource => self.beta(rng)?,
        };
        trace!(
            kind = primary.kind.name(),
            energy_mev = primary.energy,
            x = primary.position[0],
            y = primary.position[1],
            z = primary.position[2],
            "generated primary"
        );
        Ok(primary)
    }

    fn cosmic<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Particle> {
        // cosmic mode always aims; a cone around the aim axis is not modelled
        let angular = AngularDistribution::Monodirectional {
            reference_uvw: aim_direction(self.cosmic_start, self.target),
        };
        let energy = EnergyDistribution::Discrete(self.cosmic_energy);
        Ok(Particle::new(
            ParticleKind::MuonMinus,
            self.cosmic_start,
            angular.sample(rng),
            energy.sample(rng)?,
        ))
    }

    fn beta<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Particle> {
        let (y, z) = sample_disk(self.layout.collimator_radius, rng);
        let position = [self.layout.collimator_exit_x(), y, z];

        let direction = if self.aim_at_center {
            aim_direction(position, self.target)
        } else {
            AngularDistribution::new_cone(self.layout.collimator_half_angle())?.sample(rng)
        };

        let emitter = if rng.gen::<f64>() < 0.5 {
            self.emitters[0]
        } else {
            self.emitters[1]
        };
        let energy = emitter.spectrum().sample(rng)?;

        Ok(Particle::new(ParticleKind::Electron, position, direction, energy))
    }
}
