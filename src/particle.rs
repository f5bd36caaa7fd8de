use serde::{Deserialize, Serialize};

/// Particle species known to the actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    Electron,
    Positron,
    MuonMinus,
    MuonPlus,
    Gamma,
    OpticalPhoton,
}

impl ParticleKind {
    /// Charge in units of e
    pub fn charge(self) -> f64 {
        match self {
            ParticleKind::Electron | ParticleKind::MuonMinus => -1.0,
            ParticleKind::Positron | ParticleKind::MuonPlus => 1.0,
            ParticleKind::Gamma | ParticleKind::OpticalPhoton => 0.0,
        }
    }

    pub fn is_charged(self) -> bool {
        self.charge() != 0.0
    }

    /// Toolkit particle-table name
    pub fn name(self) -> &'static str {
        match self {
            ParticleKind::Electron => "e-",
            ParticleKind::Positron => "e+",
            ParticleKind::MuonMinus => "mu-",
            ParticleKind::MuonPlus => "mu+",
            ParticleKind::Gamma => "gamma",
            ParticleKind::OpticalPhoton => "opticalphoton",
        }
    }
}

/// A primary handed to the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: [f64; 3],
    pub direction: [f64; 3],
    /// Kinetic energy [MeV]
    pub energy: f64,
}

impl Particle {
    pub fn new(kind: ParticleKind, position: [f64; 3], direction: [f64; 3], energy: f64) -> Self {
        Self {
            kind,
            position,
            direction,
            energy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_construction() {
        let p = Particle::new(ParticleKind::Electron, [0.0, 1.0, 2.0], [1.0, 0.0, 0.0], 0.5);
        assert_eq!(p.position, [0.0, 1.0, 2.0]);
        assert_eq!(p.direction, [1.0, 0.0, 0.0]);
        assert_eq!(p.energy, 0.5);
        assert_eq!(p.kind, ParticleKind::Electron);
    }

    #[test]
    fn test_charges() {
        assert!(ParticleKind::MuonMinus.is_charged());
        assert!(ParticleKind::Positron.is_charged());
        assert!(!ParticleKind::Gamma.is_charged());
        assert!(!ParticleKind::OpticalPhoton.is_charged());
    }

    #[test]
    fn test_names() {
        assert_eq!(ParticleKind::MuonMinus.name(), "mu-");
        assert_eq!(ParticleKind::OpticalPhoton.name(), "opticalphoton");
    }
}
