use crate::event::EventAction;
use crate::particle::ParticleKind;

/// What the transport reports for one step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub particle: ParticleKind,
    /// Total energy deposited along the step [MeV]
    pub energy_deposit: f64,
    /// Step length [mm]
    pub length: f64,
}

/// Sums the deposit of charged particles into the current event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SteppingAction;

impl SteppingAction {
    pub fn new() -> Self {
        Self
    }

    pub fn user_stepping(&self, step: &Step, event: Option<&mut EventAction>) {
        if !step.particle.is_charged() || step.energy_deposit <= 0.0 {
            return;
        }
        if let Some(event) = event {
            event.add_energy_deposit(step.energy_deposit);
        }
    }
}
