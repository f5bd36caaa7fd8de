use serde::{Deserialize, Serialize};

/// Per-event bookkeeping filled by the stepping action and the SiPM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Detected photoelectrons
    pub photon_count: u32,
    /// Energy deposited by charged particles [MeV]
    pub energy_deposit: f64,
    /// Wavelengths of detected photons [nm]
    pub wavelengths: Vec<f64>,
}

/// Event-level user action
#[derive(Debug, Default)]
pub struct EventAction {
    record: EventRecord,
}

impl EventAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_of_event(&mut self) {
        self.record.photon_count = 0;
        self.record.energy_deposit = 0.0;
        self.record.wavelengths.clear();
    }

    /// Hands the finished record over; the action is left reset.
    pub fn end_of_event(&mut self) -> EventRecord {
        std::mem::take(&mut self.record)
    }

    pub fn add_photon(&mut self) {
        self.record.photon_count += 1;
    }

    pub fn add_energy_deposit(&mut self, energy: f64) {
        self.record.energy_deposit += energy;
    }

    pub fn add_wavelength(&mut self, wavelength_nm: f64) {
        self.record.wavelengths.push(wavelength_nm);
    }

    pub fn photon_count(&self) -> u32 {
        self.record.photon_count
    }

    pub fn total_energy_deposit(&self) -> f64 {
        self.record.energy_deposit
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.record.wavelengths
    }
}
