//! SiPM sensitive detector.

use rand::Rng;
use tracing::debug;

use crate::constants::wavelength_from_energy;
use crate::event::EventAction;
use crate::particle::ParticleKind;
use crate::pde::PdeTable;

/// Every photon reaching the SiPM is absorbed; it counts with probability
/// PDE(wavelength).
#[derive(Debug, Clone)]
pub struct SipmDetector {
    pub name: String,
    pde: &'static PdeTable,
}

impl SipmDetector {
    pub fn new(name: &str) -> Self {
        Self::with_pde(name, PdeTable::hamamatsu())
    }

    pub fn with_pde(name: &str, pde: &'static PdeTable) -> Self {
        Self {
            name: name.to_string(),
            pde,
        }
    }

    pub fn pde(&self) -> &PdeTable {
        self.pde
    }

    /// Process one particle entering the sensor. `energy` is the total
    /// photon energy [MeV]. Returns true when a photoelectron was recorded.
    pub fn process_hit<R: Rng + ?Sized>(
        &self,
        particle: ParticleKind,
        energy: f64,
        rng: &mut R,
        event: Option<&mut EventAction>,
    ) -> bool {
        if particle != ParticleKind::OpticalPhoton {
            return false;
        }
        let Some(event) = event else {
            return false;
        };

        let wavelength = wavelength_from_energy(energy);
        if !self.pde.detects(wavelength, rng.gen::<f64>()) {
            return false;
        }

        event.add_photon();
        event.add_wavelength(wavelength);
        if event.photon_count() % 100 == 0 {
            debug!(detector = %self.name, count = event.photon_count(), "photon detected");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::energy_from_wavelength;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_draw_always_detects() {
        // StepRng(0, 0) yields 0.0 for every f64 draw
        let mut rng = StepRng::new(0, 0);
        let sipm = SipmDetector::new("SiPMSD");
        let mut ev = EventAction::new();
        let e = energy_from_wavelength(500.0);
        for _ in 0..10 {
            assert!(sipm.process_hit(ParticleKind::OpticalPhoton, e, &mut rng, Some(&mut ev)));
        }
        assert_eq!(ev.photon_count(), 10);
        assert!((ev.wavelengths()[0] - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_draw_never_detects() {
        let mut rng = StepRng::new(u64::MAX, 0);
        let sipm = SipmDetector::new("SiPMSD");
        let mut ev = EventAction::new();
        let e = energy_from_wavelength(450.0);
        assert!(!sipm.process_hit(ParticleKind::OpticalPhoton, e, &mut rng, Some(&mut ev)));
        assert_eq!(ev.photon_count(), 0);
    }

    #[test]
    fn test_only_optical_photons_count() {
        let mut rng = StepRng::new(0, 0);
        let sipm = SipmDetector::new("SiPMSD");
        let mut ev = EventAction::new();
        assert!(!sipm.process_hit(ParticleKind::Electron, 1.0, &mut rng, Some(&mut ev)));
        assert!(!sipm.process_hit(ParticleKind::Gamma, 1e-6, &mut rng, Some(&mut ev)));
        assert_eq!(ev.photon_count(), 0);
    }

    #[test]
    fn test_missing_event_is_noop() {
        let mut rng = StepRng::new(0, 0);
        let sipm = SipmDetector::new("SiPMSD");
        let e = energy_from_wavelength(450.0);
        assert!(!sipm.process_hit(ParticleKind::OpticalPhoton, e, &mut rng, None));
    }

    #[test]
    fn test_detected_fraction_follows_pde() {
        let mut rng = StdRng::seed_from_u64(12);
        let sipm = SipmDetector::new("SiPMSD");
        let mut ev = EventAction::new();
        let e = energy_from_wavelength(450.0);
        let n = 20_000;
        for _ in 0..n {
            sipm.process_hit(ParticleKind::OpticalPhoton, e, &mut rng, Some(&mut ev));
        }
        let fraction = ev.photon_count() as f64 / n as f64;
        assert!((fraction - 0.40).abs() < 0.02, "fraction {}", fraction);
    }
}
