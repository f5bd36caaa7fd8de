use tracing::{debug, info};

use crate::error::Result;
use crate::event::EventAction;
use crate::fast_rng::FastRng;
use crate::run::{RunAction, RunSummary};
use crate::settings::Settings;
use crate::sipm::SipmDetector;
use crate::source::PrimaryGenerator;
use crate::stepping::SteppingAction;
use crate::transport::{EventContext, FastOpticalTransport, Transport};

/// Run manager: owns the user actions and drives events through a transport.
pub struct Model {
    pub settings: Settings,
    generator: PrimaryGenerator,
    transport: Box<dyn Transport>,
    stepping: SteppingAction,
    sipm: SipmDetector,
    run_action: RunAction,
    next_run_id: u32,
    /// Stream index of the next event; runs continue where the last stopped
    next_event_id: u64,
}

impl Model {
    /// Model using the fast optical transport.
    pub fn new(settings: Settings) -> Result<Self> {
        let transport =
            FastOpticalTransport::new(settings.layout.clone(), settings.optics.clone())?;
        Self::with_transport(settings, Box::new(transport))
    }

    pub fn with_transport(settings: Settings, transport: Box<dyn Transport>) -> Result<Self> {
        let generator =
            PrimaryGenerator::new(settings.mode, settings.aim_at_center, settings.layout.clone());
        let run_action = RunAction::new(Some(settings.output_path.clone()))?;
        Ok(Self {
            generator,
            transport,
            stepping: SteppingAction::new(),
            sipm: SipmDetector::new("SiPMSD"),
            run_action,
            next_run_id: 0,
            next_event_id: 0,
            settings,
        })
    }

    /// Keep run results in memory; no histogram file is written.
    pub fn disable_output(&mut self) {
        self.run_action.set_output_path(None);
    }

    /// Apply new settings for the following runs. A new seed restarts the
    /// event streams.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        self.transport.configure(&settings)?;
        if settings.seed != self.settings.seed {
            self.next_event_id = 0;
        }
        if settings.output_path != self.settings.output_path {
            self.run_action.set_output_path(Some(settings.output_path.clone()));
        }
        self.generator =
            PrimaryGenerator::new(settings.mode, settings.aim_at_center, settings.layout.clone());
        self.settings = settings;
        Ok(())
    }

    /// Simulate `n_events` events. `None` when no event was processed.
    pub fn beam_on(&mut self, n_events: u64) -> Result<Option<RunSummary>> {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        info!(
            run_id,
            events = n_events,
            mode = %self.settings.mode,
            seed = self.settings.seed,
            "Beam on"
        );
        self.run_action.begin_of_run(run_id);

        let mut event = EventAction::new();
        for i in 0..n_events {
            let event_id = self.next_event_id + i;
            let mut rng = FastRng::for_event(self.settings.seed, event_id);
            let primary = self.generator.generate(&mut rng)?;

            event.begin_of_event();
            let mut ctx = EventContext::new(&mut rng, Some(&mut event), &self.stepping, &self.sipm);
            self.transport.transport(&primary, &mut ctx)?;
            let record = event.end_of_event();
            debug!(
                event_id,
                photons = record.photon_count,
                edep_mev = record.energy_deposit,
                "event done"
            );
            self.run_action.record_event(&record);
        }
        self.next_event_id += n_events;

        self.run_action.end_of_run()
    }
}
