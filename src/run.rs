//! Run-level accumulation, histograms and output.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::event::EventRecord;
use crate::histogram::Histogram1D;

/// Counters summed over events; `merge` is the run-level reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunAccumulator {
    pub events: u64,
    pub total_photons: u64,
    /// MeV
    pub total_energy_deposit: f64,
}

impl RunAccumulator {
    pub fn add_event(&mut self, photons: u32, energy_deposit: f64) {
        self.events += 1;
        self.total_photons += u64::from(photons);
        self.total_energy_deposit += energy_deposit;
    }

    pub fn merge(&mut self, other: &RunAccumulator) {
        self.events += other.events;
        self.total_photons += other.total_photons;
        self.total_energy_deposit += other.total_energy_deposit;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn mean_photons(&self) -> f64 {
        if self.events == 0 {
            0.0
        } else {
            self.total_photons as f64 / self.events as f64
        }
    }

    pub fn mean_energy_deposit(&self) -> f64 {
        if self.events == 0 {
            0.0
        } else {
            self.total_energy_deposit / self.events as f64
        }
    }
}

/// Result of one `beam_on`, also the content of the histogram file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: u32,
    pub events: u64,
    pub total_photons: u64,
    pub total_energy_deposit: f64,
    pub mean_photons_per_event: f64,
    pub mean_energy_deposit_per_event: f64,
    /// Photoelectrons per event
    pub h_npe: Histogram1D,
    /// Detected photon wavelength [nm]
    pub h_wavelength: Histogram1D,
}

impl RunSummary {
    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Run-level user action
#[derive(Debug)]
pub struct RunAction {
    run_id: u32,
    /// Accumulables of the thread running events
    local: RunAccumulator,
    /// Merged totals, valid after `end_of_run`
    total: RunAccumulator,
    h_npe: Histogram1D,
    h_wavelength: Histogram1D,
    output_path: Option<PathBuf>,
}

fn npe_histogram() -> Result<Histogram1D> {
    Histogram1D::new("hNpe", "Number of photoelectrons per event", 80, 0.0, 80.0)
}

fn wavelength_histogram() -> Result<Histogram1D> {
    Histogram1D::new(
        "hWavelength",
        "Detected photon wavelength;Wavelength (nm);Counts",
        120,
        300.0,
        900.0,
    )
}

impl RunAction {
    /// `output_path` of `None` keeps results in memory only.
    pub fn new(output_path: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            run_id: 0,
            local: RunAccumulator::default(),
            total: RunAccumulator::default(),
            h_npe: npe_histogram()?,
            h_wavelength: wavelength_histogram()?,
            output_path,
        })
    }

    pub fn begin_of_run(&mut self, run_id: u32) {
        self.run_id = run_id;
        self.local.reset();
        self.total.reset();
        self.h_npe.reset();
        self.h_wavelength.reset();
        info!(run_id, "Run started, accumulables reset");
    }

    /// Fold a finished event into the accumulables and histograms.
    pub fn record_event(&mut self, record: &EventRecord) {
        self.local.add_event(record.photon_count, record.energy_deposit);
        for &wl in &record.wavelengths {
            self.h_wavelength.fill(wl);
        }
        self.h_npe.fill(f64::from(record.photon_count));
    }

    /// Merge accumulables, report and write the histogram file.
    ///
    /// Returns `None` when no events were processed; nothing is written then.
    pub fn end_of_run(&mut self) -> Result<Option<RunSummary>> {
        self.total.merge(&self.local);
        self.local.reset();

        if self.total.events == 0 {
            return Ok(None);
        }

        let summary = RunSummary {
            run_id: self.run_id,
            events: self.total.events,
            total_photons: self.total.total_photons,
            total_energy_deposit: self.total.total_energy_deposit,
            mean_photons_per_event: self.total.mean_photons(),
            mean_energy_deposit_per_event: self.total.mean_energy_deposit(),
            h_npe: self.h_npe.clone(),
            h_wavelength: self.h_wavelength.clone(),
        };

        info!(
            run_id = summary.run_id,
            events = summary.events,
            mean_photons = summary.mean_photons_per_event,
            mean_edep_mev = summary.mean_energy_deposit_per_event,
            "Run summary"
        );

        if let Some(path) = &self.output_path {
            write_summary(path, &summary)?;
            info!(path = %path.display(), "Histograms written");
        }
        Ok(Some(summary))
    }

    pub fn set_output_path(&mut self, output_path: Option<PathBuf>) {
        self.output_path = output_path;
    }

    pub fn totals(&self) -> &RunAccumulator {
        &self.total
    }
}

/// Replace `path` with the JSON summary, creating parent directories.
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;
    Ok(())
}
