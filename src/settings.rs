use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geometry::DetectorLayout;
use crate::source::SourceMode;
use crate::transport::OpticsParams;

/// Everything a run needs besides the static tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Events for a run without a script
    pub events: u64,
    /// Master seed; event streams derive from it
    pub seed: u64,
    pub mode: SourceMode,
    pub aim_at_center: bool,
    /// Histogram file, replaced on every run
    pub output_path: PathBuf,
    pub optics: OpticsParams,
    pub layout: DetectorLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            events: 100,
            seed: 1,
            mode: SourceMode::CosmicMuon,
            aim_at_center: false,
            output_path: PathBuf::from("sipm_output.json"),
            optics: OpticsParams::default(),
            layout: DetectorLayout::default(),
        }
    }
}
