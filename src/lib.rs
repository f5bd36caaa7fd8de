//! Scintillator slab, WLS fiber and SiPM readout for Monte Carlo transport.
//!
//! The crate provides what a particle-transport toolkit needs from the user
//! side: optical material tables, the primary generator, the stepping and
//! sensitive-detector callbacks, and event/run bookkeeping with histogram
//! output. [`FastOpticalTransport`] stands in for the toolkit so runs can be
//! made end to end.

mod bounding_box;
pub mod config;
pub mod constants;
mod error;
pub mod event;
mod fast_rng;
pub mod geometry;
mod histogram;
pub mod logging;
pub mod materials;
mod model;
pub mod particle;
pub mod pde;
pub mod run;
pub mod settings;
pub mod sipm;
pub mod source;
pub mod stats;
pub mod stepping;
pub mod transport;
mod utilities;

pub use bounding_box::BoundingBox;
pub use config::{parse_script, RunCommand, RunScript};
pub use error::{Result, SimError};
pub use event::{EventAction, EventRecord};
pub use fast_rng::FastRng;
pub use geometry::DetectorLayout;
pub use histogram::Histogram1D;
pub use materials::{MaterialCatalog, OpticalMaterial, PropertyTable, SpectrumSampler, CATALOG};
pub use model::Model;
pub use particle::{Particle, ParticleKind};
pub use pde::{is_detected, pde, PdeTable, HAMAMATSU_PDE};
pub use run::{RunAccumulator, RunAction, RunSummary};
pub use settings::Settings;
pub use sipm::SipmDetector;
pub use source::{PrimaryGenerator, SourceMode};
pub use stats::{sample_beta_energy, sample_cone_direction, AngularDistribution, EnergyDistribution};
pub use stepping::{Step, SteppingAction};
pub use transport::{EventContext, FastOpticalTransport, OpticsParams, Transport};
pub use utilities::interpolate_linear;
