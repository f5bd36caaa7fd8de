//! Detector dimensions shared by the primary generator and the fast transport.
//!
//! Volumes are not constructed here; placement is the transport toolkit's job.
//! These are the agreed numbers both sides use: one scintillator slab with a
//! groove at +x holding a WLS fiber, read out by a SiPM past the fiber's +z end.

use serde::{Deserialize, Serialize};

use crate::bounding_box::BoundingBox;
use crate::constants::MM;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorLayout {
    /// Scintillator full size (x, y, z) [mm], centred at the origin
    pub scint_size: [f64; 3],
    /// Groove cross-section (x, y) [mm], flush with the +x face
    pub groove_size: [f64; 2],
    pub fiber_clad_radius: f64,
    pub fiber_core_radius: f64,
    pub fiber_length: f64,
    /// Fiber centre along z [mm]
    pub fiber_center_z: f64,
    pub coupling_thickness: f64,
    pub sipm_size: f64,
    pub sipm_thickness: f64,
    pub wrap_thickness: f64,
    pub collimator_radius: f64,
    pub collimator_length: f64,
}

impl Default for DetectorLayout {
    fn default() -> Self {
        Self {
            scint_size: [2.0 * MM, 10.0 * MM, 140.0 * MM],
            groove_size: [1.2 * MM, 1.2 * MM],
            fiber_clad_radius: 0.500 * MM,
            fiber_core_radius: 0.480 * MM,
            fiber_length: 180.0 * MM,
            fiber_center_z: 20.0 * MM,
            coupling_thickness: 0.10 * MM,
            sipm_size: 1.3 * MM,
            sipm_thickness: 0.3 * MM,
            wrap_thickness: 0.01 * MM,
            collimator_radius: 3.53 * MM,
            collimator_length: 33.01 * MM,
        }
    }
}

impl DetectorLayout {
    pub fn scintillator(&self) -> BoundingBox {
        BoundingBox::centered([0.0; 3], self.scint_size)
    }

    /// Fiber axis position in (x, y) [mm]; the fiber touches the groove's +x wall
    pub fn fiber_axis(&self) -> [f64; 2] {
        let groove_center_x = 0.5 * self.scint_size[0] - 0.5 * self.groove_size[0];
        let offset_in_groove = 0.5 * self.groove_size[0] - self.fiber_clad_radius;
        [groove_center_x + offset_in_groove, 0.0]
    }

    /// z of the fiber's readout end [mm]
    pub fn fiber_end_z(&self) -> f64 {
        self.fiber_center_z + 0.5 * self.fiber_length
    }

    /// Centre of the SiPM [mm]
    pub fn sipm_center(&self) -> [f64; 3] {
        let [x, y] = self.fiber_axis();
        let z = self.fiber_end_z() + self.coupling_thickness + 0.5 * self.sipm_thickness;
        [x, y, z]
    }

    /// Centre of the scintillator's -x entrance face [mm]
    pub fn entrance_center(&self) -> [f64; 3] {
        [-0.5 * self.scint_size[0], 0.0, 0.0]
    }

    /// x of the collimator exit plane [mm]
    pub fn collimator_exit_x(&self) -> f64 {
        -(0.5 * self.collimator_length + 0.5 * self.scint_size[0])
    }

    /// Largest angle a straight track can make through the collimator bore
    pub fn collimator_half_angle(&self) -> f64 {
        (self.collimator_radius / self.collimator_length).atan()
    }
}
