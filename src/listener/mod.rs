//! Passive observers that turn simulation events into histograms and logs.

pub mod bse;
pub mod photon;
pub mod plane;
pub mod time;
pub mod trajectory;

pub use bse::{BseEnergyHyperMapListener, BseRadialDetector, BseRadialEnergyListener, BseRadialListener};
pub use photon::{PhotonEmissionMapListener, PhotonRadialListener};
pub use plane::ReferencePlane;
pub use time::TimeListener;
pub use trajectory::{ExitState, Interaction, Trajectory, TrajectoryListener};

use crate::error::Result;
use crate::event::Event;
use crate::math::Vector3;

/// Receives every event emitted on the bus it is registered with.
pub trait Listener {
    fn on_event(&mut self, event: &Event<'_>);
}

/// What a detector may inspect before the first trajectory.
#[derive(Clone, Debug, PartialEq)]
pub struct SetupContext {
    /// Opposite corners of the box expected to contain every trajectory (m).
    pub trajectory_volume: (Vector3, Vector3),
    pub beam_center: Vector3,
    /// Beam diameter (m); zero for a point beam.
    pub beam_diameter: f64,
}

impl SetupContext {
    pub fn new(trajectory_volume: (Vector3, Vector3), beam_center: Vector3, beam_diameter: f64) -> Self {
        Self { trajectory_volume, beam_center, beam_diameter }
    }
}

/// A named listener with a result lifecycle.
///
/// `setup` runs once before the run and may size histograms from the
/// simulation geometry. `reset` discards accumulated results.
pub trait Detector: Listener {
    fn name(&self) -> &str;

    fn setup(&mut self, _ctx: &SetupContext) -> Result<()> {
        Ok(())
    }

    fn reset(&mut self);
}
