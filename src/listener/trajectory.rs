//! Records every interaction point of every trajectory.

use log::{debug, warn};

use super::{Detector, Listener};
use crate::event::{ElectronState, Event};
use crate::math::Vector3;

/// How a trajectory ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExitState {
    /// Still in flight.
    #[default]
    Unknown,
    Backscattered,
    Absorbed,
}

impl ExitState {
    /// Numeric code used in exported results.
    pub fn code(self) -> i32 {
        match self {
            ExitState::Unknown => -1,
            ExitState::Backscattered => 2,
            ExitState::Absorbed => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Interaction {
    pub position: Vector3,
    pub energy_ev: f64,
    pub region_index: Option<usize>,
}

impl Interaction {
    fn from_state(state: &ElectronState) -> Self {
        Self { position: state.position, energy_ev: state.energy_ev(), region_index: state.region_index }
    }

    /// `[x, y, z, energy (eV), 0, region index or -1]`.
    ///
    /// Column 4 is always zero; it keeps the exported layout stable for
    /// readers that expect six columns.
    pub fn to_row(&self) -> [f64; 6] {
        let index = self.region_index.map_or(-1.0, |i| i as f64);
        [self.position.x, self.position.y, self.position.z, self.energy_ev, 0.0, index]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub primary: bool,
    /// Collision type that created the electron: `-1` for a primary,
    /// `3` (hard inelastic) for a secondary.
    pub collision: i32,
    pub interactions: Vec<Interaction>,
    pub exit_state: ExitState,
}

impl Trajectory {
    fn start(primary: bool, state: &ElectronState) -> Self {
        Self {
            primary,
            collision: if primary { -1 } else { 3 },
            interactions: vec![Interaction::from_state(state)],
            exit_state: ExitState::Unknown,
        }
    }
}

/// Trajectory recorder.
///
/// Secondaries nest inside their primary, so open trajectories live on a
/// stack; the innermost one receives scatter and backscatter events.
#[derive(Clone, Debug)]
pub struct TrajectoryListener {
    record_secondary: bool,
    open: Vec<Trajectory>,
    trajectories: Vec<Trajectory>,
}

impl TrajectoryListener {
    pub fn new(record_secondary: bool) -> Self {
        Self { record_secondary, open: Vec::new(), trajectories: Vec::new() }
    }

    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    fn close(&mut self) {
        let Some(mut t) = self.open.pop() else {
            warn!("trajectory end without a matching start");
            return;
        };
        if !t.primary && !self.record_secondary {
            return;
        }
        if t.exit_state == ExitState::Unknown {
            t.exit_state = ExitState::Absorbed;
        }
        self.trajectories.push(t);
    }
}

impl Listener for TrajectoryListener {
    fn on_event(&mut self, event: &Event<'_>) {
        match event {
            Event::TrajectoryStart(e) => self.open.push(Trajectory::start(true, e)),
            Event::StartSecondary(e) => self.open.push(Trajectory::start(false, e)),
            Event::TrajectoryEnd(_) | Event::EndSecondary(_) => self.close(),
            Event::Scatter(e) => {
                if let Some(t) = self.open.last_mut() {
                    t.interactions.push(Interaction::from_state(e));
                }
            }
            Event::Backscatter(_) => {
                if let Some(t) = self.open.last_mut() {
                    t.exit_state = ExitState::Backscattered;
                }
            }
            _ => {}
        }
    }
}

impl Detector for TrajectoryListener {
    fn name(&self) -> &str {
        "trajectory"
    }

    fn reset(&mut self) {
        debug!("discarding {} recorded trajectories", self.trajectories.len());
        self.open.clear();
        self.trajectories.clear();
    }
}
