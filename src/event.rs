//! Simulation events and their synchronous delivery.
//!
//! The trajectory engine owns an [`EventBus`] for the duration of a run and
//! emits one [`Event`] per step outcome. Listeners see the electron state by
//! reference and never hold on to it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::RegionId;
use crate::listener::Listener;
use crate::math::{joules_to_ev, Vector3};

/// Electron as observed by listeners at the moment of an event.
#[derive(Clone, Debug, PartialEq)]
pub struct ElectronState {
    /// Position after the step (m).
    pub position: Vector3,
    /// Position before the step (m).
    pub prev_position: Vector3,
    /// Kinetic energy (J).
    pub energy: f64,
    /// Region containing `position`; `None` in vacuum.
    pub region: Option<RegionId>,
    /// Index of that region when it is indexed (voxel grids and voxels).
    pub region_index: Option<usize>,
}

impl ElectronState {
    pub fn new(position: Vector3, prev_position: Vector3, energy: f64) -> Self {
        Self { position, prev_position, energy, region: None, region_index: None }
    }

    pub fn with_region(mut self, region: Option<RegionId>, index: Option<usize>) -> Self {
        self.region = region;
        self.region_index = index;
        self
    }

    pub fn energy_ev(&self) -> f64 {
        joules_to_ev(self.energy)
    }
}

/// Characteristic line, ordered by element then line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct XRayTransition {
    pub atomic_number: u32,
    pub line: u32,
}

impl XRayTransition {
    pub fn new(atomic_number: u32, line: u32) -> Self {
        Self { atomic_number, line }
    }
}

impl fmt::Display for XRayTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z{}:{}", self.atomic_number, self.line)
    }
}

/// One photon packet produced during a step.
#[derive(Clone, Debug, PartialEq)]
pub struct XRay {
    /// `None` for bremsstrahlung and other non-characteristic photons.
    pub transition: Option<XRayTransition>,
    /// Generation point (m).
    pub position: Vector3,
    /// Intensity leaving the sample.
    pub intensity: f64,
    /// Intensity at generation, before absorption.
    pub generated: f64,
}

impl XRay {
    pub fn characteristic(transition: XRayTransition, position: Vector3, intensity: f64, generated: f64) -> Self {
        Self { transition: Some(transition), position, intensity, generated }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Event<'a> {
    FirstTrajectory,
    LastTrajectory,
    TrajectoryStart(&'a ElectronState),
    TrajectoryEnd(&'a ElectronState),
    Scatter(&'a ElectronState),
    Backscatter(&'a ElectronState),
    StartSecondary(&'a ElectronState),
    EndSecondary(&'a ElectronState),
    XRayGeneration(&'a [XRay]),
}

impl Event<'_> {
    /// Electron carried by the event, if any.
    pub fn electron(&self) -> Option<&ElectronState> {
        match *self {
            Event::TrajectoryStart(e)
            | Event::TrajectoryEnd(e)
            | Event::Scatter(e)
            | Event::Backscatter(e)
            | Event::StartSecondary(e)
            | Event::EndSecondary(e) => Some(e),
            _ => None,
        }
    }
}

/// Ordered, synchronous fan-out of events to borrowed listeners.
#[derive(Default)]
pub struct EventBus<'l> {
    listeners: Vec<&'l mut dyn Listener>,
}

impl<'l> EventBus<'l> {
    pub fn new() -> Self {
        Self { listeners: Vec::new() }
    }

    pub fn register(&mut self, listener: &'l mut dyn Listener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to every listener in registration order.
    pub fn emit(&mut self, event: Event<'_>) {
        for l in self.listeners.iter_mut() {
            l.on_event(&event);
        }
    }
}

impl fmt::Debug for EventBus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus").field("listeners", &self.listeners.len()).finish()
    }
}
