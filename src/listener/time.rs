use std::io::{self, Write};
use std::time::{Duration, Instant};

use super::{Detector, Listener};
use crate::event::Event;

/// Wall-clock timing of a run and of its trajectories.
#[derive(Clone, Debug, Default)]
pub struct TimeListener {
    run_start: Option<Instant>,
    elapsed: Duration,
    trajectory_start: Option<Instant>,
    sum: f64,
    sum_sq: f64,
    count: u64,
}

impl TimeListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration of the last complete run, in seconds.
    pub fn simulation_time(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn trajectory_count(&self) -> u64 {
        self.count
    }

    /// Mean and standard deviation of the trajectory time, in seconds.
    pub fn mean_trajectory_time(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        let var = (self.sum_sq / n - mean * mean).max(0.0);
        Some((mean, var.sqrt()))
    }

    pub fn dump<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "Simulation time: {} s", self.simulation_time())?;
        if let Some((mean, std)) = self.mean_trajectory_time() {
            writeln!(out, "Average trajectory time: {} +- {} s", mean, std)?;
        }
        out.flush()
    }
}

impl Listener for TimeListener {
    fn on_event(&mut self, event: &Event<'_>) {
        match event {
            Event::FirstTrajectory => {
                *self = Self::default();
                self.run_start = Some(Instant::now());
            }
            Event::LastTrajectory => {
                if let Some(start) = self.run_start {
                    self.elapsed = start.elapsed();
                }
            }
            Event::TrajectoryStart(_) => self.trajectory_start = Some(Instant::now()),
            Event::TrajectoryEnd(_) => {
                if let Some(start) = self.trajectory_start.take() {
                    let t = start.elapsed().as_secs_f64();
                    self.sum += t;
                    self.sum_sq += t * t;
                    self.count += 1;
                }
            }
            _ => {}
        }
    }
}

impl Detector for TimeListener {
    fn name(&self) -> &str {
        "time"
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
