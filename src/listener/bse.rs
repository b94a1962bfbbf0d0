//! Backscattered-electron distributions.

use log::debug;

use super::plane::ReferencePlane;
use super::{Detector, Listener, SetupContext};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::histogram::{make_bins, BinAxis, Histogram1D, Histogram2D, Histogram3D, RadialBinPolicy};
use crate::math::{z_axis, Vector3};

fn radial_axis(rmax: f64, bins: usize, policy: RadialBinPolicy) -> Result<BinAxis> {
    BinAxis::from_edges(&policy.edges(rmax, bins)?, rmax)
}

/// Radial distribution of backscattered electrons around the beam axis.
#[derive(Clone, Debug)]
pub struct BseRadialListener {
    plane: ReferencePlane,
    distribution: Histogram1D,
}

impl BseRadialListener {
    pub fn new(center: Vector3, normal: Vector3, rmax: f64, bins: usize, policy: RadialBinPolicy) -> Result<Self> {
        Ok(Self {
            plane: ReferencePlane::new(center, normal)?,
            distribution: Histogram1D::from_axis(radial_axis(rmax, bins, policy)?),
        })
    }

    pub fn plane(&self) -> &ReferencePlane {
        &self.plane
    }

    pub fn distribution(&self) -> Histogram1D {
        self.distribution.snapshot()
    }
}

impl Listener for BseRadialListener {
    fn on_event(&mut self, event: &Event<'_>) {
        match event {
            Event::FirstTrajectory => self.distribution.clear(),
            Event::Backscatter(e) => {
                if let Some(r) = self.plane.radius_at_step_start(e) {
                    self.distribution.add(r);
                }
            }
            _ => {}
        }
    }
}

impl Detector for BseRadialListener {
    fn name(&self) -> &str {
        "bse_radial_distribution"
    }

    fn reset(&mut self) {
        self.distribution.clear();
    }
}

/// Joint distribution of backscatter radius and energy (eV).
#[derive(Clone, Debug)]
pub struct BseRadialEnergyListener {
    plane: ReferencePlane,
    distribution: Histogram2D,
}

impl BseRadialEnergyListener {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        center: Vector3,
        normal: Vector3,
        e_min: f64,
        e_max: f64,
        e_bins: usize,
        rmax: f64,
        r_bins: usize,
        policy: RadialBinPolicy,
    ) -> Result<Self> {
        let r_axis = radial_axis(rmax, r_bins, policy)?;
        let e_axis = BinAxis::from_edges(&make_bins(e_min, e_max, e_bins)?, e_max)?;
        Ok(Self {
            plane: ReferencePlane::new(center, normal)?,
            distribution: Histogram2D::from_axes(r_axis, e_axis),
        })
    }

    pub fn distribution(&self) -> Histogram2D {
        self.distribution.snapshot()
    }
}

impl Listener for BseRadialEnergyListener {
    fn on_event(&mut self, event: &Event<'_>) {
        match event {
            Event::FirstTrajectory => self.distribution.clear(),
            Event::Backscatter(e) => {
                if let Some(r) = self.plane.radius_at_step_start(e) {
                    self.distribution.add(r, e.energy_ev());
                }
            }
            _ => {}
        }
    }
}

impl Detector for BseRadialEnergyListener {
    fn name(&self) -> &str {
        "bse_radial_energy"
    }

    fn reset(&mut self) {
        self.distribution.clear();
    }
}

/// Backscatter energy spectrum per image pixel.
///
/// The image is `width x height` pixels of size `dx x dy` centred on
/// `(x0, y0)`; each backscattered electron is binned at the lateral position
/// it had before leaving the sample.
#[derive(Clone, Debug)]
pub struct BseEnergyHyperMapListener {
    distribution: Histogram3D,
}

impl BseEnergyHyperMapListener {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: usize,
        height: usize,
        x0: f64,
        y0: f64,
        dx: f64,
        dy: f64,
        e_min: f64,
        e_max: f64,
        bins: usize,
    ) -> Result<Self> {
        let half_x = width as f64 * dx / 2.0;
        let half_y = height as f64 * dy / 2.0;
        let distribution =
            Histogram3D::new(x0 - half_x, x0 + half_x, width, y0 - half_y, y0 + half_y, height, e_min, e_max, bins)?;
        Ok(Self { distribution })
    }

    pub fn distribution(&self) -> Histogram3D {
        self.distribution.snapshot()
    }
}

impl Listener for BseEnergyHyperMapListener {
    fn on_event(&mut self, event: &Event<'_>) {
        match event {
            Event::FirstTrajectory => self.distribution.clear(),
            Event::Backscatter(e) => {
                let p = e.prev_position;
                self.distribution.add(p.x, p.y, e.energy_ev());
            }
            _ => {}
        }
    }
}

impl Detector for BseEnergyHyperMapListener {
    fn name(&self) -> &str {
        "bse_energy_hyper_map"
    }

    fn reset(&mut self) {
        self.distribution.clear();
    }
}

/// Radial backscatter detector sized from the simulation at setup.
///
/// The maximum radius is the largest lateral extent of the trajectory volume
/// plus half the beam diameter; bins are equal-area around the beam centre
/// with a `+z` surface normal.
#[derive(Clone, Debug)]
pub struct BseRadialDetector {
    name: String,
    channels: usize,
    listener: Option<BseRadialListener>,
}

impl BseRadialDetector {
    pub fn new(name: impl Into<String>, channels: usize) -> Result<Self> {
        if channels < 1 {
            return Err(Error::invalid(format!("channels < 1: {}", channels)));
        }
        Ok(Self { name: name.into(), channels, listener: None })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `None` until `setup` has run.
    pub fn distribution(&self) -> Option<Histogram1D> {
        self.listener.as_ref().map(BseRadialListener::distribution)
    }

    /// `(bin centre, count)` for each channel.
    pub fn results(&self) -> Vec<(f64, u64)> {
        let Some(hist) = self.listener.as_ref().map(|l| &l.distribution) else {
            return Vec::new();
        };
        (0..self.channels as isize).map(|i| (hist.mid_value(i), hist.counts(i))).collect()
    }
}

impl Listener for BseRadialDetector {
    fn on_event(&mut self, event: &Event<'_>) {
        if let Some(l) = self.listener.as_mut() {
            l.on_event(event);
        }
    }
}

impl Detector for BseRadialDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, ctx: &SetupContext) -> Result<()> {
        let (c0, c1) = &ctx.trajectory_volume;
        let rmax = [c0.x, c0.y, c1.x, c1.y].into_iter().map(f64::abs).fold(0.0, f64::max) + ctx.beam_diameter / 2.0;
        debug!("{}: radial detector rmax {:e} m over {} channels", self.name, rmax, self.channels);
        self.listener = Some(BseRadialListener::new(
            ctx.beam_center,
            z_axis(),
            rmax,
            self.channels,
            RadialBinPolicy::EqualArea,
        )?);
        Ok(())
    }

    fn reset(&mut self) {
        if let Some(l) = self.listener.as_mut() {
            l.distribution.clear();
        }
    }
}
