//! Characteristic x-ray distributions, keyed per transition.
//!
//! Both listeners keep two maps with the same keys: the emitted intensity
//! (after absorption on the way out) and the generated intensity. A
//! histogram is created the first time a transition is seen; asking for an
//! unseen transition returns an empty histogram of the right shape.

use std::collections::BTreeMap;

use super::plane::ReferencePlane;
use super::{Detector, Listener};
use crate::error::Result;
use crate::event::{Event, XRay, XRayTransition};
use crate::histogram::{BinAxis, HistogramWeighted1D, HistogramWeighted3D, RadialBinPolicy};
use crate::math::Vector3;

fn record<H: Clone>(
    map: &mut BTreeMap<XRayTransition, H>,
    template: &H,
    transition: XRayTransition,
    add: impl FnOnce(&mut H),
) {
    add(map.entry(transition).or_insert_with(|| template.clone()));
}

/// Radial distribution of x-ray generation around the beam axis.
#[derive(Clone, Debug)]
pub struct PhotonRadialListener {
    plane: ReferencePlane,
    empty: HistogramWeighted1D,
    emitted: BTreeMap<XRayTransition, HistogramWeighted1D>,
    generated: BTreeMap<XRayTransition, HistogramWeighted1D>,
}

impl PhotonRadialListener {
    pub fn new(center: Vector3, normal: Vector3, rmax: f64, bins: usize, policy: RadialBinPolicy) -> Result<Self> {
        let axis = BinAxis::from_edges(&policy.edges(rmax, bins)?, rmax)?;
        Ok(Self {
            plane: ReferencePlane::new(center, normal)?,
            empty: HistogramWeighted1D::from_axis(axis),
            emitted: BTreeMap::new(),
            generated: BTreeMap::new(),
        })
    }

    fn add_xrays(&mut self, xrays: &[XRay]) {
        for x in xrays {
            let Some(t) = x.transition else { continue };
            let r = self.plane.radius_of(&x.position);
            record(&mut self.emitted, &self.empty, t, |h| h.add(r, x.intensity));
            record(&mut self.generated, &self.empty, t, |h| h.add(r, x.generated));
        }
    }

    pub fn emitted_distribution(&self, transition: XRayTransition) -> HistogramWeighted1D {
        self.emitted.get(&transition).unwrap_or(&self.empty).snapshot()
    }

    pub fn generated_distribution(&self, transition: XRayTransition) -> HistogramWeighted1D {
        self.generated.get(&transition).unwrap_or(&self.empty).snapshot()
    }

    /// Transitions seen since the last reset, in ascending order.
    pub fn transitions(&self) -> Vec<XRayTransition> {
        self.generated.keys().copied().collect()
    }
}

impl Listener for PhotonRadialListener {
    fn on_event(&mut self, event: &Event<'_>) {
        match event {
            Event::FirstTrajectory => {
                self.emitted.clear();
                self.generated.clear();
            }
            Event::XRayGeneration(xrays) => self.add_xrays(xrays),
            _ => {}
        }
    }
}

impl Detector for PhotonRadialListener {
    fn name(&self) -> &str {
        "photon_radial"
    }

    fn reset(&mut self) {
        self.emitted.clear();
        self.generated.clear();
    }
}

/// 3-D map of x-ray generation positions.
#[derive(Clone, Debug)]
pub struct PhotonEmissionMapListener {
    empty: HistogramWeighted3D,
    emitted: BTreeMap<XRayTransition, HistogramWeighted3D>,
    generated: BTreeMap<XRayTransition, HistogramWeighted3D>,
}

impl PhotonEmissionMapListener {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x_min: f64,
        x_max: f64,
        x_bins: usize,
        y_min: f64,
        y_max: f64,
        y_bins: usize,
        z_min: f64,
        z_max: f64,
        z_bins: usize,
    ) -> Result<Self> {
        Ok(Self {
            empty: HistogramWeighted3D::new(x_min, x_max, x_bins, y_min, y_max, y_bins, z_min, z_max, z_bins)?,
            emitted: BTreeMap::new(),
            generated: BTreeMap::new(),
        })
    }

    pub fn emitted_distribution(&self, transition: XRayTransition) -> HistogramWeighted3D {
        self.emitted.get(&transition).unwrap_or(&self.empty).snapshot()
    }

    pub fn generated_distribution(&self, transition: XRayTransition) -> HistogramWeighted3D {
        self.generated.get(&transition).unwrap_or(&self.empty).snapshot()
    }

    pub fn transitions(&self) -> Vec<XRayTransition> {
        self.generated.keys().copied().collect()
    }
}

impl Listener for PhotonEmissionMapListener {
    fn on_event(&mut self, event: &Event<'_>) {
        match event {
            Event::FirstTrajectory => {
                self.emitted.clear();
                self.generated.clear();
            }
            Event::XRayGeneration(xrays) => {
                for x in xrays.iter() {
                    let Some(t) = x.transition else { continue };
                    let p = x.position;
                    record(&mut self.emitted, &self.empty, t, |h| h.add(p.x, p.y, p.z, x.intensity));
                    record(&mut self.generated, &self.empty, t, |h| h.add(p.x, p.y, p.z, x.generated));
                }
            }
            _ => {}
        }
    }
}

impl Detector for PhotonEmissionMapListener {
    fn name(&self) -> &str {
        "photon_emission_map"
    }

    fn reset(&mut self) {
        self.emitted.clear();
        self.generated.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::z_axis;
    use approx::assert_relative_eq;

    fn ka(z: u32) -> XRayTransition {
        XRayTransition::new(z, 0)
    }

    #[test]
    fn radial_maps_per_transition() {
        let mut l = PhotonRadialListener::new(Vector3::zeros(), z_axis(), 4.0, 4, RadialBinPolicy::EqualWidth).unwrap();
        let xrays = vec![
            XRay::characteristic(ka(29), Vector3::new(0.0, 1.5, -2.0), 0.5, 1.0),
            XRay::characteristic(ka(29), Vector3::new(1.2, 0.0, -1.0), 0.25, 1.0),
            XRay::characteristic(ka(6), Vector3::new(3.5, 0.0, -1.0), 0.1, 0.2),
            XRay { transition: None, position: Vector3::zeros(), intensity: 9.0, generated: 9.0 },
        ];
        l.on_event(&Event::XRayGeneration(&xrays));

        assert_eq!(l.transitions(), vec![ka(6), ka(29)]);
        let cu = l.emitted_distribution(ka(29));
        assert_relative_eq!(cu.sum(1), 0.75);
        assert_relative_eq!(l.generated_distribution(ka(29)).total_sum(), 2.0);
        assert_relative_eq!(l.generated_distribution(ka(6)).sum(3), 0.2);

        let unseen = l.emitted_distribution(ka(14));
        assert_eq!(unseen.bin_count(), 4);
        assert_eq!(unseen.total_sum(), 0.0);

        l.on_event(&Event::FirstTrajectory);
        assert!(l.transitions().is_empty());
    }

    #[test]
    fn emission_map_bins_generation_point() {
        let mut l = PhotonEmissionMapListener::new(-1.0, 1.0, 2, -1.0, 1.0, 2, -2.0, 0.0, 4).unwrap();
        let xrays = [XRay::characteristic(ka(29), Vector3::new(0.5, -0.5, -0.25), 0.4, 0.8)];
        l.on_event(&Event::XRayGeneration(&xrays));
        assert_relative_eq!(l.emitted_distribution(ka(29)).sum(1, 0, 3), 0.4);
        assert_relative_eq!(l.generated_distribution(ka(29)).sum(1, 0, 3), 0.8);
        assert_eq!(l.transitions(), vec![ka(29)]);
    }
}
