use probe_voxel::config::{BuiltDetector, DetectorSpec, MaterialSpec};
use probe_voxel::geometry::{BasicMaterialModel, Everywhere, RegionTree};
use probe_voxel::math::ev_to_joules;
use probe_voxel::{
    Detector, ElectronState, Event, EventBus, RadialBinPolicy, SetupContext, Vector3, XRay, XRayTransition,
};

use approx::assert_relative_eq;

#[test]
fn material_spec_builds_grid() {
    let json = r#"{
        "grid": { "x0": 0.0, "x1": 2.0, "nx": 2, "y0": 0.0, "y1": 2.0, "ny": 2, "z0": -2.0, "nz": 2 },
        "surrounding": { "name": "Si", "density": 2329.0 },
        "fill": { "name": "C", "density": 2260.0 },
        "voxels": [ { "i": 1, "j": 0, "k": 1, "material": { "name": "Cu", "density": 8960.0 } } ]
    }"#;
    let spec: MaterialSpec = serde_json::from_str(json).unwrap();
    assert_eq!(spec.grid.z1, 0.0);

    let mut tree = RegionTree::new(Box::new(Everywhere), BasicMaterialModel::null());
    let root = tree.root();
    let grid = spec.build(&mut tree, root).unwrap();

    let name = |p: Vector3| {
        let r = tree.containing_region(&p).unwrap();
        tree.scatter_model(r).material().name.clone()
    };
    assert_eq!(name(Vector3::new(1.5, 0.5, -0.5)), "Cu");
    assert_eq!(name(Vector3::new(0.5, 0.5, -0.5)), "C");
    assert_eq!(name(Vector3::new(5.0, 0.5, -0.5)), "Si");
    assert_eq!(tree.children(grid).len(), 8);
}

#[test]
fn out_of_range_voxel_fails_build() {
    let json = r#"{
        "grid": { "x0": 0.0, "x1": 1.0, "nx": 1, "y0": 0.0, "y1": 1.0, "ny": 1, "z0": -1.0, "nz": 1 },
        "voxels": [ { "i": 3, "j": 0, "k": 0, "material": { "name": "Cu", "density": 8960.0 } } ]
    }"#;
    let spec: MaterialSpec = serde_json::from_str(json).unwrap();
    let mut tree = RegionTree::new(Box::new(Everywhere), BasicMaterialModel::null());
    let root = tree.root();
    assert!(spec.build(&mut tree, root).is_err());
}

const DETECTORS: &str = r#"[
    { "kind": "bse_radial", "channels": 8 },
    { "kind": "photon_radial", "radial": { "rmax": 1e-6, "bins": 20 } },
    { "kind": "bse_radial_energy", "radial": { "rmax": 1e-6, "bins": 5, "policy": "equal_width" },
      "e_min": 0.0, "e_max": 20000.0, "e_bins": 100 },
    { "kind": "bse_energy_hyper_map", "width": 10, "height": 10, "dx": 1e-7, "dy": 1e-7,
      "e_min": 0.0, "e_max": 20000.0, "e_bins": 100 },
    { "kind": "photon_emission_map", "x": [-1e-6, 1e-6, 10], "y": [-1e-6, 1e-6, 10], "z": [-2e-6, 0.0, 10] },
    { "kind": "trajectory", "secondary": true },
    { "kind": "time" }
]"#;

fn micron_cube() -> SetupContext {
    SetupContext::new((Vector3::new(-1e-6, -1e-6, -1e-6), Vector3::new(1e-6, 1e-6, 0.0)), Vector3::zeros(), 0.0)
}

fn cu_ka() -> XRayTransition {
    XRayTransition::new(29, 0)
}

/// One backscattered primary that also generated a Cu K-alpha photon.
fn run_one_trajectory(built: &mut [BuiltDetector]) {
    let e = ElectronState::new(Vector3::new(0.0, 0.0, 1e-9), Vector3::new(2.5e-7, 5e-8, 0.0), ev_to_joules(5_100.0));
    let xrays = [XRay::characteristic(cu_ka(), Vector3::new(3e-7, 5e-8, -1e-7), 0.5, 1.0)];
    let events = [
        Event::FirstTrajectory,
        Event::TrajectoryStart(&e),
        Event::XRayGeneration(&xrays),
        Event::Backscatter(&e),
        Event::TrajectoryEnd(&e),
        Event::LastTrajectory,
    ];
    let mut bus = EventBus::new();
    for d in built.iter_mut() {
        bus.register(d.as_listener());
    }
    for event in events {
        bus.emit(event);
    }
}

#[test]
fn detector_specs_parse_and_build() {
    let specs: Vec<DetectorSpec> = serde_json::from_str(DETECTORS).unwrap();
    assert_eq!(specs.len(), 7);
    match &specs[1] {
        DetectorSpec::PhotonRadial { normal, radial, .. } => {
            assert_eq!(*normal, [0.0, 0.0, 1.0]);
            assert_eq!(radial.policy, RadialBinPolicy::EqualArea);
        }
        other => panic!("unexpected spec {:?}", other),
    }
    match &specs[3] {
        DetectorSpec::BseEnergyHyperMap { x0, y0, width, .. } => assert_eq!((*x0, *y0, *width), (0.0, 0.0, 10)),
        other => panic!("unexpected spec {:?}", other),
    }

    let mut built: Vec<BuiltDetector> = specs.iter().map(|s| s.build("det").unwrap()).collect();
    let ctx = micron_cube();
    for d in built.iter_mut() {
        d.as_detector().setup(&ctx).unwrap();
    }
    run_one_trajectory(&mut built);

    let BuiltDetector::BseRadial(d) = &built[0] else { panic!("expected bse_radial") };
    // r = 2.55e-7 falls in the first of 8 equal-area rings out to 1e-6.
    assert_eq!(d.distribution().unwrap().counts(0), 1);
    assert_eq!(d.results()[0].1, 1);

    let BuiltDetector::PhotonRadial(d) = &built[1] else { panic!("expected photon_radial") };
    assert_eq!(d.transitions(), vec![cu_ka()]);
    assert_relative_eq!(d.emitted_distribution(cu_ka()).sum(1), 0.5);
    assert_relative_eq!(d.generated_distribution(cu_ka()).sum(1), 1.0);

    let BuiltDetector::BseRadialEnergy(d) = &built[2] else { panic!("expected bse_radial_energy") };
    let h = d.distribution();
    assert_eq!(h.counts(1, 25), 1);
    assert_eq!(h.total_count(), 1);

    let BuiltDetector::BseEnergyHyperMap(d) = &built[3] else { panic!("expected bse_energy_hyper_map") };
    let h = d.distribution();
    assert_eq!(h.counts(7, 5, 25), 1);
    assert_eq!(h.total_count(), 1);

    let BuiltDetector::PhotonEmissionMap(d) = &built[4] else { panic!("expected photon_emission_map") };
    assert_relative_eq!(d.generated_distribution(cu_ka()).sum(6, 5, 9), 1.0);

    let BuiltDetector::Trajectory(d) = &built[5] else { panic!("expected trajectory") };
    assert_eq!(d.trajectories().len(), 1);
    assert_eq!(d.trajectories()[0].exit_state.code(), 2);

    let BuiltDetector::Time(d) = &built[6] else { panic!("expected time") };
    assert_eq!(d.trajectory_count(), 1);
}

#[test]
fn built_detectors_reset_between_runs() {
    let specs: Vec<DetectorSpec> = serde_json::from_str(DETECTORS).unwrap();
    let mut built: Vec<BuiltDetector> = specs.iter().map(|s| s.build("det").unwrap()).collect();
    let ctx = micron_cube();
    for d in built.iter_mut() {
        d.as_detector().setup(&ctx).unwrap();
    }
    run_one_trajectory(&mut built);

    let snapshot = match &built[2] {
        BuiltDetector::BseRadialEnergy(d) => d.distribution(),
        _ => panic!("expected bse_radial_energy"),
    };
    let names: Vec<String> = built.iter_mut().map(|d| d.as_detector().name().to_string()).collect();
    assert_eq!(names[0], "det");
    assert_eq!(names[3], "bse_energy_hyper_map");

    for d in built.iter_mut() {
        d.as_detector().reset();
    }
    assert_eq!(snapshot.counts(1, 25), 1);
    for d in &built {
        match d {
            BuiltDetector::BseRadial(d) => assert_eq!(d.distribution().unwrap().total_count(), 0),
            BuiltDetector::BseRadialDistribution(d) => assert_eq!(d.distribution().total_count(), 0),
            BuiltDetector::BseRadialEnergy(d) => assert_eq!(d.distribution().total_count(), 0),
            BuiltDetector::BseEnergyHyperMap(d) => assert_eq!(d.distribution().total_count(), 0),
            BuiltDetector::PhotonRadial(d) => assert!(d.transitions().is_empty()),
            BuiltDetector::PhotonEmissionMap(d) => assert!(d.transitions().is_empty()),
            BuiltDetector::Trajectory(d) => assert!(d.trajectories().is_empty()),
            BuiltDetector::Time(d) => assert_eq!(d.trajectory_count(), 0),
        }
    }
}

#[test]
fn radial_detector_from_spec_needs_setup() {
    let spec: DetectorSpec = serde_json::from_str(r#"{ "kind": "bse_radial", "channels": 4 }"#).unwrap();
    let BuiltDetector::BseRadial(mut d) = spec.build("bse").unwrap() else {
        panic!("expected a radial detector");
    };
    assert_eq!(d.name(), "bse");
    let ctx = micron_cube();
    d.setup(&ctx).unwrap();
    let h = d.distribution().unwrap();
    assert_eq!(h.bin_count(), 4);
    assert_eq!(h.axis().max(), 1e-6);
}
