use approx::assert_relative_eq;
use probe_voxel::histogram::{calculate_bin_mins, BinAxis, Histogram1D, Histogram2D, HistogramWeighted3D};

#[test]
fn histogram_2d_example() {
    let mut h = Histogram2D::new(0.0, 5.0, 5, 100.0, 150.0, 10).unwrap();
    h.add(1.0, 125.0);
    assert_eq!(h.counts(1, 5), 1);
    assert_eq!(h.x_bin_count(), 5);
    assert_eq!(h.y_bin_count(), 10);
    assert_eq!(h.x_min_value(1), 1.0);
    assert_eq!(h.x_max_value(1), 2.0);
}

#[test]
fn bin_edge_invariant() {
    let edges = [0.0, 0.5, 2.0, 3.0];
    let axis = BinAxis::from_edges(&edges, 10.0).unwrap();
    for (i, &e) in edges.iter().enumerate() {
        assert_eq!(axis.bin(e), i as isize);
    }
    assert_eq!(axis.bin(-1e-12), -1);
    assert_eq!(axis.bin(10.0 - 1e-9), 3);
    assert_eq!(axis.bin(10.0), 4);
    assert_eq!(axis.bin(1e9), 4);
}

#[test]
fn edge_at_or_above_max_is_rejected() {
    assert!(BinAxis::from_edges(&[0.0, 1.0, 2.0], 2.0).is_err());
    assert!(BinAxis::from_edges(&[0.0, 3.0], 2.0).is_err());
    assert!(Histogram1D::new(1.0, 1.0, 3).is_err());
    assert!(Histogram1D::new(0.0, 1.0, 0).is_err());
}

#[test]
fn clone_is_independent() {
    let mut h = Histogram1D::new(0.0, 10.0, 10).unwrap();
    h.add(3.0);
    let mut c = h.clone();
    c.add(4.0);
    c.add(-1.0);
    assert_eq!(h.total_count(), 1);
    assert_eq!(c.total_count(), 3);
}

#[test]
fn clear_is_idempotent() {
    let mut h = Histogram2D::new(0.0, 1.0, 4, 0.0, 1.0, 4).unwrap();
    h.add(0.5, 0.5);
    h.add(2.0, -2.0);
    h.clear();
    h.clear();
    assert_eq!(h.total_count(), 0);
}

#[test]
fn projections_conserve_counts() {
    let mut h = Histogram2D::new(0.0, 5.0, 5, 100.0, 150.0, 10).unwrap();
    let samples = [(1.0, 125.0), (-3.0, 101.0), (4.9, 200.0), (2.2, 99.0), (2.2, 149.9)];
    for (x, y) in samples {
        h.add(x, y);
    }
    let px = h.x_projection();
    let py = h.y_projection();
    assert_eq!(px.total_count(), h.total_count());
    assert_eq!(py.total_count(), h.total_count());
    assert_eq!(px.underrange(), 1);
    assert_eq!(px.counts(2), 2);
    assert_eq!(py.overrange(), 1);
    assert_eq!(py.underrange(), 1);
}

#[test]
fn radial_bins_scenario() {
    let width = calculate_bin_mins(100.0, 10, false).unwrap();
    assert_eq!(width, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]);

    let area = calculate_bin_mins(100.0, 10, true).unwrap();
    assert_relative_eq!(area[1], 31.6228, epsilon = 1e-4);
    let h = Histogram1D::with_edges(&area, 100.0).unwrap();
    let a0 = h.max_value(0).powi(2) - h.min_value(0).powi(2);
    let a1 = h.max_value(1).powi(2) - h.min_value(1).powi(2);
    assert_relative_eq!(a0, a1, epsilon = 1e-9);
}

#[test]
fn weighted_3d_sums() {
    let mut h = HistogramWeighted3D::new(0.0, 2.0, 2, 0.0, 2.0, 2, 0.0, 2.0, 2).unwrap();
    h.add(0.5, 1.5, 1.5, 0.25);
    h.add(0.5, 1.5, 1.5, 0.5);
    h.add(5.0, 0.0, 0.0, 1.0);
    assert_relative_eq!(h.sum(0, 1, 1), 0.75);
    assert_relative_eq!(h.sum(2, 0, 0), 1.0);
    assert_relative_eq!(h.total_sum(), 1.75);
}

#[test]
fn dump_writes_sentinels() {
    let mut h = Histogram1D::new(0.0, 2.0, 2).unwrap();
    h.add(0.5);
    h.add(7.0);
    let mut out = Vec::new();
    h.dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["-inf,0", "0,1", "1,0", "2,1"]);
}
