use super::build::group_quads;
use super::slip::*;
use super::*;
use crate::cfg::RuptureCfg;
use crate::error::RuptureError;
use crate::geo::Point;
use proptest::prelude::*;

// Northridge (Wald et al.), one quad, given against strike.
const NR_LON: [f64; 4] = [-118.421, -118.587, -118.693, -118.527];
const NR_LAT: [f64; 4] = [34.315, 34.401, 34.261, 34.175];
const NR_DEPTH: [f64; 4] = [5.0, 5.0, 20.427, 20.427];

fn northridge_raw() -> Quad {
    let p = |i: usize| Point::new(NR_LON[i], NR_LAT[i], NR_DEPTH[i]);
    Quad::new(p(0), p(1), p(2), p(3))
}

fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[test]
fn northridge_measures() {
    let arena =
        QuadArena::from_vertex_stream(&NR_LON, &NR_LAT, &NR_DEPTH, &RuptureCfg::default())
            .unwrap();
    assert_eq!(arena.len(), 1);
    assert_eq!(arena.num_groups(), 1);
    let q = arena.quads()[0];
    // Winding was swapped: the stream runs against strike.
    assert_eq!(q.p0.lon, NR_LON[1]);
    assert!((q.strike_deg() - 122.06).abs() < 0.01, "{}", q.strike_deg());
    assert!((q.dip_deg() - 40.21).abs() < 0.01, "{}", q.dip_deg());
    assert!((q.length_km() - 17.99).abs() < 0.01, "{}", q.length_km());
    assert!((q.width_km() - 23.94).abs() < 0.01, "{}", q.width_km());
    assert_eq!(q.min_depth(), 5.0);
}

#[test]
fn normal_points_up_after_validation() {
    let q = validate_and_normalize(northridge_raw(), &RuptureCfg::default(), 0, 0).unwrap();
    assert!(q.normal().dot(&q.vertical_vector()) > 0.0);
    // Down-dip is perpendicular to strike and descends.
    assert!(q.down_dip_vector().dot(&q.strike_vector()).abs() < 1e-9);
    assert!(q.down_dip_vector().dot(&q.vertical_vector()) < 0.0);
    // p2 sits on the plane after snapping.
    assert!(offplane_distance_m(&q) < 1e-6);
}

#[test]
fn reversed_input_gives_same_quad() {
    let cfg = RuptureCfg::default();
    let a = validate_and_normalize(northridge_raw(), &cfg, 0, 0).unwrap();
    let b = validate_and_normalize(northridge_raw().reversed(), &cfg, 0, 0).unwrap();
    assert!(angle_diff(a.strike_deg(), b.strike_deg()) < 1e-9);
    assert!((a.dip_deg() - b.dip_deg()).abs() < 1e-6);
}

#[test]
fn rejects_tilted_top_edge() {
    let mut raw = northridge_raw();
    raw.p1.depth += 1.0;
    let err = validate_and_normalize(raw, &RuptureCfg::default(), 3, 2).unwrap_err();
    assert!(matches!(
        err,
        RuptureError::Geometry {
            group: 3,
            quad: 2,
            ..
        }
    ));
}

#[test]
fn rejects_non_planar_quad() {
    let mut raw = northridge_raw();
    raw.p2.lon += 0.01;
    let cfg = RuptureCfg::default();
    assert!(!is_quad(&raw, &cfg));
    let err = validate_and_normalize(raw, &cfg, 0, 0).unwrap_err();
    assert!(err.to_string().contains("not planar"), "{err}");
}

#[test]
fn rejects_degenerate_quad() {
    let p = Point::new(10.0, 10.0, 0.0);
    let raw = Quad::new(p, p, p.at_depth(5.0), p.at_depth(5.0));
    assert!(validate_and_normalize(raw, &RuptureCfg::default(), 0, 0).is_err());
}

#[test]
fn vertex_stream_groups_and_runs() {
    // Two quads in one run (6 vertices), then a one-quad run.
    let lon = [
        0.0, 0.0, 0.0, 0.1, 0.1, 0.1, f64::NAN, 1.0, 1.0, 1.1, 1.1, f64::NAN,
    ];
    let lat = [
        0.0, 0.1, 0.2, 0.2, 0.1, 0.0, f64::NAN, 0.0, 0.1, 0.1, 0.0, f64::NAN,
    ];
    let depth = [
        0.0, 0.0, 0.0, 10.0, 10.0, 10.0, f64::NAN, 0.0, 0.0, 5.0, 5.0, f64::NAN,
    ];
    let arena = QuadArena::from_vertex_stream(&lon, &lat, &depth, &RuptureCfg::default())
        .unwrap();
    assert_eq!(arena.len(), 3);
    assert_eq!(arena.groups(), &[0, 0, 1]);
    assert_eq!(arena.num_groups(), 2);
    assert_eq!(arena.group_ranges(), vec![0..2, 2..3]);
    assert_eq!(arena.group(1).len(), 1);
    assert!(arena.group(5).is_empty());
    // Quads in the first run share the middle vertical edge.
    let g0 = arena.group(0);
    assert_eq!(g0[0].p1, g0[1].p0);
    assert!((g0[0].p2.to_ecef() - g0[1].p3.to_ecef()).norm() < 0.1);
}

#[test]
fn vertex_stream_errors() {
    let cfg = RuptureCfg::default();
    let err = QuadArena::from_vertex_stream(&[0.0; 4], &[0.0; 3], &[0.0; 4], &cfg).unwrap_err();
    assert!(matches!(
        err,
        RuptureError::VertexArrays {
            lon: 4,
            lat: 3,
            depth: 4
        }
    ));
    let odd = [0.0, 0.1, 0.1, 0.0, 0.0];
    let err = QuadArena::from_vertex_stream(&odd, &odd, &odd, &cfg).unwrap_err();
    assert!(matches!(err, RuptureError::Geometry { group: 0, .. }));
    assert!(QuadArena::from_vertex_stream(&[], &[], &[], &cfg).is_err());
}

#[test]
fn trace_scenario_dipping_east() {
    let groups = TraceSpec::single(0.0, 0.0, 0.0, 0.05, 0.0, 10.0, 45.0)
        .quad_groups()
        .unwrap();
    let arena = QuadArena::from_groups(&groups, &RuptureCfg::default()).unwrap();
    let q = arena.quads()[0];
    assert!((q.length_km() - 5.56).abs() < 0.05, "{}", q.length_km());
    assert!((q.dip_deg() - 45.0).abs() < 0.1, "{}", q.dip_deg());
    assert!((q.width_km() - 10.0).abs() < 0.05, "{}", q.width_km());
    assert!(q.strike_deg().abs() < 1e-6);
    // Bottom edge hangs to the east (right of a northward strike).
    assert!(q.p3.lon > 0.0 && (q.p3.depth - 7.0711).abs() < 1e-3);
}

#[test]
fn trace_strike_overrides_and_errors() {
    let mut spec = TraceSpec::single(0.0, 0.0, 0.0, 0.05, 0.0, 10.0, 60.0);
    spec.strike = StrikeSpec::Uniform(180.0);
    let q = spec.quad_groups().unwrap()[0][0];
    // Offset now points west.
    assert!(q.p3.lon < 0.0);
    spec.strike = StrikeSpec::PerQuad(vec![0.0, 1.0]);
    assert!(spec.quad_groups().is_err());
    spec.strike = StrikeSpec::FromTrace;
    spec.width.push(1.0);
    assert!(spec.quad_groups().is_err());
}

#[test]
fn group_quads_sorts_labels() {
    let q = northridge_raw();
    let r = q.reversed();
    let groups = group_quads(vec![q, r, q], Some(&[5, 2, 5])).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0], vec![r]);
    assert_eq!(groups[1], vec![q, q]);
    assert_eq!(group_quads(vec![q, r], None).unwrap().len(), 2);
    assert!(group_quads(vec![q], Some(&[0, 1])).is_err());
}

#[test]
fn fully_flipped_group_keeps_strike_order() {
    // Two quads traced against strike: both swap, and their order flips too.
    let lon = [0.1, 0.1, 0.1, 0.0, 0.0, 0.0];
    let lat = [0.0, 0.1, 0.2, 0.2, 0.1, 0.0];
    let depth = [0.0, 0.0, 0.0, 10.0, 10.0, 10.0];
    let arena = QuadArena::from_vertex_stream(&lon, &lat, &depth, &RuptureCfg::default())
        .unwrap();
    let qs = arena.quads();
    assert_eq!(qs[0].p1, qs[1].p0);
    assert!(angle_diff(qs[0].strike_deg(), 180.0) < 1e-3);
}

#[test]
fn slip_reference_values() {
    let s = unit_slip_vector(22.0, 30.0, 86.0);
    let want = [0.388305, -0.774878, 0.498782];
    for k in 0..3 {
        assert!((s[k] - want[k]).abs() < 1e-5, "{s:?}");
    }
    assert!((s.norm() - 1.0).abs() < 1e-12);
    let parts = unit_slip_vector_ss(22.0, 30.0, 86.0) + unit_slip_vector_ds(22.0, 30.0, 86.0);
    assert!((parts - s).norm() < 1e-15);
}

#[test]
fn quad_slip_lies_in_the_plane() {
    let groups = TraceSpec::single(-118.2, 34.1, -118.15, 34.2, 1.0, 3.0, 30.0)
        .quad_groups()
        .unwrap();
    let q = validate_and_normalize(groups[0][0], &RuptureCfg::default(), 0, 0).unwrap();
    let along = quad_slip(&q, 0.0);
    assert!(along.dot(&q.strike_vector()) > 0.9999);
    for rake in [30.0, 90.0, -45.0] {
        let s = quad_slip(&q, rake);
        assert!((s.norm() - 1.0).abs() < 1e-12);
        assert!(s.dot(&q.normal()).abs() < 2e-3, "rake {rake}: {s:?}");
    }
    // Reverse motion moves the hanging wall up.
    assert!(quad_slip(&q, 90.0).dot(&q.vertical_vector()) > 0.0);
}

#[test]
fn mechanism_from_rake() {
    assert_eq!(Mechanism::from_rake(None), Mechanism::All);
    assert_eq!(Mechanism::from_rake(Some(0.0)), Mechanism::Ss);
    assert_eq!(Mechanism::from_rake(Some(-170.0)), Mechanism::Ss);
    assert_eq!(Mechanism::from_rake(Some(-90.0)), Mechanism::Nm);
    assert_eq!(Mechanism::from_rake(Some(90.0)), Mechanism::Rs);
    assert_eq!(Mechanism::from_rake(Some(45.0)), Mechanism::All);
    assert_eq!(Mechanism::Rs.as_str(), "RS");
}

#[test]
fn summary_of_two_quads() {
    let groups = TraceSpec {
        lon0: vec![0.0, 0.0],
        lat0: vec![0.0, 0.1],
        lon1: vec![0.0, 0.1],
        lat1: vec![0.1, 0.1],
        top_depth: vec![2.0, 2.0],
        width: vec![5.0, 5.0],
        dip: vec![90.0, 90.0],
        strike: StrikeSpec::FromTrace,
        group_index: Some(vec![0, 0]),
    }
    .quad_groups()
    .unwrap();
    let s = summarize(&groups[0]);
    // Similar lengths north and east: mean strike is close to 45.
    assert!((s.strike - 45.0).abs() < 0.5, "{}", s.strike);
    assert!((s.dip - 90.0).abs() < 0.1);
    assert!((s.width - 5.0).abs() < 1e-3);
    assert!((s.area - s.length * 5.0).abs() < 0.05);
    assert_eq!(s.depth_to_top, 2.0);
}

proptest! {
    #[test]
    fn winding_reversal_is_corrected(
        lon in -170.0f64..170.0,
        lat in -60.0f64..60.0,
        az in 0.0f64..360.0,
        len in 1.0f64..30.0,
        width in 1.0f64..30.0,
        dip in 10.0f64..85.0,
        ztop in 0.0f64..10.0,
    ) {
        let (lon1, lat1) = crate::geo::point_at(lon, lat, az, len);
        let raw = TraceSpec::single(lon, lat, lon1, lat1, ztop, width, dip)
            .quad_groups()
            .unwrap()[0][0];
        let cfg = RuptureCfg::default();
        let a = validate_and_normalize(raw, &cfg, 0, 0).unwrap();
        let b = validate_and_normalize(raw.reversed(), &cfg, 0, 0).unwrap();
        prop_assert!(angle_diff(a.strike_deg(), b.strike_deg()) < 1e-6);
        prop_assert!((a.dip_deg() - b.dip_deg()).abs() < 0.05);
        prop_assert!(a.dip_deg() <= 90.0);
    }
}
