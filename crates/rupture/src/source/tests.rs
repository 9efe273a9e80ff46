use super::*;
use crate::cfg::RuptureCfg;
use crate::error::RuptureError;
use crate::origin::Origin;
use crate::rupture::{RuptureGeometry, RuptureKind};
use std::io::Write;

const NORTHRIDGE: &str = "\
# Source: Wald, D. J., T. H. Heaton, and K. W. Hudnut (1996). The Slip History of the 1994 Northridge, California, Earthquake Determined from Strong-Motion, Teleseismic, GPS, and Leveling Data, Bull. Seism. Soc. Am. 86, S49-S70.
34.315 -118.421 5.000
34.401 -118.587 5.000
34.261 -118.693 20.427
34.175 -118.527 20.427
34.315 -118.421 5.000
";

const IZMIT: &str = "\
#SOURCE: Barka, A., et al. (2002). The Surface Rupture and Slip Distribution of the 17 August 1999 Izmit Earthquake (M 7.4), North Anatolian Fault, Bull. Seism. Soc. Am. 92, 43-60.
40.70985 29.33760 0
40.72733 29.51528 0
40.72933 29.51528 20
40.71185 29.33760 20
40.70985 29.33760 0
>
40.70513 29.61152 0
40.74903 29.87519 0
40.75103 29.87519 20
40.70713 29.61152 20
40.70513 29.61152 0
>
40.72582 29.88662 0
40.72336 30.11126 0
40.73432 30.19265 0
40.73632 30.19265 20
40.72536 30.11126 20
40.72782 29.88662 20
40.72582 29.88662 0
>
40.71210 30.30494 0
40.71081 30.46540 0
40.70739 30.56511 0
40.70939 30.56511 20
40.71281 30.46540 20
40.71410 30.30494 20
40.71210 30.30494 0
>
40.71621 30.57658 0
40.70068 30.63731 0
40.70268 30.63731 20
40.71821 30.57658 20
40.71621 30.57658 0
>
40.69947 30.72900 0
40.79654 30.93655 0
40.79854 30.93655 20
40.70147 30.72900 20
40.69947 30.72900 0
>
40.80199 30.94688 0
40.84501 31.01799 0
40.84701 31.01799 20
40.80399 30.94688 20
40.80199 30.94688 0
";

// First ring is closed but has six points.
const CHI_CHI: &str = "\
# Source: Ji, C., D. V. Helmberger, D. J. Wald, and K.-F. Ma (2003).
    24.27980 120.72300\t0
    24.05000 121.00000\t17
    24.07190 121.09300\t17
    24.33120 121.04300\t17
    24.33120 121.04300\t17
    24.27980 120.72300\t0
    >
    24.27980 120.72300\t0
    23.70000 120.68000\t0
    23.60400 120.97200\t17
    24.05000 121.00000\t17
    24.27980 120.72300\t0
";

fn origin() -> Origin {
    Origin::new("test", 0.0, 0.0, 5.0, 7.0)
}

fn assert_close(got: &[f64], want: &[f64], tol: f64) {
    assert_eq!(got.len(), want.len(), "{got:?} vs {want:?}");
    for (g, w) in got.iter().zip(want) {
        if w.is_nan() {
            assert!(g.is_nan(), "{got:?} vs {want:?}");
        } else {
            assert!((g - w).abs() < tol, "{got:?} vs {want:?}");
        }
    }
}

#[test]
fn northridge_from_legacy_text() {
    let o = origin();
    let r = parse_rupture(&o, Some(NORTHRIDGE), RuptureCfg::default()).unwrap();
    assert_eq!(r.kind(), RuptureKind::Quad);
    assert!(r.reference().starts_with("# Source: Wald"));
    assert!((r.strike() - 122.06).abs() < 0.01, "{}", r.strike());
    assert!((r.dip() - 40.21).abs() < 0.01, "{}", r.dip());
    assert!((r.length() - 17.99).abs() < 0.01, "{}", r.length());
    assert!((r.width() - 23.94).abs() < 0.01, "{}", r.width());
    assert!((r.depth_to_top() - 5.0).abs() < 1e-12);
    assert!((r.area() - r.length() * r.width()).abs() < 1e-9);

    let q = r.as_quad().unwrap();
    assert_eq!(q.num_quads(), 1);
    assert_eq!(q.num_groups(), 1);
    let nan = f64::NAN;
    assert_close(&q.lats(), &[34.401, 34.315, 34.175, 34.261, 34.401, nan], 1e-3);
    assert_close(
        &q.lons(),
        &[-118.587, -118.421, -118.527, -118.693, -118.587, nan],
        1e-3,
    );
    assert_close(&q.depths(), &[5.0, 5.0, 20.427, 20.427, 5.0, nan], 1e-3);
}

#[test]
fn izmit_multi_group_text() {
    let o = origin();
    let r = parse_rupture(&o, Some(IZMIT), RuptureCfg::default()).unwrap();
    // Every trace is given against strike, so all quads are flipped to point west.
    assert!((r.strike() - 259.54).abs() < 0.01, "{}", r.strike());
    assert!((r.dip() - 89.40).abs() < 0.01, "{}", r.dip());
    assert!((r.length() - 119.56).abs() < 0.01, "{}", r.length());
    assert!((r.width() - 20.0).abs() < 0.01, "{}", r.width());
    assert!(r.depth_to_top().abs() < 0.01);

    let q = r.as_quad().unwrap();
    assert_eq!(q.num_quads(), 9);
    assert_eq!(q.num_groups(), 7);
    assert_eq!(q.group_index(), &[0, 1, 2, 2, 3, 3, 4, 5, 6]);
    // Flipped multi-quad groups are stored in strike order, i.e. reversed.
    assert_close(
        &q.individual_top_lengths(),
        &[
            15.1375, 22.8024, 6.9826, 18.9805, 8.4344, 13.5598, 5.4140, 20.5779, 7.6687,
        ],
        0.01,
    );
    assert_close(&q.individual_widths(), &[20.001; 9], 0.01);
    let nan = f64::NAN;
    assert_close(
        &q.lats()[..6],
        &[40.72733, 40.70985, 40.71185, 40.72933, 40.72733, nan],
        1e-3,
    );
    // Group 2 runs east to west along the top, then back along the bottom.
    assert_close(
        &q.lons()[12..20],
        &[30.19265, 30.11126, 29.88662, 29.88662, 30.11126, 30.19265, 30.19265, nan],
        1e-3,
    );
}

#[test]
fn chi_chi_even_ring_is_rejected() {
    let o = origin();
    let err = parse_rupture(&o, Some(CHI_CHI), RuptureCfg::default()).unwrap_err();
    assert!(
        matches!(err, RuptureError::Ring { ring: 0, .. }),
        "unexpected error: {err}"
    );
    assert!(err.to_string().contains("odd"));
}

#[test]
fn no_source_gives_point_rupture() {
    let o = origin();
    let r = parse_rupture(&o, None, RuptureCfg::default()).unwrap();
    assert_eq!(r.kind(), RuptureKind::Point);
    assert!(r.as_quad().is_none());
}

#[test]
fn structured_round_trip_preserves_quads() {
    let o = origin();
    let cfg = RuptureCfg::default();
    let doc = text_to_doc(IZMIT).unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    let a = parse_rupture(&o, Some(IZMIT), cfg).unwrap();
    let b = parse_rupture(&o, Some(&json), cfg).unwrap();
    let (a, b) = (a.as_quad().unwrap(), b.as_quad().unwrap());
    assert_eq!(a.quads(), b.quads());
    assert_eq!(a.reference(), b.reference());

    // The echoed document rebuilds the same rupture and carries the origin.
    let echo = a.to_doc();
    assert_eq!(echo.metadata.get("id"), Some(&serde_json::Value::from("test")));
    let c = doc_to_rupture(echo, &o, cfg).unwrap();
    let c = c.as_quad().unwrap();
    assert_eq!(c.num_quads(), 9);
    assert!((c.strike() - a.strike()).abs() < 1e-6);
    assert!((c.length() - a.length()).abs() < 1e-6);
}

#[test]
fn json_that_is_not_a_rupture_is_a_hard_error() {
    let o = origin();
    let err = parse_rupture(
        &o,
        Some(r#"{"type": "FeatureCollection"}"#),
        RuptureCfg::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RuptureError::Parse { .. }), "{err}");
    assert!(err.to_string().contains("malformed"));
}

#[test]
fn doc_validation_errors() {
    let good = text_to_doc(NORTHRIDGE).unwrap();
    validate_doc(&good).unwrap();

    let mut d = good.clone();
    d.kind = "Feature".into();
    assert!(validate_doc(&d).is_err());

    let mut d = good.clone();
    d.features.push(d.features[0].clone());
    assert!(validate_doc(&d).unwrap_err().to_string().contains("exactly one"));

    let mut d = good.clone();
    d.features[0].properties.remove("reference");
    assert!(validate_doc(&d).unwrap_err().to_string().contains("reference"));

    let mut d = good.clone();
    d.features[0].geometry.kind = "Polygon".into();
    assert!(validate_doc(&d).is_err());

    // Even vertex count.
    let mut d = good.clone();
    let extra = d.features[0].geometry.coordinates[0][0][1].clone();
    d.features[0].geometry.coordinates[0][0].insert(1, extra);
    assert!(matches!(
        validate_doc(&d),
        Err(RuptureError::Ring { ring: 0, .. })
    ));

    // Open ring.
    let mut d = good.clone();
    d.features[0].geometry.coordinates[0][0][4][0] += 0.1;
    assert!(validate_doc(&d).unwrap_err().to_string().contains("identical"));

    // Too short.
    let mut d = good.clone();
    let ring = &mut d.features[0].geometry.coordinates[0][0];
    ring.drain(1..3);
    assert!(validate_doc(&d).unwrap_err().to_string().contains("at least 5"));

    // Missing depth.
    let mut d = good.clone();
    d.features[0].geometry.coordinates[0][0][1].truncate(2);
    assert!(matches!(
        validate_doc(&d),
        Err(RuptureError::Ring { ring: 0, .. })
    ));

    // Top deeper than its bottom partner.
    let mut d = good;
    d.features[0].geometry.coordinates[0][0][1][2] = 30.0;
    assert!(validate_doc(&d).unwrap_err().to_string().contains("top points"));
}

#[test]
fn legacy_text_errors_and_closing() {
    assert!(text_to_doc("34.0 -118.0\n").is_err());
    assert!(text_to_doc("34.0 abc 5.0\n").is_err());
    assert!(text_to_doc("# only a reference\n").is_err());

    // Unclosed group is closed on parse.
    let open = "34.315 -118.421 5.0\n34.401 -118.587 5.0\n34.261 -118.693 20.427\n34.175 -118.527 20.427\n";
    let doc = text_to_doc(open).unwrap();
    assert_eq!(doc.rings()[0].len(), 5);
    assert_eq!(doc.rings()[0][0], doc.rings()[0][4]);
    assert_eq!(doc.reference().as_deref(), Some(""));
}

#[test]
fn non_planar_ring_becomes_edge_rupture() {
    let o = origin();
    let cfg = RuptureCfg::default();
    // Bend the bottom edge: it is no longer horizontal.
    let bent = NORTHRIDGE.replace("34.261 -118.693 20.427", "34.261 -118.693 22.0");
    let doc = parse_doc(&bent).unwrap();
    assert!(!is_quad_representable(&doc, &cfg));
    assert_eq!(first_non_quad_ring(&doc, &cfg).unwrap(), Some(0));
    let r = doc_to_rupture(doc, &o, cfg).unwrap();
    assert_eq!(r.kind(), RuptureKind::Edge);
    assert!(is_quad_representable(&parse_doc(NORTHRIDGE).unwrap(), &cfg));
}

#[test]
fn write_then_read_legacy_file() {
    let o = origin();
    let cfg = RuptureCfg::default();
    let r = parse_rupture(&o, Some(IZMIT), cfg).unwrap();
    let q = r.as_quad().unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write_text(q, &mut file).unwrap();
    file.flush().unwrap();

    let back = read_rupture_file(&o, file.path(), cfg).unwrap();
    let back = back.as_quad().unwrap();
    // One group per quad on output.
    assert_eq!(back.num_quads(), 9);
    assert_eq!(back.num_groups(), 9);
    assert!(back.reference().starts_with("#SOURCE: Barka"));
    assert!((back.strike() - q.strike()).abs() < 1e-3);
    assert!((back.length() - q.length()).abs() < 1e-3);
    for (a, b) in back.quads().iter().zip(q.quads()) {
        assert!((a.p0.lon - b.p0.lon).abs() < 1e-4 && (a.p0.lat - b.p0.lat).abs() < 1e-4);
    }
}

#[test]
fn missing_file_is_io_error() {
    let o = origin();
    let dir = tempfile::tempdir().unwrap();
    let err = read_rupture_file(&o, dir.path().join("nope.txt"), RuptureCfg::default())
        .unwrap_err();
    assert!(matches!(err, RuptureError::Io(_)));
}
