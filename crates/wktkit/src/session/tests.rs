use super::*;
use crate::engine::{EngineCfg, GeometryTree};
use geo::{Geometry, Point};
use std::fs;
use tempfile::tempdir;

fn text_session() -> Session {
    Session::open(SessionCfg::new(Format::Text, Format::Text)).unwrap()
}

#[test]
fn open_creates_only_configured_codecs() {
    let s = Session::open(SessionCfg::new(Format::None, Format::Binary)).unwrap();
    assert!(!s.reader_enabled());
    assert_eq!(s.reader_format(), Format::None);
    assert_eq!(s.writer_format(), Format::Binary);
    assert_eq!(s.state(), SessionState::Open);
    assert!(s.context().is_ok());
    s.close();
}

#[test]
fn open_fails_on_unsupported_engine_cfg() {
    let cfg = SessionCfg {
        engine: EngineCfg {
            output_dimension: 4,
            ..EngineCfg::default()
        },
        ..SessionCfg::new(Format::Text, Format::Text)
    };
    assert!(matches!(Session::open(cfg), Err(Error::InitFailure { .. })));
}

#[test]
fn load_then_bounds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pts.wkt");
    fs::write(
        &path,
        "GEOMETRYCOLLECTION (POINT (0 0), POINT (5 5), POINT (2 8))\n",
    )
    .unwrap();
    let mut s = text_session();
    s.load(&path).unwrap();
    assert_eq!(s.state(), SessionState::Loaded);
    let b = s.bounds().unwrap();
    assert_eq!((b.xmin, b.xmax, b.ymin, b.ymax), (0.0, 5.0, 0.0, 8.0));
}

#[test]
fn bounds_without_geometry() {
    let s = text_session();
    assert!(matches!(s.bounds(), Err(Error::NoGeometry)));
    assert!(matches!(
        s.iterate(|_, _| ControlFlow::Continue(())),
        Err(Error::NoGeometry)
    ));
}

#[test]
fn failed_decode_disables_reader() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("bad.wkt");
    let good = dir.path().join("good.wkt");
    fs::write(&bad, "POINT (1").unwrap();
    fs::write(&good, "POINT (1 2)").unwrap();

    let mut s = text_session();
    let err = s.load(&bad).unwrap_err();
    match &err {
        Error::Load { path, source } => {
            assert_eq!(path, &bad);
            assert!(matches!(**source, Error::Parse { .. }));
        }
        other => panic!("expected Load, got {other:?}"),
    }
    assert_eq!(s.state(), SessionState::Open);
    assert!(!s.reader_enabled());
    // configured format survives; the reader does not come back
    assert_eq!(s.reader_format(), Format::Text);
    let again = s.load(&good).unwrap_err();
    match again {
        Error::Load { source, .. } => assert!(matches!(
            *source,
            Error::Disabled {
                direction: Direction::Reader
            }
        )),
        other => panic!("expected Load, got {other:?}"),
    }
}

#[test]
fn missing_input_is_load_failure_with_not_found_cause() {
    let dir = tempdir().unwrap();
    let mut s = text_session();
    let err = s.load(dir.path().join("absent.wkt")).unwrap_err();
    match err {
        Error::Load { source, .. } => assert!(matches!(*source, Error::NotFound { .. })),
        other => panic!("expected Load, got {other:?}"),
    }
}

#[test]
fn load_without_reader_is_disabled() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.wkt");
    fs::write(&path, "POINT (1 2)").unwrap();
    let mut s = Session::open(SessionCfg::new(Format::None, Format::Text)).unwrap();
    assert!(s.load(&path).is_err());
    assert!(s.geometry().is_none());
}

#[test]
fn emit_without_writer_is_disabled() {
    let dir = tempdir().unwrap();
    let s = Session::open(SessionCfg::new(Format::Text, Format::None)).unwrap();
    let g = Geometry::Point(Point::new(1.0, 2.0));
    let dest = Destination::File(dir.path().join("out.wkt"));
    assert!(matches!(
        s.emit(&dest, &g),
        Err(Error::Disabled {
            direction: Direction::Writer
        })
    ));
    assert!(!dir.path().join("out.wkt").exists());
}

#[test]
fn convert_text_to_hex_and_back() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("in.wkt");
    let hex = dir.path().join("out.hex");
    let back = dir.path().join("back.wkt");
    fs::write(&src, "LINESTRING (0 0, 1 2, 3 4)").unwrap();

    let mut to_hex = Session::open(SessionCfg::new(Format::Text, Format::BinaryHex)).unwrap();
    to_hex.load(&src).unwrap();
    let g = to_hex.take_geometry().unwrap();
    assert_eq!(to_hex.state(), SessionState::Open);
    to_hex.emit(&Destination::File(hex.clone()), &g).unwrap();
    to_hex.close();
    assert!(fs::read(&hex).unwrap().iter().all(|b| b.is_ascii_hexdigit()));

    let mut from_hex = Session::open(SessionCfg::new(Format::BinaryHex, Format::Text)).unwrap();
    from_hex.load(&hex).unwrap();
    let decoded = from_hex.geometry().unwrap().clone();
    from_hex.emit(&Destination::File(back.clone()), &decoded).unwrap();
    assert_eq!(decoded, g);

    let mut check = text_session();
    check.load(&back).unwrap();
    assert_eq!(check.geometry(), Some(&g));
}

#[test]
fn iterate_sees_members() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mp.wkt");
    fs::write(&path, "MULTIPOINT ((1 1), (2 2), (3 3))").unwrap();
    let mut s = text_session();
    s.load(&path).unwrap();
    let mut xs = Vec::new();
    s.iterate(|m, tag| {
        assert_eq!(tag, GeomType::Point);
        xs.push(m.x_min().unwrap_or(f64::NAN));
        ControlFlow::Continue(())
    })
    .unwrap();
    assert_eq!(xs, [1.0, 2.0, 3.0]);
}

#[test]
fn empty_binary_input_is_parse_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.wkb");
    fs::write(&path, b"").unwrap();
    let mut s = Session::open(SessionCfg::new(Format::Binary, Format::None)).unwrap();
    match s.load(&path).unwrap_err() {
        Error::Load { source, .. } => assert!(matches!(*source, Error::Parse { .. })),
        other => panic!("expected Load, got {other:?}"),
    }
}
