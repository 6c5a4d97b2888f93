//! Subcommand bodies. Each one opens a session, runs its pipeline and closes
//! the session; `main` only parses arguments and installs logging.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use clap::Args;
use rand::{rngs::StdRng, SeedableRng};
use wktkit::prelude::*;

use crate::summary;

/// Engine options shared by every command that writes geometry.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct EngineArgs {
    /// Write WKB in big-endian (XDR) byte order
    #[arg(long)]
    pub big_endian: bool,
    /// Write hex WKB in lowercase
    #[arg(long)]
    pub lowercase_hex: bool,
}

impl EngineArgs {
    pub fn cfg(self) -> EngineCfg {
        EngineCfg {
            byte_order: if self.big_endian {
                ByteOrder::Big
            } else {
                ByteOrder::Little
            },
            hex_case: if self.lowercase_hex {
                HexCase::Lower
            } else {
                HexCase::Upper
            },
            ..EngineCfg::default()
        }
    }
}

/// Sampler options for `wktkit rand`.
#[derive(Args, Clone, Copy, Debug)]
pub struct SampleArgs {
    /// Rectangle width
    #[arg(short = 'x', long, default_value_t = 1.0)]
    pub width: f64,
    /// Rectangle height
    #[arg(short = 'y', long, default_value_t = 1.0)]
    pub height: f64,
    /// Number of points
    #[arg(short = 'n', long, default_value_t = 0)]
    pub count: usize,
    /// Random seed; drawn from entropy when absent
    #[arg(short = 's', long)]
    pub seed: Option<u64>,
    /// Snap coordinates down to multiples of this interval
    #[arg(short = 'q', long, default_value_t = 0.0)]
    pub quantum: f64,
    /// Minimum distance between points (also keeps points this far from the edges)
    #[arg(short = 'r', long, default_value_t = 0.0)]
    pub min_distance: f64,
    /// Reject duplicate points
    #[arg(short = 'u', long)]
    pub unique: bool,
    /// Draw budget multiplier: at most k * n draws
    #[arg(short = 'k', long, default_value_t = 10)]
    pub retry_factor: usize,
}

impl SampleArgs {
    pub fn cfg(&self) -> SampleCfg {
        SampleCfg {
            count: self.count,
            width: self.width,
            height: self.height,
            quantum: self.quantum,
            min_distance: self.min_distance,
            unique: self.unique,
            retry_factor: self.retry_factor,
        }
    }
}

fn require(format: Format, flag: &str) -> Result<()> {
    if format.is_none() {
        bail!("{flag} must name a format (wkt, wkb or hex)");
    }
    Ok(())
}

/// Open a reader-only session and load `input`.
fn load(from: Format, input: &Path) -> Result<Session> {
    require(from, "--from")?;
    let mut session = Session::open(SessionCfg::new(from, Format::None))?;
    session
        .load(input)
        .with_context(|| format!("reading {} as {from}", input.display()))?;
    Ok(session)
}

/// Convex hull of the input, written in the same format it was read in.
pub fn hull(format: Format, engine: EngineArgs, input: &Path, dest: &Destination) -> Result<()> {
    require(format, "--format")?;
    tracing::info!(input = %input.display(), %dest, %format, "hull");
    let cfg = SessionCfg {
        engine: engine.cfg(),
        ..SessionCfg::new(format, format)
    };
    let mut session = Session::open(cfg)?;
    session
        .load(input)
        .with_context(|| format!("reading {} as {format}", input.display()))?;
    let geom = session.take_geometry().context("nothing decoded")?;
    let hull = session.context()?.convex_hull(&geom)?;
    session
        .emit(dest, &hull)
        .with_context(|| format!("writing hull to {dest}"))?;
    session.close();
    Ok(())
}

/// Sample points and write them as one collection. Returns the accepted count.
pub fn rand_points(args: &SampleArgs, to: Format, engine: EngineArgs, dest: &Destination) -> Result<usize> {
    require(to, "--to")?;
    let cfg = SessionCfg {
        engine: engine.cfg(),
        ..SessionCfg::new(Format::None, to)
    };
    let session = Session::open(cfg)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sample_cfg = args.cfg();
    let geom = sample(session.context()?, &sample_cfg, &mut rng)?;
    let accepted = GeomRef::from(&geom).num_members();
    session
        .emit(dest, &geom)
        .with_context(|| format!("writing points to {dest}"))?;
    session.close();
    tracing::info!(accepted, requested = sample_cfg.count, seed = ?args.seed, "rand");
    Ok(accepted)
}

/// Print `xmin xmax ymin ymax`.
pub fn bounds<W: Write>(from: Format, input: &Path, out: &mut W) -> Result<Bounds> {
    let session = load(from, input)?;
    let b = session.bounds()?;
    writeln!(out, "{} {} {} {}", b.xmin, b.xmax, b.ymin, b.ymax)?;
    session.close();
    Ok(b)
}

pub fn convert(
    from: Format,
    to: Format,
    engine: EngineArgs,
    input: &Path,
    dest: &Destination,
) -> Result<()> {
    require(from, "--from")?;
    require(to, "--to")?;
    tracing::info!(input = %input.display(), %dest, %from, %to, "convert");
    let cfg = SessionCfg {
        engine: engine.cfg(),
        ..SessionCfg::new(from, to)
    };
    let mut session = Session::open(cfg)?;
    session
        .load(input)
        .with_context(|| format!("reading {} as {from}", input.display()))?;
    let geom = session.take_geometry().context("nothing decoded")?;
    session
        .emit(dest, &geom)
        .with_context(|| format!("writing {to} to {dest}"))?;
    session.close();
    Ok(())
}

/// Pretty JSON summary of the members, vertex counts and bounds.
pub fn info<W: Write>(from: Format, input: &Path, out: &mut W) -> Result<summary::Summary> {
    let session = load(from, input)?;
    let geom = session.geometry().context("nothing decoded")?;
    let s = summary::summarize(geom)?;
    serde_json::to_writer_pretty(&mut *out, &s)?;
    writeln!(out)?;
    session.close();
    Ok(s)
}

/// Coordinate stream: a `# <index> <type>` header per member, then `x y` lines.
pub fn dump<W: Write>(from: Format, input: &Path, out: &mut W) -> Result<()> {
    let session = load(from, input)?;
    let geom = session.geometry().context("nothing decoded")?;
    summary::dump(geom, out)?;
    session.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample_args(count: usize, seed: u64) -> SampleArgs {
        SampleArgs {
            width: 10.0,
            height: 10.0,
            count,
            seed: Some(seed),
            quantum: 1.0,
            min_distance: 0.0,
            unique: true,
            retry_factor: 10,
        }
    }

    #[test]
    fn hull_of_points_is_polygon() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pts.wkt");
        let output = dir.path().join("hull.wkt");
        fs::write(
            &input,
            "MULTIPOINT ((0 0), (4 0), (4 4), (0 4), (2 2), (1 3))",
        )
        .unwrap();
        hull(
            Format::Text,
            EngineArgs::default(),
            &input,
            &Destination::File(output.clone()),
        )
        .unwrap();
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("POLYGON"), "{text}");
        let mut out = Vec::new();
        let b = bounds(Format::Text, &output, &mut out).unwrap();
        assert_eq!((b.xmin, b.xmax, b.ymin, b.ymax), (0.0, 4.0, 0.0, 4.0));
    }

    #[test]
    fn hull_of_missing_input_names_the_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("absent.wkt");
        let err = hull(
            Format::Text,
            EngineArgs::default(),
            &input,
            &Destination::File(dir.path().join("out.wkt")),
        )
        .unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("absent.wkt"), "{chain}");
    }

    #[test]
    fn rand_is_reproducible_with_seed() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.wkt");
        let b = dir.path().join("b.wkt");
        let args = sample_args(5, 99);
        let n = rand_points(&args, Format::Text, EngineArgs::default(), &Destination::File(a.clone()))
            .unwrap();
        rand_points(&args, Format::Text, EngineArgs::default(), &Destination::File(b.clone())).unwrap();
        assert_eq!(n, 5);
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());

        let mut out = Vec::new();
        let s = info(Format::Text, &a, &mut out).unwrap();
        assert_eq!(s.member_count, 5);
        assert!(s.members.iter().all(|m| m.geom_type == "Point"));
    }

    #[test]
    fn rand_rejects_none_output_format() {
        let dir = tempdir().unwrap();
        let err = rand_points(
            &sample_args(3, 1),
            Format::None,
            EngineArgs::default(),
            &Destination::File(dir.path().join("x")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("--to"));
    }

    #[test]
    fn bounds_prints_four_numbers() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pts.wkt");
        fs::write(
            &input,
            "GEOMETRYCOLLECTION (POINT (0 0), POINT (5 5), POINT (2 8))",
        )
        .unwrap();
        let mut out = Vec::new();
        bounds(Format::Text, &input, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 5 0 8\n");
    }

    #[test]
    fn convert_through_big_endian_wkb_and_hex() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("in.wkt");
        let wkb = dir.path().join("mid.wkb");
        let hex = dir.path().join("mid.hex");
        let back = dir.path().join("back.wkt");
        fs::write(&src, "POLYGON ((0 0, 3 0, 3 3, 0 0))").unwrap();
        let be = EngineArgs {
            big_endian: true,
            lowercase_hex: true,
        };
        convert(Format::Text, Format::Binary, be, &src, &Destination::File(wkb.clone())).unwrap();
        assert_eq!(fs::read(&wkb).unwrap()[0], 0);
        convert(Format::Binary, Format::BinaryHex, be, &wkb, &Destination::File(hex.clone()))
            .unwrap();
        let hex_text = fs::read_to_string(&hex).unwrap();
        assert!(hex_text.starts_with("00000000"));
        assert!(!hex_text.chars().any(|c| c.is_ascii_uppercase()));
        convert(
            Format::BinaryHex,
            Format::Text,
            EngineArgs::default(),
            &hex,
            &Destination::File(back.clone()),
        )
        .unwrap();

        let mut a = Vec::new();
        let mut b = Vec::new();
        let before = info(Format::Text, &src, &mut a).unwrap();
        let after = info(Format::Text, &back, &mut b).unwrap();
        assert_eq!(a, b);
        assert_eq!(before.vertex_count, after.vertex_count);
    }

    #[test]
    fn convert_overwrites_existing_output() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("in.wkt");
        let out = dir.path().join("out.wkt");
        fs::write(&src, "POINT (1 2)").unwrap();
        fs::write(&out, "x".repeat(256)).unwrap();
        convert(
            Format::Text,
            Format::Text,
            EngineArgs::default(),
            &src,
            &Destination::File(out.clone()),
        )
        .unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("POINT") && !text.contains('x'), "{text}");
    }

    #[test]
    fn info_json_has_members_and_bounds() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("poly.wkt");
        fs::write(
            &input,
            "POLYGON ((0 0, 4 0, 4 4, 0 0), (1 1, 2 1, 1 2, 1 1))",
        )
        .unwrap();
        let mut out = Vec::new();
        info(Format::Text, &input, &mut out).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["type"], "Polygon");
        assert_eq!(v["member_count"], 1);
        assert_eq!(v["members"][0]["vertices"], 8);
        assert_eq!(v["bounds"]["xmax"], 4.0);
    }

    #[test]
    fn dump_reads_hex_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("pt.hex");
        fs::write(&input, "0101000000000000000000F03F0000000000000040\n").unwrap();
        let mut out = Vec::new();
        dump(Format::BinaryHex, &input, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "# 0 Point\n1 2\n");
    }

    #[test]
    fn undecodable_input_reports_parse_cause() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.wkt");
        fs::write(&input, "LINESTRING (0 0,").unwrap();
        let err = dump(Format::Text, &input, &mut Vec::new()).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("wkt decode failed"), "{chain}");
    }
}
