//! Geometry engine adapter (georust stack behind a context handle).
//!
//! Purpose
//! - Give the session one owned `Context` through which every engine service
//!   is reached: codec construction, point/collection construction for the
//!   sampler, and the convex hull used by the hull tool.
//! - Keep geometry storage in `geo::Geometry<f64>`; callers only ever look at
//!   it through the `GeometryTree` view in [`tree`].
//!
//! Notes
//! - The context carries configuration, not global state. Two sessions never
//!   share one, so nothing here needs to be `Sync`-aware.

pub mod tree;
pub mod wkb;

use geo::{Area, ConvexHull, Coord, Geometry, GeometryCollection, LineString, Point};

use crate::error::{Error, Result};

pub use tree::{CoordSeq, Coords, GeomRef, GeomType, GeometryTree};

/// WKB byte order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    #[default]
    Little,
}

/// Letter case of hexadecimal output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HexCase {
    #[default]
    Upper,
    Lower,
}

/// Engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineCfg {
    pub byte_order: ByteOrder,
    pub hex_case: HexCase,
    /// Coordinate dimension written by encoders. Only 2 is supported.
    pub output_dimension: u32,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            hex_case: HexCase::Upper,
            output_dimension: 2,
        }
    }
}

/// Engine context. Created first and dropped last by the owning session.
#[derive(Debug)]
pub struct Context {
    cfg: EngineCfg,
}

impl Context {
    pub fn init(cfg: EngineCfg) -> Result<Self> {
        if cfg.output_dimension != 2 {
            return Err(Error::InitFailure {
                reason: format!(
                    "output dimension {} is not supported (only 2)",
                    cfg.output_dimension
                ),
            });
        }
        tracing::debug!(?cfg, "engine context created");
        Ok(Self { cfg })
    }

    #[inline]
    pub fn cfg(&self) -> &EngineCfg {
        &self.cfg
    }

    /// Build a point; non-finite coordinates are refused.
    pub fn create_point(&self, x: f64, y: f64) -> Result<Geometry<f64>> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(Error::engine(format!("cannot create point ({x}, {y})")));
        }
        Ok(Geometry::Point(Point::new(x, y)))
    }

    /// Build a geometry collection that takes ownership of `members`.
    pub fn create_collection(&self, members: Vec<Geometry<f64>>) -> Geometry<f64> {
        Geometry::GeometryCollection(GeometryCollection(members))
    }

    /// Convex hull of every vertex in `geom`.
    ///
    /// Degenerate hulls collapse: one distinct vertex gives a `Point`, a
    /// zero-area hull gives the `LineString` between its extreme vertices.
    pub fn convex_hull(&self, geom: &Geometry<f64>) -> Result<Geometry<f64>> {
        if GeomRef::from(geom).x_min().is_none() {
            return Err(Error::engine("convex hull of an empty geometry"));
        }
        let hull = geom.convex_hull();
        let mut distinct: Vec<Coord<f64>> = Vec::new();
        for c in hull.exterior().coords() {
            if !distinct.contains(c) {
                distinct.push(*c);
            }
        }
        let lexical =
            |a: &&Coord<f64>, b: &&Coord<f64>| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y));
        match (
            distinct.iter().min_by(lexical),
            distinct.iter().max_by(lexical),
        ) {
            (Some(&only), _) if distinct.len() == 1 => Ok(Geometry::Point(Point(only))),
            (Some(&lo), Some(&hi)) if distinct.len() == 2 || hull.unsigned_area() == 0.0 => {
                Ok(Geometry::LineString(LineString::new(vec![lo, hi])))
            }
            (Some(_), Some(_)) => Ok(Geometry::Polygon(hull)),
            _ => Err(Error::engine("convex hull has no vertices")),
        }
    }
}
