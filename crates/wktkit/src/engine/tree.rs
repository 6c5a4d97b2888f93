//! Read-only capability view over an engine-owned geometry tree.
//!
//! Purpose
//! - `GeometryTree` is the narrow interface the iterator and the bounds
//!   extractor are written against: member access, type tag, coordinate
//!   sequence, ring accessors and the four extent queries. Every accessor is
//!   fallible (returns `Option`) like the engine calls it stands for.
//! - `GeomRef<'a>` implements it as a borrowed view over `geo::Geometry<f64>`;
//!   nothing is copied except for geo-only shapes (`Rect`, `Triangle`) that have
//!   no stored ring to borrow.
//!
//! Conventions
//! - A non-collection has exactly one member: itself.
//! - Only points, line strings and rings have a coordinate sequence.

use std::borrow::Cow;
use std::fmt;

use geo::{
    BoundingRect, Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon, Rect,
};

/// Geometry type tag, named the way the engine prints them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeomType {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeomType {
    pub const fn as_str(self) -> &'static str {
        match self {
            GeomType::Point => "Point",
            GeomType::LineString => "LineString",
            GeomType::LinearRing => "LinearRing",
            GeomType::Polygon => "Polygon",
            GeomType::MultiPoint => "MultiPoint",
            GeomType::MultiLineString => "MultiLineString",
            GeomType::MultiPolygon => "MultiPolygon",
            GeomType::GeometryCollection => "GeometryCollection",
        }
    }

    #[inline]
    pub const fn is_collection(self) -> bool {
        matches!(
            self,
            GeomType::MultiPoint
                | GeomType::MultiLineString
                | GeomType::MultiPolygon
                | GeomType::GeometryCollection
        )
    }
}

impl fmt::Display for GeomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered vertex sequence of one geometry.
pub trait CoordSeq {
    fn size(&self) -> usize;
    fn dimensions(&self) -> u32;
    fn xy(&self, index: usize) -> Option<(f64, f64)>;
}

/// Capability interface over an opaque geometry tree.
pub trait GeometryTree: Sized {
    type Seq<'s>: CoordSeq
    where
        Self: 's;

    fn num_members(&self) -> usize;
    fn member(&self, index: usize) -> Option<Self>;
    fn geom_type(&self) -> Option<GeomType>;
    fn coord_seq(&self) -> Option<Self::Seq<'_>>;
    fn exterior_ring(&self) -> Option<Self>;
    fn num_interior_rings(&self) -> usize;
    fn interior_ring(&self, index: usize) -> Option<Self>;

    fn x_min(&self) -> Option<f64>;
    fn x_max(&self) -> Option<f64>;
    fn y_min(&self) -> Option<f64>;
    fn y_max(&self) -> Option<f64>;
}

/// 2-D coordinates borrowed from a geometry (or owned for `Line`).
#[derive(Clone, Debug)]
pub struct Coords<'a>(Cow<'a, [Coord<f64>]>);

impl CoordSeq for Coords<'_> {
    #[inline]
    fn size(&self) -> usize {
        self.0.len()
    }
    #[inline]
    fn dimensions(&self) -> u32 {
        2
    }
    #[inline]
    fn xy(&self, index: usize) -> Option<(f64, f64)> {
        self.0.get(index).map(|c| (c.x, c.y))
    }
}

/// Borrowed view of one node of a `geo::Geometry<f64>` tree.
#[derive(Clone, Debug)]
pub enum GeomRef<'a> {
    Point(&'a Point<f64>),
    Line(&'a Line<f64>),
    LineString(&'a LineString<f64>),
    Ring(Cow<'a, LineString<f64>>),
    Polygon(Cow<'a, Polygon<f64>>),
    MultiPoint(&'a MultiPoint<f64>),
    MultiLineString(&'a MultiLineString<f64>),
    MultiPolygon(&'a MultiPolygon<f64>),
    Collection(&'a GeometryCollection<f64>),
}

impl<'a> From<&'a Geometry<f64>> for GeomRef<'a> {
    fn from(geom: &'a Geometry<f64>) -> Self {
        match geom {
            Geometry::Point(g) => GeomRef::Point(g),
            Geometry::Line(g) => GeomRef::Line(g),
            Geometry::LineString(g) => GeomRef::LineString(g),
            Geometry::Polygon(g) => GeomRef::Polygon(Cow::Borrowed(g)),
            Geometry::MultiPoint(g) => GeomRef::MultiPoint(g),
            Geometry::MultiLineString(g) => GeomRef::MultiLineString(g),
            Geometry::MultiPolygon(g) => GeomRef::MultiPolygon(g),
            Geometry::GeometryCollection(g) => GeomRef::Collection(g),
            Geometry::Rect(g) => GeomRef::Polygon(Cow::Owned(g.to_polygon())),
            Geometry::Triangle(g) => GeomRef::Polygon(Cow::Owned(g.to_polygon())),
        }
    }
}

impl<'a> GeomRef<'a> {
    fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            GeomRef::Point(g) => g.bounding_rect().into(),
            GeomRef::Line(g) => g.bounding_rect().into(),
            GeomRef::LineString(g) => g.bounding_rect(),
            GeomRef::Ring(g) => g.bounding_rect(),
            GeomRef::Polygon(g) => g.bounding_rect(),
            GeomRef::MultiPoint(g) => g.bounding_rect(),
            GeomRef::MultiLineString(g) => g.bounding_rect(),
            GeomRef::MultiPolygon(g) => g.bounding_rect(),
            GeomRef::Collection(g) => g.bounding_rect(),
        }
    }
}

impl<'a> GeometryTree for GeomRef<'a> {
    type Seq<'s>
        = Coords<'s>
    where
        Self: 's;

    fn num_members(&self) -> usize {
        match self {
            GeomRef::MultiPoint(g) => g.0.len(),
            GeomRef::MultiLineString(g) => g.0.len(),
            GeomRef::MultiPolygon(g) => g.0.len(),
            GeomRef::Collection(g) => g.0.len(),
            _ => 1,
        }
    }

    fn member(&self, index: usize) -> Option<Self> {
        match self {
            GeomRef::MultiPoint(g) => {
                let g: &'a MultiPoint<f64> = *g;
                g.0.get(index).map(GeomRef::Point)
            }
            GeomRef::MultiLineString(g) => {
                let g: &'a MultiLineString<f64> = *g;
                g.0.get(index).map(GeomRef::LineString)
            }
            GeomRef::MultiPolygon(g) => {
                let g: &'a MultiPolygon<f64> = *g;
                g.0.get(index).map(|p| GeomRef::Polygon(Cow::Borrowed(p)))
            }
            GeomRef::Collection(g) => {
                let g: &'a GeometryCollection<f64> = *g;
                g.0.get(index).map(GeomRef::from)
            }
            single => (index == 0).then(|| single.clone()),
        }
    }

    fn geom_type(&self) -> Option<GeomType> {
        Some(match self {
            GeomRef::Point(_) => GeomType::Point,
            GeomRef::Line(_) | GeomRef::LineString(_) => GeomType::LineString,
            GeomRef::Ring(_) => GeomType::LinearRing,
            GeomRef::Polygon(_) => GeomType::Polygon,
            GeomRef::MultiPoint(_) => GeomType::MultiPoint,
            GeomRef::MultiLineString(_) => GeomType::MultiLineString,
            GeomRef::MultiPolygon(_) => GeomType::MultiPolygon,
            GeomRef::Collection(_) => GeomType::GeometryCollection,
        })
    }

    fn coord_seq(&self) -> Option<Coords<'_>> {
        let coords = match self {
            GeomRef::Point(g) => Cow::Borrowed(std::slice::from_ref(&g.0)),
            GeomRef::Line(g) => Cow::Owned(vec![g.start, g.end]),
            GeomRef::LineString(g) => Cow::Borrowed(g.0.as_slice()),
            GeomRef::Ring(g) => Cow::Borrowed(g.0.as_slice()),
            _ => return None,
        };
        Some(Coords(coords))
    }

    fn exterior_ring(&self) -> Option<Self> {
        match self {
            GeomRef::Polygon(Cow::Borrowed(p)) => {
                let p: &'a Polygon<f64> = *p;
                Some(GeomRef::Ring(Cow::Borrowed(p.exterior())))
            }
            GeomRef::Polygon(Cow::Owned(p)) => Some(GeomRef::Ring(Cow::Owned(p.exterior().clone()))),
            _ => None,
        }
    }

    fn num_interior_rings(&self) -> usize {
        match self {
            GeomRef::Polygon(p) => p.interiors().len(),
            _ => 0,
        }
    }

    fn interior_ring(&self, index: usize) -> Option<Self> {
        match self {
            GeomRef::Polygon(Cow::Borrowed(p)) => {
                let p: &'a Polygon<f64> = *p;
                p.interiors().get(index).map(|r| GeomRef::Ring(Cow::Borrowed(r)))
            }
            GeomRef::Polygon(Cow::Owned(p)) => p
                .interiors()
                .get(index)
                .map(|r| GeomRef::Ring(Cow::Owned(r.clone()))),
            _ => None,
        }
    }

    fn x_min(&self) -> Option<f64> {
        self.bounding_rect().map(|r| r.min().x)
    }
    fn x_max(&self) -> Option<f64> {
        self.bounding_rect().map(|r| r.max().x)
    }
    fn y_min(&self) -> Option<f64> {
        self.bounding_rect().map(|r| r.min().y)
    }
    fn y_max(&self) -> Option<f64> {
        self.bounding_rect().map(|r| r.max().y)
    }
}
