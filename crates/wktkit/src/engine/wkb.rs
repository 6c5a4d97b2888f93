//! Well-known binary through georust's `wkb` crate, with the engine's input
//! policy checked first.
//!
//! Reader
//! - A header walk validates the buffer before any decoding: byte order
//!   markers, 2-D type codes only (ISO Z/M codes and EWKB Z/M flags are
//!   rejected), member kinds of multi-geometries, nesting depth, truncation
//!   and trailing bytes.
//! - A top-level EWKB SRID is stripped; the rest is decoded by `wkb` and
//!   converted to geo-types.
//!
//! Writer
//! - Emits ISO 2-D WKB in the configured byte order. geo-only shapes are
//!   written as their standard equivalents (`Line` as a two-point line string,
//!   `Rect`/`Triangle` as polygons).

use geo::{Geometry, GeometryCollection, LineString};
use geo_traits::to_geo::ToGeoGeometry;
use ::wkb::writer::{write_geometry, WriteOptions};
use ::wkb::Endianness;

use super::ByteOrder;

const POINT: u32 = 1;
const LINE_STRING: u32 = 2;
const POLYGON: u32 = 3;
const MULTI_POINT: u32 = 4;
const MULTI_LINE_STRING: u32 = 5;
const MULTI_POLYGON: u32 = 6;
const GEOMETRY_COLLECTION: u32 = 7;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Deepest accepted nesting of multi-geometries and collections.
pub const MAX_DEPTH: usize = 256;

/// Reasons a byte stream is not acceptable WKB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WkbError {
    UnexpectedEof { offset: usize },
    BadByteOrder(u8),
    UnknownType(u32),
    UnsupportedDimension(u32),
    TrailingBytes(usize),
    EmptyPoint,
    /// Multi-geometry member of the wrong kind.
    BadMember { expected: u32, found: u32 },
    /// An SRID on a nested member.
    NestedSrid { offset: usize },
    TooDeep(usize),
    Decode(String),
    Encode(String),
}

impl std::fmt::Display for WkbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEof { offset } => write!(f, "unexpected end of input at byte {offset}"),
            Self::BadByteOrder(b) => write!(f, "invalid byte order marker {b:#04x}"),
            Self::UnknownType(t) => write!(f, "unknown geometry type {t}"),
            Self::UnsupportedDimension(d) => write!(f, "{d}-dimensional coordinates are not supported"),
            Self::TrailingBytes(n) => write!(f, "{n} trailing bytes after geometry"),
            Self::EmptyPoint => write!(f, "empty point cannot be represented"),
            Self::BadMember { expected, found } => {
                write!(f, "collection member of type {found}, expected {expected}")
            }
            Self::NestedSrid { offset } => write!(f, "SRID on nested geometry at byte {offset}"),
            Self::TooDeep(limit) => write!(f, "geometry nested deeper than {limit} levels"),
            Self::Decode(msg) => f.write_str(msg),
            Self::Encode(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for WkbError {}

/// Header walk over the raw bytes. Coordinates are skipped, except point
/// bodies which are checked for the empty-point encoding.
struct Scan<'a> {
    buf: &'a [u8],
    pos: usize,
    srid: bool,
}

impl Scan<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], WkbError> {
        let end = self.pos + N;
        let bytes = self
            .buf
            .get(self.pos..end)
            .ok_or(WkbError::UnexpectedEof { offset: self.pos })?;
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn u32(&mut self, order: ByteOrder) -> Result<u32, WkbError> {
        let b = self.take::<4>()?;
        Ok(match order {
            ByteOrder::Little => u32::from_le_bytes(b),
            ByteOrder::Big => u32::from_be_bytes(b),
        })
    }

    fn f64(&mut self, order: ByteOrder) -> Result<f64, WkbError> {
        let b = self.take::<8>()?;
        Ok(match order {
            ByteOrder::Little => f64::from_le_bytes(b),
            ByteOrder::Big => f64::from_be_bytes(b),
        })
    }

    /// Element count, bounded by what the remaining input could hold.
    fn count(&mut self, order: ByteOrder, min_item: usize) -> Result<usize, WkbError> {
        let offset = self.pos;
        let n = self.u32(order)? as usize;
        if n.saturating_mul(min_item) > self.buf.len() - self.pos {
            return Err(WkbError::UnexpectedEof { offset });
        }
        Ok(n)
    }

    fn skip_coords(&mut self, order: ByteOrder) -> Result<(), WkbError> {
        let n = self.count(order, 16)?;
        // bounded by `count`
        self.pos += n * 16;
        Ok(())
    }

    fn header(&mut self, depth: usize) -> Result<(ByteOrder, u32), WkbError> {
        let offset = self.pos;
        let order = match self.take::<1>()?[0] {
            0 => ByteOrder::Big,
            1 => ByteOrder::Little,
            other => return Err(WkbError::BadByteOrder(other)),
        };
        let raw = self.u32(order)?;
        if raw & (EWKB_Z | EWKB_M) != 0 {
            let dims = 2 + u32::from(raw & EWKB_Z != 0) + u32::from(raw & EWKB_M != 0);
            return Err(WkbError::UnsupportedDimension(dims));
        }
        if raw & EWKB_SRID != 0 {
            if depth > 0 {
                return Err(WkbError::NestedSrid { offset });
            }
            self.u32(order)?;
            self.srid = true;
        }
        let code = raw & 0x0fff_ffff;
        match code / 1000 {
            0 => Ok((order, code)),
            1 | 2 => Err(WkbError::UnsupportedDimension(3)),
            3 => Err(WkbError::UnsupportedDimension(4)),
            _ => Err(WkbError::UnknownType(code)),
        }
    }

    fn geometry(&mut self, depth: usize, expected: Option<u32>) -> Result<(), WkbError> {
        if depth > MAX_DEPTH {
            return Err(WkbError::TooDeep(MAX_DEPTH));
        }
        let (order, code) = self.header(depth)?;
        if let Some(expected) = expected.filter(|&e| e != code) {
            return Err(WkbError::BadMember {
                expected,
                found: code,
            });
        }
        match code {
            POINT => {
                let (x, y) = (self.f64(order)?, self.f64(order)?);
                if x.is_nan() && y.is_nan() {
                    return Err(WkbError::EmptyPoint);
                }
            }
            LINE_STRING => self.skip_coords(order)?,
            POLYGON => {
                for _ in 0..self.count(order, 4)? {
                    self.skip_coords(order)?;
                }
            }
            MULTI_POINT => self.members(order, depth, Some(POINT), 21)?,
            MULTI_LINE_STRING => self.members(order, depth, Some(LINE_STRING), 9)?,
            MULTI_POLYGON => self.members(order, depth, Some(POLYGON), 9)?,
            GEOMETRY_COLLECTION => self.members(order, depth, None, 5)?,
            other => return Err(WkbError::UnknownType(other)),
        }
        Ok(())
    }

    fn members(
        &mut self,
        order: ByteOrder,
        depth: usize,
        kind: Option<u32>,
        min_item: usize,
    ) -> Result<(), WkbError> {
        for _ in 0..self.count(order, min_item)? {
            self.geometry(depth + 1, kind)?;
        }
        Ok(())
    }
}

/// Copy of `buf` with the top-level SRID flag and value removed.
fn strip_srid(buf: &[u8]) -> Result<Vec<u8>, WkbError> {
    let eof = |offset| WkbError::UnexpectedEof { offset };
    let marker = *buf.first().ok_or(eof(0))?;
    let raw: [u8; 4] = buf
        .get(1..5)
        .and_then(|b| b.try_into().ok())
        .ok_or(eof(1))?;
    let body = buf.get(9..).ok_or(eof(5))?;
    let code = if marker == 0 {
        (u32::from_be_bytes(raw) & !EWKB_SRID).to_be_bytes()
    } else {
        (u32::from_le_bytes(raw) & !EWKB_SRID).to_le_bytes()
    };
    let mut out = Vec::with_capacity(buf.len() - 4);
    out.push(marker);
    out.extend_from_slice(&code);
    out.extend_from_slice(body);
    Ok(out)
}

/// Decode one geometry that must span the whole buffer.
pub fn read(buf: &[u8]) -> Result<Geometry<f64>, WkbError> {
    let mut scan = Scan {
        buf,
        pos: 0,
        srid: false,
    };
    scan.geometry(0, None)?;
    if scan.pos != buf.len() {
        return Err(WkbError::TrailingBytes(buf.len() - scan.pos));
    }
    let stripped;
    let bytes = if scan.srid {
        stripped = strip_srid(buf)?;
        stripped.as_slice()
    } else {
        buf
    };
    let parsed = ::wkb::reader::read_wkb(bytes).map_err(|e| WkbError::Decode(e.to_string()))?;
    parsed
        .try_to_geometry()
        .ok_or_else(|| WkbError::Decode("geometry has no geo-types equivalent".into()))
}

/// Rewrite geo-only shapes as their standard WKB equivalents.
fn standardize(geom: &Geometry<f64>) -> Geometry<f64> {
    match geom {
        Geometry::Line(l) => Geometry::LineString(LineString::from(vec![l.start, l.end])),
        Geometry::Rect(r) => Geometry::Polygon(r.to_polygon()),
        Geometry::Triangle(t) => Geometry::Polygon(t.to_polygon()),
        Geometry::GeometryCollection(gc) => Geometry::GeometryCollection(GeometryCollection(
            gc.0.iter().map(standardize).collect(),
        )),
        other => other.clone(),
    }
}

/// Encode `geom` as 2-D WKB.
pub fn write(geom: &Geometry<f64>, order: ByteOrder) -> Result<Vec<u8>, WkbError> {
    let endianness = match order {
        ByteOrder::Big => Endianness::BigEndian,
        ByteOrder::Little => Endianness::LittleEndian,
    };
    let mut out = Vec::new();
    write_geometry(&mut out, &standardize(geom), &WriteOptions { endianness })
        .map_err(|e| WkbError::Encode(e.to_string()))?;
    Ok(out)
}
