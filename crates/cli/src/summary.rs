//! Structural summaries composed from the tree walks.
//!
//! Polygons are walked ring by ring (exterior, then interiors); collections
//! recurse into their members. Both `info` and `dump` go through
//! [`for_each_vertex`], so their vertex counts always agree.

use std::io::Write;
use std::ops::ControlFlow;

use serde::Serialize;
use wktkit::iterate::{iterate, iterate_coordinates};
use wktkit::prelude::*;

/// Visit every vertex under `geom` as `(x, y)`, stopping at the first break.
pub fn for_each_vertex<G, F>(geom: &G, visit: &mut F) -> Result<()>
where
    G: GeometryTree,
    F: FnMut(f64, f64) -> ControlFlow<Error>,
{
    let tag = geom
        .geom_type()
        .ok_or_else(|| Error::Engine("geometry has no type".into()))?;
    if tag.is_collection() {
        return iterate(geom, |member, _| match for_each_vertex(member, &mut *visit) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => ControlFlow::Break(e),
        });
    }
    if tag == GeomType::Polygon {
        for ring in rings(geom)? {
            iterate_coordinates(&ring, |_, _, x, y| visit(x, y))?;
        }
        return Ok(());
    }
    iterate_coordinates(geom, |_, _, x, y| visit(x, y))
}

/// Exterior ring followed by the interior rings.
pub fn rings<G: GeometryTree>(polygon: &G) -> Result<Vec<G>> {
    let exterior = polygon
        .exterior_ring()
        .ok_or_else(|| Error::Engine("polygon has no exterior ring".into()))?;
    let n = polygon.num_interior_rings();
    let mut out = Vec::with_capacity(n + 1);
    out.push(exterior);
    for i in 0..n {
        let ring = polygon
            .interior_ring(i)
            .ok_or_else(|| Error::Engine(format!("interior ring {i} of {n} unavailable")))?;
        out.push(ring);
    }
    Ok(out)
}

pub fn vertex_count<G: GeometryTree>(geom: &G) -> Result<usize> {
    let mut n = 0usize;
    for_each_vertex(geom, &mut |_, _| {
        n += 1;
        ControlFlow::Continue(())
    })?;
    Ok(n)
}

#[derive(Clone, Debug, Serialize)]
pub struct MemberInfo {
    pub index: usize,
    #[serde(rename = "type")]
    pub geom_type: String,
    pub vertices: usize,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct BoundsInfo {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl From<Bounds> for BoundsInfo {
    fn from(b: Bounds) -> Self {
        Self {
            xmin: b.xmin,
            xmax: b.xmax,
            ymin: b.ymin,
            ymax: b.ymax,
        }
    }
}

/// JSON document printed by `wktkit info`.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    #[serde(rename = "type")]
    pub geom_type: String,
    pub member_count: usize,
    pub vertex_count: usize,
    pub members: Vec<MemberInfo>,
    /// Absent for empty geometries.
    pub bounds: Option<BoundsInfo>,
}

pub fn summarize(geom: &Geometry<f64>) -> Result<Summary> {
    let view = GeomRef::from(geom);
    let geom_type = view
        .geom_type()
        .ok_or_else(|| Error::Engine("geometry has no type".into()))?;
    let mut members = Vec::with_capacity(view.num_members());
    iterate(&view, |member, tag| match vertex_count(member) {
        Ok(vertices) => {
            members.push(MemberInfo {
                index: members.len(),
                geom_type: tag.to_string(),
                vertices,
            });
            ControlFlow::Continue(())
        }
        Err(e) => ControlFlow::Break(e),
    })?;
    let bounds = match wktkit::bounds::extract(&view) {
        Ok(b) => Some(b.into()),
        Err(Error::Engine(_)) => None,
        Err(e) => return Err(e),
    };
    Ok(Summary {
        geom_type: geom_type.to_string(),
        member_count: members.len(),
        vertex_count: members.iter().map(|m| m.vertices).sum(),
        members,
        bounds,
    })
}

/// Write `# <index> <type>` per member followed by one `x y` line per vertex.
pub fn dump<W: Write + ?Sized>(geom: &Geometry<f64>, out: &mut W) -> Result<()> {
    let view = GeomRef::from(geom);
    let to_err = |e: std::io::Error| Error::Io {
        name: "dump".into(),
        source: e,
    };
    let mut index = 0usize;
    iterate(&view, |member, tag| {
        if let Err(e) = writeln!(out, "# {index} {tag}") {
            return ControlFlow::Break(to_err(e));
        }
        index += 1;
        match for_each_vertex(member, &mut |x, y| match writeln!(out, "{x} {y}") {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => ControlFlow::Break(to_err(e)),
        }) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => ControlFlow::Break(e),
        }
    })
}
