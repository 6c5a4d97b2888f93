//! Tree iteration with early termination.
//!
//! Two levels, both stopping at the first visitor that breaks:
//! - `iterate`: direct members of a geometry, each with its type tag.
//! - `iterate_coordinates`: the vertices of one coordinate sequence.
//!
//! Polygons are not special-cased; ring-aware callers fetch rings through
//! `GeometryTree::exterior_ring`/`interior_ring` and iterate each one.

use std::ops::ControlFlow;

use crate::engine::{CoordSeq, GeomType, GeometryTree};
use crate::error::{Error, Result};

/// Visit every direct member of `geom` in tree order.
///
/// A non-collection is a one-member sequence of itself. The type tag is
/// obtained before `visit` is called; a missing member or tag is an engine
/// failure and stops the walk.
pub fn iterate<G, F>(geom: &G, mut visit: F) -> Result<()>
where
    G: GeometryTree,
    F: FnMut(&G, GeomType) -> ControlFlow<Error>,
{
    let n = geom.num_members();
    for i in 0..n {
        let member = geom
            .member(i)
            .ok_or_else(|| Error::engine(format!("member {i} of {n} unavailable")))?;
        let tag = member
            .geom_type()
            .ok_or_else(|| Error::engine(format!("member {i} has no type")))?;
        if let ControlFlow::Break(err) = visit(&member, tag) {
            return Err(err);
        }
    }
    Ok(())
}

/// Visit every vertex of `geom`'s coordinate sequence as `(index, total, x, y)`.
///
/// Sequences that are not exactly 2-D fail with `UnsupportedDimension` before
/// any vertex is visited.
pub fn iterate_coordinates<G, F>(geom: &G, mut visit: F) -> Result<()>
where
    G: GeometryTree,
    F: FnMut(usize, usize, f64, f64) -> ControlFlow<Error>,
{
    let seq = geom
        .coord_seq()
        .ok_or_else(|| Error::engine("geometry has no coordinate sequence"))?;
    let dims = seq.dimensions();
    if dims != 2 {
        return Err(Error::UnsupportedDimension(dims));
    }
    let total = seq.size();
    for i in 0..total {
        let (x, y) = seq
            .xy(i)
            .ok_or_else(|| Error::engine(format!("vertex {i} of {total} unavailable")))?;
        if let ControlFlow::Break(err) = visit(i, total, x, y) {
            return Err(err);
        }
    }
    Ok(())
}
