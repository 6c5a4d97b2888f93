//! Axis-aligned bounds from four independent extent queries.

use crate::engine::GeometryTree;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// Query the four extents in order; the first failing query aborts, so no
/// partial bounds are ever returned.
pub fn extract<G: GeometryTree>(geom: &G) -> Result<Bounds> {
    let xmin = geom.x_min().ok_or_else(|| Error::engine("x-min query"))?;
    let xmax = geom.x_max().ok_or_else(|| Error::engine("x-max query"))?;
    let ymin = geom.y_min().ok_or_else(|| Error::engine("y-min query"))?;
    let ymax = geom.y_max().ok_or_else(|| Error::engine("y-max query"))?;
    Ok(Bounds {
        xmin,
        xmax,
        ymin,
        ymax,
    })
}
