//! Geometry session and format layer for WKT/WKB tooling.
//!
//! A [`Session`] owns one engine context, the reader/writer codecs chosen at
//! open time, the memory-mapped input and the decoded geometry. Tools compose
//! `open → load → {bounds | iterate | sample | engine op} → emit → close`.
//!
//! Layout
//! - `input`/`output`: zero-copy file mapping and the single-write sink.
//! - `codec`: text, binary and hex-binary codecs.
//! - `engine`: the geo-backed engine context and the `GeometryTree` view.
//! - `iterate`/`bounds`: read-only walks over a decoded tree.
//! - `sampler`: constrained random points in a rectangle.

pub mod bounds;
pub mod codec;
pub mod engine;
pub mod error;
pub mod format;
pub mod input;
pub mod iterate;
pub mod output;
pub mod sampler;
pub mod session;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use bounds::Bounds;
pub use error::{Error, Result};
pub use format::{Direction, Format};
pub use output::Destination;
pub use session::{Session, SessionCfg, SessionState};

/// Common exports for tools.
pub mod prelude {
    pub use crate::bounds::Bounds;
    pub use crate::engine::{
        ByteOrder, Context, CoordSeq, EngineCfg, GeomRef, GeomType, GeometryTree, HexCase,
    };
    pub use crate::error::{Error, Result};
    pub use crate::format::Format;
    pub use crate::iterate::{iterate, iterate_coordinates};
    pub use crate::output::Destination;
    pub use crate::sampler::{sample, sample_points, SampleCfg, SampleRun};
    pub use crate::session::{Session, SessionCfg, SessionState};
    pub use geo::Geometry;
}
