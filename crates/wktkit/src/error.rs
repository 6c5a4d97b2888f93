//! Error taxonomy shared by every session operation.
//!
//! Every variant is terminal for the operation that raised it; nothing in the
//! crate retries automatically. Messages carry the offending path or stream
//! name and the underlying system error text.

use std::io;
use std::path::PathBuf;

use crate::format::{Direction, Format};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("{name}: truncated ({written} of {expected} bytes written)")]
    Truncated {
        name: String,
        written: usize,
        expected: usize,
    },

    #[error("engine initialisation failed: {reason}")]
    InitFailure { reason: String },

    #[error("{format} decode failed: {reason}")]
    Parse { format: Format, reason: String },

    #[error("{format} encode failed: {reason}")]
    Encode { format: Format, reason: String },

    #[error("unsupported coordinate dimension {0}")]
    UnsupportedDimension(u32),

    #[error("no geometry loaded")]
    NoGeometry,

    #[error("{}: load failed", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("{direction} format is disabled")]
    Disabled { direction: Direction },

    #[error("engine query failed: {0}")]
    Engine(String),

    #[error("invalid sampler configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(name: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            name: name.into(),
            source,
        }
    }

    pub(crate) fn parse(format: Format, reason: impl ToString) -> Self {
        Self::Parse {
            format,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode(format: Format, reason: impl ToString) -> Self {
        Self::Encode {
            format,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn engine(what: impl Into<String>) -> Self {
        Self::Engine(what.into())
    }
}
