//! Input ingestion: read-only memory mapping of a named file.
//!
//! The mapping is never copied. Callers borrow `as_bytes()` for as long as the
//! `MappedInput` lives; the session keeps it alive until close.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{Error, Result};

enum Backing {
    /// Zero-length files cannot be mapped on every platform.
    Empty,
    Mapped(Mmap),
}

/// A read-only view of a whole file.
pub struct MappedInput {
    path: PathBuf,
    backing: Backing,
}

impl MappedInput {
    /// Map `path` read-only. Missing files report `NotFound`; any other
    /// open/stat/map failure reports `Io` with the path and system error text.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| classify(path, e))?;
        let meta = file.metadata().map_err(|e| classify(path, e))?;
        if !meta.is_file() {
            let source = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
            return Err(Error::io(path.display().to_string(), source));
        }
        let len = meta.len();
        let backing = if len == 0 {
            Backing::Empty
        } else {
            // SAFETY: the map is read-only and private to this process; the
            // file is opened read-only and never written through this handle.
            let map = unsafe { Mmap::map(&file) }.map_err(|e| classify(path, e))?;
            Backing::Mapped(map)
        };
        tracing::debug!(path = %path.display(), len, "mapped input");
        Ok(Self {
            path: path.to_path_buf(),
            backing,
        })
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Empty => &[],
            Backing::Mapped(map) => map,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for MappedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedInput")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}

fn classify(path: &Path, source: io::Error) -> Error {
    if source.kind() == io::ErrorKind::NotFound {
        Error::NotFound {
            path: path.to_path_buf(),
            source,
        }
    } else {
        Error::io(path.display().to_string(), source)
    }
}
