//! Output sink: one logical write to a named file or standard output.
//!
//! A short write is reported as `Truncated` and left as is; the destination is
//! not replaced atomically, so a failed write can leave a partial file behind.
//! An existing file is truncated on open, so a shorter rewrite never keeps the
//! tail of the previous contents.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Sentinel file name routing output to standard output.
pub const STDOUT_SENTINEL: &str = "-";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// `None` and `"-"` select standard output.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some(STDOUT_SENTINEL) => Destination::Stdout,
            Some(path) => Destination::File(PathBuf::from(path)),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Destination::Stdout => "<stdout>".to_string(),
            Destination::File(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Write `bytes` to `dest`, creating the file if absent.
pub fn write(dest: &Destination, bytes: &[u8]) -> Result<()> {
    let name = dest.name();
    match dest {
        Destination::Stdout => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_once(&name, &mut lock, bytes)
        }
        Destination::File(path) => {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .map_err(|e| Error::io(name.clone(), e))?;
            write_once(&name, &mut file, bytes)
        }
    }
}

/// Issue a single `write` of the whole buffer and flush; never retried.
pub fn write_once<W: Write + ?Sized>(name: &str, out: &mut W, bytes: &[u8]) -> Result<()> {
    let written = if bytes.is_empty() {
        0
    } else {
        out.write(bytes).map_err(|e| Error::io(name, e))?
    };
    out.flush().map_err(|e| Error::io(name, e))?;
    if written != bytes.len() {
        return Err(Error::Truncated {
            name: name.to_string(),
            written,
            expected: bytes.len(),
        });
    }
    tracing::debug!(dest = name, len = written, "wrote output");
    Ok(())
}
