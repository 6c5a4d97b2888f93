//! Geometry session: one engine context plus the codecs, input and decoded
//! geometry that live and die with it.
//!
//! Purpose
//! - Compose ingestion, the codec set and the output sink into
//!   `open → load → emit → close`.
//! - Own every engine-side object so that teardown order is explicit:
//!   reader codec, writer codec, decoded geometry, input mapping, context.
//!
//! States
//! - `Open` after `Session::open`, `Loaded` after a successful `load`.
//!   Closed is the consumed session (`close(self)` or drop).
//! - A failed load disables the reader for the rest of the session. The
//!   configured format is kept; `reader_enabled()` reports the difference.

use std::ops::ControlFlow;
use std::path::Path;

use geo::Geometry;

use crate::bounds::{self, Bounds};
use crate::codec::Codec;
use crate::engine::{Context, EngineCfg, GeomRef, GeomType};
use crate::error::{Error, Result};
use crate::format::{Direction, Format};
use crate::input::MappedInput;
use crate::iterate;
use crate::output::{self, Destination};

/// Session configuration; formats are fixed once the session is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionCfg {
    pub reader: Format,
    pub writer: Format,
    pub engine: EngineCfg,
}

impl SessionCfg {
    pub fn new(reader: Format, writer: Format) -> Self {
        Self {
            reader,
            writer,
            engine: EngineCfg::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Loaded,
}

pub struct Session {
    reader_format: Format,
    writer_format: Format,
    reader_enabled: bool,
    reader: Option<Codec>,
    writer: Option<Codec>,
    geometry: Option<Geometry<f64>>,
    input: Option<MappedInput>,
    context: Option<Context>,
}

impl Session {
    /// Create the engine context, then the codecs for each configured format.
    pub fn open(cfg: SessionCfg) -> Result<Self> {
        let context = Context::init(cfg.engine)?;
        let reader = Codec::new(cfg.reader, &context)?;
        let writer = Codec::new(cfg.writer, &context)?;
        tracing::debug!(reader = %cfg.reader, writer = %cfg.writer, "session open");
        Ok(Self {
            reader_format: cfg.reader,
            writer_format: cfg.writer,
            reader_enabled: reader.is_some(),
            reader,
            writer,
            geometry: None,
            input: None,
            context: Some(context),
        })
    }

    pub fn state(&self) -> SessionState {
        if self.geometry.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Open
        }
    }

    pub fn reader_format(&self) -> Format {
        self.reader_format
    }

    pub fn writer_format(&self) -> Format {
        self.writer_format
    }

    /// False when no reader was configured or a previous load failed.
    pub fn reader_enabled(&self) -> bool {
        self.reader_enabled
    }

    pub fn context(&self) -> Result<&Context> {
        self.context
            .as_ref()
            .ok_or_else(|| Error::engine("engine context released"))
    }

    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }

    /// Take ownership of the decoded geometry; the session drops back to Open.
    pub fn take_geometry(&mut self) -> Option<Geometry<f64>> {
        self.geometry.take()
    }

    /// Map `path` and decode it with the reader codec.
    ///
    /// Any failure disables the reader, clears a previously decoded geometry
    /// and reports `Load` with the cause attached.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        match self.try_load(path) {
            Ok((input, geometry)) => {
                tracing::debug!(path = %path.display(), len = input.len(), "loaded");
                self.input = Some(input);
                self.geometry = Some(geometry);
                Ok(())
            }
            Err(cause) => {
                tracing::debug!(path = %path.display(), error = %cause, "load failed, reader disabled");
                self.reader_enabled = false;
                self.geometry = None;
                Err(Error::Load {
                    path: path.to_path_buf(),
                    source: Box::new(cause),
                })
            }
        }
    }

    fn try_load(&self, path: &Path) -> Result<(MappedInput, Geometry<f64>)> {
        let reader = match self.reader {
            Some(codec) if self.reader_enabled => codec,
            _ => {
                return Err(Error::Disabled {
                    direction: Direction::Reader,
                })
            }
        };
        let input = MappedInput::open(path)?;
        let geometry = reader.decode(input.as_bytes())?;
        Ok((input, geometry))
    }

    /// Encode `geom` with the writer codec and hand the bytes to the sink.
    /// The encoded buffer is released whether or not the write succeeds.
    pub fn emit(&self, dest: &Destination, geom: &Geometry<f64>) -> Result<()> {
        let writer = self.writer.ok_or(Error::Disabled {
            direction: Direction::Writer,
        })?;
        let bytes = writer.encode(geom)?;
        let res = output::write(dest, &bytes);
        drop(bytes);
        if res.is_ok() {
            tracing::debug!(%dest, format = %writer.format(), "emitted");
        }
        res
    }

    /// Bounds of the decoded geometry.
    pub fn bounds(&self) -> Result<Bounds> {
        let geom = self.geometry.as_ref().ok_or(Error::NoGeometry)?;
        bounds::extract(&GeomRef::from(geom))
    }

    /// Walk the members of the decoded geometry.
    pub fn iterate<F>(&self, visit: F) -> Result<()>
    where
        F: FnMut(&GeomRef<'_>, GeomType) -> ControlFlow<Error>,
    {
        let geom = self.geometry.as_ref().ok_or(Error::NoGeometry)?;
        iterate::iterate(&GeomRef::from(geom), visit)
    }

    /// Release everything in teardown order. Dropping the session does the same.
    pub fn close(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.reader.take().is_some() {
            tracing::debug!("reader codec destroyed");
        }
        if self.writer.take().is_some() {
            tracing::debug!("writer codec destroyed");
        }
        if self.geometry.take().is_some() {
            tracing::debug!("geometry destroyed");
        }
        if self.input.take().is_some() {
            tracing::debug!("input unmapped");
        }
        if self.context.take().is_some() {
            tracing::debug!("engine context finished");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("reader", &self.reader_format)
            .field("writer", &self.writer_format)
            .field("reader_enabled", &self.reader_enabled)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests;
