//! Wire formats and I/O directions.

use std::fmt;
use std::str::FromStr;

/// Wire format selected per direction when a session is opened.
///
/// `None` only ever means "not configured". A reader disabled by a failed load
/// keeps its configured format; see `Session::reader_enabled`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    #[default]
    None,
    /// Well-known text.
    Text,
    /// Well-known binary.
    Binary,
    /// Well-known binary rendered as hexadecimal text.
    BinaryHex,
}

impl Format {
    pub const fn as_str(self) -> &'static str {
        match self {
            Format::None => "none",
            Format::Text => "wkt",
            Format::Binary => "wkb",
            Format::BinaryHex => "hex",
        }
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, Format::None)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown format `{}` (expected none, wkt, wkb or hex)", self.0)
    }
}

impl std::error::Error for UnknownFormat {}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Format::None),
            "wkt" | "text" => Ok(Format::Text),
            "wkb" | "binary" => Ok(Format::Binary),
            "hex" | "wkbhex" => Ok(Format::BinaryHex),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Codec direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Reader,
    Writer,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Reader => "reader",
            Direction::Writer => "writer",
        })
    }
}
