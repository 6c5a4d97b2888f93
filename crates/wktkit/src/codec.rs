//! Codec set: one decoder/encoder pair per wire format.
//!
//! A `Codec` is created once per session direction from the engine context and
//! dispatched by variant; there is no codec for `Format::None`.

use geo::Geometry;
use wkt::{ToWkt, TryFromWkt};

use crate::engine::{wkb, ByteOrder, Context, HexCase};
use crate::error::{Error, Result};
use crate::format::Format;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Codec {
    Text,
    Binary { byte_order: ByteOrder },
    BinaryHex { byte_order: ByteOrder, case: HexCase },
}

impl Codec {
    /// Instantiate the codec for `format`, or `None` when the format is unset.
    pub fn new(format: Format, ctx: &Context) -> Result<Option<Self>> {
        let cfg = ctx.cfg();
        let codec = match format {
            Format::None => return Ok(None),
            Format::Text => Codec::Text,
            Format::Binary => Codec::Binary {
                byte_order: cfg.byte_order,
            },
            Format::BinaryHex => Codec::BinaryHex {
                byte_order: cfg.byte_order,
                case: cfg.hex_case,
            },
        };
        tracing::debug!(%format, "codec created");
        Ok(Some(codec))
    }

    pub fn format(&self) -> Format {
        match self {
            Codec::Text => Format::Text,
            Codec::Binary { .. } => Format::Binary,
            Codec::BinaryHex { .. } => Format::BinaryHex,
        }
    }

    pub fn decode(&self, input: &[u8]) -> Result<Geometry<f64>> {
        let format = self.format();
        match self {
            Codec::Text => {
                let text = std::str::from_utf8(input).map_err(|e| Error::parse(format, e))?;
                Geometry::<f64>::try_from_wkt_str(text.trim()).map_err(|e| Error::parse(format, e))
            }
            Codec::Binary { .. } => wkb::read(input).map_err(|e| Error::parse(format, e)),
            Codec::BinaryHex { .. } => {
                let bytes = hex::decode(input.trim_ascii()).map_err(|e| Error::parse(format, e))?;
                wkb::read(&bytes).map_err(|e| Error::parse(format, e))
            }
        }
    }

    pub fn encode(&self, geom: &Geometry<f64>) -> Result<Vec<u8>> {
        match *self {
            Codec::Text => {
                let text = geom.wkt_string();
                if text.is_empty() {
                    return Err(Error::encode(Format::Text, "engine produced no text"));
                }
                Ok(text.into_bytes())
            }
            Codec::Binary { byte_order } => {
                wkb::write(geom, byte_order).map_err(|e| Error::encode(Format::Binary, e))
            }
            Codec::BinaryHex { byte_order, case } => {
                let bytes =
                    wkb::write(geom, byte_order).map_err(|e| Error::encode(Format::BinaryHex, e))?;
                let text = match case {
                    HexCase::Upper => hex::encode_upper(bytes),
                    HexCase::Lower => hex::encode(bytes),
                };
                Ok(text.into_bytes())
            }
        }
    }
}
