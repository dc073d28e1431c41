// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Representation-level entry points over the text and binary codecs

use super::header::{Header, Layout, MAGIC};
use super::{binary, text};
use crate::error::{FormatError, WeshResult};
use crate::geometry::{Extent, MeshBuffer, Welded};
use serde::{Deserialize, Serialize};

/// Serialized representation of a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Text,
    #[default]
    Binary,
}

impl Representation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Text => "text",
            Representation::Binary => "binary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "ascii" => Some(Representation::Text),
            "binary" | "bin" => Some(Representation::Binary),
            _ => None,
        }
    }

    /// Binary when the stream opens with the magic, text otherwise
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.len() >= 4 && bytes[0..4] == MAGIC.to_le_bytes() {
            Representation::Binary
        } else {
            Representation::Text
        }
    }
}

/// Result of decoding a container
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub header: Header,
    /// Present only for layouts carrying an extent block
    pub extent: Option<Extent>,
    pub mesh: MeshBuffer,
}

impl Decoded {
    pub fn layout(&self) -> Option<Layout> {
        self.header.layout()
    }
}

/// Serialize a welded buffer in the requested representation
pub fn encode(
    mesh: &MeshBuffer,
    extent: &Extent,
    header: &Header,
    representation: Representation,
) -> WeshResult<Vec<u8>> {
    match representation {
        Representation::Binary => binary::encode(mesh, extent, header),
        Representation::Text => text::encode(mesh, header).map(String::into_bytes),
    }
}

/// Parse a complete stream in the given representation
pub fn decode(bytes: &[u8], representation: Representation) -> WeshResult<Decoded> {
    match representation {
        Representation::Binary => {
            let (header, extent, mesh) = binary::decode(bytes)?;
            Ok(Decoded {
                header,
                extent,
                mesh,
            })
        }
        Representation::Text => {
            let source = std::str::from_utf8(bytes).map_err(|e| FormatError::InvalidToken {
                field: "text",
                position: e.valid_up_to(),
                token: String::from("<non-utf8>"),
            })?;
            let (header, mesh) = text::decode(source)?;
            Ok(Decoded {
                header,
                extent: None,
                mesh,
            })
        }
    }
}

/// Parse a stream, picking the representation from its first bytes
pub fn decode_auto(bytes: &[u8]) -> WeshResult<Decoded> {
    decode(bytes, Representation::detect(bytes))
}

/// Compute the header for `welded` in `layout` and serialize it
pub fn encode_welded(welded: &Welded, layout: Layout, representation: Representation) -> WeshResult<Vec<u8>> {
    let header = Header::new(layout, &welded.mesh)?;
    encode(&welded.mesh, &welded.extent, &header, representation)
}
