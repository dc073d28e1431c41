// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Binary container codec
//!
//! # Layout
//! ```text
//! 0x00: magic u32 ("WESH")
//! 0x04: version_major u16
//! 0x06: version_minor u16
//! 0x08: vertex_record_size u32
//! 0x0C: vertex_count u32
//! 0x10: index_count u32
//! 0x14: extent 6 x f32 (0.3 only)
//! var:  vertex records: position 3 x f32, normal 3 x f32, tangent 3 x f32 (not in 0.1), uv 2 x f32
//! var:  indices, u16 (0.1) or u32
//! ```
//!
//! Each layout has its own encode/decode pair, looked up through [`codec_for`].

use super::header::{Header, Layout, HEADER_SIZE};
use crate::error::{FormatError, InvalidArgument, WeshResult};
use crate::geometry::{Extent, MeshBuffer, Vertex};
use log::debug;
use nalgebra::{Point3, Vector2, Vector3};

type EncodeFn = fn(&mut Vec<u8>, &MeshBuffer, &Extent) -> WeshResult<()>;
type DecodeFn = fn(&mut ByteReader<'_>, &Header) -> Result<(Option<Extent>, MeshBuffer), FormatError>;

/// Encode/decode pair for one layout
pub(crate) struct LayoutCodec {
    pub layout: Layout,
    pub encode: EncodeFn,
    pub decode: DecodeFn,
}

static CODECS: [LayoutCodec; 3] = [
    LayoutCodec {
        layout: Layout::Minimal,
        encode: encode_minimal,
        decode: decode_minimal,
    },
    LayoutCodec {
        layout: Layout::Tangent,
        encode: encode_tangent,
        decode: decode_tangent,
    },
    LayoutCodec {
        layout: Layout::Extended,
        encode: encode_extended,
        decode: decode_extended,
    },
];

pub(crate) fn codec_for(layout: Layout) -> &'static LayoutCodec {
    // The table covers every variant
    CODECS
        .iter()
        .find(|codec| codec.layout == layout)
        .unwrap_or(&CODECS[CODECS.len() - 1])
}

/// Encode a welded buffer behind `header`
pub fn encode(mesh: &MeshBuffer, extent: &Extent, header: &Header) -> WeshResult<Vec<u8>> {
    let layout = header.check_against(mesh)?;
    check_index_width(mesh, layout)?;
    let mut out = Vec::with_capacity(header.stream_size(layout));
    out.extend_from_slice(&header.to_bytes());
    (codec_for(layout).encode)(&mut out, mesh, extent)?;

    debug!(
        "encoded {} vertices / {} indices as binary {} ({} bytes)",
        mesh.vertex_count(),
        mesh.index_count(),
        layout.version_string(),
        out.len()
    );
    Ok(out)
}

fn check_index_width(mesh: &MeshBuffer, layout: Layout) -> Result<(), InvalidArgument> {
    let max = layout.max_index();
    match mesh.indices.iter().position(|&index| index > max) {
        Some(position) => Err(InvalidArgument::IndexOverflow {
            position,
            index: mesh.indices[position],
            width: layout.index_width(),
        }),
        None => Ok(()),
    }
}

/// Decode a complete binary stream
pub fn decode(bytes: &[u8]) -> Result<(Header, Option<Extent>, MeshBuffer), FormatError> {
    let header = Header::from_bytes(bytes)?;
    let layout = header.validate()?;

    let expected = header.stream_size(layout);
    if bytes.len() < expected {
        return Err(FormatError::Truncated {
            section: "body",
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(FormatError::TrailingBytes {
            extra: bytes.len() - expected,
        });
    }

    let mut reader = ByteReader::new(&bytes[HEADER_SIZE..]);
    let (extent, mesh) = (codec_for(layout).decode)(&mut reader, &header)?;

    if let Some((position, index)) = mesh.first_invalid_index() {
        return Err(FormatError::IndexOutOfRange {
            position,
            index,
            vertex_count: header.vertex_count,
        });
    }

    debug!(
        "decoded binary {} with {} vertices / {} indices",
        layout.version_string(),
        header.vertex_count,
        header.index_count
    );
    Ok((header, extent, mesh))
}

fn encode_minimal(out: &mut Vec<u8>, mesh: &MeshBuffer, _extent: &Extent) -> WeshResult<()> {
    write_vertices(out, &mesh.vertices, false);
    write_indices_u16(out, &mesh.indices);
    Ok(())
}

fn encode_tangent(out: &mut Vec<u8>, mesh: &MeshBuffer, _extent: &Extent) -> WeshResult<()> {
    write_vertices(out, &mesh.vertices, true);
    write_indices_u32(out, &mesh.indices);
    Ok(())
}

fn encode_extended(out: &mut Vec<u8>, mesh: &MeshBuffer, extent: &Extent) -> WeshResult<()> {
    for value in extent.to_array() {
        out.extend_from_slice(&value.to_le_bytes());
    }
    write_vertices(out, &mesh.vertices, true);
    write_indices_u32(out, &mesh.indices);
    Ok(())
}

fn decode_minimal(
    reader: &mut ByteReader<'_>,
    header: &Header,
) -> Result<(Option<Extent>, MeshBuffer), FormatError> {
    let vertices = read_vertices(reader, header.vertex_count, false)?;
    let indices = read_indices_u16(reader, header.index_count)?;
    Ok((None, MeshBuffer::new(vertices, indices)))
}

fn decode_tangent(
    reader: &mut ByteReader<'_>,
    header: &Header,
) -> Result<(Option<Extent>, MeshBuffer), FormatError> {
    let vertices = read_vertices(reader, header.vertex_count, true)?;
    let indices = read_indices_u32(reader, header.index_count)?;
    Ok((None, MeshBuffer::new(vertices, indices)))
}

fn decode_extended(
    reader: &mut ByteReader<'_>,
    header: &Header,
) -> Result<(Option<Extent>, MeshBuffer), FormatError> {
    let mut values = [0f32; 6];
    for value in &mut values {
        *value = reader.read_f32("extent")?;
    }
    let vertices = read_vertices(reader, header.vertex_count, true)?;
    let indices = read_indices_u32(reader, header.index_count)?;
    Ok((Some(Extent::from_array(values)), MeshBuffer::new(vertices, indices)))
}

fn write_vertices(out: &mut Vec<u8>, vertices: &[Vertex], tangent: bool) {
    for vertex in vertices {
        let mut put = |values: &[f32]| {
            for value in values {
                out.extend_from_slice(&value.to_le_bytes());
            }
        };
        put(vertex.position.coords.as_slice());
        put(vertex.normal.as_slice());
        if tangent {
            put(vertex.tangent.as_slice());
        }
        put(vertex.uv.as_slice());
    }
}

/// Indices are range-checked against the layout before writing
fn write_indices_u16(out: &mut Vec<u8>, indices: &[u32]) {
    for &index in indices {
        out.extend_from_slice(&(index as u16).to_le_bytes());
    }
}

fn write_indices_u32(out: &mut Vec<u8>, indices: &[u32]) {
    for index in indices {
        out.extend_from_slice(&index.to_le_bytes());
    }
}

fn read_vertices(reader: &mut ByteReader<'_>, count: u32, tangent: bool) -> Result<Vec<Vertex>, FormatError> {
    let mut vertices = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let position = reader.read_vec3("vertex")?;
        let normal = reader.read_vec3("vertex")?;
        let tangent = if tangent {
            reader.read_vec3("vertex")?
        } else {
            Vector3::zeros()
        };
        let uv = Vector2::new(reader.read_f32("vertex")?, reader.read_f32("vertex")?);
        vertices.push(Vertex::new(Point3::from(position), normal, tangent, uv));
    }
    Ok(vertices)
}

fn read_indices_u16(reader: &mut ByteReader<'_>, count: u32) -> Result<Vec<u32>, FormatError> {
    (0..count)
        .map(|_| reader.take(2, "index").map(|b| u32::from(u16::from_le_bytes([b[0], b[1]]))))
        .collect()
}

fn read_indices_u32(reader: &mut ByteReader<'_>, count: u32) -> Result<Vec<u32>, FormatError> {
    (0..count).map(|_| reader.read_u32("index")).collect()
}

/// Little-endian cursor over a byte slice
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn take(&mut self, n: usize, section: &'static str) -> Result<&'a [u8], FormatError> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            return Err(FormatError::Truncated {
                section,
                expected: end,
                actual: self.bytes.len(),
            });
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u32(&mut self, section: &'static str) -> Result<u32, FormatError> {
        let b = self.take(4, section)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_f32(&mut self, section: &'static str) -> Result<f32, FormatError> {
        let b = self.take(4, section)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_vec3(&mut self, section: &'static str) -> Result<Vector3<f32>, FormatError> {
        Ok(Vector3::new(
            self.read_f32(section)?,
            self.read_f32(section)?,
            self.read_f32(section)?,
        ))
    }
}
