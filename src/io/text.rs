// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Plain-text container codec
//!
//! Whitespace-separated decimal tokens: vertex count, index count, then per
//! vertex position, normal, tangent (when the layout carries it) and uv,
//! then every index. Floats use the shortest form that parses back to the
//! same `f32`. There is no extent block.

use super::header::{Header, Layout, MAGIC};
use crate::error::{FormatError, WeshResult};
use crate::geometry::{MeshBuffer, Vertex};
use log::debug;
use nalgebra::{Point3, Vector2, Vector3};
use std::fmt::Write;

/// Encode a welded buffer as text
pub fn encode(mesh: &MeshBuffer, header: &Header) -> WeshResult<String> {
    let layout = header.check_against(mesh)?;
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{} {}", mesh.vertex_count(), mesh.index_count());
    for vertex in &mesh.vertices {
        let mut fields: Vec<f32> = Vec::with_capacity(layout.floats_per_vertex());
        fields.extend_from_slice(vertex.position.coords.as_slice());
        fields.extend_from_slice(vertex.normal.as_slice());
        if layout.has_tangent() {
            fields.extend_from_slice(vertex.tangent.as_slice());
        }
        fields.extend_from_slice(vertex.uv.as_slice());

        let line: Vec<String> = fields.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    let indices: Vec<String> = mesh.indices.iter().map(|i| i.to_string()).collect();
    let _ = writeln!(out, "{}", indices.join(" "));

    debug!(
        "encoded {} vertices / {} indices as text ({} bytes)",
        mesh.vertex_count(),
        mesh.index_count(),
        out.len()
    );
    Ok(out)
}

/// Decode a text stream.
///
/// Whether records carry tangents is inferred from the token count. Text
/// never carries an extent, so the returned header names the tangent layout
/// (0.2) for tangent records and the minimal layout (0.1) otherwise.
pub fn decode(text: &str) -> Result<(Header, MeshBuffer), FormatError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let vertex_count: usize = parse_token(&tokens, 0, "vertex count")?;
    let index_count: usize = parse_token(&tokens, 1, "index count")?;
    let body = tokens.len().saturating_sub(2);

    let layout = infer_layout(vertex_count, index_count, body).ok_or(FormatError::CountMismatch {
        field: "vertex",
        declared: vertex_count,
        actual: body,
    })?;
    let floats = layout.floats_per_vertex();

    let mut at = 2;
    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let mut next = || {
            let value: f32 = parse_token(&tokens, at, "vertex")?;
            at += 1;
            Ok::<f32, FormatError>(value)
        };
        let position = Point3::new(next()?, next()?, next()?);
        let normal = Vector3::new(next()?, next()?, next()?);
        let tangent = if floats == 11 {
            Vector3::new(next()?, next()?, next()?)
        } else {
            Vector3::zeros()
        };
        let uv = Vector2::new(next()?, next()?);
        vertices.push(Vertex::new(position, normal, tangent, uv));
    }

    let mut indices = Vec::with_capacity(index_count);
    for position in 0..index_count {
        let index: u32 = parse_token(&tokens, at + position, "index")?;
        if index as usize >= vertex_count {
            return Err(FormatError::IndexOutOfRange {
                position,
                index,
                vertex_count: vertex_count as u32,
            });
        }
        indices.push(index);
    }

    let (version_major, version_minor) = layout.version();
    let header = Header {
        magic: MAGIC,
        version_major,
        version_minor,
        vertex_record_size: layout.record_size(),
        vertex_count: vertex_count as u32,
        index_count: index_count as u32,
    };

    debug!(
        "decoded text stream with {} vertices / {} indices",
        vertex_count, index_count
    );
    Ok((header, MeshBuffer::new(vertices, indices)))
}

fn infer_layout(vertex_count: usize, index_count: usize, body: usize) -> Option<Layout> {
    let fits = |floats: usize| {
        vertex_count
            .checked_mul(floats)
            .and_then(|n| n.checked_add(index_count))
            == Some(body)
    };
    if fits(Layout::Tangent.floats_per_vertex()) {
        Some(Layout::Tangent)
    } else if fits(Layout::Minimal.floats_per_vertex()) {
        Some(Layout::Minimal)
    } else {
        None
    }
}

fn parse_token<T: std::str::FromStr>(tokens: &[&str], position: usize, field: &'static str) -> Result<T, FormatError> {
    let token = tokens.get(position).ok_or(FormatError::Truncated {
        section: field,
        expected: position + 1,
        actual: tokens.len(),
    })?;
    token.parse().map_err(|_| FormatError::InvalidToken {
        field,
        position,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> MeshBuffer {
        MeshBuffer::new(
            vec![
                Vertex::from_arrays([0.1, -2.5, 3.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.25, 0.75]),
                Vertex::from_arrays([1e-7, 123456.79, -0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            ],
            vec![0, 1, 1],
        )
    }

    #[test]
    fn test_text_shape() {
        let mesh = sample();
        let header = Header::new(Layout::Extended, &mesh).unwrap();
        let text = encode(&mesh, &header).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2 3");
        assert_eq!(lines[1].split_whitespace().count(), 11);
        assert_eq!(lines[3], "0 1 1");
    }

    #[test]
    fn test_text_roundtrip_with_tangents() {
        let mesh = sample();
        let header = Header::new(Layout::Tangent, &mesh).unwrap();
        let text = encode(&mesh, &header).unwrap();
        let (decoded_header, decoded) = decode(&text).unwrap();

        assert_eq!(decoded_header.layout(), Some(Layout::Tangent));
        assert!(!decoded_header.layout().unwrap().has_extent());
        assert_eq!(decoded.indices, mesh.indices);
        for (a, b) in decoded.vertices.iter().zip(&mesh.vertices) {
            assert_relative_eq!(a.position, b.position, max_relative = 1e-6);
            assert_relative_eq!(a.tangent, b.tangent, max_relative = 1e-6);
            assert_relative_eq!(a.uv, b.uv, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_text_minimal_layout() {
        let mesh = sample();
        let header = Header::new(Layout::Minimal, &mesh).unwrap();
        let text = encode(&mesh, &header).unwrap();
        let (decoded_header, decoded) = decode(&text).unwrap();
        assert_eq!(decoded_header.layout(), Some(Layout::Minimal));
        assert_eq!(decoded.vertices[0].tangent, Vector3::zeros());
        assert_eq!(decoded.vertices[1].normal, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_decode_handwritten() {
        let text = "3 3\n\
                    0 0 0 0 0 1 0 0\n\
                    1 0 0 0 0 1 1 0\n\
                    0 1 0 0 0 1 0 1\n\
                    0 1 2";
        let (_, mesh) = decode(text).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices[2].uv, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_token_count_mismatch() {
        let err = decode("2 3 0 0 0").unwrap_err();
        assert!(matches!(err, FormatError::CountMismatch { field: "vertex", declared: 2, .. }));
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(matches!(
            decode("two 3").unwrap_err(),
            FormatError::InvalidToken { field: "vertex count", position: 0, .. }
        ));
        assert!(matches!(
            decode("").unwrap_err(),
            FormatError::Truncated { section: "vertex count", .. }
        ));
        let err = decode("1 1 0 0 0 0 0 x 0 0 0").unwrap_err();
        assert!(matches!(err, FormatError::InvalidToken { field: "vertex", position: 7, .. }));
    }

    #[test]
    fn test_index_out_of_range() {
        let err = decode("1 1 0 0 0 0 0 1 0 0 5").unwrap_err();
        assert_eq!(
            err,
            FormatError::IndexOutOfRange {
                position: 0,
                index: 5,
                vertex_count: 1
            }
        );
    }
}
