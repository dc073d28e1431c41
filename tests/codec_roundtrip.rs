// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Round-trip and rejection tests for the container codecs

use anyhow::Result;
use nalgebra::Vector3;
use tempfile::NamedTempFile;
use wesh::error::{FormatError, InvalidArgument, WeshError};
use wesh::geometry::{weld_stream, weld_with, MeshBuffer, Primitive, Vertex, WeldOptions, Welded};
use wesh::io::{self, Header, Layout, Representation, EXTENT_SIZE, HEADER_SIZE, MAGIC};

fn sphere() -> Welded {
    let stream = Primitive::sphere(5.0, 16).to_loop_stream();
    weld_stream(&stream, &WeldOptions::default()).unwrap()
}

fn without_tangents(mesh: &MeshBuffer) -> MeshBuffer {
    let mut mesh = mesh.clone();
    for vertex in &mut mesh.vertices {
        vertex.tangent = Vector3::zeros();
    }
    mesh
}

fn expect_format(result: wesh::WeshResult<io::Decoded>) -> FormatError {
    match result {
        Err(WeshError::Format(err)) => err,
        other => panic!("expected a format error, got {:?}", other.map(|d| d.header)),
    }
}

#[test]
fn test_binary_roundtrip_every_layout() -> Result<()> {
    let welded = sphere();

    for layout in Layout::ALL {
        let bytes = io::encode_welded(&welded, layout, Representation::Binary)?;
        let decoded = io::decode(&bytes, Representation::Binary)?;

        assert_eq!(decoded.layout(), Some(layout));
        assert_eq!(decoded.header.vertex_record_size, layout.record_size());
        assert_eq!(decoded.mesh.indices, welded.mesh.indices);
        if layout.has_tangent() {
            assert_eq!(decoded.mesh, welded.mesh);
        } else {
            assert_eq!(decoded.mesh, without_tangents(&welded.mesh));
        }
        assert_eq!(decoded.extent.is_some(), layout.has_extent());
    }
    Ok(())
}

#[test]
fn test_binary_stream_sizes() -> Result<()> {
    let welded = sphere();
    let vc = welded.mesh.vertex_count();
    let ic = welded.mesh.index_count();

    let current = io::encode_welded(&welded, Layout::Extended, Representation::Binary)?;
    assert_eq!(current.len(), HEADER_SIZE + EXTENT_SIZE + 44 * vc + 4 * ic);
    assert_eq!(&current[0..4], &MAGIC.to_le_bytes());
    assert_eq!(&current[0..4], b"WESH");

    let tangent = io::encode_welded(&welded, Layout::Tangent, Representation::Binary)?;
    assert_eq!(tangent.len(), HEADER_SIZE + 44 * vc + 4 * ic);

    let minimal = io::encode_welded(&welded, Layout::Minimal, Representation::Binary)?;
    assert_eq!(minimal.len(), HEADER_SIZE + 32 * vc + 2 * ic);
    Ok(())
}

#[test]
fn test_extended_extent_block() -> Result<()> {
    let welded = sphere();
    let bytes = io::encode_welded(&welded, Layout::Extended, Representation::Binary)?;

    let block = &bytes[HEADER_SIZE..HEADER_SIZE + EXTENT_SIZE];
    let values: Vec<f32> = block
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    assert_eq!(values, welded.extent.to_array().to_vec());
    Ok(())
}

#[test]
fn test_text_roundtrip() -> Result<()> {
    let welded = sphere();

    let text = io::encode_welded(&welded, Layout::CURRENT, Representation::Text)?;
    let decoded = io::decode(&text, Representation::Text)?;
    // Text has no extent block, so tangent records read back as 0.2
    assert_eq!(decoded.layout(), Some(Layout::Tangent));
    assert_eq!(decoded.mesh, welded.mesh);
    assert!(decoded.extent.is_none());

    let text = io::encode_welded(&welded, Layout::Minimal, Representation::Text)?;
    let decoded = io::decode_auto(&text)?;
    assert_eq!(decoded.layout(), Some(Layout::Minimal));
    assert_eq!(decoded.mesh, without_tangents(&welded.mesh));
    Ok(())
}

#[test]
fn test_text_line_structure() -> Result<()> {
    let loops = [
        Vertex::from_arrays([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
        Vertex::from_arrays([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 0.0]),
        Vertex::from_arrays([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0]),
    ];
    let identity = WeldOptions::default().with_basis(wesh::geometry::AxisBasis::Identity);
    let welded = weld_with(&loops, &identity)?;

    let bytes = io::encode_welded(&welded, Layout::Minimal, Representation::Text)?;
    let text = String::from_utf8(bytes)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "3 3");
    assert_eq!(lines[2], "1 0 0 0 0 1 1 0");
    assert_eq!(lines[4], "0 1 2");
    Ok(())
}

#[test]
fn test_bad_magic_rejected() -> Result<()> {
    let mut bytes = io::encode_welded(&sphere(), Layout::CURRENT, Representation::Binary)?;
    bytes[0] ^= 0xFF;

    let err = expect_format(io::decode(&bytes, Representation::Binary));
    assert!(matches!(err, FormatError::BadMagic { expected, .. } if expected == MAGIC));
    Ok(())
}

#[test]
fn test_unsupported_version_rejected() -> Result<()> {
    let mut bytes = io::encode_welded(&sphere(), Layout::CURRENT, Representation::Binary)?;
    bytes[4..6].copy_from_slice(&1u16.to_le_bytes());

    let err = expect_format(io::decode(&bytes, Representation::Binary));
    assert_eq!(err, FormatError::UnsupportedVersion { major: 1, minor: 3 });
    Ok(())
}

#[test]
fn test_truncated_and_trailing_rejected() -> Result<()> {
    let bytes = io::encode_welded(&sphere(), Layout::Tangent, Representation::Binary)?;

    let err = expect_format(io::decode(&bytes[..bytes.len() - 1], Representation::Binary));
    assert!(matches!(err, FormatError::Truncated { .. }));

    let err = expect_format(io::decode(&bytes[..HEADER_SIZE - 4], Representation::Binary));
    assert!(matches!(err, FormatError::Truncated { section: "header", .. }));

    let mut padded = bytes.clone();
    padded.extend_from_slice(&[0, 0]);
    let err = expect_format(io::decode(&padded, Representation::Binary));
    assert_eq!(err, FormatError::TrailingBytes { extra: 2 });
    Ok(())
}

#[test]
fn test_out_of_range_index_rejected() -> Result<()> {
    let welded = sphere();
    let mut bytes = io::encode_welded(&welded, Layout::Tangent, Representation::Binary)?;
    let last = bytes.len() - 4;
    bytes[last..].copy_from_slice(&(welded.mesh.vertex_count() as u32).to_le_bytes());

    let err = expect_format(io::decode(&bytes, Representation::Binary));
    assert!(matches!(err, FormatError::IndexOutOfRange { .. }));
    Ok(())
}

#[test]
fn test_header_must_describe_buffer() {
    let welded = sphere();
    let mut header = Header::new(Layout::CURRENT, &welded.mesh).unwrap();
    header.vertex_count += 1;

    let result = io::encode(&welded.mesh, &welded.extent, &header, Representation::Binary);
    assert!(matches!(
        result,
        Err(WeshError::InvalidArgument(InvalidArgument::HeaderMismatch { .. }))
    ));
}

#[test]
fn test_minimal_layout_index_width() {
    let vertices = vec![Vertex::default(); 70_000];
    let mesh = MeshBuffer::new(vertices, vec![0, 1, 69_999]);
    let welded = Welded {
        extent: mesh.extent(),
        mesh,
    };

    let result = io::encode_welded(&welded, Layout::Minimal, Representation::Binary);
    assert!(matches!(
        result,
        Err(WeshError::InvalidArgument(InvalidArgument::IndexOverflow { position: 2, .. }))
    ));
    assert!(io::encode_welded(&welded, Layout::Tangent, Representation::Binary).is_ok());
}

#[test]
fn test_empty_mesh_roundtrip() -> Result<()> {
    let welded = weld_stream(&Default::default(), &WeldOptions::default())?;

    for representation in [Representation::Binary, Representation::Text] {
        let bytes = io::encode_welded(&welded, Layout::CURRENT, representation)?;
        let decoded = io::decode(&bytes, representation)?;
        assert_eq!(decoded.mesh.vertex_count(), 0);
        assert_eq!(decoded.mesh.index_count(), 0);
    }
    Ok(())
}

#[test]
fn test_file_export_roundtrip() -> Result<()> {
    let welded = sphere();
    let file = NamedTempFile::with_suffix(".wesh")?;

    io::export_file(file.path(), &welded, Layout::CURRENT, Representation::Binary)?;
    let metadata = std::fs::metadata(file.path())?;
    assert!(metadata.len() > (HEADER_SIZE + EXTENT_SIZE) as u64);

    let decoded = io::read_file_auto(file.path())?;
    assert_eq!(decoded.mesh, welded.mesh);
    assert_eq!(decoded.extent, Some(welded.extent));
    Ok(())
}
