// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scoped file access for `.wesh` containers
//!
//! Writes land in a temporary sibling file that replaces the target only once
//! the whole stream is flushed, so a failed export never leaves a truncated
//! container behind. Reads load the complete file before decoding.

use super::codec::{self, Decoded, Representation};
use super::header::Layout;
use crate::error::WeshResult;
use crate::geometry::Welded;
use log::info;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Conventional container extension
pub const EXTENSION: &str = "wesh";

/// Atomically replace `path` with `bytes`
pub fn write_file(path: impl AsRef<Path>, bytes: &[u8]) -> WeshResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    info!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Read and decode a container in the given representation
pub fn read_file(path: impl AsRef<Path>, representation: Representation) -> WeshResult<Decoded> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    info!("read {} bytes from {}", bytes.len(), path.display());
    codec::decode(&bytes, representation)
}

/// Read a container, detecting its representation
pub fn read_file_auto(path: impl AsRef<Path>) -> WeshResult<Decoded> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    info!("read {} bytes from {}", bytes.len(), path.display());
    codec::decode_auto(&bytes)
}

/// Encode a welded buffer and write it to `path`
pub fn export_file(
    path: impl AsRef<Path>,
    welded: &Welded,
    layout: Layout,
    representation: Representation,
) -> WeshResult<()> {
    let bytes = codec::encode_welded(welded, layout, representation)?;
    write_file(path, &bytes)
}

/// True when `path` carries the `.wesh` extension
pub fn has_wesh_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(EXTENSION))
}
