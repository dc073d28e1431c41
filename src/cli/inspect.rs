// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Container inspection for the `inspect` subcommand

use crate::error::WeshResult;
use crate::io::{self, Representation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Summary of one decoded container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectReport {
    pub path: String,
    pub representation: Representation,
    pub version: String,
    pub vertex_record_size: u32,
    pub vertex_count: u32,
    pub index_count: u32,
    pub triangle_count: usize,
    pub byte_size: usize,
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]` when the layout stores one
    pub extent: Option<[f32; 6]>,
}

/// Decode a container file and summarize it
pub fn inspect_file(path: &Path) -> WeshResult<InspectReport> {
    let bytes = fs::read(path)?;
    let representation = Representation::detect(&bytes);
    let decoded = io::decode(&bytes, representation)?;
    let (major, minor) = decoded.header.version();

    Ok(InspectReport {
        path: path.display().to_string(),
        representation,
        version: format!("{}.{}", major, minor),
        vertex_record_size: decoded.header.vertex_record_size,
        vertex_count: decoded.header.vertex_count,
        index_count: decoded.header.index_count,
        triangle_count: decoded.mesh.triangle_count(),
        byte_size: bytes.len(),
        extent: decoded.extent.map(|extent| extent.to_array()),
    })
}

/// Expand files and directories into the list of `.wesh` files to inspect.
///
/// Files named explicitly are kept whatever their extension; directories are
/// walked recursively for `.wesh` files, in sorted order.
pub fn collect_containers(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|p| io::has_wesh_extension(p))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    files
}
