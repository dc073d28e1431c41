// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Loop-stream importer: JSON documents of per-face-loop attribute arrays

use crate::geometry::LoopStream;
use anyhow::{Context, Result};
use std::fs;

/// Parse a loop stream from a JSON string and check its attribute counts
pub fn parse_loop_stream(source: &str) -> Result<LoopStream> {
    let stream: LoopStream = serde_json::from_str(source).context("Malformed loop stream JSON")?;
    stream.validate()?;
    if stream.len() % 3 != 0 {
        log::warn!(
            "loop stream has {} entries, not a whole number of triangles",
            stream.len()
        );
    }
    Ok(stream)
}

/// Import a loop stream JSON file
pub fn import_loop_stream(path: &str) -> Result<LoopStream> {
    let source = fs::read_to_string(path)
        .context(format!("Failed to read loop stream file: {}", path))?;

    parse_loop_stream(&source).context(format!("Failed to parse loop stream file: {}", path))
}
