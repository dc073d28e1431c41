// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wesh geometry codec
//!
//! Turns a stream of per-face-loop vertex attributes into a welded, indexed
//! mesh buffer and serializes it into the versioned `.wesh` container, in
//! either a line-oriented text or a packed little-endian binary form.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod utils;

pub use config::ExportConfig;
pub use error::{FormatError, InvalidArgument, WeshError, WeshResult};
pub use geometry::{
    weld, weld_stream, weld_with, Extent, LoopStream, MeshBuffer, Primitive, Vertex, WeldOptions,
    WeldStrategy, Welded,
};
pub use io::{decode, decode_auto, encode, Decoded, Header, Layout, Representation};

/// Weld a loop stream and encode it in one step
pub fn export_loops(
    stream: &LoopStream,
    options: &WeldOptions,
    layout: Layout,
    representation: Representation,
) -> WeshResult<Vec<u8>> {
    let welded = weld_stream(stream, options)?;
    io::encode_welded(&welded, layout, representation)
}

/// Export a loop stream using a loaded configuration
pub fn export_with_config(stream: &LoopStream, config: &ExportConfig) -> anyhow::Result<Vec<u8>> {
    let layout = config.layout()?;
    Ok(export_loops(stream, &config.weld, layout, config.format)?)
}
