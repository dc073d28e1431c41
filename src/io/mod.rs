// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - container codecs, file access and loop-stream import

mod binary;
mod codec;
mod compare;
mod file;
mod header;
mod importer;
mod text;

pub use codec::{decode, decode_auto, encode, encode_welded, Decoded, Representation};
pub use compare::{compare_meshes, MeshComparison};
pub use file::{export_file, has_wesh_extension, read_file, read_file_auto, write_file, EXTENSION};
pub use header::{Header, Layout, EXTENT_SIZE, HEADER_SIZE, MAGIC};
pub use importer::{import_loop_stream, parse_loop_stream};
