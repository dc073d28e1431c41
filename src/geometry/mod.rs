// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - vertex records, welded buffers and the welder

mod extent;
mod mesh;
mod primitives;
mod vertex;
mod weld;

pub use extent::Extent;
pub use mesh::MeshBuffer;
pub use primitives::Primitive;
pub use vertex::{LoopStream, Vertex};
pub use weld::{weld, weld_stream, weld_with, AxisBasis, Tolerance, WeldOptions, WeldStrategy, Welded, Welder};
