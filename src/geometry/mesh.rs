// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Welded mesh buffer: unique vertices plus one index per face-loop

use super::{Extent, LoopStream, Vertex};
use serde::{Deserialize, Serialize};

/// Deduplicated vertex buffer and the index buffer referencing it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffer {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get index count
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of whole triangles described by the index buffer
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Largest index, if any
    pub fn max_index(&self) -> Option<u32> {
        self.indices.iter().copied().max()
    }

    /// Position and value of the first index that does not reference a vertex
    pub fn first_invalid_index(&self) -> Option<(usize, u32)> {
        let count = self.vertices.len();
        self.indices
            .iter()
            .enumerate()
            .find(|(_, &index)| index as usize >= count)
            .map(|(position, &index)| (position, index))
    }

    /// Compute the extent of the unique vertex positions
    pub fn extent(&self) -> Extent {
        Extent::from_vertices(&self.vertices)
    }

    /// Expand back into a per-loop stream, one entry per index
    pub fn to_loop_stream(&self) -> LoopStream {
        self.indices
            .iter()
            .map(|&index| self.vertices[index as usize])
            .collect()
    }

    /// Treat every unique vertex as its own face-loop entry
    pub fn vertices_as_loop_stream(&self) -> LoopStream {
        self.vertices.iter().copied().collect()
    }
}
