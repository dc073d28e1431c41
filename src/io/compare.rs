// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh buffer comparison for conversion and round-trip checks

use crate::geometry::{Extent, MeshBuffer, Vertex};
use serde::{Deserialize, Serialize};

/// Result of mesh comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshComparison {
    pub vertex_count_match: bool,
    pub index_count_match: bool,
    pub indices_match: bool,
    pub extent_match: bool,
    pub vertex_count_diff: i64,
    pub index_count_diff: i64,
    /// Largest absolute difference over all compared attributes
    pub max_attribute_delta: f32,
    pub tolerance: f32,
    pub passed: bool,
}

impl MeshComparison {
    pub fn new() -> Self {
        Self {
            vertex_count_match: false,
            index_count_match: false,
            indices_match: false,
            extent_match: false,
            vertex_count_diff: 0,
            index_count_diff: 0,
            max_attribute_delta: 0.0,
            tolerance: 0.0,
            passed: false,
        }
    }
}

impl Default for MeshComparison {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two buffers attribute by attribute.
///
/// Tangents are included only when `compare_tangents` is set, since the
/// minimal layout drops them.
pub fn compare_meshes(
    mesh_a: &MeshBuffer,
    mesh_b: &MeshBuffer,
    tolerance: f32,
    compare_tangents: bool,
) -> MeshComparison {
    let mut comparison = MeshComparison::new();
    comparison.tolerance = tolerance;

    comparison.vertex_count_diff = mesh_a.vertex_count() as i64 - mesh_b.vertex_count() as i64;
    comparison.vertex_count_match = comparison.vertex_count_diff == 0;

    comparison.index_count_diff = mesh_a.index_count() as i64 - mesh_b.index_count() as i64;
    comparison.index_count_match = comparison.index_count_diff == 0;
    comparison.indices_match = mesh_a.indices == mesh_b.indices;

    comparison.extent_match = extents_match(&mesh_a.extent(), &mesh_b.extent(), tolerance);

    comparison.max_attribute_delta = mesh_a
        .vertices
        .iter()
        .zip(&mesh_b.vertices)
        .map(|(a, b)| vertex_delta(a, b, compare_tangents))
        .fold(0.0, f32::max);

    comparison.passed = comparison.vertex_count_match
        && comparison.index_count_match
        && comparison.indices_match
        && comparison.extent_match
        && comparison.max_attribute_delta <= tolerance;

    comparison
}

fn extents_match(a: &Extent, b: &Extent, tolerance: f32) -> bool {
    a.approx_eq(b, tolerance)
}

fn vertex_delta(a: &Vertex, b: &Vertex, compare_tangents: bool) -> f32 {
    let mut delta = (a.position - b.position).amax();
    delta = delta.max((a.normal - b.normal).amax());
    delta = delta.max((a.uv - b.uv).amax());
    if compare_tangents {
        delta = delta.max((a.tangent - b.tangent).amax());
    }
    delta
}
