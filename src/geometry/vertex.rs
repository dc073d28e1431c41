// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Interleaved vertex record and the per-loop attribute stream it is built from

use crate::error::{InvalidArgument, WeshResult};
use crate::utils::math::{point_to_engine_basis, to_engine_basis};
use nalgebra::{Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Vertex with position, normal, tangent and texture coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub tangent: Vector3<f32>,
    pub uv: Vector2<f32>,
}

impl Vertex {
    pub fn new(
        position: Point3<f32>,
        normal: Vector3<f32>,
        tangent: Vector3<f32>,
        uv: Vector2<f32>,
    ) -> Self {
        Self {
            position,
            normal,
            tangent,
            uv,
        }
    }

    /// Build a vertex from plain arrays, as found in loop streams
    pub fn from_arrays(position: [f32; 3], normal: [f32; 3], tangent: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position: Point3::from(position),
            normal: Vector3::from(normal),
            tangent: Vector3::from(tangent),
            uv: Vector2::from(uv),
        }
    }

    /// Remap position, normal and tangent into the engine basis
    pub fn to_engine_basis(&self) -> Self {
        Self {
            position: point_to_engine_basis(&self.position),
            normal: to_engine_basis(&self.normal),
            tangent: to_engine_basis(&self.tangent),
            uv: self.uv,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
            uv: Vector2::zeros(),
        }
    }
}

/// Per-face-loop attribute stream in struct-of-arrays form.
///
/// Entry `i` of every array belongs to the same face-loop. `tangents` may be
/// omitted entirely, in which case tangents are stored as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopStream {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangents: Option<Vec<[f32; 3]>>,
    pub uvs: Vec<[f32; 2]>,
}

impl LoopStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(loop_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(loop_count),
            normals: Vec::with_capacity(loop_count),
            tangents: Some(Vec::with_capacity(loop_count)),
            uvs: Vec::with_capacity(loop_count),
        }
    }

    /// Append one face-loop entry
    pub fn push(&mut self, vertex: &Vertex) {
        self.positions.push(vertex.position.into());
        self.normals.push(vertex.normal.into());
        self.tangents
            .get_or_insert_with(Vec::new)
            .push(vertex.tangent.into());
        self.uvs.push(vertex.uv.into());
    }

    /// Number of face-loop entries, as given by the position array
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check that every attribute array has one entry per face-loop
    pub fn validate(&self) -> WeshResult<()> {
        let expected = self.positions.len();
        let check = |attribute: &'static str, actual: usize| {
            if actual == expected {
                Ok(())
            } else {
                Err(InvalidArgument::AttributeCountMismatch {
                    attribute,
                    expected,
                    actual,
                })
            }
        };

        check("normals", self.normals.len())?;
        check("uvs", self.uvs.len())?;
        if let Some(tangents) = &self.tangents {
            check("tangents", tangents.len())?;
        }
        Ok(())
    }

    /// Zip the arrays into interleaved vertex tuples
    pub fn to_vertices(&self) -> WeshResult<Vec<Vertex>> {
        self.validate()?;

        let vertices = (0..self.len())
            .map(|i| {
                let tangent = self
                    .tangents
                    .as_ref()
                    .map_or([0.0; 3], |tangents| tangents[i]);
                Vertex::from_arrays(self.positions[i], self.normals[i], tangent, self.uvs[i])
            })
            .collect();
        Ok(vertices)
    }
}

impl FromIterator<Vertex> for LoopStream {
    fn from_iter<I: IntoIterator<Item = Vertex>>(iter: I) -> Self {
        let mut stream = LoopStream::new();
        for vertex in iter {
            stream.push(&vertex);
        }
        stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeshError;

    #[test]
    fn test_engine_basis_leaves_uv() {
        let v = Vertex::from_arrays([1.0, 2.0, 3.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.25, 0.5]);
        let remapped = v.to_engine_basis();
        assert_eq!(remapped.position, Point3::new(-1.0, 3.0, 2.0));
        assert_eq!(remapped.normal, Vector3::new(-0.0, 1.0, 0.0));
        assert_eq!(remapped.tangent, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(remapped.uv, Vector2::new(0.25, 0.5));
    }

    #[test]
    fn test_stream_without_tangents() {
        let stream = LoopStream {
            positions: vec![[0.0; 3]],
            normals: vec![[0.0, 0.0, 1.0]],
            tangents: None,
            uvs: vec![[0.0; 2]],
        };
        let vertices = stream.to_vertices().unwrap();
        assert_eq!(vertices[0].tangent, Vector3::zeros());
    }

    #[test]
    fn test_stream_count_mismatch() {
        let stream = LoopStream {
            positions: vec![[0.0; 3], [1.0; 3]],
            normals: vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
            tangents: Some(vec![[1.0, 0.0, 0.0]]),
            uvs: vec![[0.0; 2], [0.0; 2]],
        };
        match stream.to_vertices() {
            Err(WeshError::InvalidArgument(InvalidArgument::AttributeCountMismatch {
                attribute,
                expected,
                actual,
            })) => {
                assert_eq!(attribute, "tangents");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected attribute mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_from_vertices() {
        let v = Vertex::from_arrays([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.5, 0.5]);
        let stream: LoopStream = vec![v, v].into_iter().collect();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.to_vertices().unwrap(), vec![v, v]);
    }
}
