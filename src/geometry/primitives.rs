// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangulated primitive generators producing per-loop attribute streams

use super::{LoopStream, Vertex};
use nalgebra::{Point3, Vector2, Vector3};
use std::f64::consts::PI;

/// Geometric primitives
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    Plane { width: f64, depth: f64 },
    Sphere { r: f64, segments: u32 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn plane(width: f64, depth: f64) -> Self {
        Self::Plane { width, depth }
    }

    pub fn sphere(r: f64, segments: u32) -> Self {
        let segments = if segments > 2 { segments } else { 32 };
        Self::Sphere { r, segments }
    }

    /// Emit every triangle corner as its own face-loop entry
    pub fn to_loop_stream(&self) -> LoopStream {
        match self {
            Self::Cube { size, center } => generate_cube_loops(*size, *center),
            Self::Plane { width, depth } => generate_plane_loops(*width, *depth),
            Self::Sphere { r, segments } => generate_sphere_loops(*r, *segments),
        }
    }
}

fn corner(position: Point3<f64>, normal: Vector3<f64>, tangent: Vector3<f64>, uv: [f64; 2]) -> Vertex {
    Vertex::new(
        position.cast::<f32>(),
        normal.cast::<f32>(),
        tangent.cast::<f32>(),
        Vector2::new(uv[0] as f32, uv[1] as f32),
    )
}

/// Push a quad `a b c d` (counter-clockwise) as two triangles
fn push_quad(stream: &mut LoopStream, quad: [Vertex; 4]) {
    for i in [0, 1, 2, 0, 2, 3] {
        stream.push(&quad[i]);
    }
}

fn generate_cube_loops(size: Vector3<f64>, center: bool) -> LoopStream {
    let offset = if center { size / 2.0 } else { Vector3::zeros() };
    let min = Point3::origin() - offset;
    let max = min + size;

    let p = |x: bool, y: bool, z: bool| {
        Point3::new(
            if x { max.x } else { min.x },
            if y { max.y } else { min.y },
            if z { max.z } else { min.z },
        )
    };

    // Corners in counter-clockwise order seen from outside, with normal and u axis
    let faces = [
        ([p(false, false, true), p(true, false, true), p(true, true, true), p(false, true, true)], Vector3::z(), Vector3::x()),
        ([p(true, false, false), p(false, false, false), p(false, true, false), p(true, true, false)], -Vector3::z(), -Vector3::x()),
        ([p(true, false, true), p(true, false, false), p(true, true, false), p(true, true, true)], Vector3::x(), -Vector3::z()),
        ([p(false, false, false), p(false, false, true), p(false, true, true), p(false, true, false)], -Vector3::x(), Vector3::z()),
        ([p(false, true, true), p(true, true, true), p(true, true, false), p(false, true, false)], Vector3::y(), Vector3::x()),
        ([p(false, false, false), p(true, false, false), p(true, false, true), p(false, false, true)], -Vector3::y(), Vector3::x()),
    ];

    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    let mut stream = LoopStream::with_capacity(36);
    for (corners, normal, tangent) in faces {
        let quad = [0, 1, 2, 3].map(|i| corner(corners[i], normal, tangent, uvs[i]));
        push_quad(&mut stream, quad);
    }
    stream
}

fn generate_plane_loops(width: f64, depth: f64) -> LoopStream {
    let (hw, hd) = (width / 2.0, depth / 2.0);
    let normal = Vector3::z();
    let tangent = Vector3::x();

    let quad = [
        corner(Point3::new(-hw, -hd, 0.0), normal, tangent, [0.0, 0.0]),
        corner(Point3::new(hw, -hd, 0.0), normal, tangent, [1.0, 0.0]),
        corner(Point3::new(hw, hd, 0.0), normal, tangent, [1.0, 1.0]),
        corner(Point3::new(-hw, hd, 0.0), normal, tangent, [0.0, 1.0]),
    ];
    let mut stream = LoopStream::with_capacity(6);
    push_quad(&mut stream, quad);
    stream
}

fn generate_sphere_loops(radius: f64, segments: u32) -> LoopStream {
    let stacks = segments;
    let slices = segments;

    let grid = |i: u32, j: u32| {
        let phi = PI * f64::from(i) / f64::from(stacks);
        let theta = 2.0 * PI * f64::from(j) / f64::from(slices);
        let normal = Vector3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
        let tangent = Vector3::new(-theta.sin(), 0.0, theta.cos());
        let uv = [f64::from(j) / f64::from(slices), f64::from(i) / f64::from(stacks)];
        corner(Point3::from(normal * radius), normal, tangent, uv)
    };

    let mut stream = LoopStream::with_capacity((stacks * slices * 6) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            push_quad(&mut stream, [grid(i, j), grid(i + 1, j), grid(i + 1, j + 1), grid(i, j + 1)]);
        }
    }
    stream
}
