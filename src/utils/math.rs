// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Check whether two scalars differ beyond a relative tolerance with an absolute floor.
///
/// `a` and `b` differ when `|a - b| > max(relative * max(|a|, |b|), absolute)`.
/// A difference exactly equal to the bound is not a difference.
#[inline]
pub fn different(a: f64, b: f64, relative: f64, absolute: f64) -> bool {
    (a - b).abs() > (relative * a.abs().max(b.abs())).max(absolute)
}

/// Remap a vector from authoring-tool axes to engine axes: `(x, y, z) -> (-x, z, y)`
#[inline]
pub fn to_engine_basis(v: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(-v.x, v.z, v.y)
}

/// Point flavour of [`to_engine_basis`]
#[inline]
pub fn point_to_engine_basis(p: &Point3<f32>) -> Point3<f32> {
    Point3::from(to_engine_basis(&p.coords))
}
