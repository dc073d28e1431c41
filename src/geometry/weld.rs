// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex welding: collapse near-identical face-loop tuples into shared vertices
//!
//! The welder walks the loop stream in order and, for every incoming tuple,
//! looks for the first already admitted vertex that matches it under the
//! tolerance rule. First-seen wins: a later, tighter match never replaces an
//! earlier one. The default linear scan is O(n²); the parallel and hashed
//! strategies return the same buffer for finite input.

use super::{Extent, LoopStream, MeshBuffer, Vertex};
use crate::error::{InvalidArgument, WeshResult};
use crate::utils::math::different;
use ahash::AHashMap;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Relative tolerance below the spacing of adjacent `f32` values (2^-24)
const HASHED_MAX_RELATIVE: f64 = (f32::EPSILON / 2.0) as f64;

/// Below this many candidates the parallel strategy scans sequentially
const PARALLEL_MIN_CANDIDATES: usize = 4096;

/// Candidate search strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeldStrategy {
    /// Linear scan in insertion order
    #[default]
    Linear,
    /// Linear scan sharded across rayon workers, lowest matching index wins
    Parallel,
    /// Spatial hash on quantized position, probing neighbouring cells
    Hashed,
}

impl WeldStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeldStrategy::Linear => "linear",
            WeldStrategy::Parallel => "parallel",
            WeldStrategy::Hashed => "hashed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(WeldStrategy::Linear),
            "parallel" => Some(WeldStrategy::Parallel),
            "hashed" | "hash" => Some(WeldStrategy::Hashed),
            _ => None,
        }
    }
}

/// Axis convention applied to positions, normals and tangents before welding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisBasis {
    /// `(x, y, z) -> (-x, z, y)`
    #[default]
    Engine,
    /// Attributes are already in engine axes
    Identity,
}

/// Component tolerance: `|a - b| > max(relative * max(|a|, |b|), absolute)` means different
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub relative: f64,
    pub absolute: f64,
}

impl Tolerance {
    pub const RELATIVE: f64 = 1e-9;
    pub const ABSOLUTE: f64 = 1e-9;

    pub fn new(relative: f64, absolute: f64) -> Self {
        Self { relative, absolute }
    }

    /// Purely relative tolerance: exact equality at zero
    pub fn strict() -> Self {
        Self::new(Self::RELATIVE, 0.0)
    }

    #[inline]
    pub fn different(&self, a: f32, b: f32) -> bool {
        different(f64::from(a), f64::from(b), self.relative, self.absolute)
    }

    /// Compare position, uv, then normal. Tangents are stored, never compared.
    pub fn matches(&self, a: &Vertex, b: &Vertex) -> bool {
        !(self.different(a.position.x, b.position.x)
            || self.different(a.position.y, b.position.y)
            || self.different(a.position.z, b.position.z)
            || self.different(a.uv.x, b.uv.x)
            || self.different(a.uv.y, b.uv.y)
            || self.different(a.normal.x, b.normal.x)
            || self.different(a.normal.y, b.normal.y)
            || self.different(a.normal.z, b.normal.z))
    }
}

impl Default for Tolerance {
    /// Relative `1e-9` with an absolute floor of `1e-9`.
    ///
    /// The floor lets values on either side of zero merge, so `0` and `1e-10`
    /// weld together. Components closer than the floor always match; use
    /// [`Tolerance::strict`] for the purely relative rule.
    fn default() -> Self {
        Self::new(Self::RELATIVE, Self::ABSOLUTE)
    }
}

/// Welding configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeldOptions {
    pub strategy: WeldStrategy,
    pub tolerance: Tolerance,
    pub basis: AxisBasis,
    /// Cell width of the hashed strategy. Results match the linear scan while
    /// every pairwise tolerance stays below this width.
    pub cell_size: f32,
}

impl Default for WeldOptions {
    fn default() -> Self {
        Self {
            strategy: WeldStrategy::Linear,
            tolerance: Tolerance::default(),
            basis: AxisBasis::Engine,
            cell_size: 1e-4,
        }
    }
}

impl WeldOptions {
    pub fn with_strategy(mut self, strategy: WeldStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_basis(mut self, basis: AxisBasis) -> Self {
        self.basis = basis;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Reject options under which a strategy would diverge from the linear scan.
    ///
    /// The hashed strategy only searches neighbouring cells, so every match
    /// distance must fit within one cell: the absolute floor may not exceed
    /// `cell_size`, and the relative part must be too small to merge two
    /// distinct `f32` values.
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        let invalid = |field: &'static str, value: f64, reason: &'static str| {
            Err(InvalidArgument::WeldOption { field, value, reason })
        };
        let Tolerance { relative, absolute } = self.tolerance;
        let cell_size = f64::from(self.cell_size);

        if !(relative.is_finite() && relative >= 0.0) {
            return invalid("tolerance.relative", relative, "must be finite and non-negative");
        }
        if !(absolute.is_finite() && absolute >= 0.0) {
            return invalid("tolerance.absolute", absolute, "must be finite and non-negative");
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return invalid("cell_size", cell_size, "must be finite and positive");
        }
        if self.strategy == WeldStrategy::Hashed {
            if cell_size < absolute {
                return invalid("cell_size", cell_size, "is narrower than the absolute tolerance");
            }
            if relative >= HASHED_MAX_RELATIVE {
                return invalid("tolerance.relative", relative, "is too wide for the hashed strategy");
            }
        }
        Ok(())
    }
}

/// Output of a weld pass
#[derive(Debug, Clone, PartialEq)]
pub struct Welded {
    pub mesh: MeshBuffer,
    pub extent: Extent,
}

impl Welded {
    /// Number of loop entries that were merged into an earlier vertex
    pub fn merged_count(&self) -> usize {
        self.mesh.index_count() - self.mesh.vertex_count()
    }
}

type CellKey = (i64, i64, i64);

/// Incremental welder: push face-loop tuples in order, then finish
pub struct Welder {
    options: WeldOptions,
    mesh: MeshBuffer,
    extent: Extent,
    grid: AHashMap<CellKey, Vec<u32>>,
}

impl Welder {
    pub fn new(options: WeldOptions) -> WeshResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            mesh: MeshBuffer::empty(),
            extent: Extent::empty(),
            grid: AHashMap::new(),
        })
    }

    pub fn with_capacity(options: WeldOptions, loop_count: usize) -> WeshResult<Self> {
        Ok(Self {
            mesh: MeshBuffer::with_capacity(loop_count, loop_count),
            ..Self::new(options)?
        })
    }

    /// Admit one face-loop tuple and return the index it was assigned
    pub fn push(&mut self, vertex: &Vertex) -> WeshResult<u32> {
        let vertex = match self.options.basis {
            AxisBasis::Engine => vertex.to_engine_basis(),
            AxisBasis::Identity => *vertex,
        };

        let index = match self.find(&vertex) {
            Some(existing) => existing,
            None => self.admit(vertex)?,
        };
        self.mesh.indices.push(index);
        Ok(index)
    }

    pub fn finish(self) -> Welded {
        debug!(
            "welded {} loops into {} vertices ({} strategy)",
            self.mesh.index_count(),
            self.mesh.vertex_count(),
            self.options.strategy.as_str()
        );
        Welded {
            mesh: self.mesh,
            extent: self.extent,
        }
    }

    fn find(&self, vertex: &Vertex) -> Option<u32> {
        let tolerance = self.options.tolerance;
        let candidates = &self.mesh.vertices;

        let found = match self.options.strategy {
            WeldStrategy::Linear => candidates.iter().position(|c| tolerance.matches(c, vertex)),
            WeldStrategy::Parallel if candidates.len() < PARALLEL_MIN_CANDIDATES => {
                candidates.iter().position(|c| tolerance.matches(c, vertex))
            }
            WeldStrategy::Parallel => candidates
                .par_iter()
                .position_first(|c| tolerance.matches(c, vertex)),
            WeldStrategy::Hashed => return self.find_hashed(vertex),
        };
        // Admission keeps the vertex count within u32
        found.map(|i| i as u32)
    }

    fn find_hashed(&self, vertex: &Vertex) -> Option<u32> {
        let tolerance = self.options.tolerance;
        let (cx, cy, cz) = self.cell_of(vertex);
        let mut best: Option<u32> = None;

        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                for dz in -1i64..=1 {
                    let key = (
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    );
                    let Some(bucket) = self.grid.get(&key) else {
                        continue;
                    };
                    // Buckets are filled in insertion order, so the first hit is the lowest
                    let hit = bucket.iter().copied().find(|&i| {
                        best.map_or(true, |b| i < b)
                            && tolerance.matches(&self.mesh.vertices[i as usize], vertex)
                    });
                    if let Some(i) = hit {
                        best = Some(best.map_or(i, |b| b.min(i)));
                    }
                }
            }
        }
        best
    }

    fn admit(&mut self, vertex: Vertex) -> WeshResult<u32> {
        let index = u32::try_from(self.mesh.vertices.len()).map_err(|_| {
            InvalidArgument::CountOverflow {
                field: "vertex",
                count: self.mesh.vertices.len(),
            }
        })?;

        self.extent.expand_to_include(&vertex.position);
        if self.options.strategy == WeldStrategy::Hashed {
            let key = self.cell_of(&vertex);
            self.grid.entry(key).or_default().push(index);
        }
        self.mesh.vertices.push(vertex);
        Ok(index)
    }

    fn cell_of(&self, vertex: &Vertex) -> CellKey {
        let size = f64::from(self.options.cell_size);
        let quantize = |c: f32| (f64::from(c) / size).floor() as i64;
        (
            quantize(vertex.position.x),
            quantize(vertex.position.y),
            quantize(vertex.position.z),
        )
    }
}

/// Weld a loop stream with the default options
pub fn weld(loops: &[Vertex]) -> WeshResult<Welded> {
    weld_with(loops, &WeldOptions::default())
}

/// Weld a loop stream with explicit options
pub fn weld_with(loops: &[Vertex], options: &WeldOptions) -> WeshResult<Welded> {
    let mut welder = Welder::with_capacity(*options, loops.len())?;
    for vertex in loops {
        welder.push(vertex)?;
    }
    Ok(welder.finish())
}

/// Validate and weld a struct-of-arrays loop stream
pub fn weld_stream(stream: &LoopStream, options: &WeldOptions) -> WeshResult<Welded> {
    let loops = stream.to_vertices()?;
    weld_with(&loops, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WeshError;
    use nalgebra::{Point3, Vector3};

    fn loop_at(p: [f32; 3], uv: [f32; 2], n: [f32; 3]) -> Vertex {
        Vertex::from_arrays(p, n, [1.0, 0.0, 0.0], uv)
    }

    fn identity() -> WeldOptions {
        WeldOptions::default().with_basis(AxisBasis::Identity)
    }

    #[test]
    fn test_tolerance_boundary_case() {
        let loops = vec![
            loop_at([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([1e-10, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([1.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let welded = weld(&loops).unwrap();
        assert_eq!(welded.mesh.vertex_count(), 2);
        assert_eq!(welded.mesh.indices, vec![0, 0, 1]);
        assert_eq!(welded.merged_count(), 1);
    }

    #[test]
    fn test_strict_tolerance_separates_near_zero() {
        let loops = vec![
            loop_at([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([1e-10, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let options = WeldOptions::default().with_tolerance(Tolerance::strict());
        let welded = weld_with(&loops, &options).unwrap();
        assert_eq!(welded.mesh.indices, vec![0, 1]);
    }

    #[test]
    fn test_axis_remap_applied() {
        let loops = vec![loop_at([1.0, 2.0, 3.0], [0.5, 0.5], [0.0, 0.0, 1.0])];
        let welded = weld(&loops).unwrap();
        let v = welded.mesh.vertices[0];
        assert_eq!(v.position, Point3::new(-1.0, 3.0, 2.0));
        assert_eq!(v.normal, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(v.tangent, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(welded.extent.min, Point3::new(-1.0, 3.0, 2.0));
    }

    #[test]
    fn test_uv_and_normal_split_vertices() {
        let loops = vec![
            loop_at([0.0; 3], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([0.0; 3], [1.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([0.0; 3], [0.0, 0.0], [0.0, 1.0, 0.0]),
            loop_at([0.0; 3], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let welded = weld_with(&loops, &identity()).unwrap();
        assert_eq!(welded.mesh.indices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_tangent_not_compared() {
        let a = Vertex::from_arrays([0.0; 3], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0]);
        let b = Vertex::from_arrays([0.0; 3], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0]);
        let welded = weld_with(&[a, b], &identity()).unwrap();
        assert_eq!(welded.mesh.vertex_count(), 1);
        // First inserted tangent survives
        assert_eq!(welded.mesh.vertices[0].tangent, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_first_seen_wins_over_tighter_match() {
        let tolerance = Tolerance::new(0.0, 0.5);
        let options = identity().with_tolerance(tolerance);
        let loops = vec![
            loop_at([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([1.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            // within 0.5 of both, exact match for the second
            loop_at([0.5, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let welded = weld_with(&loops, &options).unwrap();
        assert_eq!(welded.mesh.indices, vec![0, 1, 0]);
    }

    #[test]
    fn test_strategies_agree() {
        let mut loops = Vec::new();
        for i in 0..200 {
            let x = (i % 17) as f32 * 0.25;
            let y = (i % 5) as f32;
            loops.push(loop_at([x, y, 1.0], [x, 0.0], [0.0, 0.0, 1.0]));
        }
        let linear = weld(&loops).unwrap();
        for strategy in [WeldStrategy::Parallel, WeldStrategy::Hashed] {
            let options = WeldOptions::default().with_strategy(strategy);
            assert_eq!(weld_with(&loops, &options).unwrap(), linear);
        }
    }

    #[test]
    fn test_hashed_finds_match_across_cell_boundary() {
        let options = identity().with_strategy(WeldStrategy::Hashed).with_tolerance(Tolerance::new(0.0, 1e-5));
        // 0.99999e-4 and 1.00001e-4 fall in adjacent 1e-4 cells
        let loops = vec![
            loop_at([0.99999e-4, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([1.00001e-4, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let welded = weld_with(&loops, &options).unwrap();
        assert_eq!(welded.mesh.indices, vec![0, 0]);
    }

    #[test]
    fn test_degenerate_cell_size_rejected() {
        let loops = vec![
            loop_at([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([1e-10, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        for cell_size in [0.0, -1e-4, f32::NAN, f32::INFINITY] {
            let options = identity().with_strategy(WeldStrategy::Hashed).with_cell_size(cell_size);
            assert!(matches!(
                weld_with(&loops, &options),
                Err(WeshError::InvalidArgument(InvalidArgument::WeldOption { field: "cell_size", .. }))
            ));
        }
    }

    #[test]
    fn test_hashed_rejects_tolerance_wider_than_cell() {
        let loops = vec![
            loop_at([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([5e-4, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let wide = identity().with_tolerance(Tolerance::new(0.0, 1e-3));

        // The linear scan has no cell constraint
        assert_eq!(weld_with(&loops, &wide).unwrap().mesh.indices, vec![0, 0]);

        let hashed = wide.with_strategy(WeldStrategy::Hashed);
        assert!(matches!(
            weld_with(&loops, &hashed),
            Err(WeshError::InvalidArgument(InvalidArgument::WeldOption { field: "cell_size", .. }))
        ));

        // A cell at least as wide as the floor agrees with the linear scan again
        let widened = hashed.with_cell_size(1e-3);
        assert_eq!(weld_with(&loops, &widened).unwrap().mesh.indices, vec![0, 0]);

        let relative = identity()
            .with_strategy(WeldStrategy::Hashed)
            .with_tolerance(Tolerance::new(1e-3, 0.0));
        assert!(matches!(
            relative.validate(),
            Err(InvalidArgument::WeldOption { field: "tolerance.relative", .. })
        ));
    }

    #[test]
    fn test_extent_counts_unique_vertices_only() {
        let loops = vec![
            loop_at([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([2.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
            loop_at([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ];
        let welded = weld_with(&loops, &identity()).unwrap();
        assert_eq!(welded.extent, welded.mesh.extent());
    }

    #[test]
    fn test_empty_input() {
        let welded = weld(&[]).unwrap();
        assert!(welded.mesh.vertices.is_empty());
        assert!(welded.extent.is_empty());
    }

    #[test]
    fn test_strategy_names() {
        for strategy in [WeldStrategy::Linear, WeldStrategy::Parallel, WeldStrategy::Hashed] {
            assert_eq!(WeldStrategy::from_str(strategy.as_str()), Some(strategy));
        }
        assert_eq!(WeldStrategy::from_str("nearest"), None);
    }
}
