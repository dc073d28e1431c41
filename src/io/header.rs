// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Container header and the version-keyed layout table

use crate::error::{FormatError, InvalidArgument, WeshResult};
use crate::geometry::MeshBuffer;
use serde::{Deserialize, Serialize};

/// ASCII `WESH` read as a little-endian u32
pub const MAGIC: u32 = 0x4853_4557;

/// Serialized header size in bytes
pub const HEADER_SIZE: usize = 20;

/// Serialized extent block size in bytes
pub const EXTENT_SIZE: usize = 6 * 4;

/// Binary layout variant, selected by `(version_major, version_minor)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// 0.1: no tangent, no extent, 16-bit indices
    Minimal,
    /// 0.2: tangent, no extent, 32-bit indices
    Tangent,
    /// 0.3: tangent, extent block, 32-bit indices
    Extended,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Minimal, Layout::Tangent, Layout::Extended];
    pub const CURRENT: Layout = Layout::Extended;

    pub fn version(self) -> (u16, u16) {
        match self {
            Layout::Minimal => (0, 1),
            Layout::Tangent => (0, 2),
            Layout::Extended => (0, 3),
        }
    }

    pub fn from_version(major: u16, minor: u16) -> Option<Layout> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.version() == (major, minor))
    }

    /// Parse `"0.3"` style version strings
    pub fn from_version_str(s: &str) -> Option<Layout> {
        let (major, minor) = s.trim().split_once('.')?;
        Self::from_version(major.parse().ok()?, minor.parse().ok()?)
    }

    pub fn version_string(self) -> String {
        let (major, minor) = self.version();
        format!("{}.{}", major, minor)
    }

    pub fn has_tangent(self) -> bool {
        !matches!(self, Layout::Minimal)
    }

    pub fn has_extent(self) -> bool {
        matches!(self, Layout::Extended)
    }

    /// Bytes per serialized index
    pub fn index_width(self) -> usize {
        match self {
            Layout::Minimal => 2,
            Layout::Tangent | Layout::Extended => 4,
        }
    }

    /// Floats per interleaved vertex record
    pub fn floats_per_vertex(self) -> usize {
        if self.has_tangent() {
            11
        } else {
            8
        }
    }

    /// Bytes per interleaved vertex record
    pub fn record_size(self) -> u32 {
        (self.floats_per_vertex() * 4) as u32
    }

    /// Largest index value the layout can store
    pub fn max_index(self) -> u32 {
        match self.index_width() {
            2 => u32::from(u16::MAX),
            _ => u32::MAX,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Fixed-size container header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub magic: u32,
    pub version_major: u16,
    pub version_minor: u16,
    /// Size in bytes of one serialized vertex record
    pub vertex_record_size: u32,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl Header {
    /// Compute the header describing `mesh` in `layout`
    pub fn new(layout: Layout, mesh: &MeshBuffer) -> WeshResult<Self> {
        let count = |field: &'static str, count: usize| {
            u32::try_from(count).map_err(|_| InvalidArgument::CountOverflow { field, count })
        };
        let (version_major, version_minor) = layout.version();

        Ok(Self {
            magic: MAGIC,
            version_major,
            version_minor,
            vertex_record_size: layout.record_size(),
            vertex_count: count("vertex", mesh.vertex_count())?,
            index_count: count("index", mesh.index_count())?,
        })
    }

    pub fn version(&self) -> (u16, u16) {
        (self.version_major, self.version_minor)
    }

    pub fn layout(&self) -> Option<Layout> {
        Layout::from_version(self.version_major, self.version_minor)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.version_major.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.version_minor.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.vertex_record_size.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.index_count.to_le_bytes());
        bytes
    }

    /// Read the raw header fields. No validation beyond length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < HEADER_SIZE {
            return Err(FormatError::Truncated {
                section: "header",
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at =
            |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

        Ok(Self {
            magic: u32_at(0),
            version_major: u16_at(4),
            version_minor: u16_at(6),
            vertex_record_size: u32_at(8),
            vertex_count: u32_at(12),
            index_count: u32_at(16),
        })
    }

    /// Check magic, version and record size; return the layout they select
    pub fn validate(&self) -> Result<Layout, FormatError> {
        if self.magic != MAGIC {
            return Err(FormatError::BadMagic {
                found: self.magic,
                expected: MAGIC,
            });
        }
        let layout = self.layout().ok_or(FormatError::UnsupportedVersion {
            major: self.version_major,
            minor: self.version_minor,
        })?;
        if self.vertex_record_size != layout.record_size() {
            return Err(FormatError::RecordSizeMismatch {
                declared: self.vertex_record_size,
                expected: layout.record_size(),
                major: self.version_major,
                minor: self.version_minor,
            });
        }
        Ok(layout)
    }

    /// Check that this header describes `mesh`; return the layout it selects
    pub fn check_against(&self, mesh: &MeshBuffer) -> Result<Layout, InvalidArgument> {
        let layout = self.layout().ok_or(InvalidArgument::UnknownVersion {
            major: self.version_major,
            minor: self.version_minor,
        })?;

        let fields = [
            ("magic", u64::from(self.magic), u64::from(MAGIC)),
            (
                "vertex_record_size",
                u64::from(self.vertex_record_size),
                u64::from(layout.record_size()),
            ),
            (
                "vertex_count",
                u64::from(self.vertex_count),
                mesh.vertex_count() as u64,
            ),
            (
                "index_count",
                u64::from(self.index_count),
                mesh.index_count() as u64,
            ),
        ];
        for (field, header, actual) in fields {
            if header != actual {
                return Err(InvalidArgument::HeaderMismatch {
                    field,
                    header,
                    actual,
                });
            }
        }
        Ok(layout)
    }

    /// Total stream size implied by the header, saturating on overflow
    pub fn stream_size(&self, layout: Layout) -> usize {
        let extent = if layout.has_extent() { EXTENT_SIZE } else { 0 };
        let vertices = (self.vertex_count as usize).saturating_mul(layout.record_size() as usize);
        let indices = (self.index_count as usize).saturating_mul(layout.index_width());
        HEADER_SIZE
            .saturating_add(extent)
            .saturating_add(vertices)
            .saturating_add(indices)
    }
}
