// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error taxonomy shared by the welder and the container codec

use thiserror::Error;

/// Result alias used throughout the library
pub type WeshResult<T> = std::result::Result<T, WeshError>;

/// Top-level error returned by every fallible library operation
#[derive(Debug, Error)]
pub enum WeshError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller-side misuse: inconsistent inputs handed to the welder or encoder
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidArgument {
    #[error("attribute '{attribute}' has {actual} entries, expected {expected}")]
    AttributeCountMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("header field '{field}' is {header}, buffer has {actual}")]
    HeaderMismatch {
        field: &'static str,
        header: u64,
        actual: u64,
    },

    #[error("index {index} at position {position} does not fit a {width}-byte index")]
    IndexOverflow {
        position: usize,
        index: u32,
        width: usize,
    },

    #[error("'{field}' count {count} exceeds the 32-bit container limit")]
    CountOverflow { field: &'static str, count: usize },

    #[error("version {major}.{minor} is not a known layout")]
    UnknownVersion { major: u16, minor: u16 },

    #[error("weld option '{field}' = {value} {reason}")]
    WeldOption {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Decode-time failures: the stream is not a valid Wesh container
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("bad magic number {found:#010x}, expected {expected:#010x}")]
    BadMagic { found: u32, expected: u32 },

    #[error("unsupported version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("record size mismatch: header declares {declared} bytes, layout {major}.{minor} uses {expected}")]
    RecordSizeMismatch {
        declared: u32,
        expected: u32,
        major: u16,
        minor: u16,
    },

    #[error("truncated {section}: need {expected} bytes, stream has {actual}")]
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{extra} trailing bytes after the index block")]
    TrailingBytes { extra: usize },

    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: u32,
    },

    #[error("invalid token '{token}' for {field} at token {position}")]
    InvalidToken {
        field: &'static str,
        position: usize,
        token: String,
    },

    #[error("{field} count mismatch: declared {declared}, stream carries {actual} tokens")]
    CountMismatch {
        field: &'static str,
        declared: usize,
        actual: usize,
    },
}

impl WeshError {
    /// Short taxonomy name for user-facing reports
    pub fn kind(&self) -> &'static str {
        match self {
            WeshError::InvalidArgument(_) => "InvalidArgument",
            WeshError::Format(_) => "FormatError",
            WeshError::Io(_) => "IOError",
        }
    }
}
