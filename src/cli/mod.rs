// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the wesh tool

pub mod inspect;
pub mod reporter;

pub use inspect::{collect_containers, inspect_file, InspectReport};
pub use reporter::Reporter;
