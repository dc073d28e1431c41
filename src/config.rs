// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export configuration system

use crate::geometry::{WeldOptions, WeldStrategy};
use crate::io::{Layout, Representation};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "wesh.toml";

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output representation
    pub format: Representation,
    /// Target container version, e.g. "0.3"
    pub version: String,
    /// Welding options
    pub weld: WeldOptions,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: Representation::Binary,
            version: Layout::CURRENT.version_string(),
            weld: WeldOptions::default(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ExportConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// An explicit path must exist; otherwise `wesh.toml` is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if PathBuf::from(CONFIG_FILE).exists() => Self::from_file(CONFIG_FILE)?,
            None => Self::default(),
        };

        if let Ok(format) = std::env::var("WESH_FORMAT") {
            config.format = Representation::from_str(&format)
                .ok_or_else(|| anyhow!("WESH_FORMAT: unknown format '{}'", format))?;
        }

        if let Ok(version) = std::env::var("WESH_VERSION") {
            config.version = version;
        }

        if let Ok(strategy) = std::env::var("WESH_WELD_STRATEGY") {
            config.weld.strategy = WeldStrategy::from_str(&strategy)
                .ok_or_else(|| anyhow!("WESH_WELD_STRATEGY: unknown strategy '{}'", strategy))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Check the version and the weld options
    pub fn validate(&self) -> Result<()> {
        self.layout()?;
        self.weld.validate()?;
        Ok(())
    }

    /// Resolve the configured version to a layout
    pub fn layout(&self) -> Result<Layout> {
        Layout::from_version_str(&self.version)
            .ok_or_else(|| anyhow!("Unsupported container version '{}'", self.version))
    }
}
