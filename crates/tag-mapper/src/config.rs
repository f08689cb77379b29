// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use tag_resolution::ResolutionOptions;

/// Represents options provided to the tool. Most of those options are configured via a toml
/// source; some over the command line flags.
///
/// NOTE: any fields carrying structured data must appear at the end for making
/// toml printing work. When changing this config, use `tag-mapper --print-config` to
/// verify this works.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Column of the tag list holding the monitored tag identifiers.
    pub tag_column: String,
    /// When set, the tag list is read as a raw SCADA tag export and only rows of this topic
    /// are kept.
    pub topic: Option<String>,
    /// Where the mapping table is written.
    pub output_path: String,
    /// Verbosity level for logging.
    pub verbosity_level: LevelFilter,

    /// BEGIN OF STRUCTURED OPTIONS. DO NOT ADD VALUE FIELDS AFTER THIS
    /// Options for the resolution phases.
    pub resolution: ResolutionOptions,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            tag_column: "Col45".to_string(),
            topic: None,
            output_path: "Tag Mapping.csv".to_string(),
            verbosity_level: LevelFilter::Info,
            resolution: ResolutionOptions::default(),
        }
    }
}

impl MapperConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Command line overrides of [`MapperConfig`]
#[derive(Args, Debug, Default, Clone)]
#[clap(next_help_heading = "General Options")]
pub struct GeneralConfig {
    /// Path of the mapping table to write (CSV)
    #[clap(long = "output", short = 'o', global = true)]
    pub output: Option<PathBuf>,

    /// Column of the tag list holding the monitored tags
    #[clap(long = "tag-column", global = true)]
    pub tag_column: Option<String>,

    /// Read the tag list as a raw SCADA export and keep only rows of this topic
    #[clap(long = "topic", global = true)]
    pub topic: Option<String>,

    /// Report every rung driving a swept bit instead of only the first
    #[clap(long = "attribute-every-coil", global = true)]
    pub attribute_every_coil: bool,

    /// Display detailed resolution progress
    #[clap(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Print the effective configuration as TOML and exit
    #[clap(long = "print-config", global = true)]
    pub print_config: bool,
}

impl GeneralConfig {
    pub fn apply(&self, config: &mut MapperConfig) {
        if let Some(output) = &self.output {
            config.output_path = output.to_string_lossy().to_string();
        }
        if let Some(column) = &self.tag_column {
            config.tag_column = column.clone();
        }
        if self.topic.is_some() {
            config.topic = self.topic.clone();
        }
        if self.attribute_every_coil {
            config.resolution.attribute_every_coil = true;
        }
        if self.verbose {
            config.verbosity_level = LevelFilter::Trace;
        }
    }
}
