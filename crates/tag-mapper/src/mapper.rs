// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use ladder_model::ProgramDocument;
use log::{debug, info};
use tag_resolution::{resolve, InstructionKind};

use crate::{config::MapperConfig, error::check_input, report, tag_list};

/// What a finished run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub rows: usize,
    pub output: PathBuf,
    pub counts: BTreeMap<InstructionKind, usize>,
    pub salvage_warnings: usize,
}

/// Loads the monitored tag list and the program export, resolves every monitored tag and writes
/// the mapping table to `config.output_path`. Inputs are validated before anything is written.
pub fn execute(tags: &Path, program: &Path, config: &MapperConfig) -> anyhow::Result<RunSummary> {
    check_input("Tag list", tags)?;
    check_input("L5X", program)?;

    let monitored = tag_list::load_monitored_tags(tags, &config.tag_column, config.topic.as_deref())?;
    let document = ProgramDocument::load(program)?;
    let table = resolve(&document, &monitored, &config.resolution);

    let output = PathBuf::from(&config.output_path);
    report::write_table_to_path(&table, &config.tag_column, &output)?;

    let counts = table.counts_by_kind();
    info!("wrote {} rows to {}", table.len(), output.display());
    for (kind, count) in &counts {
        debug!("  {kind}: {count}");
    }

    Ok(RunSummary {
        rows: table.len(),
        output,
        counts,
        salvage_warnings: document.salvage_warnings().len(),
    })
}
