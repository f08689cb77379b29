// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use ladder_model::{ProgramDocument, ProgramIndex};
use log::{debug, info};

use crate::{
    consolidation::{consolidate, MappingTable},
    monitored::MonitoredTags,
    options::ResolutionOptions,
    pipeline_factory::default_pipeline,
    resolution_pipeline::ResolutionContext,
};

/// Resolves every monitored tag against `document`. The result is a complete partition of the
/// monitored list: each tag has at least one record, `Not Found` if nothing writes it.
pub fn resolve(
    document: &ProgramDocument,
    monitored: &MonitoredTags,
    options: &ResolutionOptions,
) -> MappingTable {
    let index = ProgramIndex::build(document);
    resolve_with_index(document, &index, monitored, options)
}

/// Same as [`resolve`] with a prebuilt index.
pub fn resolve_with_index(
    document: &ProgramDocument,
    index: &ProgramIndex,
    monitored: &MonitoredTags,
    options: &ResolutionOptions,
) -> MappingTable {
    let ctx = ResolutionContext {
        document,
        index,
        monitored,
        options,
    };
    let pipeline = default_pipeline();
    debug!("resolution phases: {}", pipeline.phase_names().join(" -> "));
    let state = pipeline.run(&ctx);
    let table = consolidate(state.into_records());
    info!(
        "resolved {} monitored tags into {} rows",
        monitored.len(),
        table.len()
    );
    table
}
