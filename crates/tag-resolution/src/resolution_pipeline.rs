// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Phase pipeline
//!
//! Resolution runs as a fixed sequence of phases. A phase never mutates shared state: it reads
//! the immutable [`ResolutionContext`] and the [`ResolutionState`] accumulated by earlier phases
//! and hands back a [`PhaseOutput`], which the pipeline folds into the state before the next
//! phase runs.

use std::collections::{BTreeMap, BTreeSet};

use ladder_model::{ProgramDocument, ProgramIndex};
use log::{debug, info};

use crate::{
    monitored::MonitoredTags,
    options::ResolutionOptions,
    record::{MappingRecord, RungLocation},
};

/// Operand -> every rung driving it as a boolean output, in scan order.
pub type CoilOccurrences = BTreeMap<String, Vec<RungLocation>>;

/// Read-only inputs shared by all phases of one run.
pub struct ResolutionContext<'a> {
    pub document: &'a ProgramDocument,
    pub index: &'a ProgramIndex,
    pub monitored: &'a MonitoredTags,
    pub options: &'a ResolutionOptions,
}

/// What one phase contributes.
#[derive(Debug, Default)]
pub struct PhaseOutput {
    pub records: Vec<MappingRecord>,
    /// Monitored identifiers that are now accounted for.
    pub resolved: BTreeSet<String>,
    pub coils: CoilOccurrences,
    /// Operand comments found on rungs, only for operands without a declared comment.
    pub rung_comments: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct ResolutionState {
    records: Vec<MappingRecord>,
    resolved: BTreeSet<String>,
    coils: CoilOccurrences,
    rung_comments: BTreeMap<String, String>,
}

impl ResolutionState {
    pub fn records(&self) -> &[MappingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MappingRecord> {
        self.records
    }

    pub fn is_resolved(&self, tag: &str) -> bool {
        self.resolved.contains(tag)
    }

    /// Rungs driving `operand`, first occurrence first.
    pub fn coil_occurrences(&self, operand: &str) -> &[RungLocation] {
        self.coils.get(operand).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Comment for a fully qualified operand. Sources are consulted in priority order:
    /// declaration-level comments, then comments found on rungs.
    pub fn comment<'s>(&'s self, index: &'s ProgramIndex, operand: &str) -> Option<&'s str> {
        [
            index.declared_comment(operand),
            self.rung_comments.get(operand).map(String::as_str),
        ]
        .into_iter()
        .flatten()
        .next()
    }

    fn absorb(&mut self, output: PhaseOutput) {
        self.records.extend(output.records);
        self.resolved.extend(output.resolved);
        for (operand, occurrences) in output.coils {
            self.coils.entry(operand).or_default().extend(occurrences);
        }
        for (operand, text) in output.rung_comments {
            self.rung_comments.entry(operand).or_insert(text);
        }
    }
}

pub trait ResolutionPhase {
    /// A short name for logging.
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &ResolutionContext<'_>, state: &ResolutionState) -> PhaseOutput;
}

#[derive(Default)]
pub struct ResolutionPipeline {
    phases: Vec<Box<dyn ResolutionPhase>>,
}

impl ResolutionPipeline {
    pub fn add_phase(&mut self, phase: Box<dyn ResolutionPhase>) {
        self.phases.push(phase);
    }

    pub fn phase_names(&self) -> Vec<&'static str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    pub fn run(&self, ctx: &ResolutionContext<'_>) -> ResolutionState {
        let mut state = ResolutionState::default();
        for phase in &self.phases {
            debug!("running phase `{}`", phase.name());
            let output = phase.run(ctx, &state);
            info!(
                "{}: {} records, {} tags resolved",
                phase.name(),
                output.records.len(),
                output.resolved.len()
            );
            state.absorb(output);
        }
        state
    }
}
