// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Last phase: every monitored tag still unaccounted for becomes an explicit `Not Found` record,
//! so the output always covers the whole monitored list.

use log::debug;

use crate::{
    record::MappingRecord,
    resolution_pipeline::{PhaseOutput, ResolutionContext, ResolutionPhase, ResolutionState},
};

pub struct UnresolvedReporter();

impl UnresolvedReporter {
    pub fn new() -> Box<Self> {
        Box::new(Self())
    }
}

impl ResolutionPhase for UnresolvedReporter {
    fn name(&self) -> &'static str {
        "unresolved_report"
    }

    fn run(&self, ctx: &ResolutionContext<'_>, state: &ResolutionState) -> PhaseOutput {
        let mut out = PhaseOutput::default();
        for tag in ctx.monitored.iter().filter(|t| !state.is_resolved(t)) {
            debug!("no writer found for {}", tag);
            out.records.push(MappingRecord::not_found(ctx.index, tag));
            out.resolved.insert(tag.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{monitored::MonitoredTags, options::ResolutionOptions, record::InstructionKind};
    use ladder_model::{ProgramDocument, ProgramIndex};

    #[test]
    fn unreferenced_tag_is_reported_once() {
        let document = ProgramDocument::parse("<Controller/>");
        let index = ProgramIndex::build(&document);
        let monitored: MonitoredTags = ["Flag"].into_iter().collect();
        let options = ResolutionOptions::default();
        let ctx = ResolutionContext {
            document: &document,
            index: &index,
            monitored: &monitored,
            options: &options,
        };
        let out = UnresolvedReporter::new().run(&ctx, &ResolutionState::default());
        assert_eq!(out.records.len(), 1);
        let record = &out.records[0];
        assert_eq!(record.destination, "Flag");
        assert_eq!(record.instruction, InstructionKind::NotFound);
        assert_eq!(record.columns()[3..6], ["", "", ""].map(String::from));
        assert!(record.source.is_empty());
    }
}
