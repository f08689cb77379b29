// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Bit-output sweep
//!
//! Second phase. A monitored integer that no transfer instruction writes may still be assembled
//! bit by bit from boolean outputs. For every unresolved monitored tag declared `INT` or `DINT`,
//! each bit `Base[i].b` is looked up among the coil operands collected by the rung scan, and a
//! record is emitted only for bits something actually drives.

use ladder_model::IndexedOperand;

use crate::{
    record::{InstructionKind, MappingRecord},
    resolution_pipeline::{PhaseOutput, ResolutionContext, ResolutionPhase, ResolutionState},
};

/// Number of addressable bits for the integer types that are swept.
pub fn bit_width(data_type: &str) -> Option<u8> {
    match data_type {
        "INT" => Some(16),
        "DINT" => Some(32),
        _ => None,
    }
}

pub struct BitOutputSweepProcessor();

impl BitOutputSweepProcessor {
    pub fn new() -> Box<Self> {
        Box::new(Self())
    }
}

impl ResolutionPhase for BitOutputSweepProcessor {
    fn name(&self) -> &'static str {
        "bit_output_sweep"
    }

    fn run(&self, ctx: &ResolutionContext<'_>, state: &ResolutionState) -> PhaseOutput {
        let mut out = PhaseOutput::default();

        for tag in ctx.monitored.iter() {
            if state.is_resolved(tag) {
                continue;
            }
            let word = IndexedOperand::split(tag);
            let data_type = ctx.index.data_type(word.base);
            let Some(width) = bit_width(data_type) else {
                continue;
            };
            let base_description = ctx.index.description(word.base);

            let mut emitted = false;
            for bit in 0..width {
                let operand = word.bit(bit);
                let occurrences = state.coil_occurrences(&operand);
                if occurrences.is_empty() {
                    continue;
                }
                let attributed = if ctx.options.attribute_every_coil {
                    occurrences
                } else {
                    &occurrences[..1]
                };
                let description = state
                    .comment(ctx.index, &operand)
                    .unwrap_or(base_description);
                for location in attributed {
                    out.records.push(MappingRecord {
                        destination: operand.clone(),
                        description: description.to_string(),
                        data_type: data_type.to_string(),
                        location: location.clone(),
                        instruction: InstructionKind::BooleanOutput,
                        source: String::new(),
                    });
                }
                emitted = true;
            }

            if emitted {
                out.resolved.insert(tag.to_string());
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        monitored::MonitoredTags, options::ResolutionOptions, rung_scan::RungScanProcessor,
        resolution_pipeline::ResolutionPipeline,
    };
    use ladder_model::{ProgramDocument, ProgramIndex};

    const EXPORT: &str = r#"<Controller><Tags>
        <Tag Name="Alarms" DataType="INT"><Description>Alarm word</Description>
          <Comments><Comment Operand="[0].2">High level</Comment></Comments></Tag>
        <Tag Name="Wide" DataType="DINT"/>
        <Tag Name="Real" DataType="REAL"/>
      </Tags>
      <Programs><Program Name="P"><Routines><Routine Name="R"><RLLContent>
        <Rung Number="0"><Text>XIC(a)OTE(Alarms[0].2);</Text></Rung>
        <Rung Number="1"><Text>XIC(b)OTE(Alarms[0].0)OTE(Wide[1].31)OTE(Real[0].1);</Text>
          <Elements><Element Operand="Alarms[0].0"><Comment>Low level</Comment></Element></Elements></Rung>
        <Rung Number="2"><Text>XIC(c)OTE(Alarms[0].2);</Text></Rung>
      </RLLContent></Routine></Routines></Program></Programs></Controller>"#;

    fn sweep(monitored: &[&str], options: ResolutionOptions) -> PhaseOutput {
        let document = ProgramDocument::parse(EXPORT);
        let index = ProgramIndex::build(&document);
        let monitored: MonitoredTags = monitored.iter().copied().collect();
        let ctx = ResolutionContext {
            document: &document,
            index: &index,
            monitored: &monitored,
            options: &options,
        };
        let mut scan = ResolutionPipeline::default();
        scan.add_phase(RungScanProcessor::new());
        let state = scan.run(&ctx);
        BitOutputSweepProcessor::new().run(&ctx, &state)
    }

    fn rows(out: &PhaseOutput) -> Vec<(&str, &str, &str)> {
        out.records
            .iter()
            .map(|r| (r.destination.as_str(), r.description.as_str(), r.location.rung.as_str()))
            .collect()
    }

    #[test]
    fn only_driven_bits_are_reported() {
        let out = sweep(&["Alarms[0]"], ResolutionOptions::default());
        assert_eq!(
            rows(&out),
            vec![
                ("Alarms[0].0", "Low level", "1"),
                ("Alarms[0].2", "High level", "0"),
            ]
        );
        assert!(out.records.iter().all(|r| r.instruction == InstructionKind::BooleanOutput));
        assert!(out.records.iter().all(|r| r.data_type == "INT" && r.source.is_empty()));
        assert!(out.resolved.contains("Alarms[0]"));
    }

    #[test]
    fn every_occurrence_when_requested() {
        let options = ResolutionOptions {
            attribute_every_coil: true,
        };
        let out = sweep(&["Alarms[0]"], options);
        let rungs: Vec<_> = rows(&out)
            .into_iter()
            .filter(|(dst, _, _)| *dst == "Alarms[0].2")
            .map(|(_, _, rung)| rung)
            .collect();
        assert_eq!(rungs, vec!["0", "2"]);
    }

    #[test]
    fn dint_bits_reach_31() {
        let out = sweep(&["Wide[1]"], ResolutionOptions::default());
        assert_eq!(rows(&out), vec![("Wide[1].31", "", "1")]);
    }

    #[test]
    fn undriven_and_non_integer_tags_stay_unresolved() {
        let out = sweep(&["Alarms[1]", "Real[0]", "Undeclared[0]"], ResolutionOptions::default());
        assert!(out.records.is_empty());
        assert!(out.resolved.is_empty());
    }
}
