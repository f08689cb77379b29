// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Rung scan
//!
//! First phase. Walks every rung in document order and
//! 1. records each boolean-output operand against the rung that drives it,
//! 2. picks up instruction-level comments for operands that have no declared comment,
//! 3. expands block copies, moves, FIFO loads and messages into mapping records for monitored
//!    destinations.

use ladder_model::{strip_index, RungContext};
use log::{debug, warn};

use crate::{
    expansion::Expansion,
    patterns,
    record::{InstructionKind, MappingRecord, RungLocation},
    resolution_pipeline::{PhaseOutput, ResolutionContext, ResolutionPhase, ResolutionState},
};

pub struct RungScanProcessor();

impl RungScanProcessor {
    pub fn new() -> Box<Self> {
        Box::new(Self())
    }
}

impl ResolutionPhase for RungScanProcessor {
    fn name(&self) -> &'static str {
        "rung_scan"
    }

    fn run(&self, ctx: &ResolutionContext<'_>, _state: &ResolutionState) -> PhaseOutput {
        let mut out = PhaseOutput::default();
        let rungs = ctx.document.rungs();
        for rung in &rungs {
            scan_rung(ctx, rung, &mut out);
        }
        debug!(
            "scanned {} rungs, {} driven operands",
            rungs.len(),
            out.coils.len()
        );
        out
    }
}

fn scan_rung(ctx: &ResolutionContext<'_>, rung: &RungContext<'_>, out: &mut PhaseOutput) {
    let location = RungLocation::of(rung);

    for operand in patterns::coils(rung.text) {
        out.coils
            .entry(operand.to_string())
            .or_default()
            .push(location.clone());
    }

    for comment in &rung.operand_comments {
        if ctx.index.declared_comment(comment.operand).is_none() {
            out.rung_comments
                .entry(comment.operand.to_string())
                .or_insert_with(|| comment.text.clone());
        }
    }

    for copy in patterns::block_copies(rung.text) {
        let Ok(count) = copy.length.parse::<u32>() else {
            warn!(
                "{}/{} rung {}: copy length {} out of range",
                location.program, location.routine, location.rung, copy.length
            );
            continue;
        };
        let expansion = Expansion::block(copy.source, copy.destination, count);
        emit(ctx, &location, &expansion, InstructionKind::BlockCopy(copy.mnemonic), out);
    }

    for mov in patterns::moves(rung.text) {
        if ctx.monitored.contains(mov.destination) {
            record(
                ctx,
                &location,
                mov.destination.to_string(),
                InstructionKind::Move,
                mov.source.to_string(),
                out,
            );
        }
    }

    for load in patterns::fifo_loads(rung.text) {
        let control = strip_index(load.control);
        match ctx.index.control_length(control) {
            Some(length) if length > 0 => {
                let expansion = Expansion::queue(load.source, load.destination, length);
                emit(ctx, &location, &expansion, InstructionKind::FifoLoad, out);
            }
            _ => warn!(
                "{}/{} rung {}: FFL into {} skipped, {} has no LEN",
                location.program, location.routine, location.rung, load.destination, control
            ),
        }
    }

    for call in patterns::message_calls(rung.text) {
        if let Some(expansion) = ctx.index.message_request(call.control).and_then(Expansion::message) {
            emit(ctx, &location, &expansion, InstructionKind::Message, out);
        }
    }

    for request in &rung.message_requests {
        if let Some(expansion) = Expansion::message(request) {
            emit(ctx, &location, &expansion, InstructionKind::Message, out);
        }
    }
}

fn emit(
    ctx: &ResolutionContext<'_>,
    location: &RungLocation,
    expansion: &Expansion<'_>,
    instruction: InstructionKind,
    out: &mut PhaseOutput,
) {
    for (source, destination) in expansion.monitored_pairs(ctx.monitored) {
        record(ctx, location, destination, instruction, source, out);
    }
}

fn record(
    ctx: &ResolutionContext<'_>,
    location: &RungLocation,
    destination: String,
    instruction: InstructionKind,
    source: String,
    out: &mut PhaseOutput,
) {
    out.resolved.insert(destination.clone());
    out.records.push(MappingRecord::attributed(
        ctx.index,
        destination,
        location,
        instruction,
        source,
    ));
}
