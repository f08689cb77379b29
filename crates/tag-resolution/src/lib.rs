// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Tag resolution engine
//!
//! Answers, for every monitored SCADA tag, which ladder instruction last writes it: where it sits
//! (program, routine, rung) and what it copies from. Resolution runs in tiers: a rung scan over
//! value-transfer instructions, a bit-level sweep over boolean outputs for integer tags the scan
//! missed, and a final report of tags nothing writes.

pub mod bit_sweep;
pub mod consolidation;
pub mod engine;
pub mod expansion;
pub mod monitored;
pub mod options;
pub mod patterns;
pub mod pipeline_factory;
pub mod record;
pub mod resolution_pipeline;
pub mod rung_scan;
pub mod unresolved_report;

pub use consolidation::{consolidate, MappingTable};
pub use engine::{resolve, resolve_with_index};
pub use monitored::MonitoredTags;
pub use options::ResolutionOptions;
pub use record::{CopyMnemonic, InstructionKind, MappingRecord, RungLocation};
