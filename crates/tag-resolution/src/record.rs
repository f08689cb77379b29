// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Mapping records, the unit of output of the resolution engine

use std::fmt::{self, Display, Formatter};

use ladder_model::{IndexedOperand, ProgramIndex, RungContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CopyMnemonic {
    Cop,
    Cps,
}

/// Which instruction a record was attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstructionKind {
    BlockCopy(CopyMnemonic),
    Move,
    FifoLoad,
    Message,
    BooleanOutput,
    NotFound,
}

impl InstructionKind {
    /// Family name, independent of the mnemonic spelling.
    pub fn family(&self) -> &'static str {
        match self {
            InstructionKind::BlockCopy(_) => "block-copy",
            InstructionKind::Move => "move",
            InstructionKind::FifoLoad => "fifo-load",
            InstructionKind::Message => "message",
            InstructionKind::BooleanOutput => "boolean-output",
            InstructionKind::NotFound => "not-found",
        }
    }
}

impl Display for InstructionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InstructionKind::BlockCopy(CopyMnemonic::Cop) => write!(f, "COP"),
            InstructionKind::BlockCopy(CopyMnemonic::Cps) => write!(f, "CPS"),
            InstructionKind::Move => write!(f, "MOV"),
            InstructionKind::FifoLoad => write!(f, "FFL"),
            InstructionKind::Message => write!(f, "MESSAGE"),
            InstructionKind::BooleanOutput => write!(f, "OTE"),
            InstructionKind::NotFound => write!(f, "Not Found"),
        }
    }
}

/// Where a rung sits in the program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RungLocation {
    pub program: String,
    pub routine: String,
    pub rung: String,
}

impl RungLocation {
    pub fn of(rung: &RungContext<'_>) -> Self {
        Self {
            program: rung.program.to_string(),
            routine: rung.routine.to_string(),
            rung: rung.number.to_string(),
        }
    }
}

/// One row of the mapping table. Two records are duplicates only if all eight fields are equal;
/// several distinct records may share a destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingRecord {
    pub destination: String,
    pub description: String,
    pub data_type: String,
    pub location: RungLocation,
    pub instruction: InstructionKind,
    pub source: String,
}

impl MappingRecord {
    /// A record whose type and description come from the declaration of the destination's base.
    pub fn attributed(
        index: &ProgramIndex,
        destination: String,
        location: &RungLocation,
        instruction: InstructionKind,
        source: String,
    ) -> Self {
        let base = IndexedOperand::split(&destination).base;
        Self {
            description: index.description(base).to_string(),
            data_type: index.data_type(base).to_string(),
            location: location.clone(),
            instruction,
            source,
            destination,
        }
    }

    pub fn not_found(index: &ProgramIndex, tag: &str) -> Self {
        Self::attributed(
            index,
            tag.to_string(),
            &RungLocation::default(),
            InstructionKind::NotFound,
            String::new(),
        )
    }

    /// The eight output columns in order.
    pub fn columns(&self) -> [String; 8] {
        [
            self.destination.clone(),
            self.description.clone(),
            self.data_type.clone(),
            self.location.program.clone(),
            self.location.routine.clone(),
            self.location.rung.clone(),
            self.instruction.to_string(),
            self.source.clone(),
        ]
    }
}
