// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Ladder program model
//!
//! Loads controller program exports (L5X) leniently and derives the read-only lookup tables the
//! tag resolution engine works from. Nothing in this crate knows about monitored tags or mapping
//! records.

pub mod document;
pub mod index;
pub mod tag_id;
pub mod xml;

pub use document::{MessageRequest, OperandComment, ProgramDocument, RungContext};
pub use index::{ProgramIndex, TagDeclaration, CONTROL_TYPE};
pub use tag_id::{explicit_index, natural_sort, strip_index, IndexedOperand, NaturalKey};
