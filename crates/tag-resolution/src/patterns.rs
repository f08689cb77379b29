// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Instruction patterns over neutral rung text
//!
//! One pattern per instruction family. Matching is case-insensitive, tolerates whitespace around
//! delimiters and only captures operand text; whether an operand is meaningful is decided by the
//! caller. An operand is any run of characters other than `,`, whitespace and `)`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::CopyMnemonic;

static BLOCK_COPY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?P<mnemonic>COP|CPS)\s*\(\s*(?P<source>[^,\s)]+)\s*,\s*(?P<destination>[^,\s)]+)\s*,\s*(?P<length>\d+)\s*\)",
    )
    .expect("valid block copy pattern")
});

static MOVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bMOV\s*\(\s*(?P<source>[^,\s)]+)\s*,\s*(?P<destination>[^,\s)]+)\s*\)")
        .expect("valid move pattern")
});

// FFL(Source, FIFO, Control, Length, Position): only the first three are used
static FIFO_LOAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bFFL\s*\(\s*(?P<source>[^,\s)]+)\s*,\s*(?P<destination>[^,\s)]+)\s*,\s*(?P<control>[^,\s)]+)",
    )
    .expect("valid fifo load pattern")
});

static MESSAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bMSG\s*\(\s*(?P<control>[^,\s)]+)\s*\)").expect("valid message pattern")
});

static COIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bOTE\s*\(\s*(?P<operand>[^\s)]+)\s*\)").expect("valid coil pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCopy<'t> {
    pub mnemonic: CopyMnemonic,
    pub source: &'t str,
    pub destination: &'t str,
    /// Literal length operand, digits only.
    pub length: &'t str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move<'t> {
    pub source: &'t str,
    pub destination: &'t str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoLoad<'t> {
    pub source: &'t str,
    pub destination: &'t str,
    pub control: &'t str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCall<'t> {
    pub control: &'t str,
}

pub fn block_copies(text: &str) -> impl Iterator<Item = BlockCopy<'_>> {
    BLOCK_COPY.captures_iter(text).map(|caps| BlockCopy {
        mnemonic: if caps["mnemonic"].eq_ignore_ascii_case("CPS") {
            CopyMnemonic::Cps
        } else {
            CopyMnemonic::Cop
        },
        source: caps.name("source").map_or("", |m| m.as_str()),
        destination: caps.name("destination").map_or("", |m| m.as_str()),
        length: caps.name("length").map_or("", |m| m.as_str()),
    })
}

pub fn moves(text: &str) -> impl Iterator<Item = Move<'_>> {
    MOVE.captures_iter(text).map(|caps| Move {
        source: caps.name("source").map_or("", |m| m.as_str()),
        destination: caps.name("destination").map_or("", |m| m.as_str()),
    })
}

pub fn fifo_loads(text: &str) -> impl Iterator<Item = FifoLoad<'_>> {
    FIFO_LOAD.captures_iter(text).map(|caps| FifoLoad {
        source: caps.name("source").map_or("", |m| m.as_str()),
        destination: caps.name("destination").map_or("", |m| m.as_str()),
        control: caps.name("control").map_or("", |m| m.as_str()),
    })
}

pub fn message_calls(text: &str) -> impl Iterator<Item = MessageCall<'_>> {
    MESSAGE.captures_iter(text).map(|caps| MessageCall {
        control: caps.name("control").map_or("", |m| m.as_str()),
    })
}

/// Operands of every boolean output on the rung, in text order.
pub fn coils(text: &str) -> impl Iterator<Item = &str> {
    COIL.captures_iter(text)
        .filter_map(|caps| caps.name("operand").map(|m| m.as_str()))
}
