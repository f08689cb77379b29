// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Index expansion
//!
//! Turns one multi-element transfer into per-element `(source, destination)` pairs. Element `k`
//! of the destination, counted from its starting index, is paired with element `k` of the
//! source counted from the source's own starting index.

use ladder_model::{IndexedOperand, MessageRequest};
use log::warn;

use crate::monitored::MonitoredTags;

/// How the source column is filled for each expanded element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOperand<'a> {
    /// Offset in lockstep with the destination.
    Indexed(IndexedOperand<'a>),
    /// The same operand for every element (a queue load pushes one value into each slot).
    Verbatim(&'a str),
    Absent,
}

impl SourceOperand<'_> {
    fn at(&self, offset: u32) -> String {
        match self {
            SourceOperand::Indexed(op) => op.element(offset),
            SourceOperand::Verbatim(text) => text.to_string(),
            SourceOperand::Absent => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion<'a> {
    pub source: SourceOperand<'a>,
    pub destination: IndexedOperand<'a>,
    pub count: u32,
}

impl<'a> Expansion<'a> {
    /// Block copy: both operands advance together.
    pub fn block(source: &'a str, destination: &'a str, count: u32) -> Self {
        Self {
            source: SourceOperand::Indexed(IndexedOperand::split(source)),
            destination: IndexedOperand::split(destination),
            count,
        }
    }

    /// Queue load: every destination slot is fed from the same source operand.
    pub fn queue(source: &'a str, destination: &'a str, count: u32) -> Self {
        Self {
            source: SourceOperand::Verbatim(source),
            destination: IndexedOperand::split(destination),
            count,
        }
    }

    /// Message request: the local element (with its own index, else `LocalIndex`) receives
    /// `RequestedLength` elements read from the remote element starting at the same index.
    ///
    /// Returns `None` when the local element or length is missing, or when the length or
    /// `LocalIndex` is not a number.
    pub fn message(request: &'a MessageRequest) -> Option<Self> {
        let local = request.local_element.as_deref()?;
        let Some(count) = request
            .requested_length
            .as_deref()
            .and_then(|l| l.parse::<u32>().ok())
        else {
            warn!("message into {local}: no usable RequestedLength");
            return None;
        };
        let local_index = match request.local_index.as_deref() {
            None => 0,
            Some(text) => match text.parse::<u32>() {
                Ok(index) => index,
                Err(_) => {
                    warn!("message into {local}: LocalIndex {text:?} is not a number");
                    return None;
                }
            },
        };
        let source = match request.remote_element.as_deref() {
            Some(remote) => SourceOperand::Indexed(IndexedOperand::split_or(remote, local_index)),
            None => SourceOperand::Absent,
        };
        Some(Self {
            source,
            destination: IndexedOperand::split_or(local, local_index),
            count,
        })
    }

    /// All pairs, `(source, destination)`.
    #[cfg(test)]
    pub fn pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
        (0..self.count).map(move |k| (self.source.at(k), self.destination.element(k)))
    }

    /// Pairs whose destination is monitored. Unmonitored elements are dropped before their
    /// source is formatted.
    pub fn monitored_pairs<'m>(
        &'m self,
        monitored: &'m MonitoredTags,
    ) -> impl Iterator<Item = (String, String)> + 'm {
        (0..self.count).filter_map(move |k| {
            let destination = self.destination.element(k);
            monitored
                .contains(&destination)
                .then(|| (self.source.at(k), destination))
        })
    }
}
