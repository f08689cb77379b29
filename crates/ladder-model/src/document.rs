// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Typed views over a controller program export (L5X)

use std::path::Path;

use anyhow::Context;
use log::{debug, info};

use crate::xml::{parse_lenient, Element};

/// A parsed program export. The element tree is owned here and every view borrows from it.
#[derive(Debug, Clone)]
pub struct ProgramDocument {
    root: Element,
    warnings: Vec<String>,
}

/// One rung together with where it lives. Borrowed from the document and dropped after the rung
/// has been scanned.
#[derive(Debug, Clone)]
pub struct RungContext<'doc> {
    pub program: &'doc str,
    pub routine: &'doc str,
    pub number: &'doc str,
    pub text: &'doc str,
    pub operand_comments: Vec<OperandComment<'doc>>,
    pub message_requests: Vec<MessageRequest>,
}

/// A comment attached to an individual instruction element inside a rung.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandComment<'doc> {
    pub operand: &'doc str,
    pub text: String,
}

/// The raw attributes of a `MessageParameters` element. Values are kept as text; deciding whether
/// they are usable is left to whoever expands the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageRequest {
    pub local_element: Option<String>,
    pub local_index: Option<String>,
    pub remote_element: Option<String>,
    pub requested_length: Option<String>,
}

impl MessageRequest {
    pub fn from_parameters(parameters: &Element) -> Self {
        let get = |key: &str| {
            parameters
                .attr(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            local_element: get("LocalElement"),
            local_index: get("LocalIndex"),
            remote_element: get("RemoteElement"),
            requested_length: get("RequestedLength"),
        }
    }
}

/// Comment or description text, from the `Text` attribute if set, else the element content.
/// Whitespace-only text counts as absent.
pub fn annotation_text(element: &Element) -> Option<String> {
    let raw = element
        .attr("Text")
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| element.text());
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ProgramDocument {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read program export {}", path.display()))?;
        let source = String::from_utf8_lossy(&bytes);
        let document = Self::parse(&source);
        info!(
            "loaded {} ({} bytes, {} repairs)",
            path.display(),
            bytes.len(),
            document.warnings.len()
        );
        Ok(document)
    }

    pub fn parse(source: &str) -> Self {
        let parsed = parse_lenient(source.trim_start_matches('\u{feff}'));
        Self {
            root: parsed.root,
            warnings: parsed.warnings,
        }
    }

    /// Repairs applied while reading a malformed export.
    pub fn salvage_warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Every `Tag` declaration, controller and program scoped alike, in document order.
    pub fn tag_declarations(&self) -> impl Iterator<Item = &Element> {
        self.root.descendants_named("Tag")
    }

    /// Every rung in document order.
    pub fn rungs(&self) -> Vec<RungContext<'_>> {
        let mut rungs = Vec::new();
        let mut ancestors: Vec<&Element> = Vec::new();
        let mut pending = vec![(&self.root, 0)];
        while let Some((element, depth)) = pending.pop() {
            ancestors.truncate(depth);
            if element.name() == "Rung" {
                rungs.push(rung_context(element, &ancestors));
                // rungs do not nest
                continue;
            }
            ancestors.push(element);
            pending.extend(element.children().rev().map(|child| (child, depth + 1)));
        }
        debug!("collected {} rungs", rungs.len());
        rungs
    }
}

/// Rung -> RLLContent -> Routine -> Routines -> Program (or AddOnInstructionDefinition).
fn rung_context<'doc>(rung: &'doc Element, ancestors: &[&'doc Element]) -> RungContext<'doc> {
    let name_of = |up: usize| {
        ancestors
            .len()
            .checked_sub(up)
            .and_then(|i| ancestors.get(i))
            .and_then(|e| e.attr("Name"))
            .unwrap_or("")
    };

    let operand_comments = rung
        .descendants()
        .filter_map(|e| {
            let operand = e.attr("Operand")?.trim();
            if operand.is_empty() {
                return None;
            }
            let text = e.child("Comment").and_then(annotation_text)?;
            Some(OperandComment { operand, text })
        })
        .collect();

    let message_requests = rung
        .descendants_named("MessageParameters")
        .map(MessageRequest::from_parameters)
        .collect();

    RungContext {
        program: name_of(4),
        routine: name_of(2),
        number: rung.attr("Number").unwrap_or(""),
        text: rung.child("Text").map(|t| t.text()).unwrap_or(""),
        operand_comments,
        message_requests,
    }
}
