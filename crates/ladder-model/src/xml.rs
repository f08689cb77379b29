// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Recovering XML reader
//!
//! Controller exports are frequently hand-edited or truncated. Instead of rejecting such a
//! document, the reader builds as much of the element tree as it can and records what it had to
//! repair:
//! - an end tag closes the nearest open element with the same name, implicitly closing any
//!   elements opened after it
//! - an end tag with no matching open element is ignored
//! - elements still open at end of input are closed
//! - a hard syntax error stops reading; everything built up to that point is kept
//!
//! Only local names are kept, namespace prefixes are dropped.

use std::borrow::Cow;

use log::warn;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A node of the salvaged element tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

/// Result of a lenient parse: the synthetic document node (whose children are the top-level
/// elements) and one message per repair that was applied.
#[derive(Debug, Clone, Default)]
pub struct ParsedXml {
    pub root: Element,
    pub warnings: Vec<String>,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Character data directly inside this element, CDATA sections included.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter()
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All elements below this one in document order (pre-order), excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    pub fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.descendants().filter(move |e| e.name == name)
    }

    fn open(start: &BytesStart<'_>, warnings: &mut Vec<String>) -> Self {
        let name = lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes().with_checks(false) {
            match attr {
                Ok(attr) => {
                    let key = lossy(attr.key.local_name().as_ref()).into_owned();
                    let value = match attr.unescape_value() {
                        Ok(v) => v.into_owned(),
                        Err(_) => lossy(&attr.value).into_owned(),
                    };
                    attributes.push((key, value));
                }
                Err(err) => warnings.push(format!("dropped malformed attribute on <{name}>: {err}")),
            }
        }
        Element {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }
}

// Salvaged trees can nest as deep as the input is long; children are released from a work list.
impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Pops the top of `stack` and attaches it to its new top. The document node at index 0 is
/// never popped.
fn close_top(stack: &mut Vec<Element>) {
    if stack.len() > 1 {
        if let Some(done) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(done);
            }
        }
    }
}

pub fn parse_lenient(source: &str) -> ParsedXml {
    let mut reader = Reader::from_str(source);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.trim_text(true);
    }

    let mut warnings = Vec::new();
    let mut stack = vec![Element::default()];

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let element = Element::open(&start, &mut warnings);
                stack.push(element);
            }
            Ok(Event::Empty(start)) => {
                let element = Element::open(&start, &mut warnings);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Ok(Event::End(end)) => {
                let name = lossy(end.local_name().as_ref()).into_owned();
                match stack.iter().rposition(|e| e.name == name) {
                    Some(pos) if pos > 0 => {
                        while stack.len() > pos + 1 {
                            let unclosed = stack.last().map(|e| e.name.clone()).unwrap_or_default();
                            warnings.push(format!("</{name}> implicitly closed unterminated <{unclosed}>"));
                            close_top(&mut stack);
                        }
                        close_top(&mut stack);
                    }
                    _ => warnings.push(format!(
                        "ignored stray </{name}> at byte {}",
                        reader.buffer_position()
                    )),
                }
            }
            Ok(Event::Text(text)) => {
                let content = match text.unescape() {
                    Ok(t) => t.into_owned(),
                    Err(_) => lossy(&text).into_owned(),
                };
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&content);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&lossy(&data));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                warnings.push(format!(
                    "stopped reading at byte {}: {err}",
                    reader.buffer_position()
                ));
                break;
            }
        }
    }

    while stack.len() > 1 {
        let unclosed = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        warnings.push(format!("closed <{unclosed}> left open at end of input"));
        close_top(&mut stack);
    }

    for warning in &warnings {
        warn!("xml: {}", warning);
    }

    ParsedXml {
        root: stack.pop().unwrap_or_default(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_document_has_no_warnings() {
        let parsed = parse_lenient(
            r#"<?xml version="1.0"?>
            <RSLogix5000Content><Controller Name="C1"><Tags>
              <Tag Name="Speed" DataType="INT"><Description><![CDATA[Line speed]]></Description></Tag>
              <Tag Name="Run" DataType="BOOL"/>
            </Tags></Controller></RSLogix5000Content>"#,
        );
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let tags: Vec<_> = parsed.root.descendants_named("Tag").collect();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].attr("Name"), Some("Speed"));
        assert_eq!(tags[0].child("Description").map(|d| d.text()), Some("Line speed"));
        assert_eq!(tags[1].attr("DataType"), Some("BOOL"));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let parsed = parse_lenient("<a><b><c/></b><d/></a>");
        let names: Vec<_> = parsed.root.descendants().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn mismatched_end_tag_closes_inner_elements() {
        let parsed = parse_lenient("<a><b><c>text</a><d/>");
        assert!(!parsed.warnings.is_empty());
        let a = parsed.root.child("a").expect("a survives");
        let b = a.child("b").expect("b survives");
        assert_eq!(b.child("c").map(|c| c.text()), Some("text"));
        assert!(parsed.root.child("d").is_some());
    }

    #[test]
    fn stray_end_tag_is_ignored() {
        let parsed = parse_lenient("<a></x><b/></a>");
        assert_eq!(parsed.warnings.len(), 1);
        assert!(parsed.root.child("a").and_then(|a| a.child("b")).is_some());
    }

    #[test]
    fn truncated_document_is_salvaged() {
        let parsed = parse_lenient(r#"<Tags><Tag Name="A" DataType="DINT"/><Tag Name="B""#);
        assert!(!parsed.warnings.is_empty());
        let names: Vec<_> = parsed
            .root
            .descendants_named("Tag")
            .filter_map(|t| t.attr("Name"))
            .collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn deeply_nested_unterminated_input_is_released() {
        let source = "<a>".repeat(50_000);
        let parsed = parse_lenient(&source);
        assert_eq!(parsed.warnings.len(), 50_000);
        assert_eq!(parsed.root.descendants().count(), 50_000);
        drop(parsed);
    }

    #[test]
    fn namespace_prefixes_are_dropped() {
        let parsed = parse_lenient(r#"<x:Root xmlns:x="urn:a"><x:Tag x:Name="N"/></x:Root>"#);
        let tag = parsed.root.descendants_named("Tag").next().expect("tag");
        assert_eq!(tag.attr("Name"), Some("N"));
    }
}
