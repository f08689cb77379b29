// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Program index
//!
//! Lookup tables derived once from the tag declarations of a program export: declared type,
//! base description, declaration-level operand comments, control-structure lengths and message
//! parameters. The index is immutable once built and is shared by reference with every
//! resolution phase.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::document::{annotation_text, MessageRequest, ProgramDocument};
use crate::xml::Element;

/// Data type whose `LEN` member drives length-dependent instructions.
pub const CONTROL_TYPE: &str = "CONTROL";

/// What is known about one declared base name. Every field is optional; a field left unset by one
/// declaration can be filled by a later declaration of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDeclaration {
    /// Upper-cased data type.
    pub data_type: Option<String>,
    pub description: Option<String>,
    /// `LEN` of a control structure, when it parses as an integer.
    pub length: Option<u32>,
    /// Parameters of a message-typed tag.
    pub message: Option<MessageRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct ProgramIndex {
    declarations: BTreeMap<String, TagDeclaration>,
    comments: BTreeMap<String, String>,
}

impl ProgramIndex {
    pub fn build(document: &ProgramDocument) -> Self {
        let mut index = Self::default();
        for tag in document.tag_declarations() {
            index.add_declaration(tag);
        }
        info!(
            "indexed {} tags ({} operand comments, {} control lengths, {} message tags)",
            index.declarations.len(),
            index.comments.len(),
            index.declarations.values().filter(|d| d.length.is_some()).count(),
            index.declarations.values().filter(|d| d.message.is_some()).count(),
        );
        index
    }

    /// Folds one `Tag` element into the tables. Later declarations overwrite the fields they set.
    fn add_declaration(&mut self, tag: &Element) {
        let Some(name) = tag.attr("Name").filter(|n| !n.is_empty()) else {
            return;
        };
        let data_type = tag.attr("DataType").unwrap_or("").to_uppercase();

        let mut update = TagDeclaration::default();
        if !data_type.is_empty() {
            update.data_type = Some(data_type.clone());
        }
        update.description = tag.child("Description").and_then(annotation_text);

        if let Some(comments) = tag.child("Comments") {
            for comment in comments.children_named("Comment") {
                let operand = comment.attr("Operand").unwrap_or("").trim();
                if operand.is_empty() {
                    continue;
                }
                let Some(text) = annotation_text(comment) else {
                    continue;
                };
                let key = if operand.starts_with('[') {
                    format!("{name}{operand}")
                } else {
                    operand.to_string()
                };
                self.comments.insert(key, text);
            }
        }

        if data_type == CONTROL_TYPE {
            update.length = control_length(tag);
            if update.length.is_none() {
                debug!("control tag {} has no usable LEN", name);
            }
        }

        update.message = tag
            .descendants_named("Data")
            .filter(|d| d.attr("Format") == Some("Message"))
            .find_map(|d| d.descendants_named("MessageParameters").next())
            .map(MessageRequest::from_parameters);

        self.declarations
            .entry(name.to_string())
            .and_modify(|existing| existing.merge(update.clone()))
            .or_insert(update);
    }

    pub fn declaration(&self, base: &str) -> Option<&TagDeclaration> {
        self.declarations.get(base)
    }

    /// Declared type of `base`, or `""` if undeclared.
    pub fn data_type(&self, base: &str) -> &str {
        self.declaration(base)
            .and_then(|d| d.data_type.as_deref())
            .unwrap_or("")
    }

    /// Description of `base`, or `""` if none.
    pub fn description(&self, base: &str) -> &str {
        self.declaration(base)
            .and_then(|d| d.description.as_deref())
            .unwrap_or("")
    }

    pub fn control_length(&self, base: &str) -> Option<u32> {
        self.declaration(base).and_then(|d| d.length)
    }

    pub fn message_request(&self, tag: &str) -> Option<&MessageRequest> {
        self.declaration(tag).and_then(|d| d.message.as_ref())
    }

    /// Comment declared for a fully qualified operand (`Base[i].b`, `Base[i]` or a symbolic name).
    pub fn declared_comment(&self, operand: &str) -> Option<&str> {
        self.comments.get(operand).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl TagDeclaration {
    fn merge(&mut self, later: TagDeclaration) {
        if later.data_type.is_some() {
            self.data_type = later.data_type;
        }
        if later.description.is_some() {
            self.description = later.description;
        }
        if later.length.is_some() {
            self.length = later.length;
        }
        if later.message.is_some() {
            self.message = later.message;
        }
    }
}

fn control_length(tag: &Element) -> Option<u32> {
    tag.descendants_named("DataValueMember")
        .find(|m| m.attr("Name") == Some("LEN"))
        .and_then(|m| m.attr("Value"))
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS: &str = r#"<Controller><Tags>
      <Tag Name="Word" DataType="dint">
        <Description><![CDATA[  Status word  ]]></Description>
        <Comments>
          <Comment Operand="[0].3"><![CDATA[Pump running]]></Comment>
          <Comment Operand=".4">Bare bit</Comment>
          <Comment Operand="[1]">   </Comment>
        </Comments>
      </Tag>
      <Tag Name="Fifo" DataType="CONTROL"><Data Format="Decorated"><Structure DataType="CONTROL">
        <DataValueMember Name="LEN" DataType="DINT" Value="8"/>
        <DataValueMember Name="POS" DataType="DINT" Value="0"/>
      </Structure></Data></Tag>
      <Tag Name="BadFifo" DataType="CONTROL"><Data><Structure>
        <DataValueMember Name="LEN" Value="??"/>
      </Structure></Data></Tag>
      <Tag Name="NoLenFifo" DataType="CONTROL"/>
      <Tag Name="ReadMsg" DataType="MESSAGE"><Data Format="Message">
        <MessageParameters MessageType="CIP Data Table Read" LocalElement="Buf" LocalIndex="0"
          RemoteElement="Remote[0]" RequestedLength="10"/>
      </Data></Tag>
    </Tags></Controller>"#;

    fn index() -> ProgramIndex {
        ProgramIndex::build(&ProgramDocument::parse(TAGS))
    }

    #[test]
    fn types_are_upper_cased_and_descriptions_trimmed() {
        let index = index();
        assert_eq!(index.data_type("Word"), "DINT");
        assert_eq!(index.description("Word"), "Status word");
        assert_eq!(index.data_type("Missing"), "");
        assert_eq!(index.description("Fifo"), "");
    }

    #[test]
    fn declaration_comments_are_keyed_by_operand() {
        let index = index();
        assert_eq!(index.declared_comment("Word[0].3"), Some("Pump running"));
        assert_eq!(index.declared_comment(".4"), Some("Bare bit"));
        assert_eq!(index.declared_comment("Word[1]"), None);
    }

    #[test]
    fn control_length_only_when_parseable() {
        let index = index();
        assert_eq!(index.control_length("Fifo"), Some(8));
        assert_eq!(index.control_length("BadFifo"), None);
        assert_eq!(index.control_length("NoLenFifo"), None);
        assert_eq!(index.control_length("Word"), None);
    }

    #[test]
    fn message_tags_keep_their_parameters() {
        let index = index();
        let request = index.message_request("ReadMsg").expect("message indexed");
        assert_eq!(request.local_element.as_deref(), Some("Buf"));
        assert_eq!(request.requested_length.as_deref(), Some("10"));
        assert!(index.message_request("Word").is_none());
    }

    #[test]
    fn later_declaration_wins_field_by_field() {
        let index = ProgramIndex::build(&ProgramDocument::parse(
            r#"<Tags>
              <Tag Name="X" DataType="INT"><Description>controller scope</Description></Tag>
              <Tag Name="X" DataType="DINT"/>
            </Tags>"#,
        ));
        assert_eq!(index.len(), 1);
        assert_eq!(index.data_type("X"), "DINT");
        assert_eq!(index.description("X"), "controller scope");
    }
}
