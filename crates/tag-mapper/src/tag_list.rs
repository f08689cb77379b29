// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Monitored tag list loading
//!
//! Two layouts are understood:
//! - a headered CSV, where the tag identifiers live in a named column
//! - a raw SCADA tag export (no header, `:`-prefixed section lines), filtered to one topic by its
//!   second field; columns are then named `Col1..ColN`

use std::path::Path;

use anyhow::Context;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use tag_resolution::MonitoredTags;

use crate::error::InputError;

pub fn load_monitored_tags(
    path: &Path,
    column: &str,
    topic: Option<&str>,
) -> anyhow::Result<MonitoredTags> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read tag list {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let cells = match topic {
        Some(topic) => topic_column(&text, column, topic, path)?,
        None => headered_column(&text, column)?,
    };
    let tags = MonitoredTags::new(cells);
    info!("loaded {} distinct monitored tags from {}", tags.len(), path.display());
    Ok(tags)
}

fn headered_column(text: &str, column: &str) -> anyhow::Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers().context("Failed to read tag list header")?.clone();
    let Some(position) = headers.iter().position(|h| h.trim() == column) else {
        return Err(InputError::MissingColumn {
            column: column.to_string(),
            available: headers.iter().map(str::to_string).collect(),
        }
        .into());
    };

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record.context("Malformed tag list row")?;
        cells.extend(cell(&record, position));
    }
    Ok(cells)
}

fn topic_column(text: &str, column: &str, topic: &str, path: &Path) -> anyhow::Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Malformed tag export row")?;
        let section = record.get(0).map_or(true, |first| first.starts_with(':'));
        if section || record.len() < 2 {
            continue;
        }
        if record.get(1) == Some(topic) {
            rows.push(record);
        }
    }
    if rows.is_empty() {
        return Err(InputError::NoTopicRows {
            topic: topic.to_string(),
            path: path.to_path_buf(),
        }
        .into());
    }

    let width = rows.iter().map(StringRecord::len).max().unwrap_or(0);
    let names: Vec<String> = (1..=width).map(|i| format!("Col{i}")).collect();
    let Some(position) = names.iter().position(|n| n == column) else {
        return Err(InputError::MissingColumn {
            column: column.to_string(),
            available: names,
        }
        .into());
    };
    debug!("{} rows of topic {} ({} columns)", rows.len(), topic, width);

    Ok(rows.iter().filter_map(|r| cell(r, position)).collect())
}

fn cell(record: &StringRecord, position: usize) -> Option<String> {
    record
        .get(position)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}
