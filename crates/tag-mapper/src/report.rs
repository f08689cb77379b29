// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use std::{fs::File, io::Write, path::Path};

use anyhow::Context;
use tag_resolution::MappingTable;

const TRAILING_COLUMNS: [&str; 7] = [
    "Description",
    "DataType",
    "Program",
    "Routine",
    "Rung",
    "Instruction",
    "Source",
];

/// Writes `table` as CSV. The first column is titled after the tag list column the identifiers
/// came from.
pub fn write_table<W: Write>(table: &MappingTable, tag_column: &str, writer: W) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(std::iter::once(tag_column).chain(TRAILING_COLUMNS))?;
    for record in table.iter() {
        csv.write_record(record.columns())?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_table_to_path(table: &MappingTable, tag_column: &str, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    write_table(table, tag_column, file)
        .with_context(|| format!("Failed to write mapping table to {}", path.display()))
}
