// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Result consolidation: exact duplicates are dropped (first one kept) and the rest is ordered by
//! the natural key of the destination. The sort is stable, so records with equal keys stay in
//! pipeline order.

use std::collections::BTreeMap;

use itertools::Itertools;
use ladder_model::NaturalKey;

use crate::record::{InstructionKind, MappingRecord};

/// The final, ordered mapping table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    records: Vec<MappingRecord>,
}

pub fn consolidate(records: Vec<MappingRecord>) -> MappingTable {
    let mut records: Vec<MappingRecord> = records.into_iter().unique().collect();
    records.sort_by_cached_key(|r| NaturalKey::of(&r.destination));
    MappingTable { records }
}

impl MappingTable {
    pub fn records(&self) -> &[MappingRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn counts_by_kind(&self) -> BTreeMap<InstructionKind, usize> {
        self.records.iter().counts_by(|r| r.instruction).into_iter().collect()
    }
}

impl IntoIterator for MappingTable {
    type Item = MappingRecord;
    type IntoIter = std::vec::IntoIter<MappingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RungLocation;

    fn record(destination: &str, rung: &str) -> MappingRecord {
        MappingRecord {
            destination: destination.to_string(),
            description: String::new(),
            data_type: "INT".to_string(),
            location: RungLocation {
                program: "P".to_string(),
                routine: "R".to_string(),
                rung: rung.to_string(),
            },
            instruction: InstructionKind::Move,
            source: "S".to_string(),
        }
    }

    #[test]
    fn natural_order_and_exact_duplicates() {
        let table = consolidate(vec![
            record("X[10]", "0"),
            record("X[2].3", "0"),
            record("X[2]", "4"),
            record("X", "0"),
            record("X[2]", "1"),
            record("X[2]", "4"),
        ]);
        let order: Vec<_> = table
            .iter()
            .map(|r| (r.destination.as_str(), r.location.rung.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("X", "0"), ("X[2]", "4"), ("X[2]", "1"), ("X[2].3", "0"), ("X[10]", "0")]
        );
    }

    #[test]
    fn counts_per_kind() {
        let mut not_found = record("Y", "");
        not_found.instruction = InstructionKind::NotFound;
        let table = consolidate(vec![record("X", "0"), record("X", "1"), not_found]);
        let counts = table.counts_by_kind();
        assert_eq!(counts.get(&InstructionKind::Move), Some(&2));
        assert_eq!(counts.get(&InstructionKind::NotFound), Some(&1));
    }
}
