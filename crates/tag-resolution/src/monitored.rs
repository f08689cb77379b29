// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use ladder_model::natural_sort;

/// The externally supplied list of tags to resolve. Duplicates are folded; iteration is in
/// natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitoredTags {
    set: BTreeSet<String>,
    ordered: Vec<String>,
}

impl MonitoredTags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = tags
            .into_iter()
            .map(Into::into)
            .filter(|t| !t.is_empty())
            .collect();
        let mut ordered: Vec<String> = set.iter().cloned().collect();
        natural_sort(&mut ordered);
        Self { set, ordered }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.set.contains(tag)
    }

    /// Tags in natural order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for MonitoredTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
