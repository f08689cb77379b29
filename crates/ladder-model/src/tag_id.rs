// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Tag identifier grammar
//!
//! Identifiers are plain strings of the form `Base`, `Base[Index]`, `Base[Index].Bit` or
//! `Base.Bit`. Two identifiers denote the same entity iff their strings are equal; the helpers
//! here only take them apart for index arithmetic and ordering.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_INDEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<base>.+?)\[(?P<index>\d+)\]$").expect("valid index pattern")
});

static NATURAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<base>.*?)(?:\[(?P<index>\d+)\])?(?:\.(?P<bit>\d+))?$")
        .expect("valid natural sort pattern")
});

/// Splits `Base[n]` into `(Base, n)`. Returns `None` when there is no trailing index or it does
/// not fit in 32 bits.
pub fn explicit_index(text: &str) -> Option<(&str, u32)> {
    let caps = TRAILING_INDEX.captures(text)?;
    let index = caps.name("index")?.as_str().parse().ok()?;
    let base = caps.name("base")?.as_str();
    Some((base, index))
}

/// Removes one trailing `[n]` if present.
pub fn strip_index(text: &str) -> &str {
    explicit_index(text).map(|(base, _)| base).unwrap_or(text)
}

/// An operand taken apart into its base and starting element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedOperand<'a> {
    pub base: &'a str,
    pub index: u32,
}

impl<'a> IndexedOperand<'a> {
    /// `Base[n]` becomes `(Base, n)`; anything else is taken whole, starting at element 0.
    pub fn split(text: &'a str) -> Self {
        Self::split_or(text, 0)
    }

    pub fn split_or(text: &'a str, default_index: u32) -> Self {
        match explicit_index(text) {
            Some((base, index)) => Self { base, index },
            None => Self {
                base: text,
                index: default_index,
            },
        }
    }

    /// The identifier `offset` elements past the starting one.
    pub fn element(&self, offset: u32) -> String {
        format!("{}[{}]", self.base, u64::from(self.index) + u64::from(offset))
    }

    /// `Base[index].bit`
    pub fn bit(&self, bit: u8) -> String {
        format!("{}[{}].{}", self.base, self.index, bit)
    }
}

/// Ordering key that keeps all variants of one base together: the bare base first, then array
/// elements in numeric order, each followed by its bits in numeric order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NaturalKey {
    base: String,
    index: i64,
    bit: i64,
}

impl NaturalKey {
    pub fn of(tag: &str) -> Self {
        let Some(caps) = NATURAL.captures(tag) else {
            return Self {
                base: tag.to_string(),
                index: -1,
                bit: -1,
            };
        };
        let number = |name: &str| {
            caps.name(name)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .unwrap_or(-1)
        };
        Self {
            base: caps.name("base").map_or(tag, |m| m.as_str()).to_string(),
            index: number("index"),
            bit: number("bit"),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn index(&self) -> Option<i64> {
        (self.index >= 0).then_some(self.index)
    }

    pub fn bit(&self) -> Option<i64> {
        (self.bit >= 0).then_some(self.bit)
    }
}

/// Sorts identifiers by [`NaturalKey`]. The sort is stable.
pub fn natural_sort<S: AsRef<str>>(tags: &mut [S]) {
    tags.sort_by_cached_key(|t| NaturalKey::of(t.as_ref()));
}
