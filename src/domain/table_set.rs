//! Normalized table-name sets.
//!
//! Every name stored in a [`TableSet`] is lowercase, unqualified, unquoted, and
//! free of a trailing `_<digits>` shard suffix, so `"public"."Orders_7"` and
//! `orders` compare equal.

use std::collections::BTreeSet;
use std::fmt;

const QUOTE_CHARS: &[char] = &['"', '\'', '`', '[', ']'];

/// Structural keywords that a lexical scan can land on where a table name is
/// expected (`FROM (SELECT ...) WHERE`, `JOIN ON`, ...). Never admitted.
const GUARDED_KEYWORDS: &[&str] = &[
    "on", "where", "group", "order", "having", "limit", "union", "select",
];

/// Separator used when a set is rendered as a single field.
pub const FIELD_SEPARATOR: &str = ";";

pub fn normalize_table_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut name = lowered.rsplit('.').next().unwrap_or("").to_string();

    // Quote trimming can expose a suffix and vice versa, so run to a fixpoint.
    loop {
        let unquoted = name.trim_matches(QUOTE_CHARS).trim();
        let stripped = strip_shard_suffix(unquoted);
        if stripped == name {
            return name;
        }
        name = stripped.to_string();
    }
}

fn strip_shard_suffix(name: &str) -> &str {
    match name.rfind('_') {
        Some(pos) => {
            let suffix = &name[pos + 1..];
            if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
                &name[..pos]
            } else {
                name
            }
        }
        None => name,
    }
}

fn is_admissible(name: &str) -> bool {
    !name.is_empty() && !GUARDED_KEYWORDS.contains(&name)
}

/// Sorted set of normalized table names. Iteration order is lexicographic,
/// which keeps every traversal over a set reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet(BTreeSet<String>);

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    /// Normalizes `raw` and adds it. Returns false when the name normalizes to
    /// nothing, is a guarded keyword, or is already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        let name = normalize_table_name(raw);
        if !is_admissible(&name) {
            return false;
        }
        self.0.insert(name)
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    /// Sorted names joined with `;`, the form used in tabular output.
    pub fn to_field(&self) -> String {
        self.iter().collect::<Vec<_>>().join(FIELD_SEPARATOR)
    }
}

impl fmt::Display for TableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field())
    }
}

impl<'a> IntoIterator for &'a TableSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
