//! Collapse an arbitrarily nested settings source into a single-level mapping.
//!
//! Nesting in frontmatter or project settings is treated as grouping with no
//! meaning to pandoc: `{pdf: {standalone: true}}` contributes `standalone`
//! exactly as a top-level key would. Two names are the exception. A mapping
//! under `metadata` or `variables`, at any depth, is collected into a separate
//! tagged bucket so callers can force keys into those partitions.

use serde_json::Value;

use crate::types::Settings;

/// The result of [`flatten`]: untagged leaf entries plus the explicitly
/// tagged metadata and variables entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    /// Leaf entries still awaiting classification.
    pub generic: Settings,
    /// Entries found under a `metadata` mapping.
    pub metadata: Settings,
    /// Entries found under a `variables` mapping.
    pub variables: Settings,
}

impl Flattened {
    pub fn is_empty(&self) -> bool {
        self.generic.is_empty() && self.metadata.is_empty() && self.variables.is_empty()
    }
}

/// Flatten `source` into generic, metadata and variables buckets.
///
/// Arrays are leaves. Within each bucket a later entry overwrites an earlier
/// one with the same key, so `{a: {x: 1}, b: {x: 2}}` yields `x = 2`.
pub fn flatten(source: &Settings) -> Flattened {
    let mut out = Flattened::default();
    collect(source, &mut out);
    out
}

fn collect(source: &Settings, out: &mut Flattened) {
    for (key, value) in source {
        match (key.as_str(), value) {
            ("metadata", Value::Object(tagged)) => {
                out.metadata
                    .extend(tagged.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            ("variables", Value::Object(tagged)) => {
                out.variables
                    .extend(tagged.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            (_, Value::Object(group)) => collect(group, out),
            _ => {
                out.generic.insert(key.clone(), value.clone());
            }
        }
    }
}
