//! Route flattened keys into root options, metadata, or template variables.
//!
//! Rules, in order, for each untagged key:
//!
//! 1. `toc` / `table-of-contents` always stay at the root.
//! 2. A schema property that is not a special key is a root option.
//! 3. A special key (bibliography, csl, ...) goes to metadata, even when the
//!    schema also knows it as a root option.
//! 4. Anything else is a template variable. Variables are substituted
//!    unescaped, unlike metadata which pandoc may interpret.
//!
//! Explicitly tagged `metadata.*` / `variables.*` entries skip the rules and
//! are overlaid last, so they win over a generically routed key of the same
//! name.
//!
//! A non-mapping value under `metadata` or `variables` is an ordinary leaf.
//! Both names are schema keys, so it lands at the root, where the exit
//! check rejects it.

use crate::flatten::{self, Flattened};
use crate::schema;
use crate::types::{DefaultsDocument, Settings};

/// Which partition of the defaults document a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Root,
    Metadata,
    Variables,
}

/// Decide the partition for an untagged key.
pub fn partition_for(key: &str) -> Partition {
    if schema::is_root_pinned(key) {
        Partition::Root
    } else if schema::is_special_key(key) {
        Partition::Metadata
    } else if schema::is_defaults_key(key) {
        Partition::Root
    } else {
        Partition::Variables
    }
}

/// Classify a flattened source into a three-partition document.
pub fn classify(flat: Flattened) -> DefaultsDocument {
    let Flattened {
        generic,
        metadata,
        variables,
    } = flat;

    let mut root = Settings::new();
    let mut routed_metadata = Settings::new();
    let mut routed_variables = Settings::new();
    for (key, value) in generic {
        match partition_for(&key) {
            Partition::Root => root.insert(key, value),
            Partition::Metadata => routed_metadata.insert(key, value),
            Partition::Variables => routed_variables.insert(key, value),
        };
    }

    routed_metadata.extend(metadata);
    routed_variables.extend(variables);

    DefaultsDocument {
        options: root,
        metadata: routed_metadata,
        variables: routed_variables,
    }
}

/// Flatten and classify one settings source.
pub fn process(source: &Settings) -> DefaultsDocument {
    let doc = classify(flatten::flatten(source));
    tracing::debug!(
        root = doc.options.len(),
        metadata = doc.metadata.len(),
        variables = doc.variables.len(),
        "classified settings source"
    );
    doc
}
