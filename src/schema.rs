//! The static pandoc defaults schema and the key sets derived from it.
//!
//! The JSON Schema document is embedded at compile time and parsed once per
//! process. Root-option membership is read straight from its `properties`, so
//! adding an option to the schema file is all it takes for the classifier to
//! treat it as a root key.

use std::sync::LazyLock;

use serde_json::Value;

const SCHEMA_SOURCE: &str = include_str!("schema/pandoc-defaults.json");

/// The parsed schema document. Immutable for the lifetime of the process.
pub static SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(SCHEMA_SOURCE).expect("pandoc-defaults: embedded schema is not valid JSON")
});

/// Keys pandoc only honors under `metadata` for some output formats, even
/// though several of them are also accepted as root options.
pub const SPECIAL_KEYS: [&str; 6] = [
    "bibliography",
    "csl",
    "citation-abbreviations",
    "reference-section-title",
    "suppress-bibliography",
    "citation-style",
];

/// Keys that stay at the root regardless of any other rule: pandoc treats
/// them consistently across formats only when set there.
pub const ROOT_PINNED_KEYS: [&str; 2] = ["toc", "table-of-contents"];

/// Whether `key` is a root property of the defaults schema.
pub fn is_defaults_key(key: &str) -> bool {
    defaults_keys().any(|known| known == key)
}

pub fn is_special_key(key: &str) -> bool {
    SPECIAL_KEYS.contains(&key)
}

pub fn is_root_pinned(key: &str) -> bool {
    ROOT_PINNED_KEYS.contains(&key)
}

/// Every root property name, in schema order.
pub fn defaults_keys() -> impl Iterator<Item = &'static str> {
    SCHEMA
        .get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|props| props.keys().map(String::as_str))
}
