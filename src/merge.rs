use serde_json::Value;

use crate::types::{DefaultsDocument, Settings};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a mapping for the same key, recurse.
/// Otherwise, `overlay`'s value wins (arrays are replaced, not combined).
pub fn deep_merge(mut base: Settings, overlay: Settings) -> Settings {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                base.insert(key, Value::Object(deep_merge(base_map, overlay_map)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Merge two classified documents, `high` taking precedence.
///
/// Root options deep-merge. Metadata and variables merge one level deep:
/// a colliding key is replaced wholesale by `high`'s value, and
/// non-colliding keys from both sides survive.
pub fn merge(low: DefaultsDocument, high: DefaultsDocument) -> DefaultsDocument {
    let mut metadata = low.metadata;
    metadata.extend(high.metadata);
    let mut variables = low.variables;
    variables.extend(high.variables);

    DefaultsDocument {
        options: deep_merge(low.options, high.options),
        metadata,
        variables,
    }
}

/// Merge documents in order: first is lowest precedence, last is highest.
pub fn merge_layers(layers: impl IntoIterator<Item = DefaultsDocument>) -> DefaultsDocument {
    layers.into_iter().fold(DefaultsDocument::default(), merge)
}
