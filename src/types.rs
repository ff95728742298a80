use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A caller-provided settings source: an arbitrarily deep string-keyed mapping.
pub type Settings = Map<String, Value>;

/// The three-partition shape of a pandoc defaults file.
///
/// `options` holds root keys known to pandoc, `metadata` holds document
/// metadata (including citation keys that pandoc only honors there), and
/// `variables` holds free-form template variables. Serializes to a single
/// mapping with root options at the top level and the two partitions as
/// sub-mappings, omitted when empty. Serialization goes through
/// [`to_value`](Self::to_value), so what is written is what was validated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DefaultsDocument {
    #[serde(flatten)]
    pub options: Settings,
    #[serde(default)]
    pub metadata: Settings,
    #[serde(default)]
    pub variables: Settings,
}

impl DefaultsDocument {
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// The `output-file` root option, if set to a string.
    pub fn output_file(&self) -> Option<&str> {
        self.options.get("output-file").and_then(Value::as_str)
    }

    /// The `writer` root option, if set to a string.
    pub fn writer(&self) -> Option<&str> {
        self.options.get("writer").and_then(Value::as_str)
    }

    /// The document as one JSON mapping, the shape the schema gate and
    /// pandoc both see.
    ///
    /// A root option named `metadata` or `variables` is emitted as-is in
    /// place of that partition, so the schema gate judges the value that
    /// actually gets written.
    pub fn to_value(&self) -> Value {
        let mut out = self.options.clone();
        for (name, partition) in [("metadata", &self.metadata), ("variables", &self.variables)] {
            if !partition.is_empty() && !out.contains_key(name) {
                out.insert(name.into(), Value::Object(partition.clone()));
            }
        }
        Value::Object(out)
    }

    pub fn len(&self) -> usize {
        self.options.len() + self.metadata.len() + self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for DefaultsDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
