//! The schema gate: check a document against the pandoc defaults schema.
//!
//! A [`Validator`] returns every violation it finds. [`check`] logs each one
//! and folds them into a single [`DefaultsError::Validation`], so callers get
//! the full picture instead of the first failure.

use std::sync::LazyLock;

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::{DefaultsError, FieldError, Stage};
use crate::schema::SCHEMA;

/// A schema validator: an empty result means the document is valid.
pub trait Validator {
    fn validate(&self, document: &Value) -> Vec<FieldError>;
}

static COMPILED: LazyLock<JSONSchema> = LazyLock::new(|| {
    JSONSchema::compile(&SCHEMA).expect("pandoc-defaults: embedded schema failed to compile")
});

/// The built-in validator for pandoc defaults files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PandocSchema;

impl Validator for PandocSchema {
    fn validate(&self, document: &Value) -> Vec<FieldError> {
        match COMPILED.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|e| FieldError::new(e.instance_path.to_string(), e.to_string()))
                .collect(),
        }
    }
}

/// Run `validator` over `document`, reporting every violation before failing.
pub fn check(validator: &dyn Validator, document: &Value, stage: Stage) -> Result<(), DefaultsError> {
    let errors = validator.validate(document);
    if errors.is_empty() {
        tracing::debug!(%stage, "schema check passed");
        return Ok(());
    }

    for err in &errors {
        tracing::error!(%stage, path = %err.path, "{}", err.message);
    }
    Err(DefaultsError::Validation { stage, errors })
}

/// Check `document` against the built-in pandoc schema.
pub fn validate_against_schema(document: &Value) -> Result<(), DefaultsError> {
    check(&PandocSchema, document, Stage::Input)
}
