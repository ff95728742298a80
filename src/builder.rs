use serde::Serialize;
use serde_json::Value;

use crate::error::{DefaultsError, FieldError, Stage};
use crate::resolve::{self, BuildOptions};
use crate::types::{DefaultsDocument, Settings};
use crate::validate::{PandocSchema, Validator};

/// Entry point for building a pandoc defaults file.
pub struct Defaults;

impl Defaults {
    pub fn builder() -> DefaultsBuilder<'static> {
        DefaultsBuilder::new()
    }
}

/// Builder for layering sources and overrides into a defaults file.
///
/// Precedence, lowest to highest:
///
/// - [`project_settings()`](Self::project_settings)
/// - [`additional_config()`](Self::additional_config)
/// - the frontmatter passed to [`build()`](Self::build)
///
/// [`output_file()`](Self::output_file) and [`writer()`](Self::writer) are
/// applied after merging and beat every source.
pub struct DefaultsBuilder<'v> {
    options: BuildOptions,
    validator: &'v dyn Validator,
}

impl DefaultsBuilder<'static> {
    fn new() -> Self {
        Self {
            options: BuildOptions::default(),
            validator: &PandocSchema,
        }
    }
}

impl<'v> DefaultsBuilder<'v> {
    /// Set the base settings (lowest precedence).
    pub fn project_settings(mut self, settings: Settings) -> Self {
        self.options.project_settings = Some(settings);
        self
    }

    /// Set extra settings layered between project settings and frontmatter.
    pub fn additional_config(mut self, settings: Settings) -> Self {
        self.options.additional_config = Some(settings);
        self
    }

    /// Force the output path. Relative paths are made absolute against the
    /// working directory at build time.
    pub fn output_file(mut self, path: impl Into<String>) -> Self {
        self.options.output_file = Some(path.into());
        self
    }

    /// Force the pandoc writer, skipping inference from the output file.
    pub fn writer(mut self, writer: impl Into<String>) -> Self {
        self.options.writer = Some(writer.into());
        self
    }

    /// Check both ends of the pipeline with a different validator.
    pub fn validator<'w>(self, validator: &'w dyn Validator) -> DefaultsBuilder<'w> {
        DefaultsBuilder {
            options: self.options,
            validator,
        }
    }

    /// Merge everything on top of `frontmatter` and validate the result.
    pub fn build(&self, frontmatter: &Settings) -> Result<DefaultsDocument, DefaultsError> {
        resolve::build_with(self.validator, frontmatter, &self.options)
    }

    /// Like [`build()`](Self::build), for any frontmatter that serializes to a
    /// mapping. Anything else is reported as a validation error.
    pub fn build_from<S: Serialize>(&self, frontmatter: &S) -> Result<DefaultsDocument, DefaultsError> {
        let reason = match serde_json::to_value(frontmatter) {
            Ok(Value::Object(map)) => return self.build(&map),
            Ok(other) => format!("expected a mapping, found {}", kind(&other)),
            Err(e) => e.to_string(),
        };
        tracing::error!(stage = %Stage::Input, "{reason}");
        Err(DefaultsError::Validation {
            stage: Stage::Input,
            errors: vec![FieldError::new("", reason)],
        })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
