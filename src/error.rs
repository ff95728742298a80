use std::fmt;

use thiserror::Error;

/// Which pass of the schema gate rejected a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Raw frontmatter, before any classification.
    Input,
    /// The merged defaults document, after overrides.
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Input => write!(f, "frontmatter"),
            Stage::Output => write!(f, "defaults file"),
        }
    }
}

/// A single schema violation: where it happened and what was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// JSON pointer into the validated document, e.g. `/metadata/csl`.
    /// Empty for the document root.
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Error)]
pub enum DefaultsError {
    #[error("Validation against schema returned errors in {stage} ({} found)", .errors.len())]
    Validation {
        stage: Stage,
        errors: Vec<FieldError>,
    },

    #[error("Cannot resolve output file against the working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
}

impl DefaultsError {
    /// Field-level errors carried by a validation failure; empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            DefaultsError::Validation { errors, .. } => errors,
            DefaultsError::WorkingDirectory(_) => &[],
        }
    }
}
