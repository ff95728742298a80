//! Build pandoc defaults files from layered settings and document frontmatter.
//!
//! A pandoc [defaults file](https://pandoc.org/MANUAL.html#defaults-files)
//! collects command-line options in one YAML mapping. This crate produces one
//! from up to three loosely structured settings sources, sorting every key
//! into the right place and checking the result against the defaults schema.
//!
//! ```ignore
//! let doc = Defaults::builder()
//!     .project_settings(project)
//!     .output_file("build/paper.pdf")
//!     .build(&frontmatter)?;
//! assert_eq!(doc.writer(), Some("pdf"));
//! ```
//!
//! # Pipeline
//!
//! Each source goes through the same steps before merging:
//!
//! 1. **Flatten.** Nested mappings are unwrapped, so grouping keys in a
//!    settings file disappear and their leaves surface at the top. Mappings
//!    under `metadata` and `variables` are kept whole as explicit buckets.
//! 2. **Classify.** Every leaf lands in exactly one partition:
//!    - `toc` and `table-of-contents` are always root options,
//!    - special keys (`bibliography`, `csl`, `citation-style`, ...) go to
//!      `metadata`,
//!    - keys the schema knows are root options,
//!    - everything else becomes a template variable.
//!
//! Explicit `metadata`/`variables` entries win over a leaf of the same name.
//!
//! # Layer precedence
//!
//! ```text
//! Project settings       .project_settings()
//!        ↑ overridden by
//! Additional config      .additional_config()
//!        ↑ overridden by
//! Frontmatter            .build(&frontmatter)
//!        ↑ overridden by
//! Overrides              .output_file() / .writer()
//! ```
//!
//! Root options deep-merge; `metadata` and `variables` merge key by key.
//!
//! # Output file and writer
//!
//! A non-empty [`output_file()`](DefaultsBuilder::output_file) override is made
//! absolute against the working directory. An explicit
//! [`writer()`](DefaultsBuilder::writer) always wins. Without one, a writer is
//! inferred from the overridden output file's extension (see
//! [`writer_for_path`]); an unknown extension leaves the writer unset.
//!
//! # Schema gate
//!
//! The raw frontmatter is checked before anything else happens, and the
//! finished document is checked again before it is returned. Every violation
//! is logged through `tracing` and collected into one
//! [`DefaultsError::Validation`]. Plug in a different [`Validator`] with
//! [`DefaultsBuilder::validator`].
//!
//! # Command line
//!
//! The `cli` Cargo feature (on by default) adds the `pandoc-defaults` binary
//! and the [`cli`] module: clap args, source file loading (JSON, TOML, YAML,
//! and Markdown frontmatter), and rendering as YAML, JSON or TOML. Use the
//! library alone with:
//!
//! ```toml
//! pandoc-defaults = { version = "...", default-features = false }
//! ```

#![cfg_attr(test, recursion_limit = "256")]

pub mod error;
pub mod schema;
pub mod types;

mod builder;
pub mod classify;
#[cfg(feature = "cli")]
pub mod cli;
pub mod flatten;
#[cfg(feature = "cli")]
pub mod logging;
pub mod merge;
mod resolve;
mod validate;
mod writer;

#[cfg(test)]
mod fixtures;

pub use builder::{Defaults, DefaultsBuilder};
pub use classify::{Partition, classify, process};
pub use error::{DefaultsError, FieldError, Stage};
pub use flatten::{Flattened, flatten};
pub use merge::merge;
pub use resolve::{BuildOptions, absolute_path, build, build_with};
pub use schema::is_defaults_key;
pub use types::{DefaultsDocument, Settings};
pub use validate::{PandocSchema, Validator, check, validate_against_schema};
pub use writer::{writer_for_extension, writer_for_path};
