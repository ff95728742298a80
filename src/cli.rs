//! Clap adapter and file glue for the `pandoc-defaults` binary.
//!
//! Compiled only with the `cli` Cargo feature (on by default). The library
//! core never touches the filesystem; this module is where source files are
//! read and parsed, and where the finished defaults file is rendered.
//!
//! [`DefaultsArgs`] can be embedded into another clap derive with
//! `#[command(flatten)]`. The only bridge to the core is
//! [`DefaultsArgs::into_request()`], which produces a framework-agnostic
//! [`Request`] for [`execute()`].

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde_json::Value;
use thiserror::Error;

use crate::error::DefaultsError;
use crate::resolve::{self, BuildOptions};
use crate::types::{DefaultsDocument, Settings};

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{path} must contain a mapping at the top level")]
    NotAMapping { path: PathBuf },

    #[error("Failed to render defaults file as {format}: {reason}")]
    Render { format: OutputFormat, reason: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Defaults(#[from] DefaultsError),
}

/// How a settings file is parsed, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Toml,
    Yaml,
    /// Markdown with an optional leading YAML frontmatter block.
    Markdown,
}

impl SourceFormat {
    /// Unrecognized extensions are read as YAML, which also covers JSON.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => SourceFormat::Json,
            Some("toml") => SourceFormat::Toml,
            Some("md" | "markdown" | "rmd" | "qmd") => SourceFormat::Markdown,
            _ => SourceFormat::Yaml,
        }
    }
}

/// Output encoding for the generated defaults file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// YAML, the format pandoc expects for `--defaults`.
    #[default]
    Yaml,
    Json,
    Toml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Toml => write!(f, "toml"),
        }
    }
}

/// Clap-derived args for generating a defaults file.
#[derive(Debug, Args)]
pub struct DefaultsArgs {
    /// Document or frontmatter file (.md, .yaml, .json, .toml). `-` reads
    /// YAML from stdin. Omit for empty frontmatter.
    pub frontmatter: Option<PathBuf>,

    /// Additional config layered over the project settings.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub additional_config: Option<PathBuf>,

    /// Project settings (lowest precedence).
    #[arg(short = 'p', long = "project", value_name = "FILE")]
    pub project_settings: Option<PathBuf>,

    /// Force the output file; made absolute against the working directory.
    #[arg(short, long, value_name = "PATH", env = "PANDOC_DEFAULTS_OUTPUT_FILE")]
    pub output_file: Option<String>,

    /// Force the pandoc writer instead of inferring it from the output file.
    #[arg(short, long, env = "PANDOC_DEFAULTS_WRITER")]
    pub writer: Option<String>,

    /// Encoding of the generated defaults file.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// A fully described generation request, independent of clap.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub frontmatter: Option<PathBuf>,
    pub additional_config: Option<PathBuf>,
    pub project_settings: Option<PathBuf>,
    pub output_file: Option<String>,
    pub writer: Option<String>,
    pub format: OutputFormat,
}

impl DefaultsArgs {
    /// Convert clap-parsed args into a framework-agnostic [`Request`].
    pub fn into_request(self) -> Request {
        Request {
            frontmatter: self.frontmatter,
            additional_config: self.additional_config,
            project_settings: self.project_settings,
            output_file: self.output_file,
            writer: self.writer,
            format: self.format,
        }
    }
}

/// Load every source named by `request`, build, and render the result.
pub fn execute(request: &Request) -> Result<String, CliError> {
    let frontmatter = match &request.frontmatter {
        Some(path) => load_settings(path)?,
        None => Settings::new(),
    };
    let options = BuildOptions {
        additional_config: request.additional_config.as_deref().map(load_settings).transpose()?,
        project_settings: request.project_settings.as_deref().map(load_settings).transpose()?,
        output_file: request.output_file.clone(),
        writer: request.writer.clone(),
    };

    let doc = resolve::build(&frontmatter, &options)?;
    tracing::info!(keys = doc.len(), format = %request.format, "defaults file built");
    render(&doc, request.format)
}

/// Read and parse a settings file, or stdin for [`STDIN_PATH`].
pub fn load_settings(path: &Path) -> Result<Settings, CliError> {
    let (content, format) = if path.as_os_str() == STDIN_PATH {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        (buf, SourceFormat::Yaml)
    } else {
        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        (content, SourceFormat::from_path(path))
    };
    tracing::debug!(path = %path.display(), ?format, "loading settings source");
    parse_settings(&content, format, path)
}

/// Parse settings text. `path` is only used in error messages.
pub fn parse_settings(content: &str, format: SourceFormat, path: &Path) -> Result<Settings, CliError> {
    let parse_err = |reason: String| CliError::Parse {
        path: path.to_path_buf(),
        reason,
    };
    let value: Value = match format {
        SourceFormat::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        SourceFormat::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        SourceFormat::Yaml => parse_yaml(content).map_err(parse_err)?,
        SourceFormat::Markdown => match extract_frontmatter(content) {
            Some(block) => parse_yaml(block).map_err(parse_err)?,
            None => Value::Null,
        },
    };
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Settings::new()),
        _ => Err(CliError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

fn parse_yaml(content: &str) -> Result<Value, String> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(content).map_err(|e| e.to_string())
}

/// The YAML block between a leading `---` line and the next `---` or `...`
/// line, if the document starts with one.
pub fn extract_frontmatter(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let marker = line.trim_end();
        if marker == "---" || marker == "..." {
            return Some(&content[start..offset]);
        }
        offset += line.len();
    }
    None
}

/// Render a defaults document in the requested encoding.
pub fn render(doc: &DefaultsDocument, format: OutputFormat) -> Result<String, CliError> {
    let render_err = |reason: String| CliError::Render { format, reason };
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(doc).map_err(|e| render_err(e.to_string())),
        OutputFormat::Json => serde_json::to_string_pretty(doc)
            .map(|s| s + "\n")
            .map_err(|e| render_err(e.to_string())),
        OutputFormat::Toml => toml::to_string(doc).map_err(|e| render_err(e.to_string())),
    }
}
