//! Core pipeline: validate, classify, merge, override, validate again.
//!
//! Operates on pre-parsed sources with no I/O, making the full pipeline
//! testable with synthetic inputs. Steps:
//!
//! 1. Validate raw frontmatter against the schema
//! 2. Classify each present source independently
//! 3. Merge: project settings < additional config < frontmatter
//! 4. Apply the explicit output-file override (made absolute)
//! 5. Apply the explicit writer, or infer one from the output file
//! 6. Validate the merged document

use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::classify;
use crate::error::{DefaultsError, Stage};
use crate::merge::merge_layers;
use crate::types::{DefaultsDocument, Settings};
use crate::validate::{self, PandocSchema, Validator};
use crate::writer;

/// Everything besides the frontmatter that shapes a defaults file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOptions {
    /// Extra settings layered between project settings and frontmatter.
    pub additional_config: Option<Settings>,
    /// Base settings, lowest precedence.
    pub project_settings: Option<Settings>,
    /// Output path that replaces whatever the sources ask for.
    pub output_file: Option<String>,
    /// Writer that replaces both the sources and extension inference.
    pub writer: Option<String>,
}

/// Build a validated defaults file using the built-in pandoc schema.
pub fn build(frontmatter: &Settings, options: &BuildOptions) -> Result<DefaultsDocument, DefaultsError> {
    build_with(&PandocSchema, frontmatter, options)
}

/// Build a validated defaults file, checking both ends with `validator`.
pub fn build_with(
    validator: &dyn Validator,
    frontmatter: &Settings,
    options: &BuildOptions,
) -> Result<DefaultsDocument, DefaultsError> {
    // 1: Fail fast on malformed frontmatter
    validate::check(validator, &Value::Object(frontmatter.clone()), Stage::Input)?;

    // 2-3: Classify each source, then merge lowest to highest
    let layers = [
        options.project_settings.as_ref(),
        options.additional_config.as_ref(),
        Some(frontmatter),
    ];
    let mut doc = merge_layers(layers.into_iter().flatten().map(classify::process));

    // 4: The caller decides where output goes, not the document
    if let Some(output_file) = options.output_file.as_deref().filter(|p| !p.is_empty()) {
        let resolved = absolute_path(Path::new(output_file))?;
        tracing::debug!(path = %resolved.display(), "output file overridden");
        doc.options.insert(
            "output-file".into(),
            Value::String(resolved.to_string_lossy().into_owned()),
        );
    }

    // 5: Explicit writer, else infer from the output file
    if let Some(writer) = options.writer.as_deref().filter(|w| !w.is_empty()) {
        doc.options.insert("writer".into(), Value::String(writer.to_string()));
    } else if let Some(output_file) = doc.output_file() {
        match writer::writer_for_path(Path::new(output_file)) {
            Some(inferred) => {
                tracing::debug!(writer = inferred, "writer inferred from output file");
                doc.options.insert("writer".into(), Value::String(inferred.to_string()));
            }
            None => {
                tracing::debug!(path = output_file, "no writer for output file extension");
                doc.options.remove("writer");
            }
        }
    }

    // 6: The merged document must still satisfy the schema
    validate::check(validator, &doc.to_value(), Stage::Output)?;
    Ok(doc)
}

/// Make `path` absolute against the working directory and drop `.` and `..`
/// components lexically. Never touches the filesystem beyond reading the
/// working directory.
pub fn absolute_path(path: &Path) -> Result<PathBuf, DefaultsError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(DefaultsError::WorkingDirectory)?
            .join(path)
    };
    Ok(normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to remove the root, so `/..` stays `/`.
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{CountingValidator, settings};
    use serde_json::json;

    fn build_json(frontmatter: Value, options: BuildOptions) -> Result<DefaultsDocument, DefaultsError> {
        build(&settings(frontmatter), &options)
    }

    #[test]
    fn empty_frontmatter_builds_empty_document() {
        let doc = build_json(json!({}), BuildOptions::default()).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn invalid_frontmatter_is_rejected_before_processing() {
        let err = build_json(json!({"writer": "not-a-real-writer"}), BuildOptions::default())
            .unwrap_err();
        match err {
            DefaultsError::Validation { stage, errors } => {
                assert_eq!(stage, Stage::Input);
                assert_eq!(errors[0].path, "/writer");
            }
            other => panic!("Expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn valid_writer_passes() {
        let doc = build_json(json!({"writer": "html"}), BuildOptions::default()).unwrap();
        assert_eq!(doc.writer(), Some("html"));
    }

    #[test]
    fn invalid_reader_is_rejected() {
        assert!(build_json(json!({"reader": "not-a-real-reader"}), BuildOptions::default()).is_err());
        assert!(build_json(json!({"reader": "html"}), BuildOptions::default()).is_ok());
    }

    #[test]
    fn invalid_project_settings_fail_the_final_check() {
        let options = BuildOptions {
            project_settings: Some(settings(json!({"wrap": "sometimes"}))),
            ..BuildOptions::default()
        };
        let err = build_json(json!({}), options).unwrap_err();
        assert!(matches!(err, DefaultsError::Validation { stage: Stage::Output, .. }));
    }

    #[test]
    fn validator_runs_exactly_twice() {
        let validator = CountingValidator::default();
        let options = BuildOptions {
            additional_config: Some(settings(json!({"title": "A"}))),
            project_settings: Some(settings(json!({"toc": true}))),
            ..BuildOptions::default()
        };
        build_with(&validator, &settings(json!({"title": "B"})), &options).unwrap();
        assert_eq!(validator.calls.get(), 2);
    }

    #[test]
    fn input_failure_stops_after_first_check() {
        let validator = CountingValidator {
            reject_key: Some("writer"),
            ..CountingValidator::default()
        };
        let result = build_with(
            &validator,
            &settings(json!({"writer": "html"})),
            &BuildOptions::default(),
        );
        assert!(result.is_err());
        assert_eq!(validator.calls.get(), 1);
    }

    #[test]
    fn writer_inferred_from_output_file() {
        let doc = build_json(json!({"output-file": "/x/file.pdf"}), BuildOptions::default()).unwrap();
        assert_eq!(doc.writer(), Some("pdf"));
    }

    #[test]
    fn inference_replaces_source_writer() {
        let doc = build_json(
            json!({"output-file": "/x/file.docx", "writer": "html"}),
            BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(doc.writer(), Some("docx"));
    }

    #[test]
    fn unknown_extension_clears_source_writer() {
        let doc = build_json(
            json!({"output-file": "/x/file.potato", "writer": "html"}),
            BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(doc.writer(), None);
        assert!(doc.to_value().get("writer").is_none());
    }

    #[test]
    fn unknown_override_extension_clears_merged_writer() {
        let options = BuildOptions {
            project_settings: Some(settings(json!({"writer": "latex"}))),
            output_file: Some("/x/notes.potato".into()),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({}), options).unwrap();
        assert_eq!(doc.writer(), None);
        assert_eq!(doc.output_file(), Some("/x/notes.potato"));
    }

    #[test]
    fn partition_name_leaf_is_rejected_at_exit() {
        let err = build_json(
            json!({"group": {"metadata": "oops"}, "csl": "x.csl"}),
            BuildOptions::default(),
        )
        .unwrap_err();
        match err {
            DefaultsError::Validation { stage, errors } => {
                assert_eq!(stage, Stage::Output);
                assert!(errors.iter().any(|e| e.path == "/metadata"));
            }
            other => panic!("Expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_without_writer_leaves_it_unset() {
        let doc = build_json(json!({"output-file": "/x/file.potato"}), BuildOptions::default()).unwrap();
        assert_eq!(doc.writer(), None);
    }

    #[test]
    fn explicit_writer_overrides_source() {
        let options = BuildOptions {
            writer: Some("html".into()),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({"writer": "pdf"}), options).unwrap();
        assert_eq!(doc.writer(), Some("html"));
    }

    #[test]
    fn explicit_writer_overrides_inference() {
        let options = BuildOptions {
            writer: Some("latex".into()),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({"output-file": "/x/file.pdf"}), options).unwrap();
        assert_eq!(doc.writer(), Some("latex"));
    }

    #[test]
    fn explicit_writer_is_validated() {
        let options = BuildOptions {
            writer: Some("not-a-real-writer".into()),
            ..BuildOptions::default()
        };
        let err = build_json(json!({}), options).unwrap_err();
        assert!(matches!(err, DefaultsError::Validation { stage: Stage::Output, .. }));
    }

    #[test]
    fn explicit_output_file_overrides_source_and_is_absolute() {
        let options = BuildOptions {
            output_file: Some("../output.pdf".into()),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({"output-file": "user specified"}), options).unwrap();

        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.parent().unwrap_or(cwd.as_path()).join("output.pdf");
        assert_eq!(doc.output_file(), Some(expected.to_str().unwrap()));
        assert_eq!(doc.writer(), Some("pdf"));
    }

    #[test]
    fn empty_output_file_override_is_ignored() {
        let options = BuildOptions {
            output_file: Some(String::new()),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({"output-file": "/x/keep.html"}), options).unwrap();
        assert_eq!(doc.output_file(), Some("/x/keep.html"));
    }

    #[test]
    fn toc_stays_at_root() {
        let doc = build_json(json!({"toc": true}), BuildOptions::default()).unwrap();
        assert_eq!(doc.option("toc"), Some(&json!(true)));
        assert!(doc.metadata.get("toc").is_none());
        assert!(doc.variables.get("toc").is_none());
    }

    #[test]
    fn table_of_contents_stays_at_root() {
        let doc = build_json(json!({"table-of-contents": true}), BuildOptions::default()).unwrap();
        assert_eq!(doc.option("table-of-contents"), Some(&json!(true)));
    }

    #[test]
    fn explicit_variables_and_metadata_are_placed() {
        let doc = build_json(
            json!({
                "variables": {"test-variable": "test variable"},
                "metadata": {"test-metadata": "test metadata"}
            }),
            BuildOptions::default(),
        )
        .unwrap();
        assert!(doc.variables.contains_key("test-variable"));
        assert!(doc.metadata.contains_key("test-metadata"));
    }

    #[test]
    fn additional_config_is_accepted() {
        let options = BuildOptions {
            additional_config: Some(settings(json!({"title": "Additional Config Title"}))),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({}), options).unwrap();
        assert_eq!(doc.variables["title"], "Additional Config Title");
    }

    #[test]
    fn frontmatter_beats_additional_config() {
        let options = BuildOptions {
            additional_config: Some(settings(json!({"title": "Other"}))),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({"title": "Standard"}), options).unwrap();
        assert_eq!(doc.variables["title"], "Standard");
    }

    #[test]
    fn additional_config_beats_project_settings() {
        let options = BuildOptions {
            additional_config: Some(settings(json!({"variables": {"title": "A"}}))),
            project_settings: Some(settings(json!({"variables": {"title": "B"}}))),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({}), options).unwrap();
        assert_eq!(doc.variables["title"], "A");
    }

    #[test]
    fn frontmatter_beats_both_layers() {
        let options = BuildOptions {
            additional_config: Some(settings(json!({"dpi": 150}))),
            project_settings: Some(settings(json!({"dpi": 96, "standalone": true}))),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({"dpi": 300}), options).unwrap();
        assert_eq!(doc.option("dpi"), Some(&json!(300)));
        assert_eq!(doc.option("standalone"), Some(&json!(true)));
    }

    #[test]
    fn non_colliding_keys_survive() {
        let options = BuildOptions {
            additional_config: Some(settings(json!({
                "variables": {"title-page-background": "/working/resources/title.pdf"}
            }))),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({"title": "Custom Title"}), options).unwrap();
        assert_eq!(doc.variables["title"], "Custom Title");
        assert_eq!(doc.variables["title-page-background"], "/working/resources/title.pdf");
    }

    #[test]
    fn defaults_keys_pass_through() {
        let options = BuildOptions {
            additional_config: Some(settings(json!({"standalone": true, "self-contained": false}))),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({}), options).unwrap();
        assert_eq!(doc.option("standalone"), Some(&json!(true)));
        assert_eq!(doc.option("self-contained"), Some(&json!(false)));
    }

    #[test]
    fn nested_groups_are_flattened() {
        let options = BuildOptions {
            additional_config: Some(settings(json!({
                "level1": {"level2": {"standalone": true, "self-contained": false}}
            }))),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({}), options).unwrap();
        assert_eq!(doc.option("standalone"), Some(&json!(true)));
        assert_eq!(doc.option("self-contained"), Some(&json!(false)));
    }

    #[test]
    fn project_settings_alone() {
        let options = BuildOptions {
            project_settings: Some(settings(json!({"standalone": true, "self-contained": false}))),
            ..BuildOptions::default()
        };
        let doc = build_json(json!({}), options).unwrap();
        assert_eq!(doc.option("standalone"), Some(&json!(true)));
    }

    #[test]
    fn special_keys_end_up_in_metadata() {
        let doc = build_json(
            json!({"bibliography": "refs.bib", "reference-section-title": "References"}),
            BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(doc.metadata["bibliography"], "refs.bib");
        assert_eq!(doc.metadata["reference-section-title"], "References");
        assert!(doc.option("bibliography").is_none());
    }

    #[test]
    fn sources_are_not_mutated() {
        let frontmatter = settings(json!({"group": {"toc": true}, "title": "T"}));
        let options = BuildOptions {
            additional_config: Some(settings(json!({"csl": "x.csl"}))),
            ..BuildOptions::default()
        };
        let before = (frontmatter.clone(), options.clone());
        build(&frontmatter, &options).unwrap();
        assert_eq!((frontmatter, options), before);
    }

    #[test]
    fn normalize_resolves_parent_and_current_components() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d.pdf")), PathBuf::from("/a/c/d.pdf"));
        assert_eq!(normalize(Path::new("/../x.pdf")), PathBuf::from("/x.pdf"));
    }

    #[test]
    fn absolute_path_keeps_absolute_input() {
        assert_eq!(
            absolute_path(Path::new("/tmp/out/../book.epub")).unwrap(),
            PathBuf::from("/tmp/book.epub")
        );
    }
}
