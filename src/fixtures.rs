#[cfg(test)]
pub mod test {
    use std::cell::Cell;

    use serde_json::Value;

    use crate::error::FieldError;
    use crate::types::Settings;
    use crate::validate::Validator;

    /// Unwrap a `json!` object literal into a settings source.
    pub fn settings(value: Value) -> Settings {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be a JSON object, got: {other}"),
        }
    }

    /// A full, valid defaults file in the shape pandoc's manual documents.
    pub fn full_defaults() -> Settings {
        settings(serde_json::json!({
            "reader": "markdown+smart",
            "writer": "html5",
            "input-files": ["chap1.md", "chap2.md"],
            "output-file": "book.html",
            "data-dir": "/home/user/.pandoc",
            "template": "letter",
            "standalone": true,
            "self-contained": false,
            "variables": {"documentclass": "book", "classoption": ["twosides", "draft"]},
            "metadata": {"author": ["Sam Smith", "Julie Liu"]},
            "metadata-files": ["boilerplate.yaml"],
            "filters": ["pandoc-citeproc", "wordcount.lua"],
            "file-scope": false,
            "tab-stop": 8,
            "preserve-tabs": true,
            "default-image-extension": ".jpg",
            "abbreviations": "abbrevs.txt",
            "number-sections": true,
            "shift-heading-level-by": -1,
            "section-divs": true,
            "identifier-prefix": "foo",
            "title-prefix": "",
            "strip-comments": true,
            "include-before-body": [],
            "include-after-body": [],
            "include-in-header": [],
            "resource-path": ["."],
            "citeproc": true,
            "csl": "ieee",
            "bibliography": "logic.bib",
            "cite-method": "citeproc",
            "top-level-division": "chapter",
            "epub-chapter-level": 1,
            "toc": true,
            "toc-depth": 2,
            "reference-doc": "myref.docx",
            "eol": "lf",
            "dpi": 72,
            "wrap": "auto",
            "columns": 72,
            "email-obfuscation": "none",
            "track-changes": "accept",
            "reference-links": true,
            "reference-location": "block",
            "atx-headers": false,
            "listings": false,
            "incremental": false,
            "slide-level": 2,
            "html-q-tags": false,
            "pdf-engine": "xelatex",
            "pdf-engine-opts": ["-shell-escape"],
            "ascii": true,
            "verbosity": "INFO",
            "fail-if-warnings": false
        }))
    }

    /// Records every document it is asked to check; optionally rejects
    /// documents containing a given root key.
    #[derive(Default)]
    pub struct CountingValidator {
        pub calls: Cell<usize>,
        pub reject_key: Option<&'static str>,
    }

    impl Validator for CountingValidator {
        fn validate(&self, document: &Value) -> Vec<FieldError> {
            self.calls.set(self.calls.get() + 1);
            match self.reject_key {
                Some(key) if document.get(key).is_some() => {
                    vec![FieldError::new(format!("/{key}"), "rejected by test validator")]
                }
                _ => Vec::new(),
            }
        }
    }
}
