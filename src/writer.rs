//! Infer a pandoc writer from an output file's extension.
//!
//! Mirrors pandoc's own format heuristics: a single-digit extension is a man
//! page section, everything else is an exact, case-insensitive table lookup.

use std::path::Path;

const WRITERS_BY_EXTENSION: &[(&str, &str)] = &[
    ("adoc", "asciidoc"),
    ("asciidoc", "asciidoc"),
    ("context", "context"),
    ("ctx", "context"),
    ("db", "docbook"),
    ("doc", "doc"),
    ("docx", "docx"),
    ("dokuwiki", "dokuwiki"),
    ("epub", "epub"),
    ("fb2", "fb2"),
    ("htm", "html"),
    ("html", "html"),
    ("icml", "icml"),
    ("json", "json"),
    ("latex", "latex"),
    ("lhs", "markdown+lhs"),
    ("ltx", "latex"),
    ("markdown", "markdown"),
    ("md", "markdown"),
    ("ms", "ms"),
    ("muse", "muse"),
    ("native", "native"),
    ("odt", "odt"),
    ("opml", "opml"),
    ("org", "org"),
    ("pdf", "pdf"),
    ("pptx", "pptx"),
    ("roff", "ms"),
    ("rst", "rst"),
    ("rtf", "rtf"),
    ("s5", "s5"),
    ("t2t", "t2t"),
    ("tei", "tei"),
    ("tei.xml", "tei"),
    ("tex", "latex"),
    ("texi", "texinfo"),
    ("texinfo", "texinfo"),
    ("text", "markdown"),
    ("textile", "textile"),
    ("txt", "markdown"),
    ("wiki", "mediawiki"),
    ("xhtml", "html"),
    ("ipynb", "ipynb"),
    ("csv", "csv"),
    ("bib", "biblatex"),
];

/// Look up the writer for a file extension, with or without its leading dot.
///
/// Returns `None` for unrecognized extensions.
pub fn writer_for_extension(extension: &str) -> Option<&'static str> {
    let ext = extension.strip_prefix('.').unwrap_or(extension);
    if is_man_section(ext) {
        return Some("man");
    }
    WRITERS_BY_EXTENSION
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, writer)| *writer)
}

/// Look up the writer for an output path.
///
/// Checks the compound `.tei.xml` suffix before falling back to the last
/// extension, which on its own would only ever be `xml`.
pub fn writer_for_path(path: &Path) -> Option<&'static str> {
    let name = path.file_name()?.to_str()?;
    if name.len() > ".tei.xml".len() && name.to_ascii_lowercase().ends_with(".tei.xml") {
        return writer_for_extension("tei.xml");
    }
    writer_for_extension(path.extension()?.to_str()?)
}

fn is_man_section(ext: &str) -> bool {
    matches!(ext.as_bytes(), [b'1'..=b'9'])
}
