//! Locates GraphQL documents inside a source tree.
//!
//! Three kinds of sources are supported:
//! * JavaScript/TypeScript files with `graphql`/`gql` tagged template
//!   literals,
//! * standalone `.graphql` files,
//! * Relay-generated `*.graphql.ts` artifacts, whose operation text is
//!   stored as a JSON string under a `"text"` key.

use crate::file_reader;
use regex::Regex;
use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;
use walkdir::WalkDir;

type Result<T> = std::result::Result<T, SourceFinderError>;

pub const JS_FILE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];
pub const RELAY_ARTIFACT_SUFFIX: &str = ".graphql.ts";
pub const STANDALONE_FILE_EXTENSION: &str = "graphql";

static RELAY_TEXT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""text": ("(?:\\"|[^"])+")"#)
        .expect("relay text pattern is valid")
});

static TAGGED_TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:graphql|gql)`([^`]+)`")
        .expect("tagged template pattern is valid")
});

/// A GraphQL document and the file it was found in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractedDocument {
    pub path: PathBuf,
    pub text: String,
}

/// Recursively collects every file at or under `source_dir` whose final
/// extension is one of `extensions` (given without the leading `.`).
///
/// Paths are returned in sorted order so that ingestion, and therefore
/// "last write wins" resolution of duplicate names, is deterministic.
pub fn find_files(
    source_dir: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>> {
    let mut file_paths = vec![];
    for entry in WalkDir::new(source_dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| SourceFinderError::Walk {
            source_dir: source_dir.to_path_buf(),
            err: err.to_string(),
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() {
            log::trace!("Skipping non-file: {path:#?}.");
            continue;
        }

        let matches_ext = path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| extensions.iter().any(|wanted| *wanted == ext));
        if matches_ext {
            log::trace!("Found file at {path:#?}.");
            file_paths.push(path.to_path_buf());
        }
    }
    Ok(file_paths)
}

/// Extracts every `graphql`/`gql` tagged template literal from the
/// JavaScript and TypeScript files under `source_dir`.
pub fn extract_from_js(source_dir: &Path) -> Result<Vec<ExtractedDocument>> {
    let mut documents = vec![];
    for path in find_files(source_dir, JS_FILE_EXTENSIONS)? {
        let contents = file_reader::read_content(&path)?;
        documents.extend(
            extract_tagged_templates(&contents)
                .into_iter()
                .map(|text| ExtractedDocument {
                    path: path.clone(),
                    text: quote_null_literals(&text),
                }),
        );
    }
    log::debug!(
        "Extracted {} tagged-template documents under {source_dir:?}.",
        documents.len(),
    );
    Ok(documents)
}

/// Extracts the operation text embedded in each Relay artifact under
/// `source_dir`.
pub fn extract_from_relay_files(
    source_dir: &Path,
) -> Result<Vec<ExtractedDocument>> {
    let mut documents = vec![];
    for path in find_files(source_dir, &["ts"])? {
        let is_relay_artifact = path.file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| name.ends_with(RELAY_ARTIFACT_SUFFIX));
        if !is_relay_artifact {
            continue;
        }

        let contents = file_reader::read_content(&path)?;
        let texts = extract_relay_texts(&contents)
            .map_err(|err| SourceFinderError::RelayText {
                file_path: path.clone(),
                err: err.to_string(),
            })?;
        documents.extend(texts.into_iter().map(|text| ExtractedDocument {
            path: path.clone(),
            text: quote_null_literals(&text),
        }));
    }
    log::debug!(
        "Extracted {} Relay documents under {source_dir:?}.",
        documents.len(),
    );
    Ok(documents)
}

/// Reads every file with `extension` under `source_dir` verbatim.
pub fn extract_from_standalone_files(
    source_dir: &Path,
    extension: &str,
) -> Result<Vec<ExtractedDocument>> {
    let extension = extension.trim_start_matches('.');
    find_files(source_dir, &[extension])?
        .into_iter()
        .map(|path| {
            let text = file_reader::read_content(&path)?;
            Ok(ExtractedDocument { path, text })
        })
        .collect()
}

/// Decodes the JSON string literal behind each `"text": "..."` entry.
pub fn extract_relay_texts(
    contents: &str,
) -> std::result::Result<Vec<String>, serde_json::Error> {
    RELAY_TEXT_REGEX.captures_iter(contents)
        .map(|captures| serde_json::from_str::<String>(&captures[1]))
        .collect()
}

pub fn extract_tagged_templates(contents: &str) -> Vec<String> {
    TAGGED_TEMPLATE_REGEX.captures_iter(contents)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Rewrites every `null` in `text` as the string `"null"`.
///
/// This is a plain textual substitution: it does not know about GraphQL
/// tokens, so `null` inside names or existing strings is rewritten too.
pub fn quote_null_literals(text: &str) -> String {
    text.replace("null", "\"null\"")
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SourceFinderError {
    #[error("Failure while reading a source file: {0}")]
    Read(Box<file_reader::ReadContentError>),

    #[error("Unable to decode Relay operation text in {file_path:?}: {err}")]
    RelayText {
        file_path: PathBuf,
        err: String,
    },

    #[error("Error while scanning files under {source_dir:?}: {err}")]
    Walk {
        source_dir: PathBuf,
        err: String,
    },
}
impl std::convert::From<file_reader::ReadContentError> for SourceFinderError {
    fn from(err: file_reader::ReadContentError) -> SourceFinderError {
        SourceFinderError::Read(Box::new(err))
    }
}
