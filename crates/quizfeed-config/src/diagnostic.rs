// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config error reporting.
//!
//! Turns figment extraction failures into miette diagnostics pointing at the
//! offending key in `quizfeed.toml`, with a "did you mean" hint for typos.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a candidate must beat to be offered as a correction.
const SIMILARITY_FLOOR: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {}", table_label(.section.as_deref()))]
    #[diagnostic(
        code(quizfeed::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        section: Option<String>,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a quizfeed setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(quizfeed::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(quizfeed::config::missing_key),
        help("add `{key} = <value>` to your quizfeed.toml")
    )]
    MissingKey { key: String },

    /// A value parsed but is out of range or inconsistent.
    #[error("validation error: {message}")]
    #[diagnostic(code(quizfeed::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(quizfeed::config::other))]
    Other(String),
}

fn table_label(section: Option<&str>) -> String {
    match section {
        Some(s) => format!("[{s}]"),
        None => "the top level".to_string(),
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Converts one figment failure (which may bundle several) into diagnostics.
///
/// `sources` pairs a display path with file contents and is used to attach
/// source spans.
pub fn from_figment(err: figment::Error, sources: &[(String, String)]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let section = error.path.first().cloned();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let location = locate(&error, section.as_deref(), field, sources);
                    let (span, src) = location.unzip();
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: closest_key(field, expected).map(str::to_string),
                        valid_keys: expected.join(", "),
                        section,
                        span,
                        src,
                    }
                }
                Kind::InvalidType(actual, expected) => {
                    let key = error.path.join(".");
                    // The last path segment is the key itself; its table is the one before it.
                    let (table, field) = match error.path.as_slice() {
                        [.., table, field] => (Some(table.as_str()), field.as_str()),
                        [field] => (None, field.as_str()),
                        [] => (None, ""),
                    };
                    let location = if field.is_empty() {
                        None
                    } else {
                        locate(&error, table, field, sources)
                    };
                    let (span, src) = location.unzip();
                    ConfigError::InvalidType {
                        key,
                        found: actual.to_string(),
                        expected: expected.to_string(),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Finds the span of `key` within `[table]` in whichever source produced the error.
fn locate(
    error: &figment::Error,
    table: Option<&str>,
    key: &str,
    sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| s.file_path())
        .map(|p| p.display().to_string());

    // Inline strings carry no file path; fall back to the only source given.
    let (path, content) = match (origin, sources) {
        (Some(origin), _) => sources.iter().find(|(p, _)| *p == origin)?,
        (None, [only]) => only,
        (None, _) => return None,
    };

    let offset = key_offset(content, table, key)?;
    Some((
        SourceSpan::new(offset.into(), key.len()),
        NamedSource::new(path, content.clone()),
    ))
}

/// Byte offset of `key` inside the `[table]` section (or before any section).
///
/// Only the named section is searched; the scan stops at the next header.
pub fn key_offset(content: &str, table: Option<&str>, key: &str) -> Option<usize> {
    let mut in_table = table.is_none();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            let header = trimmed.trim_end().trim_start_matches('[').trim_end_matches(']');
            in_table = table == Some(header.trim());
        } else if in_table
            && let Some(rest) = trimmed.strip_prefix(key)
            && rest.trim_start().starts_with('=')
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// The candidate most similar to `unknown`, if any is close enough.
pub fn closest_key<'a>(unknown: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, strsim::jaro_winkler(unknown, candidate)))
        .filter(|&(_, score)| score > SIMILARITY_FLOOR)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate)
}

/// Prints every error to stderr as a miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    eprintln!(
        "quizfeed: {} configuration problem(s) found",
        errors.len()
    );
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
