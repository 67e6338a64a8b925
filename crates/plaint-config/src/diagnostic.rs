// SPDX-FileCopyrightText: 2026 Plaint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment reports what went wrong and the key path it happened at. This
//! module turns that into miette reports that point at the offending line of
//! `plaint.toml`, and offers a correction for misspelt section headers and
//! keys drawn from what the section actually accepts.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a name to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, renderable as a miette report.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A top-level table that plaint does not read, e.g. `[schedular]`.
    #[error("unknown section `[{name}]`")]
    #[diagnostic(
        code(plaint::config::unknown_section),
        help("{}", correction_help(suggestion.as_deref(), "sections", accepted))
    )]
    UnknownSection {
        name: String,
        suggestion: Option<String>,
        accepted: String,
        #[label("no such section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key that its section does not define, e.g. `[queue] backnd`.
    #[error("`{key}` is not a setting of [{section}]")]
    #[diagnostic(
        code(plaint::config::unknown_key),
        help("{}", correction_help(suggestion.as_deref(), "keys", accepted))
    )]
    UnknownKey {
        section: String,
        key: String,
        suggestion: Option<String>,
        accepted: String,
        #[label("not recognized here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type or outside the accepted set,
    /// e.g. `port = "http"` or `backend = "kafka"`.
    #[error("`{key}` has an unusable value: {detail}")]
    #[diagnostic(code(plaint::config::invalid_value), help("expected {expected}"))]
    InvalidValue {
        /// Dotted path, e.g. `gateway.port`.
        key: String,
        detail: String,
        expected: String,
        #[label("this value")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A well-formed config that breaks a cross-field rule.
    #[error("{message}")]
    #[diagnostic(code(plaint::config::validation))]
    Validation { message: String },

    /// The configuration could not be read at all.
    #[error("could not load configuration: {0}")]
    #[diagnostic(code(plaint::config::load))]
    Load(String),
}

fn correction_help(suggestion: Option<&str>, noun: &str, accepted: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? accepted {noun}: {accepted}"),
        None => format!("accepted {noun}: {accepted}"),
    }
}

/// The TOML documents that were layered into a figment, by display path.
#[derive(Debug, Clone, Copy)]
pub struct ConfigSources<'a> {
    files: &'a [(String, String)],
}

impl<'a> ConfigSources<'a> {
    pub fn new(files: &'a [(String, String)]) -> Self {
        Self { files }
    }

    /// The document an error came from.
    ///
    /// Figment only records file origins; an error raised by a string
    /// provider is attributed to the sole document when there is just one.
    fn document_for(&self, error: &figment::Error) -> Option<(&'a str, &'a str)> {
        let origin = error
            .metadata
            .as_ref()
            .and_then(|m| m.source.as_ref())
            .and_then(|s| match s {
                figment::Source::File(path) => Some(path.display().to_string()),
                _ => None,
            });
        let found = match origin {
            Some(path) => self.files.iter().find(|(p, _)| *p == path),
            None if self.files.len() == 1 => self.files.first(),
            None => None,
        };
        found.map(|(p, content)| (p.as_str(), content.as_str()))
    }

    /// Span and source for `needle`, located by `find` within the error's document.
    fn locate(
        &self,
        error: &figment::Error,
        needle: &str,
        find: impl FnOnce(&str) -> Option<usize>,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let Some((path, content)) = self.document_for(error) else {
            return (None, None);
        };
        match find(content) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), needle.len())),
                Some(NamedSource::new(path, content.to_string())),
            ),
            None => (None, None),
        }
    }
}

/// Convert every error carried by a `figment::Error` into a diagnostic.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    let sources = ConfigSources::new(toml_sources);
    err.into_iter()
        .map(|error| from_figment(&error, &sources))
        .collect()
}

fn from_figment(error: &figment::Error, sources: &ConfigSources<'_>) -> ConfigError {
    let path: Vec<String> = error.path.iter().map(ToString::to_string).collect();

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let suggestion = suggest_key(field, expected);
            let accepted = expected.join(", ");
            // The path ends with the rejected key itself.
            let section = match path.split_last() {
                Some((last, rest)) if last == field => rest,
                _ => &path[..],
            };
            if section.is_empty() {
                let (span, src) =
                    sources.locate(error, field, |c| find_section_offset(c, field));
                ConfigError::UnknownSection {
                    name: field.clone(),
                    suggestion,
                    accepted,
                    span,
                    src,
                }
            } else {
                let (span, src) =
                    sources.locate(error, field, |c| find_key_offset(c, section, field));
                ConfigError::UnknownKey {
                    section: section.join("."),
                    key: field.clone(),
                    suggestion,
                    accepted,
                    span,
                    src,
                }
            }
        }
        Kind::InvalidType(actual, expected) | Kind::InvalidValue(actual, expected) => {
            invalid_value(error, sources, &path, format!("found {actual}"), expected.clone())
        }
        Kind::UnknownVariant(variant, expected) => invalid_value(
            error,
            sources,
            &path,
            format!("`{variant}` is not supported"),
            format!("one of {}", expected.join(", ")),
        ),
        _ => ConfigError::Load(error.to_string()),
    }
}

fn invalid_value(
    error: &figment::Error,
    sources: &ConfigSources<'_>,
    path: &[String],
    detail: String,
    expected: String,
) -> ConfigError {
    let (span, src) = match path.split_last() {
        Some((field, section)) => {
            sources.locate(error, field, |c| find_key_offset(c, section, field))
        }
        None => (None, None),
    };
    ConfigError::InvalidValue {
        key: path.join("."),
        detail,
        expected,
        span,
        src,
    }
}

/// Byte offset of the name inside a `[section]` header line.
pub fn find_section_offset(content: &str, section: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('[')
            && rest.trim_start().starts_with(section)
            && rest.trim_start()[section.len()..].trim_start().starts_with(']')
        {
            let lead = line.len() - trimmed.len();
            let pad = rest.len() - rest.trim_start().len();
            return Some(offset + lead + 1 + pad);
        }
        offset += line.len();
    }
    None
}

/// Byte offset of `field = ...` within the table named by `path`.
///
/// An empty `path` searches the top level, before the first header.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = if path.is_empty() {
        0
    } else {
        let header = format!("[{}]", path.join("."));
        content.find(&header).map(|pos| pos + header.len())?
    };

    let mut offset = search_start;
    for line in content[search_start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            break;
        }
        if let Some(after) = trimmed.strip_prefix(field)
            && after.trim_start().starts_with('=')
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }

    None
}

/// Closest accepted name to `unknown` by Jaro-Winkler similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print each error to stderr as a graphical miette report.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Serialized, Toml};

    use crate::model::PlaintConfig;

    fn errors_for(toml: &str) -> Vec<ConfigError> {
        let err = figment::Figment::new()
            .merge(Serialized::defaults(PlaintConfig::default()))
            .merge(Toml::string(toml))
            .extract::<PlaintConfig>()
            .unwrap_err();
        figment_to_config_errors(err, &[("plaint.toml".to_string(), toml.to_string())])
    }

    #[test]
    fn suggests_interval_ms_for_typo() {
        let valid = &["interval_ms", "autostart"];
        assert_eq!(
            suggest_key("interval_sm", valid),
            Some("interval_ms".to_string())
        );
    }

    #[test]
    fn suggests_redis_url_for_typo() {
        let valid = &[
            "backend",
            "redis_url",
            "intake_queue",
            "in_flight_queue",
            "processed_queue",
        ];
        assert_eq!(
            suggest_key("redis_ulr", valid),
            Some("redis_url".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["name", "log_level"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn key_offset_is_scoped_to_its_section() {
        let content = "[queue]\nbackend = \"redis\"\n\n[gateway]\nport = 1\n";
        let queue = vec!["queue".to_string()];
        let o = find_key_offset(content, &queue, "backend").unwrap();
        assert_eq!(&content[o..o + 7], "backend");
        assert!(find_key_offset(content, &queue, "port").is_none());
        assert!(find_key_offset(content, &["storage".to_string()], "backend").is_none());
    }

    #[test]
    fn section_offset_points_at_the_name() {
        let content = "[service]\nname = \"x\"\n  [ schedular ]\n";
        let o = find_section_offset(content, "schedular").unwrap();
        assert_eq!(&content[o..o + 9], "schedular");
        assert!(find_section_offset(content, "gateway").is_none());
    }

    #[test]
    fn misspelt_key_is_located_with_suggestion() {
        let toml = "[scheduler]\nautostart = true\nintervl_ms = 10\n";
        let errors = errors_for(toml);
        let Some(ConfigError::UnknownKey {
            section,
            key,
            suggestion,
            span,
            ..
        }) = errors.first()
        else {
            panic!("expected UnknownKey, got {errors:?}");
        };
        assert_eq!(section, "scheduler");
        assert_eq!(key, "intervl_ms");
        assert_eq!(suggestion.as_deref(), Some("interval_ms"));
        let span = span.expect("span resolved from the only source");
        assert_eq!(&toml[span.offset()..span.offset() + span.len()], "intervl_ms");
    }

    #[test]
    fn misspelt_section_becomes_unknown_section() {
        let errors = errors_for("[schedular]\ninterval_ms = 10\n");
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownSection { name, suggestion, span: Some(_), .. }
                if name == "schedular" && suggestion.as_deref() == Some("scheduler")
        )));
    }

    #[test]
    fn unsupported_backend_names_the_alternatives() {
        let errors = errors_for("[queue]\nbackend = \"kafka\"\n");
        let Some(ConfigError::InvalidValue { key, expected, .. }) = errors.first() else {
            panic!("expected InvalidValue, got {errors:?}");
        };
        assert_eq!(key, "queue.backend");
        assert!(expected.contains("sqlite") && expected.contains("redis"));
    }

    #[test]
    fn help_lists_accepted_keys() {
        assert_eq!(
            correction_help(Some("redis_url"), "keys", "backend, redis_url"),
            "did you mean `redis_url`? accepted keys: backend, redis_url"
        );
        assert_eq!(
            correction_help(None, "sections", "queue"),
            "accepted sections: queue"
        );
    }
}
