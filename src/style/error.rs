//! Errors raised while resolving and loading style profiles

use std::path::PathBuf;

use thiserror::Error;

use super::ast::Span;
use crate::error::ParseError;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("invalid style profile '{name}', expected one of: notebook, slides, paper")]
    InvalidProfile { name: String },

    #[error("style resource for profile '{profile}' not found at {}", path.display())]
    MissingResource { profile: String, path: PathBuf },

    #[error("failed to read style file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} syntax error(s) in {}", errors.len(), path.display())]
    Syntax {
        path: PathBuf,
        source_text: String,
        errors: Vec<ParseError>,
    },

    #[error("invalid value for '{key}' in {}: {message}", path.display())]
    InvalidValue {
        path: PathBuf,
        source_text: String,
        key: String,
        span: Span,
        message: String,
    },
}

impl StyleError {
    /// Render the error with source context when it points into a style file
    pub fn report(&self) -> String {
        match self {
            StyleError::Syntax {
                path,
                source_text,
                errors,
            } => {
                let filename = path.display().to_string();
                errors
                    .iter()
                    .map(|e| e.format(source_text, &filename))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            StyleError::InvalidValue {
                path,
                source_text,
                key,
                span,
                message,
            } => ParseError::Syntax {
                span: span.clone(),
                message: format!("invalid value for '{}': {}", key, message),
                expected: vec![],
            }
            .format(source_text, &path.display().to_string()),
            other => other.to_string(),
        }
    }
}
