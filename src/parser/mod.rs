//! Parser for SVG transform attributes

pub mod lexer;
mod transform;

use thiserror::Error;

use crate::error::Span;

pub use transform::{parse_translate, Translate};

/// A transform attribute that is not a plain two-number translate.
/// The span is relative to the attribute value.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TransformError {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
}

impl TransformError {
    pub fn new(span: Span, message: impl Into<String>, expected: Vec<String>) -> Self {
        Self {
            span,
            message: message.into(),
            expected,
        }
    }
}
