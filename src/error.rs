//! Error types for reading and validating templates

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::TransformError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Structural problems with a template document. All of them are fatal:
/// there is nothing sensible to lay out.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("template has no root element")]
    MissingRoot,

    #[error("element <{name}> is never closed")]
    Unclosed { name: String, span: Option<Span> },

    #[error("root element lacks a '{attribute}' attribute")]
    MissingDimension {
        attribute: &'static str,
        span: Option<Span>,
    },

    #[error("invalid {attribute} '{value}': expected a positive length such as '100mm'")]
    InvalidDimension {
        attribute: &'static str,
        value: String,
        span: Option<Span>,
    },

    #[error("layer {layer} has an invalid transform '{transform}': {source}")]
    InvalidTransform {
        layer: String,
        transform: String,
        span: Option<Span>,
        source: TransformError,
    },
}

impl TemplateError {
    /// Source span of the offending element, when known
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::Unclosed { span, .. }
            | Self::MissingDimension { span, .. }
            | Self::InvalidDimension { span, .. }
            | Self::InvalidTransform { span, .. } => span.as_ref(),
            Self::Xml(_) | Self::MissingRoot => None,
        }
    }

    /// Format the error with template source context using ariadne
    ///
    /// Errors without a span fall back to their plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("{}: {}", filename, self);
        };

        let note = match self {
            Self::InvalidTransform { source: e, .. } if !e.expected.is_empty() => {
                Some(format!("expected {}", e.expected.join(", ")))
            }
            _ => None,
        };

        let mut report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(self.label_message())
                    .with_color(Color::Red),
            );
        if let Some(note) = note {
            report = report.with_note(note);
        }

        let mut buf = Vec::new();
        if report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .is_err()
        {
            return format!("{}: {}", filename, self);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn label_message(&self) -> String {
        match self {
            Self::Unclosed { name, .. } => format!("<{}> opened here", name),
            Self::MissingDimension { attribute, .. } => format!("add a {} attribute here", attribute),
            Self::InvalidDimension { value, .. } => format!("'{}' is not a positive length", value),
            Self::InvalidTransform { source, .. } => source.message.clone(),
            Self::Xml(_) | Self::MissingRoot => self.to_string(),
        }
    }
}
