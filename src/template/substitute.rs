//! Text substitution from data records
//!
//! A text element takes part when its label has the form `txt_<N>`, where
//! `N` is a 1-based field index into the record. The value replaces the
//! content of the element's nested `tspan`. Any other label, including
//! `txt_0` or `txt_x`, leaves the element untouched.

use serde::Deserialize;
use thiserror::Error;

use crate::data::DataRecord;
use crate::document::Element;

use super::Vocabulary;

/// A label refers to a field the record does not have
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("label '{label}' refers to field {index} but the record has {available} field(s)")]
pub struct SubstitutionError {
    pub label: String,
    pub index: usize,
    pub available: usize,
}

/// What to do when a label points past the end of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Leave the text as it is and carry on with the run
    #[default]
    Skip,
    /// Abort the run
    Fail,
}

/// Outcome of substituting one layer instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    /// Text elements whose content was replaced
    pub replaced: usize,
    /// Out-of-range references left untouched under `MissingFieldPolicy::Skip`
    pub skipped: Vec<SubstitutionError>,
}

/// 1-based field index named by a `txt_<N>` label, if well-formed
pub fn parse_label(label: &str) -> Option<usize> {
    let mut parts = label.split('_');
    if parts.next()? != "txt" {
        return None;
    }
    let index: usize = parts.next()?.parse().ok()?;
    (index > 0).then_some(index)
}

/// Rewrite the labelled text elements directly under `layer` from `record`
pub fn substitute(
    layer: &mut Element,
    record: &DataRecord,
    vocabulary: &Vocabulary,
    policy: MissingFieldPolicy,
) -> Result<SubstitutionReport, SubstitutionError> {
    let mut report = SubstitutionReport::default();

    for text in layer.children_named_mut(&vocabulary.text) {
        let Some(label) = text.attr(&vocabulary.label).map(str::to_owned) else {
            continue;
        };
        let Some(index) = parse_label(&label) else {
            continue;
        };

        let Some(value) = record.field(index) else {
            let err = SubstitutionError {
                label,
                index,
                available: record.len(),
            };
            match policy {
                MissingFieldPolicy::Fail => return Err(err),
                MissingFieldPolicy::Skip => {
                    report.skipped.push(err);
                    continue;
                }
            }
        };

        match text.child_mut(&vocabulary.span) {
            Some(span) => {
                span.set_text(value);
                report.replaced += 1;
            }
            None => {
                tracing::warn!(label = %label, "text element has no <{}> to hold its value", vocabulary.span);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled_text(label: &str, content: &str) -> Element {
        Element::new("text")
            .with_attr("inkscape:label", label)
            .with_child(Element::new("tspan").with_text(content))
    }

    fn span_text(layer: &Element, n: usize) -> String {
        layer
            .children_named("text")
            .nth(n)
            .and_then(|t| t.child("tspan"))
            .map(Element::text)
            .unwrap_or_default()
    }

    fn record() -> DataRecord {
        ["Alice", "30"].into_iter().collect()
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("txt_1"), Some(1));
        assert_eq!(parse_label("txt_12_surname"), Some(12));
        assert_eq!(parse_label("txt_0"), None);
        assert_eq!(parse_label("txt_x"), None);
        assert_eq!(parse_label("txt"), None);
        assert_eq!(parse_label("note"), None);
        assert_eq!(parse_label("text_1"), None);
    }

    #[test]
    fn test_substitute_by_index() {
        let mut layer = Element::new("g")
            .with_child(labelled_text("txt_1", "Name"))
            .with_child(labelled_text("txt_2", "Age"));

        let report = substitute(&mut layer, &record(), &Vocabulary::default(), MissingFieldPolicy::Fail).unwrap();
        assert_eq!(report.replaced, 2);
        assert_eq!(span_text(&layer, 0), "Alice");
        assert_eq!(span_text(&layer, 1), "30");
    }

    #[test]
    fn test_malformed_and_missing_labels_untouched() {
        let mut layer = Element::new("g")
            .with_child(labelled_text("note", "keep"))
            .with_child(labelled_text("txt_x", "keep too"))
            .with_child(Element::new("text").with_child(Element::new("tspan").with_text("unlabelled")));

        let report = substitute(&mut layer, &record(), &Vocabulary::default(), MissingFieldPolicy::Fail).unwrap();
        assert_eq!(report, SubstitutionReport::default());
        assert_eq!(span_text(&layer, 0), "keep");
        assert_eq!(span_text(&layer, 1), "keep too");
        assert_eq!(span_text(&layer, 2), "unlabelled");
    }

    #[test]
    fn test_nested_text_not_visited() {
        let mut layer = Element::new("g").with_child(Element::new("g").with_child(labelled_text("txt_1", "deep")));

        let report = substitute(&mut layer, &record(), &Vocabulary::default(), MissingFieldPolicy::Fail).unwrap();
        assert_eq!(report.replaced, 0);
        let inner = layer.child("g").unwrap();
        assert_eq!(span_text(inner, 0), "deep");
    }

    #[test]
    fn test_out_of_range_fail() {
        let mut layer = Element::new("g").with_child(labelled_text("txt_3", "x"));
        let err = substitute(&mut layer, &record(), &Vocabulary::default(), MissingFieldPolicy::Fail).unwrap_err();
        assert_eq!(
            err,
            SubstitutionError {
                label: "txt_3".to_string(),
                index: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_out_of_range_skip_continues() {
        let mut layer = Element::new("g")
            .with_child(labelled_text("txt_3", "x"))
            .with_child(labelled_text("txt_1", "Name"));

        let report = substitute(&mut layer, &record(), &Vocabulary::default(), MissingFieldPolicy::Skip).unwrap();
        assert_eq!(report.replaced, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(span_text(&layer, 0), "x");
        assert_eq!(span_text(&layer, 1), "Alice");
    }

    #[test]
    fn test_missing_tspan_is_left_alone() {
        let mut layer = Element::new("g").with_child(
            Element::new("text")
                .with_attr("inkscape:label", "txt_1")
                .with_text("bare"),
        );
        let report = substitute(&mut layer, &record(), &Vocabulary::default(), MissingFieldPolicy::Fail).unwrap();
        assert_eq!(report.replaced, 0);
        assert_eq!(layer.child("text").unwrap().text(), "bare");
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: MissingFieldPolicy,
        }
        let w: Wrapper = toml::from_str(r#"policy = "fail""#).unwrap();
        assert_eq!(w.policy, MissingFieldPolicy::Fail);
    }
}
