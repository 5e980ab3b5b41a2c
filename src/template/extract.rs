//! Template loading and layer extraction

use std::fmt;

use crate::document::{self, Element};
use crate::error::TemplateError;
use crate::parser::{parse_translate, Translate};

/// Namespace URI Inkscape uses for its `label` attribute
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

/// Qualified names used to find layers and substitutable text in a template.
///
/// Element names follow the root element's own prefix, so a template written
/// as `<svg:svg>` uses `svg:g`, `svg:text` and `svg:tspan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub group: String,
    pub text: String,
    pub span: String,
    pub label: String,
}

impl Vocabulary {
    /// Derive the vocabulary from a template's root element
    pub fn for_root(root: &Element) -> Self {
        let prefix = root.name.split_once(':').map(|(prefix, _)| prefix);
        let qualify = |local: &str| match prefix {
            Some(p) => format!("{}:{}", p, local),
            None => local.to_string(),
        };

        let label_prefix = root
            .attributes
            .iter()
            .find_map(|(key, value)| key.strip_prefix("xmlns:").filter(|_| value == INKSCAPE_NS))
            .unwrap_or("inkscape");

        Self {
            group: qualify("g"),
            text: qualify("text"),
            span: qualify("tspan"),
            label: format!("{}:label", label_prefix),
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::for_root(&Element::new("svg"))
    }
}

/// A physical length such as `100mm`
#[derive(Debug, Clone, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: String,
}

impl Length {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Parse a positive, finite length with an optional unit suffix
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let number = text.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
        let value: f64 = number.trim_end().parse().ok()?;
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        Some(Self::new(value, &text[number.len()..]))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// One reusable layer of the template, with its parsed position
#[derive(Debug, Clone)]
pub struct Stencil {
    element: Element,
    origin: Translate,
    name: String,
}

impl Stencil {
    /// Normalise a layer into a stencil.
    ///
    /// A layer without a transform gets `translate(0,0)`; any other
    /// transform must be a plain two-number translate.
    pub fn new(mut element: Element, index: usize, vocabulary: &Vocabulary) -> Result<Self, TemplateError> {
        let name = element
            .attr("id")
            .or_else(|| element.attr(&vocabulary.label))
            .map(|n| format!("'{}'", n))
            .unwrap_or_else(|| format!("#{}", index + 1));

        let origin = match element.attr("transform") {
            Some(transform) => {
                parse_translate(transform).map_err(|source| TemplateError::InvalidTransform {
                    layer: name.clone(),
                    transform: transform.to_string(),
                    span: element.span.clone(),
                    source,
                })?
            }
            None => {
                let origin = Translate::default();
                element.set_attr("transform", origin.to_attribute());
                origin
            }
        };

        Ok(Self {
            element,
            origin,
            name,
        })
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Translation the layer carries in the template
    pub fn origin(&self) -> Translate {
        self.origin
    }

    /// Human-readable name for diagnostics: id, label, or position
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A parsed design template with its layers lifted out as stencils
#[derive(Debug, Clone)]
pub struct Template {
    root: Element,
    width: Length,
    height: Length,
    stencils: Vec<Stencil>,
    vocabulary: Vocabulary,
}

impl Template {
    /// Parse template markup and extract its layers
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Self::from_root(document::parse(source)?)
    }

    /// Extract layers from an already-parsed root element
    pub fn from_root(mut root: Element) -> Result<Self, TemplateError> {
        let width = dimension(&root, "width")?;
        let height = dimension(&root, "height")?;
        let vocabulary = Vocabulary::for_root(&root);
        let stencils = extract_layers(&mut root, &vocabulary)?;

        Ok(Self {
            root,
            width,
            height,
            stencils,
            vocabulary,
        })
    }

    /// Width of one copy, in the template's unit
    pub fn width(&self) -> f64 {
        self.width.value
    }

    /// Height of one copy, in the template's unit
    pub fn height(&self) -> f64 {
        self.height.value
    }

    /// Unit suffix of the template's dimensions (`mm`, `in`, or empty)
    pub fn unit(&self) -> &str {
        &self.width.unit
    }

    pub fn stencils(&self) -> &[Stencil] {
        &self.stencils
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Root element with every layer removed
    pub fn root(&self) -> &Element {
        &self.root
    }
}

/// Lift the root's top-level groups out as stencils, in declaration order
pub fn extract_layers(root: &mut Element, vocabulary: &Vocabulary) -> Result<Vec<Stencil>, TemplateError> {
    root.remove_children_named(&vocabulary.group)
        .into_iter()
        .enumerate()
        .map(|(index, layer)| Stencil::new(layer, index, vocabulary))
        .collect()
}

fn dimension(root: &Element, attribute: &'static str) -> Result<Length, TemplateError> {
    let value = root.attr(attribute).ok_or(TemplateError::MissingDimension {
        attribute,
        span: root.span.clone(),
    })?;
    Length::parse(value).ok_or_else(|| TemplateError::InvalidDimension {
        attribute,
        value: value.to_string(),
        span: root.span.clone(),
    })
}
