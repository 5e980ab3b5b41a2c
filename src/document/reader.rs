//! Template document parsing built on quick-xml events

use std::collections::HashMap;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::TemplateError;

use super::{Element, Node};

/// Parse markup into an element tree rooted at the document element.
///
/// Whitespace-only text is kept so re-serialised pages keep the template's
/// formatting. Anything outside the root element is dropped. Internal
/// `<!ENTITY>` declarations in the doctype are expanded in text and
/// attribute values.
pub fn parse(source: &str) -> Result<Element, TemplateError> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut entities = Entities::default();

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let end = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) => {
                let mut element = element_from_start(e, &entities)?;
                element.span = Some(start..end);
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let mut element = element_from_start(e, &entities)?;
                element.span = Some(start..end);
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml has already checked the end name matches
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = e
                        .unescape_with(|name| entities.resolve(name))
                        .map_err(quick_xml::Error::from)?;
                    parent.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.push(Node::CData(text));
                }
            }
            Event::Comment(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push(Node::Comment(String::from_utf8_lossy(e).into_owned()));
                }
            }
            Event::Eof => break,
            Event::DocType(ref e) => {
                entities = Entities::from_doctype(&String::from_utf8_lossy(e));
            }
            Event::Decl(_) | Event::PI(_) => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(TemplateError::Unclosed {
            name: open.name,
            span: open.span,
        });
    }

    root.ok_or(TemplateError::MissingRoot)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn element_from_start(start: &BytesStart, entities: &Entities) -> Result<Element, TemplateError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value_with(|name| entities.resolve(name))
            .map_err(quick_xml::Error::from)?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// General entities declared in a doctype's internal subset
#[derive(Debug, Default)]
struct Entities(HashMap<String, String>);

impl Entities {
    /// Collect `<!ENTITY name "value">` declarations. Parameter entities and
    /// external (`SYSTEM`/`PUBLIC`) entities are ignored.
    fn from_doctype(doctype: &str) -> Self {
        let mut entities = HashMap::new();
        let mut rest = doctype;

        while let Some(at) = rest.find("<!ENTITY") {
            rest = rest[at + "<!ENTITY".len()..].trim_start();
            if rest.starts_with('%') {
                continue;
            }

            let name_end = rest
                .find(|c: char| c.is_whitespace())
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            rest = rest[name_end..].trim_start();

            let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
                continue;
            };
            let Some(len) = rest[1..].find(quote) else {
                break;
            };
            entities
                .entry(name.to_string())
                .or_insert_with(|| rest[1..1 + len].to_string());
            rest = &rest[1 + len + 1..];
        }

        Self(entities)
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        resolve_predefined_entity(name).or_else(|| self.0.get(name).map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_structure() {
        let root = parse(
            r#"<?xml version="1.0"?>
<svg width="10mm"><g id="a"><text>Hi</text></g><rect/></svg>"#,
        )
        .unwrap();

        assert_eq!(root.name, "svg");
        assert_eq!(root.attr("width"), Some("10mm"));
        let g = root.child("g").unwrap();
        assert_eq!(g.attr("id"), Some("a"));
        assert_eq!(g.child("text").unwrap().text(), "Hi");
        assert!(root.child("rect").is_some());
    }

    #[test]
    fn test_prefixes_are_kept_verbatim() {
        let root = parse(
            r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" xmlns:inkscape="x"><svg:g inkscape:label="Layer 1"/></svg:svg>"#,
        )
        .unwrap();
        assert_eq!(root.name, "svg:svg");
        let g = root.child("svg:g").unwrap();
        assert_eq!(g.attr("inkscape:label"), Some("Layer 1"));
    }

    #[test]
    fn test_entities_unescaped() {
        let root = parse(r#"<svg title="a &amp; b"><text>1 &lt; 2</text></svg>"#).unwrap();
        assert_eq!(root.attr("title"), Some("a & b"));
        assert_eq!(root.child("text").unwrap().text(), "1 < 2");
    }

    #[test]
    fn test_start_tag_span() {
        let source = r#"<svg><g id="x"></g></svg>"#;
        let root = parse(source).unwrap();
        let span = root.child("g").unwrap().span.clone().unwrap();
        assert_eq!(&source[span], r#"<g id="x">"#);
    }

    #[test]
    fn test_whitespace_text_kept() {
        let root = parse("<svg>\n  <g/>\n</svg>").unwrap();
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.children[0], Node::Text("\n  ".to_string()));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(parse(""), Err(TemplateError::MissingRoot)));
    }

    #[test]
    fn test_unclosed_root() {
        let err = parse("<svg><g>").unwrap_err();
        assert!(matches!(err, TemplateError::Unclosed { .. } | TemplateError::Xml(_)));
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(matches!(parse("<svg><g></text></svg>"), Err(TemplateError::Xml(_))));
    }

    #[test]
    fn test_doctype_entities_expanded() {
        let source = r#"<?xml version="1.0"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd" [
  <!ENTITY ns_svg "http://www.w3.org/2000/svg">
  <!ENTITY % param "ignored">
  <!ENTITY greeting 'Hello'>
]>
<svg xmlns="&ns_svg;"><text>&greeting; &amp; bye</text></svg>"#;

        let root = parse(source).unwrap();
        assert_eq!(root.attr("xmlns"), Some("http://www.w3.org/2000/svg"));
        assert_eq!(root.child("text").unwrap().text(), "Hello & bye");
    }

    #[test]
    fn test_undeclared_entity_rejected() {
        assert!(matches!(
            parse("<svg><text>&nope;</text></svg>"),
            Err(TemplateError::Xml(_))
        ));
    }
}
