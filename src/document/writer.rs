//! Element tree serialization built on quick-xml

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::renderer::OutputError;

use super::{Element, Node};

/// Serialize an element tree, optionally preceded by an XML declaration
pub fn write(root: &Element, with_declaration: bool) -> Result<String, OutputError> {
    let mut writer = Writer::new(Vec::new());

    if with_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Text(BytesText::new("\n")))?;
    }
    write_element(&mut writer, root)?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), OutputError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
            Node::CData(t) => writer.write_event(Event::CData(BytesCData::new(t.as_str())))?,
            Node::Comment(t) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(t.as_str())))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;

    #[test]
    fn test_write_with_declaration() {
        let root = Element::new("svg")
            .with_attr("width", "10mm")
            .with_child(Element::new("g"));
        assert_eq!(
            write(&root, true).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg width=\"10mm\"><g/></svg>"
        );
    }

    #[test]
    fn test_write_escapes_text_and_attributes() {
        let root = Element::new("text")
            .with_attr("label", "a & \"b\"")
            .with_text("1 < 2");
        let out = write(&root, false).unwrap();
        assert_eq!(out, "<text label=\"a &amp; &quot;b&quot;\">1 &lt; 2</text>");
    }

    #[test]
    fn test_parse_write_preserves_structure() {
        let source = "<svg:svg xmlns:svg=\"http://www.w3.org/2000/svg\">\n  <svg:g id=\"a\"><!-- note --><svg:text>x</svg:text></svg:g>\n</svg:svg>";
        let root = parse(source).unwrap();
        assert_eq!(write(&root, false).unwrap(), source);
    }
}
