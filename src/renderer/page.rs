//! Page assembly and the flush protocol

use tracing::debug;

use crate::document::Element;
use crate::layout::PageDimensions;
use crate::template::{Length, Template};

/// A finished output sheet, ready for a page writer
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPage {
    /// 1-based sheet number
    pub number: u32,
    /// Root element with its placed instances
    pub root: Element,
    /// Number of layer instances on the sheet
    pub instances: usize,
}

/// Accumulates layer instances under the template root until flushed
#[derive(Debug, Clone)]
pub struct PageAssembler {
    root: Element,
    /// Children that belong to the template itself (defs, metadata, ...)
    base_len: usize,
}

impl PageAssembler {
    /// Start from the template's stripped root, resized to the output sheet
    pub fn new(template: &Template, dimensions: &PageDimensions) -> Self {
        let mut root = template.root().clone();
        let unit = template.unit();
        root.set_attr("width", Length::new(dimensions.width, unit).to_string());
        root.set_attr("height", Length::new(dimensions.height, unit).to_string());
        root.set_attr(
            "viewBox",
            format!("0 0 {} {}", dimensions.width, dimensions.height),
        );

        let base_len = root.children.len();
        Self { root, base_len }
    }

    /// Append an instance to the current sheet
    pub fn place(&mut self, instance: Element) {
        self.root.push(instance);
    }

    /// Instances placed since the last flush
    pub fn pending(&self) -> usize {
        self.root.children.len() - self.base_len
    }

    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Detach the current sheet's instances and hand them back as a page.
    ///
    /// Returns `None` when nothing was placed, so an exhausted table never
    /// produces a blank trailing sheet. The assembler is ready for the next
    /// sheet either way.
    pub fn flush(&mut self, number: u32) -> Option<CompletedPage> {
        if self.is_empty() {
            return None;
        }

        let instances = self.root.children.split_off(self.base_len);
        let count = instances.len();
        let mut root = self.root.clone();
        root.children.extend(instances);

        debug!(page = number, instances = count, "flushing sheet");
        Some(CompletedPage {
            number,
            root,
            instances: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Template {
        Template::parse(r#"<svg width="100mm" height="50mm" viewBox="0 0 100 50"><defs/><g/></svg>"#).unwrap()
    }

    #[test]
    fn test_root_resized() {
        let assembler = PageAssembler::new(&template(), &PageDimensions::new(250.0, 60.0));
        let page = {
            let mut a = assembler.clone();
            a.place(Element::new("g"));
            a.flush(1).unwrap()
        };
        assert_eq!(page.root.attr("width"), Some("250mm"));
        assert_eq!(page.root.attr("height"), Some("60mm"));
        assert_eq!(page.root.attr("viewBox"), Some("0 0 250 60"));
    }

    #[test]
    fn test_flush_detaches_instances() {
        let mut assembler = PageAssembler::new(&template(), &PageDimensions::new(250.0, 60.0));
        assembler.place(Element::new("g").with_attr("id", "a"));
        assembler.place(Element::new("g").with_attr("id", "b"));
        assert_eq!(assembler.pending(), 2);

        let page = assembler.flush(1).unwrap();
        assert_eq!(page.number, 1);
        assert_eq!(page.instances, 2);
        assert_eq!(page.root.children_named("g").count(), 2);
        assert!(page.root.child("defs").is_some());
        assert!(assembler.is_empty());

        assembler.place(Element::new("g").with_attr("id", "c"));
        let next = assembler.flush(2).unwrap();
        let ids: Vec<_> = next.root.children_named("g").filter_map(|g| g.attr("id")).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_flush_empty_yields_nothing() {
        let mut assembler = PageAssembler::new(&template(), &PageDimensions::new(250.0, 60.0));
        assert!(assembler.flush(1).is_none());
    }
}
