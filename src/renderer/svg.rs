//! SVG serialization of completed pages

use crate::document;

use super::{CompletedPage, OutputError, SvgConfig};

/// Render a completed page to SVG text
pub fn render_page(page: &CompletedPage, config: &SvgConfig) -> Result<String, OutputError> {
    document::write(&page.root, config.xml_declaration)
}
