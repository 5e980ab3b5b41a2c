//! Configuration for SVG page output

/// Configuration options for written pages
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Whether to start each page with an XML declaration
    pub xml_declaration: bool,

    /// File name prefix; page `n` is written as `<prefix><n>.svg`
    pub file_prefix: String,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            file_prefix: "output_".to_string(),
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether pages carry an XML declaration
    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.xml_declaration = declaration;
        self
    }

    /// Set the file name prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// File name for the given page number
    pub fn file_name(&self, page: u32) -> String {
        format!("{}{}.svg", self.file_prefix, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SvgConfig::default();
        assert!(config.xml_declaration);
        assert_eq!(config.file_prefix, "output_");
        assert_eq!(config.file_name(1), "output_1.svg");
    }

    #[test]
    fn test_builder_pattern() {
        let config = SvgConfig::new()
            .with_xml_declaration(false)
            .with_file_prefix("sheet-");

        assert!(!config.xml_declaration);
        assert_eq!(config.file_name(12), "sheet-12.svg");
    }
}
