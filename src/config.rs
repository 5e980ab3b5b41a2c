//! Run configuration
//!
//! A run is described by the template and table paths, the sheet geometry
//! and a few output options. Values come from built-in defaults, optionally
//! overridden by a TOML file, optionally overridden again on the command line.
//!
//! ```toml
//! template = "badge.svg"
//! data = "attendees.csv"
//! output_dir = "sheets"
//!
//! [page]
//! width = 900
//! height = 600
//! edge_margin = 15
//! inner_margin = 5
//!
//! [table]
//! delimiter = ";"
//!
//! [output]
//! file_prefix = "badges_"
//!
//! [substitution]
//! missing_field = "fail"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::TableConfig;
use crate::layout::PageDimensions;
use crate::renderer::SvgConfig;
use crate::template::MissingFieldPolicy;

/// Errors that can occur when loading or validating a run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything one imposition run needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Design template (SVG)
    pub template: PathBuf,
    /// Data table, one row per copy-set
    pub data: PathBuf,
    /// Directory the output sheets are written to
    pub output_dir: PathBuf,
    /// Sheet size and margins
    pub page: PageDimensions,
    /// Table reader options
    pub table: TableConfig,
    /// Output file options
    pub svg: SvgConfig,
    /// Handling of labels that point past the end of a record
    pub missing_field: MissingFieldPolicy,
}

/// TOML structure for deserializing run configs
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlRunConfig {
    template: Option<PathBuf>,
    data: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    page: Option<TomlPage>,
    table: Option<TomlTable>,
    output: Option<TomlOutput>,
    substitution: Option<TomlSubstitution>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlPage {
    width: Option<f64>,
    height: Option<f64>,
    edge_margin: Option<f64>,
    inner_margin: Option<f64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTable {
    delimiter: Option<char>,
    trim: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlOutput {
    file_prefix: Option<String>,
    xml_declaration: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSubstitution {
    missing_field: Option<MissingFieldPolicy>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("example_design.svg"),
            data: PathBuf::from("example_data.csv"),
            output_dir: PathBuf::from("."),
            page: PageDimensions::default(),
            table: TableConfig::default(),
            svg: SvgConfig::default(),
            missing_field: MissingFieldPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    ///
    /// Relative paths in the file are taken relative to the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.template = rebase(base, config.template);
            config.data = rebase(base, config.data);
            config.output_dir = rebase(base, config.output_dir);
        }
        Ok(config)
    }

    /// Load configuration from a TOML string, on top of the defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlRunConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(template) = parsed.template {
            config.template = template;
        }
        if let Some(data) = parsed.data {
            config.data = data;
        }
        if let Some(output_dir) = parsed.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(page) = parsed.page {
            let d = &mut config.page;
            d.width = page.width.unwrap_or(d.width);
            d.height = page.height.unwrap_or(d.height);
            d.edge_margin = page.edge_margin.unwrap_or(d.edge_margin);
            d.inner_margin = page.inner_margin.unwrap_or(d.inner_margin);
        }
        if let Some(table) = parsed.table {
            if let Some(delimiter) = table.delimiter {
                config.table = config.table.with_delimiter(delimiter);
            }
            if let Some(trim) = table.trim {
                config.table = config.table.with_trim(trim);
            }
        }
        if let Some(output) = parsed.output {
            if let Some(prefix) = output.file_prefix {
                config.svg = config.svg.with_file_prefix(prefix);
            }
            if let Some(declaration) = output.xml_declaration {
                config.svg = config.svg.with_xml_declaration(declaration);
            }
        }
        if let Some(policy) = parsed.substitution.and_then(|s| s.missing_field) {
            config.missing_field = policy;
        }

        Ok(config)
    }

    /// Set the sheet dimensions
    pub fn with_page(mut self, page: PageDimensions) -> Self {
        self.page = page;
        self
    }

    /// Set the template path
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = path.into();
        self
    }

    /// Set the data table path
    pub fn with_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.data = path.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set the missing field policy
    pub fn with_missing_field(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field = policy;
        self
    }

    /// Check the configuration describes a run that can be carried out
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.page
            .validate()
            .map_err(|(field, value)| ConfigError::Invalid {
                field,
                reason: format!("{} is not a usable length", value),
            })?;

        if !self.table.delimiter.is_ascii() {
            return Err(ConfigError::Invalid {
                field: "delimiter",
                reason: format!("'{}' is not a single ASCII character", self.table.delimiter),
            });
        }
        if self.svg.file_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid {
                field: "file_prefix",
                reason: "must not contain path separators".to_string(),
            });
        }
        Ok(())
    }
}

fn rebase(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
