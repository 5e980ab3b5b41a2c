//! Gangsheet - gang-run sheet imposition for vector templates
//!
//! This library reads a vector design template, clones its layers once per
//! row of a data table with labelled text filled in, and lays the copies out
//! on fixed-size output sheets in a row-major grid.
//!
//! # Example
//!
//! ```rust
//! use gangsheet::{impose, DataRecord, ImposeOptions, PageCollector, PageDimensions, Template};
//!
//! let template = Template::parse(r#"<svg width="100mm" height="50mm">
//!     <g><text inkscape:label="txt_1"><tspan>Name</tspan></text></g>
//! </svg>"#)?;
//!
//! let records = ["Alice", "Bob", "Carol"].map(|name| DataRecord::from_iter([name]));
//! let options = ImposeOptions::new().with_page(PageDimensions::new(250.0, 60.0));
//! let mut pages = PageCollector::default();
//!
//! let summary = impose(&template, records, &options, &mut pages)?;
//! assert_eq!(summary.pages, 2);
//! assert!(pages.pages[0].svg.contains("Bob"));
//! # Ok::<(), gangsheet::ImposeError>(())
//! ```

pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod layout;
pub mod parser;
pub mod renderer;
pub mod template;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

pub use config::{ConfigError, RunConfig};
pub use data::{parse_records, read_records, DataError, DataRecord, TableConfig};
pub use error::TemplateError;
pub use layout::{BoundingBox, LayoutCursor, LayoutState, PageDimensions, PageSignal, Point};
pub use parser::{parse_translate, TransformError, Translate};
pub use renderer::{
    render_page, CompletedPage, FilePageWriter, OutputError, PageAssembler, PageCollector,
    PageWriter, RenderedPage, SvgConfig,
};
pub use template::{Instancer, MissingFieldPolicy, Stencil, SubstitutionError, Template};

/// Errors that can occur during an imposition run
#[derive(Debug, Error)]
pub enum ImposeError {
    /// The template could not be used
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// The data table could not be read
    #[error(transparent)]
    Data(#[from] DataError),

    /// A sheet could not be serialized or written
    #[error(transparent)]
    Output(#[from] OutputError),

    /// The run configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The template file could not be read
    #[error("failed to read template '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A label referred past the end of a record under `MissingFieldPolicy::Fail`
    #[error("record {row}: {source}")]
    Substitution {
        /// 1-based table row
        row: usize,
        #[source]
        source: SubstitutionError,
    },

    /// Sheet dimensions that cannot hold a grid
    #[error("invalid page {field}: {value}")]
    InvalidDimensions { field: &'static str, value: f64 },
}

/// Options for a single run
#[derive(Debug, Clone, Default)]
pub struct ImposeOptions {
    /// Sheet size and margins
    pub page: PageDimensions,
    /// Handling of out-of-range label references
    pub missing_field: MissingFieldPolicy,
}

impl ImposeOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sheet dimensions
    pub fn with_page(mut self, page: PageDimensions) -> Self {
        self.page = page;
        self
    }

    /// Set the missing field policy
    pub fn with_missing_field(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field = policy;
        self
    }
}

impl From<&RunConfig> for ImposeOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            page: config.page,
            missing_field: config.missing_field,
        }
    }
}

/// Where one record's copy-set landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: u32,
    pub column: usize,
    pub row: usize,
    /// Area occupied on the sheet
    pub bounds: BoundingBox,
}

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Records consumed from the table
    pub records: usize,
    /// Layer instances placed across all sheets
    pub instances: usize,
    /// Sheets handed to the page writer
    pub pages: u32,
    /// Out-of-range label references left untouched
    pub skipped_substitutions: usize,
    /// One entry per placed record, in table order
    pub placements: Vec<Placement>,
}

/// Lay out one copy-set of `template` per record and hand each full sheet
/// to `writer`.
///
/// Records are processed in order. Every layer of the template is cloned for
/// each record, moved to the record's grid slot and filled from its fields.
/// A sheet is written as soon as the grid wraps past its last row, and the
/// partially filled last sheet is written once the records run out.
pub fn impose<W: PageWriter>(
    template: &Template,
    records: impl IntoIterator<Item = DataRecord>,
    options: &ImposeOptions,
    writer: &mut W,
) -> Result<RunSummary, ImposeError> {
    let dimensions = options.page;
    dimensions
        .validate()
        .map_err(|(field, value)| ImposeError::InvalidDimensions { field, value })?;

    let mut summary = RunSummary::default();

    if template.stencils().is_empty() {
        summary.records = records.into_iter().count();
        warn!("template has no layers; nothing to place");
        return Ok(summary);
    }

    let (width, height) = (template.width(), template.height());
    let mut cursor = LayoutCursor::new(dimensions);
    if !cursor.template_fits(width, height) {
        warn!(
            "template ({} x {}) does not fit inside the margins of a {} x {} sheet; placing one copy per sheet",
            width, height, dimensions.width, dimensions.height
        );
    }
    let (columns, rows) = cursor.capacity(width, height);
    debug!(columns, rows, layers = template.stencils().len(), "starting run");

    let instancer = Instancer::new(template, options.missing_field);
    let mut assembler = PageAssembler::new(template, &dimensions);

    for (index, record) in records.into_iter().enumerate() {
        let row = index + 1;
        let state = cursor.state();
        let offset = cursor.next_offset(width, height);

        let instances = instancer
            .instantiate_all(offset, &record)
            .map_err(|source| ImposeError::Substitution { row, source })?;

        for (instance, report) in instances {
            for skipped in &report.skipped {
                warn!(row, "{}", skipped);
            }
            summary.skipped_substitutions += report.skipped.len();
            summary.instances += 1;
            assembler.place(instance);
        }

        debug!(
            record = row,
            page = state.page,
            column = state.column,
            row = state.row,
            "placed copy-set"
        );
        summary.records += 1;
        summary.placements.push(Placement {
            page: state.page,
            column: state.column,
            row: state.row,
            bounds: cursor.slot_bounds(width, height),
        });

        if cursor.advance(width, height) == PageSignal::PageFull {
            if let Some(page) = assembler.flush(state.page) {
                writer.write_page(&page)?;
                summary.pages += 1;
            }
        }
    }

    if let Some(page) = assembler.flush(cursor.page()) {
        writer.write_page(&page)?;
        summary.pages += 1;
    }

    info!(
        "Imposed {} record(s) as {} instance(s) on {} page(s)",
        summary.records, summary.instances, summary.pages
    );
    Ok(summary)
}

/// Run a configuration end to end: read the template and table from disk
/// and write the sheets into the output directory.
pub fn impose_files(config: &RunConfig) -> Result<RunSummary, ImposeError> {
    config.validate()?;

    let source = std::fs::read_to_string(&config.template).map_err(|source| ImposeError::Read {
        path: config.template.clone(),
        source,
    })?;
    let template = Template::parse(&source)?;
    let records = read_records(&config.data, &config.table)?;

    let mut writer = FilePageWriter::new(&config.output_dir, config.svg.clone());
    impose(&template, records, &ImposeOptions::from(config), &mut writer)
}
