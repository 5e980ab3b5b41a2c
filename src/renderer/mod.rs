//! Output sheets: assembly, serialization and writing
//!
//! Placed instances accumulate in a `PageAssembler`; each flush yields a
//! `CompletedPage` that a `PageWriter` renders to SVG and stores.

pub mod config;
pub mod page;
pub mod svg;
pub mod writer;

use std::path::PathBuf;

use thiserror::Error;

pub use config::SvgConfig;
pub use page::{CompletedPage, PageAssembler};
pub use svg::render_page;
pub use writer::{FilePageWriter, PageCollector, PageWriter, RenderedPage};

/// Errors that can occur while serializing or writing a page
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to serialize page: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to serialize page: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialized page is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
