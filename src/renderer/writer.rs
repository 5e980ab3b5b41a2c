//! Page writers: where completed sheets go

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{render_page, CompletedPage, OutputError, SvgConfig};

/// Receives each completed sheet, in page order
pub trait PageWriter {
    fn write_page(&mut self, page: &CompletedPage) -> Result<(), OutputError>;
}

impl<W: PageWriter + ?Sized> PageWriter for &mut W {
    fn write_page(&mut self, page: &CompletedPage) -> Result<(), OutputError> {
        (**self).write_page(page)
    }
}

/// Writes `<prefix><n>.svg` files into a directory
#[derive(Debug, Clone)]
pub struct FilePageWriter {
    dir: PathBuf,
    config: SvgConfig,
    written: Vec<PathBuf>,
}

impl FilePageWriter {
    pub fn new(dir: impl Into<PathBuf>, config: SvgConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
            written: Vec::new(),
        }
    }

    /// Paths written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PageWriter for FilePageWriter {
    fn write_page(&mut self, page: &CompletedPage) -> Result<(), OutputError> {
        let svg = render_page(page, &self.config)?;

        fs::create_dir_all(&self.dir).map_err(|source| OutputError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(self.config.file_name(page.number));
        fs::write(&path, svg).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;

        info!("Wrote file '{}'", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// A rendered sheet held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub number: u32,
    pub file_name: String,
    pub svg: String,
    pub instances: usize,
}

/// Keeps rendered sheets in memory instead of writing files
#[derive(Debug, Clone, Default)]
pub struct PageCollector {
    config: SvgConfig,
    pub pages: Vec<RenderedPage>,
}

impl PageCollector {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
        }
    }
}

impl PageWriter for PageCollector {
    fn write_page(&mut self, page: &CompletedPage) -> Result<(), OutputError> {
        self.pages.push(RenderedPage {
            number: page.number,
            file_name: self.config.file_name(page.number),
            svg: render_page(page, &self.config)?,
            instances: page.instances,
        });
        Ok(())
    }
}
