//! Sheet layout for gang-run imposition
//!
//! This module decides where each template copy goes on a sheet and when
//! a sheet is full.

pub mod config;
pub mod cursor;
pub mod types;

pub use config::PageDimensions;
pub use cursor::{LayoutCursor, LayoutState, PageSignal};
pub use types::*;
