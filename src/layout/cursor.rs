//! Row-major grid pagination
//!
//! The cursor walks a grid of template-sized slots across a sheet: left to
//! right along a row, then down to the next row, and onto a fresh sheet once
//! no further row fits. A slot "fits" when the copies placed so far plus
//! their inner gaps plus both outer margins stay within the sheet:
//!
//! ```text
//! edge + n * size + (n - 1) * inner + edge <= limit
//! ```
//!
//! Equality fits; only a strict overflow wraps.

use tracing::debug;

use super::{BoundingBox, PageDimensions, Point};

/// Grid position of the next copy and the number of the sheet it lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    pub column: usize,
    pub row: usize,
    /// 1-based sheet counter
    pub page: u32,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            column: 0,
            row: 0,
            page: 1,
        }
    }
}

/// Outcome of advancing the cursor past one copy-set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSignal {
    /// The next copy still goes on the current sheet
    PageContinues,
    /// The current sheet has no room left; the cursor moved to a new one
    PageFull,
}

/// Pagination state machine over a fixed sheet size
#[derive(Debug, Clone)]
pub struct LayoutCursor {
    dimensions: PageDimensions,
    state: LayoutState,
}

impl LayoutCursor {
    pub fn new(dimensions: PageDimensions) -> Self {
        Self::from_state(dimensions, LayoutState::default())
    }

    /// Resume from an existing state
    pub fn from_state(dimensions: PageDimensions, state: LayoutState) -> Self {
        Self { dimensions, state }
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Number of the sheet currently being filled
    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn dimensions(&self) -> &PageDimensions {
        &self.dimensions
    }

    /// Placement offset for the copy about to be placed at the current slot
    pub fn next_offset(&self, template_width: f64, template_height: f64) -> Point {
        let d = &self.dimensions;
        Point::new(
            d.edge_margin + self.state.column as f64 * (template_width + d.inner_margin),
            d.edge_margin + self.state.row as f64 * (template_height + d.inner_margin),
        )
    }

    /// Area the copy at the current slot will occupy
    pub fn slot_bounds(&self, template_width: f64, template_height: f64) -> BoundingBox {
        BoundingBox::at(
            self.next_offset(template_width, template_height),
            template_width,
            template_height,
        )
    }

    /// Move past the current slot, wrapping rows and sheets as needed
    pub fn advance(&mut self, template_width: f64, template_height: f64) -> PageSignal {
        let d = self.dimensions;

        self.state.column += 1;
        if !overflows(self.state.column, template_width, &d, d.width) {
            return PageSignal::PageContinues;
        }

        self.state.column = 0;
        self.state.row += 1;
        if !overflows(self.state.row, template_height, &d, d.height) {
            return PageSignal::PageContinues;
        }

        debug!(page = self.state.page, "sheet full");
        self.state.row = 0;
        self.state.page += 1;
        PageSignal::PageFull
    }

    /// Columns and rows the cursor fills on each sheet.
    ///
    /// Never less than one in either direction: a template larger than the
    /// sheet still gets one copy per sheet.
    pub fn capacity(&self, template_width: f64, template_height: f64) -> (usize, usize) {
        let d = &self.dimensions;
        (
            slots_along(template_width, d, d.width),
            slots_along(template_height, d, d.height),
        )
    }

    /// Whether a single copy fits inside the margins at all
    pub fn template_fits(&self, template_width: f64, template_height: f64) -> bool {
        let d = &self.dimensions;
        d.edge_margin + template_width + d.edge_margin <= d.width
            && d.edge_margin + template_height + d.edge_margin <= d.height
    }
}

/// Would one more slot after `index` slots run past `limit`?
fn overflows(index: usize, size: f64, d: &PageDimensions, limit: f64) -> bool {
    d.edge_margin + (index as f64 + 1.0) * size + index as f64 * d.inner_margin + d.edge_margin
        > limit
}

fn slots_along(size: f64, d: &PageDimensions, limit: f64) -> usize {
    if !(size > 0.0) {
        return 1;
    }
    let estimate =
        ((limit - 2.0 * d.edge_margin + d.inner_margin) / (size + d.inner_margin)).floor();
    let mut count = if estimate >= 1.0 { estimate as usize } else { 1 };

    // Settle rounding in the division against the exact fit test
    while count > 1 && overflows(count - 1, size, d, limit) {
        count -= 1;
    }
    while count < usize::MAX && !overflows(count, size, d, limit) {
        count += 1;
    }
    count
}
