//! Output sheet dimensions

/// Physical size and margins of every output sheet in a run.
///
/// All values are in the template's length unit (usually millimeters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    /// Sheet width
    pub width: f64,

    /// Sheet height
    pub height: f64,

    /// Blank border kept along all four outer edges
    pub edge_margin: f64,

    /// Gap between neighbouring copies, horizontally and vertically
    pub inner_margin: f64,
}

impl Default for PageDimensions {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            edge_margin: 15.0,
            inner_margin: 5.0,
        }
    }
}

impl PageDimensions {
    /// Create dimensions with the given sheet size and no margins
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            edge_margin: 0.0,
            inner_margin: 0.0,
        }
    }

    /// Set the outer edge margin
    pub fn with_edge_margin(mut self, margin: f64) -> Self {
        self.edge_margin = margin;
        self
    }

    /// Set the margin between copies
    pub fn with_inner_margin(mut self, margin: f64) -> Self {
        self.inner_margin = margin;
        self
    }

    /// Check the dimensions describe a usable sheet, naming the first bad field
    pub fn validate(&self) -> Result<(), (&'static str, f64)> {
        let positive = [("width", self.width), ("height", self.height)];
        let non_negative = [
            ("edge_margin", self.edge_margin),
            ("inner_margin", self.inner_margin),
        ];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err((name, value));
            }
        }
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err((name, value));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let dims = PageDimensions::default();
        assert_eq!(dims.width, 900.0);
        assert_eq!(dims.height, 600.0);
        assert_eq!(dims.edge_margin, 15.0);
        assert_eq!(dims.inner_margin, 5.0);
    }

    #[test]
    fn test_builder_pattern() {
        let dims = PageDimensions::new(250.0, 60.0)
            .with_edge_margin(2.0)
            .with_inner_margin(1.0);

        assert_eq!(dims.width, 250.0);
        assert_eq!(dims.edge_margin, 2.0);
        assert_eq!(dims.inner_margin, 1.0);
    }

    #[test]
    fn test_validate() {
        assert!(PageDimensions::new(250.0, 60.0).validate().is_ok());
        assert_eq!(
            PageDimensions::new(0.0, 60.0).validate(),
            Err(("width", 0.0))
        );
        assert_eq!(
            PageDimensions::new(10.0, 10.0)
                .with_inner_margin(-1.0)
                .validate(),
            Err(("inner_margin", -1.0))
        );
    }
}
