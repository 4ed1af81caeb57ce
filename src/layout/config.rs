//! Configuration for the subplot grid

/// Subplot placement as fractions of the figure, like `figure.subplot.*`
#[derive(Debug, Clone, PartialEq)]
pub struct SubplotParams {
    /// Left edge of the grid, as a fraction of figure width
    pub left: f64,

    /// Right edge of the grid, as a fraction of figure width
    pub right: f64,

    /// Bottom edge of the grid, as a fraction of figure height
    pub bottom: f64,

    /// Top edge of the grid, as a fraction of figure height
    pub top: f64,

    /// Horizontal gap between panels, as a fraction of panel width
    pub wspace: f64,

    /// Vertical gap between panels, as a fraction of panel height
    pub hspace: f64,
}

impl Default for SubplotParams {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
            wspace: 0.2,
            hspace: 0.2,
        }
    }
}

impl SubplotParams {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outer margins
    pub fn with_margins(mut self, left: f64, right: f64, bottom: f64, top: f64) -> Self {
        self.left = left;
        self.right = right;
        self.bottom = bottom;
        self.top = top;
        self
    }

    /// Set the spacing between panels
    pub fn with_spacing(mut self, wspace: f64, hspace: f64) -> Self {
        self.wspace = wspace;
        self.hspace = hspace;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SubplotParams::default();
        assert_eq!(config.left, 0.125);
        assert_eq!(config.right, 0.9);
        assert_eq!(config.bottom, 0.11);
        assert_eq!(config.top, 0.88);
        assert_eq!(config.wspace, 0.2);
        assert_eq!(config.hspace, 0.2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SubplotParams::new()
            .with_margins(0.1, 0.95, 0.1, 0.95)
            .with_spacing(0.3, 0.4);

        assert_eq!(config.left, 0.1);
        assert_eq!(config.top, 0.95);
        assert_eq!(config.wspace, 0.3);
        assert_eq!(config.hspace, 0.4);
    }
}
