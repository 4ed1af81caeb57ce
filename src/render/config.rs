//! SVG encoder settings

/// How [`render_svg`](super::render_svg) formats its output
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Emit an `<?xml ...?>` declaration before the root element
    pub standalone: bool,

    /// Indent nested elements, one per line
    pub pretty_print: bool,

    /// Prepended to every class name, e.g. `ft-` gives `ft-spine`
    pub class_prefix: Option<String>,

    /// Decimal places kept for coordinates
    pub precision: usize,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("ft-".to_string()),
            precision: 2,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    /// An empty prefix leaves class names bare
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.class_prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}
