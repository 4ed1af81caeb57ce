//! Typed rendering defaults and their application from style sheets

use thiserror::Error;
use tracing::warn;

use super::ast::{Span, Spanned, StyleEntry, StyleSheet, StyleValue};
use crate::figure::{Color, Marker};
use crate::layout::SubplotParams;

/// A style entry whose value does not fit its key
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid value for '{key}': {message}")]
pub struct ValueError {
    pub key: String,
    pub span: Span,
    pub message: String,
}

/// Font size, either absolute or relative to `font.size`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    Points(f64),
    Scale(f64),
}

impl FontSize {
    pub fn resolve(&self, base: f64) -> f64 {
        match self {
            FontSize::Points(pt) => *pt,
            FontSize::Scale(factor) => base * factor,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        let factor = match word {
            "xx-small" => 0.579,
            "x-small" => 0.694,
            "small" | "smaller" => 0.833,
            "medium" => 1.0,
            "large" | "larger" => 1.2,
            "x-large" => 1.44,
            "xx-large" => 1.728,
            _ => return None,
        };
        Some(FontSize::Scale(factor))
    }
}

/// Tick defaults for one scale
#[derive(Debug, Clone, PartialEq)]
pub struct TickParams {
    pub label_size: FontSize,
    /// Major tick length in points
    pub major_size: f64,
    /// Major tick stroke width in points
    pub major_width: f64,
    pub color: Color,
}

impl Default for TickParams {
    fn default() -> Self {
        Self {
            label_size: FontSize::Scale(1.0),
            major_size: 3.5,
            major_width: 0.8,
            color: Color::BLACK,
        }
    }
}

/// The full set of rendering defaults a figure is built and drawn with
#[derive(Debug, Clone, PartialEq)]
pub struct StyleParams {
    /// Figure size in inches
    pub figsize: (f64, f64),
    pub figure_dpi: f64,
    pub figure_facecolor: Color,
    pub subplot: SubplotParams,
    /// `None` means "use the figure dpi"
    pub savefig_dpi: Option<f64>,
    pub savefig_transparent: bool,
    pub font_family: Vec<String>,
    pub font_size: f64,
    pub text_color: Color,
    pub axes_titlesize: FontSize,
    pub axes_labelsize: FontSize,
    pub axes_facecolor: Color,
    pub axes_edgecolor: Color,
    pub axes_linewidth: f64,
    pub axes_grid: bool,
    pub color_cycle: Vec<Color>,
    pub axes_xmargin: f64,
    pub axes_ymargin: f64,
    pub grid_color: Color,
    pub grid_linewidth: f64,
    pub grid_alpha: f64,
    pub xtick: TickParams,
    pub ytick: TickParams,
    pub lines_linewidth: f64,
    pub lines_markersize: f64,
    pub lines_markeredgewidth: f64,
    pub lines_marker: Option<Marker>,
}

/// Tableau 10
const DEFAULT_CYCLE: [Color; 10] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x7f, 0x7f, 0x7f),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
];

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            figsize: (6.4, 4.8),
            figure_dpi: 100.0,
            figure_facecolor: Color::WHITE,
            subplot: SubplotParams::default(),
            savefig_dpi: None,
            savefig_transparent: false,
            font_family: vec!["sans-serif".to_string()],
            font_size: 10.0,
            text_color: Color::BLACK,
            axes_titlesize: FontSize::Scale(1.2),
            axes_labelsize: FontSize::Scale(1.0),
            axes_facecolor: Color::WHITE,
            axes_edgecolor: Color::BLACK,
            axes_linewidth: 0.8,
            axes_grid: false,
            color_cycle: DEFAULT_CYCLE.to_vec(),
            axes_xmargin: 0.05,
            axes_ymargin: 0.05,
            grid_color: Color::rgb(0xb0, 0xb0, 0xb0),
            grid_linewidth: 0.8,
            grid_alpha: 1.0,
            xtick: TickParams::default(),
            ytick: TickParams::default(),
            lines_linewidth: 1.5,
            lines_markersize: 6.0,
            lines_markeredgewidth: 1.0,
            lines_marker: None,
        }
    }
}

impl StyleParams {
    /// Dpi used when saving, unless overridden at export time
    pub fn save_dpi(&self) -> f64 {
        self.savefig_dpi.unwrap_or(self.figure_dpi)
    }

    /// Apply every entry of `sheet` on top of these parameters.
    ///
    /// All entries are validated before anything is written, so on error
    /// `self` is left untouched. Unknown keys are skipped with a warning and
    /// returned to the caller.
    pub fn apply_sheet(&mut self, sheet: &StyleSheet) -> Result<Vec<String>, ValueError> {
        let mut next = self.clone();
        let mut unknown = Vec::new();
        for entry in &sheet.entries {
            if !next.apply_entry(entry)? {
                warn!(key = %entry.key.node, "ignoring unknown style key");
                unknown.push(entry.key.node.clone());
            }
        }
        *self = next;
        Ok(unknown)
    }

    /// Returns `Ok(false)` for keys this crate does not know about
    fn apply_entry(&mut self, entry: &StyleEntry) -> Result<bool, ValueError> {
        let e = EntryReader(entry);
        match entry.key.node.as_str() {
            "figure.figsize" => {
                let v = e.numbers(2)?;
                if v[0] <= 0.0 || v[1] <= 0.0 {
                    return Err(e.error("figure size must be positive"));
                }
                self.figsize = (v[0], v[1]);
            }
            "figure.dpi" => self.figure_dpi = e.positive()?,
            "figure.facecolor" => self.figure_facecolor = e.color()?,
            "figure.subplot.left" => self.subplot.left = e.fraction()?,
            "figure.subplot.right" => self.subplot.right = e.fraction()?,
            "figure.subplot.bottom" => self.subplot.bottom = e.fraction()?,
            "figure.subplot.top" => self.subplot.top = e.fraction()?,
            "figure.subplot.wspace" => self.subplot.wspace = e.non_negative()?,
            "figure.subplot.hspace" => self.subplot.hspace = e.non_negative()?,
            "savefig.dpi" => {
                self.savefig_dpi = match e.single()? {
                    StyleValue::Word(w) if w == "figure" => None,
                    _ => Some(e.positive()?),
                }
            }
            "savefig.transparent" => self.savefig_transparent = e.boolean()?,
            "font.family" => self.font_family = e.words()?,
            "font.size" => self.font_size = e.positive()?,
            "text.color" => self.text_color = e.color()?,
            "axes.titlesize" => self.axes_titlesize = e.font_size()?,
            "axes.labelsize" => self.axes_labelsize = e.font_size()?,
            "axes.facecolor" => self.axes_facecolor = e.color()?,
            "axes.edgecolor" => self.axes_edgecolor = e.color()?,
            "axes.linewidth" => self.axes_linewidth = e.non_negative()?,
            "axes.grid" => self.axes_grid = e.boolean()?,
            "axes.color_cycle" => self.color_cycle = e.colors()?,
            "axes.xmargin" => self.axes_xmargin = e.non_negative()?,
            "axes.ymargin" => self.axes_ymargin = e.non_negative()?,
            "grid.color" => self.grid_color = e.color()?,
            "grid.linewidth" => self.grid_linewidth = e.non_negative()?,
            "grid.alpha" => self.grid_alpha = e.fraction()?,
            "xtick.labelsize" => self.xtick.label_size = e.font_size()?,
            "ytick.labelsize" => self.ytick.label_size = e.font_size()?,
            "xtick.major.size" => self.xtick.major_size = e.non_negative()?,
            "ytick.major.size" => self.ytick.major_size = e.non_negative()?,
            "xtick.major.width" => self.xtick.major_width = e.non_negative()?,
            "ytick.major.width" => self.ytick.major_width = e.non_negative()?,
            "xtick.color" => self.xtick.color = e.color()?,
            "ytick.color" => self.ytick.color = e.color()?,
            "lines.linewidth" => self.lines_linewidth = e.non_negative()?,
            "lines.markersize" => self.lines_markersize = e.non_negative()?,
            "lines.markeredgewidth" => self.lines_markeredgewidth = e.non_negative()?,
            "lines.marker" => self.lines_marker = e.marker()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Typed accessors over one entry's values
struct EntryReader<'a>(&'a StyleEntry);

impl EntryReader<'_> {
    fn error(&self, message: impl Into<String>) -> ValueError {
        ValueError {
            key: self.0.key.node.clone(),
            span: self.0.span(),
            message: message.into(),
        }
    }

    fn value_error(&self, value: &Spanned<StyleValue>, message: impl Into<String>) -> ValueError {
        ValueError {
            key: self.0.key.node.clone(),
            span: value.span.clone(),
            message: message.into(),
        }
    }

    fn single(&self) -> Result<&StyleValue, ValueError> {
        match self.0.values.as_slice() {
            [only] => Ok(&only.node),
            values => Err(self.error(format!("expected one value, found {}", values.len()))),
        }
    }

    fn number_of(&self, value: &Spanned<StyleValue>) -> Result<f64, ValueError> {
        match &value.node {
            StyleValue::Number(n) => Ok(*n),
            other => Err(self.value_error(
                value,
                format!("expected number, found {}", other.kind()),
            )),
        }
    }

    fn numbers(&self, count: usize) -> Result<Vec<f64>, ValueError> {
        if self.0.values.len() != count {
            return Err(self.error(format!(
                "expected {} numbers, found {} values",
                count,
                self.0.values.len()
            )));
        }
        self.0.values.iter().map(|v| self.number_of(v)).collect()
    }

    fn number(&self) -> Result<f64, ValueError> {
        self.single()?;
        self.number_of(&self.0.values[0])
    }

    fn positive(&self) -> Result<f64, ValueError> {
        let n = self.number()?;
        if n <= 0.0 {
            return Err(self.error("expected a positive number"));
        }
        Ok(n)
    }

    fn non_negative(&self) -> Result<f64, ValueError> {
        let n = self.number()?;
        if n < 0.0 {
            return Err(self.error("expected a non-negative number"));
        }
        Ok(n)
    }

    fn fraction(&self) -> Result<f64, ValueError> {
        let n = self.number()?;
        if !(0.0..=1.0).contains(&n) {
            return Err(self.error("expected a number between 0 and 1"));
        }
        Ok(n)
    }

    fn boolean(&self) -> Result<bool, ValueError> {
        match self.single()? {
            StyleValue::Word(w) => match w.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" => Ok(true),
                "false" | "no" | "off" => Ok(false),
                _ => Err(self.error(format!("expected true or false, found '{}'", w))),
            },
            StyleValue::Number(n) if *n == 0.0 || *n == 1.0 => Ok(*n == 1.0),
            other => Err(self.error(format!("expected true or false, found {}", other.kind()))),
        }
    }

    fn color_of(&self, value: &Spanned<StyleValue>) -> Result<Color, ValueError> {
        let parsed = match &value.node {
            StyleValue::Color(hex) => Color::from_hex(hex),
            StyleValue::Number(level) => level.to_string().parse::<Color>(),
            StyleValue::Word(s) | StyleValue::Text(s) => s.parse::<Color>(),
        };
        parsed.map_err(|err| self.value_error(value, err.to_string()))
    }

    fn color(&self) -> Result<Color, ValueError> {
        self.single()?;
        self.color_of(&self.0.values[0])
    }

    fn colors(&self) -> Result<Vec<Color>, ValueError> {
        self.0.values.iter().map(|v| self.color_of(v)).collect()
    }

    fn words(&self) -> Result<Vec<String>, ValueError> {
        self.0
            .values
            .iter()
            .map(|v| match &v.node {
                StyleValue::Word(s) | StyleValue::Text(s) => Ok(s.clone()),
                other => Err(self.value_error(v, format!("expected name, found {}", other.kind()))),
            })
            .collect()
    }

    fn font_size(&self) -> Result<FontSize, ValueError> {
        match self.single()? {
            StyleValue::Number(n) if *n > 0.0 => Ok(FontSize::Points(*n)),
            StyleValue::Word(w) => {
                FontSize::from_word(w)
                    .ok_or_else(|| self.error(format!("unknown font size '{}'", w)))
            }
            other => Err(self.error(format!("expected font size, found {}", other.kind()))),
        }
    }

    fn marker(&self) -> Result<Option<Marker>, ValueError> {
        match self.single()? {
            StyleValue::Word(s) | StyleValue::Text(s) => {
                if s.eq_ignore_ascii_case("none") || s.is_empty() {
                    Ok(None)
                } else {
                    s.parse::<Marker>().map(Some).map_err(|msg| self.error(msg))
                }
            }
            other => Err(self.error(format!("expected marker code, found {}", other.kind()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::grammar::parse;
    use pretty_assertions::assert_eq;

    fn applied(source: &str) -> Result<StyleParams, ValueError> {
        let sheet = parse(source).expect("Should parse");
        let mut params = StyleParams::default();
        params.apply_sheet(&sheet)?;
        Ok(params)
    }

    #[test]
    fn test_defaults() {
        let params = StyleParams::default();
        assert_eq!(params.figsize, (6.4, 4.8));
        assert_eq!(params.save_dpi(), 100.0);
        assert_eq!(params.color_cycle.len(), 10);
        assert!((params.axes_titlesize.resolve(params.font_size) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_known_keys() {
        let params = applied(
            r#"
            figure.figsize : 3.5, 2.6
            savefig.dpi : 300
            font.family : "DejaVu Sans", sans-serif
            axes.grid : true
            axes.color_cycle : #000000, 0.5, red
            xtick.labelsize : small
            lines.marker : o
            "#,
        )
        .unwrap();
        assert_eq!(params.figsize, (3.5, 2.6));
        assert_eq!(params.save_dpi(), 300.0);
        assert_eq!(params.font_family, vec!["DejaVu Sans", "sans-serif"]);
        assert!(params.axes_grid);
        assert_eq!(
            params.color_cycle,
            vec![Color::BLACK, Color::gray(0.5), Color::rgb(255, 0, 0)]
        );
        assert_eq!(params.xtick.label_size, FontSize::Scale(0.833));
        assert_eq!(params.lines_marker, Some(Marker::Circle));
    }

    #[test]
    fn test_savefig_dpi_figure_keyword() {
        let params = applied("figure.dpi : 80\nsavefig.dpi : figure").unwrap();
        assert_eq!(params.savefig_dpi, None);
        assert_eq!(params.save_dpi(), 80.0);
    }

    #[test]
    fn test_unknown_keys_are_reported_not_fatal() {
        let sheet = parse("legend.frameon : false\nfont.size : 12").unwrap();
        let mut params = StyleParams::default();
        let unknown = params.apply_sheet(&sheet).unwrap();
        assert_eq!(unknown, vec!["legend.frameon".to_string()]);
        assert_eq!(params.font_size, 12.0);
    }

    #[test]
    fn test_invalid_value_leaves_params_untouched() {
        let sheet = parse("font.size : 14\nlines.linewidth : thick").unwrap();
        let mut params = StyleParams::default();
        let err = params.apply_sheet(&sheet).unwrap_err();
        assert_eq!(err.key, "lines.linewidth");
        assert_eq!(params, StyleParams::default());
    }

    #[test]
    fn test_wrong_arity() {
        let err = applied("figure.figsize : 4").unwrap_err();
        assert_eq!(err.key, "figure.figsize");
        assert!(err.message.contains("expected 2 numbers"));
    }

    #[test]
    fn test_fraction_bounds() {
        assert!(applied("grid.alpha : 1.5").is_err());
        assert!(applied("grid.alpha : 0.3").is_ok());
    }
}
