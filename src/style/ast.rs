//! Syntax tree for style definition files

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A node with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A single scalar on the right-hand side of an entry
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f64),
    /// Hex color including the leading '#'
    Color(String),
    /// Quoted string
    Text(String),
    /// Bare word such as `true`, `large` or `sans-serif`
    Word(String),
}

impl StyleValue {
    /// Human-readable kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            StyleValue::Number(_) => "number",
            StyleValue::Color(_) => "color",
            StyleValue::Text(_) => "string",
            StyleValue::Word(_) => "word",
        }
    }
}

/// `key : value[, value...]`
#[derive(Debug, Clone, PartialEq)]
pub struct StyleEntry {
    /// Dotted key, e.g. `lines.linewidth`
    pub key: Spanned<String>,
    pub values: Vec<Spanned<StyleValue>>,
}

impl StyleEntry {
    /// Span covering the key and all values
    pub fn span(&self) -> Span {
        let end = self
            .values
            .last()
            .map(|v| v.span.end)
            .unwrap_or(self.key.span.end);
        self.key.span.start..end
    }
}

/// A parsed style definition file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    pub entries: Vec<StyleEntry>,
}

impl StyleSheet {
    /// Last entry for `key`, matching how later lines override earlier ones
    pub fn get(&self, key: &str) -> Option<&StyleEntry> {
        self.entries.iter().rev().find(|e| e.key.node == key)
    }
}
