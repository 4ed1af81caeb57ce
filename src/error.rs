//! Error types for style file parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::style::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let ParseError::Syntax {
            span,
            message,
            expected,
        } = self;

        let expected_str = if expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", expected.join(", "))
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(message)
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(format!("{}{}", message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        if written.is_err() {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::Custom(msg) => msg.to_string(),
            _ => match err.found() {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                _ => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("word '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::HexColor(c) => format!("color {}", c),
        Token::Colon => "':'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Comment => "comment".to_string(),
    }
}
