//! Parser for style definition files using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::*;
use super::lexer::Token;
use crate::error::ParseError;

/// Parse style definition source into a [`StyleSheet`]
pub fn parse(input: &str) -> Result<StyleSheet, Vec<ParseError>> {
    let len = input.len();

    let mut tokens = Vec::new();
    let mut lex_errors = Vec::new();
    for item in super::lexer::lex(input) {
        match item {
            Ok((tok, span)) => tokens.push((tok, SimpleSpan::from(span))),
            Err(span) => lex_errors.push(ParseError::Syntax {
                message: format!("Unrecognized input '{}'", &input[span.clone()]),
                span,
                expected: vec![],
            }),
        }
    }
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }

    let token_stream =
        Stream::from_iter(tokens).map((len..len).into(), |(t, s): (_, _)| (t, s));

    sheet_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn sheet_parser<'a, I>() -> impl Parser<'a, I, StyleSheet, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let segment = select! {
        Token::Ident(s) => s,
    };

    // Dotted key: identifier { "." identifier }
    let key = segment
        .separated_by(just(Token::Dot))
        .at_least(1)
        .collect::<Vec<_>>()
        .map_with(|segments, e| Spanned::new(segments.join("."), span_range(&e.span())));

    let scalar = select! {
        Token::Number(n) => StyleValue::Number(n),
        Token::HexColor(c) => StyleValue::Color(c),
        Token::String(s) => StyleValue::Text(s),
        Token::Ident(s) => StyleValue::Word(s),
    }
    .map_with(|v, e| Spanned::new(v, span_range(&e.span())));

    let values = scalar
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>();

    let entry = key
        .then_ignore(just(Token::Colon))
        .then(values)
        .map(|(key, values)| StyleEntry { key, values });

    entry
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|entries| StyleSheet { entries })
}
