//! Lexer for style definition files using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Words may contain dashes so that values like `sans-serif` stay whole
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    String(String),

    #[regex(r"-?([0-9]+(\.[0-9]*)?|\.[0-9]+)", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"#[0-9a-fA-F]{3,8}", |lex| lex.slice().to_string())]
    HexColor(String),

    // A comment is '#' followed by whitespace, another marker character, or nothing
    #[regex(r"#([ \t#!=\-][^\n]*)?", logos::skip)]
    Comment,
}

/// Lex input into tokens with spans, keeping the spans of unrecognised input
pub fn lex(input: &str) -> impl Iterator<Item = Result<(Token, Span), Span>> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| tok.map(|t| (t, span.clone())).map_err(|_| span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).filter_map(|r| r.ok()).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_entry_tokens() {
        assert_eq!(
            tokens("lines.linewidth : 1.5"),
            vec![
                Token::Ident("lines".to_string()),
                Token::Dot,
                Token::Ident("linewidth".to_string()),
                Token::Colon,
                Token::Number(1.5),
            ]
        );
    }

    #[test]
    fn test_hex_color_is_not_a_comment() {
        assert_eq!(
            tokens("axes.facecolor: #eeeeee # light gray"),
            vec![
                Token::Ident("axes".to_string()),
                Token::Dot,
                Token::Ident("facecolor".to_string()),
                Token::Colon,
                Token::HexColor("#eeeeee".to_string()),
            ]
        );
    }

    #[test]
    fn test_dashed_words_and_strings() {
        assert_eq!(
            tokens(r#"sans-serif, "DejaVu Sans", 'Arial'"#),
            vec![
                Token::Ident("sans-serif".to_string()),
                Token::Comma,
                Token::String("DejaVu Sans".to_string()),
                Token::Comma,
                Token::String("Arial".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("-0.5 .25 3"),
            vec![Token::Number(-0.5), Token::Number(0.25), Token::Number(3.0)]
        );
    }

    #[test]
    fn test_comment_lines_skipped() {
        assert_eq!(tokens("# header\n#\n## section\n"), vec![]);
    }

    #[test]
    fn test_unrecognised_input_reports_span() {
        let errors: Vec<Span> = lex("a : 1 $").filter_map(|r| r.err()).collect();
        assert_eq!(errors, vec![6..7]);
    }
}
