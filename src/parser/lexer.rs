//! Lexer for SVG transform attributes using logos

use std::fmt;

use logos::Logos;

use crate::error::Span;

use super::TransformError;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    #[token("translate")]
    Translate,

    // Any other transform function: matrix, rotate, scale, skewX, ...
    #[regex(r"[a-zA-Z][a-zA-Z0-9]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[-+]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][-+]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Translate => write!(f, "'translate'"),
            Token::Ident(s) => write!(f, "function '{}'", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::ParenOpen => write!(f, "'('"),
            Token::ParenClose => write!(f, "')'"),
            Token::Comma => write!(f, "','"),
        }
    }
}

/// Lex a transform attribute into tokens with spans
///
/// Unlike a lenient lexer this stops at the first character that cannot
/// start a token, so stray input is reported instead of silently dropped.
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, TransformError> {
    let mut tokens = Vec::new();
    for (tok, span) in Token::lexer(input).spanned() {
        match tok {
            Ok(t) => tokens.push((t, span)),
            Err(()) => {
                let found = input[span.clone()].to_string();
                return Err(TransformError::new(
                    span,
                    format!("unexpected character '{}'", found),
                    Vec::new(),
                ));
            }
        }
    }
    Ok(tokens)
}
