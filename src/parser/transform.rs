//! Transform grammar using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::layout::Point;

use super::lexer::{lex, Token};
use super::TransformError;

/// A `translate(x, y)` position transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translate {
    pub x: f64,
    pub y: f64,
}

impl Translate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift this translation by an offset
    pub fn offset_by(&self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    /// Attribute text for this transform, e.g. `translate(15,20.5)`
    pub fn to_attribute(&self) -> String {
        format!("translate({},{})", self.x, self.y)
    }
}

impl Default for Translate {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Parse a transform attribute that must be a single two-number translate
pub fn parse_translate(input: &str) -> Result<Translate, TransformError> {
    let len = input.len();
    let tokens = lex(input)?;

    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream =
        Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    translate_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(e) => e.into(),
            None => TransformError::new(0..len, "invalid transform", Vec::new()),
        })
}

fn translate_parser<'a, I>() -> impl Parser<'a, I, Translate, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let number = select! {
        Token::Number(n) => n,
    };

    // SVG separates arguments with whitespace, a comma, or both
    let arguments = number
        .clone()
        .then_ignore(just(Token::Comma).or_not())
        .then(number)
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    just(Token::Translate)
        .ignore_then(arguments)
        .map(|(x, y)| Translate::new(x, y))
        .then_ignore(end())
}

impl<'a> From<Rich<'a, Token>> for TransformError {
    fn from(err: Rich<'a, Token>) -> Self {
        let message = match err.found() {
            Some(tok) => format!("unexpected {}", tok),
            None => "unexpected end of transform".to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(describe(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                _ => None,
            })
            .collect();

        TransformError::new(err.span().into_range(), message, expected)
    }
}

fn describe(tok: &Token) -> String {
    tok.to_string()
}
