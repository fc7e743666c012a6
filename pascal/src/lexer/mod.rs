//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{ParseError, Result};
use logos::Logos;

/// Lazy token stream over a source text.
///
/// Yields `(Token, Span)` pairs and always finishes with [`Token::Eof`]. After
/// the first error the stream is exhausted; create a new `Lexer` to start over.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, Token>,
    source_len: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            inner: Token::lexer(source),
            source_len: source.len(),
            finished: false,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<(Token, Span)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(token)) => Some(Ok((token, Span::from(self.inner.span())))),
            Some(Err(())) => {
                self.finished = true;
                let span = Span::from(self.inner.span());
                let ch = self.inner.slice().chars().next().unwrap_or('\0');
                Some(Err(ParseError::lexical(ch, span)))
            }
            None => {
                self.finished = true;
                Some(Ok((Token::Eof, Span::point(self.source_len))))
            }
        }
    }
}

/// Tokenize the whole source eagerly; the last token is always `Eof`
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    Lexer::new(source).collect()
}
