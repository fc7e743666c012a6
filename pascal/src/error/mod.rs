//! Error types and reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias for the front end
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error raised while turning source text into a [`crate::ast::Program`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("lexical error at {span}: unexpected character {ch:?}")]
    Lexical { ch: char, span: Span },

    #[error("syntax error at {span}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        span: Span,
    },
}

impl ParseError {
    pub fn lexical(ch: char, span: Span) -> Self {
        Self::Lexical { ch, span }
    }

    pub fn syntax(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Lexical { span, .. } | Self::Syntax { span, .. } => *span,
        }
    }

    /// Short label for the offending location, without the position prefix
    pub fn message(&self) -> String {
        match self {
            Self::Lexical { ch, .. } => format!("unexpected character {ch:?}"),
            Self::Syntax {
                expected, found, ..
            } => format!("expected {expected}, found {found}"),
        }
    }
}

/// Any failure of [`crate::interpret`]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Parse(e) => Some(e.span()),
            Self::Runtime(_) => None,
        }
    }
}

/// Render `error` to stderr with ariadne
pub fn report_error(filename: &str, source: &str, error: &Error) -> std::io::Result<()> {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        Error::Parse(ParseError::Lexical { .. }) => "Lexical",
        Error::Parse(ParseError::Syntax { .. }) => "Syntax",
        Error::Runtime(_) => "Runtime",
    };

    match error {
        Error::Parse(parse_error) => {
            let mut range: std::ops::Range<usize> = parse_error.span().into();
            // ariadne needs a non-empty range to draw a label
            range.end = range.end.max(range.start + 1);
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message(format!("{kind} error"))
                .with_label(
                    Label::new((filename, range))
                        .with_message(parse_error.message())
                        .with_color(Color::Red),
                )
                .finish()
                .eprint((filename, Source::from(source)))
        }
        Error::Runtime(runtime_error) => Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {runtime_error}"))
            .finish()
            .eprint((filename, Source::from(source))),
    }
}
