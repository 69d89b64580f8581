//! Error types for template lexing and parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in template source text
pub type Span = std::ops::Range<usize>;

/// Line/column position in template source, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl Location {
    /// Compute the line/column of a byte offset within `source`.
    pub fn of(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let prefix = &source[..offset];
        let line = prefix.matches('\n').count() + 1;
        let col = match prefix.rfind('\n') {
            Some(nl) => offset - nl,
            None => offset + 1,
        };
        Location { line, col }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, col {}", self.line, self.col)
    }
}

/// Lexical errors inside a placeholder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("invalid character '{ch}' in placeholder at {location}")]
    InvalidChar {
        ch: char,
        span: Span,
        location: Location,
    },

    #[error("unterminated placeholder at {location}: expected '}}}}' before end of input")]
    UnterminatedPlaceholder { span: Span, location: Location },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::InvalidChar { span, .. } => span.clone(),
            LexError::UnterminatedPlaceholder { span, .. } => span.clone(),
        }
    }
}

/// Errors produced while parsing a template into segments and jobs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("empty placeholder at {location}: expected a directive path")]
    EmptyDirective { span: Span, location: Location },

    #[error("parse error at {location}: {message}")]
    Syntax {
        span: Span,
        location: Location,
        message: String,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::EmptyDirective { span, .. } => span.clone(),
            ParseError::Syntax { span, .. } => span.clone(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span();
        let message = self.to_string();

        let mut buf = Vec::new();
        Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }
}
