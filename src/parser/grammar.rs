//! Single-lookahead parser turning the token stream into a `Template`
//!
//! The grammar is flat: literal text interleaved with `{{ path }}`
//! placeholders. Segments and jobs are pushed so that the interleaving
//! invariant (`segments.len() == jobs.len() + 1`) holds by construction.

use crate::error::{LexError, Location, ParseError, Span};
use crate::parser::ast::{Directive, Template};
use crate::parser::lexer::{Lexer, Token, TokenKind};

/// Token source with single-token pushback
struct Tokens<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Result<Token, LexError>>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Tokens {
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    fn next(&mut self) -> Result<Token, LexError> {
        match self.peeked.take() {
            Some(t) => t,
            // The lexer always terminates with Eof or an error, so the
            // stream cannot run dry mid-parse.
            None => self.lexer.next().unwrap_or_else(|| {
                Ok(Token {
                    kind: TokenKind::Eof,
                    span: 0..0,
                })
            }),
        }
    }

    fn peek(&mut self) -> &Result<Token, LexError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.next());
        }
        self.peeked.as_ref().unwrap()
    }
}

/// Parse template source into an ordered (segments, jobs) interleaving.
pub fn parse(input: &str) -> Result<Template, ParseError> {
    let mut tokens = Tokens::new(input);

    let mut segments: Vec<String> = Vec::new();
    let mut jobs: Vec<Directive> = Vec::new();
    let mut current = String::new();

    loop {
        let tok = tokens.next()?;
        match tok.kind {
            TokenKind::Text(text) => current.push_str(&text),
            TokenKind::OpenMarker => {
                // Finalize the segment before the placeholder, even if empty
                segments.push(std::mem::take(&mut current));
                let open_start = tok.span.start;

                // Reject `{{}}` before consuming the expression body so the
                // error points at the whole placeholder
                if matches!(tokens.peek(), Ok(t) if t.kind == TokenKind::CloseMarker) {
                    let close = tokens.next()?;
                    return Err(empty_directive(input, open_start..close.span.end));
                }

                let job = parse_directive(input, &mut tokens, open_start)?;
                jobs.push(job);
            }
            TokenKind::Eof => {
                segments.push(current);
                break;
            }
            TokenKind::CloseMarker | TokenKind::Field(_) => {
                return Err(unexpected(input, &tok, "literal text or '{{'"));
            }
        }
    }

    Ok(Template::from_parts(segments, jobs))
}

/// Expr state: accumulate field runs until the close marker.
fn parse_directive(
    input: &str,
    tokens: &mut Tokens<'_>,
    open_start: usize,
) -> Result<Directive, ParseError> {
    let mut accum = String::new();

    loop {
        let tok = tokens.next()?;
        match tok.kind {
            TokenKind::Field(text) => accum.push_str(&text),
            TokenKind::CloseMarker => {
                let span = open_start..tok.span.end;
                let path = split_path(&accum)
                    .ok_or_else(|| empty_directive(input, span.clone()))?;
                return Ok(Directive::new(path, span));
            }
            // The lexer reports unterminated placeholders itself, so Eof or
            // stray markers here mean the token contract was violated.
            TokenKind::Eof | TokenKind::Text(_) | TokenKind::OpenMarker => {
                return Err(unexpected(input, &tok, "a directive path or '}}'"));
            }
        }
    }
}

/// Split an accumulated placeholder body into trimmed path components.
/// Returns None when the body is empty or any component is blank.
fn split_path(accum: &str) -> Option<Vec<String>> {
    let body = accum.trim();
    if body.is_empty() {
        return None;
    }
    let components: Vec<String> = body.split('.').map(|c| c.trim().to_string()).collect();
    if components.iter().any(|c| c.is_empty()) {
        return None;
    }
    Some(components)
}

fn empty_directive(input: &str, span: Span) -> ParseError {
    ParseError::EmptyDirective {
        location: Location::of(input, span.start),
        span,
    }
}

fn unexpected(input: &str, tok: &Token, expected: &str) -> ParseError {
    ParseError::Syntax {
        span: tok.span.clone(),
        location: Location::of(input, tok.span.start),
        message: format!("unexpected {:?}, expected {}", tok.kind, expected),
    }
}
