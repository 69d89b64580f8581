//! Hand-written tokenizer for the `{{...}}` placeholder mini-language
//!
//! The template language is text-dominant: everything outside a `{{ }}` pair
//! is opaque literal text, so tokenization is mode-switching rather than a
//! single token grammar. The lexer is a two-state machine driven by the
//! consumer pulling tokens one at a time.

use crate::error::{LexError, Location, Span};

/// Literal opening a placeholder
pub const OPEN_MARKER: &str = "{{";
/// Literal closing a placeholder
pub const CLOSE_MARKER: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of literal template text outside any placeholder
    Text(String),
    /// The `{{` marker
    OpenMarker,
    /// The `}}` marker
    CloseMarker,
    /// A run of placeholder-path characters inside a placeholder
    Field(String),
    /// End of input, emitted exactly once
    Eof,
}

/// A token with its byte span in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Characters permitted inside a placeholder between the markers.
///
/// Covers dotted directive paths (`args.0.ident`) plus the spacing template
/// authors put around them. Notably excludes `}` so close-marker detection
/// stays unambiguous.
fn is_field_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '*' | '/' | ' ' | '\t')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Scanning literal text, looking for the open marker
    Start,
    /// Inside a placeholder, between the markers
    Expr,
    /// Eof or an error has been emitted
    Done,
}

/// Pull-based lexer over template source text.
///
/// Yields `Ok(Token)` items ending with a single `TokenKind::Eof`, or a final
/// `Err(LexError)` after which the stream is fused. Emitted token spans are
/// strictly increasing, non-overlapping, and together cover the input exactly.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    state: State,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            state: State::Start,
        }
    }

    fn location(&self, offset: usize) -> Location {
        Location::of(self.input, offset)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Start state: emit the literal text up to the next open marker (or end
    /// of input), then the marker itself on the following pull.
    fn next_in_start(&mut self) -> Token {
        let start = self.pos;
        match self.rest().find(OPEN_MARKER) {
            Some(offset) => {
                if offset > 0 {
                    self.pos += offset;
                    return Token::new(
                        TokenKind::Text(self.input[start..self.pos].to_string()),
                        start..self.pos,
                    );
                }
                self.pos += OPEN_MARKER.len();
                self.state = State::Expr;
                Token::new(TokenKind::OpenMarker, start..self.pos)
            }
            None => {
                if start < self.input.len() {
                    self.pos = self.input.len();
                    return Token::new(
                        TokenKind::Text(self.input[start..].to_string()),
                        start..self.pos,
                    );
                }
                self.state = State::Done;
                Token::new(TokenKind::Eof, start..start)
            }
        }
    }

    /// Expr state: close marker, a maximal field run, or a lexical error.
    fn next_in_expr(&mut self) -> Result<Token, LexError> {
        let start = self.pos;

        if self.rest().starts_with(CLOSE_MARKER) {
            self.pos += CLOSE_MARKER.len();
            self.state = State::Start;
            return Ok(Token::new(TokenKind::CloseMarker, start..self.pos));
        }

        let mut chars = self.rest().chars();
        match chars.next() {
            None => {
                self.state = State::Done;
                Err(LexError::UnterminatedPlaceholder {
                    span: start..start,
                    location: self.location(start),
                })
            }
            Some(c) if is_field_char(c) => {
                // Maximal run; the cursor lands exactly one past the last
                // matching character.
                let run = self
                    .rest()
                    .find(|c: char| !is_field_char(c))
                    .unwrap_or(self.rest().len());
                self.pos += run;
                Ok(Token::new(
                    TokenKind::Field(self.input[start..self.pos].to_string()),
                    start..self.pos,
                ))
            }
            Some(c) => {
                self.state = State::Done;
                Err(LexError::InvalidChar {
                    ch: c,
                    span: start..start + c.len_utf8(),
                    location: self.location(start),
                })
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Start => Some(Ok(self.next_in_start())),
            State::Expr => Some(self.next_in_expr()),
            State::Done => None,
        }
    }
}

/// Lex input into tokens; convenience for tests and diagnostics.
pub fn lex(input: &str) -> Lexer<'_> {
    Lexer::new(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).map(|t| t.unwrap().kind).collect()
    }

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(
            kinds("no placeholders here"),
            vec![
                TokenKind::Text("no placeholders here".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_simple_placeholder() {
        assert_eq!(
            kinds("a {{name}} b"),
            vec![
                TokenKind::Text("a ".to_string()),
                TokenKind::OpenMarker,
                TokenKind::Field("name".to_string()),
                TokenKind::CloseMarker,
                TokenKind::Text(" b".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_placeholder_at_start_has_no_leading_text() {
        assert_eq!(
            kinds("{{name}}!"),
            vec![
                TokenKind::OpenMarker,
                TokenKind::Field("name".to_string()),
                TokenKind::CloseMarker,
                TokenKind::Text("!".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_dotted_path_is_single_field() {
        assert_eq!(
            kinds("{{args.def}}"),
            vec![
                TokenKind::OpenMarker,
                TokenKind::Field("args.def".to_string()),
                TokenKind::CloseMarker,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_adjacent_placeholders() {
        assert_eq!(
            kinds("{{a}}{{b}}"),
            vec![
                TokenKind::OpenMarker,
                TokenKind::Field("a".to_string()),
                TokenKind::CloseMarker,
                TokenKind::OpenMarker,
                TokenKind::Field("b".to_string()),
                TokenKind::CloseMarker,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unterminated_placeholder_is_error() {
        let results: Vec<_> = lex("{{foo").collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(
            results[2],
            Err(LexError::UnterminatedPlaceholder { .. })
        ));
    }

    #[test]
    fn test_invalid_char_stops_stream() {
        let results: Vec<_> = lex("{{a(b)}}").collect();
        // OpenMarker, Field("a"), then the error; nothing after
        assert_eq!(results.len(), 3);
        match &results[2] {
            Err(LexError::InvalidChar { ch, .. }) => assert_eq!(*ch, '('),
            other => panic!("expected InvalidChar, got {:?}", other),
        }
    }

    #[test]
    fn test_close_marker_wins_over_field_run() {
        // `}` is not a field char, so the run stops before the close marker
        assert_eq!(
            kinds("{{x}}"),
            vec![
                TokenKind::OpenMarker,
                TokenKind::Field("x".to_string()),
                TokenKind::CloseMarker,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_span_coverage_reconstructs_input() {
        let input = "head {{args.ident}} mid {{response.0}} tail";
        let mut rebuilt = String::new();
        let mut last_end = 0;
        for tok in lex(input) {
            let tok = tok.unwrap();
            assert_eq!(tok.span.start, last_end, "spans must be contiguous");
            last_end = tok.span.end;
            rebuilt.push_str(&input[tok.span.clone()]);
        }
        assert_eq!(last_end, input.len());
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn test_eof_emitted_exactly_once() {
        let eofs = lex("x {{name}} y")
            .filter(|t| matches!(t, Ok(Token { kind: TokenKind::Eof, .. })))
            .count();
        assert_eq!(eofs, 1);
        // Stream is fused after Eof
        let mut l = lex("");
        assert!(l.next().is_some());
        assert!(l.next().is_none());
    }

    #[test]
    fn test_spaces_allowed_inside_placeholder() {
        assert_eq!(
            kinds("{{ name }}"),
            vec![
                TokenKind::OpenMarker,
                TokenKind::Field(" name ".to_string()),
                TokenKind::CloseMarker,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_error_location_is_line_and_column() {
        let results: Vec<_> = lex("line one\n{{b@d}}").collect();
        match results.last().unwrap() {
            Err(LexError::InvalidChar { ch, location, .. }) => {
                assert_eq!(*ch, '@');
                assert_eq!(location.line, 2);
            }
            other => panic!("expected InvalidChar, got {:?}", other),
        }
    }
}
