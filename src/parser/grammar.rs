//! Splits a profile line into literal text and `${KEY}` references
//!
//! The rules mirror a split on `$`: the text before the first `$` is literal,
//! and every fragment after a `$` must open with `{` and hold a `}` before the
//! next `$`. The key is the text up to that first `}`; whatever follows it in
//! the same fragment is literal again, braces included.

use std::iter::Peekable;

use crate::error::{ExpandError, Span};

use super::lexer::{lex, Token, Tokens};

/// One piece of a tokenized line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Text copied to the output as is
    Literal(&'a str),
    /// A `${KEY}` reference
    Reference {
        key: &'a str,
        /// Span of the whole `${KEY}` form
        span: Span,
    },
}

impl<'a> Piece<'a> {
    /// The key if this piece is a reference
    pub fn key(&self) -> Option<&'a str> {
        match self {
            Piece::Reference { key, .. } => Some(*key),
            Piece::Literal(_) => None,
        }
    }
}

/// Tokenize `line` into pieces.
///
/// Pieces are produced lazily, left to right. A `$` that is not followed by a
/// complete `{...}` within its fragment yields
/// [`ExpandError::UnterminatedReference`] and ends the iteration; the span of
/// that error runs from the `$` to the next `$` or the end of the line.
pub fn pieces(line: &str) -> Pieces<'_> {
    Pieces {
        line,
        tokens: lex(line).peekable(),
        literal_start: 0,
        pending: None,
        done: false,
    }
}

/// Iterator returned by [`pieces`]
pub struct Pieces<'a> {
    line: &'a str,
    tokens: Peekable<Tokens<'a>>,
    literal_start: usize,
    pending: Option<Piece<'a>>,
    done: bool,
}

impl<'a> Pieces<'a> {
    /// Parse the `{KEY}` following the `$` at `dollar`
    fn reference(&mut self, dollar: Span) -> Result<Piece<'a>, ExpandError> {
        let line = self.line;

        match self.tokens.next() {
            Some((Token::BraceOpen, _)) => {}
            Some((Token::Dollar, next)) => {
                return Err(ExpandError::unterminated(line, dollar.start..next.start));
            }
            Some(_) => {
                let end = fragment_end(line, dollar.start);
                return Err(ExpandError::unterminated(line, dollar.start..end));
            }
            None => return Err(ExpandError::unterminated(line, dollar.start..line.len())),
        }

        let key_start = dollar.end + 1;
        let mut close = None;
        while let Some((token, span)) = self.tokens.peek().cloned() {
            match token {
                Token::Dollar => break,
                Token::BraceClose => {
                    close = Some(span);
                    self.tokens.next();
                    break;
                }
                _ => {
                    self.tokens.next();
                }
            }
        }

        let Some(close) = close else {
            let end = fragment_end(line, dollar.start);
            return Err(ExpandError::unterminated(line, dollar.start..end));
        };

        // Text after the `}` is literal up to the next `$`, braces included,
        // rather than split again on `{` and `}`.
        self.literal_start = close.end;
        Ok(Piece::Reference {
            key: &line[key_start..close.start],
            span: dollar.start..close.end,
        })
    }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Result<Piece<'a>, ExpandError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(piece) = self.pending.take() {
            return Some(Ok(piece));
        }
        if self.done {
            return None;
        }

        let line = self.line;
        while let Some((token, span)) = self.tokens.next() {
            if token != Token::Dollar {
                continue;
            }

            let literal_start = self.literal_start;
            let reference = match self.reference(span.clone()) {
                Ok(reference) => reference,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            if literal_start < span.start {
                self.pending = Some(reference);
                return Some(Ok(Piece::Literal(&line[literal_start..span.start])));
            }
            return Some(Ok(reference));
        }

        self.done = true;
        // Trailing text after the last reference, kept verbatim
        (self.literal_start < line.len()).then(|| Ok(Piece::Literal(&line[self.literal_start..])))
    }
}

impl std::iter::FusedIterator for Pieces<'_> {}

/// End of the fragment that starts at the `$` at `dollar`
fn fragment_end(line: &str, dollar: usize) -> usize {
    line[dollar + 1..]
        .find('$')
        .map(|i| dollar + 1 + i)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(line: &str) -> Result<Vec<Piece<'_>>, ExpandError> {
        pieces(line).collect()
    }

    fn refs(line: &str) -> Vec<&str> {
        collect(line)
            .expect("Should tokenize")
            .iter()
            .filter_map(Piece::key)
            .collect()
    }

    #[test]
    fn test_no_dollar() {
        assert_eq!(
            collect("noblacklist /tmp").unwrap(),
            vec![Piece::Literal("noblacklist /tmp")]
        );
        assert!(collect("").unwrap().is_empty());
    }

    #[test]
    fn test_single_reference() {
        assert_eq!(
            collect("cp ${DIR}/file dest").unwrap(),
            vec![
                Piece::Literal("cp "),
                Piece::Reference {
                    key: "DIR",
                    span: 3..9
                },
                Piece::Literal("/file dest"),
            ]
        );
    }

    #[test]
    fn test_leading_reference_is_tokenized() {
        assert_eq!(
            collect("${HOME}/x").unwrap(),
            vec![
                Piece::Reference {
                    key: "HOME",
                    span: 0..7
                },
                Piece::Literal("/x"),
            ]
        );
    }

    #[test]
    fn test_adjacent_references() {
        assert_eq!(refs("a${B}${C}d"), vec!["B", "C"]);
    }

    #[test]
    fn test_trailing_braces_are_literal() {
        assert_eq!(
            collect("a${B}}x{y").unwrap(),
            vec![
                Piece::Literal("a"),
                Piece::Reference {
                    key: "B",
                    span: 1..5
                },
                Piece::Literal("}x{y"),
            ]
        );
    }

    #[test]
    fn test_key_is_text_up_to_first_close() {
        assert_eq!(refs("a${{B}"), vec!["{B"]);
        assert_eq!(refs("a${}b"), vec![""]);
    }

    #[test]
    fn test_unterminated_without_close() {
        let err = collect("a${b").unwrap_err();
        assert_eq!(err, ExpandError::unterminated("a${b", 1..4));
    }

    #[test]
    fn test_unterminated_close_after_next_dollar() {
        let err = collect("a${b $c}").unwrap_err();
        assert_eq!(err, ExpandError::unterminated("a${b $c}", 1..5));
    }

    #[test]
    fn test_bare_dollar() {
        assert_eq!(
            collect("a$b c").unwrap_err(),
            ExpandError::unterminated("a$b c", 1..5)
        );
        assert_eq!(
            collect("price 5$").unwrap_err(),
            ExpandError::unterminated("price 5$", 7..8)
        );
        assert_eq!(
            collect("a$${B}").unwrap_err(),
            ExpandError::unterminated("a$${B}", 1..2)
        );
    }

    #[test]
    fn test_brace_not_first_in_fragment() {
        assert_eq!(
            collect("a$ {B}").unwrap_err(),
            ExpandError::unterminated("a$ {B}", 1..6)
        );
    }

    #[test]
    fn test_pieces_are_lazy() {
        let mut iter = pieces("a${B} $");
        assert_eq!(iter.next(), Some(Ok(Piece::Literal("a"))));
        assert_eq!(
            iter.next(),
            Some(Ok(Piece::Reference {
                key: "B",
                span: 1..5
            }))
        );
        assert_eq!(
            iter.next(),
            Some(Err(ExpandError::unterminated("a${B} $", 6..7)))
        );
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
