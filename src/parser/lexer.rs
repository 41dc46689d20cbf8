//! Lexer for profile lines using logos

use logos::Logos;

use crate::error::Span;

/// Tokens of a profile line as seen by template expansion.
///
/// Every byte of the input belongs to exactly one token, so the lexer never
/// produces errors and spans tile the whole line.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[token("$")]
    Dollar,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[regex(r"[^${}]+")]
    Text,
}

/// Spanned tokens of one line
pub struct Tokens<'a> {
    inner: logos::SpannedIter<'a, Token>,
}

impl Iterator for Tokens<'_> {
    type Item = (Token, Span);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (tok, span) = self.inner.next()?;
            if let Ok(tok) = tok {
                return Some((tok, span));
            }
        }
    }
}

/// Lex a line into tokens with spans
pub fn lex(input: &str) -> Tokens<'_> {
    Tokens {
        inner: Token::lexer(input).spanned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_is_one_token() {
        let tokens: Vec<_> = lex("whitelist /tmp/foo").collect();
        assert_eq!(tokens, vec![(Token::Text, 0..18)]);
    }

    #[test]
    fn test_reference() {
        let tokens: Vec<_> = lex("a${B}c").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Text,
                Token::Dollar,
                Token::BraceOpen,
                Token::Text,
                Token::BraceClose,
                Token::Text,
            ]
        );
    }

    #[test]
    fn test_adjacent_delimiters() {
        let tokens: Vec<_> = lex("$${}}").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Dollar,
                Token::Dollar,
                Token::BraceOpen,
                Token::BraceClose,
                Token::BraceClose,
            ]
        );
    }

    #[test]
    fn test_spans_cover_multibyte_text() {
        let line = "dé${X}";
        let spans: Vec<_> = lex(line).map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..3, 3..4, 4..5, 5..6, 6..7]);
    }

    #[test]
    fn test_whitespace_is_text() {
        let tokens: Vec<_> = lex(" \t ").collect();
        assert_eq!(tokens, vec![(Token::Text, 0..3)]);
    }
}
