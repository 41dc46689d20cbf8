//! Tokenizer for template references in profile lines

mod grammar;
pub mod lexer;

pub use grammar::{pieces, Piece, Pieces};
