//! Lexical analysis module for the compiler.
//!
//! This module contains the lexer (tokenizer) that converts source lines
//! into a flat stream of tokens for parsing. It handles:
//!
//! - Tokenization of each line using an ordered table of regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Token position tracking (0-based line and column) for error reporting
//!
//! A token never spans two lines, and statements are only terminated by `;`.

pub mod lexer;
pub mod tokens;
