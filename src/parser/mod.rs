//! Parser module for building the resolved program tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a `Program`. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Function declarations and their signatures
//! - Statement parsing (variable declarations, mutations, calls, control flow)
//! - Expression parsing (binary ops, `!`, function calls, literals)
//! - Name resolution against the scope chain while parsing
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
