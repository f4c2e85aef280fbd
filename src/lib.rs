#![allow(clippy::module_inception)]

use std::fmt::Display;

use log::debug;

use crate::{
    ast::ast::{DeclId, Program},
    errors::errors::{Error, ErrorTip},
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;
pub mod scope;
pub mod type_checker;

extern crate regex;

/// A 0-based location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    /// User friendly line number (starting at 1)
    pub fn uf_line(&self) -> usize {
        self.line + 1
    }

    /// User friendly column number (starting at 1)
    pub fn uf_column(&self) -> usize {
        self.column + 1
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.uf_line(), self.uf_column())
    }
}

/// The result of a successful compilation: the resolved, type-checked program
/// and the declaration of its `main` function.
#[derive(Debug)]
pub struct CheckedProgram {
    pub program: Program,
    pub entry_point: DeclId,
}

/// Runs the whole front end: tokenizing, parsing (including deferred
/// resolution) and semantic analysis. Stops at the first error.
pub fn compile(source: &str) -> Result<CheckedProgram, Error> {
    let tokens = lexer::lexer::tokenize(source)?;
    debug!("tokenized {} tokens", tokens.len());

    let program = parser::parser::parse(tokens)?;
    debug!(
        "parsed {} top-level declarations",
        program.top_level_declarations().len()
    );

    let entry_point = type_checker::type_checker::analyze(&program)?;

    Ok(CheckedProgram {
        program,
        entry_point,
    })
}

/// Returns the text of the given 0-based line, without its line terminator.
pub fn get_line_at_position(source: &str, line: usize) -> Option<&str> {
    source
        .lines()
        .nth(line)
        .map(|text| text.trim_end_matches('\r'))
}

/// Formats an error against the source it was produced from.
///
/// ```text
/// Error: TypeMismatch (Expected type `Int`, received `String`)
/// -> line 3 column 2
///   |
/// 3 | a = "abc";
///   | ^
/// ```
pub fn render_error(error: &Error, source: &str) -> String {
    let mut rendered = String::new();

    if let ErrorTip::None = error.get_tip() {
        rendered.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        rendered.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    rendered.push_str(&format!("{}\n", error));

    let Some(position) = error.get_position() else {
        return rendered;
    };
    let Some(line_text) = get_line_at_position(source, position.line) else {
        return rendered;
    };

    let line_string = position.uf_line().to_string();
    let padding = line_string.len() + 2;

    rendered.push_str(&format!("-> {}\n", position));
    rendered.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    rendered.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = position.column.saturating_sub(removed_whitespace) + 1;
    rendered.push_str(&format!("{:>padding$} {:>arrows$}\n", "|", "^"));

    rendered
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
