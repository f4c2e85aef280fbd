//! Parser implementation for building the resolved program tree.
//!
//! This module contains the main Parser struct and the parsing entry points.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and a statement lookup table for statements.
//!
//! Names are resolved against the scope chain while parsing. Anything that
//! is not visible yet is recorded in the `DeferredWork` worklists and
//! resolved once the whole file has been read.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::collections::HashMap;

use log::debug;

use crate::{
    ast::ast::{DeclarationRef, Program, Unresolved},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    resolver::resolver::{resolve_deferred, DeferredWork},
    scope::scope::ScopeId,
    Position,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_fn_decl,
};

/// The main parser structure that maintains parsing state.
///
/// Owns the program arena being built and the worklists of references that
/// could not be resolved at the point they were parsed.
pub struct Parser {
    /// The list of tokens to parse
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The program being built
    program: Program,
    /// References to resolve once the whole file is parsed
    deferred: DeferredWork,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            program: Program::new(),
            deferred: DeferredWork::default(),
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> Option<TokenKind> {
        self.current_token().map(|token| token.kind)
    }

    /// Returns the kind of the token `offset` tokens ahead of the current one.
    pub fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|token| token.kind)
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Result<Token, Error> {
        let Some(token) = self.tokens.get(self.pos).cloned() else {
            return Err(self.unexpected("<token>"));
        };
        self.pos += 1;
        Ok(token)
    }

    /// Expects a token of the specified kind and consumes it.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_one_of(&[expected_kind])
    }

    /// Expects a token of any of the specified kinds and consumes it.
    pub fn expect_one_of(&mut self, expected_kinds: &[TokenKind]) -> Result<Token, Error> {
        let matches = self
            .current_token()
            .is_some_and(|token| token.is_one_of_many(expected_kinds));
        if matches {
            return self.advance();
        }

        let expected = expected_kinds
            .iter()
            .map(|kind| format!("'{}'", kind))
            .collect::<Vec<String>>()
            .join(", ");
        Err(self.unexpected(&expected))
    }

    /// Builds the error for the current token (or the end of input) not
    /// being what the grammar expects here.
    pub fn unexpected(&self, expected: &str) -> Error {
        match self.current_token() {
            Some(token) => Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.to_string(),
                    expected: expected.to_string(),
                },
                token.position,
            ),
            None => {
                let error = ErrorImpl::UnexpectedEndOfInput {
                    expected: expected.to_string(),
                };
                match self.tokens.last() {
                    Some(last) => Error::new(error, last.position),
                    None => Error::without_position(error),
                }
            }
        }
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.pos < self.tokens.len()
    }

    /// Position of the current token, or of the last token at end of input.
    pub fn get_position(&self) -> Position {
        self.current_token()
            .or(self.tokens.last())
            .map(|token| token.position)
            .unwrap_or_default()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }

    pub fn deferred_mut(&mut self) -> &mut DeferredWork {
        &mut self.deferred
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// A token may be both a NUD and a LED (`(` groups and calls), so this
    /// leaves the binding power table alone.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Looks a name up as a variable, then as a function. A name that is not
    /// visible yet becomes a pending reference to the given scope.
    pub fn resolve_value(&self, scope: ScopeId, name: &str, position: Position) -> DeclarationRef {
        let scopes = self.program.scopes();

        scopes
            .search_variable_declaration(scope, name)
            .or_else(|| scopes.search_function_declaration(scope, name))
            .map(|entry| DeclarationRef::Resolved(entry.declaration))
            .unwrap_or_else(|| pending(name, scope, position))
    }

    pub fn resolve_variable(&self, scope: ScopeId, name: &str, position: Position) -> DeclarationRef {
        self.program
            .scopes()
            .search_variable_declaration(scope, name)
            .map(|entry| DeclarationRef::Resolved(entry.declaration))
            .unwrap_or_else(|| pending(name, scope, position))
    }

    pub fn resolve_type(&self, scope: ScopeId, name: &str, position: Position) -> DeclarationRef {
        self.program
            .scopes()
            .search_type_declaration(scope, name)
            .map(|entry| DeclarationRef::Resolved(entry.declaration))
            .unwrap_or_else(|| pending(name, scope, position))
    }
}

fn pending(name: &str, scope: ScopeId, position: Position) -> DeclarationRef {
    DeclarationRef::Pending(Unresolved {
        name: name.to_string(),
        scope,
        position,
    })
}

/// Parses a token stream into a program without running deferred
/// resolution. The returned worklists still hold every pending reference.
pub fn parse_file(tokens: Vec<Token>) -> Result<(Program, DeferredWork), Error> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);

    let file_scope = parser.program().file_scope();

    while parser.has_tokens() {
        if parser.current_token_kind() != Some(TokenKind::Func) {
            return Err(parser.unexpected("'func'"));
        }

        let declaration = parse_fn_decl(&mut parser, file_scope)?;
        parser.program_mut().push_top_level(declaration);
    }

    debug!(
        "parsed {} functions, {} pending fields, {} pending identifiers, {} pending statements",
        parser.program.top_level_declarations().len(),
        parser.deferred.fields.len(),
        parser.deferred.identifiers.len(),
        parser.deferred.statements.len()
    );

    Ok((parser.program, parser.deferred))
}

/// Parses a token stream into a fully resolved program.
///
/// This is the main entry point for parsing. No partially built program is
/// returned on failure.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Error> {
    let (mut program, deferred) = parse_file(tokens)?;
    resolve_deferred(&mut program, deferred)?;
    Ok(program)
}
