//! Type reference parsing.
//!
//! Types are written as a bare identifier. A type name is resolved against
//! the scope it is written in; unknown names stay pending until deferred
//! resolution. This module also parses the parameter and return-type lists
//! of function signatures into fields.

use crate::{
    ast::ast::{Declaration, DeclarationRef, Field, VariableDeclaration},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    scope::scope::ScopeId,
    Position,
};

use super::parser::Parser;

/// Parses a type name and resolves it in `scope`.
pub fn parse_type(parser: &mut Parser, scope: ScopeId) -> Result<(DeclarationRef, Position), Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    let name = token.as_identifier()?;

    Ok((parser.resolve_type(scope, name, token.position), token.position))
}

/// Creates the variable declaration behind a field, queueing its type for
/// deferred resolution when the type is not known yet.
fn make_field(
    parser: &mut Parser,
    name: Option<String>,
    type_declaration: DeclarationRef,
    position: Position,
) -> Field {
    let pending = type_declaration.is_pending();

    let variable = parser
        .program_mut()
        .add_declaration(Declaration::Variable(VariableDeclaration {
            name: name.clone(),
            position,
            type_declaration,
        }));

    if pending {
        parser.deferred_mut().fields.push(variable);
    }

    Field { name, variable }
}

/// Parses `(name Type, ...)` and declares every parameter in `scope`.
pub fn parse_parameters(parser: &mut Parser, scope: ScopeId) -> Result<Vec<Field>, Error> {
    parser.expect(TokenKind::LeftParenthesis)?;

    let mut parameters = vec![];

    while parser.current_token_kind() != Some(TokenKind::RightParenthesis) {
        if !parameters.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        let name_token = parser.expect(TokenKind::Identifier)?;
        let name = name_token.as_identifier()?.to_string();
        let (type_declaration, _) = parse_type(parser, scope)?;

        let field = make_field(parser, Some(name.clone()), type_declaration, name_token.position);
        parser.program_mut().scopes_mut().declare_variable(
            scope,
            &name,
            field.variable,
            name_token.position,
        )?;

        parameters.push(field);
    }

    parser.expect(TokenKind::RightParenthesis)?;

    Ok(parameters)
}

/// Parses the return types of a signature: nothing, a single type name, or
/// a parenthesized comma separated list.
pub fn parse_return_types(parser: &mut Parser, scope: ScopeId) -> Result<Vec<Field>, Error> {
    let mut return_types = vec![];

    match parser.current_token_kind() {
        Some(TokenKind::Identifier) => {
            let (type_declaration, position) = parse_type(parser, scope)?;
            return_types.push(make_field(parser, None, type_declaration, position));
        }
        Some(TokenKind::LeftParenthesis) => {
            parser.advance()?;

            while parser.current_token_kind() != Some(TokenKind::RightParenthesis) {
                if !return_types.is_empty() {
                    parser.expect(TokenKind::Comma)?;
                }

                let (type_declaration, position) = parse_type(parser, scope)?;
                return_types.push(make_field(parser, None, type_declaration, position));
            }

            parser.expect(TokenKind::RightParenthesis)?;
        }
        _ => {}
    }

    Ok(return_types)
}
