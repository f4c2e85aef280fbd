use crate::{
    ast::{
        ast::{
            DeclId, Declaration, FunctionDeclaration, FunctionDefinition, StmtId,
            VariableDeclaration, FUNCTION_SYMBOL_PREFIX,
        },
        statements::{Block, Statement, StatementKind},
        types::FunctionType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    scope::scope::{ScopeId, ScopeKind},
};

use super::{
    parser::Parser,
    types::{parse_parameters, parse_return_types, parse_type},
};

pub fn parse_stmt(parser: &mut Parser, scope: ScopeId) -> Result<(StmtId, ScopeId), Error> {
    let handler = parser
        .current_token_kind()
        .and_then(|kind| parser.get_stmt_lookup().get(&kind).copied());

    match handler {
        Some(handler) => handler(parser, scope),
        None => Err(parser.unexpected("<statement>")),
    }
}

/// Parses statements up to (not including) the closing `}`. Each statement
/// is parsed in the scope left behind by the one before it.
pub fn parse_statement_list(parser: &mut Parser, scope: ScopeId) -> Result<Vec<StmtId>, Error> {
    let mut scope = scope;
    let mut statements: Vec<StmtId> = vec![];

    while parser.current_token_kind() != Some(TokenKind::RightBrace) {
        if !parser.has_tokens() {
            return Err(parser.unexpected("'}'"));
        }

        if let Some(last) = statements.last() {
            if parser.program().statement(*last).is_return() {
                return Err(Error::new(ErrorImpl::ReturnNotLast, parser.get_position()));
            }
        }

        let (statement, next_scope) = parse_stmt(parser, scope)?;
        statements.push(statement);
        scope = next_scope;
    }

    Ok(statements)
}

/// Parses `{ statements }` in a new block scope below `scope`.
pub fn parse_block(parser: &mut Parser, scope: ScopeId) -> Result<Block, Error> {
    let block_scope = parser
        .program_mut()
        .scopes_mut()
        .new_scope(ScopeKind::Block, scope);

    parser.expect(TokenKind::LeftBrace)?;
    let statements = parse_statement_list(parser, block_scope)?;
    parser.expect(TokenKind::RightBrace)?;

    Ok(Block {
        statements,
        scope: block_scope,
    })
}

/// Parses `func name(params) returnTypes { statements }` and declares the
/// function in `scope` before its body is parsed, so it can call itself.
pub fn parse_fn_decl(parser: &mut Parser, scope: ScopeId) -> Result<DeclId, Error> {
    let start = parser.expect(TokenKind::Func)?;

    parse_fn_decl_after_keyword(parser, scope).map_err(|error| {
        error.with_context(format!(
            "could not parse function declaration at {}",
            start.position
        ))
    })
}

fn parse_fn_decl_after_keyword(parser: &mut Parser, scope: ScopeId) -> Result<DeclId, Error> {
    let name_token = parser.expect(TokenKind::Identifier)?;
    let name = name_token.as_identifier()?.to_string();

    let function_scope = parser
        .program_mut()
        .scopes_mut()
        .new_scope(ScopeKind::Function, scope);

    let parameters = parse_parameters(parser, function_scope)?;
    let return_types = parse_return_types(parser, function_scope)?;

    let declaration = parser
        .program_mut()
        .add_declaration(Declaration::Function(FunctionDeclaration {
            symbol_name: format!("{}{}", FUNCTION_SYMBOL_PREFIX, name),
            name: name.clone(),
            position: name_token.position,
            definition: FunctionDefinition {
                function_type: FunctionType {
                    parameters,
                    return_types,
                },
                statements: vec![],
                scope: function_scope,
            },
        }));
    parser.program_mut().scopes_mut().declare_function(
        scope,
        &name,
        declaration,
        name_token.position,
    )?;

    parser.expect(TokenKind::LeftBrace)?;
    let statements = parse_statement_list(parser, function_scope)?;
    parser.expect(TokenKind::RightBrace)?;

    if let Declaration::Function(function) = parser.program_mut().declaration_mut(declaration) {
        function.definition.statements = statements;
    }

    Ok(declaration)
}

/// `var name Type;` declares into a copy of the scope, which the rest of
/// the block is parsed in.
pub fn parse_var_decl_stmt(
    parser: &mut Parser,
    scope: ScopeId,
) -> Result<(StmtId, ScopeId), Error> {
    let start = parser.expect(TokenKind::Var)?;

    let name_token = parser.expect(TokenKind::Identifier)?;
    let name = name_token.as_identifier()?.to_string();
    let (type_declaration, _) = parse_type(parser, scope)?;

    parser.expect(TokenKind::Semicolon)?;

    let pending = type_declaration.is_pending();
    let program = parser.program_mut();

    let variable = program.add_declaration(Declaration::Variable(VariableDeclaration {
        name: Some(name.clone()),
        position: name_token.position,
        type_declaration,
    }));
    let next_scope =
        program
            .scopes_mut()
            .extend_with_variable(scope, &name, variable, name_token.position)?;

    let statement = program.add_statement(Statement::new(
        StatementKind::VariableDeclaration { variable },
        start.position,
    ));

    if pending {
        parser.deferred_mut().statements.push(statement);
    }

    Ok((statement, next_scope))
}

pub fn parse_identifier_stmt(
    parser: &mut Parser,
    scope: ScopeId,
) -> Result<(StmtId, ScopeId), Error> {
    let statement = parse_simple_stmt(parser, scope)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok((statement, scope))
}

/// Parses an identifier-led statement without its terminator: a call or a
/// mutation (`=`, `+=`, `-=`, `++`, `--`) of a variable.
pub fn parse_simple_stmt(parser: &mut Parser, scope: ScopeId) -> Result<StmtId, Error> {
    let position = parser.get_position();

    if parser.peek_kind(1) == Some(TokenKind::LeftParenthesis) {
        let call = parse_expr(parser, scope, BindingPower::Default)?;
        if !parser.program().expression(call).is_call() {
            return Err(Error::new(ErrorImpl::CallStatementExpected, position));
        }

        return Ok(parser
            .program_mut()
            .add_statement(Statement::new(StatementKind::Call { call }, position)));
    }

    let name_token = parser.expect(TokenKind::Identifier)?;
    let target = parser.resolve_variable(scope, name_token.as_identifier()?, name_token.position);
    let pending = target.is_pending();

    let operator = parser.expect_one_of(&[
        TokenKind::Assign,
        TokenKind::AddAssign,
        TokenKind::SubtractAssign,
        TokenKind::Increment,
        TokenKind::Decrement,
    ])?;

    let kind = match operator.kind {
        TokenKind::Assign => StatementKind::Assign {
            target,
            value: parse_expr(parser, scope, BindingPower::Default)?,
        },
        TokenKind::AddAssign => StatementKind::AddAssign {
            target,
            value: parse_expr(parser, scope, BindingPower::Default)?,
        },
        TokenKind::SubtractAssign => StatementKind::SubtractAssign {
            target,
            value: parse_expr(parser, scope, BindingPower::Default)?,
        },
        TokenKind::Increment => StatementKind::Increment { target },
        _ => StatementKind::Decrement { target },
    };

    let statement = parser
        .program_mut()
        .add_statement(Statement::new(kind, position));

    if pending {
        parser.deferred_mut().statements.push(statement);
    }

    Ok(statement)
}

pub fn parse_if_stmt(parser: &mut Parser, scope: ScopeId) -> Result<(StmtId, ScopeId), Error> {
    let start = parser.expect(TokenKind::If)?;

    let condition = parse_expr(parser, scope, BindingPower::Default)?;
    let then_block = parse_block(parser, scope)?;

    let else_block = if parser.current_token_kind() == Some(TokenKind::Else) {
        parser.advance()?;
        Some(parse_block(parser, scope)?)
    } else {
        None
    };

    let statement = parser.program_mut().add_statement(Statement::new(
        StatementKind::If {
            condition,
            then_block,
            else_block,
        },
        start.position,
    ));

    Ok((statement, scope))
}

pub fn parse_while_stmt(parser: &mut Parser, scope: ScopeId) -> Result<(StmtId, ScopeId), Error> {
    let start = parser.expect(TokenKind::While)?;

    let condition = parse_expr(parser, scope, BindingPower::Default)?;
    let body = parse_block(parser, scope)?;

    let statement = parser.program_mut().add_statement(Statement::new(
        StatementKind::While { condition, body },
        start.position,
    ));

    Ok((statement, scope))
}

pub fn parse_for_stmt(parser: &mut Parser, scope: ScopeId) -> Result<(StmtId, ScopeId), Error> {
    let start = parser.expect(TokenKind::For)?;

    let init = if parser.current_token_kind() == Some(TokenKind::Semicolon) {
        None
    } else {
        Some(parse_simple_stmt(parser, scope)?)
    };
    parser.expect(TokenKind::Semicolon)?;

    let condition = parse_expr(parser, scope, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let action = if parser.current_token_kind() == Some(TokenKind::LeftBrace) {
        None
    } else {
        Some(parse_simple_stmt(parser, scope)?)
    };

    let body = parse_block(parser, scope)?;

    let statement = parser.program_mut().add_statement(Statement::new(
        StatementKind::For {
            init,
            condition,
            action,
            body,
        },
        start.position,
    ));

    Ok((statement, scope))
}

pub fn parse_return_stmt(parser: &mut Parser, scope: ScopeId) -> Result<(StmtId, ScopeId), Error> {
    let start = parser.expect(TokenKind::Return)?;

    let mut values = vec![];
    if parser.current_token_kind() != Some(TokenKind::Semicolon) {
        values.push(parse_expr(parser, scope, BindingPower::Default)?);

        while parser.current_token_kind() == Some(TokenKind::Comma) {
            parser.advance()?;
            values.push(parse_expr(parser, scope, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::Semicolon)?;

    let statement = parser
        .program_mut()
        .add_statement(Statement::new(StatementKind::Return { values }, start.position));

    Ok((statement, scope))
}
