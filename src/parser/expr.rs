use crate::{
    ast::{
        ast::ExprId,
        expressions::{BinaryOperator, Expression, ExpressionKind},
        types::BasicDataType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    scope::scope::ScopeId,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, scope: ScopeId, bp: BindingPower) -> Result<ExprId, Error> {
    // First parse NUD
    let nud = parser
        .current_token_kind()
        .and_then(|kind| parser.get_nud_lookup().get(&kind).copied());
    let Some(nud) = nud else {
        return Err(parser.unexpected("<expression>"));
    };

    let mut left = nud(parser, scope)?;

    // While the current token binds tighter than bp, keep extending lhs
    while let Some(token_kind) = parser.current_token_kind() {
        let token_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if token_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected("<operator>"));
        };

        left = led(parser, scope, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser, _scope: ScopeId) -> Result<ExprId, Error> {
    let token = parser.advance()?;

    let (kind, data_type) = match token.kind {
        TokenKind::Integer => (ExpressionKind::Integer(token.as_integer()?), BasicDataType::Int),
        TokenKind::Character => (
            ExpressionKind::Character(token.as_character()?),
            BasicDataType::Byte,
        ),
        TokenKind::String => (
            ExpressionKind::String(token.as_string()?.to_string()),
            BasicDataType::String,
        ),
        TokenKind::True => (ExpressionKind::Bool(true), BasicDataType::Bool),
        TokenKind::False => (ExpressionKind::Bool(false), BasicDataType::Bool),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.to_string(),
                    expected: String::from("<literal>"),
                },
                token.position,
            ))
        }
    };

    let program = parser.program_mut();
    let ty = program.builtin_type(data_type)?;

    Ok(program.add_expression(Expression::with_types(kind, token.position, vec![ty])))
}

pub fn parse_identifier_expr(parser: &mut Parser, scope: ScopeId) -> Result<ExprId, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    let name = token.as_identifier()?.to_string();

    let declaration = parser.resolve_value(scope, &name, token.position);
    let pending = declaration.is_pending();

    let expression = parser.program_mut().add_expression(Expression::new(
        ExpressionKind::Identifier { name, declaration },
        token.position,
    ));

    if pending {
        parser.deferred_mut().identifiers.push(expression);
    }

    Ok(expression)
}

pub fn parse_not_expr(parser: &mut Parser, scope: ScopeId) -> Result<ExprId, Error> {
    let operator_token = parser.expect(TokenKind::Not)?;
    let operand = parse_expr(parser, scope, BindingPower::Unary)?;

    Ok(parser.program_mut().add_expression(Expression::new(
        ExpressionKind::Not(operand),
        operator_token.position,
    )))
}

pub fn parse_grouping_expr(parser: &mut Parser, scope: ScopeId) -> Result<ExprId, Error> {
    parser.expect(TokenKind::LeftParenthesis)?;
    let expr = parse_expr(parser, scope, BindingPower::Default)?;
    parser.expect(TokenKind::RightParenthesis)?;

    Ok(expr)
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    scope: ScopeId,
    left: ExprId,
    bp: BindingPower,
) -> Result<ExprId, Error> {
    let operator_token = parser.advance()?;
    let Some(operator) = BinaryOperator::from_token_kind(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.to_string(),
                expected: String::from("<binary operator>"),
            },
            operator_token.position,
        ));
    };

    let right = parse_expr(parser, scope, bp)?;

    Ok(parser.program_mut().add_expression(Expression::new(
        ExpressionKind::Binary {
            operator,
            left,
            right,
        },
        operator_token.position,
    )))
}

pub fn parse_call_expr(
    parser: &mut Parser,
    scope: ScopeId,
    left: ExprId,
    _bp: BindingPower,
) -> Result<ExprId, Error> {
    let open = parser.expect(TokenKind::LeftParenthesis)?;

    let callee = parser.program().expression(left);
    if !callee.is_callable() {
        return Err(Error::new(ErrorImpl::NotCallable, open.position));
    }
    let position = callee.position;

    let mut arguments = vec![];

    while parser.current_token_kind() != Some(TokenKind::RightParenthesis) {
        if !arguments.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        arguments.push(parse_expr(parser, scope, BindingPower::Default)?);
    }

    parser.expect(TokenKind::RightParenthesis)?;

    Ok(parser.program_mut().add_expression(Expression::new(
        ExpressionKind::Call {
            callee: left,
            arguments,
        },
        position,
    )))
}
