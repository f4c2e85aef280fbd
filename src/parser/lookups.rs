use std::collections::HashMap;

use crate::{
    ast::ast::{ExprId, StmtId},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    scope::scope::ScopeId,
};

use super::{expr::*, parser::Parser, stmt::*};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Or,
    And,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
}

impl BindingPower {
    /// Maps an operator precedence level (see `TokenKind::operator_precedence`)
    /// onto a binding power.
    pub fn from_precedence(precedence: u8) -> BindingPower {
        match precedence {
            1 => BindingPower::Or,
            2 => BindingPower::And,
            3 => BindingPower::Relational,
            4 => BindingPower::Additive,
            5 => BindingPower::Multiplicative,
            _ => BindingPower::Default,
        }
    }
}

/// Parses a statement in the given scope and returns it together with the
/// scope the following statements of the same block are parsed in.
pub type StmtHandler = fn(&mut Parser, ScopeId) -> Result<(StmtId, ScopeId), Error>;
pub type NUDHandler = fn(&mut Parser, ScopeId) -> Result<ExprId, Error>;
pub type LEDHandler = fn(&mut Parser, ScopeId, ExprId, BindingPower) -> Result<ExprId, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Binary operators
    for kind in [
        TokenKind::Or,
        TokenKind::And,
        TokenKind::Equal,
        TokenKind::NotEqual,
        TokenKind::Less,
        TokenKind::LessOrEqual,
        TokenKind::Greater,
        TokenKind::GreaterOrEqual,
        TokenKind::Add,
        TokenKind::Subtract,
        TokenKind::Multiply,
        TokenKind::Divide,
    ] {
        parser.led(
            kind,
            BindingPower::from_precedence(kind.operator_precedence()),
            parse_binary_expr,
        );
    }

    parser.led(TokenKind::LeftParenthesis, BindingPower::Call, parse_call_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_primary_expr);
    parser.nud(TokenKind::Character, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::Not, parse_not_expr);
    parser.nud(TokenKind::LeftParenthesis, parse_grouping_expr);

    // Statements
    parser.stmt(TokenKind::Var, parse_var_decl_stmt);
    parser.stmt(TokenKind::Identifier, parse_identifier_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
