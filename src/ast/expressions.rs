use std::cell::OnceCell;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position,
};

use super::{
    ast::{DeclId, Declaration, DeclarationRef, ExprId, Program},
    types::BasicDataType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOperator> {
        match kind {
            TokenKind::Add => Some(BinaryOperator::Add),
            TokenKind::Subtract => Some(BinaryOperator::Subtract),
            TokenKind::Multiply => Some(BinaryOperator::Multiply),
            TokenKind::Divide => Some(BinaryOperator::Divide),
            TokenKind::Equal => Some(BinaryOperator::Equal),
            TokenKind::NotEqual => Some(BinaryOperator::NotEqual),
            TokenKind::Less => Some(BinaryOperator::Less),
            TokenKind::LessOrEqual => Some(BinaryOperator::LessOrEqual),
            TokenKind::Greater => Some(BinaryOperator::Greater),
            TokenKind::GreaterOrEqual => Some(BinaryOperator::GreaterOrEqual),
            TokenKind::And => Some(BinaryOperator::And),
            TokenKind::Or => Some(BinaryOperator::Or),
            _ => None,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::Less
                | BinaryOperator::LessOrEqual
                | BinaryOperator::Greater
                | BinaryOperator::GreaterOrEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Integer(i64),
    Character(u8),
    String(String),
    Bool(bool),
    Identifier {
        name: String,
        declaration: DeclarationRef,
    },
    Binary {
        operator: BinaryOperator,
        left: ExprId,
        right: ExprId,
    },
    Not(ExprId),
    Call {
        callee: ExprId,
        arguments: Vec<ExprId>,
    },
}

#[derive(Debug, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub position: Position,
    resulting_types: OnceCell<Vec<DeclId>>,
}

impl Expression {
    pub fn new(kind: ExpressionKind, position: Position) -> Self {
        Expression {
            kind,
            position,
            resulting_types: OnceCell::new(),
        }
    }

    /// Creates an expression whose type is already known, such as a literal.
    pub fn with_types(kind: ExpressionKind, position: Position, types: Vec<DeclId>) -> Self {
        Expression {
            kind,
            position,
            resulting_types: OnceCell::from(types),
        }
    }

    /// The type declarations this expression evaluates to: one for most
    /// expressions, any number for a call. Computed on first use and cached.
    pub fn resulting_type_declarations<'a>(
        &'a self,
        program: &'a Program,
    ) -> Result<&'a [DeclId], Error> {
        if let Some(types) = self.resulting_types.get() {
            return Ok(types.as_slice());
        }

        let types = self.compute_types(program)?;
        Ok(self.resulting_types.get_or_init(|| types).as_slice())
    }

    /// The single type declaration of the expression, failing for calls
    /// returning zero or several values.
    pub fn must_single_return_type(&self, program: &Program) -> Result<DeclId, Error> {
        let types = self.resulting_type_declarations(program)?;

        match types {
            [single] => Ok(*single),
            _ => Err(Error::new(
                ErrorImpl::SingleTypeExpected { count: types.len() },
                self.position,
            )),
        }
    }

    fn compute_types(&self, program: &Program) -> Result<Vec<DeclId>, Error> {
        match &self.kind {
            ExpressionKind::Integer(_) => Ok(vec![program.builtin_type(BasicDataType::Int)?]),
            ExpressionKind::Character(_) => Ok(vec![program.builtin_type(BasicDataType::Byte)?]),
            ExpressionKind::String(_) => Ok(vec![program.builtin_type(BasicDataType::String)?]),
            ExpressionKind::Bool(_) => Ok(vec![program.builtin_type(BasicDataType::Bool)?]),
            ExpressionKind::Identifier { declaration, .. } => {
                let id = declaration.resolved()?;
                match program.declaration(id) {
                    Declaration::Variable(_) => Ok(vec![program.variable_type(id)?]),
                    Declaration::Function(function) => program.return_types(function),
                    Declaration::Type(ty) => Err(Error::new(
                        ErrorImpl::Internal {
                            message: format!("type '{}' used as a value", ty.name),
                        },
                        self.position,
                    )),
                }
            }
            ExpressionKind::Binary {
                operator,
                left,
                right,
            } => self.binary_types(program, *operator, *left, *right),
            ExpressionKind::Not(operand) => {
                let bool_type = program.builtin_type(BasicDataType::Bool)?;
                let operand_type = program.expression(*operand).must_single_return_type(program)?;

                if operand_type != bool_type {
                    return Err(Error::new(
                        ErrorImpl::NotOperandType {
                            received: program.type_name(operand_type),
                        },
                        self.position,
                    ));
                }

                Ok(vec![bool_type])
            }
            ExpressionKind::Call { callee, arguments } => {
                self.call_types(program, *callee, arguments)
            }
        }
    }

    fn binary_types(
        &self,
        program: &Program,
        operator: BinaryOperator,
        left: ExprId,
        right: ExprId,
    ) -> Result<Vec<DeclId>, Error> {
        let left_type = program.expression(left).must_single_return_type(program)?;
        let right_type = program.expression(right).must_single_return_type(program)?;
        let bool_type = program.builtin_type(BasicDataType::Bool)?;

        if operator.is_logical() {
            for operand_type in [left_type, right_type] {
                if operand_type != bool_type {
                    return Err(Error::new(
                        ErrorImpl::LogicalOperandType {
                            received: program.type_name(operand_type),
                        },
                        self.position,
                    ));
                }
            }
            return Ok(vec![bool_type]);
        }

        if left_type != right_type {
            return Err(Error::new(
                ErrorImpl::OperandTypeMismatch {
                    left: program.type_name(left_type),
                    right: program.type_name(right_type),
                },
                self.position,
            ));
        }

        if operator.is_comparison() {
            Ok(vec![bool_type])
        } else {
            Ok(vec![left_type])
        }
    }

    fn call_types(
        &self,
        program: &Program,
        callee: ExprId,
        arguments: &[ExprId],
    ) -> Result<Vec<DeclId>, Error> {
        let callee = program.expression(callee);

        let function = match &callee.kind {
            ExpressionKind::Identifier { declaration, .. } => {
                program.function(declaration.resolved()?)
            }
            _ => None,
        };
        let Some(function) = function else {
            return Err(Error::new(ErrorImpl::NotAFunction, callee.position));
        };

        let parameter_types = program.parameter_types(function)?;
        if parameter_types.len() != arguments.len() {
            return Err(Error::new(
                ErrorImpl::ParameterCountMismatch {
                    expected: parameter_types.len(),
                    received: arguments.len(),
                },
                self.position,
            ));
        }

        for (parameter_type, argument) in parameter_types.iter().zip(arguments) {
            let argument = program.expression(*argument);
            let argument_type = argument.must_single_return_type(program)?;

            if argument_type != *parameter_type {
                return Err(Error::new(
                    ErrorImpl::ParameterTypeMismatch {
                        expected: program.type_name(*parameter_type),
                        received: program.type_name(argument_type),
                    },
                    argument.position,
                ));
            }
        }

        program.return_types(function)
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, ExpressionKind::Call { .. })
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Identifier { .. } | ExpressionKind::Call { .. }
        )
    }

    pub fn declaration(&self) -> Option<&DeclarationRef> {
        match &self.kind {
            ExpressionKind::Identifier { declaration, .. } => Some(declaration),
            _ => None,
        }
    }

    pub fn declaration_mut(&mut self) -> Option<&mut DeclarationRef> {
        match &mut self.kind {
            ExpressionKind::Identifier { declaration, .. } => Some(declaration),
            _ => None,
        }
    }
}
