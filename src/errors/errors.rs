use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// The stage of the pipeline an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Parse,
    Resolution,
    Type,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
    context: Vec<String>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position: Some(position),
            context: vec![],
        }
    }

    pub fn without_position(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            position: None,
            context: vec![],
        }
    }

    /// Wraps the error with an outer layer of context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_error_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::IntegerParseError { .. } => "IntegerParseError",
            ErrorImpl::EmptyCharacterLiteral => "EmptyCharacterLiteral",
            ErrorImpl::UnterminatedCharacterLiteral => "UnterminatedCharacterLiteral",
            ErrorImpl::CharacterLiteralTooLong => "CharacterLiteralTooLong",
            ErrorImpl::UnterminatedStringLiteral => "UnterminatedStringLiteral",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedEndOfInput { .. } => "UnexpectedEndOfInput",
            ErrorImpl::TokenDowncast { .. } => "TokenDowncast",
            ErrorImpl::ReturnNotLast => "ReturnNotLast",
            ErrorImpl::NotCallable => "NotCallable",
            ErrorImpl::CallStatementExpected => "CallStatementExpected",
            ErrorImpl::DeclarationClash { .. } => "DeclarationClash",
            ErrorImpl::SubScopeDeclarationClash { .. } => "SubScopeDeclarationClash",
            ErrorImpl::BuiltInScopeDeclaration { .. } => "BuiltInScopeDeclaration",
            ErrorImpl::TypeNotFound { .. } => "TypeNotFound",
            ErrorImpl::VariableOrFunctionNotFound { .. } => "VariableOrFunctionNotFound",
            ErrorImpl::VariableNotFound { .. } => "VariableNotFound",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::OperandTypeMismatch { .. } => "OperandTypeMismatch",
            ErrorImpl::NotOperandType { .. } => "NotOperandType",
            ErrorImpl::LogicalOperandType { .. } => "LogicalOperandType",
            ErrorImpl::NotAFunction => "NotAFunction",
            ErrorImpl::ParameterCountMismatch { .. } => "ParameterCountMismatch",
            ErrorImpl::ParameterTypeMismatch { .. } => "ParameterTypeMismatch",
            ErrorImpl::SingleTypeExpected { .. } => "SingleTypeExpected",
            ErrorImpl::IntegerOnlyOperation { .. } => "IntegerOnlyOperation",
            ErrorImpl::ConditionNotBool => "ConditionNotBool",
            ErrorImpl::ReturnCountMismatch { .. } => "ReturnCountMismatch",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::MissingReturn => "MissingReturn",
            ErrorImpl::MissingMainFunction => "MissingMainFunction",
            ErrorImpl::Internal { .. } => "Internal",
        }
    }

    pub fn get_category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::IntegerParseError { .. }
            | ErrorImpl::EmptyCharacterLiteral
            | ErrorImpl::UnterminatedCharacterLiteral
            | ErrorImpl::CharacterLiteralTooLong
            | ErrorImpl::UnterminatedStringLiteral => ErrorCategory::Lex,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedEndOfInput { .. }
            | ErrorImpl::TokenDowncast { .. }
            | ErrorImpl::ReturnNotLast
            | ErrorImpl::NotCallable
            | ErrorImpl::CallStatementExpected => ErrorCategory::Parse,
            ErrorImpl::DeclarationClash { .. }
            | ErrorImpl::SubScopeDeclarationClash { .. }
            | ErrorImpl::BuiltInScopeDeclaration { .. }
            | ErrorImpl::TypeNotFound { .. }
            | ErrorImpl::VariableOrFunctionNotFound { .. }
            | ErrorImpl::VariableNotFound { .. } => ErrorCategory::Resolution,
            ErrorImpl::TypeMismatch { .. }
            | ErrorImpl::OperandTypeMismatch { .. }
            | ErrorImpl::NotOperandType { .. }
            | ErrorImpl::LogicalOperandType { .. }
            | ErrorImpl::NotAFunction
            | ErrorImpl::ParameterCountMismatch { .. }
            | ErrorImpl::ParameterTypeMismatch { .. }
            | ErrorImpl::SingleTypeExpected { .. }
            | ErrorImpl::IntegerOnlyOperation { .. }
            | ErrorImpl::ConditionNotBool
            | ErrorImpl::ReturnCountMismatch { .. }
            | ErrorImpl::ReturnTypeMismatch { .. }
            | ErrorImpl::MissingReturn
            | ErrorImpl::MissingMainFunction
            | ErrorImpl::Internal { .. } => ErrorCategory::Type,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { token, expected } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, expected one of: {}",
                token, expected
            )),
            ErrorImpl::UnexpectedEndOfInput { expected } => ErrorTip::Suggestion(format!(
                "Input ended early, expected one of: {}",
                expected
            )),
            ErrorImpl::IntegerParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::ReturnNotLast => ErrorTip::Suggestion(String::from(
                "Statements after a `return` can never run, remove them",
            )),
            ErrorImpl::DeclarationClash { identifier, .. }
            | ErrorImpl::SubScopeDeclarationClash { identifier, .. } => ErrorTip::Suggestion(
                format!("Rename one of the declarations of `{}`", identifier),
            ),
            ErrorImpl::TypeMismatch { expected, received }
            | ErrorImpl::ParameterTypeMismatch { expected, received }
            | ErrorImpl::ReturnTypeMismatch { expected, received } => ErrorTip::Suggestion(
                format!("Expected type `{}`, received `{}`", expected, received),
            ),
            ErrorImpl::ParameterCountMismatch { expected, received } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::MissingReturn => ErrorTip::Suggestion(String::from(
                "End the function body with a `return` statement",
            )),
            ErrorImpl::Internal { .. } => ErrorTip::Suggestion(String::from(
                "This is a bug in the compiler, not in the program being compiled",
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)?;

        if let Some(position) = &self.position {
            write!(f, " on {}", position)?;
        }

        // Innermost context first, after the positioned message
        if !self.context.is_empty() {
            write!(f, " ({})", self.context.join("; "))?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Tokenizing
    #[error("unknown token '{token}'")]
    UnrecognisedToken { token: String },
    #[error("could not parse '{token}' into integer")]
    IntegerParseError { token: String },
    #[error("character literal can not be empty")]
    EmptyCharacterLiteral,
    #[error("unexpected end of line before end of character literal")]
    UnterminatedCharacterLiteral,
    #[error("character literal may only be 1 character long")]
    CharacterLiteralTooLong,
    #[error("unexpected end of line before end of string literal")]
    UnterminatedStringLiteral,

    // Parsing
    #[error("unexpected token '{token}', expected: {expected}")]
    UnexpectedToken { token: String, expected: String },
    #[error("unexpected end of input, expected: {expected}")]
    UnexpectedEndOfInput { expected: String },
    #[error("expected {expected} token but found '{found}'")]
    TokenDowncast { expected: String, found: String },
    #[error("return statement must be the last statement in its block")]
    ReturnNotLast,
    #[error("only identifiers and call results can be called")]
    NotCallable,
    #[error("expression statement must be a function call")]
    CallStatementExpected,

    // Resolution
    #[error("identifier '{identifier}' is already declared as {kind} at {previous}")]
    DeclarationClash {
        identifier: String,
        kind: String,
        previous: String,
    },
    #[error("identifier '{identifier}' is already declared in a sub-scope at {previous}")]
    SubScopeDeclarationClash {
        identifier: String,
        previous: Position,
    },
    #[error("cannot declare {kind} on built-in scope")]
    BuiltInScopeDeclaration { kind: String },
    #[error("no type found for '{name}'")]
    TypeNotFound { name: String },
    #[error("no variable or function found for '{name}'")]
    VariableOrFunctionNotFound { name: String },
    #[error("no variable found for '{name}'")]
    VariableNotFound { name: String },

    // Type checking
    #[error("type mismatch: expected '{expected}' but was given '{received}'")]
    TypeMismatch { expected: String, received: String },
    #[error("cannot operate for different types, '{left}' and '{right}',")]
    OperandTypeMismatch { left: String, right: String },
    #[error("can only use 'not' operator on type Bool, type {received} given")]
    NotOperandType { received: String },
    #[error("can only use logical operators on type Bool, type {received} given")]
    LogicalOperandType { received: String },
    #[error("cannot call identifier as a function")]
    NotAFunction,
    #[error("number of parameters mismatch: expected {expected} but was given {received}")]
    ParameterCountMismatch { expected: usize, received: usize },
    #[error("parameter type mismatch: expected '{expected}' but was given '{received}'")]
    ParameterTypeMismatch { expected: String, received: String },
    #[error("expression must have 1 return type but had {count}")]
    SingleTypeExpected { count: usize },
    #[error("cannot {operation} variable with type '{received}'")]
    IntegerOnlyOperation { operation: String, received: String },
    #[error("condition must result with type 'Bool'")]
    ConditionNotBool,
    #[error("number of return types mismatch: expected {expected} but was given {received}")]
    ReturnCountMismatch { expected: usize, received: usize },
    #[error("return type mismatch: expected '{expected}' but was given '{received}'")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("function should return values")]
    MissingReturn,
    #[error("must have a 'main' function")]
    MissingMainFunction,
    #[error("compiler error: {message}")]
    Internal { message: String },
}
