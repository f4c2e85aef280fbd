use std::fmt::Display;

use super::ast::Field;

/// Primitive types provided by the built-in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicDataType {
    Int,
    Byte,
    String,
    Bool,
}

impl BasicDataType {
    pub const ALL: [BasicDataType; 4] = [
        BasicDataType::Int,
        BasicDataType::Byte,
        BasicDataType::String,
        BasicDataType::Bool,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BasicDataType::Int => "Int",
            BasicDataType::Byte => "Byte",
            BasicDataType::String => "String",
            BasicDataType::Bool => "Bool",
        }
    }
}

impl Display for BasicDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a type declaration denotes. Only built-in types can be named.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Basic(BasicDataType),
}

/// Signature of a function. Parameters are always named, return slots never.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionType {
    pub parameters: Vec<Field>,
    pub return_types: Vec<Field>,
}
