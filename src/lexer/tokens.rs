use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("type", TokenKind::Type);
        map.insert("anytype", TokenKind::AnyType);
        map.insert("func", TokenKind::Func);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("return", TokenKind::Return);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Literal
    Integer,
    Character,
    String,

    Identifier,

    // Math
    Add,
    Subtract,
    Multiply,
    Divide,

    // Assignment
    Assign,
    AddAssign,
    SubtractAssign,
    Increment,
    Decrement,

    // Comparison
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    And,
    Or,

    Not,

    // Delimiting
    LeftParenthesis,
    RightParenthesis,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Period,
    Semicolon,

    // Reserved
    Var,
    Type,
    AnyType,
    Func,
    If,
    Else,
    Return,
    For,
    While,
    True,
    False,
}

impl TokenKind {
    /// The precedence of the operator; a higher value binds tighter.
    /// Returns 0 for tokens that are not binary or prefix operators.
    pub fn operator_precedence(&self) -> u8 {
        match self {
            TokenKind::Multiply | TokenKind::Divide | TokenKind::Not => 5,
            TokenKind::Add | TokenKind::Subtract => 4,
            TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::Less
            | TokenKind::LessOrEqual
            | TokenKind::Greater
            | TokenKind::GreaterOrEqual => 3,
            TokenKind::And => 2,
            TokenKind::Or => 1,
            _ => 0,
        }
    }

    /// The spelling of the token as shown to the user.
    pub fn display_string(&self) -> &'static str {
        match self {
            TokenKind::Integer => "<integer>",
            TokenKind::Character => "<character>",
            TokenKind::String => "<string>",
            TokenKind::Identifier => "<identifier>",
            TokenKind::Add => "+",
            TokenKind::Subtract => "-",
            TokenKind::Multiply => "*",
            TokenKind::Divide => "/",
            TokenKind::Assign => "=",
            TokenKind::AddAssign => "+=",
            TokenKind::SubtractAssign => "-=",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessOrEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterOrEqual => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::LeftParenthesis => "(",
            TokenKind::RightParenthesis => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Var => "var",
            TokenKind::Type => "type",
            TokenKind::AnyType => "anytype",
            TokenKind::Func => "func",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::True => "true",
            TokenKind::False => "false",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_string())
    }
}

/// Literal payload of a token. Operators, delimiters and keywords carry none.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Integer(i64),
    Character(u8),
    String(String),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            TokenValue::Identifier(identifier) => write!(f, "{}", identifier),
            TokenValue::Integer(integer) => write!(f, "{}", integer),
            TokenValue::Character(character) => write!(f, "'{}'", *character as char),
            TokenValue::String(string) => write!(f, "\"{}\"", string),
            TokenValue::None => write!(f, "{}", self.kind),
        }
    }
}

impl Token {
    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn uf_line(&self) -> usize {
        self.position.uf_line()
    }

    pub fn uf_column(&self) -> usize {
        self.position.uf_column()
    }

    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    fn downcast_error(&self, expected: TokenKind) -> Error {
        Error::new(
            ErrorImpl::TokenDowncast {
                expected: expected.display_string().to_string(),
                found: self.to_string(),
            },
            self.position,
        )
    }

    pub fn as_identifier(&self) -> Result<&str, Error> {
        match &self.value {
            TokenValue::Identifier(identifier) if self.kind == TokenKind::Identifier => {
                Ok(identifier)
            }
            _ => Err(self.downcast_error(TokenKind::Identifier)),
        }
    }

    pub fn as_integer(&self) -> Result<i64, Error> {
        match self.value {
            TokenValue::Integer(integer) if self.kind == TokenKind::Integer => Ok(integer),
            _ => Err(self.downcast_error(TokenKind::Integer)),
        }
    }

    pub fn as_character(&self) -> Result<u8, Error> {
        match self.value {
            TokenValue::Character(character) if self.kind == TokenKind::Character => {
                Ok(character)
            }
            _ => Err(self.downcast_error(TokenKind::Character)),
        }
    }

    pub fn as_string(&self) -> Result<&str, Error> {
        match &self.value {
            TokenValue::String(string) if self.kind == TokenKind::String => Ok(string),
            _ => Err(self.downcast_error(TokenKind::String)),
        }
    }
}
