use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, TokenValue, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    /// Recognition order for every column: whitespace, two-character operators,
    /// one-character operators and delimiters, literals, keywords, identifiers.
    static ref PATTERNS: Vec<RegexPattern> = {
        let mut keywords: Vec<&str> = RESERVED_LOOKUP.keys().copied().collect();
        keywords.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let keyword_regex = format!("^({})([^a-z]|$)", keywords.join("|"));

        vec![
            RegexPattern { regex: Regex::new("^[ \t\r]+").unwrap(), handler: skip_handler },
            RegexPattern { regex: Regex::new("^\\+=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::AddAssign, "+=") },
            RegexPattern { regex: Regex::new("^-=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SubtractAssign, "-=") },
            RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equal, "==") },
            RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEqual, "!=") },
            RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessOrEqual, "<=") },
            RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterOrEqual, ">=") },
            RegexPattern { regex: Regex::new("^\\+\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Increment, "++") },
            RegexPattern { regex: Regex::new("^--").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Decrement, "--") },
            RegexPattern { regex: Regex::new("^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
            RegexPattern { regex: Regex::new("^\\|\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
            RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Add, "+") },
            RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Subtract, "-") },
            RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Multiply, "*") },
            RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Divide, "/") },
            RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assign, "=") },
            RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
            RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
            RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
            RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LeftParenthesis, "(") },
            RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RightParenthesis, ")") },
            RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LeftBrace, "{") },
            RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RightBrace, "}") },
            RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LeftBracket, "[") },
            RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::RightBracket, "]") },
            RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
            RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Period, ".") },
            RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
            RegexPattern { regex: Regex::new("^[0-9]+").unwrap(), handler: integer_handler },
            RegexPattern { regex: Regex::new("^'").unwrap(), handler: character_handler },
            RegexPattern { regex: Regex::new("^\"").unwrap(), handler: string_handler },
            RegexPattern { regex: Regex::new(&keyword_regex).unwrap(), handler: keyword_handler },
            RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: identifier_handler },
        ]
    };
}

/// Tokenizer state for the line currently being scanned.
pub struct Lexer {
    tokens: Vec<Token>,
    line: String,
    line_index: usize,
    column: usize,
}

impl Lexer {
    pub fn new() -> Lexer {
        Lexer {
            tokens: vec![],
            line: String::new(),
            line_index: 0,
            column: 0,
        }
    }

    fn start_line(&mut self, line_index: usize, line: &str) {
        self.line = line.to_string();
        self.line_index = line_index;
        self.column = 0;
    }

    pub fn advance_n(&mut self, n: usize) {
        self.column += n;
    }

    pub fn push(&mut self, token: Token) {
        trace!("token {:?} at {}", token.kind, token.position);
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position::new(self.line_index, self.column)
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or(' ')
    }

    pub fn remainder(&self) -> &str {
        &self.line[self.column..]
    }

    pub fn at_end_of_line(&self) -> bool {
        self.column >= self.line.len()
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

fn matched_text(lexer: &Lexer, regex: &Regex) -> Result<String, Error> {
    regex
        .find(lexer.remainder())
        .map(|matched| matched.as_str().to_string())
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::Internal {
                    message: format!("pattern `{}` did not match", regex.as_str()),
                },
                lexer.position(),
            )
        })
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = matched_text(lexer, regex)?;
    lexer.advance_n(matched.len());
    Ok(())
}

fn integer_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = matched_text(lexer, regex)?;
    let position = lexer.position();

    let integer = matched.parse::<i64>().map_err(|_| {
        Error::new(
            ErrorImpl::IntegerParseError {
                token: matched.clone(),
            },
            position,
        )
    })?;

    lexer.push(MK_TOKEN!(TokenKind::Integer, TokenValue::Integer(integer), position));
    lexer.advance_n(matched.len());
    Ok(())
}

fn character_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let position = lexer.position();
    let bytes = lexer.remainder().as_bytes();

    if bytes.len() > 1 && bytes[1] == b'\'' {
        return Err(Error::new(ErrorImpl::EmptyCharacterLiteral, position));
    }
    if bytes.len() <= 2 {
        return Err(Error::new(ErrorImpl::UnterminatedCharacterLiteral, position));
    }
    if bytes[2] != b'\'' {
        return Err(Error::new(ErrorImpl::CharacterLiteralTooLong, position));
    }

    let character = bytes[1];
    lexer.push(MK_TOKEN!(TokenKind::Character, TokenValue::Character(character), position));
    lexer.advance_n(3);
    Ok(())
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let position = lexer.position();
    let body = &lexer.remainder()[1..];

    let Some(end) = body.find('"') else {
        return Err(Error::new(ErrorImpl::UnterminatedStringLiteral, position));
    };

    let string_literal = body[..end].to_string();
    let length = string_literal.len() + 2;

    lexer.push(MK_TOKEN!(TokenKind::String, TokenValue::String(string_literal), position));
    lexer.advance_n(length);
    Ok(())
}

fn keyword_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let position = lexer.position();
    let keyword = regex
        .captures(lexer.remainder())
        .and_then(|captures| captures.get(1))
        .map(|keyword| keyword.as_str().to_string())
        .unwrap_or_default();

    let Some(kind) = RESERVED_LOOKUP.get(keyword.as_str()) else {
        return Err(Error::new(
            ErrorImpl::Internal {
                message: format!("'{}' is not a keyword", keyword),
            },
            position,
        ));
    };

    lexer.push(MK_TOKEN!(*kind, TokenValue::None, position));
    lexer.advance_n(keyword.len());
    Ok(())
}

fn identifier_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = matched_text(lexer, regex)?;
    let position = lexer.position();

    lexer.advance_n(matched.len());
    lexer.push(MK_TOKEN!(TokenKind::Identifier, TokenValue::Identifier(matched), position));
    Ok(())
}

/// Tokenizes the given lines. A token never spans two lines; line breaks
/// themselves carry no meaning.
pub fn tokenize_lines<I, S>(lines: I) -> Result<Vec<Token>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lex = Lexer::new();

    for (line_index, line) in lines.into_iter().enumerate() {
        lex.start_line(line_index, line.as_ref());

        while !lex.at_end_of_line() {
            let mut matched = false;

            for pattern in PATTERNS.iter() {
                if pattern.regex.is_match(lex.remainder()) {
                    (pattern.handler)(&mut lex, &pattern.regex)?;
                    matched = true;
                    break;
                }
            }

            if !matched {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: lex.at().to_string(),
                    },
                    lex.position(),
                ));
            }
        }
    }

    Ok(lex.tokens)
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    tokenize_lines(source.lines())
}
