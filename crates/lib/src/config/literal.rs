//! Literal parsing and type deduction for textual assignments.
//!
//! Command lines and automation layers hand the tree `path=literal` strings.
//! The literal grammar accepts integers, floats, booleans, null, quoted
//! strings, and bracketed lists or parenthesized tuples of those. Tuples are
//! read as lists.

use crate::config::{ConfigError, Value, ValueKind};

const TRUE_TOKENS: &[&str] = &["true", "t", "yes", "y"];
const FALSE_TOKENS: &[&str] = &["false", "f", "no", "n"];

/// Parses a single literal.
///
/// ```
/// # use cfgtree::config::{parse_literal, Value};
/// assert_eq!(parse_literal("2")?, Value::Int(2));
/// assert_eq!(
///     parse_literal("['a', 3]")?,
///     Value::List(vec![Value::from("a"), Value::Int(3)])
/// );
/// # Ok::<(), cfgtree::config::ConfigError>(())
/// ```
pub fn parse_literal(text: &str) -> Result<Value, ConfigError> {
    let mut parser = Parser::new(text);
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos != parser.src.len() {
        return Err(parser.error());
    }
    Ok(value)
}

/// Reads `text` as a value of the same type as `existing`.
///
/// A null `existing` value falls back to `default_type`; with no fallback
/// the type cannot be deduced.
pub(crate) fn deduce(
    existing: &Value,
    text: &str,
    default_type: Option<ValueKind>,
    path: &str,
) -> Result<Value, ConfigError> {
    let kind = match existing {
        Value::Null => default_type.ok_or_else(|| ConfigError::CannotDeduceType {
            path: path.to_string(),
        })?,
        other => other.kind(),
    };
    convert(text, kind)
}

fn invalid(text: &str, kind: ValueKind) -> ConfigError {
    ConfigError::InvalidLiteral {
        literal: text.to_string(),
        expected: kind.name().to_string(),
    }
}

fn convert(text: &str, kind: ValueKind) -> Result<Value, ConfigError> {
    match kind {
        ValueKind::Bool => parse_bool(text),
        ValueKind::Text => Ok(Value::Text(text.to_string())),
        ValueKind::Null => parse_literal(text),
        ValueKind::Int => match parse_literal(text) {
            Ok(Value::Int(n)) => Ok(Value::Int(n)),
            _ => Err(invalid(text, kind)),
        },
        ValueKind::Float => match parse_literal(text) {
            Ok(Value::Float(n)) => Ok(Value::Float(n)),
            Ok(Value::Int(n)) => Ok(Value::Float(n as f64)),
            _ => Err(invalid(text, kind)),
        },
        ValueKind::List => match parse_literal(text) {
            Ok(Value::List(items)) => Ok(Value::List(items)),
            _ => Err(invalid(text, kind)),
        },
    }
}

fn parse_bool(text: &str) -> Result<Value, ConfigError> {
    let token = text.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Ok(Value::Bool(true))
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Ok(Value::Bool(false))
    } else {
        Err(invalid(text, ValueKind::Bool))
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self) -> ConfigError {
        ConfigError::InvalidLiteral {
            literal: self.src.to_string(),
            expected: "literal".to_string(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn value(&mut self) -> Result<Value, ConfigError> {
        self.skip_whitespace();
        match self.peek() {
            Some('[') => self.sequence('[', ']'),
            Some('(') => self.sequence('(', ')'),
            Some(quote @ ('\'' | '"')) => self.string(quote),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() => self.word(),
            _ => Err(self.error()),
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Value, ConfigError> {
        debug_assert_eq!(self.peek(), Some(open));
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::List(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(Value::List(items)),
                _ => return Err(self.error()),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<Value, ConfigError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump().ok_or_else(|| self.error())? {
                c if c == quote => return Ok(Value::Text(out)),
                '\\' => match self.bump().ok_or_else(|| self.error())? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    other => out.push(other),
                },
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Value, ConfigError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_'))
        {
            self.bump();
        }
        let token = self.src[start..self.pos].replace('_', "");
        if let Ok(n) = token.parse::<i64>() {
            return Ok(Value::Int(n));
        }
        token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| self.error())
    }

    fn word(&mut self) -> Result<Value, ConfigError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(self.error()),
        }
    }
}
