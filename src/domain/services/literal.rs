//! Typed literal parser
//!
//! Reads Python/Jinja2-style literals without evaluating expressions:
//! integers, floats, booleans (`True`/`true`), `None`, quoted strings
//! (adjacent strings concatenate), lists, tuples (read as lists) and dicts.
//! A bare comma-separated sequence is a tuple: `1,2,3` reads as `[1, 2, 3]`.
//!
//! Integers with leading zeros (`001`) are not integers. Containers nest at
//! most [`MAX_DEPTH`] deep.

use crate::domain::value_objects::TemplateValue;

/// Deepest container nesting a literal may use.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid literal at offset {offset}: {message}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parse `text` as a single literal. Anything else is an error.
pub fn parse_literal(text: &str) -> Result<TemplateValue, LiteralError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let value = parser.top_level()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Evaluate an override or template value.
///
/// Literals become typed values. Text that does not start like a literal
/// (quote, bracket, brace, parenthesis) stays a string; text that does and
/// fails to parse is an error.
pub fn evaluate(text: &str) -> Result<TemplateValue, LiteralError> {
    let trimmed = text.trim();
    match parse_literal(trimmed) {
        Ok(value) => Ok(value),
        Err(err) if looks_like_literal(trimmed) => Err(err),
        Err(_) => Ok(TemplateValue::Str(trimmed.to_string())),
    }
}

fn looks_like_literal(text: &str) -> bool {
    matches!(
        text.chars().next(),
        Some('"' | '\'' | '[' | '(' | '{')
    )
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", expected)))
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// `expr` or a bare tuple `expr, expr, ...`.
    fn top_level(&mut self) -> Result<TemplateValue, LiteralError> {
        let first = self.expr()?;
        self.skip_ws();
        if !self.eat(',') {
            return Ok(first);
        }
        let mut items = vec![first];
        loop {
            self.skip_ws();
            if self.at_end() {
                break;
            }
            items.push(self.expr()?);
            self.skip_ws();
            if !self.eat(',') {
                break;
            }
        }
        Ok(TemplateValue::List(items))
    }

    fn expr(&mut self) -> Result<TemplateValue, LiteralError> {
        match self.peek() {
            Some('"' | '\'') => self.strings(),
            Some('[') => self.nested(Self::list),
            Some('(') => self.nested(Self::tuple),
            Some('{') => self.nested(Self::dict),
            Some(c) if c.is_ascii_digit() || c == '.' || c == '+' || c == '-' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<TemplateValue, LiteralError>,
    ) -> Result<TemplateValue, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nested deeper than {} levels", MAX_DEPTH)));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn strings(&mut self) -> Result<TemplateValue, LiteralError> {
        let mut out = self.string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            if matches!(self.peek(), Some('"' | '\'')) {
                out.push_str(&self.string()?);
            } else {
                self.pos = save;
                break;
            }
        }
        Ok(TemplateValue::Str(out))
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or_else(|| self.error("expected string"))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(self.error("unterminated string")),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some('\n') => {}
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn sequence(&mut self, close: char) -> Result<(Vec<TemplateValue>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.eat(close) {
                return Ok((items, trailing_comma));
            }
            items.push(self.expr()?);
            self.skip_ws();
            if self.eat(',') {
                trailing_comma = true;
                continue;
            }
            trailing_comma = false;
            self.skip_ws();
            self.expect(close)?;
            return Ok((items, trailing_comma));
        }
    }

    fn list(&mut self) -> Result<TemplateValue, LiteralError> {
        self.expect('[')?;
        let (items, _) = self.sequence(']')?;
        Ok(TemplateValue::List(items))
    }

    fn tuple(&mut self) -> Result<TemplateValue, LiteralError> {
        self.expect('(')?;
        let (mut items, trailing_comma) = self.sequence(')')?;
        if items.len() == 1 && !trailing_comma {
            // parenthesised expression, not a tuple
            return Ok(items.remove(0));
        }
        Ok(TemplateValue::List(items))
    }

    fn dict(&mut self) -> Result<TemplateValue, LiteralError> {
        self.expect('{')?;
        let mut entries: Vec<(String, TemplateValue)> = Vec::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                return Ok(TemplateValue::Map(entries));
            }
            let key = self.expr()?.key_text();
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            let value = self.expr()?;
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
            self.skip_ws();
            if !self.eat(',') {
                self.skip_ws();
                self.expect('}')?;
                return Ok(TemplateValue::Map(entries));
            }
        }
    }

    fn name(&mut self) -> Result<TemplateValue, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(TemplateValue::Bool(true)),
            "False" | "false" => Ok(TemplateValue::Bool(false)),
            "None" | "none" => Ok(TemplateValue::None),
            other => {
                self.pos = start;
                Err(self.error(format!("'{}' is not a literal", other)))
            }
        }
    }

    fn number(&mut self) -> Result<TemplateValue, LiteralError> {
        let start = self.pos;
        let negative = if self.eat('-') {
            true
        } else {
            self.eat('+');
            false
        };
        self.skip_ws();

        let body_start = self.pos;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.pos += 1;
                    }
                    continue;
                }
                _ => break,
            }
            self.pos += c.len_utf8();
        }
        let body = self.src[body_start..self.pos].replace('_', "");
        if body.is_empty() || body == "." {
            self.pos = start;
            return Err(self.error("expected a number"));
        }

        if is_float {
            let parsed: f64 = body.parse().map_err(|_| {
                LiteralError {
                    offset: start,
                    message: format!("invalid float '{}'", body),
                }
            })?;
            return Ok(TemplateValue::Float(if negative { -parsed } else { parsed }));
        }

        if body.len() > 1 && body.starts_with('0') {
            return Err(LiteralError {
                offset: start,
                message: format!("integer '{}' has leading zeros", body),
            });
        }
        let parsed: i64 = body.parse().map_err(|_| LiteralError {
            offset: start,
            message: format!("invalid integer '{}'", body),
        })?;
        Ok(TemplateValue::Int(if negative { -parsed } else { parsed }))
    }
}
