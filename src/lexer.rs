use std::fmt;
use std::mem;

use thiserror::Error;

use crate::{
    ast::{TemplateChunk, Token},
    parser::DEFAULT_MAX_DEPTH,
};

/// Line and column (both 1-based) of a character in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position { line: 1, column: 1 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Error raised when the source text cannot be split into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at {position}")]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    fn new(message: impl Into<String>, position: Position) -> Self {
        LexError {
            message: message.into(),
            position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    token_start: Position,
    regex_allowed: bool,
    template_depth: usize,
    max_depth: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer::with_origin(input, Position::start())
    }

    /// Lexer whose positions are reported relative to `origin`, used for
    /// template interpolations cut out of a larger source.
    pub fn with_origin(input: &str, origin: Position) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: origin.line,
            column: origin.column,
            token_start: origin,
            regex_allowed: true,
            template_depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit on template literals nested inside interpolations.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Where the most recently returned token starts.
    pub fn token_position(&self) -> Position {
        self.token_start
    }

    /// Drain the lexer, including the final [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.position += 1;
        }
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.current_char(), self.peek_char(1)) {
                (Some(ch), _) if ch.is_whitespace() => self.advance(),
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.here();
                    self.advance_by(2);
                    loop {
                        match (self.current_char(), self.peek_char(1)) {
                            (Some('*'), Some('/')) => {
                                self.advance_by(2);
                                break;
                            }
                            (Some(_), _) => self.advance(),
                            (None, _) => {
                                return Err(LexError::new("unterminated block comment", start));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        self.token_start = self.here();

        let token = self.scan_token()?;
        self.regex_allowed = !token.ends_operand();
        Ok(token)
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// Consume the longest of `candidates` (spelling, token) that matches.
    fn longest(&mut self, candidates: Vec<(&str, Token)>) -> Option<Token> {
        for (spelling, token) in candidates {
            let matches = spelling
                .chars()
                .enumerate()
                .all(|(offset, ch)| self.peek_char(offset) == Some(ch));
            if matches {
                self.advance_by(spelling.chars().count());
                return Some(token);
            }
        }
        None
    }

    fn scan_token(&mut self) -> Result<Token, LexError> {
        let start = self.token_start;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some(',') => self.single(Token::Comma),
            Some(':') => self.single(Token::Colon),
            Some(';') => self.single(Token::Semicolon),
            Some('%') => self.single(Token::Percent),
            Some('+') => self.single(Token::Plus),
            Some('-') => self.single(Token::Minus),
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some('.') => self
                .longest(vec![("...", Token::Ellipsis)])
                .unwrap_or_else(|| self.single(Token::Dot)),
            Some('*') => self
                .longest(vec![("**", Token::StarStar)])
                .unwrap_or_else(|| self.single(Token::Star)),
            Some('/') if self.regex_allowed => self.read_regex()?,
            Some('/') => self.single(Token::Slash),
            Some('=') => self
                .longest(vec![
                    ("===", Token::EqEqEq),
                    ("==", Token::EqEq),
                    ("=>", Token::Arrow),
                ])
                .unwrap_or_else(|| self.single(Token::Assign)),
            Some('!') => self
                .longest(vec![("!==", Token::NotEqEq), ("!=", Token::NotEq)])
                .unwrap_or_else(|| self.single(Token::Bang)),
            Some('<') => self
                .longest(vec![("<=", Token::LtEq)])
                .unwrap_or_else(|| self.single(Token::Lt)),
            Some('>') => self
                .longest(vec![(">=", Token::GtEq)])
                .unwrap_or_else(|| self.single(Token::Gt)),
            Some('?') => self
                .longest(vec![("??", Token::QuestionQuestion)])
                .unwrap_or_else(|| self.single(Token::Question)),
            Some('&') => self.longest(vec![("&&", Token::AndAnd)]).ok_or_else(|| {
                LexError::new("unexpected character '&' (did you mean '&&'?)", start)
            })?,
            Some('|') => self.longest(vec![("||", Token::OrOr)]).ok_or_else(|| {
                LexError::new("unexpected character '|' (did you mean '||'?)", start)
            })?,
            Some(quote @ ('"' | '\'')) => Token::String(self.read_string(quote)?),
            Some('`') => self.read_template()?,
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if is_identifier_start(ch) => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" => Token::Null,
                    "if" => Token::If,
                    "else" => Token::Else,
                    "return" => Token::Return,
                    "let" => Token::Let,
                    "const" => Token::Const,
                    "var" => Token::Var,
                    "typeof" => Token::Typeof,
                    "in" => Token::In,
                    "instanceof" => Token::Instanceof,
                    _ => Token::Identifier(ident),
                }
            }
            Some(ch) => {
                return Err(LexError::new(
                    format!("unexpected character '{}'", ch),
                    start,
                ));
            }
        };

        Ok(token)
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_identifier_part(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Read the numeric lexeme verbatim. Validation and evaluation happen in
    /// the transformer's literal encoder, so trailing garbage such as `12px`
    /// or `0xZZ` is kept in the lexeme rather than split off.
    fn read_number(&mut self) -> Token {
        let mut raw = String::new();

        if self.current_char() == Some('0')
            && matches!(
                self.peek_char(1),
                Some('x' | 'X' | 'b' | 'B' | 'o' | 'O')
            )
        {
            raw.push('0');
            self.advance();
            while let Some(ch) = self.current_char() {
                if is_identifier_part(ch) {
                    raw.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return Token::Number(raw);
        }

        let mut seen_dot = false;
        let mut seen_exponent = false;

        while let Some(ch) = self.current_char() {
            match ch {
                '.' if !seen_dot && !seen_exponent => {
                    seen_dot = true;
                    raw.push(ch);
                    self.advance();
                }
                'e' | 'E' if !seen_exponent => {
                    seen_exponent = true;
                    raw.push(ch);
                    self.advance();
                    if let Some(sign @ ('+' | '-')) = self.current_char() {
                        raw.push(sign);
                        self.advance();
                    }
                }
                ch if is_identifier_part(ch) => {
                    raw.push(ch);
                    self.advance();
                }
                _ => break,
            }
        }

        Token::Number(raw)
    }

    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.token_start;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        loop {
            match self.current_char() {
                Some(ch) if ch == quote => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => self.read_escape(&mut result)?,
                Some('\n') | None => {
                    return Err(LexError::new("unterminated string literal", start));
                }
                Some(ch) => {
                    result.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Resolve the escape sequence starting at the current backslash.
    fn read_escape(&mut self, out: &mut String) -> Result<(), LexError> {
        let start = self.here();
        self.advance(); // Consume backslash

        let Some(ch) = self.current_char() else {
            return Err(LexError::new("unexpected end of input after '\\'", start));
        };
        self.advance();

        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !self.current_char().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let code = self.read_hex_digits(2, start)?;
                out.push(char_from_code(code, start)?);
            }
            'u' => {
                let code = self.read_unicode_escape(start)?;
                if (0xD800..0xDC00).contains(&code)
                    && self.current_char() == Some('\\')
                    && self.peek_char(1) == Some('u')
                {
                    self.advance_by(2);
                    let low = self.read_unicode_escape(start)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(LexError::new("invalid surrogate pair in escape", start));
                    }
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char_from_code(combined, start)?);
                } else {
                    out.push(char_from_code(code, start)?);
                }
            }
            // Line continuation
            '\n' => {}
            '\r' => {
                if self.current_char() == Some('\n') {
                    self.advance();
                }
            }
            other => out.push(other),
        }

        Ok(())
    }

    fn read_unicode_escape(&mut self, start: Position) -> Result<u32, LexError> {
        if self.current_char() != Some('{') {
            return self.read_hex_digits(4, start);
        }

        self.advance();
        let mut code: u32 = 0;
        let mut digits = 0;
        while let Some(ch) = self.current_char() {
            if ch == '}' {
                break;
            }
            let digit = ch
                .to_digit(16)
                .ok_or_else(|| LexError::new("invalid unicode escape", start))?;
            code = code
                .checked_mul(16)
                .and_then(|c| c.checked_add(digit))
                .ok_or_else(|| LexError::new("unicode escape out of range", start))?;
            digits += 1;
            self.advance();
        }

        if self.current_char() != Some('}') || digits == 0 {
            return Err(LexError::new("invalid unicode escape", start));
        }
        self.advance();
        Ok(code)
    }

    fn read_hex_digits(&mut self, count: usize, start: Position) -> Result<u32, LexError> {
        let mut code = 0;
        for _ in 0..count {
            let digit = self
                .current_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| LexError::new("invalid hexadecimal escape", start))?;
            code = code * 16 + digit;
            self.advance();
        }
        Ok(code)
    }

    fn read_regex(&mut self) -> Result<Token, LexError> {
        let start = self.token_start;
        let mut pattern = String::new();
        let mut in_class = false;
        self.advance(); // Consume opening slash

        loop {
            match self.current_char() {
                None | Some('\n') => {
                    return Err(LexError::new("unterminated regular expression", start));
                }
                Some('\\') => {
                    pattern.push('\\');
                    self.advance();
                    match self.current_char() {
                        None | Some('\n') => {
                            return Err(LexError::new("unterminated regular expression", start));
                        }
                        Some(ch) => {
                            pattern.push(ch);
                            self.advance();
                        }
                    }
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some(ch) => {
                    match ch {
                        '[' => in_class = true,
                        ']' => in_class = false,
                        _ => {}
                    }
                    pattern.push(ch);
                    self.advance();
                }
            }
        }

        let flags = self.read_identifier();
        Ok(Token::Regex { pattern, flags })
    }

    fn read_template(&mut self) -> Result<Token, LexError> {
        let start = self.token_start;
        let mut chunks = Vec::new();
        let mut text = String::new();
        self.advance(); // Consume opening backtick

        loop {
            match self.current_char() {
                None => return Err(LexError::new("unterminated template literal", start)),
                Some('`') => {
                    self.advance();
                    break;
                }
                Some('\\') => self.read_escape(&mut text)?,
                Some('$') if self.peek_char(1) == Some('{') => {
                    if !text.is_empty() {
                        chunks.push(TemplateChunk::Text(mem::take(&mut text)));
                    }
                    self.advance_by(2);
                    let position = self.here();
                    let source = self.scan_interpolation(start)?;
                    chunks.push(TemplateChunk::Interpolation { source, position });
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }

        if !text.is_empty() {
            chunks.push(TemplateChunk::Text(text));
        }
        Ok(Token::Template(chunks))
    }

    /// Lex the body of a `${...}` up to its closing brace, which is consumed
    /// but not included, and return the body's source text. Braces inside
    /// strings, regex literals, comments and nested templates are skipped
    /// along with the token they belong to.
    fn scan_interpolation(&mut self, template_start: Position) -> Result<String, LexError> {
        if self.template_depth >= self.max_depth {
            return Err(LexError::new("template nesting too deep", template_start));
        }

        let outer_token_start = self.token_start;
        self.template_depth += 1;
        self.regex_allowed = true;
        let result = self.interpolation_body(template_start);
        self.template_depth -= 1;
        self.token_start = outer_token_start;
        result
    }

    fn interpolation_body(&mut self, template_start: Position) -> Result<String, LexError> {
        let start = self.position;
        let mut depth = 0usize;

        loop {
            match self.next_token()? {
                Token::Eof => {
                    return Err(LexError::new("unterminated template literal", template_start));
                }
                Token::LBrace => depth += 1,
                Token::RBrace if depth == 0 => {
                    // `}` is a single character
                    let end = self.position - 1;
                    return Ok(self.input[start..end].iter().collect());
                }
                Token::RBrace => depth -= 1,
                _ => {}
            }
        }
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn char_from_code(code: u32, position: Position) -> Result<char, LexError> {
    char::from_u32(code).ok_or_else(|| LexError::new("escape is not a valid character", position))
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("if else true false null typeof");
    assert_eq!(lexer.next_token().unwrap(), Token::If);
    assert_eq!(lexer.next_token().unwrap(), Token::Else);
    assert_eq!(lexer.next_token().unwrap(), Token::True);
    assert_eq!(lexer.next_token().unwrap(), Token::False);
    assert_eq!(lexer.next_token().unwrap(), Token::Null);
    assert_eq!(lexer.next_token().unwrap(), Token::Typeof);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

#[test]
fn test_slash_after_operand_is_division() {
    let mut lexer = Lexer::new("a / 2 / /x/g");
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("a".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Slash);
    assert_eq!(lexer.next_token().unwrap(), Token::Number("2".to_string()));
    assert_eq!(lexer.next_token().unwrap(), Token::Slash);
    assert_eq!(
        lexer.next_token().unwrap(),
        Token::Regex {
            pattern: "x".to_string(),
            flags: "g".to_string()
        }
    );
}
