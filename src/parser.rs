use std::mem;

use thiserror::Error;

use crate::{
    ast::{
        ArrowBody, BinOp, DeclarationKind, Element, Expr, LogicalOp, MemberProperty, Program,
        Property, PropertyKey, Statement, TemplateChunk, Token, UnaryOp,
    },
    lexer::{LexError, Lexer, Position},
    transform::SourceParser,
};

/// Nesting limit applied by the parser and the transformer unless configured
/// otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Error raised when source text is not a well-formed program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("arrow function parameters must be plain identifiers at {position}")]
    InvalidArrowParameter { position: Position },

    #[error("nesting exceeds {max_depth} levels at {position}")]
    TooDeep { max_depth: usize, position: Position },
}

impl ParseError {
    /// Where in the source the error was detected.
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position,
            ParseError::UnexpectedToken { position, .. }
            | ParseError::InvalidArrowParameter { position }
            | ParseError::TooDeep { position, .. } => *position,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_position();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_position();
        Ok(())
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(description));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: describe(&self.current_token),
            position: self.current_position,
        }
    }

    /// Run `f` one nesting level deeper, failing once the limit is crossed.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                max_depth: self.max_depth,
                position: self.current_position,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Count one more node wrapped around a left-associative chain. The
    /// loops that build such chains do not recurse, so `nested` never sees
    /// them.
    fn fold(&self, folded: &mut usize) -> Result<(), ParseError> {
        *folded += 1;
        if self.depth + *folded > self.max_depth {
            return Err(ParseError::TooDeep {
                max_depth: self.max_depth,
                position: self.current_position,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Parse the whole input as a sequence of statements.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut body = vec![];
        while !self.check(&Token::Eof) {
            body.push(self.parse_statement()?);
        }
        Ok(Program::new(body))
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match &self.current_token {
            Token::Semicolon => {
                self.advance()?;
                Ok(Statement::Empty)
            }
            Token::If => self.nested(|p| p.parse_if()),
            Token::LBrace => {
                self.advance()?;
                let body = self.nested(|p| p.parse_block_body())?;
                Ok(Statement::Block(body))
            }
            Token::Return => {
                self.advance()?;
                let argument = if matches!(
                    self.current_token,
                    Token::Semicolon | Token::RBrace | Token::Eof
                ) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon()?;
                Ok(Statement::Return(argument))
            }
            Token::Let | Token::Const | Token::Var => self.parse_declaration(),
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                Ok(Statement::Expression(expr))
            }
        }
    }

    fn consume_semicolon(&mut self) -> Result<(), ParseError> {
        if self.check(&Token::Semicolon) {
            self.advance()?;
        }
        Ok(())
    }

    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        self.advance()?; // consume `if`
        self.expect(Token::LParen, "'(' after 'if'")?;
        let test = self.parse_expression()?;
        self.expect(Token::RParen, "')' after condition")?;

        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.check(&Token::Else) {
            self.advance()?;
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If {
            test,
            consequent,
            alternate,
        })
    }

    /// Statements up to and including the closing `}`.
    fn parse_block_body(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut body = vec![];
        while !self.check(&Token::RBrace) {
            if self.check(&Token::Eof) {
                return Err(self.unexpected("'}'"));
            }
            body.push(self.parse_statement()?);
        }
        self.advance()?; // consume `}`
        Ok(body)
    }

    fn parse_declaration(&mut self) -> Result<Statement, ParseError> {
        let kind = match self.current_token {
            Token::Let => DeclarationKind::Let,
            Token::Const => DeclarationKind::Const,
            _ => DeclarationKind::Var,
        };
        self.advance()?;

        let name = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) => {
                self.advance()?;
                name
            }
            token => {
                self.current_token = token;
                return Err(self.unexpected("a variable name"));
            }
        };

        let init = if self.check(&Token::Assign) {
            self.advance()?;
            Some(self.parse_assignment()?)
        } else {
            None
        };
        self.consume_semicolon()?;

        Ok(Statement::VariableDeclaration { kind, name, init })
    }

    // ------------------------------------------------------------------
    // Expressions, lowest precedence first
    // ------------------------------------------------------------------

    /// Parse a full expression, including the comma operator.
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_assignment()?;
        if !self.check(&Token::Comma) {
            return Ok(first);
        }

        let mut expressions = vec![first];
        while self.check(&Token::Comma) {
            self.advance()?;
            expressions.push(self.parse_assignment()?);
        }
        Ok(Expr::Sequence(expressions))
    }

    /// Parse a single expression that must span the whole input.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof, "end of input")?;
        Ok(expr)
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        self.nested(|p| {
            let target = p.parse_conditional()?;

            if p.check(&Token::Assign) {
                p.advance()?;
                let value = p.parse_assignment()?;
                return Ok(Expr::Assignment {
                    target: Box::new(target),
                    value: Box::new(value),
                });
            }
            Ok(target)
        })
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_or()?;

        if !self.check(&Token::Question) {
            return Ok(test);
        }
        self.advance()?;
        let consequent = self.parse_assignment()?;
        self.expect(Token::Colon, "':' in conditional expression")?;
        let alternate = self.parse_assignment()?;

        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        let mut folded = 0;

        loop {
            let op = match &self.current_token {
                Token::OrOr => LogicalOp::Or,
                Token::QuestionQuestion => LogicalOp::NullishCoalesce,
                _ => break,
            };

            self.fold(&mut folded)?;
            self.advance()?;
            let right = self.parse_and()?;

            left = Expr::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        let mut folded = 0;

        while self.check(&Token::AndAnd) {
            self.fold(&mut folded)?;
            self.advance()?;
            let right = self.parse_equality()?;

            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;
        let mut folded = 0;

        loop {
            let op = match &self.current_token {
                Token::EqEq => BinOp::Equal,
                Token::NotEq => BinOp::NotEqual,
                Token::EqEqEq => BinOp::StrictEqual,
                Token::NotEqEq => BinOp::StrictNotEqual,
                _ => break,
            };

            self.fold(&mut folded)?;
            self.advance()?;
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        let mut folded = 0;

        loop {
            let op = match &self.current_token {
                Token::Lt => BinOp::LessThan,
                Token::LtEq => BinOp::LessEqual,
                Token::Gt => BinOp::GreaterThan,
                Token::GtEq => BinOp::GreaterEqual,
                Token::In => BinOp::In,
                Token::Instanceof => BinOp::Instanceof,
                _ => break,
            };

            self.fold(&mut folded)?;
            self.advance()?;
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        let mut folded = 0;

        loop {
            let op = match &self.current_token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };

            self.fold(&mut folded)?;
            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_exponent()?;
        let mut folded = 0;

        loop {
            let op = match &self.current_token {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                Token::Percent => BinOp::Modulo,
                _ => break,
            };

            self.fold(&mut folded)?;
            self.advance()?;
            let right = self.parse_exponent()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// `**` is right-associative.
    fn parse_exponent(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_unary()?;

        if !self.check(&Token::StarStar) {
            return Ok(base);
        }
        self.advance()?;
        let exponent = self.nested(|p| p.parse_exponent())?;
        Ok(binary(BinOp::Exponent, base, exponent))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match &self.current_token {
            Token::Bang => UnaryOp::Not,
            Token::Minus => UnaryOp::Minus,
            Token::Plus => UnaryOp::Plus,
            Token::Typeof => UnaryOp::Typeof,
            _ => return self.parse_postfix(),
        };

        self.advance()?;
        let argument = self.nested(|p| p.parse_unary())?;
        Ok(Expr::Unary {
            op,
            argument: Box::new(argument),
        })
    }

    /// Member access and calls.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        let mut folded = 0;

        loop {
            match &self.current_token {
                Token::Dot => {
                    self.fold(&mut folded)?;
                    self.advance()?;
                    let name = match &self.current_token {
                        Token::Identifier(name) => name.clone(),
                        token => match keyword_name(token) {
                            Some(name) => name.to_string(),
                            None => return Err(self.unexpected("a property name after '.'")),
                        },
                    };
                    self.advance()?;

                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: MemberProperty::Named(name),
                    };
                }
                Token::LBracket => {
                    self.fold(&mut folded)?;
                    self.advance()?;
                    let key = self.parse_expression()?;
                    self.expect(Token::RBracket, "']'")?;

                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: MemberProperty::Computed(Box::new(key)),
                    };
                }
                Token::LParen => {
                    self.fold(&mut folded)?;
                    self.advance()?;
                    let arguments = self.parse_elements(Token::RParen, false)?;

                    expr = Expr::Call {
                        callee: Box::new(expr),
                        arguments,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Comma separated elements up to and including `close`.
    fn parse_elements(&mut self, close: Token, allow_holes: bool) -> Result<Vec<Element>, ParseError> {
        let mut elements = vec![];

        while !self.check(&close) {
            if allow_holes && self.check(&Token::Comma) {
                self.advance()?;
                elements.push(Element::Hole);
                continue;
            }

            let element = if self.check(&Token::Ellipsis) {
                self.advance()?;
                Element::Spread(self.parse_assignment()?)
            } else {
                Element::Expr(self.parse_assignment()?)
            };
            elements.push(element);

            if !self.check(&close) {
                self.expect(Token::Comma, "',' between elements")?;
            }
        }

        self.advance()?; // consume closing delimiter
        Ok(elements)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            // Literals
            Token::Number(raw) => {
                self.advance()?;
                Ok(Expr::Number(raw))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(Expr::String(s))
            }
            Token::True => {
                self.advance()?;
                Ok(Expr::Boolean(true))
            }
            Token::False => {
                self.advance()?;
                Ok(Expr::Boolean(false))
            }
            Token::Null => {
                self.advance()?;
                Ok(Expr::Null)
            }
            Token::Regex { pattern, flags } => {
                self.advance()?;
                Ok(Expr::Regex { pattern, flags })
            }
            Token::Template(chunks) => {
                self.advance()?;
                self.parse_template(chunks)
            }

            // `x => body` or a plain reference
            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::Arrow) {
                    self.advance()?;
                    let body = self.parse_arrow_body()?;
                    return Ok(Expr::Arrow {
                        params: vec![name],
                        body,
                    });
                }
                Ok(Expr::Identifier(name))
            }

            Token::LParen => {
                self.advance()?;
                self.parse_parenthesized()
            }
            Token::LBracket => {
                self.advance()?;
                let elements = self.parse_elements(Token::RBracket, true)?;
                Ok(Expr::Array(elements))
            }
            Token::LBrace => {
                self.advance()?;
                self.parse_object_literal()
            }

            token => {
                self.current_token = token;
                Err(self.unexpected("an expression"))
            }
        }
    }

    /// Either a grouped expression or an arrow function parameter list; which
    /// one is only known once the closing `)` is followed (or not) by `=>`.
    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        if self.check(&Token::RParen) {
            self.advance()?;
            if !self.check(&Token::Arrow) {
                return Err(self.unexpected("'=>' after '()'"));
            }
            self.advance()?;
            let body = self.parse_arrow_body()?;
            return Ok(Expr::Arrow {
                params: vec![],
                body,
            });
        }

        let mut items = vec![self.parse_assignment()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            if self.check(&Token::RParen) {
                break;
            }
            items.push(self.parse_assignment()?);
        }
        self.expect(Token::RParen, "')'")?;

        if self.check(&Token::Arrow) {
            let position = self.current_position;
            self.advance()?;

            let params = items
                .into_iter()
                .map(|item| match item {
                    Expr::Identifier(name) => Ok(name),
                    _ => Err(ParseError::InvalidArrowParameter { position }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let body = self.parse_arrow_body()?;
            return Ok(Expr::Arrow { params, body });
        }

        if items.len() == 1 {
            Ok(items.remove(0))
        } else {
            Ok(Expr::Sequence(items))
        }
    }

    fn parse_arrow_body(&mut self) -> Result<ArrowBody, ParseError> {
        if self.check(&Token::LBrace) {
            self.advance()?;
            let body = self.nested(|p| p.parse_block_body())?;
            return Ok(ArrowBody::Block(body));
        }
        Ok(ArrowBody::Expr(Box::new(self.parse_assignment()?)))
    }

    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        let mut properties = vec![];

        while !self.check(&Token::RBrace) {
            if self.check(&Token::Ellipsis) {
                self.advance()?;
                properties.push(Property::Spread(self.parse_assignment()?));
            } else {
                let key = self.parse_property_key()?;

                let value = if self.check(&Token::Colon) {
                    self.advance()?;
                    self.parse_assignment()?
                } else if let PropertyKey::Identifier(name) = &key {
                    // Shorthand `{ name }`
                    Expr::Identifier(name.clone())
                } else {
                    return Err(self.unexpected("':' after property name"));
                };

                properties.push(Property::KeyValue { key, value });
            }

            if !self.check(&Token::RBrace) {
                self.expect(Token::Comma, "',' between properties")?;
            }
        }

        self.advance()?; // consume `}`
        Ok(Expr::Object(properties))
    }

    fn parse_property_key(&mut self) -> Result<PropertyKey, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(PropertyKey::Identifier(name))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(PropertyKey::String(s))
            }
            Token::Number(raw) => {
                self.advance()?;
                Ok(PropertyKey::Number(raw))
            }
            Token::LBracket => {
                self.advance()?;
                let key = self.parse_assignment()?;
                self.expect(Token::RBracket, "']' after computed key")?;
                Ok(PropertyKey::Computed(Box::new(key)))
            }
            token => match keyword_name(&token) {
                Some(name) => {
                    self.advance()?;
                    Ok(PropertyKey::Identifier(name.to_string()))
                }
                None => {
                    self.current_token = token;
                    Err(self.unexpected("a property name"))
                }
            },
        }
    }

    /// Parse each interpolation with a fresh parser positioned at its source.
    fn parse_template(&mut self, chunks: Vec<TemplateChunk>) -> Result<Expr, ParseError> {
        let mut quasis = vec![String::new()];
        let mut expressions = vec![];

        for chunk in chunks {
            match chunk {
                TemplateChunk::Text(text) => {
                    if let Some(last) = quasis.last_mut() {
                        last.push_str(&text);
                    }
                }
                TemplateChunk::Interpolation { source, position } => {
                    let lexer =
                        Lexer::with_origin(&source, position).with_max_depth(self.max_depth);
                    let mut parser = Parser::new(lexer)?.with_max_depth(self.max_depth);
                    parser.depth = self.depth;

                    expressions.push(parser.parse()?);
                    quasis.push(String::new());
                }
            }
        }

        Ok(Expr::Template {
            quasis,
            expressions,
        })
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Keywords are valid property names after `.` and in object literals.
fn keyword_name(token: &Token) -> Option<&'static str> {
    let name = match token {
        Token::True => "true",
        Token::False => "false",
        Token::Null => "null",
        Token::If => "if",
        Token::Else => "else",
        Token::Return => "return",
        Token::Let => "let",
        Token::Const => "const",
        Token::Var => "var",
        Token::Typeof => "typeof",
        Token::In => "in",
        Token::Instanceof => "instanceof",
        _ => return None,
    };
    Some(name)
}

fn describe(token: &Token) -> String {
    match token {
        Token::Eof => "end of input".to_string(),
        Token::Identifier(name) => format!("identifier '{}'", name),
        Token::Number(raw) => format!("number {}", raw),
        Token::String(s) => format!("string {:?}", s),
        token => match keyword_name(token) {
            Some(name) => format!("keyword '{}'", name),
            None => format!("{:?}", token),
        },
    }
}

/// The bundled parser for the JavaScript expression subset.
#[derive(Debug, Clone, Copy)]
pub struct JsParser {
    max_depth: usize,
}

impl JsParser {
    pub fn new() -> Self {
        JsParser {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        JsParser { max_depth }
    }
}

impl Default for JsParser {
    fn default() -> Self {
        JsParser::new()
    }
}

impl SourceParser for JsParser {
    type Error = ParseError;

    fn parse(&self, source: &str) -> Result<Program, ParseError> {
        Parser::new(Lexer::new(source).with_max_depth(self.max_depth))?
            .with_max_depth(self.max_depth)
            .parse_program()
    }
}
