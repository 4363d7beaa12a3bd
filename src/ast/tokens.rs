use crate::lexer::Position;

/// Piece of a template literal as seen by the lexer.
///
/// Interpolations are kept as raw source and parsed later by the parser, which
/// keeps the lexer free of parser state.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChunk {
    /// Static text, escapes already resolved
    Text(String),

    /// Source of a `${...}` interpolation and where it starts
    Interpolation { source: String, position: Position },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal, kept verbatim
    ///
    /// The transformer evaluates the text, so malformed digits are reported
    /// there rather than by the lexer.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// 0xFF00FF
    /// 0b0101_1010
    /// ```
    Number(String),

    /// String literal in single or double quotes, escapes resolved
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'it\'s'
    /// ```
    String(String),

    /// Template literal
    ///
    /// # Examples
    /// ```text
    /// `Hello, ${name}!`
    /// ```
    Template(Vec<TemplateChunk>),

    /// Regular expression literal
    ///
    /// # Examples
    /// ```text
    /// /abc/i
    /// ```
    Regex { pattern: String, flags: String },

    /// Identifier
    ///
    /// # Examples
    /// ```text
    /// user
    /// item_count
    /// $scope
    /// ```
    Identifier(String),

    // Keywords
    True,
    False,
    Null,
    If,
    Else,
    Return,
    Let,
    Const,
    Var,
    Typeof,
    In,
    Instanceof,

    // Operators
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `===`
    EqEqEq,
    /// `!==`
    NotEqEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Bang,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `??`
    QuestionQuestion,
    /// `?`
    Question,
    /// `=`
    Assign,
    /// `=>`
    Arrow,
    /// `...`
    Ellipsis,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Dot,
    Comma,
    Colon,
    Semicolon,

    /// End of input
    Eof,
}

impl Token {
    /// Whether a `/` following this token starts a division rather than a regex.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::String(_)
                | Token::Template(_)
                | Token::Regex { .. }
                | Token::Identifier(_)
                | Token::True
                | Token::False
                | Token::Null
                | Token::RParen
                | Token::RBracket
                | Token::RBrace
        )
    }
}
