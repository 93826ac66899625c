use std::fmt;

/// The kind of a lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// 0.5
    /// ```
    Number(f32),

    /// Bare-word identifier (case-sensitive)
    ///
    /// Must start with a letter or underscore, followed by letters, digits,
    /// or underscores.
    ///
    /// # Examples
    /// ```text
    /// query
    /// anim_time
    /// hermite_blend
    /// ```
    Identifier(String),

    // Arithmetic
    /// Addition
    Plus,

    /// Subtraction (also unary negation)
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    // Comparison
    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Logical
    /// Logical AND (`&&`)
    AndAnd,

    /// Logical OR (`||`)
    OrOr,

    /// Logical NOT (`!`)
    Bang,

    // Ternary
    /// Ternary condition marker (`?`)
    Question,

    /// Ternary branch separator (`:`)
    Colon,

    // Delimiters
    /// Left parenthesis for grouping or math-call argument lists
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma between math-call arguments
    Comma,

    /// Dot between a namespace and a name
    ///
    /// # Examples
    /// ```text
    /// query.health
    /// math.sin(...)
    /// ```
    Dot,

    /// End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Identifier(name) => write!(f, "'{}'", name),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::OrOr => write!(f, "'||'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A lexical token with its character position in the source text.
///
/// Tokens live only for the duration of one parse call; the AST keeps no
/// token data.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Token { kind, position }
    }
}
