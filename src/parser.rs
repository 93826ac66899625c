use thiserror::Error;

use crate::{
    ast::{BinOp, Expression, MathCall, ReferenceNamespace, Token, TokenKind, UnaryOp},
    lexer::{LexError, Lexer},
};

/// Maximum expression nesting depth before parsing aborts.
///
/// Authored formulas are short; anything approaching this limit is
/// pathological input that would otherwise exhaust the call stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Every name accepted after `math.` / `m.`, with its arity fixed by the
/// corresponding [`MathCall`] variant. `pi` is the single zero-argument form
/// and is written without parentheses.
const MATH_FUNCTIONS: &[&str] = &[
    "abs",
    "acos",
    "asin",
    "atan",
    "atan2",
    "ceil",
    "clamp",
    "cos",
    "die_roll",
    "die_roll_integer",
    "exp",
    "floor",
    "hermite_blend",
    "lerp",
    "ln",
    "max",
    "min",
    "min_angle",
    "mod",
    "pi",
    "pow",
    "random",
    "random_integer",
    "round",
    "sin",
    "sqrt",
    "trunc",
];

/// Errors produced while parsing a token stream into an [`Expression`].
///
/// Parsing is single-pass with no error recovery: the first grammar
/// violation aborts the whole parse and no partial AST is produced. Lex
/// failures discovered while pulling tokens surface through
/// [`ParseError::Lex`], so one fallible parse call reports both error kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The lexer rejected the input before it ever reached the grammar.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The next token does not fit the expected construct.
    #[error("expected {expected}, found {found} at position {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        position: usize,
    },

    /// An identifier after `math.` that is not in the function table.
    /// Unknown functions are never deferred to evaluation.
    #[error("unknown math function '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },

    /// A leading identifier other than `query`/`q`, `variable`/`v`, or
    /// `math`/`m`.
    #[error("unknown namespace '{name}' at position {position} (expected 'query', 'q', 'variable', 'v', 'math', or 'm')")]
    UnknownNamespace { name: String, position: usize },

    /// Nesting deeper than [`MAX_NESTING_DEPTH`].
    #[error("expression nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep { limit: usize },
}

/// Recursive-descent, precedence-ordered parser for Molang formulas.
///
/// Grammar, loosest binding first:
///
/// ```text
/// expression    := ternary
/// ternary       := or ( '?' or ':' or )*
/// or            := and ( '||' and )*
/// and           := comparison ( '&&' comparison )*
/// comparison    := term ( ('<'|'>'|'<='|'>=') term )*
/// term          := factor ( '+' factor | '-' factor )*
/// factor        := unary ( '*' unary | '/' unary )*
/// unary         := ('-' | '!')? parenthesized
/// parenthesized := '(' expression ')' | unit
/// unit          := NUMBER | reference
/// reference     := ('query'|'q'|'variable'|'v') '.' IDENTIFIER
///               | ('math'|'m') '.' mathcall
/// ```
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    depth: usize,
}

impl Parser {
    /// Creates a parser over the lexer, priming the first token.
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current_token.kind) == std::mem::discriminant(kind)
    }

    /// Consumes the current token if it matches `kind`.
    fn match_token(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: self.current_token.kind.to_string(),
            position: self.current_token.position,
        }
    }

    /// Parses one complete formula, requiring that the input end afterwards.
    pub fn parse(&mut self) -> Result<Expression, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(&TokenKind::Eof, "end of input")?;
        Ok(expr)
    }

    /// Parses one expression without requiring end-of-input.
    ///
    /// Every recursion through parentheses or math-call arguments funnels
    /// through here, which is where the nesting depth is enforced.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.parse_ternary();
        self.depth -= 1;
        result
    }

    fn parse_ternary(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_or()?;

        // Chained ternaries accumulate into the condition slot, so
        // `1 ? 2 : 3 ? 4 : 5` parses as `(1 ? 2 : 3) ? 4 : 5`.
        while self.match_token(&TokenKind::Question)? {
            let if_true = self.parse_or()?;
            self.expect(&TokenKind::Colon, "':' after the true branch of a ternary")?;
            let if_false = self.parse_or()?;
            left = Expression::Ternary {
                condition: Box::new(left),
                if_true: Box::new(if_true),
                if_false: Box::new(if_false),
            };
        }

        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_and()?;

        while self.match_token(&TokenKind::OrOr)? {
            let right = self.parse_and()?;
            left = Expression::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_comparison()?;

        while self.match_token(&TokenKind::AndAnd)? {
            let right = self.parse_comparison()?;
            left = Expression::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match &self.current_token.kind {
                TokenKind::Lt => BinOp::LessThan,
                TokenKind::Gt => BinOp::GreaterThan,
                TokenKind::LtEq => BinOp::LessEqual,
                TokenKind::GtEq => BinOp::GreaterEqual,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_term()?;

            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match &self.current_token.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_factor()?;

            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current_token.kind {
                TokenKind::Star => BinOp::Multiply,
                TokenKind::Slash => BinOp::Divide,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_unary()?;

            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let op = match &self.current_token.kind {
            TokenKind::Minus => Some(UnaryOp::Negate),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            self.advance()?;
            let operand = self.parse_parenthesized()?;
            return Ok(Expression::Unary {
                op,
                operand: Box::new(operand),
            });
        }

        self.parse_parenthesized()
    }

    fn parse_parenthesized(&mut self) -> Result<Expression, ParseError> {
        if self.match_token(&TokenKind::LParen)? {
            let interior = self.parse_expression()?;
            self.expect(&TokenKind::RParen, "')' to close the opening '('")?;
            return Ok(interior);
        }

        self.parse_unit()
    }

    /// Parses a leaf: a numeric literal or a namespaced reference/math call.
    fn parse_unit(&mut self) -> Result<Expression, ParseError> {
        let position = self.current_token.position;

        match self.current_token.kind.clone() {
            TokenKind::Number(value) => {
                self.advance()?;
                Ok(Expression::Constant(value))
            }
            TokenKind::Identifier(name) => {
                self.advance()?;
                self.expect(&TokenKind::Dot, "'.' after a namespace")?;

                match name.as_str() {
                    "query" | "q" => self.parse_reference(ReferenceNamespace::Query),
                    "variable" | "v" => self.parse_reference(ReferenceNamespace::Variable),
                    "math" | "m" => self.parse_math_call(),
                    _ => Err(ParseError::UnknownNamespace { name, position }),
                }
            }
            _ => Err(self.unexpected("a number, reference, or math call")),
        }
    }

    fn parse_reference(&mut self, namespace: ReferenceNamespace) -> Result<Expression, ParseError> {
        match self.current_token.kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance()?;
                Ok(Expression::Reference { namespace, name })
            }
            _ => Err(self.unexpected("a name after '.'")),
        }
    }

    fn parse_math_call(&mut self) -> Result<Expression, ParseError> {
        let position = self.current_token.position;
        let name = match self.current_token.kind.clone() {
            TokenKind::Identifier(name) => {
                self.advance()?;
                name
            }
            _ => return Err(self.unexpected("a math function name after '.'")),
        };

        if !MATH_FUNCTIONS.contains(&name.as_str()) {
            return Err(ParseError::UnknownFunction { name, position });
        }

        // pi is a bare constant form; `math.pi()` is rejected by the
        // end-of-input check in `parse`.
        if name == "pi" {
            return Ok(Expression::Math(MathCall::Pi));
        }

        self.expect(&TokenKind::LParen, "'(' to start the math call")?;

        let call = match name.as_str() {
            "abs" => MathCall::Abs(self.last_argument()?),
            "acos" => MathCall::Acos(self.last_argument()?),
            "asin" => MathCall::Asin(self.last_argument()?),
            "atan" => MathCall::Atan(self.last_argument()?),
            "atan2" => MathCall::Atan2 {
                y: self.argument()?,
                x: self.last_argument()?,
            },
            "ceil" => MathCall::Ceil(self.last_argument()?),
            "clamp" => MathCall::Clamp {
                value: self.argument()?,
                min: self.argument()?,
                max: self.last_argument()?,
            },
            "cos" => MathCall::Cos(self.last_argument()?),
            "die_roll" => MathCall::DieRoll {
                num: self.argument()?,
                low: self.argument()?,
                high: self.last_argument()?,
            },
            "die_roll_integer" => MathCall::DieRollInteger {
                num: self.argument()?,
                low: self.argument()?,
                high: self.last_argument()?,
            },
            "exp" => MathCall::Exp(self.last_argument()?),
            "floor" => MathCall::Floor(self.last_argument()?),
            "hermite_blend" => MathCall::HermiteBlend(self.last_argument()?),
            "lerp" => MathCall::Lerp {
                start: self.argument()?,
                end: self.argument()?,
                amount: self.last_argument()?,
            },
            "ln" => MathCall::Ln(self.last_argument()?),
            "max" => MathCall::Max {
                a: self.argument()?,
                b: self.last_argument()?,
            },
            "min" => MathCall::Min {
                a: self.argument()?,
                b: self.last_argument()?,
            },
            "min_angle" => MathCall::MinAngle(self.last_argument()?),
            "mod" => MathCall::Mod {
                value: self.argument()?,
                denominator: self.last_argument()?,
            },
            "pow" => MathCall::Pow {
                base: self.argument()?,
                exponent: self.last_argument()?,
            },
            "random" => MathCall::Random {
                low: self.argument()?,
                high: self.last_argument()?,
            },
            "random_integer" => MathCall::RandomInteger {
                low: self.argument()?,
                high: self.last_argument()?,
            },
            "round" => MathCall::Round(self.last_argument()?),
            "sin" => MathCall::Sin(self.last_argument()?),
            "sqrt" => MathCall::Sqrt(self.last_argument()?),
            "trunc" => MathCall::Trunc(self.last_argument()?),
            _ => unreachable!("name was checked against MATH_FUNCTIONS"),
        };

        self.expect(&TokenKind::RParen, "')' to close the math call")?;
        Ok(Expression::Math(call))
    }

    /// An argument that must be followed by a comma.
    fn argument(&mut self) -> Result<Box<Expression>, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(&TokenKind::Comma, "',' after a math call argument")?;
        Ok(Box::new(expr))
    }

    /// The final argument of a call, read without a trailing comma.
    fn last_argument(&mut self) -> Result<Box<Expression>, ParseError> {
        Ok(Box::new(self.parse_expression()?))
    }
}

/// Parses `text` into a simplified [`Expression`].
///
/// Constant subtrees are folded; to keep the raw tree use [`parse_with`].
/// Cached parsing goes through
/// [`ExpressionCache`](crate::cache::ExpressionCache), which callers own and
/// share explicitly.
pub fn parse(text: &str) -> Result<Expression, ParseError> {
    parse_with(text, true)
}

/// Parses `text`, running the constant-folding simplifier when `simplify`
/// is set.
pub fn parse_with(text: &str, simplify: bool) -> Result<Expression, ParseError> {
    let mut parser = Parser::new(Lexer::new(text))?;
    let expr = parser.parse()?;
    Ok(if simplify { expr.simplify() } else { expr })
}
