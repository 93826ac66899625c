pub mod ast;
pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod simplifier;

pub use ast::{BinOp, Expression, MathCall, ReferenceNamespace, Token, TokenKind, UnaryOp};
pub use cache::{ExpressionCache, ParseOptions};
pub use environment::{MolangEnvironment, SimpleEnvironment};
pub use evaluator::UNRESOLVED_REFERENCE_DEFAULT;
pub use lexer::{LexError, Lexer};
pub use parser::{parse, parse_with, ParseError, Parser, MAX_NESTING_DEPTH};
