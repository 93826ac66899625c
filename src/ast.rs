//! # Molang Expression Language - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the Molang-style
//! formula language used by animation and particle content to compute
//! per-frame numeric values against host-exposed bindings.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (constants, references, operators,
//!   ternaries, math calls)
//! - **[operators]** - Binary and unary operators
//! - **[functions]** - The closed math-function table with fixed arities
//!
//! ## Quick Start
//!
//! ```text
//! math.cos(query.anim_time * 38) * variable.rotation_amount + variable.x
//! ```
//!
//! This formula samples a cosine wave from a host-supplied clock and scales
//! it by two host variables.
//!
//! ## Core Concepts
//!
//! ### Grammar shape
//!
//! Formulas are single pure expressions; there are no statements, loops,
//! user-defined functions, or strings. Precedence, loosest binding first:
//!
//! ```text
//! ternary -> or -> and -> comparison -> term -> factor -> unary -> unit
//! ```
//!
//! ### References
//!
//! A reference is a namespace tag plus a name: `query.health` (read-only
//! host value) or `variable.speed` (host-mutable value). `q.` and `v.` are
//! exact synonyms.
//!
//! ### Numbers and booleans
//!
//! Every value is an `f32`. Comparisons and logical operators produce
//! exactly 1.0 (true) or 0.0 (false); conditions treat any nonzero value
//! as true.
//!
//! ### Determinism
//!
//! A tree's shape is a deterministic function of its source text. Evaluated
//! values may still vary through the environment or the random-family math
//! functions, which is why those nodes are never constant-folded.
pub mod tokens;
pub mod expressions;
pub mod operators;
pub mod functions;

pub use tokens::{Token, TokenKind};
pub use expressions::{Expression, ReferenceNamespace};
pub use operators::{BinOp, UnaryOp};
pub use functions::MathCall;
