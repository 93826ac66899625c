//! CLI support for molang-expr
//!
//! Provides programmatic access to the CLI functionality for embedding in
//! other tools (asset pipelines, content linters).

use std::io;

use thiserror::Error;

use crate::environment::SimpleEnvironment;
use crate::parser::{self, ParseError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Parser error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    /// A `-q`/`-v` binding that is not `name=number`
    #[error("Invalid binding '{0}' (expected name=number, e.g. health=20)")]
    InvalidBinding(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No expression provided
    #[error("No expression provided. Pass one as an argument or pipe it to stdin.")]
    NoInput,
}

/// Options for an `eval` invocation.
pub struct EvalOptions {
    pub expression: String,
    /// `query.*` bindings as `(name, value)` pairs.
    pub queries: Vec<(String, f32)>,
    /// `variable.*` bindings as `(name, value)` pairs.
    pub variables: Vec<(String, f32)>,
    /// Seed for the random generator; unseeded runs use a fixed default.
    pub seed: Option<u64>,
    /// Skip constant folding before evaluation.
    pub raw: bool,
}

/// Splits a `name=number` binding argument.
pub fn parse_binding(binding: &str) -> Result<(String, f32), CliError> {
    let (name, value) = binding
        .split_once('=')
        .ok_or_else(|| CliError::InvalidBinding(binding.to_string()))?;
    let value: f32 = value
        .parse()
        .map_err(|_| CliError::InvalidBinding(binding.to_string()))?;
    if name.is_empty() {
        return Err(CliError::InvalidBinding(binding.to_string()));
    }
    Ok((name.to_string(), value))
}

/// Parses and evaluates an expression under the supplied bindings.
pub fn execute_eval(options: &EvalOptions) -> Result<f32, CliError> {
    let expr = parser::parse_with(&options.expression, !options.raw)?;

    let mut env = SimpleEnvironment::new();
    if let Some(seed) = options.seed {
        env = env.with_seed(seed);
    }
    for (name, value) in &options.queries {
        env.set_query(name, *value);
    }
    for (name, value) in &options.variables {
        env.set_variable(name, *value);
    }

    Ok(expr.evaluate(&env))
}

/// Parses an expression without evaluating it, reporting the first syntax
/// error if any.
pub fn execute_check(expression: &str) -> Result<(), CliError> {
    parser::parse_with(expression, false)?;
    Ok(())
}
