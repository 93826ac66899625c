/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    ///
    /// Division by zero follows IEEE semantics (signed infinity or NaN),
    /// never an error.
    Divide,

    // Comparison (result is 1.0 or 0.0)
    /// Less than (`<`)
    LessThan,
    /// Greater than (`>`)
    GreaterThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Logical (zero is false, nonzero is true; result is 1.0 or 0.0)
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-`)
    Negate,
    /// Logical NOT (`!`); zero becomes 1.0, anything else becomes 0.0
    Not,
}
