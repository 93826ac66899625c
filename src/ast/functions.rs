use crate::ast::Expression;

/// A call into the fixed math-function library.
///
/// The function table is closed: every function has exactly one variant here
/// with its arity baked into the variant shape, so `evaluate` and `simplify`
/// are forced by the compiler to handle every function when the table
/// changes. Unknown names are rejected at parse time, never deferred to
/// evaluation.
///
/// Trigonometric functions interpret their inputs as **degrees**, matching
/// authored animation content.
#[derive(Debug, Clone, PartialEq)]
pub enum MathCall {
    /// `math.abs(value)` - absolute value
    Abs(Box<Expression>),
    /// `math.acos(value)` - arc-cosine of a degree input
    Acos(Box<Expression>),
    /// `math.asin(value)` - arc-sine of a degree input
    Asin(Box<Expression>),
    /// `math.atan(value)` - arc-tangent of a degree input
    Atan(Box<Expression>),
    /// `math.atan2(y, x)` - arc-tangent of `y/x` (degree inputs)
    Atan2 {
        y: Box<Expression>,
        x: Box<Expression>,
    },
    /// `math.ceil(value)` - round up to the nearest integer
    Ceil(Box<Expression>),
    /// `math.clamp(value, min, max)` - clamp `value` into `[min, max]`
    Clamp {
        value: Box<Expression>,
        min: Box<Expression>,
        max: Box<Expression>,
    },
    /// `math.cos(value)` - cosine of a degree input
    Cos(Box<Expression>),
    /// `math.die_roll(num, low, high)` - sum of `num` random draws in
    /// `[low, high)`; non-deterministic, never constant-folded
    DieRoll {
        num: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
    },
    /// `math.die_roll_integer(num, low, high)` - sum of `num` random
    /// integers in `[low, high]`; non-deterministic, never constant-folded
    DieRollInteger {
        num: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
    },
    /// `math.exp(value)` - e raised to `value`
    Exp(Box<Expression>),
    /// `math.floor(value)` - round down to the nearest integer
    Floor(Box<Expression>),
    /// `math.hermite_blend(t)` - cubic ease `3t^2 - 2t^3`
    HermiteBlend(Box<Expression>),
    /// `math.lerp(start, end, amount)` - linear interpolation
    Lerp {
        start: Box<Expression>,
        end: Box<Expression>,
        amount: Box<Expression>,
    },
    /// `math.ln(value)` - natural logarithm
    Ln(Box<Expression>),
    /// `math.max(a, b)` - larger of two values
    Max {
        a: Box<Expression>,
        b: Box<Expression>,
    },
    /// `math.min(a, b)` - smaller of two values
    Min {
        a: Box<Expression>,
        b: Box<Expression>,
    },
    /// `math.min_angle(value)` - wrap a degree angle into `(-180, 180]`
    MinAngle(Box<Expression>),
    /// `math.mod(value, denominator)` - remainder; a zero denominator
    /// yields 0.0 rather than NaN
    Mod {
        value: Box<Expression>,
        denominator: Box<Expression>,
    },
    /// `math.pi` - the constant pi; the only zero-argument form, written
    /// without parentheses
    Pi,
    /// `math.pow(base, exponent)` - `base` raised to `exponent`
    Pow {
        base: Box<Expression>,
        exponent: Box<Expression>,
    },
    /// `math.random(low, high)` - uniform random draw in `[low, high)`;
    /// non-deterministic, never constant-folded
    Random {
        low: Box<Expression>,
        high: Box<Expression>,
    },
    /// `math.random_integer(low, high)` - random integer in `[low, high]`;
    /// non-deterministic, never constant-folded
    RandomInteger {
        low: Box<Expression>,
        high: Box<Expression>,
    },
    /// `math.round(value)` - round half-up to the nearest integer
    Round(Box<Expression>),
    /// `math.sin(value)` - sine of a degree input
    Sin(Box<Expression>),
    /// `math.sqrt(value)` - square root
    Sqrt(Box<Expression>),
    /// `math.trunc(value)` - drop the fractional part, toward zero
    Trunc(Box<Expression>),
}

impl MathCall {
    /// The source-level function name, as written after `math.`.
    pub fn name(&self) -> &'static str {
        match self {
            MathCall::Abs(_) => "abs",
            MathCall::Acos(_) => "acos",
            MathCall::Asin(_) => "asin",
            MathCall::Atan(_) => "atan",
            MathCall::Atan2 { .. } => "atan2",
            MathCall::Ceil(_) => "ceil",
            MathCall::Clamp { .. } => "clamp",
            MathCall::Cos(_) => "cos",
            MathCall::DieRoll { .. } => "die_roll",
            MathCall::DieRollInteger { .. } => "die_roll_integer",
            MathCall::Exp(_) => "exp",
            MathCall::Floor(_) => "floor",
            MathCall::HermiteBlend(_) => "hermite_blend",
            MathCall::Lerp { .. } => "lerp",
            MathCall::Ln(_) => "ln",
            MathCall::Max { .. } => "max",
            MathCall::Min { .. } => "min",
            MathCall::MinAngle(_) => "min_angle",
            MathCall::Mod { .. } => "mod",
            MathCall::Pi => "pi",
            MathCall::Pow { .. } => "pow",
            MathCall::Random { .. } => "random",
            MathCall::RandomInteger { .. } => "random_integer",
            MathCall::Round(_) => "round",
            MathCall::Sin(_) => "sin",
            MathCall::Sqrt(_) => "sqrt",
            MathCall::Trunc(_) => "trunc",
        }
    }

    /// Whether this call always produces the same result for the same
    /// operand values.
    ///
    /// The random and die-roll family consults the environment's randomness
    /// source and is therefore excluded from constant folding.
    pub fn is_deterministic(&self) -> bool {
        !matches!(
            self,
            MathCall::Random { .. }
                | MathCall::RandomInteger { .. }
                | MathCall::DieRoll { .. }
                | MathCall::DieRollInteger { .. }
        )
    }

    /// The operand sub-expressions, in source order.
    pub fn args(&self) -> Vec<&Expression> {
        match self {
            MathCall::Pi => vec![],
            MathCall::Abs(e)
            | MathCall::Acos(e)
            | MathCall::Asin(e)
            | MathCall::Atan(e)
            | MathCall::Ceil(e)
            | MathCall::Cos(e)
            | MathCall::Exp(e)
            | MathCall::Floor(e)
            | MathCall::HermiteBlend(e)
            | MathCall::Ln(e)
            | MathCall::MinAngle(e)
            | MathCall::Round(e)
            | MathCall::Sin(e)
            | MathCall::Sqrt(e)
            | MathCall::Trunc(e) => vec![e],
            MathCall::Atan2 { y: a, x: b }
            | MathCall::Max { a, b }
            | MathCall::Min { a, b }
            | MathCall::Mod {
                value: a,
                denominator: b,
            }
            | MathCall::Pow {
                base: a,
                exponent: b,
            }
            | MathCall::Random { low: a, high: b }
            | MathCall::RandomInteger { low: a, high: b } => vec![a, b],
            MathCall::Clamp {
                value: a,
                min: b,
                max: c,
            }
            | MathCall::DieRoll {
                num: a,
                low: b,
                high: c,
            }
            | MathCall::DieRollInteger {
                num: a,
                low: b,
                high: c,
            }
            | MathCall::Lerp {
                start: a,
                end: b,
                amount: c,
            } => vec![a, b, c],
        }
    }
}
