//! Pure tree-walk evaluation of parsed formulas.
//!
//! Evaluation never fails: numeric edge cases (division by zero,
//! out-of-domain inputs) follow IEEE semantics and propagate NaN or
//! infinity silently. Authoring mistakes surface earlier, at parse time.

use crate::ast::{BinOp, Expression, MathCall, ReferenceNamespace, UnaryOp};
use crate::environment::MolangEnvironment;

/// Value substituted when the environment cannot resolve a reference name.
///
/// The single policy point for unresolved references: partially bound
/// contexts evaluate with this default instead of aborting. Changing the
/// policy (e.g. to a hard error) only touches this module.
pub const UNRESOLVED_REFERENCE_DEFAULT: f32 = 0.0;

/// The boolean-as-number convention, read side: zero is false, any other
/// value (including NaN-free negatives and fractions) is true.
fn is_truthy(value: f32) -> bool {
    value != 0.0
}

/// The boolean-as-number convention, write side: results of comparisons and
/// logical operators are normalized to exactly 1.0 or 0.0.
fn bool_to_num(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

impl Expression {
    /// Evaluates the tree against a host environment, producing a number.
    ///
    /// Read-only with respect to the tree, so one shared (e.g. cached) tree
    /// may be evaluated concurrently from many threads; thread-safety of
    /// the environment itself is the caller's concern. The environment's
    /// randomness source is consulted only by the random-family math
    /// functions.
    pub fn evaluate(&self, env: &dyn MolangEnvironment) -> f32 {
        match self {
            Expression::Constant(value) => *value,

            Expression::Reference { namespace, name } => {
                let bound = match namespace {
                    ReferenceNamespace::Query => env.query(name),
                    ReferenceNamespace::Variable => env.variable(name),
                };
                bound.unwrap_or(UNRESOLVED_REFERENCE_DEFAULT)
            }

            Expression::Unary { op, operand } => {
                let value = operand.evaluate(env);
                match op {
                    UnaryOp::Negate => -value,
                    UnaryOp::Not => bool_to_num(!is_truthy(value)),
                }
            }

            // Both operands of `&&`/`||` are evaluated; short-circuiting
            // would change how many random draws a formula performs.
            Expression::Binary { op, left, right } => {
                let lhs = left.evaluate(env);
                let rhs = right.evaluate(env);
                match op {
                    BinOp::Add => lhs + rhs,
                    BinOp::Subtract => lhs - rhs,
                    BinOp::Multiply => lhs * rhs,
                    BinOp::Divide => lhs / rhs,
                    BinOp::LessThan => bool_to_num(lhs < rhs),
                    BinOp::GreaterThan => bool_to_num(lhs > rhs),
                    BinOp::LessEqual => bool_to_num(lhs <= rhs),
                    BinOp::GreaterEqual => bool_to_num(lhs >= rhs),
                    BinOp::And => bool_to_num(is_truthy(lhs) && is_truthy(rhs)),
                    BinOp::Or => bool_to_num(is_truthy(lhs) || is_truthy(rhs)),
                }
            }

            Expression::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                if is_truthy(condition.evaluate(env)) {
                    if_true.evaluate(env)
                } else {
                    if_false.evaluate(env)
                }
            }

            Expression::Math(call) => call.evaluate(env),
        }
    }
}

impl MathCall {
    pub(crate) fn evaluate(&self, env: &dyn MolangEnvironment) -> f32 {
        match self {
            MathCall::Abs(e) => e.evaluate(env).abs(),
            MathCall::Acos(e) => e.evaluate(env).to_radians().acos(),
            MathCall::Asin(e) => e.evaluate(env).to_radians().asin(),
            MathCall::Atan(e) => e.evaluate(env).to_radians().atan(),
            MathCall::Atan2 { y, x } => y
                .evaluate(env)
                .to_radians()
                .atan2(x.evaluate(env).to_radians()),
            MathCall::Ceil(e) => e.evaluate(env).ceil(),
            MathCall::Clamp { value, min, max } => value
                .evaluate(env)
                .max(min.evaluate(env))
                .min(max.evaluate(env)),
            MathCall::Cos(e) => e.evaluate(env).to_radians().cos(),
            MathCall::DieRoll { num, low, high } => {
                let rolls = num.evaluate(env) as i32;
                let low = low.evaluate(env);
                let high = high.evaluate(env);
                let mut total = 0.0;
                for _ in 0..rolls {
                    total += low + env.random() * (high - low);
                }
                total
            }
            MathCall::DieRollInteger { num, low, high } => {
                let rolls = num.evaluate(env) as i32;
                let low = low.evaluate(env) as i32;
                let high = high.evaluate(env) as i32;
                let mut total = 0;
                for _ in 0..rolls {
                    total += env.random_int(low, high);
                }
                total as f32
            }
            MathCall::Exp(e) => e.evaluate(env).exp(),
            MathCall::Floor(e) => e.evaluate(env).floor(),
            MathCall::HermiteBlend(e) => {
                let t = e.evaluate(env);
                t * t * (3.0 - 2.0 * t)
            }
            MathCall::Lerp { start, end, amount } => {
                let start = start.evaluate(env);
                let end = end.evaluate(env);
                start + (end - start) * amount.evaluate(env)
            }
            MathCall::Ln(e) => e.evaluate(env).ln(),
            MathCall::Max { a, b } => a.evaluate(env).max(b.evaluate(env)),
            MathCall::Min { a, b } => a.evaluate(env).min(b.evaluate(env)),
            MathCall::MinAngle(e) => {
                let angle = e.evaluate(env);
                // Non-finite angles can never wrap into range.
                if !angle.is_finite() {
                    return angle;
                }
                // Closed-form wrap into (-180, 180]; a subtract loop stalls
                // once the input's ulp exceeds 360.
                angle - 360.0 * ((angle - 180.0) / 360.0).ceil()
            }
            MathCall::Mod { value, denominator } => {
                let denominator = denominator.evaluate(env);
                if denominator == 0.0 {
                    0.0
                } else {
                    value.evaluate(env) % denominator
                }
            }
            MathCall::Pi => std::f32::consts::PI,
            MathCall::Pow { base, exponent } => {
                base.evaluate(env).powf(exponent.evaluate(env))
            }
            MathCall::Random { low, high } => {
                let low = low.evaluate(env);
                let high = high.evaluate(env);
                low + env.random() * (high - low)
            }
            MathCall::RandomInteger { low, high } => {
                let low = low.evaluate(env) as i32;
                let high = high.evaluate(env) as i32;
                env.random_int(low, high) as f32
            }
            // Half-up rounding, matching authored-content expectations
            // (-2.5 rounds to -2, not -3).
            MathCall::Round(e) => (e.evaluate(env) + 0.5).floor(),
            MathCall::Sin(e) => e.evaluate(env).to_radians().sin(),
            MathCall::Sqrt(e) => e.evaluate(env).sqrt(),
            MathCall::Trunc(e) => e.evaluate(env).trunc(),
        }
    }
}
