//! Constant folding over parsed trees.
//!
//! Folding runs children-first and collapses a node to a [`Expression::Constant`]
//! only when every child is already constant and the node itself is
//! deterministic. References depend on the environment and the random-family
//! math functions draw fresh values per evaluation, so neither ever folds.
//! Folded arithmetic reuses the evaluator, so a simplified tree evaluates to
//! bit-identical results.

use crate::ast::{Expression, MathCall};
use crate::environment::MolangEnvironment;

/// Environment handed to the evaluator while folding.
///
/// Folding only ever evaluates deterministic nodes whose children are
/// constants, so none of these methods can be reached.
struct InertEnvironment;

impl MolangEnvironment for InertEnvironment {
    fn query(&self, _name: &str) -> Option<f32> {
        None
    }

    fn variable(&self, _name: &str) -> Option<f32> {
        None
    }

    fn random(&self) -> f32 {
        0.0
    }
}

impl Expression {
    /// Returns an equivalent tree with deterministic constant subtrees
    /// collapsed into single [`Expression::Constant`] leaves.
    ///
    /// `math.cos(0.5) * 10 + q.x` simplifies to `8.77583 + q.x`: the
    /// environment-independent half folds at parse time and the reference
    /// survives untouched. The result evaluates identically to the input
    /// under every environment.
    pub fn simplify(&self) -> Expression {
        match self {
            Expression::Constant(_) | Expression::Reference { .. } => self.clone(),

            Expression::Unary { op, operand } => {
                let operand = operand.simplify();
                let node = Expression::Unary {
                    op: *op,
                    operand: Box::new(operand),
                };
                fold_if_constant(node)
            }

            Expression::Binary { op, left, right } => {
                let node = Expression::Binary {
                    op: *op,
                    left: Box::new(left.simplify()),
                    right: Box::new(right.simplify()),
                };
                fold_if_constant(node)
            }

            Expression::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                let node = Expression::Ternary {
                    condition: Box::new(condition.simplify()),
                    if_true: Box::new(if_true.simplify()),
                    if_false: Box::new(if_false.simplify()),
                };
                fold_if_constant(node)
            }

            Expression::Math(call) => {
                let call = call.simplify_args();
                if call.is_deterministic() && call.args().iter().all(|a| a.is_constant()) {
                    Expression::Constant(Expression::Math(call).evaluate(&InertEnvironment))
                } else {
                    Expression::Math(call)
                }
            }
        }
    }
}

/// Collapses an operator node whose children are all constant.
fn fold_if_constant(node: Expression) -> Expression {
    let foldable = match &node {
        Expression::Unary { operand, .. } => operand.is_constant(),
        Expression::Binary { left, right, .. } => left.is_constant() && right.is_constant(),
        Expression::Ternary {
            condition,
            if_true,
            if_false,
        } => condition.is_constant() && if_true.is_constant() && if_false.is_constant(),
        _ => false,
    };
    if foldable {
        Expression::Constant(node.evaluate(&InertEnvironment))
    } else {
        node
    }
}

impl MathCall {
    /// Rebuilds the call with each argument simplified.
    fn simplify_args(&self) -> MathCall {
        let s = |e: &Expression| Box::new(e.simplify());
        match self {
            MathCall::Abs(e) => MathCall::Abs(s(e)),
            MathCall::Acos(e) => MathCall::Acos(s(e)),
            MathCall::Asin(e) => MathCall::Asin(s(e)),
            MathCall::Atan(e) => MathCall::Atan(s(e)),
            MathCall::Atan2 { y, x } => MathCall::Atan2 { y: s(y), x: s(x) },
            MathCall::Ceil(e) => MathCall::Ceil(s(e)),
            MathCall::Clamp { value, min, max } => MathCall::Clamp {
                value: s(value),
                min: s(min),
                max: s(max),
            },
            MathCall::Cos(e) => MathCall::Cos(s(e)),
            MathCall::DieRoll { num, low, high } => MathCall::DieRoll {
                num: s(num),
                low: s(low),
                high: s(high),
            },
            MathCall::DieRollInteger { num, low, high } => MathCall::DieRollInteger {
                num: s(num),
                low: s(low),
                high: s(high),
            },
            MathCall::Exp(e) => MathCall::Exp(s(e)),
            MathCall::Floor(e) => MathCall::Floor(s(e)),
            MathCall::HermiteBlend(e) => MathCall::HermiteBlend(s(e)),
            MathCall::Lerp { start, end, amount } => MathCall::Lerp {
                start: s(start),
                end: s(end),
                amount: s(amount),
            },
            MathCall::Ln(e) => MathCall::Ln(s(e)),
            MathCall::Max { a, b } => MathCall::Max { a: s(a), b: s(b) },
            MathCall::Min { a, b } => MathCall::Min { a: s(a), b: s(b) },
            MathCall::MinAngle(e) => MathCall::MinAngle(s(e)),
            MathCall::Mod { value, denominator } => MathCall::Mod {
                value: s(value),
                denominator: s(denominator),
            },
            MathCall::Pi => MathCall::Pi,
            MathCall::Pow { base, exponent } => MathCall::Pow {
                base: s(base),
                exponent: s(exponent),
            },
            MathCall::Random { low, high } => MathCall::Random {
                low: s(low),
                high: s(high),
            },
            MathCall::RandomInteger { low, high } => MathCall::RandomInteger {
                low: s(low),
                high: s(high),
            },
            MathCall::Round(e) => MathCall::Round(s(e)),
            MathCall::Sin(e) => MathCall::Sin(s(e)),
            MathCall::Sqrt(e) => MathCall::Sqrt(s(e)),
            MathCall::Trunc(e) => MathCall::Trunc(s(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Expression;
    use crate::parser::parse_with;

    fn simplified(text: &str) -> Expression {
        parse_with(text, true).unwrap()
    }

    #[test]
    fn arithmetic_folds_to_a_single_constant() {
        assert_eq!(simplified("1 + 2 * 3"), Expression::Constant(7.0));
        assert_eq!(simplified("-(4 / 2)"), Expression::Constant(-2.0));
        assert_eq!(simplified("1 ? 2 : 3"), Expression::Constant(2.0));
    }

    #[test]
    fn deterministic_math_folds() {
        assert_eq!(simplified("math.sqrt(16)"), Expression::Constant(4.0));
        assert_eq!(
            simplified("math.clamp(5, 0, 2)"),
            Expression::Constant(2.0)
        );
        assert_eq!(simplified("math.pi"), Expression::Constant(std::f32::consts::PI));
    }

    #[test]
    fn references_block_folding_above_them() {
        let expr = simplified("q.x + (2 * 3)");
        match expr {
            Expression::Binary { left, right, .. } => {
                assert!(matches!(*left, Expression::Reference { .. }));
                assert_eq!(*right, Expression::Constant(6.0));
            }
            other => panic!("expected binary node, got {:?}", other),
        }
    }

    #[test]
    fn random_family_never_folds() {
        assert!(matches!(
            simplified("math.random(0, 1)"),
            Expression::Math(_)
        ));
        assert!(matches!(
            simplified("math.die_roll(2, 1, 6)"),
            Expression::Math(_)
        ));
        // Constant arguments still fold inside the call.
        match simplified("math.random(1 + 1, 10)") {
            Expression::Math(crate::ast::MathCall::Random { low, .. }) => {
                assert_eq!(*low, Expression::Constant(2.0));
            }
            other => panic!("expected random call, got {:?}", other),
        }
    }
}
