// tests/expression_tests.rs

use molang_expr::{
    parse, parse_with, BinOp, Expression, MathCall, ParseError, ReferenceNamespace,
    SimpleEnvironment, UnaryOp,
};

fn eval(text: &str) -> f32 {
    parse(text).unwrap().evaluate(&SimpleEnvironment::new())
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {} to be close to {}",
        actual,
        expected
    );
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    // Raw tree so folding does not hide the shape: Add(1, Multiply(2, 3))
    let expr = parse_with("1 + 2 * 3", false).unwrap();
    match expr {
        Expression::Binary {
            op: BinOp::Add,
            left,
            right,
        } => {
            assert!(matches!(*left, Expression::Constant(n) if n == 1.0));
            assert!(matches!(
                *right,
                Expression::Binary {
                    op: BinOp::Multiply,
                    ..
                }
            ));
        }
        _ => panic!("Expected addition at the root"),
    }
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(eval("(1 + 2) * 3"), 9.0);
    assert_eq!(eval("1 + 2 * 3"), 7.0);
}

#[test]
fn test_interleaved_addition_and_subtraction() {
    assert_eq!(eval("10 - 3 + 2 - 1"), 8.0);
    assert_eq!(eval("8 / 2 * 3"), 12.0);
}

#[test]
fn test_comparison_binds_looser_than_arithmetic() {
    // 1 + 2 < 4 is (1 + 2) < 4
    assert_eq!(eval("1 + 2 < 4"), 1.0);
    assert_eq!(eval("1 + 2 < 2"), 0.0);
}

#[test]
fn test_logical_operators_bind_loosest_before_ternary() {
    // 1 < 2 && 3 < 4 groups the comparisons first
    assert_eq!(eval("1 < 2 && 3 < 4"), 1.0);
    assert_eq!(eval("1 > 2 || 3 < 4"), 1.0);
    assert_eq!(eval("1 > 2 || 3 > 4"), 0.0);
}

#[test]
fn test_ternary_chains_associate_left() {
    // (1 ? 2 : 3) ? 4 : 5 -- the first result (2, truthy) selects 4
    assert_eq!(eval("1 ? 2 : 3 ? 4 : 5"), 4.0);
    // (0 ? 0 : 0) ? 4 : 5 -- the first result (0) selects 5
    assert_eq!(eval("0 ? 0 : 0 ? 4 : 5"), 5.0);
}

#[test]
fn test_ternary_tree_shape_is_left_nested() {
    let expr = parse_with("1 ? 2 : 3 ? 4 : 5", false).unwrap();
    let expected = Expression::Ternary {
        condition: Box::new(Expression::Ternary {
            condition: Box::new(Expression::Constant(1.0)),
            if_true: Box::new(Expression::Constant(2.0)),
            if_false: Box::new(Expression::Constant(3.0)),
        }),
        if_true: Box::new(Expression::Constant(4.0)),
        if_false: Box::new(Expression::Constant(5.0)),
    };
    assert_eq!(expr, expected);
}

#[test]
fn test_unary_operators() {
    assert_eq!(eval("-5"), -5.0);
    assert_eq!(eval("-(2 + 3)"), -5.0);
    assert_eq!(eval("!0"), 1.0);
    assert_eq!(eval("!3"), 0.0);
}

// ============================================================================
// References
// ============================================================================

#[test]
fn test_long_and_short_namespace_forms_are_synonyms() {
    let long = parse_with("query.health", false).unwrap();
    let short = parse_with("q.health", false).unwrap();
    assert_eq!(long, short);

    let long = parse_with("variable.speed", false).unwrap();
    let short = parse_with("v.speed", false).unwrap();
    assert_eq!(long, short);

    let long = parse_with("math.sin(90)", false).unwrap();
    let short = parse_with("m.sin(90)", false).unwrap();
    assert_eq!(long, short);

    let long = parse_with("math.pi", false).unwrap();
    let short = parse_with("m.pi", false).unwrap();
    assert_eq!(long, short);
}

#[test]
fn test_reference_namespaces_resolve_separately() {
    let env = SimpleEnvironment::new()
        .with_query("x", 3.0)
        .with_variable("x", 5.0);
    assert_eq!(parse("q.x").unwrap().evaluate(&env), 3.0);
    assert_eq!(parse("v.x").unwrap().evaluate(&env), 5.0);
}

#[test]
fn test_reference_node_shape() {
    let expr = parse_with("q.anim_time", false).unwrap();
    assert_eq!(
        expr,
        Expression::Reference {
            namespace: ReferenceNamespace::Query,
            name: "anim_time".to_string(),
        }
    );
}

#[test]
fn test_unresolved_reference_evaluates_to_zero() {
    let env = SimpleEnvironment::new();
    assert_eq!(parse("q.missing * 10 + 1").unwrap().evaluate(&env), 1.0);
}

// ============================================================================
// Math functions
// ============================================================================

#[test]
fn test_trig_takes_degree_inputs() {
    assert_close(eval("math.sin(90)"), 1.0);
    assert_close(eval("math.cos(0)"), 1.0);
    assert_close(eval("math.cos(180)"), -1.0);
    assert_close(eval("math.sin(30)"), 0.5);
}

#[test]
fn test_rounding_family() {
    assert_eq!(eval("math.floor(2.7)"), 2.0);
    assert_eq!(eval("math.floor(-2.3)"), -3.0);
    assert_eq!(eval("math.ceil(2.3)"), 3.0);
    assert_eq!(eval("math.ceil(-2.7)"), -2.0);
    assert_eq!(eval("math.trunc(2.7)"), 2.0);
    assert_eq!(eval("math.trunc(-2.7)"), -2.0);
    assert_eq!(eval("math.round(2.5)"), 3.0);
    assert_eq!(eval("math.round(-2.5)"), -2.0);
}

#[test]
fn test_clamp_lerp_and_hermite() {
    assert_eq!(eval("math.clamp(5, 0, 2)"), 2.0);
    assert_eq!(eval("math.clamp(-1, 0, 2)"), 0.0);
    assert_eq!(eval("math.clamp(1, 0, 2)"), 1.0);
    assert_eq!(eval("math.lerp(0, 10, 0.25)"), 2.5);
    assert_eq!(eval("math.lerp(10, 0, 0.5)"), 5.0);
    assert_eq!(eval("math.hermite_blend(0.5)"), 0.5);
    assert_eq!(eval("math.hermite_blend(0)"), 0.0);
    assert_eq!(eval("math.hermite_blend(1)"), 1.0);
}

#[test]
fn test_pow_sqrt_exp_ln() {
    assert_eq!(eval("math.pow(2, 10)"), 1024.0);
    assert_eq!(eval("math.sqrt(16)"), 4.0);
    assert_close(eval("math.ln(math.exp(1))"), 1.0);
}

#[test]
fn test_min_max_abs_mod() {
    assert_eq!(eval("math.min(3, 7)"), 3.0);
    assert_eq!(eval("math.max(3, 7)"), 7.0);
    assert_eq!(eval("math.abs(-4.5)"), 4.5);
    assert_eq!(eval("math.mod(7, 4)"), 3.0);
    assert_eq!(eval("math.mod(-7, 4)"), -3.0);
    assert_eq!(eval("math.mod(7, 0)"), 0.0);
}

#[test]
fn test_pi_is_a_bare_constant() {
    assert_eq!(eval("math.pi"), std::f32::consts::PI);
    assert_close(eval("math.pi * 2"), std::f32::consts::TAU);
}

#[test]
fn test_random_stays_in_range() {
    let env = SimpleEnvironment::new().with_seed(9);
    let expr = parse("math.random(5, 10)").unwrap();
    let mut draws = Vec::new();
    for _ in 0..200 {
        let draw = expr.evaluate(&env);
        assert!((5.0..10.0).contains(&draw), "draw {} out of range", draw);
        draws.push(draw);
    }
    assert!(draws.iter().any(|&d| d != draws[0]), "draws never varied");

    let expr = parse("math.random_integer(1, 6)").unwrap();
    for _ in 0..200 {
        let draw = expr.evaluate(&env);
        assert!((1.0..=6.0).contains(&draw));
        assert_eq!(draw, draw.trunc());
    }
}

#[test]
fn test_die_roll_sums_draws() {
    let env = SimpleEnvironment::new().with_seed(11);
    let expr = parse("math.die_roll(3, 1, 2)").unwrap();
    for _ in 0..100 {
        let total = expr.evaluate(&env);
        assert!((3.0..6.0).contains(&total), "total {} out of range", total);
    }

    let expr = parse("math.die_roll_integer(2, 1, 6)").unwrap();
    for _ in 0..100 {
        let total = expr.evaluate(&env);
        assert!((2.0..=12.0).contains(&total));
        assert_eq!(total, total.trunc());
    }
}

// ============================================================================
// Error cases
// ============================================================================

#[test]
fn test_pi_with_parentheses_is_rejected() {
    assert!(parse("math.pi").is_ok());
    assert!(parse("math.pi()").is_err());
}

#[test]
fn test_unclosed_call_is_rejected() {
    assert!(parse("math.sin(1.0").is_err());
    assert!(parse("(1 + 2").is_err());
}

#[test]
fn test_unknown_function_is_named_in_the_error() {
    match parse("math.bogus(1)") {
        Err(ParseError::UnknownFunction { name, .. }) => assert_eq!(name, "bogus"),
        other => panic!("Expected UnknownFunction, got {:?}", other),
    }
}

#[test]
fn test_unknown_namespace_is_named_in_the_error() {
    match parse("texture.frame") {
        Err(ParseError::UnknownNamespace { name, .. }) => assert_eq!(name, "texture"),
        other => panic!("Expected UnknownNamespace, got {:?}", other),
    }
}

#[test]
fn test_dangling_namespace_dot_is_rejected() {
    assert!(parse("query.").is_err());
    assert!(parse("math.").is_err());
}

#[test]
fn test_wrong_arity_is_rejected() {
    assert!(parse("math.clamp(1, 2)").is_err());
    assert!(parse("math.sin(1, 2)").is_err());
    assert!(parse("math.pow(2)").is_err());
}

#[test]
fn test_trailing_tokens_are_rejected() {
    assert!(parse("1 2").is_err());
    assert!(parse("1.2.3").is_err());
    assert!(parse("q.x q.y").is_err());
}

#[test]
fn test_bitwise_operators_are_rejected_at_lex_time() {
    assert!(matches!(parse("1 & 2"), Err(ParseError::Lex(_))));
    assert!(matches!(parse("1 | 2"), Err(ParseError::Lex(_))));
}

#[test]
fn test_pathological_nesting_is_rejected() {
    let deep = format!("{}1{}", "(".repeat(400), ")".repeat(400));
    assert!(matches!(
        parse(&deep),
        Err(ParseError::NestingTooDeep { .. })
    ));

    // Well under the limit still parses.
    let shallow = format!("{}1{}", "(".repeat(50), ")".repeat(50));
    assert!(parse(&shallow).is_ok());
}

#[test]
fn test_empty_input_is_rejected() {
    assert!(parse("").is_err());
    assert!(parse("   ").is_err());
}

// ============================================================================
// End-to-end formulas
// ============================================================================

#[test]
fn test_animation_style_formula() {
    let env = SimpleEnvironment::new()
        .with_query("anim_time", 2.0)
        .with_variable("rotation_amount", 10.0);
    let expr = parse("math.cos(query.anim_time * 38) * variable.rotation_amount").unwrap();
    let expected = (2.0f32 * 38.0).to_radians().cos() * 10.0;
    assert_close(expr.evaluate(&env), expected);
}

#[test]
fn test_conditional_formula_evaluates_one_branch() {
    let env = SimpleEnvironment::new().with_query("health", 3.0);
    let expr = parse("q.health < 5 ? 0.25 : 1.0").unwrap();
    assert_eq!(expr.evaluate(&env), 0.25);

    let env = SimpleEnvironment::new().with_query("health", 20.0);
    assert_eq!(expr.evaluate(&env), 1.0);
}

#[test]
fn test_math_call_with_expression_arguments() {
    let expr = parse_with("math.max(1 + 1, q.x)", false).unwrap();
    match expr {
        Expression::Math(MathCall::Max { a, b }) => {
            assert!(matches!(
                *a,
                Expression::Binary {
                    op: BinOp::Add,
                    ..
                }
            ));
            assert!(matches!(*b, Expression::Reference { .. }));
        }
        other => panic!("Expected max call, got {:?}", other),
    }
}

#[test]
fn test_negated_reference() {
    let expr = parse_with("-q.speed", false).unwrap();
    assert!(matches!(
        expr,
        Expression::Unary {
            op: UnaryOp::Negate,
            ..
        }
    ));
}
