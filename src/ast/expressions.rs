use crate::ast::{BinOp, MathCall, UnaryOp};

/// The namespace a reference reads from.
///
/// The two-letter aliases `q` and `v` are exact synonyms for `query` and
/// `variable` and collapse to the same namespace during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceNamespace {
    /// A read-only named value exposed by the host (`query.` / `q.`)
    Query,
    /// A named value the host may mutate between evaluations
    /// (`variable.` / `v.`)
    Variable,
}

/// Abstract Syntax Tree node representing a parsed formula.
///
/// The tree is acyclic and each node exclusively owns its operands. Once
/// built it is logically immutable: [`simplify`](Expression::simplify)
/// produces a new tree, and [`evaluate`](Expression::evaluate) is read-only,
/// so one shared tree may be evaluated from many threads.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal numeric constant
    ///
    /// # Example
    /// ```text
    /// 0.5
    /// ```
    Constant(f32),

    /// Host-bound named value
    ///
    /// # Examples
    /// ```text
    /// query.anim_time
    /// q.health
    /// variable.particle_age
    /// v.rotation
    /// ```
    Reference {
        namespace: ReferenceNamespace,
        name: String,
    },

    /// Unary operation (negation or logical NOT)
    ///
    /// # Examples
    /// ```text
    /// -query.speed
    /// !(q.on_ground)
    /// ```
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    /// Binary operation (arithmetic, comparison, logical)
    ///
    /// # Example
    /// ```text
    /// query.health < 10
    /// ```
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Conditional (`cond ? a : b`)
    ///
    /// The condition is evaluated first, then exactly one branch. Chained
    /// ternaries associate to the left: `1 ? 2 : 3 ? 4 : 5` is
    /// `(1 ? 2 : 3) ? 4 : 5`.
    Ternary {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },

    /// Call into the fixed math-function library
    ///
    /// # Examples
    /// ```text
    /// math.sin(query.anim_time * 38)
    /// math.clamp(v.size, 0, 1)
    /// math.pi
    /// ```
    Math(MathCall),
}

impl Expression {
    /// Whether this node is a folded constant leaf.
    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }
}
