use std::cell::Cell;
use std::collections::HashMap;

/// The host-supplied capability an expression evaluates against.
///
/// The engine itself owns no bindings and no randomness: reference nodes
/// read queries and variables from here, and the random-family math
/// functions draw from [`random`](MolangEnvironment::random). Passing the
/// environment into every evaluation (rather than holding ambient state)
/// keeps the engine testable in isolation and leaves thread-safety of the
/// bindings to the caller.
///
/// Lookups return `None` for unbound names; the evaluator then falls back
/// to its unresolved-reference default rather than aborting, so partially
/// bound contexts still evaluate.
pub trait MolangEnvironment {
    /// Looks up a read-only named value (`query.name` / `q.name`).
    fn query(&self, name: &str) -> Option<f32>;

    /// Looks up a host-mutable named value (`variable.name` / `v.name`).
    fn variable(&self, name: &str) -> Option<f32>;

    /// Draws a uniform random value in `[0, 1)`.
    fn random(&self) -> f32;

    /// Draws a random integer in `[low, high]` inclusive.
    fn random_int(&self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        low + (self.random() * (high - low + 1) as f32) as i32
    }
}

/// A map-backed [`MolangEnvironment`] with a seeded generator.
///
/// Suitable as-is for hosts with modest binding counts and for tests, where
/// a fixed seed makes random-family formulas reproducible.
///
/// # Examples
///
/// ```
/// use molang_expr::{parse, SimpleEnvironment};
///
/// let env = SimpleEnvironment::new()
///     .with_query("health", 8.0)
///     .with_variable("scale", 2.0);
///
/// let expr = parse("q.health * v.scale").unwrap();
/// assert_eq!(expr.evaluate(&env), 16.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleEnvironment {
    queries: HashMap<String, f32>,
    variables: HashMap<String, f32>,
    rng_state: Cell<u64>,
}

impl Default for SimpleEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleEnvironment {
    pub fn new() -> Self {
        SimpleEnvironment {
            queries: HashMap::new(),
            variables: HashMap::new(),
            rng_state: Cell::new(0x9e3779b97f4a7c15),
        }
    }

    /// Seeds the random generator for reproducible draws.
    pub fn with_seed(self, seed: u64) -> Self {
        // xorshift has an all-zero fixed point, so nudge a zero seed.
        self.rng_state.set(seed | 1);
        self
    }

    pub fn with_query(mut self, name: &str, value: f32) -> Self {
        self.queries.insert(name.to_string(), value);
        self
    }

    pub fn with_variable(mut self, name: &str, value: f32) -> Self {
        self.variables.insert(name.to_string(), value);
        self
    }

    pub fn set_query(&mut self, name: &str, value: f32) {
        self.queries.insert(name.to_string(), value);
    }

    /// Updates a variable binding; variables are the mutable half of the
    /// reference namespace.
    pub fn set_variable(&mut self, name: &str, value: f32) {
        self.variables.insert(name.to_string(), value);
    }
}

impl MolangEnvironment for SimpleEnvironment {
    fn query(&self, name: &str) -> Option<f32> {
        self.queries.get(name).copied()
    }

    fn variable(&self, name: &str) -> Option<f32> {
        self.variables.get(name).copied()
    }

    fn random(&self) -> f32 {
        // xorshift64*: tiny, seedable, and plenty for particle jitter.
        let mut x = self.rng_state.get();
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.rng_state.set(x);
        let bits = x.wrapping_mul(0x2545f4914f6cdd1d) >> 40;
        bits as f32 / (1u64 << 24) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_names_are_none() {
        let env = SimpleEnvironment::new();
        assert_eq!(env.query("missing"), None);
        assert_eq!(env.variable("missing"), None);
    }

    #[test]
    fn random_stays_in_unit_range() {
        let env = SimpleEnvironment::new().with_seed(7);
        for _ in 0..1000 {
            let draw = env.random();
            assert!((0.0..1.0).contains(&draw), "draw {} out of range", draw);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = SimpleEnvironment::new().with_seed(42);
        let b = SimpleEnvironment::new().with_seed(42);
        for _ in 0..16 {
            assert_eq!(a.random(), b.random());
        }
    }

    #[test]
    fn random_int_is_inclusive_and_clamped() {
        let env = SimpleEnvironment::new().with_seed(3);
        for _ in 0..1000 {
            let draw = env.random_int(2, 4);
            assert!((2..=4).contains(&draw));
        }
        assert_eq!(env.random_int(5, 5), 5);
        assert_eq!(env.random_int(5, 1), 5);
    }
}
