//! Memoized parsing keyed by source text.
//!
//! Hot paths (particle systems, per-frame animation controllers) parse the
//! same short formulas over and over. An [`ExpressionCache`] parses each
//! distinct source string once and hands out shared [`Arc`] trees, so
//! repeated lookups are a map hit plus a pointer clone. Callers own the
//! cache and share it explicitly; there is no process-global instance.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ast::Expression;
use crate::parser::{self, ParseError};

/// Knobs for a cached parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Run the constant-folding simplifier on the parsed tree.
    pub simplify: bool,
    /// Memoize the result; disable for one-off parses that should not
    /// occupy cache memory.
    pub cache: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            simplify: true,
            cache: true,
        }
    }
}

/// Shared parse memo over source text.
///
/// Simplified and raw trees are kept in separate tables so a raw parse never
/// pollutes simplified lookups for the same text (and vice versa). Parse
/// failures are not memoized.
///
/// # Examples
///
/// ```
/// use molang_expr::{ExpressionCache, ParseOptions};
/// use std::sync::Arc;
///
/// let cache = ExpressionCache::new();
/// let first = cache.parse("q.speed * 0.5", ParseOptions::default()).unwrap();
/// let second = cache.parse("q.speed * 0.5", ParseOptions::default()).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Debug, Default)]
pub struct ExpressionCache {
    simplified: RwLock<HashMap<String, Arc<Expression>>>,
    raw: RwLock<HashMap<String, Arc<Expression>>>,
}

impl ExpressionCache {
    pub fn new() -> Self {
        ExpressionCache::default()
    }

    /// Parses `text`, returning the memoized tree when one exists.
    ///
    /// The actual parse runs outside any lock, so a slow or failing parse
    /// never blocks concurrent lookups. Two threads racing on the same new
    /// text may both parse it; the first insert wins and both receive the
    /// same shared tree.
    pub fn parse(&self, text: &str, options: ParseOptions) -> Result<Arc<Expression>, ParseError> {
        if !options.cache {
            return Ok(Arc::new(parser::parse_with(text, options.simplify)?));
        }

        let table = if options.simplify {
            &self.simplified
        } else {
            &self.raw
        };

        {
            let read = table.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(expr) = read.get(text) {
                return Ok(Arc::clone(expr));
            }
        }

        let parsed = Arc::new(parser::parse_with(text, options.simplify)?);

        let mut write = table.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(
            write
                .entry(text.to_string())
                .or_insert(parsed),
        ))
    }

    /// Number of memoized entries across both tables.
    pub fn len(&self) -> usize {
        let simplified = self
            .simplified
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        let raw = self.raw.read().unwrap_or_else(PoisonError::into_inner).len();
        simplified + raw
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every memoized tree. Outstanding [`Arc`]s stay valid.
    pub fn clear(&self) {
        self.simplified
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.raw
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_parses_share_one_tree() {
        let cache = ExpressionCache::new();
        let a = cache.parse("1 + 2", ParseOptions::default()).unwrap();
        let b = cache.parse("1 + 2", ParseOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn raw_and_simplified_tables_are_independent() {
        let cache = ExpressionCache::new();
        let simplified = cache.parse("1 + 2", ParseOptions::default()).unwrap();
        let raw = cache
            .parse(
                "1 + 2",
                ParseOptions {
                    simplify: false,
                    ..ParseOptions::default()
                },
            )
            .unwrap();
        assert_eq!(*simplified, Expression::Constant(3.0));
        assert!(matches!(*raw, Expression::Binary { .. }));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn uncached_parses_leave_no_entry() {
        let cache = ExpressionCache::new();
        let options = ParseOptions {
            cache: false,
            ..ParseOptions::default()
        };
        let a = cache.parse("q.x", options).unwrap();
        let b = cache.parse("q.x", options).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(cache.is_empty());
    }

    #[test]
    fn failures_are_not_memoized() {
        let cache = ExpressionCache::new();
        assert!(cache.parse("1 +", ParseOptions::default()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_keeps_outstanding_trees_alive() {
        let cache = ExpressionCache::new();
        let expr = cache.parse("3 * 3", ParseOptions::default()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(*expr, Expression::Constant(9.0));
    }
}
