// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cost-gated, cached extraction of final selector descriptors.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use crate::lru::LruCache;
use crate::parse::{Descriptor, ParseError, parse};

/// Minimum parse cost for a result to be admitted to the cache.
///
/// Anything cheaper is cheaper to reparse on demand than to occupy a cache
/// slot: single-atom patterns stay out, combinator chains and pseudo-bearing
/// patterns get in.
pub const ADMISSION_COST: u32 = 12;

/// Default cache capacity for [`RuleExtractor::new`].
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Parses structural patterns and memoizes the expensive ones.
///
/// Keys are the trimmed pattern text. On a hit the cached descriptors are
/// returned and the entry's recency refreshed; on a miss the pattern is
/// parsed and cached only if its cost reaches [`ADMISSION_COST`]. Parse
/// errors always propagate to the caller.
///
/// Only structural parses are ever cached; the cheap selector kinds (id,
/// class, tag, marker) never reach this type. [`RuleExtractor::invalidate`]
/// and [`RuleExtractor::clear_cache`] exist for hosts whose external
/// mutation could stale a cached structural interpretation.
#[derive(Clone, Debug)]
pub struct RuleExtractor {
    cache: LruCache<String, Vec<Descriptor>>,
    parses: u64,
}

impl RuleExtractor {
    /// Creates an extractor with [`DEFAULT_CACHE_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates an extractor with an explicit cache capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (see [`LruCache::new`]).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            parses: 0,
        }
    }

    /// Returns the final selector descriptors for `pattern`.
    ///
    /// The input is trimmed; empty input yields an empty list without
    /// touching the parser.
    ///
    /// # Errors
    ///
    /// Propagates the [`ParseError`] for syntactically invalid patterns;
    /// failed parses are never cached.
    pub fn extract(&mut self, pattern: &str) -> Result<Vec<Descriptor>, ParseError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(hit) = self.cache.get(trimmed) {
            return Ok(hit.clone());
        }
        self.parses += 1;
        let parsed = parse(trimmed)?;
        if parsed.cost >= ADMISSION_COST {
            self.cache
                .insert(trimmed.to_string(), parsed.descriptors.clone());
        }
        Ok(parsed.descriptors)
    }

    /// Drops any cached result for `pattern`.
    pub fn invalidate(&mut self, pattern: &str) {
        self.cache.remove(pattern.trim());
    }

    /// Drops every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of cached patterns.
    #[must_use]
    pub fn cached_patterns(&self) -> usize {
        self.cache.len()
    }

    /// Number of parser invocations so far (cache hits excluded).
    #[must_use]
    pub fn parse_count(&self) -> u64 {
        self.parses
    }
}

impl Default for RuleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Costs 19: two tags, one nesting step, one class, one pseudo.
    const EXPENSIVE: &str = "form input.field:focus";
    // Costs 3: a single class atom.
    const CHEAP: &str = ".btn";

    #[test]
    fn empty_input_skips_the_parser() {
        let mut x = RuleExtractor::new();
        assert!(x.extract("").unwrap().is_empty());
        assert!(x.extract("   \t ").unwrap().is_empty());
        assert_eq!(x.parse_count(), 0);
    }

    #[test]
    fn expensive_patterns_are_cached() {
        let mut x = RuleExtractor::new();
        let first = x.extract(EXPENSIVE).unwrap();
        let second = x.extract(EXPENSIVE).unwrap();
        assert_eq!(first, second);
        assert_eq!(x.parse_count(), 1);
        assert_eq!(x.cached_patterns(), 1);
    }

    #[test]
    fn cheap_patterns_are_reparsed_every_time() {
        let mut x = RuleExtractor::new();
        let _ = x.extract(CHEAP).unwrap();
        let _ = x.extract(CHEAP).unwrap();
        assert_eq!(x.parse_count(), 2);
        assert_eq!(x.cached_patterns(), 0);
    }

    #[test]
    fn keys_are_trimmed() {
        let mut x = RuleExtractor::new();
        let _ = x.extract(EXPENSIVE).unwrap();
        let _ = x.extract("  form input.field:focus  ").unwrap();
        assert_eq!(x.parse_count(), 1);
    }

    #[test]
    fn invalidate_forces_a_reparse() {
        let mut x = RuleExtractor::new();
        let _ = x.extract(EXPENSIVE).unwrap();
        x.invalidate(EXPENSIVE);
        let _ = x.extract(EXPENSIVE).unwrap();
        assert_eq!(x.parse_count(), 2);
    }

    #[test]
    fn clear_cache_drops_everything() {
        let mut x = RuleExtractor::new();
        let _ = x.extract(EXPENSIVE).unwrap();
        x.clear_cache();
        assert_eq!(x.cached_patterns(), 0);
        let _ = x.extract(EXPENSIVE).unwrap();
        assert_eq!(x.parse_count(), 2);
    }

    #[test]
    fn parse_errors_propagate_and_are_not_cached() {
        let mut x = RuleExtractor::new();
        assert!(x.extract("div[oops").is_err());
        assert!(x.extract("div[oops").is_err());
        assert_eq!(x.parse_count(), 2);
        assert_eq!(x.cached_patterns(), 0);
    }

    #[test]
    fn lru_eviction_applies_to_admitted_patterns() {
        let mut x = RuleExtractor::with_capacity(2);
        let a = "form input.a:focus";
        let b = "form input.b:focus";
        let c = "form input.c:focus";
        let _ = x.extract(a).unwrap();
        let _ = x.extract(b).unwrap();
        let _ = x.extract(a).unwrap(); // touch a
        let _ = x.extract(c).unwrap(); // evicts b
        assert_eq!(x.parse_count(), 3);
        let _ = x.extract(b).unwrap(); // must reparse
        assert_eq!(x.parse_count(), 4);
        let _ = x.extract(c).unwrap(); // still cached
        assert_eq!(x.parse_count(), 4);
    }
}
