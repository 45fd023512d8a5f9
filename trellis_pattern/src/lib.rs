// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_pattern --heading-base-level=0

//! Trellis Pattern: structural pattern parsing with a cost-gated cache.
//!
//! A *structural pattern* is the fallthrough selector kind: anything that is
//! not a plain class, id, tag, or marker selector. Patterns are
//! comma-separated groups of compound selectors joined by combinators
//! (descendant whitespace, `>`, `+`, `~`), e.g. `form .btn:not([disabled])`.
//!
//! The delegation engine makes matching decisions against a **single
//! concrete node**, so only the rightmost compound of each group — the
//! *deepest nested rule* — is directly testable. [`parse`] extracts exactly
//! that: one flat [`Descriptor`] per group (tag, identity, classes,
//! attribute names, pseudo names), leaving ancestor constraints to the
//! host's structural matcher at dispatch time.
//!
//! Parsing also scores a heuristic complexity **cost**: each atom visited
//! adds its weight (identity cheapest, pseudo-classes dearest), combinator
//! steps add a term growing with nesting depth, and multi-group patterns add
//! a log-scaled fan-out bonus. [`RuleExtractor`] uses the cost as a cache
//! admission policy: only parses costing at least [`ADMISSION_COST`] enter
//! the bounded LRU cache — cheaper patterns are cheaper to reparse than to
//! look up.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_pattern::{RuleExtractor, parse};
//!
//! let parsed = parse("form .btn:not([disabled])").unwrap();
//! assert_eq!(parsed.descriptors.len(), 1);
//! let rule = &parsed.descriptors[0];
//! assert_eq!(rule.classes.as_slice(), ["btn"]);
//! assert_eq!(rule.pseudos.as_slice(), ["not"]);
//!
//! let mut extractor = RuleExtractor::new();
//! let rules = extractor.extract("form .btn:not([disabled])").unwrap();
//! assert_eq!(rules[0].classes.as_slice(), ["btn"]);
//!
//! // Malformed input surfaces a positioned error; it is never swallowed.
//! let err = extractor.extract("div[unclosed").unwrap_err();
//! assert_eq!(err.position, 3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod extract;
mod lru;
mod parse;

pub use extract::{ADMISSION_COST, DEFAULT_CACHE_CAPACITY, RuleExtractor};
pub use lru::LruCache;
pub use parse::{
    COST_ATTRIBUTE, COST_CLASS, COST_FANOUT, COST_IDENTITY, COST_NESTING, COST_PSEUDO, COST_TAG,
    Descriptor, ParseError, ParsedPattern, parse,
};
