// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Token sources: the randomness seam for identity generation.

use alloc::format;
use alloc::string::String;

/// Produces identity tokens: 16 lowercase hex digits each.
///
/// Tokens must be unique within a process with overwhelming probability;
/// unguessability is desirable but generation must never fail. Hosts with an
/// entropy source use [`SystemTokenSource`]; others fall back to
/// [`SeededTokenSource`].
///
/// [`SystemTokenSource`]: crate::SystemTokenSource
pub trait TokenSource {
    /// Returns the next token.
    fn next_token(&mut self) -> String;
}

/// Advances a splitmix64 state and returns the next output word.
///
/// Small, fast, and full-period; the standard choice for seeding and for
/// deterministic fallback sequences.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Deterministic pseudo-random token source (splitmix64).
///
/// This is the graceful-degradation path for hosts without an entropy
/// source, and the reproducible source for tests. Two sources with the same
/// seed yield the same token sequence.
#[derive(Clone, Debug, Default)]
pub struct SeededTokenSource {
    state: u64,
}

impl SeededTokenSource {
    /// Creates a source from an explicit seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl TokenSource for SeededTokenSource {
    fn next_token(&mut self) -> String {
        format!("{:016x}", splitmix64(&mut self.state))
    }
}

/// Entropy-backed token source.
///
/// Seeds a splitmix64 stream from the platform's per-process hash
/// randomness (`RandomState`, OS-seeded where available) mixed with the
/// wall clock. `RandomState` itself degrades to weaker seeding on platforms
/// without an entropy source, so construction never fails.
#[cfg(feature = "std")]
#[derive(Clone, Debug)]
pub struct SystemTokenSource {
    state: u64,
}

#[cfg(feature = "std")]
impl SystemTokenSource {
    /// Creates a source seeded from process entropy and the wall clock.
    #[must_use]
    pub fn new() -> Self {
        use std::collections::hash_map::RandomState;
        use std::hash::BuildHasher as _;
        use std::time::{SystemTime, UNIX_EPOCH};

        let entropy = RandomState::new().hash_one(0_u64);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::from(d.subsec_nanos()) ^ d.as_secs().rotate_left(32));
        Self {
            state: entropy ^ nanos,
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TokenSource for SystemTokenSource {
    fn next_token(&mut self) -> String {
        format!("{:016x}", splitmix64(&mut self.state))
    }
}
