// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker attribute naming and recognition.
//!
//! A marker is a synthetic attribute written onto a node, encoding the
//! node's identity token and one event type:
//!
//! ```text
//! data-trellis_{event_type}_{token}
//! ```
//!
//! The `_` separators are deliberate: they fall outside the tag-selector
//! alphabet (letters, digits, hyphens), so a marker name can never be
//! mistaken for a tag selector during classification.

use alloc::format;
use alloc::string::String;

/// Prefix shared by every marker attribute name.
pub const MARKER_PREFIX: &str = "data-trellis_";

/// Builds the marker attribute name for an event type and identity token.
///
/// Deterministic: the same inputs always produce the same name.
#[must_use]
pub fn marker_name(event_type: &str, token: &str) -> String {
    format!("{MARKER_PREFIX}{event_type}_{token}")
}

/// Recognizes marker attribute names issued for one event type.
///
/// [`MarkerPattern::capture`] accepts exactly the strings produced by
/// [`marker_name`] for the pattern's event type, and returns the embedded
/// identity token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerPattern {
    event_type: String,
}

impl MarkerPattern {
    /// Creates a pattern for the given event type.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
        }
    }

    /// The event type this pattern recognizes markers for.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the embedded identity token if `s` is a marker name for this
    /// pattern's event type.
    ///
    /// Tokens are one or more lowercase hex digits; anything else is
    /// rejected, including an empty token or a marker for another event
    /// type.
    #[must_use]
    pub fn capture<'s>(&self, s: &'s str) -> Option<&'s str> {
        marker_token(&self.event_type, s)
    }
}

/// Allocation-free form of [`MarkerPattern::capture`].
#[must_use]
pub fn marker_token<'s>(event_type: &str, s: &'s str) -> Option<&'s str> {
    let rest = s.strip_prefix(MARKER_PREFIX)?;
    let rest = rest.strip_prefix(event_type)?;
    let token = rest.strip_prefix('_')?;
    let valid = !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    valid.then_some(token)
}
