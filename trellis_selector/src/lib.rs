// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_selector --heading-base-level=0

//! Trellis Selector: classify selector strings into routing kinds.
//!
//! Registration stores listeners under a `(kind, value)` key so resolution
//! can look groups up cheaply. [`classify`] assigns every selector string
//! exactly one [`SelectorKind`] with a fixed sequence of tests, first match
//! wins:
//!
//! 1. **Class** — `.` followed by word/hyphen characters; value is the name
//!    without the dot.
//! 2. **Identity** — `#` followed by word/hyphen characters; value is the id
//!    without the hash.
//! 3. **Tag** — an ASCII letter followed by letters, digits, or hyphens;
//!    value is lower-cased.
//! 4. **Marker** — a marker attribute name for the given event type
//!    (see `trellis_identity`); value is the captured identity token.
//! 5. **Structural** — anything else; value is the original string,
//!    unmodified, to be handed to the structural pattern machinery.
//!
//! With these alphabets the tests are disjoint (marker names contain `_`,
//! which no tag may), but the order is part of the contract: it is what
//! makes classification a pure, deterministic function of the selector
//! string and the event type.
//!
//! Empty and whitespace-only selectors classify to `None`; registering
//! nothing is defined as a harmless no-op, not an error.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_selector::{SelectorKind, classify};
//!
//! assert_eq!(classify(".btn", "click").unwrap().kind, SelectorKind::Class);
//! assert_eq!(classify("#save", "click").unwrap().kind, SelectorKind::Identity);
//! assert_eq!(classify("DIV", "click").unwrap().value, "div");
//! assert_eq!(
//!     classify("form .btn:not([disabled])", "click").unwrap().kind,
//!     SelectorKind::Structural,
//! );
//! assert!(classify("   ", "click").is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;

use trellis_identity::marker_token;

/// The closed set of selector routing kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SelectorKind {
    /// An id selector (`#save`).
    Identity,
    /// A class selector (`.btn`).
    Class,
    /// A tag selector (`button`).
    Tag,
    /// A marker attribute name issued by the identity registry.
    Marker,
    /// Anything else: an arbitrary structural pattern.
    Structural,
}

/// A classified selector: its kind plus the normalized lookup value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classified {
    /// The selector's routing kind.
    pub kind: SelectorKind,
    /// The group lookup value (name, id, lower-cased tag, token, or the
    /// original pattern text for structural selectors).
    pub value: String,
}

/// Classifies a selector string for the given event type.
///
/// Pure and deterministic: repeated calls with the same inputs yield the
/// same classification. Returns `None` for empty or whitespace-only input.
#[must_use]
pub fn classify(selector: &str, event_type: &str) -> Option<Classified> {
    if selector.trim().is_empty() {
        return None;
    }

    if let Some(name) = selector.strip_prefix('.')
        && is_word(name)
    {
        return Some(Classified {
            kind: SelectorKind::Class,
            value: String::from(name),
        });
    }

    if let Some(id) = selector.strip_prefix('#')
        && is_word(id)
    {
        return Some(Classified {
            kind: SelectorKind::Identity,
            value: String::from(id),
        });
    }

    if is_tag(selector) {
        return Some(Classified {
            kind: SelectorKind::Tag,
            value: selector.to_ascii_lowercase(),
        });
    }

    if let Some(token) = marker_token(event_type, selector) {
        return Some(Classified {
            kind: SelectorKind::Marker,
            value: String::from(token),
        });
    }

    Some(Classified {
        kind: SelectorKind::Structural,
        value: String::from(selector),
    })
}

/// One or more word/hyphen characters.
fn is_word(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// An ASCII letter followed by letters, digits, or hyphens.
fn is_tag(s: &str) -> bool {
    let mut bytes = s.bytes();
    bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
