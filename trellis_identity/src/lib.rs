// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_identity --heading-base-level=0

//! Trellis Identity: stable node identities and event marker attributes.
//!
//! Delegated event subscription needs a way to say "this subscription applies
//! to *that* node" without holding a reference to the node. This crate gives
//! every participating node a stable, unguessable identity token, lazily and
//! exactly once, and derives per-event-type **marker attributes** from it:
//! synthetic attribute names a resolver can match cheaply, without any
//! structural re-evaluation.
//!
//! - [`IdentityRegistry`]: attaches identities on first need and issues
//!   marker attributes idempotently.
//! - [`marker_name`]: the deterministic marker naming scheme.
//! - [`MarkerPattern`]: recognizes exactly the marker names issued for one
//!   event type, capturing the embedded token.
//! - [`TokenSource`]: the randomness seam. [`SystemTokenSource`] (under the
//!   `std` feature) draws on the platform's best available entropy and never
//!   fails; [`SeededTokenSource`] is the deterministic pseudo-random
//!   fallback for `no_std` hosts and tests.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_element::{Element, SyntheticElement};
//! use trellis_identity::{IdentityRegistry, MarkerPattern, SeededTokenSource};
//!
//! let mut registry = IdentityRegistry::new(SeededTokenSource::new(7));
//! let mut node = SyntheticElement::new("button");
//!
//! // Lazily attached, idempotent.
//! let token = registry.ensure_identity(&mut node).token().to_string();
//! assert_eq!(registry.ensure_identity(&mut node).token(), token);
//!
//! // Marker issuance is idempotent too: one attribute per (node, event type).
//! let marker = registry.associate_event(&mut node, "click");
//! assert_eq!(registry.associate_event(&mut node, "click"), marker);
//! assert!(node.attribute(&marker).is_some());
//!
//! // The pattern recognizes the issued name and captures the token.
//! assert_eq!(MarkerPattern::new("click").capture(&marker), Some(token.as_str()));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod marker;
mod token;

pub use marker::{MARKER_PREFIX, MarkerPattern, marker_name, marker_token};
pub use token::{SeededTokenSource, TokenSource};
#[cfg(feature = "std")]
pub use token::SystemTokenSource;

use alloc::string::{String, ToString as _};

use trellis_element::{Element, NodeIdentity};

/// Attaches identities to nodes and issues per-event-type marker attributes.
///
/// The registry owns only the token source. Identity state rides on the
/// nodes themselves (via [`Element::attach_identity`]); the registry holds
/// no node references and nothing here needs to be torn down when a node is
/// removed.
#[derive(Clone, Debug, Default)]
pub struct IdentityRegistry<S> {
    source: S,
}

impl<S: TokenSource> IdentityRegistry<S> {
    /// Creates a registry drawing tokens from `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Ensures the node carries an identity, attaching a fresh one if needed.
    ///
    /// Idempotent and infallible: the existing identity is returned
    /// unchanged on every call after the first.
    pub fn ensure_identity<'n, N: Element>(&mut self, node: &'n mut N) -> &'n NodeIdentity {
        if node.identity().is_none() {
            node.attach_identity(NodeIdentity::new(self.source.next_token()));
        }
        node.identity()
            .expect("identity was just attached (write-once slot)")
    }

    /// Ensures an identity and a marker attribute for `event_type`.
    ///
    /// Computes the deterministic marker name for (event type, token). If
    /// the node's association set does not yet contain the event type, the
    /// marker attribute is written to the node and the association recorded.
    /// Returns the marker name whether newly issued or already present.
    pub fn associate_event<N: Element>(&mut self, node: &mut N, event_type: &str) -> String {
        let token = self.ensure_identity(node).token().to_string();
        let name = marker_name(event_type, &token);
        let newly_marked = node
            .identity_mut()
            .expect("identity ensured above")
            .mark(event_type);
        if newly_marked {
            node.set_attribute(&name, "");
        }
        name
    }
}

/// Returns `true` if the node carries an engine-assigned identity.
///
/// The check is structural: only a typed [`NodeIdentity`] in the element's
/// identity slot counts. A host attribute or field that happens to share a
/// name can never satisfy it.
#[must_use]
pub fn has_identity<N: Element>(node: &N) -> bool {
    node.identity().is_some()
}
