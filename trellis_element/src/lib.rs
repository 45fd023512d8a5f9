// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_element --heading-base-level=0

//! Trellis Element: the duck-typed node surface for selector-routed events.
//!
//! The delegation engine never owns nodes and never walks a tree. Everything
//! it needs from a concrete UI node is expressed by the [`Element`] trait:
//! a tag name, an id, class membership, attribute get/set, and a slot for an
//! engine-assigned [`NodeIdentity`]. Any host — a browser DOM wrapper, a
//! retained scene graph, or a headless test double — satisfies the trait
//! without inheritance.
//!
//! Two things live here:
//!
//! - [`Element`]: the capability trait consumed by the identity registry and
//!   the listener resolver.
//! - [`SyntheticElement`]: a self-contained implementation backed by plain
//!   collections. It doubles as the test fixture for every downstream crate
//!   and as a real node type for headless hosts.
//!
//! ## Identity
//!
//! [`NodeIdentity`] is a value object attached lazily, exactly once, to a
//! node. Its token never changes afterwards and is never removed while the
//! node exists. Because the identity slot is typed, "has an identity" is a
//! structural check — an attribute or field that merely shares a name can
//! never be mistaken for one.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_element::{Element, NodeIdentity, SyntheticElement};
//!
//! let mut node = SyntheticElement::new("button")
//!     .with_id("save")
//!     .with_class("btn");
//!
//! assert_eq!(node.tag_name(), Some("button"));
//! assert!(node.has_class("btn"));
//! assert!(node.identity().is_none());
//!
//! node.attach_identity(NodeIdentity::new("4be1a7900d2f3c58"));
//! assert_eq!(node.identity().unwrap().token(), "4be1a7900d2f3c58");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod synthetic;

pub use synthetic::SyntheticElement;

use alloc::collections::BTreeSet;
use alloc::string::String;

/// An engine-assigned, per-node identity.
///
/// The token is immutable once attached. The identity also records which
/// event types already have a marker attribute issued on the node, so marker
/// issuance stays idempotent: a marker attribute exists on the node if and
/// only if the event type is recorded here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeIdentity {
    token: String,
    marked: BTreeSet<String>,
}

impl NodeIdentity {
    /// Creates an identity with the given token and no marker associations.
    ///
    /// Embedders normally never call this directly; the identity registry
    /// generates tokens and attaches identities lazily.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            marked: BTreeSet::new(),
        }
    }

    /// Returns the identity token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns `true` if a marker has been issued for `event_type`.
    #[must_use]
    pub fn is_marked(&self, event_type: &str) -> bool {
        self.marked.contains(event_type)
    }

    /// Records that a marker was issued for `event_type`.
    ///
    /// Returns `true` if the association is new, `false` if it was already
    /// present.
    pub fn mark(&mut self, event_type: &str) -> bool {
        if self.marked.contains(event_type) {
            return false;
        }
        self.marked.insert(String::from(event_type))
    }

    /// Iterates the event types that have markers issued, in sorted order.
    pub fn marked_events(&self) -> impl Iterator<Item = &str> {
        self.marked.iter().map(String::as_str)
    }
}

/// Capability surface a concrete UI node exposes to the delegation engine.
///
/// Implementations are expected to be cheap accessors over host state. The
/// engine holds no references to elements beyond the borrow it is handed;
/// node lifetime and removal are entirely the host's concern.
///
/// ## Identity slot contract
///
/// [`Element::attach_identity`] is write-once: once an identity is attached
/// it must never be replaced or removed while the node exists.
/// Implementations should ignore a second attach.
pub trait Element {
    /// The node's tag name, if it has one (e.g. `"button"`).
    ///
    /// Case is host-defined; the engine compares tags ASCII
    /// case-insensitively.
    fn tag_name(&self) -> Option<&str>;

    /// The node's author-assigned id attribute, if any.
    fn element_id(&self) -> Option<&str>;

    /// Returns `true` if the node currently carries the given class.
    fn has_class(&self, name: &str) -> bool;

    /// Returns the value of the named attribute, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Sets the named attribute, replacing any existing value.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// The attached identity, if one has been assigned.
    fn identity(&self) -> Option<&NodeIdentity>;

    /// Mutable access to the attached identity, if one has been assigned.
    ///
    /// Only the marker association set is ever mutated through this; the
    /// token itself has no mutable accessor.
    fn identity_mut(&mut self) -> Option<&mut NodeIdentity>;

    /// Attaches an identity to a node that has none.
    ///
    /// Must be a no-op if an identity is already attached.
    fn attach_identity(&mut self, identity: NodeIdentity);
}
