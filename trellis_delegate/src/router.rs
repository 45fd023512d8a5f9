// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event router: one value owning the full delegation pipeline.

use alloc::string::String;
use alloc::vec::Vec;

use trellis_element::Element;
use trellis_identity::{IdentityRegistry, TokenSource};
use trellis_pattern::{ParseError, RuleExtractor};
use trellis_selector::{SelectorKind, classify};

use crate::adapters::descriptor_applies;
use crate::index::ListenerIndex;
use crate::resolve::{StructuralMatcher, resolve};
use crate::subscriber::SubscriberHandle;
use crate::time::Clock;

/// A complete delegation engine: identity issuance, the listener index, and
/// resolution behind one set of named operations.
///
/// Every collaborator is an explicit field of the router value. Two routers
/// share nothing; construct one per event root (or per test) and thread it
/// where it is needed.
#[derive(Debug)]
pub struct EventRouter<T, S, C> {
    identity: IdentityRegistry<S>,
    index: ListenerIndex<T>,
    clock: C,
    extractor: RuleExtractor,
}

impl<T, S: TokenSource, C: Clock> EventRouter<T, S, C> {
    /// Creates a router from its token source and clock.
    #[must_use]
    pub fn new(source: S, clock: C) -> Self {
        Self {
            identity: IdentityRegistry::new(source),
            index: ListenerIndex::new(),
            clock,
            extractor: RuleExtractor::new(),
        }
    }

    /// Registers a subscriber under a selector for an event type.
    ///
    /// Blank selectors and duplicate registrations in the same group are
    /// silent no-ops. Structural patterns are parsed eagerly so malformed
    /// input fails here, at registration, rather than surfacing as a silent
    /// non-match at resolution; a successful parse also warms the pattern
    /// cache for resolution.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] if the selector is a structural pattern
    /// that does not parse. Nothing is registered in that case.
    pub fn register(
        &mut self,
        event_type: &str,
        selector: &str,
        handle: &SubscriberHandle<T>,
    ) -> Result<(), ParseError> {
        if let Some(classified) = classify(selector, event_type)
            && classified.kind == SelectorKind::Structural
        {
            self.extractor.extract(&classified.value)?;
        }
        self.index
            .register(event_type, selector, handle, &mut self.clock);
        Ok(())
    }

    /// Subscribes a handle directly to one node for an event type.
    ///
    /// The node is given an identity (lazily, once) and a marker attribute
    /// for the event type; the handle is then registered under the marker
    /// name, which classification routes to the marker group keyed by the
    /// node's token. Returns the marker attribute name.
    pub fn register_node<N: Element>(
        &mut self,
        node: &mut N,
        event_type: &str,
        handle: &SubscriberHandle<T>,
    ) -> String {
        let marker = self.identity.associate_event(node, event_type);
        self.index
            .register(event_type, &marker, handle, &mut self.clock);
        marker
    }

    /// Removes a subscriber from the selector's group for an event type.
    ///
    /// Returns `true` if the handle was present. The handle keeps its
    /// registration timestamp; re-registering later does not move it in
    /// resolution order.
    pub fn unregister(
        &mut self,
        event_type: &str,
        selector: &str,
        handle: &SubscriberHandle<T>,
    ) -> bool {
        self.index.unregister(event_type, selector, handle)
    }

    /// Removes a node-direct subscription.
    ///
    /// A no-op returning `false` if the node has no identity or no marker
    /// for the event type. The marker attribute stays on the node: the
    /// association is permanent, only the subscription goes away.
    pub fn unregister_node<N: Element>(
        &mut self,
        node: &N,
        event_type: &str,
        handle: &SubscriberHandle<T>,
    ) -> bool {
        let Some(identity) = node.identity() else {
            return false;
        };
        if !identity.is_marked(event_type) {
            return false;
        }
        let marker = trellis_identity::marker_name(event_type, identity.token());
        self.index.unregister(event_type, &marker, handle)
    }

    /// Resolves the subscribers applicable to `node` for an event type,
    /// using a caller-supplied structural matcher.
    ///
    /// See [`resolve`] for the gathering and ordering contract.
    #[must_use]
    pub fn resolve_with<N, M>(
        &self,
        node: &N,
        event_type: &str,
        matcher: &mut M,
    ) -> Vec<SubscriberHandle<T>>
    where
        N: Element + ?Sized,
        M: StructuralMatcher<N> + ?Sized,
    {
        resolve(&self.index, node, event_type, matcher)
    }

    /// Resolves using the router's own pattern extractor for structural
    /// selectors.
    ///
    /// Each structural group's final descriptors are tested against the node
    /// itself; ancestor constraints are not evaluated (the router has no
    /// tree access) and pseudo-classes never match. Hosts needing full
    /// structural semantics should use [`EventRouter::resolve_with`].
    #[must_use]
    pub fn resolve<N: Element + ?Sized>(
        &mut self,
        node: &N,
        event_type: &str,
    ) -> Vec<SubscriberHandle<T>> {
        let index = &self.index;
        let extractor = &mut self.extractor;
        let mut matcher = |node: &N, pattern: &str| match extractor.extract(pattern) {
            Ok(rules) => rules.iter().any(|rule| descriptor_applies(rule, node)),
            Err(_) => false,
        };
        resolve(index, node, event_type, &mut matcher)
    }

    /// The pattern extractor, for cache inspection and invalidation.
    pub fn extractor_mut(&mut self) -> &mut RuleExtractor {
        &mut self.extractor
    }

    /// The router's clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The underlying listener index.
    #[must_use]
    pub fn index(&self) -> &ListenerIndex<T> {
        &self.index
    }
}
