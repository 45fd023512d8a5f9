// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The listener index: selector-grouped subscriber storage per event type.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use trellis_selector::{SelectorKind, classify};

use crate::subscriber::SubscriberHandle;
use crate::time::Clock;

/// A group key: selector kind plus its normalized lookup value.
///
/// Ordered so group enumeration (needed for class and structural candidate
/// scans) is deterministic.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupKey {
    /// Selector kind.
    pub kind: SelectorKind,
    /// Normalized selector value.
    pub value: String,
}

impl GroupKey {
    /// Creates a key from a kind and value.
    #[must_use]
    pub fn new(kind: SelectorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Per-event-type mapping from selector groups to ordered subscriber sets.
///
/// Each group is an ordered set: iteration order is insertion order among
/// currently present members, and a handle already present in a group (by
/// `Rc` pointer identity) is not inserted twice. Groups and event entries
/// are removed as soon as they empty, so resolution never observes phantom
/// entries.
#[derive(Debug)]
pub struct ListenerIndex<T> {
    events: HashMap<String, BTreeMap<GroupKey, Vec<SubscriberHandle<T>>>>,
}

impl<T> Default for ListenerIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListenerIndex<T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
        }
    }

    /// Registers a handle under a selector for an event type.
    ///
    /// The selector is classified first; empty or whitespace-only selectors
    /// are silently ignored. The handle is stamped with `clock`'s current
    /// time only if this is its first-ever registration. Returns `true` if
    /// the handle was inserted, `false` for no-ops (blank selector or
    /// duplicate membership in the same group).
    pub fn register(
        &mut self,
        event_type: &str,
        selector: &str,
        handle: &SubscriberHandle<T>,
        clock: &mut impl Clock,
    ) -> bool {
        let Some(classified) = classify(selector, event_type) else {
            return false;
        };
        let key = GroupKey::new(classified.kind, classified.value);
        let group = self
            .events
            .entry(String::from(event_type))
            .or_default()
            .entry(key)
            .or_default();
        if group.iter().any(|existing| Rc::ptr_eq(existing, handle)) {
            return false;
        }
        handle.stamp_once(clock.now());
        group.push(Rc::clone(handle));
        true
    }

    /// Removes a handle from the selector's group for an event type.
    ///
    /// Empty groups (and event entries) are dropped immediately. Returns
    /// `true` if the handle was present.
    pub fn unregister(
        &mut self,
        event_type: &str,
        selector: &str,
        handle: &SubscriberHandle<T>,
    ) -> bool {
        let Some(classified) = classify(selector, event_type) else {
            return false;
        };
        let key = GroupKey::new(classified.kind, classified.value);
        let Some(groups) = self.events.get_mut(event_type) else {
            return false;
        };
        let Some(group) = groups.get_mut(&key) else {
            return false;
        };
        let before = group.len();
        group.retain(|existing| !Rc::ptr_eq(existing, handle));
        let removed = group.len() < before;
        if group.is_empty() {
            groups.remove(&key);
        }
        if groups.is_empty() {
            self.events.remove(event_type);
        }
        removed
    }

    /// Returns an order-preserving snapshot of one group, if present.
    ///
    /// Snapshots are what make reentrancy safe: a resolution in flight works
    /// on copies, so listener mutation from inside a callback only affects
    /// subsequent resolutions.
    #[must_use]
    pub fn snapshot(
        &self,
        event_type: &str,
        kind: SelectorKind,
        value: &str,
    ) -> Option<Vec<SubscriberHandle<T>>> {
        let group = self
            .events
            .get(event_type)?
            .get(&GroupKey::new(kind, value))?;
        Some(group.clone())
    }

    /// Iterates the groups of one kind for an event type, in value order.
    pub fn groups_of_kind(
        &self,
        event_type: &str,
        kind: SelectorKind,
    ) -> impl Iterator<Item = (&str, &[SubscriberHandle<T>])> {
        self.events
            .get(event_type)
            .into_iter()
            .flat_map(move |groups| {
                groups
                    .iter()
                    .filter(move |(key, _)| key.kind == kind)
                    .map(|(key, group)| (key.value.as_str(), group.as_slice()))
            })
    }

    /// Number of non-empty groups registered for an event type.
    #[must_use]
    pub fn group_count(&self, event_type: &str) -> usize {
        self.events.get(event_type).map_or(0, BTreeMap::len)
    }

    /// Returns `true` if nothing is registered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::Subscriber;
    use crate::time::{ManualClock, Timestamp};

    #[test]
    fn register_stamps_first_registration_only() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(1);
        let h = Subscriber::handle("f");

        assert!(index.register("click", ".a", &h, &mut clock));
        clock.advance(10);
        assert!(index.register("click", "#b", &h, &mut clock));
        assert_eq!(h.registered_at(), Some(Timestamp(1)));
    }

    #[test]
    fn duplicate_registration_in_same_group_is_a_no_op() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(0);
        let h = Subscriber::handle("f");

        assert!(index.register("click", ".a", &h, &mut clock));
        assert!(!index.register("click", ".a", &h, &mut clock));
        let group = index
            .snapshot("click", SelectorKind::Class, "a")
            .unwrap();
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn blank_selector_is_silently_ignored() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(0);
        let h = Subscriber::handle("f");
        assert!(!index.register("click", "   ", &h, &mut clock));
        assert!(index.is_empty());
        assert_eq!(h.registered_at(), None);
    }

    #[test]
    fn groups_keep_insertion_order() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(0);
        let f1 = Subscriber::handle(1);
        let f2 = Subscriber::handle(2);
        let f3 = Subscriber::handle(3);
        for h in [&f1, &f2, &f3] {
            clock.advance(1);
            index.register("click", ".a", h, &mut clock);
        }
        let group = index
            .snapshot("click", SelectorKind::Class, "a")
            .unwrap();
        let order: Vec<i32> = group.iter().map(|h| *h.payload()).collect();
        assert_eq!(order, [1, 2, 3]);
    }

    #[test]
    fn unregister_drops_empty_groups_and_events() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(0);
        let h = Subscriber::handle("f");

        index.register("click", ".a", &h, &mut clock);
        assert_eq!(index.group_count("click"), 1);
        assert!(index.unregister("click", ".a", &h));
        assert_eq!(index.group_count("click"), 0);
        assert!(index.is_empty());
        // Removing again is a no-op.
        assert!(!index.unregister("click", ".a", &h));
    }

    #[test]
    fn unregister_leaves_other_groups_intact() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(0);
        let h = Subscriber::handle("f");

        index.register("click", ".a", &h, &mut clock);
        index.register("click", "#x", &h, &mut clock);
        assert!(index.unregister("click", ".a", &h));
        assert!(index.snapshot("click", SelectorKind::Identity, "x").is_some());
    }

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(0);
        let f1 = Subscriber::handle(1);
        let f2 = Subscriber::handle(2);

        index.register("click", ".a", &f1, &mut clock);
        let snap = index.snapshot("click", SelectorKind::Class, "a").unwrap();
        index.register("click", ".a", &f2, &mut clock);
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn groups_of_kind_enumerates_in_value_order() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(0);
        let h = Subscriber::handle("f");
        index.register("click", ".zeta", &h, &mut clock);
        index.register("click", ".alpha", &h, &mut clock);
        index.register("click", "#id", &h, &mut clock);

        let values: Vec<&str> = index
            .groups_of_kind("click", SelectorKind::Class)
            .map(|(value, _)| value)
            .collect();
        assert_eq!(values, ["alpha", "zeta"]);
    }

    #[test]
    fn event_types_are_independent() {
        let mut index = ListenerIndex::new();
        let mut clock = ManualClock::new(0);
        let h = Subscriber::handle("f");
        index.register("click", ".a", &h, &mut clock);
        assert!(index.snapshot("keydown", SelectorKind::Class, "a").is_none());
    }
}
