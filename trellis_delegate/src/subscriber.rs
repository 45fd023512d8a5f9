// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscriber handles: opaque payloads with a once-only registration stamp.

use alloc::rc::Rc;
use core::cell::Cell;

use crate::time::Timestamp;

/// A shared handle to one subscriber.
///
/// Group membership and deduplication use `Rc` pointer identity, so the
/// "same callback" means the same handle value, not an equal payload.
pub type SubscriberHandle<T> = Rc<Subscriber<T>>;

/// An opaque subscriber payload plus its registration timestamp.
///
/// The engine never invokes subscribers; `T` is whatever the host dispatch
/// layer needs (a boxed closure, a command id, a slot index). The timestamp
/// is assigned exactly once, at the handle's first registration under any
/// selector, and is what global resolution order is defined by.
#[derive(Debug)]
pub struct Subscriber<T> {
    payload: T,
    registered: Cell<Option<Timestamp>>,
}

impl<T> Subscriber<T> {
    /// Wraps a payload in a fresh, unstamped handle.
    #[must_use]
    pub fn handle(payload: T) -> SubscriberHandle<T> {
        Rc::new(Self {
            payload,
            registered: Cell::new(None),
        })
    }

    /// The host payload.
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// The first-registration timestamp, if the handle has been registered.
    #[must_use]
    pub fn registered_at(&self) -> Option<Timestamp> {
        self.registered.get()
    }

    /// Assigns the registration timestamp if none is set yet.
    ///
    /// A handle registered under several selectors keeps its first-ever
    /// stamp, preserving true first-registration order across all groups.
    pub(crate) fn stamp_once(&self, at: Timestamp) {
        if self.registered.get().is_none() {
            self.registered.set(Some(at));
        }
    }

    /// Merge key: unregistered handles sort last.
    pub(crate) fn sort_key(&self) -> Timestamp {
        self.registered.get().unwrap_or(Timestamp(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_is_assigned_once() {
        let h = Subscriber::handle("payload");
        assert_eq!(h.registered_at(), None);
        h.stamp_once(Timestamp(5));
        h.stamp_once(Timestamp(9));
        assert_eq!(h.registered_at(), Some(Timestamp(5)));
    }

    #[test]
    fn handles_compare_by_pointer_identity() {
        let a = Subscriber::handle(1);
        let b = Subscriber::handle(1);
        assert!(Rc::ptr_eq(&a, &a.clone()));
        assert!(!Rc::ptr_eq(&a, &b));
    }
}
