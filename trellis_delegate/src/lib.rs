// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_delegate --heading-base-level=0

//! Trellis Delegate: selector-grouped listener storage and ordered, merged
//! resolution.
//!
//! This is the top of the trellis stack. A host dispatches UI events by
//! asking one question: *which subscribers apply to this node for this event
//! type, and in what order?* [`EventRouter`] answers it, composing the other
//! crates:
//!
//! - Selectors are classified (`trellis_selector`) and listeners stored in
//!   per-event-type **groups** keyed by `(kind, value)` — the
//!   [`ListenerIndex`].
//! - Node-direct subscriptions get identities and marker attributes
//!   (`trellis_identity`) and land in marker groups like any other selector.
//! - Structural patterns are parsed and cached (`trellis_pattern`); whether
//!   one matches a node is decided through the [`StructuralMatcher`] seam.
//!
//! Resolution gathers snapshots of every applicable group and merges them
//! into a single sequence ordered by **first-registration timestamp**: the
//! order subscribers were first registered, regardless of which selector
//! matched them. Stamps come from the host's [`Clock`]; the merge is stable,
//! so colliding stamps still resolve deterministically.
//!
//! The engine stores and orders subscribers but never invokes them. The
//! subscriber payload type `T` is opaque; dispatch (and any cross-group
//! deduplication policy) belongs to the host.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_delegate::{EventRouter, ManualClock, Subscriber};
//! use trellis_element::SyntheticElement;
//! use trellis_identity::SeededTokenSource;
//!
//! let mut router = EventRouter::new(SeededTokenSource::new(1), ManualClock::new(0));
//!
//! let on_btn = Subscriber::handle("btn");
//! let on_save = Subscriber::handle("save");
//! router.register("click", ".btn", &on_btn).unwrap();
//! router.clock_mut().advance(1);
//! router.register("click", "#save", &on_save).unwrap();
//!
//! let node = SyntheticElement::new("button").with_id("save").with_class("btn");
//! let resolved = router.resolve(&node, "click");
//! let order: Vec<&str> = resolved.iter().map(|h| *h.payload()).collect();
//! assert_eq!(order, ["btn", "save"]);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): the [`MonotonicClock`] and the
//!   entropy-backed token source in `trellis_identity`. Without it the crate
//!   is `no_std` (with `alloc`); supply a [`ManualClock`] or your own
//!   [`Clock`].

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod adapters;
mod index;
mod resolve;
mod router;
mod subscriber;
mod time;

pub use adapters::{RuleMatcher, descriptor_applies};
pub use index::{GroupKey, ListenerIndex};
pub use resolve::{StructuralMatcher, resolve};
pub use router::EventRouter;
pub use subscriber::{Subscriber, SubscriberHandle};
#[cfg(feature = "std")]
pub use time::MonotonicClock;
pub use time::{Clock, ManualClock, Timestamp};
