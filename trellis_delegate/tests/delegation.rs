// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end delegation scenarios through the router facade.

use trellis_delegate::{EventRouter, ManualClock, Subscriber, SubscriberHandle};
use trellis_element::{Element, SyntheticElement};
use trellis_identity::SeededTokenSource;

type Router = EventRouter<&'static str, SeededTokenSource, ManualClock>;

fn router() -> Router {
    EventRouter::new(SeededTokenSource::new(0xd1ce), ManualClock::new(0))
}

fn names(handles: &[SubscriberHandle<&'static str>]) -> Vec<&'static str> {
    handles.iter().map(|h| *h.payload()).collect()
}

#[test]
fn only_applicable_groups_fire() {
    let mut r = router();
    let on_btn = Subscriber::handle("btn");
    let on_save = Subscriber::handle("save");
    let on_form_btn = Subscriber::handle("form-btn");

    r.register("click", ".btn", &on_btn).unwrap();
    r.clock_mut().advance(1);
    r.register("click", "#save", &on_save).unwrap();
    r.clock_mut().advance(1);
    r.register("click", "form .btn:not([disabled])", &on_form_btn)
        .unwrap();

    // A `.btn` node that is not `#save`; the structural pattern carries a
    // pseudo-class, which the built-in matcher never matches.
    let node = SyntheticElement::new("button").with_class("btn");
    assert_eq!(names(&r.resolve(&node, "click")), ["btn"]);
}

#[test]
fn multiple_matching_groups_merge_in_registration_order() {
    let mut r = router();
    let f1 = Subscriber::handle("f1");
    let f2 = Subscriber::handle("f2");

    r.register("click", ".a", &f1).unwrap();
    r.clock_mut().advance(1);
    r.register("click", "#x", &f2).unwrap();

    let node = SyntheticElement::new("div").with_id("x").with_class("a");
    assert_eq!(names(&r.resolve(&node, "click")), ["f1", "f2"]);

    // Swap the registration order in a fresh router; the result follows it.
    let mut r = router();
    let f1 = Subscriber::handle("f1");
    let f2 = Subscriber::handle("f2");
    r.register("click", "#x", &f2).unwrap();
    r.clock_mut().advance(1);
    r.register("click", ".a", &f1).unwrap();
    assert_eq!(names(&r.resolve(&node, "click")), ["f2", "f1"]);
}

#[test]
fn merge_spans_many_groups() {
    let mut r = router();
    let subs: Vec<_> = ["s0", "s1", "s2", "s3", "s4"]
        .map(Subscriber::handle)
        .into_iter()
        .collect();

    // Interleave registrations across selector kinds.
    let selectors = [".a", "#x", "div", ".b", "section .a"];
    for (selector, handle) in selectors.iter().zip(&subs) {
        r.register("click", selector, handle).unwrap();
        r.clock_mut().advance(1);
    }

    let node = SyntheticElement::new("div")
        .with_id("x")
        .with_class("a")
        .with_class("b");
    assert_eq!(
        names(&r.resolve(&node, "click")),
        ["s0", "s1", "s2", "s3", "s4"]
    );
}

#[test]
fn one_handle_under_two_selectors_appears_once_per_group() {
    let mut r = router();
    let h = Subscriber::handle("h");
    r.register("click", ".a", &h).unwrap();
    r.clock_mut().advance(1);
    r.register("click", "#x", &h).unwrap();

    // Applicability is per group; deduplication is the dispatcher's call.
    let node = SyntheticElement::new("div").with_id("x").with_class("a");
    assert_eq!(names(&r.resolve(&node, "click")), ["h", "h"]);
}

#[test]
fn duplicate_registration_under_one_selector_is_dropped() {
    let mut r = router();
    let h = Subscriber::handle("h");
    r.register("click", ".a", &h).unwrap();
    r.clock_mut().advance(1);
    r.register("click", ".a", &h).unwrap();

    let node = SyntheticElement::new("div").with_class("a");
    assert_eq!(names(&r.resolve(&node, "click")), ["h"]);
}

#[test]
fn unregistration_leaves_no_phantom_groups() {
    let mut r = router();
    let h = Subscriber::handle("h");
    r.register("click", ".a", &h).unwrap();
    assert!(r.unregister("click", ".a", &h));
    assert!(r.index().is_empty());

    let node = SyntheticElement::new("div").with_class("a");
    assert!(r.resolve(&node, "click").is_empty());
}

#[test]
fn node_direct_subscriptions_are_per_node() {
    let mut r = router();
    let mut a = SyntheticElement::new("li");
    let mut b = SyntheticElement::new("li");
    let h = Subscriber::handle("direct");

    let marker = r.register_node(&mut a, "click", &h);
    assert!(marker.starts_with("data-trellis_click_"));
    assert_eq!(a.attribute(&marker), Some(""));

    assert_eq!(names(&r.resolve(&a, "click")), ["direct"]);
    assert!(r.resolve(&b, "click").is_empty());

    // Same event type on another node: separate identity, separate group.
    r.clock_mut().advance(1);
    let other = r.register_node(&mut b, "click", &h);
    assert_ne!(marker, other);
    assert_eq!(names(&r.resolve(&b, "click")), ["direct"]);
}

#[test]
fn node_direct_and_selector_subscriptions_merge() {
    let mut r = router();
    let mut node = SyntheticElement::new("button").with_class("btn");
    let direct = Subscriber::handle("direct");
    let broad = Subscriber::handle("broad");

    r.register_node(&mut node, "click", &direct);
    r.clock_mut().advance(1);
    r.register("click", ".btn", &broad).unwrap();

    assert_eq!(names(&r.resolve(&node, "click")), ["direct", "broad"]);
}

#[test]
fn colliding_timestamps_resolve_deterministically() {
    // No clock advancement at all: every stamp is identical. The gathering
    // order (identity, tag, classes in value order) breaks the ties, the
    // same way every time.
    let mut r = router();
    let on_id = Subscriber::handle("id");
    let on_tag = Subscriber::handle("tag");
    let on_class = Subscriber::handle("class");
    r.register("click", ".a", &on_class).unwrap();
    r.register("click", "div", &on_tag).unwrap();
    r.register("click", "#x", &on_id).unwrap();

    let node = SyntheticElement::new("div").with_id("x").with_class("a");
    let first = names(&r.resolve(&node, "click"));
    assert_eq!(first, ["id", "tag", "class"]);
    for _ in 0..3 {
        assert_eq!(names(&r.resolve(&node, "click")), first);
    }
}

#[test]
fn structural_patterns_match_via_the_final_compound() {
    let mut r = router();
    let h = Subscriber::handle("deep");
    r.register("click", "form input.field", &h).unwrap();

    let field = SyntheticElement::new("input").with_class("field");
    let plain = SyntheticElement::new("input");
    assert_eq!(names(&r.resolve(&field, "click")), ["deep"]);
    assert!(r.resolve(&plain, "click").is_empty());
}

#[test]
fn custom_structural_matcher_overrides_the_default() {
    let mut r = router();
    let h = Subscriber::handle("deep");
    r.register("click", "form .btn:not([disabled])", &h).unwrap();

    let node = SyntheticElement::new("button").with_class("btn");
    // The built-in matcher fails closed on pseudo-classes...
    assert!(r.resolve(&node, "click").is_empty());
    // ...but a host with tree access can decide for itself.
    let mut host_matcher =
        |_: &SyntheticElement, pattern: &str| pattern == "form .btn:not([disabled])";
    assert_eq!(
        names(&r.resolve_with(&node, "click", &mut host_matcher)),
        ["deep"]
    );
}

#[test]
fn event_types_are_fully_isolated() {
    let mut r = router();
    let mut node = SyntheticElement::new("input");
    let on_click = Subscriber::handle("click");
    let on_key = Subscriber::handle("key");

    r.register_node(&mut node, "click", &on_click);
    r.clock_mut().advance(1);
    r.register_node(&mut node, "keydown", &on_key);

    assert_eq!(names(&r.resolve(&node, "click")), ["click"]);
    assert_eq!(names(&r.resolve(&node, "keydown")), ["key"]);
}

#[test]
fn blank_selectors_register_nothing() {
    let mut r = router();
    let h = Subscriber::handle("h");
    r.register("click", "", &h).unwrap();
    r.register("click", "   ", &h).unwrap();
    assert!(r.index().is_empty());
}
