// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate gathering and the ordered merge.

use alloc::string::String;
use alloc::vec::Vec;

use trellis_element::Element;
use trellis_selector::SelectorKind;

use crate::index::ListenerIndex;
use crate::subscriber::SubscriberHandle;

/// Decides whether a node matches an arbitrary structural pattern.
///
/// The index only understands the fast selector kinds; everything else is
/// delegated through this seam. `&mut self` lets implementations keep
/// caches warm across calls.
pub trait StructuralMatcher<N: ?Sized> {
    /// Returns `true` if `node` matches `pattern`.
    fn matches(&mut self, node: &N, pattern: &str) -> bool;
}

impl<N: ?Sized, F> StructuralMatcher<N> for F
where
    F: FnMut(&N, &str) -> bool,
{
    fn matches(&mut self, node: &N, pattern: &str) -> bool {
        self(node, pattern)
    }
}

/// Resolves the listeners applicable to `node` for one event type.
///
/// Candidate groups are gathered as snapshots, then merged into a single
/// sequence ordered by first-registration timestamp. The merge is stable:
/// within a group, insertion order is preserved, and between groups with
/// equal timestamps the earlier-gathered group wins. Gathering order is
/// fixed (identity, tag, classes, marker, structural), so resolution is
/// deterministic even when a host clock hands out colliding stamps.
///
/// Listeners registered under several matching selectors appear once per
/// matching group; resolution reports applicability, deduplication across
/// groups is a dispatch-layer policy.
#[must_use]
pub fn resolve<T, N, M>(
    index: &ListenerIndex<T>,
    node: &N,
    event_type: &str,
    matcher: &mut M,
) -> Vec<SubscriberHandle<T>>
where
    N: Element + ?Sized,
    M: StructuralMatcher<N> + ?Sized,
{
    let mut groups: Vec<Vec<SubscriberHandle<T>>> = Vec::new();

    if let Some(id) = node.element_id()
        && let Some(group) = index.snapshot(event_type, SelectorKind::Identity, id)
    {
        groups.push(group);
    }

    if let Some(tag) = node.tag_name() {
        let tag = tag.to_ascii_lowercase();
        if let Some(group) = index.snapshot(event_type, SelectorKind::Tag, &tag) {
            groups.push(group);
        }
    }

    for (class, group) in index.groups_of_kind(event_type, SelectorKind::Class) {
        if node.has_class(class) {
            groups.push(group.to_vec());
        }
    }

    // The marker group is keyed by the identity token alone; whether the
    // node's association set records the event type does not gate lookup,
    // so hand-registered marker selectors fire too.
    if let Some(identity) = node.identity()
        && let Some(group) = index.snapshot(event_type, SelectorKind::Marker, identity.token())
    {
        groups.push(group);
    }

    // Structural patterns are collected first so the matcher (which may
    // borrow a cache mutably) never overlaps a borrow of the index.
    let structural: Vec<(String, Vec<SubscriberHandle<T>>)> = index
        .groups_of_kind(event_type, SelectorKind::Structural)
        .map(|(pattern, group)| (String::from(pattern), group.to_vec()))
        .collect();
    for (pattern, group) in structural {
        if matcher.matches(node, &pattern) {
            groups.push(group);
        }
    }

    merge_groups(groups)
}

/// Merges ordered groups into one sequence by registration timestamp.
fn merge_groups<T>(groups: Vec<Vec<SubscriberHandle<T>>>) -> Vec<SubscriberHandle<T>> {
    groups
        .into_iter()
        .filter(|group| !group.is_empty())
        .fold(Vec::new(), merge_two)
}

/// Stable two-way merge; on equal stamps the left (earlier-gathered) side
/// wins.
fn merge_two<T>(
    left: Vec<SubscriberHandle<T>>,
    right: Vec<SubscriberHandle<T>>,
) -> Vec<SubscriberHandle<T>> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        match (left.peek(), right.peek()) {
            (Some(a), Some(b)) => {
                if a.sort_key() <= b.sort_key() {
                    merged.extend(left.next());
                } else {
                    merged.extend(right.next());
                }
            }
            (Some(_), None) => merged.extend(left.next()),
            (None, Some(_)) => merged.extend(right.next()),
            (None, None) => break,
        }
    }
    merged
}
