// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural matching backed by the pattern extractor.

use trellis_element::Element;
use trellis_pattern::{Descriptor, RuleExtractor};

use crate::resolve::StructuralMatcher;

/// A structural matcher that tests the deepest compound of each pattern
/// group against the node itself.
///
/// Descendant and sibling constraints need tree context this engine does not
/// have, so a pattern matches when any of its groups' final descriptors
/// applies to the node. Pseudo-classes are treated as never matching (see
/// [`descriptor_applies`]); hosts with real tree access should supply their
/// own [`StructuralMatcher`] instead.
///
/// [`StructuralMatcher`] is implemented for closures, not for this type
/// directly; use [`RuleMatcher::as_matcher`] where a matcher is expected.
#[derive(Clone, Debug, Default)]
pub struct RuleMatcher {
    extractor: RuleExtractor,
}

impl RuleMatcher {
    /// Creates a matcher with a default-capacity pattern cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractor: RuleExtractor::new(),
        }
    }

    /// Creates a matcher with an explicit pattern cache capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            extractor: RuleExtractor::with_capacity(capacity),
        }
    }

    /// The underlying extractor, for cache inspection and invalidation.
    pub fn extractor_mut(&mut self) -> &mut RuleExtractor {
        &mut self.extractor
    }

    /// Tests a node against a pattern through the cached extractor.
    ///
    /// Patterns reach resolution only after registration validated them, so
    /// a parse failure here means external invalidation raced a mutation; it
    /// is treated as a non-match.
    pub fn matches<N: Element + ?Sized>(&mut self, node: &N, pattern: &str) -> bool {
        match self.extractor.extract(pattern) {
            Ok(rules) => rules.iter().any(|rule| descriptor_applies(rule, node)),
            Err(_) => false,
        }
    }

    /// Borrows this matcher as a [`StructuralMatcher`].
    pub fn as_matcher<N: Element + ?Sized>(&mut self) -> impl StructuralMatcher<N> + '_ {
        move |node: &N, pattern: &str| self.matches(node, pattern)
    }
}

/// Tests one final descriptor against a node.
///
/// Every recorded constraint must hold: tag (ASCII case-insensitive), id,
/// all classes, and presence of all named attributes. Descriptors carrying
/// pseudo-classes never apply, since pseudo state (`:hover`, `:not(…)`) is
/// not observable through [`Element`]; failing closed keeps resolution from
/// inventing matches.
#[must_use]
pub fn descriptor_applies<N: Element + ?Sized>(rule: &Descriptor, node: &N) -> bool {
    if !rule.pseudos.is_empty() {
        return false;
    }
    if let Some(tag) = &rule.tag {
        let node_tag = node.tag_name();
        if !node_tag.is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
            return false;
        }
    }
    if let Some(id) = &rule.identity {
        if node.element_id() != Some(id.as_str()) {
            return false;
        }
    }
    if !rule.classes.iter().all(|class| node.has_class(class)) {
        return false;
    }
    rule.attributes
        .iter()
        .all(|name| node.attribute(name).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_element::SyntheticElement;
    use trellis_pattern::parse;

    fn rule_of(pattern: &str) -> Descriptor {
        parse(pattern).unwrap().descriptors.remove(0)
    }

    #[test]
    fn tag_comparison_is_case_insensitive() {
        let node = SyntheticElement::new("BUTTON");
        assert!(descriptor_applies(&rule_of("button"), &node));
        assert!(!descriptor_applies(&rule_of("input"), &node));
    }

    #[test]
    fn all_classes_must_be_present() {
        let node = SyntheticElement::new("div").with_class("a").with_class("b");
        assert!(descriptor_applies(&rule_of("div.a.b"), &node));
        assert!(!descriptor_applies(&rule_of("div.a.c"), &node));
    }

    #[test]
    fn attribute_constraints_check_presence() {
        let node = SyntheticElement::new("input").with_attribute("disabled", "");
        assert!(descriptor_applies(&rule_of("input[disabled]"), &node));
        assert!(!descriptor_applies(&rule_of("input[required]"), &node));
    }

    #[test]
    fn pseudo_classes_never_apply() {
        let node = SyntheticElement::new("input");
        assert!(!descriptor_applies(&rule_of("input:focus"), &node));
    }

    #[test]
    fn matcher_tests_the_deepest_compound_only() {
        let mut matcher = RuleMatcher::new();
        let node = SyntheticElement::new("button").with_class("btn");
        // The ancestor constraint (`form`) is not checked; the final
        // compound (`.btn`) applies.
        assert!(matcher.matches(&node, "form .btn"));
        assert!(!matcher.matches(&node, "form .other"));
    }

    #[test]
    fn matcher_accepts_any_matching_group() {
        let mut matcher = RuleMatcher::new();
        let node = SyntheticElement::new("a");
        assert!(matcher.matches(&node, "b, a"));
    }

    #[test]
    fn malformed_patterns_are_non_matches() {
        let mut matcher = RuleMatcher::new();
        let node = SyntheticElement::new("div");
        assert!(!matcher.matches(&node, "div[oops"));
    }

    #[test]
    fn as_matcher_adapts_to_the_matcher_seam() {
        let mut matcher = RuleMatcher::new();
        let node = SyntheticElement::new("button").with_class("btn");
        let mut seam = matcher.as_matcher();
        assert!(StructuralMatcher::matches(&mut seam, &node, "form .btn"));
    }
}
