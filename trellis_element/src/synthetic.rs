// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless [`Element`] implementation backed by plain collections.

use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{Element, NodeIdentity};

/// A self-contained element for headless hosts and tests.
///
/// Stores a tag, an optional id, a class list, and an attribute map. The
/// identity slot follows the write-once contract of
/// [`Element::attach_identity`].
///
/// ```rust
/// use trellis_element::{Element, SyntheticElement};
///
/// let node = SyntheticElement::new("input")
///     .with_class("field")
///     .with_attribute("disabled", "");
/// assert!(node.has_class("field"));
/// assert_eq!(node.attribute("disabled"), Some(""));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SyntheticElement {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    identity: Option<NodeIdentity>,
}

impl SyntheticElement {
    /// Creates an element with the given tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Creates an element with no tag name.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Sets the id attribute (builder form).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a class (builder form).
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Sets an attribute (builder form).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Adds a class if not already present.
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    /// Removes a class if present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// The current class list, in insertion order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl Element for SyntheticElement {
    fn tag_name(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    fn element_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn identity(&self) -> Option<&NodeIdentity> {
        self.identity.as_ref()
    }

    fn identity_mut(&mut self) -> Option<&mut NodeIdentity> {
        self.identity.as_mut()
    }

    fn attach_identity(&mut self, identity: NodeIdentity) {
        // Write-once: a second attach is ignored.
        if self.identity.is_none() {
            self.identity = Some(identity);
        }
    }
}
