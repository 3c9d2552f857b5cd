//! The structural value every security fragment is built from.
//!
//! A WS-Security header is a small XML tree whose element order matters:
//! signature verification and schema validation both depend on it. Rather
//! than an arbitrary nested map, the tree is modelled with three explicit
//! parts per element:
//!
//! - the child nodes, keyed by qualified tag name
//! - the `order` in which those children serialize
//! - an attribute side-map giving the XML attributes of each child
//!
//! [`SecurityFragment`] wraps one such [`Element`] as the content of the
//! `wsse:Security` root and carries the root's own attributes.

use crate::wsse::constants::{SECURITY_KEY, WSE_NAMESPACE};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// XML attributes of a single element, keyed by qualified attribute name.
pub type Attributes = BTreeMap<String, String>;

/// A child value: either text content or a nested element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Character data.
    Text(String),
    /// A nested element with its own children, order and attributes.
    Element(Element),
}

impl Node {
    /// Returns the text content, if this node is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    /// Returns the nested element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An ordered, attributed set of child nodes.
///
/// `order` always lists exactly the keys present in `children`, in
/// insertion order. Attributes may be recorded for any child key.
///
/// # Example
///
/// ```rust
/// use wsse_header::Element;
///
/// let token = Element::new()
///     .with_text("wsse:Username", "alice")
///     .with_text("wsse:Password", "secret")
///     .with_attribute("wsse:Password", "Type", "PasswordText");
///
/// assert_eq!(token.order(), ["wsse:Username", "wsse:Password"]);
/// assert_eq!(token.attribute("wsse:Password", "Type"), Some("PasswordText"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    children: BTreeMap<String, Node>,
    order: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, Attributes>,
}

impl Element {
    /// Creates an empty element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text child and returns `self` for chaining.
    pub fn with_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, Node::Text(text.into()));
        self
    }

    /// Appends a nested element child and returns `self` for chaining.
    pub fn with_child(mut self, key: impl Into<String>, child: Element) -> Self {
        self.insert(key, Node::Element(child));
        self
    }

    /// Records an attribute for the child `key` and returns `self` for chaining.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set_attribute(key, name, value);
        self
    }

    /// Inserts a child.
    ///
    /// A new key is appended to the order; an existing key keeps its
    /// position and the previous node is returned.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let previous = self.children.insert(key.clone(), node.into());
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// Removes a child together with the attributes recorded for it.
    pub fn remove(&mut self, key: &str) -> Option<(Node, Option<Attributes>)> {
        let node = self.children.remove(key)?;
        self.order.retain(|k| k != key);
        Some((node, self.attributes.remove(key)))
    }

    /// Sets a single attribute on the child `key`.
    pub fn set_attribute(
        &mut self,
        key: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.attributes
            .entry(key.into())
            .or_default()
            .insert(name.into(), value.into());
    }

    /// Merges `attributes` into those already recorded for `key`.
    ///
    /// Incoming names overwrite existing ones; other names are kept.
    pub fn merge_attributes(&mut self, key: impl Into<String>, attributes: Attributes) {
        self.attributes
            .entry(key.into())
            .or_default()
            .extend(attributes);
    }

    /// Returns the child stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children.get(key)
    }

    /// Returns the text of the child `key`, if it is a text node.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_text)
    }

    /// Returns the child `key`, if it is a nested element.
    pub fn element(&self, key: &str) -> Option<&Element> {
        self.get(key).and_then(Node::as_element)
    }

    /// Returns the attributes recorded for the child `key`.
    pub fn attributes(&self, key: &str) -> Option<&Attributes> {
        self.attributes.get(key)
    }

    /// Returns a single attribute value of the child `key`.
    pub fn attribute(&self, key: &str, name: &str) -> Option<&str> {
        self.attributes(key)
            .and_then(|attrs| attrs.get(name))
            .map(String::as_str)
    }

    /// The serialization order of the children.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Returns `true` if a child is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over the children in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.order
            .iter()
            .filter_map(|key| self.children.get(key).map(|node| (key.as_str(), node)))
    }

    /// Moves the listed keys to the front, in the listed order.
    ///
    /// Keys not present as children are ignored; children not listed keep
    /// their relative order after the listed ones.
    pub fn reorder<S: AsRef<str>>(&mut self, preferred: &[S]) {
        let mut order: Vec<String> = Vec::with_capacity(self.order.len());
        for key in preferred {
            let key = key.as_ref();
            if self.children.contains_key(key) && !order.iter().any(|k| k == key) {
                order.push(key.to_string());
            }
        }
        for key in &self.order {
            if !order.contains(key) {
                order.push(key.clone());
            }
        }
        self.order = order;
    }

    /// Deep-merges `other` into `self`.
    ///
    /// Children present on both sides merge recursively when both are
    /// elements; otherwise the incoming node replaces the existing one in
    /// place. New keys are appended in `other`'s order. Attribute sets are
    /// merged name by name, incoming values winning.
    pub fn merge(&mut self, other: Element) {
        let Element {
            mut children,
            order,
            attributes,
        } = other;

        for key in order {
            let Some(incoming) = children.remove(&key) else {
                continue;
            };
            match (self.children.get_mut(&key), incoming) {
                (Some(Node::Element(existing)), Node::Element(incoming)) => {
                    existing.merge(incoming);
                }
                (Some(slot), incoming) => *slot = incoming,
                (None, incoming) => {
                    self.children.insert(key.clone(), incoming);
                    self.order.push(key);
                }
            }
        }

        for (key, attrs) in attributes {
            self.merge_attributes(key, attrs);
        }
    }
}

/// One `wsse:Security` element: its content plus the root's attributes.
///
/// Every fragment the factory produces, and every merge result, has this
/// shape. Serializing it with serde yields
/// `{"wsse:Security": {children, order, attributes}, "attributes": {"wsse:Security": {...}}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityFragment {
    content: Element,
    attributes: Attributes,
}

impl SecurityFragment {
    /// Wraps `content` in a root carrying the `xmlns:wsse` declaration.
    pub fn new(content: Element) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert("xmlns:wsse".to_string(), WSE_NAMESPACE.to_string());
        Self {
            content,
            attributes,
        }
    }

    /// The qualified name of the root element.
    pub fn root_key(&self) -> &'static str {
        SECURITY_KEY
    }

    /// The children of the root element.
    pub fn content(&self) -> &Element {
        &self.content
    }

    /// Mutable access to the children of the root element.
    pub fn content_mut(&mut self) -> &mut Element {
        &mut self.content
    }

    /// Consumes the fragment and returns its content.
    pub fn into_content(self) -> Element {
        self.content
    }

    /// The serialization order of the root's children.
    pub fn order(&self) -> &[String] {
        self.content.order()
    }

    /// Returns the root child stored under `key`.
    pub fn child(&self, key: &str) -> Option<&Node> {
        self.content.get(key)
    }

    /// Returns the attributes recorded for the root child `key`.
    pub fn child_attributes(&self, key: &str) -> Option<&Attributes> {
        self.content.attributes(key)
    }

    /// Attributes of the `wsse:Security` element itself.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Sets an attribute on the `wsse:Security` element itself.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Merges attributes into those of the `wsse:Security` element.
    pub fn merge_root_attributes(&mut self, attributes: Attributes) {
        self.attributes.extend(attributes);
    }

    /// Merges `other` into `self`, keeping first-seen child order.
    ///
    /// The resulting order is `self`'s order followed by the keys of
    /// `other` not already present.
    pub fn merge_from(&mut self, other: SecurityFragment) {
        let mut order = self.content.order().to_vec();
        for key in other.content.order() {
            if !order.contains(key) {
                order.push(key.clone());
            }
        }

        self.content.merge(other.content);
        self.attributes.extend(other.attributes);
        self.content.reorder(order.as_slice());
    }
}

impl Serialize for SecurityFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut root_attributes = BTreeMap::new();
        root_attributes.insert(SECURITY_KEY, &self.attributes);

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(SECURITY_KEY, &self.content)?;
        map.serialize_entry("attributes", &root_attributes)?;
        map.end()
    }
}

/// Combines two fragments into one.
///
/// With no accumulated fragment yet, `b` is returned unchanged. Otherwise
/// `b` is merged into `a` and the merged `a` is returned.
///
/// # Example
///
/// ```rust
/// use wsse_header::{Element, SecurityFragment, merge};
///
/// let a = SecurityFragment::new(Element::new().with_text("wsu:Timestamp", "t"));
/// let b = SecurityFragment::new(Element::new().with_text("wsse:UsernameToken", "u"));
///
/// let merged = merge(Some(a), b);
/// assert_eq!(merged.order(), ["wsu:Timestamp", "wsse:UsernameToken"]);
/// ```
pub fn merge(a: Option<SecurityFragment>, b: SecurityFragment) -> SecurityFragment {
    match a {
        None => b,
        Some(mut a) => {
            a.merge_from(b);
            a
        }
    }
}
