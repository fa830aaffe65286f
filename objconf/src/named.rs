use std::ops::{Deref, DerefMut};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::introspect::{Introspect, Property};

/// An ordered list that carries its own label.
///
/// Saves declaring a record type for every "list of things with a name".
/// The label is fixed at construction; the items behave like a `Vec<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NamedContainer<T> {
    name: String,
    items: Vec<T>,
}

impl<T> NamedContainer<T> {
    /// Create an empty container with the given label.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Create a container holding `items` in order.
    pub fn with_items(name: impl Into<String>, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            name: name.into(),
            items: items.into_iter().collect(),
        }
    }

    /// The container's label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consume the container, keeping the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for NamedContainer<T> {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl<T> Deref for NamedContainer<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> DerefMut for NamedContainer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl<T> Extend<T> for NamedContainer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, T> IntoIterator for &'a NamedContainer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for NamedContainer<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Introspect> Introspect for NamedContainer<T> {
    fn type_name(&self) -> &'static str {
        "NamedContainer"
    }

    fn node(&self) -> Option<&dyn Introspect> {
        Some(self)
    }

    fn node_mut(&mut self) -> Option<&mut dyn Introspect> {
        Some(self)
    }

    fn render(&self) -> String {
        self.name.clone()
    }

    // The label has no setter.
    fn properties(&self) -> Vec<Property<'_>> {
        vec![Property {
            name: "name",
            annotations: &[],
            value: &self.name,
        }]
    }

    fn elements(&self) -> Option<Vec<&dyn Introspect>> {
        Some(self.items.iter().map(|e| e as &dyn Introspect).collect())
    }

    fn element_mut(&mut self, index: usize) -> Option<&mut dyn Introspect> {
        self.items.get_mut(index).map(|e| e as &mut dyn Introspect)
    }
}
