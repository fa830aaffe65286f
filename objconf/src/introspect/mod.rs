//! Declared-property metadata for settings types.
//!
//! Rust has no runtime reflection, so every type that takes part in tree
//! building or path-addressed editing implements [`Introspect`]. Records get
//! the implementation from [`introspect!`](crate::introspect!), enumerations
//! from [`introspect_enum!`](crate::introspect_enum!); scalars, `Vec<T>`,
//! `Option<T>`, `Duration` and [`NamedContainer<T>`](crate::NamedContainer)
//! are covered by this module.

use crate::error::AssignError;

mod impls;
mod macros;
mod path;

pub use impls::{format_duration, parse_duration};
pub use path::{assign_path, resolve, resolve_mut};

/// Metadata attached to a property at its declaration.
///
/// Only [`Annotation::Expandable`] affects tree building; the rest are
/// presentation hints for whatever renders the property sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// The property's value becomes a tree branch.
    Expandable,
    /// Human-readable property name.
    DisplayName(&'static str),
    /// Group heading on the property sheet.
    Category(&'static str),
    /// Help text.
    Description(&'static str),
}

/// One declared property, borrowed from its owner.
#[derive(Clone, Copy)]
pub struct Property<'a> {
    /// Declared name, as used in property paths.
    pub name: &'static str,
    /// Annotations in declaration order.
    pub annotations: &'static [Annotation],
    /// Current value.
    pub value: &'a dyn Introspect,
}

impl Property<'_> {
    /// Whether the walker should descend into this property.
    pub fn is_expandable(&self) -> bool {
        self.annotations.contains(&Annotation::Expandable)
    }

    /// Display name, falling back to the declared name.
    pub fn display_name(&self) -> &'static str {
        self.annotations
            .iter()
            .find_map(|a| match a {
                Annotation::DisplayName(s) => Some(*s),
                _ => None,
            })
            .unwrap_or(self.name)
    }

    /// Property sheet category, if any.
    pub fn category(&self) -> Option<&'static str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Category(s) => Some(*s),
            _ => None,
        })
    }

    /// Help text, if any.
    pub fn description(&self) -> Option<&'static str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Description(s) => Some(*s),
            _ => None,
        })
    }
}

impl std::fmt::Debug for Property<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("annotations", &self.annotations)
            .field("value", &self.value.render())
            .finish()
    }
}

/// Runtime view of a value's declared shape.
///
/// The trait is object safe; the walker and the path resolver only ever see
/// `&dyn Introspect`.
pub trait Introspect {
    /// Name of the concrete type, for messages.
    fn type_name(&self) -> &'static str;

    /// The value itself, or `None` when it is absent.
    ///
    /// Only `Option<T>` ever returns `None`.
    fn node(&self) -> Option<&dyn Introspect>;

    /// Mutable counterpart of [`Introspect::node`].
    fn node_mut(&mut self) -> Option<&mut dyn Introspect>;

    /// Textual form of the current value.
    fn render(&self) -> String;

    /// Declared properties, in declaration order.
    fn properties(&self) -> Vec<Property<'_>> {
        Vec::new()
    }

    /// Look up one declared property by name.
    fn property(&self, name: &str) -> Option<Property<'_>> {
        self.properties().into_iter().find(|p| p.name == name)
    }

    /// Setter access to a property. `None` for unknown or read-only names.
    fn property_mut(&mut self, _name: &str) -> Option<&mut dyn Introspect> {
        None
    }

    /// Elements in order, if this value is an ordered container.
    fn elements(&self) -> Option<Vec<&dyn Introspect>> {
        None
    }

    /// Mutable access to one container element.
    fn element_mut(&mut self, _index: usize) -> Option<&mut dyn Introspect> {
        None
    }

    /// Accepted values for enumerations.
    fn choices(&self) -> Option<&'static [&'static str]> {
        None
    }

    /// Replace the value by parsing `text`. Only scalars accept this.
    fn assign(&mut self, _text: &str) -> Result<(), AssignError> {
        Err(AssignError::NotScalar(self.type_name()))
    }
}

impl std::fmt::Debug for dyn Introspect + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.type_name(), self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_object_debug() {
        let level = 7u8;
        let value: &dyn Introspect = &level;
        assert_eq!(format!("{value:?}"), "u8(\"7\")");

        let found: Result<&dyn Introspect, crate::PathError> = Ok(value);
        assert_eq!(format!("{found:?}"), "Ok(u8(\"7\"))");
    }
}
