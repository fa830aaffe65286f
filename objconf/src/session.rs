//! Load, inspect, edit and save one settings object.
//!
//! The session owns the loaded root for its whole lifetime. Trees built from
//! it borrow the root, so they are rebuilt after every edit rather than kept.

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{CodecError, EditError, PathError},
    introspect::{self, Introspect},
    store::SettingsStore,
    walker::{self, TreeNode, TreeOutline, Walk},
};

/// Outcome of handing the root to a property inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep the edits and save them.
    Accept,
    /// Discard the edits.
    Cancel,
}

/// Whatever presents the tree and the property sheet to a user.
///
/// It receives a snapshot of the tree and mutable access to a working copy
/// of the root, and decides whether the edits are kept.
pub trait PropertyInspector<T> {
    /// Inspect and possibly modify `value`.
    fn inspect(&mut self, tree: Option<&TreeOutline>, value: &mut T) -> Decision;
}

impl<T, F> PropertyInspector<T> for F
where
    F: FnMut(Option<&TreeOutline>, &mut T) -> Decision,
{
    fn inspect(&mut self, tree: Option<&TreeOutline>, value: &mut T) -> Decision {
        self(tree, value)
    }
}

/// An open settings object together with the store it came from.
pub struct EditingSession<'s, T> {
    store: &'s SettingsStore,
    name: String,
    label_property: String,
    root: T,
    selected: String,
}

impl<'s, T> EditingSession<'s, T>
where
    T: Introspect + Serialize + DeserializeOwned + Default,
{
    /// Load the settings called `name` and open a session on them.
    ///
    /// Tree nodes are labelled by `label_property`.
    pub fn open(
        store: &'s SettingsStore,
        name: impl Into<String>,
        label_property: impl Into<String>,
    ) -> Result<Self, CodecError> {
        let name = name.into();
        let root = store.load::<T>(&name)?;
        Ok(Self {
            store,
            name,
            label_property: label_property.into(),
            root,
            selected: String::new(),
        })
    }

    /// Logical settings name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The store backing this session.
    pub fn store(&self) -> &SettingsStore {
        self.store
    }

    /// The root value.
    pub fn root(&self) -> &T {
        &self.root
    }

    /// Mutable access to the root value.
    pub fn root_mut(&mut self) -> &mut T {
        &mut self.root
    }

    /// Close the session, keeping the root.
    pub fn into_root(self) -> T {
        self.root
    }

    /// Build the tree for the current root.
    pub fn tree(&self) -> Option<TreeNode<'_>> {
        walker::build_tree(&self.root, &self.label_property)
    }

    /// Build the tree with pruning diagnostics.
    pub fn walk(&self) -> Walk<'_> {
        walker::walk(&self.root, &self.label_property)
    }

    /// Select the value at `path` for the property sheet.
    pub fn select(&mut self, path: &str) -> Result<(), PathError> {
        introspect::resolve(&self.root, path)?;
        self.selected = path.to_string();
        Ok(())
    }

    /// Path of the selected value; empty for the root.
    pub fn selected_path(&self) -> &str {
        &self.selected
    }

    /// The selected value.
    ///
    /// Fails if an edit has since made the selected path unreachable.
    pub fn selected(&self) -> Result<&dyn Introspect, PathError> {
        introspect::resolve(&self.root, &self.selected)
    }

    /// Mutable access to the selected value.
    pub fn selected_mut(&mut self) -> Result<&mut dyn Introspect, PathError> {
        introspect::resolve_mut(&mut self.root, &self.selected)
    }

    /// Assign `text` to the scalar at `path`.
    pub fn set(&mut self, path: &str, text: &str) -> Result<(), EditError> {
        introspect::assign_path(&mut self.root, path, text)?;
        debug!("{}: set {path} = {text:?}", self.name);
        Ok(())
    }

    /// Hand a copy of the root to `inspector`.
    ///
    /// On [`Decision::Accept`] the edited copy replaces the root and is
    /// saved. On [`Decision::Cancel`] the root is untouched and nothing is
    /// written.
    pub fn edit<I>(&mut self, inspector: &mut I) -> Result<Decision, CodecError>
    where
        T: Clone,
        I: PropertyInspector<T> + ?Sized,
    {
        let outline = self.tree().map(|t| t.outline());
        let mut working = self.root.clone();
        let decision = inspector.inspect(outline.as_ref(), &mut working);
        if decision == Decision::Accept {
            self.root = working;
            self.save()?;
        } else {
            info!("{}: edits discarded", self.name);
        }
        Ok(decision)
    }

    /// Save the root under the session's name.
    pub fn save(&self) -> Result<(), CodecError> {
        self.store.save(&self.root, &self.name)
    }
}
