//! Settings record types shipped with the editor.
//!
//! Each type declares its tree shape with [`objconf::introspect!`] and its
//! persisted shape with serde. Both must list the same fields.

pub mod project;
pub mod test_settings;

use objconf::Introspect;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};

pub use project::ProjectItem;
pub use test_settings::TestSettings;

/// Everything the editor needs from a settings root type.
pub trait SettingsType:
    Introspect + Serialize + DeserializeOwned + JsonSchema + Default + Clone
{
}

impl<T> SettingsType for T where
    T: Introspect + Serialize + DeserializeOwned + JsonSchema + Default + Clone
{
}
