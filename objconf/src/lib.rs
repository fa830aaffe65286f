//! # objconf
//!
//! Typed settings persistence and annotation-driven object tree building.
//!
//! A settings type is a plain serde record. `objconf` stores it under a
//! logical name in one base directory, and builds a navigable tree from any
//! instance by following the properties its type declares as expandable.
//!
//! ## Features
//!
//! - Name to file mapping: `"My Settings"` lives in `My_Settings.toml`
//! - Missing or empty settings files load as the type's defaults
//! - Strict decoding: unknown, missing or mismatched fields are errors
//! - TOML and JSON encodings, plus JSON Schema export
//! - Labelled ordered lists via [`NamedContainer`]
//! - Tree building with pruning diagnostics, and dot-path editing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use objconf::{NamedContainer, SettingsStore, StoreConfig, build_tree, introspect};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(deny_unknown_fields)]
//! struct Station {
//!     name: String,
//!     probes: NamedContainer<Probe>,
//! }
//!
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(deny_unknown_fields)]
//! struct Probe {
//!     name: String,
//!     offset: f64,
//! }
//!
//! introspect! { Station { name, probes: [Expandable] } }
//! introspect! { Probe { name, offset } }
//!
//! let store = SettingsStore::new(StoreConfig::new("settings"));
//! let station: Station = store.load("Bench Station").unwrap();
//! if let Some(tree) = build_tree(&station, "name") {
//!     print!("{}", tree.render());
//! }
//! store.save(&station, "Bench Station").unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`codec`] - Strict encoding and decoding
//! - [`store`] - Name to file mapping, load and save
//! - [`introspect`] - Declared properties and property paths
//! - [`walker`] - Tree building
//! - [`session`] - Load, edit and save one settings object

#[macro_use]
extern crate log;

pub mod codec;
pub mod error;
pub mod introspect;
mod named;
pub mod session;
pub mod store;
pub mod walker;

pub use codec::Format;
pub use error::{AssignError, CodecError, EditError, PathError, UnknownFormat};
pub use introspect::{Annotation, Introspect, Property, assign_path, resolve, resolve_mut};
pub use named::NamedContainer;
pub use session::{Decision, EditingSession, PropertyInspector};
pub use store::{SettingsStore, StoreConfig};
pub use walker::{TreeNode, TreeOutline, Walk, build_tree, walk};
