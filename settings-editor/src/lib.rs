//! # settings-editor
//!
//! Command-line editor for typed settings files.
//!
//! `settings-editor` loads a named settings file into its record type, shows
//! it as an object tree, and edits it through property paths or an
//! interactive line inspector. Files are written only when an edit is
//! accepted.
//!
//! ## Modules
//!
//! - [`commands`] - Subcommand handlers
//! - [`ctx`] - Application context
//! - [`inspector`] - Line-oriented property inspector
//! - [`schema`] - Settings record types
//! - [`utils`] - Common helper functions

/// Subcommand handlers.
pub mod commands;

/// Application context.
pub mod ctx;

/// Interactive property inspector.
///
/// Presents the tree and property sheet and decides whether edits are kept.
pub mod inspector;

/// Settings record types.
pub mod schema;

/// Common helper functions.
pub mod utils;

#[macro_use]
extern crate log;
