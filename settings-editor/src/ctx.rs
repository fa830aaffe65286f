//! Application context.
//!
//! [`AppContext`] holds the settings store the editor works on and the
//! property used to label tree nodes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use objconf::{Format, SettingsStore, StoreConfig, store::default_directory};

use crate::utils::replace_env_placeholders;

/// Options that decide where settings live and how they are read.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    /// Settings directory. May contain `${env:VAR}` placeholders.
    pub dir: Option<String>,
    /// File format; TOML when unset.
    pub format: Option<Format>,
    /// Refuse names that would leave the settings directory.
    pub strict_names: bool,
    /// Property naming tree nodes; `name` when unset.
    pub label: Option<String>,
}

/// The state shared by every command.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Store holding the settings files.
    pub store: SettingsStore,
    /// Label property for tree building.
    pub label: String,
}

impl AppContext {
    /// Default label property.
    pub const DEFAULT_LABEL: &'static str = "name";

    /// Builds the context from command-line options.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory contains a placeholder for an
    /// unset environment variable.
    pub fn new(options: ContextOptions) -> anyhow::Result<Self> {
        let directory = match &options.dir {
            Some(raw) => PathBuf::from(
                replace_env_placeholders(raw)
                    .with_context(|| format!("invalid settings directory {raw:?}"))?,
            ),
            None => default_directory(),
        };
        debug!("settings directory: {}", directory.display());

        let config = StoreConfig::new(directory)
            .with_format(options.format.unwrap_or_default())
            .with_strict_names(options.strict_names);

        Ok(Self {
            store: SettingsStore::new(config),
            label: options
                .label
                .unwrap_or_else(|| Self::DEFAULT_LABEL.to_string()),
        })
    }

    /// Settings directory.
    pub fn directory(&self) -> &Path {
        self.store.directory()
    }

    /// File that holds the settings called `name`.
    pub fn settings_path(&self, name: &str) -> PathBuf {
        self.store.path_for(name)
    }
}
