//! Named settings files under one base directory.

use std::{
    fs::{self, File},
    io::{self, BufReader},
    path::{Component, Path, PathBuf},
};

use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    codec::{self, Format},
    error::CodecError,
};

/// Where settings files live and how they are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base directory holding every settings file.
    pub directory: PathBuf,
    /// Encoding, which also fixes the file extension.
    pub format: Format,
    /// Refuse names that would resolve outside `directory`.
    pub strict_names: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            format: Format::default(),
            strict_names: false,
        }
    }
}

impl StoreConfig {
    /// Settings in `directory`, TOML encoded.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Use another encoding.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Reject names containing path separators or `..`.
    pub fn with_strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }
}

/// Directory of the running executable, or the working directory when that
/// cannot be determined.
pub fn default_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// File stem for a settings name: spaces become underscores, nothing else
/// changes.
pub fn sanitize_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Loads and saves typed settings by logical name.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    config: StoreConfig,
}

impl SettingsStore {
    /// Create a store from its configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Base directory.
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// File holding the settings called `name`.
    ///
    /// `"My Settings"` maps to `<directory>/My_Settings.toml`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let file = format!(
            "{}.{}",
            sanitize_name(name),
            self.config.format.extension()
        );
        self.config.directory.join(file)
    }

    /// JSON Schema file written next to the settings called `name`.
    pub fn schema_path_for(&self, name: &str) -> PathBuf {
        self.config
            .directory
            .join(format!("{}-schema.json", sanitize_name(name)))
    }

    /// Whether the settings file for `name` exists.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Load the settings called `name`.
    ///
    /// A missing file yields `T::default()` and nothing is written. A file
    /// that holds no value also yields the default. Any other failure,
    /// including a document that does not fit `T`, is returned.
    pub fn load<T>(&self, name: &str) -> Result<T, CodecError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.checked_path(name)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("{} not found, using defaults", path.display());
                return Ok(T::default());
            }
            Err(e) => return Err(CodecError::Io(e)),
        };

        debug!("loading {}", path.display());
        match codec::deserialize_optional(BufReader::new(file), self.config.format)? {
            Some(value) => Ok(value),
            None => {
                warn!("{} holds no value, using defaults", path.display());
                Ok(T::default())
            }
        }
    }

    /// Save `value` as the settings called `name`, replacing any existing
    /// file.
    pub fn save<T>(&self, value: &T, name: &str) -> Result<(), CodecError>
    where
        T: Serialize + ?Sized,
    {
        let path = self.checked_path(name)?;
        // Encode first so a shape error leaves the old file intact.
        let text = codec::encode(value, self.config.format)?;
        fs::write(&path, text)?;
        info!("saved {}", path.display());
        Ok(())
    }

    /// Write the JSON Schema of `T` next to the settings called `name`.
    pub fn save_schema<T: JsonSchema>(&self, name: &str) -> Result<PathBuf, CodecError> {
        self.checked_path(name)?;
        let path = self.schema_path_for(name);
        let schema = schemars::schema_for!(T);
        let text = codec::encode(&schema, Format::Json)?;
        fs::write(&path, text)?;
        info!("wrote schema {}", path.display());
        Ok(path)
    }

    fn checked_path(&self, name: &str) -> Result<PathBuf, CodecError> {
        let path = self.path_for(name);
        if self.config.strict_names && !stays_inside(name) {
            return Err(CodecError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("settings name {name:?} leaves the settings directory"),
            )));
        }
        Ok(path)
    }
}

fn stays_inside(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}
