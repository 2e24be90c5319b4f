use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{Error, Result};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "workout-log.toml";

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Data file location. Defaults to a file in the working directory whose
    /// name depends on the format.
    pub data_file: Option<PathBuf>,
    pub format: StorageFormat,
    /// Save after every change instead of only on an explicit `save`.
    pub autosave: bool,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// One comma-joined record per line, no header
    #[default]
    Text,
    /// Tabular file with a header row
    Csv,
}

impl StorageFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Text => "workouts.txt",
            Self::Csv => "workouts.csv",
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            format: StorageFormat::default(),
            autosave: true,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from [`DEFAULT_CONFIG_FILE`] if no path
    /// is given. Only the default file may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let settings: Self = toml::from_str(&source).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?settings, "loaded configuration");

        Ok(settings)
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.format.default_file_name()))
    }
}
