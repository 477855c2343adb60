//! JSON settings file loading
//!
//! The file is flattened into `section:key` paths the first time it is read.
//! Keys are compared case-insensitively, leaves are kept as their text form.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Default settings file, resolved against the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Separator between nested section names in a lookup key
pub const KEY_DELIMITER: char = ':';

/// Failure to load the settings file at startup
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// No file at the given path
    #[error("settings file not found: {}", path.display())]
    NotFound {
        /// Path that was tried
        path: PathBuf,
    },

    /// File exists but could not be read
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// File is not valid JSON
    #[error("malformed settings file {}: {source}", path.display())]
    Malformed {
        /// Path that was parsed
        path: PathBuf,
        /// Parser error with line and column
        source: serde_json::Error,
    },

    /// Top-level JSON value is not an object
    #[error("settings file {} must contain a JSON object", path.display())]
    NotAnObject {
        /// Path that was parsed
        path: PathBuf,
    },
}

/// Flattened view of a settings file
#[derive(Clone, Default)]
pub struct SettingsFile {
    entries: HashMap<String, String>,
}

impl SettingsFile {
    /// Read and flatten a settings file
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, unreadable, or not a JSON object
    pub fn read(path: &Path) -> Result<Self, ConfigLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigLoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigLoadError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&raw).map_err(|e| match e {
            ParseError::Json(source) => ConfigLoadError::Malformed {
                path: path.to_path_buf(),
                source,
            },
            ParseError::NotAnObject => ConfigLoadError::NotAnObject {
                path: path.to_path_buf(),
            },
        })
    }

    fn parse(raw: &str) -> Result<Self, ParseError> {
        let root: Value = serde_json::from_str(raw).map_err(ParseError::Json)?;
        let Value::Object(map) = root else {
            return Err(ParseError::NotAnObject);
        };

        let mut entries = HashMap::new();
        for (key, value) in &map {
            flatten(&key.to_lowercase(), value, &mut entries);
        }

        tracing::trace!(keys = entries.len(), "settings file flattened");
        Ok(Self { entries })
    }

    /// Look up a value by its `section:key` path
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Number of leaf values in the file
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file holds no leaf values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum ParseError {
    Json(serde_json::Error),
    NotAnObject,
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = format!("{prefix}{KEY_DELIMITER}{}", key.to_lowercase());
                flatten(&path, child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(&format!("{prefix}{KEY_DELIMITER}{index}"), child, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        Value::Null => {
            out.insert(prefix.to_string(), String::new());
        }
        Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
    }
}
