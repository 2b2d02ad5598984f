//! Display preferences handed to the timeline renderer.
//!
//! Preferences are an explicit value loaded from and saved to a
//! [`PreferenceStore`] supplied by the caller; nothing here is global.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

pub const THEME_KEY: &str = "theme";
pub const DENSITY_KEY: &str = "density";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key/value storage in the style of browser local storage.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    #[default]
    Comfortable,
    Compact,
}

impl Density {
    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Comfortable => "comfortable",
            Density::Compact => "compact",
        }
    }
}

impl FromStr for Density {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "comfortable" => Ok(Density::Comfortable),
            "compact" => Ok(Density::Compact),
            other => Err(format!("unknown density '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayPreferences {
    pub theme: Theme,
    pub density: Density,
}

impl DisplayPreferences {
    /// Read preferences, falling back to the default for any key that is
    /// missing or holds an unknown value.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        Self {
            theme: read_or_default(store, THEME_KEY),
            density: read_or_default(store, DENSITY_KEY),
        }
    }

    pub fn save(&self, store: &dyn PreferenceStore) -> Result<(), PreferenceError> {
        store.set(THEME_KEY, self.theme.as_str())?;
        store.set(DENSITY_KEY, self.density.as_str())?;
        Ok(())
    }
}

fn read_or_default<T>(store: &dyn PreferenceStore, key: &str) -> T
where
    T: FromStr<Err = String> + Default,
{
    match store.get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|err: String| {
            warn!(key, error = %err, "ignoring stored preference");
            T::default()
        }),
        None => T::default(),
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a flat JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let file = File::open(&path)?;
            serde_json::from_reader(file)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.write();
        let mut updated = values.clone();
        updated.insert(key.to_string(), value.to_string());
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &updated)?;
        *values = updated;
        Ok(())
    }
}
