//! User preferences persisted as TOML.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use gigbook_core::Error;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

/// How an entity list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Card,
    List,
    Table,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Card, ViewMode::List, ViewMode::Table];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::List => "list",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_record(format!("unknown view mode '{s}'")))
    }
}

/// Persisted preference values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub gigs_view_mode: ViewMode,
    pub projects_view_mode: ViewMode,
}

/// Preferences bound to a file. Every change is written through.
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    preferences: RwLock<Preferences>,
}

impl PreferencesStore {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let preferences = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::file_read_failed(&path, e.to_string()))?;
            toml::from_str(&contents).map_err(|e| Error::toml_parse_failed(e.to_string()))?
        } else {
            debug!(path = %path.display(), "No preferences file, using defaults");
            Preferences::default()
        };

        Ok(Self {
            path,
            preferences: RwLock::new(preferences),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences.read().clone()
    }

    pub fn gigs_view_mode(&self) -> ViewMode {
        self.preferences.read().gigs_view_mode
    }

    pub fn set_gigs_view_mode(&self, mode: ViewMode) -> Result<()> {
        self.update(|p| p.gigs_view_mode = mode)?;
        info!(mode = %mode, "Gigs view mode changed");
        Ok(())
    }

    pub fn projects_view_mode(&self) -> ViewMode {
        self.preferences.read().projects_view_mode
    }

    pub fn set_projects_view_mode(&self, mode: ViewMode) -> Result<()> {
        self.update(|p| p.projects_view_mode = mode)?;
        info!(mode = %mode, "Projects view mode changed");
        Ok(())
    }

    /// Apply `change` to a copy, write it, then publish it.
    fn update(&self, change: impl FnOnce(&mut Preferences)) -> Result<()> {
        let mut updated = self.preferences();
        change(&mut updated);
        self.save(&updated)?;
        *self.preferences.write() = updated;
        Ok(())
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        let contents = toml::to_string_pretty(preferences)
            .map_err(|e| Error::invalid_record(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::file_write_failed(parent, e.to_string()))?;
        }

        std::fs::write(&self.path, contents)
            .map_err(|e| Error::file_write_failed(&self.path, e.to_string()))?;
        Ok(())
    }
}
