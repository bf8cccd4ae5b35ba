use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::HabitFormData;

fn default_color() -> String {
    "#3B82F6".to_string()
}
fn default_icon() -> String {
    "target".to_string()
}
fn default_category() -> String {
    "Health & Fitness".to_string()
}

/// Values used for fields left out when creating a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDefaults {
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for HabitDefaults {
    fn default() -> Self {
        Self {
            color: default_color(),
            icon: default_icon(),
            category: default_category(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the database location in the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: HabitDefaults,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "habit-tracker")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("habits.db")),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    /// Make sure the directory holding the database exists.
    pub fn ensure_db_dir(&self) -> Result<PathBuf> {
        let path = self.db_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating data directory {:?}", parent))?;
        }
        Ok(path)
    }

    /// Build form data for a new habit, filling gaps from the configured defaults.
    pub fn new_habit_form(
        &self,
        name: &str,
        description: Option<&str>,
        color: Option<&str>,
        icon: Option<&str>,
        category: Option<&str>,
    ) -> HabitFormData {
        HabitFormData {
            name: name.to_string(),
            description: description.unwrap_or_default().to_string(),
            color: color.unwrap_or(&self.defaults.color).to_string(),
            icon: icon.unwrap_or(&self.defaults.icon).to_string(),
            category: category.unwrap_or(&self.defaults.category).to_string(),
        }
    }
}
