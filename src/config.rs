// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use figment::providers::{Env, Format, Toml};
use figment::Figment;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Label of the root node a fresh session starts with.
    pub root_name: String,

    /// Template for nodes created by the add-child gesture.
    pub child_name: String,
    pub child_data: String,

    // UI
    pub indent_width: u16,

    /// Whether exporting also writes the JSON to the system clipboard.
    pub copy_on_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            child_name: "New Child".to_string(),
            child_data: "New Data".to_string(),
            indent_width: 2,
            copy_on_export: true,
        }
    }
}

/// Single source of truth for app directories.
pub fn get_app_paths() -> Option<(PathBuf, PathBuf)> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "github", "tagtree") {
        let config_dir = proj_dirs.config_dir().to_path_buf();
        let data_dir = proj_dirs.data_local_dir().to_path_buf();

        // Ensure directories exist
        fs::create_dir_all(&config_dir).ok()?;
        fs::create_dir_all(&data_dir).ok()?;

        Some((config_dir, data_dir))
    } else {
        None
    }
}

pub fn load_settings() -> Settings {
    if let Some((config_dir, _)) = get_app_paths() {
        let config_file_path = config_dir.join("settings.toml");

        return Figment::new()
            .merge(Toml::file(config_file_path))
            .merge(Env::prefixed("TAGTREE_"))
            .extract()
            .unwrap_or_default();
    }

    // Fallback if we can't even determine the application paths.
    Settings::default()
}

/// Saves the provided settings to the config file.
pub fn save_settings(settings: &Settings) -> io::Result<()> {
    if let Some((config_dir, _)) = get_app_paths() {
        let config_file_path = config_dir.join("settings.toml");
        let temp_file_path = config_dir.join("settings.toml.tmp");
        let content = toml::to_string_pretty(settings).map_err(io::Error::other)?;
        fs::write(&temp_file_path, content)?;
        fs::rename(&temp_file_path, &config_file_path)?;
    }
    Ok(())
}
