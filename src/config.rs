/*
 *  config.rs
 *
 *  rt82weather - weather on your keyboard
 *	(c) 2026 rt82weather contributors
 *
 *	Persistent settings in ~/.config/rt82weather/config.json
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use dirs_next::home_dir;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const STAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Error type for config persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cannot locate home directory")]
    NoHome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: String,
    pub location_id: String,
    pub location_name: String,
    pub update_hours: u32,
    pub last_updated: Option<String>,
    pub insecure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: "bbc".to_string(),
            location_id: String::new(),
            location_name: String::new(),
            update_hours: 6,
            last_updated: None,
            insecure: false,
        }
    }
}

/// `~/.config/rt82weather`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    home_dir()
        .map(|home| home.join(".config").join("rt82weather"))
        .ok_or(ConfigError::NoHome)
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json"))
}

impl Config {
    /// Loads the user's config, or defaults when there is none.
    pub fn load() -> Self {
        match config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                warn!("{e}, using default config");
                Self::default()
            }
        }
    }

    /// Never fails: anything unreadable yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Can't read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Corrupt config {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Pretty JSON with a trailing newline; creates the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        fs::write(path, text)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.location_id.is_empty()
    }

    pub fn last_updated_dt(&self) -> Option<NaiveDateTime> {
        self.last_updated.as_deref().and_then(parse_timestamp)
    }

    pub fn mark_updated(&mut self) {
        self.mark_updated_at(Local::now().naive_local());
    }

    pub fn mark_updated_at(&mut self, now: NaiveDateTime) {
        self.last_updated = Some(now.format(STAMP_FORMAT).to_string());
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update_at(Local::now().naive_local())
    }

    pub fn needs_update_at(&self, now: NaiveDateTime) -> bool {
        let Some(last) = self.last_updated_dt() else {
            return true;
        };
        let elapsed_hours = (now - last).num_seconds() as f64 / 3600.0;
        elapsed_hours >= self.update_hours as f64
    }
}

/// ISO-8601 local timestamps as written by this and earlier versions.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
