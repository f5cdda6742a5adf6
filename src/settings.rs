use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment override for the directory holding the diagram PNGs.
pub const IMAGE_DIR_ENV: &str = "UMPIRE_TRACK_IMAGE_DIR";

/// `images/` next to the manifest, baked in by `build.rs`.
const SOURCE_IMAGE_DIR: &str = env!("UMPIRE_TRACK_SOURCE_IMAGES");

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub image_dir: Option<PathBuf>,
    pub last_export_dir: Option<PathBuf>,
}

impl UserSettings {
    fn file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("org", "umpire-track", "umpire-track-editor")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir).ok()?;
        Some(config_dir.join("settings.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        Self::load_from(&path)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        self.save_to(&path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("cannot write {}", path.display()))?;
        Ok(())
    }

    pub fn remember_export_dir(&mut self, exported: &Path) {
        let Some(dir) = exported.parent() else {
            return;
        };
        if self.last_export_dir.as_deref() == Some(dir) {
            return;
        }
        self.last_export_dir = Some(dir.to_path_buf());
        if let Err(err) = self.save() {
            tracing::warn!("cannot persist settings: {err:#}");
        }
    }

    /// Directory the reference and background images are read from.
    pub fn resolve_image_dir(&self) -> PathBuf {
        let from_env = env::var(IMAGE_DIR_ENV).ok().map(|dir| expand_user_path(dir.trim()));
        let beside_exe = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("images")));

        let candidates = [
            from_env,
            self.image_dir.clone(),
            beside_exe,
            Some(PathBuf::from(SOURCE_IMAGE_DIR)),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|dir| dir.is_dir())
            .unwrap_or_else(|| PathBuf::from("images"))
    }
}

fn expand_user_path(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home);
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
