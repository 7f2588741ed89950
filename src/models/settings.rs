//! Viewer settings loaded from `viewer.toml`.
//!
//! Every section is optional; a missing or broken file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::common::{load_toml, save_toml};
use super::grid::GridConfig;
use super::particle::ParticleParams;
use super::zoom::DEFAULT_ZOOM_STEP;

pub const SETTINGS_FILE: &str = "viewer.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    /// Multiplicative factor applied by zoom in/out.
    pub step: f64,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            step: DEFAULT_ZOOM_STEP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Folder holding `<key>.json` scene files.
    pub scene_dir: PathBuf,
    /// Scene opened at startup.
    pub default_scene: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            scene_dir: PathBuf::from("data/scenes"),
            default_scene: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerSettings {
    pub zoom: ZoomSettings,
    pub particles: ParticleParams,
    /// Grid applied to scenes that carry none.
    pub grid: GridConfig,
    pub storage: StorageSettings,
}

impl ViewerSettings {
    /// Loads the settings file, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("SETTINGS: {} not found, using defaults", path.display());
            return Self::default();
        }
        let settings: Self = load_toml(path).unwrap_or_default();
        settings.sanitized()
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        log::info!("Saving viewer settings: {}", path.display());
        save_toml(path, self)
    }

    fn sanitized(mut self) -> Self {
        if !(self.zoom.step.is_finite() && self.zoom.step > 1.0) {
            log::warn!("SETTINGS: invalid zoom step {}, using default", self.zoom.step);
            self.zoom.step = DEFAULT_ZOOM_STEP;
        }
        if !self.particles.speed.is_finite() || self.particles.speed < 0.0 {
            self.particles.speed = 1.0;
        }
        self.grid = self.grid.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::particle::ParticleType;

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: ViewerSettings = toml::from_str(
            r#"
            [particles]
            enabled = true
            type = "snow"
            intensity = 0.25

            [grid]
            rows = 12
            "#,
        )
        .unwrap();
        assert!(parsed.particles.enabled);
        assert_eq!(parsed.particles.particle_type, ParticleType::Snow);
        assert_eq!(parsed.particles.speed, 1.0);
        assert_eq!(parsed.grid.rows, 12);
        assert_eq!(parsed.grid.columns, 10);
        assert_eq!(parsed.zoom.step, DEFAULT_ZOOM_STEP);
    }

    #[test]
    fn invalid_values_are_sanitized() {
        let parsed: ViewerSettings = toml::from_str(
            r#"
            [zoom]
            step = 0.5
            [grid]
            rows = 0
            opacity = 4.0
            "#,
        )
        .unwrap();
        let settings = parsed.sanitized();
        assert_eq!(settings.zoom.step, DEFAULT_ZOOM_STEP);
        assert_eq!(settings.grid.rows, 1);
        assert_eq!(settings.grid.opacity, 1.0);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("tabletop-settings-{}", std::process::id()));
        let path = dir.join(SETTINGS_FILE);
        let mut settings = ViewerSettings::default();
        settings.particles.intensity = 0.75;
        settings.save(&path).unwrap();

        let loaded = ViewerSettings::load(&path);
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_file_is_default() {
        let loaded = ViewerSettings::load(Path::new("definitely/not/here/viewer.toml"));
        assert_eq!(loaded, ViewerSettings::default());
    }
}
