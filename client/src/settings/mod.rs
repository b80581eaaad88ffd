use crate::character::{
    AnimationClipsConfig, CameraConfig, ControlBindings, ControllerConfig, LocomotionConfig,
    VerticalConfig,
};
use crate::physics::{BombConfig, CharacterBodyConfig};
use crate::runtime::{PhysicsConfig, RuntimeConfig};
use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const SETTINGS_FILE_PATH: &str = "./sandbox.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Sandbox".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

impl WindowSettings {
    pub fn resolution(&self) -> WindowResolution {
        WindowResolution::new(self.width, self.height)
    }

    pub fn present_mode(&self) -> PresentMode {
        if self.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Logs the character position every tick at debug level.
    pub log_character_position: bool,
    pub show_overlay_on_start: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct SandboxSettings {
    pub window: WindowSettings,
    pub controls: ControlBindings,
    pub locomotion: LocomotionConfig,
    pub vertical: VerticalConfig,
    pub camera: CameraConfig,
    pub animations: AnimationClipsConfig,
    pub character_body: CharacterBodyConfig,
    pub bombs: BombConfig,
    pub physics: PhysicsConfig,
    pub debug: DebugSettings,
}

impl SandboxSettings {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            controller: ControllerConfig {
                bindings: self.controls.clone(),
                locomotion: self.locomotion.clone(),
                vertical: self.vertical.clone(),
            },
            camera: self.camera.clone(),
            character_body: self.character_body.clone(),
            bombs: self.bombs.clone(),
            physics: self.physics.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsIoError {
    #[error("failed to read settings file: {0}")]
    Read(std::io::Error),
    #[error("failed to write settings file: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML settings: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML settings: {0}")]
    Serialize(serde_yaml::Error),
}

#[derive(Resource, Clone)]
pub struct SettingsResource {
    pub current: SandboxSettings,
}

impl SettingsResource {
    pub fn new(current: SandboxSettings) -> Self {
        Self { current }
    }
}

pub fn load_settings_or_default() -> SandboxSettings {
    let path = Path::new(SETTINGS_FILE_PATH);

    if !path.exists() {
        return SandboxSettings::default();
    }

    match load_settings_from_path(path) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!(
                "Failed to load settings from '{}': {}. Falling back to defaults.",
                SETTINGS_FILE_PATH, error
            );
            SandboxSettings::default()
        }
    }
}

pub fn ensure_settings_file_exists(settings: &SandboxSettings) -> Result<(), SettingsIoError> {
    let path = Path::new(SETTINGS_FILE_PATH);
    if path.exists() {
        return Ok(());
    }

    write_settings_to_path(settings, path)
}

fn load_settings_from_path(path: &Path) -> Result<SandboxSettings, SettingsIoError> {
    let raw = fs::read_to_string(path).map_err(SettingsIoError::Read)?;
    serde_yaml::from_str::<SandboxSettings>(&raw).map_err(SettingsIoError::Deserialize)
}

fn write_settings_to_path(settings: &SandboxSettings, path: &Path) -> Result<(), SettingsIoError> {
    let encoded = serde_yaml::to_string(settings).map_err(SettingsIoError::Serialize)?;
    fs::write(path, encoded).map_err(SettingsIoError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_settings_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sandbox-settings-{}-{name}.yaml", std::process::id()))
    }

    #[test]
    fn partial_yaml_fills_missing_sections_with_defaults() {
        let raw = "locomotion:\n  run_velocity: 7.5\nbombs:\n  ttl_secs: 3.0\n";
        let settings: SandboxSettings = serde_yaml::from_str(raw).unwrap();

        assert_eq!(settings.locomotion.run_velocity, 7.5);
        assert_eq!(settings.locomotion.walk_velocity, 2.0);
        assert_eq!(settings.bombs.ttl_secs, 3.0);
        assert_eq!(settings.bombs.radius, 0.3);
        assert_eq!(settings.controls, ControlBindings::default());
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let path = temp_settings_path("round-trip");
        let mut settings = SandboxSettings::default();
        settings.debug.log_character_position = true;
        settings.controls.plant = "k".to_string();

        write_settings_to_path(&settings, &path).unwrap();
        let loaded = load_settings_from_path(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = temp_settings_path("missing");
        let error = load_settings_from_path(&path).unwrap_err();
        assert!(matches!(error, SettingsIoError::Read(_)));
    }

    #[test]
    fn malformed_yaml_is_a_decode_error() {
        let path = temp_settings_path("malformed");
        fs::write(&path, "window: [not, a, map").unwrap();
        let error = load_settings_from_path(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(error, SettingsIoError::Deserialize(_)));
    }

    #[test]
    fn runtime_config_carries_every_section() {
        let mut settings = SandboxSettings::default();
        settings.vertical.jump_impulse = 6.0;
        settings.physics.fixed_step = 1.0 / 120.0;

        let config = settings.runtime_config();
        assert_eq!(config.controller.vertical.jump_impulse, 6.0);
        assert_eq!(config.physics.fixed_step, 1.0 / 120.0);
        assert_eq!(config.bombs, BombConfig::default());
    }
}
