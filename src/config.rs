// Stage configuration
//
// Everything here has a built-in default; an optional `stage.json` in the
// asset root overrides individual fields.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::info;
use serde::Deserialize;

use crate::engine::assets::AssetLoader;
use crate::engine::viewport::AspectPolicy;
use crate::game::characters::Locomotion;

/// Environment variable that overrides the asset root
pub const ASSET_ROOT_ENV: &str = "SPRITE_STAGE_ASSETS";
/// Asset root used when the environment variable is unset
pub const DEFAULT_ASSET_ROOT: &str = "assets";
/// Optional override file inside the asset root
pub const CONFIG_FILE: &str = "stage.json";

/// Sprite scale relative to the viewport scale
pub const DEFAULT_CHARACTER_SCALE: f32 = 0.375;
/// Gap between the canvas bottom and the character feet, in logical pixels
pub const DEFAULT_Y_OFFSET: f32 = 10.0;
pub const DEFAULT_BACKGROUND: &str = "background.png";
/// Characters spawned when no override is given: (name, logical x)
pub const DEFAULT_CHARACTERS: &[(&str, f32)] = &[("makoto", 12.0), ("masa", 36.0)];

/// One character to spawn
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CharacterEntry {
    /// Bundle directory under `characters/`
    pub name: String,
    /// Left edge at spawn, in logical pixels
    pub spawn_x: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub aspect: AspectPolicy,
    pub character_scale: f32,
    pub y_offset: f32,
    pub locomotion: Locomotion,
    pub background: String,
    pub characters: Vec<CharacterEntry>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            aspect: AspectPolicy::CLASSIC,
            character_scale: DEFAULT_CHARACTER_SCALE,
            y_offset: DEFAULT_Y_OFFSET,
            locomotion: Locomotion::Staged,
            background: DEFAULT_BACKGROUND.to_string(),
            characters: DEFAULT_CHARACTERS
                .iter()
                .map(|(name, spawn_x)| CharacterEntry {
                    name: name.to_string(),
                    spawn_x: *spawn_x,
                })
                .collect(),
        }
    }
}

impl StageConfig {
    /// Load `stage.json` from the asset root, falling back to defaults when
    /// the file does not exist
    pub fn load(loader: &AssetLoader) -> Result<Self> {
        let config = if loader.exists(CONFIG_FILE) {
            info!("Loading stage config from {:?}", loader.resolve_path(CONFIG_FILE));
            loader
                .load_json::<Self>(CONFIG_FILE)
                .context("Failed to parse stage config")?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the stage cannot render
    pub fn validate(&self) -> Result<()> {
        if self.aspect.checked_logical_size().is_none() {
            bail!(
                "aspect {:?} has a zero or out-of-range logical size",
                self.aspect
            );
        }
        if self.character_scale.is_nan() || self.character_scale <= 0.0 {
            bail!(
                "character_scale must be positive, got {}",
                self.character_scale
            );
        }
        if self.characters.is_empty() {
            bail!("stage config lists no characters");
        }
        Ok(())
    }
}

/// Asset root from the environment, or the default directory
pub fn asset_root() -> PathBuf {
    asset_root_from(std::env::var(ASSET_ROOT_ENV).ok())
}

fn asset_root_from(value: Option<String>) -> PathBuf {
    match value {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_ASSET_ROOT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = StageConfig::default();
        assert_eq!(config.aspect.logical_size(), (64, 48));
        assert_relative_eq!(config.character_scale, 0.375);
        assert_relative_eq!(config.y_offset, 10.0);
        assert_eq!(config.locomotion, Locomotion::Staged);
        assert_eq!(config.background, "background.png");

        let names: Vec<_> = config.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["makoto", "masa"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StageConfig::load(&AssetLoader::new(dir.path())).unwrap();
        assert_eq!(config, StageConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{
                "aspect": { "kind": "ratio", "width": 6, "height": 4, "unit": 16 },
                "locomotion": "direct",
                "characters": [{ "name": "solo", "spawn_x": 20 }]
            }"#,
        )
        .unwrap();

        let config = StageConfig::load(&AssetLoader::new(dir.path())).unwrap();
        assert_eq!(config.aspect.logical_size(), (96, 64));
        assert_eq!(config.locomotion, Locomotion::Direct);
        assert_eq!(config.characters.len(), 1);
        assert_relative_eq!(config.characters[0].spawn_x, 20.0);
        // Untouched fields keep their defaults
        assert_relative_eq!(config.character_scale, DEFAULT_CHARACTER_SCALE);
        assert_eq!(config.background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "character_scale": 0 }"#,
        )
        .unwrap();
        assert!(StageConfig::load(&AssetLoader::new(dir.path())).is_err());

        std::fs::write(dir.path().join(CONFIG_FILE), r#"{ "characters": [] }"#).unwrap();
        assert!(StageConfig::load(&AssetLoader::new(dir.path())).is_err());

        std::fs::write(dir.path().join(CONFIG_FILE), "not json").unwrap();
        assert!(StageConfig::load(&AssetLoader::new(dir.path())).is_err());
    }

    #[test]
    fn test_unrenderable_aspect_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for aspect in [
            r#"{ "kind": "ratio", "width": 100000, "height": 4, "unit": 100000 }"#,
            r#"{ "kind": "ratio", "width": 6, "height": 4, "unit": 0 }"#,
            r#"{ "kind": "fixed", "width": 0, "height": 48 }"#,
        ] {
            std::fs::write(
                dir.path().join(CONFIG_FILE),
                format!(r#"{{ "aspect": {} }}"#, aspect),
            )
            .unwrap();
            let err = StageConfig::load(&AssetLoader::new(dir.path())).unwrap_err();
            assert!(err.to_string().contains("logical size"), "{}", err);
        }
    }

    #[test]
    fn test_asset_root_override() {
        assert_eq!(asset_root_from(None), PathBuf::from("assets"));
        assert_eq!(asset_root_from(Some(String::new())), PathBuf::from("assets"));
        assert_eq!(
            asset_root_from(Some("/opt/stage".to_string())),
            PathBuf::from("/opt/stage")
        );
    }
}
