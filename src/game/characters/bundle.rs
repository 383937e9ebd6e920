// Character asset bundle: metadata plus one sprite sheet per state
//
// Layout on disk:
//   characters/<name>/data.json
//   characters/<name>/idle.png
//   characters/<name>/move_state.png   (staged locomotion only)
//   characters/<name>/move.png

use std::thread;

use image::DynamicImage;
use log::info;

use super::data::CharacterData;
use super::state::{CharacterState, Locomotion};
use crate::engine::assets::{AssetError, AssetLoader};

/// Directory holding one subdirectory per character
pub const CHARACTER_DIR: &str = "characters";
/// Metadata file inside each character directory
pub const METADATA_FILE: &str = "data.json";

/// Decoded sprite sheets, not yet on the GPU
#[derive(Debug, Clone)]
pub struct BundleImages {
    pub idle: DynamicImage,
    pub wind_up: Option<DynamicImage>,
    pub moving: DynamicImage,
}

/// Everything needed to construct one character
#[derive(Debug, Clone)]
pub struct CharacterBundle {
    pub name: String,
    pub data: CharacterData,
    pub images: BundleImages,
}

impl CharacterBundle {
    /// Load and validate a character bundle
    ///
    /// The sprite sheets are decoded concurrently and joined before the
    /// bundle is returned.
    pub fn load(
        loader: &AssetLoader,
        name: &str,
        locomotion: Locomotion,
    ) -> Result<Self, AssetError> {
        let dir = loader.scoped(&format!("{}/{}", CHARACTER_DIR, name));

        let data: CharacterData = dir.load_json(METADATA_FILE)?;
        data.validate(locomotion)?;

        let wants_wind_up = locomotion == Locomotion::Staged;
        let images = thread::scope(|scope| {
            let idle = scope.spawn(|| dir.load_image(&sheet_name(CharacterState::Idle)));
            let moving = scope.spawn(|| dir.load_image(&sheet_name(CharacterState::Move)));
            let wind_up = wants_wind_up
                .then(|| scope.spawn(|| dir.load_image(&sheet_name(CharacterState::WindUp))));

            Ok::<_, AssetError>(BundleImages {
                idle: join_decode(idle)?,
                wind_up: wind_up.map(join_decode).transpose()?,
                moving: join_decode(moving)?,
            })
        })?;

        check_sheet(&data, CharacterState::Idle, &images.idle)?;
        check_sheet(&data, CharacterState::Move, &images.moving)?;
        if let Some(wind_up) = &images.wind_up {
            check_sheet(&data, CharacterState::WindUp, wind_up)?;
        }

        info!(
            "Loaded character bundle '{}' ({} sheets)",
            name,
            if images.wind_up.is_some() { 3 } else { 2 }
        );

        Ok(Self {
            name: name.to_string(),
            data,
            images,
        })
    }
}

/// File name of the sprite sheet for a state
pub fn sheet_name(state: CharacterState) -> String {
    format!("{}.png", state.animation_name())
}

/// Every frame of the state's clip must lie inside its sheet
fn check_sheet(
    data: &CharacterData,
    state: CharacterState,
    sheet: &DynamicImage,
) -> Result<(), AssetError> {
    let invalid = |reason| AssetError::InvalidClip {
        state: state.animation_name(),
        reason,
    };
    let clip = data.clip(state);

    match clip.frames.checked_mul(clip.frame_width) {
        Some(strip_width) if strip_width <= sheet.width() => {}
        _ => return Err(invalid("frames run past the sheet width")),
    }
    if clip.frame_height > sheet.height() {
        return Err(invalid("frame height exceeds the sheet height"));
    }
    Ok(())
}

fn join_decode(
    handle: thread::ScopedJoinHandle<'_, Result<DynamicImage, AssetError>>,
) -> Result<DynamicImage, AssetError> {
    handle
        .join()
        .map_err(|_| AssetError::LoadError("image decode task panicked".to_string()))?
}
