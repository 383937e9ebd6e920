// Per-character metadata loaded from `data.json`

use serde::Deserialize;

use super::animation::AnimationClip;
use super::state::{CharacterState, Locomotion};
use crate::engine::assets::AssetError;

/// Wind-up displacement per tick (logical pixels) when the metadata omits one
pub const DEFAULT_WIND_UP_SPEED: f32 = 0.4;

/// Animation clips and movement speeds for one character
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub idle: AnimationClip,
    #[serde(rename = "move")]
    pub moving: AnimationClip,
    #[serde(rename = "move_state", default)]
    pub wind_up: Option<AnimationClip>,
    /// Full-speed displacement per tick, in logical pixels
    pub move_speed: f32,
    /// Wind-up displacement per tick, in logical pixels
    #[serde(default)]
    pub move_initial_speed: Option<f32>,
}

impl CharacterData {
    /// Check every clip and make sure the locomotion has what it needs
    pub fn validate(&self, locomotion: Locomotion) -> Result<(), AssetError> {
        let clips = [
            (CharacterState::Idle, Some(&self.idle)),
            (CharacterState::Move, Some(&self.moving)),
            (CharacterState::WindUp, self.wind_up.as_ref()),
        ];

        for (state, clip) in clips
            .into_iter()
            .filter_map(|(state, clip)| Some((state, clip?)))
        {
            clip.validate().map_err(|reason| AssetError::InvalidClip {
                state: state.animation_name(),
                reason,
            })?;
        }

        if locomotion == Locomotion::Staged && self.wind_up.is_none() {
            return Err(AssetError::MissingClip(
                CharacterState::WindUp.animation_name(),
            ));
        }

        Ok(())
    }

    /// Clip played in the given state
    pub fn clip(&self, state: CharacterState) -> &AnimationClip {
        match state {
            CharacterState::Idle => &self.idle,
            CharacterState::WindUp => self.wind_up.as_ref().unwrap_or(&self.moving),
            CharacterState::Move => &self.moving,
        }
    }

    /// Displacement per tick (logical pixels) while moving in the given state
    pub fn speed(&self, locomotion: Locomotion, state: CharacterState) -> f32 {
        match (locomotion, state) {
            (Locomotion::Staged, CharacterState::Move) | (Locomotion::Direct, _) => {
                self.move_speed
            }
            (Locomotion::Staged, _) => self.move_initial_speed.unwrap_or(DEFAULT_WIND_UP_SPEED),
        }
    }
}
