// Character state machine

use serde::Deserialize;

/// Represents the current state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterState {
    /// Standing still
    #[default]
    Idle,
    /// Transitional animation played once before full movement
    WindUp,
    /// Moving horizontally at full speed
    Move,
}

impl CharacterState {
    /// Name of the sprite sheet and metadata entry for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::WindUp => "move_state",
            Self::Move => "move",
        }
    }
}

/// How a character gets from standing to moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locomotion {
    /// `Idle -> Move` as soon as a direction is held
    Direct,
    /// `Idle -> WindUp -> Move`, with the wind-up played through once
    #[default]
    Staged,
}

/// What the transition table needs to know about the current tick
#[derive(Debug, Clone, Copy)]
pub struct TransitionInput {
    /// Active character with at least one direction held
    pub driving: bool,
    /// The wind-up clip is on its last tick of its last frame
    pub wind_up_complete: bool,
}

/// Explicit transition table
pub fn next_state(
    locomotion: Locomotion,
    current: CharacterState,
    input: TransitionInput,
) -> CharacterState {
    use CharacterState::*;

    if !input.driving {
        return Idle;
    }

    match (locomotion, current) {
        (Locomotion::Direct, _) => Move,
        (Locomotion::Staged, Idle) => WindUp,
        (Locomotion::Staged, WindUp) if input.wind_up_complete => Move,
        (Locomotion::Staged, WindUp) => WindUp,
        (Locomotion::Staged, Move) => Move,
    }
}
