// Character system
//
// This module contains everything related to playable characters:
// - Per-character metadata (clips and speeds)
// - State machine for idle / wind-up / move
// - Tick-driven sprite sheet animation
// - Asset bundle loading
// - Character entity and roster

pub mod animation;
pub mod bundle;
pub mod character;
pub mod data;
pub mod state;

// Re-export commonly used types
pub use bundle::CharacterBundle;
pub use character::{CharacterRoster, SpriteSheets, TickContext};
pub use state::Locomotion;
