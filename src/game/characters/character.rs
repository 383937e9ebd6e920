// Character entity and roster management

use glam::Vec2;
use log::debug;

use super::animation::{AnimationClip, AnimationCursor};
use super::data::CharacterData;
use super::state::{next_state, CharacterState, Locomotion, TransitionInput};
use crate::core::math::clamp;
use crate::engine::input::InputSnapshot;
use crate::engine::renderer::{Sprite, TextureHandle};

/// Stage-wide values every character needs for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Viewport integer scale factor
    pub scale: f32,
    /// Sprite scale relative to the viewport scale
    pub character_scale: f32,
    /// Drawing surface width in screen pixels
    pub surface_width: f32,
}

impl TickContext {
    /// Screen pixels per source pixel of a sprite sheet
    pub fn sprite_scale(&self) -> f32 {
        self.scale * self.character_scale
    }
}

/// One sprite sheet per animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheets {
    pub idle: TextureHandle,
    pub wind_up: Option<TextureHandle>,
    pub moving: TextureHandle,
}

impl SpriteSheets {
    /// Sheet drawn in the given state
    pub fn for_state(&self, state: CharacterState) -> TextureHandle {
        match state {
            CharacterState::Idle => self.idle,
            CharacterState::WindUp => self.wind_up.unwrap_or(self.moving),
            CharacterState::Move => self.moving,
        }
    }
}

/// A player-controllable animated character
#[derive(Debug, Clone)]
pub struct Character {
    /// Character name (for logging)
    pub name: String,
    /// Top-left of the drawn frame, in screen pixels relative to the canvas
    pub position: Vec2,
    /// Direction character is facing (1 = right, -1 = left)
    pub facing_direction: f32,

    state: CharacterState,
    cursor: AnimationCursor,
    locomotion: Locomotion,
    data: CharacterData,
    sheets: SpriteSheets,
}

impl Character {
    /// Create a character from already validated metadata
    pub fn new(
        name: &str,
        data: CharacterData,
        sheets: SpriteSheets,
        locomotion: Locomotion,
        position: Vec2,
    ) -> Self {
        Self {
            name: name.to_string(),
            position,
            facing_direction: 1.0,
            state: CharacterState::Idle,
            cursor: AnimationCursor::new(),
            locomotion,
            data,
            sheets,
        }
    }

    /// Advance the character by one tick
    ///
    /// Only the active character reads `input`; everyone else falls back to
    /// idle.
    pub fn update(&mut self, input: InputSnapshot, is_active: bool, ctx: &TickContext) {
        let wind_up_complete = self.state == CharacterState::WindUp
            && self
                .cursor
                .on_final_tick(self.data.clip(CharacterState::WindUp));

        let next = next_state(
            self.locomotion,
            self.state,
            TransitionInput {
                driving: is_active && input.any_direction(),
                wind_up_complete,
            },
        );

        if next != self.state {
            debug!("{}: {:?} -> {:?}", self.name, self.state, next);
            self.state = next;
            self.cursor.reset();
        }

        if is_active {
            let step = self.data.speed(self.locomotion, self.state) * ctx.scale;
            if input.left {
                self.position.x -= step;
                self.facing_direction = -1.0;
            }
            if input.right {
                self.position.x += step;
                self.facing_direction = 1.0;
            }
        }

        let clip = *self.current_clip();
        self.cursor.advance(&clip);

        let half = self.width(ctx) / 2.0;
        self.position.x = clamp(self.position.x, -half, ctx.surface_width - half);
    }

    /// Drawn width of the current frame in screen pixels
    pub fn width(&self, ctx: &TickContext) -> f32 {
        self.current_clip().frame_width as f32 * ctx.sprite_scale()
    }

    /// Sprite for the current frame, mirrored when facing left
    pub fn sprite(&self, ctx: &TickContext) -> Sprite {
        let clip = self.current_clip();
        let scale = ctx.sprite_scale();
        let (sx, sy, sw, sh) = clip.source_rect(self.cursor.frame());

        Sprite::new(
            self.position,
            Vec2::new(sw as f32 * scale, sh as f32 * scale),
            self.sheets.for_state(self.state),
        )
        .with_source(sx, sy, sw, sh)
        .with_flip_horizontal(self.facing_direction < 0.0)
    }

    /// Multiply the position by a factor (used when the viewport scale changes)
    pub fn rescale(&mut self, factor: f32) {
        self.position *= factor;
    }

    /// Get the current state
    #[cfg(test)]
    pub fn state(&self) -> CharacterState {
        self.state
    }

    #[cfg(test)]
    pub fn frame(&self) -> u32 {
        self.cursor.frame()
    }

    fn current_clip(&self) -> &AnimationClip {
        self.data.clip(self.state)
    }
}

/// Ordered characters plus which one currently receives input
#[derive(Debug, Default)]
pub struct CharacterRoster {
    characters: Vec<Character>,
    active: usize,
}

impl CharacterRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character at the end of the list
    pub fn spawn_character(
        &mut self,
        name: &str,
        data: CharacterData,
        sheets: SpriteSheets,
        locomotion: Locomotion,
        position: Vec2,
    ) -> usize {
        let index = self.characters.len();
        self.characters
            .push(Character::new(name, data, sheets, locomotion, position));
        log::info!("Spawned character '{}' (#{}) at {:?}", name, index, position);

        index
    }

    /// Tick every character in list order
    pub fn update(&mut self, input: InputSnapshot, ctx: &TickContext) {
        let active = self.active;
        for (index, character) in self.characters.iter_mut().enumerate() {
            character.update(input, index == active, ctx);
        }
    }

    /// Hand input to the next character, wrapping around
    pub fn switch_active(&mut self) {
        if self.characters.is_empty() {
            return;
        }
        self.active = (self.active + 1) % self.characters.len();
        if let Some(character) = self.characters.get(self.active) {
            log::info!("Active character: {}", character.name);
        }
    }

    #[cfg(test)]
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Character> {
        self.characters.get(self.active)
    }

    /// Sprites for every character, in draw order
    pub fn sprites(&self, ctx: &TickContext) -> impl Iterator<Item = Sprite> + '_ {
        let ctx = *ctx;
        self.characters.iter().map(move |c| c.sprite(&ctx))
    }

    /// Rescale every position by a factor
    pub fn rescale(&mut self, factor: f32) {
        for character in &mut self.characters {
            character.rescale(factor);
        }
    }

    #[cfg(test)]
    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    /// Get the number of characters
    pub fn count(&self) -> usize {
        self.characters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CTX: TickContext = TickContext {
        scale: 2.0,
        character_scale: 0.5,
        surface_width: 128.0,
    };

    fn sheets() -> SpriteSheets {
        SpriteSheets {
            idle: TextureHandle(0),
            wind_up: Some(TextureHandle(1)),
            moving: TextureHandle(2),
        }
    }

    fn data() -> CharacterData {
        CharacterData {
            idle: AnimationClip::new(4, 32, 32, 10),
            moving: AnimationClip::new(4, 32, 32, 3),
            wind_up: Some(AnimationClip::new(2, 32, 32, 5)),
            move_speed: 1.0,
            move_initial_speed: Some(0.5),
        }
    }

    fn character(locomotion: Locomotion) -> Character {
        Character::new(
            "test",
            data(),
            sheets(),
            locomotion,
            Vec2::new(40.0, 10.0),
        )
    }

    const RIGHT: InputSnapshot = InputSnapshot {
        left: false,
        right: true,
    };
    const LEFT: InputSnapshot = InputSnapshot {
        left: true,
        right: false,
    };
    const NONE: InputSnapshot = InputSnapshot {
        left: false,
        right: false,
    };

    #[test]
    fn test_idle_without_input_stays_idle() {
        let mut c = character(Locomotion::Staged);
        c.update(NONE, true, &CTX);
        assert_eq!(c.state(), CharacterState::Idle);
        assert_eq!(c.frame(), 0);
    }

    #[test]
    fn test_inactive_settles_to_idle_within_one_tick() {
        for locomotion in [Locomotion::Direct, Locomotion::Staged] {
            let mut c = character(locomotion);
            for _ in 0..25 {
                c.update(RIGHT, true, &CTX);
            }
            assert_ne!(c.state(), CharacterState::Idle);

            c.update(RIGHT, false, &CTX);
            assert_eq!(c.state(), CharacterState::Idle);
        }
    }

    #[test]
    fn test_inactive_ignores_input() {
        let mut c = character(Locomotion::Direct);
        c.update(LEFT, false, &CTX);
        assert_eq!(c.position, Vec2::new(40.0, 10.0));
        assert_eq!(c.facing_direction, 1.0);
    }

    #[test]
    fn test_move_clip_loops_after_twelve_ticks() {
        let mut c = character(Locomotion::Direct);
        for tick in 1..=12u32 {
            c.update(RIGHT, true, &CTX);
            assert_eq!(c.state(), CharacterState::Move);
            if tick % 3 == 1 {
                assert_eq!(c.frame(), tick / 3, "tick {}", tick);
            }
        }
        assert_eq!(c.frame(), 0);
    }

    #[test]
    fn test_staged_wind_up_plays_full_cycle() {
        let mut c = character(Locomotion::Staged);
        for tick in 1..=9 {
            c.update(RIGHT, true, &CTX);
            assert_eq!(c.state(), CharacterState::WindUp, "tick {}", tick);
        }
        c.update(RIGHT, true, &CTX);
        assert_eq!(c.state(), CharacterState::Move);
        assert_eq!(c.frame(), 0);
    }

    #[test]
    fn test_releasing_during_wind_up_restarts_it() {
        let mut c = character(Locomotion::Staged);
        for _ in 0..7 {
            c.update(RIGHT, true, &CTX);
        }
        c.update(NONE, true, &CTX);
        assert_eq!(c.state(), CharacterState::Idle);

        for tick in 1..=9 {
            c.update(RIGHT, true, &CTX);
            assert_eq!(c.state(), CharacterState::WindUp, "tick {}", tick);
        }
    }

    #[test]
    fn test_wind_up_uses_initial_speed() {
        let mut c = character(Locomotion::Staged);
        c.update(RIGHT, true, &CTX);
        assert_relative_eq!(c.position.x, 41.0);

        for _ in 0..9 {
            c.update(RIGHT, true, &CTX);
        }
        assert_eq!(c.state(), CharacterState::Move);
        assert_relative_eq!(c.position.x, 41.0 + 8.0 * 1.0 + 2.0);
    }

    #[test]
    fn test_clamp_bounds_hold_for_long_runs() {
        let mut c = character(Locomotion::Direct);
        let half = c.width(&CTX) / 2.0;
        for _ in 0..500 {
            c.update(RIGHT, true, &CTX);
            assert!(c.position.x <= CTX.surface_width - half);
        }
        assert_relative_eq!(c.position.x, CTX.surface_width - half);

        for _ in 0..500 {
            c.update(LEFT, true, &CTX);
            assert!(c.position.x >= -half);
        }
        assert_relative_eq!(c.position.x, -half);
    }

    #[test]
    fn test_facing_flips_even_when_clamped() {
        let mut c = character(Locomotion::Direct);
        c.position.x = -100.0;
        c.update(LEFT, true, &CTX);
        assert_eq!(c.facing_direction, -1.0);
        let pinned = c.position.x;

        c.update(LEFT, true, &CTX);
        assert_eq!(c.position.x, pinned);
        assert_eq!(c.facing_direction, -1.0);

        c.update(RIGHT, true, &CTX);
        assert_eq!(c.facing_direction, 1.0);
    }

    #[test]
    fn test_both_directions_face_right_without_moving() {
        let mut c = character(Locomotion::Direct);
        c.facing_direction = -1.0;
        let both = InputSnapshot {
            left: true,
            right: true,
        };
        c.update(both, true, &CTX);
        assert_eq!(c.facing_direction, 1.0);
        assert_relative_eq!(c.position.x, 40.0);
    }

    #[test]
    fn test_sprite_uses_state_sheet_and_flip() {
        let mut c = character(Locomotion::Direct);
        let idle = c.sprite(&CTX);
        assert_eq!(idle.texture, TextureHandle(0));
        assert_eq!(idle.size, Vec2::new(32.0, 32.0));
        assert!(!idle.flip_horizontal);

        for _ in 0..4 {
            c.update(LEFT, true, &CTX);
        }
        let moving = c.sprite(&CTX);
        assert_eq!(moving.texture, TextureHandle(2));
        assert_eq!(moving.source, Some([32, 0, 32, 32]));
        assert!(moving.flip_horizontal);
        assert_eq!(moving.position, c.position);
    }

    #[test]
    fn test_roster_only_active_reads_input() {
        let mut roster = CharacterRoster::new();
        roster.spawn_character("a", data(), sheets(), Locomotion::Direct, Vec2::ZERO);
        roster.spawn_character(
            "b",
            data(),
            sheets(),
            Locomotion::Direct,
            Vec2::new(50.0, 0.0),
        );

        roster.update(RIGHT, &CTX);
        assert_eq!(roster.all()[0].state(), CharacterState::Move);
        assert_eq!(roster.all()[1].state(), CharacterState::Idle);

        roster.switch_active();
        assert_eq!(roster.active_index(), 1);
        roster.update(RIGHT, &CTX);
        assert_eq!(roster.all()[0].state(), CharacterState::Idle);
        assert_eq!(roster.all()[1].state(), CharacterState::Move);

        roster.switch_active();
        assert_eq!(roster.active_index(), 0);
    }

    #[test]
    fn test_switch_on_empty_roster_is_noop() {
        let mut roster = CharacterRoster::new();
        roster.switch_active();
        assert_eq!(roster.active_index(), 0);
        assert!(roster.active().is_none());
    }

    #[test]
    fn test_rescale_positions() {
        let mut roster = CharacterRoster::new();
        let index = roster.spawn_character(
            "a",
            data(),
            sheets(),
            Locomotion::Direct,
            Vec2::new(24.0, 12.0),
        );
        roster.rescale(1.5);
        assert_eq!(roster.all()[index].position, Vec2::new(36.0, 18.0));
        assert_eq!(roster.sprites(&CTX).count(), 1);
    }
}
