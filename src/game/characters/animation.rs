// Tick-driven sprite sheet animation
//
// Animations advance once per rendered frame rather than by wall-clock time:
// a clip's `speed` is the number of ticks each frame stays on screen.

use serde::Deserialize;

/// A single animation clip laid out horizontally in one sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationClip {
    /// Number of frames in the sheet
    pub frames: u32,
    /// Width of one frame in source pixels
    pub frame_width: u32,
    /// Height of one frame in source pixels
    pub frame_height: u32,
    /// Ticks each frame is held for
    pub speed: u32,
}

impl AnimationClip {
    #[cfg(test)]
    pub fn new(frames: u32, frame_width: u32, frame_height: u32, speed: u32) -> Self {
        Self {
            frames,
            frame_width,
            frame_height,
            speed,
        }
    }

    /// Number of ticks for one full play-through
    #[cfg(test)]
    pub fn cycle_ticks(&self) -> u32 {
        self.frames * self.speed
    }

    /// Index of the final frame
    pub fn last_frame(&self) -> u32 {
        self.frames.saturating_sub(1)
    }

    /// Source rectangle `(x, y, width, height)` of a frame in sheet pixels
    pub fn source_rect(&self, frame: u32) -> (u32, u32, u32, u32) {
        (frame * self.frame_width, 0, self.frame_width, self.frame_height)
    }

    /// Reject clips that would stall or divide by zero when played
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.frames == 0 {
            return Err("frame count must be at least 1");
        }
        if self.speed == 0 {
            return Err("speed must be at least 1 tick per frame");
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err("frame size must be non-zero");
        }
        Ok(())
    }
}

/// Playback position within a clip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationCursor {
    frame: u32,
    timer: u32,
}

impl AnimationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from the first frame
    pub fn reset(&mut self) {
        self.frame = 0;
        self.timer = 0;
    }

    /// Advance by one tick, looping back to frame 0 after the last frame
    pub fn advance(&mut self, clip: &AnimationClip) {
        self.timer += 1;
        if self.timer >= clip.speed {
            self.timer = 0;
            self.frame = (self.frame + 1) % clip.frames.max(1);
        }
    }

    /// True when the next tick completes a full play-through of the clip
    pub fn on_final_tick(&self, clip: &AnimationClip) -> bool {
        self.frame == clip.last_frame() && self.timer == clip.speed.saturating_sub(1)
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[cfg(test)]
    pub fn timer(&self) -> u32 {
        self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_from_json() {
        let clip: AnimationClip = serde_json::from_str(
            r#"{ "frames": 4, "frameWidth": 64, "frameHeight": 48, "speed": 6 }"#,
        )
        .unwrap();
        assert_eq!(clip, AnimationClip::new(4, 64, 48, 6));
        assert_eq!(clip.cycle_ticks(), 24);
        assert_eq!(clip.last_frame(), 3);
    }

    #[test]
    fn test_source_rect_steps_by_frame_width() {
        let clip = AnimationClip::new(4, 64, 48, 6);
        assert_eq!(clip.source_rect(0), (0, 0, 64, 48));
        assert_eq!(clip.source_rect(3), (192, 0, 64, 48));
    }

    #[test]
    fn test_validate_rejects_degenerate_clips() {
        assert!(AnimationClip::new(0, 64, 64, 3).validate().is_err());
        assert!(AnimationClip::new(4, 64, 64, 0).validate().is_err());
        assert!(AnimationClip::new(4, 0, 64, 3).validate().is_err());
        assert!(AnimationClip::new(4, 64, 64, 3).validate().is_ok());
    }

    #[test]
    fn test_cursor_loops_after_full_cycle() {
        let clip = AnimationClip::new(4, 16, 16, 3);
        let mut cursor = AnimationCursor::new();
        for _ in 0..clip.cycle_ticks() {
            cursor.advance(&clip);
        }
        assert_eq!(cursor.frame(), 0);
        assert_eq!(cursor.timer(), 0);
    }

    #[test]
    fn test_cursor_frame_after_partial_ticks() {
        let clip = AnimationClip::new(4, 16, 16, 3);
        let mut cursor = AnimationCursor::new();
        cursor.advance(&clip);
        cursor.advance(&clip);
        assert_eq!(cursor.frame(), 0);
        cursor.advance(&clip);
        assert_eq!(cursor.frame(), 1);
    }

    #[test]
    fn test_final_tick_detection() {
        let clip = AnimationClip::new(2, 16, 16, 5);
        let mut cursor = AnimationCursor::new();
        for _ in 0..9 {
            assert!(!cursor.on_final_tick(&clip));
            cursor.advance(&clip);
        }
        assert!(cursor.on_final_tick(&clip));
    }

    #[test]
    fn test_single_tick_clip() {
        let clip = AnimationClip::new(1, 16, 16, 1);
        let mut cursor = AnimationCursor::new();
        assert!(cursor.on_final_tick(&clip));
        cursor.advance(&clip);
        assert_eq!(cursor.frame(), 0);
    }
}
