// Integer viewport scaling for pixel-art rendering
//
// The stage is authored at a small logical resolution and blown up by the
// largest whole-number factor that fits the window, so every logical pixel
// maps to an identical square block of screen pixels.

use serde::Deserialize;

use crate::core::math::centered_offset;

/// How the logical resolution of the stage is described
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AspectPolicy {
    /// Logical resolution given directly in pixels
    Fixed { width: u32, height: u32 },
    /// Logical resolution given as `width:height`, each multiplied by `unit`
    Ratio { width: u32, height: u32, unit: u32 },
}

impl AspectPolicy {
    /// 4:3 at 64x48 logical pixels
    pub const CLASSIC: Self = Self::Fixed {
        width: 64,
        height: 48,
    };

    /// Logical resolution, or `None` when a side is zero or overflows
    pub fn checked_logical_size(&self) -> Option<(u32, u32)> {
        let (width, height) = match *self {
            Self::Fixed { width, height } => (width, height),
            Self::Ratio {
                width,
                height,
                unit,
            } => (width.checked_mul(unit)?, height.checked_mul(unit)?),
        };
        (width > 0 && height > 0).then_some((width, height))
    }

    /// Logical (unscaled) resolution in pixels, never zero
    pub fn logical_size(&self) -> (u32, u32) {
        match *self {
            Self::Fixed { width, height } => (width.max(1), height.max(1)),
            Self::Ratio {
                width,
                height,
                unit,
            } => (
                width.saturating_mul(unit).max(1),
                height.saturating_mul(unit).max(1),
            ),
        }
    }
}

impl Default for AspectPolicy {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Largest integer scale such that the logical size fits the available size.
/// Never returns less than 1.
pub fn compute_scale(logical: (u32, u32), available: (u32, u32)) -> u32 {
    let (logical_w, logical_h) = (logical.0.max(1), logical.1.max(1));
    let fit_w = available.0 / logical_w;
    let fit_h = available.1 / logical_h;
    fit_w.min(fit_h).max(1)
}

/// Current viewport state: logical resolution plus the active scale factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportConfig {
    policy: AspectPolicy,
    scale: u32,
}

impl ViewportConfig {
    /// Create a viewport sized for the given window
    pub fn new(policy: AspectPolicy, window_width: u32, window_height: u32) -> Self {
        let mut viewport = Self { policy, scale: 1 };
        viewport.resize(window_width, window_height);
        viewport
    }

    /// Recompute the scale for a new window size. Returns the previous scale.
    pub fn resize(&mut self, window_width: u32, window_height: u32) -> u32 {
        let previous = self.scale;
        self.scale = compute_scale(self.logical_size(), (window_width, window_height));
        if previous != self.scale {
            log::debug!("Viewport scale {} -> {}", previous, self.scale);
        }
        previous
    }

    /// Current integer scale factor (always >= 1)
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Logical resolution in unscaled pixels
    pub fn logical_size(&self) -> (u32, u32) {
        self.policy.logical_size()
    }

    /// Drawing surface size in screen pixels
    pub fn canvas_size(&self) -> (u32, u32) {
        let (w, h) = self.logical_size();
        (w * self.scale, h * self.scale)
    }

    /// Canvas placement centered inside a window of the given size
    pub fn canvas_rect(&self, window_width: u32, window_height: u32) -> CanvasRect {
        let (width, height) = self.canvas_size();
        CanvasRect {
            x: centered_offset(window_width as f32, width as f32),
            y: centered_offset(window_height as f32, height as f32),
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Where the canvas sits inside the window, in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    /// Intersection with a window of the given size as an integer scissor
    /// rectangle `(x, y, width, height)`, or `None` when nothing is visible.
    pub fn scissor(&self, window_width: u32, window_height: u32) -> Option<(u32, u32, u32, u32)> {
        let left = self.x.max(0.0) as u32;
        let top = self.y.max(0.0) as u32;
        let right = ((self.x + self.width).max(0.0) as u32).min(window_width);
        let bottom = ((self.y + self.height).max(0.0) as u32).min(window_height);

        if right <= left || bottom <= top {
            return None;
        }
        Some((left, top, right - left, bottom - top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_scale(logical: (u32, u32), available: (u32, u32)) -> u32 {
        (1..=512)
            .rev()
            .find(|s| logical.0 * s <= available.0 && logical.1 * s <= available.1)
            .unwrap_or(1)
    }

    #[test]
    fn test_scale_matches_brute_force() {
        let logical = (64, 48);
        for w in (0..2000).step_by(37) {
            for h in (0..1500).step_by(29) {
                assert_eq!(
                    compute_scale(logical, (w, h)),
                    brute_force_scale(logical, (w, h)),
                    "window {}x{}",
                    w,
                    h
                );
            }
        }
    }

    #[test]
    fn test_scale_limited_by_tighter_axis() {
        assert_eq!(compute_scale((64, 48), (1280, 720)), 15);
        assert_eq!(compute_scale((64, 48), (640, 1000)), 10);
    }

    #[test]
    fn test_scale_floors_to_one_for_tiny_window() {
        assert_eq!(compute_scale((64, 48), (10, 10)), 1);
        assert_eq!(compute_scale((64, 48), (0, 0)), 1);
    }

    #[test]
    fn test_ratio_policy_logical_size() {
        let policy = AspectPolicy::Ratio {
            width: 6,
            height: 4,
            unit: 16,
        };
        assert_eq!(policy.logical_size(), (96, 64));
        assert_eq!(policy.checked_logical_size(), Some((96, 64)));
    }

    #[test]
    fn test_oversized_ratio_saturates() {
        let policy = AspectPolicy::Ratio {
            width: 100_000,
            height: 4,
            unit: 100_000,
        };
        assert_eq!(policy.checked_logical_size(), None);
        assert_eq!(policy.logical_size(), (u32::MAX, 400_000));

        let viewport = ViewportConfig::new(policy, 640, 480);
        assert_eq!(viewport.scale(), 1);
    }

    #[test]
    fn test_zero_sized_policy() {
        let fixed = AspectPolicy::Fixed {
            width: 0,
            height: 48,
        };
        assert_eq!(fixed.checked_logical_size(), None);
        assert_eq!(fixed.logical_size(), (1, 48));
    }

    #[test]
    fn test_canvas_size_follows_scale() {
        let mut viewport = ViewportConfig::new(AspectPolicy::CLASSIC, 1280, 720);
        assert_eq!(viewport.scale(), 15);
        assert_eq!(viewport.canvas_size(), (960, 720));

        let previous = viewport.resize(200, 200);
        assert_eq!(previous, 15);
        assert_eq!(viewport.scale(), 3);
        assert_eq!(viewport.canvas_size(), (192, 144));
    }

    #[test]
    fn test_canvas_rect_is_centered() {
        let viewport = ViewportConfig::new(AspectPolicy::CLASSIC, 1280, 720);
        let rect = viewport.canvas_rect(1280, 720);
        assert_eq!(rect.x, 160.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, 960.0);
    }

    #[test]
    fn test_scissor_clips_to_window() {
        let viewport = ViewportConfig::new(AspectPolicy::CLASSIC, 32, 32);
        let rect = viewport.canvas_rect(32, 32);
        assert_eq!(rect.x, -16.0);
        assert_eq!(rect.scissor(32, 32), Some((0, 0, 32, 32)));
        assert_eq!(rect.scissor(0, 0), None);
    }

    #[test]
    fn test_policy_deserializes_from_json() {
        let policy: AspectPolicy =
            serde_json::from_str(r#"{ "kind": "ratio", "width": 6, "height": 4, "unit": 10 }"#)
                .unwrap();
        assert_eq!(policy.logical_size(), (60, 40));
    }
}
