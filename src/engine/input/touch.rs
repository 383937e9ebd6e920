// On-screen controls for touch and mouse input

use glam::{Vec2, Vec4};

use super::action::Action;
use crate::engine::renderer::{Sprite, TextureHandle};
use crate::engine::viewport::CanvasRect;

/// Side of a square control, in logical pixels
const CONTROL_SIZE: f32 = 10.0;
/// Gap between a control and the canvas edge, in logical pixels
const CONTROL_MARGIN: f32 = 2.0;

const IDLE_TINT: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.25);
const PRESSED_TINT: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.6);

/// Axis-aligned rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl ControlRect {
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.min + self.size;
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }
}

/// Left, right and switch buttons laid out over the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct TouchControls {
    buttons: Vec<(Action, ControlRect)>,
}

impl TouchControls {
    /// Place the controls for the current canvas and scale
    ///
    /// Direction buttons sit in the bottom corners, the switch button in the
    /// top-right corner.
    pub fn layout(canvas: CanvasRect, scale: u32) -> Self {
        let unit = scale.max(1) as f32;
        let size = Vec2::splat(CONTROL_SIZE * unit);
        let margin = CONTROL_MARGIN * unit;

        let left = canvas.x + margin;
        let right = canvas.x + canvas.width - margin - size.x;
        let top = canvas.y + margin;
        let bottom = canvas.y + canvas.height - margin - size.y;

        Self {
            buttons: vec![
                (
                    Action::MoveLeft,
                    ControlRect {
                        min: Vec2::new(left, bottom),
                        size,
                    },
                ),
                (
                    Action::MoveRight,
                    ControlRect {
                        min: Vec2::new(right, bottom),
                        size,
                    },
                ),
                (
                    Action::SwitchCharacter,
                    ControlRect {
                        min: Vec2::new(right, top),
                        size,
                    },
                ),
            ],
        }
    }

    /// Action of the control under a window-space point, if any
    pub fn hit_test(&self, point: Vec2) -> Option<Action> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(action, _)| *action)
    }

    /// Rectangle of the control bound to an action
    #[cfg(test)]
    pub fn rect(&self, action: Action) -> Option<ControlRect> {
        self.buttons
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, rect)| *rect)
    }

    /// Translucent quads for every control, brighter while pressed
    pub fn sprites(
        &self,
        texture: TextureHandle,
        is_pressed: impl Fn(Action) -> bool,
    ) -> Vec<Sprite> {
        self.buttons
            .iter()
            .map(|(action, rect)| {
                let tint = if is_pressed(*action) {
                    PRESSED_TINT
                } else {
                    IDLE_TINT
                };
                Sprite::new(rect.min, rect.size, texture).with_color(tint)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CanvasRect {
        CanvasRect {
            x: 100.0,
            y: 0.0,
            width: 640.0,
            height: 480.0,
        }
    }

    #[test]
    fn test_layout_places_buttons_in_corners() {
        let controls = TouchControls::layout(canvas(), 10);

        let left = controls.rect(Action::MoveLeft).unwrap();
        assert_eq!(left.min, Vec2::new(120.0, 360.0));
        assert_eq!(left.size, Vec2::splat(100.0));

        let right = controls.rect(Action::MoveRight).unwrap();
        assert_eq!(right.min, Vec2::new(620.0, 360.0));

        let switch = controls.rect(Action::SwitchCharacter).unwrap();
        assert_eq!(switch.min, Vec2::new(620.0, 20.0));
    }

    #[test]
    fn test_hit_test() {
        let controls = TouchControls::layout(canvas(), 10);
        assert_eq!(
            controls.hit_test(Vec2::new(150.0, 400.0)),
            Some(Action::MoveLeft)
        );
        assert_eq!(
            controls.hit_test(Vec2::new(700.0, 400.0)),
            Some(Action::MoveRight)
        );
        assert_eq!(
            controls.hit_test(Vec2::new(700.0, 50.0)),
            Some(Action::SwitchCharacter)
        );
        assert_eq!(controls.hit_test(Vec2::new(400.0, 240.0)), None);
    }

    #[test]
    fn test_rect_edges_are_half_open() {
        let rect = ControlRect {
            min: Vec2::ZERO,
            size: Vec2::splat(10.0),
        };
        assert!(rect.contains(Vec2::ZERO));
        assert!(!rect.contains(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_sprites_highlight_pressed() {
        let controls = TouchControls::layout(canvas(), 10);
        let sprites = controls.sprites(TextureHandle(0), |a| a == Action::MoveRight);
        assert_eq!(sprites.len(), 3);
        assert_eq!(sprites[0].color, IDLE_TINT);
        assert_eq!(sprites[1].color, PRESSED_TINT);
    }
}
