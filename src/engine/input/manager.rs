// Input manager - folds every input source into one per-frame snapshot

use std::collections::HashMap;

use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton, TouchPhase};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::action::{default_bindings, Action, InputSource};
use super::touch::TouchControls;

/// Directional state read by the active character each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
}

impl InputSnapshot {
    pub fn any_direction(&self) -> bool {
        self.left || self.right
    }
}

/// Main input manager
///
/// A direction stays held while any source (key, finger, pointer) that
/// pressed it is still down, so releasing a touch button does not cancel a
/// held arrow key.
pub struct InputManager {
    /// Key to action bindings
    bindings: HashMap<KeyCode, Action>,

    /// Sources currently down, and the action each one pressed
    held: HashMap<InputSource, Action>,

    /// Switch presses not yet consumed by the frame loop
    switch_requests: u32,

    /// Last known cursor position in window pixels
    cursor: Vec2,
}

impl InputManager {
    /// Create a new input manager with the default bindings
    pub fn new() -> Self {
        Self::with_bindings(default_bindings())
    }

    /// Create an input manager with custom key bindings
    pub fn with_bindings(bindings: Vec<(KeyCode, Action)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
            held: HashMap::new(),
            switch_requests: 0,
            cursor: Vec2::ZERO,
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only process physical key presses
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    /// Process a key press or release
    pub fn process_key(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) {
        let Some(action) = self.bindings.get(&key_code).copied() else {
            return;
        };

        match state {
            // Key repeats must not count as extra switch presses
            ElementState::Pressed if !repeat => self.press(InputSource::key(key_code), action),
            ElementState::Pressed => {}
            ElementState::Released => self.release(InputSource::key(key_code)),
        }
    }

    /// Process a touch event against the on-screen controls
    pub fn process_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        location: Vec2,
        controls: &TouchControls,
    ) {
        let source = InputSource::Touch(id);
        match phase {
            TouchPhase::Started => {
                if let Some(action) = controls.hit_test(location) {
                    self.press(source, action);
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => self.release(source),
            TouchPhase::Moved => {}
        }
    }

    /// Track the cursor so mouse clicks can hit the on-screen controls
    pub fn process_cursor_moved(&mut self, position: Vec2) {
        self.cursor = position;
    }

    /// Process a mouse button event against the on-screen controls
    pub fn process_mouse_button(
        &mut self,
        state: ElementState,
        button: MouseButton,
        controls: &TouchControls,
    ) {
        if button != MouseButton::Left {
            return;
        }

        match state {
            ElementState::Pressed => {
                if let Some(action) = controls.hit_test(self.cursor) {
                    self.press(InputSource::Pointer, action);
                }
            }
            ElementState::Released => self.release(InputSource::Pointer),
        }
    }

    fn press(&mut self, source: InputSource, action: Action) {
        if !action.is_directional() {
            self.switch_requests += 1;
        }
        self.held.insert(source, action);
    }

    fn release(&mut self, source: InputSource) {
        self.held.remove(&source);
    }

    /// Check if any source is holding an action
    pub fn is_pressed(&self, action: Action) -> bool {
        self.held.values().any(|held| *held == action)
    }

    /// Directional state for this frame
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.is_pressed(Action::MoveLeft),
            right: self.is_pressed(Action::MoveRight),
        }
    }

    /// Number of switch presses since the last call
    pub fn take_switch_requests(&mut self) -> u32 {
        std::mem::take(&mut self.switch_requests)
    }

    /// Drop every held source (e.g. when the window loses focus)
    pub fn reset_all(&mut self) {
        self.held.clear();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
