// Action definitions and default key bindings

use winit::keyboard::KeyCode;

/// Represents all possible actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    /// Hand control to the next character
    SwitchCharacter,
}

impl Action {
    /// True for actions that are held rather than triggered
    pub fn is_directional(&self) -> bool {
        matches!(self, Self::MoveLeft | Self::MoveRight)
    }
}

/// Represents something that can be held down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    /// A finger on the touch screen, by winit touch id
    Touch(u64),
    /// The primary mouse button acting as a single pointer
    Pointer,
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(KeyCode, Action)> {
    vec![
        (KeyCode::ArrowLeft, Action::MoveLeft),
        (KeyCode::ArrowRight, Action::MoveRight),
        (KeyCode::Tab, Action::SwitchCharacter),
    ]
}
