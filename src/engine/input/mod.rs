// Input handling system
//
// Keyboard keys and on-screen touch/mouse controls are folded into one
// `InputSnapshot` per frame, plus a count of "switch character" requests.
//
// ## Architecture
//
// - `action`: Defines actions and default key bindings
// - `touch`: On-screen control layout and hit testing
// - `manager`: Tracks held sources and produces snapshots
//
// ## Usage Example
//
// ```rust
// let mut input = InputManager::new();
//
// // In your event loop
// input.process_keyboard_event(&key_event);
//
// // Once per frame
// let snapshot = input.snapshot();
// for _ in 0..input.take_switch_requests() {
//     roster.switch_active();
// }
// ```

pub mod action;
pub mod manager;
pub mod touch;

// Re-export commonly used types
pub use action::Action;
pub use manager::{InputManager, InputSnapshot};
pub use touch::TouchControls;
