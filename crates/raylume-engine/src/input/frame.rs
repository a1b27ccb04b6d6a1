use std::collections::HashSet;

use super::types::Key;

/// Transitions and motion collected between two redraws. Cleared by the
/// runtime once the frame has been handed to the app.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Fresh presses only; auto-repeat is filtered out.
    pub keys_pressed:  HashSet<Key>,
    /// Pointer motion in logical pixels.
    pub pointer_delta: (f32, f32),
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.pointer_delta = (0.0, 0.0);
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }
}
