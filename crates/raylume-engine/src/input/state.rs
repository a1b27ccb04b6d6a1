use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, MouseButton};

/// Held keys and buttons plus the last pointer position.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_down:    HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
    pub pointer_pos:  Option<(f32, f32)>,
}

impl InputState {
    /// Folds `ev` into the held state; presses and motion also land in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Key { key, pressed: true, repeat } => {
                if self.keys_down.insert(key) && !repeat {
                    frame.keys_pressed.insert(key);
                }
            }
            InputEvent::Key { key, pressed: false, .. } => {
                self.keys_down.remove(&key);
            }
            InputEvent::Button { button, pressed } => {
                if pressed {
                    self.buttons_down.insert(button);
                } else {
                    self.buttons_down.remove(&button);
                }
            }
            InputEvent::PointerMoved { x, y } => {
                // the first sample after entering has nothing to diff against
                if let Some((px, py)) = self.pointer_pos.replace((x, y)) {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
            }
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Focused(false) => {
                // releases never arrive for keys held while focus moved away
                self.keys_down.clear();
                self.buttons_down.clear();
            }
            InputEvent::Focused(true) => {}
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}
