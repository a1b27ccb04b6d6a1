use glam::{Vec2, Vec3};

use crate::input::{InputFrame, InputState, Key, MouseButton};

/// Camera deltas gathered from one frame of input.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CameraInput {
    /// x = strafe right, y = rise, z = forward; each in `[-1, 1]`.
    pub movement: Vec3,
    /// Pointer motion in logical pixels while looking.
    pub look: Vec2,
}

impl CameraInput {
    /// WASD moves, Space/Shift rise and sink, right-drag looks.
    pub fn gather(state: &InputState, frame: &InputFrame) -> Self {
        let axis = |pos: Key, neg: Key| -> f32 {
            (state.key_down(pos) as i32 - state.key_down(neg) as i32) as f32
        };

        let movement = Vec3::new(axis(Key::D, Key::A), axis(Key::Space, Key::Shift), axis(Key::W, Key::S));

        let look = if state.button_down(MouseButton::Right) {
            Vec2::new(frame.pointer_delta.0, frame.pointer_delta.1)
        } else {
            Vec2::ZERO
        };

        Self { movement, look }
    }
}
