use glam::{Vec2, Vec3};

use crate::core::Layout;

use super::controls::CameraInput;

pub const WORLD_UP: Vec3 = Vec3::Y;

/// Pitch stays short of the poles so the basis never collapses.
const PITCH_LIMIT: f32 = 89.0_f32.to_radians();

/// Free-flying camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,

    /// Image-plane half-extents at unit distance: `y = tan(fov / 2)`,
    /// `x = y * aspect`.
    pub dim: Vec2,

    /// Radians; 0 looks down -Z.
    pub yaw: f32,
    /// Radians; positive looks up.
    pub pitch: f32,

    /// World units per second.
    pub speed: f32,
    /// Radians per logical pixel of pointer motion.
    pub sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: WORLD_UP,
            dim: Vec2::ONE,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            speed: 4.0,
            sensitivity: 0.003,
        };
        camera.rebuild_basis();
        camera
    }

    /// Advances position and orientation from this frame's input.
    pub fn update(&mut self, dt: f32, input: &CameraInput) {
        if input.look != Vec2::ZERO {
            self.yaw += input.look.x * self.sensitivity;
            self.pitch = (self.pitch - input.look.y * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            self.rebuild_basis();
        }

        let step = self.front * input.movement.z + self.right * input.movement.x + WORLD_UP * input.movement.y;
        self.position += step * self.speed * dt;
    }

    /// Recomputes the half-extents from field of view (radians) and viewport.
    pub fn update_dim(&mut self, fov: f32, layout: Layout) {
        self.dim.y = (fov / 2.0).tan();
        self.dim.x = self.dim.y * layout.aspect();
    }

    fn rebuild_basis(&mut self) {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.front = Vec3::new(sy * cp, sp, -cy * cp).normalize();
        self.right = self.front.cross(WORLD_UP).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 4.0), 0.0, -0.1)
    }
}
