use bytemuck::{Pod, Zeroable};

use crate::camera::Camera;

use super::config::TracerConfig;

/// Scene-dependent counts handed to the kernel, taken from the last
/// flattened upload.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SceneCounts {
    pub light_count: u32,
    pub sphere_count: u32,
    pub model_count: u32,
}

/// Per-frame scalar block, `var<uniform> uniforms: Uniforms` in the tracer.
///
/// Every `vec3` shares its 16-byte slot with the scalar that follows it.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TraceUniforms {
    pub cam_pos: [f32; 3],
    pub fov: f32,
    pub cam_front: [f32; 3],
    pub seed: f32,
    pub cam_right: [f32; 3],
    pub light_count: i32,
    pub cam_up: [f32; 3],
    pub sphere_count: i32,
    pub void_color: [f32; 3],
    pub dev_f: f32,
    pub dev_v: [f32; 3],
    pub dev_i: i32,
    pub cam_dim: [f32; 2],
    pub dev_b: u32,
    pub model_count: i32,
}

impl TraceUniforms {
    pub fn new(camera: &Camera, config: &TracerConfig, counts: SceneCounts, seed: f32) -> Self {
        Self {
            cam_pos: camera.position.to_array(),
            fov: config.fov,
            cam_front: camera.front.to_array(),
            seed,
            cam_right: camera.right.to_array(),
            light_count: counts.light_count as i32,
            cam_up: camera.up.to_array(),
            sphere_count: counts.sphere_count as i32,
            void_color: config.void_color.to_array(),
            dev_f: config.debug.float,
            dev_v: config.debug.vec3.to_array(),
            dev_i: config.debug.int,
            cam_dim: camera.dim.to_array(),
            dev_b: config.debug.boolean as u32,
            model_count: counts.model_count as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn layout_matches_wgsl() {
        assert_eq!(size_of::<TraceUniforms>(), 112);
        assert_eq!(offset_of!(TraceUniforms, fov), 12);
        assert_eq!(offset_of!(TraceUniforms, cam_front), 16);
        assert_eq!(offset_of!(TraceUniforms, cam_right), 32);
        assert_eq!(offset_of!(TraceUniforms, cam_up), 48);
        assert_eq!(offset_of!(TraceUniforms, void_color), 64);
        assert_eq!(offset_of!(TraceUniforms, dev_v), 80);
        assert_eq!(offset_of!(TraceUniforms, cam_dim), 96);
        assert_eq!(offset_of!(TraceUniforms, dev_b), 104);
        assert_eq!(offset_of!(TraceUniforms, model_count), 108);
    }

    #[test]
    fn carries_camera_config_and_counts() {
        let camera = Camera::default();
        let config = TracerConfig::default();
        let u = TraceUniforms::new(
            &camera,
            &config,
            SceneCounts {
                light_count: 2,
                sphere_count: 3,
                model_count: 2,
            },
            0.25,
        );

        assert_eq!(u.cam_pos, camera.position.to_array());
        assert_eq!(u.cam_dim, camera.dim.to_array());
        assert_eq!(u.void_color, [0.35, 0.6, 0.392]);
        assert_eq!(u.light_count, 2);
        assert_eq!(u.sphere_count, 3);
        assert_eq!(u.model_count, 2);
        assert_eq!(u.seed, 0.25);
        assert_eq!(u.dev_b, 0);
    }
}
