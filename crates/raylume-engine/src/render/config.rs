use std::path::PathBuf;

use glam::Vec3;

use crate::trace::TransformPolicy;

pub const SHADER_DIR_ENV: &str = "RAYLUME_SHADER_DIR";
pub const OVERLAY_ENV: &str = "RAYLUME_OVERLAY";

/// Free parameters forwarded to the kernel for experimentation.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct DebugKnobs {
    pub int: i32,
    pub boolean: bool,
    pub float: f32,
    pub vec3: Vec3,
}

/// Tracer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TracerConfig {
    /// Vertical field of view, radians.
    pub fov: f32,

    /// Color returned by rays that escape the scene.
    pub void_color: Vec3,

    pub debug: DebugKnobs,

    /// Whether the renderer produces overlay lines each frame.
    pub overlay: bool,

    pub transform_policy: TransformPolicy,

    /// Directory holding `raytracer.wgsl` for live reloads.
    /// `None` uses the source embedded in the binary.
    pub shader_dir: Option<PathBuf>,

    /// Offscreen target clear color before the bloom pass.
    pub clear_color: [f32; 4],
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            fov: 60.0_f32.to_radians(),
            void_color: Vec3::new(0.35, 0.6, 0.392),
            debug: DebugKnobs::default(),
            overlay: true,
            transform_policy: TransformPolicy::default(),
            shader_dir: None,
            clear_color: [0.9, 0.0, 0.0, 1.0],
        }
    }
}

impl TracerConfig {
    /// Defaults overridden by `RAYLUME_SHADER_DIR` and `RAYLUME_OVERLAY`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = var(SHADER_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.shader_dir = Some(PathBuf::from(dir));
        }

        if let Some(raw) = var(OVERLAY_ENV) {
            match parse_flag(&raw) {
                Some(on) => self.overlay = on,
                None => log::warn!("ignoring {OVERLAY_ENV}={raw:?}: expected on/off"),
            }
        }

        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults() {
        let c = TracerConfig::default();
        assert_eq!(c.void_color, Vec3::new(0.35, 0.6, 0.392));
        assert_eq!(c.clear_color, [0.9, 0.0, 0.0, 1.0]);
        assert!(c.shader_dir.is_none());
    }

    #[test]
    fn env_overrides_shader_dir_and_overlay() {
        let c = TracerConfig::default().with_overrides(env(&[
            (SHADER_DIR_ENV, "/tmp/shaders"),
            (OVERLAY_ENV, "off"),
        ]));
        assert_eq!(c.shader_dir, Some(PathBuf::from("/tmp/shaders")));
        assert!(!c.overlay);
    }

    #[test]
    fn unparseable_overlay_keeps_default() {
        let c = TracerConfig::default().with_overrides(env(&[(OVERLAY_ENV, "maybe")]));
        assert!(c.overlay);
    }

    #[test]
    fn blank_shader_dir_is_ignored() {
        let c = TracerConfig::default().with_overrides(env(&[(SHADER_DIR_ENV, "  ")]));
        assert!(c.shader_dir.is_none());
    }
}
