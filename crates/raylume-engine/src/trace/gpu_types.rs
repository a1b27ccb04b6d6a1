//! GPU-side primitive records.
//!
//! Layouts follow WGSL storage-buffer rules: a `vec3<f32>` is 16-byte aligned,
//! so every 3-vector is either followed by a scalar that fills the slot or by
//! explicit padding.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::scene::{BoundingSphere, Material, TriangleShape};

/// `struct Sphere { center: vec3<f32>, radius: f32 }` (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct GpuSphere {
    pub center: [f32; 3],
    pub radius: f32,
}

impl GpuSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center: center.to_array(),
            radius,
        }
    }
}

/// `struct Triangle { a: vec3<f32>, b: vec3<f32>, c: vec3<f32> }` (48 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct GpuTriangle {
    pub a: [f32; 3],
    _pad0: f32,
    pub b: [f32; 3],
    _pad1: f32,
    pub c: [f32; 3],
    _pad2: f32,
}

impl GpuTriangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            a: a.to_array(),
            _pad0: 0.0,
            b: b.to_array(),
            _pad1: 0.0,
            c: c.to_array(),
            _pad2: 0.0,
        }
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [Vec3::from(self.a), Vec3::from(self.b), Vec3::from(self.c)]
    }
}

impl From<&TriangleShape> for GpuTriangle {
    fn from(t: &TriangleShape) -> Self {
        let [a, b, c] = t.positions;
        Self::new(a, b, c)
    }
}

/// `struct Model { offset: i32, count: i32 }` (8 bytes): a contiguous range
/// of the triangle buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuModel {
    pub triangle_offset: i32,
    pub triangle_count: i32,
}

impl GpuModel {
    pub fn new(triangle_offset: usize, triangle_count: usize) -> Self {
        Self {
            triangle_offset: triangle_offset as i32,
            triangle_count: triangle_count as i32,
        }
    }

    /// One past the last triangle index.
    pub fn end(&self) -> usize {
        (self.triangle_offset + self.triangle_count) as usize
    }
}

/// `struct Bound { center: vec3<f32>, radius: f32 }` (16 bytes), co-indexed
/// with `GpuModel`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct GpuBound {
    pub center: [f32; 3],
    pub radius: f32,
}

impl From<BoundingSphere> for GpuBound {
    fn from(s: BoundingSphere) -> Self {
        Self {
            center: s.center.to_array(),
            radius: s.radius,
        }
    }
}

/// `struct Surface { color: vec3<f32>, transparency: f32,
/// emission: vec3<f32>, reflectivity: f32 }` (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct GpuSurface {
    pub color: [f32; 3],
    pub transparency: f32,
    pub emission: [f32; 3],
    pub reflectivity: f32,
}

impl From<&Material> for GpuSurface {
    fn from(m: &Material) -> Self {
        Self {
            color: m.surface_color.to_array(),
            transparency: m.transparency,
            emission: m.emission_color.to_array(),
            reflectivity: m.reflectivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<GpuSphere>(), 16);
        assert_eq!(std::mem::size_of::<GpuTriangle>(), 48);
        assert_eq!(std::mem::size_of::<GpuModel>(), 8);
        assert_eq!(std::mem::size_of::<GpuBound>(), 16);
        assert_eq!(std::mem::size_of::<GpuSurface>(), 32);
    }

    #[test]
    fn triangle_vertices_sit_on_16_byte_slots() {
        let t = GpuTriangle::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0), Vec3::new(7.0, 8.0, 9.0));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&t));
        assert_eq!(&floats[0..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&floats[4..7], &[4.0, 5.0, 6.0]);
        assert_eq!(&floats[8..11], &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn surface_packs_scalars_into_vec3_tails() {
        let m = Material {
            surface_color: Vec3::new(1.0, 0.0, 0.0),
            transparency: 0.5,
            emission_color: Vec3::new(0.0, 2.0, 0.0),
            reflectivity: 0.25,
        };
        let s = GpuSurface::from(&m);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&s));
        assert_eq!(floats, &[1.0, 0.0, 0.0, 0.5, 0.0, 2.0, 0.0, 0.25]);
    }
}
