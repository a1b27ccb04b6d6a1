use glam::Vec3;

use super::bvh::{BoundingHierarchy, BoundingSphere};

/// Surface description shared by every shape kind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub surface_color: Vec3,
    /// 0 = opaque, 1 = fully transparent.
    pub transparency: f32,
    pub emission_color: Vec3,
    /// 0 = diffuse, 1 = mirror.
    pub reflectivity: f32,
}

impl Material {
    pub const fn diffuse(color: Vec3) -> Self {
        Self {
            surface_color: color,
            transparency: 0.0,
            emission_color: Vec3::ZERO,
            reflectivity: 0.0,
        }
    }

    pub const fn emissive(color: Vec3, emission: Vec3) -> Self {
        Self {
            surface_color: color,
            transparency: 0.0,
            emission_color: emission,
            reflectivity: 0.0,
        }
    }

    pub const fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub const fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Vec3::splat(0.8))
    }
}

/// A single triangle in model space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleShape {
    pub positions: [Vec3; 3],
}

impl TriangleShape {
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { positions: [a, b, c] }
    }

    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.positions;
        (a + b + c) / 3.0
    }

    /// Centroid-centered sphere reaching the farthest vertex.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let center = self.centroid();
        let radius = self
            .positions
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        BoundingSphere::new(center, radius)
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        let [a, b, c] = self.positions;
        Self::new(a + offset, b + offset, c + offset)
    }

    /// Zero-area triangles are accepted; the kernel never reports a hit on them.
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.positions;
        (b - a).cross(c - a).length_squared() <= f32::EPSILON
    }
}

/// Triangle soup with a precomputed bounding-sphere hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelShape {
    triangles: Vec<TriangleShape>,
    bvh: BoundingHierarchy,
}

impl ModelShape {
    pub fn new(triangles: Vec<TriangleShape>) -> Self {
        let bvh = BoundingHierarchy::build(&triangles);
        Self { triangles, bvh }
    }

    pub fn triangles(&self) -> &[TriangleShape] {
        &self.triangles
    }

    pub fn bvh(&self) -> &BoundingHierarchy {
        &self.bvh
    }
}

/// Geometry kinds a sub-mesh can reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere { center: Vec3, radius: f32 },
    Triangle(TriangleShape),
    Model(ModelShape),
    /// Infinite plane `dot(normal, p) = offset`. The compute kernel has no
    /// plane primitive, so these never reach the GPU.
    Plane { normal: Vec3, offset: f32 },
}

impl Shape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Sphere { .. } => "sphere",
            Shape::Triangle(_) => "triangle",
            Shape::Model(_) => "model",
            Shape::Plane { .. } => "plane",
        }
    }
}

/// Shape + material; shared between sub-meshes through `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub shape: Shape,
    pub material: Material,
}

impl Geometry {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self { shape, material }
    }

    pub fn sphere(center: Vec3, radius: f32, material: Material) -> Self {
        Self::new(Shape::Sphere { center, radius }, material)
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3, material: Material) -> Self {
        Self::new(Shape::Triangle(TriangleShape::new(a, b, c)), material)
    }

    pub fn model(triangles: Vec<TriangleShape>, material: Material) -> Self {
        Self::new(Shape::Model(ModelShape::new(triangles)), material)
    }
}
