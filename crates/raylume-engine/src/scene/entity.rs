use std::sync::Arc;

use glam::Vec3;

use super::geometry::Geometry;

/// World placement of an entity. Only translation is consumed by the tracer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Transform {
    pub position: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self { position: Vec3::ZERO };

    pub const fn at(position: Vec3) -> Self {
        Self { position }
    }
}

/// A named, independently-materialed part of a mesh.
#[derive(Debug, Clone)]
pub struct SubMesh {
    pub name: String,
    pub geometry: Arc<Geometry>,
}

impl SubMesh {
    pub fn new(name: impl Into<String>, geometry: impl Into<Arc<Geometry>>) -> Self {
        Self {
            name: name.into(),
            geometry: geometry.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    sub_meshes: Vec<SubMesh>,
}

impl Mesh {
    pub fn new(sub_meshes: Vec<SubMesh>) -> Self {
        Self { sub_meshes }
    }

    /// Single-part mesh.
    pub fn single(name: impl Into<String>, geometry: impl Into<Arc<Geometry>>) -> Self {
        Self::new(vec![SubMesh::new(name, geometry)])
    }

    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    pub fn push(&mut self, sub_mesh: SubMesh) {
        self.sub_meshes.push(sub_mesh);
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub mesh: Mesh,
    pub transform: Transform,
}

impl Entity {
    pub fn new(name: impl Into<String>, mesh: Mesh, transform: Transform) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform,
        }
    }
}

/// Ordered entity list. Order is significant: it fixes the GPU buffer order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn push(&mut self, entity: Entity) -> &mut Self {
        self.entities.push(entity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

impl FromIterator<Entity> for Scene {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}
