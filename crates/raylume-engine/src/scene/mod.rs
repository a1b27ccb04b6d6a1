//! Scene graph contract.
//!
//! The tracer reads scenes through this module only:
//! - `Scene` is an ordered list of `Entity`s
//! - each entity has a `Mesh` (ordered `SubMesh`es sharing `Geometry`) and a
//!   `Transform` (world position)
//! - `Geometry` is a `Shape` plus a `Material`
//!
//! Scenes are built in code (see `demo`); asset loading lives elsewhere.

mod bvh;
mod demo;
mod entity;
mod geometry;

pub use bvh::{BoundingHierarchy, BoundingSphere, BvhNode, BvhNodeKind};
pub use entity::{Entity, Mesh, Scene, SubMesh, Transform};
pub use geometry::{Geometry, Material, ModelShape, Shape, TriangleShape};
