//! Built-in showcase scene used by the studio binary.

use glam::Vec3;

use super::entity::{Entity, Mesh, Scene, SubMesh, Transform};
use super::geometry::{Geometry, Material, TriangleShape};

impl Scene {
    /// A light, a ring of spheres, a glass ball, then the floor, a lone
    /// triangle and a tetrahedron model.
    ///
    /// The kernel lights the scene with its first sphere, so the light leads.
    pub fn demo() -> Self {
        let mut scene = Scene::new();

        scene.push(Entity::new(
            "light",
            Mesh::single(
                "bulb",
                Geometry::sphere(
                    Vec3::new(0.0, 8.0, -4.0),
                    1.5,
                    Material::emissive(Vec3::ONE, Vec3::splat(4.0)),
                ),
            ),
            Transform::IDENTITY,
        ));

        let palette = [
            Vec3::new(0.9, 0.2, 0.2),
            Vec3::new(0.2, 0.8, 0.3),
            Vec3::new(0.2, 0.4, 0.9),
            Vec3::new(0.9, 0.8, 0.3),
        ];
        for (i, color) in palette.into_iter().enumerate() {
            let angle = i as f32 * std::f32::consts::FRAC_PI_2;
            let center = Vec3::new(angle.cos() * 3.0, 0.0, -6.0 + angle.sin() * 3.0);
            let material = Material::diffuse(color).with_reflectivity(i as f32 * 0.25);
            scene.push(Entity::new(
                format!("ball-{i}"),
                Mesh::single("ball", Geometry::sphere(center, 1.0, material)),
                Transform::IDENTITY,
            ));
        }

        scene.push(Entity::new(
            "glass",
            Mesh::single(
                "glass",
                Geometry::sphere(
                    Vec3::new(0.0, 0.5, -6.0),
                    1.5,
                    Material::diffuse(Vec3::new(0.9, 0.95, 1.0)).with_transparency(0.8),
                ),
            ),
            Transform::IDENTITY,
        ));

        scene.push(Entity::new(
            "floor",
            Mesh::single("floor", Geometry::model(quad(20.0), Material::diffuse(Vec3::splat(0.75)))),
            Transform::at(Vec3::new(0.0, -1.0, 0.0)),
        ));

        scene.push(Entity::new(
            "sail",
            Mesh::single(
                "sail",
                Geometry::triangle(
                    Vec3::new(-6.0, -1.0, -10.0),
                    Vec3::new(-2.0, -1.0, -10.0),
                    Vec3::new(-4.0, 4.0, -10.0),
                    Material::diffuse(Vec3::new(0.6, 0.3, 0.8)),
                ),
            ),
            Transform::IDENTITY,
        ));

        let mut pyramid = Mesh::default();
        pyramid.push(SubMesh::new(
            "body",
            Geometry::model(tetrahedron(1.5), Material::diffuse(Vec3::new(0.3, 0.7, 0.7)).with_reflectivity(0.6)),
        ));
        scene.push(Entity::new("pyramid", pyramid, Transform::at(Vec3::new(5.0, 0.0, -9.0))));

        scene
    }
}

/// Two triangles spanning `[-half, half]` on the XZ plane.
fn quad(half: f32) -> Vec<TriangleShape> {
    let a = Vec3::new(-half, 0.0, -half);
    let b = Vec3::new(half, 0.0, -half);
    let c = Vec3::new(half, 0.0, half);
    let d = Vec3::new(-half, 0.0, half);
    vec![TriangleShape::new(a, c, b), TriangleShape::new(a, d, c)]
}

fn tetrahedron(size: f32) -> Vec<TriangleShape> {
    let top = Vec3::new(0.0, size * 1.5, 0.0);
    let p0 = Vec3::new(-size, -0.9, -size);
    let p1 = Vec3::new(size, -0.9, -size);
    let p2 = Vec3::new(0.0, -0.9, size);
    vec![
        TriangleShape::new(p0, p1, p2),
        TriangleShape::new(p0, top, p1),
        TriangleShape::new(p1, top, p2),
        TriangleShape::new(p2, top, p0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Shape;

    #[test]
    fn demo_mixes_every_traced_shape_kind() {
        let scene = Scene::demo();
        let kinds: Vec<&str> = scene
            .entities()
            .iter()
            .flat_map(|e| e.mesh.sub_meshes())
            .map(|s| s.geometry.shape.kind_name())
            .collect();

        assert!(kinds.contains(&"sphere"));
        assert!(kinds.contains(&"triangle"));
        assert!(kinds.contains(&"model"));
    }

    #[test]
    fn light_is_the_first_sphere() {
        let scene = Scene::demo();
        let first = &scene.entities()[0];
        assert_eq!(first.name, "light");
        let Shape::Sphere { .. } = first.mesh.sub_meshes()[0].geometry.shape else {
            panic!("light must be a sphere");
        };
        assert!(first.mesh.sub_meshes()[0].geometry.material.emission_color.max_element() > 0.0);
    }

    #[test]
    fn demo_spheres_have_positive_radius() {
        for entity in Scene::demo().entities() {
            for sub in entity.mesh.sub_meshes() {
                if let Shape::Sphere { radius, .. } = sub.geometry.shape {
                    assert!(radius > 0.0);
                }
            }
        }
    }
}
