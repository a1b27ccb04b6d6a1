use glam::Vec3;

use crate::scene::{Scene, Shape};

use super::gpu_types::{GpuBound, GpuModel, GpuSphere, GpuSurface, GpuTriangle};

/// Lights are implicit in the kernel; there is always exactly one.
pub const LIGHT_COUNT: u32 = 1;

/// Which shapes receive the owning entity's world translation.
///
/// `AsAuthored` keeps lone triangles and spheres in the coordinates they were
/// authored in and only moves composite models (and their bounds). `World`
/// moves every shape.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TransformPolicy {
    #[default]
    AsAuthored,
    World,
}

/// Host-side flattened scene, ready for upload.
///
/// `models` and `bounds` are co-indexed; `surfaces` has one entry per emitted
/// primitive (sphere, lone triangle or model) in emission order.
///
/// The kernel numbers primitives spheres first, then models. `surface_ids`
/// maps that numbering back into `surfaces`, so sphere `i` shades with
/// `surfaces[surface_ids[i]]` and model `m` with
/// `surfaces[surface_ids[sphere_count + m]]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneBuffers {
    pub spheres: Vec<GpuSphere>,
    pub triangles: Vec<GpuTriangle>,
    pub models: Vec<GpuModel>,
    pub bounds: Vec<GpuBound>,
    pub surfaces: Vec<GpuSurface>,
    pub surface_ids: Vec<u32>,
    pub light_count: u32,
    pub sphere_count: u32,
}

impl SceneBuffers {
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty() && self.triangles.is_empty() && self.models.is_empty()
    }

    pub fn model_count(&self) -> u32 {
        self.models.len() as u32
    }
}

/// Flattens `scene` in entity order, sub-meshes in list order.
///
/// Shapes the kernel cannot trace are dropped without emitting a surface.
pub fn flatten(scene: &Scene, policy: TransformPolicy) -> SceneBuffers {
    let mut out = SceneBuffers::default();
    let mut skipped = 0usize;
    let mut model_surfaces = Vec::new();

    for entity in scene.entities() {
        let world = entity.transform.position;
        let local = match policy {
            TransformPolicy::AsAuthored => Vec3::ZERO,
            TransformPolicy::World => world,
        };

        for sub_mesh in entity.mesh.sub_meshes() {
            let geometry = &*sub_mesh.geometry;
            let surface = out.surfaces.len() as u32;

            match &geometry.shape {
                Shape::Sphere { center, radius } => {
                    debug_assert!(*radius > 0.0, "sphere `{}` has radius {radius}", sub_mesh.name);
                    out.spheres.push(GpuSphere::new(*center + local, *radius));
                    out.surface_ids.push(surface);
                }

                Shape::Triangle(tri) => {
                    let tri = tri.translated(local);
                    out.models.push(GpuModel::new(out.triangles.len(), 1));
                    out.bounds.push(tri.bounding_sphere().into());
                    out.triangles.push(GpuTriangle::from(&tri));
                    model_surfaces.push(surface);
                }

                Shape::Model(model) => {
                    let tris = model.triangles();
                    out.models.push(GpuModel::new(out.triangles.len(), tris.len()));
                    out.bounds.push(model.bvh().root().translated(world).into());
                    out.triangles
                        .extend(tris.iter().map(|t| GpuTriangle::from(&t.translated(world))));
                    model_surfaces.push(surface);
                }

                Shape::Plane { .. } => {
                    log::trace!(
                        "skipping {} sub-mesh `{}` of `{}`",
                        geometry.shape.kind_name(),
                        sub_mesh.name,
                        entity.name
                    );
                    skipped += 1;
                    continue;
                }
            }

            out.surfaces.push(GpuSurface::from(&geometry.material));
        }
    }

    out.surface_ids.extend(model_surfaces);
    out.light_count = LIGHT_COUNT;
    out.sphere_count = out.spheres.len() as u32;

    log::debug!(
        "flattened {} entities: {} spheres, {} triangles, {} models, {} skipped",
        scene.len(),
        out.spheres.len(),
        out.triangles.len(),
        out.models.len(),
        skipped
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Entity, Geometry, Material, Mesh, SubMesh, Transform, TriangleShape};

    fn sphere_entity(name: &str, center: Vec3, radius: f32, color: Vec3) -> Entity {
        Entity::new(
            name,
            Mesh::single(name, Geometry::sphere(center, radius, Material::diffuse(color))),
            Transform::IDENTITY,
        )
    }

    fn tri(offset: f32) -> TriangleShape {
        TriangleShape::new(
            Vec3::new(offset, 0.0, 0.0),
            Vec3::new(offset + 1.0, 0.0, 0.0),
            Vec3::new(offset, 1.0, 0.0),
        )
    }

    fn model_entity(name: &str, k: usize, at: Vec3) -> Entity {
        let tris = (0..k).map(|i| tri(i as f32 * 2.0)).collect();
        Entity::new(
            name,
            Mesh::single(name, Geometry::model(tris, Material::diffuse(Vec3::ONE))),
            Transform::at(at),
        )
    }

    fn lone_triangle_entity(name: &str, at: Vec3) -> Entity {
        let t = tri(0.0);
        let [a, b, c] = t.positions;
        Entity::new(
            name,
            Mesh::single(name, Geometry::triangle(a, b, c, Material::diffuse(Vec3::Y))),
            Transform::at(at),
        )
    }

    #[test]
    fn empty_scene_flattens_to_empty_buffers() {
        let out = flatten(&Scene::new(), TransformPolicy::default());
        assert!(out.spheres.is_empty());
        assert!(out.triangles.is_empty());
        assert!(out.models.is_empty());
        assert!(out.bounds.is_empty());
        assert!(out.surfaces.is_empty());
        assert!(out.surface_ids.is_empty());
        assert_eq!(out.sphere_count, 0);
        assert_eq!(out.light_count, 1);
    }

    #[test]
    fn single_red_sphere() {
        let scene: Scene = [sphere_entity("ball", Vec3::ZERO, 1.0, Vec3::new(1.0, 0.0, 0.0))]
            .into_iter()
            .collect();
        let out = flatten(&scene, TransformPolicy::default());

        assert_eq!(out.spheres, vec![GpuSphere::new(Vec3::ZERO, 1.0)]);
        assert_eq!(out.surfaces.len(), 1);
        assert_eq!(out.surfaces[0].color, [1.0, 0.0, 0.0]);
        assert!(out.triangles.is_empty());
        assert!(out.models.is_empty());
        assert!(out.bounds.is_empty());
    }

    #[test]
    fn spheres_and_surfaces_are_co_indexed() {
        let colors = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE];
        let scene: Scene = colors
            .iter()
            .enumerate()
            .map(|(i, c)| sphere_entity("s", Vec3::new(i as f32, 0.0, 0.0), 0.5 + i as f32, *c))
            .collect();
        let out = flatten(&scene, TransformPolicy::default());

        assert_eq!(out.spheres.len(), colors.len());
        assert_eq!(out.surfaces.len(), colors.len());
        assert_eq!(out.sphere_count, colors.len() as u32);
        for (i, c) in colors.iter().enumerate() {
            assert_eq!(out.spheres[i].radius, 0.5 + i as f32);
            assert_eq!(out.surfaces[i].color, c.to_array());
        }
        assert!(out.triangles.is_empty());
        assert!(out.models.is_empty());
    }

    #[test]
    fn composite_model_appends_contiguous_range() {
        let mut scene = Scene::new();
        scene.push(lone_triangle_entity("t", Vec3::ZERO));
        scene.push(model_entity("m", 5, Vec3::ZERO));
        let out = flatten(&scene, TransformPolicy::default());

        assert_eq!(out.models.len(), 2);
        assert_eq!(out.models[1], GpuModel { triangle_offset: 1, triangle_count: 5 });
        assert_eq!(out.triangles.len(), 6);
        assert!(out.models.iter().all(|m| m.end() <= out.triangles.len()));
    }

    #[test]
    fn composite_model_translates_triangles_and_bound() {
        let offset = Vec3::new(10.0, -2.0, 3.0);
        let scene: Scene = [model_entity("m", 3, offset)].into_iter().collect();
        let out = flatten(&scene, TransformPolicy::AsAuthored);

        let authored = tri(0.0);
        assert_eq!(out.triangles[0].vertices()[0], authored.positions[0] + offset);

        let Shape::Model(model) = &scene.entities()[0].mesh.sub_meshes()[0].geometry.shape else {
            panic!("expected a model");
        };
        let root = model.bvh().root();
        assert_eq!(out.bounds[0].center, (root.center + offset).to_array());
        assert_eq!(out.bounds[0].radius, root.radius);
    }

    #[test]
    fn lone_triangle_ignores_transform_as_authored() {
        let scene: Scene = [lone_triangle_entity("t", Vec3::new(5.0, 5.0, 5.0))]
            .into_iter()
            .collect();
        let out = flatten(&scene, TransformPolicy::AsAuthored);

        assert_eq!(out.triangles[0].vertices(), tri(0.0).positions);
        assert_eq!(out.models[0], GpuModel { triangle_offset: 0, triangle_count: 1 });
        let expected = tri(0.0).bounding_sphere();
        assert_eq!(out.bounds[0].center, expected.center.to_array());
    }

    #[test]
    fn world_policy_moves_lone_shapes() {
        let at = Vec3::new(5.0, 0.0, 0.0);
        let mut scene = Scene::new();
        scene.push(lone_triangle_entity("t", at));
        scene.push(Entity::new(
            "s",
            Mesh::single("s", Geometry::sphere(Vec3::ZERO, 1.0, Material::default())),
            Transform::at(at),
        ));
        let out = flatten(&scene, TransformPolicy::World);

        assert_eq!(out.triangles[0].vertices()[0], tri(0.0).positions[0] + at);
        let bound_center = Vec3::from(out.bounds[0].center);
        assert!(bound_center.abs_diff_eq(tri(0.0).centroid() + at, 1e-5));
        assert_eq!(out.spheres[0].center, at.to_array());
    }

    #[test]
    fn bounds_track_models_and_lone_triangles() {
        let mut scene = Scene::new();
        scene.push(sphere_entity("a", Vec3::ZERO, 1.0, Vec3::ONE));
        scene.push(lone_triangle_entity("b", Vec3::ZERO));
        scene.push(model_entity("c", 4, Vec3::X));
        scene.push(sphere_entity("d", Vec3::ONE, 2.0, Vec3::ONE));
        scene.push(lone_triangle_entity("e", Vec3::ZERO));
        scene.push(model_entity("f", 2, Vec3::Y));
        let out = flatten(&scene, TransformPolicy::default());

        assert_eq!(out.models.len(), 4);
        assert_eq!(out.bounds.len(), out.models.len());
        assert_eq!(out.spheres.len(), 2);
        assert_eq!(out.surfaces.len(), 6);
        assert_eq!(out.triangles.len(), 1 + 4 + 1 + 2);

        let offsets: Vec<i32> = out.models.iter().map(|m| m.triangle_offset).collect();
        assert_eq!(offsets, vec![0, 1, 5, 6]);
    }

    #[test]
    fn surface_ids_follow_kernel_numbering() {
        let mut scene = Scene::new();
        scene.push(sphere_entity("a", Vec3::ZERO, 1.0, Vec3::ONE));
        scene.push(lone_triangle_entity("b", Vec3::ZERO));
        scene.push(model_entity("c", 4, Vec3::X));
        scene.push(sphere_entity("d", Vec3::ONE, 2.0, Vec3::ONE));
        scene.push(lone_triangle_entity("e", Vec3::ZERO));
        let out = flatten(&scene, TransformPolicy::default());

        assert_eq!(out.surface_ids, vec![0, 3, 1, 2, 4]);
        assert_eq!(out.surface_ids.len(), out.spheres.len() + out.models.len());
    }

    #[test]
    fn triangle_before_sphere_keeps_each_material() {
        let green = Vec3::new(0.0, 1.0, 0.0);
        let red = Vec3::new(1.0, 0.0, 0.0);
        let [a, b, c] = tri(0.0).positions;
        let mut scene = Scene::new();
        scene.push(Entity::new(
            "leaf",
            Mesh::single("leaf", Geometry::triangle(a, b, c, Material::diffuse(green))),
            Transform::IDENTITY,
        ));
        scene.push(sphere_entity("ball", Vec3::ZERO, 1.0, red));
        let out = flatten(&scene, TransformPolicy::default());

        // emission order is kept in the surface array itself
        assert_eq!(out.surfaces[0].color, green.to_array());
        assert_eq!(out.surfaces[1].color, red.to_array());

        let shade = |slot: usize| out.surfaces[out.surface_ids[slot] as usize].color;
        assert_eq!(shade(0), red.to_array());
        assert_eq!(shade(out.sphere_count as usize), green.to_array());
    }

    #[test]
    fn one_surface_per_model_sub_mesh() {
        let tris = vec![tri(0.0), tri(2.0), tri(4.0)];
        let mut mesh = Mesh::default();
        mesh.push(SubMesh::new("hull", Geometry::model(tris.clone(), Material::diffuse(Vec3::X))));
        mesh.push(SubMesh::new("deck", Geometry::model(tris, Material::diffuse(Vec3::Y))));
        let scene: Scene = [Entity::new("ship", mesh, Transform::IDENTITY)].into_iter().collect();
        let out = flatten(&scene, TransformPolicy::default());

        assert_eq!(out.surfaces.len(), 2);
        assert_eq!(out.surfaces[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(out.surfaces[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(out.models[1].triangle_offset, 3);
    }

    #[test]
    fn planes_are_skipped_without_surface() {
        let mut mesh = Mesh::default();
        mesh.push(SubMesh::new(
            "ground",
            Geometry::new(Shape::Plane { normal: Vec3::Y, offset: 0.0 }, Material::default()),
        ));
        mesh.push(SubMesh::new("ball", Geometry::sphere(Vec3::ZERO, 1.0, Material::diffuse(Vec3::Z))));
        let scene: Scene = [Entity::new("mixed", mesh, Transform::IDENTITY)].into_iter().collect();
        let out = flatten(&scene, TransformPolicy::default());

        assert_eq!(out.spheres.len(), 1);
        assert_eq!(out.surfaces.len(), 1);
        assert_eq!(out.surfaces[0].color, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn flattening_is_deterministic() {
        let scene = Scene::demo();
        assert_eq!(
            flatten(&scene, TransformPolicy::default()),
            flatten(&scene, TransformPolicy::default())
        );
    }
}
