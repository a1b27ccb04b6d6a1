//! Bounding-sphere hierarchy over a model's triangles.
//!
//! Built once when a `ModelShape` is created. The flattener only consumes the
//! root sphere; the full node array is kept for CPU-side queries.

use glam::Vec3;

use super::geometry::TriangleShape;

/// Maximum triangles per leaf before a node is split.
const MAX_LEAF_SIZE: usize = 4;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere centered on the mean of `points`, reaching the farthest one.
    ///
    /// Not minimal, but stable and cheap. An empty input yields a zero-radius
    /// sphere at the origin.
    pub fn enclosing(points: impl IntoIterator<Item = Vec3> + Clone) -> Self {
        let (sum, count) = points
            .clone()
            .into_iter()
            .fold((Vec3::ZERO, 0u32), |(s, n), p| (s + p, n + 1));
        if count == 0 {
            return Self::default();
        }

        let center = sum / count as f32;
        let radius = points
            .into_iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        Self::new(center, radius)
    }

    pub fn translated(self, offset: Vec3) -> Self {
        Self::new(self.center + offset, self.radius)
    }

    pub fn contains(&self, p: Vec3, tolerance: f32) -> bool {
        p.distance(self.center) <= self.radius + tolerance
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BvhNodeKind {
    /// Range into `BoundingHierarchy::triangle_order`.
    Leaf { first: usize, count: usize },
    Inner { left: usize, right: usize },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BvhNode {
    pub sphere: BoundingSphere,
    pub kind: BvhNodeKind,
}

/// Flat node array, index 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingHierarchy {
    nodes: Vec<BvhNode>,
    triangle_order: Vec<usize>,
}

impl BoundingHierarchy {
    /// Builds the hierarchy by median split on the longest centroid axis.
    pub fn build(triangles: &[TriangleShape]) -> Self {
        let n = triangles.len();
        let centroids: Vec<Vec3> = triangles.iter().map(TriangleShape::centroid).collect();
        let mut order: Vec<usize> = (0..n).collect();

        let mut nodes = vec![BvhNode {
            sphere: BoundingSphere::default(),
            kind: BvhNodeKind::Leaf { first: 0, count: n },
        }];

        struct Task {
            node: usize,
            start: usize,
            end: usize,
        }

        let mut stack = vec![Task { node: 0, start: 0, end: n }];

        while let Some(Task { node, start, end }) = stack.pop() {
            let range = &order[start..end];
            let sphere = BoundingSphere::enclosing(
                range
                    .iter()
                    .flat_map(move |&i| triangles[i].positions.iter().copied()),
            );

            if end - start <= MAX_LEAF_SIZE {
                nodes[node] = BvhNode {
                    sphere,
                    kind: BvhNodeKind::Leaf { first: start, count: end - start },
                };
                continue;
            }

            let (lo, hi) = range.iter().fold(
                (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
                |(lo, hi), &i| (lo.min(centroids[i]), hi.max(centroids[i])),
            );
            let axis = longest_axis(hi - lo);

            order[start..end].sort_by(|&a, &b| centroids[a][axis].total_cmp(&centroids[b][axis]));
            let mid = start + (end - start) / 2;

            let left = nodes.len();
            let right = left + 1;
            let placeholder = BvhNode {
                sphere: BoundingSphere::default(),
                kind: BvhNodeKind::Leaf { first: 0, count: 0 },
            };
            nodes.push(placeholder);
            nodes.push(placeholder);

            nodes[node] = BvhNode {
                sphere,
                kind: BvhNodeKind::Inner { left, right },
            };

            stack.push(Task { node: right, start: mid, end });
            stack.push(Task { node: left, start, end: mid });
        }

        Self { nodes, triangle_order: order }
    }

    pub fn root(&self) -> BoundingSphere {
        self.nodes[0].sphere
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Triangle indices in leaf order.
    pub fn triangle_order(&self) -> &[usize] {
        &self.triangle_order
    }
}

fn longest_axis(extent: Vec3) -> usize {
    if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<TriangleShape> {
        (0..n)
            .map(|i| {
                let x = i as f32 * 2.0;
                TriangleShape::new(
                    Vec3::new(x, 0.0, 0.0),
                    Vec3::new(x + 1.0, 0.0, 0.0),
                    Vec3::new(x, 1.0, (i % 3) as f32),
                )
            })
            .collect()
    }

    #[test]
    fn empty_model_has_degenerate_root() {
        let bvh = BoundingHierarchy::build(&[]);
        assert_eq!(bvh.root(), BoundingSphere::default());
        assert_eq!(bvh.nodes().len(), 1);
    }

    #[test]
    fn small_model_is_a_single_leaf() {
        let bvh = BoundingHierarchy::build(&grid(3));
        assert_eq!(bvh.nodes().len(), 1);
        assert_eq!(bvh.nodes()[0].kind, BvhNodeKind::Leaf { first: 0, count: 3 });
    }

    #[test]
    fn every_node_encloses_its_triangles() {
        let tris = grid(37);
        let bvh = BoundingHierarchy::build(&tris);

        for node in bvh.nodes() {
            if let BvhNodeKind::Leaf { first, count } = node.kind {
                for &i in &bvh.triangle_order()[first..first + count] {
                    for p in tris[i].positions {
                        assert!(node.sphere.contains(p, 1e-4));
                    }
                }
            }
        }
    }

    #[test]
    fn root_encloses_every_vertex() {
        let tris = grid(20);
        let bvh = BoundingHierarchy::build(&tris);
        let root = bvh.root();
        for t in &tris {
            for p in t.positions {
                assert!(root.contains(p, 1e-4));
            }
        }
    }

    #[test]
    fn leaves_cover_each_triangle_once() {
        let tris = grid(23);
        let bvh = BoundingHierarchy::build(&tris);

        let mut covered: Vec<usize> = bvh
            .nodes()
            .iter()
            .filter_map(|n| match n.kind {
                BvhNodeKind::Leaf { first, count } => Some(first..first + count),
                BvhNodeKind::Inner { .. } => None,
            })
            .flatten()
            .map(|slot| bvh.triangle_order()[slot])
            .collect();
        covered.sort_unstable();

        assert_eq!(covered, (0..23).collect::<Vec<_>>());
    }

    #[test]
    fn enclosing_centers_on_mean() {
        let s = BoundingSphere::enclosing([Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        assert_eq!(s.center, Vec3::ZERO);
        assert_eq!(s.radius, 1.0);
    }
}
