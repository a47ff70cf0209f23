//! A median-split tree over photon points with flattened nodes. Two
//! queries run against it: a bounded k-nearest-neighbour search
//! filling caller-owned scratch buffers (surface gather), and a beam
//! query invoking a visitor for every stored photon whose kernel disc
//! overlaps a ray segment (volumetric gather).

// others
use smallvec::SmallVec;
// pbrt
use crate::core::geometry::{
    bnd3_expand, bnd3_union_pnt3, pnt3_distance_squared_bnd3, pnt3_distance_squaredf,
    vec3_dot_vec3f,
};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::pbrt::Float;
use crate::core::photon::{Photon, VolumePhoton};

const MAX_PHOTONS_PER_NODE: usize = 8;

pub trait PhotonPosition {
    fn position(&self) -> Point3f;
}

impl PhotonPosition for Photon {
    fn position(&self) -> Point3f {
        self.pos
    }
}

impl PhotonPosition for VolumePhoton {
    fn position(&self) -> Point3f {
        self.pos
    }
}

/// Visitor over volume photons whose kernel disc overlaps the
/// queried ray segment; `t` is the distance of the closest approach
/// along the ray and `dist_sq` the squared perpendicular distance.
pub trait VolumePhotonVisitor {
    fn visit(&mut self, photon: &VolumePhoton, t: Float, dist_sq: Float);
}

#[derive(Debug, Default, Copy, Clone)]
struct KdNode {
    bounds: Bounds3f,
    // leaf: first photon offset; interior: index of the second child
    // (the first child immediately follows the node)
    offset: usize,
    n_photons: usize,
}

pub struct PhotonKdTree<T> {
    pub photons: Vec<T>,
    nodes: Vec<KdNode>,
    max_radius: Float,
}

fn build_node<T: PhotonPosition>(nodes: &mut Vec<KdNode>, photons: &mut [T], first: usize) -> usize {
    let mut bounds: Bounds3f = Bounds3f::default();
    for photon in photons.iter() {
        bounds = bnd3_union_pnt3(&bounds, &photon.position());
    }
    let index: usize = nodes.len();
    nodes.push(KdNode {
        bounds,
        offset: 0_usize,
        n_photons: 0_usize,
    });
    if photons.len() <= MAX_PHOTONS_PER_NODE {
        nodes[index].offset = first;
        nodes[index].n_photons = photons.len();
    } else {
        let axis: XYZEnum = bounds.maximum_extent();
        photons.sort_unstable_by(|a, b| {
            a.position()[axis]
                .partial_cmp(&b.position()[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mid: usize = photons.len() / 2;
        let (left, right) = photons.split_at_mut(mid);
        build_node(nodes, left, first);
        let right_index: usize = build_node(nodes, right, first + mid);
        nodes[index].offset = right_index;
    }
    index
}

// scratch buffers form a max-heap keyed on distance, farthest at the
// root, so a saturated gather can read its effective radius from
// slot 0
fn sift_up(photon_query: &mut [u32], distance_query: &mut [Float], mut i: usize) {
    while i > 0 {
        let parent: usize = (i - 1) / 2;
        if distance_query[i] <= distance_query[parent] {
            break;
        }
        distance_query.swap(i, parent);
        photon_query.swap(i, parent);
        i = parent;
    }
}

fn sift_down(photon_query: &mut [u32], distance_query: &mut [Float], count: usize) {
    let mut i: usize = 0;
    loop {
        let left: usize = 2 * i + 1;
        if left >= count {
            break;
        }
        let mut largest: usize = left;
        let right: usize = left + 1;
        if right < count && distance_query[right] > distance_query[left] {
            largest = right;
        }
        if distance_query[largest] <= distance_query[i] {
            break;
        }
        distance_query.swap(i, largest);
        photon_query.swap(i, largest);
        i = largest;
    }
}

impl<T: PhotonPosition> PhotonKdTree<T> {
    pub fn new(photons: Vec<T>) -> Self {
        Self::with_max_radius(photons, 0.0 as Float)
    }
    fn with_max_radius(mut photons: Vec<T>, max_radius: Float) -> Self {
        let mut nodes: Vec<KdNode> = Vec::new();
        if !photons.is_empty() {
            build_node(&mut nodes, &mut photons[..], 0);
        }
        PhotonKdTree {
            photons,
            nodes,
            max_radius,
        }
    }
    pub fn len(&self) -> usize {
        self.photons.len()
    }
    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }
    /// Bounded k-nearest-neighbour query. Fills the scratch buffers
    /// with photon indices and squared distances and returns how many
    /// were found; the farthest squared distance sits in
    /// `distance_query[0]`. No allocation happens here, the scratch
    /// buffers are reused across calls.
    pub fn nearest_neighbours(
        &self,
        p: &Point3f,
        photon_query: &mut [u32],
        distance_query: &mut [Float],
        max_count: usize,
        max_radius: Float,
    ) -> usize {
        if self.nodes.is_empty() || max_count == 0 {
            return 0;
        }
        let mut count: usize = 0;
        let mut search_radius_sq: Float = max_radius * max_radius;
        let mut stack: SmallVec<[usize; 64]> = SmallVec::new();
        stack.push(0_usize);
        while let Some(node_index) = stack.pop() {
            let node: KdNode = self.nodes[node_index];
            if pnt3_distance_squared_bnd3(p, &node.bounds) > search_radius_sq {
                continue;
            }
            if node.n_photons > 0 {
                for i in node.offset..node.offset + node.n_photons {
                    let dist_sq: Float = pnt3_distance_squaredf(p, &self.photons[i].position());
                    if dist_sq >= search_radius_sq {
                        continue;
                    }
                    if count < max_count {
                        photon_query[count] = i as u32;
                        distance_query[count] = dist_sq;
                        count += 1;
                        sift_up(photon_query, distance_query, count - 1);
                        if count == max_count {
                            search_radius_sq = distance_query[0];
                        }
                    } else {
                        photon_query[0] = i as u32;
                        distance_query[0] = dist_sq;
                        sift_down(photon_query, distance_query, count);
                        search_radius_sq = distance_query[0];
                    }
                }
            } else {
                stack.push(node_index + 1);
                stack.push(node.offset);
            }
        }
        count
    }
}

impl PhotonKdTree<VolumePhoton> {
    /// Build the volume photon index, stamping the squared kernel
    /// radius into every photon. The emitter never touches that
    /// field.
    pub fn build_volume(mut photons: Vec<VolumePhoton>, radius: Float) -> Self {
        for photon in &mut photons {
            photon.radius_sq = radius * radius;
        }
        Self::with_max_radius(photons, radius)
    }
    /// Visit every stored photon whose kernel disc overlaps the ray
    /// within `[t_min, t_max]`. The ray direction must be normalized.
    pub fn beam_query(&self, ray: &Ray, visitor: &mut dyn VolumePhotonVisitor) {
        if self.nodes.is_empty() {
            return;
        }
        let inv_dir: Vector3f = Vector3f {
            x: 1.0 as Float / ray.d.x,
            y: 1.0 as Float / ray.d.y,
            z: 1.0 as Float / ray.d.z,
        };
        let mut stack: SmallVec<[usize; 64]> = SmallVec::new();
        stack.push(0_usize);
        while let Some(node_index) = stack.pop() {
            let node: KdNode = self.nodes[node_index];
            let expanded: Bounds3f = bnd3_expand(&node.bounds, self.max_radius);
            if !expanded.intersect_p(ray, &inv_dir) {
                continue;
            }
            if node.n_photons > 0 {
                for i in node.offset..node.offset + node.n_photons {
                    let photon: &VolumePhoton = &self.photons[i];
                    let to_photon: Vector3f = photon.pos - ray.o;
                    let t: Float = vec3_dot_vec3f(&to_photon, &ray.d);
                    if t < ray.t_min || t > ray.t_max {
                        continue;
                    }
                    let dist_sq: Float = (to_photon.length_squared() - t * t).max(0.0 as Float);
                    if dist_sq < photon.radius_sq {
                        visitor.visit(photon, t, dist_sq);
                    }
                }
            } else {
                stack.push(node_index + 1);
                stack.push(node.offset);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::pbrt::Spectrum;
    use crate::core::rng::Rng;

    fn random_photons(n: usize, seed: u64) -> Vec<Photon> {
        let mut rng = Rng::new();
        rng.set_sequence(seed);
        (0..n)
            .map(|i| Photon {
                pos: Point3f {
                    x: rng.uniform_float() * 10.0 - 5.0,
                    y: rng.uniform_float() * 10.0 - 5.0,
                    z: rng.uniform_float() * 10.0 - 5.0,
                },
                dir: Vector3f {
                    x: 0.0,
                    y: 0.0,
                    z: 1.0,
                },
                power: Spectrum::new(1.0),
                bounce: i as i32,
            })
            .collect()
    }

    #[test]
    fn knn_matches_brute_force() {
        let photons = random_photons(500, 42);
        let tree = PhotonKdTree::new(photons.clone());
        let query = Point3f {
            x: 0.5,
            y: -0.25,
            z: 1.0,
        };
        let k: usize = 16;
        let mut photon_query: Vec<u32> = vec![0; k];
        let mut distance_query: Vec<Float> = vec![0.0; k];
        let count =
            tree.nearest_neighbours(&query, &mut photon_query, &mut distance_query, k, 100.0);
        assert_eq!(count, k);
        let mut brute: Vec<Float> = photons
            .iter()
            .map(|p| pnt3_distance_squaredf(&query, &p.pos))
            .collect();
        brute.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
        let mut found: Vec<Float> = distance_query[..count].to_vec();
        found.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
        for i in 0..k {
            assert!(
                (found[i] - brute[i]).abs() < 1e-5,
                "neighbour {} mismatch: {} vs {}",
                i,
                found[i],
                brute[i]
            );
        }
        // the heap root holds the farthest accepted distance
        assert!((distance_query[0] - brute[k - 1]).abs() < 1e-5);
    }

    #[test]
    fn knn_respects_search_radius() {
        let photons = random_photons(200, 3);
        let tree = PhotonKdTree::new(photons.clone());
        let query = Point3f::default();
        let radius: Float = 1.5;
        let k: usize = 64;
        let mut photon_query: Vec<u32> = vec![0; k];
        let mut distance_query: Vec<Float> = vec![0.0; k];
        let count =
            tree.nearest_neighbours(&query, &mut photon_query, &mut distance_query, k, radius);
        let expected = photons
            .iter()
            .filter(|p| pnt3_distance_squaredf(&query, &p.pos) < radius * radius)
            .count();
        assert_eq!(count, expected.min(k));
        for i in 0..count {
            assert!(distance_query[i] < radius * radius);
        }
    }

    #[test]
    fn empty_tree_returns_nothing() {
        let tree: PhotonKdTree<Photon> = PhotonKdTree::new(Vec::new());
        let mut photon_query: Vec<u32> = vec![0; 4];
        let mut distance_query: Vec<Float> = vec![0.0; 4];
        assert_eq!(
            tree.nearest_neighbours(
                &Point3f::default(),
                &mut photon_query,
                &mut distance_query,
                4,
                10.0
            ),
            0
        );
    }

    struct CountingVisitor {
        visited: Vec<(Float, Float)>,
    }

    impl VolumePhotonVisitor for CountingVisitor {
        fn visit(&mut self, _photon: &VolumePhoton, t: Float, dist_sq: Float) {
            self.visited.push((t, dist_sq));
        }
    }

    #[test]
    fn beam_query_finds_overlapping_discs() {
        let mut photons: Vec<VolumePhoton> = Vec::new();
        // one photon near the ray, one far away, one behind the origin
        for (i, pos) in [
            Point3f {
                x: 0.2,
                y: 0.0,
                z: 3.0,
            },
            Point3f {
                x: 5.0,
                y: 5.0,
                z: 3.0,
            },
            Point3f {
                x: 0.0,
                y: 0.1,
                z: -2.0,
            },
        ]
        .iter()
        .enumerate()
        {
            photons.push(VolumePhoton {
                pos: *pos,
                dir: Vector3f {
                    x: 1.0,
                    y: 0.0,
                    z: 0.0,
                },
                power: Spectrum::new(1.0),
                bounce: i as i32,
                radius_sq: 0.0,
            });
        }
        let tree = PhotonKdTree::build_volume(photons, 0.5);
        let ray = Ray::new(
            Point3f::default(),
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        let mut visitor = CountingVisitor {
            visited: Vec::new(),
        };
        tree.beam_query(&ray, &mut visitor);
        assert_eq!(visitor.visited.len(), 1);
        let (t, dist_sq) = visitor.visited[0];
        assert!((t - 3.0).abs() < 1e-4);
        assert!((dist_sq - 0.04).abs() < 1e-4);
    }
}
