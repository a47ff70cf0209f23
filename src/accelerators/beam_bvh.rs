//! A binary BVH over photon "beams" (the segments between two
//! consecutive vertices of one photon path). Building it also fills
//! in each path photon's segment direction and length; the emitter
//! only records vertex positions.

// others
use smallvec::SmallVec;
// pbrt
use crate::core::geometry::{bnd3_expand, bnd3_union_bnd3, bnd3_union_pnt3};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::pbrt::Float;
use crate::core::photon::PathPhoton;

const MAX_BEAMS_PER_NODE: usize = 4;

/// Visitor over candidate beams; `index` addresses the beam's
/// starting vertex in the path photon array (its terminal vertex is
/// the next record).
pub trait BeamVisitor {
    fn visit(&mut self, index: usize);
}

#[derive(Debug, Default, Copy, Clone)]
struct BeamNode {
    bounds: Bounds3f,
    // leaf: first beam offset; interior: index of the second child
    offset: usize,
    n_beams: usize,
}

pub struct BeamBvh {
    nodes: Vec<BeamNode>,
    beams: Vec<u32>,
}

fn beam_bounds(photon: &PathPhoton, radius: Float) -> Bounds3f {
    let mut bounds: Bounds3f = Bounds3f::default();
    bounds = bnd3_union_pnt3(&bounds, &photon.pos);
    bounds = bnd3_union_pnt3(&bounds, &(photon.pos + photon.dir * photon.length));
    bnd3_expand(&bounds, radius)
}

fn beam_centroid(photon: &PathPhoton) -> Point3f {
    photon.pos + photon.dir * (photon.length * 0.5 as Float)
}

fn build_node(
    nodes: &mut Vec<BeamNode>,
    path_photons: &[PathPhoton],
    beams: &mut [u32],
    first: usize,
    radius: Float,
) -> usize {
    let mut bounds: Bounds3f = Bounds3f::default();
    let mut centroid_bounds: Bounds3f = Bounds3f::default();
    for beam in beams.iter() {
        let photon: &PathPhoton = &path_photons[*beam as usize];
        bounds = bnd3_union_bnd3(&bounds, &beam_bounds(photon, radius));
        centroid_bounds = bnd3_union_pnt3(&centroid_bounds, &beam_centroid(photon));
    }
    let index: usize = nodes.len();
    nodes.push(BeamNode {
        bounds,
        offset: 0_usize,
        n_beams: 0_usize,
    });
    if beams.len() <= MAX_BEAMS_PER_NODE {
        nodes[index].offset = first;
        nodes[index].n_beams = beams.len();
    } else {
        let axis: XYZEnum = centroid_bounds.maximum_extent();
        beams.sort_unstable_by(|a, b| {
            beam_centroid(&path_photons[*a as usize])[axis]
                .partial_cmp(&beam_centroid(&path_photons[*b as usize])[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mid: usize = beams.len() / 2;
        let (left, right) = beams.split_at_mut(mid);
        build_node(nodes, path_photons, left, first, radius);
        let right_index: usize = build_node(nodes, path_photons, right, first + mid, radius);
        nodes[index].offset = right_index;
    }
    index
}

impl BeamBvh {
    /// Derive beams from consecutive same-path records (the bounce
    /// index increases by exactly one along a path and restarts at
    /// zero), fill in their directions and lengths, and build the
    /// hierarchy with every beam box padded by the volumetric gather
    /// radius.
    pub fn new(path_photons: &mut [PathPhoton], radius: Float) -> Self {
        let mut beams: Vec<u32> = Vec::new();
        for i in 0..path_photons.len().saturating_sub(1) {
            if path_photons[i + 1].info.bounce != path_photons[i].info.bounce + 1 {
                continue;
            }
            let segment: Vector3f = path_photons[i + 1].pos - path_photons[i].pos;
            let length: Float = segment.length();
            if length <= 0.0 as Float || !length.is_finite() {
                continue;
            }
            path_photons[i].dir = segment / length;
            path_photons[i].length = length;
            beams.push(i as u32);
        }
        let mut nodes: Vec<BeamNode> = Vec::new();
        if !beams.is_empty() {
            build_node(&mut nodes, path_photons, &mut beams[..], 0, radius);
        }
        BeamBvh { nodes, beams }
    }
    pub fn n_beams(&self) -> usize {
        self.beams.len()
    }
    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }
    /// Walk the hierarchy and hand every beam whose padded box the
    /// ray traverses to the visitor. The ray direction must be
    /// normalized.
    pub fn trace(&self, ray: &Ray, visitor: &mut dyn BeamVisitor) {
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
            let node: BeamNode = self.nodes[node_index];
            if !node.bounds.intersect_p(ray, &inv_dir) {
                continue;
            }
            if node.n_beams > 0 {
                for i in node.offset..node.offset + node.n_beams {
                    visitor.visit(self.beams[i] as usize);
                }
            } else {
                stack.push(node_index + 1);
                stack.push(node.offset);
            }
        }
    }
}
