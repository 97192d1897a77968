// Binned SAH bounding volume hierarchy over the faces of a mesh, used for the
// any-hit queries of the accelerated intersector.

use crate::mesh::{Mesh, RayIntInfo};
use arrayvec::ArrayVec;
use log::debug;
use order_stat::kth_by;
use partition::partition;
use pmath::bbox::BBox3;
use pmath::ray::Ray;
use pmath::vector::Vec3;
use std::cmp::Ordering;

const INTERSECT_STACK_SIZE: usize = 64;

/// A BVH over the faces of a `Mesh`. It only stores face indices, so the mesh it was
/// built from has to be passed back in when querying it. Once built it's read-only and
/// can be shared between threads and reused across any number of queries.
#[derive(Clone, Debug)]
pub struct MeshBVH {
    faces: Vec<u32>,
    nodes: Vec<Node>,
}

impl MeshBVH {
    const SAH_BIN_COUNT: usize = 12;
    // Keeps the traversal stack from ever overflowing:
    const MAX_DEPTH: usize = INTERSECT_STACK_SIZE - 8;

    /// Constructs a BVH over all of the faces of the mesh.
    ///
    /// # Arguments
    /// * `mesh` - The mesh whose faces are being indexed.
    /// * `max_faces_per_leaf` - Leaves larger than this are always split when possible.
    pub fn new(mesh: Mesh, max_faces_per_leaf: usize) -> Self {
        let max_faces_per_leaf = max_faces_per_leaf.max(1);

        let mut face_infos: Vec<_> = (0..mesh.num_faces())
            .map(|index| FaceInfo {
                index: index as u32,
                bbox: mesh.face_bound(index),
                centroid: mesh.face_centroid(index),
            })
            .collect();

        let mut nodes = Vec::new();
        let mut ordered_faces = Vec::with_capacity(face_infos.len());
        if !face_infos.is_empty() {
            Self::rec_construct_bvh(
                &mut face_infos,
                &mut ordered_faces,
                &mut nodes,
                max_faces_per_leaf,
                0,
            );
        }

        nodes.shrink_to_fit();
        debug!(
            "built BVH with {} nodes over {} faces",
            nodes.len(),
            ordered_faces.len()
        );

        MeshBVH {
            faces: ordered_faces,
            nodes,
        }
    }

    /// The number of faces the BVH was built over.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Bound over every face, or `None` if the BVH is empty.
    pub fn bound(&self) -> Option<BBox3<f64>> {
        self.nodes.first().map(|node| node.bbox)
    }

    /// Returns true if the ray hits any face at all. Stops at the first hit found.
    /// `mesh` must be the mesh the BVH was built over.
    pub fn intersect_test(&self, mesh: Mesh, ray: Ray<f64>) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let inv_dir = ray.dir.inv_scale(1.);
        let is_dir_neg = ray.dir.comp_wise_is_neg();
        let int_info = RayIntInfo::new(ray);

        let mut stack = ArrayVec::<[usize; INTERSECT_STACK_SIZE]>::new();
        let mut node_index = 0;

        loop {
            let node = self.nodes[node_index];
            if node.bbox.intersect_test(ray, inv_dir) {
                match node.node_type {
                    NodeType::Leaf { index, count } => {
                        for &face in &self.faces[index..(index + count)] {
                            if mesh.intersect_test_face(face as usize, ray, &int_info) {
                                return true;
                            }
                        }
                    }
                    NodeType::Internal { axis, second } => {
                        // Visit the child that's closer along the ray first:
                        if is_dir_neg[axis] {
                            stack.push(node_index + 1);
                            node_index = second;
                        } else {
                            stack.push(second);
                            node_index += 1;
                        }
                        continue;
                    }
                }
            }

            node_index = match stack.pop() {
                Some(node_index) => node_index,
                None => return false,
            };
        }
    }

    /// Recursively constructs the tree. Nodes are laid out depth first, so the first
    /// child of an internal node is always the node right after it.
    ///
    /// # Arguments
    /// * `face_infos` - The faces we are trying to split. Gets reordered as we go.
    /// * `ordered_faces` - The final order of the faces so that the leaves can index them.
    /// * `nodes` - Where the nodes get pushed.
    fn rec_construct_bvh(
        face_infos: &mut [FaceInfo],
        ordered_faces: &mut Vec<u32>,
        nodes: &mut Vec<Node>,
        max_per_leaf: usize,
        depth: usize,
    ) {
        let bbox = face_infos
            .iter()
            .fold(BBox3::new(), |accum, face_info| accum.combine_bnd(face_info.bbox));

        let split = if face_infos.len() == 1 || depth >= Self::MAX_DEPTH {
            None
        } else {
            Self::split_faces(face_infos, bbox, max_per_leaf)
        };

        let (mid, axis) = match split {
            Some(split) => split,
            None => {
                let index = ordered_faces.len();
                ordered_faces.extend(face_infos.iter().map(|face_info| face_info.index));
                nodes.push(Node {
                    bbox,
                    node_type: NodeType::Leaf {
                        index,
                        count: face_infos.len(),
                    },
                });
                return;
            }
        };

        // Patched once we know where the second child lands:
        let node_index = nodes.len();
        nodes.push(Node {
            bbox,
            node_type: NodeType::Leaf { index: 0, count: 0 },
        });

        let (left, right) = face_infos.split_at_mut(mid);
        Self::rec_construct_bvh(left, ordered_faces, nodes, max_per_leaf, depth + 1);
        let second = nodes.len();
        Self::rec_construct_bvh(right, ordered_faces, nodes, max_per_leaf, depth + 1);

        nodes[node_index].node_type = NodeType::Internal { axis, second };
    }

    /// Attempts to split the faces. Returns the split position (everything before it goes
    /// to the first child) and the axis, or `None` if a leaf should be made instead.
    fn split_faces(
        face_infos: &mut [FaceInfo],
        bbox: BBox3<f64>,
        max_per_leaf: usize,
    ) -> Option<(usize, usize)> {
        let centroid_bound = face_infos
            .iter()
            .fold(BBox3::new(), |accum, face_info| {
                accum.combine_pnt(face_info.centroid)
            });

        // Every centroid is in the same spot, there is nothing to split on:
        let centroid_diagonal = centroid_bound.diagonal();
        if !(centroid_diagonal[centroid_bound.max_dim()] > 0.) {
            return None;
        }

        let total_sa = bbox.surface_area();
        if !(total_sa > 0.) {
            // Flat bounds make the SAH meaningless, just split at the median:
            let axis = centroid_bound.max_dim();
            let mid = face_infos.len() / 2;
            kth_by(face_infos, mid, |a, b| {
                a.centroid[axis]
                    .partial_cmp(&b.centroid[axis])
                    .unwrap_or(Ordering::Equal)
            });
            return Some((mid, axis));
        }

        let bin_index = |centroid: Vec3<f64>, axis: usize| {
            let b = (Self::SAH_BIN_COUNT as f64) * centroid_bound.offset(centroid)[axis];
            if b >= (Self::SAH_BIN_COUNT as f64) {
                Self::SAH_BIN_COUNT - 1
            } else {
                b.floor() as usize
            }
        };

        let mut min_cost = std::f64::INFINITY;
        let mut min_bin = 0;
        let mut min_axis = 0;

        for axis in 0..3 {
            if !(centroid_diagonal[axis] > 0.) {
                continue;
            }

            let mut bins = [SAHBin::new(); Self::SAH_BIN_COUNT];
            for face_info in face_infos.iter() {
                let b = bin_index(face_info.centroid, axis);
                bins[b] = bins[b].add_face(face_info.bbox);
            }

            for b in 0..(Self::SAH_BIN_COUNT - 1) {
                let left = bins[..=b]
                    .iter()
                    .fold(SAHBin::new(), |accum, bin| accum.combine(*bin));
                let right = bins[(b + 1)..]
                    .iter()
                    .fold(SAHBin::new(), |accum, bin| accum.combine(*bin));

                let cost = 1. + (left.cost() + right.cost()) / total_sa;
                if cost < min_cost {
                    min_cost = cost;
                    min_bin = b;
                    min_axis = axis;
                }
            }
        }

        // Assuming every face costs 1 to intersect, a split is only worth it if it's cheaper
        // than intersecting everything (unless the leaf would be too big):
        if face_infos.len() <= max_per_leaf && min_cost >= (face_infos.len() as f64) {
            return None;
        }

        let (left, _) = partition(face_infos, |face_info| {
            bin_index(face_info.centroid, min_axis) <= min_bin
        });

        Some((left.len(), min_axis))
    }
}

#[derive(Clone, Copy, Debug)]
struct Node {
    bbox: BBox3<f64>,
    node_type: NodeType,
}

#[derive(Clone, Copy, Debug)]
enum NodeType {
    Internal {
        axis: usize,   // The axis where we split
        second: usize, // The first child directly follows this node
    },
    Leaf {
        index: usize, // Range into the ordered faces
        count: usize,
    },
}

#[derive(Clone, Copy, Debug)]
struct FaceInfo {
    index: u32,
    bbox: BBox3<f64>,
    centroid: Vec3<f64>,
}

#[derive(Clone, Copy, Debug)]
struct SAHBin {
    bbox: BBox3<f64>,
    count: u32,
}

impl SAHBin {
    fn new() -> Self {
        SAHBin {
            bbox: BBox3::new(),
            count: 0,
        }
    }

    fn combine(self, o: SAHBin) -> Self {
        SAHBin {
            bbox: self.bbox.combine_bnd(o.bbox),
            count: self.count + o.count,
        }
    }

    fn add_face(self, bbox: BBox3<f64>) -> Self {
        SAHBin {
            bbox: self.bbox.combine_bnd(bbox),
            count: self.count + 1,
        }
    }

    // An empty bin has an inverted bound, so its area can't be used:
    fn cost(self) -> f64 {
        if self.count == 0 {
            0.
        } else {
            (self.count as f64) * self.bbox.surface_area()
        }
    }
}
