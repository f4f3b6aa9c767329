use arrayvec::ArrayVec;

use crate::aabb::Aabb;
use crate::config::{LEAF_GROUP, MAX_BVH_DEPTH, MIN_LEAF_FACES};
use crate::error::RaytraceError;
use crate::ray::Ray;
use crate::triangle::Face;

/// Stage 1 of construction (spec §4.2): walk the face list in input
/// order and group every `LEAF_GROUP` consecutive faces into one
/// leaf-level AABB. This keeps the initial grouping cache-line coherent
/// before stage 2 reshuffles faces by spatial position. The last group
/// may be shorter than `LEAF_GROUP`.
pub fn flat_partition(faces: &[Face]) -> Vec<Aabb> {
    faces
        .chunks(LEAF_GROUP)
        .map(|chunk| {
            let mut aabb = Aabb::empty();
            for face in chunk {
                aabb = aabb.union(&face.aabb());
            }
            aabb
        })
        .collect()
}

struct BvhLeaf {
    first_index: usize,
    length: usize,
}

enum BvhNodeData {
    Branch { left: usize, right: usize },
    Leaf(BvhLeaf),
}

struct BvhNode {
    aabb: Aabb,
    data: BvhNodeData,
}

/// A bounding volume hierarchy over a mesh's triangles. Nodes live in a
/// single contiguous arena (`nodes`); children are referenced by index,
/// never by pointer, so there is no parent link and no cycle is
/// representable. Built once per mesh load and shared read-only by every
/// ray traced against it (see spec §5).
pub struct Bvh {
    /// Permutation of face indices into face-locality-grouped order;
    /// leaves reference contiguous ranges of this array.
    face_indices: Vec<usize>,
    nodes: Vec<BvhNode>,
}

impl Bvh {
    /// Builds the hierarchy over `faces`. Fails if `faces` is empty —
    /// spec §7 names an empty face list at BVH-build time as a fatal
    /// condition, not a routine one.
    pub fn build(faces: &[Face]) -> Result<Bvh, RaytraceError> {
        if faces.is_empty() {
            return Err(RaytraceError::EmptyMesh);
        }

        // Stage 1 seeds the root's bounds from coherent chunk boxes
        // rather than rescanning every vertex individually.
        let chunk_aabbs = flat_partition(faces);
        let root_aabb = chunk_aabbs
            .into_iter()
            .fold(Aabb::empty(), |acc, b| acc.union(&b));

        let mut face_indices: Vec<usize> = (0..faces.len()).collect();
        let mut nodes = Vec::with_capacity(faces.len() * 2 / LEAF_GROUP.max(1) + 2);

        nodes.push(BvhNode {
            aabb: root_aabb,
            data: BvhNodeData::Leaf(BvhLeaf { first_index: 0, length: faces.len() }),
        });

        subdivide(&mut nodes, 0, 0, &mut face_indices, faces);

        log::debug!("built bvh over {} faces in {} nodes", faces.len(), nodes.len());
        Ok(Bvh { face_indices, nodes })
    }

    pub fn root_aabb(&self) -> &Aabb {
        &self.nodes[0].aabb
    }

    /// Returns the set of candidate face indices whose leaf boxes the
    /// segment `(ray.origin, ray.dest)` enters, per spec §4.3. A superset
    /// of the faces that actually intersect the ray; the caller's
    /// intersector is responsible for picking the nearest real hit. The
    /// segment is taken literally — the caller must build `ray.dest` at
    /// the full length the search should cover (e.g. `origin + dir *
    /// ray_length`), not leave it at whatever distance a primary or
    /// reflection ray happened to originate with.
    pub fn candidates<'a>(&'a self, ray: &'a Ray) -> BvhCandidateIter<'a> {
        let mut stack = ArrayVec::new();
        stack.push(TraversalState::Node(0));
        BvhCandidateIter { bvh: self, stack, ray }
    }
}

/// Stage 2 of construction (spec §4.2): recursively subdivide the face
/// range owned by `node_index` on the longest axis of its box, at the
/// midpoint, assigning each face to whichever half its centroid falls
/// in (ties toward the lower half). Stops at `MIN_LEAF_FACES` or
/// `MAX_BVH_DEPTH`, or if a split would leave one side empty (a
/// degenerate split that subdividing further cannot fix).
fn subdivide(nodes: &mut Vec<BvhNode>, node_index: usize, depth: u32, face_indices: &mut [usize], faces: &[Face]) {
    let leaf = match &nodes[node_index].data {
        BvhNodeData::Leaf(leaf) => leaf,
        BvhNodeData::Branch { .. } => unreachable!("subdivide called on an already-split node"),
    };
    let first = leaf.first_index;
    let length = leaf.length;

    if length <= MIN_LEAF_FACES || depth >= MAX_BVH_DEPTH {
        return;
    }

    let axis = nodes[node_index].aabb.longest_axis();
    let split_pos = nodes[node_index].aabb.midpoint(axis);

    let range = &mut face_indices[first..first + length];
    let mut i = 0;
    let mut j = range.len();
    while i < j {
        let centroid = faces[range[i]].centroid();
        let value = [centroid.x(), centroid.y(), centroid.z()][axis];
        if value <= split_pos {
            i += 1;
        } else {
            j -= 1;
            range.swap(i, j);
        }
    }
    let left_len = i;
    let right_len = length - left_len;

    if left_len == 0 || right_len == 0 {
        return;
    }

    let left_leaf = BvhLeaf { first_index: first, length: left_len };
    let right_leaf = BvhLeaf { first_index: first + left_len, length: right_len };

    let left_aabb = subset_aabb(face_indices, left_leaf.first_index, left_leaf.length, faces);
    let right_aabb = subset_aabb(face_indices, right_leaf.first_index, right_leaf.length, faces);

    let left_index = nodes.len();
    nodes.push(BvhNode { aabb: left_aabb, data: BvhNodeData::Leaf(left_leaf) });
    let right_index = nodes.len();
    nodes.push(BvhNode { aabb: right_aabb, data: BvhNodeData::Leaf(right_leaf) });

    nodes[node_index].data = BvhNodeData::Branch { left: left_index, right: right_index };

    subdivide(nodes, left_index, depth + 1, face_indices, faces);
    subdivide(nodes, right_index, depth + 1, face_indices, faces);
}

fn subset_aabb(face_indices: &[usize], first: usize, length: usize, faces: &[Face]) -> Aabb {
    let mut aabb = Aabb::empty();
    for &idx in &face_indices[first..first + length] {
        aabb = aabb.union(&faces[idx].aabb());
    }
    aabb
}

enum TraversalState {
    Node(usize),
    /// A leaf whose faces are being emitted one at a time: (node_index, next offset).
    LeafFaces(usize, usize),
}

pub struct BvhCandidateIter<'a> {
    bvh: &'a Bvh,
    stack: ArrayVec<TraversalState, 64>,
    ray: &'a Ray,
}

impl<'a> Iterator for BvhCandidateIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            match self.stack.pop()? {
                TraversalState::Node(node_index) => {
                    let node = &self.bvh.nodes[node_index];
                    if !node.aabb.hit_ray(self.ray) {
                        continue;
                    }
                    match node.data {
                        BvhNodeData::Branch { left, right } => {
                            self.stack.push(TraversalState::Node(left));
                            self.stack.push(TraversalState::Node(right));
                        }
                        BvhNodeData::Leaf(_) => {
                            self.stack.push(TraversalState::LeafFaces(node_index, 0));
                        }
                    }
                }
                TraversalState::LeafFaces(node_index, offset) => {
                    let leaf = match &self.bvh.nodes[node_index].data {
                        BvhNodeData::Leaf(leaf) => leaf,
                        BvhNodeData::Branch { .. } => unreachable!(),
                    };
                    if offset < leaf.length {
                        self.stack.push(TraversalState::LeafFaces(node_index, offset + 1));
                        return Some(self.bvh.face_indices[leaf.first_index + offset]);
                    }
                }
            }
        }
    }
}
