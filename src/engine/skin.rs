// Skin modifier: converts a SkinGraph (a set of box-shaped nodes) into a PolyMesh.
//
// Every node becomes a closed axis-aligned box. Overlapping boxes are left as
// separate shells; run the result through Catmull-Clark to round them into
// organic blobs (fish bodies, fins, tails).

use glam::Vec3;
use super::mesh::PolyMesh;

// ============================================================================
// SKIN GRAPH
// ============================================================================

/// A node in the skin graph: a 3D point with per-axis half extents.
pub struct SkinNode {
    pub position:     Vec3,
    pub half_extents: Vec3,
}

/// Input graph for the skin modifier.
pub struct SkinGraph {
    pub nodes: Vec<SkinNode>,
}

impl SkinGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a box node. Returns its index.
    pub fn add_node(&mut self, position: Vec3, half_extents: Vec3) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(SkinNode { position, half_extents });
        idx
    }

    /// Add a cube node with the same half extent on every axis.
    pub fn add_cube_node(&mut self, position: Vec3, radius: f32) -> usize {
        self.add_node(position, Vec3::splat(radius))
    }
}

// ============================================================================
// SKIN MODIFIER
// ============================================================================

/// Convert a SkinGraph into a PolyMesh: one closed box shell per node.
pub fn skin_modifier(graph: &SkinGraph) -> PolyMesh {
    let mut mesh = PolyMesh::new();
    for node in &graph.nodes {
        skin_box(node, &mut mesh);
    }
    mesh
}

/// Generate a box PolyMesh around a node.
/// All 6 faces use CCW winding viewed from outside (consistent with back-face culling).
///
/// Vertex layout (relative offsets from center p, half extents h):
///   0: (-x, -y, +z)  front-bottom-left
///   1: (+x, -y, +z)  front-bottom-right
///   2: (+x, +y, +z)  front-top-right
///   3: (-x, +y, +z)  front-top-left
///   4: (+x, -y, -z)  back-bottom-right
///   5: (-x, -y, -z)  back-bottom-left
///   6: (-x, +y, -z)  back-top-left
///   7: (+x, +y, -z)  back-top-right
///
/// Winding check (front face [0,1,2,3]):
///   N = (v1-v0) × (v3-v0) = (2x,0,0) × (0,2y,0) = (0,0,4xy) → +Z (outward)
fn skin_box(node: &SkinNode, mesh: &mut PolyMesh) {
    let p = node.position;
    let h = node.half_extents;

    let base = mesh.vertex_count();
    mesh.add_vertex(Vec3::new(p.x - h.x, p.y - h.y, p.z + h.z)); // 0
    mesh.add_vertex(Vec3::new(p.x + h.x, p.y - h.y, p.z + h.z)); // 1
    mesh.add_vertex(Vec3::new(p.x + h.x, p.y + h.y, p.z + h.z)); // 2
    mesh.add_vertex(Vec3::new(p.x - h.x, p.y + h.y, p.z + h.z)); // 3
    mesh.add_vertex(Vec3::new(p.x + h.x, p.y - h.y, p.z - h.z)); // 4
    mesh.add_vertex(Vec3::new(p.x - h.x, p.y - h.y, p.z - h.z)); // 5
    mesh.add_vertex(Vec3::new(p.x - h.x, p.y + h.y, p.z - h.z)); // 6
    mesh.add_vertex(Vec3::new(p.x + h.x, p.y + h.y, p.z - h.z)); // 7

    let v = |i: usize| base + i;
    mesh.add_face(vec![v(0), v(1), v(2), v(3)]); // front  (+Z)
    mesh.add_face(vec![v(4), v(5), v(6), v(7)]); // back   (-Z)
    mesh.add_face(vec![v(5), v(0), v(3), v(6)]); // left   (-X)
    mesh.add_face(vec![v(1), v(4), v(7), v(2)]); // right  (+X)
    mesh.add_face(vec![v(3), v(2), v(7), v(6)]); // top    (+Y)
    mesh.add_face(vec![v(5), v(4), v(1), v(0)]); // bottom (-Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_box_per_node() {
        let mut graph = SkinGraph::new();
        graph.add_cube_node(Vec3::ZERO, 0.5);
        graph.add_node(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 0.2, 0.1));
        let mesh = skin_modifier(&graph);
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.faces.len(), 12);
        assert!(mesh.faces[6..].iter().flatten().all(|&i| i >= 8));
    }

    #[test]
    fn test_faces_point_outward() {
        let mut graph = SkinGraph::new();
        graph.add_node(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.5, 1.0, 2.0));
        let mesh = skin_modifier(&graph);
        let center = Vec3::new(1.0, 2.0, 3.0);
        for face in &mesh.faces {
            let a = mesh.positions[face[0]];
            let b = mesh.positions[face[1]];
            let c = mesh.positions[face[2]];
            let normal = (b - a).cross(c - a);
            let face_center: Vec3 = face.iter().map(|&i| mesh.positions[i]).sum::<Vec3>() / 4.0;
            assert!(normal.dot(face_center - center) > 0.0);
        }
    }
}
