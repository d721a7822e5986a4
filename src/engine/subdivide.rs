// Catmull-Clark subdivision surface.
//
// One pass turns every n-gon into n quads and pulls the original vertices
// towards the average of their neighbourhood, so a box rounds off into a
// pebble after two or three passes. Winding is preserved.
//
// Closed all-quad mesh: V' = V + E + F, F' = 4F.
//   box, level 0:  8 verts,  6 faces
//   box, level 1: 26 verts, 24 faces
//   box, level 2: 98 verts, 96 faces

use std::collections::HashMap;

use glam::Vec3;
use super::mesh::PolyMesh;

type EdgeKey = (usize, usize);

fn edge_key(a: usize, b: usize) -> EdgeKey {
    (a.min(b), a.max(b))
}

/// Apply one level of Catmull-Clark subdivision.
pub fn catmull_clark(mesh: &PolyMesh) -> PolyMesh {
    let n_verts = mesh.vertex_count();

    let face_points: Vec<Vec3> = mesh.faces.iter()
        .map(|face| face.iter().map(|&v| mesh.positions[v]).sum::<Vec3>() / face.len() as f32)
        .collect();

    // Faces adjacent to each edge, in first-seen order.
    let mut edge_faces: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    let mut edge_order: Vec<EdgeKey> = Vec::new();
    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); n_verts];
    let mut vertex_edges: Vec<Vec<EdgeKey>> = vec![Vec::new(); n_verts];

    for (fi, face) in mesh.faces.iter().enumerate() {
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            let key = edge_key(a, b);
            let adjacent = edge_faces.entry(key).or_insert_with(|| {
                edge_order.push(key);
                Vec::new()
            });
            if !adjacent.contains(&fi) {
                adjacent.push(fi);
            }
            vertex_faces[a].push(fi);
            for v in [a, b] {
                if !vertex_edges[v].contains(&key) {
                    vertex_edges[v].push(key);
                }
            }
        }
    }

    let mut out = PolyMesh::new();

    // Edge points: average of endpoints and adjacent face points
    // (plain midpoint on a boundary edge).
    let mut edge_point: HashMap<EdgeKey, usize> = HashMap::with_capacity(edge_order.len());
    for key in &edge_order {
        let (a, b) = *key;
        let faces = &edge_faces[key];
        let mid = mesh.positions[a] + mesh.positions[b];
        let pos = if faces.len() == 2 {
            (mid + face_points[faces[0]] + face_points[faces[1]]) / 4.0
        } else {
            mid / 2.0
        };
        edge_point.insert(*key, out.add_vertex(pos));
    }

    // Vertex points: (F + 2R + (n - 3) P) / n
    let vertex_point: Vec<usize> = (0..n_verts)
        .map(|v| {
            let p = mesh.positions[v];
            let faces = &vertex_faces[v];
            if faces.is_empty() {
                return out.add_vertex(p);
            }
            let n = faces.len() as f32;
            let f = faces.iter().map(|&fi| face_points[fi]).sum::<Vec3>() / n;
            let r = vertex_edges[v].iter()
                .map(|&(a, b)| (mesh.positions[a] + mesh.positions[b]) * 0.5)
                .sum::<Vec3>() / vertex_edges[v].len() as f32;
            out.add_vertex((f + 2.0 * r + (n - 3.0) * p) / n)
        })
        .collect();

    let face_point: Vec<usize> = face_points.iter().map(|&c| out.add_vertex(c)).collect();

    // vertex → next edge point → face point → previous edge point keeps CCW order.
    for (fi, face) in mesh.faces.iter().enumerate() {
        let n = face.len();
        for i in 0..n {
            let curr = face[i];
            let next = face[(i + 1) % n];
            let prev = face[(i + n - 1) % n];
            out.add_face(vec![
                vertex_point[curr],
                edge_point[&edge_key(curr, next)],
                face_point[fi],
                edge_point[&edge_key(prev, curr)],
            ]);
        }
    }

    out
}

/// Apply Catmull-Clark `levels` times. `levels = 0` returns a copy.
pub fn subdivide(mesh: &PolyMesh, levels: u32) -> PolyMesh {
    let mut current = mesh.clone();
    for _ in 0..levels {
        current = catmull_clark(&current);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::skin::{skin_modifier, SkinGraph};

    fn unit_box() -> PolyMesh {
        let mut graph = SkinGraph::new();
        graph.add_cube_node(Vec3::ZERO, 0.5);
        skin_modifier(&graph)
    }

    #[test]
    fn test_box_counts_per_level() {
        let level1 = subdivide(&unit_box(), 1);
        assert_eq!(level1.vertex_count(), 26);
        assert_eq!(level1.faces.len(), 24);

        let level2 = subdivide(&unit_box(), 2);
        assert_eq!(level2.vertex_count(), 98);
        assert_eq!(level2.faces.len(), 96);
        assert!(level2.faces.iter().all(|f| f.len() == 4));
    }

    #[test]
    fn test_level_zero_is_a_copy() {
        let copy = subdivide(&unit_box(), 0);
        assert_eq!(copy.positions, unit_box().positions);
        assert_eq!(copy.faces, unit_box().faces);
    }

    #[test]
    fn test_subdivision_shrinks_inside_hull() {
        let rounded = subdivide(&unit_box(), 2);
        for p in &rounded.positions {
            assert!(p.abs().max_element() <= 0.5 + 1e-6);
        }
        // Corners are pulled in, face centres stay put.
        assert!(rounded.positions.iter().all(|p| p.length() < 0.866));
    }
}
