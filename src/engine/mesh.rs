// Procedural mesh types, triangulation and the per-kind mesh library.
//
// Pipeline:
//   SkinGraph → skin_modifier() → PolyMesh → catmull_clark() → PolyMesh → triangulate_*() → RenderMesh → GPU
//
// The tank cube keeps hard edges (flat normals). Fish bodies are rounded
// with subdivision and shaded smooth. All fish meshes face +X at heading 0
// and fit in roughly a unit box, so the per-entity scale sets their size.

use glam::Vec3;
use wgpu::util::DeviceExt;

use super::components::MeshKind;
use super::skin::{skin_modifier, SkinGraph};
use super::subdivide::subdivide;

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex with position and normal.
///   @location(0) position: vec3<f32>
///   @location(1) normal:   vec3<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal:   [f32; 3],
}

impl GpuVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

// ============================================================================
// POLY MESH
// ============================================================================

/// Intermediate polygon mesh for procedural manipulation.
/// Faces are CCW-ordered vertex index lists of any length >= 3.
/// Only used at load time; not GPU-ready.
#[derive(Clone, Debug, Default)]
pub struct PolyMesh {
    pub positions: Vec<Vec3>,
    pub faces:     Vec<Vec<usize>>,
}

impl PolyMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, pos: Vec3) -> usize {
        let idx = self.positions.len();
        self.positions.push(pos);
        idx
    }

    /// Add a face by vertex indices (CCW order).
    pub fn add_face(&mut self, indices: Vec<usize>) {
        debug_assert!(indices.len() >= 3, "Face must have at least 3 vertices");
        self.faces.push(indices);
    }

    pub fn vertex_count(&self) -> usize { self.positions.len() }
}

// ============================================================================
// RENDER MESH
// ============================================================================

/// Triangulated mesh with per-vertex normals, ready for upload.
#[derive(Clone, Debug)]
pub struct RenderMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices:  Vec<u32>,
}

impl RenderMesh {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize { self.indices.len() }
}

/// Fan-triangulate every face, calling `emit` with each triangle's corners.
fn fan(face: &[usize], mut emit: impl FnMut(usize, usize, usize)) {
    for i in 1..face.len() - 1 {
        emit(face[0], face[i], face[i + 1]);
    }
}

/// Shared vertices with area-weighted normals. Use for rounded shapes.
pub fn triangulate_smooth(poly: &PolyMesh) -> RenderMesh {
    let mut normals = vec![Vec3::ZERO; poly.vertex_count()];
    let mut indices = Vec::new();

    for face in &poly.faces {
        fan(face, |a, b, c| {
            // Unnormalized cross product: magnitude is twice the triangle area.
            let n = (poly.positions[b] - poly.positions[a]).cross(poly.positions[c] - poly.positions[a]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
            indices.extend([a as u32, b as u32, c as u32]);
        });
    }

    let vertices = poly.positions.iter()
        .zip(&normals)
        .map(|(p, n)| GpuVertex { position: p.to_array(), normal: n.normalize_or_zero().to_array() })
        .collect();

    RenderMesh { vertices, indices }
}

/// Vertices duplicated per face, each carrying the face normal. Use for hard-edged boxes.
pub fn triangulate_flat(poly: &PolyMesh) -> RenderMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for face in &poly.faces {
        let p = |i: usize| poly.positions[face[i]];
        let normal = (p(1) - p(0)).cross(p(2) - p(0)).normalize_or_zero().to_array();
        let base = vertices.len() as u32;
        vertices.extend(face.iter().map(|&v| GpuVertex { position: poly.positions[v].to_array(), normal }));
        for i in 1..face.len() as u32 - 1 {
            indices.extend([base, base + i, base + i + 1]);
        }
    }

    RenderMesh { vertices, indices }
}

// ============================================================================
// PROCEDURAL SHAPES
// ============================================================================

/// Subdivision passes used to round the fish bodies.
const FISH_SUBDIVISION_LEVELS: u32 = 2;

/// Unit cube centred on the origin.
fn cube_mesh() -> RenderMesh {
    let mut graph = SkinGraph::new();
    graph.add_cube_node(Vec3::ZERO, 0.5);
    triangulate_flat(&skin_modifier(&graph))
}

// Each fish is a body, a tail fan and fins as box nodes, rounded off by subdivision.

/// Classic torpedo.
fn torpedo_skeleton() -> SkinGraph {
    let mut graph = SkinGraph::new();
    graph.add_node(Vec3::ZERO, Vec3::new(0.5, 0.25, 0.15));
    graph.add_node(Vec3::new(-0.6, 0.0, 0.0), Vec3::new(0.12, 0.22, 0.04));
    graph.add_node(Vec3::new(0.0, 0.28, 0.0), Vec3::new(0.15, 0.08, 0.03));
    graph
}

/// Tall, short-bodied angelfish.
fn angelfish_skeleton() -> SkinGraph {
    let mut graph = SkinGraph::new();
    graph.add_node(Vec3::ZERO, Vec3::new(0.35, 0.4, 0.1));
    graph.add_node(Vec3::new(-0.45, 0.0, 0.0), Vec3::new(0.1, 0.25, 0.04));
    graph.add_node(Vec3::new(-0.05, 0.45, 0.0), Vec3::new(0.12, 0.12, 0.03));
    graph.add_node(Vec3::new(-0.05, -0.45, 0.0), Vec3::new(0.12, 0.12, 0.03));
    graph
}

/// Long and slim.
fn slim_skeleton() -> SkinGraph {
    let mut graph = SkinGraph::new();
    graph.add_node(Vec3::ZERO, Vec3::new(0.6, 0.15, 0.15));
    graph.add_node(Vec3::new(-0.7, 0.0, 0.0), Vec3::new(0.1, 0.15, 0.03));
    graph
}

fn smooth_fish(graph: &SkinGraph) -> RenderMesh {
    triangulate_smooth(&subdivide(&skin_modifier(graph), FISH_SUBDIVISION_LEVELS))
}

/// Build the CPU-side mesh for `kind`.
pub fn build_mesh(kind: MeshKind) -> RenderMesh {
    match kind {
        MeshKind::Cube => cube_mesh(),
        MeshKind::FishA => smooth_fish(&torpedo_skeleton()),
        MeshKind::FishB => smooth_fish(&angelfish_skeleton()),
        MeshKind::FishC => smooth_fish(&slim_skeleton()),
    }
}

// ============================================================================
// GPU MESH LIBRARY
// ============================================================================

/// Vertex + index buffers for one mesh kind. Owns the GPU memory.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer:  wgpu::Buffer,
    index_count:   u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &RenderMesh) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: mesh.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: mesh.index_bytes(),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        }
    }

    /// Bind this mesh's geometry and draw it once.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// One uploaded mesh per `MeshKind`, built once at startup.
pub struct MeshLibrary {
    meshes: Vec<GpuMesh>,
}

impl MeshLibrary {
    pub fn load(device: &wgpu::Device) -> Self {
        let meshes = MeshKind::ALL
            .iter()
            .map(|&kind| {
                let mesh = build_mesh(kind);
                log::debug!(
                    "Uploaded {:?} mesh: {} vertices, {} triangles",
                    kind,
                    mesh.vertices.len(),
                    mesh.index_count() / 3
                );
                GpuMesh::upload(device, &format!("{kind:?}"), &mesh)
            })
            .collect();
        Self { meshes }
    }

    pub fn get(&self, kind: MeshKind) -> &GpuMesh {
        &self.meshes[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_is_flat_shaded() {
        let cube = build_mesh(MeshKind::Cube);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.index_count(), 36);
        for v in &cube.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            // Axis-aligned face normals only.
            assert!((n.abs().max_element() - 1.0).abs() < 1e-5);
            assert!(Vec3::from_array(v.position).abs().max_element() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_fish_meshes_are_closed_and_forward() {
        for kind in [MeshKind::FishA, MeshKind::FishB, MeshKind::FishC] {
            let mesh = build_mesh(kind);
            assert_eq!(mesh.index_count() % 3, 0);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));

            // Tail sits behind the body: the mesh reaches further along -X than +X.
            let min_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
            let max_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
            assert!(-min_x > max_x, "{kind:?}: {min_x} .. {max_x}");
        }
    }

    #[test]
    fn test_smooth_normals_are_unit() {
        let mesh = build_mesh(MeshKind::FishA);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-4);
        }
    }
}
