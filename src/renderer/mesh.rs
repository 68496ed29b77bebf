use glam::Mat4;
use rayon::prelude::*;

use super::geometry::{append_primitive, Vertex};
use crate::forest_core::scene::{NodeId, NodeKind, Scene};

#[derive(Default)]
pub struct CpuSceneMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl CpuSceneMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn extend(&mut self, other: CpuSceneMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }
}

/// Every mesh node reachable from the scene root, tessellated in world space.
pub fn build_scene_mesh(scene: &Scene) -> CpuSceneMesh {
    build_filtered(scene, |_| true)
}

/// Only the nodes flagged as shadow casters, for a shadow-map pass.
pub fn build_shadow_caster_mesh(scene: &Scene) -> CpuSceneMesh {
    build_filtered(scene, |id| scene.node(id).cast_shadow)
}

fn build_filtered(scene: &Scene, keep: impl Fn(NodeId) -> bool) -> CpuSceneMesh {
    let nodes: Vec<(NodeId, Mat4)> = scene
        .mesh_nodes()
        .into_iter()
        .filter(|(id, _)| keep(*id))
        .collect();

    // Collected in node order so the merged buffers are deterministic.
    let pieces: Vec<CpuSceneMesh> = nodes
        .par_iter()
        .map(|&(id, transform)| tessellate_node(scene, id, transform))
        .collect();

    let mut mesh = CpuSceneMesh::default();
    for piece in pieces {
        mesh.extend(piece);
    }
    mesh
}

fn tessellate_node(scene: &Scene, id: NodeId, transform: Mat4) -> CpuSceneMesh {
    let mut mesh = CpuSceneMesh::default();
    if let NodeKind::Mesh { shape, material } = scene.node(id).kind {
        let color = scene.material(material).color;
        append_primitive(
            &mut mesh.vertices,
            &mut mesh.indices,
            transform,
            shape,
            color,
        );
    }
    mesh
}
