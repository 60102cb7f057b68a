//! Retained scene graph
//!
//! The scene owns the node arena, shared mesh assets, painted textures,
//! lights, and the camera rig. Nodes are created through
//! [`Scene::add_root`] / [`Scene::add_child`], which keeps every child at a
//! higher arena index than its parent so world matrices propagate in one
//! forward pass per frame.

pub mod lights;
pub mod node;

use cgmath::Matrix4;

use crate::gfx::camera::CameraRig;
use crate::gfx::geometry::GeometryData;
use crate::gfx::render_engine::MeshGpu;
use crate::gfx::texture::TextureResource;
use crate::simulation::collision::Aabb;

pub use lights::Lights;
pub use node::{MeshId, Node, NodeId, TextureId};

/// A mesh asset shared between nodes.
pub struct MeshAsset {
    pub geometry: GeometryData,
    pub(crate) local_aabb: Aabb,
    pub(crate) gpu: Option<MeshGpu>,
}

/// A CPU-painted RGBA texture, re-uploaded when marked dirty.
pub struct PaintedTexture {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub(crate) dirty: bool,
    pub(crate) gpu: Option<TextureResource>,
}

/// Main scene containing the node graph, assets, lights, and camera.
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    meshes: Vec<MeshAsset>,
    textures: Vec<PaintedTexture>,
    pub lights: Lights,
    pub camera: CameraRig,
    pub background: [f32; 3],
}

impl Scene {
    pub fn new(camera: CameraRig) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            meshes: Vec::new(),
            textures: Vec::new(),
            lights: Lights::default(),
            camera,
            background: [1.0, 1.0, 1.0],
        }
    }

    /// Adds a parentless node.
    pub fn add_root(&mut self, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.to_string(), None));
        self.roots.push(id);
        id
    }

    /// Adds a node under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.to_string(), Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Top-level nodes, in creation order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Registers a mesh asset and computes its local bounds once.
    pub fn add_mesh(&mut self, geometry: GeometryData) -> MeshId {
        let local_aabb = geometry.local_aabb();
        self.meshes.push(MeshAsset {
            geometry,
            local_aabb,
            gpu: None,
        });
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> &MeshAsset {
        &self.meshes[id.0]
    }

    pub(crate) fn meshes_mut(&mut self) -> &mut [MeshAsset] {
        &mut self.meshes
    }

    /// Registers a painted RGBA texture for upload on the next frame.
    pub fn add_texture(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> TextureId {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        self.textures.push(PaintedTexture {
            pixels,
            width,
            height,
            dirty: true,
            gpu: None,
        });
        TextureId(self.textures.len() - 1)
    }

    /// Replaces a texture's pixels; the renderer re-uploads on next use.
    pub fn repaint_texture(&mut self, id: TextureId, pixels: Vec<u8>) {
        let tex = &mut self.textures[id.0];
        debug_assert_eq!(pixels.len(), (tex.width * tex.height * 4) as usize);
        tex.pixels = pixels;
        tex.dirty = true;
    }

    pub(crate) fn textures_mut(&mut self) -> &mut [PaintedTexture] {
        &mut self.textures
    }

    pub(crate) fn texture(&self, id: TextureId) -> &PaintedTexture {
        &self.textures[id.0]
    }

    /// Recomputes every node's world matrix from the current local fields.
    ///
    /// Children always sit at higher arena indices than their parents, so a
    /// single forward pass suffices.
    pub fn update_world_transforms(&mut self) {
        for i in 0..self.nodes.len() {
            let local = self.nodes[i].local_matrix();
            let world = match self.nodes[i].parent {
                Some(parent) => self.nodes[parent.0].world * local,
                None => local,
            };
            self.nodes[i].world = world;
        }
    }

    /// World-space bounds of `root`'s subtree as of the last transform
    /// propagation. Covers every mesh-bearing node regardless of
    /// visibility; visibility only affects rendering.
    pub fn world_aabb(&self, root: NodeId) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if let Some(mesh) = node.mesh {
                let local = self.meshes[mesh.0].local_aabb;
                bounds.union(&local.transformed(&node.world));
            }
            stack.extend_from_slice(&node.children);
        }
        bounds
    }

    /// World matrix of one node as of the last propagation.
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        self.nodes[id.0].world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::primitives::generate_cube;
    use cgmath::{Transform, Point3, Vector3};

    fn test_scene() -> Scene {
        Scene::new(CameraRig::new(1.0, 50.0))
    }

    #[test]
    fn test_world_transform_chains_parent_and_child() {
        let mut scene = test_scene();
        let root = scene.add_root("root");
        let child = scene.add_child(root, "child");
        scene.node_mut(root).position = Vector3::new(1.0, 2.0, 3.0);
        scene.node_mut(child).position = Vector3::new(0.0, 1.0, 0.0);
        scene.update_world_transforms();

        let p = scene
            .world_matrix(child)
            .transform_point(Point3::new(0.0, 0.0, 0.0));
        assert_eq!(p, Point3::new(1.0, 3.0, 3.0));
    }

    #[test]
    fn test_pivot_rotation_moves_child() {
        let mut scene = test_scene();
        let pivot = scene.add_root("pivot");
        let child = scene.add_child(pivot, "child");
        scene.node_mut(child).position = Vector3::new(0.0, 0.0, 1.0);
        scene.node_mut(pivot).rotation.x = std::f32::consts::FRAC_PI_2;
        scene.update_world_transforms();

        let p = scene
            .world_matrix(child)
            .transform_point(Point3::new(0.0, 0.0, 0.0));
        // Rotating +90 degrees about X carries +Z onto -Y.
        assert!((p.x - 0.0).abs() < 1e-6);
        assert!((p.y - -1.0).abs() < 1e-6);
        assert!((p.z - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_world_aabb_includes_parent_transform() {
        let mut scene = test_scene();
        let cube = scene.add_mesh(generate_cube());
        let root = scene.add_root("root");
        let child = scene.add_child(root, "box");
        scene.node_mut(root).position = Vector3::new(10.0, 0.0, 0.0);
        scene.node_mut(child).mesh = Some(cube);
        scene.node_mut(child).scale = Vector3::new(2.0, 4.0, 2.0);
        scene.update_world_transforms();

        let bounds = scene.world_aabb(root);
        assert_eq!(bounds.min, Vector3::new(9.0, -2.0, -1.0));
        assert_eq!(bounds.max, Vector3::new(11.0, 2.0, 1.0));
    }

    #[test]
    fn test_world_aabb_of_meshless_subtree_is_empty() {
        let mut scene = test_scene();
        let root = scene.add_root("empty");
        scene.update_world_transforms();
        assert!(scene.world_aabb(root).is_empty());
    }
}
