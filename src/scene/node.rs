//! Scene-graph nodes
//!
//! Nodes compose by parent/child and carry the position/rotation/scale
//! triple plus an optional mesh/material pairing. World matrices are
//! refreshed once per frame by [`Scene::update_world_transforms`]
//! (`super::Scene`); a pivot is simply a node with no mesh whose rotation
//! drives a subtree.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::gfx::material::Material;
use crate::gfx::render_engine::NodeGpu;

/// Index of a node within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Index of a mesh asset within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Index of a painted texture within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) usize);

/// One node of the retained scene graph.
pub struct Node {
    pub name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    pub position: Vector3<f32>,
    /// Euler angles in radians, applied Z first, then Y, then X.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub visible: bool,

    pub mesh: Option<MeshId>,
    pub material: Material,
    pub texture: Option<TextureId>,

    pub(crate) world: Matrix4<f32>,
    pub(crate) gpu: Option<NodeGpu>,
}

impl Node {
    pub(crate) fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            visible: true,
            mesh: None,
            material: Material::default(),
            texture: None,
            world: Matrix4::identity(),
            gpu: None,
        }
    }

    /// Local transform assembled as translation * rotation * scale.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(cgmath::Rad(self.rotation.x))
            * Matrix4::from_angle_y(cgmath::Rad(self.rotation.y))
            * Matrix4::from_angle_z(cgmath::Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// World matrix as of the last transform propagation.
    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
