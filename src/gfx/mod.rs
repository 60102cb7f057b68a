//! # Graphics Module
//!
//! Rendering collaborator for the scene graph: camera rig, primitive
//! geometry, materials, textures, and the wgpu forward renderer.

pub mod camera;
pub mod geometry;
pub mod material;
pub mod render_engine;
pub mod texture;
pub mod vertex;
