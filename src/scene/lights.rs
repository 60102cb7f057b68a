//! Scene lighting state
//!
//! Plain CPU-side light descriptions; the render engine packs the enabled
//! ones into the global uniform buffer each frame. Rigs update positions
//! from node world transforms after propagation.

use cgmath::Vector3;

/// Number of point-light slots in the forward pipeline.
pub const MAX_POINT_LIGHTS: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Direction the light travels, toward the scene.
    pub direction: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    pub enabled: bool,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(-0.5, -0.6, -0.8),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    pub position: Vector3<f32>,
    /// Direction of the cone axis.
    pub direction: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Cosine of the half-angle of the cone.
    pub cos_cutoff: f32,
    pub enabled: bool,
}

/// All lights of a scene.
#[derive(Debug, Clone, Default)]
pub struct Lights {
    pub sun: DirectionalLight,
    pub ambient: [f32; 3],
    pub points: Vec<PointLight>,
    pub spot: Option<SpotLight>,
}
