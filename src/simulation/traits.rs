//! Core simulation trait
//!
//! Defines the interface a scene's update logic implements to run under
//! the frame loop. The app calls `handle_key` for keyboard edges and
//! `update` once per frame with measured elapsed seconds, before the scene
//! renders.

use crate::scene::Scene;
use winit::keyboard::KeyCode;

/// Per-frame update logic attached to the app.
pub trait Simulation {
    /// Initialize the simulation
    ///
    /// Called once when the simulation is first attached. Build the scene
    /// here: add meshes, nodes, lights, and select the camera view.
    fn initialize(&mut self, scene: &mut Scene);

    /// Update simulation state
    ///
    /// Called every frame to advance the simulation by one time step.
    ///
    /// # Arguments
    /// * `delta_time` - Time elapsed since last update in seconds
    /// * `scene` - Mutable reference to scene for updating node transforms
    fn update(&mut self, delta_time: f32, scene: &mut Scene);

    /// Keyboard edge: `pressed` is true on key-down, false on release.
    /// Key repeats are filtered out before this is called.
    fn handle_key(&mut self, _key: KeyCode, _pressed: bool, _scene: &mut Scene) {}

    /// Get simulation name for logging
    fn name(&self) -> &str;

    /// Reset simulation to initial state
    fn reset(&mut self, _scene: &mut Scene) {}
}
