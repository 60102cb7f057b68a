//! Simulation manager
//!
//! Manages the lifecycle of the attached simulation and integrates it with
//! the main frame loop: pause, time scaling, and an optional fixed
//! timestep for deterministic stepping.

use super::traits::Simulation;
use crate::scene::Scene;
use winit::keyboard::KeyCode;

/// Manages the attached simulation within the frame loop.
pub struct SimulationManager {
    simulation: Option<Box<dyn Simulation>>,
    is_paused: bool,
    time_scale: f32,
    accumulated_time: f32,
    fixed_timestep: Option<f32>,
}

impl SimulationManager {
    pub fn new() -> Self {
        Self {
            simulation: None,
            is_paused: false,
            time_scale: 1.0,
            accumulated_time: 0.0,
            fixed_timestep: None,
        }
    }

    /// Attach a simulation and initialize it against the scene.
    pub fn attach_simulation(&mut self, mut simulation: Box<dyn Simulation>, scene: &mut Scene) {
        log::info!("attaching simulation '{}'", simulation.name());
        simulation.initialize(scene);
        self.simulation = Some(simulation);
        self.is_paused = false;
    }

    /// Update simulation (called every frame)
    ///
    /// # Arguments
    /// * `delta_time` - Time elapsed since last frame in seconds
    /// * `scene` - Scene to update with simulation results
    pub fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        if self.is_paused {
            return;
        }

        if let Some(simulation) = &mut self.simulation {
            let scaled_delta = delta_time * self.time_scale;

            if let Some(fixed_dt) = self.fixed_timestep {
                // Fixed timestep simulation for deterministic results
                self.accumulated_time += scaled_delta;

                while self.accumulated_time >= fixed_dt {
                    simulation.update(fixed_dt, scene);
                    self.accumulated_time -= fixed_dt;
                }
            } else {
                // Variable timestep
                simulation.update(scaled_delta, scene);
            }
        }
    }

    /// Forward a keyboard edge to the simulation.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool, scene: &mut Scene) {
        if let Some(simulation) = &mut self.simulation {
            simulation.handle_key(key, pressed, scene);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
    }

    /// Enable fixed timestep mode
    ///
    /// # Arguments
    /// * `timestep` - Fixed timestep in seconds, or None for variable timestep
    pub fn set_fixed_timestep(&mut self, timestep: Option<f32>) {
        self.fixed_timestep = timestep;
        self.accumulated_time = 0.0;
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set time scale (1.0 = normal speed); negative values are clamped.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn has_simulation(&self) -> bool {
        self.simulation.is_some()
    }
}

impl Default for SimulationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraRig;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSim {
        updates: Rc<Cell<u32>>,
    }

    impl Simulation for CountingSim {
        fn initialize(&mut self, _scene: &mut Scene) {}
        fn update(&mut self, _delta_time: f32, _scene: &mut Scene) {
            self.updates.set(self.updates.get() + 1);
        }
        fn name(&self) -> &str {
            "counting"
        }
    }

    fn setup() -> (Scene, SimulationManager, Rc<Cell<u32>>) {
        let mut scene = Scene::new(CameraRig::new(1.0, 50.0));
        let updates = Rc::new(Cell::new(0));
        let mut manager = SimulationManager::new();
        manager.attach_simulation(
            Box::new(CountingSim {
                updates: updates.clone(),
            }),
            &mut scene,
        );
        (scene, manager, updates)
    }

    #[test]
    fn test_fixed_timestep_accumulates_whole_steps() {
        let (mut scene, mut manager, updates) = setup();
        manager.set_fixed_timestep(Some(0.01));
        manager.update(0.035, &mut scene);
        // 3 whole steps fit; the remainder stays accumulated.
        assert_eq!(updates.get(), 3);
        manager.update(0.005, &mut scene);
        assert_eq!(updates.get(), 4);
    }

    #[test]
    fn test_variable_timestep_runs_once_per_frame() {
        let (mut scene, mut manager, updates) = setup();
        manager.update(0.016, &mut scene);
        manager.update(0.5, &mut scene);
        assert_eq!(updates.get(), 2);
    }

    #[test]
    fn test_paused_manager_skips_updates() {
        let (mut scene, mut manager, updates) = setup();
        manager.set_paused(true);
        manager.update(1.0, &mut scene);
        assert_eq!(updates.get(), 0);
        manager.set_paused(false);
        manager.update(1.0, &mut scene);
        assert_eq!(updates.get(), 1);
    }
}
