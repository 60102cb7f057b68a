//! The towable trailer
//!
//! Arrow keys drive the trailer freely on the ground plane. Every frame
//! its world bounds and the truck's are recomputed and tested for overlap;
//! contact while the robot holds the vehicle pose starts a docking glide
//! toward the coupling point behind the truck. While docked the trailer is
//! pinned there; any arrow press releases it.

use cgmath::{InnerSpace, Vector3};
use winit::keyboard::KeyCode;

use crate::gfx::geometry::primitives::{generate_cube, generate_cylinder};
use crate::gfx::material::Material;
use crate::scene::{NodeId, Scene};
use crate::simulation::mover::PlanarMover;
use crate::simulation::rigs::robot::RobotRig;

const CONTAINER_WIDTH: f32 = 8.0;
const CONTAINER_HEIGHT: f32 = 6.0;
const CONTAINER_LENGTH: f32 = 16.0;
const WHEEL_RADIUS: f32 = 1.5;

const TRAILER_SPEED: f32 = 15.0;
const DOCK_SPEED: f32 = 10.0;

/// Coupling point, relative to the truck root on the ground plane. The
/// truck's rear faces -Z once the legs fold back; the offset leaves a gap
/// so a docked trailer no longer overlaps the truck and a released one can
/// pull away cleanly.
const COUPLING_OFFSET: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.0,
    z: -22.0,
};

/// Hitch state machine of the trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitchState {
    /// Arrow-driven, checking for truck contact.
    Free,
    /// Gliding toward the coupling point; input is ignored.
    Docking,
    /// Pinned to the coupling point until an arrow press releases it.
    Docked,
}

/// The trailer rig: mover state, hitch machine, and scene nodes.
pub struct TrailerRig {
    pub root: NodeId,
    pub mover: PlanarMover,
    pub state: HitchState,
}

impl TrailerRig {
    /// Assembles the trailer under a new root node at `position`.
    pub fn build(scene: &mut Scene, position: Vector3<f32>) -> Self {
        let cube = scene.add_mesh(generate_cube());
        let wheel = scene.add_mesh(generate_cylinder(1.0, 1.0, 24));

        let gray = Material::lambert(0.55, 0.57, 0.6);
        let dark = Material::lambert(0.15, 0.15, 0.15);

        let root = scene.add_root("trailer");
        scene.node_mut(root).position = position;

        let container = scene.add_child(root, "container");
        {
            let node = scene.node_mut(container);
            node.mesh = Some(cube);
            node.position = Vector3::new(0.0, 2.0, 0.0);
            node.scale = Vector3::new(CONTAINER_WIDTH, CONTAINER_HEIGHT, CONTAINER_LENGTH);
            node.material = gray;
        }

        for (x, z) in [(-3.0f32, -5.5f32), (3.0, -5.5), (-3.0, -2.5), (3.0, -2.5)] {
            let wheel_node = scene.add_child(root, "wheel");
            let node = scene.node_mut(wheel_node);
            node.mesh = Some(wheel);
            node.position = Vector3::new(x, -1.5, z);
            node.rotation.z = std::f32::consts::FRAC_PI_2;
            node.scale = Vector3::new(WHEEL_RADIUS, 1.0, WHEEL_RADIUS);
            node.material = dark;
        }

        // Hitch peg at the front face.
        let peg = scene.add_child(root, "hitch peg");
        {
            let node = scene.node_mut(peg);
            node.mesh = Some(wheel);
            node.position = Vector3::new(0.0, 0.0, CONTAINER_LENGTH / 2.0 + 0.75);
            node.rotation.x = std::f32::consts::FRAC_PI_2;
            node.scale = Vector3::new(0.5, 1.5, 0.5);
            node.material = dark;
        }

        Self {
            root,
            mover: PlanarMover::new(position, TRAILER_SPEED),
            state: HitchState::Free,
        }
    }

    /// Sets arrow intents from a keyboard edge.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::ArrowUp => self.mover.intents.up = pressed,
            KeyCode::ArrowDown => self.mover.intents.down = pressed,
            KeyCode::ArrowLeft => self.mover.intents.left = pressed,
            KeyCode::ArrowRight => self.mover.intents.right = pressed,
            _ => {}
        }
    }

    /// Advances the hitch machine. Must run after the robot's update so
    /// the collision check sees this frame's pose.
    pub fn update(&mut self, dt: f32, scene: &mut Scene, robot: &RobotRig) {
        match self.state {
            HitchState::Free => {
                self.mover.advance(dt);
                scene.node_mut(self.root).position = self.mover.position;
                // Bounds are only valid for the frame that produced them.
                scene.update_world_transforms();

                let own = scene.world_aabb(self.root);
                let truck = robot.world_aabb(scene);
                if own.intersects(&truck) && robot.in_truck_pose() {
                    log::info!("trailer touched the folded truck, docking");
                    self.state = HitchState::Docking;
                }
            }
            HitchState::Docking => {
                let target = self.coupling_point(scene, robot);
                let to_target = target - self.mover.position;
                let distance = to_target.magnitude();
                let step = DOCK_SPEED * dt;
                if distance <= step {
                    // Land exactly on the coupling point, never past it.
                    self.mover.position = target;
                    self.state = HitchState::Docked;
                    log::info!("trailer docked");
                } else {
                    self.mover.position += to_target * (step / distance);
                }
                scene.node_mut(self.root).position = self.mover.position;
                scene.update_world_transforms();
            }
            HitchState::Docked => {
                if self.mover.intents.any() {
                    self.state = HitchState::Free;
                    log::info!("trailer released");
                } else {
                    self.mover.position = self.coupling_point(scene, robot);
                }
                scene.node_mut(self.root).position = self.mover.position;
                scene.update_world_transforms();
            }
        }
    }

    /// World-space anchor the docked trailer rests at. XZ comes from the
    /// truck; the trailer keeps its own height.
    pub fn coupling_point(&self, scene: &Scene, robot: &RobotRig) -> Vector3<f32> {
        let truck = scene.node(robot.root).position;
        Vector3::new(
            truck.x + COUPLING_OFFSET.x,
            self.mover.position.y,
            truck.z + COUPLING_OFFSET.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraRig;

    fn setup() -> (Scene, RobotRig, TrailerRig) {
        let mut scene = Scene::new(CameraRig::new(1.0, 50.0));
        let robot = RobotRig::build(&mut scene, Vector3::new(0.0, 0.0, 0.0));
        // Start overlapping the robot so contact is immediate.
        let trailer = TrailerRig::build(&mut scene, Vector3::new(6.0, 0.0, 0.0));
        scene.update_world_transforms();
        (scene, robot, trailer)
    }

    #[test]
    fn test_contact_without_pose_does_not_dock() {
        let (mut scene, mut robot, mut trailer) = setup();
        robot.update(0.0, &mut scene);
        trailer.update(0.016, &mut scene, &robot);
        assert_eq!(trailer.state, HitchState::Free);
    }

    #[test]
    fn test_contact_in_pose_docks_and_lands_on_coupling_point() {
        let (mut scene, mut robot, mut trailer) = setup();
        robot.snap_to_truck();
        robot.update(0.0, &mut scene);

        trailer.update(0.016, &mut scene, &robot);
        assert_eq!(trailer.state, HitchState::Docking);

        for _ in 0..600 {
            trailer.update(0.016, &mut scene, &robot);
            if trailer.state == HitchState::Docked {
                break;
            }
        }
        assert_eq!(trailer.state, HitchState::Docked);
        let expected = trailer.coupling_point(&scene, &robot);
        assert_eq!(trailer.mover.position, expected);
        assert_eq!(scene.node(trailer.root).position, expected);
    }

    #[test]
    fn test_arrow_press_releases_a_docked_trailer() {
        let (mut scene, mut robot, mut trailer) = setup();
        robot.snap_to_truck();
        robot.update(0.0, &mut scene);
        trailer.update(0.016, &mut scene, &robot);
        for _ in 0..600 {
            trailer.update(0.016, &mut scene, &robot);
            if trailer.state == HitchState::Docked {
                break;
            }
        }
        assert_eq!(trailer.state, HitchState::Docked);

        trailer.handle_key(KeyCode::ArrowLeft, true);
        trailer.update(0.016, &mut scene, &robot);
        assert_eq!(trailer.state, HitchState::Free);
    }

    #[test]
    fn test_docking_ignores_arrow_input() {
        let (mut scene, mut robot, mut trailer) = setup();
        robot.snap_to_truck();
        robot.update(0.0, &mut scene);
        trailer.update(0.016, &mut scene, &robot);
        assert_eq!(trailer.state, HitchState::Docking);

        let before = trailer.coupling_point(&scene, &robot) - trailer.mover.position;
        trailer.handle_key(KeyCode::ArrowRight, true);
        trailer.update(0.016, &mut scene, &robot);
        let after = trailer.coupling_point(&scene, &robot) - trailer.mover.position;
        // Still gliding toward the target, arrows notwithstanding.
        assert!(after.magnitude() < before.magnitude());
        assert_eq!(trailer.state, HitchState::Docking);
        trailer.handle_key(KeyCode::ArrowRight, false);
    }
}
