//! The transformable robot
//!
//! A robot that folds into a truck: the head pivots back into the torso,
//! the waist pivot swings the legs out behind, each foot folds flat, and
//! the arm pair slides in along its two-phase path. Held keys set intent
//! flags; `update` advances every joint and writes the node transforms.
//!
//! Key map: `R`/`F` head, `W`/`S` waist, `Q`/`A` feet, `E`/`D` arms
//! out/in.

use cgmath::Vector3;
use std::f32::consts::{FRAC_PI_2, PI};
use winit::keyboard::KeyCode;

use crate::gfx::geometry::primitives::{generate_cube, generate_cylinder};
use crate::gfx::material::Material;
use crate::scene::{NodeId, Scene};
use crate::simulation::actuator::{ArmActuator, ArmPath};
use crate::simulation::collision::Aabb;
use crate::simulation::pivot::PivotJoint;
use crate::simulation::pose::{JointChannel, PoseSpec};

// Body dimensions.
const TORSO_WIDTH: f32 = 10.0;
const TORSO_HEIGHT: f32 = 12.0;
const TORSO_DEPTH: f32 = 5.0;
const HEAD_SIZE: f32 = 4.0;
const EYE_SIZE: f32 = 0.8;
const ARM_WIDTH: f32 = 2.0;
const ARM_LENGTH: f32 = 5.0;
const ARM_OFFSET_Y: f32 = 2.0;
const LEG_WIDTH: f32 = 2.0;
const LEG_HEIGHT: f32 = 8.0;
const FOOT_WIDTH: f32 = 2.5;
const FOOT_HEIGHT: f32 = 1.0;
const FOOT_DEPTH: f32 = 3.0;
const WHEEL_RADIUS: f32 = 1.5;
const WHEEL_WIDTH: f32 = 1.0;

// Joint travel.
const HEAD_SPEED: f32 = 2.0;
const WAIST_SPEED: f32 = 1.5;
const FOOT_SPEED: f32 = 2.5;
const ARM_SPEED: f32 = 4.0;

const ARM_PATH: ArmPath = ArmPath {
    min_x: 4.0,
    max_x: TORSO_WIDTH / 2.0 + ARM_WIDTH / 2.0,
    min_z: -1.5,
    max_z: 1.5,
};

const POSE_EPSILON: f32 = 0.015;

/// The robot rig: joint states plus the scene nodes they drive.
pub struct RobotRig {
    pub root: NodeId,
    head_pivot: NodeId,
    waist_pivot: NodeId,
    left_foot_pivot: NodeId,
    right_foot_pivot: NodeId,
    left_arm: NodeId,
    right_arm: NodeId,

    pub head: PivotJoint,
    pub waist: PivotJoint,
    pub left_foot: PivotJoint,
    pub right_foot: PivotJoint,
    pub arms: ArmActuator,

    truck_pose: PoseSpec,
}

impl RobotRig {
    /// Assembles the robot under a new root node at `position`.
    pub fn build(scene: &mut Scene, position: Vector3<f32>) -> Self {
        let cube = scene.add_mesh(generate_cube());
        let wheel = scene.add_mesh(generate_cylinder(1.0, 1.0, 24));

        let red = Material::lambert(0.75, 0.12, 0.12);
        let blue = Material::lambert(0.16, 0.25, 0.68);
        let dark = Material::lambert(0.15, 0.15, 0.15);

        let root = scene.add_root("robot");
        scene.node_mut(root).position = position;

        let torso = scene.add_child(root, "torso");
        {
            let node = scene.node_mut(torso);
            node.mesh = Some(cube);
            node.scale = Vector3::new(TORSO_WIDTH, TORSO_HEIGHT, TORSO_DEPTH);
            node.material = red;
        }

        // Head subtree hangs off a meshless pivot at the torso top.
        let head_pivot = scene.add_child(root, "head pivot");
        scene.node_mut(head_pivot).position =
            Vector3::new(0.0, TORSO_HEIGHT / 2.0, -TORSO_DEPTH / 4.0);

        let head = scene.add_child(head_pivot, "head");
        {
            let node = scene.node_mut(head);
            node.mesh = Some(cube);
            node.position = Vector3::new(0.0, HEAD_SIZE / 2.0, 0.0);
            node.scale = Vector3::new(HEAD_SIZE, HEAD_SIZE, HEAD_SIZE);
            node.material = blue;
        }
        for (name, x) in [("left eye", -1.0), ("right eye", 1.0)] {
            let eye = scene.add_child(head_pivot, name);
            let node = scene.node_mut(eye);
            node.mesh = Some(cube);
            node.position = Vector3::new(x, HEAD_SIZE * 0.7, HEAD_SIZE / 2.0);
            node.scale = Vector3::new(EYE_SIZE, EYE_SIZE, EYE_SIZE);
            node.material = Material::unlit(0.95, 0.95, 0.95);
        }
        for (name, x) in [("left antenna", -1.2), ("right antenna", 1.2)] {
            let antenna = scene.add_child(head_pivot, name);
            let node = scene.node_mut(antenna);
            node.mesh = Some(wheel);
            node.position = Vector3::new(x, HEAD_SIZE + 0.75, 0.0);
            node.scale = Vector3::new(0.3, 1.5, 0.3);
            node.material = dark;
        }

        // Arms slide; their nodes translate instead of pivoting.
        let mut arm_ids = [root; 2];
        for (i, (name, side)) in [("left arm", -1.0f32), ("right arm", 1.0)]
            .into_iter()
            .enumerate()
        {
            let arm = scene.add_child(root, name);
            scene.node_mut(arm).position =
                Vector3::new(side * ARM_PATH.max_x, ARM_OFFSET_Y, ARM_PATH.max_z);

            let upper = scene.add_child(arm, "arm body");
            {
                let node = scene.node_mut(upper);
                node.mesh = Some(cube);
                node.scale = Vector3::new(ARM_WIDTH, ARM_LENGTH, ARM_WIDTH);
                node.material = red;
            }
            let exhaust = scene.add_child(arm, "exhaust");
            {
                let node = scene.node_mut(exhaust);
                node.mesh = Some(wheel);
                node.position = Vector3::new(0.0, ARM_LENGTH / 2.0 + 1.5, -0.5);
                node.scale = Vector3::new(0.4, 3.0, 0.4);
                node.material = dark;
            }
            arm_ids[i] = arm;
        }
        let [left_arm, right_arm] = arm_ids;

        // Waist pivot carries both legs and their wheels.
        let waist_pivot = scene.add_child(root, "waist pivot");
        scene.node_mut(waist_pivot).position = Vector3::new(0.0, -TORSO_HEIGHT / 2.0, 0.0);

        let mut foot_ids = [root; 2];
        for (i, side) in [-1.0f32, 1.0].into_iter().enumerate() {
            let leg = scene.add_child(waist_pivot, "leg");
            {
                let node = scene.node_mut(leg);
                node.mesh = Some(cube);
                node.position = Vector3::new(side * 2.0, -LEG_HEIGHT / 2.0, 0.0);
                node.scale = Vector3::new(LEG_WIDTH, LEG_HEIGHT, LEG_WIDTH);
                node.material = blue;
            }

            let leg_wheel = scene.add_child(waist_pivot, "leg wheel");
            {
                let node = scene.node_mut(leg_wheel);
                node.mesh = Some(wheel);
                node.position = Vector3::new(side * 3.5, -LEG_HEIGHT + 1.0, 0.0);
                node.rotation.z = FRAC_PI_2;
                node.scale = Vector3::new(WHEEL_RADIUS, WHEEL_WIDTH, WHEEL_RADIUS);
                node.material = dark;
            }

            let foot_pivot = scene.add_child(waist_pivot, "foot pivot");
            scene.node_mut(foot_pivot).position = Vector3::new(side * 2.0, -LEG_HEIGHT, 0.0);

            let foot = scene.add_child(foot_pivot, "foot");
            {
                let node = scene.node_mut(foot);
                node.mesh = Some(cube);
                node.position = Vector3::new(0.0, -FOOT_HEIGHT / 2.0, FOOT_DEPTH / 2.0);
                node.scale = Vector3::new(FOOT_WIDTH, FOOT_HEIGHT, FOOT_DEPTH);
                node.material = blue;
            }
            foot_ids[i] = foot_pivot;
        }
        let [left_foot_pivot, right_foot_pivot] = foot_ids;

        // Hip wheels sit on the torso itself.
        for side in [-1.0f32, 1.0] {
            let hip_wheel = scene.add_child(root, "hip wheel");
            let node = scene.node_mut(hip_wheel);
            node.mesh = Some(wheel);
            node.position = Vector3::new(side * (TORSO_WIDTH / 2.0 + 0.5), -5.0, 0.0);
            node.rotation.z = FRAC_PI_2;
            node.scale = Vector3::new(WHEEL_RADIUS, WHEEL_WIDTH, WHEEL_RADIUS);
            node.material = dark;
        }

        let truck_pose = PoseSpec::new(
            vec![
                (JointChannel::HeadPitch, -PI),
                (JointChannel::WaistPitch, FRAC_PI_2),
                (JointChannel::LeftFootPitch, FRAC_PI_2),
                (JointChannel::RightFootPitch, FRAC_PI_2),
                (JointChannel::ArmSlideX, ARM_PATH.min_x),
                (JointChannel::ArmSlideZ, ARM_PATH.min_z),
            ],
            POSE_EPSILON,
        );

        Self {
            root,
            head_pivot,
            waist_pivot,
            left_foot_pivot,
            right_foot_pivot,
            left_arm,
            right_arm,
            head: PivotJoint::new(0.0, -PI, 0.0, HEAD_SPEED),
            waist: PivotJoint::new(0.0, 0.0, FRAC_PI_2, WAIST_SPEED),
            left_foot: PivotJoint::new(0.0, 0.0, FRAC_PI_2, FOOT_SPEED),
            right_foot: PivotJoint::new(0.0, 0.0, FRAC_PI_2, FOOT_SPEED),
            arms: ArmActuator::extended(ARM_PATH, ARM_SPEED),
            truck_pose,
        }
    }

    /// Sets intent flags from a keyboard edge.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyR => self.head.forward = pressed,
            KeyCode::KeyF => self.head.backward = pressed,
            KeyCode::KeyW => self.waist.forward = pressed,
            KeyCode::KeyS => self.waist.backward = pressed,
            KeyCode::KeyQ => {
                self.left_foot.forward = pressed;
                self.right_foot.forward = pressed;
            }
            KeyCode::KeyA => {
                self.left_foot.backward = pressed;
                self.right_foot.backward = pressed;
            }
            KeyCode::KeyE => self.arms.extend = pressed,
            KeyCode::KeyD => self.arms.retract = pressed,
            _ => {}
        }
    }

    /// Advances every joint and writes the resulting node transforms.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        self.head.advance(dt);
        self.waist.advance(dt);
        self.left_foot.advance(dt);
        self.right_foot.advance(dt);
        self.arms.advance(dt);

        scene.node_mut(self.head_pivot).rotation.x = self.head.angle;
        scene.node_mut(self.waist_pivot).rotation.x = self.waist.angle;
        scene.node_mut(self.left_foot_pivot).rotation.x = self.left_foot.angle;
        scene.node_mut(self.right_foot_pivot).rotation.x = self.right_foot.angle;

        let left = scene.node_mut(self.left_arm);
        left.position.x = -self.arms.x;
        left.position.z = self.arms.z;
        let right = scene.node_mut(self.right_arm);
        right.position.x = self.arms.x;
        right.position.z = self.arms.z;
    }

    /// Current value of one tracked channel.
    pub fn read_channel(&self, channel: JointChannel) -> Option<f32> {
        match channel {
            JointChannel::HeadPitch => Some(self.head.angle),
            JointChannel::WaistPitch => Some(self.waist.angle),
            JointChannel::LeftFootPitch => Some(self.left_foot.angle),
            JointChannel::RightFootPitch => Some(self.right_foot.angle),
            JointChannel::ArmSlideX => Some(self.arms.x),
            JointChannel::ArmSlideZ => Some(self.arms.z),
        }
    }

    /// Whether every joint rests in the folded vehicle configuration.
    pub fn in_truck_pose(&self) -> bool {
        self.truck_pose.matches(|channel| self.read_channel(channel))
    }

    /// World bounds of the whole robot, as of the last propagation.
    pub fn world_aabb(&self, scene: &Scene) -> Aabb {
        scene.world_aabb(self.root)
    }

    /// Drives every joint to its folded bound. Test and demo helper.
    pub fn snap_to_truck(&mut self) {
        self.head.angle = self.head.min_angle;
        self.waist.angle = self.waist.max_angle;
        self.left_foot.angle = self.left_foot.max_angle;
        self.right_foot.angle = self.right_foot.max_angle;
        self.arms.x = self.arms.path.min_x;
        self.arms.z = self.arms.path.min_z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraRig;

    fn scene() -> Scene {
        Scene::new(CameraRig::new(1.0, 50.0))
    }

    #[test]
    fn test_fresh_robot_is_not_in_truck_pose() {
        let mut scene = scene();
        let rig = RobotRig::build(&mut scene, Vector3::new(0.0, 0.0, 0.0));
        assert!(!rig.in_truck_pose());
    }

    #[test]
    fn test_holding_fold_intents_reaches_truck_pose() {
        let mut scene = scene();
        let mut rig = RobotRig::build(&mut scene, Vector3::new(0.0, 0.0, 0.0));

        rig.handle_key(KeyCode::KeyF, true);
        rig.handle_key(KeyCode::KeyW, true);
        rig.handle_key(KeyCode::KeyQ, true);
        rig.handle_key(KeyCode::KeyD, true);

        // Hold everything for plenty of simulated time.
        for _ in 0..200 {
            rig.update(0.05, &mut scene);
        }
        assert!(rig.in_truck_pose());

        // The pivots landed exactly on their bounds.
        assert_eq!(rig.head.angle, -PI);
        assert_eq!(rig.waist.angle, FRAC_PI_2);
        assert_eq!(rig.arms.x, ARM_PATH.min_x);
        assert_eq!(rig.arms.z, ARM_PATH.min_z);
    }

    #[test]
    fn test_one_joint_off_breaks_the_pose() {
        let mut scene = scene();
        let mut rig = RobotRig::build(&mut scene, Vector3::new(0.0, 0.0, 0.0));
        rig.snap_to_truck();
        assert!(rig.in_truck_pose());
        rig.head.angle = -PI + 0.1;
        assert!(!rig.in_truck_pose());
    }

    #[test]
    fn test_update_writes_pivot_rotations_into_nodes() {
        let mut scene = scene();
        let mut rig = RobotRig::build(&mut scene, Vector3::new(0.0, 0.0, 0.0));
        rig.head.backward = true;
        rig.update(0.5, &mut scene);
        assert_eq!(
            scene.node(rig.head_pivot).rotation.x,
            rig.head.angle
        );
        assert!(rig.head.angle < 0.0);
    }

    #[test]
    fn test_world_aabb_covers_the_whole_robot() {
        let mut scene = scene();
        let mut rig = RobotRig::build(&mut scene, Vector3::new(5.0, 0.0, 0.0));
        rig.update(0.0, &mut scene);
        scene.update_world_transforms();

        let bounds = rig.world_aabb(&scene);
        assert!(!bounds.is_empty());
        // Arms extend past the torso on both sides of the root at x = 5.
        assert!(bounds.min.x < 5.0 - TORSO_WIDTH / 2.0);
        assert!(bounds.max.x > 5.0 + TORSO_WIDTH / 2.0);
        // Legs reach below the torso.
        assert!(bounds.min.y < -TORSO_HEIGHT / 2.0 - LEG_HEIGHT / 2.0);
    }
}
