//! The flying saucer
//!
//! A flattened body with a cockpit dome, a ring of blinking bulbs, and a
//! beam emitter underneath. Arrow keys translate it on the XZ plane inside
//! a radial bound (a move that would leave the disc is rejected), the body
//! spins at a constant rate, and the bulb ring alternates halves on a
//! fixed blink period. `P` toggles the bulb point lights, `S` the beam
//! spotlight.

use cgmath::{Matrix3, Rad, Vector3};
use winit::keyboard::KeyCode;

use crate::gfx::geometry::primitives::{generate_cylinder, generate_sphere};
use crate::gfx::material::Material;
use crate::scene::lights::{PointLight, SpotLight};
use crate::scene::{NodeId, Scene};
use crate::simulation::mover::PlanarMover;

const BODY_RADIUS: f32 = 4.0;
const BODY_FLATTEN: f32 = 0.3;
const COCKPIT_RADIUS: f32 = 1.6;
const BULB_COUNT: usize = 8;
const BULB_RING_RADIUS: f32 = 2.8;
const BULB_RADIUS: f32 = 0.35;

const OVNI_SPEED: f32 = 12.0;
const SPIN_SPEED: f32 = 0.8;
const BLINK_PERIOD: f32 = 0.5;

const BULB_COLOR: [f32; 3] = [1.0, 0.85, 0.3];
const BEAM_COLOR: [f32; 3] = [0.6, 0.75, 1.0];

/// The saucer rig: mover, spin, and animated lights.
pub struct OvniRig {
    pub root: NodeId,
    bulbs: Vec<NodeId>,
    pub mover: PlanarMover,
    /// Point-light slots claimed in `Scene::lights`.
    light_base: usize,
    yaw: f32,
    blink_timer: f32,
    blink_phase: bool,
    pub ring_enabled: bool,
    pub beam_enabled: bool,
}

impl OvniRig {
    /// Assembles the saucer at `position`, bounded to `radial_limit` from
    /// the world origin.
    pub fn build(scene: &mut Scene, position: Vector3<f32>, radial_limit: f32) -> Self {
        let sphere = scene.add_mesh(generate_sphere(32, 16));
        let cylinder = scene.add_mesh(generate_cylinder(1.0, 1.0, 24));

        let root = scene.add_root("ovni");
        scene.node_mut(root).position = position;

        let body = scene.add_child(root, "body");
        {
            let node = scene.node_mut(body);
            node.mesh = Some(sphere);
            node.scale = Vector3::new(BODY_RADIUS, BODY_RADIUS * BODY_FLATTEN, BODY_RADIUS);
            node.material = Material::phong(0.35, 0.35, 0.4, 64.0);
        }

        let cockpit = scene.add_child(root, "cockpit");
        {
            let node = scene.node_mut(cockpit);
            node.mesh = Some(sphere);
            node.position = Vector3::new(0.0, BODY_RADIUS * BODY_FLATTEN * 0.8, 0.0);
            node.scale = Vector3::new(COCKPIT_RADIUS, COCKPIT_RADIUS, COCKPIT_RADIUS);
            node.material = Material::phong(0.5, 0.8, 0.9, 96.0);
        }

        let mut bulbs = Vec::with_capacity(BULB_COUNT);
        for i in 0..BULB_COUNT {
            let bulb = scene.add_child(root, "bulb");
            let node = scene.node_mut(bulb);
            node.mesh = Some(sphere);
            node.position = Self::bulb_offset(i);
            node.scale = Vector3::new(BULB_RADIUS, BULB_RADIUS, BULB_RADIUS);
            node.material = Material::unlit(BULB_COLOR[0], BULB_COLOR[1], BULB_COLOR[2]);
            bulbs.push(bulb);
        }

        let beam = scene.add_child(root, "beam emitter");
        {
            let node = scene.node_mut(beam);
            node.mesh = Some(cylinder);
            node.position = Vector3::new(0.0, -BODY_RADIUS * BODY_FLATTEN, 0.0);
            node.scale = Vector3::new(1.2, 0.8, 1.2);
            node.material =
                Material::unlit(BEAM_COLOR[0], BEAM_COLOR[1], BEAM_COLOR[2]).with_emissive(
                    BEAM_COLOR[0] * 0.4,
                    BEAM_COLOR[1] * 0.4,
                    BEAM_COLOR[2] * 0.4,
                );
        }

        // Claim light slots: one point light per bulb, plus the beam spot.
        let light_base = scene.lights.points.len();
        for i in 0..BULB_COUNT {
            scene.lights.points.push(PointLight {
                position: position + Self::bulb_offset(i),
                color: BULB_COLOR,
                intensity: 2.0,
                enabled: true,
            });
        }
        scene.lights.spot = Some(SpotLight {
            position,
            direction: Vector3::new(0.0, -1.0, 0.0),
            color: BEAM_COLOR,
            intensity: 3.0,
            cos_cutoff: 25.0f32.to_radians().cos(),
            enabled: true,
        });

        Self {
            root,
            bulbs,
            mover: PlanarMover::new(position, OVNI_SPEED).with_radial_limit(radial_limit),
            light_base,
            yaw: 0.0,
            blink_timer: 0.0,
            blink_phase: false,
            ring_enabled: true,
            beam_enabled: true,
        }
    }

    fn bulb_offset(index: usize) -> Vector3<f32> {
        let angle = index as f32 * std::f32::consts::TAU / BULB_COUNT as f32;
        Vector3::new(
            BULB_RING_RADIUS * angle.cos(),
            -BODY_RADIUS * BODY_FLATTEN * 0.5,
            BULB_RING_RADIUS * angle.sin(),
        )
    }

    /// Arrow intents plus the light toggles.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::ArrowUp => self.mover.intents.up = pressed,
            KeyCode::ArrowDown => self.mover.intents.down = pressed,
            KeyCode::ArrowLeft => self.mover.intents.left = pressed,
            KeyCode::ArrowRight => self.mover.intents.right = pressed,
            KeyCode::KeyP if pressed => self.ring_enabled = !self.ring_enabled,
            KeyCode::KeyS if pressed => self.beam_enabled = !self.beam_enabled,
            _ => {}
        }
    }

    /// Advances movement, spin, and the blink cycle, then refreshes the
    /// scene lights from the new placement.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        self.mover.advance(dt);
        self.yaw = (self.yaw + SPIN_SPEED * dt) % std::f32::consts::TAU;

        self.blink_timer += dt;
        while self.blink_timer >= BLINK_PERIOD {
            self.blink_timer -= BLINK_PERIOD;
            self.blink_phase = !self.blink_phase;
        }

        {
            let node = scene.node_mut(self.root);
            node.position = self.mover.position;
            node.rotation.y = self.yaw;
        }

        // The ring spins with the body, so light positions are derived
        // from the yaw rather than read back from world matrices.
        let spin = Matrix3::from_angle_y(Rad(self.yaw));
        for i in 0..BULB_COUNT {
            let lit = self.bulb_lit(i);
            let world = self.mover.position + spin * Self::bulb_offset(i);

            let light = &mut scene.lights.points[self.light_base + i];
            light.position = world;
            light.enabled = lit;

            let node = scene.node_mut(self.bulbs[i]);
            node.material.emissive = if lit {
                BULB_COLOR
            } else {
                [0.0, 0.0, 0.0]
            };
        }

        if let Some(spot) = scene.lights.spot.as_mut() {
            spot.position = self.mover.position;
            spot.enabled = self.beam_enabled;
        }
    }

    /// Whether bulb `index` is lit this blink phase: halves alternate.
    fn bulb_lit(&self, index: usize) -> bool {
        self.ring_enabled && ((index % 2 == 0) == self.blink_phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraRig;

    fn setup() -> (Scene, OvniRig) {
        let mut scene = Scene::new(CameraRig::new(1.0, 50.0));
        let rig = OvniRig::build(&mut scene, Vector3::new(0.0, 30.0, 0.0), 100.0);
        (scene, rig)
    }

    #[test]
    fn test_blink_alternates_halves() {
        let (mut scene, mut rig) = setup();
        rig.update(0.0, &mut scene);
        let lit_even = scene.lights.points[rig.light_base].enabled;
        let lit_odd = scene.lights.points[rig.light_base + 1].enabled;
        assert_ne!(lit_even, lit_odd);

        rig.update(BLINK_PERIOD + 1e-4, &mut scene);
        assert_eq!(scene.lights.points[rig.light_base].enabled, lit_odd);
        assert_eq!(scene.lights.points[rig.light_base + 1].enabled, lit_even);
    }

    #[test]
    fn test_ring_toggle_darkens_every_bulb() {
        let (mut scene, mut rig) = setup();
        rig.handle_key(KeyCode::KeyP, true);
        rig.update(0.0, &mut scene);
        for i in 0..BULB_COUNT {
            assert!(!scene.lights.points[rig.light_base + i].enabled);
            let node = scene.node(rig.bulbs[i]);
            assert_eq!(node.material.emissive, [0.0, 0.0, 0.0]);
        }
        // Toggle is edge-triggered; releasing must not flip it back.
        rig.handle_key(KeyCode::KeyP, false);
        assert!(!rig.ring_enabled);
    }

    #[test]
    fn test_beam_toggle_disables_the_spot() {
        let (mut scene, mut rig) = setup();
        rig.handle_key(KeyCode::KeyS, true);
        rig.update(0.0, &mut scene);
        assert!(!scene.lights.spot.as_ref().unwrap().enabled);
    }

    #[test]
    fn test_movement_keeps_altitude_and_radial_bound() {
        let (mut scene, mut rig) = setup();
        rig.mover.position = Vector3::new(99.5, 30.0, 0.0);
        rig.handle_key(KeyCode::ArrowRight, true);
        rig.update(0.1, &mut scene);
        // 99.5 + 1.2 would leave the disc; the move is rejected.
        assert_eq!(rig.mover.position.x, 99.5);
        assert_eq!(rig.mover.position.y, 30.0);

        rig.handle_key(KeyCode::ArrowRight, false);
        rig.handle_key(KeyCode::ArrowLeft, true);
        rig.update(0.1, &mut scene);
        assert!((rig.mover.position.x - 98.3).abs() < 1e-4);
    }

    #[test]
    fn test_spot_follows_the_saucer() {
        let (mut scene, mut rig) = setup();
        rig.handle_key(KeyCode::ArrowUp, true);
        rig.update(0.5, &mut scene);
        let spot = scene.lights.spot.as_ref().unwrap();
        assert_eq!(spot.position, rig.mover.position);
        assert!(rig.mover.position.z < 0.0);
    }
}
