//! Moonlit garden: procedural sky, heightmap terrain, and a flying saucer
//!
//! Keys: `1` repaint the flower field, `2` repaint the star field,
//! `7`-`0` perspective/front/side/top cameras, `Q`/`W`/`E` moon material
//! (lambert/phong/toon), `D` toggle the moonlight, `P` toggle the
//! saucer's bulb ring, `S` toggle its beam, arrows fly the saucer,
//! `Esc` quits.
//!
//! The terrain heightmap is read from `assets/heightmap.png`; without it
//! the scene falls back to flat ground.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Point3, Vector3};
use rand::Rng;
use winit::keyboard::KeyCode;

use tinbot::gfx::camera::ViewPreset;
use tinbot::gfx::geometry::primitives::{
    generate_cube, generate_cylinder, generate_dome, generate_sphere, generate_wedge,
};
use tinbot::gfx::material::Material;
use tinbot::gfx::texture::{paint_flower_field, paint_star_field};
use tinbot::scene::{MeshId, NodeId, Scene, TextureId};
use tinbot::simulation::rigs::OvniRig;
use tinbot::simulation::traits::Simulation;
use tinbot::terrain::{displace_plane, scatter_positions, Heightmap};

const SKYDOME_RADIUS: f32 = 125.0;
const PLANE_SIZE: f32 = SKYDOME_RADIUS * 2.0;
const MAX_TERRAIN_HEIGHT: f32 = 25.0;
const GROUND_Y: f32 = -SKYDOME_RADIUS / 2.0;

const TREE_COUNT: usize = 10;
const TRUNK_RADIUS: f32 = 1.0;
const BRANCH_RADIUS: f32 = 0.5;
const DEBARKED_HEIGHT: f32 = 4.0;
const BARKED_HEIGHT: f32 = 8.0;
const TREE_HEIGHT: f32 = DEBARKED_HEIGHT + BARKED_HEIGHT;
const FOLIAGE_RADIUS: f32 = 4.0;
const EDGE_MARGIN: f32 = TREE_HEIGHT * 0.5;

const MOON_RADIUS: f32 = 15.0;

const TEXTURE_SIZE: u32 = 1024;

#[derive(Default)]
struct GardenScene {
    ovni: Option<OvniRig>,
    moon: Option<NodeId>,
    sky_texture: Option<TextureId>,
    field_texture: Option<TextureId>,
}

struct TreeKit {
    cylinder: MeshId,
    sphere: MeshId,
}

fn build_tree(scene: &mut Scene, kit: &TreeKit, x: f32, y: f32, z: f32, yaw: f32) {
    let debarked_material = Material::lambert(0.65, 0.27, 0.0);
    let barked_material = Material::lambert(0.37, 0.24, 0.1);
    let foliage_material = Material::lambert(0.06, 0.24, 0.06);

    let tilt = PI / 12.0;

    let tree = scene.add_root("tree");
    {
        let node = scene.node_mut(tree);
        node.position = Vector3::new(x, y, z);
        node.rotation.y = yaw;
    }

    let trunk = scene.add_child(tree, "trunk");
    scene.node_mut(trunk).rotation.z = tilt;

    let debarked = scene.add_child(trunk, "debarked");
    {
        let node = scene.node_mut(debarked);
        node.mesh = Some(kit.cylinder);
        node.position = Vector3::new(0.0, DEBARKED_HEIGHT / 2.0, 0.0);
        node.scale = Vector3::new(
            TRUNK_RADIUS * 0.8,
            DEBARKED_HEIGHT,
            TRUNK_RADIUS * 0.8,
        );
        node.material = debarked_material;
    }

    let barked = scene.add_child(trunk, "barked");
    {
        let node = scene.node_mut(barked);
        node.mesh = Some(kit.cylinder);
        node.position = Vector3::new(0.0, DEBARKED_HEIGHT + BARKED_HEIGHT / 2.0, 0.0);
        node.scale = Vector3::new(TRUNK_RADIUS, BARKED_HEIGHT, TRUNK_RADIUS);
        node.material = barked_material;
    }

    // Secondary branch leans the opposite way.
    let branch = scene.add_child(tree, "branch");
    {
        let node = scene.node_mut(branch);
        node.mesh = Some(kit.cylinder);
        node.position = Vector3::new(tilt.sin(), TREE_HEIGHT * tilt.cos(), 0.0);
        node.rotation.z = -PI / 6.0;
        node.scale = Vector3::new(BRANCH_RADIUS, TREE_HEIGHT / 1.7, BRANCH_RADIUS);
        node.material = barked_material;
    }

    let foliage1 = scene.add_child(tree, "foliage");
    {
        let node = scene.node_mut(foliage1);
        node.mesh = Some(kit.sphere);
        node.position = Vector3::new(-tilt.sin() * TREE_HEIGHT, TREE_HEIGHT * 1.2, 0.0);
        node.scale = Vector3::new(FOLIAGE_RADIUS, FOLIAGE_RADIUS, FOLIAGE_RADIUS);
        node.material = foliage_material;
    }

    let foliage2 = scene.add_child(tree, "foliage");
    {
        let node = scene.node_mut(foliage2);
        node.mesh = Some(kit.sphere);
        node.position = Vector3::new(0.5, TREE_HEIGHT * 1.2 * 0.9, 0.0);
        let r = FOLIAGE_RADIUS * 0.8;
        node.scale = Vector3::new(r, r, r);
        node.material = foliage_material;
    }
}

fn build_house(scene: &mut Scene, cube: MeshId, wedge: MeshId, position: Vector3<f32>) {
    let house = scene.add_root("house");
    scene.node_mut(house).position = position;

    let walls = scene.add_child(house, "walls");
    {
        let node = scene.node_mut(walls);
        node.mesh = Some(cube);
        node.position = Vector3::new(0.0, 3.0, 0.0);
        node.scale = Vector3::new(14.0, 6.0, 8.0);
        node.material = Material::lambert(0.95, 0.94, 0.88);
    }

    let roof = scene.add_child(house, "roof");
    {
        let node = scene.node_mut(roof);
        node.mesh = Some(wedge);
        node.position = Vector3::new(0.0, 8.0, 0.0);
        node.scale = Vector3::new(14.0, 4.0, 8.0);
        node.material = Material::lambert(0.75, 0.3, 0.15);
    }

    let blue = Material::lambert(0.15, 0.3, 0.7);
    let door = scene.add_child(house, "door");
    {
        let node = scene.node_mut(door);
        node.mesh = Some(cube);
        node.position = Vector3::new(0.0, 1.75, 4.0);
        node.scale = Vector3::new(2.0, 3.5, 0.4);
        node.material = blue;
    }
    for x in [-4.0f32, 4.0] {
        let window = scene.add_child(house, "window");
        let node = scene.node_mut(window);
        node.mesh = Some(cube);
        node.position = Vector3::new(x, 3.5, 4.0);
        node.scale = Vector3::new(2.0, 2.0, 0.4);
        node.material = blue;
    }
}

impl GardenScene {
    fn set_moon_material(&self, scene: &mut Scene, material: Material) {
        if let Some(moon) = self.moon {
            scene.node_mut(moon).material = material;
        }
    }
}

impl Simulation for GardenScene {
    fn initialize(&mut self, scene: &mut Scene) {
        let mut rng = rand::rng();

        scene.background = [1.0, 1.0, 1.0];
        scene.lights.ambient = [0.18, 0.18, 0.2];
        scene.lights.sun.direction = -Vector3::new(50.0, 30.0, 80.0).normalize();

        scene.camera.ortho_half_height = 70.0;
        scene.camera.perspective_eye = Point3::new(50.0, 30.0, 80.0);
        scene.camera.set_view(ViewPreset::Front);

        // Painted textures.
        let sky = scene.add_texture(
            paint_star_field(TEXTURE_SIZE, TEXTURE_SIZE, &mut rng),
            TEXTURE_SIZE,
            TEXTURE_SIZE,
        );
        let field = scene.add_texture(
            paint_flower_field(TEXTURE_SIZE, TEXTURE_SIZE, &mut rng),
            TEXTURE_SIZE,
            TEXTURE_SIZE,
        );
        self.sky_texture = Some(sky);
        self.field_texture = Some(field);

        // Skydome, seen from the inside.
        let dome = scene.add_mesh(generate_dome(64, 32));
        let skydome = scene.add_root("skydome");
        {
            let node = scene.node_mut(skydome);
            node.mesh = Some(dome);
            node.position = Vector3::new(0.0, GROUND_Y, 0.0);
            node.scale = Vector3::new(SKYDOME_RADIUS, SKYDOME_RADIUS, SKYDOME_RADIUS);
            node.material = Material::unlit(1.0, 1.0, 1.0);
            node.texture = Some(sky);
        }

        // Displaced terrain; a missing heightmap falls back to flat ground.
        let heightmap = Heightmap::load_or_flat("assets/heightmap.png");
        let terrain_mesh = scene.add_mesh(displace_plane(
            &heightmap,
            PLANE_SIZE,
            64,
            MAX_TERRAIN_HEIGHT,
        ));
        let terrain = scene.add_root("terrain");
        {
            let node = scene.node_mut(terrain);
            node.mesh = Some(terrain_mesh);
            node.position = Vector3::new(0.0, GROUND_Y, 0.0);
            node.material = Material::lambert(1.0, 1.0, 1.0);
            node.texture = Some(field);
        }

        let sphere = scene.add_mesh(generate_sphere(64, 32));
        let moon = scene.add_root("moon");
        {
            let node = scene.node_mut(moon);
            node.mesh = Some(sphere);
            node.position = Vector3::new(
                -SKYDOME_RADIUS * 0.4,
                GROUND_Y + SKYDOME_RADIUS * 0.6,
                -SKYDOME_RADIUS / 2.0,
            );
            node.scale = Vector3::new(MOON_RADIUS, MOON_RADIUS, MOON_RADIUS);
            node.material = Material::lambert(1.0, 1.0, 1.0).with_emissive(0.13, 0.13, 0.13);
        }
        self.moon = Some(moon);

        // Trees at terrain height, each with a random yaw.
        let kit = TreeKit {
            cylinder: scene.add_mesh(generate_cylinder(1.0, 1.0, 16)),
            sphere,
        };
        for (x, z) in scatter_positions(&mut rng, TREE_COUNT, PLANE_SIZE / 2.0, EDGE_MARGIN) {
            let y = heightmap.height_at(x, z, PLANE_SIZE, MAX_TERRAIN_HEIGHT) + GROUND_Y;
            build_tree(scene, &kit, x, y, z, rng.random_range(0.0..TAU));
        }

        let cube = scene.add_mesh(generate_cube());
        let wedge = scene.add_mesh(generate_wedge());
        let house_y = heightmap.height_at(40.0, 30.0, PLANE_SIZE, MAX_TERRAIN_HEIGHT) + GROUND_Y;
        build_house(scene, cube, wedge, Vector3::new(40.0, house_y, 30.0));

        self.ovni = Some(OvniRig::build(
            scene,
            Vector3::new(0.0, 25.0, 0.0),
            SKYDOME_RADIUS,
        ));
    }

    fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        if let Some(ovni) = self.ovni.as_mut() {
            ovni.update(delta_time, scene);
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, scene: &mut Scene) {
        if pressed {
            match key {
                KeyCode::Digit1 => {
                    if let Some(field) = self.field_texture {
                        scene.repaint_texture(
                            field,
                            paint_flower_field(TEXTURE_SIZE, TEXTURE_SIZE, &mut rand::rng()),
                        );
                    }
                }
                KeyCode::Digit2 => {
                    if let Some(sky) = self.sky_texture {
                        scene.repaint_texture(
                            sky,
                            paint_star_field(TEXTURE_SIZE, TEXTURE_SIZE, &mut rand::rng()),
                        );
                    }
                }
                KeyCode::Digit7 => scene.camera.set_view(ViewPreset::Perspective),
                KeyCode::Digit8 => scene.camera.set_view(ViewPreset::Front),
                KeyCode::Digit9 => scene.camera.set_view(ViewPreset::Side),
                KeyCode::Digit0 => scene.camera.set_view(ViewPreset::Top),
                KeyCode::KeyQ => self.set_moon_material(
                    scene,
                    Material::lambert(1.0, 1.0, 1.0).with_emissive(0.13, 0.13, 0.13),
                ),
                KeyCode::KeyW => self.set_moon_material(
                    scene,
                    Material::phong(1.0, 1.0, 1.0, 100.0).with_emissive(0.13, 0.13, 0.13),
                ),
                KeyCode::KeyE => {
                    self.set_moon_material(scene, Material::toon(1.0, 1.0, 1.0))
                }
                KeyCode::KeyD => {
                    scene.lights.sun.enabled = !scene.lights.sun.enabled;
                }
                _ => {}
            }
        }

        if let Some(ovni) = self.ovni.as_mut() {
            ovni.handle_key(key, pressed);
        }
    }

    fn name(&self) -> &str {
        "moonlit garden"
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = tinbot::default();
    app.attach_simulation(Box::new(GardenScene::default()));
    app.run()
}
