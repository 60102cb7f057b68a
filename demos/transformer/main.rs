//! Transformable robot and towable trailer
//!
//! Keys: `1`-`4` front/side/top/perspective cameras, `R`/`F` head,
//! `W`/`S` waist, `Q`/`A` feet, `E`/`D` arms out/in, arrows drive the
//! trailer, `Esc` quits. Fold everything (`F`, `W`, `Q`, `D` held) and
//! push the trailer into the truck to couple them.

use cgmath::{Point3, Vector3};
use winit::keyboard::KeyCode;

use tinbot::gfx::camera::ViewPreset;
use tinbot::scene::Scene;
use tinbot::simulation::rigs::{RobotRig, TrailerRig};
use tinbot::simulation::traits::Simulation;

#[derive(Default)]
struct TransformerScene {
    robot: Option<RobotRig>,
    trailer: Option<TrailerRig>,
}

impl Simulation for TransformerScene {
    fn initialize(&mut self, scene: &mut Scene) {
        scene.background = [0.91, 0.99, 1.0];
        scene.lights.ambient = [0.35, 0.35, 0.35];

        scene.camera.ortho_half_height = 50.0;
        scene.camera.perspective_eye = Point3::new(50.0, 50.0, 50.0);
        scene.camera.set_view(ViewPreset::Perspective);

        self.robot = Some(RobotRig::build(scene, Vector3::new(0.0, 0.0, 0.0)));
        self.trailer = Some(TrailerRig::build(scene, Vector3::new(25.0, 0.0, -35.0)));
    }

    fn update(&mut self, delta_time: f32, scene: &mut Scene) {
        let (Some(robot), Some(trailer)) = (self.robot.as_mut(), self.trailer.as_mut()) else {
            return;
        };
        // The trailer's collision check must see this frame's pose.
        robot.update(delta_time, scene);
        trailer.update(delta_time, scene, robot);
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, scene: &mut Scene) {
        if pressed {
            match key {
                KeyCode::Digit1 => scene.camera.set_view(ViewPreset::Front),
                KeyCode::Digit2 => scene.camera.set_view(ViewPreset::Side),
                KeyCode::Digit3 => scene.camera.set_view(ViewPreset::Top),
                KeyCode::Digit4 => scene.camera.set_view(ViewPreset::Perspective),
                _ => {}
            }
        }

        if let Some(robot) = self.robot.as_mut() {
            robot.handle_key(key, pressed);
        }
        if let Some(trailer) = self.trailer.as_mut() {
            trailer.handle_key(key, pressed);
        }
    }

    fn name(&self) -> &str {
        "transformer"
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = tinbot::default();
    app.attach_simulation(Box::new(TransformerScene::default()));
    app.run()
}
