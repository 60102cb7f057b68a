//! Camera rig with the scene's fixed view presets
//!
//! Three orthographic views (front, side, top) plus one perspective view,
//! switched at runtime by digit keys. Window resize feeds the new aspect
//! ratio back into every projection.

use cgmath::{ortho, perspective, Deg, Matrix4, Point3, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// The selectable view presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    Front,
    Side,
    Top,
    Perspective,
}

/// Camera state shared by all presets.
pub struct CameraRig {
    pub preset: ViewPreset,
    aspect: f32,
    /// Half-height of the orthographic view volume, world units.
    pub ortho_half_height: f32,
    /// Eye position of the perspective preset.
    pub perspective_eye: Point3<f32>,
    pub target: Point3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Distance of the fixed orthographic eyes from the target.
    pub ortho_distance: f32,
}

/// GPU-side camera data.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    pub view_position: [f32; 4],
    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraRig {
    pub fn new(aspect: f32, ortho_half_height: f32) -> Self {
        Self {
            preset: ViewPreset::Perspective,
            aspect,
            ortho_half_height,
            perspective_eye: Point3::new(50.0, 50.0, 50.0),
            target: Point3::new(0.0, 0.0, 0.0),
            fovy: Deg(70.0),
            znear: 1.0,
            zfar: 1000.0,
            ortho_distance: 100.0,
        }
    }

    pub fn set_view(&mut self, preset: ViewPreset) {
        self.preset = preset;
    }

    /// Recomputes the aspect ratio after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Current eye position in world space.
    pub fn eye(&self) -> Point3<f32> {
        let d = self.ortho_distance;
        match self.preset {
            ViewPreset::Front => self.target + Vector3::new(0.0, 0.0, d),
            ViewPreset::Side => self.target + Vector3::new(d, 0.0, 0.0),
            ViewPreset::Top => self.target + Vector3::new(0.0, d, 0.0),
            ViewPreset::Perspective => self.perspective_eye,
        }
    }

    /// Combined view-projection matrix for the active preset.
    pub fn view_proj(&self) -> Matrix4<f32> {
        // Looking straight down leaves the default up vector degenerate.
        let up = match self.preset {
            ViewPreset::Top => -Vector3::unit_z(),
            _ => Vector3::unit_y(),
        };
        let view = Matrix4::look_at_rh(self.eye(), self.target, up);

        let proj = match self.preset {
            ViewPreset::Perspective => perspective(self.fovy, self.aspect, self.znear, self.zfar),
            _ => {
                let h = self.ortho_half_height;
                let w = h * self.aspect;
                ortho(-w, w, -h, h, self.znear, self.zfar)
            }
        };

        OPENGL_TO_WGPU_MATRIX * proj * view
    }

    pub fn uniform(&self) -> CameraUniform {
        let eye = self.eye();
        CameraUniform {
            view_position: [eye.x, eye.y, eye.z, 1.0],
            view_proj: self.view_proj().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Transform;

    #[test]
    fn test_front_view_centers_the_target() {
        let mut rig = CameraRig::new(1.0, 50.0);
        rig.set_view(ViewPreset::Front);
        let clip = rig.view_proj().transform_point(rig.target);
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1e-5);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut rig = CameraRig::new(1.0, 50.0);
        rig.set_view(ViewPreset::Front);
        rig.resize(200, 100);
        // A point at half the ortho height lands closer to the clip-edge
        // in Y than in X once the view is twice as wide.
        let p = rig
            .view_proj()
            .transform_point(Point3::new(25.0, 25.0, 0.0));
        assert!((p.y - 0.5).abs() < 1e-5);
        assert!((p.x - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_resize_rejects_degenerate_sizes() {
        let mut rig = CameraRig::new(2.0, 50.0);
        rig.resize(0, 100);
        rig.set_view(ViewPreset::Front);
        let p = rig
            .view_proj()
            .transform_point(Point3::new(100.0, 0.0, 0.0));
        // Aspect stayed at 2.0, so 100 world units is the clip edge.
        assert!((p.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_top_view_looks_down() {
        let mut rig = CameraRig::new(1.0, 50.0);
        rig.set_view(ViewPreset::Top);
        let below = rig
            .view_proj()
            .transform_point(Point3::new(0.0, -10.0, 0.0));
        let above = rig
            .view_proj()
            .transform_point(Point3::new(0.0, 10.0, 0.0));
        // Depth increases away from the eye.
        assert!(below.z > above.z);
    }
}
