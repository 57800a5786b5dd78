/// Camera placement and the projections into clip space
use nalgebra::{Matrix4, Point3, Vector3};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A look-at camera.
///
/// Both projections map the view volume to [-1, 1] on every axis with the
/// near plane at z = -1, which is where the clipper cuts (`z + w = 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in radians
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f64::consts::FRAC_PI_4,
            aspect: aspect_ratio(width, height),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn set_aspect(&mut self, width: usize, height: usize) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                // Frame the target the way the perspective view does at its distance
                let height = 2.0 * (self.position - self.target).norm() * (self.fov / 2.0).tan();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Projection times view: world space to clip space
    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }
}

fn aspect_ratio(width: usize, height: usize) -> f64 {
    width.max(1) as f64 / height.max(1) as f64
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
