/// Model transforms: Euler rotation state, translation and scale
use nalgebra::{Matrix4, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts, wrapping each angle into [0, 2π)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        let tau = std::f64::consts::TAU;
        self.x = (self.x + dx).rem_euclid(tau);
        self.y = (self.y + dy).rem_euclid(tau);
        self.z = (self.z + dz).rem_euclid(tau);
    }

    /// Rotations applied in order X, Y, Z
    pub fn matrix(&self) -> Matrix4<f64> {
        let rx = Matrix4::new_rotation(Vector3::new(self.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.z));
        rz * ry * rx
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Places a mesh in the world: scale, then rotate, then translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub rotation: RotationState,
    pub translation: Vector3<f64>,
    pub scale: f64,
}

impl ModelTransform {
    pub fn new() -> Self {
        Self {
            rotation: RotationState::zero(),
            translation: Vector3::zeros(),
            scale: 1.0,
        }
    }

    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.rotation.rotate(dx, dy, dz);
    }

    pub fn model_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.translation)
            * self.rotation.matrix()
            * Matrix4::new_scaling(self.scale)
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-12);
        assert!((state.y - 0.2).abs() < 1e-12);
        assert!((state.z - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_wraps() {
        let mut state = RotationState::zero();
        state.rotate(-0.5, 7.0, 0.0);
        assert!(state.x >= 0.0 && state.x < std::f64::consts::TAU);
        assert!((state.y - (7.0 - std::f64::consts::TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_identity_transform() {
        let transform = ModelTransform::default();
        assert!((transform.model_matrix() - Matrix4::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_scale_rotate_translate_order() {
        let mut transform = ModelTransform::new();
        transform.scale = 2.0;
        transform.rotation = RotationState::new(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        transform.translation = Vector3::new(10.0, 0.0, 0.0);
        let point = transform
            .model_matrix()
            .transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((point - Point3::new(10.0, 2.0, 0.0)).norm() < 1e-12);
    }
}
