/// Perspective divide and the mapping from normalized device coordinates to pixels
use nalgebra::{Matrix4, Vector4};

use crate::shader::VARY_W;

/// Smallest |w| the viewport transform will divide by
pub const W_EPSILON: f64 = 1e-12;

/// Maps [-1, 1] × [-1, 1] × [-1, 1] to [0, width] × [0, height] × [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix4<f64> {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        Matrix4::new(
            hw, 0.0, 0.0, hw,
            0.0, hh, 0.0, hh,
            0.0, 0.0, 0.5, 0.5,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    #[rustfmt::skip]
    pub fn inverse_matrix(&self) -> Matrix4<f64> {
        Matrix4::new(
            2.0 / self.width, 0.0, 0.0, -1.0,
            0.0, 2.0 / self.height, 0.0, -1.0,
            0.0, 0.0, 2.0, -1.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Map a clip-space varying vector to screen space in `screen`.
    ///
    /// Positions go through [`Viewport::matrix`], then every component is
    /// divided by w. Returns `false`, leaving `screen` unspecified, when w is
    /// too close to zero to divide by.
    pub fn transform(&self, clip: &[f64], screen: &mut [f64]) -> bool {
        screen.copy_from_slice(clip);
        let position = self.matrix() * Vector4::new(clip[0], clip[1], clip[2], clip[3]);
        screen[..4].copy_from_slice(position.as_slice());

        let w = screen[VARY_W];
        if !(w.abs() >= W_EPSILON) {
            return false;
        }
        let inverse = 1.0 / w;
        for value in screen.iter_mut() {
            *value *= inverse;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_screen() {
        let viewport = Viewport::new(8, 6);
        let mut screen = [0.0; 4];
        assert!(viewport.transform(&[-1.0, -1.0, -1.0, 1.0], &mut screen));
        assert_eq!(screen, [0.0, 0.0, 0.0, 1.0]);
        assert!(viewport.transform(&[1.0, 1.0, 1.0, 1.0], &mut screen));
        assert_eq!(screen, [8.0, 6.0, 1.0, 1.0]);
    }

    #[test]
    fn test_divides_every_component_by_w() {
        let viewport = Viewport::new(8, 8);
        let mut screen = [0.0; 6];
        assert!(viewport.transform(&[0.0, 2.0, 0.0, 2.0, 6.0, 1.0], &mut screen));
        assert_eq!(screen, [4.0, 8.0, 0.5, 1.0, 3.0, 0.5]);
    }

    #[test]
    fn test_zero_w_is_rejected() {
        let viewport = Viewport::new(8, 8);
        let mut screen = [0.0; 4];
        assert!(!viewport.transform(&[1.0, 1.0, 0.0, 0.0], &mut screen));
    }

    #[test]
    fn test_inverse_matrix() {
        let viewport = Viewport::new(640, 480);
        let product = viewport.matrix() * viewport.inverse_matrix();
        assert!((product - Matrix4::identity()).norm() < 1e-12);
    }
}
