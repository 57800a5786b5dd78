/// How samples between texel centres are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filtering {
    #[default]
    Nearest,
    Linear,
}

/// A width×height grid of RGB texels with wrap-around addressing.
///
/// Texture coordinates (s, t) map [0, 1] across the grid; texel (0, 0) is at
/// s = 0, t = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<[f64; 3]>,
    pub filtering: Filtering,
}

impl Texture {
    /// Returns `None` when a dimension is zero or `texels` has the wrong length
    pub fn new(width: usize, height: usize, texels: Vec<[f64; 3]>) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != width.checked_mul(height)? {
            return None;
        }
        Some(Self {
            width,
            height,
            texels,
            filtering: Filtering::Nearest,
        })
    }

    pub fn solid(rgb: [f64; 3]) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![rgb],
            filtering: Filtering::Nearest,
        }
    }

    /// `squares`×`squares` checkerboard alternating between `a` and `b`
    pub fn checkerboard(size: usize, squares: usize, a: [f64; 3], b: [f64; 3]) -> Self {
        let size = size.max(1);
        let cell = (size / squares.max(1)).max(1);
        let texels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x / cell + y / cell) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();
        Self {
            width: size,
            height: size,
            texels,
            filtering: Filtering::Nearest,
        }
    }

    pub fn with_filtering(mut self, filtering: Filtering) -> Self {
        self.filtering = filtering;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn sample(&self, s: f64, t: f64) -> [f64; 3] {
        let s = if s.is_finite() { s } else { 0.0 };
        let t = if t.is_finite() { t } else { 0.0 };
        let u = s * self.width as f64 - 0.5;
        let v = t * self.height as f64 - 0.5;
        match self.filtering {
            Filtering::Nearest => self.texel(u.round() as i64, v.round() as i64),
            Filtering::Linear => {
                let (i, j) = (u.floor(), v.floor());
                let (fu, fv) = (u - i, v - j);
                let (i, j) = (i as i64, j as i64);
                let lerp = |a: [f64; 3], b: [f64; 3], f: f64| {
                    [
                        a[0] + (b[0] - a[0]) * f,
                        a[1] + (b[1] - a[1]) * f,
                        a[2] + (b[2] - a[2]) * f,
                    ]
                };
                let bottom = lerp(self.texel(i, j), self.texel(i + 1, j), fu);
                let top = lerp(self.texel(i, j + 1), self.texel(i + 1, j + 1), fu);
                lerp(bottom, top, fv)
            }
        }
    }

    fn texel(&self, i: i64, j: i64) -> [f64; 3] {
        let x = i.rem_euclid(self.width as i64) as usize;
        let y = j.rem_euclid(self.height as i64) as usize;
        self.texels[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f64; 3] = [0.0, 0.0, 0.0];
    const WHITE: [f64; 3] = [1.0, 1.0, 1.0];

    #[test]
    fn test_new_checks_length() {
        assert!(Texture::new(2, 2, vec![BLACK; 4]).is_some());
        assert!(Texture::new(2, 2, vec![BLACK; 3]).is_none());
        assert!(Texture::new(0, 2, vec![]).is_none());
    }

    #[test]
    fn test_nearest_sampling_wraps() {
        let texture = Texture::new(2, 1, vec![BLACK, WHITE]).unwrap();
        assert_eq!(texture.sample(0.25, 0.5), BLACK);
        assert_eq!(texture.sample(0.75, 0.5), WHITE);
        assert_eq!(texture.sample(1.25, 0.5), BLACK);
        assert_eq!(texture.sample(-0.25, 0.5), WHITE);
    }

    #[test]
    fn test_linear_sampling_blends() {
        let texture = Texture::new(2, 1, vec![BLACK, WHITE])
            .unwrap()
            .with_filtering(Filtering::Linear);
        let mid = texture.sample(0.5, 0.5);
        assert!((mid[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_checkerboard_alternates() {
        let texture = Texture::checkerboard(4, 2, BLACK, WHITE);
        assert_eq!(texture.sample(0.1, 0.1), BLACK);
        assert_eq!(texture.sample(0.9, 0.1), WHITE);
        assert_eq!(texture.sample(0.9, 0.9), BLACK);
    }

    #[test]
    fn test_non_finite_coordinates() {
        let texture = Texture::solid(WHITE);
        assert_eq!(texture.sample(f64::NAN, f64::INFINITY), WHITE);
    }
}
