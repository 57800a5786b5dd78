/// Depth every pixel holds after [`DepthBuffer::reset_to_far`]
pub const FAR_DEPTH: f64 = f64::INFINITY;

/// A width×height grid of depths shared by every draw in a frame. Smaller
/// values are nearer the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depths: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depths: vec![FAR_DEPTH; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Stored depth at (x, y). Outside the buffer this is `-inf`, so nothing
    /// can pass a depth test there.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.index(x, y)
            .map_or(f64::NEG_INFINITY, |index| self.depths[index])
    }

    /// Store `depth` at (x, y); writes outside the buffer are ignored
    pub fn set(&mut self, x: usize, y: usize, depth: f64) {
        if let Some(index) = self.index(x, y) {
            self.depths[index] = depth;
        }
    }

    /// Must be called before each frame
    pub fn reset_to_far(&mut self) {
        self.depths.fill(FAR_DEPTH);
    }

    /// Change dimensions; all depths are reset
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depths.clear();
        self.depths.resize(width * height, FAR_DEPTH);
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}
