/// Anything that can receive the color of a pixel that passed the depth test
pub trait PixelSurface {
    fn set_pixel_color(&mut self, x: usize, y: usize, rgb: [f64; 3]);
}

/// An owned RGB color buffer; row 0 is the bottom of the image
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<[f64; 3]>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 3]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, rgb: [f64; 3]) {
        self.pixels.fill(rgb);
    }

    /// Change dimensions; every pixel becomes black
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, [0.0; 3]);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[f64; 3]> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Rows from bottom to top
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[[f64; 3]]> {
        // chunks_exact(0) panics, and an empty buffer has no rows anyway
        self.pixels.chunks_exact(self.width.max(1))
    }
}

impl PixelSurface for Framebuffer {
    fn set_pixel_color(&mut self, x: usize, y: usize, rgb: [f64; 3]) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = rgb;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_pixel() {
        let mut framebuffer = Framebuffer::new(4, 3);
        framebuffer.set_pixel_color(3, 2, [1.0, 0.5, 0.0]);
        assert_eq!(framebuffer.pixel(3, 2), Some([1.0, 0.5, 0.0]));
        assert_eq!(framebuffer.pixel(4, 2), None);
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut framebuffer = Framebuffer::new(2, 2);
        framebuffer.set_pixel_color(5, 5, [1.0; 3]);
        assert!(framebuffer.rows().flatten().all(|p| *p == [0.0; 3]));
    }

    #[test]
    fn test_rows_bottom_to_top() {
        let mut framebuffer = Framebuffer::new(2, 3);
        framebuffer.clear([0.2; 3]);
        framebuffer.set_pixel_color(0, 2, [1.0; 3]);
        let top = framebuffer.rows().next_back().unwrap();
        assert_eq!(top[0], [1.0; 3]);
        assert_eq!(framebuffer.rows().count(), 3);
    }
}
