/// The programmable stages of the pipeline
use crate::texture::Texture;

/// Index of clip-space x in a varying vector
pub const VARY_X: usize = 0;
/// Index of clip-space y in a varying vector
pub const VARY_Y: usize = 1;
/// Index of clip-space z (screen depth after the viewport transform)
pub const VARY_Z: usize = 2;
/// Index of clip-space w
pub const VARY_W: usize = 3;

/// Dimensions a shader expects from a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderLayout {
    pub uniform_dim: usize,
    pub attribute_dim: usize,
    pub texture_count: usize,
    /// Length of the varying vector; at least 4, with clip x, y, z, w first
    pub varying_dim: usize,
}

/// Output of fragment shading for one pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub rgb: [f64; 3],
    pub depth: f64,
}

/// Per-mesh shading logic.
///
/// Both stages must be pure functions of their arguments. The renderer calls
/// `shade_vertex` once per mesh vertex per draw and `shade_fragment` once per
/// candidate pixel, before the depth test.
pub trait Shader {
    fn layout(&self) -> ShaderLayout;

    /// Write `layout().varying_dim` values into `varying`
    fn shade_vertex(&self, uniforms: &[f64], attributes: &[f64], varying: &mut [f64]);

    /// `varying` has been divided by w and interpolated across the triangle;
    /// components 0 and 1 are pixel coordinates, component 2 is depth in [0, 1].
    fn shade_fragment(&self, uniforms: &[f64], textures: &[&Texture], varying: &[f64]) -> Fragment;
}

impl<S: Shader + ?Sized> Shader for Box<S> {
    fn layout(&self) -> ShaderLayout {
        (**self).layout()
    }

    fn shade_vertex(&self, uniforms: &[f64], attributes: &[f64], varying: &mut [f64]) {
        (**self).shade_vertex(uniforms, attributes, varying)
    }

    fn shade_fragment(&self, uniforms: &[f64], textures: &[&Texture], varying: &[f64]) -> Fragment {
        (**self).shade_fragment(uniforms, textures, varying)
    }
}
