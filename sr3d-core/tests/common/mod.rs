use sr3d_core::{
    DepthBuffer, Fragment, Framebuffer, Mesh, MeshRenderer, RenderStats, Shader, ShaderLayout,
    Texture, Viewport, VARY_Z,
};

/// Attributes are a clip-space position followed by an RGB color
pub struct ClipColorShader;

pub const CLIP_COLOR_DIM: usize = 7;

impl Shader for ClipColorShader {
    fn layout(&self) -> ShaderLayout {
        ShaderLayout {
            uniform_dim: 0,
            attribute_dim: CLIP_COLOR_DIM,
            texture_count: 0,
            varying_dim: CLIP_COLOR_DIM,
        }
    }

    fn shade_vertex(&self, _uniforms: &[f64], attributes: &[f64], varying: &mut [f64]) {
        varying.copy_from_slice(attributes);
    }

    fn shade_fragment(&self, _uniforms: &[f64], _textures: &[&Texture], varying: &[f64]) -> Fragment {
        Fragment {
            rgb: [varying[4], varying[5], varying[6]],
            depth: varying[VARY_Z],
        }
    }
}

/// A square covering all of NDC x/y at the given NDC depth, w = 1
pub fn full_screen_quad(z: f64, rgb: [f64; 3]) -> Vec<[f64; CLIP_COLOR_DIM]> {
    [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
        .iter()
        .map(|&(x, y)| [x, y, z, 1.0, rgb[0], rgb[1], rgb[2]])
        .collect()
}

/// Concatenate quads into one mesh, preserving their order
pub fn quads_mesh(quads: &[Vec<[f64; CLIP_COLOR_DIM]>]) -> Mesh {
    let mut triangles = Vec::new();
    let mut vertices = Vec::new();
    for (i, quad) in quads.iter().enumerate() {
        let base = i * 4;
        triangles.push([base, base + 1, base + 2]);
        triangles.push([base, base + 2, base + 3]);
        for vertex in quad {
            vertices.extend_from_slice(vertex);
        }
    }
    Mesh::from_parts(triangles, vertices, CLIP_COLOR_DIM).unwrap()
}

pub fn draw<S: Shader + ?Sized>(
    mesh: &Mesh,
    shader: &S,
    uniforms: &[f64],
    textures: &[&Texture],
    size: usize,
) -> (Framebuffer, DepthBuffer, RenderStats) {
    let mut renderer = MeshRenderer::new(Viewport::new(size, size));
    let mut depth = DepthBuffer::new(size, size);
    let mut surface = Framebuffer::new(size, size);
    let stats = renderer.render(mesh, shader, uniforms, textures, &mut depth, &mut surface);
    (surface, depth, stats)
}
