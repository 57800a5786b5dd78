/// Drawing whole meshes in triangle order
use crate::clip::{ClipCase, Clipper};
use crate::depth::DepthBuffer;
use crate::framebuffer::PixelSurface;
use crate::mesh::Mesh;
use crate::raster::{rasterize_triangle, FragmentInputs, RenderTarget};
use crate::shader::Shader;
use crate::texture::Texture;
use crate::viewport::Viewport;

/// Counters describing one draw call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles_submitted: usize,
    /// Mesh triangles entirely behind the near plane
    pub triangles_discarded: usize,
    /// Post-clip triangles that were back-facing, degenerate or had w = 0
    pub triangles_culled: usize,
    pub triangles_rasterized: usize,
    pub fragments_shaded: usize,
    pub fragments_written: usize,
}

/// Renders meshes into a depth buffer and pixel surface.
///
/// Owns the per-draw scratch buffers (shaded vertices, clip intersections,
/// screen-space vertices, interpolated varyings) so repeated draws reuse
/// their allocations.
#[derive(Debug)]
pub struct MeshRenderer {
    viewport: Viewport,
    varyings: Vec<f64>,
    clipper: Clipper,
    screen: Vec<f64>,
    fragment: Vec<f64>,
}

impl MeshRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            varyings: Vec::new(),
            clipper: Clipper::new(),
            screen: Vec::new(),
            fragment: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Draw `mesh` with `shader`.
    ///
    /// Every vertex is shaded once, then each triangle is clipped, mapped to
    /// the viewport and rasterized.
    ///
    /// If the shader's layout does not fit the mesh or the supplied uniforms
    /// and textures, a warning is logged and nothing is drawn.
    pub fn render<S, P>(
        &mut self,
        mesh: &Mesh,
        shader: &S,
        uniforms: &[f64],
        textures: &[&Texture],
        depth: &mut DepthBuffer,
        surface: &mut P,
    ) -> RenderStats
    where
        S: Shader + ?Sized,
        P: PixelSurface + ?Sized,
    {
        let layout = shader.layout();
        if layout.attribute_dim != mesh.attr_dim() {
            log::warn!(
                "skipping draw: shader expects attrDim {} but mesh has {}",
                layout.attribute_dim,
                mesh.attr_dim()
            );
            return RenderStats::default();
        }
        if layout.varying_dim < 4 {
            log::warn!(
                "skipping draw: varyDim {} leaves no room for a clip-space position",
                layout.varying_dim
            );
            return RenderStats::default();
        }
        if uniforms.len() < layout.uniform_dim {
            log::warn!(
                "skipping draw: shader expects {} uniforms, got {}",
                layout.uniform_dim,
                uniforms.len()
            );
            return RenderStats::default();
        }
        if textures.len() < layout.texture_count {
            log::warn!(
                "skipping draw: shader expects {} textures, got {}",
                layout.texture_count,
                textures.len()
            );
            return RenderStats::default();
        }

        let vary_dim = layout.varying_dim;
        let Self {
            viewport,
            varyings,
            clipper,
            screen,
            fragment,
        } = self;

        varyings.clear();
        varyings.resize(mesh.vert_num() * vary_dim, 0.0);
        for (varying, attributes) in varyings.chunks_exact_mut(vary_dim).zip(mesh.vertices()) {
            shader.shade_vertex(uniforms, attributes, varying);
        }
        screen.resize(3 * vary_dim, 0.0);
        fragment.resize(vary_dim, 0.0);

        let inputs = FragmentInputs {
            shader,
            uniforms,
            textures,
        };
        let mut target = RenderTarget { depth, surface };
        let mut stats = RenderStats::default();

        for &[i, j, k] in mesh.triangles() {
            stats.triangles_submitted += 1;
            let varying = |index: usize| varyings.get(index * vary_dim..(index + 1) * vary_dim);
            let (Some(a), Some(b), Some(c)) = (varying(i), varying(j), varying(k)) else {
                continue;
            };

            let clipped = clipper.clip(a, b, c);
            if clipped.case() == ClipCase::AllClipped {
                stats.triangles_discarded += 1;
                continue;
            }
            for triangle in clipped.triangles() {
                let (sa, rest) = screen.split_at_mut(vary_dim);
                let (sb, sc) = rest.split_at_mut(vary_dim);
                let visible = viewport.transform(triangle[0], sa)
                    && viewport.transform(triangle[1], sb)
                    && viewport.transform(triangle[2], sc);
                if !visible {
                    stats.triangles_culled += 1;
                    continue;
                }
                match rasterize_triangle(&inputs, &mut target, sa, sb, sc, fragment) {
                    Some(raster) => {
                        stats.triangles_rasterized += 1;
                        stats.fragments_shaded += raster.fragments_shaded;
                        stats.fragments_written += raster.fragments_written;
                    }
                    None => stats.triangles_culled += 1,
                }
            }
        }

        log::debug!("{:?}", stats);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::Framebuffer;
    use crate::shader::{Fragment, ShaderLayout, VARY_Z};
    use std::cell::Cell;

    /// Attributes are clip-space x, y, z, w and an RGB color
    #[derive(Default)]
    struct ColorShader {
        vertex_calls: Cell<usize>,
    }

    impl Shader for ColorShader {
        fn layout(&self) -> ShaderLayout {
            ShaderLayout {
                uniform_dim: 0,
                attribute_dim: 7,
                texture_count: 0,
                varying_dim: 7,
            }
        }

        fn shade_vertex(&self, _uniforms: &[f64], attributes: &[f64], varying: &mut [f64]) {
            self.vertex_calls.set(self.vertex_calls.get() + 1);
            varying.copy_from_slice(attributes);
        }

        fn shade_fragment(&self, _uniforms: &[f64], _textures: &[&Texture], varying: &[f64]) -> Fragment {
            Fragment {
                rgb: [varying[4], varying[5], varying[6]],
                depth: varying[VARY_Z],
            }
        }
    }

    fn quad_mesh() -> Mesh {
        // Two triangles sharing an edge, covering NDC [-1, 1]^2 at z = 0
        let vertices = vec![
            -1.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, //
            1.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, //
            -1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0,
        ];
        Mesh::from_parts(vec![[0, 1, 2], [0, 2, 3]], vertices, 7).unwrap()
    }

    #[test]
    fn test_vertices_are_shaded_once() {
        let mesh = quad_mesh();
        let shader = ColorShader::default();
        let mut renderer = MeshRenderer::new(Viewport::new(8, 8));
        let mut depth = DepthBuffer::new(8, 8);
        let mut surface = Framebuffer::new(8, 8);
        let stats = renderer.render(&mesh, &shader, &[], &[], &mut depth, &mut surface);
        assert_eq!(shader.vertex_calls.get(), 4);
        assert_eq!(stats.triangles_submitted, 2);
        assert_eq!(stats.triangles_rasterized, 2);
        assert_eq!(surface.pixel(4, 4), Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_attribute_mismatch_draws_nothing() {
        let mesh = Mesh::from_parts(vec![[0, 1, 2]], vec![0.0; 12], 4).unwrap();
        let shader = ColorShader::default();
        let mut renderer = MeshRenderer::new(Viewport::new(8, 8));
        let mut depth = DepthBuffer::new(8, 8);
        let mut surface = Framebuffer::new(8, 8);
        let stats = renderer.render(&mesh, &shader, &[], &[], &mut depth, &mut surface);
        assert_eq!(stats, RenderStats::default());
        assert_eq!(shader.vertex_calls.get(), 0);
    }

    #[test]
    fn test_missing_uniforms_draw_nothing() {
        struct Needy;
        impl Shader for Needy {
            fn layout(&self) -> ShaderLayout {
                ShaderLayout {
                    uniform_dim: 3,
                    attribute_dim: 7,
                    texture_count: 1,
                    varying_dim: 4,
                }
            }
            fn shade_vertex(&self, _: &[f64], attributes: &[f64], varying: &mut [f64]) {
                varying.copy_from_slice(&attributes[..4]);
            }
            fn shade_fragment(&self, _: &[f64], _: &[&Texture], _: &[f64]) -> Fragment {
                Fragment {
                    rgb: [1.0; 3],
                    depth: 0.0,
                }
            }
        }

        let mesh = quad_mesh();
        let mut renderer = MeshRenderer::new(Viewport::new(8, 8));
        let mut depth = DepthBuffer::new(8, 8);
        let mut surface = Framebuffer::new(8, 8);
        let texture = Texture::solid([1.0; 3]);
        let stats = renderer.render(&mesh, &Needy, &[0.0], &[&texture], &mut depth, &mut surface);
        assert_eq!(stats, RenderStats::default());
        let stats = renderer.render(&mesh, &Needy, &[0.0; 3], &[], &mut depth, &mut surface);
        assert_eq!(stats, RenderStats::default());
        let stats = renderer.render(&mesh, &Needy, &[0.0; 3], &[&texture], &mut depth, &mut surface);
        assert_eq!(stats.triangles_rasterized, 2);
    }

    #[test]
    fn test_triangle_behind_camera_is_discarded() {
        let vertices = vec![
            0.0, 0.0, 0.0, -1.0, 1.0, 1.0, 1.0, //
            1.0, 0.0, 0.0, -1.0, 1.0, 1.0, 1.0, //
            0.0, 1.0, 0.0, -1.0, 1.0, 1.0, 1.0,
        ];
        let mesh = Mesh::from_parts(vec![[0, 1, 2]], vertices, 7).unwrap();
        let shader = ColorShader::default();
        let mut renderer = MeshRenderer::new(Viewport::new(8, 8));
        let mut depth = DepthBuffer::new(8, 8);
        let mut surface = Framebuffer::new(8, 8);
        let stats = renderer.render(&mesh, &shader, &[], &[], &mut depth, &mut surface);
        assert_eq!(stats.triangles_discarded, 1);
        assert_eq!(stats.fragments_shaded, 0);
    }

    #[test]
    fn test_repeated_draws_match() {
        let mesh = quad_mesh();
        let shader = ColorShader::default();
        let mut renderer = MeshRenderer::new(Viewport::new(4, 4));
        let mut depth = DepthBuffer::new(4, 4);
        let mut surface = Framebuffer::new(4, 4);
        let first = renderer.render(&mesh, &shader, &[], &[], &mut depth, &mut surface);
        depth.reset_to_far();
        let second = renderer.render(&mesh, &shader, &[], &[], &mut depth, &mut surface);
        assert_eq!(first, second);
        assert!(first.fragments_written > 0);
    }
}
