/// SR3D Core Library - a CPU triangle rasterizer
///
/// This library provides the stateless pieces of a software 3D pipeline:
/// meshes and their text file format, programmable shaders, near-plane
/// clipping, the viewport transform, triangle rasterization and depth testing.

pub mod camera;
pub mod clip;
pub mod depth;
pub mod error;
pub mod framebuffer;
pub mod mesh;
pub mod mesh_file;
pub mod raster;
pub mod render;
pub mod shader;
pub mod shaders;
pub mod texture;
pub mod transform;
pub mod viewport;

// Re-export commonly used types
pub use camera::{Camera, ProjectionMode};
pub use clip::{ClipCase, Clipper};
pub use depth::{DepthBuffer, FAR_DEPTH};
pub use error::{MeshError, MeshFileError};
pub use framebuffer::{Framebuffer, PixelSurface};
pub use mesh::{Mesh, XYZSTNOP_DIM};
pub use mesh_file::{load_mesh, parse_mesh, save_mesh, write_mesh};
pub use raster::{rasterize_triangle, FragmentInputs, RasterStats, RenderTarget};
pub use render::{MeshRenderer, RenderStats};
pub use shader::{Fragment, Shader, ShaderLayout, VARY_W, VARY_X, VARY_Y, VARY_Z};
pub use shaders::{PhongShader, SceneUniforms, UnlitShader};
pub use texture::{Filtering, Texture};
pub use transform::{ModelTransform, RotationState};
pub use viewport::Viewport;
