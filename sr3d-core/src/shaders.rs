/// Ready-made shaders for meshes in the `XYZ ST NOP` layout
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::camera::Camera;
use crate::mesh::XYZSTNOP_DIM;
use crate::shader::{Fragment, Shader, ShaderLayout, VARY_Z};
use crate::texture::Texture;
use crate::transform::ModelTransform;

pub const UNIF_CAMERA: usize = 0;
pub const UNIF_MODEL: usize = 16;
pub const UNIF_CAMERA_POS: usize = 32;
pub const UNIF_LIGHT_DIR: usize = 35;
pub const UNIF_LIGHT_COLOR: usize = 38;
pub const UNIF_AMBIENT: usize = 41;
pub const UNIF_SPECULAR: usize = 44;
pub const UNIF_SHININESS: usize = 47;
pub const SCENE_UNIFORM_DIM: usize = 48;

const ATTR_XYZ: usize = 0;
const ATTR_ST: usize = 3;
const ATTR_NOP: usize = 5;

/// Camera, model placement and a single directional light
#[derive(Debug, Clone, PartialEq)]
pub struct SceneUniforms {
    pub view_projection: Matrix4<f64>,
    pub model: Matrix4<f64>,
    pub camera_position: Vector3<f64>,
    /// Unit vector pointing from the surface toward the light
    pub light_direction: Vector3<f64>,
    pub light_color: Vector3<f64>,
    pub ambient: Vector3<f64>,
    pub specular: Vector3<f64>,
    pub shininess: f64,
}

impl SceneUniforms {
    pub fn new(camera: &Camera, model: &ModelTransform) -> Self {
        Self {
            view_projection: camera.view_projection(),
            model: model.model_matrix(),
            camera_position: camera.position.coords,
            ..Self::default()
        }
    }

    /// Set the light direction, normalizing it; a zero vector is ignored
    pub fn with_light_direction(mut self, direction: Vector3<f64>) -> Self {
        if let Some(unit) = direction.try_normalize(f64::EPSILON) {
            self.light_direction = unit;
        }
        self
    }

    /// Pack the uniform block both shipped shaders read. Matrices are stored
    /// column-major.
    pub fn to_uniforms(&self) -> Vec<f64> {
        let mut uniforms = vec![0.0; SCENE_UNIFORM_DIM];
        uniforms[UNIF_CAMERA..UNIF_MODEL].copy_from_slice(self.view_projection.as_slice());
        uniforms[UNIF_MODEL..UNIF_CAMERA_POS].copy_from_slice(self.model.as_slice());
        uniforms[UNIF_CAMERA_POS..UNIF_LIGHT_DIR].copy_from_slice(self.camera_position.as_slice());
        uniforms[UNIF_LIGHT_DIR..UNIF_LIGHT_COLOR].copy_from_slice(self.light_direction.as_slice());
        uniforms[UNIF_LIGHT_COLOR..UNIF_AMBIENT].copy_from_slice(self.light_color.as_slice());
        uniforms[UNIF_AMBIENT..UNIF_SPECULAR].copy_from_slice(self.ambient.as_slice());
        uniforms[UNIF_SPECULAR..UNIF_SHININESS].copy_from_slice(self.specular.as_slice());
        uniforms[UNIF_SHININESS] = self.shininess;
        uniforms
    }
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_projection: Matrix4::identity(),
            model: Matrix4::identity(),
            camera_position: Vector3::new(0.0, 0.0, 5.0),
            light_direction: Vector3::new(1.0, 1.0, 1.0).normalize(),
            light_color: Vector3::repeat(1.0),
            ambient: Vector3::repeat(0.15),
            specular: Vector3::repeat(0.4),
            shininess: 32.0,
        }
    }
}

fn matrix(uniforms: &[f64], offset: usize) -> Matrix4<f64> {
    Matrix4::from_column_slice(&uniforms[offset..offset + 16])
}

fn vector(values: &[f64], offset: usize) -> Vector3<f64> {
    Vector3::from_column_slice(&values[offset..offset + 3])
}

/// Position in world space and clip space
fn transform_position(uniforms: &[f64], attributes: &[f64]) -> (Vector4<f64>, Vector4<f64>) {
    let local = vector(attributes, ATTR_XYZ).push(1.0);
    let world = matrix(uniforms, UNIF_MODEL) * local;
    let clip = matrix(uniforms, UNIF_CAMERA) * world;
    (world, clip)
}

fn clamp_rgb(rgb: Vector3<f64>) -> [f64; 3] {
    [
        rgb.x.clamp(0.0, 1.0),
        rgb.y.clamp(0.0, 1.0),
        rgb.z.clamp(0.0, 1.0),
    ]
}

/// Blinn-Phong lighting of a diffuse texture.
///
/// The varying vector ends with a constant 1. After the viewport divides by
/// w it holds 1/w, which the fragment stage uses to undo the divide for
/// perspective-correct attributes. [`UnlitShader`] does the same.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhongShader;

impl PhongShader {
    const VARY_ST: usize = 4;
    const VARY_WORLD: usize = 6;
    const VARY_NORMAL: usize = 9;
    const VARY_ONE: usize = 12;
    const VARY_DIM: usize = 13;
}

impl Shader for PhongShader {
    fn layout(&self) -> ShaderLayout {
        ShaderLayout {
            uniform_dim: SCENE_UNIFORM_DIM,
            attribute_dim: XYZSTNOP_DIM,
            texture_count: 1,
            varying_dim: Self::VARY_DIM,
        }
    }

    fn shade_vertex(&self, uniforms: &[f64], attributes: &[f64], varying: &mut [f64]) {
        let (world, clip) = transform_position(uniforms, attributes);
        let normal = matrix(uniforms, UNIF_MODEL).fixed_view::<3, 3>(0, 0) * vector(attributes, ATTR_NOP);

        varying[..Self::VARY_ST].copy_from_slice(clip.as_slice());
        varying[Self::VARY_ST..Self::VARY_WORLD].copy_from_slice(&attributes[ATTR_ST..ATTR_NOP]);
        varying[Self::VARY_WORLD..Self::VARY_NORMAL].copy_from_slice(&world.as_slice()[..3]);
        varying[Self::VARY_NORMAL..Self::VARY_ONE].copy_from_slice(normal.as_slice());
        varying[Self::VARY_ONE] = 1.0;
    }

    fn shade_fragment(&self, uniforms: &[f64], textures: &[&Texture], varying: &[f64]) -> Fragment {
        let w = 1.0 / varying[Self::VARY_ONE];
        let (s, t) = (varying[Self::VARY_ST] * w, varying[Self::VARY_ST + 1] * w);
        let world = vector(varying, Self::VARY_WORLD) * w;
        let diffuse = Vector3::from(textures[0].sample(s, t));

        let ambient = vector(uniforms, UNIF_AMBIENT).component_mul(&diffuse);
        let mut rgb = ambient;
        let light = vector(uniforms, UNIF_LIGHT_DIR);
        if let Some(normal) = (vector(varying, Self::VARY_NORMAL) * w).try_normalize(f64::EPSILON) {
            let lambert = normal.dot(&light);
            if lambert > 0.0 {
                let light_color = vector(uniforms, UNIF_LIGHT_COLOR);
                rgb += lambert * light_color.component_mul(&diffuse);

                let to_camera = vector(uniforms, UNIF_CAMERA_POS) - world;
                if let Some(half) = (to_camera.normalize() + light).try_normalize(f64::EPSILON) {
                    let highlight = normal.dot(&half).max(0.0).powf(uniforms[UNIF_SHININESS]);
                    rgb += highlight * vector(uniforms, UNIF_SPECULAR).component_mul(&light_color);
                }
            }
        }

        Fragment {
            rgb: clamp_rgb(rgb),
            depth: varying[VARY_Z],
        }
    }
}

/// Texture color only, no lighting
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlitShader;

impl UnlitShader {
    const VARY_ST: usize = 4;
    const VARY_ONE: usize = 6;
    const VARY_DIM: usize = 7;
}

impl Shader for UnlitShader {
    fn layout(&self) -> ShaderLayout {
        ShaderLayout {
            uniform_dim: SCENE_UNIFORM_DIM,
            attribute_dim: XYZSTNOP_DIM,
            texture_count: 1,
            varying_dim: Self::VARY_DIM,
        }
    }

    fn shade_vertex(&self, uniforms: &[f64], attributes: &[f64], varying: &mut [f64]) {
        let (_, clip) = transform_position(uniforms, attributes);
        varying[..Self::VARY_ST].copy_from_slice(clip.as_slice());
        varying[Self::VARY_ST..Self::VARY_ONE].copy_from_slice(&attributes[ATTR_ST..ATTR_NOP]);
        varying[Self::VARY_ONE] = 1.0;
    }

    fn shade_fragment(&self, _uniforms: &[f64], textures: &[&Texture], varying: &[f64]) -> Fragment {
        let w = 1.0 / varying[Self::VARY_ONE];
        let rgb = textures[0].sample(varying[Self::VARY_ST] * w, varying[Self::VARY_ST + 1] * w);
        Fragment {
            rgb,
            depth: varying[VARY_Z],
        }
    }
}
