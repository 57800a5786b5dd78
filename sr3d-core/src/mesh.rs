/// Triangle meshes: index storage plus flat per-vertex attribute storage
use std::f64::consts::PI;
use std::slice::ChunksExact;

use nalgebra::Vector3;

use crate::error::MeshError;

/// Attribute dimension of the `XYZ ST NOP` layout produced by the builders:
/// position, texture coordinates, unit normal.
pub const XYZSTNOP_DIM: usize = 8;

/// A triangle mesh.
///
/// Triangles and vertices live in two separately owned buffers. Every index in
/// `triangles` is kept below `vert_num()`; all mutating accessors enforce this.
/// Slices returned by the accessors borrow the mesh and cannot outlive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    attr_dim: usize,
    triangles: Vec<[usize; 3]>,
    vertices: Vec<f64>,
}

impl Mesh {
    /// Allocate a zero-filled mesh with room for `tri_num` triangles and
    /// `vert_num` vertices of `attr_dim` attributes each.
    pub fn new(tri_num: usize, vert_num: usize, attr_dim: usize) -> Result<Self, MeshError> {
        if attr_dim == 0 {
            return Err(MeshError::ZeroAttributeDimension);
        }
        if tri_num > 0 && vert_num == 0 {
            return Err(MeshError::IndexOutOfRange {
                tri: 0,
                index: 0,
                vert_num,
            });
        }

        let allocation = MeshError::Allocation {
            tri_num,
            vert_num,
            attr_dim,
        };
        let vert_len = vert_num
            .checked_mul(attr_dim)
            .ok_or_else(|| allocation.clone())?;

        let mut triangles = Vec::new();
        triangles
            .try_reserve_exact(tri_num)
            .map_err(|_| allocation.clone())?;
        triangles.resize(tri_num, [0; 3]);

        let mut vertices = Vec::new();
        vertices
            .try_reserve_exact(vert_len)
            .map_err(|_| allocation)?;
        vertices.resize(vert_len, 0.0);

        Ok(Self {
            attr_dim,
            triangles,
            vertices,
        })
    }

    /// Build a mesh from already populated buffers, validating every index.
    pub fn from_parts(
        triangles: Vec<[usize; 3]>,
        vertices: Vec<f64>,
        attr_dim: usize,
    ) -> Result<Self, MeshError> {
        if attr_dim == 0 {
            return Err(MeshError::ZeroAttributeDimension);
        }
        if vertices.len() % attr_dim != 0 {
            return Err(MeshError::AttributeLength {
                expected: attr_dim,
                actual: vertices.len() % attr_dim,
            });
        }
        let vert_num = vertices.len() / attr_dim;
        for (tri, indices) in triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&index| index >= vert_num) {
                return Err(MeshError::IndexOutOfRange {
                    tri,
                    index,
                    vert_num,
                });
            }
        }
        Ok(Self {
            attr_dim,
            triangles,
            vertices,
        })
    }

    pub fn tri_num(&self) -> usize {
        self.triangles.len()
    }

    pub fn vert_num(&self) -> usize {
        self.vertices.len() / self.attr_dim
    }

    pub fn attr_dim(&self) -> usize {
        self.attr_dim
    }

    /// Set the `tri`th triangle to the vertex indices `indices`
    pub fn set_triangle(&mut self, tri: usize, indices: [usize; 3]) -> Result<(), MeshError> {
        let tri_num = self.tri_num();
        let vert_num = self.vert_num();
        if let Some(&index) = indices.iter().find(|&&index| index >= vert_num) {
            return Err(MeshError::IndexOutOfRange {
                tri,
                index,
                vert_num,
            });
        }
        let slot = self
            .triangles
            .get_mut(tri)
            .ok_or(MeshError::TriangleOutOfRange { tri, tri_num })?;
        *slot = indices;
        Ok(())
    }

    pub fn triangle(&self, tri: usize) -> Option<[usize; 3]> {
        self.triangles.get(tri).copied()
    }

    /// All triangles in stored (and therefore render) order
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Overwrite the attributes of the `vert`th vertex
    pub fn set_vertex(&mut self, vert: usize, attributes: &[f64]) -> Result<(), MeshError> {
        if attributes.len() != self.attr_dim {
            return Err(MeshError::AttributeLength {
                expected: self.attr_dim,
                actual: attributes.len(),
            });
        }
        let vert_num = self.vert_num();
        let slot = self
            .vertex_mut(vert)
            .ok_or(MeshError::VertexOutOfRange { vert, vert_num })?;
        slot.copy_from_slice(attributes);
        Ok(())
    }

    pub fn vertex(&self, vert: usize) -> Option<&[f64]> {
        let start = vert.checked_mul(self.attr_dim)?;
        self.vertices.get(start..start.checked_add(self.attr_dim)?)
    }

    pub fn vertex_mut(&mut self, vert: usize) -> Option<&mut [f64]> {
        let start = vert.checked_mul(self.attr_dim)?;
        self.vertices.get_mut(start..start.checked_add(self.attr_dim)?)
    }

    /// Iterate over vertex attribute vectors in index order
    pub fn vertices(&self) -> ChunksExact<'_, f64> {
        self.vertices.chunks_exact(self.attr_dim)
    }

    /// Axis-aligned cube centred on the origin, `XYZ ST NOP` layout.
    ///
    /// Each face has its own four vertices so normals and texture coordinates
    /// stay flat per face. Faces wind counter-clockwise seen from outside.
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        // (normal, u, v) with u x v == normal
        let faces: [(Vector3<f64>, Vector3<f64>, Vector3<f64>); 6] = [
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut triangles = Vec::with_capacity(faces.len() * 2);
        let mut vertices = Vec::with_capacity(faces.len() * 4 * XYZSTNOP_DIM);
        for (face, (normal, u, v)) in faces.iter().enumerate() {
            for &(cu, cv) in &corners {
                let position = (normal + u * cu + v * cv) * half;
                vertices.extend_from_slice(&[
                    position.x,
                    position.y,
                    position.z,
                    (cu + 1.0) / 2.0,
                    (cv + 1.0) / 2.0,
                    normal.x,
                    normal.y,
                    normal.z,
                ]);
            }
            let base = face * 4;
            triangles.push([base, base + 1, base + 2]);
            triangles.push([base, base + 2, base + 3]);
        }

        Self {
            attr_dim: XYZSTNOP_DIM,
            triangles,
            vertices,
        }
    }

    /// Latitude/longitude sphere centred on the origin, `XYZ ST NOP` layout.
    ///
    /// The seam column is duplicated so texture coordinates run 0..=1 in both
    /// directions. Triangles touching the poles are degenerate and get culled
    /// at raster time.
    pub fn sphere(radius: f64, lat_num: usize, long_num: usize) -> Self {
        let columns = long_num + 1;
        let mut vertices = Vec::with_capacity((lat_num + 1) * columns * XYZSTNOP_DIM);
        for i in 0..=lat_num {
            let s_lat = if lat_num == 0 { 0.0 } else { i as f64 / lat_num as f64 };
            let theta = -PI / 2.0 + PI * s_lat;
            for j in 0..=long_num {
                let s_long = if long_num == 0 { 0.0 } else { j as f64 / long_num as f64 };
                let phi = 2.0 * PI * s_long;
                let normal = Vector3::new(theta.cos() * phi.cos(), theta.cos() * phi.sin(), theta.sin());
                let position = normal * radius;
                vertices.extend_from_slice(&[
                    position.x, position.y, position.z, s_long, s_lat, normal.x, normal.y, normal.z,
                ]);
            }
        }

        let mut triangles = Vec::with_capacity(lat_num * long_num * 2);
        for i in 0..lat_num {
            for j in 0..long_num {
                let v00 = i * columns + j;
                let v10 = v00 + 1;
                let v01 = v00 + columns;
                let v11 = v01 + 1;
                triangles.push([v00, v10, v11]);
                triangles.push([v00, v11, v01]);
            }
        }

        Self {
            attr_dim: XYZSTNOP_DIM,
            triangles,
            vertices,
        }
    }
}
