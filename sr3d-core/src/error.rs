/// Error types for mesh construction and mesh file I/O
use std::io;

use thiserror::Error;

/// Failures while building or editing a [`Mesh`](crate::Mesh)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("failed to allocate storage for {tri_num} triangles and {vert_num} vertices of dimension {attr_dim}")]
    Allocation {
        tri_num: usize,
        vert_num: usize,
        attr_dim: usize,
    },
    #[error("attribute dimension must be at least 1")]
    ZeroAttributeDimension,
    #[error("triangle {tri} is out of range (mesh has {tri_num} triangles)")]
    TriangleOutOfRange { tri: usize, tri_num: usize },
    #[error("vertex {vert} is out of range (mesh has {vert_num} vertices)")]
    VertexOutOfRange { vert: usize, vert_num: usize },
    #[error("triangle {tri} references vertex {index}, but the mesh has {vert_num} vertices")]
    IndexOutOfRange {
        tri: usize,
        index: usize,
        vert_num: usize,
    },
    #[error("expected {expected} attributes per vertex, got {actual}")]
    AttributeLength { expected: usize, actual: usize },
}

/// Failures while reading or writing a mesh file.
///
/// Each parsing stage has its own variant so callers can tell a bad header
/// from a bad vertex line.
#[derive(Error, Debug)]
pub enum MeshFileError {
    #[error("mesh file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("bad header at line {line}")]
    Header { line: usize },
    #[error("bad triNum at line {line}")]
    TriNum { line: usize },
    #[error("bad vertNum at line {line}")]
    VertNum { line: usize },
    #[error("bad attrDim at line {line}")]
    AttrDim { line: usize },
    #[error("could not allocate mesh: {0}")]
    Allocation(MeshError),
    #[error("bad triangle section header at line {line}")]
    TriangleHeader { line: usize },
    #[error("bad triangle at line {line}")]
    Triangle { line: usize },
    #[error("bad index {index} at line {line} (vertNum is {vert_num})")]
    TriangleIndex {
        line: usize,
        index: i64,
        vert_num: usize,
    },
    #[error("bad vertex section header at line {line}")]
    VertexHeader { line: usize },
    #[error("bad vertex at line {line}")]
    Vertex { line: usize },
    #[error("invalid mesh: {0}")]
    Mesh(MeshError),
}

impl From<MeshError> for MeshFileError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::Allocation { .. } => MeshFileError::Allocation(err),
            other => MeshFileError::Mesh(other),
        }
    }
}

impl MeshFileError {
    /// Stable numeric code identifying the failing stage
    pub fn code(&self) -> u32 {
        match self {
            MeshFileError::Io(_) => 1,
            MeshFileError::Header { .. } => 2,
            MeshFileError::TriNum { .. } => 3,
            MeshFileError::VertNum { .. } => 4,
            MeshFileError::AttrDim { .. } => 5,
            MeshFileError::Allocation(_) => 6,
            MeshFileError::TriangleHeader { .. } => 7,
            MeshFileError::Triangle { .. } => 8,
            MeshFileError::TriangleIndex { .. } => 9,
            MeshFileError::VertexHeader { .. } => 10,
            MeshFileError::Vertex { .. } => 11,
            MeshFileError::Mesh(_) => 12,
        }
    }

    /// Line of the file where parsing stopped, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            MeshFileError::Io(_) | MeshFileError::Allocation(_) | MeshFileError::Mesh(_) => None,
            MeshFileError::Header { line }
            | MeshFileError::TriNum { line }
            | MeshFileError::VertNum { line }
            | MeshFileError::AttrDim { line }
            | MeshFileError::TriangleHeader { line }
            | MeshFileError::Triangle { line }
            | MeshFileError::TriangleIndex { line, .. }
            | MeshFileError::VertexHeader { line }
            | MeshFileError::Vertex { line } => Some(*line),
        }
    }
}
