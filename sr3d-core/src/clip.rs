/// Near-plane clipping of clip-space triangles
use crate::shader::{VARY_W, VARY_Z};

/// Below this, an edge's change in signed near-plane distance is treated as
/// zero and the edge as lying along the plane.
pub const CLIP_EPSILON: f64 = 1e-12;

/// How many of a triangle's vertices lie behind the near plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipCase {
    Unclipped,
    OneClipped,
    TwoClipped,
    AllClipped,
}

/// A vertex is on the hidden side of the near plane when `w <= 0` or `w < -z`
pub fn is_clipped(varying: &[f64]) -> bool {
    let (z, w) = (varying[VARY_Z], varying[VARY_W]);
    w <= 0.0 || w < -z
}

pub fn classify(a: &[f64], b: &[f64], c: &[f64]) -> ClipCase {
    match [a, b, c].iter().filter(|v| is_clipped(v)).count() {
        0 => ClipCase::Unclipped,
        1 => ClipCase::OneClipped,
        2 => ClipCase::TwoClipped,
        _ => ClipCase::AllClipped,
    }
}

/// Write into `out` the point where the edge from `visible` to `hidden`
/// crosses the near plane, interpolating every varying component.
///
/// The parameter is clamped to the edge. When the edge runs parallel to the
/// plane the visible endpoint is used, which leaves a zero-area triangle that
/// the rasterizer culls.
pub fn near_plane_intersection(visible: &[f64], hidden: &[f64], out: &mut [f64]) {
    let d_visible = visible[VARY_Z] + visible[VARY_W];
    let d_hidden = hidden[VARY_Z] + hidden[VARY_W];
    let denominator = d_visible - d_hidden;
    let t = if denominator.abs() < CLIP_EPSILON {
        0.0
    } else {
        (d_visible / denominator).clamp(0.0, 1.0)
    };
    for ((o, v), h) in out.iter_mut().zip(visible).zip(hidden) {
        *o = v + t * (h - v);
    }
}

/// Triangles emitted for one input triangle; at most two.
#[derive(Debug, Clone, Copy)]
pub struct ClipOutput<'a> {
    triangles: [[&'a [f64]; 3]; 2],
    len: usize,
    case: ClipCase,
}

impl<'a> ClipOutput<'a> {
    pub fn triangles(&self) -> &[[&'a [f64]; 3]] {
        &self.triangles[..self.len]
    }

    pub fn case(&self) -> ClipCase {
        self.case
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

const NONE: [&[f64]; 3] = [&[], &[], &[]];

/// Near-plane clipper owning the scratch storage for intersection vertices.
///
/// Triangles with one or two hidden vertices are cut along the plane
/// `z + w = 0` and re-triangulated so the output keeps the input's winding.
#[derive(Debug, Default)]
pub struct Clipper {
    first: Vec<f64>,
    second: Vec<f64>,
}

impl Clipper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clip triangle (a, b, c). Returned slices borrow either the inputs or
    /// this clipper's scratch buffers, so the output must be consumed before
    /// the next call.
    pub fn clip<'a>(&'a mut self, a: &'a [f64], b: &'a [f64], c: &'a [f64]) -> ClipOutput<'a> {
        let case = classify(a, b, c);
        match case {
            ClipCase::Unclipped => ClipOutput {
                triangles: [[a, b, c], NONE],
                len: 1,
                case,
            },
            ClipCase::AllClipped => ClipOutput {
                triangles: [NONE, NONE],
                len: 0,
                case,
            },
            ClipCase::OneClipped => {
                // Rotate so the hidden vertex is x, keeping winding x -> y -> z
                let (x, y, z) = if is_clipped(a) {
                    (a, b, c)
                } else if is_clipped(b) {
                    (b, c, a)
                } else {
                    (c, a, b)
                };
                self.prepare(x.len());
                near_plane_intersection(z, x, &mut self.first);
                near_plane_intersection(y, x, &mut self.second);
                let this: &'a Self = self;
                let (zx, xy) = (&this.first[..], &this.second[..]);
                ClipOutput {
                    triangles: [[zx, y, z], [zx, xy, y]],
                    len: 2,
                    case,
                }
            }
            ClipCase::TwoClipped => {
                // Rotate so the visible vertex is z, keeping winding z -> x -> y
                let (z, x, y) = if !is_clipped(a) {
                    (a, b, c)
                } else if !is_clipped(b) {
                    (b, c, a)
                } else {
                    (c, a, b)
                };
                self.prepare(z.len());
                near_plane_intersection(z, x, &mut self.first);
                near_plane_intersection(z, y, &mut self.second);
                let this: &'a Self = self;
                let (zx, zy) = (&this.first[..], &this.second[..]);
                ClipOutput {
                    triangles: [[z, zx, zy], NONE],
                    len: 1,
                    case,
                }
            }
        }
    }

    fn prepare(&mut self, varying_dim: usize) {
        self.first.resize(varying_dim, 0.0);
        self.second.resize(varying_dim, 0.0);
    }
}
