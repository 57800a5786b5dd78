/// Scan conversion of screen-space triangles
use nalgebra::{Matrix2, Vector2};

use crate::depth::DepthBuffer;
use crate::framebuffer::PixelSurface;
use crate::shader::{Shader, VARY_X, VARY_Y};
use crate::texture::Texture;

/// Everything fragment shading needs besides the interpolated varyings
pub struct FragmentInputs<'a, S: ?Sized> {
    pub shader: &'a S,
    pub uniforms: &'a [f64],
    pub textures: &'a [&'a Texture],
}

/// The shared buffers fragments are written into
pub struct RenderTarget<'a, P: ?Sized> {
    pub depth: &'a mut DepthBuffer,
    pub surface: &'a mut P,
}

/// Fragment counters for one rasterized triangle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RasterStats {
    pub fragments_shaded: usize,
    pub fragments_written: usize,
}

/// A triangle edge, used to find the boundary y at a pixel column
#[derive(Clone, Copy)]
struct Edge<'a> {
    from: &'a [f64],
    to: &'a [f64],
}

impl<'a> Edge<'a> {
    fn new(from: &'a [f64], to: &'a [f64]) -> Self {
        Self { from, to }
    }

    /// Never called on a vertical edge
    fn y_at(&self, x: f64) -> f64 {
        let (x0, y0) = (self.from[VARY_X], self.from[VARY_Y]);
        let (x1, y1) = (self.to[VARY_X], self.to[VARY_Y]);
        y0 + (y1 - y0) / (x1 - x0) * (x - x0)
    }
}

/// A run of pixel columns sharing the same lower and upper edge
#[derive(Clone, Copy)]
struct Span<'a> {
    x_start: i64,
    x_end: i64,
    lower: Edge<'a>,
    upper: Edge<'a>,
}

/// Rasterize screen-space triangle (a, b, c), shading every covered pixel
/// and depth testing the result against `target`.
///
/// Vertices are relabeled so A is leftmost, then the triangle is walked one
/// pixel column at a time between the two edges that bound that column.
/// Attributes are interpolated with the barycentric weights (p, q) solving
/// `pixel - A = p (B - A) + q (C - A)`.
///
/// Front faces wind counter-clockwise with y up. Back-facing and zero-area
/// triangles touch nothing and return `None`. `varying` is scratch space of
/// the same length as the vertices.
pub fn rasterize_triangle<S, P>(
    inputs: &FragmentInputs<'_, S>,
    target: &mut RenderTarget<'_, P>,
    a: &[f64],
    b: &[f64],
    c: &[f64],
    varying: &mut [f64],
) -> Option<RasterStats>
where
    S: Shader + ?Sized,
    P: PixelSurface + ?Sized,
{
    let finite = [a, b, c]
        .iter()
        .all(|v| v[VARY_X].is_finite() && v[VARY_Y].is_finite());
    if !finite {
        return None;
    }

    let (a, b, c) = leftmost_first(a, b, c);
    let m = Matrix2::new(
        b[VARY_X] - a[VARY_X],
        c[VARY_X] - a[VARY_X],
        b[VARY_Y] - a[VARY_Y],
        c[VARY_Y] - a[VARY_Y],
    );
    if !(m.determinant() > 0.0) {
        return None;
    }
    let inverse = m.try_inverse()?;

    let mut stats = RasterStats::default();
    let (width, height) = (target.depth.width(), target.depth.height());
    if width == 0 || height == 0 {
        return Some(stats);
    }
    let (x_max, y_max) = (width as i64 - 1, height as i64 - 1);

    for span in column_spans(a, b, c).iter().flatten() {
        for x in span.x_start.max(0)..=span.x_end.min(x_max) {
            let column = x as f64;
            let y_start = (span.lower.y_at(column).ceil() as i64).max(0);
            let y_end = (span.upper.y_at(column).floor() as i64).min(y_max);
            for y in y_start..=y_end {
                let offset = Vector2::new(column - a[VARY_X], y as f64 - a[VARY_Y]);
                let weights = inverse * offset;
                let (p, q) = (weights.x, weights.y);
                for (((out, &va), &vb), &vc) in varying.iter_mut().zip(a).zip(b).zip(c) {
                    *out = va + p * (vb - va) + q * (vc - va);
                }

                let fragment = inputs
                    .shader
                    .shade_fragment(inputs.uniforms, inputs.textures, varying);
                stats.fragments_shaded += 1;

                let (px, py) = (x as usize, y as usize);
                if fragment.depth < target.depth.get(px, py) {
                    target.surface.set_pixel_color(px, py, fragment.rgb);
                    target.depth.set(px, py, fragment.depth);
                    stats.fragments_written += 1;
                }
            }
        }
    }
    Some(stats)
}

/// Rotate the labels so the first vertex has the minimum x. Ties go to the
/// earliest of (a, b, c); rotation keeps the winding.
fn leftmost_first<'a>(
    a: &'a [f64],
    b: &'a [f64],
    c: &'a [f64],
) -> (&'a [f64], &'a [f64], &'a [f64]) {
    let (ax, bx, cx) = (a[VARY_X], b[VARY_X], c[VARY_X]);
    if ax <= bx && ax <= cx {
        (a, b, c)
    } else if bx <= cx {
        (b, c, a)
    } else {
        (c, a, b)
    }
}

/// Column ranges and their bounding edges for a counter-clockwise triangle
/// whose leftmost vertex is `a`. Each integer column appears in at most one
/// span.
fn column_spans<'a>(a: &'a [f64], b: &'a [f64], c: &'a [f64]) -> [Option<Span<'a>>; 2] {
    let (ax, bx, cx) = (a[VARY_X], b[VARY_X], c[VARY_X]);
    let start = ax.ceil() as i64;
    let ab = Edge::new(a, b);
    let ac = Edge::new(a, c);

    if cx <= bx {
        // C is the middle vertex by x; AB bounds from below
        let bc = Edge::new(b, c);
        if cx == ax {
            let span = Span { x_start: start, x_end: bx.floor() as i64, lower: ab, upper: bc };
            [Some(span), None]
        } else if cx == bx {
            let span = Span { x_start: start, x_end: cx.floor() as i64, lower: ab, upper: ac };
            [Some(span), None]
        } else {
            let split = cx.floor() as i64;
            [
                Some(Span { x_start: start, x_end: split, lower: ab, upper: ac }),
                Some(Span { x_start: split + 1, x_end: bx.floor() as i64, lower: ab, upper: bc }),
            ]
        }
    } else {
        // B is the middle vertex by x; AC bounds from above
        let cb = Edge::new(c, b);
        if ax == bx {
            let span = Span { x_start: start, x_end: cx.floor() as i64, lower: cb, upper: ac };
            [Some(span), None]
        } else {
            let split = bx.floor() as i64;
            [
                Some(Span { x_start: start, x_end: split, lower: ab, upper: ac }),
                Some(Span { x_start: split + 1, x_end: cx.floor() as i64, lower: cb, upper: ac }),
            ]
        }
    }
}
