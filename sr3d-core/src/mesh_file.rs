/// Reader and writer for the line-oriented text mesh format
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{char, i64 as signed, space0, space1, u32 as unsigned32, u64 as unsigned},
    combinator::{all_consuming, verify},
    multi::many0,
    number::complete::double,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use crate::error::{MeshError, MeshFileError};
use crate::mesh::Mesh;

/// Product string written on the first line of saved files
pub const MESH_FILE_PRODUCT: &str = "Carleton College CS 311";
/// Format version written on the first line of saved files
pub const MESH_FILE_VERSION: &str = "2019/01/15";

/// Date found on the version line of a mesh file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatVersion {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

/// Read and parse a mesh file
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshFileError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mesh = parse_mesh(&text)?;
    log::debug!(
        "loaded {}: {} triangles, {} vertices, attrDim {}",
        path.display(),
        mesh.tri_num(),
        mesh.vert_num(),
        mesh.attr_dim()
    );
    Ok(mesh)
}

/// Write `mesh` to a file at `path`, replacing any existing file
pub fn save_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<(), MeshFileError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_mesh(mesh, &mut writer)?;
    writer.flush()?;
    log::debug!("saved {} triangles to {}", mesh.tri_num(), path.display());
    Ok(())
}

/// Serialize `mesh`. Attribute values are printed with six digits after the
/// decimal point.
pub fn write_mesh<W: Write>(mesh: &Mesh, mut writer: W) -> io::Result<()> {
    writeln!(writer, "{} mesh version {}", MESH_FILE_PRODUCT, MESH_FILE_VERSION)?;
    writeln!(writer, "triNum {}", mesh.tri_num())?;
    writeln!(writer, "vertNum {}", mesh.vert_num())?;
    writeln!(writer, "attrDim {}", mesh.attr_dim())?;
    writeln!(writer, "{} Triangles:", mesh.tri_num())?;
    for [i, j, k] in mesh.triangles() {
        writeln!(writer, "{} {} {}", i, j, k)?;
    }
    writeln!(writer, "{} Vertices:", mesh.vert_num())?;
    for vertex in mesh.vertices() {
        for value in vertex {
            write!(writer, "{:.6} ", value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Parse the text of a mesh file:
///
/// ```text
/// <product> mesh version YYYY/MM/DD
/// triNum <int>
/// vertNum <int>
/// attrDim <int>
/// <triNum> Triangles:
/// <i> <j> <k>                      (triNum lines)
/// <vertNum> Vertices:
/// <a0> <a1> ... <a(attrDim-1)>     (vertNum lines, each value followed by a space)
/// ```
///
/// Storage grows with the lines actually read, so header counts never cost
/// more memory than the input can fill.
pub fn parse_mesh(input: &str) -> Result<Mesh, MeshFileError> {
    let mut lines = input.lines();

    let version = parse_line(&mut lines, 1, version_line, |line| MeshFileError::Header { line })?;
    log::trace!(
        "mesh file version {:04}/{:02}/{:02}",
        version.year,
        version.month,
        version.day
    );
    let tri_num = parse_count(&mut lines, 2, "triNum", |line| MeshFileError::TriNum { line })?;
    let vert_num = parse_count(&mut lines, 3, "vertNum", |line| MeshFileError::VertNum { line })?;
    let attr_dim = parse_count(&mut lines, 4, "attrDim", |line| MeshFileError::AttrDim { line })?;
    if attr_dim == 0 {
        return Err(MeshFileError::AttrDim { line: 4 });
    }
    if tri_num > 0 && vert_num == 0 {
        return Err(MeshFileError::VertNum { line: 3 });
    }

    let allocation = || {
        MeshFileError::Allocation(MeshError::Allocation {
            tri_num,
            vert_num,
            attr_dim,
        })
    };
    // Every triangle takes a line and every value at least two bytes
    let mut triangles: Vec<[usize; 3]> = Vec::new();
    triangles
        .try_reserve_exact(tri_num.min(input.lines().count()))
        .map_err(|_| allocation())?;
    let mut vertices: Vec<f64> = Vec::new();
    vertices
        .try_reserve_exact(vert_num.saturating_mul(attr_dim).min(input.len() / 2))
        .map_err(|_| allocation())?;

    let declared = parse_line(&mut lines, 5, section_line("Triangles:"), |line| {
        MeshFileError::TriangleHeader { line }
    })?;
    if declared != tri_num as u64 {
        return Err(MeshFileError::TriangleHeader { line: 5 });
    }
    for tri in 0..tri_num {
        let line = tri + 6;
        let raw = parse_line(&mut lines, line, triangle_line, |line| MeshFileError::Triangle { line })?;
        let mut indices = [0usize; 3];
        for (slot, index) in indices.iter_mut().zip(raw) {
            *slot = usize::try_from(index)
                .ok()
                .filter(|&index| index < vert_num)
                .ok_or(MeshFileError::TriangleIndex {
                    line,
                    index,
                    vert_num,
                })?;
        }
        triangles.push(indices);
    }

    let line = tri_num + 6;
    let declared = parse_line(&mut lines, line, section_line("Vertices:"), |line| {
        MeshFileError::VertexHeader { line }
    })?;
    if declared != vert_num as u64 {
        return Err(MeshFileError::VertexHeader { line });
    }
    for vert in 0..vert_num {
        let line = tri_num + 7 + vert;
        let values = parse_line(&mut lines, line, vertex_line(attr_dim), |line| {
            MeshFileError::Vertex { line }
        })?;
        vertices.extend_from_slice(&values);
    }

    if lines.any(|rest| !rest.trim().is_empty()) {
        log::warn!("ignoring trailing content after the last vertex");
    }
    Ok(Mesh::from_parts(triangles, vertices, attr_dim)?)
}

/// Run `parser` over the whole of the next line, mapping any failure (or a
/// missing line) to the stage error for `line`.
fn parse_line<'a, T, P, E>(
    lines: &mut impl Iterator<Item = &'a str>,
    line: usize,
    parser: P,
    stage: E,
) -> Result<T, MeshFileError>
where
    P: FnMut(&'a str) -> IResult<&'a str, T>,
    E: Fn(usize) -> MeshFileError,
{
    let text = lines.next().ok_or_else(|| stage(line))?;
    all_consuming(parser)(text)
        .map(|(_, value)| value)
        .map_err(|_| stage(line))
}

fn parse_count<'a, E>(
    lines: &mut impl Iterator<Item = &'a str>,
    line: usize,
    name: &'static str,
    stage: E,
) -> Result<usize, MeshFileError>
where
    E: Fn(usize) -> MeshFileError,
{
    let value = parse_line(lines, line, count_line(name), &stage)?;
    usize::try_from(value).map_err(|_| stage(line))
}

fn version_line(input: &str) -> IResult<&str, FormatVersion> {
    let (input, _) = take_until(" mesh version ")(input)?;
    let (input, _) = tag(" mesh version ")(input)?;
    let (input, (year, _, month, _, day)) =
        tuple((unsigned32, char('/'), unsigned32, char('/'), unsigned32))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, FormatVersion { year, month, day }))
}

fn count_line<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, u64> {
    delimited(tuple((tag(name), space1)), unsigned, space0)
}

fn section_line<'a>(label: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, u64> {
    terminated(unsigned, tuple((space1, tag(label), space0)))
}

fn triangle_line(input: &str) -> IResult<&str, [i64; 3]> {
    let (input, (i, j, k)) = tuple((
        preceded(space0, signed),
        preceded(space1, signed),
        preceded(space1, signed),
    ))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, [i, j, k]))
}

fn vertex_line<'a>(attr_dim: usize) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<f64>> {
    terminated(
        verify(many0(preceded(space0, double)), move |values: &Vec<f64>| {
            values.len() == attr_dim
        }),
        space0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "Carleton College CS 311 mesh version 2019/01/15
triNum 2
vertNum 4
attrDim 3
2 Triangles:
0 1 2
0 2 3
4 Vertices:
0.000000 0.000000 1.000000
1.000000 0.000000 0.500000
1.000000 1.000000 0.250000
0.000000 1.000000 -2.000000
";

    fn replace_line(text: &str, line: usize, replacement: &str) -> String {
        text.lines()
            .enumerate()
            .map(|(i, l)| if i + 1 == line { replacement } else { l })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parse_square() {
        let mesh = parse_mesh(SQUARE).unwrap();
        assert_eq!(mesh.tri_num(), 2);
        assert_eq!(mesh.vert_num(), 4);
        assert_eq!(mesh.attr_dim(), 3);
        assert_eq!(mesh.triangle(1), Some([0, 2, 3]));
        assert_eq!(mesh.vertex(3), Some(&[0.0, 1.0, -2.0][..]));
    }

    #[test]
    fn test_any_product_is_accepted() {
        let text = replace_line(SQUARE, 1, "Some Renderer mesh version 2024/03/09");
        assert!(parse_mesh(&text).is_ok());
    }

    #[test]
    fn test_round_trip() {
        let mut mesh = Mesh::new(1, 3, 2).unwrap();
        mesh.set_triangle(0, [2, 0, 1]).unwrap();
        mesh.set_vertex(0, &[0.1234564, -7.5]).unwrap();
        mesh.set_vertex(1, &[1e3, 2.0 / 3.0]).unwrap();
        mesh.set_vertex(2, &[-0.000001, 42.0]).unwrap();

        let mut buffer = Vec::new();
        write_mesh(&mesh, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("Carleton College CS 311 mesh version 2019/01/15\n"));

        let loaded = parse_mesh(&text).unwrap();
        assert_eq!(loaded.tri_num(), mesh.tri_num());
        assert_eq!(loaded.vert_num(), mesh.vert_num());
        assert_eq!(loaded.attr_dim(), mesh.attr_dim());
        assert_eq!(loaded.triangles(), mesh.triangles());
        for (a, b) in loaded.vertices().zip(mesh.vertices()) {
            for (x, y) in a.iter().zip(b) {
                assert!((x - y).abs() <= 5e-7, "{} vs {}", x, y);
            }
        }
    }

    #[test]
    fn test_stage_errors() {
        let cases = [
            (1, "not a mesh file", 2),
            (2, "triNum two", 3),
            (3, "vertNum -4", 4),
            (4, "attrDim 0", 5),
            (5, "3 Triangles:", 7),
            (6, "0 1", 8),
            (7, "0 2 4", 9),
            (8, "4 Vertex:", 10),
            (10, "1.0 0.0", 11),
        ];
        for (line, replacement, code) in cases {
            let text = replace_line(SQUARE, line, replacement);
            let err = parse_mesh(&text).unwrap_err();
            assert_eq!(err.code(), code, "line {}: {}", line, err);
            assert_eq!(err.line(), Some(line));
        }
    }

    #[test]
    fn test_negative_index_is_rejected() {
        let text = replace_line(SQUARE, 6, "0 -1 2");
        assert!(matches!(
            parse_mesh(&text),
            Err(MeshFileError::TriangleIndex {
                line: 6,
                index: -1,
                vert_num: 4
            })
        ));
    }

    #[test]
    fn test_huge_header_counts_fail_without_allocating() {
        let header_only = "x mesh version 2019/01/15\ntriNum 1000000000000\nvertNum 1\nattrDim 1\n";
        assert!(matches!(
            parse_mesh(header_only),
            Err(MeshFileError::TriangleHeader { line: 5 })
        ));

        let no_triangles = "x mesh version 2019/01/15\ntriNum 1000000000000\nvertNum 1\nattrDim 1\n1000000000000 Triangles:\n";
        assert!(matches!(
            parse_mesh(no_triangles),
            Err(MeshFileError::Triangle { line: 6 })
        ));

        let wide = "x mesh version 2019/01/15\ntriNum 0\nvertNum 1000000\nattrDim 1000000000\n0 Triangles:\n1000000 Vertices:\n";
        assert!(matches!(
            parse_mesh(wide),
            Err(MeshFileError::Vertex { line: 7 })
        ));
    }

    #[test]
    fn test_truncated_file() {
        let text: String = SQUARE.lines().take(9).collect::<Vec<_>>().join("\n");
        assert!(matches!(
            parse_mesh(&text),
            Err(MeshFileError::Vertex { line: 10 })
        ));
    }

    #[test]
    fn test_save_and_load_path() {
        let path = std::env::temp_dir().join(format!("sr3d-mesh-{}.txt", std::process::id()));
        let mesh = Mesh::cube(1.0);
        save_mesh(&mesh, &path).unwrap();
        let loaded = load_mesh(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.triangles(), mesh.triangles());
        assert_eq!(loaded.vert_num(), 24);
    }

    #[test]
    fn test_missing_file() {
        let err = load_mesh("/definitely/not/here.mesh").unwrap_err();
        assert_eq!(err.code(), 1);
    }
}
