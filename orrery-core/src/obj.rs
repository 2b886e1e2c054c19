/// Parser for the triangle-only subset of the Wavefront OBJ text format
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::{Point2, Point3, Vector3};
use nom::{
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, opt},
    multi::count,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use tracing::{debug, info};

use crate::geometry::{IndexedMesh, Mesh, Vertex};

#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("failed to read mesh file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: malformed statement {content:?}")]
    Format { line: usize, content: String },
    #[error("line {line}: {attribute} index {index} is out of range (pool holds {len})")]
    Index {
        line: usize,
        attribute: Attribute,
        index: i64,
        len: usize,
    },
}

/// The pool a face index points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Position => write!(f, "position"),
            Attribute::TexCoord => write!(f, "texture coordinate"),
            Attribute::Normal => write!(f, "normal"),
        }
    }
}

/// Zero-based pool indices of one face corner, already range-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Corner {
    position: usize,
    uv: usize,
    normal: usize,
}

/// Attribute pools and face corners collected while reading a file
#[derive(Debug, Clone, Default)]
pub struct ObjData {
    positions: Vec<Point3<f32>>,
    uvs: Vec<Point2<f32>>,
    normals: Vec<Vector3<f32>>,
    corners: Vec<Corner>,
}

enum Statement {
    Position(Point3<f32>),
    TexCoord(Point2<f32>),
    Normal(Vector3<f32>),
    Face([[i64; 3]; 3]),
}

enum Line {
    Statement(Statement),
    Ignored,
    Malformed,
}

impl ObjData {
    /// Read every line, growing the pools and recording face corners.
    ///
    /// Stops at the first malformed statement or out-of-range index.
    pub fn parse(input: &str) -> Result<Self, ObjError> {
        let mut data = Self::default();

        for (number, text) in input.lines().enumerate() {
            let line = number + 1;
            match classify(text) {
                Line::Ignored => {}
                Line::Malformed => {
                    return Err(ObjError::Format {
                        line,
                        content: text.trim().to_string(),
                    })
                }
                Line::Statement(Statement::Position(p)) => data.positions.push(p),
                Line::Statement(Statement::TexCoord(uv)) => data.uvs.push(uv),
                Line::Statement(Statement::Normal(n)) => data.normals.push(n),
                Line::Statement(Statement::Face(corners)) => {
                    for [p, t, n] in corners {
                        let corner = Corner {
                            position: resolve(line, Attribute::Position, p, data.positions.len())?,
                            uv: resolve(line, Attribute::TexCoord, t, data.uvs.len())?,
                            normal: resolve(line, Attribute::Normal, n, data.normals.len())?,
                        };
                        data.corners.push(corner);
                    }
                }
            }
        }

        Ok(data)
    }

    pub fn face_count(&self) -> usize {
        self.corners.len() / 3
    }

    fn vertex(&self, corner: &Corner) -> Vertex {
        Vertex {
            position: self.positions[corner.position],
            uv: self.uvs[corner.uv],
            normal: self.normals[corner.normal],
        }
    }

    /// Resolve every recorded corner into a flat triangle list, in face order
    pub fn expand(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.corners.len());
        for corner in &self.corners {
            mesh.push(self.vertex(corner));
        }
        mesh
    }

    /// Deduplicate corners that reference the same index triple
    pub fn indexed(&self) -> IndexedMesh {
        let mut lookup: HashMap<Corner, u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(self.corners.len());

        for corner in &self.corners {
            let index = *lookup.entry(*corner).or_insert_with(|| {
                vertices.push(self.vertex(corner));
                (vertices.len() - 1) as u32
            });
            indices.push(index);
        }

        IndexedMesh { vertices, indices }
    }
}

/// Parse OBJ text into a flat triangle list
pub fn parse_obj(input: &str) -> Result<Mesh, ObjError> {
    Ok(ObjData::parse(input)?.expand())
}

/// Read and parse an OBJ file, keeping the parse-time pools
pub fn load_obj_data(path: impl AsRef<Path>) -> Result<ObjData, ObjError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading OBJ file");

    let text = fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data = ObjData::parse(&text)?;

    debug!(
        positions = data.positions.len(),
        uvs = data.uvs.len(),
        normals = data.normals.len(),
        faces = data.face_count(),
        "Parsed OBJ pools"
    );
    Ok(data)
}

/// Read and parse an OBJ file into a flat triangle list
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, ObjError> {
    let mesh = load_obj_data(path)?.expand();
    info!(vertices = mesh.len(), triangles = mesh.triangle_count(), "Loaded mesh");
    Ok(mesh)
}

fn resolve(line: usize, attribute: Attribute, index: i64, len: usize) -> Result<usize, ObjError> {
    if index < 1 || index as u64 > len as u64 {
        return Err(ObjError::Index {
            line,
            attribute,
            index,
            len,
        });
    }
    Ok(index as usize - 1)
}

fn classify(text: &str) -> Line {
    let text = text.trim();
    let Some(keyword) = text.split_whitespace().next() else {
        return Line::Ignored;
    };
    let rest = &text[keyword.len()..];

    let statement = match keyword {
        "v" => payload(vector3, rest).map(|(x, y, z)| Statement::Position(Point3::new(x, y, z))),
        // V is flipped to match the renderer's texture orientation
        "vt" => payload(vector2, rest).map(|(u, v)| Statement::TexCoord(Point2::new(u, -v))),
        "vn" => payload(vector3, rest).map(|(x, y, z)| Statement::Normal(Vector3::new(x, y, z))),
        "f" => payload(face, rest).map(Statement::Face),
        _ => return Line::Ignored,
    };

    match statement {
        Some(statement) => Line::Statement(statement),
        None => Line::Malformed,
    }
}

/// Run `parser` over the whole payload, allowing only trailing blanks
fn payload<'a, O>(parser: impl FnMut(&'a str) -> IResult<&'a str, O>, input: &'a str) -> Option<O> {
    all_consuming(terminated(parser, space0))(input)
        .ok()
        .map(|(_, output)| output)
}

fn coordinate(input: &str) -> IResult<&str, f32> {
    preceded(space1, float)(input)
}

// An optional trailing weight component is accepted and dropped.
fn vector2(input: &str) -> IResult<&str, (f32, f32)> {
    let (input, (u, v, _)) = tuple((coordinate, coordinate, opt(coordinate)))(input)?;
    Ok((input, (u, v)))
}

fn vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, (x, y, z, _)) = tuple((coordinate, coordinate, coordinate, opt(coordinate)))(input)?;
    Ok((input, (x, y, z)))
}

fn corner(input: &str) -> IResult<&str, [i64; 3]> {
    let (input, (p, t, n)) = tuple((
        integer,
        preceded(char('/'), integer),
        preceded(char('/'), integer),
    ))(input)?;
    Ok((input, [p, t, n]))
}

fn face(input: &str) -> IResult<&str, [[i64; 3]; 3]> {
    let (input, corners) = count(preceded(space1, corner), 3)(input)?;
    Ok((input, [corners[0], corners[1], corners[2]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_AS_TRIANGLES: &str = "\
# two triangles sharing an edge
o square
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
s off
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    #[test]
    fn test_three_corners_per_face_in_order() {
        let mesh = parse_obj(QUAD_AS_TRIANGLES).unwrap();
        assert_eq!(mesh.len(), 6);
        assert_eq!(mesh.uvs().len(), 6);
        assert_eq!(mesh.normals().len(), 6);

        let expected = [1usize, 2, 3, 1, 3, 4];
        for (i, &index) in expected.iter().enumerate() {
            let x = if index == 2 || index == 3 { 1.0 } else { 0.0 };
            let y = if index >= 3 { 1.0 } else { 0.0 };
            assert_eq!(mesh.positions()[i], Point3::new(x, y, 0.0), "corner {i}");
        }
    }

    #[test]
    fn test_texture_v_is_negated() {
        let mesh = parse_obj(QUAD_AS_TRIANGLES).unwrap();
        assert_eq!(mesh.uvs()[2], Point2::new(1.0, -1.0));
        assert_eq!(mesh.uvs()[1], Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_quad_face_is_rejected() {
        let input = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1 4/1/1\n";
        match parse_obj(input) {
            Err(ObjError::Format { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_face_without_uv_index_is_rejected() {
        let input = "v 0 0 0\nvn 0 0 1\nf 1//1 1//1 1//1\n";
        assert!(matches!(parse_obj(input), Err(ObjError::Format { line: 3, .. })));
    }

    #[test]
    fn test_malformed_vertex_is_rejected() {
        let input = "v 0.0 zero 0.0\n";
        assert!(matches!(parse_obj(input), Err(ObjError::Format { line: 1, .. })));
    }

    #[test]
    fn test_index_past_pool_is_rejected() {
        let input = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 2/1/1\n";
        match parse_obj(input) {
            Err(ObjError::Index {
                line,
                attribute,
                index,
                len,
            }) => {
                assert_eq!(line, 4);
                assert_eq!(attribute, Attribute::Position);
                assert_eq!(index, 2);
                assert_eq!(len, 1);
            }
            other => panic!("expected index error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_and_negative_indices_are_rejected() {
        let zero = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/0/1 1/1/1 1/1/1\n";
        assert!(matches!(
            parse_obj(zero),
            Err(ObjError::Index { attribute: Attribute::TexCoord, index: 0, .. })
        ));

        let negative = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/-1 1/1/1 1/1/1\n";
        assert!(matches!(
            parse_obj(negative),
            Err(ObjError::Index { attribute: Attribute::Normal, index: -1, .. })
        ));
    }

    #[test]
    fn test_face_cannot_reference_later_vertices() {
        let input = "vt 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 1/1/1\nv 0 0 0\n";
        assert!(matches!(parse_obj(input), Err(ObjError::Index { line: 3, .. })));
    }

    #[test]
    fn test_unknown_directives_and_blank_lines_are_ignored() {
        let input = "mtllib scene.mtl\n\nusemtl rock\ng body\nv 0 0 0\r\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 1/1/1\n";
        let mesh = parse_obj(input).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_indexed_variant_shares_corners() {
        let data = ObjData::parse(QUAD_AS_TRIANGLES).unwrap();
        let indexed = data.indexed();
        assert_eq!(indexed.vertices.len(), 4);
        assert_eq!(indexed.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(indexed.to_mesh(), data.expand());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("orrery-missing-mesh.obj");
        assert!(matches!(load_obj(&path), Err(ObjError::Io { .. })));
    }
}
