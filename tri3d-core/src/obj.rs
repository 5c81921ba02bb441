/// Loader for the line-oriented `v`/`f` mesh format
///
/// Only two record kinds are understood:
///
/// ```text
/// v 0.0 1.0 -2.5
/// f 1 2 3
/// ```
///
/// Face indices are 1-based; tokens like `3/1/2` contribute their first index.
/// A vertex may carry an optional fourth `w` value, which is ignored. Faces
/// with more than three indices keep their first triangle. Every other line
/// is ignored.
use std::path::{Path, PathBuf};

use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, space0, space1, u64 as index},
    combinator::{eof, map_res, opt},
    multi::many0,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::geometry::{Face, Mesh, MeshError};
use crate::vector::Vec3;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read mesh file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: malformed {kind} record")]
    Parse { line: usize, kind: &'static str },
    #[error("invalid mesh")]
    Mesh(#[from] MeshError),
}

/// Vertex and face records as read from a mesh file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSource {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl MeshSource {
    /// Parse mesh text.
    ///
    /// Face indices are converted to 0-based once all vertices are known, so
    /// faces may reference vertices defined further down the file.
    pub fn parse(input: &str) -> Result<Self, LoadError> {
        let mut vertices = Vec::new();
        let mut raw_faces = Vec::new();

        for (number, line) in input.lines().enumerate() {
            let line_number = number + 1;

            if line.starts_with("v ") {
                let (_, vertex) = parse_vertex(line).map_err(|_| LoadError::Parse {
                    line: line_number,
                    kind: "vertex",
                })?;
                vertices.push(vertex);
            } else if line.starts_with("f ") {
                let (_, (indices, extra)) = parse_face(line).map_err(|_| LoadError::Parse {
                    line: line_number,
                    kind: "face",
                })?;
                if extra > 0 {
                    tracing::warn!(
                        line = line_number,
                        dropped = extra,
                        "face has more than three indices, keeping the first triangle"
                    );
                }
                raw_faces.push(indices);
            }
        }

        let faces = raw_faces
            .into_iter()
            .enumerate()
            .map(|(i, indices)| Face::from_one_based(i, indices, vertices.len()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { vertices, faces })
    }

    pub fn into_mesh(self) -> Result<Mesh, MeshError> {
        Mesh::assemble(&self.vertices, &self.faces)
    }
}

fn parse_vertex(input: &str) -> IResult<&str, Vec3> {
    let (input, _) = tag("v")(input)?;
    let (input, (x, y, z)) = tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)?;
    let (input, _) = opt(preceded(space1, float))(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

/// The first three indices of a face, and how many further indices followed.
fn parse_face(input: &str) -> IResult<&str, ([usize; 3], usize)> {
    let (input, _) = tag("f")(input)?;
    let (input, (a, b, c)) = tuple((
        preceded(space1, face_index),
        preceded(space1, face_index),
        preceded(space1, face_index),
    ))(input)?;
    let (input, extra) = many0(preceded(space1, face_index))(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, ([a, b, c], extra.len())))
}

/// `i`, `i/t`, `i//n` or `i/t/n`; only `i` is kept.
fn face_index(input: &str) -> IResult<&str, usize> {
    terminated(
        map_res(index, usize::try_from),
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

/// Parse mesh text and assemble it.
pub fn parse_mesh(input: &str) -> Result<Mesh, LoadError> {
    Ok(MeshSource::parse(input)?.into_mesh()?)
}

/// Read and parse a mesh file.
pub fn try_load_mesh(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let mesh = parse_mesh(&text)?;
    tracing::debug!(path = %path.display(), triangles = mesh.count(), "loaded mesh");
    Ok(mesh)
}

/// Read and parse a mesh file, falling back to an empty mesh on failure.
pub fn load_mesh(path: impl AsRef<Path>) -> Mesh {
    let path = path.as_ref();
    match try_load_mesh(path) {
        Ok(mesh) => mesh,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to load mesh, rendering nothing");
            Mesh::new()
        }
    }
}
