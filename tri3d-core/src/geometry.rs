/// Geometry primitives and mesh assembly
use crate::vector::Vec3;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("failed to allocate storage for {triangles} triangles")]
    Allocation { triangles: usize },
}

/// A triangle with a fixed winding order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Un-normalized face normal `(v1 - v0) x (v2 - v0)`.
    ///
    /// Its length is twice the triangle's area, so a zero-area triangle yields
    /// the zero vector.
    pub fn cross_normal(&self) -> Vec3 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Unit face normal, or `None` for degenerate triangles.
    pub fn normal(&self) -> Option<Vec3> {
        let n = self.cross_normal();
        let length = n.length();
        if length > 0.0 && length.is_finite() {
            Some(n.divide(length))
        } else {
            None
        }
    }

    pub fn map(&self, f: impl Fn(&Vec3) -> Vec3) -> Triangle {
        let [v0, v1, v2] = &self.vertices;
        Triangle::new(f(v0), f(v1), f(v2))
    }
}

/// Vertex indices of one face, 0-based
///
/// Only used while assembling a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub indices: [usize; 3],
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { indices: [a, b, c] }
    }

    /// Convert 1-based indices as they appear in mesh files.
    ///
    /// Valid indices are `1..=vertex_count`; index `0` has no 0-based
    /// counterpart.
    pub fn from_one_based(
        face: usize,
        indices: [usize; 3],
        vertex_count: usize,
    ) -> Result<Self, MeshError> {
        let mut converted = [0; 3];
        for (slot, index) in converted.iter_mut().zip(indices) {
            *slot = match index.checked_sub(1) {
                Some(i) if i < vertex_count => i,
                _ => {
                    return Err(MeshError::FaceIndexOutOfRange {
                        face,
                        index,
                        vertex_count,
                    })
                }
            };
        }
        Ok(Self { indices: converted })
    }
}

/// An owned collection of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Assemble triangles from a vertex list and 0-based faces.
    ///
    /// Every face index is validated before any storage is reserved. If the
    /// storage can't be reserved the error is returned and no partial mesh
    /// exists; [`Mesh::assemble`] turns that into an empty mesh.
    pub fn from_faces(vertices: &[Vec3], faces: &[Face]) -> Result<Self, MeshError> {
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = face.indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let mut triangles = reserve_triangles(faces.len())?;
        triangles.extend(faces.iter().map(|face| {
            let [a, b, c] = face.indices;
            Triangle::new(vertices[a], vertices[b], vertices[c])
        }));

        tracing::debug!(
            vertices = vertices.len(),
            triangles = triangles.len(),
            "assembled mesh"
        );

        Ok(Self { triangles })
    }

    /// Like [`Mesh::from_faces`], but an allocation failure degrades to an
    /// empty mesh.
    pub fn assemble(vertices: &[Vec3], faces: &[Face]) -> Result<Self, MeshError> {
        empty_on_allocation_failure(Self::from_faces(vertices, faces))
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn count(&self) -> usize {
        self.triangles.len()
    }

    pub fn capacity(&self) -> usize {
        self.triangles.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Create a cube mesh centered on the origin.
    ///
    /// Faces are wound counter-clockwise when seen from outside, so their
    /// normals point outwards.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners = [
            Vec3::new(-h, -h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, h),
            Vec3::new(h, -h, h),
            Vec3::new(-h, h, h),
            Vec3::new(-h, -h, h),
        ];
        let faces = [
            // -z
            Face::new(0, 1, 2),
            Face::new(0, 2, 3),
            // +x
            Face::new(3, 2, 4),
            Face::new(3, 4, 5),
            // +z
            Face::new(5, 4, 6),
            Face::new(5, 6, 7),
            // -x
            Face::new(7, 6, 1),
            Face::new(7, 1, 0),
            // +y
            Face::new(1, 6, 4),
            Face::new(1, 4, 2),
            // -y
            Face::new(5, 7, 0),
            Face::new(5, 0, 3),
        ];

        let triangles = faces
            .iter()
            .map(|face| {
                let [a, b, c] = face.indices;
                Triangle::new(corners[a], corners[b], corners[c])
            })
            .collect();
        Self { triangles }
    }
}

fn reserve_triangles(count: usize) -> Result<Vec<Triangle>, MeshError> {
    let mut triangles = Vec::new();
    triangles
        .try_reserve_exact(count)
        .map_err(|_| MeshError::Allocation { triangles: count })?;
    Ok(triangles)
}

fn empty_on_allocation_failure(result: Result<Mesh, MeshError>) -> Result<Mesh, MeshError> {
    match result {
        Err(MeshError::Allocation { triangles }) => {
            tracing::error!(triangles, "failed to allocate mesh, using an empty mesh");
            Ok(Mesh::new())
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_faces() {
        let vertices = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        let faces = [Face::new(0, 1, 2), Face::new(1, 3, 2)];
        let mesh = Mesh::from_faces(&vertices, &faces).unwrap();

        assert_eq!(mesh.count(), 2);
        assert!(mesh.count() <= mesh.capacity());
        assert_eq!(mesh.triangles()[1].vertices[1], vertices[3]);
    }

    #[test]
    fn test_face_out_of_range() {
        let vertices = [Vec3::new(0.0, 0.0, 0.0)];
        let result = Mesh::from_faces(&vertices, &[Face::new(0, 0, 1)]);
        assert!(matches!(
            result,
            Err(MeshError::FaceIndexOutOfRange {
                face: 0,
                index: 1,
                vertex_count: 1
            })
        ));
    }

    #[test]
    fn test_from_one_based() {
        assert_eq!(
            Face::from_one_based(0, [1, 2, 3], 3).unwrap(),
            Face::new(0, 1, 2)
        );
        assert!(matches!(
            Face::from_one_based(4, [1, 0, 3], 3),
            Err(MeshError::FaceIndexOutOfRange {
                face: 4,
                index: 0,
                ..
            })
        ));
        assert!(matches!(
            Face::from_one_based(1, [1, 2, 4], 3),
            Err(MeshError::FaceIndexOutOfRange {
                index: 4,
                vertex_count: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_single_vertex_face_is_degenerate() {
        let vertices = [Vec3::new(0.5, 0.5, 2.0)];
        let face = Face::from_one_based(0, [1, 1, 1], vertices.len()).unwrap();
        let mesh = Mesh::from_faces(&vertices, &[face]).unwrap();

        assert_eq!(mesh.count(), 1);
        assert_eq!(mesh.triangles()[0].vertices, [vertices[0]; 3]);
        assert_eq!(mesh.triangles()[0].normal(), None);
    }

    #[test]
    fn test_allocation_failure_degrades_to_empty_mesh() {
        // Overflows the byte size, so the reservation fails without allocating.
        let reserved = reserve_triangles(usize::MAX);
        assert!(matches!(
            reserved,
            Err(MeshError::Allocation {
                triangles: usize::MAX
            })
        ));

        let mesh = empty_on_allocation_failure(reserved.map(Mesh::from_triangles)).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.count(), 0);
        assert_eq!(mesh.capacity(), 0);
    }

    #[test]
    fn test_assemble_keeps_index_errors() {
        let vertices = [Vec3::new(0.0, 0.0, 0.0)];
        let result = Mesh::assemble(&vertices, &[Face::new(0, 0, 3)]);
        assert!(matches!(
            result,
            Err(MeshError::FaceIndexOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::from_faces(&[], &[]).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.count(), 0);
    }

    #[test]
    fn test_cube_normals_point_outwards() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.count(), 12);
        for triangle in cube.triangles() {
            let normal = triangle.normal().unwrap();
            let [v0, v1, v2] = triangle.vertices;
            let center = (v0 + v1 + v2).scale(1.0 / 3.0);
            let outward = Vec3::direction(center.x, center.y, center.z);
            assert!(normal.dot(&outward) > 0.0, "{:?}", triangle);
            assert!((normal.length() - 1.0).abs() < 1e-5);
        }
    }
}
