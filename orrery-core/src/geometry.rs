/// Geometry buffers handed to the renderer
use nalgebra::{Point2, Point3, Vector3};

/// One corner of a triangle: position, texture coordinate and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub uv: Point2<f32>,
    pub normal: Vector3<f32>,
}

/// A non-indexed triangle list stored as three parallel arrays.
///
/// Every triangle contributes three consecutive entries to each array, so a
/// vertex shared by two faces is stored twice. The arrays can be uploaded as-is
/// and drawn with a plain triangle-list draw call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Point3<f32>>,
    uvs: Vec<Point2<f32>>,
    normals: Vec<Vector3<f32>>,
}

impl Mesh {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            uvs: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, vertex: Vertex) {
        self.positions.push(vertex.position);
        self.uvs.push(vertex.uv);
        self.normals.push(vertex.normal);
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn uvs(&self) -> &[Point2<f32>] {
        &self.uvs
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    /// Number of triangle corners (the length of each array)
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn vertex(&self, i: usize) -> Vertex {
        Vertex {
            position: self.positions[i],
            uv: self.uvs[i],
            normal: self.normals[i],
        }
    }

    /// Iterate over the triangles in face order
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        (0..self.triangle_count()).map(move |t| {
            let base = t * 3;
            [self.vertex(base), self.vertex(base + 1), self.vertex(base + 2)]
        })
    }

    /// Positions flattened to `[x, y, z, x, y, z, ...]`
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Texture coordinates flattened to `[u, v, u, v, ...]`
    pub fn flat_uvs(&self) -> Vec<f32> {
        self.uvs.iter().flat_map(|uv| [uv.x, uv.y]).collect()
    }

    /// Normals flattened to `[x, y, z, x, y, z, ...]`
    pub fn flat_normals(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect()
    }
}

/// Deduplicated storage: unique corners plus an index buffer.
///
/// Two corners are merged only when they reference the same
/// (position, uv, normal) triple in the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl IndexedMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Expand back into a non-indexed triangle list
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(self.indices.len());
        for &index in &self.indices {
            mesh.push(self.vertices[index as usize]);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(x: f32) -> Vertex {
        Vertex {
            position: Point3::new(x, 0.0, 0.0),
            uv: Point2::new(x, -x),
            normal: Vector3::z(),
        }
    }

    #[test]
    fn test_flat_arrays_stay_parallel() {
        let mut mesh = Mesh::default();
        for x in [0.0, 1.0, 2.0] {
            mesh.push(corner(x));
        }
        assert_eq!(mesh.len(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.flat_positions(), vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        assert_eq!(mesh.flat_uvs(), vec![0.0, -0.0, 1.0, -1.0, 2.0, -2.0]);
        assert_eq!(mesh.flat_normals().len(), 9);
    }

    #[test]
    fn test_indexed_expands_in_index_order() {
        let indexed = IndexedMesh {
            vertices: vec![corner(0.0), corner(1.0), corner(2.0), corner(3.0)],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        let mesh = indexed.to_mesh();
        assert_eq!(mesh.len(), 6);
        let triangles: Vec<_> = mesh.triangles().collect();
        assert_eq!(triangles[1][0], corner(0.0));
        assert_eq!(triangles[1][2], corner(3.0));
    }
}
