// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle mesh with interleaved coordinate buffer

use nalgebra::{Matrix4, Point3};

/// Indexed triangle mesh
///
/// `positions` holds `[x0, y0, z0, x1, y1, z1, ...]`; `indices` holds one
/// triple of vertex numbers per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<f64>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with room for `vertices` points and `triangles` faces
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Append a vertex and return its index
    #[inline]
    pub fn push_vertex(&mut self, p: &Point3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.extend_from_slice(&[p.x, p.y, p.z]);
        index
    }

    /// Append a triangle by vertex index
    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append another mesh, rebasing its indices
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Transform every vertex by an affine matrix
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for chunk in self.positions.chunks_exact_mut(3) {
            let p = matrix.transform_point(&Point3::new(chunk[0], chunk[1], chunk[2]));
            chunk.copy_from_slice(&[p.x, p.y, p.z]);
        }
    }

    /// Multiply every coordinate by `factor`
    pub fn scale(&mut self, factor: f64) {
        if factor != 1.0 {
            for v in self.positions.iter_mut() {
                *v *= factor;
            }
        }
    }

    /// Split into the flat coordinate and index buffers
    pub fn into_buffers(self) -> (Vec<f64>, Vec<u32>) {
        (self.positions, self.indices)
    }
}
