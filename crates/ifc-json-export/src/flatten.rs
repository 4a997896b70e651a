// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reshape indexed triangle buffers into self-contained triangles

use crate::error::{ExportError, Result};

/// A point as `[x, y, z]`
pub type Point = [f64; 3];

/// Three independently materialized points
pub type Triangle = [Point; 3];

/// Expand flat coordinate and index buffers into triangles of points
///
/// `coords` holds `[x0, y0, z0, x1, ...]`, `indices` one triple per
/// triangle. Buffers whose length is not a multiple of three, non-finite
/// coordinates and out-of-range indices are errors.
pub fn flatten(coords: &[f64], indices: &[u32]) -> Result<Vec<Triangle>> {
    if coords.len() % 3 != 0 {
        return Err(ExportError::data(format!(
            "coordinate buffer length {} is not a multiple of 3",
            coords.len()
        )));
    }
    if indices.len() % 3 != 0 {
        return Err(ExportError::data(format!(
            "index buffer length {} is not a multiple of 3",
            indices.len()
        )));
    }
    if let Some(bad) = coords.iter().find(|v| !v.is_finite()) {
        return Err(ExportError::data(format!("non-finite coordinate {}", bad)));
    }

    let points: Vec<Point> = coords
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    let point = |index: u32| -> Result<Point> {
        points
            .get(index as usize)
            .copied()
            .ok_or(ExportError::IndexOutOfRange {
                index,
                len: points.len(),
            })
    };

    indices
        .chunks_exact(3)
        .map(|tri| Ok([point(tri[0])?, point(tri[1])?, point(tri[2])?]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_triangle() {
        let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let triangles = flatten(&coords, &[0, 1, 2]).unwrap();
        assert_eq!(
            triangles,
            vec![[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]]
        );
    }

    #[test]
    fn test_shared_vertices_are_duplicated() {
        let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        let triangles = flatten(&coords, &[0, 1, 2, 0, 2, 3]).unwrap();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0][0], triangles[1][0]);
        assert_eq!(triangles[1][2], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_is_pure() {
        let coords = [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0, 0.0];
        let indices = [2, 1, 0];
        assert_eq!(flatten(&coords, &indices).unwrap(), flatten(&coords, &indices).unwrap());
    }

    #[test]
    fn test_empty_buffers() {
        assert!(flatten(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_index() {
        let coords = [0.0; 9];
        let err = flatten(&coords, &[0, 1, 3]).unwrap_err();
        assert!(matches!(err, ExportError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_ragged_buffers_rejected() {
        assert!(matches!(flatten(&[0.0; 8], &[]), Err(ExportError::Data(_))));
        assert!(matches!(flatten(&[0.0; 9], &[0, 1]), Err(ExportError::Data(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        let coords = [0.0, 0.0, f64::NAN, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        assert!(flatten(&coords, &[0, 1, 2]).is_err());
    }
}
