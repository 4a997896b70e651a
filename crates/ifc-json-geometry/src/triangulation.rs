// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Planar polygons (with or without holes) are triangulated with earcutr;
//! 3D faces are projected onto their own plane first.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Check if a polygon is convex (all turns have the same sign)
fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0.0f64;

    for i in 0..n {
        let (p0, p1, p2) = (&points[i], &points[(i + 1) % n], &points[(i + 2) % n]);
        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);
        if cross.abs() <= 1e-10 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if sign != cross.signum() {
            return false;
        }
    }

    true
}

fn flatten(rings: &[&[Point2<f64>]]) -> (Vec<f64>, Vec<usize>) {
    let total: usize = rings.iter().map(|r| r.len()).sum();
    let mut coords = Vec::with_capacity(total * 2);
    let mut hole_starts = Vec::with_capacity(rings.len().saturating_sub(1));

    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            hole_starts.push(coords.len() / 2);
        }
        coords.extend(ring.iter().flat_map(|p| [p.x, p.y]));
    }

    (coords, hole_starts)
}

/// Triangulate a simple polygon (no holes)
///
/// Returns triangle indices into the input points. Small convex polygons
/// are fanned directly.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::triangulation("Need at least 3 points to triangulate"));
    }

    if n == 3 || (n <= 8 && is_convex(points)) {
        return Ok((1..n - 1).flat_map(|i| [0, i, i + 1]).collect());
    }

    let (coords, _) = flatten(&[points]);
    earcutr::earcut(&coords, &[], 2).map_err(|e| Error::triangulation(format!("{:?}", e)))
}

/// Triangulate a polygon with holes
///
/// Holes with fewer than 3 points are ignored. Returns triangle indices into
/// the outer boundary followed by the remaining holes.
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::triangulation("Need at least 3 points in outer boundary"));
    }

    let mut rings: Vec<&[Point2<f64>]> = vec![outer];
    rings.extend(holes.iter().filter(|h| h.len() >= 3).map(Vec::as_slice));

    if rings.len() == 1 {
        return triangulate_polygon(outer);
    }

    let (coords, hole_starts) = flatten(&rings);
    earcutr::earcut(&coords, &hole_starts, 2)
        .map_err(|e| Error::triangulation(format!("{:?}", e)))
}

/// Orthonormal frame on a plane, used to flatten 3D faces
#[derive(Debug, Clone, Copy)]
pub struct PlaneBasis {
    pub origin: Point3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
}

impl PlaneBasis {
    /// Build a frame through `origin` perpendicular to `normal`
    pub fn new(origin: Point3<f64>, normal: &Vector3<f64>) -> Self {
        // Pick the world axis least aligned with the normal
        let a = normal.abs();
        let reference = if a.x <= a.y && a.x <= a.z {
            Vector3::x()
        } else if a.y <= a.z {
            Vector3::y()
        } else {
            Vector3::z()
        };

        let u = normal.cross(&reference).normalize();
        let v = normal.cross(&u).normalize();
        Self { origin, u, v }
    }

    pub fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        let d = p - self.origin;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }

    pub fn project_all(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

/// Calculate the normal of a polygon from its vertices (Newell's method)
///
/// Degenerate polygons fall back to +Z.
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let (c, nx) = (&points[i], &points[(i + 1) % n]);
        normal.x += (c.y - nx.y) * (c.z + nx.z);
        normal.y += (c.z - nx.z) * (c.x + nx.x);
        normal.z += (c.x - nx.x) * (c.y + nx.y);
    }

    normal.try_normalize(1e-12).unwrap_or_else(Vector3::z)
}

/// Triangulate a planar 3D face with optional holes
///
/// Returns indices into the outer loop followed by every hole with at
/// least 3 points.
pub fn triangulate_face(outer: &[Point3<f64>], holes: &[Vec<Point3<f64>>]) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::triangulation("Face needs at least 3 points"));
    }
    if outer.len() == 3 && holes.is_empty() {
        return Ok(vec![0, 1, 2]);
    }

    let normal = calculate_polygon_normal(outer);
    let basis = PlaneBasis::new(outer[0], &normal);

    let outer_2d = basis.project_all(outer);
    let holes_2d: Vec<Vec<Point2<f64>>> = holes.iter().map(|h| basis.project_all(h)).collect();

    triangulate_polygon_with_holes(&outer_2d, &holes_2d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangulate_square() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];

        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_triangulate_concave() {
        // L-shaped hexagon
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert!(!is_convex(&points));
        assert_eq!(triangulate_polygon(&points).unwrap().len(), 12);
    }

    #[test]
    fn test_square_with_hole() {
        let outer = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        let hole = vec![
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(3.0, 3.0),
            Point2::new(3.0, 1.0),
        ];
        let indices = triangulate_polygon_with_holes(&outer, &[hole]).unwrap();
        // n + 2h - 2 triangles
        assert_eq!(indices.len() / 3, 8);
        assert!(indices.iter().all(|&i| i < 8));
    }

    #[test]
    fn test_calculate_polygon_normal() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];

        let normal = calculate_polygon_normal(&points);
        assert!((normal.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_face() {
        let face = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.5, 0.0, 1.5),
            Point3::new(0.0, 0.0, 1.0),
        ];
        assert_eq!(triangulate_face(&face, &[]).unwrap().len(), 9);
    }
}
