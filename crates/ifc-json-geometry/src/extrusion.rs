// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Linear extrusion of 2D profiles

use crate::{profile::Profile2D, Error, Mesh, Result};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Extrude a profile from the XY plane along `extrusion`
///
/// The vector carries both direction and depth. Produces two caps and one
/// quad (two triangles) per boundary edge, outer and holes alike. An
/// optional `transform` is applied to the finished mesh.
pub fn extrude_profile(
    profile: &Profile2D,
    extrusion: Vector3<f64>,
    transform: Option<Matrix4<f64>>,
) -> Result<Mesh> {
    if extrusion.norm() <= f64::EPSILON {
        return Err(Error::geometry("Extrusion depth must be positive"));
    }

    let cap = profile.triangulate()?;
    let edge_count = profile.outer.len() + profile.holes.iter().map(Vec::len).sum::<usize>();

    let mut mesh = Mesh::with_capacity(
        cap.points.len() * 2 + edge_count * 4,
        cap.indices.len() / 3 * 2 + edge_count * 2,
    );

    let lift = |p: &Point2<f64>| Point3::new(p.x, p.y, 0.0);

    // Bottom cap faces against the extrusion, top cap with it
    let bottom: Vec<u32> = cap.points.iter().map(|p| mesh.push_vertex(&lift(p))).collect();
    let top: Vec<u32> = cap
        .points
        .iter()
        .map(|p| mesh.push_vertex(&(lift(p) + extrusion)))
        .collect();

    let flip = extrusion.z < 0.0;
    for tri in cap.indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        if flip {
            mesh.push_triangle(bottom[a], bottom[b], bottom[c]);
            mesh.push_triangle(top[a], top[c], top[b]);
        } else {
            mesh.push_triangle(bottom[a], bottom[c], bottom[b]);
            mesh.push_triangle(top[a], top[b], top[c]);
        }
    }

    for ring in std::iter::once(&profile.outer).chain(profile.holes.iter()) {
        add_side_walls(&mut mesh, ring, extrusion);
    }

    if let Some(matrix) = transform {
        mesh.transform(&matrix);
    }

    Ok(mesh)
}

/// One quad per edge of a closed ring
fn add_side_walls(mesh: &mut Mesh, ring: &[Point2<f64>], extrusion: Vector3<f64>) {
    let n = ring.len();
    for i in 0..n {
        let p0 = Point3::new(ring[i].x, ring[i].y, 0.0);
        let p1 = Point3::new(ring[(i + 1) % n].x, ring[(i + 1) % n].y, 0.0);

        let a = mesh.push_vertex(&p0);
        let b = mesh.push_vertex(&p1);
        let c = mesh.push_vertex(&(p1 + extrusion));
        let d = mesh.push_vertex(&(p0 + extrusion));

        mesh.push_triangle(a, b, c);
        mesh.push_triangle(a, c, d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_box_has_twelve_triangles() {
        let profile = Profile2D::rectangle(1.0, 1.0);
        let mesh = extrude_profile(&profile, Vector3::new(0.0, 0.0, 1.0), None).unwrap();
        assert_eq!(mesh.triangle_count(), 12);

        let zs: Vec<f64> = mesh.positions.chunks(3).map(|p| p[2]).collect();
        assert_relative_eq!(zs.iter().cloned().fold(f64::MAX, f64::min), 0.0);
        assert_relative_eq!(zs.iter().cloned().fold(f64::MIN, f64::max), 1.0);
    }

    #[test]
    fn test_hollow_profile_adds_inner_walls() {
        let profile = Profile2D::hollow_circle(1.0, 0.5, Some(8)).unwrap();
        let mesh = extrude_profile(&profile, Vector3::new(0.0, 0.0, 2.0), None).unwrap();
        // 16 triangles per annulus cap, plus 8 outer and 8 inner quads
        assert_eq!(mesh.triangle_count(), 2 * 16 + 2 * 16);
    }

    #[test]
    fn test_oblique_extrusion_shears_top_cap() {
        let profile = Profile2D::rectangle(1.0, 1.0);
        let mesh = extrude_profile(&profile, Vector3::new(1.0, 0.0, 1.0), None).unwrap();
        let max_x = mesh
            .positions
            .chunks(3)
            .map(|p| p[0])
            .fold(f64::MIN, f64::max);
        assert_relative_eq!(max_x, 1.5);
    }

    #[test]
    fn test_zero_depth_rejected() {
        let profile = Profile2D::rectangle(1.0, 1.0);
        assert!(extrude_profile(&profile, Vector3::zeros(), None).is_err());
    }
}
