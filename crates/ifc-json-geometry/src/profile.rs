// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Profile definitions and triangulation
//!
//! Parameterized shapes follow the IFC convention of centring the profile
//! on its bounding box; `Position` is applied separately.

use crate::error::{Error, Result};
use crate::triangulation::triangulate_polygon_with_holes;
use nalgebra::{Matrix3, Point2};
use std::f64::consts::TAU;

/// 2D Profile with optional holes
#[derive(Debug, Clone)]
pub struct Profile2D {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Add a hole to the profile
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Triangulate the profile
    ///
    /// Returns triangle indices into the outer boundary followed by every hole.
    pub fn triangulate(&self) -> Result<Triangulation> {
        if self.outer.len() < 3 {
            return Err(Error::profile("Profile must have at least 3 vertices"));
        }

        let indices = triangulate_polygon_with_holes(&self.outer, &self.holes)?;
        if indices.is_empty() {
            return Err(Error::triangulation("Profile triangulated to nothing"));
        }

        let points = self
            .outer
            .iter()
            .chain(self.holes.iter().filter(|h| h.len() >= 3).flatten())
            .copied()
            .collect();

        Ok(Triangulation { points, indices })
    }

    /// Apply a 2D affine transform (homogeneous 3x3) to every vertex
    pub fn transform(&mut self, matrix: &Matrix3<f64>) {
        let apply = |p: &mut Point2<f64>| *p = matrix.transform_point(p);
        self.outer.iter_mut().for_each(apply);
        self.holes.iter_mut().flatten().for_each(apply);
    }

    /// Create a rectangular profile centered at origin
    pub fn rectangle(width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::new(vec![
            Point2::new(-hw, -hh),
            Point2::new(hw, -hh),
            Point2::new(hw, hh),
            Point2::new(-hw, hh),
        ])
    }

    /// Create a circular profile centered at origin
    pub fn circle(radius: f64, segments: Option<usize>) -> Self {
        let segments = segments.unwrap_or_else(|| calculate_circle_segments(radius));
        Self::new(circle_points(radius, segments))
    }

    /// Create an annulus
    pub fn hollow_circle(radius: f64, inner_radius: f64, segments: Option<usize>) -> Result<Self> {
        if inner_radius <= 0.0 || inner_radius >= radius {
            return Err(Error::profile(format!(
                "Invalid hollow circle: inner radius {} vs radius {}",
                inner_radius, radius
            )));
        }

        let mut profile = Self::circle(radius, segments);
        let mut hole = circle_points(
            inner_radius,
            segments.unwrap_or_else(|| calculate_circle_segments(inner_radius)),
        );
        hole.reverse();
        profile.add_hole(hole);
        Ok(profile)
    }

    /// Symmetric I-section
    pub fn i_shape(width: f64, depth: f64, web: f64, flange: f64) -> Self {
        let (hw, hd, ht) = (width / 2.0, depth / 2.0, web / 2.0);
        Self::new(vec![
            Point2::new(-hw, -hd),
            Point2::new(hw, -hd),
            Point2::new(hw, -hd + flange),
            Point2::new(ht, -hd + flange),
            Point2::new(ht, hd - flange),
            Point2::new(hw, hd - flange),
            Point2::new(hw, hd),
            Point2::new(-hw, hd),
            Point2::new(-hw, hd - flange),
            Point2::new(-ht, hd - flange),
            Point2::new(-ht, -hd + flange),
            Point2::new(-hw, -hd + flange),
        ])
    }

    /// L-section with the corner at the bottom left of its bounding box
    pub fn l_shape(depth: f64, width: f64, thickness: f64) -> Self {
        let (hw, hd) = (width / 2.0, depth / 2.0);
        Self::new(vec![
            Point2::new(-hw, -hd),
            Point2::new(hw, -hd),
            Point2::new(hw, -hd + thickness),
            Point2::new(-hw + thickness, -hd + thickness),
            Point2::new(-hw + thickness, hd),
            Point2::new(-hw, hd),
        ])
    }

    /// T-section with the flange on top
    pub fn t_shape(depth: f64, flange_width: f64, web: f64, flange: f64) -> Self {
        let (hf, hd, ht) = (flange_width / 2.0, depth / 2.0, web / 2.0);
        Self::new(vec![
            Point2::new(-ht, -hd),
            Point2::new(ht, -hd),
            Point2::new(ht, hd - flange),
            Point2::new(hf, hd - flange),
            Point2::new(hf, hd),
            Point2::new(-hf, hd),
            Point2::new(-hf, hd - flange),
            Point2::new(-ht, hd - flange),
        ])
    }
}

fn circle_points(radius: f64, segments: usize) -> Vec<Point2<f64>> {
    (0..segments)
        .map(|i| {
            let angle = TAU * (i as f64) / (segments as f64);
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Triangulated profile result
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// All vertices (outer + holes)
    pub points: Vec<Point2<f64>>,
    /// Triangle indices
    pub indices: Vec<usize>,
}

/// Calculate adaptive number of segments for a circle
#[inline]
pub fn calculate_circle_segments(radius: f64) -> usize {
    let segments = (radius.sqrt() * 8.0).ceil() as usize;
    segments.clamp(8, 32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    #[test]
    fn test_triangulate_rectangle() {
        let profile = Profile2D::rectangle(10.0, 5.0);
        let tri = profile.triangulate().unwrap();
        assert_eq!(tri.points.len(), 4);
        assert_eq!(tri.indices.len(), 6);
    }

    #[test]
    fn test_circle_segments_are_clamped() {
        assert_eq!(calculate_circle_segments(0.01), 8);
        assert_eq!(calculate_circle_segments(1000.0), 32);
        assert!(Profile2D::circle(5.0, None).outer.len() >= 8);
    }

    #[test]
    fn test_hollow_circle_validation() {
        assert!(Profile2D::hollow_circle(1.0, 1.0, None).is_err());
        let profile = Profile2D::hollow_circle(1.0, 0.9, Some(12)).unwrap();
        assert_eq!(profile.holes.len(), 1);
        assert_eq!(profile.holes[0].len(), 12);
    }

    #[test]
    fn test_shapes_are_centered_on_bounding_box() {
        for profile in [
            Profile2D::i_shape(0.2, 0.4, 0.01, 0.02),
            Profile2D::l_shape(0.1, 0.08, 0.01),
            Profile2D::t_shape(0.3, 0.2, 0.01, 0.02),
        ] {
            let min_x = profile.outer.iter().map(|p| p.x).fold(f64::MAX, f64::min);
            let max_x = profile.outer.iter().map(|p| p.x).fold(f64::MIN, f64::max);
            let min_y = profile.outer.iter().map(|p| p.y).fold(f64::MAX, f64::min);
            let max_y = profile.outer.iter().map(|p| p.y).fold(f64::MIN, f64::max);
            assert_relative_eq!(min_x + max_x, 0.0, epsilon = 1e-12);
            assert_relative_eq!(min_y + max_y, 0.0, epsilon = 1e-12);
            assert!(profile.triangulate().is_ok());
        }
    }

    #[test]
    fn test_transform_moves_profile() {
        let mut profile = Profile2D::rectangle(2.0, 2.0);
        profile.transform(&Matrix3::new_translation(&Vector2::new(1.0, 1.0)));
        assert_relative_eq!(profile.outer[0].x, 0.0);
        assert_relative_eq!(profile.outer[2].y, 2.0);
    }
}
