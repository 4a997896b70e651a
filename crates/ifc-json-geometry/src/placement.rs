// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement and transformation resolution
//!
//! Converts IFC placement entities into homogeneous matrices:
//! `IfcLocalPlacement` chains, `IfcAxis2Placement2D/3D` and
//! `IfcCartesianTransformationOperator3D` (uniform and non-uniform).

use crate::{Error, Point2, Point3, Result, Vector2, Vector3};
use ifc_json_model::{DecodedEntity, EntityId, EntityResolver, IfcType};
use nalgebra::{Matrix3, Matrix4};

/// Deepest `PlacementRelTo` chain accepted before assuming a cycle
const MAX_PLACEMENT_DEPTH: usize = 256;

fn coordinate_list(entity: &DecodedEntity, index: usize) -> Result<Vec<f64>> {
    let list = entity
        .get_list(index)
        .ok_or_else(|| Error::invalid_attribute(entity.id, index, "expected a list"))?;

    list.iter()
        .map(|v| {
            v.as_float()
                .ok_or_else(|| Error::invalid_attribute(entity.id, index, "expected a number"))
        })
        .collect()
}

fn expect_type(entity: &DecodedEntity, expected: IfcType) -> Result<()> {
    if entity.ifc_type == expected {
        Ok(())
    } else {
        Err(Error::geometry(format!(
            "{} is {}, expected {}",
            entity.id, entity.ifc_type, expected
        )))
    }
}

/// Resolve an IfcCartesianPoint as a 3D point (missing Z is 0)
pub fn resolve_point3(resolver: &dyn EntityResolver, id: EntityId) -> Result<Point3<f64>> {
    let point = resolver.decode(id)?;
    expect_type(&point, IfcType::IfcCartesianPoint)?;
    point3_from_coords(&point, &coordinate_list(&point, 0)?)
}

/// Resolve an IfcCartesianPoint as a 2D point
pub fn resolve_point2(resolver: &dyn EntityResolver, id: EntityId) -> Result<Point2<f64>> {
    let point = resolver.decode(id)?;
    expect_type(&point, IfcType::IfcCartesianPoint)?;
    match coordinate_list(&point, 0)?.as_slice() {
        [x, y, ..] => Ok(Point2::new(*x, *y)),
        _ => Err(Error::invalid_attribute(point.id, 0, "need at least 2 coordinates")),
    }
}

pub(crate) fn point3_from_coords(entity: &DecodedEntity, coords: &[f64]) -> Result<Point3<f64>> {
    match coords {
        [x, y] => Ok(Point3::new(*x, *y, 0.0)),
        [x, y, z, ..] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(Error::invalid_attribute(entity.id, 0, "need at least 2 coordinates")),
    }
}

/// Resolve an IfcDirection as a 3D vector (missing Z is 0)
pub fn resolve_direction3(resolver: &dyn EntityResolver, id: EntityId) -> Result<Vector3<f64>> {
    let direction = resolver.decode(id)?;
    expect_type(&direction, IfcType::IfcDirection)?;
    match coordinate_list(&direction, 0)?.as_slice() {
        [x, y] => Ok(Vector3::new(*x, *y, 0.0)),
        [x, y, z, ..] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(Error::invalid_attribute(direction.id, 0, "need at least 2 ratios")),
    }
}

/// Resolve an IfcDirection as a 2D vector
pub fn resolve_direction2(resolver: &dyn EntityResolver, id: EntityId) -> Result<Vector2<f64>> {
    let direction = resolver.decode(id)?;
    expect_type(&direction, IfcType::IfcDirection)?;
    match coordinate_list(&direction, 0)?.as_slice() {
        [x, y, ..] => Ok(Vector2::new(*x, *y)),
        _ => Err(Error::invalid_attribute(direction.id, 0, "need at least 2 ratios")),
    }
}

/// Right-handed orthonormal frame from a Z axis and an X hint
///
/// The hint is projected onto the plane normal to Z; when it is parallel
/// to Z a world axis is substituted.
fn orthonormal_frame(
    z: Vector3<f64>,
    x_hint: Vector3<f64>,
) -> Result<(Vector3<f64>, Vector3<f64>, Vector3<f64>)> {
    let z = z
        .try_normalize(1e-12)
        .ok_or_else(|| Error::geometry("Zero-length axis direction"))?;

    let project = |v: Vector3<f64>| (v - z * v.dot(&z)).try_normalize(1e-9);
    let x = project(x_hint)
        .or_else(|| project(Vector3::x()))
        .or_else(|| project(Vector3::y()))
        .ok_or_else(|| Error::geometry("Cannot build placement frame"))?;
    let y = z.cross(&x);

    Ok((x, y, z))
}

fn frame_matrix(
    x: Vector3<f64>,
    y: Vector3<f64>,
    z: Vector3<f64>,
    origin: Point3<f64>,
) -> Matrix4<f64> {
    Matrix4::new(
        x.x, y.x, z.x, origin.x, //
        x.y, y.y, z.y, origin.y, //
        x.z, y.z, z.z, origin.z, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// IfcAxis2Placement3D: Location (0), Axis (1), RefDirection (2)
pub fn axis2_placement_3d(resolver: &dyn EntityResolver, placement: &DecodedEntity) -> Result<Matrix4<f64>> {
    expect_type(placement, IfcType::IfcAxis2Placement3D)?;

    let location = placement
        .get_ref(0)
        .ok_or_else(|| Error::invalid_attribute(placement.id, 0, "missing Location"))?;
    let origin = resolve_point3(resolver, location)?;

    let axis = match placement.get_ref(1) {
        Some(id) => resolve_direction3(resolver, id)?,
        None => Vector3::z(),
    };
    let ref_direction = match placement.get_ref(2) {
        Some(id) => resolve_direction3(resolver, id)?,
        None => Vector3::x(),
    };

    let (x, y, z) = orthonormal_frame(axis, ref_direction)?;
    Ok(frame_matrix(x, y, z, origin))
}

/// IfcAxis2Placement2D: Location (0), RefDirection (1)
pub fn axis2_placement_2d(resolver: &dyn EntityResolver, placement: &DecodedEntity) -> Result<Matrix3<f64>> {
    expect_type(placement, IfcType::IfcAxis2Placement2D)?;

    let location = placement
        .get_ref(0)
        .ok_or_else(|| Error::invalid_attribute(placement.id, 0, "missing Location"))?;
    let origin = resolve_point2(resolver, location)?;

    let x = match placement.get_ref(1) {
        Some(id) => resolve_direction2(resolver, id)?
            .try_normalize(1e-12)
            .ok_or_else(|| Error::invalid_attribute(placement.id, 1, "zero-length direction"))?,
        None => Vector2::x(),
    };
    let y = Vector2::new(-x.y, x.x);

    Ok(Matrix3::new(
        x.x, y.x, origin.x, //
        x.y, y.y, origin.y, //
        0.0, 0.0, 1.0,
    ))
}

/// IfcCartesianTransformationOperator3D(nonUniform)
///
/// Axis1 (0), Axis2 (1), LocalOrigin (2), Scale (3), Axis3 (4), and for the
/// non-uniform variant Scale2 (5) and Scale3 (6), both defaulting to Scale.
pub fn transformation_operator(
    resolver: &dyn EntityResolver,
    operator: &DecodedEntity,
) -> Result<Matrix4<f64>> {
    let non_uniform = match operator.ifc_type {
        IfcType::IfcCartesianTransformationOperator3D => false,
        IfcType::IfcCartesianTransformationOperator3DnonUniform => true,
        ref other => {
            return Err(Error::unsupported_type(format!(
                "{} as transformation operator",
                other
            )))
        }
    };

    let direction = |index: usize| -> Result<Option<Vector3<f64>>> {
        operator
            .get_ref(index)
            .map(|id| resolve_direction3(resolver, id))
            .transpose()
    };

    let axis1 = direction(0)?;
    let axis2 = direction(1)?;
    let axis3 = direction(4)?;

    let origin = operator
        .get_ref(2)
        .ok_or_else(|| Error::invalid_attribute(operator.id, 2, "missing LocalOrigin"))?;
    let origin = resolve_point3(resolver, origin)?;

    let scale = operator.get_float(3).unwrap_or(1.0);
    let (scale2, scale3) = if non_uniform {
        (
            operator.get_float(5).unwrap_or(scale),
            operator.get_float(6).unwrap_or(scale),
        )
    } else {
        (scale, scale)
    };

    let z = axis3.unwrap_or_else(|| match (axis1, axis2) {
        (Some(a1), Some(a2)) if a1.cross(&a2).norm() > 1e-12 => a1.cross(&a2),
        _ => Vector3::z(),
    });
    let (x, y, z) = orthonormal_frame(z, axis1.unwrap_or_else(Vector3::x))?;

    Ok(frame_matrix(x * scale, y * scale2, z * scale3, origin))
}

/// Matrix for any supported placement-like entity
///
/// Accepts IfcLocalPlacement (full chain), IfcAxis2Placement3D/2D and the
/// 3D transformation operators.
pub fn placement_matrix(resolver: &dyn EntityResolver, id: EntityId) -> Result<Matrix4<f64>> {
    let entity = resolver.decode(id)?;

    match entity.ifc_type {
        IfcType::IfcLocalPlacement => object_placement(resolver, id),
        IfcType::IfcAxis2Placement3D => axis2_placement_3d(resolver, &entity),
        IfcType::IfcAxis2Placement2D => Ok(lift_2d(&axis2_placement_2d(resolver, &entity)?)),
        IfcType::IfcCartesianTransformationOperator3D
        | IfcType::IfcCartesianTransformationOperator3DnonUniform => {
            transformation_operator(resolver, &entity)
        }
        ref other => Err(Error::unsupported_type(format!("{} as placement", other))),
    }
}

/// Embed a 2D homogeneous transform in the XY plane
pub fn lift_2d(m: &Matrix3<f64>) -> Matrix4<f64> {
    Matrix4::new(
        m[(0, 0)], m[(0, 1)], 0.0, m[(0, 2)], //
        m[(1, 0)], m[(1, 1)], 0.0, m[(1, 2)], //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// World transform of an object placement
///
/// Follows `PlacementRelTo` (0) up to the root, composing each
/// `RelativePlacement` (1). A chain deeper than [`MAX_PLACEMENT_DEPTH`] is
/// treated as cyclic.
pub fn object_placement(resolver: &dyn EntityResolver, id: EntityId) -> Result<Matrix4<f64>> {
    let mut world = Matrix4::identity();
    let mut current = Some(id);
    let mut depth = 0;

    while let Some(placement_id) = current {
        depth += 1;
        if depth > MAX_PLACEMENT_DEPTH {
            return Err(Error::geometry(format!(
                "Placement chain starting at {} is cyclic or too deep",
                id
            )));
        }

        let placement = resolver.decode(placement_id)?;
        match placement.ifc_type {
            IfcType::IfcLocalPlacement => {
                let local = match placement.get_ref(1) {
                    Some(relative) => placement_matrix(resolver, relative)?,
                    None => Matrix4::identity(),
                };
                world = local * world;
                current = placement.get_ref(0);
            }
            // Grid placements and the like are not followed
            ref other => {
                return Err(Error::unsupported_type(format!(
                    "{} in object placement chain",
                    other
                )))
            }
        }
    }

    Ok(world)
}
