// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Processors - Implementations for various IFC geometry types
//!
//! Each processor handles one or more types of IFC representation items and
//! produces a mesh in the item's own coordinate system, in file units.

use crate::{
    extrusion::extrude_profile,
    placement::{
        axis2_placement_2d, placement_matrix, point3_from_coords, resolve_direction3,
        resolve_point2, resolve_point3,
    },
    profile::Profile2D,
    router::{GeometryProcessor, TessellationSettings},
    triangulation::triangulate_face,
    Error, Mesh, Point2, Point3, Result,
};
use ifc_json_model::{AttributeValue, DecodedEntity, EntityId, EntityResolver, IfcType};

fn required_ref(entity: &DecodedEntity, index: usize, name: &str) -> Result<EntityId> {
    entity
        .get_ref(index)
        .ok_or_else(|| Error::invalid_attribute(entity.id, index, format!("missing {}", name)))
}

fn required_refs(entity: &DecodedEntity, index: usize, name: &str) -> Result<Vec<EntityId>> {
    entity
        .get_refs(index)
        .ok_or_else(|| Error::invalid_attribute(entity.id, index, format!("missing {}", name)))
}

/// A strictly positive length attribute
fn dimension(entity: &DecodedEntity, index: usize, name: &str) -> Result<f64> {
    match entity.get_float(index) {
        Some(value) if value > 0.0 && value.is_finite() => Ok(value),
        Some(value) => Err(Error::invalid_attribute(
            entity.id,
            index,
            format!("{} must be positive, got {}", name, value),
        )),
        None => Err(Error::invalid_attribute(entity.id, index, format!("missing {}", name))),
    }
}

/// Convert a 1-based STEP index into a 0-based one, checking bounds
fn one_based(entity: EntityId, attribute: usize, value: &AttributeValue, len: usize) -> Result<usize> {
    match value.as_integer() {
        Some(i) if i >= 1 && (i as u64) <= len as u64 => Ok(i as usize - 1),
        Some(i) => Err(Error::invalid_attribute(
            entity,
            attribute,
            format!("index {} outside 1..={}", i, len),
        )),
        None => Err(Error::invalid_attribute(entity, attribute, "expected an integer index")),
    }
}

/// Lists may arrive bare or wrapped in a typed value such as IFCLINEINDEX((1,2))
fn inner_list(value: &AttributeValue) -> Option<&[AttributeValue]> {
    match value {
        AttributeValue::List(items) => Some(items),
        AttributeValue::TypedValue(_, args) => args.first().and_then(AttributeValue::as_list),
        _ => None,
    }
}

/// Rows of numbers from a CoordList-style attribute
fn coordinate_rows(entity: &DecodedEntity, index: usize) -> Result<Vec<Vec<f64>>> {
    let rows = entity
        .get_list(index)
        .ok_or_else(|| Error::invalid_attribute(entity.id, index, "missing CoordList"))?;

    rows.iter()
        .map(|row| {
            row.as_list()
                .and_then(|values| values.iter().map(AttributeValue::as_float).collect())
                .ok_or_else(|| Error::invalid_attribute(entity.id, index, "malformed coordinate row"))
        })
        .collect()
}

/// IfcCartesianPointList3D coordinates
fn point_list_3d(resolver: &dyn EntityResolver, id: EntityId) -> Result<Vec<Point3<f64>>> {
    let list = resolver.decode(id)?;
    if list.ifc_type != IfcType::IfcCartesianPointList3D {
        return Err(Error::unsupported_type(format!("{} as 3D point list", list.ifc_type)));
    }

    coordinate_rows(&list, 0)?
        .iter()
        .map(|row| point3_from_coords(&list, row))
        .collect()
}

/// IfcCartesianPointList2D coordinates
fn point_list_2d(resolver: &dyn EntityResolver, id: EntityId) -> Result<Vec<Point2<f64>>> {
    let list = resolver.decode(id)?;
    if list.ifc_type != IfcType::IfcCartesianPointList2D {
        return Err(Error::unsupported_type(format!("{} as 2D point list", list.ifc_type)));
    }

    coordinate_rows(&list, 0)?
        .iter()
        .map(|row| match row.as_slice() {
            [x, y, ..] => Ok(Point2::new(*x, *y)),
            _ => Err(Error::invalid_attribute(list.id, 0, "need 2 coordinates per point")),
        })
        .collect()
}

/// Drop a trailing point that repeats the first one
fn open_ring<P>(mut points: Vec<P>, close: impl Fn(&P, &P) -> bool) -> Vec<P> {
    if points.len() > 1 && close(&points[0], &points[points.len() - 1]) {
        points.pop();
    }
    points
}

// ============================================================================
// Profiles
// ============================================================================

/// Extract the 2D profile of an IfcProfileDef, with its Position applied
pub fn extract_profile(resolver: &dyn EntityResolver, entity: &DecodedEntity) -> Result<Profile2D> {
    let mut profile = match entity.ifc_type {
        IfcType::IfcRectangleProfileDef => {
            Profile2D::rectangle(dimension(entity, 3, "XDim")?, dimension(entity, 4, "YDim")?)
        }
        IfcType::IfcCircleProfileDef => Profile2D::circle(dimension(entity, 3, "Radius")?, None),
        IfcType::IfcCircleHollowProfileDef => {
            let radius = dimension(entity, 3, "Radius")?;
            let wall = dimension(entity, 4, "WallThickness")?;
            Profile2D::hollow_circle(radius, radius - wall, None)?
        }
        IfcType::IfcIShapeProfileDef => Profile2D::i_shape(
            dimension(entity, 3, "OverallWidth")?,
            dimension(entity, 4, "OverallDepth")?,
            dimension(entity, 5, "WebThickness")?,
            dimension(entity, 6, "FlangeThickness")?,
        ),
        IfcType::IfcLShapeProfileDef => {
            let depth = dimension(entity, 3, "Depth")?;
            let width = match entity.get(4) {
                Some(value) if !value.is_null() => dimension(entity, 4, "Width")?,
                _ => depth,
            };
            Profile2D::l_shape(depth, width, dimension(entity, 5, "Thickness")?)
        }
        IfcType::IfcTShapeProfileDef => Profile2D::t_shape(
            dimension(entity, 3, "Depth")?,
            dimension(entity, 4, "FlangeWidth")?,
            dimension(entity, 5, "WebThickness")?,
            dimension(entity, 6, "FlangeThickness")?,
        ),
        // Arbitrary profiles are already in the profile plane
        IfcType::IfcArbitraryClosedProfileDef => {
            return Ok(Profile2D::new(curve_points(
                resolver,
                required_ref(entity, 2, "OuterCurve")?,
            )?))
        }
        IfcType::IfcArbitraryProfileDefWithVoids => {
            let mut profile =
                Profile2D::new(curve_points(resolver, required_ref(entity, 2, "OuterCurve")?)?);
            for inner in required_refs(entity, 3, "InnerCurves")? {
                profile.add_hole(curve_points(resolver, inner)?);
            }
            return Ok(profile);
        }
        ref other => return Err(Error::unsupported_type(format!("Profile type {}", other))),
    };

    if let Some(position) = entity.get_ref(2) {
        let position = resolver.decode(position)?;
        profile.transform(&axis2_placement_2d(resolver, &position)?);
    }

    Ok(profile)
}

/// Points of a closed 2D bounded curve, without the closing duplicate
fn curve_points(resolver: &dyn EntityResolver, id: EntityId) -> Result<Vec<Point2<f64>>> {
    let curve = resolver.decode(id)?;

    let points = match curve.ifc_type {
        IfcType::IfcPolyline => required_refs(&curve, 0, "Points")?
            .into_iter()
            .map(|point| resolve_point2(resolver, point))
            .collect::<Result<Vec<_>>>()?,
        IfcType::IfcIndexedPolyCurve => indexed_poly_curve(resolver, &curve)?,
        ref other => return Err(Error::unsupported_type(format!("Curve type {}", other))),
    };

    let points = open_ring(points, |a: &Point2<f64>, b: &Point2<f64>| (a - b).norm() < 1e-9);
    if points.len() < 3 {
        return Err(Error::profile(format!(
            "Curve {} has fewer than 3 distinct points",
            id
        )));
    }
    Ok(points)
}

/// IfcIndexedPolyCurve: Points (0), Segments (1)
///
/// Arc segments contribute their three control points, so arcs are
/// approximated by two chords.
fn indexed_poly_curve(resolver: &dyn EntityResolver, curve: &DecodedEntity) -> Result<Vec<Point2<f64>>> {
    let coords = point_list_2d(resolver, required_ref(curve, 0, "Points")?)?;

    let segments = match curve.get_list(1) {
        Some(segments) if !segments.is_empty() => segments,
        _ => return Ok(coords),
    };

    let mut order: Vec<usize> = Vec::new();
    for segment in segments {
        let indices = inner_list(segment)
            .ok_or_else(|| Error::invalid_attribute(curve.id, 1, "malformed segment"))?;
        for value in indices {
            let index = one_based(curve.id, 1, value, coords.len())?;
            if order.last() != Some(&index) {
                order.push(index);
            }
        }
    }

    Ok(order.into_iter().map(|i| coords[i]).collect())
}

/// ExtrudedAreaSolid processor
///
/// IfcExtrudedAreaSolid: SweptArea (0), Position (1), ExtrudedDirection (2),
/// Depth (3).
pub struct ExtrudedAreaSolidProcessor;

impl ExtrudedAreaSolidProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExtrudedAreaSolidProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProcessor for ExtrudedAreaSolidProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
        _settings: &TessellationSettings,
    ) -> Result<Mesh> {
        let swept_area = resolver.decode(required_ref(entity, 0, "SweptArea")?)?;
        let profile = extract_profile(resolver, &swept_area)?;

        let position = entity
            .get_ref(1)
            .map(|id| placement_matrix(resolver, id))
            .transpose()?;

        let direction = resolve_direction3(resolver, required_ref(entity, 2, "ExtrudedDirection")?)?
            .try_normalize(1e-12)
            .ok_or_else(|| Error::invalid_attribute(entity.id, 2, "zero-length direction"))?;
        let depth = dimension(entity, 3, "Depth")?;

        extrude_profile(&profile, direction * depth, position)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcExtrudedAreaSolid]
    }
}

// ============================================================================
// Tessellated items
// ============================================================================

/// Optional PnIndex remapping for indexed face sets
fn pn_index(entity: &DecodedEntity, attribute: usize, coord_count: usize) -> Result<Option<Vec<usize>>> {
    match entity.get_list(attribute) {
        Some(list) if !list.is_empty() => list
            .iter()
            .map(|v| one_based(entity.id, attribute, v, coord_count))
            .collect::<Result<Vec<_>>>()
            .map(Some),
        _ => Ok(None),
    }
}

/// Resolves 1-based face indices to positions in the coordinate list
struct IndexMap<'a> {
    entity: EntityId,
    pn_index: Option<&'a [usize]>,
    coord_count: usize,
}

impl IndexMap<'_> {
    fn resolve(&self, attribute: usize, value: &AttributeValue) -> Result<usize> {
        match self.pn_index {
            Some(pn) => Ok(pn[one_based(self.entity, attribute, value, pn.len())?]),
            None => one_based(self.entity, attribute, value, self.coord_count),
        }
    }

    fn resolve_all(&self, attribute: usize, values: &[AttributeValue]) -> Result<Vec<usize>> {
        values.iter().map(|v| self.resolve(attribute, v)).collect()
    }
}

/// TriangulatedFaceSet processor
///
/// IfcTriangulatedFaceSet: Coordinates (0), Normals (1), Closed (2),
/// CoordIndex (3), PnIndex (4). Indices are 1-based.
pub struct TriangulatedFaceSetProcessor;

impl TriangulatedFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TriangulatedFaceSetProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProcessor for TriangulatedFaceSetProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
        _settings: &TessellationSettings,
    ) -> Result<Mesh> {
        let coords = point_list_3d(resolver, required_ref(entity, 0, "Coordinates")?)?;
        let pn = pn_index(entity, 4, coords.len())?;
        let map = IndexMap {
            entity: entity.id,
            pn_index: pn.as_deref(),
            coord_count: coords.len(),
        };

        let triangles = entity
            .get_list(3)
            .ok_or_else(|| Error::invalid_attribute(entity.id, 3, "missing CoordIndex"))?;

        let mut mesh = Mesh::with_capacity(coords.len(), triangles.len());
        for point in &coords {
            mesh.push_vertex(point);
        }

        for triangle in triangles {
            match triangle.as_list().map(|t| map.resolve_all(3, t)).transpose()? {
                Some(idx) if idx.len() == 3 => {
                    mesh.push_triangle(idx[0] as u32, idx[1] as u32, idx[2] as u32)
                }
                _ => {
                    return Err(Error::invalid_attribute(
                        entity.id,
                        3,
                        "each CoordIndex entry must hold 3 indices",
                    ))
                }
            }
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcTriangulatedFaceSet]
    }
}

/// Triangulate one polygon (with holes) and append it to the mesh
fn append_face(mesh: &mut Mesh, outer: &[Point3<f64>], holes: &[Vec<Point3<f64>>]) -> Result<()> {
    let indices = triangulate_face(outer, holes)?;

    let base: Vec<u32> = outer
        .iter()
        .chain(holes.iter().filter(|h| h.len() >= 3).flatten())
        .map(|p| mesh.push_vertex(p))
        .collect();

    for tri in indices.chunks_exact(3) {
        mesh.push_triangle(base[tri[0]], base[tri[1]], base[tri[2]]);
    }
    Ok(())
}

/// Apply the strictness policy to a single face
fn tolerate(result: Result<()>, face: EntityId, settings: &TessellationSettings) -> Result<()> {
    match result {
        Err(e) if settings.tolerates(&e) => {
            log::debug!("Skipping face {}: {}", face, e);
            Ok(())
        }
        other => other,
    }
}

/// PolygonalFaceSet processor
///
/// IfcPolygonalFaceSet: Coordinates (0), Closed (1), Faces (2), PnIndex (3).
/// Each IfcIndexedPolygonalFace holds CoordIndex (0) and, for the
/// WithVoids subtype, InnerCoordIndices (1).
pub struct PolygonalFaceSetProcessor;

impl PolygonalFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PolygonalFaceSetProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProcessor for PolygonalFaceSetProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
        settings: &TessellationSettings,
    ) -> Result<Mesh> {
        let coords = point_list_3d(resolver, required_ref(entity, 0, "Coordinates")?)?;
        let pn = pn_index(entity, 3, coords.len())?;
        let map = IndexMap {
            entity: entity.id,
            pn_index: pn.as_deref(),
            coord_count: coords.len(),
        };

        let mut mesh = Mesh::new();
        for face_id in required_refs(entity, 2, "Faces")? {
            let face = resolver.decode(face_id)?;
            let ring = |values: &[AttributeValue]| -> Result<Vec<Point3<f64>>> {
                Ok(map.resolve_all(0, values)?.into_iter().map(|i| coords[i]).collect())
            };

            let outer = ring(
                face.get_list(0)
                    .ok_or_else(|| Error::invalid_attribute(face.id, 0, "missing CoordIndex"))?,
            )?;

            let mut holes = Vec::new();
            if face.ifc_type == IfcType::IfcIndexedPolygonalFaceWithVoids {
                for inner in face.get_list(1).unwrap_or_default() {
                    let inner = inner.as_list().ok_or_else(|| {
                        Error::invalid_attribute(face.id, 1, "malformed InnerCoordIndices")
                    })?;
                    holes.push(ring(inner)?);
                }
            }

            tolerate(append_face(&mut mesh, &outer, &holes), face.id, settings)?;
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcPolygonalFaceSet]
    }
}

// ============================================================================
// Boundary representations
// ============================================================================

/// Points of an IfcPolyLoop, oriented per its bound, without a closing duplicate
fn loop_points(resolver: &dyn EntityResolver, bound: &DecodedEntity) -> Result<Vec<Point3<f64>>> {
    let poly_loop = resolver.decode(required_ref(bound, 0, "Bound")?)?;
    if poly_loop.ifc_type != IfcType::IfcPolyLoop {
        return Err(Error::unsupported_type(format!("Loop type {}", poly_loop.ifc_type)));
    }

    let mut points = required_refs(&poly_loop, 0, "Polygon")?
        .into_iter()
        .map(|id| resolve_point3(resolver, id))
        .collect::<Result<Vec<_>>>()?;

    // Orientation (1): .F. reverses the loop
    if bound.get(1).and_then(AttributeValue::as_bool) == Some(false) {
        points.reverse();
    }

    Ok(open_ring(points, |a: &Point3<f64>, b: &Point3<f64>| {
        (a - b).norm() < 1e-9
    }))
}

/// Append one IfcFace (Bounds at 0) to the mesh
fn append_ifc_face(mesh: &mut Mesh, resolver: &dyn EntityResolver, face: &DecodedEntity) -> Result<()> {
    let mut outer = None;
    let mut inner = Vec::new();

    for bound_id in required_refs(face, 0, "Bounds")? {
        let bound = resolver.decode(bound_id)?;
        let points = loop_points(resolver, &bound)?;
        match bound.ifc_type {
            IfcType::IfcFaceOuterBound if outer.is_none() => outer = Some(points),
            IfcType::IfcFaceOuterBound | IfcType::IfcFaceBound => inner.push(points),
            ref other => {
                return Err(Error::unsupported_type(format!("Face bound type {}", other)))
            }
        }
    }

    // Without an explicit outer bound the first bound is the outer one
    let outer = match outer {
        Some(outer) => outer,
        None if !inner.is_empty() => inner.remove(0),
        None => return Err(Error::geometry(format!("Face {} has no bounds", face.id))),
    };

    append_face(mesh, &outer, &inner)
}

/// Tessellate every face of a closed or open shell
fn append_shell(
    mesh: &mut Mesh,
    resolver: &dyn EntityResolver,
    shell_id: EntityId,
    settings: &TessellationSettings,
) -> Result<()> {
    let shell = resolver.decode(shell_id)?;
    match shell.ifc_type {
        IfcType::IfcClosedShell | IfcType::IfcOpenShell => {}
        ref other => return Err(Error::unsupported_type(format!("Shell type {}", other))),
    }

    for face_id in required_refs(&shell, 0, "CfsFaces")? {
        let face = resolver.decode(face_id)?;
        tolerate(append_ifc_face(mesh, resolver, &face), face_id, settings)?;
    }
    Ok(())
}

/// FacetedBrep processor
///
/// IfcFacetedBrep: Outer (0). IfcFacetedBrepWithVoids adds Voids (1), whose
/// faces are emitted as well.
pub struct FacetedBrepProcessor;

impl FacetedBrepProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FacetedBrepProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProcessor for FacetedBrepProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
        settings: &TessellationSettings,
    ) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        append_shell(&mut mesh, resolver, required_ref(entity, 0, "Outer")?, settings)?;

        if entity.ifc_type == IfcType::IfcFacetedBrepWithVoids {
            for void in required_refs(entity, 1, "Voids")? {
                append_shell(&mut mesh, resolver, void, settings)?;
            }
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcFacetedBrep, IfcType::IfcFacetedBrepWithVoids]
    }
}

/// ShellBasedSurfaceModel processor (SbsmBoundary at 0)
pub struct ShellBasedSurfaceModelProcessor;

impl ShellBasedSurfaceModelProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellBasedSurfaceModelProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProcessor for ShellBasedSurfaceModelProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
        settings: &TessellationSettings,
    ) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        for shell in required_refs(entity, 0, "SbsmBoundary")? {
            append_shell(&mut mesh, resolver, shell, settings)?;
        }
        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcShellBasedSurfaceModel]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::model;
    use approx::assert_relative_eq;
    use ifc_json_model::IfcModel;

    fn run(processor: &dyn GeometryProcessor, data: &str, id: u32) -> Result<Mesh> {
        run_with(processor, data, id, &TessellationSettings::default())
    }

    fn run_with(
        processor: &dyn GeometryProcessor,
        data: &str,
        id: u32,
        settings: &TessellationSettings,
    ) -> Result<Mesh> {
        let model = model(data);
        let entity = model.resolver().decode(EntityId(id))?;
        processor.process(&entity, model.resolver(), settings)
    }

    const BOX: &str = "#1=IFCCARTESIANPOINT((0.,0.));\n\
        #2=IFCAXIS2PLACEMENT2D(#1,$);\n\
        #3=IFCRECTANGLEPROFILEDEF(.AREA.,$,#2,2.,1.);\n\
        #4=IFCCARTESIANPOINT((0.,0.,0.));\n\
        #5=IFCAXIS2PLACEMENT3D(#4,$,$);\n\
        #6=IFCDIRECTION((0.,0.,1.));\n\
        #7=IFCEXTRUDEDAREASOLID(#3,#5,#6,3.);";

    #[test]
    fn test_extruded_rectangle() {
        let mesh = run(&ExtrudedAreaSolidProcessor::new(), BOX, 7).unwrap();
        assert_eq!(mesh.triangle_count(), 12);

        let max = |axis: usize| {
            mesh.positions
                .chunks(3)
                .map(|p| p[axis])
                .fold(f64::MIN, f64::max)
        };
        assert_relative_eq!(max(0), 1.0);
        assert_relative_eq!(max(1), 0.5);
        assert_relative_eq!(max(2), 3.0);
    }

    #[test]
    fn test_negative_depth_rejected() {
        let data = BOX.replace("#6,3.)", "#6,-3.)");
        let err = run(&ExtrudedAreaSolidProcessor::new(), &data, 7).unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute { index: 3, .. }));
    }

    #[test]
    fn test_arbitrary_profile_strips_closing_point() {
        let data = "#1=IFCCARTESIANPOINT((0.,0.));\n\
            #2=IFCCARTESIANPOINT((1.,0.));\n\
            #3=IFCCARTESIANPOINT((1.,1.));\n\
            #4=IFCCARTESIANPOINT((0.,1.));\n\
            #5=IFCPOLYLINE((#1,#2,#3,#4,#1));\n\
            #6=IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#5);";
        let model = model(data);
        let entity = model.resolver().decode(EntityId(6)).unwrap();
        let profile = extract_profile(model.resolver(), &entity).unwrap();
        assert_eq!(profile.outer.len(), 4);
    }

    #[test]
    fn test_indexed_poly_curve_with_segments() {
        let data = "#1=IFCCARTESIANPOINTLIST2D(((0.,0.),(2.,0.),(2.,2.),(0.,2.)));\n\
            #2=IFCINDEXEDPOLYCURVE(#1,(IFCLINEINDEX((1,2,3)),IFCLINEINDEX((3,4,1))),$);\n\
            #3=IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#2);";
        let model = model(data);
        let entity = model.resolver().decode(EntityId(3)).unwrap();
        let profile = extract_profile(model.resolver(), &entity).unwrap();
        assert_eq!(profile.outer.len(), 4);
    }

    #[test]
    fn test_triangulated_face_set() {
        let data = "#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(1.,1.,0.),(0.,1.,0.)));\n\
            #2=IFCTRIANGULATEDFACESET(#1,$,.T.,((1,2,3),(1,3,4)),$);";
        let mesh = run(&TriangulatedFaceSetProcessor::new(), data, 2).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_triangulated_face_set_zero_index_is_error() {
        let data = "#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(1.,1.,0.)));\n\
            #2=IFCTRIANGULATEDFACESET(#1,$,.T.,((0,1,2)),$);";
        assert!(run(&TriangulatedFaceSetProcessor::new(), data, 2).is_err());
    }

    #[test]
    fn test_triangulated_face_set_pn_index() {
        let data = "#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(1.,1.,0.)));\n\
            #2=IFCTRIANGULATEDFACESET(#1,$,.T.,((1,2,3)),(3,2,1));";
        let mesh = run(&TriangulatedFaceSetProcessor::new(), data, 2).unwrap();
        assert_eq!(mesh.indices, vec![2, 1, 0]);
    }

    #[test]
    fn test_polygonal_face_set() {
        let data = "#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(1.,1.,0.),(0.,1.,0.)));\n\
            #2=IFCINDEXEDPOLYGONALFACE((1,2,3,4));\n\
            #3=IFCPOLYGONALFACESET(#1,.T.,(#2),$);";
        let mesh = run(&PolygonalFaceSetProcessor::new(), data, 3).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    const TETRA: &str = "#1=IFCCARTESIANPOINT((0.,0.,0.));\n\
        #2=IFCCARTESIANPOINT((1.,0.,0.));\n\
        #3=IFCCARTESIANPOINT((0.,1.,0.));\n\
        #4=IFCCARTESIANPOINT((0.,0.,1.));\n\
        #10=IFCPOLYLOOP((#1,#3,#2));\n\
        #11=IFCPOLYLOOP((#1,#2,#4));\n\
        #12=IFCPOLYLOOP((#2,#3,#4));\n\
        #13=IFCPOLYLOOP((#3,#1,#4));\n\
        #20=IFCFACEOUTERBOUND(#10,.T.);\n\
        #21=IFCFACEOUTERBOUND(#11,.T.);\n\
        #22=IFCFACEOUTERBOUND(#12,.T.);\n\
        #23=IFCFACEOUTERBOUND(#13,.F.);\n\
        #30=IFCFACE((#20));\n\
        #31=IFCFACE((#21));\n\
        #32=IFCFACE((#22));\n\
        #33=IFCFACE((#23));\n\
        #40=IFCCLOSEDSHELL((#30,#31,#32,#33));\n\
        #41=IFCFACETEDBREP(#40);\n\
        #42=IFCSHELLBASEDSURFACEMODEL((#40));";

    #[test]
    fn test_faceted_brep() {
        let mesh = run(&FacetedBrepProcessor::new(), TETRA, 41).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_shell_based_surface_model() {
        let mesh = run(&ShellBasedSurfaceModelProcessor::new(), TETRA, 42).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_degenerate_face_respects_strictness() {
        let data = format!(
            "{}\n#50=IFCPOLYLOOP((#1,#2));\n#51=IFCFACEOUTERBOUND(#50,.T.);\n\
             #52=IFCFACE((#51));\n#53=IFCCLOSEDSHELL((#30,#52));\n#54=IFCFACETEDBREP(#53);",
            TETRA
        );
        assert!(run(&FacetedBrepProcessor::new(), &data, 54).is_err());

        let lenient = TessellationSettings {
            strict_tolerance: false,
            ..TessellationSettings::default()
        };
        let mesh = run_with(&FacetedBrepProcessor::new(), &data, 54, &lenient).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }
}
