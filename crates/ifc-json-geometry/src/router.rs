// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Router - Dynamic dispatch to geometry processors
//!
//! Routes IFC representation items to the processor registered for their
//! type and assembles the body geometry of a whole product:
//! `Product -> IfcProductDefinitionShape -> IfcShapeRepresentation -> Items`.

use crate::{
    placement::{object_placement, placement_matrix},
    Error, Mesh, Result,
};
use ifc_json_model::{DecodedEntity, EntityResolver, IfcType};
use nalgebra::Matrix4;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::sync::Arc;

/// Representation identifiers that carry body geometry
const BODY_IDENTIFIERS: [&str; 3] = ["Body", "Facetation", "Tessellation"];

/// Deepest nesting of mapped items and boolean operands
const MAX_ITEM_DEPTH: usize = 32;

/// Tessellation options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellationSettings {
    /// Fail on any item or face that cannot be tessellated
    pub strict_tolerance: bool,
    /// Apply the product's full placement chain
    pub use_world_coords: bool,
}

impl Default for TessellationSettings {
    fn default() -> Self {
        Self {
            strict_tolerance: true,
            use_world_coords: true,
        }
    }
}

impl TessellationSettings {
    /// Whether a failure may be skipped instead of propagated
    ///
    /// Entity decoding failures are data errors and are never skipped.
    pub fn tolerates(&self, error: &Error) -> bool {
        !self.strict_tolerance && !matches!(error, Error::Model(_))
    }
}

/// Geometry processor trait
///
/// Each processor handles one or more types of IFC geometry representations.
/// Processors use the `EntityResolver` trait for entity lookups, making them
/// independent of any specific parser implementation.
pub trait GeometryProcessor: Send + Sync {
    /// Process entity into a mesh in its own coordinate system (file units)
    fn process(
        &self,
        entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
        settings: &TessellationSettings,
    ) -> Result<Mesh>;

    /// Get supported IFC types
    fn supported_types(&self) -> Vec<IfcType>;
}

/// Geometry router - routes entities to processors
///
/// Also caches the geometry of representation maps so every
/// `IfcMappedItem` instance only pays for the transform.
pub struct GeometryRouter {
    processors: FxHashMap<IfcType, Arc<dyn GeometryProcessor>>,
    /// Source geometry by IfcRepresentationMap id, MappingOrigin applied
    mapped_item_cache: RefCell<FxHashMap<u32, Arc<Mesh>>>,
    settings: TessellationSettings,
    /// Unit scale factor (e.g., 0.001 for millimeters -> meters)
    unit_scale: f64,
}

impl GeometryRouter {
    /// Create new router without any processors registered
    pub fn new() -> Self {
        Self {
            processors: FxHashMap::default(),
            mapped_item_cache: RefCell::new(FxHashMap::default()),
            settings: TessellationSettings::default(),
            unit_scale: 1.0,
        }
    }

    /// Create router with default processors registered
    ///
    /// Registers the following processors:
    /// - `ExtrudedAreaSolidProcessor` (IfcExtrudedAreaSolid)
    /// - `TriangulatedFaceSetProcessor` (IfcTriangulatedFaceSet)
    /// - `PolygonalFaceSetProcessor` (IfcPolygonalFaceSet)
    /// - `FacetedBrepProcessor` (IfcFacetedBrep, IfcFacetedBrepWithVoids)
    /// - `ShellBasedSurfaceModelProcessor` (IfcShellBasedSurfaceModel)
    pub fn with_default_processors() -> Self {
        use crate::processors::{
            ExtrudedAreaSolidProcessor, FacetedBrepProcessor, PolygonalFaceSetProcessor,
            ShellBasedSurfaceModelProcessor, TriangulatedFaceSetProcessor,
        };

        let mut router = Self::new();
        router.register(Arc::new(ExtrudedAreaSolidProcessor::new()));
        router.register(Arc::new(TriangulatedFaceSetProcessor::new()));
        router.register(Arc::new(PolygonalFaceSetProcessor::new()));
        router.register(Arc::new(FacetedBrepProcessor::new()));
        router.register(Arc::new(ShellBasedSurfaceModelProcessor::new()));
        router
    }

    /// Create router with default processors, settings and unit scale
    pub fn with_settings(settings: TessellationSettings, unit_scale: f64) -> Self {
        let mut router = Self::with_default_processors();
        router.settings = settings;
        router.unit_scale = unit_scale;
        router
    }

    /// Get the current unit scale factor
    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    /// Set the unit scale factor
    pub fn set_unit_scale(&mut self, scale: f64) {
        self.unit_scale = scale;
    }

    pub fn settings(&self) -> &TessellationSettings {
        &self.settings
    }

    /// Register a geometry processor
    pub fn register(&mut self, processor: Arc<dyn GeometryProcessor>) {
        for ifc_type in processor.supported_types() {
            self.processors.insert(ifc_type, Arc::clone(&processor));
        }
    }

    /// Check if a type has a registered processor
    pub fn has_processor(&self, ifc_type: &IfcType) -> bool {
        self.processors.contains_key(ifc_type)
    }

    /// Tessellate the body geometry of a product
    ///
    /// Returns the merged mesh of every body representation, placed in world
    /// coordinates when configured, and scaled to metres. A product without
    /// a body representation, or whose body yields no triangles, is an error.
    pub fn process_product(
        &self,
        product: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Result<Mesh> {
        // Representation (6) -> IfcProductDefinitionShape
        let shape_id = product.get_ref(6).ok_or(Error::NoBody(product.id))?;
        let shape = resolver.decode(shape_id)?;

        // Representations (2)
        let representations = shape
            .get_refs(2)
            .ok_or_else(|| Error::invalid_attribute(shape.id, 2, "missing Representations"))?;

        let mut mesh = Mesh::new();
        let mut has_body = false;

        for rep_id in representations {
            let representation = resolver.decode(rep_id)?;
            if !is_body(&representation) {
                continue;
            }
            has_body = true;
            mesh.merge(&self.process_shape_representation(&representation, resolver, 0)?);
        }

        if !has_body {
            return Err(Error::NoBody(product.id));
        }
        if mesh.is_empty() {
            return Err(Error::geometry(format!(
                "Body of {} produced no triangles",
                product.id
            )));
        }

        if self.settings.use_world_coords {
            if let Some(placement) = product.get_ref(5) {
                mesh.transform(&object_placement(resolver, placement)?);
            }
        }

        mesh.scale(self.unit_scale);
        Ok(mesh)
    }

    /// Process a shape representation's items (Items at 3)
    fn process_shape_representation(
        &self,
        representation: &DecodedEntity,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<Mesh> {
        let items = representation.get_refs(3).ok_or_else(|| {
            Error::invalid_attribute(representation.id, 3, "missing Items")
        })?;

        let mut combined = Mesh::new();
        for item_id in items {
            let item = resolver.decode(item_id)?;
            match self.process_item(&item, resolver, depth) {
                Ok(mesh) => combined.merge(&mesh),
                Err(e) if self.settings.tolerates(&e) => {
                    log::warn!("Skipping {} {}: {}", item.ifc_type, item.id, e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(combined)
    }

    /// Process a single representation item in its own coordinate system
    pub fn process_representation_item(
        &self,
        item: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Result<Mesh> {
        self.process_item(item, resolver, 0)
    }

    fn process_item(
        &self,
        item: &DecodedEntity,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<Mesh> {
        if depth > MAX_ITEM_DEPTH {
            return Err(Error::geometry(format!(
                "Item nesting too deep at {}",
                item.id
            )));
        }

        match item.ifc_type {
            IfcType::IfcMappedItem => self.process_mapped_item(item, resolver, depth),
            IfcType::IfcBooleanResult | IfcType::IfcBooleanClippingResult => {
                if self.settings.strict_tolerance {
                    return Err(Error::unsupported_type(format!(
                        "{} (boolean operations are not evaluated)",
                        item.ifc_type
                    )));
                }
                // FirstOperand (1) stands in for the result
                let operand = item.get_ref(1).ok_or_else(|| {
                    Error::invalid_attribute(item.id, 1, "missing FirstOperand")
                })?;
                log::debug!("Using first operand {} of {}", operand, item.id);
                let operand = resolver.decode(operand)?;
                self.process_item(&operand, resolver, depth + 1)
            }
            _ => {
                let processor = self
                    .processors
                    .get(&item.ifc_type)
                    .ok_or_else(|| Error::unsupported_type(item.ifc_type.name()))?;
                processor.process(item, resolver, &self.settings)
            }
        }
    }

    /// IfcMappedItem: MappingSource (0), MappingTarget (1)
    ///
    /// The source IfcRepresentationMap holds MappingOrigin (0) and
    /// MappedRepresentation (1); instances get `Target * Origin`.
    fn process_mapped_item(
        &self,
        item: &DecodedEntity,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<Mesh> {
        let source_id = item
            .get_ref(0)
            .ok_or_else(|| Error::invalid_attribute(item.id, 0, "missing MappingSource"))?;

        let cached = self.mapped_item_cache.borrow().get(&source_id.0).cloned();
        let source_mesh = match cached {
            Some(mesh) => mesh,
            None => {
                let source = resolver.decode(source_id)?;
                let origin = match source.get_ref(0) {
                    Some(id) => placement_matrix(resolver, id)?,
                    None => Matrix4::identity(),
                };
                let representation_id = source.get_ref(1).ok_or_else(|| {
                    Error::invalid_attribute(source.id, 1, "missing MappedRepresentation")
                })?;
                let representation = resolver.decode(representation_id)?;

                let mut mesh = self.process_shape_representation(&representation, resolver, depth + 1)?;
                mesh.transform(&origin);

                let mesh = Arc::new(mesh);
                self.mapped_item_cache
                    .borrow_mut()
                    .insert(source_id.0, Arc::clone(&mesh));
                mesh
            }
        };

        let mut mesh = (*source_mesh).clone();
        if let Some(target) = item.get_ref(1) {
            mesh.transform(&placement_matrix(resolver, target)?);
        }
        Ok(mesh)
    }

    /// Clear all caches
    pub fn clear_caches(&self) {
        self.mapped_item_cache.borrow_mut().clear();
    }
}

impl Default for GeometryRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Body, Facetation and Tessellation count as body; so does an unset identifier
fn is_body(representation: &DecodedEntity) -> bool {
    match representation.get_string(1) {
        Some(identifier) => BODY_IDENTIFIERS.iter().any(|body| *body == identifier),
        None => true,
    }
}
