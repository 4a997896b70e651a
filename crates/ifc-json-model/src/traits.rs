// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits for IFC parsing
//!
//! These traits define the main abstractions for working with IFC data.

use crate::schema::{self, NamedAttribute, SchemaVersion};
use crate::{DecodedEntity, EntityResolver, ModelMetadata, Result};
use std::sync::Arc;

/// Progress callback type for parsing operations
pub type ProgressCallback = Box<dyn Fn(&str, f32) + Send>;

/// Main parsing interface - entry point for parsing IFC content
///
/// # Example
///
/// ```ignore
/// use ifc_json_model::{IfcParser, IfcModel};
///
/// let model = parser.parse(ifc_content)?;
/// println!("Schema: {}", model.metadata().schema_version);
/// ```
pub trait IfcParser: Send + Sync {
    /// Parse IFC content and return a model
    fn parse(&self, content: &str) -> Result<Arc<dyn IfcModel>>;

    /// Parse IFC content with progress reporting
    ///
    /// `on_progress` receives (phase_name, percent_complete).
    fn parse_with_progress(
        &self,
        content: &str,
        on_progress: ProgressCallback,
    ) -> Result<Arc<dyn IfcModel>>;
}

/// Core model interface - read-only access to a parsed IFC model
///
/// The model is thread-safe (`Send + Sync`) even though the exporter drives
/// it from a single thread.
pub trait IfcModel: Send + Sync {
    /// Get entity resolver for entity lookups and reference resolution
    fn resolver(&self) -> &dyn EntityResolver;

    /// Get unit scale factor (file units to meters)
    ///
    /// Common values:
    /// - 1.0 for meters
    /// - 0.001 for millimeters
    /// - 0.0254 for inches
    /// - 0.3048 for feet
    fn unit_scale(&self) -> f64;

    /// Get file metadata (schema version, originating system, etc.)
    fn metadata(&self) -> &ModelMetadata;

    /// Schema family the file declares
    fn schema(&self) -> SchemaVersion {
        SchemaVersion::from_header(&self.metadata().schema_version)
    }

    /// All declared attributes of `entity`, named and in declaration order
    fn declared_attributes<'a>(&self, entity: &'a DecodedEntity) -> Vec<NamedAttribute<'a>> {
        schema::name_attributes(&entity.ifc_type, self.schema(), &entity.attributes)
    }
}
