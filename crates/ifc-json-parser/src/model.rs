// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ParsedModel - Main IFC model implementation

use crate::resolver::ResolverImpl;
use crate::scanner::{is_step_file, parse_header, EntityScanner, HeaderInfo};
use crate::units::extract_unit_scale;

use ifc_json_model::{
    EntityResolver, IfcModel, ModelMetadata, ParseError, ProgressCallback, Result,
};
use std::sync::Arc;

/// Parsed IFC model implementing the `IfcModel` trait
pub struct ParsedModel {
    /// Entity resolver for lookups
    resolver: Arc<ResolverImpl>,
    /// Unit scale (file units to meters)
    unit_scale: f64,
    /// File metadata
    metadata: ModelMetadata,
}

impl ParsedModel {
    /// Parse IFC content and create a model
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_with_progress(content, Box::new(|_, _| {}))
    }

    /// Parse with progress reporting
    ///
    /// Rejects content that is not an ISO 10303-21 file with a DATA section
    /// before any indexing work.
    pub fn parse_with_progress(content: &str, on_progress: ProgressCallback) -> Result<Self> {
        if !is_step_file(content) {
            return Err(ParseError::format(
                "expected an ISO-10303-21 file with a DATA section",
            ));
        }

        on_progress("Scanning entities", 0.0);
        let index = EntityScanner::build_index(content);
        on_progress("Indexing entities", 40.0);

        let resolver = Arc::new(ResolverImpl::new(content.to_string(), index));

        let unit_scale = extract_unit_scale(resolver.as_ref())?;
        on_progress("Extracting units", 70.0);

        let metadata = metadata_from(parse_header(content));
        on_progress("Complete", 100.0);

        Ok(Self {
            resolver,
            unit_scale,
            metadata,
        })
    }

    /// Get the resolver as a shared handle
    pub fn resolver_arc(&self) -> Arc<ResolverImpl> {
        self.resolver.clone()
    }
}

fn metadata_from(header: HeaderInfo) -> ModelMetadata {
    ModelMetadata {
        schema_version: header.schema_version,
        originating_system: header.originating_system,
        preprocessor_version: header.preprocessor_version,
        file_name: header.file_name,
        author: header.author,
        organization: header.organization,
        timestamp: header.timestamp,
    }
}

impl IfcModel for ParsedModel {
    fn resolver(&self) -> &dyn EntityResolver {
        self.resolver.as_ref()
    }

    fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
