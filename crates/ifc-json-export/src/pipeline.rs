// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion pipeline: model -> records -> JSON document

use crate::config::ExportConfig;
use crate::error::Result;
use crate::record::{Record, RecordAssembler};
use crate::relations::RelationIndex;
use crate::sink::JsonSink;
use ifc_json_geometry::GeometryRouter;
use ifc_json_model::{EntityId, EntityResolver, IfcModel, IfcType};
use std::path::PathBuf;

/// Product attribute index of `Representation`
const REPRESENTATION: usize = 6;

/// Records built from one model
#[derive(Debug, Default)]
pub struct Conversion {
    /// Records in file order
    pub records: Vec<Record>,
    /// Number of products enumerated
    pub products: usize,
    /// Products dropped by the geometry skip policy
    pub skipped: Vec<EntityId>,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub products: usize,
    pub records: usize,
    pub skipped: usize,
    pub output: PathBuf,
}

/// Build a record for every product with a representation
///
/// Products are visited in file order. A geometry failure aborts the
/// conversion unless `config.skip_failed_geometry` is set, in which case the
/// product is logged and left out.
pub fn build_records(model: &dyn IfcModel, config: &ExportConfig) -> Result<Conversion> {
    let resolver = model.resolver();
    let products = resolver.entities_where(&IfcType::is_product)?;
    log::info!("Found {} products", products.len());

    for (ifc_type, count) in unrecognized_products(resolver) {
        log::warn!(
            "{} instances of unrecognized class {} carry a product shape and are not exported",
            count,
            ifc_type
        );
    }

    let relations = RelationIndex::build(resolver)?;
    let router = GeometryRouter::with_settings(config.tessellation, model.unit_scale());
    let assembler = RecordAssembler::new(model, &relations, &router);

    let mut conversion = Conversion {
        records: Vec::with_capacity(products.len()),
        products: products.len(),
        skipped: Vec::new(),
    };

    for product in &products {
        match assembler.assemble(product) {
            Ok(Some(record)) => {
                log::debug!("Exported {} {}", product.ifc_type, product.id);
                conversion.records.push(record);
            }
            Ok(None) => {
                log::debug!("Skipping {} {}: no representation", product.ifc_type, product.id);
            }
            Err(e) if config.skip_failed_geometry && e.is_recoverable_geometry() => {
                log::warn!(
                    "Skipping {} {} (GlobalId {}): {}",
                    product.ifc_type,
                    product.id,
                    product.get_string(0).unwrap_or("?"),
                    e
                );
                conversion.skipped.push(product.id);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(conversion)
}

/// Classes outside the known product list whose first instance references
/// an IfcProductDefinitionShape, with their instance counts
pub fn unrecognized_products(resolver: &dyn EntityResolver) -> Vec<(IfcType, usize)> {
    resolver
        .type_census()
        .into_iter()
        .filter(|(ifc_type, _, _)| matches!(ifc_type, IfcType::Unknown(_)))
        .filter(|(_, first, _)| {
            resolver
                .get(*first)
                .and_then(|entity| entity.get(REPRESENTATION).and_then(|v| resolver.resolve_ref(v)))
                .is_some_and(|shape| shape.ifc_type == IfcType::IfcProductDefinitionShape)
        })
        .map(|(ifc_type, _, count)| (ifc_type, count))
        .collect()
}

/// Convert `config.input` and write the document to `config.output_path()`
pub fn run(config: &ExportConfig) -> Result<ExportSummary> {
    log::info!("Opening {}", config.input.display());
    let model = ifc_json_parser::parse_file(&config.input, |stage, percent| {
        log::trace!("{} ({:.0}%)", stage, percent);
    })?;

    let metadata = model.metadata();
    log::info!(
        "Schema {} ({} entities, unit scale {})",
        metadata.schema_version,
        model.resolver().entity_count(),
        model.unit_scale()
    );
    if let Some(system) = &metadata.originating_system {
        log::debug!("Originating system: {}", system);
    }

    let conversion = build_records(model.as_ref(), config)?;

    let sink = JsonSink::new(config.output_path());
    sink.write(&conversion.records)?;
    log::info!(
        "Wrote {} records to {}",
        conversion.records.len(),
        sink.path().display()
    );
    if !conversion.skipped.is_empty() {
        log::warn!("{} products skipped after geometry failures", conversion.skipped.len());
    }

    Ok(ExportSummary {
        products: conversion.products,
        records: conversion.records.len(),
        skipped: conversion.skipped.len(),
        output: sink.path().to_path_buf(),
    })
}
