// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relationship resolution: document references and quantity take-off
//!
//! Relations are indexed once by related object so each product only visits
//! the relations that name it.

use crate::error::{ExportError, Result};
use ifc_json_model::{
    DecodedEntity, EntityId, EntityResolver, IfcType, Quantity, QuantityType, QuantityValue,
};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

// IfcRelAssociates / IfcRelDefines layout
const RELATED_OBJECTS: usize = 4;
const RELATING: usize = 5;

// IfcElementQuantity
const QUANTITIES: usize = 5;

/// Quantity name -> value, in first-insertion order
pub type QuantityMap = Map<String, Value>;

/// Relation lookup by related object
#[derive(Debug, Default)]
pub struct RelationIndex {
    /// IfcRelAssociatesDocument ids per related object
    documents: FxHashMap<EntityId, Vec<EntityId>>,
    /// IfcRelDefinesByProperties ids per related object
    definitions: FxHashMap<EntityId, Vec<EntityId>>,
}

impl RelationIndex {
    /// Index every document association and property definition
    ///
    /// Per-object lists keep file order.
    pub fn build(resolver: &dyn EntityResolver) -> Result<Self> {
        let mut index = Self::default();

        for rel in resolver.entities_by_type(&IfcType::IfcRelAssociatesDocument)? {
            register(&mut index.documents, &rel);
        }

        for rel in resolver.entities_by_type(&IfcType::IfcRelDefinesByProperties)? {
            register(&mut index.definitions, &rel);
        }

        log::debug!(
            "Indexed {} objects with documents, {} with definitions",
            index.documents.len(),
            index.definitions.len()
        );
        Ok(index)
    }

    /// Document reference strings associated with `product`
    ///
    /// For every associated IfcDocumentReference the reference string is
    /// Identification / ItemReference (1), falling back to Location (0).
    /// Empty strings are skipped.
    pub fn document_references(
        &self,
        resolver: &dyn EntityResolver,
        product: EntityId,
    ) -> Result<Vec<String>> {
        let mut references = Vec::new();

        for rel_id in self.documents.get(&product).into_iter().flatten() {
            let rel = resolver.decode(*rel_id)?;
            let documents = rel.get(RELATING).map(|v| v.entity_refs()).unwrap_or_default();

            for doc_id in documents {
                let document = resolver.decode(doc_id)?;
                if document.ifc_type != IfcType::IfcDocumentReference {
                    continue;
                }

                let non_empty = |index: usize| document.get_string(index).filter(|s| !s.is_empty());
                if let Some(reference) = non_empty(1).or_else(|| non_empty(0)) {
                    references.push(reference.to_string());
                }
            }
        }

        Ok(references)
    }

    /// Quantities attached to `product` through IfcElementQuantity sets
    ///
    /// A later quantity with the same name overwrites the earlier value but
    /// keeps its position. Unsupported quantity kinds are ignored.
    pub fn quantity_data(
        &self,
        resolver: &dyn EntityResolver,
        product: EntityId,
    ) -> Result<QuantityMap> {
        let mut data = QuantityMap::new();

        for rel_id in self.definitions.get(&product).into_iter().flatten() {
            let rel = resolver.decode(*rel_id)?;
            let definitions = rel.get(RELATING).map(|v| v.entity_refs()).unwrap_or_default();
            for definition_id in definitions {
                let definition = resolver.decode(definition_id)?;
                if definition.ifc_type != IfcType::IfcElementQuantity {
                    continue;
                }

                for quantity_id in definition.get_refs(QUANTITIES).unwrap_or_default() {
                    let quantity = resolver.decode(quantity_id)?;
                    if let Some(quantity) = read_quantity(&quantity)? {
                        let (name, value) = quantity.into_entry();
                        data.insert(name, Value::from(value));
                    }
                }
            }
        }

        Ok(data)
    }
}

fn register(index: &mut FxHashMap<EntityId, Vec<EntityId>>, rel: &DecodedEntity) {
    let related = rel
        .get(RELATED_OBJECTS)
        .map(|v| v.entity_refs())
        .unwrap_or_default();

    for object in related {
        let rels = index.entry(object).or_default();
        if rels.last() != Some(&rel.id) {
            rels.push(rel.id);
        }
    }
}

/// Read a physical simple quantity; `None` for kinds that are not exported
fn read_quantity(entity: &DecodedEntity) -> Result<Option<Quantity>> {
    let kind = match QuantityType::from_ifc_type(&entity.ifc_type) {
        Some(kind) => kind,
        None => {
            log::debug!("Ignoring {} {}", entity.ifc_type, entity.id);
            return Ok(None);
        }
    };

    let name = entity
        .get_string(0)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExportError::data(format!("{} {} has no Name", entity.ifc_type, entity.id)))?;

    let value = entity
        .get_float(kind.value_index())
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            ExportError::data(format!(
                "{} {} ({}) has no numeric {}",
                entity.ifc_type,
                entity.id,
                name,
                kind.value_attribute()
            ))
        })?;

    Ok(Some(Quantity::new(name, QuantityValue::new(kind, value))))
}
