// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity resolution trait for looking up and resolving IFC entities

use crate::{AttributeValue, DecodedEntity, EntityId, IfcType, ParseError, Result};
use std::sync::Arc;

/// Entity lookup and reference resolution
///
/// Implementations provide O(1) lookup by entity ID and enumerate entities
/// in file order. Decoding is lazy; malformed entity text surfaces as an
/// error from [`EntityResolver::decode`] rather than being hidden.
///
/// # Example
///
/// ```ignore
/// use ifc_json_model::{EntityResolver, EntityId};
///
/// fn describe(resolver: &dyn EntityResolver, id: EntityId) -> ifc_json_model::Result<()> {
///     let entity = resolver.decode(id)?;
///     if let Some(rep) = entity.get(6) {
///         if let Some(shape) = resolver.resolve_ref(rep) {
///             println!("{} -> {}", entity.id, shape.ifc_type);
///         }
///     }
///     Ok(())
/// }
/// ```
pub trait EntityResolver: Send + Sync {
    /// Decode entity by ID
    ///
    /// Returns [`ParseError::EntityNotFound`] for ids not present in the
    /// DATA section and [`ParseError::EntityParse`] for entity text the
    /// tokenizer rejects.
    fn decode(&self, id: EntityId) -> Result<Arc<DecodedEntity>>;

    /// Get entity by ID, treating any failure as absence
    ///
    /// Geometry code uses this where a dangling or malformed reference simply
    /// means "no such item".
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>> {
        self.decode(id).ok()
    }

    /// Resolve an entity reference from an attribute value
    fn resolve_ref(&self, attr: &AttributeValue) -> Option<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::EntityRef(id) => self.get(*id),
            _ => None,
        }
    }

    /// Resolve a list of entity references
    ///
    /// Non-reference items are skipped.
    fn resolve_ref_list(&self, attr: &AttributeValue) -> Vec<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::List(items) => items
                .iter()
                .filter_map(|item| self.resolve_ref(item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Get all entities of a specific type, in file order
    fn entities_by_type(&self, ifc_type: &IfcType) -> Result<Vec<Arc<DecodedEntity>>>;

    /// Get all entities whose type satisfies `filter`, in file order
    ///
    /// Used to enumerate every `IfcProduct` subtype in one pass.
    fn entities_where(&self, filter: &dyn Fn(&IfcType) -> bool) -> Result<Vec<Arc<DecodedEntity>>>;

    /// Count entities of a specific type
    fn count_by_type(&self, ifc_type: &IfcType) -> usize;

    /// Get all entity IDs in the model, in file order
    fn all_ids(&self) -> Vec<EntityId>;

    /// Every type present in the model with its first instance and count,
    /// ordered by first appearance
    fn type_census(&self) -> Vec<(IfcType, EntityId, usize)>;

    /// Get total entity count
    fn entity_count(&self) -> usize {
        self.all_ids().len()
    }
}

/// Extension methods for EntityResolver
pub trait EntityResolverExt: EntityResolver {
    /// Check if an entity exists
    fn exists(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Resolve reference or return error
    fn resolve_ref_or_err(
        &self,
        entity_id: EntityId,
        attr_index: usize,
        attr: &AttributeValue,
    ) -> Result<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::EntityRef(id) => self.decode(*id),
            _ => Err(ParseError::InvalidReference {
                entity: entity_id,
                attribute: attr_index,
            }),
        }
    }
}

// Blanket implementation for all EntityResolver types
impl<T: EntityResolver + ?Sized> EntityResolverExt for T {}
