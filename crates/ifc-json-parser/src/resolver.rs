// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EntityResolver trait implementation

use crate::scanner::EntityIndex;
use crate::tokenizer::parse_entity_at;
use ifc_json_model::{DecodedEntity, EntityId, EntityResolver, IfcType, ParseError, Result};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe entity resolver implementation
///
/// Entities are decoded on first access and cached.
pub struct ResolverImpl {
    /// Raw IFC content (owned for thread safety)
    content: String,
    /// Offsets, file order and type lists from the scanner
    index: EntityIndex,
    /// Decoded entity cache (thread-safe)
    cache: RwLock<FxHashMap<u32, Arc<DecodedEntity>>>,
}

impl ResolverImpl {
    /// Create a resolver over `content` using a pre-built index
    pub fn new(content: String, index: EntityIndex) -> Self {
        Self {
            content,
            index,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Get raw content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Decode and cache an entity
    fn decode_and_cache(&self, id: EntityId) -> Result<Arc<DecodedEntity>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(cached) = cache.get(&id.0) {
                return Ok(Arc::clone(cached));
            }
        }

        let (start, end) = self
            .index
            .offsets
            .get(&id.0)
            .ok_or(ParseError::EntityNotFound(id))?;

        let entity = parse_entity_at(&self.content, *start, *end)
            .map_err(|message| ParseError::entity_parse(id, message))?;
        let arc = Arc::new(entity);

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(id.0, Arc::clone(&arc));
        }

        Ok(arc)
    }

    fn decode_all(&self, ids: &[EntityId]) -> Result<Vec<Arc<DecodedEntity>>> {
        ids.iter().map(|id| self.decode_and_cache(*id)).collect()
    }
}

impl EntityResolver for ResolverImpl {
    fn decode(&self, id: EntityId) -> Result<Arc<DecodedEntity>> {
        self.decode_and_cache(id)
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Result<Vec<Arc<DecodedEntity>>> {
        match self.index.by_type.get(ifc_type) {
            Some(ids) => self.decode_all(ids),
            None => Ok(Vec::new()),
        }
    }

    fn entities_where(&self, filter: &dyn Fn(&IfcType) -> bool) -> Result<Vec<Arc<DecodedEntity>>> {
        let mut ids: Vec<EntityId> = self
            .index
            .by_type
            .iter()
            .filter(|(ifc_type, _)| filter(ifc_type))
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();

        // Restore file order across the merged type lists
        ids.sort_by_key(|id| self.index.offsets.get(&id.0).map(|(start, _)| *start));

        self.decode_all(&ids)
    }

    fn count_by_type(&self, ifc_type: &IfcType) -> usize {
        self.index.by_type.get(ifc_type).map(|v| v.len()).unwrap_or(0)
    }

    fn all_ids(&self) -> Vec<EntityId> {
        self.index.order.clone()
    }

    fn type_census(&self) -> Vec<(IfcType, EntityId, usize)> {
        let mut census: Vec<(IfcType, EntityId, usize)> = self
            .index
            .by_type
            .iter()
            .filter_map(|(ifc_type, ids)| ids.first().map(|first| (ifc_type.clone(), *first, ids.len())))
            .collect();
        census.sort_by_key(|(_, first, _)| self.index.offsets.get(&first.0).map(|(start, _)| *start));
        census
    }

    fn entity_count(&self) -> usize {
        self.index.len()
    }
}
