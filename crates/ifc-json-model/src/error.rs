// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model access operations

use crate::EntityId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for model access operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while opening or querying an IFC model
#[derive(Error, Debug)]
pub enum ParseError {
    /// Content is not an ISO 10303-21 exchange file
    #[error("Invalid IFC format: {0}")]
    InvalidFormat(String),

    /// Failed to parse entity
    #[error("Failed to parse entity {0}: {1}")]
    EntityParse(EntityId, String),

    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Invalid entity reference
    #[error("Invalid entity reference at {entity}: attribute {attribute}")]
    InvalidReference { entity: EntityId, attribute: usize },

    /// Model file could not be read
    #[error("Failed to read model file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        ParseError::InvalidFormat(msg.into())
    }

    /// Create a new entity parse error
    pub fn entity_parse(id: EntityId, msg: impl Into<String>) -> Self {
        ParseError::EntityParse(id, msg.into())
    }

    /// Create a read error for the given path
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParseError::Read {
            path: path.into(),
            source,
        }
    }
}
