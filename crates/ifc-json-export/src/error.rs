// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the export pipeline

use ifc_json_model::{EntityId, ParseError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Export result type
pub type Result<T> = std::result::Result<T, ExportError>;

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Model could not be read or an entity could not be decoded
    #[error(transparent)]
    Model(#[from] ParseError),

    /// Geometry kernel failed for a product
    #[error("Geometry of {product} failed: {source}")]
    Geometry {
        product: EntityId,
        #[source]
        source: ifc_json_geometry::Error,
    },

    /// Malformed or missing data in the model
    #[error("Invalid data: {0}")]
    Data(String),

    /// Triangle index outside the coordinate buffer
    #[error("Triangle index {index} out of range for {len} points")]
    IndexOutOfRange { index: u32, len: usize },

    /// Output could not be written
    #[error("Failed to write {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Records could not be serialized
    #[error("Failed to serialize records: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Create a data error
    pub fn data(msg: impl Into<String>) -> Self {
        ExportError::Data(msg.into())
    }

    /// Create an I/O error for `path`
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap a kernel error with the product it occurred on
    pub fn geometry(product: EntityId, source: ifc_json_geometry::Error) -> Self {
        ExportError::Geometry { product, source }
    }

    /// Whether this is a tessellation failure the skip policy may recover from
    ///
    /// Decoding failures inside the kernel are data errors and stay fatal.
    pub fn is_recoverable_geometry(&self) -> bool {
        matches!(
            self,
            ExportError::Geometry { source, .. }
                if !matches!(source, ifc_json_geometry::Error::Model(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_recoverability() {
        let kernel = ExportError::geometry(EntityId(5), ifc_json_geometry::Error::NoBody(EntityId(5)));
        assert!(kernel.is_recoverable_geometry());
        assert!(kernel.to_string().contains("#5"));

        let decode = ExportError::geometry(
            EntityId(5),
            ifc_json_geometry::Error::Model(ParseError::EntityNotFound(EntityId(9))),
        );
        assert!(!decode.is_recoverable_geometry());
        assert!(!ExportError::data("bad").is_recoverable_geometry());
    }
}
