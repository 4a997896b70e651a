// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC JSON Parser - STEP backend for the model access layer
//!
//! This crate reads IFC (STEP) files and implements the traits defined in
//! `ifc-json-model`.
//!
//! # Features
//!
//! - **Fast tokenization** using `nom` combinators
//! - **SIMD-accelerated scanning** using `memchr`
//! - **Lazy entity decoding** - only parse entities when needed
//! - **Arc-based caching** - efficient memory sharing
//! - **Progress reporting** for large files
//!
//! # Example
//!
//! ```ignore
//! use ifc_json_model::IfcType;
//!
//! let model = ifc_json_parser::parse_file("model.ifc")?;
//! let walls = model.resolver().entities_by_type(&IfcType::IfcWall)?;
//! println!("Found {} walls", walls.len());
//! ```

mod model;
mod resolver;
mod scanner;
mod tokenizer;
mod units;

pub use model::ParsedModel;
pub use resolver::ResolverImpl;
pub use scanner::{EntityIndex, EntityScanner};
pub use tokenizer::{decode_step_string, parse_entity, Token};
pub use units::scales;

use ifc_json_model::{IfcModel, IfcParser, ParseError, ProgressCallback, Result};
use std::path::Path;
use std::sync::Arc;

/// Main STEP/IFC parser implementing `IfcParser` trait
#[derive(Default)]
pub struct StepParser;

impl StepParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }
}

impl IfcParser for StepParser {
    fn parse(&self, content: &str) -> Result<Arc<dyn IfcModel>> {
        ParsedModel::parse(content).map(|m| Arc::new(m) as Arc<dyn IfcModel>)
    }

    fn parse_with_progress(
        &self,
        content: &str,
        on_progress: ProgressCallback,
    ) -> Result<Arc<dyn IfcModel>> {
        ParsedModel::parse_with_progress(content, on_progress)
            .map(|m| Arc::new(m) as Arc<dyn IfcModel>)
    }
}

/// Quick parse function for simple use cases
pub fn parse(content: &str) -> Result<Arc<dyn IfcModel>> {
    StepParser::new().parse(content)
}

/// Parse with progress reporting
pub fn parse_with_progress(
    content: &str,
    on_progress: impl Fn(&str, f32) + Send + 'static,
) -> Result<Arc<dyn IfcModel>> {
    StepParser::new().parse_with_progress(content, Box::new(on_progress))
}

/// Read a model file fully into memory and parse it
///
/// Bytes that are not valid UTF-8 are replaced; STEP files are 7-bit
/// ASCII with escapes for everything else.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| ParseError::read(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Open and parse a model file
pub fn parse_file(
    path: impl AsRef<Path>,
    on_progress: impl Fn(&str, f32) + Send + 'static,
) -> Result<Arc<dyn IfcModel>> {
    let content = read_file(path)?;
    parse_with_progress(&content, on_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_file_roundtrip_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n\
             #1=IFCWALL('g',$,'W',$,$,$,$,$,.SOLIDWALL.);\nENDSEC;\nEND-ISO-10303-21;\n"
        )
        .unwrap();

        let model = parse_file(file.path(), |_, _| {}).unwrap();
        assert_eq!(model.metadata().schema_version, "IFC4");
        assert_eq!(model.resolver().entity_count(), 1);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let Err(err) = parse_file("/definitely/not/here.ifc", |_, _| {}) else {
            panic!("expected a read error");
        };
        assert!(matches!(err, ParseError::Read { .. }));
    }
}
