// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast entity scanner using SIMD-accelerated byte searching
//!
//! Scans IFC files to discover entities without full parsing.

use crate::tokenizer::parse_parameters;
use ifc_json_model::{AttributeValue, EntityId, IfcType};
use memchr::{memchr, memmem};
use rustc_hash::FxHashMap;

/// Entity locations discovered by one pass over the DATA section
#[derive(Debug, Default)]
pub struct EntityIndex {
    /// Entity ID -> (start, end) byte offsets
    pub offsets: FxHashMap<u32, (usize, usize)>,
    /// Entity IDs in file order
    pub order: Vec<EntityId>,
    /// Type -> entity IDs, each list in file order
    pub by_type: FxHashMap<IfcType, Vec<EntityId>>,
}

impl EntityIndex {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Fast entity scanner for IFC files
///
/// Uses memchr for SIMD-accelerated scanning to quickly find entity
/// boundaries without full parsing.
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a new scanner positioned after the `DATA;` marker
    pub fn new(content: &'a str) -> Self {
        let pos = data_section_start(content).unwrap_or(0);
        Self { content, pos }
    }

    /// Scan to find the next entity
    ///
    /// Returns (id, type_name, start_byte, end_byte)
    pub fn next_entity(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();

        while self.pos < bytes.len() {
            let hash_pos = memchr(b'#', &bytes[self.pos..])?;
            self.pos += hash_pos;

            // Definitions open a statement; references sit inside attribute lists
            if !self.at_statement_start() {
                self.pos += 1;
                continue;
            }

            let start = self.pos;

            self.pos += 1;
            let id_start = self.pos;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            if self.pos == id_start {
                continue;
            }

            let id: u32 = match self.content[id_start..self.pos].parse() {
                Ok(id) => id,
                Err(_) => continue,
            };

            self.skip_blanks();
            if self.pos >= bytes.len() || bytes[self.pos] != b'=' {
                continue;
            }
            self.pos += 1;
            self.skip_blanks();

            let type_start = self.pos;
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if self.pos == type_start {
                continue;
            }

            let type_name = &self.content[type_start..self.pos];
            let end = self.find_entity_end()?;

            return Some((id, type_name, start, end));
        }

        None
    }

    fn at_statement_start(&self) -> bool {
        let bytes = self.content.as_bytes();
        let mut i = self.pos;
        while i > 0 {
            match bytes[i - 1] {
                b' ' | b'\t' => i -= 1,
                b'\n' | b'\r' | b';' => return true,
                _ => return false,
            }
        }
        true
    }

    fn skip_blanks(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len() && (bytes[self.pos] == b' ' || bytes[self.pos] == b'\t') {
            self.pos += 1;
        }
    }

    /// Find the end of an entity (semicolon), handling quoted strings
    fn find_entity_end(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut in_string = false;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\'' => {
                    if in_string && self.pos + 1 < bytes.len() && bytes[self.pos + 1] == b'\'' {
                        self.pos += 2;
                        continue;
                    }
                    in_string = !in_string;
                }
                b';' if !in_string => {
                    self.pos += 1;
                    return Some(self.pos);
                }
                _ => {}
            }
            self.pos += 1;
        }

        None
    }

    /// Build the offset, order and type indexes in a single pass
    ///
    /// A repeated instance name keeps its first position in the order list
    /// and its last definition's offsets.
    pub fn build_index(content: &'a str) -> EntityIndex {
        let mut scanner = Self::new(content);
        let mut index = EntityIndex::default();

        while let Some((id, type_name, start, end)) = scanner.next_entity() {
            if index.offsets.insert(id, (start, end)).is_none() {
                index.order.push(EntityId(id));
                index
                    .by_type
                    .entry(IfcType::parse(type_name))
                    .or_default()
                    .push(EntityId(id));
            }
        }

        index
    }
}

/// Byte position just after `DATA;`, if the file has a DATA section
pub fn data_section_start(content: &str) -> Option<usize> {
    memmem::find(content.as_bytes(), b"DATA;").map(|p| p + 5)
}

/// Check the ISO 10303-21 envelope: magic line and a DATA section
pub fn is_step_file(content: &str) -> bool {
    content.trim_start().starts_with("ISO-10303-21") && data_section_start(content).is_some()
}

/// Header information extracted from IFC file
#[derive(Clone, Debug, Default)]
pub struct HeaderInfo {
    pub schema_version: String,
    pub file_name: Option<String>,
    pub timestamp: Option<String>,
    pub author: Option<String>,
    pub organization: Option<String>,
    pub preprocessor_version: Option<String>,
    pub originating_system: Option<String>,
}

/// Parse the header section to extract metadata
///
/// `FILE_NAME(name, time_stamp, (author), (organization),
/// preprocessor_version, originating_system, authorization)` and
/// `FILE_SCHEMA((schema))`. Missing or malformed records leave the
/// corresponding fields unset.
pub fn parse_header(content: &str) -> HeaderInfo {
    let mut info = HeaderInfo::default();

    let header_start = content.find("HEADER;").unwrap_or(0);
    let header_end = content[header_start..]
        .find("ENDSEC;")
        .map(|p| header_start + p)
        .unwrap_or(content.len());
    let header = &content[header_start..header_end];

    if let Some(params) = header_record(header, "FILE_SCHEMA") {
        if let Some(schema) = params
            .first()
            .and_then(|v| v.as_list())
            .and_then(|l| l.first())
            .and_then(|v| v.as_string())
        {
            info.schema_version = schema.to_string();
        }
    }

    if let Some(params) = header_record(header, "FILE_NAME") {
        let text = |i: usize| {
            params
                .get(i)
                .and_then(|v| v.as_string())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let first_of = |i: usize| {
            params
                .get(i)
                .and_then(|v| v.as_list())
                .and_then(|l| l.iter().find_map(|v| v.as_string().filter(|s| !s.is_empty())))
                .map(str::to_string)
        };

        info.file_name = text(0);
        info.timestamp = text(1);
        info.author = first_of(2);
        info.organization = first_of(3);
        info.preprocessor_version = text(4);
        info.originating_system = text(5);
    }

    info
}

fn header_record(header: &str, keyword: &str) -> Option<Vec<AttributeValue>> {
    let at = header.find(keyword)?;
    parse_parameters(&header[at + keyword.len()..]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('test.ifc','2024-01-01T00:00:00',('Author'),('Org'),'Preprocessor','App','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCPROJECT('guid',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
  #3 = IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#4=IFCWALL('gu;id',$,'Wall 1',$,$,#5,#6,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_scanner_finds_entities() {
        let mut scanner = EntityScanner::new(TEST_IFC);
        let mut entities = Vec::new();

        while let Some((id, type_name, _, _)) = scanner.next_entity() {
            entities.push((id, type_name.to_string()));
        }

        assert_eq!(entities.len(), 4);
        assert_eq!(entities[0], (1, "IFCPROJECT".to_string()));
        assert_eq!(entities[2], (3, "IFCSIUNIT".to_string()));
        assert_eq!(entities[3], (4, "IFCWALL".to_string()));
    }

    #[test]
    fn test_build_index_keeps_file_order() {
        let index = EntityScanner::build_index(TEST_IFC);
        assert_eq!(index.len(), 4);
        assert_eq!(
            index.order,
            vec![EntityId(1), EntityId(2), EntityId(3), EntityId(4)]
        );
        assert_eq!(index.by_type.get(&IfcType::IfcWall), Some(&vec![EntityId(4)]));
    }

    #[test]
    fn test_semicolon_inside_string() {
        let index = EntityScanner::build_index(TEST_IFC);
        let (start, end) = index.offsets[&4];
        assert!(TEST_IFC[start..end].ends_with("$);"));
    }

    #[test]
    fn test_parse_header() {
        let info = parse_header(TEST_IFC);
        assert_eq!(info.schema_version, "IFC2X3");
        assert_eq!(info.file_name, Some("test.ifc".to_string()));
        assert_eq!(info.author, Some("Author".to_string()));
        assert_eq!(info.organization, Some("Org".to_string()));
        assert_eq!(info.originating_system, Some("App".to_string()));
    }

    #[test]
    fn test_is_step_file() {
        assert!(is_step_file(TEST_IFC));
        assert!(!is_step_file("{\"not\": \"ifc\"}"));
        assert!(!is_step_file("ISO-10303-21;\nHEADER;\nENDSEC;\n"));
    }
}
