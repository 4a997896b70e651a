// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON document output
//!
//! The document is written to a temporary file next to the target and
//! renamed into place, so a failed run never leaves a partial file.

use crate::error::{ExportError, Result};
use crate::record::Record;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Top-level document shape: `{ "data": [ ... ] }`
#[derive(Serialize)]
struct Document<'a> {
    data: &'a [Record],
}

/// Writes records as a pretty-printed (4-space) JSON document
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `records` to the target path
    ///
    /// Creates the parent directory when missing.
    pub fn write(&self, records: &[Record]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| ExportError::io(&dir, e))?;

        let mut file = tempfile::NamedTempFile::new_in(&dir).map_err(|e| ExportError::io(&dir, e))?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            let mut serializer = serde_json::Serializer::with_formatter(
                &mut writer,
                PrettyFormatter::with_indent(b"    "),
            );
            Document { data: records }.serialize(&mut serializer)?;
            writer.flush().map_err(|e| ExportError::io(&self.path, e))?;
        }

        file.persist(&self.path)
            .map_err(|e| ExportError::io(&self.path, e.error))?;

        log::debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_layout() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSink::new(dir.path().join("nested/out.json"));
        sink.write(&[]).unwrap();

        let text = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(text, "{\n    \"data\": []\n}");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "stale").unwrap();

        JsonSink::new(&path).write(&[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["data"].as_array().unwrap().is_empty());

        // Only the output file remains in the directory
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unwritable_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = JsonSink::new(blocker.join("out.json")).write(&[]).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
