// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC JSON Export - flat JSON records from IFC building models
//!
//! For every product with a representation the exporter emits one record:
//! its declared attributes, linked document references, quantity take-off
//! values and a triangle list in world coordinates.
//!
//! # Example
//!
//! ```ignore
//! use ifc_json_export::{run, ExportConfig};
//!
//! let mut config = ExportConfig::new("model.ifc");
//! config.output_dir = "out".into();
//! let summary = run(&config)?;
//! println!("{} records -> {}", summary.records, summary.output.display());
//! ```
//!
//! The output document is `{"data": [record, ...]}`, pretty-printed with a
//! 4-space indent:
//!
//! ```json
//! {
//!     "data": [
//!         {
//!             "id": 1,
//!             "type": "IfcWall",
//!             "globalId": "2O2Fr$t4X7Zf8NOew3FLOH",
//!             "name": "Wall",
//!             "documentReferences": ["SPEC-001"],
//!             "quantityData": { "NetVolume": 1.0 },
//!             "points": [[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]]
//!         }
//!     ]
//! }
//! ```

pub mod config;
pub mod error;
pub mod flatten;
pub mod pipeline;
pub mod record;
pub mod relations;
pub mod sink;

pub use config::{Cli, ExportConfig, DEFAULT_OUTPUT_NAME};
pub use error::{ExportError, Result};
pub use flatten::{flatten, Point, Triangle};
pub use pipeline::{build_records, run, unrecognized_products, Conversion, ExportSummary};
pub use record::{attribute_json, lower_camel, Record, RecordAssembler};
pub use relations::{QuantityMap, RelationIndex};
pub use sink::JsonSink;

pub use ifc_json_geometry::TessellationSettings;
