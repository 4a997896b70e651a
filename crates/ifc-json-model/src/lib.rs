// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC JSON Model - Trait definitions and shared types for IFC model access
//!
//! This crate provides the abstractions the exporter works against. A parser
//! backend implements [`IfcParser`] and hands back an [`IfcModel`]; consumers
//! only ever see the two query contracts that model exposes:
//!
//! - "all objects of type T" via [`EntityResolver::entities_by_type`] and
//!   [`EntityResolver::entities_where`]
//! - "all declared attributes of object O" via [`IfcModel::declared_attributes`]
//!
//! # Architecture
//!
//! - [`IfcParser`] - Entry point for parsing IFC content
//! - [`IfcModel`] - Read-only access to a parsed IFC model
//! - [`EntityResolver`] - Entity lookup and reference resolution
//! - [`schema`] - Positional attribute names per IFC class and schema version
//! - [`properties`] - Quantity kinds and their value fields
//!
//! # Example
//!
//! ```ignore
//! use ifc_json_model::{IfcModel, IfcType};
//!
//! let model = parser.parse(ifc_content)?;
//! for product in model.resolver().entities_where(&IfcType::is_product)? {
//!     for attr in model.declared_attributes(&product) {
//!         println!("{} = {:?}", attr.name, attr.value);
//!     }
//! }
//! ```

pub mod error;
pub mod properties;
pub mod resolver;
pub mod schema;
pub mod traits;
pub mod types;

pub use error::*;
pub use properties::*;
pub use resolver::*;
pub use schema::{NamedAttribute, SchemaVersion};
pub use traits::*;
pub use types::*;
