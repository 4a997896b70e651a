// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-JSON Geometry Processing
//!
//! Tessellates the body geometry of IFC products into flat triangle buffers.
//! This crate uses the `EntityResolver` trait from `ifc-json-model` for
//! entity lookup, making it independent of any specific parser implementation.
//!
//! ## Overview
//!
//! - **Profiles**: parameterized (rectangle, circle, hollow circle, I/L/T)
//!   and arbitrary closed profiles, with or without voids
//! - **Extrusion**: swept solids from extruded profiles
//! - **Tessellated items**: triangulated and polygonal face sets, faceted
//!   breps and shell based surface models
//! - **Placement**: local placement chains, axis placements and
//!   transformation operators for mapped items
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_json_geometry::{GeometryRouter, TessellationSettings};
//!
//! let router = GeometryRouter::with_settings(TessellationSettings::default(), model.unit_scale());
//! let mesh = router.process_product(&product, model.resolver())?;
//! let (coords, indices) = mesh.into_buffers();
//! ```

pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod placement;
pub mod processors;
pub mod profile;
pub mod router;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

// Re-export main types
pub use error::{Error, Result};
pub use extrusion::extrude_profile;
pub use mesh::Mesh;
pub use profile::{calculate_circle_segments, Profile2D, Triangulation};
pub use router::{GeometryProcessor, GeometryRouter, TessellationSettings};
pub use triangulation::{
    calculate_polygon_normal, triangulate_face, triangulate_polygon,
    triangulate_polygon_with_holes,
};

// Re-export processors
pub use processors::{
    ExtrudedAreaSolidProcessor, FacetedBrepProcessor, PolygonalFaceSetProcessor,
    ShellBasedSurfaceModelProcessor, TriangulatedFaceSetProcessor,
};
