// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quantity kinds and their value fields

use crate::IfcType;
use serde::{Deserialize, Serialize};

/// Quantity types carried by an `IfcElementQuantity`
///
/// `IfcQuantityTime` and complex quantities have no kind and are skipped
/// wherever quantities are collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityType {
    /// Linear measurement (IfcQuantityLength)
    Length,
    /// Area measurement (IfcQuantityArea)
    Area,
    /// Volume measurement (IfcQuantityVolume)
    Volume,
    /// Count (IfcQuantityCount)
    Count,
    /// Weight/mass measurement (IfcQuantityWeight)
    Weight,
}

impl QuantityType {
    /// Map an IFC class to its quantity kind
    pub fn from_ifc_type(ifc_type: &IfcType) -> Option<Self> {
        match ifc_type {
            IfcType::IfcQuantityLength => Some(QuantityType::Length),
            IfcType::IfcQuantityArea => Some(QuantityType::Area),
            IfcType::IfcQuantityVolume => Some(QuantityType::Volume),
            IfcType::IfcQuantityCount => Some(QuantityType::Count),
            IfcType::IfcQuantityWeight => Some(QuantityType::Weight),
            _ => None,
        }
    }

    /// Name of the attribute holding the value
    pub fn value_attribute(&self) -> &'static str {
        match self {
            QuantityType::Length => "LengthValue",
            QuantityType::Area => "AreaValue",
            QuantityType::Volume => "VolumeValue",
            QuantityType::Count => "CountValue",
            QuantityType::Weight => "WeightValue",
        }
    }

    /// Position of the value attribute
    ///
    /// All five physical simple quantities share the layout
    /// `(Name, Description, Unit, <Value>, ...)`.
    pub fn value_index(&self) -> usize {
        3
    }
}

/// A quantity value tagged with its kind
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum QuantityValue {
    Length(f64),
    Area(f64),
    Volume(f64),
    Count(f64),
    Weight(f64),
}

impl QuantityValue {
    /// Tag `value` with `kind`
    pub fn new(kind: QuantityType, value: f64) -> Self {
        match kind {
            QuantityType::Length => QuantityValue::Length(value),
            QuantityType::Area => QuantityValue::Area(value),
            QuantityType::Volume => QuantityValue::Volume(value),
            QuantityType::Count => QuantityValue::Count(value),
            QuantityType::Weight => QuantityValue::Weight(value),
        }
    }

    pub fn kind(&self) -> QuantityType {
        match self {
            QuantityValue::Length(_) => QuantityType::Length,
            QuantityValue::Area(_) => QuantityType::Area,
            QuantityValue::Volume(_) => QuantityType::Volume,
            QuantityValue::Count(_) => QuantityType::Count,
            QuantityValue::Weight(_) => QuantityType::Weight,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            QuantityValue::Length(v)
            | QuantityValue::Area(v)
            | QuantityValue::Volume(v)
            | QuantityValue::Count(v)
            | QuantityValue::Weight(v) => v,
        }
    }
}

/// A named quantity read from an `IfcElementQuantity`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Quantity name
    pub name: String,
    /// Tagged numeric value
    pub value: QuantityValue,
}

impl Quantity {
    /// Create a new quantity
    pub fn new(name: impl Into<String>, value: QuantityValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Flatten to the `(name, value)` pair the export records carry
    pub fn into_entry(self) -> (String, f64) {
        let value = self.value.as_f64();
        (self.name, value)
    }
}
