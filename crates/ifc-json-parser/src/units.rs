// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit scale extraction from IFC files

use ifc_json_model::{AttributeValue, DecodedEntity, EntityResolver, IfcType, Result};

/// Extract unit scale from IFC model
///
/// Finds IFCPROJECT and extracts the length unit conversion factor.
/// Returns 1.0 if no unit information is found; fails only if the project
/// entity itself cannot be decoded.
pub fn extract_unit_scale(resolver: &dyn EntityResolver) -> Result<f64> {
    let projects = resolver.entities_by_type(&IfcType::IfcProject)?;
    let Some(project) = projects.first() else {
        return Ok(1.0);
    };

    // IFCPROJECT has UnitsInContext at index 8
    let Some(unit_assignment) = project.get(8).and_then(|a| resolver.resolve_ref(a)) else {
        return Ok(1.0);
    };

    // IFCUNITASSIGNMENT has Units list at index 0
    let scale = resolver
        .resolve_ref_list(unit_assignment.get(0).unwrap_or(&AttributeValue::Null))
        .iter()
        .find_map(|unit| extract_length_unit_scale(unit, resolver));

    Ok(scale.unwrap_or(1.0))
}

/// Extract scale from a unit entity (IFCSIUNIT or IFCCONVERSIONBASEDUNIT)
fn extract_length_unit_scale(unit: &DecodedEntity, resolver: &dyn EntityResolver) -> Option<f64> {
    match unit.ifc_type {
        IfcType::IfcSIUnit => extract_si_unit_scale(unit),
        IfcType::IfcConversionBasedUnit => extract_conversion_unit_scale(unit, resolver),
        _ => None,
    }
}

/// SI prefix multiplier
fn prefix_scale(prefix: &str) -> f64 {
    match prefix {
        "EXA" => 1e18,
        "PETA" => 1e15,
        "TERA" => 1e12,
        "GIGA" => 1e9,
        "MEGA" => 1e6,
        "KILO" => 1e3,
        "HECTO" => 1e2,
        "DECA" => 1e1,
        "DECI" => 1e-1,
        "CENTI" => 1e-2,
        "MILLI" => 1e-3,
        "MICRO" => 1e-6,
        "NANO" => 1e-9,
        "PICO" => 1e-12,
        "FEMTO" => 1e-15,
        "ATTO" => 1e-18,
        _ => 1.0,
    }
}

/// Extract scale from IFCSIUNIT
///
/// IFCSIUNIT(*, UnitType, Prefix, Name)
fn extract_si_unit_scale(unit: &DecodedEntity) -> Option<f64> {
    if unit.get_enum(1)? != "LENGTHUNIT" || unit.get_enum(3)? != "METRE" {
        return None;
    }

    Some(unit.get_enum(2).map(prefix_scale).unwrap_or(1.0))
}

/// Extract scale from IFCCONVERSIONBASEDUNIT
///
/// IFCCONVERSIONBASEDUNIT(Dimensions, UnitType, Name, ConversionFactor).
/// When the conversion factor cannot be followed, well-known imperial unit
/// names still resolve.
fn extract_conversion_unit_scale(
    unit: &DecodedEntity,
    resolver: &dyn EntityResolver,
) -> Option<f64> {
    if unit.get_enum(1)? != "LENGTHUNIT" {
        return None;
    }

    let from_factor = unit
        .get_ref(3)
        .and_then(|id| resolver.get(id))
        .filter(|factor| factor.ifc_type == IfcType::IfcMeasureWithUnit)
        .and_then(|factor| {
            // IFCMEASUREWITHUNIT(ValueComponent, UnitComponent)
            let value = factor.get_float(0)?;
            let base_scale = factor
                .get_ref(1)
                .and_then(|id| resolver.get(id))
                .and_then(|base| extract_length_unit_scale(&base, resolver))
                .unwrap_or(1.0);
            Some(value * base_scale)
        });

    from_factor.or_else(|| named_unit_scale(unit.get_string(2)?))
}

fn named_unit_scale(name: &str) -> Option<f64> {
    match name.to_ascii_uppercase().as_str() {
        "INCH" => Some(scales::INCH),
        "FOOT" => Some(scales::FOOT),
        "YARD" => Some(scales::YARD),
        "MILE" => Some(scales::MILE),
        _ => None,
    }
}

/// Common unit scales for reference
pub mod scales {
    /// Meters to meters (identity)
    pub const METRE: f64 = 1.0;
    /// Millimeters to meters
    pub const MILLIMETRE: f64 = 0.001;
    /// Inches to meters
    pub const INCH: f64 = 0.0254;
    /// Feet to meters
    pub const FOOT: f64 = 0.3048;
    /// Yards to meters
    pub const YARD: f64 = 0.9144;
    /// Miles to meters
    pub const MILE: f64 = 1609.344;
}
