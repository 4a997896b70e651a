// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Positional attribute names
//!
//! STEP encodes attributes by position only. This module maps a class and
//! schema version to the declared attribute names: the prefix inherited
//! from `IfcProduct`, `IfcElement` or `IfcSpatialElement`, followed by the
//! attributes the subtypes declare. Positions a class does not declare here
//! stay unnamed rather than guessed.

use crate::types::{AttributeValue, IfcType};
use std::borrow::Cow;

/// IFC schema family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SchemaVersion {
    Ifc2x3,
    #[default]
    Ifc4,
    Ifc4x3,
}

impl SchemaVersion {
    /// Detect the schema from the `FILE_SCHEMA` identifier
    pub fn from_header(schema: &str) -> Self {
        let upper = schema.to_ascii_uppercase();
        if upper.starts_with("IFC2X3") {
            SchemaVersion::Ifc2x3
        } else if upper.starts_with("IFC4X3") {
            SchemaVersion::Ifc4x3
        } else {
            SchemaVersion::Ifc4
        }
    }
}

/// One attribute paired with its declared name
#[derive(Clone, Debug, PartialEq)]
pub struct NamedAttribute<'a> {
    pub name: Cow<'static, str>,
    pub value: &'a AttributeValue,
}

const PRODUCT: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
];

const ELEMENT: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
    "Tag",
];

const SPATIAL_ELEMENT: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
    "LongName",
];

const SPATIAL_STRUCTURE: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "ObjectType",
    "ObjectPlacement",
    "Representation",
    "LongName",
    "CompositionType",
];

const NONE: &[&str] = &[];
const PREDEFINED: &[&str] = &["PredefinedType"];

// Spatial structure
const SITE: &[&str] = &[
    "RefLatitude",
    "RefLongitude",
    "RefElevation",
    "LandTitleNumber",
    "SiteAddress",
];
const BUILDING: &[&str] = &["ElevationOfRefHeight", "ElevationOfTerrain", "BuildingAddress"];
const STOREY: &[&str] = &["Elevation"];
const SPACE_2X3: &[&str] = &["InteriorOrExteriorSpace", "ElevationWithFlooring"];
const SPACE_4: &[&str] = &["PredefinedType", "ElevationWithFlooring"];
const FACILITY_PART: &[&str] = &["UsageType"];
const FACILITY_PART_TYPED: &[&str] = &["UsageType", "PredefinedType"];

// Built elements
const DOOR_2X3: &[&str] = &["OverallHeight", "OverallWidth"];
const DOOR_4: &[&str] = &[
    "OverallHeight",
    "OverallWidth",
    "PredefinedType",
    "OperationType",
    "UserDefinedOperationType",
];
const WINDOW_4: &[&str] = &[
    "OverallHeight",
    "OverallWidth",
    "PredefinedType",
    "PartitioningType",
    "UserDefinedPartitioningType",
];
const STAIR_FLIGHT_2X3: &[&str] = &["NumberOfRiser", "NumberOfTreads", "RiserHeight", "TreadLength"];
const STAIR_FLIGHT_4: &[&str] = &[
    "NumberOfRisers",
    "NumberOfTreads",
    "RiserHeight",
    "TreadLength",
    "PredefinedType",
];
const PILE: &[&str] = &["PredefinedType", "ConstructionType"];
const SHAPE: &[&str] = &["ShapeType"];
const COMPOSITION: &[&str] = &["CompositionType"];

// Other elements
const ASSEMBLY: &[&str] = &["AssemblyPlace", "PredefinedType"];
const TRANSPORT_2X3: &[&str] = &["OperationType", "CapacityByWeight", "CapacityByNumber"];
const CONTROL_ELEMENT_2X3: &[&str] = &["ControlElementId"];
const DISTRIBUTION_POINT_2X3: &[&str] = &["DistributionPointFunction", "UserDefinedFunction"];

// Element components
const MECHANICAL_FASTENER_2X3: &[&str] = &["NominalDiameter", "NominalLength"];
const MECHANICAL_FASTENER_4: &[&str] = &["NominalDiameter", "NominalLength", "PredefinedType"];
const REINFORCING_BAR_2X3: &[&str] = &[
    "SteelGrade",
    "NominalDiameter",
    "CrossSectionArea",
    "BarLength",
    "BarRole",
    "BarSurface",
];
const REINFORCING_BAR_4: &[&str] = &[
    "SteelGrade",
    "NominalDiameter",
    "CrossSectionArea",
    "BarLength",
    "PredefinedType",
    "BarSurface",
];
const REINFORCING_MESH_2X3: &[&str] = &[
    "SteelGrade",
    "MeshLength",
    "MeshWidth",
    "LongitudinalBarNominalDiameter",
    "TransverseBarNominalDiameter",
    "LongitudinalBarCrossSectionArea",
    "TransverseBarCrossSectionArea",
    "LongitudinalBarSpacing",
    "TransverseBarSpacing",
];
const REINFORCING_MESH_4: &[&str] = &[
    "SteelGrade",
    "MeshLength",
    "MeshWidth",
    "LongitudinalBarNominalDiameter",
    "TransverseBarNominalDiameter",
    "LongitudinalBarCrossSectionArea",
    "TransverseBarCrossSectionArea",
    "LongitudinalBarSpacing",
    "TransverseBarSpacing",
    "PredefinedType",
];
const TENDON: &[&str] = &[
    "SteelGrade",
    "PredefinedType",
    "NominalDiameter",
    "CrossSectionArea",
    "TensionForce",
    "PreStress",
    "FrictionCoefficient",
    "AnchorageSlip",
    "MinCurvatureRadius",
];
const STEEL_GRADE: &[&str] = &["SteelGrade"];
const STEEL_GRADE_TYPED: &[&str] = &["SteelGrade", "PredefinedType"];

// Features
const EDGE_FEATURE: &[&str] = &["FeatureLength"];
const CHAMFER_EDGE_FEATURE: &[&str] = &["FeatureLength", "Width", "Height"];
const ROUNDED_EDGE_FEATURE: &[&str] = &["FeatureLength", "Radius"];

// Product-level classes
const PORT_2X3: &[&str] = &["FlowDirection"];
const PORT_4: &[&str] = &["FlowDirection", "PredefinedType", "SystemType"];
const GRID_2X3: &[&str] = &["UAxes", "VAxes", "WAxes"];
const GRID_4: &[&str] = &["UAxes", "VAxes", "WAxes", "PredefinedType"];
const PROXY: &[&str] = &["ProxyType", "Tag"];
const ALIGNMENT_CANT: &[&str] = &["RailHeadDistance"];
const ALIGNMENT_SEGMENT: &[&str] = &["DesignParameters"];

// Structural analysis
const CONDITION: &[&str] = &["AppliedCondition"];
const POINT_CONNECTION_4: &[&str] = &["AppliedCondition", "ConditionCoordinateSystem"];
const CURVE_CONNECTION_4: &[&str] = &["AppliedCondition", "Axis"];
const CURVE_MEMBER_4: &[&str] = &["PredefinedType", "Axis"];
const SURFACE_MEMBER: &[&str] = &["PredefinedType", "Thickness"];
const SURFACE_MEMBER_VARYING_2X3: &[&str] = &[
    "PredefinedType",
    "Thickness",
    "SubsequentThickness",
    "VaryingThicknessLocation",
];
const ACTION_2X3: &[&str] = &["AppliedLoad", "GlobalOrLocal", "DestabilizingLoad", "CausedBy"];
const ACTION_4: &[&str] = &["AppliedLoad", "GlobalOrLocal", "DestabilizingLoad"];
const DISTRIBUTED_ACTION_2X3: &[&str] = &[
    "AppliedLoad",
    "GlobalOrLocal",
    "DestabilizingLoad",
    "CausedBy",
    "ProjectedOrTrue",
];
const DISTRIBUTED_ACTION_4: &[&str] = &[
    "AppliedLoad",
    "GlobalOrLocal",
    "DestabilizingLoad",
    "ProjectedOrTrue",
    "PredefinedType",
];
const VARYING_ACTION_2X3: &[&str] = &[
    "AppliedLoad",
    "GlobalOrLocal",
    "DestabilizingLoad",
    "CausedBy",
    "ProjectedOrTrue",
    "VaryingAppliedLoadLocation",
    "SubsequentAppliedLoads",
];
const REACTION: &[&str] = &["AppliedLoad", "GlobalOrLocal"];
const REACTION_TYPED: &[&str] = &["AppliedLoad", "GlobalOrLocal", "PredefinedType"];

/// Supertype whose attributes open a product's declared list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Family {
    Product,
    Element,
    SpatialElement,
    SpatialStructure,
}

impl Family {
    fn of(ifc_type: &IfcType) -> Option<Self> {
        match ifc_type {
            t if t.is_spatial() => Some(Family::SpatialStructure),
            IfcType::IfcSpatialZone | IfcType::IfcExternalSpatialElement => {
                Some(Family::SpatialElement)
            }
            IfcType::IfcAnnotation
            | IfcType::IfcGrid
            | IfcType::IfcProxy
            | IfcType::IfcDistributionPort
            | IfcType::IfcAlignment
            | IfcType::IfcAlignmentHorizontal
            | IfcType::IfcAlignmentVertical
            | IfcType::IfcAlignmentCant
            | IfcType::IfcAlignmentSegment
            | IfcType::IfcLinearElement
            | IfcType::IfcReferent => Some(Family::Product),
            t if t.is_structural() => Some(Family::Product),
            t if t.is_product() => Some(Family::Element),
            _ => None,
        }
    }

    fn prefix(self) -> &'static [&'static str] {
        match self {
            Family::Product => PRODUCT,
            Family::Element => ELEMENT,
            Family::SpatialElement => SPATIAL_ELEMENT,
            Family::SpatialStructure => SPATIAL_STRUCTURE,
        }
    }
}

/// Attributes a class declares below its family prefix
fn own_attributes(ifc_type: &IfcType, schema: SchemaVersion) -> &'static [&'static str] {
    let ifc2x3 = schema == SchemaVersion::Ifc2x3;
    let ifc4x3 = schema == SchemaVersion::Ifc4x3;

    match ifc_type {
        IfcType::IfcSite => SITE,
        IfcType::IfcBuilding => BUILDING,
        IfcType::IfcBuildingStorey => STOREY,
        IfcType::IfcSpace if ifc2x3 => SPACE_2X3,
        IfcType::IfcSpace => SPACE_4,
        IfcType::IfcFacility => NONE,
        IfcType::IfcFacilityPart => FACILITY_PART,
        IfcType::IfcFacilityPartCommon
        | IfcType::IfcRoadPart
        | IfcType::IfcBridgePart
        | IfcType::IfcRailwayPart
        | IfcType::IfcMarinePart => FACILITY_PART_TYPED,
        IfcType::IfcRoad
        | IfcType::IfcBridge
        | IfcType::IfcRailway
        | IfcType::IfcMarineFacility
        | IfcType::IfcSpatialZone
        | IfcType::IfcExternalSpatialElement => PREDEFINED,

        IfcType::IfcDoor | IfcType::IfcDoorStandardCase if ifc2x3 => DOOR_2X3,
        IfcType::IfcDoor | IfcType::IfcDoorStandardCase => DOOR_4,
        IfcType::IfcWindow | IfcType::IfcWindowStandardCase if ifc2x3 => DOOR_2X3,
        IfcType::IfcWindow | IfcType::IfcWindowStandardCase => WINDOW_4,
        IfcType::IfcStairFlight if ifc2x3 => STAIR_FLIGHT_2X3,
        IfcType::IfcStairFlight => STAIR_FLIGHT_4,
        IfcType::IfcPile => PILE,
        IfcType::IfcRamp | IfcType::IfcRoof | IfcType::IfcStair if ifc2x3 => SHAPE,
        IfcType::IfcBuildingElementProxy if ifc2x3 => COMPOSITION,
        IfcType::IfcSlab | IfcType::IfcCovering | IfcType::IfcFooting | IfcType::IfcRailing
            if ifc2x3 =>
        {
            PREDEFINED
        }

        IfcType::IfcElementAssembly => ASSEMBLY,
        IfcType::IfcTransportElement if ifc2x3 => TRANSPORT_2X3,
        IfcType::IfcDistributionControlElement if ifc2x3 => CONTROL_ELEMENT_2X3,
        IfcType::IfcElectricDistributionPoint => DISTRIBUTION_POINT_2X3,
        IfcType::IfcVirtualElement | IfcType::IfcAnnotation if ifc4x3 => PREDEFINED,

        IfcType::IfcMechanicalFastener if ifc2x3 => MECHANICAL_FASTENER_2X3,
        IfcType::IfcMechanicalFastener => MECHANICAL_FASTENER_4,
        IfcType::IfcReinforcingBar if ifc2x3 => REINFORCING_BAR_2X3,
        IfcType::IfcReinforcingBar => REINFORCING_BAR_4,
        IfcType::IfcReinforcingMesh if ifc2x3 => REINFORCING_MESH_2X3,
        IfcType::IfcReinforcingMesh => REINFORCING_MESH_4,
        IfcType::IfcTendon => TENDON,
        IfcType::IfcTendonAnchor if ifc2x3 => STEEL_GRADE,
        IfcType::IfcTendonAnchor | IfcType::IfcTendonConduit => STEEL_GRADE_TYPED,

        IfcType::IfcEdgeFeature => EDGE_FEATURE,
        IfcType::IfcChamferEdgeFeature => CHAMFER_EDGE_FEATURE,
        IfcType::IfcRoundedEdgeFeature => ROUNDED_EDGE_FEATURE,

        IfcType::IfcDistributionPort if ifc2x3 => PORT_2X3,
        IfcType::IfcDistributionPort => PORT_4,
        IfcType::IfcGrid if ifc2x3 => GRID_2X3,
        IfcType::IfcGrid => GRID_4,
        IfcType::IfcProxy => PROXY,
        IfcType::IfcAlignment | IfcType::IfcReferent => PREDEFINED,
        IfcType::IfcAlignmentCant => ALIGNMENT_CANT,
        IfcType::IfcAlignmentSegment => ALIGNMENT_SEGMENT,

        IfcType::IfcStructuralPointConnection if !ifc2x3 => POINT_CONNECTION_4,
        IfcType::IfcStructuralCurveConnection if !ifc2x3 => CURVE_CONNECTION_4,
        IfcType::IfcStructuralPointConnection
        | IfcType::IfcStructuralCurveConnection
        | IfcType::IfcStructuralSurfaceConnection => CONDITION,
        IfcType::IfcStructuralCurveMember | IfcType::IfcStructuralCurveMemberVarying
            if ifc2x3 =>
        {
            PREDEFINED
        }
        IfcType::IfcStructuralCurveMember | IfcType::IfcStructuralCurveMemberVarying => {
            CURVE_MEMBER_4
        }
        IfcType::IfcStructuralSurfaceMemberVarying if ifc2x3 => SURFACE_MEMBER_VARYING_2X3,
        IfcType::IfcStructuralSurfaceMember | IfcType::IfcStructuralSurfaceMemberVarying => {
            SURFACE_MEMBER
        }
        IfcType::IfcStructuralPointAction if ifc2x3 => ACTION_2X3,
        IfcType::IfcStructuralPointAction => ACTION_4,
        IfcType::IfcStructuralLinearAction | IfcType::IfcStructuralPlanarAction if ifc2x3 => {
            DISTRIBUTED_ACTION_2X3
        }
        IfcType::IfcStructuralLinearAction
        | IfcType::IfcStructuralPlanarAction
        | IfcType::IfcStructuralCurveAction
        | IfcType::IfcStructuralSurfaceAction => DISTRIBUTED_ACTION_4,
        IfcType::IfcStructuralLinearActionVarying | IfcType::IfcStructuralPlanarActionVarying => {
            VARYING_ACTION_2X3
        }
        IfcType::IfcStructuralPointReaction => REACTION,
        IfcType::IfcStructuralCurveReaction | IfcType::IfcStructuralSurfaceReaction => {
            REACTION_TYPED
        }

        t if !ifc2x3 && declares_only_predefined_type(t) => PREDEFINED,
        _ => NONE,
    }
}

/// Classes whose only own attribute (IFC4 onwards) is `PredefinedType`
fn declares_only_predefined_type(ifc_type: &IfcType) -> bool {
    matches!(
        ifc_type,
        IfcType::IfcWall
            | IfcType::IfcWallStandardCase
            | IfcType::IfcWallElementedCase
            | IfcType::IfcCurtainWall
            | IfcType::IfcSlab
            | IfcType::IfcSlabStandardCase
            | IfcType::IfcSlabElementedCase
            | IfcType::IfcRoof
            | IfcType::IfcBeam
            | IfcType::IfcBeamStandardCase
            | IfcType::IfcColumn
            | IfcType::IfcColumnStandardCase
            | IfcType::IfcStair
            | IfcType::IfcRamp
            | IfcType::IfcRampFlight
            | IfcType::IfcRailing
            | IfcType::IfcCovering
            | IfcType::IfcPlate
            | IfcType::IfcPlateStandardCase
            | IfcType::IfcMember
            | IfcType::IfcMemberStandardCase
            | IfcType::IfcFooting
            | IfcType::IfcCaissonFoundation
            | IfcType::IfcChimney
            | IfcType::IfcShadingDevice
            | IfcType::IfcBuildingElementProxy
            | IfcType::IfcBearing
            | IfcType::IfcRail
            | IfcType::IfcTrackElement
            | IfcType::IfcNavigationElement
            | IfcType::IfcMooringDevice
            | IfcType::IfcReinforcedSoil
            | IfcType::IfcPavement
            | IfcType::IfcCourse
            | IfcType::IfcKerb
            | IfcType::IfcEarthworksFill
            | IfcType::IfcTransportElement
            | IfcType::IfcVehicle
            | IfcType::IfcGeographicElement
            | IfcType::IfcBuildingElementPart
            | IfcType::IfcDiscreteAccessory
            | IfcType::IfcFastener
            | IfcType::IfcImpactProtectionDevice
            | IfcType::IfcSign
            | IfcType::IfcVibrationDamper
            | IfcType::IfcVibrationIsolator
            | IfcType::IfcDistributionChamberElement
            | IfcType::IfcActuator
            | IfcType::IfcAlarm
            | IfcType::IfcController
            | IfcType::IfcFlowInstrument
            | IfcType::IfcProtectiveDeviceTrippingUnit
            | IfcType::IfcSensor
            | IfcType::IfcUnitaryControlElement
            | IfcType::IfcAirToAirHeatRecovery
            | IfcType::IfcBoiler
            | IfcType::IfcBurner
            | IfcType::IfcChiller
            | IfcType::IfcCoil
            | IfcType::IfcCondenser
            | IfcType::IfcCooledBeam
            | IfcType::IfcCoolingTower
            | IfcType::IfcElectricGenerator
            | IfcType::IfcElectricMotor
            | IfcType::IfcEngine
            | IfcType::IfcEvaporativeCooler
            | IfcType::IfcEvaporator
            | IfcType::IfcHeatExchanger
            | IfcType::IfcHumidifier
            | IfcType::IfcMotorConnection
            | IfcType::IfcSolarDevice
            | IfcType::IfcTransformer
            | IfcType::IfcTubeBundle
            | IfcType::IfcUnitaryEquipment
            | IfcType::IfcAirTerminalBox
            | IfcType::IfcDamper
            | IfcType::IfcDistributionBoard
            | IfcType::IfcElectricDistributionBoard
            | IfcType::IfcElectricTimeControl
            | IfcType::IfcFlowMeter
            | IfcType::IfcProtectiveDevice
            | IfcType::IfcSwitchingDevice
            | IfcType::IfcValve
            | IfcType::IfcCableCarrierFitting
            | IfcType::IfcCableFitting
            | IfcType::IfcDuctFitting
            | IfcType::IfcJunctionBox
            | IfcType::IfcPipeFitting
            | IfcType::IfcCableCarrierSegment
            | IfcType::IfcCableSegment
            | IfcType::IfcConveyorSegment
            | IfcType::IfcDuctSegment
            | IfcType::IfcPipeSegment
            | IfcType::IfcCompressor
            | IfcType::IfcFan
            | IfcType::IfcPump
            | IfcType::IfcElectricFlowStorageDevice
            | IfcType::IfcTank
            | IfcType::IfcDuctSilencer
            | IfcType::IfcElectricFlowTreatmentDevice
            | IfcType::IfcFilter
            | IfcType::IfcInterceptor
            | IfcType::IfcAirTerminal
            | IfcType::IfcAudioVisualAppliance
            | IfcType::IfcCommunicationsAppliance
            | IfcType::IfcElectricAppliance
            | IfcType::IfcFireSuppressionTerminal
            | IfcType::IfcLamp
            | IfcType::IfcLightFixture
            | IfcType::IfcLiquidTerminal
            | IfcType::IfcMedicalDevice
            | IfcType::IfcMobileTelecommunicationsAppliance
            | IfcType::IfcOutlet
            | IfcType::IfcSanitaryTerminal
            | IfcType::IfcSignal
            | IfcType::IfcSpaceHeater
            | IfcType::IfcStackTerminal
            | IfcType::IfcWasteTerminal
            | IfcType::IfcFurniture
            | IfcType::IfcSystemFurnitureElement
            | IfcType::IfcOpeningElement
            | IfcType::IfcOpeningStandardCase
            | IfcType::IfcVoidingFeature
            | IfcType::IfcProjectionElement
            | IfcType::IfcSurfaceFeature
            | IfcType::IfcEarthworksCut
    )
}

/// Declared attribute names of `ifc_type` in `schema`
///
/// Non-product classes have no names.
pub fn attribute_names(ifc_type: &IfcType, schema: SchemaVersion) -> Vec<&'static str> {
    match Family::of(ifc_type) {
        Some(family) => family
            .prefix()
            .iter()
            .chain(own_attributes(ifc_type, schema).iter())
            .copied()
            .collect(),
        None => Vec::new(),
    }
}

/// Pair each attribute value with its declared name
///
/// Positions beyond the known table are named `Attribute<index>`.
pub fn name_attributes<'a>(
    ifc_type: &IfcType,
    schema: SchemaVersion,
    values: &'a [AttributeValue],
) -> Vec<NamedAttribute<'a>> {
    let names = attribute_names(ifc_type, schema);
    values
        .iter()
        .enumerate()
        .map(|(i, value)| NamedAttribute {
            name: names
                .get(i)
                .map(|n| Cow::Borrowed(*n))
                .unwrap_or_else(|| Cow::Owned(format!("Attribute{}", i))),
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(t: IfcType, schema: SchemaVersion) -> Vec<&'static str> {
        attribute_names(&t, schema)
    }

    #[test]
    fn test_schema_from_header() {
        assert_eq!(SchemaVersion::from_header("IFC2X3"), SchemaVersion::Ifc2x3);
        assert_eq!(SchemaVersion::from_header("IFC4"), SchemaVersion::Ifc4);
        assert_eq!(SchemaVersion::from_header("IFC4X3_ADD2"), SchemaVersion::Ifc4x3);
        assert_eq!(SchemaVersion::from_header("ifc2x3_tc1"), SchemaVersion::Ifc2x3);
    }

    #[test]
    fn test_wall_names_by_schema() {
        let wall = names(IfcType::IfcWall, SchemaVersion::Ifc2x3);
        assert_eq!(wall.len(), 8);
        assert_eq!(wall[7], "Tag");

        let wall = names(IfcType::IfcWall, SchemaVersion::Ifc4);
        assert_eq!(wall.len(), 9);
        assert_eq!(wall[8], "PredefinedType");

        let elemented = names(IfcType::IfcWallElementedCase, SchemaVersion::Ifc4);
        assert_eq!(elemented.last(), Some(&"PredefinedType"));
    }

    #[test]
    fn test_storey_names() {
        let storey = names(IfcType::IfcBuildingStorey, SchemaVersion::Ifc2x3);
        assert_eq!(storey.last(), Some(&"Elevation"));
        assert_eq!(storey[7], "LongName");
        assert_eq!(storey[8], "CompositionType");
    }

    #[test]
    fn test_spatial_elements_are_not_elements() {
        let zone = names(IfcType::IfcSpatialZone, SchemaVersion::Ifc4);
        assert_eq!(&zone[7..], &["LongName", "PredefinedType"]);

        let external = names(IfcType::IfcExternalSpatialElement, SchemaVersion::Ifc4);
        assert_eq!(&external[7..], &["LongName", "PredefinedType"]);

        let road = names(IfcType::IfcRoad, SchemaVersion::Ifc4x3);
        assert_eq!(&road[7..], &["LongName", "CompositionType", "PredefinedType"]);

        let part = names(IfcType::IfcRoadPart, SchemaVersion::Ifc4x3);
        assert_eq!(&part[9..], &["UsageType", "PredefinedType"]);
    }

    #[test]
    fn test_component_tails() {
        let fastener = names(IfcType::IfcMechanicalFastener, SchemaVersion::Ifc4);
        assert_eq!(&fastener[8..], &["NominalDiameter", "NominalLength", "PredefinedType"]);

        let bar = names(IfcType::IfcReinforcingBar, SchemaVersion::Ifc2x3);
        assert_eq!(bar[8], "SteelGrade");
        assert_eq!(bar[12], "BarRole");

        let bar = names(IfcType::IfcReinforcingBar, SchemaVersion::Ifc4);
        assert_eq!(bar[12], "PredefinedType");
    }

    #[test]
    fn test_ifc2x3_specific_tails() {
        let control = names(IfcType::IfcDistributionControlElement, SchemaVersion::Ifc2x3);
        assert_eq!(control.last(), Some(&"ControlElementId"));
        assert_eq!(
            names(IfcType::IfcDistributionControlElement, SchemaVersion::Ifc4).len(),
            8
        );

        let assembly = names(IfcType::IfcElementAssembly, SchemaVersion::Ifc2x3);
        assert_eq!(&assembly[8..], &["AssemblyPlace", "PredefinedType"]);

        let transport = names(IfcType::IfcTransportElement, SchemaVersion::Ifc2x3);
        assert_eq!(
            &transport[8..],
            &["OperationType", "CapacityByWeight", "CapacityByNumber"]
        );
        let transport = names(IfcType::IfcTransportElement, SchemaVersion::Ifc4);
        assert_eq!(&transport[8..], &["PredefinedType"]);
    }

    #[test]
    fn test_mep_and_product_level_classes() {
        let equipment = names(IfcType::IfcUnitaryEquipment, SchemaVersion::Ifc4);
        assert_eq!(&equipment[7..], &["Tag", "PredefinedType"]);

        assert_eq!(names(IfcType::IfcFlowTerminal, SchemaVersion::Ifc4).len(), 8);

        let port = names(IfcType::IfcDistributionPort, SchemaVersion::Ifc4);
        assert_eq!(&port[7..], &["FlowDirection", "PredefinedType", "SystemType"]);

        let member = names(IfcType::IfcStructuralCurveMember, SchemaVersion::Ifc4);
        assert_eq!(&member[7..], &["PredefinedType", "Axis"]);
    }

    #[test]
    fn test_undeclared_positions_stay_numbered() {
        let values = vec![AttributeValue::Null; 11];
        let named = name_attributes(&IfcType::IfcWall, SchemaVersion::Ifc2x3, &values);
        assert_eq!(named[0].name, "GlobalId");
        assert_eq!(named[8].name, "Attribute8");
        assert_eq!(named[10].name, "Attribute10");

        let values = vec![AttributeValue::Null; 10];
        let named = name_attributes(&IfcType::IfcCivilElement, SchemaVersion::Ifc4, &values);
        assert_eq!(named[7].name, "Tag");
        assert_eq!(named[8].name, "Attribute8");
    }

    #[test]
    fn test_non_product_has_no_names() {
        assert!(names(IfcType::IfcCartesianPoint, SchemaVersion::Ifc4).is_empty());
        assert!(names(IfcType::Unknown("IFCFOO".into()), SchemaVersion::Ifc4).is_empty());
    }
}
