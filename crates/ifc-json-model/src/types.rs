// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IFC data representation
//!
//! This module defines the fundamental types used throughout the model layer.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Type-safe entity identifier
///
/// Wraps the raw STEP instance name (e.g., #123 becomes EntityId(123))
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Declares [`IfcType`] from two lists.
///
/// Everything in `products` is an `IfcProduct` subtype and is enumerated by
/// the exporter; `others` are the geometry, relationship and resource classes
/// the exporter and kernel need to recognise by name.
macro_rules! ifc_types {
    (
        products: [$($product:ident),* $(,)?],
        others: [$($other:ident),* $(,)?] $(,)?
    ) => {
        /// IFC entity type enumeration
        ///
        /// Unknown types are captured with their original string representation.
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum IfcType {
            $($product,)*
            $($other,)*
            /// Unknown type - stores the original type name string
            Unknown(String),
        }

        impl IfcType {
            /// Class name in IFC spelling (e.g. `IfcWall`)
            pub fn name(&self) -> &str {
                match self {
                    $(IfcType::$product => stringify!($product),)*
                    $(IfcType::$other => stringify!($other),)*
                    IfcType::Unknown(s) => s,
                }
            }

            /// Check if this type is an `IfcProduct` subtype
            pub fn is_product(&self) -> bool {
                matches!(self, $(IfcType::$product)|*)
            }

            fn known() -> Vec<IfcType> {
                vec![$(IfcType::$product,)* $(IfcType::$other,)*]
            }
        }
    };
}

ifc_types! {
    products: [
        // Spatial structure
        IfcSite,
        IfcBuilding,
        IfcBuildingStorey,
        IfcSpace,
        IfcFacility,
        IfcFacilityPart,
        IfcFacilityPartCommon,
        IfcRoad,
        IfcRoadPart,
        IfcBridge,
        IfcBridgePart,
        IfcRailway,
        IfcRailwayPart,
        IfcMarineFacility,
        IfcMarinePart,

        // Other spatial elements
        IfcExternalSpatialElement,
        IfcSpatialZone,

        // Built elements
        IfcBuiltElement,
        IfcWall,
        IfcWallStandardCase,
        IfcWallElementedCase,
        IfcCurtainWall,
        IfcSlab,
        IfcSlabStandardCase,
        IfcSlabElementedCase,
        IfcRoof,
        IfcBeam,
        IfcBeamStandardCase,
        IfcColumn,
        IfcColumnStandardCase,
        IfcDoor,
        IfcDoorStandardCase,
        IfcWindow,
        IfcWindowStandardCase,
        IfcStair,
        IfcStairFlight,
        IfcRamp,
        IfcRampFlight,
        IfcRailing,
        IfcCovering,
        IfcPlate,
        IfcPlateStandardCase,
        IfcMember,
        IfcMemberStandardCase,
        IfcFooting,
        IfcPile,
        IfcCaissonFoundation,
        IfcDeepFoundation,
        IfcChimney,
        IfcShadingDevice,
        IfcBuildingElementProxy,
        IfcBearing,
        IfcRail,
        IfcTrackElement,
        IfcNavigationElement,
        IfcMooringDevice,
        IfcReinforcedSoil,
        IfcPavement,
        IfcCourse,
        IfcKerb,
        IfcEarthworksFill,

        // Other elements
        IfcElementAssembly,
        IfcTransportElement,
        IfcVehicle,
        IfcVirtualElement,
        IfcGeographicElement,
        IfcCivilElement,
        IfcElectricalElement,
        IfcEquipmentElement,

        // Geotechnical elements
        IfcBorehole,
        IfcGeomodel,
        IfcGeoslice,
        IfcSolidStratum,
        IfcVoidStratum,
        IfcWaterStratum,

        // Element components
        IfcBuildingElementPart,
        IfcDiscreteAccessory,
        IfcFastener,
        IfcMechanicalFastener,
        IfcReinforcingBar,
        IfcReinforcingMesh,
        IfcTendon,
        IfcTendonAnchor,
        IfcTendonConduit,
        IfcImpactProtectionDevice,
        IfcSign,
        IfcVibrationDamper,
        IfcVibrationIsolator,

        // Distribution elements
        IfcDistributionElement,
        IfcDistributionFlowElement,
        IfcDistributionChamberElement,
        IfcElectricDistributionPoint,

        // Distribution control elements
        IfcDistributionControlElement,
        IfcActuator,
        IfcAlarm,
        IfcController,
        IfcFlowInstrument,
        IfcProtectiveDeviceTrippingUnit,
        IfcSensor,
        IfcUnitaryControlElement,

        // Energy conversion devices
        IfcEnergyConversionDevice,
        IfcAirToAirHeatRecovery,
        IfcBoiler,
        IfcBurner,
        IfcChiller,
        IfcCoil,
        IfcCondenser,
        IfcCooledBeam,
        IfcCoolingTower,
        IfcElectricGenerator,
        IfcElectricMotor,
        IfcEngine,
        IfcEvaporativeCooler,
        IfcEvaporator,
        IfcHeatExchanger,
        IfcHumidifier,
        IfcMotorConnection,
        IfcSolarDevice,
        IfcTransformer,
        IfcTubeBundle,
        IfcUnitaryEquipment,

        // Flow controllers
        IfcFlowController,
        IfcAirTerminalBox,
        IfcDamper,
        IfcDistributionBoard,
        IfcElectricDistributionBoard,
        IfcElectricTimeControl,
        IfcFlowMeter,
        IfcProtectiveDevice,
        IfcSwitchingDevice,
        IfcValve,

        // Flow fittings and segments
        IfcFlowFitting,
        IfcCableCarrierFitting,
        IfcCableFitting,
        IfcDuctFitting,
        IfcJunctionBox,
        IfcPipeFitting,
        IfcFlowSegment,
        IfcCableCarrierSegment,
        IfcCableSegment,
        IfcConveyorSegment,
        IfcDuctSegment,
        IfcPipeSegment,

        // Moving, storage and treatment devices
        IfcFlowMovingDevice,
        IfcCompressor,
        IfcFan,
        IfcPump,
        IfcFlowStorageDevice,
        IfcElectricFlowStorageDevice,
        IfcTank,
        IfcFlowTreatmentDevice,
        IfcDuctSilencer,
        IfcElectricFlowTreatmentDevice,
        IfcFilter,
        IfcInterceptor,

        // Flow terminals
        IfcFlowTerminal,
        IfcAirTerminal,
        IfcAudioVisualAppliance,
        IfcCommunicationsAppliance,
        IfcElectricAppliance,
        IfcFireSuppressionTerminal,
        IfcLamp,
        IfcLightFixture,
        IfcLiquidTerminal,
        IfcMedicalDevice,
        IfcMobileTelecommunicationsAppliance,
        IfcOutlet,
        IfcSanitaryTerminal,
        IfcSignal,
        IfcSpaceHeater,
        IfcStackTerminal,
        IfcWasteTerminal,

        // Furnishing
        IfcFurnishingElement,
        IfcFurniture,
        IfcSystemFurnitureElement,

        // Openings and features
        IfcOpeningElement,
        IfcOpeningStandardCase,
        IfcVoidingFeature,
        IfcProjectionElement,
        IfcSurfaceFeature,
        IfcEarthworksCut,
        IfcEdgeFeature,
        IfcChamferEdgeFeature,
        IfcRoundedEdgeFeature,

        // Ports
        IfcDistributionPort,

        // Annotation, grids, proxies
        IfcAnnotation,
        IfcGrid,
        IfcProxy,

        // Positioning
        IfcAlignment,
        IfcAlignmentHorizontal,
        IfcAlignmentVertical,
        IfcAlignmentCant,
        IfcAlignmentSegment,
        IfcLinearElement,
        IfcReferent,

        // Structural analysis items
        IfcStructuralPointConnection,
        IfcStructuralCurveConnection,
        IfcStructuralSurfaceConnection,
        IfcStructuralCurveMember,
        IfcStructuralCurveMemberVarying,
        IfcStructuralSurfaceMember,
        IfcStructuralSurfaceMemberVarying,
        IfcStructuralPointAction,
        IfcStructuralLinearAction,
        IfcStructuralLinearActionVarying,
        IfcStructuralPlanarAction,
        IfcStructuralPlanarActionVarying,
        IfcStructuralCurveAction,
        IfcStructuralSurfaceAction,
        IfcStructuralPointReaction,
        IfcStructuralCurveReaction,
        IfcStructuralSurfaceReaction,
    ],
    others: [
        IfcProject,

        // Representations and contexts
        IfcProductDefinitionShape,
        IfcShapeRepresentation,
        IfcRepresentationMap,
        IfcGeometricRepresentationContext,
        IfcGeometricRepresentationSubContext,

        // Representation items
        IfcExtrudedAreaSolid,
        IfcTriangulatedFaceSet,
        IfcPolygonalFaceSet,
        IfcIndexedPolygonalFace,
        IfcIndexedPolygonalFaceWithVoids,
        IfcFacetedBrep,
        IfcFacetedBrepWithVoids,
        IfcShellBasedSurfaceModel,
        IfcMappedItem,
        IfcBooleanResult,
        IfcBooleanClippingResult,

        // Profiles
        IfcArbitraryClosedProfileDef,
        IfcArbitraryProfileDefWithVoids,
        IfcRectangleProfileDef,
        IfcCircleProfileDef,
        IfcCircleHollowProfileDef,
        IfcIShapeProfileDef,
        IfcLShapeProfileDef,
        IfcTShapeProfileDef,

        // Curves, points, directions
        IfcPolyline,
        IfcIndexedPolyCurve,
        IfcCartesianPoint,
        IfcDirection,
        IfcCartesianPointList2D,
        IfcCartesianPointList3D,

        // Placement and transforms
        IfcAxis2Placement2D,
        IfcAxis2Placement3D,
        IfcLocalPlacement,
        IfcCartesianTransformationOperator3D,
        IfcCartesianTransformationOperator3DnonUniform,

        // Topology
        IfcClosedShell,
        IfcOpenShell,
        IfcFace,
        IfcFaceBound,
        IfcFaceOuterBound,
        IfcPolyLoop,

        // Relationships
        IfcRelAssociatesDocument,
        IfcRelDefinesByProperties,
        IfcRelDefinesByType,
        IfcRelContainedInSpatialStructure,
        IfcRelAggregates,

        // Documents
        IfcDocumentReference,
        IfcDocumentInformation,

        // Properties and quantities
        IfcPropertySet,
        IfcElementQuantity,
        IfcQuantityLength,
        IfcQuantityArea,
        IfcQuantityVolume,
        IfcQuantityCount,
        IfcQuantityWeight,
        IfcQuantityTime,
        IfcPhysicalComplexQuantity,

        // Units
        IfcUnitAssignment,
        IfcSIUnit,
        IfcConversionBasedUnit,
        IfcMeasureWithUnit,
    ],
}

/// Upper-cased STEP spelling -> known type
fn type_lookup() -> &'static FxHashMap<String, IfcType> {
    static LOOKUP: OnceLock<FxHashMap<String, IfcType>> = OnceLock::new();
    LOOKUP.get_or_init(|| {
        IfcType::known()
            .into_iter()
            .map(|t| (t.name().to_ascii_uppercase(), t))
            .collect()
    })
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IfcType {
    /// Parse a type name string (any case) into an IfcType
    pub fn parse(s: &str) -> Self {
        type_lookup()
            .get(&s.to_ascii_uppercase())
            .cloned()
            .unwrap_or_else(|| IfcType::Unknown(s.to_string()))
    }

    /// Check if this is one of the quantity classes
    pub fn is_quantity(&self) -> bool {
        matches!(
            self,
            IfcType::IfcQuantityLength
                | IfcType::IfcQuantityArea
                | IfcType::IfcQuantityVolume
                | IfcType::IfcQuantityCount
                | IfcType::IfcQuantityWeight
                | IfcType::IfcQuantityTime
                | IfcType::IfcPhysicalComplexQuantity
        )
    }

    /// Check if this type is a spatial structure element
    pub fn is_spatial(&self) -> bool {
        matches!(
            self,
            IfcType::IfcSite
                | IfcType::IfcBuilding
                | IfcType::IfcBuildingStorey
                | IfcType::IfcSpace
                | IfcType::IfcFacility
                | IfcType::IfcFacilityPart
                | IfcType::IfcRoad
                | IfcType::IfcRoadPart
                | IfcType::IfcBridge
                | IfcType::IfcBridgePart
                | IfcType::IfcRailway
                | IfcType::IfcRailwayPart
                | IfcType::IfcMarineFacility
                | IfcType::IfcMarinePart
                | IfcType::IfcFacilityPartCommon
        )
    }

    /// Check if this type is a structural analysis item or activity
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            IfcType::IfcStructuralPointConnection
                | IfcType::IfcStructuralCurveConnection
                | IfcType::IfcStructuralSurfaceConnection
                | IfcType::IfcStructuralCurveMember
                | IfcType::IfcStructuralCurveMemberVarying
                | IfcType::IfcStructuralSurfaceMember
                | IfcType::IfcStructuralSurfaceMemberVarying
                | IfcType::IfcStructuralPointAction
                | IfcType::IfcStructuralLinearAction
                | IfcType::IfcStructuralLinearActionVarying
                | IfcType::IfcStructuralPlanarAction
                | IfcType::IfcStructuralPlanarActionVarying
                | IfcType::IfcStructuralCurveAction
                | IfcType::IfcStructuralSurfaceAction
                | IfcType::IfcStructuralPointReaction
                | IfcType::IfcStructuralCurveReaction
                | IfcType::IfcStructuralSurfaceReaction
        )
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded attribute value
///
/// Represents any value that can appear in an IFC entity's attribute list.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum AttributeValue {
    /// Null value ($)
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCLABEL('text')
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_string(),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_float(),
            _ => None,
        }
    }

    /// Try to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_integer(),
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Enum(s) => match s.to_uppercase().as_str() {
                "TRUE" | "T" => Some(true),
                "FALSE" | "F" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Try to get as enum string
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Entity references held by this value
    ///
    /// A single reference yields one id, a list yields every reference it
    /// contains; anything else yields nothing.
    pub fn entity_refs(&self) -> Vec<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => vec![*id],
            AttributeValue::List(items) => items.iter().filter_map(|v| v.as_entity_ref()).collect(),
            _ => Vec::new(),
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Check if this is a derived value
    pub fn is_derived(&self) -> bool {
        matches!(self, AttributeValue::Derived)
    }
}

/// Decoded IFC entity
///
/// Represents a fully decoded IFC entity with its ID, type, and attribute values.
#[derive(Clone, Debug)]
pub struct DecodedEntity {
    /// Entity ID
    pub id: EntityId,
    /// Entity type
    pub ifc_type: IfcType,
    /// Attribute values in order
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Get attribute at index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference at index
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string at index
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// Get float at index
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get integer at index
    pub fn get_integer(&self, index: usize) -> Option<i64> {
        self.get(index).and_then(|v| v.as_integer())
    }

    /// Get list at index
    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(|v| v.as_list())
    }

    /// Get enum string at index
    pub fn get_enum(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_enum())
    }

    /// Get list of entity references at index
    pub fn get_refs(&self, index: usize) -> Option<Vec<EntityId>> {
        self.get_list(index)
            .map(|list| list.iter().filter_map(|v| v.as_entity_ref()).collect())
    }
}

/// Model metadata extracted from the STEP header
#[derive(Clone, Debug, Default)]
pub struct ModelMetadata {
    /// IFC schema identifier (e.g., "IFC2X3", "IFC4", "IFC4X3")
    pub schema_version: String,
    /// Originating system (CAD application)
    pub originating_system: Option<String>,
    /// Preprocessor version
    pub preprocessor_version: Option<String>,
    /// File name from header
    pub file_name: Option<String>,
    /// Author
    pub author: Option<String>,
    /// Organization
    pub organization: Option<String>,
    /// Timestamp
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(IfcType::parse("IFCWALL"), IfcType::IfcWall);
        assert_eq!(IfcType::parse("IfcWall"), IfcType::IfcWall);
        assert_eq!(
            IfcType::parse("IFCRELASSOCIATESDOCUMENT"),
            IfcType::IfcRelAssociatesDocument
        );
    }

    #[test]
    fn test_unknown_type_keeps_spelling() {
        let t = IfcType::parse("IFCSOMETHINGNEW");
        assert_eq!(t, IfcType::Unknown("IFCSOMETHINGNEW".to_string()));
        assert_eq!(t.name(), "IFCSOMETHINGNEW");
        assert!(!t.is_product());
    }

    #[test]
    fn test_product_classification() {
        assert!(IfcType::IfcWall.is_product());
        assert!(IfcType::IfcBuildingStorey.is_product());
        assert!(IfcType::IfcAirTerminal.is_product());
        for name in [
            "IFCUNITARYEQUIPMENT",
            "IFCCOIL",
            "IFCLAMP",
            "IFCELECTRICAPPLIANCE",
            "IFCEQUIPMENTELEMENT",
            "IFCSTRUCTURALCURVEMEMBER",
            "IFCALIGNMENT",
        ] {
            assert!(IfcType::parse(name).is_product(), "{}", name);
        }
        assert!(!IfcType::IfcProject.is_product());
        assert!(!IfcType::IfcRelAssociatesDocument.is_product());
        assert!(!IfcType::IfcExtrudedAreaSolid.is_product());
    }

    #[test]
    fn test_name_uses_ifc_spelling() {
        assert_eq!(IfcType::IfcWallStandardCase.name(), "IfcWallStandardCase");
        assert_eq!(IfcType::IfcQuantityVolume.to_string(), "IfcQuantityVolume");
    }

    #[test]
    fn test_entity_refs_single_and_list() {
        let single = AttributeValue::EntityRef(EntityId(7));
        assert_eq!(single.entity_refs(), vec![EntityId(7)]);

        let list = AttributeValue::List(vec![
            AttributeValue::EntityRef(EntityId(1)),
            AttributeValue::Null,
            AttributeValue::EntityRef(EntityId(2)),
        ]);
        assert_eq!(list.entity_refs(), vec![EntityId(1), EntityId(2)]);

        assert!(AttributeValue::Null.entity_refs().is_empty());
    }

    #[test]
    fn test_typed_value_unwraps() {
        let v = AttributeValue::TypedValue(
            "IFCVOLUMEMEASURE".to_string(),
            vec![AttributeValue::Float(1.5)],
        );
        assert_eq!(v.as_float(), Some(1.5));
    }
}
