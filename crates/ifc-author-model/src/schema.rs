// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC4 attribute layouts
//!
//! Only the classes the authoring API creates are described. Attribute order
//! follows the flattened EXPRESS definition (supertype attributes first).

use crate::{AttributeValue, IfcType};

/// Attribute layout of one IFC class
#[derive(Debug, Clone, Copy)]
pub struct EntityDef {
    /// Attribute names in STEP order
    pub attributes: &'static [&'static str],
    /// Positions that are redeclared as DERIVE in this class (written as `*`)
    pub derived: &'static [usize],
}

impl EntityDef {
    /// Position of a named attribute
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| *a == name)
    }

    /// Whether the class is an IfcRoot subtype (carries a GlobalId)
    pub fn is_rooted(&self) -> bool {
        self.attributes.first() == Some(&"GlobalId")
    }

    /// Default attribute list: `*` for derived positions, `$` elsewhere
    pub fn default_attributes(&self) -> Vec<AttributeValue> {
        (0..self.attributes.len())
            .map(|i| {
                if self.derived.contains(&i) {
                    AttributeValue::Derived
                } else {
                    AttributeValue::Null
                }
            })
            .collect()
    }
}

const PROJECT: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "ObjectType", "LongName", "Phase",
    "RepresentationContexts", "UnitsInContext",
];

const SITE: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "ObjectType", "ObjectPlacement",
    "Representation", "LongName", "CompositionType", "RefLatitude", "RefLongitude",
    "RefElevation", "LandTitleNumber", "SiteAddress",
];

const BUILDING: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "ObjectType", "ObjectPlacement",
    "Representation", "LongName", "CompositionType", "ElevationOfRefHeight",
    "ElevationOfTerrain", "BuildingAddress",
];

const STOREY: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "ObjectType", "ObjectPlacement",
    "Representation", "LongName", "CompositionType", "Elevation",
];

const SPACE: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "ObjectType", "ObjectPlacement",
    "Representation", "LongName", "CompositionType", "PredefinedType", "ElevationWithFlooring",
];

const BUILT_ELEMENT: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "ObjectType", "ObjectPlacement",
    "Representation", "Tag", "PredefinedType",
];

const DOOR: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "ObjectType", "ObjectPlacement",
    "Representation", "Tag", "OverallHeight", "OverallWidth", "PredefinedType",
    "OperationType", "UserDefinedOperationType",
];

const WINDOW: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "ObjectType", "ObjectPlacement",
    "Representation", "Tag", "OverallHeight", "OverallWidth", "PredefinedType",
    "PartitioningType", "UserDefinedPartitioningType",
];

const REL_AGGREGATES: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "RelatingObject", "RelatedObjects",
];

const REL_CONTAINED: &[&str] = &[
    "GlobalId", "OwnerHistory", "Name", "Description", "RelatedElements", "RelatingStructure",
];

const REL_VOIDS: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "RelatingBuildingElement",
    "RelatedOpeningElement",
];

const REL_FILLS: &[&str] = &[
    "GlobalId",
    "OwnerHistory",
    "Name",
    "Description",
    "RelatingOpeningElement",
    "RelatedBuildingElement",
];

const CONTEXT: &[&str] = &[
    "ContextIdentifier", "ContextType", "CoordinateSpaceDimension", "Precision",
    "WorldCoordinateSystem", "TrueNorth",
];

const SUB_CONTEXT: &[&str] = &[
    "ContextIdentifier", "ContextType", "CoordinateSpaceDimension", "Precision",
    "WorldCoordinateSystem", "TrueNorth", "ParentContext", "TargetScale", "TargetView",
    "UserDefinedTargetView",
];

/// Layout of a class, `None` for classes this workspace does not author
pub fn entity_def(ifc_type: &IfcType) -> Option<EntityDef> {
    let (attributes, derived): (&'static [&'static str], &'static [usize]) = match ifc_type {
        IfcType::IfcProject => (PROJECT, &[]),
        IfcType::IfcSite => (SITE, &[]),
        IfcType::IfcBuilding => (BUILDING, &[]),
        IfcType::IfcBuildingStorey => (STOREY, &[]),
        IfcType::IfcSpace => (SPACE, &[]),
        IfcType::IfcWall
        | IfcType::IfcWallStandardCase
        | IfcType::IfcSlab
        | IfcType::IfcBuildingElementProxy
        | IfcType::IfcOpeningElement => (BUILT_ELEMENT, &[]),
        IfcType::IfcDoor => (DOOR, &[]),
        IfcType::IfcWindow => (WINDOW, &[]),
        IfcType::IfcRelAggregates => (REL_AGGREGATES, &[]),
        IfcType::IfcRelContainedInSpatialStructure => (REL_CONTAINED, &[]),
        IfcType::IfcRelVoidsElement => (REL_VOIDS, &[]),
        IfcType::IfcRelFillsElement => (REL_FILLS, &[]),
        IfcType::IfcUnitAssignment => (&["Units"], &[]),
        IfcType::IfcSIUnit => (&["Dimensions", "UnitType", "Prefix", "Name"], &[0]),
        IfcType::IfcGeometricRepresentationContext => (CONTEXT, &[]),
        IfcType::IfcGeometricRepresentationSubContext => (SUB_CONTEXT, &[2, 3, 4, 5]),
        IfcType::IfcCartesianPoint => (&["Coordinates"], &[]),
        IfcType::IfcDirection => (&["DirectionRatios"], &[]),
        IfcType::IfcAxis2Placement2D => (&["Location", "RefDirection"], &[]),
        IfcType::IfcAxis2Placement3D => (&["Location", "Axis", "RefDirection"], &[]),
        IfcType::IfcLocalPlacement => (&["PlacementRelTo", "RelativePlacement"], &[]),
        IfcType::IfcPolyline => (&["Points"], &[]),
        IfcType::IfcArbitraryClosedProfileDef => {
            (&["ProfileType", "ProfileName", "OuterCurve"], &[])
        }
        IfcType::IfcArbitraryProfileDefWithVoids => {
            (&["ProfileType", "ProfileName", "OuterCurve", "InnerCurves"], &[])
        }
        IfcType::IfcRectangleProfileDef => (
            &["ProfileType", "ProfileName", "Position", "XDim", "YDim"],
            &[],
        ),
        IfcType::IfcExtrudedAreaSolid => (
            &["SweptArea", "Position", "ExtrudedDirection", "Depth"],
            &[],
        ),
        IfcType::IfcShapeRepresentation => (
            &[
                "ContextOfItems",
                "RepresentationIdentifier",
                "RepresentationType",
                "Items",
            ],
            &[],
        ),
        IfcType::IfcProductDefinitionShape => (&["Name", "Description", "Representations"], &[]),
        IfcType::Unknown(_) => return None,
    };
    Some(EntityDef {
        attributes,
        derived,
    })
}

/// Position of a named attribute in a class layout
pub fn attribute_index(ifc_type: &IfcType, name: &str) -> Option<usize> {
    entity_def(ifc_type)?.index_of(name)
}
