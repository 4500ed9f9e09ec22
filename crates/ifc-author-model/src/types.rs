// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IFC data representation
//!
//! These types are shared by the authoring API (which builds entities) and the
//! STEP reader (which decodes them back).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe entity identifier
///
/// Wraps the STEP instance name (e.g., #123 becomes EntityId(123))
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
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

/// Declares the known IFC classes together with their STEP keyword.
///
/// Keeps `parse` and `name` in sync without hand-maintained match arms.
macro_rules! ifc_types {
    ($($variant:ident => $keyword:literal),* $(,)?) => {
        /// IFC entity type enumeration
        ///
        /// Covers the IFC4 classes this workspace authors and reads back.
        /// Anything else is captured with its upper-case keyword.
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum IfcType {
            $($variant,)*
            /// Unknown type - stores the upper-case STEP keyword
            Unknown(String),
        }

        impl IfcType {
            /// Parse a type name string into an IfcType (case-insensitive)
            pub fn parse(s: &str) -> Self {
                let upper = s.to_ascii_uppercase();
                match upper.as_str() {
                    $($keyword => IfcType::$variant,)*
                    _ => IfcType::Unknown(upper),
                }
            }

            /// STEP keyword of this type (e.g. `IFCWALL`)
            pub fn name(&self) -> &str {
                match self {
                    $(IfcType::$variant => $keyword,)*
                    IfcType::Unknown(s) => s,
                }
            }
        }
    };
}

ifc_types! {
    // Spatial structure
    IfcProject => "IFCPROJECT",
    IfcSite => "IFCSITE",
    IfcBuilding => "IFCBUILDING",
    IfcBuildingStorey => "IFCBUILDINGSTOREY",
    IfcSpace => "IFCSPACE",

    // Building elements
    IfcWall => "IFCWALL",
    IfcWallStandardCase => "IFCWALLSTANDARDCASE",
    IfcSlab => "IFCSLAB",
    IfcDoor => "IFCDOOR",
    IfcWindow => "IFCWINDOW",
    IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",

    // Openings
    IfcOpeningElement => "IFCOPENINGELEMENT",

    // Swept solids and profiles
    IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",
    IfcRectangleProfileDef => "IFCRECTANGLEPROFILEDEF",
    IfcArbitraryClosedProfileDef => "IFCARBITRARYCLOSEDPROFILEDEF",
    IfcArbitraryProfileDefWithVoids => "IFCARBITRARYPROFILEDEFWITHVOIDS",
    IfcPolyline => "IFCPOLYLINE",

    // Points, directions and placements
    IfcCartesianPoint => "IFCCARTESIANPOINT",
    IfcDirection => "IFCDIRECTION",
    IfcAxis2Placement2D => "IFCAXIS2PLACEMENT2D",
    IfcAxis2Placement3D => "IFCAXIS2PLACEMENT3D",
    IfcLocalPlacement => "IFCLOCALPLACEMENT",

    // Representations and contexts
    IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
    IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",
    IfcGeometricRepresentationContext => "IFCGEOMETRICREPRESENTATIONCONTEXT",
    IfcGeometricRepresentationSubContext => "IFCGEOMETRICREPRESENTATIONSUBCONTEXT",

    // Relationships
    IfcRelAggregates => "IFCRELAGGREGATES",
    IfcRelContainedInSpatialStructure => "IFCRELCONTAINEDINSPATIALSTRUCTURE",
    IfcRelVoidsElement => "IFCRELVOIDSELEMENT",
    IfcRelFillsElement => "IFCRELFILLSELEMENT",

    // Units
    IfcUnitAssignment => "IFCUNITASSIGNMENT",
    IfcSIUnit => "IFCSIUNIT",
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IfcType {
    /// Check if this type is a spatial structure element
    pub fn is_spatial(&self) -> bool {
        matches!(
            self,
            IfcType::IfcProject
                | IfcType::IfcSite
                | IfcType::IfcBuilding
                | IfcType::IfcBuildingStorey
                | IfcType::IfcSpace
        )
    }

    /// Check if this type is a physical element that may host or fill openings
    pub fn is_element(&self) -> bool {
        matches!(
            self,
            IfcType::IfcWall
                | IfcType::IfcWallStandardCase
                | IfcType::IfcSlab
                | IfcType::IfcDoor
                | IfcType::IfcWindow
                | IfcType::IfcBuildingElementProxy
                | IfcType::IfcOpeningElement
        )
    }

    /// Check if this type is an object that can carry a placement and a shape
    pub fn is_product(&self) -> bool {
        self.is_element() || (self.is_spatial() && *self != IfcType::IfcProject)
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

/// Attribute value
///
/// Represents any value that can appear in an IFC entity's attribute list,
/// whether it was built in memory or decoded from a file.
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
    /// String value (unescaped)
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCLABEL('text')
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// String attribute
    pub fn string(s: impl Into<String>) -> Self {
        AttributeValue::String(s.into())
    }

    /// Enumeration attribute, stored upper-case
    pub fn enumeration(s: impl AsRef<str>) -> Self {
        AttributeValue::Enum(s.as_ref().to_ascii_uppercase())
    }

    /// List of entity references
    pub fn refs(ids: impl IntoIterator<Item = EntityId>) -> Self {
        AttributeValue::List(ids.into_iter().map(AttributeValue::EntityRef).collect())
    }

    /// List of reals (coordinates, direction ratios)
    pub fn floats(values: &[f64]) -> Self {
        AttributeValue::List(values.iter().map(|v| AttributeValue::Float(*v)).collect())
    }

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
            _ => None,
        }
    }

    /// Try to get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Enum(s) => match s.as_str() {
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

    /// Try to get as a list of reals
    pub fn as_float_list(&self) -> Option<Vec<f64>> {
        self.as_list()?.iter().map(|v| v.as_float()).collect()
    }

    /// Entity references held by this value, recursing into lists
    pub fn referenced_ids(&self, out: &mut Vec<EntityId>) {
        match self {
            AttributeValue::EntityRef(id) => out.push(*id),
            AttributeValue::List(items) | AttributeValue::TypedValue(_, items) => {
                for item in items {
                    item.referenced_ids(out);
                }
            }
            _ => {}
        }
    }

    /// Check if this value mentions `id` anywhere
    pub fn references(&self, id: EntityId) -> bool {
        match self {
            AttributeValue::EntityRef(r) => *r == id,
            AttributeValue::List(items) | AttributeValue::TypedValue(_, items) => {
                items.iter().any(|item| item.references(id))
            }
            _ => false,
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

impl From<EntityId> for AttributeValue {
    fn from(id: EntityId) -> Self {
        AttributeValue::EntityRef(id)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

/// IFC entity instance
///
/// An entity with its ID, type, and positional attribute values.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Entity ID
    pub id: EntityId,
    /// Entity type
    pub ifc_type: IfcType,
    /// Attribute values in order
    pub attributes: Vec<AttributeValue>,
}

impl Entity {
    /// Create an entity from positional attributes
    pub fn new(id: EntityId, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> Self {
        Self {
            id,
            ifc_type,
            attributes,
        }
    }

    /// Get attribute at index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Replace attribute at index, returning false when out of range
    pub fn set(&mut self, index: usize, value: AttributeValue) -> bool {
        match self.attributes.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
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

    /// All entity references held by this entity
    pub fn referenced_ids(&self) -> Vec<EntityId> {
        let mut out = Vec::new();
        for attr in &self.attributes {
            attr.referenced_ids(&mut out);
        }
        out
    }

    /// Check if any attribute references `id`
    pub fn references(&self, id: EntityId) -> bool {
        self.attributes.iter().any(|a| a.references(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(IfcType::parse("IfcWall"), IfcType::IfcWall);
        assert_eq!(IfcType::parse("IFCWALL"), IfcType::IfcWall);
        assert_eq!(
            IfcType::parse("IfcRelVoidsElement"),
            IfcType::IfcRelVoidsElement
        );
    }

    #[test]
    fn test_name_round_trips_for_known_and_unknown() {
        assert_eq!(IfcType::IfcBuildingStorey.name(), "IFCBUILDINGSTOREY");
        let unknown = IfcType::parse("IfcFooBar");
        assert_eq!(unknown, IfcType::Unknown("IFCFOOBAR".to_string()));
        assert_eq!(unknown.name(), "IFCFOOBAR");
    }

    #[test]
    fn test_classification() {
        assert!(IfcType::IfcBuildingStorey.is_spatial());
        assert!(!IfcType::IfcWall.is_spatial());
        assert!(IfcType::IfcOpeningElement.is_element());
        assert!(IfcType::IfcSite.is_product());
        assert!(!IfcType::IfcProject.is_product());
    }

    #[test]
    fn test_entity_references() {
        let entity = Entity::new(
            EntityId(10),
            IfcType::IfcRelAggregates,
            vec![
                AttributeValue::string("guid"),
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
                EntityId(1).into(),
                AttributeValue::refs([EntityId(2), EntityId(3)]),
            ],
        );
        assert_eq!(entity.get_ref(4), Some(EntityId(1)));
        assert_eq!(entity.get_refs(5), Some(vec![EntityId(2), EntityId(3)]));
        assert!(entity.references(EntityId(3)));
        assert!(!entity.references(EntityId(4)));
        assert_eq!(
            entity.referenced_ids(),
            vec![EntityId(1), EntityId(2), EntityId(3)]
        );
    }

    #[test]
    fn test_float_list() {
        let v = AttributeValue::floats(&[1.0, 2.5, -3.0]);
        assert_eq!(v.as_float_list(), Some(vec![1.0, 2.5, -3.0]));
        assert_eq!(AttributeValue::string("x").as_float_list(), None);
    }
}
