// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial structure tree

use crate::{EntityId, IfcType};
use serde::{Deserialize, Serialize};

/// Type of spatial structure node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialNodeType {
    /// IfcProject - root of the hierarchy
    Project,
    /// IfcSite - geographic site
    Site,
    /// IfcBuilding - a building structure
    Building,
    /// IfcBuildingStorey - a floor/level
    Storey,
    /// IfcSpace - a room or area
    Space,
    /// IfcOpeningElement - a void cut into its parent element
    Opening,
    /// Building element (wall, door, etc.)
    Element,
}

impl SpatialNodeType {
    /// Human readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            SpatialNodeType::Project => "Project",
            SpatialNodeType::Site => "Site",
            SpatialNodeType::Building => "Building",
            SpatialNodeType::Storey => "Storey",
            SpatialNodeType::Space => "Space",
            SpatialNodeType::Opening => "Opening",
            SpatialNodeType::Element => "Element",
        }
    }

    /// Determine node type from IFC type
    pub fn from_ifc_type(ifc_type: &IfcType) -> Self {
        match ifc_type {
            IfcType::IfcProject => SpatialNodeType::Project,
            IfcType::IfcSite => SpatialNodeType::Site,
            IfcType::IfcBuilding => SpatialNodeType::Building,
            IfcType::IfcBuildingStorey => SpatialNodeType::Storey,
            IfcType::IfcSpace => SpatialNodeType::Space,
            IfcType::IfcOpeningElement => SpatialNodeType::Opening,
            _ => SpatialNodeType::Element,
        }
    }
}

/// Node in the spatial hierarchy tree
///
/// The tree follows Project → Site → Building → Storey → Elements. Below an
/// element come the openings voiding it, and below an opening the objects
/// aggregated into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialNode {
    /// Entity ID
    pub id: EntityId,
    /// Type of spatial node
    pub node_type: SpatialNodeType,
    /// Display name
    pub name: String,
    /// IFC entity type keyword (e.g., "IFCWALL")
    pub entity_type: String,
    /// Whether this entity has a representation
    pub has_geometry: bool,
    /// Whether this entity has an object placement
    pub has_placement: bool,
    /// Child nodes
    pub children: Vec<SpatialNode>,
}

impl SpatialNode {
    /// Create a new spatial node
    pub fn new(
        id: EntityId,
        node_type: SpatialNodeType,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            node_type,
            name: name.into(),
            entity_type: entity_type.into(),
            has_geometry: false,
            has_placement: false,
            children: Vec::new(),
        }
    }

    /// Set has_geometry flag
    pub fn with_geometry(mut self, has_geometry: bool) -> Self {
        self.has_geometry = has_geometry;
        self
    }

    /// Set has_placement flag
    pub fn with_placement(mut self, has_placement: bool) -> Self {
        self.has_placement = has_placement;
        self
    }

    /// Add a child node
    pub fn add_child(&mut self, child: SpatialNode) {
        self.children.push(child);
    }

    /// Get total element count below and including this node
    pub fn element_count(&self) -> usize {
        self.iter()
            .filter(|n| n.node_type == SpatialNodeType::Element)
            .count()
    }

    /// Find a node by ID (recursive)
    pub fn find(&self, id: EntityId) -> Option<&SpatialNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Find the first node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<&SpatialNode> {
        self.iter().find(|n| n.name == name)
    }

    /// Iterate all nodes (depth-first)
    pub fn iter(&self) -> SpatialNodeIter<'_> {
        SpatialNodeIter { stack: vec![self] }
    }

    /// Get all element IDs in this subtree
    pub fn element_ids(&self) -> Vec<EntityId> {
        self.iter()
            .filter(|n| n.node_type == SpatialNodeType::Element)
            .map(|n| n.id)
            .collect()
    }
}

/// Iterator over spatial nodes (depth-first)
pub struct SpatialNodeIter<'a> {
    stack: Vec<&'a SpatialNode>,
}

impl<'a> Iterator for SpatialNodeIter<'a> {
    type Item = &'a SpatialNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Add children in reverse order so first child is processed first
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SpatialNode {
        let mut storey = SpatialNode::new(
            EntityId(4),
            SpatialNodeType::Storey,
            "Ground Floor",
            "IFCBUILDINGSTOREY",
        );
        let mut wall = SpatialNode::new(EntityId(5), SpatialNodeType::Element, "wall1", "IFCWALL")
            .with_geometry(true);
        let mut opening = SpatialNode::new(
            EntityId(6),
            SpatialNodeType::Opening,
            "door_opening",
            "IFCOPENINGELEMENT",
        );
        opening.add_child(SpatialNode::new(
            EntityId(7),
            SpatialNodeType::Element,
            "mydoor",
            "IFCDOOR",
        ));
        wall.add_child(opening);
        storey.add_child(wall);
        storey
    }

    #[test]
    fn test_depth_first_order() {
        let tree = sample_tree();
        let ids: Vec<u32> = tree.iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_element_queries() {
        let tree = sample_tree();
        assert_eq!(tree.element_count(), 2);
        assert_eq!(tree.element_ids(), vec![EntityId(5), EntityId(7)]);
        assert_eq!(tree.find(EntityId(6)).map(|n| n.name.as_str()), Some("door_opening"));
        assert!(tree.find(EntityId(99)).is_none());
        assert_eq!(tree.find_by_name("mydoor").map(|n| n.id), Some(EntityId(7)));
    }

    #[test]
    fn test_node_type_mapping() {
        assert_eq!(
            SpatialNodeType::from_ifc_type(&IfcType::IfcOpeningElement),
            SpatialNodeType::Opening
        );
        assert_eq!(
            SpatialNodeType::from_ifc_type(&IfcType::IfcWindow),
            SpatialNodeType::Element
        );
        assert_eq!(SpatialNodeType::Storey.display_name(), "Storey");
    }
}
