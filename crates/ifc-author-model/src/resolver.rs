// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity resolution trait for looking up and resolving IFC entities

use crate::{AttributeValue, Entity, EntityId, IfcType};

/// Entity lookup and reference resolution
///
/// Implemented by the in-memory authoring file and by models decoded from a
/// STEP file, so the same queries (units, placements, summaries) run on both.
///
/// # Example
///
/// ```ignore
/// use ifc_author_model::{EntityResolver, IfcType};
///
/// fn wall_names(resolver: &dyn EntityResolver) -> Vec<String> {
///     resolver
///         .entities_by_type(&IfcType::IfcWall)
///         .iter()
///         .filter_map(|wall| wall.get_string(2).map(str::to_string))
///         .collect()
/// }
/// ```
pub trait EntityResolver {
    /// Get entity by ID
    fn get(&self, id: EntityId) -> Option<&Entity>;

    /// Get all entities of a specific type, in ID order
    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<&Entity>;

    /// All entities, in ID order
    fn all_entities(&self) -> Vec<&Entity>;

    /// Total number of entities
    fn entity_count(&self) -> usize;

    /// Resolve an entity reference from an attribute value
    fn resolve_ref(&self, attr: &AttributeValue) -> Option<&Entity> {
        match attr {
            AttributeValue::EntityRef(id) => self.get(*id),
            _ => None,
        }
    }

    /// Resolve a list of entity references, skipping anything that is not one
    fn resolve_ref_list(&self, attr: &AttributeValue) -> Vec<&Entity> {
        match attr {
            AttributeValue::List(items) => items
                .iter()
                .filter_map(|item| self.resolve_ref(item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Find entities by type name (case-insensitive)
    fn find_by_type_name(&self, type_name: &str) -> Vec<&Entity> {
        self.entities_by_type(&IfcType::parse(type_name))
    }
}
