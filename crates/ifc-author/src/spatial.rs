// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial containment

use crate::file::IfcFile;
use crate::geometry::placement::{object_placement, reparent_object_placement};
use crate::root::create_entity;
use ifc_author_model::{AttributeValue, EntityId, EntityResolver, IfcType, ModelError, Result};

// IfcRelContainedInSpatialStructure(..., RelatedElements, RelatingStructure)
const RELATED_ELEMENTS: usize = 4;
const RELATING_STRUCTURE: usize = 5;

/// Spatial structure element directly containing `product`
pub fn container_of(resolver: &dyn EntityResolver, product: EntityId) -> Option<EntityId> {
    resolver
        .entities_by_type(&IfcType::IfcRelContainedInSpatialStructure)
        .into_iter()
        .find(|rel| {
            rel.get_refs(RELATED_ELEMENTS)
                .is_some_and(|related| related.contains(&product))
        })
        .and_then(|rel| rel.get_ref(RELATING_STRUCTURE))
}

/// Elements directly contained in `structure`
pub fn contained_elements(resolver: &dyn EntityResolver, structure: EntityId) -> Vec<EntityId> {
    resolver
        .entities_by_type(&IfcType::IfcRelContainedInSpatialStructure)
        .into_iter()
        .filter(|rel| rel.get_ref(RELATING_STRUCTURE) == Some(structure))
        .flat_map(|rel| rel.get_refs(RELATED_ELEMENTS).unwrap_or_default())
        .collect()
}

/// Drop `product` from every containment relationship, deleting the ones
/// left empty
fn unassign_container(file: &mut IfcFile, product: EntityId) -> Result<()> {
    let rels: Vec<(EntityId, Vec<EntityId>)> = file
        .by_type(&IfcType::IfcRelContainedInSpatialStructure)
        .into_iter()
        .filter_map(|rel| {
            let related = rel.get_refs(RELATED_ELEMENTS)?;
            related.contains(&product).then_some((rel.id, related))
        })
        .collect();

    for (rel, mut related) in rels {
        related.retain(|id| *id != product);
        if related.is_empty() {
            file.remove(rel)?;
        } else {
            file.set(rel, "RelatedElements", AttributeValue::refs(related))?;
        }
    }
    Ok(())
}

/// Contain `product` in the spatial structure element `relating_structure`
///
/// The structure's existing containment relationship is extended when there
/// is one. When the structure has a placement, the product placement is
/// re-expressed relative to it without moving the product.
pub fn assign_container(
    file: &mut IfcFile,
    relating_structure: EntityId,
    product: EntityId,
) -> Result<EntityId> {
    let structure = file.entity(relating_structure)?;
    if !structure.ifc_type.is_spatial() || structure.ifc_type == IfcType::IfcProject {
        return Err(ModelError::type_mismatch(
            relating_structure,
            "IfcSpatialElement",
            &structure.ifc_type,
        ));
    }
    let element = file.entity(product)?;
    if !element.ifc_type.is_element() || element.ifc_type == IfcType::IfcOpeningElement {
        return Err(ModelError::type_mismatch(product, "IfcElement", &element.ifc_type));
    }

    if container_of(file, product) == Some(relating_structure) {
        return existing_relationship(file, relating_structure)
            .ok_or(ModelError::EntityNotFound(relating_structure));
    }
    unassign_container(file, product)?;

    let rel = match existing_relationship(file, relating_structure) {
        Some(rel) => {
            let mut related = file.entity(rel)?.get_refs(RELATED_ELEMENTS).unwrap_or_default();
            related.push(product);
            file.set(rel, "RelatedElements", AttributeValue::refs(related))?;
            rel
        }
        None => {
            let rel = create_entity(
                file,
                IfcType::IfcRelContainedInSpatialStructure,
                "",
                None,
            )?;
            file.set(rel, "Name", AttributeValue::Null)?;
            file.set(rel, "RelatedElements", AttributeValue::refs([product]))?;
            file.set(rel, "RelatingStructure", relating_structure)?;
            rel
        }
    };

    if let Some(parent) = object_placement(file, relating_structure) {
        reparent_object_placement(file, product, Some(parent))?;
    }

    log::debug!("Contained {} in {}", product, relating_structure);
    Ok(rel)
}

fn existing_relationship(file: &IfcFile, structure: EntityId) -> Option<EntityId> {
    file.by_type(&IfcType::IfcRelContainedInSpatialStructure)
        .into_iter()
        .find(|rel| rel.get_ref(RELATING_STRUCTURE) == Some(structure))
        .map(|rel| rel.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::placement::{edit_object_placement, product_world_matrix};
    use approx::assert_relative_eq;
    use nalgebra::{Matrix4, Vector3};

    struct Fixture {
        file: IfcFile,
        storey: EntityId,
        other: EntityId,
    }

    fn fixture() -> Fixture {
        let mut file = IfcFile::new();
        let storey =
            create_entity(&mut file, IfcType::IfcBuildingStorey, "Ground Floor", None).unwrap();
        let other =
            create_entity(&mut file, IfcType::IfcBuildingStorey, "First Floor", None).unwrap();
        Fixture {
            file,
            storey,
            other,
        }
    }

    #[test]
    fn test_relationship_is_shared() {
        let Fixture {
            mut file, storey, ..
        } = fixture();
        let a = create_entity(&mut file, IfcType::IfcWall, "wall1", None).unwrap();
        let b = create_entity(&mut file, IfcType::IfcWall, "wall2", None).unwrap();

        let rel_a = assign_container(&mut file, storey, a).unwrap();
        let rel_b = assign_container(&mut file, storey, b).unwrap();
        assert_eq!(rel_a, rel_b);
        assert_eq!(contained_elements(&file, storey), vec![a, b]);
        assert_eq!(container_of(&file, b), Some(storey));
        assert!(file.get(rel_a).unwrap().get(2).unwrap().is_null());

        // Assigning again is a no-op
        assert_eq!(assign_container(&mut file, storey, a).unwrap(), rel_a);
        assert_eq!(contained_elements(&file, storey).len(), 2);
    }

    #[test]
    fn test_moving_between_structures() {
        let Fixture {
            mut file,
            storey,
            other,
        } = fixture();
        let wall = create_entity(&mut file, IfcType::IfcWall, "wall1", None).unwrap();
        let first = assign_container(&mut file, storey, wall).unwrap();
        assign_container(&mut file, other, wall).unwrap();

        assert_eq!(container_of(&file, wall), Some(other));
        // The emptied relationship is gone
        assert!(file.get(first).is_none());
    }

    #[test]
    fn test_placement_follows_structure() {
        let Fixture {
            mut file, storey, ..
        } = fixture();
        let lift = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 3.0));
        edit_object_placement(&mut file, storey, Some(&lift), None).unwrap();

        let wall = create_entity(&mut file, IfcType::IfcWall, "wall1", None).unwrap();
        let at = Matrix4::new_translation(&Vector3::new(1.0, 0.0, 3.0));
        edit_object_placement(&mut file, wall, Some(&at), None).unwrap();
        assign_container(&mut file, storey, wall).unwrap();

        let local = file.get(object_placement(&file, wall).unwrap()).unwrap();
        assert_eq!(local.get_ref(0), object_placement(&file, storey));
        assert_relative_eq!(product_world_matrix(&file, wall).unwrap(), at, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_participants() {
        let Fixture {
            mut file, storey, ..
        } = fixture();
        let project = create_entity(&mut file, IfcType::IfcProject, "p", None).unwrap();
        let opening = create_entity(&mut file, IfcType::IfcOpeningElement, "o", None).unwrap();
        let wall = create_entity(&mut file, IfcType::IfcWall, "w", None).unwrap();

        assert!(assign_container(&mut file, project, wall).is_err());
        assert!(assign_container(&mut file, wall, storey).is_err());
        assert!(assign_container(&mut file, storey, opening).is_err());
    }
}
