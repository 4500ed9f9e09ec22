// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Openings and their fillings

use crate::file::IfcFile;
use crate::geometry::placement::{object_placement, reparent_object_placement};
use crate::root::create_entity;
use ifc_author_model::{AttributeValue, EntityId, EntityResolver, IfcType, ModelError, Result};

// IfcRelVoidsElement(..., RelatingBuildingElement, RelatedOpeningElement)
// IfcRelFillsElement(..., RelatingOpeningElement, RelatedBuildingElement)
const RELATING: usize = 4;
const RELATED: usize = 5;

fn relationship_with(
    resolver: &dyn EntityResolver,
    class: &IfcType,
    index: usize,
    id: EntityId,
) -> Option<EntityId> {
    resolver
        .entities_by_type(class)
        .into_iter()
        .find(|rel| rel.get_ref(index) == Some(id))
        .map(|rel| rel.id)
}

/// Element voided by `opening`
pub fn voided_element(resolver: &dyn EntityResolver, opening: EntityId) -> Option<EntityId> {
    let rel = relationship_with(resolver, &IfcType::IfcRelVoidsElement, RELATED, opening)?;
    resolver.get(rel)?.get_ref(RELATING)
}

/// Openings cut into `element`
pub fn openings_of(resolver: &dyn EntityResolver, element: EntityId) -> Vec<EntityId> {
    resolver
        .entities_by_type(&IfcType::IfcRelVoidsElement)
        .into_iter()
        .filter(|rel| rel.get_ref(RELATING) == Some(element))
        .filter_map(|rel| rel.get_ref(RELATED))
        .collect()
}

fn check_opening(file: &IfcFile, opening: EntityId) -> Result<()> {
    let entity = file.entity(opening)?;
    if entity.ifc_type != IfcType::IfcOpeningElement {
        return Err(ModelError::type_mismatch(
            opening,
            IfcType::IfcOpeningElement.name(),
            &entity.ifc_type,
        ));
    }
    Ok(())
}

fn check_element(file: &IfcFile, element: EntityId) -> Result<()> {
    let entity = file.entity(element)?;
    if !entity.ifc_type.is_element() || entity.ifc_type == IfcType::IfcOpeningElement {
        return Err(ModelError::type_mismatch(element, "IfcElement", &entity.ifc_type));
    }
    Ok(())
}

/// Cut `opening` into `element`
///
/// The opening placement is re-expressed relative to the element's placement
/// without moving it. An opening voids at most one element.
pub fn add_opening(file: &mut IfcFile, opening: EntityId, element: EntityId) -> Result<EntityId> {
    check_opening(file, opening)?;
    check_element(file, element)?;

    if let Some(rel) = relationship_with(file, &IfcType::IfcRelVoidsElement, RELATED, opening) {
        let current = file.entity(rel)?.get_ref(RELATING);
        if current == Some(element) {
            return Ok(rel);
        }
        return Err(ModelError::invalid_argument(format!(
            "{} already voids {}",
            opening,
            current.map(|c| c.to_string()).unwrap_or_else(|| "$".to_string())
        )));
    }

    let rel = create_entity(file, IfcType::IfcRelVoidsElement, "", None)?;
    file.set(rel, "Name", AttributeValue::Null)?;
    file.set(rel, "RelatingBuildingElement", element)?;
    file.set(rel, "RelatedOpeningElement", opening)?;

    if let Some(parent) = object_placement(file, element) {
        reparent_object_placement(file, opening, Some(parent))?;
    }

    log::debug!("Opening {} voids {}", opening, element);
    Ok(rel)
}

/// Remove the void relationship of `opening`, keeping the opening itself
pub fn remove_opening(file: &mut IfcFile, opening: EntityId) -> Result<()> {
    check_opening(file, opening)?;
    if let Some(rel) = relationship_with(file, &IfcType::IfcRelVoidsElement, RELATED, opening) {
        file.remove(rel)?;
        reparent_object_placement(file, opening, None)?;
    }
    Ok(())
}

/// Fill `opening` with `element` (typically a door or window)
///
/// An element fills at most one opening; filling it again moves it.
pub fn add_filling(file: &mut IfcFile, opening: EntityId, element: EntityId) -> Result<EntityId> {
    check_opening(file, opening)?;
    check_element(file, element)?;

    if let Some(rel) = relationship_with(file, &IfcType::IfcRelFillsElement, RELATED, element) {
        if file.entity(rel)?.get_ref(RELATING) == Some(opening) {
            return Ok(rel);
        }
        file.remove(rel)?;
    }

    let rel = create_entity(file, IfcType::IfcRelFillsElement, "", None)?;
    file.set(rel, "Name", AttributeValue::Null)?;
    file.set(rel, "RelatingOpeningElement", opening)?;
    file.set(rel, "RelatedBuildingElement", element)?;

    log::debug!("{} fills opening {}", element, opening);
    Ok(rel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::placement::{edit_object_placement, product_world_matrix};
    use approx::assert_relative_eq;
    use nalgebra::{Matrix4, Vector3};

    fn wall_and_opening(file: &mut IfcFile) -> (EntityId, EntityId) {
        let wall = create_entity(file, IfcType::IfcWall, "wall1", None).unwrap();
        let opening =
            create_entity(file, IfcType::IfcOpeningElement, "door_opening", None).unwrap();
        (wall, opening)
    }

    #[test]
    fn test_opening_follows_wall_placement() {
        let mut file = IfcFile::new();
        let (wall, opening) = wall_and_opening(&mut file);
        let rotated = Matrix4::new(
            0.0, -1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        );
        edit_object_placement(&mut file, wall, Some(&rotated), None).unwrap();
        let at = Matrix4::new_translation(&Vector3::new(0.0, 2.0, 1.5)) * rotated;
        edit_object_placement(&mut file, opening, Some(&at), None).unwrap();

        let rel = add_opening(&mut file, opening, wall).unwrap();
        assert_eq!(voided_element(&file, opening), Some(wall));
        assert_eq!(openings_of(&file, wall), vec![opening]);
        assert_eq!(file.get(rel).unwrap().get_string(0).map(str::len), Some(22));

        let local = file.get(object_placement(&file, opening).unwrap()).unwrap();
        assert_eq!(local.get_ref(0), object_placement(&file, wall));
        assert_relative_eq!(product_world_matrix(&file, opening).unwrap(), at, epsilon = 1e-12);
    }

    #[test]
    fn test_opening_voids_one_element() {
        let mut file = IfcFile::new();
        let (wall, opening) = wall_and_opening(&mut file);
        let other = create_entity(&mut file, IfcType::IfcWall, "wall2", None).unwrap();

        let rel = add_opening(&mut file, opening, wall).unwrap();
        assert_eq!(add_opening(&mut file, opening, wall).unwrap(), rel);
        assert!(add_opening(&mut file, opening, other).is_err());

        remove_opening(&mut file, opening).unwrap();
        assert_eq!(voided_element(&file, opening), None);
        assert!(file.get(opening).is_some());
    }

    #[test]
    fn test_invalid_participants() {
        let mut file = IfcFile::new();
        let (wall, opening) = wall_and_opening(&mut file);
        let storey = create_entity(&mut file, IfcType::IfcBuildingStorey, "s", None).unwrap();

        assert!(add_opening(&mut file, wall, wall).is_err());
        assert!(add_opening(&mut file, opening, storey).is_err());
        assert!(add_opening(&mut file, opening, opening).is_err());
    }

    #[test]
    fn test_filling_moves_between_openings() {
        let mut file = IfcFile::new();
        let (_, opening) = wall_and_opening(&mut file);
        let second = create_entity(&mut file, IfcType::IfcOpeningElement, "o2", None).unwrap();
        let door = create_entity(&mut file, IfcType::IfcDoor, "mydoor", None).unwrap();

        let first = add_filling(&mut file, opening, door).unwrap();
        assert_eq!(add_filling(&mut file, opening, door).unwrap(), first);
        add_filling(&mut file, second, door).unwrap();

        assert!(file.get(first).is_none());
        let fills = file.by_type(&IfcType::IfcRelFillsElement);
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].get_ref(RELATING), Some(second));
    }
}
