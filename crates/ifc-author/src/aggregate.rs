// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decomposition (IfcRelAggregates)

use crate::file::IfcFile;
use crate::geometry::placement::{object_placement, reparent_object_placement};
use crate::root::create_entity;
use ifc_author_model::{AttributeValue, EntityId, EntityResolver, IfcType, ModelError, Result};

// IfcRelAggregates(..., RelatingObject, RelatedObjects)
const RELATING_OBJECT: usize = 4;
const RELATED_OBJECTS: usize = 5;

/// Whole that `product` is a part of
pub fn aggregate_of(resolver: &dyn EntityResolver, product: EntityId) -> Option<EntityId> {
    resolver
        .entities_by_type(&IfcType::IfcRelAggregates)
        .into_iter()
        .find(|rel| {
            rel.get_refs(RELATED_OBJECTS)
                .is_some_and(|related| related.contains(&product))
        })
        .and_then(|rel| rel.get_ref(RELATING_OBJECT))
}

/// Parts of `relating_object`, over all of its aggregates
pub fn parts_of(resolver: &dyn EntityResolver, relating_object: EntityId) -> Vec<EntityId> {
    resolver
        .entities_by_type(&IfcType::IfcRelAggregates)
        .into_iter()
        .filter(|rel| rel.get_ref(RELATING_OBJECT) == Some(relating_object))
        .flat_map(|rel| rel.get_refs(RELATED_OBJECTS).unwrap_or_default())
        .collect()
}

fn check_object(file: &IfcFile, id: EntityId) -> Result<()> {
    let entity = file.entity(id)?;
    if entity.ifc_type.is_spatial() || entity.ifc_type.is_product() {
        Ok(())
    } else {
        Err(ModelError::type_mismatch(id, "IfcObjectDefinition", &entity.ifc_type))
    }
}

/// Make `product` a part of `relating_object`
///
/// The relating object's aggregate is extended when it has one. A product
/// that is already part of another whole is moved, and an aggregate left
/// empty is deleted. When both have placements, the product placement is
/// re-expressed relative to the whole without moving it.
pub fn assign_object(
    file: &mut IfcFile,
    relating_object: EntityId,
    product: EntityId,
) -> Result<EntityId> {
    check_object(file, relating_object)?;
    check_object(file, product)?;
    if relating_object == product {
        return Err(ModelError::invalid_argument(format!(
            "{} cannot aggregate itself",
            product
        )));
    }
    if file.entity(product)?.ifc_type == IfcType::IfcProject {
        return Err(ModelError::invalid_argument("IfcProject cannot be a part"));
    }

    let existing = file
        .by_type(&IfcType::IfcRelAggregates)
        .into_iter()
        .find(|rel| rel.get_ref(RELATING_OBJECT) == Some(relating_object))
        .map(|rel| rel.id);

    // Leave any other whole
    let previous: Vec<(EntityId, Vec<EntityId>)> = file
        .by_type(&IfcType::IfcRelAggregates)
        .into_iter()
        .filter(|rel| Some(rel.id) != existing)
        .filter_map(|rel| {
            let related = rel.get_refs(RELATED_OBJECTS)?;
            related.contains(&product).then_some((rel.id, related))
        })
        .collect();
    for (rel, mut related) in previous {
        related.retain(|id| *id != product);
        if related.is_empty() {
            file.remove(rel)?;
        } else {
            file.set(rel, "RelatedObjects", AttributeValue::refs(related))?;
        }
    }

    let rel = match existing {
        Some(rel) => {
            let mut related = file.entity(rel)?.get_refs(RELATED_OBJECTS).unwrap_or_default();
            if !related.contains(&product) {
                related.push(product);
                file.set(rel, "RelatedObjects", AttributeValue::refs(related))?;
            }
            rel
        }
        None => {
            let rel = create_entity(file, IfcType::IfcRelAggregates, "", None)?;
            file.set(rel, "Name", AttributeValue::Null)?;
            file.set(rel, "RelatingObject", relating_object)?;
            file.set(rel, "RelatedObjects", AttributeValue::refs([product]))?;
            rel
        }
    };

    if let Some(parent) = object_placement(file, relating_object) {
        reparent_object_placement(file, product, Some(parent))?;
    }

    log::debug!("Aggregated {} into {}", product, relating_object);
    Ok(rel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::placement::{edit_object_placement, product_world_matrix};
    use approx::assert_relative_eq;
    use nalgebra::{Matrix4, Vector3};

    fn hierarchy() -> (IfcFile, EntityId, EntityId, EntityId) {
        let mut file = IfcFile::new();
        let project = create_entity(&mut file, IfcType::IfcProject, "My Project", None).unwrap();
        let site = create_entity(&mut file, IfcType::IfcSite, "My Site", None).unwrap();
        let building = create_entity(&mut file, IfcType::IfcBuilding, "Building A", None).unwrap();
        (file, project, site, building)
    }

    #[test]
    fn test_spatial_decomposition() {
        let (mut file, project, site, building) = hierarchy();
        let first = assign_object(&mut file, project, site).unwrap();
        let second = assign_object(&mut file, site, building).unwrap();
        assert_ne!(first, second);

        let rel = file.get(first).unwrap();
        assert_eq!(rel.get_ref(RELATING_OBJECT), Some(project));
        assert_eq!(rel.get_refs(RELATED_OBJECTS), Some(vec![site]));
        assert_eq!(rel.get_string(0).map(str::len), Some(22));
        assert_eq!(aggregate_of(&file, building), Some(site));
    }

    #[test]
    fn test_aggregate_is_extended() {
        let (mut file, _, site, building) = hierarchy();
        let other = create_entity(&mut file, IfcType::IfcBuilding, "Building B", None).unwrap();
        let a = assign_object(&mut file, site, building).unwrap();
        let b = assign_object(&mut file, site, other).unwrap();
        assert_eq!(a, b);
        assert_eq!(parts_of(&file, site), vec![building, other]);

        // Repeated assignment keeps a single entry
        assign_object(&mut file, site, other).unwrap();
        assert_eq!(parts_of(&file, site).len(), 2);
    }

    #[test]
    fn test_part_moves_between_wholes() {
        let (mut file, _, site, building) = hierarchy();
        let storey =
            create_entity(&mut file, IfcType::IfcBuildingStorey, "Ground Floor", None).unwrap();
        let old = assign_object(&mut file, site, storey).unwrap();
        assign_object(&mut file, building, storey).unwrap();

        assert_eq!(aggregate_of(&file, storey), Some(building));
        assert!(file.get(old).is_none());
    }

    #[test]
    fn test_part_keeps_world_position() {
        let (mut file, _, site, building) = hierarchy();
        let offset = Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0));
        edit_object_placement(&mut file, site, Some(&offset), None).unwrap();
        let at = Matrix4::new_translation(&Vector3::new(12.0, 1.0, 0.0));
        edit_object_placement(&mut file, building, Some(&at), None).unwrap();

        assign_object(&mut file, site, building).unwrap();
        let local = file.get(object_placement(&file, building).unwrap()).unwrap();
        assert_eq!(local.get_ref(0), object_placement(&file, site));
        assert_relative_eq!(product_world_matrix(&file, building).unwrap(), at, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_parts() {
        let (mut file, project, site, _) = hierarchy();
        assert!(assign_object(&mut file, site, site).is_err());
        assert!(assign_object(&mut file, site, project).is_err());
        let point = file.create(IfcType::IfcCartesianPoint).unwrap();
        assert!(assign_object(&mut file, point, site).is_err());
    }
}
