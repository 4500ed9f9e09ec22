// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape representations and their assignment to products

use crate::context::ensure_context;
use crate::file::IfcFile;
use ifc_author_model::{AttributeValue, EntityId, EntityResolver, IfcType, ModelError, Result};

// IfcProduct.Representation
const REPRESENTATION: usize = 6;
// IfcProductDefinitionShape.Representations
const REPRESENTATIONS: usize = 2;

/// IfcShapeRepresentation of `items` in `context`
pub fn shape_representation(
    file: &mut IfcFile,
    context: EntityId,
    identifier: &str,
    representation_type: &str,
    items: &[EntityId],
) -> Result<EntityId> {
    ensure_context(file, context)?;
    if items.is_empty() {
        return Err(ModelError::invalid_argument(
            "a shape representation needs at least one item",
        ));
    }
    let representation = file.create(IfcType::IfcShapeRepresentation)?;
    file.set(representation, "ContextOfItems", context)?;
    file.set(representation, "RepresentationIdentifier", identifier)?;
    file.set(representation, "RepresentationType", representation_type)?;
    file.set(
        representation,
        "Items",
        AttributeValue::refs(items.iter().copied()),
    )?;
    Ok(representation)
}

/// Shape representations of a product
pub fn representations_of(resolver: &dyn EntityResolver, product: EntityId) -> Vec<EntityId> {
    resolver
        .get(product)
        .and_then(|p| p.get_ref(REPRESENTATION))
        .and_then(|shape| resolver.get(shape))
        .and_then(|shape| shape.get_refs(REPRESENTATIONS))
        .unwrap_or_default()
}

/// Attach `representation` to `product`
///
/// The product's IfcProductDefinitionShape is created on first use and
/// extended afterwards.
pub fn assign_representation(
    file: &mut IfcFile,
    product: EntityId,
    representation: EntityId,
) -> Result<EntityId> {
    let entity = file.entity(product)?;
    if !entity.ifc_type.is_product() {
        return Err(ModelError::type_mismatch(product, "IfcProduct", &entity.ifc_type));
    }
    let existing = entity.get_ref(REPRESENTATION);
    file.entity_of_type(representation, &IfcType::IfcShapeRepresentation)?;

    let shape = match existing {
        Some(shape) => {
            let mut list = file.entity(shape)?.get_refs(REPRESENTATIONS).unwrap_or_default();
            if !list.contains(&representation) {
                list.push(representation);
                file.set(shape, "Representations", AttributeValue::refs(list))?;
            }
            shape
        }
        None => {
            let shape = file.create(IfcType::IfcProductDefinitionShape)?;
            file.set(shape, "Representations", AttributeValue::refs([representation]))?;
            file.set(product, "Representation", shape)?;
            shape
        }
    };

    log::debug!("Assigned representation {} to {}", representation, product);
    Ok(shape)
}

/// Detach `representation` from `product`, deleting an emptied
/// IfcProductDefinitionShape
pub fn unassign_representation(
    file: &mut IfcFile,
    product: EntityId,
    representation: EntityId,
) -> Result<()> {
    let Some(shape) = file.entity(product)?.get_ref(REPRESENTATION) else {
        return Ok(());
    };
    let mut list = file.entity(shape)?.get_refs(REPRESENTATIONS).unwrap_or_default();
    list.retain(|r| *r != representation);
    if list.is_empty() {
        file.set(product, "Representation", AttributeValue::Null)?;
        file.remove(shape)?;
    } else {
        file.set(shape, "Representations", AttributeValue::refs(list))?;
    }
    Ok(())
}
