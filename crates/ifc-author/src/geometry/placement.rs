// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object placements
//!
//! Products are positioned by chains of IfcLocalPlacement. Every matrix here
//! is a 4x4 affine transform in project length units; callers of
//! [`edit_object_placement`] pass the world transform in metres.

use super::builder::axis2_placement_3d;
use crate::file::IfcFile;
use crate::spatial::container_of;
use crate::unit::length_unit_scale;
use ifc_author_model::{
    AttributeValue, Entity, EntityId, EntityResolver, IfcType, ModelError, Result,
};
use nalgebra::{Matrix4, Point3, Vector3};

const MAX_PLACEMENT_DEPTH: usize = 64;
const SNAP_EPSILON: f64 = 1e-12;

// IfcProduct.ObjectPlacement
const OBJECT_PLACEMENT: usize = 5;

/// Copy of `m` with the bottom row forced to `0 0 0 1`
pub fn affine(m: &Matrix4<f64>) -> Matrix4<f64> {
    let mut out = *m;
    out[(3, 0)] = 0.0;
    out[(3, 1)] = 0.0;
    out[(3, 2)] = 0.0;
    out[(3, 3)] = 1.0;
    out
}

fn point(resolver: &dyn EntityResolver, id: EntityId) -> Option<Point3<f64>> {
    let point = resolver.get(id)?;
    if point.ifc_type != IfcType::IfcCartesianPoint {
        return None;
    }
    let coords = point.get(0)?.as_list()?;
    let x = coords.first().and_then(|v| v.as_float()).unwrap_or(0.0);
    let y = coords.get(1).and_then(|v| v.as_float()).unwrap_or(0.0);
    let z = coords.get(2).and_then(|v| v.as_float()).unwrap_or(0.0);
    Some(Point3::new(x, y, z))
}

fn direction(resolver: &dyn EntityResolver, id: EntityId) -> Option<Vector3<f64>> {
    let direction = resolver.get(id)?;
    if direction.ifc_type != IfcType::IfcDirection {
        return None;
    }
    let ratios = direction.get(0)?.as_list()?;
    let x = ratios.first().and_then(|v| v.as_float()).unwrap_or(0.0);
    let y = ratios.get(1).and_then(|v| v.as_float()).unwrap_or(0.0);
    let z = ratios.get(2).and_then(|v| v.as_float()).unwrap_or(0.0);
    Some(Vector3::new(x, y, z))
}

/// Transform of an IfcAxis2Placement3D
pub fn axis_placement_matrix(resolver: &dyn EntityResolver, id: EntityId) -> Option<Matrix4<f64>> {
    let placement = resolver.get(id)?;
    if placement.ifc_type != IfcType::IfcAxis2Placement3D {
        return None;
    }

    let location = point(resolver, placement.get_ref(0)?)?;
    let axis = placement
        .get_ref(1)
        .and_then(|d| direction(resolver, d))
        .unwrap_or_else(Vector3::z);
    let ref_dir = placement
        .get_ref(2)
        .and_then(|d| direction(resolver, d))
        .unwrap_or_else(Vector3::x);

    // Orthonormal basis with Z = Axis and X projected from RefDirection
    let z = axis.normalize();
    let x = ref_dir.normalize();
    let y = z.cross(&x).normalize();
    let x = y.cross(&z).normalize();

    Some(Matrix4::new(
        x.x, y.x, z.x, location.x, x.y, y.y, z.y, location.y, x.z, y.z, z.z, location.z, 0.0,
        0.0, 0.0, 1.0,
    ))
}

/// World transform of an IfcLocalPlacement, composing its parents
pub fn world_matrix(resolver: &dyn EntityResolver, placement: EntityId) -> Result<Matrix4<f64>> {
    let mut matrix = Matrix4::identity();
    let mut current = Some(placement);
    let mut depth = 0;

    while let Some(id) = current {
        depth += 1;
        if depth > MAX_PLACEMENT_DEPTH {
            return Err(ModelError::invalid_argument(format!(
                "placement chain of {} is cyclic or too deep",
                placement
            )));
        }
        let local = local_placement(resolver, id)?;
        let relative = local
            .get_ref(1)
            .and_then(|axis| axis_placement_matrix(resolver, axis))
            .ok_or_else(|| {
                ModelError::entity_parse(id, "RelativePlacement is not an IfcAxis2Placement3D")
            })?;
        matrix = relative * matrix;
        current = local.get_ref(0);
    }
    Ok(matrix)
}

fn local_placement(resolver: &dyn EntityResolver, id: EntityId) -> Result<&Entity> {
    let entity = resolver.get(id).ok_or(ModelError::EntityNotFound(id))?;
    if entity.ifc_type != IfcType::IfcLocalPlacement {
        return Err(ModelError::type_mismatch(
            id,
            IfcType::IfcLocalPlacement.name(),
            &entity.ifc_type,
        ));
    }
    Ok(entity)
}

/// ObjectPlacement of a product, if any
pub fn object_placement(resolver: &dyn EntityResolver, product: EntityId) -> Option<EntityId> {
    let entity = resolver.get(product)?;
    if !entity.ifc_type.is_product() {
        return None;
    }
    entity.get_ref(OBJECT_PLACEMENT)
}

/// World transform of a product, identity when it has no placement
pub fn product_world_matrix(
    resolver: &dyn EntityResolver,
    product: EntityId,
) -> Result<Matrix4<f64>> {
    match object_placement(resolver, product) {
        Some(placement) => world_matrix(resolver, placement),
        None => Ok(Matrix4::identity()),
    }
}

/// Placement of `product` relative to the placement of `relative_to`
pub fn relative_matrix(
    resolver: &dyn EntityResolver,
    product: EntityId,
    relative_to: EntityId,
) -> Result<Matrix4<f64>> {
    let parent = product_world_matrix(resolver, relative_to)?;
    let child = product_world_matrix(resolver, product)?;
    invert(&parent, relative_to).map(|inv| inv * child)
}

fn invert(m: &Matrix4<f64>, owner: EntityId) -> Result<Matrix4<f64>> {
    affine(m).try_inverse().ok_or_else(|| {
        ModelError::invalid_argument(format!("placement of {} is not invertible", owner))
    })
}

fn snap(v: f64) -> f64 {
    if v.abs() < SNAP_EPSILON {
        0.0
    } else {
        v
    }
}

/// IfcAxis2Placement3D for a local transform: Location from the translation,
/// Axis from the third column and RefDirection from the first
fn write_axis_placement(file: &mut IfcFile, local: &Matrix4<f64>) -> Result<EntityId> {
    if local.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::invalid_argument("placement matrix is not finite"));
    }
    let column = |c: usize| Vector3::new(local[(0, c)], local[(1, c)], local[(2, c)]).map(snap);

    let axis = column(2);
    let ref_direction = column(0);
    if axis.norm() < SNAP_EPSILON || ref_direction.norm() < SNAP_EPSILON {
        return Err(ModelError::invalid_argument(
            "placement matrix has a degenerate rotation",
        ));
    }
    if axis.normalize().cross(&ref_direction.normalize()).norm() < 1e-9 {
        return Err(ModelError::invalid_argument(
            "placement Axis and RefDirection are parallel",
        ));
    }

    let location = column(3);
    axis2_placement_3d(
        file,
        Point3::from(location),
        Some(axis.normalize().map(snap)),
        Some(ref_direction.normalize().map(snap)),
    )
}

fn is_within(resolver: &dyn EntityResolver, placement: EntityId, ancestor: EntityId) -> bool {
    let mut current = Some(placement);
    let mut depth = 0;
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        depth += 1;
        if depth > MAX_PLACEMENT_DEPTH {
            return true;
        }
        current = resolver.get(id).and_then(|e| e.get_ref(0));
    }
    false
}

/// Rewrite an existing local placement so it hangs off `parent` while
/// keeping `world` as its world transform
fn relocate(
    file: &mut IfcFile,
    placement: EntityId,
    parent: Option<EntityId>,
    world: &Matrix4<f64>,
) -> Result<()> {
    if let Some(parent) = parent {
        if is_within(file, parent, placement) {
            return Err(ModelError::invalid_argument(format!(
                "{} cannot be placed relative to its own descendant {}",
                placement, parent
            )));
        }
    }
    let parent_world = match parent {
        Some(p) => world_matrix(file, p)?,
        None => Matrix4::identity(),
    };
    let local = invert(&parent_world, placement)? * world;
    let axis = write_axis_placement(file, &local)?;

    let old_axis = file.entity(placement)?.get_ref(1);
    file.set(
        placement,
        "PlacementRelTo",
        parent.map(AttributeValue::EntityRef).unwrap_or_default(),
    )?;
    file.set(placement, "RelativePlacement", axis)?;
    if let Some(old_axis) = old_axis {
        file.remove_unreferenced(old_axis)?;
    }
    Ok(())
}

/// Re-express a product's placement relative to `parent`, keeping its
/// world position. Products without a placement are left alone.
pub fn reparent_object_placement(
    file: &mut IfcFile,
    product: EntityId,
    parent: Option<EntityId>,
) -> Result<()> {
    let Some(placement) = object_placement(file, product) else {
        return Ok(());
    };
    if file.entity(placement)?.get_ref(0) == parent {
        return Ok(());
    }
    let world = world_matrix(file, placement)?;
    relocate(file, placement, parent, &world)?;
    log::debug!(
        "Placement of {} now relative to {}",
        product,
        parent.map(|p| p.to_string()).unwrap_or_else(|| "world".to_string())
    );
    Ok(())
}

/// Place a product at `matrix` (world transform in metres, identity when
/// `None`; the bottom row is ignored)
///
/// The new IfcLocalPlacement is relative to `relative_to`'s placement,
/// otherwise to the placement of the product's spatial container, otherwise
/// to the parent of its current placement. Placements of other objects that
/// were relative to the replaced one keep their world position.
pub fn edit_object_placement(
    file: &mut IfcFile,
    product: EntityId,
    matrix: Option<&Matrix4<f64>>,
    relative_to: Option<EntityId>,
) -> Result<EntityId> {
    let entity = file.entity(product)?;
    if !entity.ifc_type.is_product() {
        return Err(ModelError::type_mismatch(product, "IfcProduct", &entity.ifc_type));
    }
    let old = entity.get_ref(OBJECT_PLACEMENT);

    let mut world = affine(&matrix.copied().unwrap_or_else(Matrix4::identity));
    let scale = length_unit_scale(file);
    for row in 0..3 {
        world[(row, 3)] /= scale;
    }

    let parent = match relative_to {
        Some(other) => {
            file.entity(other)?;
            object_placement(file, other)
        }
        None => match container_of(file, product).and_then(|s| object_placement(file, s)) {
            Some(p) => Some(p),
            None => old.and_then(|p| file.get(p).and_then(|e| e.get_ref(0))),
        },
    };
    if let (Some(parent), Some(old)) = (parent, old) {
        if parent == old || is_within(file, parent, old) {
            return Err(ModelError::invalid_argument(format!(
                "{} cannot be placed relative to itself",
                product
            )));
        }
    }

    // Children of the replaced placement, with their current world transform
    let mut children = Vec::new();
    if let Some(old) = old {
        for child in file.by_type(&IfcType::IfcLocalPlacement) {
            if child.get_ref(0) == Some(old) {
                children.push(child.id);
            }
        }
    }
    let children: Vec<(EntityId, Matrix4<f64>)> = children
        .into_iter()
        .map(|c| world_matrix(file, c).map(|w| (c, w)))
        .collect::<Result<_>>()?;

    let parent_world = match parent {
        Some(p) => world_matrix(file, p)?,
        None => Matrix4::identity(),
    };
    let local = invert(&parent_world, product)? * world;
    let axis = write_axis_placement(file, &local)?;
    let placement = file.create_with(
        IfcType::IfcLocalPlacement,
        vec![
            parent.map(AttributeValue::EntityRef).unwrap_or_default(),
            axis.into(),
        ],
    );
    file.set(product, "ObjectPlacement", placement)?;

    for (child, child_world) in &children {
        relocate(file, *child, Some(placement), child_world)?;
    }
    if let Some(old) = old {
        file.remove_unreferenced(old)?;
    }

    log::debug!("Placed {} with {}", product, placement);
    Ok(placement)
}
