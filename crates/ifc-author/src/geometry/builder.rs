// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric resource instances: points, directions, axes, profiles and
//! extrusions

use crate::file::IfcFile;
use ifc_author_model::{AttributeValue, EntityId, IfcType, ModelError, Result};
use nalgebra::{Point2, Point3, Vector3};

pub fn cartesian_point_2d(file: &mut IfcFile, p: Point2<f64>) -> EntityId {
    file.create_with(
        IfcType::IfcCartesianPoint,
        vec![AttributeValue::floats(&[p.x, p.y])],
    )
}

pub fn cartesian_point_3d(file: &mut IfcFile, p: Point3<f64>) -> EntityId {
    file.create_with(
        IfcType::IfcCartesianPoint,
        vec![AttributeValue::floats(&[p.x, p.y, p.z])],
    )
}

/// IfcDirection from 2 or 3 ratios
pub fn direction(file: &mut IfcFile, ratios: &[f64]) -> Result<EntityId> {
    if !(2..=3).contains(&ratios.len()) || ratios.iter().all(|r| *r == 0.0) {
        return Err(ModelError::invalid_argument(format!(
            "invalid direction {:?}",
            ratios
        )));
    }
    Ok(file.create_with(IfcType::IfcDirection, vec![AttributeValue::floats(ratios)]))
}

/// IfcAxis2Placement3D; `axis` and `ref_direction` are omitted when `None`
pub fn axis2_placement_3d(
    file: &mut IfcFile,
    location: Point3<f64>,
    axis: Option<Vector3<f64>>,
    ref_direction: Option<Vector3<f64>>,
) -> Result<EntityId> {
    let location = cartesian_point_3d(file, location);
    let axis = match axis {
        Some(v) => direction(file, &[v.x, v.y, v.z])?.into(),
        None => AttributeValue::Null,
    };
    let ref_direction = match ref_direction {
        Some(v) => direction(file, &[v.x, v.y, v.z])?.into(),
        None => AttributeValue::Null,
    };
    Ok(file.create_with(
        IfcType::IfcAxis2Placement3D,
        vec![location.into(), axis, ref_direction],
    ))
}

/// IfcAxis2Placement2D without a reference direction
pub fn axis2_placement_2d(file: &mut IfcFile, location: Point2<f64>) -> EntityId {
    let location = cartesian_point_2d(file, location);
    file.create_with(
        IfcType::IfcAxis2Placement2D,
        vec![location.into(), AttributeValue::Null],
    )
}

/// Closed IfcPolyline through `points` (the first point is repeated at the end)
pub fn closed_polyline(file: &mut IfcFile, points: &[Point2<f64>]) -> Result<EntityId> {
    if points.len() < 3 {
        return Err(ModelError::invalid_argument(
            "a closed polyline needs at least three points",
        ));
    }
    let mut ids: Vec<EntityId> = points
        .iter()
        .map(|p| cartesian_point_2d(file, *p))
        .collect();
    ids.push(ids[0]);
    Ok(file.create_with(IfcType::IfcPolyline, vec![AttributeValue::refs(ids)]))
}

/// Axis-aligned rectangle corners, counter-clockwise from `min`
pub fn rectangle_points(min: Point2<f64>, max: Point2<f64>) -> Vec<Point2<f64>> {
    vec![
        min,
        Point2::new(min.x, max.y),
        max,
        Point2::new(max.x, min.y),
    ]
}

/// IfcArbitraryClosedProfileDef (AREA) bounded by `outer`
pub fn closed_profile(file: &mut IfcFile, outer: &[Point2<f64>]) -> Result<EntityId> {
    let curve = closed_polyline(file, outer)?;
    Ok(file.create_with(
        IfcType::IfcArbitraryClosedProfileDef,
        vec![
            AttributeValue::enumeration("AREA"),
            AttributeValue::Null,
            curve.into(),
        ],
    ))
}

/// IfcArbitraryProfileDefWithVoids (AREA)
pub fn profile_with_voids(
    file: &mut IfcFile,
    outer: &[Point2<f64>],
    inner: &[Vec<Point2<f64>>],
) -> Result<EntityId> {
    let curve = closed_polyline(file, outer)?;
    let mut voids = Vec::with_capacity(inner.len());
    for hole in inner {
        voids.push(closed_polyline(file, hole)?);
    }
    Ok(file.create_with(
        IfcType::IfcArbitraryProfileDefWithVoids,
        vec![
            AttributeValue::enumeration("AREA"),
            AttributeValue::Null,
            curve.into(),
            AttributeValue::refs(voids),
        ],
    ))
}

/// IfcRectangleProfileDef (AREA) centred on `centre`
pub fn rectangle_profile(
    file: &mut IfcFile,
    centre: Point2<f64>,
    x_dim: f64,
    y_dim: f64,
) -> Result<EntityId> {
    if x_dim <= 0.0 || y_dim <= 0.0 {
        return Err(ModelError::invalid_argument(format!(
            "rectangle {} x {} must have positive dimensions",
            x_dim, y_dim
        )));
    }
    let position = axis2_placement_2d(file, centre);
    Ok(file.create_with(
        IfcType::IfcRectangleProfileDef,
        vec![
            AttributeValue::enumeration("AREA"),
            AttributeValue::Null,
            position.into(),
            x_dim.into(),
            y_dim.into(),
        ],
    ))
}

/// IfcExtrudedAreaSolid along the position's local +Z
pub fn extruded_solid(
    file: &mut IfcFile,
    profile: EntityId,
    position: EntityId,
    depth: f64,
) -> Result<EntityId> {
    if depth <= 0.0 {
        return Err(ModelError::invalid_argument(format!(
            "extrusion depth {} must be positive",
            depth
        )));
    }
    let extrusion = direction(file, &[0.0, 0.0, 1.0])?;
    Ok(file.create_with(
        IfcType::IfcExtrudedAreaSolid,
        vec![profile.into(), position.into(), extrusion.into(), depth.into()],
    ))
}
