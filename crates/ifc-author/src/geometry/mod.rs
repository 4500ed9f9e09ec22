// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Geometry authoring
//!
//! Placements, shape representations and the parametric bodies of walls,
//! doors and windows.
//!
//! Every body is a `Body`/`SweptSolid` IfcShapeRepresentation made of
//! IfcExtrudedAreaSolid items. Walls and openings are extruded upwards from
//! their footprint. Doors and windows are drawn in their elevation plane
//! (profile Y is world up) and extruded through the wall thickness.
//!
//! Dimensions are given in metres and written in the project length unit.

pub mod builder;
pub mod door;
pub mod placement;
pub mod representation;
pub mod wall;
pub mod window;

pub use door::{add_door_representation, DoorShape};
pub use placement::{
    edit_object_placement, object_placement, product_world_matrix, relative_matrix,
    reparent_object_placement, world_matrix,
};
pub use representation::{
    assign_representation, representations_of, shape_representation, unassign_representation,
};
pub use wall::{add_wall_representation, WallShape};
pub use window::{add_window_representation, WindowShape};

use crate::file::IfcFile;
use ifc_author_model::{EntityId, ModelError, Result};
use nalgebra::{Point3, Vector3};

pub(crate) fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::invalid_argument(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

/// Position of an elevation profile: profile X along +X, profile Y along +Z,
/// extruded along -Y starting at `y`
pub(crate) fn elevation_position(file: &mut IfcFile, y: f64) -> Result<EntityId> {
    builder::axis2_placement_3d(
        file,
        Point3::new(0.0, y, 0.0),
        Some(-Vector3::y()),
        Some(Vector3::x()),
    )
}
