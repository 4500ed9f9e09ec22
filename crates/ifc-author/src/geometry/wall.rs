// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall bodies

use super::builder::{axis2_placement_3d, closed_profile, extruded_solid};
use super::representation::shape_representation;
use super::positive;
use crate::file::IfcFile;
use crate::unit::length_unit_scale;
use ifc_author_model::{EntityId, ModelError, Result};
use nalgebra::{Point2, Point3};

/// Straight wall extruded from its base line, dimensions in metres
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallShape {
    /// Along local +X
    pub length: f64,
    /// Along local +Z
    pub height: f64,
    /// Along local +Y
    pub thickness: f64,
    /// Shift of the footprint along local +Y
    pub offset: f64,
}

impl Default for WallShape {
    fn default() -> Self {
        Self {
            length: 1.0,
            height: 3.0,
            thickness: 0.2,
            offset: 0.0,
        }
    }
}

impl WallShape {
    pub fn new(length: f64, height: f64, thickness: f64) -> Self {
        Self {
            length,
            height,
            thickness,
            offset: 0.0,
        }
    }

    /// Footprint corners in the XY plane of the wall
    pub fn footprint(&self) -> [Point2<f64>; 4] {
        let (o, t, l) = (self.offset, self.thickness, self.length);
        [
            Point2::new(0.0, o),
            Point2::new(0.0, o + t),
            Point2::new(l, o + t),
            Point2::new(l, o),
        ]
    }
}

/// `Body`/`SweptSolid` shape of a wall: its footprint extruded upwards
pub fn add_wall_representation(
    file: &mut IfcFile,
    context: EntityId,
    shape: &WallShape,
) -> Result<EntityId> {
    positive("length", shape.length)?;
    positive("height", shape.height)?;
    positive("thickness", shape.thickness)?;
    if !shape.offset.is_finite() {
        return Err(ModelError::invalid_argument("wall offset must be finite"));
    }

    let scale = length_unit_scale(file);
    let points = shape.footprint().map(|p| p / scale);
    let profile = closed_profile(file, &points)?;
    let position = axis2_placement_3d(file, Point3::origin(), None, None)?;
    let solid = extruded_solid(file, profile, position, shape.height / scale)?;

    shape_representation(file, context, "Body", "SweptSolid", &[solid])
}
