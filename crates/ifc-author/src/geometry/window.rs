// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window bodies: a rectangular frame and one glazing pane

use super::builder::{extruded_solid, profile_with_voids, rectangle_points, rectangle_profile};
use super::representation::shape_representation;
use super::{elevation_position, positive};
use crate::file::IfcFile;
use crate::unit::length_unit_scale;
use ifc_author_model::{EntityId, ModelError, Result};
use nalgebra::Point2;

/// Depth of the glazing pane in metres
pub const GLAZING_THICKNESS: f64 = 0.01;

/// Single-pane window, dimensions in metres
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowShape {
    pub width: f64,
    pub height: f64,
    /// Depth of the frame through the wall
    pub thickness: f64,
    /// Width of the frame members
    pub lining_thickness: f64,
}

impl Default for WindowShape {
    fn default() -> Self {
        Self {
            width: 0.6,
            height: 0.9,
            thickness: 0.05,
            lining_thickness: 0.05,
        }
    }
}

impl WindowShape {
    /// Default-sized window of the given depth
    pub fn with_thickness(thickness: f64) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        positive("window width", self.width)?;
        positive("window height", self.height)?;
        positive("window thickness", self.thickness)?;
        positive("window lining thickness", self.lining_thickness)?;
        let frame = self.lining_thickness * 2.0;
        if frame >= self.width || frame >= self.height {
            return Err(ModelError::invalid_argument(format!(
                "window lining {} leaves no room for glazing in {} x {}",
                self.lining_thickness, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// `Body`/`SweptSolid` shape of a window
///
/// The frame spans the full thickness; the glazing sits in its middle.
pub fn add_window_representation(
    file: &mut IfcFile,
    context: EntityId,
    shape: &WindowShape,
) -> Result<EntityId> {
    shape.validate()?;
    let scale = length_unit_scale(file);
    let (w, h, t, l) = (
        shape.width / scale,
        shape.height / scale,
        shape.thickness / scale,
        shape.lining_thickness / scale,
    );

    let outer = rectangle_points(Point2::origin(), Point2::new(w, h));
    let inner = rectangle_points(Point2::new(l, l), Point2::new(w - l, h - l));
    let frame_profile = profile_with_voids(file, &outer, &[inner])?;
    let frame_position = elevation_position(file, t)?;
    let frame = extruded_solid(file, frame_profile, frame_position, t)?;

    let glazing_depth = (GLAZING_THICKNESS / scale).min(t / 2.0);
    let glazing_profile =
        rectangle_profile(file, Point2::new(w / 2.0, h / 2.0), w - 2.0 * l, h - 2.0 * l)?;
    let glazing_position = elevation_position(file, (t + glazing_depth) / 2.0)?;
    let glazing = extruded_solid(file, glazing_profile, glazing_position, glazing_depth)?;

    shape_representation(file, context, "Body", "SweptSolid", &[frame, glazing])
}
