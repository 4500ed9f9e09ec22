// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door bodies: a lining around the leaf and a single panel

use super::builder::{closed_profile, extruded_solid, rectangle_profile};
use super::representation::shape_representation;
use super::{elevation_position, positive};
use crate::file::IfcFile;
use crate::unit::length_unit_scale;
use ifc_author_model::{EntityId, ModelError, Result};
use nalgebra::Point2;

/// Single-panel door, dimensions in metres
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorShape {
    pub width: f64,
    pub height: f64,
    /// Depth through the wall
    pub thickness: f64,
    /// Width of the lining at the jambs and the head
    pub lining_thickness: f64,
}

impl Default for DoorShape {
    fn default() -> Self {
        Self {
            width: 0.9,
            height: 2.0,
            thickness: 0.05,
            lining_thickness: 0.05,
        }
    }
}

impl DoorShape {
    pub fn new(width: f64, height: f64, thickness: f64) -> Self {
        Self {
            width,
            height,
            thickness,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        positive("door width", self.width)?;
        positive("door height", self.height)?;
        positive("door thickness", self.thickness)?;
        positive("door lining thickness", self.lining_thickness)?;
        if self.lining_thickness * 2.0 >= self.width || self.lining_thickness >= self.height {
            return Err(ModelError::invalid_argument(format!(
                "door lining {} leaves no room for a {} x {} panel",
                self.lining_thickness, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Open-bottom U around the panel
    pub fn lining_outline(&self) -> Vec<Point2<f64>> {
        let (w, h, l) = (self.width, self.height, self.lining_thickness);
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, h),
            Point2::new(w, h),
            Point2::new(w, 0.0),
            Point2::new(w - l, 0.0),
            Point2::new(w - l, h - l),
            Point2::new(l, h - l),
            Point2::new(l, 0.0),
        ]
    }
}

/// `Body`/`SweptSolid` shape of a door
///
/// The lining spans the full thickness; the panel takes the middle half.
pub fn add_door_representation(
    file: &mut IfcFile,
    context: EntityId,
    shape: &DoorShape,
) -> Result<EntityId> {
    shape.validate()?;
    let scale = length_unit_scale(file);
    let (w, h, t, l) = (
        shape.width / scale,
        shape.height / scale,
        shape.thickness / scale,
        shape.lining_thickness / scale,
    );

    let outline: Vec<Point2<f64>> = shape.lining_outline().into_iter().map(|p| p / scale).collect();
    let lining_profile = closed_profile(file, &outline)?;
    let lining_position = elevation_position(file, t)?;
    let lining = extruded_solid(file, lining_profile, lining_position, t)?;

    let panel_profile =
        rectangle_profile(file, Point2::new(w / 2.0, (h - l) / 2.0), w - 2.0 * l, h - l)?;
    let panel_position = elevation_position(file, t * 0.75)?;
    let panel = extruded_solid(file, panel_profile, panel_position, t / 2.0)?;

    shape_representation(file, context, "Body", "SweptSolid", &[lining, panel])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{add_context, ContextSettings};
    use crate::root::create_entity;
    use ifc_author_model::{EntityResolver, IfcType};

    fn body_context() -> (IfcFile, EntityId) {
        let mut file = IfcFile::new();
        create_entity(&mut file, IfcType::IfcProject, "My Project", None).unwrap();
        let model = add_context(&mut file, &ContextSettings::model()).unwrap();
        let body = add_context(&mut file, &ContextSettings::body(model)).unwrap();
        (file, body)
    }

    #[test]
    fn test_door_items() {
        let (mut file, body) = body_context();
        let shape = DoorShape::new(0.9, 2.1, 0.05);
        let rep = add_door_representation(&mut file, body, &shape).unwrap();

        let items = file.get(rep).unwrap().get_refs(3).unwrap();
        assert_eq!(items.len(), 2);

        let lining = file.get(items[0]).unwrap();
        assert_eq!(lining.get_float(3), Some(0.05));
        let outline = file.get(lining.get_ref(0).unwrap()).unwrap();
        assert_eq!(outline.ifc_type, IfcType::IfcArbitraryClosedProfileDef);
        let polyline = file.get(outline.get_ref(2).unwrap()).unwrap();
        assert_eq!(polyline.get_refs(0).unwrap().len(), 9);

        let panel = file.get(items[1]).unwrap();
        assert_eq!(panel.get_float(3), Some(0.025));
        let rectangle = file.get(panel.get_ref(0).unwrap()).unwrap();
        assert_eq!(rectangle.ifc_type, IfcType::IfcRectangleProfileDef);
        assert!((rectangle.get_float(3).unwrap() - 0.8).abs() < 1e-12);
        assert!((rectangle.get_float(4).unwrap() - 2.05).abs() < 1e-12);
    }

    #[test]
    fn test_lining_outline_is_open_at_the_bottom() {
        let outline = DoorShape::new(1.0, 2.0, 0.1).lining_outline();
        let on_floor: Vec<f64> = outline.iter().filter(|p| p.y == 0.0).map(|p| p.x).collect();
        assert_eq!(on_floor, vec![0.0, 1.0, 0.95, 0.05]);
    }

    #[test]
    fn test_lining_too_wide() {
        let (mut file, body) = body_context();
        let shape = DoorShape {
            lining_thickness: 0.5,
            ..DoorShape::new(0.9, 2.1, 0.05)
        };
        assert!(add_door_representation(&mut file, body, &shape).is_err());
        assert!(add_door_representation(&mut file, body, &DoorShape::new(0.9, 2.1, 0.0)).is_err());
    }
}
