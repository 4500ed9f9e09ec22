// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model generator
//!
//! A thin stateful layer over the authoring API. It owns the file, the body
//! context that every shape is drawn in and the storey walls are put in.

use ifc_author::geometry::{
    add_door_representation, add_wall_representation, add_window_representation,
    assign_representation, edit_object_placement, DoorShape, WallShape, WindowShape,
};
use ifc_author::{
    add_context, add_opening, assign_container, assign_object, assign_unit, create_entity,
    length_unit_scale, AttributeValue, ContextSettings, EntityId, IfcFile, IfcType, Result,
    UnitSettings,
};
use nalgebra::Matrix4;
use std::path::Path;

/// Wall length used by [`ModelGenerator::create_default_wall`]
pub const DEFAULT_WALL_LENGTH: f64 = 5.0;
pub const DEFAULT_WALL_HEIGHT: f64 = 3.0;
pub const DEFAULT_WALL_THICKNESS: f64 = 0.2;
/// Depth of opening bodies, enough to cut through the default wall
pub const DEFAULT_OPENING_THICKNESS: f64 = 0.4;

/// Application recorded in FILE_NAME
pub const ORIGINATING_SYSTEM: &str = concat!("wall-door-window ", env!("CARGO_PKG_VERSION"));

/// Builds a project with one storey and adds elements to it
pub struct ModelGenerator {
    file: IfcFile,
    project: EntityId,
    body: EntityId,
    storey: EntityId,
}

impl ModelGenerator {
    /// Project "My Project" in metres with a 3D model context and its `Body`
    /// sub-context, decomposed into "My Site", "Building A" and "Ground Floor"
    pub fn new() -> Result<Self> {
        let mut file = IfcFile::new();
        file.header_mut().originating_system = ORIGINATING_SYSTEM.to_string();
        let project = create_entity(&mut file, IfcType::IfcProject, "My Project", None)?;
        assign_unit(&mut file, &UnitSettings::default())?;

        let model = add_context(&mut file, &ContextSettings::model())?;
        let body = add_context(&mut file, &ContextSettings::body(model))?;

        let site = create_entity(&mut file, IfcType::IfcSite, "My Site", None)?;
        let building = create_entity(&mut file, IfcType::IfcBuilding, "Building A", None)?;
        let storey = create_entity(&mut file, IfcType::IfcBuildingStorey, "Ground Floor", None)?;

        assign_object(&mut file, project, site)?;
        assign_object(&mut file, site, building)?;
        assign_object(&mut file, building, storey)?;

        log::info!("Created project {} with storey {}", project, storey);
        Ok(Self {
            file,
            project,
            body,
            storey,
        })
    }

    pub fn file(&self) -> &IfcFile {
        &self.file
    }

    pub fn project(&self) -> EntityId {
        self.project
    }

    /// `Body` sub-context shared by every shape
    pub fn body(&self) -> EntityId {
        self.body
    }

    pub fn storey(&self) -> EntityId {
        self.storey
    }

    /// Wall at the origin, contained in the storey
    pub fn create_wall(
        &mut self,
        name: &str,
        length: f64,
        height: f64,
        thickness: f64,
    ) -> Result<EntityId> {
        let file = &mut self.file;
        let wall = create_entity(file, IfcType::IfcWall, name, None)?;
        let shape = WallShape::new(length, height, thickness);
        let representation = add_wall_representation(file, self.body, &shape)?;
        edit_object_placement(file, wall, None, None)?;
        assign_representation(file, wall, representation)?;
        assign_container(file, self.storey, wall)?;

        log::info!("Created wall '{}' {}", name, wall);
        Ok(wall)
    }

    /// Wall of 5 x 3 x 0.2 m
    pub fn create_default_wall(&mut self, name: &str) -> Result<EntityId> {
        self.create_wall(
            name,
            DEFAULT_WALL_LENGTH,
            DEFAULT_WALL_HEIGHT,
            DEFAULT_WALL_THICKNESS,
        )
    }

    /// Move a wall to `matrix` (world transform in metres)
    pub fn rotate_wall(&mut self, wall: EntityId, matrix: &Matrix4<f64>) -> Result<()> {
        edit_object_placement(&mut self.file, wall, Some(matrix), None)?;
        Ok(())
    }

    /// Box-shaped opening at `matrix`, voiding `element`
    pub fn create_opening(
        &mut self,
        name: &str,
        element: EntityId,
        length: f64,
        height: f64,
        matrix: &Matrix4<f64>,
        thickness: f64,
    ) -> Result<EntityId> {
        let file = &mut self.file;
        let opening = create_entity(file, IfcType::IfcOpeningElement, name, None)?;
        let shape = WallShape::new(length, height, thickness);
        let representation = add_wall_representation(file, self.body, &shape)?;
        assign_representation(file, opening, representation)?;
        edit_object_placement(file, opening, Some(matrix), None)?;
        add_opening(file, opening, element)?;

        log::info!("Created opening '{}' {} in {}", name, opening, element);
        Ok(opening)
    }

    /// Door at `matrix`, placed relative to `opening`
    pub fn create_door(
        &mut self,
        name: &str,
        opening: EntityId,
        width: f64,
        height: f64,
        thickness: f64,
        matrix: &Matrix4<f64>,
    ) -> Result<EntityId> {
        let file = &mut self.file;
        let door = create_entity(file, IfcType::IfcDoor, name, None)?;
        edit_object_placement(file, door, Some(matrix), Some(opening))?;
        let shape = DoorShape::new(width, height, thickness);
        let representation = add_door_representation(file, self.body, &shape)?;
        assign_representation(file, door, representation)?;
        set_overall_size(file, door, width, height)?;

        log::info!("Created door '{}' {}", name, door);
        Ok(door)
    }

    /// Default-sized window at `matrix`, placed relative to `opening`
    pub fn create_window(
        &mut self,
        name: &str,
        opening: EntityId,
        thickness: f64,
        matrix: &Matrix4<f64>,
    ) -> Result<EntityId> {
        let file = &mut self.file;
        let window = create_entity(file, IfcType::IfcWindow, name, None)?;
        let shape = WindowShape::with_thickness(thickness);
        let representation = add_window_representation(file, self.body, &shape)?;
        assign_representation(file, window, representation)?;
        edit_object_placement(file, window, Some(matrix), Some(opening))?;
        set_overall_size(file, window, shape.width, shape.height)?;

        log::info!("Created window '{}' {}", name, window);
        Ok(window)
    }

    /// Named IfcRelAggregates tying `related_objects` to `relating_object`
    pub fn create_relationship_aggregates(
        &mut self,
        name: &str,
        relating_object: EntityId,
        related_objects: &[EntityId],
    ) -> Result<EntityId> {
        let file = &mut self.file;
        let relationship = create_entity(file, IfcType::IfcRelAggregates, name, None)?;
        file.set(relationship, "RelatingObject", relating_object)?;
        file.set(
            relationship,
            "RelatedObjects",
            AttributeValue::refs(related_objects.iter().copied()),
        )?;
        Ok(relationship)
    }

    pub fn write_to_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.file.write(path)
    }
}

/// OverallWidth and OverallHeight of a door or window, given in metres
fn set_overall_size(file: &mut IfcFile, element: EntityId, width: f64, height: f64) -> Result<()> {
    let scale = length_unit_scale(file);
    file.set(element, "OverallWidth", width / scale)?;
    file.set(element, "OverallHeight", height / scale)?;
    Ok(())
}
