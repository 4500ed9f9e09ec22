// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The wall, door and window scene

use crate::generator::{ModelGenerator, DEFAULT_OPENING_THICKNESS};
use ifc_author::{EntityId, Result};
use nalgebra::Matrix4;

pub const DOOR_OPENING_LENGTH: f64 = 0.95;
pub const DOOR_HEIGHT: f64 = 2.1;
pub const DOOR_WIDTH: f64 = 0.9;
pub const DOOR_THICKNESS: f64 = 0.05;

pub const WINDOW_WIDTH: f64 = 0.6;
pub const WINDOW_HEIGHT: f64 = 0.9;
pub const WINDOW_THICKNESS: f64 = 0.05;

/// Handles of everything the scene adds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scene {
    pub wall1: EntityId,
    pub door_opening: EntityId,
    pub door: EntityId,
    pub door_aggregate: EntityId,
    pub wall2: EntityId,
    pub windows_opening: EntityId,
    pub window1: EntityId,
    pub window2: EntityId,
    pub windows_aggregate: EntityId,
}

/// Translation (3, -0.1, 0); the homogeneous row is left at zero
pub fn door_opening_matrix() -> Matrix4<f64> {
    let mut m = Matrix4::identity();
    m[(0, 3)] = 3.0;
    m[(1, 3)] = -0.1;
    m[(2, 3)] = 0.0;
    m[(3, 3)] = 0.0;
    m
}

/// Quarter turn about +Z
pub fn wall2_rotation() -> Matrix4<f64> {
    Matrix4::new(
        0.0, -1.0, 0.0, 0.0, //
        1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Quarter turn about +Z, moved `y` along world +Y and 1.5 m up
pub fn window_matrix(y: f64) -> Matrix4<f64> {
    let mut m = wall2_rotation();
    m[(1, 3)] = y;
    m[(2, 3)] = 1.5;
    m
}

/// Two walls at right angles, a door in the first and two windows side by
/// side in the second
pub fn build_scene() -> Result<(ModelGenerator, Scene)> {
    let mut model = ModelGenerator::new()?;

    let wall1 = model.create_default_wall("wall1")?;
    let door_opening_matrix = door_opening_matrix();
    let door_opening = model.create_opening(
        "door_opening",
        wall1,
        DOOR_OPENING_LENGTH,
        DOOR_HEIGHT,
        &door_opening_matrix,
        DEFAULT_OPENING_THICKNESS,
    )?;
    let door = model.create_door(
        "mydoor",
        door_opening,
        DOOR_WIDTH,
        DOOR_HEIGHT,
        DOOR_THICKNESS,
        &door_opening_matrix,
    )?;
    let door_aggregate =
        model.create_relationship_aggregates("opening_v_door", door_opening, &[door])?;

    let wall2 = model.create_default_wall("wall2")?;
    model.rotate_wall(wall2, &wall2_rotation())?;

    let opening_matrix = window_matrix(2.0);
    let windows_opening = model.create_opening(
        "windows_opening",
        wall2,
        WINDOW_WIDTH * 2.0,
        WINDOW_HEIGHT,
        &opening_matrix,
        DEFAULT_OPENING_THICKNESS,
    )?;
    let window1 = model.create_window(
        "window1",
        windows_opening,
        WINDOW_THICKNESS,
        &opening_matrix,
    )?;
    let window2 = model.create_window(
        "window2",
        windows_opening,
        WINDOW_THICKNESS,
        &window_matrix(2.0 + WINDOW_WIDTH),
    )?;
    let windows_aggregate = model.create_relationship_aggregates(
        "Wall Contains window",
        windows_opening,
        &[window1, window2],
    )?;

    log::info!("Scene has {} entities", model.file().len());
    Ok((
        model,
        Scene {
            wall1,
            door_opening,
            door,
            door_aggregate,
            wall2,
            windows_opening,
            window1,
            window2,
            windows_aggregate,
        },
    ))
}
