// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Author
//!
//! Authoring operations over an in-memory IFC4 model.
//!
//! ## Overview
//!
//! - [`IfcFile`]: owns the entity instances and writes them as STEP
//! - [`root`]: rooted entities with fresh GlobalIds
//! - [`unit`], [`context`]: project units and representation contexts
//! - [`aggregate`], [`spatial`]: the spatial hierarchy and containment
//! - [`geometry`]: placements and parametric wall, door and window bodies
//! - [`void`]: openings cut into elements and their fillings
//!
//! Operations take the file mutably and return [`Result`]. Lengths are SI
//! metres; they are converted to the project length unit when written.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_author::{root, unit, context, geometry, IfcFile, IfcType};
//!
//! let mut file = IfcFile::new();
//! let project = root::create_entity(&mut file, IfcType::IfcProject, "My Project", None)?;
//! unit::assign_unit(&mut file, &unit::UnitSettings::default())?;
//! let model = context::add_context(&mut file, &context::ContextSettings::model())?;
//! let body = context::add_context(&mut file, &context::ContextSettings::body(model))?;
//!
//! let wall = root::create_entity(&mut file, IfcType::IfcWall, "wall1", None)?;
//! let shape = geometry::WallShape::new(5.0, 3.0, 0.2);
//! let rep = geometry::add_wall_representation(&mut file, body, &shape)?;
//! geometry::assign_representation(&mut file, wall, rep)?;
//! geometry::edit_object_placement(&mut file, wall, None, None)?;
//! file.write("wall.ifc")?;
//! ```

pub mod aggregate;
pub mod context;
pub mod file;
pub mod geometry;
pub mod root;
pub mod spatial;
pub mod unit;
pub mod void;

pub use aggregate::{aggregate_of, assign_object, parts_of};
pub use context::{add_context, ContextSettings, ContextType, TargetView};
pub use file::IfcFile;
pub use root::create_entity;
pub use spatial::{assign_container, contained_elements, container_of};
pub use unit::{assign_unit, length_unit_scale, UnitSettings};
pub use void::{add_filling, add_opening, openings_of, remove_opening, voided_element};

pub use ifc_author_model::{
    AttributeValue, Entity, EntityId, EntityResolver, GlobalId, IfcType, ModelError, Result,
};
