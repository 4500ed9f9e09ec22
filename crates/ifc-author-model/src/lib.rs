// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Author Model - shared types for building and reading IFC files
//!
//! This crate holds the vocabulary shared by the authoring API and the STEP
//! codec:
//!
//! - [`Entity`], [`EntityId`], [`IfcType`], [`AttributeValue`] - entity instances
//! - [`schema`] - IFC4 attribute layouts of the classes that get authored
//! - [`GlobalId`] - compressed GUIDs for IfcRoot entities
//! - [`EntityResolver`] - entity lookup shared by in-memory and decoded models
//! - [`SpatialNode`] - spatial hierarchy summaries
//!
//! # Example
//!
//! ```ignore
//! use ifc_author_model::{schema, IfcType};
//!
//! let def = schema::entity_def(&IfcType::IfcWall).unwrap();
//! assert_eq!(def.index_of("Name"), Some(2));
//! ```

pub mod error;
pub mod guid;
pub mod resolver;
pub mod schema;
pub mod spatial;
pub mod types;

pub use error::*;
pub use guid::*;
pub use resolver::*;
pub use spatial::*;
pub use types::*;
