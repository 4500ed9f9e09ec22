// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for IFC authoring and STEP decoding

use crate::{EntityId, IfcType};
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while building, writing or reading an IFC model
#[derive(Error, Debug)]
pub enum ModelError {
    /// Invalid STEP file format
    #[error("Invalid IFC format: {0}")]
    InvalidFormat(String),

    /// Failed to parse header section
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Failed to parse entity
    #[error("Failed to parse entity {0}: {1}")]
    EntityParse(EntityId, String),

    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Attribute name is not part of the class layout
    #[error("{class} has no attribute {attribute}")]
    UnknownAttribute { class: IfcType, attribute: String },

    /// Entity is of the wrong class for the operation
    #[error("Type mismatch at entity {entity}: expected {expected}, got {actual}")]
    TypeMismatch {
        entity: EntityId,
        expected: String,
        actual: IfcType,
    },

    /// Class cannot be used for the requested operation
    #[error("Unsupported class {0}")]
    UnsupportedClass(IfcType),

    /// Operation argument rejected (non-positive dimension, missing project, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid GlobalId string
    #[error("Invalid GlobalId '{0}'")]
    InvalidGlobalId(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        ModelError::InvalidFormat(msg.into())
    }

    /// Create a new entity parse error
    pub fn entity_parse(id: EntityId, msg: impl Into<String>) -> Self {
        ModelError::EntityParse(id, msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ModelError::InvalidArgument(msg.into())
    }

    /// Create a type mismatch error
    pub fn type_mismatch(entity: EntityId, expected: impl Into<String>, actual: &IfcType) -> Self {
        ModelError::TypeMismatch {
            entity,
            expected: expected.into(),
            actual: actual.clone(),
        }
    }

    /// Create an unknown attribute error
    pub fn unknown_attribute(class: &IfcType, attribute: impl Into<String>) -> Self {
        ModelError::UnknownAttribute {
            class: class.clone(),
            attribute: attribute.into(),
        }
    }
}
