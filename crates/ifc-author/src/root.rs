// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IfcRoot instances

use crate::file::IfcFile;
use ifc_author_model::{schema, AttributeValue, EntityId, GlobalId, IfcType, ModelError, Result};

/// Create a rooted entity with a fresh GlobalId and a name
///
/// `predefined_type` is only accepted by classes that have one.
pub fn create_entity(
    file: &mut IfcFile,
    ifc_type: IfcType,
    name: &str,
    predefined_type: Option<&str>,
) -> Result<EntityId> {
    let def = schema::entity_def(&ifc_type)
        .ok_or_else(|| ModelError::UnsupportedClass(ifc_type.clone()))?;
    if !def.is_rooted() {
        return Err(ModelError::UnsupportedClass(ifc_type));
    }
    if predefined_type.is_some() && def.index_of("PredefinedType").is_none() {
        return Err(ModelError::unknown_attribute(&ifc_type, "PredefinedType"));
    }

    let class = ifc_type.clone();
    let id = file.create(ifc_type)?;
    file.set(id, "GlobalId", GlobalId::new().as_str())?;
    file.set(id, "Name", name)?;
    if let Some(predefined) = predefined_type {
        file.set(id, "PredefinedType", AttributeValue::enumeration(predefined))?;
    }

    log::debug!("Created {} {} '{}'", class, id, name);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_author_model::EntityResolver;

    #[test]
    fn test_create_entity() {
        let mut file = IfcFile::new();
        let wall = create_entity(&mut file, IfcType::IfcWall, "wall1", None).unwrap();
        let entity = file.get(wall).unwrap();
        assert_eq!(entity.get_string(2), Some("wall1"));
        assert!(entity.get(1).unwrap().is_null());

        let guid = entity.get_string(0).unwrap();
        assert!(guid.parse::<GlobalId>().is_ok());
    }

    #[test]
    fn test_predefined_type() {
        let mut file = IfcFile::new();
        let opening =
            create_entity(&mut file, IfcType::IfcOpeningElement, "o", Some("opening")).unwrap();
        assert_eq!(file.get(opening).unwrap().get_enum(8), Some("OPENING"));

        assert!(create_entity(&mut file, IfcType::IfcProject, "p", Some("USERDEFINED")).is_err());
    }

    #[test]
    fn test_unrooted_class_is_rejected() {
        let mut file = IfcFile::new();
        assert!(matches!(
            create_entity(&mut file, IfcType::IfcCartesianPoint, "p", None),
            Err(ModelError::UnsupportedClass(_))
        ));
        assert!(file.is_empty());
    }

    #[test]
    fn test_guids_are_unique() {
        let mut file = IfcFile::new();
        let ids: Vec<_> = (0..50)
            .map(|i| create_entity(&mut file, IfcType::IfcWall, &format!("w{i}"), None).unwrap())
            .collect();
        let mut guids: Vec<&str> = ids
            .iter()
            .map(|id| file.get(*id).unwrap().get_string(0).unwrap())
            .collect();
        guids.sort_unstable();
        guids.dedup();
        assert_eq!(guids.len(), 50);
    }
}
