// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory IFC file
//!
//! Owns the entity instances of a model being authored. Instance names are
//! allocated sequentially and never reused.

use ifc_author_model::{
    schema, AttributeValue, Entity, EntityId, EntityResolver, IfcType, ModelError, Result,
};
use ifc_author_step::{FileHeader, StepWriter};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Mutable IFC4 model
#[derive(Clone, Debug)]
pub struct IfcFile {
    header: FileHeader,
    entities: BTreeMap<EntityId, Entity>,
    type_index: FxHashMap<IfcType, BTreeSet<EntityId>>,
    next_id: u32,
}

impl IfcFile {
    /// Empty IFC4 file
    pub fn new() -> Self {
        Self {
            header: FileHeader::ifc4(""),
            entities: BTreeMap::new(),
            type_index: FxHashMap::default(),
            next_id: 1,
        }
    }

    pub fn schema(&self) -> &str {
        self.header.schema_identifier()
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut FileHeader {
        &mut self.header
    }

    /// Create an instance of a described class with `$`/`*` defaults
    pub fn create(&mut self, ifc_type: IfcType) -> Result<EntityId> {
        let def = schema::entity_def(&ifc_type)
            .ok_or_else(|| ModelError::UnsupportedClass(ifc_type.clone()))?;
        Ok(self.create_with(ifc_type, def.default_attributes()))
    }

    /// Create an instance from positional attributes
    pub fn create_with(&mut self, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.type_index
            .entry(ifc_type.clone())
            .or_default()
            .insert(id);
        self.entities.insert(id, Entity::new(id, ifc_type, attributes));
        id
    }

    /// Entity by id, as an error when missing
    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(&id).ok_or(ModelError::EntityNotFound(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or(ModelError::EntityNotFound(id))
    }

    /// Entity by id, checking its class
    pub fn entity_of_type(&self, id: EntityId, ifc_type: &IfcType) -> Result<&Entity> {
        let entity = self.entity(id)?;
        if entity.ifc_type != *ifc_type {
            return Err(ModelError::type_mismatch(id, ifc_type.name(), &entity.ifc_type));
        }
        Ok(entity)
    }

    /// Position of a named attribute of an existing entity
    fn index_of(&self, id: EntityId, name: &str) -> Result<usize> {
        let entity = self.entity(id)?;
        schema::attribute_index(&entity.ifc_type, name)
            .ok_or_else(|| ModelError::unknown_attribute(&entity.ifc_type, name))
    }

    /// Read a named attribute
    pub fn attribute(&self, id: EntityId, name: &str) -> Result<&AttributeValue> {
        let index = self.index_of(id, name)?;
        let entity = self.entity(id)?;
        entity
            .get(index)
            .ok_or_else(|| ModelError::unknown_attribute(&entity.ifc_type, name))
    }

    /// Entity reference held by a named attribute, `None` when unset
    pub fn attribute_ref(&self, id: EntityId, name: &str) -> Result<Option<EntityId>> {
        Ok(self.attribute(id, name)?.as_entity_ref())
    }

    /// Replace a named attribute
    pub fn set(
        &mut self,
        id: EntityId,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let index = self.index_of(id, name)?;
        let entity = self.entity_mut(id)?;
        if !entity.set(index, value.into()) {
            return Err(ModelError::unknown_attribute(&entity.ifc_type, name));
        }
        Ok(())
    }

    /// Instances of a class, in id order
    pub fn by_type(&self, ifc_type: &IfcType) -> Vec<&Entity> {
        self.type_index
            .get(ifc_type)
            .map(|ids| ids.iter().filter_map(|id| self.entities.get(id)).collect())
            .unwrap_or_default()
    }

    /// Remove an instance, leaving references to it untouched
    pub fn remove(&mut self, id: EntityId) -> Result<Entity> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(ModelError::EntityNotFound(id))?;
        if let Some(ids) = self.type_index.get_mut(&entity.ifc_type) {
            ids.remove(&id);
        }
        Ok(entity)
    }

    /// Ids of the instances that reference `id`
    pub fn inverse_references(&self, id: EntityId) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.references(id))
            .map(|e| e.id)
            .collect()
    }

    /// Remove `id` and, recursively, whatever it referenced that became
    /// unreferenced. Rooted instances are never swept.
    pub fn remove_unreferenced(&mut self, id: EntityId) -> Result<()> {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if !self.entities.contains_key(&next) || !self.inverse_references(next).is_empty() {
                continue;
            }
            let removed = self.remove(next)?;
            for child in removed.referenced_ids() {
                let rooted = self
                    .entities
                    .get(&child)
                    .and_then(|e| schema::entity_def(&e.ifc_type))
                    .map(|def| def.is_rooted())
                    .unwrap_or(false);
                if !rooted {
                    pending.push(child);
                }
            }
        }
        Ok(())
    }

    /// Instances in id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Serialize as STEP text
    pub fn to_step_string(&self) -> Result<String> {
        StepWriter::new(&self.header).serialize(self.entities.values())
    }

    /// Write a STEP file, recording its name in the header
    pub fn write(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            self.header.file_name = name.to_string();
        }
        let mut out = BufWriter::new(File::create(path)?);
        StepWriter::new(&self.header).write(&mut out, self.entities.values())?;
        log::info!(
            "Wrote {} entities to {}",
            self.entities.len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for IfcFile {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityResolver for IfcFile {
    fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<&Entity> {
        self.by_type(ifc_type)
    }

    fn all_entities(&self) -> Vec<&Entity> {
        self.entities.values().collect()
    }

    fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_uses_layout_defaults() {
        let mut file = IfcFile::new();
        let unit = file.create(IfcType::IfcSIUnit).unwrap();
        let entity = file.entity(unit).unwrap();
        assert_eq!(entity.attributes.len(), 4);
        assert!(entity.attributes[0].is_derived());
        assert!(entity.attributes[1].is_null());
        assert_eq!(file.schema(), "IFC4");
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut file = IfcFile::new();
        let a = file.create(IfcType::IfcWall).unwrap();
        let b = file.create(IfcType::IfcWall).unwrap();
        file.remove(b).unwrap();
        let c = file.create(IfcType::IfcDoor).unwrap();
        assert_eq!((a.0, c.0), (1, 3));
        assert_eq!(file.by_type(&IfcType::IfcWall).len(), 1);
    }

    #[test]
    fn test_named_attributes() {
        let mut file = IfcFile::new();
        let wall = file.create(IfcType::IfcWall).unwrap();
        file.set(wall, "Name", "wall1").unwrap();
        assert_eq!(file.attribute(wall, "Name").unwrap().as_string(), Some("wall1"));
        assert!(matches!(
            file.set(wall, "Elevation", 1.0),
            Err(ModelError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            file.set(EntityId(99), "Name", "x"),
            Err(ModelError::EntityNotFound(_))
        ));
    }

    #[test]
    fn test_unsupported_class() {
        let mut file = IfcFile::new();
        assert!(matches!(
            file.create(IfcType::parse("IfcFooBar")),
            Err(ModelError::UnsupportedClass(_))
        ));
    }

    #[test]
    fn test_remove_unreferenced_sweeps_children() {
        let mut file = IfcFile::new();
        let point = file.create_with(
            IfcType::IfcCartesianPoint,
            vec![AttributeValue::floats(&[0.0, 0.0, 0.0])],
        );
        let axis = file.create_with(
            IfcType::IfcAxis2Placement3D,
            vec![point.into(), AttributeValue::Null, AttributeValue::Null],
        );
        let shared = file.create_with(
            IfcType::IfcAxis2Placement3D,
            vec![point.into(), AttributeValue::Null, AttributeValue::Null],
        );

        file.remove_unreferenced(axis).unwrap();
        assert!(file.get(axis).is_none());
        // Still used by the second placement
        assert!(file.get(point).is_some());

        file.remove_unreferenced(shared).unwrap();
        assert!(file.is_empty());
    }

    #[test]
    fn test_step_output_contains_instances() {
        let mut file = IfcFile::new();
        let wall = file.create(IfcType::IfcWall).unwrap();
        file.set(wall, "Name", "it's").unwrap();
        let text = file.to_step_string().unwrap();
        assert!(text.contains("#1=IFCWALL($,$,'it''s',$,$,$,$,$,$);"));
        assert!(text.contains("FILE_SCHEMA(('IFC4'));"));
    }

    #[test]
    fn test_step_output_reads_back_unchanged() {
        use ifc_author_step::StepModel;

        let mut file = IfcFile::new();
        let names = ["it's", "back\\slash", "Wand\u{e4} \u{1f6aa}", "a;b #3=X", "'';/*"];
        for name in names {
            let wall = file.create(IfcType::IfcWall).unwrap();
            file.set(wall, "Name", name).unwrap();
        }
        let points: Vec<EntityId> = [[1.5e-7, 2e20, -0.25], [0.0, -3.0, 1e-12]]
            .iter()
            .map(|xyz| {
                file.create_with(IfcType::IfcCartesianPoint, vec![AttributeValue::floats(xyz)])
            })
            .collect();
        let polyline = file.create(IfcType::IfcPolyline).unwrap();
        file.set(polyline, "Points", AttributeValue::refs(points)).unwrap();
        let unit = file.create(IfcType::IfcSIUnit).unwrap();
        file.set(unit, "UnitType", AttributeValue::enumeration("LENGTHUNIT")).unwrap();
        file.set(unit, "Name", AttributeValue::enumeration("METRE")).unwrap();

        let model = StepModel::parse(&file.to_step_string().unwrap()).unwrap();
        assert_eq!(model.all_entities(), file.entities().collect::<Vec<_>>());

        let read: Vec<&str> = model
            .entities_by_type(&IfcType::IfcWall)
            .iter()
            .filter_map(|wall| wall.get_string(2))
            .collect();
        assert_eq!(read, names);
    }
}
