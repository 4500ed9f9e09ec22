// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP physical file reader
//!
//! Decodes every instance of a file up front into a [`StepModel`].

use crate::header::FileHeader;
use crate::scanner::EntityScanner;
use crate::tokenizer::parse_entity;
use ifc_author_model::{Entity, EntityId, EntityResolver, IfcType, ModelError, Result};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::Path;

const START_MARKER: &str = "ISO-10303-21;";
const END_MARKER: &str = "END-ISO-10303-21;";

/// Decoded STEP file
#[derive(Clone, Debug)]
pub struct StepModel {
    header: FileHeader,
    entities: BTreeMap<EntityId, Entity>,
    type_index: FxHashMap<IfcType, Vec<EntityId>>,
}

impl StepModel {
    /// Decode STEP text
    pub fn parse(content: &str) -> Result<Self> {
        let body = content.trim_start_matches('\u{feff}').trim();
        if !body.starts_with(START_MARKER) {
            return Err(ModelError::format(format!("missing {}", START_MARKER)));
        }
        if !body.ends_with(END_MARKER) {
            return Err(ModelError::format(format!("missing {}", END_MARKER)));
        }

        let header_start = body
            .find("HEADER;")
            .ok_or_else(|| ModelError::InvalidHeader("missing HEADER section".to_string()))?
            + "HEADER;".len();
        let header_end = body[header_start..]
            .find("ENDSEC;")
            .map(|p| header_start + p)
            .ok_or_else(|| ModelError::InvalidHeader("unterminated HEADER section".to_string()))?;
        let header = FileHeader::parse(&body[header_start..header_end])?;

        let data_start = body[header_end..]
            .find("DATA;")
            .map(|p| header_end + p)
            .ok_or_else(|| ModelError::format("missing DATA section"))?;
        let data = &body[data_start..];

        let mut entities = BTreeMap::new();
        let mut type_index: FxHashMap<IfcType, Vec<EntityId>> = FxHashMap::default();

        for found in EntityScanner::new(data) {
            let found = found?;
            let id = EntityId(found.id);
            let entity = parse_entity(&data[found.start..found.end])
                .map_err(|e| ModelError::entity_parse(id, e.to_string()))?;
            if entities.contains_key(&id) {
                return Err(ModelError::entity_parse(id, "duplicate instance name"));
            }
            type_index
                .entry(entity.ifc_type.clone())
                .or_default()
                .push(id);
            entities.insert(id, entity);
        }

        for ids in type_index.values_mut() {
            ids.sort_unstable();
        }

        log::debug!(
            "Decoded {} entities, schema {}",
            entities.len(),
            header.schema_identifier()
        );

        Ok(Self {
            header,
            entities,
            type_index,
        })
    }

    /// Read and decode a file from disk
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Entities in instance-name order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// IDs referenced somewhere but never defined
    pub fn dangling_references(&self) -> Vec<(EntityId, EntityId)> {
        self.entities
            .values()
            .flat_map(|e| {
                e.referenced_ids()
                    .into_iter()
                    .filter(|r| !self.entities.contains_key(r))
                    .map(move |r| (e.id, r))
            })
            .collect()
    }
}

impl EntityResolver for StepModel {
    fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<&Entity> {
        self.type_index
            .get(ifc_type)
            .map(|ids| ids.iter().filter_map(|id| self.entities.get(id)).collect())
            .unwrap_or_default()
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

    const SAMPLE: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('sample.ifc','2024-01-01T00:00:00',(''),(''),'','','Nobody');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'My Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);
#4=IFCWALL('3vB2YO$MX4xv5uCqZZG05x',$,'wall1',$,$,$,$,$,$);
#5=IFCWALL('1kTvXnbbzCWw8lcMd1dR4o',$,'wall2',$,$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
";

    #[test]
    fn test_parse_sample() {
        let model = StepModel::parse(SAMPLE).unwrap();
        assert_eq!(model.entity_count(), 5);
        assert_eq!(model.header().file_name, "sample.ifc");
        assert_eq!(model.header().schema_identifier(), "IFC4");

        let walls = model.entities_by_type(&IfcType::IfcWall);
        assert_eq!(walls.len(), 2);
        assert_eq!(walls[0].get_string(2), Some("wall1"));
    }

    #[test]
    fn test_references() {
        let model = StepModel::parse(SAMPLE).unwrap();
        let project = model.get(EntityId(1)).unwrap();
        let units = model.resolve_ref(&project.attributes[8]).unwrap();
        assert_eq!(units.ifc_type, IfcType::IfcUnitAssignment);
        assert!(model.dangling_references().is_empty());
    }

    #[test]
    fn test_missing_markers() {
        assert!(matches!(
            StepModel::parse("HEADER;ENDSEC;DATA;ENDSEC;"),
            Err(ModelError::InvalidFormat(_))
        ));
        let truncated = SAMPLE.replace("END-ISO-10303-21;", "");
        assert!(StepModel::parse(&truncated).is_err());
    }

    #[test]
    fn test_malformed_instance_reports_id() {
        let broken = SAMPLE.replace(
            "#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);",
            "#3=IFCSIUNIT(*,.LENGTHUNIT.,$,;",
        );
        match StepModel::parse(&broken) {
            Err(ModelError::EntityParse(id, _)) => assert_eq!(id, EntityId(3)),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_instance_name() {
        let dup = SAMPLE.replace("#5=IFCWALL", "#4=IFCWALL");
        assert!(matches!(
            StepModel::parse(&dup),
            Err(ModelError::EntityParse(EntityId(4), _))
        ));
    }

    #[test]
    fn test_records_sharing_a_line() {
        let packed = SAMPLE
            .replace("\n#2=", "\n  #2=")
            .replace(";\n#4=", "; #4=")
            .replace(";\n#5=", ";\t#5=");
        let model = StepModel::parse(&packed).unwrap();
        assert_eq!(model.entity_count(), 5);
        assert_eq!(model.entities_by_type(&IfcType::IfcWall).len(), 2);
    }

    #[test]
    fn test_unparsed_text_is_rejected() {
        let stray = SAMPLE.replace("#4=IFCWALL", "4=IFCWALL");
        assert!(matches!(
            StepModel::parse(&stray),
            Err(ModelError::InvalidFormat(_))
        ));
    }
}
