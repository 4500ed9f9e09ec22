// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model summary
//!
//! Entity counts, the relationships that tie elements together and the
//! spatial tree, computed from any [`EntityResolver`].

use ifc_author_model::{
    AttributeValue, Entity, EntityId, EntityResolver, IfcType, SpatialNode, SpatialNodeType,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// IfcRoot relationships share the layout (GlobalId, OwnerHistory, Name,
// Description, <relating or related>, <related or relating>)
const REL_NAME: usize = 2;
const REL_FIRST: usize = 4;
const REL_SECOND: usize = 5;
const PRODUCT_NAME: usize = 2;
const PRODUCT_PLACEMENT: usize = 5;
const PRODUCT_REPRESENTATION: usize = 6;

/// One relationship instance, as relating → related
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationSummary {
    pub id: EntityId,
    pub name: Option<String>,
    pub relating: EntityId,
    pub related: Vec<EntityId>,
}

/// Overview of a model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelSummary {
    pub schema: String,
    pub entity_count: usize,
    /// Instance count per type keyword
    pub counts: BTreeMap<String, usize>,
    pub aggregates: Vec<RelationSummary>,
    pub containment: Vec<RelationSummary>,
    pub voids: Vec<RelationSummary>,
    pub fills: Vec<RelationSummary>,
    pub spatial_tree: Option<SpatialNode>,
}

impl ModelSummary {
    /// Summarize the entities of `resolver`
    pub fn build(resolver: &dyn EntityResolver, schema: impl Into<String>) -> Self {
        let mut counts = BTreeMap::new();
        for entity in resolver.all_entities() {
            *counts.entry(entity.ifc_type.name().to_string()).or_insert(0) += 1;
        }

        // Relating id is attribute 4 except for containment, where it is 5
        let aggregates = relations(resolver, &IfcType::IfcRelAggregates, false);
        let containment = relations(resolver, &IfcType::IfcRelContainedInSpatialStructure, true);
        let voids = relations(resolver, &IfcType::IfcRelVoidsElement, false);
        let fills = relations(resolver, &IfcType::IfcRelFillsElement, false);

        let spatial_tree = resolver
            .entities_by_type(&IfcType::IfcProject)
            .first()
            .map(|project| {
                let children = ChildIndex::new(&[&aggregates, &containment, &voids, &fills]);
                let mut visited = FxHashSet::default();
                build_node(resolver, project, &children, &mut visited)
            });

        Self {
            schema: schema.into(),
            entity_count: resolver.entity_count(),
            counts,
            aggregates,
            containment,
            voids,
            fills,
            spatial_tree,
        }
    }

    /// Instance count of one type
    pub fn count(&self, ifc_type: &IfcType) -> usize {
        self.counts.get(ifc_type.name()).copied().unwrap_or(0)
    }

    /// Aggregation with the given relationship name
    pub fn aggregate_named(&self, name: &str) -> Option<&RelationSummary> {
        self.aggregates
            .iter()
            .find(|rel| rel.name.as_deref() == Some(name))
    }

    /// Spatial structure that directly contains `element`
    pub fn container_of(&self, element: EntityId) -> Option<EntityId> {
        self.containment
            .iter()
            .find(|rel| rel.related.contains(&element))
            .map(|rel| rel.relating)
    }

    /// Element voided by `opening`
    pub fn voided_by(&self, opening: EntityId) -> Option<EntityId> {
        self.voids
            .iter()
            .find(|rel| rel.related.contains(&opening))
            .map(|rel| rel.relating)
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn relations(
    resolver: &dyn EntityResolver,
    class: &IfcType,
    relating_second: bool,
) -> Vec<RelationSummary> {
    let (relating_index, related_index) = if relating_second {
        (REL_SECOND, REL_FIRST)
    } else {
        (REL_FIRST, REL_SECOND)
    };

    resolver
        .entities_by_type(class)
        .into_iter()
        .filter_map(|rel| {
            let relating = rel.get_ref(relating_index)?;
            let related = match rel.get(related_index)? {
                AttributeValue::EntityRef(id) => vec![*id],
                value => value
                    .as_list()?
                    .iter()
                    .filter_map(|v| v.as_entity_ref())
                    .collect(),
            };
            Some(RelationSummary {
                id: rel.id,
                name: rel.get_string(REL_NAME).map(str::to_string),
                relating,
                related,
            })
        })
        .collect()
}

/// relating → related lookup across all relationship kinds
struct ChildIndex(FxHashMap<EntityId, Vec<EntityId>>);

impl ChildIndex {
    fn new(groups: &[&Vec<RelationSummary>]) -> Self {
        let mut map: FxHashMap<EntityId, Vec<EntityId>> = FxHashMap::default();
        for group in groups {
            for rel in group.iter() {
                map.entry(rel.relating)
                    .or_default()
                    .extend(rel.related.iter().copied());
            }
        }
        Self(map)
    }

    fn children(&self, id: EntityId) -> &[EntityId] {
        self.0.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn build_node(
    resolver: &dyn EntityResolver,
    entity: &Entity,
    children: &ChildIndex,
    visited: &mut FxHashSet<EntityId>,
) -> SpatialNode {
    visited.insert(entity.id);

    let name = entity
        .get_string(PRODUCT_NAME)
        .unwrap_or_default()
        .to_string();
    let is_product = entity.ifc_type.is_product();
    let mut node = SpatialNode::new(
        entity.id,
        SpatialNodeType::from_ifc_type(&entity.ifc_type),
        name,
        entity.ifc_type.name(),
    )
    .with_placement(is_product && entity.get_ref(PRODUCT_PLACEMENT).is_some())
    .with_geometry(is_product && entity.get_ref(PRODUCT_REPRESENTATION).is_some());

    for child_id in children.children(entity.id) {
        if visited.contains(child_id) {
            continue;
        }
        if let Some(child) = resolver.get(*child_id) {
            node.add_child(build_node(resolver, child, children, visited));
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::StepModel;

    const SCENE: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('scene.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'My Project',$,$,$,$,$,$);
#2=IFCSITE('1YvctVUKr0kugbFTf53O9L',$,'My Site',$,$,$,$,$,$,$,$,$,$,$);
#3=IFCBUILDINGSTOREY('2YvctVUKr0kugbFTf53O9L',$,'Ground Floor',$,$,#20,$,$,$,$);
#4=IFCWALL('3YvctVUKr0kugbFTf53O9L',$,'wall1',$,$,#20,#21,$,$);
#5=IFCOPENINGELEMENT('0ZvctVUKr0kugbFTf53O9L',$,'door_opening',$,$,#20,#21,$,$);
#6=IFCDOOR('1ZvctVUKr0kugbFTf53O9L',$,'mydoor',$,$,#20,#21,$,2.1,0.9,$,$,$);
#10=IFCRELAGGREGATES('2ZvctVUKr0kugbFTf53O9L',$,$,$,#1,(#2));
#11=IFCRELAGGREGATES('3ZvctVUKr0kugbFTf53O9L',$,$,$,#2,(#3));
#12=IFCRELCONTAINEDINSPATIALSTRUCTURE('0avctVUKr0kugbFTf53O9L',$,$,$,(#4),#3);
#13=IFCRELVOIDSELEMENT('1avctVUKr0kugbFTf53O9L',$,$,$,#4,#5);
#14=IFCRELAGGREGATES('2avctVUKr0kugbFTf53O9L',$,'opening_v_door',$,#5,(#6));
#20=IFCLOCALPLACEMENT($,$);
#21=IFCPRODUCTDEFINITIONSHAPE($,$,());
ENDSEC;
END-ISO-10303-21;
";

    fn summary() -> ModelSummary {
        let model = StepModel::parse(SCENE).unwrap();
        ModelSummary::build(&model, model.header().schema_identifier())
    }

    #[test]
    fn test_counts_and_relations() {
        let summary = summary();
        assert_eq!(summary.schema, "IFC4");
        assert_eq!(summary.count(&IfcType::IfcWall), 1);
        assert_eq!(summary.count(&IfcType::IfcRelAggregates), 3);
        assert_eq!(summary.container_of(EntityId(4)), Some(EntityId(3)));
        assert_eq!(summary.voided_by(EntityId(5)), Some(EntityId(4)));

        let door_rel = summary.aggregate_named("opening_v_door").unwrap();
        assert_eq!(door_rel.relating, EntityId(5));
        assert_eq!(door_rel.related, vec![EntityId(6)]);
    }

    #[test]
    fn test_spatial_tree_reaches_fillings() {
        let summary = summary();
        let tree = summary.spatial_tree.unwrap();
        let path: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            path,
            vec!["My Project", "My Site", "Ground Floor", "wall1", "door_opening", "mydoor"]
        );

        let door = tree.find(EntityId(6)).unwrap();
        assert!(door.has_geometry && door.has_placement);
        assert_eq!(
            tree.find(EntityId(5)).map(|n| n.node_type),
            Some(SpatialNodeType::Opening)
        );
    }

    #[test]
    fn test_json_output() {
        let json = summary().to_json().unwrap();
        assert!(json.contains("\"opening_v_door\""));
        assert!(json.contains("\"IFCDOOR\""));
    }
}
