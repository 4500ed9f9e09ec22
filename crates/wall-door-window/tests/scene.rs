// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end checks on the written scene

use approx::assert_relative_eq;
use ifc_author::geometry::{object_placement, relative_matrix, representations_of};
use ifc_author::{EntityResolver, GlobalId, IfcType};
use ifc_author_model::schema;
use ifc_author_step::{ModelSummary, StepModel};
use nalgebra::{Matrix4, Vector3};
use rustc_hash::FxHashSet;
use wall_door_window::{build_scene, Scene};

fn written_scene() -> (StepModel, Scene) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wall_door_window.ifc");
    let (mut model, scene) = build_scene().unwrap();
    model.write_to_file(&path).unwrap();
    (StepModel::read_file(&path).unwrap(), scene)
}

#[test]
fn test_file_header() {
    let (model, _) = written_scene();
    let header = model.header();
    assert_eq!(header.schema_identifier(), "IFC4");
    assert_eq!(header.file_name, "wall_door_window.ifc");
    assert!(header.originating_system.starts_with("wall-door-window "));
    assert!(model.dangling_references().is_empty());
}

#[test]
fn test_element_counts() {
    let (model, _) = written_scene();
    let summary = ModelSummary::build(&model, "IFC4");
    assert_eq!(summary.count(&IfcType::IfcWall), 2);
    assert_eq!(summary.count(&IfcType::IfcDoor), 1);
    assert_eq!(summary.count(&IfcType::IfcWindow), 2);
    assert_eq!(summary.count(&IfcType::IfcOpeningElement), 2);
    assert_eq!(summary.count(&IfcType::IfcProject), 1);
    assert_eq!(summary.count(&IfcType::IfcBuildingStorey), 1);
}

#[test]
fn test_relationships() {
    let (model, scene) = written_scene();
    let summary = ModelSummary::build(&model, "IFC4");

    let door = summary.aggregate_named("opening_v_door").unwrap();
    assert_eq!(door.relating, scene.door_opening);
    assert_eq!(door.related, vec![scene.door]);

    let windows = summary.aggregate_named("Wall Contains window").unwrap();
    assert_eq!(windows.relating, scene.windows_opening);
    assert_eq!(windows.related, vec![scene.window1, scene.window2]);

    let storey = model.entities_by_type(&IfcType::IfcBuildingStorey)[0].id;
    assert_eq!(summary.container_of(scene.wall1), Some(storey));
    assert_eq!(summary.container_of(scene.wall2), Some(storey));
    assert_eq!(summary.voided_by(scene.door_opening), Some(scene.wall1));
    assert_eq!(summary.voided_by(scene.windows_opening), Some(scene.wall2));

    let tree = summary.spatial_tree.unwrap();
    assert_eq!(tree.name, "My Project");
    assert!(tree.find_by_name("Ground Floor").is_some());
    assert!(tree.find(scene.wall2).is_some());
}

#[test]
fn test_elements_have_shape_and_placement() {
    let (model, scene) = written_scene();
    for element in [
        scene.wall1,
        scene.wall2,
        scene.door_opening,
        scene.windows_opening,
        scene.door,
        scene.window1,
        scene.window2,
    ] {
        assert!(object_placement(&model, element).is_some(), "{}", element);
        let representations = representations_of(&model, element);
        assert_eq!(representations.len(), 1, "{}", element);

        let representation = model.get(representations[0]).unwrap();
        assert_eq!(representation.get_string(1), Some("Body"));
        assert_eq!(representation.get_string(2), Some("SweptSolid"));
    }
}

#[test]
fn test_fillings_are_placed_in_their_openings() {
    let (model, scene) = written_scene();
    assert_relative_eq!(
        relative_matrix(&model, scene.door, scene.door_opening).unwrap(),
        Matrix4::identity(),
        epsilon = 1e-9
    );
    assert_relative_eq!(
        relative_matrix(&model, scene.window1, scene.windows_opening).unwrap(),
        Matrix4::identity(),
        epsilon = 1e-9
    );
    // Local +X of the windows opening is world +Y
    assert_relative_eq!(
        relative_matrix(&model, scene.window2, scene.windows_opening).unwrap(),
        Matrix4::new_translation(&Vector3::new(0.6, 0.0, 0.0)),
        epsilon = 1e-9
    );
}

#[test]
fn test_global_ids_are_unique() {
    let (model, _) = written_scene();
    let mut seen = FxHashSet::default();
    for entity in model.all_entities() {
        let rooted = schema::entity_def(&entity.ifc_type).is_some_and(|def| def.is_rooted());
        if !rooted {
            continue;
        }
        let guid = entity.get_string(0).unwrap();
        assert!(guid.parse::<GlobalId>().is_ok(), "{}", guid);
        assert!(seen.insert(guid.to_string()), "duplicate {}", guid);
    }
    // 4 spatial elements, 7 building elements and 8 relationships
    assert_eq!(seen.len(), 19);
}
