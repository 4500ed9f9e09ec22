// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project units

use crate::file::IfcFile;
use ifc_author_model::{
    AttributeValue, Entity, EntityId, EntityResolver, IfcType, ModelError, Result,
};

// IfcProject.UnitsInContext
const UNITS_IN_CONTEXT: usize = 8;

/// SI units assigned to the project
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitSettings {
    /// SI prefix of the length unit (e.g. `MILLI`), `None` for metres
    pub length_prefix: Option<String>,
    pub area_prefix: Option<String>,
    pub volume_prefix: Option<String>,
}

impl UnitSettings {
    /// Millimetre lengths, square/cubic metres otherwise
    pub fn millimetres() -> Self {
        Self {
            length_prefix: Some("MILLI".to_string()),
            ..Self::default()
        }
    }
}

/// Scale factor of an SI prefix
pub fn prefix_scale(prefix: &str) -> Option<f64> {
    let scale = match prefix {
        "EXA" => 1e18,
        "PETA" => 1e15,
        "TERA" => 1e12,
        "GIGA" => 1e9,
        "MEGA" => 1e6,
        "KILO" => 1e3,
        "HECTO" => 1e2,
        "DECA" => 1e1,
        "DECI" => 1e-1,
        "CENTI" => 1e-2,
        "MILLI" => 1e-3,
        "MICRO" => 1e-6,
        "NANO" => 1e-9,
        "PICO" => 1e-12,
        "FEMTO" => 1e-15,
        "ATTO" => 1e-18,
        _ => return None,
    };
    Some(scale)
}

fn si_unit(
    file: &mut IfcFile,
    unit_type: &str,
    prefix: Option<&str>,
    name: &str,
) -> Result<EntityId> {
    let prefix = match prefix {
        Some(p) => AttributeValue::enumeration(p),
        None => AttributeValue::Null,
    };

    let id = file.create(IfcType::IfcSIUnit)?;
    file.set(id, "UnitType", AttributeValue::enumeration(unit_type))?;
    file.set(id, "Prefix", prefix)?;
    file.set(id, "Name", AttributeValue::enumeration(name))?;
    Ok(id)
}

/// Assign length, area and volume units to the project
///
/// An existing unit assignment is kept; units of the same type are replaced.
pub fn assign_unit(file: &mut IfcFile, settings: &UnitSettings) -> Result<EntityId> {
    let project = file
        .by_type(&IfcType::IfcProject)
        .first()
        .map(|p| p.id)
        .ok_or_else(|| ModelError::invalid_argument("assigning units requires an IfcProject"))?;

    let prefixes = [
        &settings.length_prefix,
        &settings.area_prefix,
        &settings.volume_prefix,
    ];
    for prefix in prefixes.into_iter().flatten() {
        if prefix_scale(&prefix.to_ascii_uppercase()).is_none() {
            return Err(ModelError::invalid_argument(format!(
                "unknown SI prefix {}",
                prefix
            )));
        }
    }

    let units = [
        si_unit(file, "LENGTHUNIT", settings.length_prefix.as_deref(), "METRE")?,
        si_unit(file, "AREAUNIT", settings.area_prefix.as_deref(), "SQUARE_METRE")?,
        si_unit(file, "VOLUMEUNIT", settings.volume_prefix.as_deref(), "CUBIC_METRE")?,
    ];

    let existing = file.attribute_ref(project, "UnitsInContext")?;
    let assignment = match existing {
        Some(assignment) => {
            let mut list = file.entity(assignment)?.get_refs(0).unwrap_or_default();
            let mut replaced = Vec::new();
            for unit in &units {
                let unit_type = file.entity(*unit)?.get_enum(1).map(str::to_string);
                list.retain(|old| {
                    let same = file.get(*old).and_then(|e| e.get_enum(1)).map(str::to_string)
                        == unit_type;
                    if same {
                        replaced.push(*old);
                    }
                    !same
                });
                list.push(*unit);
            }
            file.set(assignment, "Units", AttributeValue::refs(list))?;
            for old in replaced {
                file.remove_unreferenced(old)?;
            }
            assignment
        }
        None => {
            let assignment = file.create(IfcType::IfcUnitAssignment)?;
            file.set(assignment, "Units", AttributeValue::refs(units))?;
            file.set(project, "UnitsInContext", assignment)?;
            assignment
        }
    };

    log::debug!("Assigned units {:?} to project {}", settings, project);
    Ok(assignment)
}

/// Project length unit in metres, 1.0 when no length unit is declared
pub fn length_unit_scale(resolver: &dyn EntityResolver) -> f64 {
    let Some(project) = resolver.entities_by_type(&IfcType::IfcProject).first().copied() else {
        return 1.0;
    };
    let Some(assignment) = project
        .get(UNITS_IN_CONTEXT)
        .and_then(|attr| resolver.resolve_ref(attr))
    else {
        return 1.0;
    };

    assignment
        .get(0)
        .map(|units| resolver.resolve_ref_list(units))
        .unwrap_or_default()
        .into_iter()
        .find_map(si_length_scale)
        .unwrap_or(1.0)
}

/// IFCSIUNIT(*, UnitType, Prefix, Name)
fn si_length_scale(unit: &Entity) -> Option<f64> {
    if unit.ifc_type != IfcType::IfcSIUnit || unit.get_enum(1)? != "LENGTHUNIT" {
        return None;
    }
    if unit.get_enum(3)? != "METRE" {
        return None;
    }
    match unit.get_enum(2) {
        Some(prefix) => prefix_scale(prefix),
        None => Some(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::root::create_entity;

    fn project_file() -> IfcFile {
        let mut file = IfcFile::new();
        create_entity(&mut file, IfcType::IfcProject, "My Project", None).unwrap();
        file
    }

    #[test]
    fn test_default_units() {
        let mut file = project_file();
        let assignment = assign_unit(&mut file, &UnitSettings::default()).unwrap();

        let units = file.get(assignment).unwrap().get_refs(0).unwrap();
        assert_eq!(units.len(), 3);
        let names: Vec<&str> = units
            .iter()
            .map(|u| file.get(*u).unwrap().get_enum(3).unwrap())
            .collect();
        assert_eq!(names, vec!["METRE", "SQUARE_METRE", "CUBIC_METRE"]);

        let project = file.by_type(&IfcType::IfcProject)[0];
        assert_eq!(project.get_ref(UNITS_IN_CONTEXT), Some(assignment));
        assert_eq!(length_unit_scale(&file), 1.0);
    }

    #[test]
    fn test_millimetres() {
        let mut file = project_file();
        assign_unit(&mut file, &UnitSettings::millimetres()).unwrap();
        assert_eq!(length_unit_scale(&file), 1e-3);
    }

    #[test]
    fn test_reassignment_replaces_units() {
        let mut file = project_file();
        let first = assign_unit(&mut file, &UnitSettings::millimetres()).unwrap();
        let second = assign_unit(&mut file, &UnitSettings::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(file.by_type(&IfcType::IfcSIUnit).len(), 3);
        assert_eq!(length_unit_scale(&file), 1.0);
    }

    #[test]
    fn test_requires_project() {
        let mut file = IfcFile::new();
        assert!(matches!(
            assign_unit(&mut file, &UnitSettings::default()),
            Err(ModelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unknown_prefix() {
        let mut file = project_file();
        let settings = UnitSettings {
            length_prefix: Some("MEGALO".to_string()),
            ..UnitSettings::default()
        };
        assert!(assign_unit(&mut file, &settings).is_err());
        assert!(file.by_type(&IfcType::IfcSIUnit).is_empty());
    }

    #[test]
    fn test_scale_without_units() {
        assert_eq!(length_unit_scale(&project_file()), 1.0);
        assert_eq!(length_unit_scale(&IfcFile::new()), 1.0);
    }
}
