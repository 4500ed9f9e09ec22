// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP physical file writer
//!
//! Serializes entity instances one per line, in the order given, between the
//! standard ISO-10303-21 section markers.

use crate::encoding::{encode_string, format_real};
use crate::header::FileHeader;
use ifc_author_model::{AttributeValue, Entity, ModelError, Result};
use std::fmt::Write as _;
use std::io::Write;

/// Writes entities and a header to STEP text
pub struct StepWriter<'a> {
    header: &'a FileHeader,
}

impl<'a> StepWriter<'a> {
    pub fn new(header: &'a FileHeader) -> Self {
        Self { header }
    }

    /// Serialize a whole file
    pub fn serialize<'e>(&self, entities: impl IntoIterator<Item = &'e Entity>) -> Result<String> {
        let mut out = String::new();
        out.push_str("ISO-10303-21;\nHEADER;\n");
        out.push_str(&self.header.to_step());
        out.push_str("ENDSEC;\nDATA;\n");

        let mut count = 0usize;
        for entity in entities {
            out.push_str(&entity_line(entity)?);
            out.push('\n');
            count += 1;
        }

        out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
        log::debug!("Serialized {} entities ({} bytes)", count, out.len());
        Ok(out)
    }

    /// Serialize a whole file into a writer
    pub fn write<'e, W: Write>(
        &self,
        writer: &mut W,
        entities: impl IntoIterator<Item = &'e Entity>,
    ) -> Result<()> {
        let text = self.serialize(entities)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// One DATA record: `#12=IFCWALL(...);`
pub fn entity_line(entity: &Entity) -> Result<String> {
    let mut line = String::with_capacity(64);
    let _ = write!(line, "#{}={}(", entity.id.0, entity.ifc_type.name());
    for (i, attr) in entity.attributes.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        write_value(&mut line, attr)
            .map_err(|e| ModelError::invalid_argument(format!("{}: {}", entity.id, e)))?;
    }
    line.push_str(");");
    Ok(line)
}

/// Append the STEP encoding of one attribute value
pub fn write_value(out: &mut String, value: &AttributeValue) -> Result<()> {
    match value {
        AttributeValue::Null => out.push('$'),
        AttributeValue::Derived => out.push('*'),
        AttributeValue::EntityRef(id) => {
            let _ = write!(out, "#{}", id.0);
        }
        AttributeValue::Bool(b) => out.push_str(if *b { ".T." } else { ".F." }),
        AttributeValue::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        AttributeValue::Float(f) => {
            if !f.is_finite() {
                return Err(ModelError::invalid_argument(format!(
                    "cannot write non-finite real {}",
                    f
                )));
            }
            out.push_str(&format_real(*f));
        }
        AttributeValue::String(s) => {
            out.push('\'');
            out.push_str(&encode_string(s));
            out.push('\'');
        }
        AttributeValue::Enum(e) => {
            out.push('.');
            out.push_str(e);
            out.push('.');
        }
        AttributeValue::List(items) => {
            out.push('(');
            write_items(out, items)?;
            out.push(')');
        }
        AttributeValue::TypedValue(name, args) => {
            out.push_str(name);
            out.push('(');
            write_items(out, args)?;
            out.push(')');
        }
    }
    Ok(())
}

fn write_items(out: &mut String, items: &[AttributeValue]) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_author_model::{EntityId, IfcType};

    fn point(id: u32, coords: &[f64]) -> Entity {
        Entity::new(
            EntityId(id),
            IfcType::IfcCartesianPoint,
            vec![AttributeValue::floats(coords)],
        )
    }

    #[test]
    fn test_entity_line() {
        let wall = Entity::new(
            EntityId(12),
            IfcType::IfcWall,
            vec![
                AttributeValue::string("2O2Fr$t4X7Zf8NOew3FLOH"),
                AttributeValue::Null,
                AttributeValue::string("wall1"),
                AttributeValue::Null,
                AttributeValue::Null,
                EntityId(20).into(),
                EntityId(30).into(),
                AttributeValue::Null,
                AttributeValue::enumeration("notdefined"),
            ],
        );
        assert_eq!(
            entity_line(&wall).unwrap(),
            "#12=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'wall1',$,$,#20,#30,$,.NOTDEFINED.);"
        );
    }

    #[test]
    fn test_reals_and_derived() {
        assert_eq!(
            entity_line(&point(3, &[0.0, -0.0, 0.95])).unwrap(),
            "#3=IFCCARTESIANPOINT((0.,0.,0.95));"
        );
        let unit = Entity::new(
            EntityId(4),
            IfcType::IfcSIUnit,
            vec![
                AttributeValue::Derived,
                AttributeValue::enumeration("LENGTHUNIT"),
                AttributeValue::Null,
                AttributeValue::enumeration("METRE"),
            ],
        );
        assert_eq!(
            entity_line(&unit).unwrap(),
            "#4=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);"
        );
    }

    #[test]
    fn test_non_finite_real_is_rejected() {
        assert!(entity_line(&point(1, &[f64::NAN, 0.0, 0.0])).is_err());
    }

    #[test]
    fn test_file_layout() {
        let header = FileHeader::ifc4("out.ifc");
        let entities = vec![point(1, &[0.0, 0.0, 0.0]), point(2, &[1.0, 0.0, 0.0])];
        let text = StepWriter::new(&header).serialize(&entities).unwrap();

        assert!(text.starts_with("ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION("));
        assert!(text.contains("ENDSEC;\nDATA;\n#1=IFCCARTESIANPOINT((0.,0.,0.));\n#2="));
        assert!(text.ends_with("ENDSEC;\nEND-ISO-10303-21;\n"));

        let mut buf = Vec::new();
        StepWriter::new(&header).write(&mut buf, &entities).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), text);
    }
}
