// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HEADER section of a STEP physical file

use crate::encoding::{decode_string, encode_string};
use crate::tokenizer::{parse_record, Token};
use chrono::{DateTime, Utc};
use ifc_author_model::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Default view definition written to FILE_DESCRIPTION
pub const COORDINATION_VIEW: &str = "ViewDefinition [CoordinationView]";

/// Contents of FILE_DESCRIPTION, FILE_NAME and FILE_SCHEMA
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileHeader {
    pub description: Vec<String>,
    pub implementation_level: String,
    pub file_name: String,
    pub timestamp: String,
    pub author: Vec<String>,
    pub organization: Vec<String>,
    pub preprocessor_version: String,
    pub originating_system: String,
    pub authorization: String,
    pub schema: Vec<String>,
}

impl FileHeader {
    /// IFC4 header stamped with the current time
    pub fn ifc4(file_name: impl Into<String>) -> Self {
        Self {
            description: vec![COORDINATION_VIEW.to_string()],
            implementation_level: "2;1".to_string(),
            file_name: file_name.into(),
            timestamp: iso_timestamp(Utc::now()),
            author: vec![String::new()],
            organization: vec![String::new()],
            preprocessor_version: format!("ifc-author-step {}", env!("CARGO_PKG_VERSION")),
            originating_system: String::new(),
            authorization: "Nobody".to_string(),
            schema: vec!["IFC4".to_string()],
        }
    }

    /// First schema identifier, empty if none was declared
    pub fn schema_identifier(&self) -> &str {
        self.schema.first().map(String::as_str).unwrap_or("")
    }

    /// Serialize as the three header records
    pub fn to_step(&self) -> String {
        format!(
            "FILE_DESCRIPTION({},{});\nFILE_NAME({},{},{},{},{},{},{});\nFILE_SCHEMA({});\n",
            string_list(&self.description),
            quoted(&self.implementation_level),
            quoted(&self.file_name),
            quoted(&self.timestamp),
            string_list(&self.author),
            string_list(&self.organization),
            quoted(&self.preprocessor_version),
            quoted(&self.originating_system),
            quoted(&self.authorization),
            string_list(&self.schema),
        )
    }

    /// Decode the records found between `HEADER;` and `ENDSEC;`
    pub fn parse(section: &str) -> Result<Self> {
        let mut header = FileHeader {
            description: Vec::new(),
            implementation_level: String::new(),
            file_name: String::new(),
            timestamp: String::new(),
            author: Vec::new(),
            organization: Vec::new(),
            preprocessor_version: String::new(),
            originating_system: String::new(),
            authorization: String::new(),
            schema: Vec::new(),
        };

        for record in split_records(section) {
            let (name, args) = parse_record(record)?;
            match name.to_ascii_uppercase().as_str() {
                "FILE_DESCRIPTION" => {
                    header.description = strings_at(&args, 0);
                    header.implementation_level = string_at(&args, 1);
                }
                "FILE_NAME" => {
                    header.file_name = string_at(&args, 0);
                    header.timestamp = string_at(&args, 1);
                    header.author = strings_at(&args, 2);
                    header.organization = strings_at(&args, 3);
                    header.preprocessor_version = string_at(&args, 4);
                    header.originating_system = string_at(&args, 5);
                    header.authorization = string_at(&args, 6);
                }
                "FILE_SCHEMA" => header.schema = strings_at(&args, 0),
                other => log::debug!("Ignoring header record {}", other),
            }
        }

        if header.schema.is_empty() {
            return Err(ModelError::InvalidHeader(
                "missing FILE_SCHEMA record".to_string(),
            ));
        }
        Ok(header)
    }
}

/// Split a header section on record terminators outside of strings
fn split_records(section: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut in_string = false;
    let mut start = 0;

    for (i, b) in section.bytes().enumerate() {
        match b {
            // A doubled quote toggles twice
            b'\'' => in_string = !in_string,
            b';' if !in_string => {
                let record = section[start..i].trim();
                if !record.is_empty() {
                    records.push(record);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    records
}

fn string_at(args: &[Token<'_>], index: usize) -> String {
    match args.get(index) {
        Some(Token::String(s)) => decode_string(s),
        _ => String::new(),
    }
}

fn strings_at(args: &[Token<'_>], index: usize) -> Vec<String> {
    match args.get(index) {
        Some(Token::List(items)) => items
            .iter()
            .filter_map(|t| match t {
                Token::String(s) => Some(decode_string(s)),
                _ => None,
            })
            .collect(),
        Some(Token::String(s)) => vec![decode_string(s)],
        _ => Vec::new(),
    }
}

fn quoted(s: &str) -> String {
    format!("'{}'", encode_string(s))
}

fn string_list(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| quoted(s)).collect();
    format!("({})", inner.join(","))
}

/// Format a time as `YYYY-MM-DDTHH:MM:SS` (UTC)
pub fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S").to_string()
}
