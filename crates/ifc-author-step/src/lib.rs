// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Author STEP - ISO-10303-21 codec
//!
//! Writes authored entities as a STEP physical file and reads such files back
//! for verification.
//!
//! # Architecture
//!
//! - **Writer**: header records plus one `#n=CLASS(...);` line per instance
//! - **Scanner**: memchr-based discovery of instance boundaries
//! - **Tokenizer**: nom-based decoding of attribute lists
//! - **Reader**: eager [`StepModel`] implementing `EntityResolver`
//! - **Summary**: counts, relationships and the spatial tree as JSON-ready data
//!
//! # Example
//!
//! ```ignore
//! use ifc_author_step::{ModelSummary, StepModel};
//!
//! let model = StepModel::read_file("wall_door_window.ifc")?;
//! let summary = ModelSummary::build(&model, model.header().schema_identifier());
//! println!("{}", summary.to_json()?);
//! ```

pub mod encoding;
pub mod header;
pub mod reader;
pub mod scanner;
pub mod summary;
pub mod tokenizer;
pub mod writer;

pub use header::{iso_timestamp, FileHeader};
pub use reader::StepModel;
pub use scanner::{EntityScanner, ScannedEntity};
pub use summary::{ModelSummary, RelationSummary};
pub use tokenizer::{parse_entity, parse_entity_at, Token};
pub use writer::{entity_line, StepWriter};
