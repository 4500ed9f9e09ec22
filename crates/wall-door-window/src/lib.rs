// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall, door and window demo
//!
//! [`ModelGenerator`] wraps the authoring API with the storey and body
//! context of a fresh project; [`build_scene`] runs the fixed sequence that
//! produces two walls, a door opening with its door and a window opening
//! with two windows.

pub mod generator;
pub mod scene;

pub use generator::ModelGenerator;
pub use scene::{build_scene, Scene};
