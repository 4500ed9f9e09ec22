// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC GlobalId (compressed GUID)
//!
//! IfcRoot entities carry a 22 character identifier: the 128 bits of a UUID
//! written big-endian in the IFC base-64 alphabet. The leading character only
//! holds the top two bits.

use crate::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of a compressed GlobalId
pub const GLOBAL_ID_LEN: usize = 22;

/// Compressed IFC GUID
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct GlobalId(String);

impl GlobalId {
    /// Fresh GlobalId from a random (v4) UUID
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Compress a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        let value = uuid.as_u128();
        let encoded = (0..GLOBAL_ID_LEN)
            .map(|i| {
                let shift = 6 * (GLOBAL_ID_LEN - 1 - i);
                ALPHABET[((value >> shift) & 0x3f) as usize] as char
            })
            .collect();
        GlobalId(encoded)
    }

    /// Restore the UUID this GlobalId was compressed from
    pub fn expand(&self) -> Uuid {
        // Validated on construction, so every character is in the alphabet
        let value = self
            .0
            .bytes()
            .filter_map(digit)
            .fold(0u128, |acc, d| (acc << 6) | d as u128);
        Uuid::from_u128(value)
    }

    /// Borrow the 22 character string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GlobalId {
    fn default() -> Self {
        Self::new()
    }
}

fn digit(c: u8) -> Option<u8> {
    ALPHABET.iter().position(|a| *a == c).map(|p| p as u8)
}

impl FromStr for GlobalId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != GLOBAL_ID_LEN {
            return Err(ModelError::InvalidGlobalId(s.to_string()));
        }
        let bytes = s.as_bytes();
        // First character carries 2 bits only
        match digit(bytes[0]) {
            Some(d) if d < 4 => {}
            _ => return Err(ModelError::InvalidGlobalId(s.to_string())),
        }
        if bytes[1..].iter().any(|c| digit(*c).is_none()) {
            return Err(ModelError::InvalidGlobalId(s.to_string()));
        }
        Ok(GlobalId(s.to_string()))
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
