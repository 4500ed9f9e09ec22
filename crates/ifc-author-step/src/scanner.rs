// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity scanner for the DATA section
//!
//! Finds instance boundaries with memchr without tokenizing attributes.

use ifc_author_model::{ModelError, Result};
use memchr::{memchr, memmem};

const END_SECTION: &[u8] = b"ENDSEC;";

/// Scanned instance: id, type keyword and byte range of the whole record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScannedEntity<'a> {
    pub id: u32,
    pub type_name: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Walks the instances of a STEP file in file order
///
/// Records may be separated by any whitespace and `/* */` comments. Any
/// other text between records is reported as an error and ends the scan.
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner positioned after the `DATA;` marker
    pub fn new(content: &'a str) -> Self {
        let pos = content.find("DATA;").map(|p| p + 5).unwrap_or(0);
        Self {
            content,
            pos,
            done: false,
        }
    }

    fn skip_blanks(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len() && matches!(bytes[self.pos], b' ' | b'\t') {
            self.pos += 1;
        }
    }

    /// Skip whitespace and comments up to the next significant byte
    fn skip_separators(&mut self) -> Result<()> {
        let bytes = self.content.as_bytes();
        loop {
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if !bytes[self.pos..].starts_with(b"/*") {
                return Ok(());
            }
            match memmem::find(&bytes[self.pos + 2..], b"*/") {
                Some(len) => self.pos += len + 4,
                None => return Err(self.error("unterminated comment")),
            }
        }
    }

    fn error(&self, msg: &str) -> ModelError {
        ModelError::format(format!("{} at byte {} of the DATA section", msg, self.pos))
    }

    /// Scan to the next instance
    ///
    /// Returns `Ok(None)` at `ENDSEC;` or at the end of the content.
    pub fn next_entity(&mut self) -> Result<Option<ScannedEntity<'a>>> {
        let bytes = self.content.as_bytes();
        self.skip_separators()?;
        if self.pos >= bytes.len() || bytes[self.pos..].starts_with(END_SECTION) {
            return Ok(None);
        }
        if bytes[self.pos] != b'#' {
            return Err(self.error("expected an instance name"));
        }

        let start = self.pos;
        self.pos += 1;
        let id_start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let id = self.content[id_start..self.pos]
            .parse::<u32>()
            .map_err(|_| self.error("invalid instance name"))?;

        self.skip_blanks();
        if bytes.get(self.pos) != Some(&b'=') {
            return Err(self.error("expected '=' after the instance name"));
        }
        self.pos += 1;
        self.skip_blanks();

        let type_start = self.pos;
        while self.pos < bytes.len()
            && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
        if self.pos == type_start {
            return Err(self.error("expected a type keyword"));
        }
        let type_name = &self.content[type_start..self.pos];

        let end = self
            .find_entity_end()
            .ok_or_else(|| self.error("unterminated instance"))?;
        Ok(Some(ScannedEntity {
            id,
            type_name,
            start,
            end,
        }))
    }

    /// Find the terminating semicolon, skipping quoted strings
    fn find_entity_end(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut in_string = false;

        while self.pos < bytes.len() {
            if in_string {
                self.pos += memchr(b'\'', &bytes[self.pos..])?;
                if bytes.get(self.pos + 1) == Some(&b'\'') {
                    self.pos += 2;
                    continue;
                }
                in_string = false;
            } else {
                match bytes[self.pos] {
                    b'\'' => in_string = true,
                    b';' => {
                        self.pos += 1;
                        return Some(self.pos);
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }

        None
    }
}

impl<'a> Iterator for EntityScanner<'a> {
    type Item = Result<ScannedEntity<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_entity().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}
