// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command line options

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "wall_door_window.ifc";

#[derive(Debug, Parser)]
#[command(
    name = "wall-door-window",
    about = "Write an IFC4 scene with two walls, a door and two windows",
    version
)]
pub struct Cli {
    /// Output IFC file
    #[arg(short, long, value_name = "FILE", env = "IFC_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Read the written file back and log what it contains
    #[arg(long)]
    pub verify: bool,

    /// Print the summary of the written file as JSON (implies --verify)
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn verifies(&self) -> bool {
        self.verify || self.json
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["wall-door-window"]).unwrap();
        assert!(!cli.verifies());
        // IFC_OUTPUT may be set in the environment running the tests
        if std::env::var_os("IFC_OUTPUT").is_none() {
            assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT));
        }
    }

    #[test]
    fn test_json_implies_verify() {
        let cli = Cli::try_parse_from(["wall-door-window", "-o", "out.ifc", "--json"]).unwrap();
        assert_eq!(cli.output, PathBuf::from("out.ifc"));
        assert!(cli.verifies());
    }
}
