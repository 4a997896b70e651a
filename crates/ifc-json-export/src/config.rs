// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export configuration and its command-line surface

use clap::{ArgAction, Parser};
use ifc_json_geometry::TessellationSettings;
use log::LevelFilter;
use std::path::PathBuf;

/// Output file name used when none is given
pub const DEFAULT_OUTPUT_NAME: &str = "json_listData.json";

/// Settings for one conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Model file to convert
    pub input: PathBuf,
    /// Directory the document is written to
    pub output_dir: PathBuf,
    /// Document file name
    pub output_name: String,
    /// Kernel options (strict tolerance, world coordinates)
    pub tessellation: TessellationSettings,
    /// Drop products whose geometry fails instead of aborting
    pub skip_failed_geometry: bool,
}

impl ExportConfig {
    /// Configuration with defaults for everything but the input
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            tessellation: TessellationSettings::default(),
            skip_failed_geometry: false,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }
}

/// Convert an IFC model into a flat JSON document
#[derive(Parser, Debug, Clone)]
#[command(name = "ifc2json", version, about)]
pub struct Cli {
    /// IFC (STEP) model file
    #[arg(env = "IFC2JSON_INPUT")]
    pub input: PathBuf,

    /// Output directory (created if missing)
    #[arg(short = 'o', long, env = "IFC2JSON_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output file name
    #[arg(short = 'n', long, env = "IFC2JSON_OUTPUT_NAME", default_value = DEFAULT_OUTPUT_NAME)]
    pub output_name: String,

    /// Fail on any representation item that cannot be tessellated
    #[arg(long, env = "IFC2JSON_STRICT_TOLERANCE", default_value_t = true, action = ArgAction::Set)]
    pub strict_tolerance: bool,

    /// Place geometry in world coordinates
    #[arg(long, env = "IFC2JSON_WORLD_COORDS", default_value_t = true, action = ArgAction::Set)]
    pub world_coords: bool,

    /// Skip products whose geometry fails instead of aborting
    #[arg(long, env = "IFC2JSON_SKIP_FAILED_GEOMETRY")]
    pub skip_failed_geometry: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Less logging (-q warn, -qq error)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    /// Default log level, used when `RUST_LOG` is unset
    pub fn log_level(&self) -> LevelFilter {
        match (self.verbose, self.quiet) {
            (0, 0) => LevelFilter::Info,
            (1, _) => LevelFilter::Debug,
            (v, _) if v > 1 => LevelFilter::Trace,
            (_, 1) => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    }
}

impl From<Cli> for ExportConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            output_dir: cli.output_dir,
            output_name: cli.output_name,
            tessellation: TessellationSettings {
                strict_tolerance: cli.strict_tolerance,
                use_world_coords: cli.world_coords,
            },
            skip_failed_geometry: cli.skip_failed_geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ifc2json", "model.ifc"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Info);

        let config = ExportConfig::from(cli);
        assert_eq!(config, ExportConfig::new("model.ifc"));
        assert_eq!(config.output_path(), PathBuf::from("./json_listData.json"));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "ifc2json",
            "model.ifc",
            "-o",
            "out",
            "-n",
            "walls.json",
            "--strict-tolerance",
            "false",
            "--world-coords",
            "false",
            "--skip-failed-geometry",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Trace);

        let config = ExportConfig::from(cli);
        assert_eq!(config.output_path(), PathBuf::from("out/walls.json"));
        assert!(!config.tessellation.strict_tolerance);
        assert!(!config.tessellation.use_world_coords);
        assert!(config.skip_failed_geometry);
    }

    #[test]
    fn test_quiet_and_missing_input() {
        let cli = Cli::try_parse_from(["ifc2json", "-q", "model.ifc"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        assert!(Cli::try_parse_from(["ifc2json", "-v", "-q", "model.ifc"]).is_err());
    }
}
