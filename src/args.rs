//! These structs provide the CLI interface for the ledger-face CLI.

use crate::pipeline::Preset;
use crate::source::InputKind;
use crate::Config;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// ledger-face: Draws cartoon faces from your spending.
///
/// Give it a CSV export of your transactions and it draws one face per day: the more you spent
/// in a category, the bigger the feature that category drives. Give it a PDF bank statement and
/// it draws a single face that smiles or frowns with the balance.
///
/// Which columns are read, which categories are kept and which category drives which feature
/// are set in a config file. Run `ledger-face init` to create one.
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a config file from one of the built-in presets.
    ///
    /// - budget: Grocery, Transportation, Go out to eat and Tithing.
    /// - household: Housing, Transport, Food and Entertainment.
    /// - open: every category is kept, the faces follow the budget categories.
    ///
    /// Edit the file afterwards to rename columns, change categories or tune feature ranges.
    Init(InitArgs),
    /// Draw the faces for a CSV export or a PDF statement.
    Faces(FacesArgs),
    /// Print the per-day category totals, the maxima and any warnings.
    Summary(SummaryArgs),
    /// Print the JSON schema of the config file.
    Schema,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter docs.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The config file. Defaults to ledger-face/config.json in your config directory.
    #[arg(long, env = "LEDGER_FACE_CONFIG")]
    config: Option<PathBuf>,
}

impl Common {
    pub fn new(log_level: LevelFilter, config: Option<PathBuf>) -> Self {
        Self { log_level, config }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// The config path given on the command line, or the default one.
    pub fn config(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }
}

/// (Not shown): Args for the `ledger-face init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Which category set to start from.
    #[arg(long, value_enum, default_value_t = Preset::Budget)]
    preset: Preset,

    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

impl InitArgs {
    pub fn new(preset: Preset, force: bool) -> Self {
        Self { preset, force }
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn force(&self) -> bool {
        self.force
    }
}

/// The file format written by `ledger-face faces`.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A drawing.
    #[default]
    Svg,
    /// The face parameters themselves.
    Json,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// (Not shown): Args for the `ledger-face faces` command.
#[derive(Debug, Parser, Clone)]
pub struct FacesArgs {
    /// The CSV export or PDF statement to read.
    file: PathBuf,

    /// Where to write the output. Defaults to the input path with an .svg or .json extension.
    #[arg(long)]
    out: Option<PathBuf>,

    /// What to write.
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// How to read the input. Inferred from the file extension when not given.
    #[arg(long, value_enum)]
    kind: Option<InputKind>,
}

impl FacesArgs {
    pub fn new(
        file: impl Into<PathBuf>,
        out: Option<PathBuf>,
        format: OutputFormat,
        kind: Option<InputKind>,
    ) -> Self {
        Self {
            file: file.into(),
            out,
            format,
            kind,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// The output path, defaulting to `file` with its extension swapped for the format's.
    pub fn out(&self) -> PathBuf {
        match &self.out {
            Some(out) => out.clone(),
            None => self.file.with_extension(self.format.to_string()),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn kind(&self) -> Option<InputKind> {
        self.kind
    }
}

/// (Not shown): Args for the `ledger-face summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The CSV export or PDF statement to read.
    file: PathBuf,

    /// How to read the input. Inferred from the file extension when not given.
    #[arg(long, value_enum)]
    kind: Option<InputKind>,
}

impl SummaryArgs {
    pub fn new(file: impl Into<PathBuf>, kind: Option<InputKind>) -> Self {
        Self {
            file: file.into(),
            kind,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn kind(&self) -> Option<InputKind> {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ledger-face").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_faces_args() {
        let args = parse(&[
            "--log-level",
            "debug",
            "--config",
            "/tmp/lf.json",
            "faces",
            "may.pdf",
            "--format",
            "json",
        ]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().config(), PathBuf::from("/tmp/lf.json"));
        match args.command() {
            Command::Faces(faces) => {
                assert_eq!(faces.file(), Path::new("may.pdf"));
                assert_eq!(faces.format(), OutputFormat::Json);
                assert_eq!(faces.out(), PathBuf::from("may.json"));
                assert_eq!(faces.kind(), None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_init_args() {
        let args = parse(&["init", "--preset", "household", "--force"]);
        match args.command() {
            Command::Init(init) => {
                assert_eq!(init.preset(), Preset::Household);
                assert!(init.force());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_summary_kind_override() {
        let args = parse(&["summary", "export.txt", "--kind", "csv"]);
        match args.command() {
            Command::Summary(summary) => assert_eq!(summary.kind(), Some(InputKind::Csv)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_bad_preset_is_rejected() {
        let result = Args::try_parse_from(["ledger-face", "init", "--preset", "lavish"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_override() {
        let faces = FacesArgs::new("a.csv", Some(PathBuf::from("b.svg")), OutputFormat::Svg, None);
        assert_eq!(faces.out(), PathBuf::from("b.svg"));
    }
}
