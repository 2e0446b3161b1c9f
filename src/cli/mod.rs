//! Command-line interface.
//!
//! Two commands: `compile` turns a message document into a generated Rust
//! module, `check` reports diagnostics without writing anything. Both
//! exit non-zero when the document has problems so build pipelines can
//! gate on them.

mod run;

pub use run::run_cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a message document into a generated Rust module
    Compile(CompileArgs),
    /// Validate a message document and report diagnostics
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Path to the message document
    pub file: PathBuf,

    /// Output path for the generated module (defaults to the input path
    /// with an .rs extension)
    #[arg(short, long, env = "GLOSSA_OUT")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the message document
    pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Compiled with no diagnostics.
    Success,
    /// Compiled, but diagnostics were reported.
    Failure,
    /// The tool itself failed (I/O, bad arguments).
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
