use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{Arguments, CheckArgs, Command, CompileArgs, ExitStatus};
use crate::compiler;
use crate::reporter;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    match args.command {
        Command::Compile(args) => compile(args),
        Command::Check(args) => check(args),
    }
}

fn compile(args: CompileArgs) -> Result<ExitStatus> {
    let file = args.file.to_string_lossy().to_string();
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read message document: {}", file))?;

    let result = compiler::compile(&source, &file);

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.file));
    fs::write(&output, &result.generated)
        .with_context(|| format!("Failed to write generated module: {}", output.display()))?;

    finish(&file, &source, &result)
}

fn check(args: CheckArgs) -> Result<ExitStatus> {
    let file = args.file.to_string_lossy().to_string();
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read message document: {}", file))?;

    let result = compiler::compile(&source, &file);
    finish(&file, &source, &result)
}

fn finish(file: &str, source: &str, result: &compiler::CompileResult) -> Result<ExitStatus> {
    if result.diagnostics.is_empty() {
        reporter::print_success(file, message_count(source));
        Ok(ExitStatus::Success)
    } else {
        reporter::print_report(&result.diagnostics);
        Ok(ExitStatus::Failure)
    }
}

/// Message count for the success summary.
fn message_count(source: &str) -> usize {
    crate::document::parse(source)
        .ok()
        .and_then(|root| root.as_mapping().map(|entries| entries.len()))
        .unwrap_or(0)
}

fn default_output(input: &PathBuf) -> PathBuf {
    input.with_extension("rs")
}
