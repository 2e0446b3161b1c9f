//! Diagnostic formatting and printing.
//!
//! Kept separate from the compiler so glossa can be used as a library
//! without printing side effects; the compiler only ever returns
//! diagnostics, it never writes them anywhere itself.

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::diagnostic::Diagnostic;

/// Success mark for consistent output formatting
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓
/// Failure mark for consistent output formatting
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print diagnostics in a cargo-style format: message, clickable
/// `path:line:col` location, and the source line with a caret under the
/// offending span.
pub fn print_report(diagnostics: &[Diagnostic]) {
    let mut sorted = diagnostics.to_vec();
    sorted.sort();

    let max_line_width = sorted
        .iter()
        .filter_map(|d| d.location.as_ref().map(|l| l.line))
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1);

    for diagnostic in &sorted {
        println!("{}: {}", "error".bold().red(), diagnostic.text);

        let Some(location) = &diagnostic.location else {
            println!();
            continue;
        };

        // Columns are stored 0-based; display as 1-based like cargo does.
        println!(
            "  {} {}:{}:{}",
            "-->".blue(),
            location.file,
            location.line,
            location.column + 1
        );

        println!("{:>width$} {}", "", "|".blue(), width = max_line_width);
        println!(
            "{:>width$} {} {}",
            location.line.to_string().blue(),
            "|".blue(),
            location.line_text,
            width = max_line_width
        );

        // Use unicode display width so the caret lines up under CJK text.
        let prefix = &location.line_text[..location.column.min(location.line_text.len())];
        let padding = UnicodeWidthStr::width(prefix);
        let carets = "^".repeat(location.length.max(1));
        println!(
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            carets.red(),
            width = max_line_width,
            padding = padding
        );
        println!();
    }

    let total = sorted.len();
    if total > 0 {
        println!(
            "{} {} {}",
            FAILURE_MARK.red(),
            total,
            if total == 1 { "problem" } else { "problems" }
        );
    }
}

/// Print a success message when a document compiled cleanly.
pub fn print_success(file: &str, message_count: usize) {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Compiled {} - {} {}, no problems",
            file,
            message_count,
            if message_count == 1 {
                "message"
            } else {
                "messages"
            }
        )
        .green()
    );
}
