//! Build-time compiler: document validation and code generation.
//!
//! Compilation always runs to completion: structural, syntax, and semantic
//! problems become diagnostics and the surviving messages are still
//! generated. Only the caller decides whether diagnostics are fatal.

mod codegen;
mod validator;

pub use codegen::emit;
pub use validator::{CompiledMessage, validate};

use crate::diagnostic::Diagnostic;
use crate::document;

/// Output of one compile pass over one document.
#[derive(Debug)]
pub struct CompileResult {
    /// Source text of the generated Rust module.
    pub generated: String,
    /// Every problem found, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile a message document from source text.
///
/// A document that fails to parse at all yields one diagnostic and an
/// empty generated module; everything past parsing degrades per entry.
pub fn compile(source: &str, file: &str) -> CompileResult {
    let root = match document::parse(source) {
        Ok(root) => root,
        Err(err) => {
            return CompileResult {
                generated: emit(&[]),
                diagnostics: vec![Diagnostic::unlocated(format!(
                    "failed to parse {}: {}",
                    file, err
                ))],
            };
        }
    };
    let (messages, diagnostics) = validate(&root, file, source);
    CompileResult {
        generated: emit(&messages),
        diagnostics,
    }
}
