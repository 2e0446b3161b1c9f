//! Glossa - message-document compiler and runtime localization
//!
//! Glossa compiles a multi-locale message document into a generated Rust
//! module of typed message factories, with every diagnostic mapped back to
//! an exact line/column span in the original document. At runtime the
//! factories resolve locales via BCP-47 fallback, cache per-tag
//! resolutions, and format messages to plain strings or markup-aware
//! parts sequences.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (compile/check commands)
//! - `compiler`: Document validation and code generation
//! - `diagnostic`: Diagnostic and source-span types
//! - `document`: Parsed message-document tree with source ranges
//! - `location`: Offset-to-line/column mapping, block-literal aware
//! - `render`: Parts-to-render-tree reconstruction
//! - `reporter`: Diagnostic printing
//! - `runtime`: Message factories, locale resolution, formatter cache
//! - `template`: ICU-style template parser, validator, and formatter

pub mod cli;
pub mod compiler;
pub mod diagnostic;
pub mod document;
pub mod location;
pub mod render;
pub mod reporter;
pub mod runtime;
pub mod template;
