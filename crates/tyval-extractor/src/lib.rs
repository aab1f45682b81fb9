//! Reads annotated type declarations from source files and lowers them
//! into a persisted [`tyval_schema::Schema`] (spec §4.5).
//!
//! This is not a TypeScript scanner/parser: spec.md explicitly leaves the
//! extractor's parser unspecified, so [`lexer`]/[`typeexpr`] implement only
//! the restricted `TypeExpr` grammar the extractor is allowed to lower.

pub mod decl;
pub mod error;
pub mod lexer;
pub mod lower;
pub mod typeexpr;

pub use error::ExtractError;

use std::path::{Path, PathBuf};

use tyval_schema::Schema;

/// Walks `dir` recursively for `.ts` files (deterministic, depth-first,
/// sorted order), scans each for opted-in declarations, and lowers the
/// union of all files into one schema.
pub fn extract_dir(dir: &Path) -> Result<Schema, ExtractError> {
    let mut files = Vec::new();
    collect_ts_files(dir, &mut files)?;
    files.sort();

    let mut decls = Vec::new();
    for path in &files {
        let display = path.display().to_string();
        let _span = tracing::debug_span!("extract_file", file = %display).entered();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ExtractError::Io(display.clone(), e.to_string()))?;
        let file_decls = decl::scan_file(&display, &source)?;
        tracing::debug!(file = %display, declarations = file_decls.len(), "scanned file");
        decls.extend(file_decls);
    }
    lower::build_schema(decls)
}

fn collect_ts_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ExtractError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ExtractError::Io(dir.display().to_string(), e.to_string()))?;
    for entry in entries {
        let entry = entry.map_err(|e| ExtractError::Io(dir.display().to_string(), e.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            collect_ts_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "ts") {
            out.push(path);
        }
    }
    Ok(())
}
