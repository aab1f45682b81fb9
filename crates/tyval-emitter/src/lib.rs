//! Emits a canonical schema JSON file plus one generated Rust source file
//! exposing `assert_<type>`/`assert_<format>` entry points (spec §4.4).

pub mod error;
mod formats;
mod naming;
mod template;

pub use error::EmitError;

use std::fs;
use std::path::Path;

use tyval_schema::Schema;

const SCHEMA_JSON_FILENAME: &str = "schema.json";
const VALIDATORS_FILENAME: &str = "validators.rs";

/// Writes `<out_dir>/schema.json` (canonical, pretty-printed) and
/// `<out_dir>/validators.rs` (generated Rust source) for `schema`.
pub fn emit(schema: &Schema, out_dir: &Path) -> Result<(), EmitError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| EmitError::Io(out_dir.display().to_string(), e))?;

    let json = schema.to_json()?;
    let json_path = out_dir.join(SCHEMA_JSON_FILENAME);
    fs::write(&json_path, &json)
        .map_err(|e| EmitError::Io(json_path.display().to_string(), e))?;
    tracing::info!(path = %json_path.display(), "wrote schema JSON");

    let rendered = template::render(schema, SCHEMA_JSON_FILENAME);
    let rs_path = out_dir.join(VALIDATORS_FILENAME);
    fs::write(&rs_path, &rendered)
        .map_err(|e| EmitError::Io(rs_path.display().to_string(), e))?;
    tracing::info!(
        path = %rs_path.display(),
        asserted_types = schema.asserted_types.len(),
        "wrote generated validators"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::tempdir;

    #[test]
    fn emit_writes_both_files() {
        let schema = Schema {
            types: IndexMap::new(),
            asserted_types: vec![],
        };
        let dir = tempdir().unwrap();
        emit(&schema, dir.path()).unwrap();
        assert!(dir.path().join(SCHEMA_JSON_FILENAME).exists());
        assert!(dir.path().join(VALIDATORS_FILENAME).exists());
    }
}
