use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::args::Command;

pub fn run(command: Command) -> Result<i32> {
    match command {
        Command::Extract { dir, out } => run_extract(&dir, &out),
        Command::Emit { schema, out } => run_emit(&schema, &out),
        Command::Check { schema, type_name } => run_check(&schema, &type_name),
    }
}

fn run_extract(dir: &Path, out: &Path) -> Result<i32> {
    let schema = tyval_extractor::extract_dir(dir)
        .with_context(|| format!("extracting declarations from {}", dir.display()))?;
    let json = schema.to_json().context("serializing extracted schema")?;
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(
        types = schema.types.len(),
        asserted = schema.asserted_types.len(),
        out = %out.display(),
        "extracted schema"
    );
    Ok(0)
}

fn run_emit(schema_path: &Path, out_dir: &Path) -> Result<i32> {
    let json = std::fs::read_to_string(schema_path)
        .with_context(|| format!("reading {}", schema_path.display()))?;
    let schema = tyval_schema::Schema::load(&json)
        .with_context(|| format!("parsing {}", schema_path.display()))?;
    tyval_emitter::emit(&schema, out_dir)
        .with_context(|| format!("emitting validators to {}", out_dir.display()))?;
    Ok(0)
}

fn run_check(schema_path: &Path, type_name: &str) -> Result<i32> {
    let json = std::fs::read_to_string(schema_path)
        .with_context(|| format!("reading {}", schema_path.display()))?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading value from stdin")?;

    let diagnostic = check_value_json(&json, type_name, &input)?;
    if diagnostic.is_empty() {
        Ok(0)
    } else {
        println!("{diagnostic}");
        Ok(1)
    }
}

/// Checks a JSON value (given as text) against a named type in a schema
/// (given as JSON text), returning `""` on conformance. Split out of
/// [`run_check`] so it is testable without touching stdin.
fn check_value_json(schema_json: &str, type_name: &str, value_json: &str) -> Result<String> {
    let schema = tyval_schema::Schema::load(schema_json).context("parsing schema JSON")?;
    let ty = schema
        .types
        .get(type_name)
        .with_context(|| format!("no type named '{type_name}' in schema"))?;
    let value: serde_json::Value =
        serde_json::from_str(value_json).context("parsing value as JSON")?;
    tyval_checker::check_value_against_type(&value, ty, &schema)
        .context("checking value against schema")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_schema_json() -> String {
        r#"{
            "types": {
                "Widget": {
                    "kind": "interface",
                    "name": "Widget",
                    "fields": [
                        {"name": "id", "optional": false, "type": {"kind": "string"}}
                    ],
                    "heritage": []
                }
            },
            "assertedTypes": ["Widget"]
        }"#
        .to_string()
    }

    #[test]
    fn check_value_json_accepts_conforming_value() {
        let diagnostic =
            check_value_json(&sample_schema_json(), "Widget", r#"{"id": "x"}"#).unwrap();
        assert_eq!(diagnostic, "");
    }

    #[test]
    fn check_value_json_reports_missing_field() {
        let diagnostic = check_value_json(&sample_schema_json(), "Widget", "{}").unwrap();
        assert!(diagnostic.contains("Missing required field 'id'"));
    }

    #[test]
    fn check_value_json_rejects_unknown_type_name() {
        let err = check_value_json(&sample_schema_json(), "Missing", "{}").unwrap_err();
        assert!(err.to_string().contains("no type named 'Missing'"));
    }

    #[test]
    fn run_extract_writes_schema_json_from_annotated_source() {
        let src_dir = tempdir().unwrap();
        std::fs::write(
            src_dir.path().join("widget.ts"),
            "// tyval:file\ninterface Widget {\n  id: string;\n}\n",
        )
        .unwrap();
        let out_dir = tempdir().unwrap();
        let out_path = out_dir.path().join("schema.json");

        run_extract(src_dir.path(), &out_path).unwrap();

        let written = std::fs::read_to_string(&out_path).unwrap();
        assert!(written.contains("Widget"));
    }
}
