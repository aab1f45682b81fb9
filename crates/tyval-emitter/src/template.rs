//! Renders the generated Rust source file (spec §4.4) for a schema: one
//! `assert_<type>` function per asserted type, one `assert_<format>` per
//! referenced built-in string format, and the `OnceLock<Schema>` they share.

use tyval_schema::Schema;

use crate::formats::referenced_formats;
use crate::naming::to_snake_case;

pub fn render(schema: &Schema, schema_json_filename: &str) -> String {
    let mut out = String::new();
    out.push_str("// Generated by tyval-emitter. Do not edit by hand.\n\n");
    out.push_str("use std::sync::OnceLock;\n\n");
    out.push_str("static SCHEMA: OnceLock<tyval_schema::Schema> = OnceLock::new();\n\n");
    out.push_str("fn load_schema() -> tyval_schema::Schema {\n");
    out.push_str(&format!(
        "    tyval_schema::Schema::load(include_str!(\"{schema_json_filename}\")).expect(\"embedded schema JSON is valid\")\n"
    ));
    out.push_str("}\n\n");

    for type_name in &schema.asserted_types {
        out.push_str(&render_assert_fn(type_name));
        out.push('\n');
    }

    for format_name in referenced_formats(schema) {
        out.push_str(&render_format_assert_fn(&format_name));
        out.push('\n');
    }

    out
}

fn render_assert_fn(type_name: &str) -> String {
    let fn_name = to_snake_case(type_name);
    format!(
        "pub fn assert_{fn_name}(value: &serde_json::Value) -> Result<serde_json::Value, String> {{\n    \
            let schema = SCHEMA.get_or_init(load_schema);\n    \
            let ty = schema.types.get(\"{type_name}\").expect(\"asserted type present in embedded schema\");\n    \
            let msg = tyval_checker::check_value_against_type(value, ty, schema)\n        \
                .expect(\"embedded schema resolves without error\");\n    \
            if msg.is_empty() {{ Ok(value.clone()) }} else {{ Err(msg) }}\n\
        }}\n"
    )
}

fn render_format_assert_fn(format_name: &str) -> String {
    let fn_name = to_snake_case(format_name);
    format!(
        "pub fn assert_{fn_name}(value: &serde_json::Value) -> Result<serde_json::Value, String> {{\n    \
            let schema = SCHEMA.get_or_init(load_schema);\n    \
            let ty = tyval_schema::TypeNode::String(tyval_schema::types::StringNode {{\n        \
                common: tyval_schema::CommonAttrs::default(),\n        \
                special_name: Some(\"{format_name}\".to_string()),\n    \
            }});\n    \
            let msg = tyval_checker::check_value_against_type(value, &ty, schema)\n        \
                .expect(\"embedded schema resolves without error\");\n    \
            if msg.is_empty() {{ Ok(value.clone()) }} else {{ Err(msg) }}\n\
        }}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn renders_one_function_per_asserted_type() {
        let schema = Schema {
            types: IndexMap::new(),
            asserted_types: vec!["UserProfile".to_string()],
        };
        let rendered = render(&schema, "schema.json");
        assert!(rendered.contains("pub fn assert_user_profile"));
        assert!(rendered.contains("include_str!(\"schema.json\")"));
    }
}
