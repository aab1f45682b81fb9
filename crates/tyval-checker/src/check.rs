//! The recursive conformance interpreter (spec §4.3).

use serde_json::Value;
use tyval_common::SchemaError;
use tyval_schema::properties::compute_properties_of_type;
use tyval_schema::schema::{is_enum, resolve_type, type_to_string};
use tyval_schema::types::{
    ArrayNode, BooleanLiteralNode, BooleanNode, IndexSignatureNode, InterfaceNode,
    IntersectionNode, KeyofNode, MappedNode, NumberLiteralNode, NumberNode, OmitNode, PartialNode,
    StringLiteralNode, StringNode, UnionNode,
};
use tyval_schema::{Schema, TypeNode};

use crate::display::{actual_repr, js_type_name, ordinal, quoted_list, short_type_header, short_value};
use crate::failure::{fail, CheckResult, Outcome};
use crate::formats;

/// Per-frame descent options (spec §4.3 `options = { partial?, ignoredFields? }`).
#[derive(Debug, Clone, Default)]
struct Options {
    partial: bool,
    ignored_fields: Vec<String>,
}

impl Options {
    fn carry_ignored(&self) -> Options {
        Options {
            partial: false,
            ignored_fields: self.ignored_fields.clone(),
        }
    }

    /// Used only for a partial interface's heritage walk: §4.3 "Heritage
    /// walks inside a partial inherit partiality for this level only."
    fn carry_ignored_and_partial(&self) -> Options {
        Options {
            partial: self.partial,
            ignored_fields: self.ignored_fields.clone(),
        }
    }
}

/// Public entry point (spec §4.3 / §6). Returns `Ok("")` on conformance,
/// `Ok(<diagnostic>)` on a conformance failure, and `Err(SchemaError)` only
/// for schema-level programming errors (undefined reference, a `keyof`
/// over a type with an infinite property set, `Partial` over a
/// non-interface).
pub fn check_value_against_type(
    value: &Value,
    ty: &TypeNode,
    schema: &Schema,
) -> Result<String, SchemaError> {
    let options = Options::default();
    let root_path = "value".to_string();
    let root_type_path = type_path_of(schema, ty);
    match check(value, ty, schema, &root_path, &root_type_path, &options, 0) {
        Ok(()) => Ok(String::new()),
        Err(Outcome::Schema(e)) => Err(e),
        Err(Outcome::Check(inner)) => Ok(compose_diagnostic(value, ty, schema, &inner)),
    }
}

fn compose_diagnostic(value: &Value, ty: &TypeNode, schema: &Schema, inner: &str) -> String {
    let (value_header, needs_value_trailer) = short_value(value);
    let (type_header, needs_type_trailer) = short_type_header(schema, ty);
    let mut out = format!("{value_header} does not conform to {type_header}!\n\n{inner}");
    if needs_value_trailer {
        out.push_str(&format!(
            "\nvalue = {}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        ));
    }
    if needs_type_trailer {
        out.push_str(&format!(
            "\n{} = {}",
            crate::display::TYPE_PLACEHOLDER,
            serde_json::to_string_pretty(ty).unwrap_or_default()
        ));
    }
    out
}

fn type_path_of(schema: &Schema, node: &TypeNode) -> String {
    crate::display::short_type_path(schema, node)
}

/// Runs `check` and, on a `CheckFailure`, appends a single `While checking
/// <valuePath> against type <typePath>` line before rethrowing (spec §4.3
/// descent protocol). `SchemaError` outcomes pass through unchanged.
fn recurse(
    value: &Value,
    ty: &TypeNode,
    schema: &Schema,
    value_path: &str,
    type_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    check(value, ty, schema, value_path, type_path, options, depth).map_err(|outcome| match outcome
    {
        Outcome::Schema(e) => Outcome::Schema(e),
        Outcome::Check(msg) => {
            Outcome::Check(format!("{msg}\nWhile checking {value_path} against type {type_path}"))
        }
    })
}

fn check(
    value: &Value,
    ty: &TypeNode,
    schema: &Schema,
    value_path: &str,
    type_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    tracing::trace!(depth = depth as u64, value_path = %value_path, type_path = %type_path, "checking frame");
    let resolved = resolve_type(schema, ty)?;
    match &resolved {
        TypeNode::Unknown(_) => Ok(()),
        TypeNode::String(n) => check_string(value, n),
        TypeNode::Number(n) => check_number(value, n),
        TypeNode::Boolean(n) => check_boolean(value, n),
        TypeNode::Null(_) => check_null(value),
        TypeNode::Undefined(_) => check_undefined(value),
        TypeNode::StringLiteral(lit) => check_string_literal(value, lit),
        TypeNode::NumberLiteral(lit) => check_number_literal(value, lit),
        TypeNode::BooleanLiteral(lit) => check_boolean_literal(value, lit),
        TypeNode::Array(a) => check_array(value, a, schema, value_path, options, depth),
        TypeNode::Interface(iface) => {
            check_interface(value, iface, schema, value_path, options, depth)
        }
        TypeNode::Union(u) => check_union(value, u, schema, value_path, options, depth),
        TypeNode::Intersection(i) => {
            check_intersection(value, i, schema, value_path, type_path, options, depth)
        }
        TypeNode::Mapped(m) => check_mapped(value, m, schema, value_path, options, depth),
        TypeNode::IndexSignature(s) => {
            check_index_signature(value, s, schema, value_path, depth)
        }
        TypeNode::Omit(o) => check_omit(value, o, schema, value_path, type_path, options, depth),
        TypeNode::Keyof(k) => check_keyof(value, k, schema),
        TypeNode::Partial(p) => check_partial(value, p, schema, value_path, options, depth),
        TypeNode::ReferenceType(r) => {
            Err(Outcome::Schema(SchemaError::UndefinedReference(
                r.referenced_type_name.clone(),
            )))
        }
    }
}

fn check_string(value: &Value, n: &StringNode) -> CheckResult {
    let Value::String(s) = value else {
        return fail(format!(
            "Expected Javascript type string, but got type {}",
            js_type_name(value)
        ));
    };
    if let Some(special) = &n.special_name {
        let reason = formats::validate(special, s);
        if !reason.is_empty() {
            return fail(format!(
                "{special} validation failed for {}: {reason}",
                actual_repr(value)
            ));
        }
    }
    Ok(())
}

fn check_number(value: &Value, n: &NumberNode) -> CheckResult {
    let Value::Number(_) = value else {
        return fail(format!(
            "Expected Javascript type number, but got type {}",
            js_type_name(value)
        ));
    };
    // NaN/Infinity are accepted: runtime primitive type is `number` either
    // way (spec §9 Open Questions resolution).
    let _ = n;
    Ok(())
}

fn check_boolean(value: &Value, n: &BooleanNode) -> CheckResult {
    let Value::Bool(_) = value else {
        return fail(format!(
            "Expected Javascript type boolean, but got type {}",
            js_type_name(value)
        ));
    };
    let _ = n;
    Ok(())
}

fn check_null(value: &Value) -> CheckResult {
    if matches!(value, Value::Null) {
        Ok(())
    } else {
        fail(format!(
            "Expected value to be null, but got {}",
            actual_repr(value)
        ))
    }
}

/// JSON has no `undefined` value; a field typed `undefined` is satisfiable
/// only by omission, which the interface/mapped field-presence check
/// handles before ever recursing here. If this frame is reached directly,
/// no JSON value can ever conform.
fn check_undefined(value: &Value) -> CheckResult {
    fail(format!(
        "Expected value to be undefined, but got {}",
        actual_repr(value)
    ))
}

fn check_string_literal(value: &Value, lit: &StringLiteralNode) -> CheckResult {
    let Value::String(s) = value else {
        return fail(format!(
            "Expected Javascript type string, but got type {}",
            js_type_name(value)
        ));
    };
    if s == &lit.value {
        Ok(())
    } else {
        fail(format!(
            "Expected string literal '{}', but got '{}'",
            lit.value, s
        ))
    }
}

fn check_number_literal(value: &Value, lit: &NumberLiteralNode) -> CheckResult {
    let Value::Number(n) = value else {
        return fail(format!(
            "Expected Javascript type number, but got type {}",
            js_type_name(value)
        ));
    };
    let actual = n.as_f64().unwrap_or(f64::NAN);
    if actual == lit.value {
        Ok(())
    } else {
        fail(format!(
            "Expected number literal {}, but got {actual}",
            lit.value
        ))
    }
}

fn check_boolean_literal(value: &Value, lit: &BooleanLiteralNode) -> CheckResult {
    let Value::Bool(b) = value else {
        return fail(format!(
            "Expected Javascript type boolean, but got type {}",
            js_type_name(value)
        ));
    };
    if *b == lit.value {
        Ok(())
    } else {
        fail(format!(
            "Expected boolean literal {}, but got {b}",
            lit.value
        ))
    }
}

fn check_array(
    value: &Value,
    a: &ArrayNode,
    schema: &Schema,
    value_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    let _ = options;
    let Value::Array(items) = value else {
        return fail(format!(
            "Expected an array, but got type {}",
            js_type_name(value)
        ));
    };
    let element_type_path = type_path_of(schema, &a.element_type);
    for (i, item) in items.iter().enumerate() {
        let child_path = format!("{value_path}[{i}]");
        recurse(
            item,
            &a.element_type,
            schema,
            &child_path,
            &element_type_path,
            &Options::default(),
            depth + 1,
        )?;
    }
    Ok(())
}

fn check_interface(
    value: &Value,
    iface: &InterfaceNode,
    schema: &Schema,
    value_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    let Value::Object(map) = value else {
        return fail(format!(
            "Expected an object, but got type {}",
            js_type_name(value)
        ));
    };
    for field in &iface.fields {
        if options.ignored_fields.iter().any(|f| f == &field.name) {
            continue;
        }
        let entry = map.get(&field.name);
        if !options.partial && !field.optional && entry.is_none() {
            return fail(format!("Missing required field '{}'", field.name));
        }
        if let Some(field_value) = entry {
            let child_path = format!("{value_path}['{}']", field.name);
            let field_type_path = type_path_of(schema, &field.ty);
            recurse(
                field_value,
                &field.ty,
                schema,
                &child_path,
                &field_type_path,
                &Options::default(),
                depth + 1,
            )?;
        }
    }
    for heritage in &iface.heritage {
        let base_node = TypeNode::ReferenceType(heritage.clone());
        let base_path = type_path_of(schema, &base_node);
        recurse(
            value,
            &base_node,
            schema,
            value_path,
            &base_path,
            &options.carry_ignored_and_partial(),
            depth + 1,
        )?;
    }
    Ok(())
}

fn check_intersection(
    value: &Value,
    i: &IntersectionNode,
    schema: &Schema,
    value_path: &str,
    type_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    for member in &i.intersection_members {
        let member_path = type_path_of(schema, member);
        let member_path = if member_path.is_empty() {
            type_path.to_string()
        } else {
            member_path
        };
        recurse(
            value,
            member,
            schema,
            value_path,
            &member_path,
            &options.carry_ignored(),
            depth + 1,
        )?;
    }
    Ok(())
}

fn check_mapped(
    value: &Value,
    m: &MappedNode,
    schema: &Schema,
    value_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    let Value::Object(map) = value else {
        return fail(format!(
            "Expected an object, but got type {}",
            js_type_name(value)
        ));
    };
    let map_to_path = type_path_of(schema, &m.map_to);
    let resolved_from = resolve_type(schema, &m.map_from)?;
    if matches!(resolved_from, TypeNode::String(_)) {
        for (key, field_value) in map {
            if options.ignored_fields.iter().any(|f| f == key) {
                continue;
            }
            let child_path = format!("{value_path}['{key}']");
            recurse(
                field_value,
                &m.map_to,
                schema,
                &child_path,
                &map_to_path,
                &Options::default(),
                depth + 1,
            )?;
        }
        return Ok(());
    }

    let keys = is_enum(schema, &resolved_from)?.ok_or_else(|| {
        SchemaError::UnsupportedMapFrom(type_to_string(schema, &m.map_from, true))
    })?;
    for key in keys {
        if options.ignored_fields.iter().any(|f| f == &key) {
            continue;
        }
        match map.get(&key) {
            None => {
                if !m.optional && !options.partial {
                    return fail(format!("Missing required field '{key}'"));
                }
            }
            Some(field_value) => {
                let child_path = format!("{value_path}['{key}']");
                recurse(
                    field_value,
                    &m.map_to,
                    schema,
                    &child_path,
                    &map_to_path,
                    &Options::default(),
                    depth + 1,
                )?;
            }
        }
    }
    Ok(())
}

fn check_index_signature(
    value: &Value,
    s: &IndexSignatureNode,
    schema: &Schema,
    value_path: &str,
    depth: usize,
) -> CheckResult {
    let Value::Object(map) = value else {
        return fail(format!(
            "Expected an object, but got type {}",
            js_type_name(value)
        ));
    };
    let value_type_path = type_path_of(schema, &s.value_type);
    for (key, field_value) in map {
        let child_path = format!("{value_path}['{key}']");
        recurse(
            field_value,
            &s.value_type,
            schema,
            &child_path,
            &value_type_path,
            &Options::default(),
            depth + 1,
        )?;
    }
    Ok(())
}

fn check_omit(
    value: &Value,
    o: &OmitNode,
    schema: &Schema,
    value_path: &str,
    type_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    let mut ignored = options.ignored_fields.clone();
    for f in &o.omitted_fields {
        if !ignored.contains(f) {
            ignored.push(f.clone());
        }
    }
    let inner_options = Options {
        partial: false,
        ignored_fields: ignored,
    };
    let base_path = {
        let p = type_path_of(schema, &o.base);
        if p.is_empty() {
            type_path.to_string()
        } else {
            p
        }
    };
    recurse(value, &o.base, schema, value_path, &base_path, &inner_options, depth + 1)
}

fn check_keyof(value: &Value, k: &KeyofNode, schema: &Schema) -> CheckResult {
    let Value::String(s) = value else {
        return fail(format!(
            "Expected Javascript type string, but got type {}",
            js_type_name(value)
        ));
    };
    let resolved_base = resolve_type(schema, &k.base)?;
    let props = compute_properties_of_type(schema, &resolved_base)?;
    if props.contains(s) {
        Ok(())
    } else {
        fail(format!(
            "Expected one of [{}], but got '{s}'",
            quoted_list(&props)
        ))
    }
}

fn check_partial(
    value: &Value,
    p: &PartialNode,
    schema: &Schema,
    value_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    let resolved_element = resolve_type(schema, &p.element_type)?;
    if !matches!(resolved_element, TypeNode::Interface(_)) {
        return Err(Outcome::Schema(SchemaError::PartialOnNonInterface(
            resolved_element
                .name()
                .unwrap_or("<anonymous>")
                .to_string(),
        )));
    }
    let element_path = {
        let p = type_path_of(schema, &p.element_type);
        if p.is_empty() {
            "Partial element".to_string()
        } else {
            p
        }
    };
    let inner_options = Options {
        partial: true,
        ignored_fields: options.ignored_fields.clone(),
    };
    recurse(
        value,
        &p.element_type,
        schema,
        value_path,
        &element_path,
        &inner_options,
        depth + 1,
    )
}

fn check_union(
    value: &Value,
    u: &UnionNode,
    schema: &Schema,
    value_path: &str,
    options: &Options,
    depth: usize,
) -> CheckResult {
    // Tier 1: enum fast path.
    if let Some(literals) = is_enum(schema, &TypeNode::Union(u.clone()))? {
        let Value::String(s) = value else {
            return fail(format!(
                "Expected one of [{}], but got {}",
                quoted_list(&literals),
                actual_repr(value)
            ));
        };
        return if literals.contains(s) {
            Ok(())
        } else {
            fail(format!(
                "Expected one of [{}], but got '{s}'",
                quoted_list(&literals)
            ))
        };
    }

    // Tier 2: discriminated fast path.
    if let Some(kinds) = &u.kinds {
        let Value::Object(map) = value else {
            return fail(format!(
                "Expected an object, but got type {}",
                js_type_name(value)
            ));
        };
        let Some(kind_value) = map.get("kind") else {
            return fail("Missing discriminator field 'kind'".to_string());
        };
        let Value::String(kind_str) = kind_value else {
            return fail(format!(
                "Expected discriminator 'kind' to be one of [{}], but got {}",
                quoted_list(kinds),
                actual_repr(kind_value)
            ));
        };
        if !kinds.contains(kind_str) {
            return fail(format!(
                "Expected discriminator 'kind' to be one of [{}], but got '{kind_str}'",
                quoted_list(kinds)
            ));
        }
        for member in &u.union_members {
            let resolved = resolve_type(schema, member)?;
            if let TypeNode::Interface(iface) = &resolved {
                let matches_kind = iface.fields.iter().any(|f| {
                    !f.optional
                        && f.name == "kind"
                        && matches!(f.ty.as_ref(), TypeNode::StringLiteral(lit) if &lit.value == kind_str)
                });
                if matches_kind {
                    let member_path = type_path_of(schema, member);
                    return recurse(
                        value,
                        member,
                        schema,
                        value_path,
                        &member_path,
                        &options.carry_ignored(),
                        depth + 1,
                    );
                }
            }
        }
        return fail(format!(
            "No union member matches discriminator '{kind_str}'"
        ));
    }

    // Tier 3: generic fallback — try each member raw (unwrapped), first
    // success wins; otherwise combine every member's raw failure.
    let mut failures = Vec::with_capacity(u.union_members.len());
    for member in &u.union_members {
        let member_path = type_path_of(schema, member);
        match check(value, member, schema, value_path, &member_path, &options.carry_ignored(), depth + 1) {
            Ok(()) => return Ok(()),
            Err(Outcome::Schema(e)) => return Err(Outcome::Schema(e)),
            Err(Outcome::Check(msg)) => failures.push(msg),
        }
    }
    let mut combined = "No union member matches:".to_string();
    for (i, msg) in failures.iter().enumerate() {
        let indented = tyval_common::indent(msg);
        combined.push_str(&format!(
            "\n- tried {} union member, but got:\n  {indented}",
            ordinal(i + 1)
        ));
    }
    fail(combined)
}
