//! `Schema`: a named-type universe plus reference resolution and printing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tyval_common::SchemaError;

use crate::types::{Field, TypeNode};

/// A mapping from type-name to `TypeNode`, plus the ordered list of
/// asserted type names (spec §3 "A Schema is a mapping ... plus an ordered
/// list of asserted type names").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub types: IndexMap<String, TypeNode>,
    #[serde(rename = "assertedTypes")]
    pub asserted_types: Vec<String>,
}

impl Schema {
    /// Parses a persisted schema and computes the discriminated-union
    /// `kinds` cache for every union that qualifies (Design Notes: done at
    /// load time, not only during extraction, so a hand-written schema
    /// still gets the fast path).
    pub fn load(json: &str) -> Result<Schema, serde_json::Error> {
        let mut schema: Schema = serde_json::from_str(json)?;
        schema.populate_kinds_cache();
        tracing::debug!(
            types = schema.types.len(),
            asserted = schema.asserted_types.len(),
            "loaded schema"
        );
        Ok(schema)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn populate_kinds_cache(&mut self) {
        let snapshot = self.types.clone();
        for node in self.types.values_mut() {
            populate_kinds_recursive(node, &snapshot);
        }
    }
}

fn populate_kinds_recursive(node: &mut TypeNode, types: &IndexMap<String, TypeNode>) {
    match node {
        TypeNode::Union(u) => {
            for member in &mut u.union_members {
                populate_kinds_recursive(member, types);
            }
            if u.kinds.is_none() {
                u.kinds = discriminant_kinds(&u.union_members, types);
            }
        }
        TypeNode::Intersection(i) => {
            for member in &mut i.intersection_members {
                populate_kinds_recursive(member, types);
            }
        }
        TypeNode::Array(a) => populate_kinds_recursive(&mut a.element_type, types),
        TypeNode::Interface(i) => {
            for f in &mut i.fields {
                populate_kinds_recursive(&mut f.ty, types);
            }
        }
        TypeNode::Mapped(m) => {
            populate_kinds_recursive(&mut m.map_from, types);
            populate_kinds_recursive(&mut m.map_to, types);
        }
        TypeNode::IndexSignature(s) => {
            populate_kinds_recursive(&mut s.key_type, types);
            populate_kinds_recursive(&mut s.value_type, types);
        }
        TypeNode::Omit(o) => populate_kinds_recursive(&mut o.base, types),
        TypeNode::Keyof(k) => populate_kinds_recursive(&mut k.base, types),
        TypeNode::Partial(p) => populate_kinds_recursive(&mut p.element_type, types),
        _ => {}
    }
}

/// A union qualifies for the `kinds` cache when every resolved member is
/// an `interface` with a non-optional `kind: <string-literal>` field.
fn discriminant_kinds(
    members: &[TypeNode],
    types: &IndexMap<String, TypeNode>,
) -> Option<Vec<String>> {
    let mut kinds = Vec::with_capacity(members.len());
    for member in members {
        let resolved = resolve_type_in(member, types).ok()?;
        let TypeNode::Interface(iface) = &resolved else {
            return None;
        };
        let kind_field = iface.fields.iter().find(|f| f.name == "kind")?;
        if kind_field.optional {
            return None;
        }
        let TypeNode::StringLiteral(lit) = kind_field.ty.as_ref() else {
            return None;
        };
        kinds.push(lit.value.clone());
    }
    Some(kinds)
}

/// Chases `reference-type` chains to the first non-reference node. The
/// returned node's `name` is overwritten with the last-seen reference name
/// so diagnostics print the user-visible alias (spec §3 "Reference
/// resolution").
pub fn resolve_type(schema: &Schema, node: &TypeNode) -> Result<TypeNode, SchemaError> {
    resolve_type_in(node, &schema.types)
}

fn resolve_type_in(
    node: &TypeNode,
    types: &IndexMap<String, TypeNode>,
) -> Result<TypeNode, SchemaError> {
    let mut current = node.clone();
    let mut last_name: Option<String> = None;
    let mut guard = 0usize;
    loop {
        let TypeNode::ReferenceType(r) = &current else {
            if let Some(name) = last_name {
                current.common_mut().name = Some(name);
            }
            return Ok(current);
        };
        guard += 1;
        if guard > types.len() + 1 {
            return Err(SchemaError::UndefinedReference(r.referenced_type_name.clone()));
        }
        let target = types
            .get(&r.referenced_type_name)
            .ok_or_else(|| SchemaError::UndefinedReference(r.referenced_type_name.clone()))?;
        last_name = Some(r.referenced_type_name.clone());
        current = target.clone();
    }
}

/// Returns the literal string values of an enum-like node: a singleton
/// `string-literal`, or a `union` whose every member is a `string-literal`.
/// Non-enum-like nodes yield `None`.
pub fn is_enum(schema: &Schema, node: &TypeNode) -> Result<Option<Vec<String>>, SchemaError> {
    let resolved = resolve_type(schema, node)?;
    match &resolved {
        TypeNode::StringLiteral(lit) => Ok(Some(vec![lit.value.clone()])),
        TypeNode::Union(u) => {
            let mut values = Vec::with_capacity(u.union_members.len());
            for member in &u.union_members {
                let resolved_member = resolve_type(schema, member)?;
                match resolved_member {
                    TypeNode::StringLiteral(lit) => values.push(lit.value),
                    _ => return Ok(None),
                }
            }
            Ok(Some(values))
        }
        _ => Ok(None),
    }
}

/// Renders a node in a human form close to source syntax. When `node` has
/// a declared `name`, that name is printed instead of the structural form.
/// `short` renders interfaces on one line with `; ` separators; long form
/// uses newline indentation via [`tyval_common::indent`].
pub fn type_to_string(schema: &Schema, node: &TypeNode, short: bool) -> String {
    if let Some(name) = node.name() {
        return name.to_string();
    }
    render_structural(schema, node, short)
}

fn render_structural(schema: &Schema, node: &TypeNode, short: bool) -> String {
    match node {
        TypeNode::String(n) => n.special_name.clone().unwrap_or_else(|| "string".into()),
        TypeNode::Number(n) => n.special_name.clone().unwrap_or_else(|| "number".into()),
        TypeNode::Boolean(n) => n.special_name.clone().unwrap_or_else(|| "boolean".into()),
        TypeNode::Null(_) => "null".into(),
        TypeNode::Undefined(_) => "undefined".into(),
        TypeNode::Unknown(_) => "unknown".into(),
        TypeNode::StringLiteral(lit) => format!("'{}'", lit.value),
        TypeNode::NumberLiteral(lit) => format_number(lit.value),
        TypeNode::BooleanLiteral(lit) => lit.value.to_string(),
        TypeNode::Array(a) => format!(
            "Array<{}>",
            type_to_string(schema, &a.element_type, short)
        ),
        TypeNode::Interface(iface) => render_interface(schema, iface, short),
        TypeNode::Union(u) => u
            .union_members
            .iter()
            .map(|m| type_to_string(schema, m, short))
            .collect::<Vec<_>>()
            .join(" | "),
        TypeNode::Intersection(i) => i
            .intersection_members
            .iter()
            .map(|m| type_to_string(schema, m, short))
            .collect::<Vec<_>>()
            .join(" & "),
        TypeNode::Mapped(m) => format!(
            "{{ [k: {}]: {} }}",
            type_to_string(schema, &m.map_from, short),
            type_to_string(schema, &m.map_to, short)
        ),
        TypeNode::IndexSignature(s) => format!(
            "{{ [k: {}]: {} }}",
            type_to_string(schema, &s.key_type, short),
            type_to_string(schema, &s.value_type, short)
        ),
        TypeNode::Omit(o) => format!(
            "Omit<{}, {}>",
            type_to_string(schema, &o.base, short),
            o.omitted_fields
                .iter()
                .map(|f| format!("'{f}'"))
                .collect::<Vec<_>>()
                .join(" | ")
        ),
        TypeNode::Keyof(k) => format!("keyof {}", type_to_string(schema, &k.base, short)),
        TypeNode::Partial(p) => format!(
            "Partial<{}>",
            type_to_string(schema, &p.element_type, short)
        ),
        TypeNode::ReferenceType(r) => r.referenced_type_name.clone(),
    }
}

fn render_interface(schema: &Schema, iface: &crate::types::InterfaceNode, short: bool) -> String {
    let mut parts: Vec<String> = iface
        .fields
        .iter()
        .map(|f| render_field(schema, f, short))
        .collect();
    for h in &iface.heritage {
        parts.push(format!("...{}", h.referenced_type_name));
    }
    if short {
        format!("{{ {} }}", parts.join("; "))
    } else if parts.is_empty() {
        "{}".to_string()
    } else {
        let body = parts.join(";\n");
        format!("{{\n  {}\n}}", tyval_common::indent(&body))
    }
}

fn render_field(schema: &Schema, field: &Field, short: bool) -> String {
    format!(
        "{}{}: {}",
        field.name,
        if field.optional { "?" } else { "" },
        type_to_string(schema, &field.ty, short)
    )
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_with(types: Vec<(&str, TypeNode)>) -> Schema {
        Schema {
            types: types.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            asserted_types: vec![],
        }
    }

    fn string_lit(v: &str) -> TypeNode {
        TypeNode::StringLiteral(crate::types::StringLiteralNode {
            common: Default::default(),
            value: v.to_string(),
        })
    }

    fn reference(name: &str) -> TypeNode {
        TypeNode::ReferenceType(crate::types::ReferenceTypeNode {
            common: Default::default(),
            referenced_type_name: name.to_string(),
        })
    }

    #[test]
    fn resolve_chases_transitive_references() {
        let schema = schema_with(vec![
            ("A", reference("B")),
            ("B", reference("C")),
            ("C", string_lit("x")),
        ]);
        let resolved = resolve_type(&schema, &reference("A")).unwrap();
        assert_eq!(resolved.name(), Some("C"));
        assert!(matches!(resolved, TypeNode::StringLiteral(_)));
    }

    #[test]
    fn resolve_missing_reference_fails() {
        let schema = schema_with(vec![]);
        let err = resolve_type(&schema, &reference("Missing")).unwrap_err();
        assert_eq!(err, SchemaError::UndefinedReference("Missing".into()));
    }

    #[test]
    fn is_enum_detects_singleton_and_union() {
        let schema = schema_with(vec![]);
        assert_eq!(
            is_enum(&schema, &string_lit("a")).unwrap(),
            Some(vec!["a".to_string()])
        );

        let union = TypeNode::Union(crate::types::UnionNode {
            common: Default::default(),
            union_members: vec![string_lit("a"), string_lit("b")],
            kinds: None,
        });
        assert_eq!(
            is_enum(&schema, &union).unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn is_enum_rejects_mixed_union() {
        let schema = schema_with(vec![]);
        let union = TypeNode::Union(crate::types::UnionNode {
            common: Default::default(),
            union_members: vec![
                string_lit("a"),
                TypeNode::Number(crate::types::NumberNode {
                    common: Default::default(),
                    special_name: None,
                }),
            ],
            kinds: None,
        });
        assert_eq!(is_enum(&schema, &union).unwrap(), None);
    }

    #[test]
    fn type_to_string_prefers_declared_name() {
        let schema = schema_with(vec![]);
        let mut node = string_lit("x");
        node.common_mut().name = Some("MyAlias".to_string());
        assert_eq!(type_to_string(&schema, &node, false), "MyAlias");
    }

    #[test]
    fn type_to_string_renders_union() {
        let schema = schema_with(vec![]);
        let union = TypeNode::Union(crate::types::UnionNode {
            common: Default::default(),
            union_members: vec![string_lit("a"), string_lit("b")],
            kinds: None,
        });
        assert_eq!(type_to_string(&schema, &union, false), "'a' | 'b'");
    }
}
