//! Property computation (spec §4.2): the over-approximated set of property
//! names that values of a type may legally carry.

use tyval_common::SchemaError;

use crate::schema::{is_enum, resolve_type};
use crate::schema::Schema;
use crate::types::TypeNode;

/// Returns the possibly over-approximating set of property names a value
/// of `node` may carry. Used by `keyof` evaluation and `Omit`-aware
/// descent. Fails with `OpenPropertySet` when the set is not finite (an
/// index signature, or a mapped type over unrestricted `string`).
pub fn compute_properties_of_type(
    schema: &Schema,
    node: &TypeNode,
) -> Result<Vec<String>, SchemaError> {
    match node {
        TypeNode::String(_)
        | TypeNode::Number(_)
        | TypeNode::Boolean(_)
        | TypeNode::Null(_)
        | TypeNode::Undefined(_)
        | TypeNode::Unknown(_)
        | TypeNode::StringLiteral(_)
        | TypeNode::NumberLiteral(_)
        | TypeNode::BooleanLiteral(_)
        | TypeNode::Keyof(_) => Ok(Vec::new()),

        TypeNode::Array(_) => Ok(vec!["length".to_string()]),

        TypeNode::ReferenceType(_) => {
            let resolved = resolve_type(schema, node)?;
            compute_properties_of_type(schema, &resolved)
        }

        TypeNode::Interface(iface) => {
            let mut seen = rustc_hash::FxHashSet::default();
            let mut out = Vec::new();
            for field in &iface.fields {
                if seen.insert(field.name.clone()) {
                    out.push(field.name.clone());
                }
            }
            for h in &iface.heritage {
                let base = resolve_type(schema, &TypeNode::ReferenceType(h.clone()))?;
                for prop in compute_properties_of_type(schema, &base)? {
                    if seen.insert(prop.clone()) {
                        out.push(prop);
                    }
                }
            }
            Ok(out)
        }

        TypeNode::Union(u) => dedup_union(schema, &u.union_members),
        TypeNode::Intersection(i) => dedup_union(schema, &i.intersection_members),

        TypeNode::Partial(p) => compute_properties_of_type(schema, &p.element_type),

        TypeNode::Omit(o) => {
            let base_resolved = resolve_type(schema, &o.base)?;
            let base_props = compute_properties_of_type(schema, &base_resolved)?;
            Ok(base_props
                .into_iter()
                .filter(|p| !o.omitted_fields.contains(p))
                .collect())
        }

        TypeNode::Mapped(m) => {
            if let Some(values) = is_enum_or_string_literal(schema, &m.map_from)? {
                Ok(values)
            } else {
                Err(SchemaError::OpenPropertySet(
                    node.name().unwrap_or("<mapped>").to_string(),
                ))
            }
        }

        TypeNode::IndexSignature(_) => Err(SchemaError::OpenPropertySet(
            node.name().unwrap_or("<index-signature>").to_string(),
        )),
    }
}

fn dedup_union(schema: &Schema, members: &[TypeNode]) -> Result<Vec<String>, SchemaError> {
    let mut seen = rustc_hash::FxHashSet::default();
    let mut out = Vec::new();
    for member in members {
        for prop in compute_properties_of_type(schema, member)? {
            if seen.insert(prop.clone()) {
                out.push(prop);
            }
        }
    }
    Ok(out)
}

/// `mapFrom` must reduce to `string`, a `string-literal`, or a union of
/// `string-literal`s (schema invariant). Returns `None` for unrestricted
/// `string`, signalling an open property set to the caller.
fn is_enum_or_string_literal(
    schema: &Schema,
    map_from: &TypeNode,
) -> Result<Option<Vec<String>>, SchemaError> {
    let resolved = resolve_type(schema, map_from)?;
    if matches!(resolved, TypeNode::String(_)) {
        return Ok(None);
    }
    is_enum(schema, &resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommonAttrs, Field, InterfaceNode, ReferenceTypeNode, StringLiteralNode, UnionNode};
    use indexmap::IndexMap;

    fn field(name: &str, optional: bool, ty: TypeNode) -> Field {
        Field {
            name: name.to_string(),
            optional,
            ty: Box::new(ty),
        }
    }

    fn string_lit(v: &str) -> TypeNode {
        TypeNode::StringLiteral(StringLiteralNode {
            common: CommonAttrs::default(),
            value: v.to_string(),
        })
    }

    #[test]
    fn interface_dedupes_against_heritage() {
        let base = TypeNode::Interface(InterfaceNode {
            common: CommonAttrs::default(),
            fields: vec![field("id", false, string_lit("x"))],
            heritage: vec![],
        });
        let mut types = IndexMap::new();
        types.insert("Base".to_string(), base);
        let schema = Schema {
            types,
            asserted_types: vec![],
        };

        let derived = TypeNode::Interface(InterfaceNode {
            common: CommonAttrs::default(),
            fields: vec![field("id", false, string_lit("x")), field("name", true, string_lit("y"))],
            heritage: vec![ReferenceTypeNode {
                common: CommonAttrs::default(),
                referenced_type_name: "Base".to_string(),
            }],
        });

        let props = compute_properties_of_type(&schema, &derived).unwrap();
        assert_eq!(props, vec!["id".to_string(), "name".to_string()]);
    }

    #[test]
    fn array_has_only_length() {
        let schema = Schema {
            types: IndexMap::new(),
            asserted_types: vec![],
        };
        let arr = TypeNode::Array(crate::types::ArrayNode {
            common: CommonAttrs::default(),
            element_type: Box::new(string_lit("x")),
        });
        assert_eq!(
            compute_properties_of_type(&schema, &arr).unwrap(),
            vec!["length".to_string()]
        );
    }

    #[test]
    fn index_signature_is_open() {
        let schema = Schema {
            types: IndexMap::new(),
            asserted_types: vec![],
        };
        let idx = TypeNode::IndexSignature(crate::types::IndexSignatureNode {
            common: CommonAttrs::default(),
            key_type: Box::new(TypeNode::String(crate::types::StringNode {
                common: CommonAttrs::default(),
                special_name: None,
            })),
            value_type: Box::new(string_lit("x")),
        });
        assert!(matches!(
            compute_properties_of_type(&schema, &idx),
            Err(SchemaError::OpenPropertySet(_))
        ));
    }

    #[test]
    fn mapped_over_string_literal_union_yields_values() {
        let schema = Schema {
            types: IndexMap::new(),
            asserted_types: vec![],
        };
        let map_from = TypeNode::Union(UnionNode {
            common: CommonAttrs::default(),
            union_members: vec![string_lit("a"), string_lit("b")],
            kinds: None,
        });
        let mapped = TypeNode::Mapped(crate::types::MappedNode {
            common: CommonAttrs::default(),
            map_from: Box::new(map_from),
            map_to: Box::new(string_lit("x")),
            optional: false,
        });
        assert_eq!(
            compute_properties_of_type(&schema, &mapped).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
