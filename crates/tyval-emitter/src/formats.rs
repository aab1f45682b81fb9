//! Collects every built-in string-format name referenced anywhere in a
//! schema, so the emitter generates exactly one `assert_<format>` per
//! format actually in use (spec §4.4).

use std::collections::BTreeSet;

use tyval_schema::TypeNode;
use tyval_schema::Schema;

pub fn referenced_formats(schema: &Schema) -> Vec<String> {
    let mut found = BTreeSet::new();
    for node in schema.types.values() {
        collect(node, &mut found);
    }
    found.into_iter().collect()
}

fn collect(node: &TypeNode, found: &mut BTreeSet<String>) {
    match node {
        TypeNode::String(n) => {
            if let Some(name) = &n.special_name {
                found.insert(name.clone());
            }
        }
        TypeNode::Array(a) => collect(&a.element_type, found),
        TypeNode::Interface(i) => {
            for f in &i.fields {
                collect(&f.ty, found);
            }
        }
        TypeNode::Union(u) => {
            for m in &u.union_members {
                collect(m, found);
            }
        }
        TypeNode::Intersection(i) => {
            for m in &i.intersection_members {
                collect(m, found);
            }
        }
        TypeNode::Mapped(m) => {
            collect(&m.map_from, found);
            collect(&m.map_to, found);
        }
        TypeNode::IndexSignature(s) => {
            collect(&s.key_type, found);
            collect(&s.value_type, found);
        }
        TypeNode::Omit(o) => collect(&o.base, found),
        TypeNode::Keyof(k) => collect(&k.base, found),
        TypeNode::Partial(p) => collect(&p.element_type, found),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tyval_schema::types::{CommonAttrs, StringNode};

    #[test]
    fn finds_formats_nested_in_interface_fields() {
        let string_with = |special: &str| {
            TypeNode::String(StringNode {
                common: CommonAttrs::default(),
                special_name: Some(special.to_string()),
            })
        };
        let mut types = IndexMap::new();
        types.insert(
            "Contact".to_string(),
            TypeNode::Interface(tyval_schema::types::InterfaceNode {
                common: CommonAttrs::default(),
                fields: vec![
                    tyval_schema::types::Field {
                        name: "email".to_string(),
                        optional: false,
                        ty: Box::new(string_with("Email")),
                    },
                    tyval_schema::types::Field {
                        name: "phone".to_string(),
                        optional: true,
                        ty: Box::new(string_with("PhoneNumber")),
                    },
                ],
                heritage: vec![],
            }),
        );
        let schema = Schema { types, asserted_types: vec!["Contact".to_string()] };
        assert_eq!(
            referenced_formats(&schema),
            vec!["Email".to_string(), "PhoneNumber".to_string()]
        );
    }

    #[test]
    fn schema_without_special_strings_has_no_formats() {
        let types = IndexMap::new();
        let schema = Schema { types, asserted_types: vec![] };
        assert!(referenced_formats(&schema).is_empty());
    }
}
