use indexmap::IndexMap;
use serde_json::json;
use tyval_checker::check_value_against_type;
use tyval_schema::types::{CommonAttrs, Field, InterfaceNode, PartialNode, ReferenceTypeNode, StringNode};
use tyval_schema::{Schema, TypeNode};

fn field(name: &str, optional: bool, ty: TypeNode) -> Field {
    Field {
        name: name.to_string(),
        optional,
        ty: Box::new(ty),
    }
}

fn bare_string() -> TypeNode {
    TypeNode::String(StringNode {
        common: CommonAttrs::default(),
        special_name: None,
    })
}

/// Scenario 6: `Sub extends Base` with `{ sub: '' }` reports the missing
/// `base` field, naming `Base` in the `While checking` trailer.
#[test]
fn missing_inherited_field_names_the_base_type() {
    let base = TypeNode::Interface(InterfaceNode {
        common: CommonAttrs {
            name: Some("Base".to_string()),
            ..Default::default()
        },
        fields: vec![field("base", false, bare_string())],
        heritage: vec![],
    });
    let mut types = IndexMap::new();
    types.insert("Base".to_string(), base);
    let sub = TypeNode::Interface(InterfaceNode {
        common: CommonAttrs {
            name: Some("Sub".to_string()),
            ..Default::default()
        },
        fields: vec![field("sub", false, bare_string())],
        heritage: vec![ReferenceTypeNode {
            common: CommonAttrs::default(),
            referenced_type_name: "Base".to_string(),
        }],
    });
    types.insert("Sub".to_string(), sub.clone());
    let schema = Schema {
        types,
        asserted_types: vec!["Sub".to_string()],
    };

    let msg = check_value_against_type(&json!({"sub": ""}), &sub, &schema).unwrap();
    assert!(msg.contains("Missing required field 'base'"));
    assert!(msg.contains("While checking value against type Base"));
}

/// Own fields are validated before heritage is walked, and a value
/// satisfying both own fields and every base's fields conforms.
#[test]
fn own_and_inherited_fields_both_must_hold() {
    let base = TypeNode::Interface(InterfaceNode {
        common: CommonAttrs {
            name: Some("Base".to_string()),
            ..Default::default()
        },
        fields: vec![field("base", false, bare_string())],
        heritage: vec![],
    });
    let mut types = IndexMap::new();
    types.insert("Base".to_string(), base);
    let sub = TypeNode::Interface(InterfaceNode {
        common: CommonAttrs {
            name: Some("Sub".to_string()),
            ..Default::default()
        },
        fields: vec![field("sub", false, bare_string())],
        heritage: vec![ReferenceTypeNode {
            common: CommonAttrs::default(),
            referenced_type_name: "Base".to_string(),
        }],
    });
    types.insert("Sub".to_string(), sub.clone());
    let schema = Schema {
        types,
        asserted_types: vec!["Sub".to_string()],
    };

    let msg =
        check_value_against_type(&json!({"sub": "x", "base": "y"}), &sub, &schema).unwrap();
    assert_eq!(msg, "");
}

/// A diamond of two base interfaces both contribute required fields.
#[test]
fn multiple_heritage_entries_are_all_checked() {
    let mut types = IndexMap::new();
    types.insert(
        "Left".to_string(),
        TypeNode::Interface(InterfaceNode {
            common: CommonAttrs {
                name: Some("Left".to_string()),
                ..Default::default()
            },
            fields: vec![field("left", false, bare_string())],
            heritage: vec![],
        }),
    );
    types.insert(
        "Right".to_string(),
        TypeNode::Interface(InterfaceNode {
            common: CommonAttrs {
                name: Some("Right".to_string()),
                ..Default::default()
            },
            fields: vec![field("right", false, bare_string())],
            heritage: vec![],
        }),
    );
    let combined = TypeNode::Interface(InterfaceNode {
        common: CommonAttrs {
            name: Some("Combined".to_string()),
            ..Default::default()
        },
        fields: vec![],
        heritage: vec![
            ReferenceTypeNode {
                common: CommonAttrs::default(),
                referenced_type_name: "Left".to_string(),
            },
            ReferenceTypeNode {
                common: CommonAttrs::default(),
                referenced_type_name: "Right".to_string(),
            },
        ],
    });
    types.insert("Combined".to_string(), combined.clone());
    let schema = Schema {
        types,
        asserted_types: vec!["Combined".to_string()],
    };

    let msg = check_value_against_type(&json!({"left": "a"}), &combined, &schema).unwrap();
    assert!(msg.contains("Missing required field 'right'"));
    assert!(msg.contains("While checking value against type Right"));
}

/// `Partial<Sub>` over an interface with heritage carries partiality into
/// the heritage walk: both `sub` and the inherited `base` become optional
/// for this level, so `{}` conforms.
#[test]
fn partial_over_interface_makes_inherited_fields_optional_too() {
    let base = TypeNode::Interface(InterfaceNode {
        common: CommonAttrs {
            name: Some("Base".to_string()),
            ..Default::default()
        },
        fields: vec![field("base", false, bare_string())],
        heritage: vec![],
    });
    let mut types = IndexMap::new();
    types.insert("Base".to_string(), base);
    let sub = TypeNode::Interface(InterfaceNode {
        common: CommonAttrs {
            name: Some("Sub".to_string()),
            ..Default::default()
        },
        fields: vec![field("sub", false, bare_string())],
        heritage: vec![ReferenceTypeNode {
            common: CommonAttrs::default(),
            referenced_type_name: "Base".to_string(),
        }],
    });
    types.insert("Sub".to_string(), sub.clone());
    let schema = Schema {
        types,
        asserted_types: vec!["Sub".to_string()],
    };

    let partial = TypeNode::Partial(PartialNode {
        common: CommonAttrs::default(),
        element_type: Box::new(sub),
    });
    let msg = check_value_against_type(&json!({}), &partial, &schema).unwrap();
    assert_eq!(msg, "");
}
