use indexmap::IndexMap;
use serde_json::json;
use tyval_checker::check_value_against_type;
use tyval_schema::types::{ArrayNode, CommonAttrs, IndexSignatureNode, NumberNode, StringNode};
use tyval_schema::{Schema, TypeNode};

fn bare_number() -> TypeNode {
    TypeNode::Number(NumberNode {
        common: CommonAttrs::default(),
        special_name: None,
    })
}

fn bare_string() -> TypeNode {
    TypeNode::String(StringNode {
        common: CommonAttrs::default(),
        special_name: None,
    })
}

fn empty_schema() -> Schema {
    Schema {
        types: IndexMap::new(),
        asserted_types: vec![],
    }
}

/// Scenario 5: `ArrayT = number[]` with `[1,'b',3]` reports the type
/// mismatch at `value[1]`, the offending element's index.
#[test]
fn array_element_mismatch_uses_index_in_path() {
    let array = TypeNode::Array(ArrayNode {
        common: CommonAttrs {
            name: Some("ArrayT".to_string()),
            ..Default::default()
        },
        element_type: Box::new(bare_number()),
    });
    let schema = empty_schema();
    let msg = check_value_against_type(&json!([1, "b", 3]), &array, &schema).unwrap();
    assert!(msg.contains("While checking value[1] against type number"));
    assert!(msg.contains("Expected Javascript type number, but got type string"));
}

/// A non-array value against an array type is a plain type mismatch, not
/// an index-keyed one.
#[test]
fn non_array_value_against_array_type_fails_at_top_level() {
    let array = TypeNode::Array(ArrayNode {
        common: CommonAttrs::default(),
        element_type: Box::new(bare_number()),
    });
    let schema = empty_schema();
    let msg = check_value_against_type(&json!({"not": "an array"}), &array, &schema).unwrap();
    assert!(msg.contains("Expected an array, but got type object"));
}

/// Scenario 8: `IndexSignature = { [k:string]: number }` with
/// `{ a: 'x' }` reports the type mismatch at `value['a']` against `number`.
#[test]
fn index_signature_mismatch_uses_key_in_path() {
    let idx = TypeNode::IndexSignature(IndexSignatureNode {
        common: CommonAttrs {
            name: Some("IndexSignature".to_string()),
            ..Default::default()
        },
        key_type: Box::new(bare_string()),
        value_type: Box::new(bare_number()),
    });
    let schema = empty_schema();
    let msg = check_value_against_type(&json!({"a": "x"}), &idx, &schema).unwrap();
    assert!(msg.contains("While checking value['a'] against type number"));
}

/// Every property is checked, not just the first.
#[test]
fn index_signature_checks_every_own_property() {
    let idx = TypeNode::IndexSignature(IndexSignatureNode {
        common: CommonAttrs::default(),
        key_type: Box::new(bare_string()),
        value_type: Box::new(bare_number()),
    });
    let schema = empty_schema();
    let msg = check_value_against_type(&json!({"a": 1, "b": "bad"}), &idx, &schema).unwrap();
    assert!(msg.contains("value['b']"));
}
