//! Core type definitions for the schema algebra.
//!
//! This module contains the `TypeNode` enum and all its variant payloads.
//! The algebra is closed: every node is one of the kinds below, tagged by
//! `kind` in JSON form. Unknown keys on any node are preserved via `extra`
//! so a load -> re-save round trip never silently drops data.

use serde::{Deserialize, Serialize};
use serde_json::Map;
use serde_json::Value;

/// Attributes every `TypeNode` carries, regardless of kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Advisory for the persistence layer; the checker never reads this.
    #[serde(default, skip_serializing_if = "std::ops::Not::not", rename = "ignoreChanges")]
    pub ignore_changes: bool,
    /// Unknown keys, preserved verbatim across a load -> save cycle.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

macro_rules! node_struct {
    ($name:ident { $($field:ident : $ty:ty $(= $rename:literal)?),* $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(flatten)]
            pub common: CommonAttrs,
            $(
                $(#[serde(rename = $rename)])?
                pub $field: $ty,
            )*
        }
    };
}

node_struct!(StringNode { special_name: Option<String> = "specialName" });
node_struct!(NumberNode { special_name: Option<String> = "specialName" });
node_struct!(BooleanNode { special_name: Option<String> = "specialName" });
node_struct!(StringLiteralNode { value: String });
node_struct!(NumberLiteralNode { value: f64 });
node_struct!(BooleanLiteralNode { value: bool });
node_struct!(ArrayNode { element_type: Box<TypeNode> = "elementType" });
node_struct!(InterfaceNode {
    fields: Vec<Field>,
    heritage: Vec<ReferenceTypeNode>,
});
node_struct!(UnionNode {
    union_members: Vec<TypeNode> = "unionMembers",
    kinds: Option<Vec<String>> = "kinds",
});
node_struct!(IntersectionNode {
    intersection_members: Vec<TypeNode> = "intersectionMembers",
});
node_struct!(MappedNode {
    map_from: Box<TypeNode> = "mapFrom",
    map_to: Box<TypeNode> = "mapTo",
    optional: bool,
});
node_struct!(IndexSignatureNode {
    key_type: Box<TypeNode> = "keyType",
    value_type: Box<TypeNode> = "valueType",
});
node_struct!(OmitNode {
    base: Box<TypeNode>,
    omitted_fields: Vec<String> = "omittedFields",
});
node_struct!(KeyofNode { base: Box<TypeNode> });
node_struct!(PartialNode { element_type: Box<TypeNode> = "elementType" });
node_struct!(ReferenceTypeNode {
    referenced_type_name: String = "referencedTypeName",
});

/// One field of an `interface` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(rename = "type")]
    pub ty: Box<TypeNode>,
}

/// A node in the closed type-schema algebra, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TypeNode {
    String(StringNode),
    Number(NumberNode),
    Boolean(BooleanNode),
    Null(CommonAttrs),
    Undefined(CommonAttrs),
    Unknown(CommonAttrs),
    #[serde(rename = "string-literal")]
    StringLiteral(StringLiteralNode),
    #[serde(rename = "number-literal")]
    NumberLiteral(NumberLiteralNode),
    #[serde(rename = "boolean-literal")]
    BooleanLiteral(BooleanLiteralNode),
    Array(ArrayNode),
    Interface(InterfaceNode),
    Union(UnionNode),
    Intersection(IntersectionNode),
    Mapped(MappedNode),
    #[serde(rename = "index-signature")]
    IndexSignature(IndexSignatureNode),
    Omit(OmitNode),
    Keyof(KeyofNode),
    Partial(PartialNode),
    #[serde(rename = "reference-type")]
    ReferenceType(ReferenceTypeNode),
}

impl TypeNode {
    /// The node's declared `name`, if any, across every kind.
    pub fn common(&self) -> &CommonAttrs {
        match self {
            TypeNode::String(n) => &n.common,
            TypeNode::Number(n) => &n.common,
            TypeNode::Boolean(n) => &n.common,
            TypeNode::Null(c) | TypeNode::Undefined(c) | TypeNode::Unknown(c) => c,
            TypeNode::StringLiteral(n) => &n.common,
            TypeNode::NumberLiteral(n) => &n.common,
            TypeNode::BooleanLiteral(n) => &n.common,
            TypeNode::Array(n) => &n.common,
            TypeNode::Interface(n) => &n.common,
            TypeNode::Union(n) => &n.common,
            TypeNode::Intersection(n) => &n.common,
            TypeNode::Mapped(n) => &n.common,
            TypeNode::IndexSignature(n) => &n.common,
            TypeNode::Omit(n) => &n.common,
            TypeNode::Keyof(n) => &n.common,
            TypeNode::Partial(n) => &n.common,
            TypeNode::ReferenceType(n) => &n.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CommonAttrs {
        match self {
            TypeNode::String(n) => &mut n.common,
            TypeNode::Number(n) => &mut n.common,
            TypeNode::Boolean(n) => &mut n.common,
            TypeNode::Null(c) | TypeNode::Undefined(c) | TypeNode::Unknown(c) => c,
            TypeNode::StringLiteral(n) => &mut n.common,
            TypeNode::NumberLiteral(n) => &mut n.common,
            TypeNode::BooleanLiteral(n) => &mut n.common,
            TypeNode::Array(n) => &mut n.common,
            TypeNode::Interface(n) => &mut n.common,
            TypeNode::Union(n) => &mut n.common,
            TypeNode::Intersection(n) => &mut n.common,
            TypeNode::Mapped(n) => &mut n.common,
            TypeNode::IndexSignature(n) => &mut n.common,
            TypeNode::Omit(n) => &mut n.common,
            TypeNode::Keyof(n) => &mut n.common,
            TypeNode::Partial(n) => &mut n.common,
            TypeNode::ReferenceType(n) => &mut n.common,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.common().name.as_deref()
    }
}
