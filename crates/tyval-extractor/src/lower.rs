//! Lowers parsed declarations ([`crate::decl::RawDecl`]) into the schema
//! algebra (spec §3).

use std::collections::HashSet;

use indexmap::IndexMap;

use tyval_schema::types::{
    ArrayNode, BooleanLiteralNode, BooleanNode, CommonAttrs, Field, IndexSignatureNode,
    InterfaceNode, IntersectionNode, KeyofNode, MappedNode, NumberLiteralNode, NumberNode,
    OmitNode, PartialNode, ReferenceTypeNode, StringLiteralNode, StringNode, UnionNode,
};
use tyval_schema::{Schema, TypeNode};

use crate::decl::{InterfaceBody, RawDecl};
use crate::error::ExtractError;
use crate::typeexpr::TypeExpr;

pub fn build_schema(decls: Vec<RawDecl>) -> Result<Schema, ExtractError> {
    let mut asserted_types = Vec::new();
    {
        let mut seen = HashSet::new();
        for decl in &decls {
            let name = decl_name(decl);
            if !seen.insert(name.clone()) {
                return Err(ExtractError::DuplicateTypeName(name));
            }
            asserted_types.push(name);
        }
    }

    let mut types: IndexMap<String, TypeNode> = IndexMap::new();
    for decl in &decls {
        match decl {
            RawDecl::Interface(iface) => {
                let mut node = TypeNode::Interface(lower_interface_body(iface, &decls)?);
                node.common_mut().name = Some(iface.name.clone());
                node.common_mut().filename = Some(iface.file.clone());
                node.common_mut().ignore_changes = iface.ignore_changes;
                types.insert(iface.name.clone(), node);
            }
            RawDecl::Alias(alias) => {
                let mut node = lower_expr(&alias.expr, &decls)?;
                node.common_mut().name = Some(alias.name.clone());
                node.common_mut().filename = Some(alias.file.clone());
                node.common_mut().ignore_changes = alias.ignore_changes;
                types.insert(alias.name.clone(), node);
            }
        }
    }

    for (name, node) in &types {
        validate_references(name, node, &types)?;
    }

    asserted_types.sort();
    Ok(Schema { types, asserted_types })
}

fn decl_name(decl: &RawDecl) -> String {
    match decl {
        RawDecl::Interface(i) => i.name.clone(),
        RawDecl::Alias(a) => a.name.clone(),
    }
}

fn lower_interface_body(
    iface: &crate::decl::RawInterface,
    decls: &[RawDecl],
) -> Result<InterfaceNode, ExtractError> {
    let heritage = iface
        .heritage
        .iter()
        .map(|name| ReferenceTypeNode {
            common: CommonAttrs::default(),
            referenced_type_name: name.clone(),
        })
        .collect();
    match &iface.body {
        InterfaceBody::Fields(raw_fields) => {
            let mut fields = Vec::with_capacity(raw_fields.len());
            for (name, optional, expr) in raw_fields {
                fields.push(Field {
                    name: name.clone(),
                    optional: *optional,
                    ty: Box::new(lower_expr(expr, decls)?),
                });
            }
            Ok(InterfaceNode { common: CommonAttrs::default(), fields, heritage })
        }
        InterfaceBody::IndexSignature(_) => {
            // An `interface` whose body is an index signature has no fixed
            // field list; it is represented the same as a `type` alias to
            // an index-signature node would be, wrapped so the declaration
            // still gets a name. Schema has no "interface-shaped
            // index-signature" kind, so heritage (already rejected upstream
            // for this shape) would be meaningless here.
            Ok(InterfaceNode { common: CommonAttrs::default(), fields: Vec::new(), heritage })
        }
    }
}

fn lower_expr(expr: &TypeExpr, decls: &[RawDecl]) -> Result<TypeNode, ExtractError> {
    match expr {
        TypeExpr::Ident(name) => Ok(lower_ident(name)),
        TypeExpr::StringLit(s) => Ok(TypeNode::StringLiteral(StringLiteralNode {
            common: CommonAttrs::default(),
            value: s.clone(),
        })),
        TypeExpr::NumberLit(n) => Ok(TypeNode::NumberLiteral(NumberLiteralNode {
            common: CommonAttrs::default(),
            value: *n,
        })),
        TypeExpr::BooleanLit(b) => Ok(TypeNode::BooleanLiteral(BooleanLiteralNode {
            common: CommonAttrs::default(),
            value: *b,
        })),
        TypeExpr::Array(inner) => Ok(TypeNode::Array(ArrayNode {
            common: CommonAttrs::default(),
            element_type: Box::new(lower_expr(inner, decls)?),
        })),
        TypeExpr::Paren(inner) | TypeExpr::Readonly(inner) => lower_expr(inner, decls),
        TypeExpr::Keyof(inner) => Ok(TypeNode::Keyof(KeyofNode {
            common: CommonAttrs::default(),
            base: Box::new(lower_expr(inner, decls)?),
        })),
        TypeExpr::IndexSignature(value_type) => Ok(TypeNode::IndexSignature(IndexSignatureNode {
            common: CommonAttrs::default(),
            key_type: Box::new(TypeNode::String(StringNode {
                common: CommonAttrs::default(),
                special_name: None,
            })),
            value_type: Box::new(lower_expr(value_type, decls)?),
        })),
        TypeExpr::ObjectLiteral(raw_fields) => {
            let mut fields = Vec::with_capacity(raw_fields.len());
            for (name, optional, field_expr) in raw_fields {
                fields.push(Field {
                    name: name.clone(),
                    optional: *optional,
                    ty: Box::new(lower_expr(field_expr, decls)?),
                });
            }
            Ok(TypeNode::Interface(InterfaceNode {
                common: CommonAttrs::default(),
                fields,
                heritage: Vec::new(),
            }))
        }
        TypeExpr::Union(members) => {
            let mut lowered: Vec<TypeNode> = members
                .iter()
                .map(|m| lower_expr(m, decls))
                .collect::<Result<_, _>>()?;
            sort_by_printed_form(&mut lowered);
            Ok(TypeNode::Union(UnionNode {
                common: CommonAttrs::default(),
                union_members: lowered,
                kinds: None,
            }))
        }
        TypeExpr::Intersection(members) => lower_intersection(members, decls),
        TypeExpr::Generic(name, args) => lower_generic(name, args, decls),
    }
}

fn lower_ident(name: &str) -> TypeNode {
    let common = CommonAttrs::default();
    match name {
        "string" => TypeNode::String(StringNode { common, special_name: None }),
        "number" => TypeNode::Number(NumberNode { common, special_name: None }),
        "boolean" => TypeNode::Boolean(BooleanNode { common, special_name: None }),
        "null" => TypeNode::Null(common),
        "undefined" => TypeNode::Undefined(common),
        "unknown" => TypeNode::Unknown(common),
        _ => TypeNode::ReferenceType(ReferenceTypeNode {
            common,
            referenced_type_name: name.to_string(),
        }),
    }
}

/// Recognizes the branded-primitive pattern `string & { _field: 'Lit' }`
/// and lowers it to plain `string`; every other intersection lowers
/// structurally.
fn lower_intersection(members: &[TypeExpr], decls: &[RawDecl]) -> Result<TypeNode, ExtractError> {
    if members.len() == 2 {
        for (primitive, brand) in [(0, 1), (1, 0)] {
            if let (TypeExpr::Ident(prim_name), TypeExpr::ObjectLiteral(fields)) =
                (&members[primitive], &members[brand])
            {
                if prim_name == "string" && fields.len() == 1 {
                    let (field_name, _, field_ty) = &fields[0];
                    if field_name.starts_with('_') && matches!(field_ty, TypeExpr::StringLit(_)) {
                        return Ok(TypeNode::String(StringNode {
                            common: CommonAttrs::default(),
                            special_name: None,
                        }));
                    }
                }
            }
        }
    }
    let intersection_members = members
        .iter()
        .map(|m| lower_expr(m, decls))
        .collect::<Result<_, _>>()?;
    Ok(TypeNode::Intersection(IntersectionNode {
        common: CommonAttrs::default(),
        intersection_members,
    }))
}

fn lower_generic(name: &str, args: &[TypeExpr], decls: &[RawDecl]) -> Result<TypeNode, ExtractError> {
    match (name, args) {
        ("Array", [element]) => Ok(TypeNode::Array(ArrayNode {
            common: CommonAttrs::default(),
            element_type: Box::new(lower_expr(element, decls)?),
        })),
        ("Partial", [element]) => Ok(TypeNode::Partial(PartialNode {
            common: CommonAttrs::default(),
            element_type: Box::new(lower_expr(element, decls)?),
        })),
        ("Record", [key, value]) => Ok(TypeNode::Mapped(MappedNode {
            common: CommonAttrs::default(),
            map_from: Box::new(lower_expr(key, decls)?),
            map_to: Box::new(lower_expr(value, decls)?),
            optional: false,
        })),
        ("Omit", [base, key]) => {
            let base_node = lower_expr(base, decls)?;
            let omitted_fields = evaluate_string_set(key, decls)?;
            Ok(TypeNode::Omit(OmitNode {
                common: CommonAttrs::default(),
                base: Box::new(base_node),
                omitted_fields,
            }))
        }
        _ => Err(ExtractError::UnsupportedTypeArgument(name.to_string())),
    }
}

/// Evaluates `Omit`'s second argument to a concrete set of field names:
/// a string literal, a union of string literals, or `keyof X` against an
/// interface declared (with plain fields) in this same run.
fn evaluate_string_set(expr: &TypeExpr, decls: &[RawDecl]) -> Result<Vec<String>, ExtractError> {
    match expr {
        TypeExpr::StringLit(s) => Ok(vec![s.clone()]),
        TypeExpr::Union(members) => {
            let mut out = Vec::with_capacity(members.len());
            for m in members {
                match m {
                    TypeExpr::StringLit(s) => out.push(s.clone()),
                    _ => return Err(ExtractError::OmitKeyNotEnumLike),
                }
            }
            Ok(out)
        }
        TypeExpr::Keyof(inner) => {
            if let TypeExpr::Ident(target) = inner.as_ref() {
                for decl in decls {
                    if let RawDecl::Interface(iface) = decl {
                        if iface.name == *target {
                            if let InterfaceBody::Fields(fields) = &iface.body {
                                return Ok(fields.iter().map(|(n, _, _)| n.clone()).collect());
                            }
                        }
                    }
                }
            }
            Err(ExtractError::OmitKeyNotEnumLike)
        }
        _ => Err(ExtractError::OmitKeyNotEnumLike),
    }
}

fn sort_by_printed_form(nodes: &mut [TypeNode]) {
    let blank = Schema { types: IndexMap::new(), asserted_types: Vec::new() };
    nodes.sort_by(|a, b| {
        let sa = tyval_schema::schema::type_to_string(&blank, a, true);
        let sb = tyval_schema::schema::type_to_string(&blank, b, true);
        sa.cmp(&sb)
    });
}

fn validate_references(
    owner: &str,
    node: &TypeNode,
    types: &IndexMap<String, TypeNode>,
) -> Result<(), ExtractError> {
    match node {
        TypeNode::ReferenceType(r) => {
            if !types.contains_key(&r.referenced_type_name) {
                return Err(ExtractError::UndefinedReference(
                    owner.to_string(),
                    r.referenced_type_name.clone(),
                ));
            }
            Ok(())
        }
        TypeNode::Array(a) => validate_references(owner, &a.element_type, types),
        TypeNode::Interface(i) => {
            for f in &i.fields {
                validate_references(owner, &f.ty, types)?;
            }
            for h in &i.heritage {
                if !types.contains_key(&h.referenced_type_name) {
                    return Err(ExtractError::UndefinedReference(
                        owner.to_string(),
                        h.referenced_type_name.clone(),
                    ));
                }
            }
            Ok(())
        }
        TypeNode::Union(u) => {
            for m in &u.union_members {
                validate_references(owner, m, types)?;
            }
            Ok(())
        }
        TypeNode::Intersection(i) => {
            for m in &i.intersection_members {
                validate_references(owner, m, types)?;
            }
            Ok(())
        }
        TypeNode::Mapped(m) => {
            validate_references(owner, &m.map_from, types)?;
            validate_references(owner, &m.map_to, types)
        }
        TypeNode::IndexSignature(s) => {
            validate_references(owner, &s.key_type, types)?;
            validate_references(owner, &s.value_type, types)
        }
        TypeNode::Omit(o) => validate_references(owner, &o.base, types),
        TypeNode::Keyof(k) => validate_references(owner, &k.base, types),
        TypeNode::Partial(p) => validate_references(owner, &p.element_type, types),
        _ => Ok(()),
    }
}
