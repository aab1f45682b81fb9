use tyval_extractor::decl::scan_file;
use tyval_extractor::lower::build_schema;
use tyval_schema::TypeNode;

fn build(file: &str, source: &str) -> tyval_schema::Schema {
    let decls = scan_file(file, source).expect("scan succeeds");
    build_schema(decls).expect("lowering succeeds")
}

#[test]
fn file_marker_opts_every_declaration_in() {
    let source = r#"
// tyval:file
interface Widget {
  id: string;
  count?: number;
}

type WidgetKind = 'a' | 'b';
"#;
    let schema = build("widget.ts", source);
    assert!(schema.types.contains_key("Widget"));
    assert!(schema.types.contains_key("WidgetKind"));
    let TypeNode::Interface(iface) = schema.types.get("Widget").unwrap() else {
        panic!("expected interface");
    };
    assert_eq!(iface.fields.len(), 2);
    assert_eq!(iface.fields[0].name, "id");
    assert!(!iface.fields[0].optional);
    assert_eq!(iface.fields[1].name, "count");
    assert!(iface.fields[1].optional);
}

#[test]
fn only_per_declaration_marker_opts_in_without_file_marker() {
    let source = r#"
interface NotIncluded {
  x: string;
}

// tyval:type
interface Included {
  y: number;
}
"#;
    let schema = build("mixed.ts", source);
    assert!(!schema.types.contains_key("NotIncluded"));
    assert!(schema.types.contains_key("Included"));
}

#[test]
fn ignore_changes_marker_is_recorded() {
    let source = r#"
// tyval:type
// tyval:ignore-changes
interface Frozen {
  a: string;
}
"#;
    let schema = build("frozen.ts", source);
    let node = schema.types.get("Frozen").unwrap();
    assert!(node.common().ignore_changes);
}

#[test]
fn heritage_is_lowered_to_reference_types() {
    let source = r#"
// tyval:file
interface Base {
  base: string;
}

interface Sub extends Base {
  sub: string;
}
"#;
    let schema = build("heritage.ts", source);
    let TypeNode::Interface(sub) = schema.types.get("Sub").unwrap() else {
        panic!("expected interface");
    };
    assert_eq!(sub.heritage.len(), 1);
    assert_eq!(sub.heritage[0].referenced_type_name, "Base");
}

#[test]
fn union_members_are_sorted_by_printed_form() {
    let source = r#"
// tyval:file
type Letters = 'b' | 'a' | 'c';
"#;
    let schema = build("letters.ts", source);
    let TypeNode::Union(u) = schema.types.get("Letters").unwrap() else {
        panic!("expected union");
    };
    let printed: Vec<String> = u
        .union_members
        .iter()
        .map(|m| match m {
            TypeNode::StringLiteral(lit) => lit.value.clone(),
            _ => panic!("expected string literal"),
        })
        .collect();
    assert_eq!(printed, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
}

#[test]
fn branded_primitive_intersection_lowers_to_plain_string() {
    let source = r#"
// tyval:file
type UserId = string & { _brand: 'UserId' };
"#;
    let schema = build("branded.ts", source);
    assert!(matches!(schema.types.get("UserId").unwrap(), TypeNode::String(_)));
}

#[test]
fn record_lowers_to_mapped_and_omit_evaluates_keyof() {
    let source = r#"
// tyval:file
interface Point {
  x: number;
  y: number;
}

type PointMap = Record<string, Point>;
type JustX = Omit<Point, keyof Point>;
"#;
    let schema = build("record.ts", source);
    assert!(matches!(schema.types.get("PointMap").unwrap(), TypeNode::Mapped(_)));
    let TypeNode::Omit(omit) = schema.types.get("JustX").unwrap() else {
        panic!("expected omit");
    };
    assert_eq!(omit.omitted_fields.len(), 2);
}

#[test]
fn index_signature_type_alias_lowers_correctly() {
    let source = r#"
// tyval:file
type StringMap = { [k: string]: number };
"#;
    let schema = build("index.ts", source);
    assert!(matches!(
        schema.types.get("StringMap").unwrap(),
        TypeNode::IndexSignature(_)
    ));
}

#[test]
fn duplicate_declaration_names_are_rejected() {
    let decls_a = scan_file(
        "a.ts",
        r#"
// tyval:file
interface Dup { a: string; }
"#,
    )
    .unwrap();
    let decls_b = scan_file(
        "b.ts",
        r#"
// tyval:file
interface Dup { b: string; }
"#,
    )
    .unwrap();
    let mut all = decls_a;
    all.extend(decls_b);
    assert!(build_schema(all).is_err());
}

#[test]
fn undefined_reference_is_rejected() {
    let decls = scan_file(
        "ref.ts",
        r#"
// tyval:file
interface Orphan {
  parent: Nonexistent;
}
"#,
    )
    .unwrap();
    assert!(build_schema(decls).is_err());
}

#[test]
fn generics_on_declarations_are_rejected() {
    let err = scan_file(
        "generics.ts",
        r#"
// tyval:file
interface Box<T> {
  value: T;
}
"#,
    );
    assert!(err.is_err());
}
