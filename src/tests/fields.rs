use crate::diagnostic::DiagnosticEngine;
use crate::parser::FieldParser;
use crate::parser::fields::{MemberDecl, classify_member};
use crate::semantic::SymbolTable;
use crate::types::{ArrayLen, CType, Field, Primitive, RecordKind};

fn parse_fields(table: &SymbolTable, body: &str) -> (Vec<Field>, Vec<String>) {
    let mut diagnostics = DiagnosticEngine::new();
    let fields = FieldParser::new(table, &mut diagnostics, "ALLEGRO_T", None).parse_body(body);
    let messages = diagnostics.messages().into_iter().map(str::to_string).collect();
    (fields, messages)
}

fn float() -> CType {
    CType::Primitive(Primitive::Float)
}

#[test]
fn test_scalar_and_array() {
    let (fields, messages) = parse_fields(&SymbolTable::new(), " int x; float y[3]; ");
    assert_eq!(
        fields,
        vec![
            Field::new("x", CType::INT),
            Field::new("y", CType::array(float(), ArrayLen::Fixed(3))),
        ]
    );
    assert!(messages.is_empty());
}

#[test]
fn test_shared_base_type() {
    let (fields, _) = parse_fields(&SymbolTable::new(), "float r, g, b, a;");
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["r", "g", "b", "a"]);
    assert!(fields.iter().all(|f| f.ty == float()));
}

#[test]
fn test_pointer_members_degrade() {
    let mut table = SymbolTable::new();
    table.declare_record("ALLEGRO_BITMAP", RecordKind::Struct);
    let body = "void (*callback)(int a, int b); ALLEGRO_BITMAP *bmp; const char *name; char *names[4];";
    let (fields, messages) = parse_fields(&table, body);
    assert_eq!(
        fields,
        vec![
            Field::new("callback", CType::OpaquePointer),
            Field::new("bmp", CType::OpaquePointer),
            Field::new("name", CType::OpaquePointer),
            Field::new("names", CType::array(CType::OpaquePointer, ArrayLen::Fixed(4))),
        ]
    );
    assert!(messages.is_empty());
}

#[test]
fn test_array_lengths() {
    let mut table = SymbolTable::new();
    table.define_constant("ALLEGRO_N", 10);
    let body = "float m[4][4]; int half[ALLEGRO_N / 2]; int later[ALLEGRO_LATER];";
    let (fields, _) = parse_fields(&table, body);
    assert_eq!(
        fields,
        vec![
            Field::new("m", CType::array(float(), ArrayLen::Fixed(16))),
            Field::new("half", CType::array(CType::INT, ArrayLen::Fixed(5))),
            Field::new(
                "later",
                CType::array(CType::INT, ArrayLen::Symbolic("ALLEGRO_LATER".to_string()))
            ),
        ]
    );
}

#[test]
fn test_inline_aggregate_element() {
    let body = "int num_sticks; struct { float axis[3]; } stick[8];";
    let (fields, messages) = parse_fields(&SymbolTable::new(), body);
    assert_eq!(
        fields[1],
        Field::new(
            "stick",
            CType::array(CType::array(float(), ArrayLen::Fixed(3)), ArrayLen::Fixed(8))
        )
    );
    assert_eq!(fields[1].ty.to_string(), "(c_float * 3) * 8");
    assert!(messages.is_empty());

    let body = "struct { int a; int b; } pairs[2]; int after;";
    let (fields, messages) = parse_fields(&SymbolTable::new(), body);
    assert_eq!(fields, vec![Field::new("after", CType::INT)]);
    assert_eq!(
        messages,
        ["Can't parse inline aggregate 'struct { int a; int b; }' in 'ALLEGRO_T' yet"]
    );
}

#[test]
fn test_bad_members_are_dropped() {
    let (fields, messages) = parse_fields(&SymbolTable::new(), "ALLEGRO_UNKNOWN thing; x; int ok;");
    assert_eq!(fields, vec![Field::new("ok", CType::INT)]);
    assert_eq!(
        messages,
        ["Unresolved type 'ALLEGRO_UNKNOWN'", "Can't parse field 'x' of 'ALLEGRO_T'"]
    );
}

#[test]
fn test_classify_member_tiers() {
    assert_eq!(
        classify_member("int (*proc)(void *arg)"),
        Some(MemberDecl::FunctionPointer { name: "proc" })
    );
    assert_eq!(classify_member("ALLEGRO_PATH *path"), Some(MemberDecl::Pointer { name: "path" }));
    assert_eq!(
        classify_member("char buf[ALLEGRO_N][2]"),
        Some(MemberDecl::Array {
            base: "char",
            name: "buf",
            dims: "ALLEGRO_N][2"
        })
    );
    assert_eq!(
        classify_member("unsigned int w, h"),
        Some(MemberDecl::Plain {
            base: "unsigned int",
            names: vec!["w", "h"]
        })
    );
    assert_eq!(classify_member("lonely"), None);
}
