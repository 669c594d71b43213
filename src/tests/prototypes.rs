use crate::diagnostic::{BindError, DiagnosticEngine};
use crate::parser::PrototypeParser;
use crate::parser::prototype::{SkipReason, non_function_reason, split_prototype};
use crate::semantic::SymbolTable;
use crate::types::{CType, FunctionSig, Primitive, RecordKind};

fn parse_with(
    table: &SymbolTable,
    name: &str,
    body: &str,
) -> (Result<Option<FunctionSig>, BindError>, Vec<String>) {
    let mut diagnostics = DiagnosticEngine::new();
    let result = PrototypeParser::new(table, &mut diagnostics, "al_").parse(name, body, Some(1));
    let messages = diagnostics.messages().into_iter().map(str::to_string).collect();
    (result, messages)
}

fn parse_sig(name: &str, body: &str) -> FunctionSig {
    match parse_with(&SymbolTable::new(), name, body) {
        (Ok(Some(sig)), _) => sig,
        other => panic!("expected a signature for {}, got {:?}", name, other),
    }
}

#[test]
fn test_pointer_parameter_degrades() {
    let sig = parse_sig("al_foo", "int al_foo(ALLEGRO_DISPLAY *d, int x);");
    assert_eq!(
        sig,
        FunctionSig {
            name: "al_foo".to_string(),
            ret: Some(CType::INT),
            params: vec![CType::OpaquePointer, CType::INT],
        }
    );
}

#[test]
fn test_void_and_empty_lists() {
    let sig = parse_sig("al_rest", "void al_rest(double seconds);");
    assert_eq!(sig.ret, None);
    assert_eq!(sig.params, vec![CType::Primitive(Primitive::Double)]);

    let sig = parse_sig("al_init", "bool al_init(void);");
    assert_eq!(sig.ret, Some(CType::Primitive(Primitive::Bool)));
    assert!(sig.params.is_empty());

    let sig = parse_sig("al_get_time", "double al_get_time();");
    assert!(sig.params.is_empty());
}

#[test]
fn test_variadic_and_string_parameters() {
    let sig = parse_sig("al_trace", "void al_trace(const char *msg, ...);");
    assert_eq!(sig.params, vec![CType::Utf8String]);
}

#[test]
fn test_callback_parameters() {
    let sig = parse_sig(
        "al_run_main",
        "int al_run_main(int argc, char **argv, int (*main)(int, char **));",
    );
    assert_eq!(sig.params, vec![CType::INT, CType::OpaquePointer, CType::OpaquePointer]);

    let sig = parse_sig("al_get_x", "void al_get_x(float v[4], int n);");
    assert_eq!(sig.params, vec![CType::OpaquePointer, CType::INT]);
}

#[test]
fn test_unnamed_parameter() {
    let sig = parse_sig("al_f", "void al_f(int, unsigned int);");
    assert_eq!(sig.params, vec![CType::INT, CType::Primitive(Primitive::UInt)]);
}

#[test]
fn test_registered_types() {
    let mut table = SymbolTable::new();
    table.declare_record("ALLEGRO_DISPLAY", RecordKind::Struct);
    table.declare_record("ALLEGRO_COLOR", RecordKind::Struct);
    let (result, messages) = parse_with(
        &table,
        "al_get_pixel",
        "ALLEGRO_COLOR al_get_pixel(ALLEGRO_DISPLAY *display, int x, int y);",
    );
    let sig = result.ok().flatten().map(|sig| {
        let params: Vec<String> = sig.params.iter().map(CType::to_string).collect();
        (sig.ret.map(|r| r.to_string()), params)
    });
    assert_eq!(
        sig,
        Some((
            Some("ALLEGRO_COLOR".to_string()),
            vec!["LP_ALLEGRO_DISPLAY".to_string(), "c_int".to_string(), "c_int".to_string()]
        ))
    );
    assert!(messages.is_empty());

    let sig = parse_sig("al_get_name", "const char *al_get_name(int id);");
    assert_eq!(sig.ret, Some(CType::Utf8String));
}

#[test]
fn test_unresolved_types_fall_back() {
    let (result, messages) = parse_with(
        &SymbolTable::new(),
        "al_g",
        "ALLEGRO_MYSTERY al_g(ALLEGRO_MYSTERY m, int n);",
    );
    let sig = result.ok().flatten();
    assert_eq!(sig.as_ref().and_then(|s| s.ret.clone()), Some(CType::INT));
    assert_eq!(
        sig.map(|s| s.params),
        Some(vec![CType::OpaquePointer, CType::INT])
    );
    assert_eq!(
        messages,
        ["Unresolved type 'ALLEGRO_MYSTERY'", "Unresolved type 'ALLEGRO_MYSTERY'"]
    );
}

#[test]
fn test_unbalanced_parameter_list() {
    let table = SymbolTable::new();
    let (result, _) = parse_with(&table, "al_bad", "int al_bad(int x;");
    assert!(matches!(result, Err(BindError::MalformedParameterList { .. })));

    let (result, _) = parse_with(&table, "al_bad", "int al_bad(int x) extra;");
    assert!(matches!(result, Err(BindError::MalformedParameterList { .. })));

    let (result, _) = parse_with(&table, "al_missing", "int al_other(int x);");
    assert!(matches!(result, Err(BindError::MalformedParameterList { .. })));
}

#[test]
fn test_non_functions_are_skipped() {
    let table = SymbolTable::new();
    for (name, body) in [
        ("ALLEGRO_FOO", "int ALLEGRO_FOO(int x);"),
        ("al_enum", "enum al_enum { A };"),
        ("al_type", "typedef int al_type;"),
        ("al_var", "int al_var = 3;"),
        ("al_macro", "#define al_macro(x) x"),
    ] {
        let (result, messages) = parse_with(&table, name, body);
        assert_eq!(result, Ok(None), "{} should be skipped", name);
        assert!(messages.is_empty());
    }
    assert_eq!(
        non_function_reason("al_var", "int al_var = 3;", "al_"),
        Some(SkipReason::Initializer)
    );
    // `=` nested in the parameter list is not an initializer.
    assert_eq!(non_function_reason("al_x", "int al_x(int a = 1);", "al_"), None);
}

#[test]
fn test_split_prototype() {
    assert_eq!(
        split_prototype("al_foo", "int al_foo(int a, int (*cb)(int)) ;"),
        Some(("int", "int a, int (*cb)(int)"))
    );
    // The name must match as a whole word.
    assert_eq!(split_prototype("al_get", "int al_get_ex(int);"), None);
    assert_eq!(split_prototype("al_get", "void *al_get(void);"), Some(("void *", "void")));
}
