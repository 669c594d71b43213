mod common;

use common::{build, build_ok};
use ffigen::driver::{DriverError, GenerateConfig, GeneratorDriver};

#[test]
fn test_malformed_entries_are_skipped() {
    let source = r#"
not a declaration
ALLEGRO_S:struct ALLEGRO_S { ALLEGRO_MISSING m; int kept; };
al_broken():int al_broken(int a, int b;
al_fine():int al_fine(int a);
"#;
    let (result, messages) = build(source);
    let table = result.unwrap();
    assert_eq!(table.fields_of("ALLEGRO_S").map(|f| f.len()), Some(1));
    assert!(table.get_function("al_broken").is_none());
    assert!(table.get_function("al_fine").is_some());
    assert_eq!(messages.len(), 3);
}

#[test]
fn test_non_integer_define_is_fatal() {
    let (result, _) = build("ALLEGRO_PI:#define ALLEGRO_PI 3.14159\n");
    let err = result.unwrap_err();
    assert_eq!(err.name, "ALLEGRO_PI");
    assert_eq!(err.line, 1);
}

#[test]
fn test_fatal_define_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("allegro.py");
    let mut config = GenerateConfig::from_source_code("ALLEGRO_A:#define ALLEGRO_A ALLEGRO_B << 2\n").unwrap();
    config.output_path = Some(out.clone());
    let mut driver = GeneratorDriver::from_config(config);
    assert!(matches!(driver.run(), Err(DriverError::GenerationFailed)));
    assert!(!out.exists());
}

#[test]
fn test_empty_input() {
    let table = build_ok("\n\n");
    assert!(table.types().is_empty());
    assert!(table.constants().is_empty());
    assert!(table.functions().is_empty());
}
