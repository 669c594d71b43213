//! Shared test utilities for the integration tests

#![allow(dead_code)]

use ffigen::diagnostic::DiagnosticEngine;
use ffigen::driver::artifact::GeneratePhase;
use ffigen::driver::{GenerateConfig, GeneratorDriver};
use ffigen::lib_options::LibraryProfile;
use ffigen::semantic::{BuildError, PrototypeTableBuilder, SymbolTable};

/// Build a symbol table with the default library profile
pub fn build(source: &str) -> (Result<SymbolTable, BuildError>, Vec<String>) {
    let _ = env_logger::try_init();
    let profile = LibraryProfile::default();
    let mut diagnostics = DiagnosticEngine::new();
    let result = PrototypeTableBuilder::new(&profile, &mut diagnostics).build(source);
    let messages = diagnostics.messages().into_iter().map(str::to_string).collect();
    (result, messages)
}

pub fn build_ok(source: &str) -> SymbolTable {
    match build(source) {
        (Ok(table), _) => table,
        (Err(e), messages) => panic!("build failed: {} ({:?})", e, messages),
    }
}

/// Run the driver through rendering and return the module text
pub fn generate_module(source: &str) -> String {
    let _ = env_logger::try_init();
    let config = GenerateConfig::from_source_code(source).expect("temp file");
    let mut driver = GeneratorDriver::from_config(config);
    let artifact = match driver.run_pipeline(GeneratePhase::Emit) {
        Ok(artifact) => artifact,
        Err(e) => {
            driver.print_diagnostics();
            panic!("generation failed: {:?}", e);
        }
    };
    artifact.module_source.expect("module source")
}
