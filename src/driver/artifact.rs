use crate::semantic::SymbolTable;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GeneratePhase {
    /// Pass 1 only: shells, aliases and constants.
    Register,
    /// Both passes plus function signatures.
    Resolve,
    #[default]
    Emit,
}

/// outputs of one generator run
#[derive(Debug, Default)]
pub struct GenerateArtifact {
    pub symbol_table: Option<SymbolTable>,
    pub module_source: Option<String>,
}
