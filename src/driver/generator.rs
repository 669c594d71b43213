//! Generation pipeline orchestration module
//!
//! This module contains the driver that reads the declarations file, runs
//! registration and resolution, and renders or dumps the result.

use log::{debug, info};

use crate::diagnostic::{Diagnostic, DiagnosticEngine, ErrorFormatter};
use crate::semantic::{BuildError, PrototypeTableBuilder};

use super::artifact::{GenerateArtifact, GeneratePhase};
use super::cli::GenerateConfig;
use super::output::OutputHandler;

/// Main generator driver
pub struct GeneratorDriver {
    config: GenerateConfig,
    diagnostics: DiagnosticEngine,
    output_handler: OutputHandler,
}

impl GeneratorDriver {
    /// Create a new generator driver from CLI arguments
    pub fn new(cli: super::cli::Cli) -> Self {
        Self::from_config(cli.into_config())
    }

    /// Create a new generator driver from configuration
    pub fn from_config(config: GenerateConfig) -> Self {
        GeneratorDriver {
            diagnostics: DiagnosticEngine::with_warnings_as_errors(config.warnings_as_errors),
            output_handler: OutputHandler::new(),
            config,
        }
    }

    /// Run the pipeline up to and including `stop_after`.
    pub fn run_pipeline(&mut self, stop_after: GeneratePhase) -> Result<GenerateArtifact, PipelineError> {
        let mut out = GenerateArtifact::default();

        info!("reading {}", self.config.protos_path.display());
        let source = std::fs::read_to_string(&self.config.protos_path).map_err(PipelineError::Io)?;

        let mut builder = PrototypeTableBuilder::new(&self.config.profile, &mut self.diagnostics);
        builder.register_source(&source).map_err(PipelineError::Fatal)?;
        if stop_after == GeneratePhase::Register {
            out.symbol_table = Some(builder.finish());
            return Ok(out);
        }

        builder.resolve_bodies().map_err(PipelineError::Fatal)?;
        builder.resolve_functions();
        let table = builder.finish();
        if stop_after == GeneratePhase::Resolve {
            out.symbol_table = Some(table);
            return Ok(out);
        }

        out.module_source = Some(self.output_handler.render_module(&table, &self.config.profile));
        out.symbol_table = Some(table);
        Ok(out)
    }

    /// Run the generator and write its output.
    ///
    /// Nothing is written when a constant fails to evaluate, or when
    /// warnings are errors and any diagnostic was reported.
    pub fn run(&mut self) -> Result<(), DriverError> {
        let artifact = match self.run_pipeline(self.config.stop_after) {
            Ok(artifact) => artifact,
            Err(PipelineError::Io(err)) => {
                return Err(DriverError::Io(format!(
                    "Failed to read {}: {}",
                    self.config.protos_path.display(),
                    err
                )));
            }
            Err(PipelineError::Fatal(err)) => {
                self.diagnostics.report_error(err.to_string(), Some(err.line));
                self.print_diagnostics();
                return Err(DriverError::GenerationFailed);
            }
        };

        self.print_diagnostics();
        if self.diagnostics.has_errors() {
            return Err(DriverError::GenerationFailed);
        }

        let text = if self.config.dump_table {
            artifact
                .symbol_table
                .as_ref()
                .map(|table| self.output_handler.dump_symbol_table(table))
        } else {
            artifact.module_source
        };
        let Some(text) = text else {
            return Ok(());
        };

        match &self.config.output_path {
            Some(path) => {
                debug!("writing {} bytes to {}", text.len(), path.display());
                std::fs::write(path, text)
                    .map_err(|e| DriverError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            }
            None => print!("{}", text),
        }
        Ok(())
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    /// Print accumulated diagnostics without returning an error
    pub fn print_diagnostics(&self) {
        let formatter = ErrorFormatter::with_path(self.config.protos_path.display().to_string());
        formatter.print_diagnostics(self.diagnostics.diagnostics());
    }
}

/// Error types for the generator driver
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Generation failed due to errors")]
    GenerationFailed,
}

/// Error that will stop the generation pipeline
#[derive(Debug)]
pub enum PipelineError {
    Fatal(BuildError),
    Io(std::io::Error),
}
