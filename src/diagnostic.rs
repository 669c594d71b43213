use log::warn;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Note,
}

/// Individual diagnostic with its input context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// 1-based line of the declarations file, when known
    pub line: Option<usize>,
    pub hints: Vec<String>, // Suggestions for fixing
}

/// Recoverable problems found while scraping declarations.
///
/// None of these stop the run: the offending field, parameter or
/// declaration is dropped or defaulted and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("Unresolved type '{text}'")]
    UnresolvedType { text: String },

    #[error("Can't parse field '{text}' of '{aggregate}'")]
    MalformedField { aggregate: String, text: String },

    #[error("Can't parse parameter '{text}' of '{function}'")]
    MalformedParameter { function: String, text: String },

    #[error("Malformed parameter list for '{function}': {text}")]
    MalformedParameterList { function: String, text: String },

    #[error("Can't attach fields to '{name}': not a struct or union")]
    AggregateFinalization { name: String },

    #[error("Can't size array '{field}' of '{aggregate}': {reason}")]
    UnsizedArray {
        aggregate: String,
        field: String,
        reason: String,
    },

    #[error("Can't parse inline aggregate '{text}' in '{aggregate}' yet")]
    UnparsedAggregate { aggregate: String, text: String },

    #[error("Malformed declaration line: {text}")]
    MalformedLine { text: String },
}

impl BindError {
    pub fn unresolved(text: impl Into<String>) -> Self {
        BindError::UnresolvedType { text: text.into() }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            BindError::UnresolvedType { .. } => Some("declare the type earlier in the input or add it to the primitive table"),
            BindError::MalformedLine { .. } => Some("expected '<name>:<declaration>'"),
            BindError::UnsizedArray { .. } => Some("every constant in an array length must be defined somewhere in the input"),
            _ => None,
        }
    }
}

/// Diagnostic engine collecting everything reported during one run
#[derive(Debug)]
pub struct DiagnosticEngine {
    pub diagnostics: Vec<Diagnostic>,
    pub warnings_as_errors: bool,
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        DiagnosticEngine {
            diagnostics: Vec::new(),
            warnings_as_errors: false,
        }
    }

    pub fn with_warnings_as_errors(warnings_as_errors: bool) -> Self {
        DiagnosticEngine {
            diagnostics: Vec::new(),
            warnings_as_errors,
        }
    }

    /// Record a recoverable problem at the given input line.
    pub fn report(&mut self, error: BindError, line: Option<usize>) {
        warn!("{}", error);
        let level = if self.warnings_as_errors {
            DiagnosticLevel::Error
        } else {
            DiagnosticLevel::Warning
        };
        let hints = error.hint().map(|h| vec![h.to_string()]).unwrap_or_default();
        self.diagnostics.push(Diagnostic {
            level,
            message: error.to_string(),
            line,
            hints,
        });
    }

    pub fn report_error(&mut self, message: String, line: Option<usize>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Error,
            message,
            line,
            hints: Vec::new(),
        });
    }

    pub fn report_note(&mut self, message: String, line: Option<usize>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Note,
            message,
            line,
            hints: Vec::new(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Messages only, in report order.
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}

/// Configurable diagnostic formatter
pub struct ErrorFormatter {
    pub show_hints: bool,
    pub path: Option<String>,
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        ErrorFormatter {
            show_hints: true,
            path: None,
        }
    }
}

impl ErrorFormatter {
    pub fn with_path(path: impl Into<String>) -> Self {
        ErrorFormatter {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Format a single diagnostic
    pub fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let level_str = match diag.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Note => "note",
        };

        let mut result = format!("{}: {}", level_str, diag.message);

        match (&self.path, diag.line) {
            (Some(path), Some(line)) => result.push_str(&format!(" at {}:{}", path, line)),
            (None, Some(line)) => result.push_str(&format!(" at line {}", line)),
            _ => {}
        }

        if self.show_hints {
            for hint in &diag.hints {
                result.push_str(&format!("\n  hint: {}", hint));
            }
        }

        result
    }

    /// Format multiple diagnostics
    pub fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|diag| self.format_diagnostic(diag))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            eprintln!("{}", self.format_diagnostic(diag));
        }
    }
}
