//! Declaration-line splitting and classification.
//!
//! The input holds one declaration per line as `<name>:<declaration>`.
//! Function prototypes are marked by a name ending in `()`.

use crate::diagnostic::BindError;

use super::utils::starts_with_keyword;

/// Suffix marking a function prototype line.
pub const CALL_SITE_MARKER: &str = "()";

/// One `<name>:<declaration>` line of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclLine {
    /// 1-based line number in the declarations file
    pub line: usize,
    pub name: String,
    /// Declaration text with leading whitespace removed
    pub body: String,
}

impl DeclLine {
    pub fn is_function(&self) -> bool {
        self.name.ends_with(CALL_SITE_MARKER)
    }

    /// Symbol name without the call-site marker.
    pub fn symbol_name(&self) -> &str {
        self.name.strip_suffix(CALL_SITE_MARKER).unwrap_or(&self.name)
    }

    pub fn kind(&self) -> DeclKind {
        DeclKind::classify(&self.body)
    }
}

/// What a non-function declaration line declares, by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Union,
    Struct,
    Enum,
    Define,
    /// Anything else: `typedef BASE NAME` or a function-pointer typedef
    Typedef,
}

impl DeclKind {
    pub fn classify(body: &str) -> Self {
        let body = body.trim_start();
        let after_typedef = if starts_with_keyword(body, "typedef") {
            body["typedef".len()..].trim_start()
        } else {
            body
        };
        if starts_with_keyword(after_typedef, "union") {
            DeclKind::Union
        } else if starts_with_keyword(after_typedef, "struct") {
            DeclKind::Struct
        } else if starts_with_keyword(after_typedef, "enum") {
            DeclKind::Enum
        } else if body.starts_with("#define") {
            DeclKind::Define
        } else {
            DeclKind::Typedef
        }
    }
}

/// Split one raw line into name and declaration text.
pub fn parse_line(line_no: usize, raw: &str) -> Result<DeclLine, BindError> {
    let raw = raw.trim_end_matches(['\r', '\n']);
    let (name, body) = raw.split_once(':').ok_or_else(|| BindError::MalformedLine {
        text: raw.to_string(),
    })?;
    Ok(DeclLine {
        line: line_no,
        name: name.trim().to_string(),
        body: body.trim_start().to_string(),
    })
}

/// Split a whole declarations file, skipping blank lines.
///
/// Lines without a `:` separator are returned as errors alongside their
/// line number so the caller can report them and carry on.
pub fn parse_lines(source: &str) -> Vec<(usize, Result<DeclLine, BindError>)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(idx, raw)| (idx + 1, parse_line(idx + 1, raw)))
        .collect()
}
