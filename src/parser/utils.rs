//! Text scanning helpers shared by the declaration parsers.
//!
//! The input is documentation-derived C text, so everything here works on
//! raw `&str` slices with explicit nesting counters instead of a token
//! stream.

/// Qualifiers dropped before a type string is resolved.
pub const IGNORED_QUALIFIERS: [&str; 3] = ["const", "extern", "__inline__"];

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_ident_char) && !text.starts_with(|c: char| c.is_ascii_digit())
}

/// Remove every whole-word occurrence of `word`.
pub fn remove_word(text: &str, word: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(word) {
        let before_ok = rest[..pos].chars().next_back().is_none_or(|c| !is_ident_char(c));
        let after = &rest[pos + word.len()..];
        let after_ok = after.chars().next().is_none_or(|c| !is_ident_char(c));
        if before_ok && after_ok {
            out.push_str(&rest[..pos]);
        } else {
            out.push_str(&rest[..pos + word.len()]);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Tag keywords that may precede a registered type name.
pub const TAG_KEYWORDS: [&str; 3] = ["struct", "union", "enum"];

/// Strip qualifiers, a leading tag keyword and all whitespace:
/// `const unsigned int *` becomes `unsignedint*` and `struct ALLEGRO_FOO`
/// becomes `ALLEGRO_FOO`.
pub fn normalize_type(text: &str) -> String {
    let mut stripped = text.to_string();
    for qualifier in IGNORED_QUALIFIERS {
        stripped = remove_word(&stripped, qualifier);
    }
    let mut rest = stripped.trim_start();
    if let Some(tag) = TAG_KEYWORDS.iter().find(|tag| starts_with_keyword(rest, tag)) {
        rest = &rest[tag.len()..];
    }
    rest.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split `text` on `sep` occurring outside any `{}`/`()`/`[]` nesting.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            _ if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Drop the contents of parenthesized groups nested inside the outermost
/// level, keeping the parentheses themselves.
///
/// `int a, void (*cb)(int, int)` becomes `int a, void ()()`, so callback
/// argument lists no longer contribute commas.
pub fn strip_nested_groups(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut balance = 0i32;
    for c in text.chars() {
        if c == ')' {
            balance -= 1;
        }
        if balance == 0 {
            out.push(c);
        }
        if c == '(' {
            balance += 1;
        }
    }
    out
}

/// Byte offset where the trailing identifier of `text` starts.
pub fn trailing_identifier(text: &str) -> Option<usize> {
    let trimmed = text.trim_end();
    let start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(i, _)| i)?;
    Some(start)
}

/// Index of the parenthesis closing the one opened at `open`.
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Text between the first `{` and the last `}`, if there is a brace body.
pub fn brace_body(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open + 1..close])
}

/// Whether `text` starts with `keyword` followed by a non-identifier char.
pub fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.strip_prefix(keyword)
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !is_ident_char(c)))
}
