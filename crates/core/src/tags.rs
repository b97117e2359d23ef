#![forbid(unsafe_code)]

pub const MAX_TAG_NAME_CHARS: usize = 200;

/// Tag names are global and case-sensitive; only surrounding whitespace is dropped.
pub fn normalize_tag_name(raw: &str) -> Result<String, TagNameError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TagNameError::Empty);
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(TagNameError::ContainsControl);
    }
    if trimmed.chars().count() > MAX_TAG_NAME_CHARS {
        return Err(TagNameError::TooLong);
    }
    Ok(trimmed.to_string())
}

/// Splits a comma-separated tag string into normalized names.
///
/// Blank segments are skipped and repeated names keep their first position, so
/// `"alpha, , beta, alpha"` yields `["alpha", "beta"]`.
pub fn parse_tag_list(raw: &str) -> Result<Vec<String>, TagNameError> {
    let mut out: Vec<String> = Vec::new();
    for segment in raw.split(',') {
        if segment.trim().is_empty() {
            continue;
        }
        let name = normalize_tag_name(segment)?;
        if !out.contains(&name) {
            out.push(name);
        }
    }
    Ok(out)
}

pub fn join_tag_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| name.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagNameError {
    Empty,
    TooLong,
    ContainsControl,
}

impl TagNameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "tag name must not be empty",
            Self::TooLong => "tag name is too long",
            Self::ContainsControl => "tag name contains control characters",
        }
    }
}
