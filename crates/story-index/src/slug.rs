//! Slugs for container and story ids

use crate::error::IdError;
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[ ’–—―′¿'`~!@#$%^&*()_|+\-=?;:",.<>\{\}\[\]\\/]"#).expect("valid separator regex")
});

static DASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new("-+").expect("valid dash regex"));

static TITLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*/\s*").expect("valid title separator regex"));

/// Lowercase, dash-separated slug
///
/// ```rust,ignore
/// assert_eq!(sanitize("Design System"), "design-system");
/// assert_eq!(sanitize("  Vue <docs/>  "), "vue-docs");
/// ```
#[must_use]
pub fn sanitize(input: &str) -> String {
    let lowered = input.to_lowercase();
    let dashed = SEPARATORS.replace_all(&lowered, "-");
    let collapsed = DASH_RUNS.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// Story id for a kind and a name (`to_id("a", "2") == "a--2"`)
///
/// # Errors
/// Returns an error if either part has no alphanumeric content.
pub fn to_id(kind: &str, name: &str) -> Result<String, IdError> {
    let kind_slug = sanitize(kind);
    if kind_slug.is_empty() {
        return Err(IdError::EmptyKind(kind.to_string()));
    }
    let name_slug = sanitize(name);
    if name_slug.is_empty() {
        return Err(IdError::EmptyName(name.to_string()));
    }
    Ok(format!("{kind_slug}--{name_slug}"))
}

/// Display segments of a title, each trimmed
#[must_use]
pub fn split_title(title: &str) -> Vec<String> {
    TITLE_SEPARATOR
        .split(title.trim())
        .map(ToString::to_string)
        .collect()
}
