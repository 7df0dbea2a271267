//! Maven version specifier handling.
//!
//! A declared version can be an exact version (`1.2.3`), a property
//! placeholder (`${guava.version}`), a range (`[1.0,2.0)`), or missing
//! entirely. Only exact versions and ranges map to a descriptor path; the
//! rest must be resolved from repository metadata first.

/// Literal some build tools write when no version was declared.
const UNSPECIFIED: &str = "unspecified";

const PLACEHOLDER_PREFIX: &str = "${";

/// Returns true if `version` can be turned into a descriptor path without
/// consulting repository metadata.
pub fn is_known(version: &str) -> bool {
    !version.is_empty() && version != UNSPECIFIED && !version.starts_with(PLACEHOLDER_PREFIX)
}

/// Picks one concrete version out of a version specifier.
///
/// Strips range brackets, splits on `,` and returns the lexicographically
/// greatest token. This is a string comparison, not a version comparison:
/// `[2.9,2.10]` yields `2.9`. Exact versions pass through unchanged.
pub fn select_from_range(version: &str) -> &str {
    version
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .max()
        .unwrap_or_default()
}
