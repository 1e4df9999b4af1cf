use crate::compiler::diagnostics::SkipReason;
use crate::compiler::template::{expand_placeholders, has_unresolved_placeholder};
use crate::config::PathAttributeMap;

/// Resolve placeholders in an artifact path pattern and split it into segments.
///
/// # Arguments
///
/// * `pattern` - Path pattern as written in the definition
/// * `separator` - Path separator of the source
/// * `attributes` - Environment attributes for `%%environ_<name>%%` tokens
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Segments after the root, in order
/// * `Err(SkipReason)` - Why the pattern cannot become a find specification
pub fn segment_pattern(
    pattern: &str,
    separator: char,
    attributes: &PathAttributeMap,
) -> Result<Vec<String>, SkipReason> {
    let expanded = expand_placeholders(pattern, attributes, separator)?;

    if has_unresolved_placeholder(&expanded) {
        return Err(SkipReason::UnresolvedPlaceholder);
    }

    split_absolute(&expanded, separator)
}

/// Split an absolute path into segments, dropping the root segment.
///
/// Relative paths are rejected rather than rooted, as are paths ending in
/// a bare separator.
pub fn split_absolute(path: &str, separator: char) -> Result<Vec<String>, SkipReason> {
    if !path.starts_with(separator) {
        return Err(SkipReason::NotAbsolute);
    }

    let segments: Vec<String> = path.split(separator).skip(1).map(String::from).collect();

    match segments.last() {
        Some(last) if !last.is_empty() => Ok(segments),
        _ => Err(SkipReason::EmptyTrailingSegment),
    }
}
