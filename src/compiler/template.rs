//! Placeholder substitution over a [`PathAttributeMap`].
//!
//! Two grammars are supported:
//!
//! - artifact definitions: `%%environ_<name>%%` tokens. Tokens with any other
//!   prefix (for example `%%users.homedir%%`) are left in place so the
//!   caller can reject the pattern as unresolved.
//! - line-oriented filter files: `{name}` tokens with `{{` and `}}` as
//!   escaped literal braces.

use crate::compiler::diagnostics::SkipReason;
use crate::config::PathAttributeMap;
use crate::constants::{ENVIRON_PLACEHOLDER_PREFIX, PLACEHOLDER_MARKER};

/// Substitute `%%environ_<name>%%` tokens.
///
/// Substituted values are rewritten to use `separator`. A token naming an
/// attribute missing from `attributes` fails the whole pattern.
pub fn expand_placeholders(
    pattern: &str,
    attributes: &PathAttributeMap,
    separator: char,
) -> Result<String, SkipReason> {
    let marker_len = PLACEHOLDER_MARKER.len();
    let mut result = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find(PLACEHOLDER_MARKER) {
        result.push_str(&rest[..start]);
        let after_start = &rest[start + marker_len..];

        let Some(end) = after_start.find(PLACEHOLDER_MARKER) else {
            // Unterminated, keep it for the unresolved check
            result.push_str(&rest[start..]);
            return Ok(result);
        };

        let token = &after_start[..end];
        let lowered = token.to_lowercase();
        match lowered.strip_prefix(ENVIRON_PLACEHOLDER_PREFIX) {
            Some(name) => {
                let value = attributes.get(name).ok_or_else(|| SkipReason::UnknownAttribute {
                    name: name.to_string(),
                })?;
                result.push_str(&with_separator(value, separator));
            }
            None => result.push_str(&rest[start..start + marker_len + end + marker_len]),
        }

        rest = &after_start[end + marker_len..];
    }

    result.push_str(rest);
    Ok(result)
}

/// True when a `%%` marker survived substitution.
pub fn has_unresolved_placeholder(pattern: &str) -> bool {
    pattern.contains(PLACEHOLDER_MARKER)
}

/// Substitute `{name}` tokens, honoring `{{` and `}}` escapes.
///
/// A lone brace makes the line unresolvable.
pub fn format_attributes(line: &str, attributes: &PathAttributeMap) -> Result<String, SkipReason> {
    let mut result = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                result.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                result.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err(SkipReason::UnresolvedPlaceholder),
                    }
                }
                let value = attributes
                    .get(&name)
                    .ok_or(SkipReason::UnknownAttribute { name })?;
                result.push_str(value);
            }
            '}' => return Err(SkipReason::UnresolvedPlaceholder),
            c => result.push(c),
        }
    }

    Ok(result)
}

fn with_separator(value: &str, separator: char) -> String {
    value
        .chars()
        .map(|c| if c == '/' || c == '\\' { separator } else { c })
        .collect()
}
