//! Bounded expansion of recursive `**` wildcards.
//!
//! A pattern ending in `**N` is rewritten into `N` concrete patterns, each
//! one directory level deeper than the previous, so that the traversal
//! depth is fixed up front instead of being left to the search engine.

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

use crate::constants::{MAX_RECURSIVE_GLOB_DEPTH, RECURSIVE_GLOB_MARKER, SINGLE_LEVEL_WILDCARD};

lazy_static! {
    /// Trailing `**` marker with an optional separator before it and an optional depth after it
    static ref RECURSIVE_GLOB: Regex = Regex::new(&format!(
        r"^(?P<prefix>.*?)[/\\]?{}(?P<depth>[0-9]+)?$",
        regex::escape(RECURSIVE_GLOB_MARKER)
    ))
    .unwrap();
}

/// Finite sequence of depth variants for one pattern.
///
/// Variant `i` is the prefix followed by `i` one-level wildcard segments.
/// Clone before iterating to replay the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursiveGlobExpansion {
    prefix: String,
    level: String,
    depth: usize,
    next: usize,
}

impl RecursiveGlobExpansion {
    /// Number of variants the full sequence holds.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Iterator for RecursiveGlobExpansion {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next >= self.depth {
            return None;
        }

        let mut variant = String::with_capacity(self.prefix.len() + self.level.len() * self.next);
        variant.push_str(&self.prefix);
        for _ in 0..self.next {
            variant.push_str(&self.level);
        }

        self.next += 1;
        Some(variant)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.depth - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecursiveGlobExpansion {}

/// Expand a trailing `**N` marker into `N` depth-limited variants.
///
/// Without an explicit count `default_depth` variants are produced. A
/// pattern without the marker yields itself, once, unchanged. Each added
/// level is `separator` followed by `*`. Depths above
/// [`MAX_RECURSIVE_GLOB_DEPTH`] are clamped to it.
pub fn expand_recursive_glob(
    pattern: &str,
    separator: char,
    default_depth: usize,
) -> RecursiveGlobExpansion {
    let mut level = String::with_capacity(2);
    level.push(separator);
    level.push_str(SINGLE_LEVEL_WILDCARD);

    let Some(captures) = RECURSIVE_GLOB.captures(pattern) else {
        return RecursiveGlobExpansion {
            prefix: pattern.to_string(),
            level,
            depth: 1,
            next: 0,
        };
    };

    let prefix = captures.name("prefix").map_or("", |m| m.as_str());
    let depth = match captures.name("depth") {
        Some(count) => count.as_str().parse::<usize>().unwrap_or(usize::MAX),
        None => default_depth,
    };
    let depth = if depth > MAX_RECURSIVE_GLOB_DEPTH {
        warn!(
            "Recursive glob depth in {} exceeds {}, clamping",
            pattern, MAX_RECURSIVE_GLOB_DEPTH
        );
        MAX_RECURSIVE_GLOB_DEPTH
    } else {
        depth
    };

    RecursiveGlobExpansion {
        prefix: prefix.to_string(),
        level,
        depth,
        next: 0,
    }
}
