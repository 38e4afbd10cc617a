//! Haskell scope heuristic.
//!
//! There is no parser here: the current scope changes whenever a line starts
//! with a type signature (`name :: ...`) or, failing that, a definition
//! equation (`name args = ...`). Nothing ever closes a scope, so a name stays
//! current through trailing blank lines and unrelated declarations until the
//! next match.

use once_cell::sync::Lazy;
use regex::Regex;

use super::scope::{ScopeMap, MODULE_SCOPE};

static SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][\w']*)\s*::").expect("signature pattern is a valid regex")
});

static EQUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][\w']*)\s+.*=").expect("equation pattern is a valid regex")
});

/// Name introduced by a top-of-line signature or equation, if any.
pub fn scope_name(line: &str) -> Option<&str> {
    SIGNATURE
        .captures(line)
        .or_else(|| EQUATION.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str())
}

/// Map each line to the most recent signature/equation name at or before it.
pub fn map_haskell_scopes(source_code: &str) -> ScopeMap {
    let mut map = ScopeMap::empty();
    let mut current = MODULE_SCOPE;

    for line in source_code.lines() {
        if let Some(name) = scope_name(line) {
            current = name;
        }
        map.push(current);
    }

    map
}
