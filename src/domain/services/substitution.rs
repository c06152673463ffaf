//! `$VAR` substitution
//!
//! `$NAME` and `${NAME}` are replaced with looked-up values. `\$` stands for
//! a literal dollar and is never expanded.

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\\$|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("variable pattern is valid")
});

fn variable_name<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Expand references in `raw`. Returns the first unbound name on failure.
pub fn expand<F>(raw: &str, lookup: F) -> Result<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(raw.len());
    let mut last = 0;
    for caps in VARIABLE_RE.captures_iter(raw) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&raw[last..whole.start()]);
        last = whole.end();
        match variable_name(&caps) {
            Some(name) => match lookup(name) {
                Some(value) => out.push_str(&value),
                None => return Err(name.to_string()),
            },
            None => out.push('$'),
        }
    }
    out.push_str(&raw[last..]);
    Ok(out)
}

/// Turn `\$` into `$` without expanding anything.
pub fn unescape(raw: &str) -> String {
    raw.replace("\\$", "$")
}
