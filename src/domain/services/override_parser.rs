//! Override expression parser
//!
//! Accepted shapes:
//! - `KEY=VALUE` - top-level key for `-D`, templating section for `-S`
//! - `[section]KEY=VALUE` - explicit section; `[a][b]KEY=V` nests, `[]` is the root
//! - `!KEY=VALUE` / `!!KEY=VALUE` - soft / hard ignored
//! - `[section]~KEY` - delete the key
//! - `name` / `(name)` - optional config (parenthesised: may be missing)
//!
//! Values are kept raw and evaluated when projected.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::domain::entities::{
    Assignment, AssignmentValue, LayerOrigin, LeafValue, OverrideLayer, SectionTarget,
};
use crate::domain::value_objects::{IgnoreState, OPTS_KEY};
use crate::error::{SuiteConfError, SuiteConfResult};

static OPT_CONF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\()?([A-Za-z0-9_][A-Za-z0-9_.+-]*)(\))?$").expect("opt conf pattern is valid")
});

/// Name of an optional config, `opt/rose-suite-<name>.conf`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptConfKey {
    name: String,
    optional: bool,
}

impl OptConfKey {
    /// Parse `name` or `(name)`; `None` if the token is not a valid name.
    pub fn parse(token: &str) -> Option<Self> {
        let caps = OPT_CONF_RE.captures(token)?;
        let open = caps.get(1).is_some();
        let close = caps.get(3).is_some();
        if open != close {
            return None;
        }
        Some(Self {
            name: caps.get(2)?.as_str().to_string(),
            optional: open,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A missing file is skipped rather than reported.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Display for OptConfKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "({})", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverrideExpr {
    Assign(Assignment),
    OptionalConfig(OptConfKey),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideParser;

impl OverrideParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse any override shape; unbracketed assignments go to the root.
    pub fn parse(&self, raw: &str) -> SuiteConfResult<OverrideExpr> {
        let trimmed = raw.trim();
        if trimmed.contains('=') || trimmed.starts_with('[') || trimmed.starts_with('~') {
            return self
                .assignment(raw, SectionTarget::Root, true)
                .map(OverrideExpr::Assign);
        }
        OptConfKey::parse(trimmed)
            .map(OverrideExpr::OptionalConfig)
            .ok_or_else(|| {
                SuiteConfError::malformed(raw, "expected KEY=VALUE or an optional config name")
            })
    }

    /// Parse a `-D` define. Returns `None` for defines that are dropped.
    ///
    /// A bare optional config name becomes a root `opts` assignment, so it
    /// is loaded and recorded like `-O`.
    pub fn parse_define(&self, raw: &str) -> SuiteConfResult<Option<Assignment>> {
        let assignment = match self.parse(raw)? {
            OverrideExpr::Assign(assignment) => assignment,
            OverrideExpr::OptionalConfig(key) => {
                return Ok(Some(Assignment::set(
                    SectionTarget::Root,
                    OPTS_KEY,
                    key.to_string(),
                    IgnoreState::Active,
                )));
            }
        };
        if assignment.target == SectionTarget::Root
            && raw.trim_start().starts_with("[]")
            && matches!(
                assignment.value,
                AssignmentValue::Set { state, .. } if state.is_ignored()
            )
        {
            tracing::warn!(
                define = raw,
                "CLI opts set to ignored or trigger-ignored will be ignored."
            );
            return Ok(None);
        }
        Ok(Some(assignment))
    }

    /// Parse a `-S` template define; it always targets the templating section.
    pub fn parse_template_define(&self, raw: &str) -> SuiteConfResult<Assignment> {
        self.assignment(raw, SectionTarget::Templating, false)
    }

    /// Build the command-line layer from `-D` and `-S` strings, in that order.
    pub fn parse_layer(
        &self,
        origin: LayerOrigin,
        defines: &[String],
        template_defines: &[String],
    ) -> SuiteConfResult<OverrideLayer> {
        let mut assignments = Vec::new();
        for define in defines {
            if let Some(assignment) = self.parse_define(define)? {
                assignments.push(assignment);
            }
        }
        for define in template_defines {
            assignments.push(self.parse_template_define(define)?);
        }
        Ok(OverrideLayer::new(origin, assignments))
    }

    fn assignment(
        &self,
        raw: &str,
        default_target: SectionTarget,
        allow_sections: bool,
    ) -> SuiteConfResult<Assignment> {
        let mut rest = raw.trim();
        let mut sections: Vec<String> = Vec::new();
        let mut bracketed = false;

        while let Some(inner) = rest.strip_prefix('[') {
            if !allow_sections {
                return Err(SuiteConfError::malformed(
                    raw,
                    "template defines cannot name a section",
                ));
            }
            let end = inner
                .find(']')
                .ok_or_else(|| SuiteConfError::malformed(raw, "unterminated section"))?;
            let name = inner[..end].trim();
            if name.is_empty() && (bracketed || inner[end + 1..].starts_with('[')) {
                return Err(SuiteConfError::malformed(raw, "empty nested section"));
            }
            if !name.is_empty() {
                sections.push(name.to_string());
            }
            bracketed = true;
            rest = &inner[end + 1..];
        }

        let target = if !bracketed {
            default_target
        } else if sections.is_empty() {
            SectionTarget::Root
        } else {
            SectionTarget::Path(sections)
        };

        if let Some(key) = rest.strip_prefix('~') {
            let key = key.trim();
            validate_key(raw, key)?;
            return Ok(Assignment::delete(target, key));
        }

        let (key_part, value) = rest
            .split_once('=')
            .ok_or_else(|| SuiteConfError::malformed(raw, "missing '='"))?;
        let (state, key) = IgnoreState::split_prefix(key_part.trim());
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() && value.is_empty() {
            return Err(SuiteConfError::malformed(raw, "key and value are both empty"));
        }
        validate_key(raw, key)?;

        Ok(Assignment::set(
            target,
            key,
            LeafValue::Raw(value.to_string()),
            state,
        ))
    }
}

fn validate_key(raw: &str, key: &str) -> SuiteConfResult<()> {
    if key.is_empty() {
        return Err(SuiteConfError::malformed(raw, "missing key"));
    }
    if key
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '=' | '[' | ']'))
    {
        return Err(SuiteConfError::malformed(raw, format!("invalid key '{}'", key)));
    }
    Ok(())
}

/// Split on whitespace, honouring single and double quotes.
pub fn shell_split(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Parse a space-separated list of optional config names.
pub fn parse_opt_conf_keys(text: &str) -> SuiteConfResult<Vec<OptConfKey>> {
    shell_split(text)
        .iter()
        .map(|token| {
            OptConfKey::parse(token).ok_or_else(|| {
                SuiteConfError::malformed(token, "not a valid optional config name")
            })
        })
        .collect()
}

/// Merge opt key lists: keep only the last occurrence of each name.
///
/// `a b a` becomes `b a`, so a later mention moves a name to a later
/// (higher priority) position.
pub fn simplify_opts<I, T>(items: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: PartialEq,
{
    let items: Vec<T> = items.into_iter().collect();
    let mut seen: Vec<T> = Vec::new();
    for item in items.into_iter().rev() {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen.reverse();
    seen
}
