//! Template variable projector
//!
//! Turns a merged tree into:
//! - the template variable mapping (templating section leaves, typed)
//! - `export` assignments for the `[env]` section
//!
//! Ignored leaves and leaves under ignored sections are skipped. Escaped
//! leaves (`\$`) are never variable-expanded.

use std::collections::HashMap;

use crate::domain::entities::{ConfigNode, Leaf, LeafValue};
use crate::domain::services::{literal, substitution};
use crate::domain::value_objects::{
    IgnoreState, TemplateValue, TemplatingSection, ENV_SECTION, SUITE_VARIABLES,
};
use crate::error::{SuiteConfError, SuiteConfResult};

pub const ROSE_ORIG_HOST: &str = "ROSE_ORIG_HOST";
pub const ROSE_VERSION: &str = "ROSE_VERSION";
pub const ROSE_SITE: &str = "ROSE_SITE";
pub const CYLC_VERSION: &str = "CYLC_VERSION";

/// Comment that pins `ROSE_ORIG_HOST` to the host of the first install.
pub const ORIG_HOST_MARKER: &str = " ROSE_ORIG_HOST set by suiteconf install.";

const DEPRECATED_ROOT_KEYS: [&str; 3] = ["root-dir", "root-dir{share}", "root-dir{work}"];

/// Values for the standard variables added to every projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionContext {
    pub rose_version: String,
    pub cylc_version: Option<String>,
    pub orig_host: Option<String>,
    pub site: Option<String>,
}

impl ProjectionContext {
    /// Context for this process: crate version and local host name.
    pub fn detect(site: Option<String>, cylc_version: Option<String>) -> Self {
        let orig_host = match hostname::get() {
            Ok(name) => Some(name.to_string_lossy().into_owned()),
            Err(err) => {
                tracing::warn!(error = %err, "could not determine host name");
                None
            }
        };
        Self {
            rose_version: env!("CARGO_PKG_VERSION").to_string(),
            cylc_version,
            orig_host,
            site: site.filter(|s| !s.is_empty()),
        }
    }
}

/// Whether `leaf` carries the install marker comment.
pub fn has_orig_host_marker(leaf: &Leaf) -> bool {
    leaf.comments()
        .iter()
        .any(|c| c.trim() == ORIG_HOST_MARKER.trim())
}

/// Write the standard variables into `[env]` and the templating section.
///
/// `ROSE_SITE` is always set, empty when no site is configured. User values
/// for `ROSE_VERSION` are replaced. `ROSE_ORIG_HOST` is kept
/// only when it carries the install marker. `CYLC_VERSION` is removed from
/// the templating section; it belongs to the environment.
pub fn apply_standard_variables(
    tree: &mut ConfigNode,
    templating: TemplatingSection,
    ctx: &ProjectionContext,
) {
    let templating_name = templating.section_name();

    if tree
        .unset(&[templating_name, CYLC_VERSION])
        .is_some()
    {
        tracing::warn!(
            section = templating_name,
            "CYLC_VERSION will be ignored; it is set by the workflow engine"
        );
    }
    if let Some(version) = &ctx.cylc_version {
        tree.set(&[ENV_SECTION, CYLC_VERSION], version.as_str(), IgnoreState::Active);
    }

    for section in [ENV_SECTION, templating_name] {
        let typed = section != ENV_SECTION;

        if let Some(existing) = tree.get(&[section, ROSE_VERSION]) {
            if !existing.is_ignored() && existing_text(existing) != ctx.rose_version {
                tracing::warn!(
                    section,
                    "ROSE_VERSION will be ignored; it is set automatically"
                );
            }
        }
        set_standard(tree, section, ROSE_VERSION, &ctx.rose_version, typed);

        set_standard(
            tree,
            section,
            ROSE_SITE,
            ctx.site.as_deref().unwrap_or_default(),
            typed,
        );

        let pinned = tree
            .get(&[section, ROSE_ORIG_HOST])
            .map(has_orig_host_marker)
            .unwrap_or(false);
        if pinned {
            continue;
        }
        if let Some(host) = &ctx.orig_host {
            if tree.get(&[section, ROSE_ORIG_HOST]).is_some() {
                tracing::warn!(
                    section,
                    "ROSE_ORIG_HOST will be ignored; it is set automatically"
                );
            }
            set_standard(tree, section, ROSE_ORIG_HOST, host, typed);
        }
    }
}

fn existing_text(leaf: &Leaf) -> String {
    match leaf.value() {
        LeafValue::Typed(TemplateValue::Str(s)) => s.clone(),
        LeafValue::Typed(other) => other.to_string(),
        LeafValue::Raw(raw) => match literal::evaluate(raw) {
            Ok(TemplateValue::Str(s)) => s,
            _ => raw.clone(),
        },
    }
}

fn set_standard(tree: &mut ConfigNode, section: &str, key: &str, value: &str, typed: bool) {
    let value = if typed {
        LeafValue::Typed(TemplateValue::Str(value.to_string()))
    } else {
        LeafValue::Raw(value.to_string())
    };
    tree.set(&[section, key], value, IgnoreState::Active);
}

/// One `[env]` entry ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvExport {
    pub name: String,
    /// Unescaped for escaped leaves, raw (with `$VAR` intact) otherwise.
    pub value: String,
    pub escaped: bool,
}

impl EnvExport {
    /// `export NAME=...`, single-quoted when escaped so the shell expands nothing.
    pub fn shell_assignment(&self) -> String {
        if self.escaped {
            format!("export {}='{}'", self.name, self.value.replace('\'', "'\\''"))
        } else {
            let mut quoted = String::with_capacity(self.value.len());
            for c in self.value.chars() {
                if matches!(c, '"' | '\\' | '`') {
                    quoted.push('\\');
                }
                quoted.push(c);
            }
            format!("export {}=\"{}\"", self.name, quoted)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub templating: TemplatingSection,
    pub template_variables: Vec<(String, TemplateValue)>,
    pub env: Vec<EnvExport>,
}

impl Projection {
    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.template_variables
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn env_value(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Every variable as an individual binding, plus the aggregate mapping.
    pub fn bindings(&self) -> Vec<(String, TemplateValue)> {
        let mut out = self.template_variables.clone();
        out.push((
            SUITE_VARIABLES.to_string(),
            TemplateValue::Map(self.template_variables.clone()),
        ));
        out
    }

    /// Shell text exporting every `[env]` entry, one per line.
    pub fn render_shell(&self) -> String {
        let mut out = String::new();
        for export in &self.env {
            out.push_str(&export.shell_assignment());
            out.push('\n');
        }
        out
    }

    /// Resolve `[env]` values against `environ`, in file order.
    ///
    /// Later entries may reference earlier ones.
    pub fn resolved_env(
        &self,
        environ: &HashMap<String, String>,
    ) -> SuiteConfResult<Vec<(String, String)>> {
        let mut scope = environ.clone();
        let mut out = Vec::with_capacity(self.env.len());
        for export in &self.env {
            let value = if export.escaped {
                export.value.clone()
            } else {
                substitution::expand(&export.value, |name| scope.get(name).cloned()).map_err(
                    |variable| SuiteConfError::UnboundVariable {
                        section: ENV_SECTION.to_string(),
                        key: export.name.clone(),
                        variable,
                    },
                )?
            };
            scope.insert(export.name.clone(), value.clone());
            out.push((export.name.clone(), value));
        }
        Ok(out)
    }
}

/// Project a merged tree.
///
/// Templating values are expanded against the `[env]` values and `environ`,
/// then read as literals.
pub fn project(
    tree: &ConfigNode,
    templating: TemplatingSection,
    environ: &HashMap<String, String>,
) -> SuiteConfResult<Projection> {
    warn_deprecated(tree, templating);

    let env = env_exports(tree);

    let mut scope = environ.clone();
    for export in &env {
        let value = if export.escaped {
            Some(export.value.clone())
        } else {
            substitution::expand(&export.value, |name| scope.get(name).cloned()).ok()
        };
        if let Some(value) = value {
            scope.insert(export.name.clone(), value);
        }
    }

    let section_name = templating.section_name();
    let mut template_variables = Vec::new();
    if let Some(section) = tree.section(section_name).filter(|s| !s.state().is_ignored()) {
        for (key, leaf) in section.leaves().filter(|(_, leaf)| !leaf.is_ignored()) {
            let value = template_value(section_name, key, leaf, &scope)?;
            template_variables.push((key.to_string(), value));
        }
    }

    Ok(Projection {
        templating,
        template_variables,
        env,
    })
}

fn env_exports(tree: &ConfigNode) -> Vec<EnvExport> {
    let Some(section) = tree.section(ENV_SECTION).filter(|s| !s.state().is_ignored()) else {
        return Vec::new();
    };
    section
        .leaves()
        .filter(|(_, leaf)| !leaf.is_ignored())
        .map(|(key, leaf)| {
            let text = leaf.text();
            EnvExport {
                name: key.to_string(),
                value: if leaf.is_escaped() {
                    substitution::unescape(&text)
                } else {
                    text.into_owned()
                },
                escaped: leaf.is_escaped(),
            }
        })
        .collect()
}

fn template_value(
    section: &str,
    key: &str,
    leaf: &Leaf,
    scope: &HashMap<String, String>,
) -> SuiteConfResult<TemplateValue> {
    let raw = match leaf.value() {
        LeafValue::Typed(value) => return Ok(value.clone()),
        LeafValue::Raw(raw) => raw,
    };
    let text = if leaf.is_escaped() {
        substitution::unescape(raw)
    } else {
        substitution::expand(raw, |name| scope.get(name).cloned()).map_err(|variable| {
            SuiteConfError::UnboundVariable {
                section: section.to_string(),
                key: key.to_string(),
                variable,
            }
        })?
    };
    literal::evaluate(&text).map_err(|err| SuiteConfError::InvalidTemplateVariable {
        section: section.to_string(),
        key: key.to_string(),
        value: raw.clone(),
        reason: err.to_string(),
    })
}

fn warn_deprecated(tree: &ConfigNode, templating: TemplatingSection) {
    if templating.is_deprecated() && tree.section(templating.section_name()).is_some() {
        tracing::warn!(
            section = templating.section_name(),
            "use [template variables] instead; [{}] is deprecated",
            templating.section_name()
        );
    }
    for key in DEPRECATED_ROOT_KEYS {
        if tree.leaf(key).is_some_and(|leaf| !leaf.is_ignored()) {
            tracing::warn!(key, "{} is deprecated and ignored", key);
        }
    }
}
