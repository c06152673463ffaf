//! Layered merge engine
//!
//! Applies override layers onto a base tree in precedence order:
//! - base `rose-suite.conf`
//! - environment values for keys declared in `[env]`
//! - the layer persisted by a previous install
//! - optional configs, in opts order
//! - the command line
//!
//! Later layers win. Conflicts only exist inside a single layer.

use std::collections::HashMap;

use crate::domain::entities::{
    Assignment, AssignmentValue, ConfigNode, LayerOrigin, OverrideLayer, SectionTarget,
};
use crate::domain::value_objects::{TemplatingSection, ENV_SECTION};
use crate::error::{SuiteConfError, SuiteConfResult};

/// Base tree plus layers, kept sorted by precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeSpec {
    base: ConfigNode,
    layers: Vec<OverrideLayer>,
}

impl MergeSpec {
    pub fn new(base: ConfigNode) -> Self {
        Self {
            base,
            layers: Vec::new(),
        }
    }

    /// Insert `layer` after every layer of equal or lower precedence.
    pub fn push(&mut self, layer: OverrideLayer) {
        let precedence = layer.origin().precedence();
        let idx = self
            .layers
            .iter()
            .position(|l| l.origin().precedence() > precedence)
            .unwrap_or(self.layers.len());
        self.layers.insert(idx, layer);
    }

    pub fn with_layer(mut self, layer: OverrideLayer) -> Self {
        self.push(layer);
        self
    }

    pub fn base(&self) -> &ConfigNode {
        &self.base
    }

    pub fn layers(&self) -> &[OverrideLayer] {
        &self.layers
    }
}

/// A leaf written by one layer and replaced by a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideInfo {
    pub path: String,
    pub from_layer: String,
    pub by_layer: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeResult {
    pub tree: ConfigNode,
    pub templating: TemplatingSection,
    pub overrides: Vec<OverrideInfo>,
}

/// Merge every layer of `spec` onto its base tree.
///
/// All layers are validated before anything is applied, so a failure
/// leaves no partial result.
pub fn merge(spec: &MergeSpec) -> SuiteConfResult<MergeResult> {
    for layer in &spec.layers {
        check_conflicts(layer)?;
    }
    let templating = active_templating(spec)?;

    let mut tree = spec.base.clone();
    let mut overrides = Vec::new();

    for layer in &spec.layers {
        tracing::debug!(
            origin = %layer.origin(),
            assignments = layer.len(),
            "applying layer"
        );
        for assignment in layer.assignments() {
            let replaced = tree.apply_assignment(assignment, templating, layer.origin());
            let Some(previous) = replaced else {
                continue;
            };
            let from = previous.provenance().unwrap_or(&LayerOrigin::Base);
            if from != layer.origin() {
                overrides.push(OverrideInfo {
                    path: describe_path(&assignment.target, templating, &assignment.key),
                    from_layer: from.to_string(),
                    by_layer: layer.origin().to_string(),
                });
            }
        }
    }

    Ok(MergeResult {
        tree,
        templating,
        overrides,
    })
}

/// The templating section present in `tree`, if any.
pub fn detect_templating(tree: &ConfigNode) -> SuiteConfResult<Option<TemplatingSection>> {
    let found: Vec<TemplatingSection> = tree
        .sections()
        .filter_map(|(name, _)| TemplatingSection::from_section_name(name))
        .collect();
    single_templating(found)
}

/// Layer of process environment values for the keys declared in the base `[env]`.
pub fn environment_layer<F>(base: &ConfigNode, lookup: F) -> OverrideLayer
where
    F: Fn(&str) -> Option<String>,
{
    let assignments = base
        .section(ENV_SECTION)
        .into_iter()
        .flat_map(|env| env.leaves())
        .filter_map(|(key, leaf)| {
            lookup(key).map(|value| {
                Assignment::set(
                    SectionTarget::section(ENV_SECTION),
                    key,
                    value,
                    leaf.state(),
                )
            })
        })
        .collect();
    OverrideLayer::new(LayerOrigin::Environment, assignments)
}

fn active_templating(spec: &MergeSpec) -> SuiteConfResult<TemplatingSection> {
    let mut found: Vec<TemplatingSection> = spec
        .base
        .sections()
        .filter_map(|(name, _)| TemplatingSection::from_section_name(name))
        .collect();
    for layer in &spec.layers {
        for assignment in layer.assignments() {
            if let SectionTarget::Path(path) = &assignment.target {
                if let Some(section) = path
                    .first()
                    .and_then(|name| TemplatingSection::from_section_name(name))
                {
                    if !found.contains(&section) {
                        found.push(section);
                    }
                }
            }
        }
    }
    Ok(single_templating(found)?.unwrap_or_default())
}

fn single_templating(
    mut found: Vec<TemplatingSection>,
) -> SuiteConfResult<Option<TemplatingSection>> {
    found.dedup();
    match found.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        many => Err(SuiteConfError::MultipleTemplatingEngines {
            sections: many.iter().map(|s| s.section_name().to_string()).collect(),
        }),
    }
}

fn check_conflicts(layer: &OverrideLayer) -> SuiteConfResult<()> {
    let mut seen: HashMap<&str, TemplatingSection> = HashMap::new();
    for assignment in layer.assignments() {
        if !matches!(assignment.value, AssignmentValue::Set { .. }) {
            continue;
        }
        let Some(section) = assignment.target.explicit_templating() else {
            continue;
        };
        match seen.get(assignment.key.as_str()) {
            Some(first) if *first != section => {
                return Err(SuiteConfError::ConfigConflict {
                    origin: layer.origin().to_string(),
                    key: assignment.key.clone(),
                    first: first.section_name().to_string(),
                    second: section.section_name().to_string(),
                });
            }
            Some(_) => {}
            None => {
                seen.insert(assignment.key.as_str(), section);
            }
        }
    }
    Ok(())
}

fn describe_path(target: &SectionTarget, templating: TemplatingSection, key: &str) -> String {
    let sections = target.resolve(templating);
    if sections.is_empty() {
        key.to_string()
    } else {
        format!("[{}]{}", sections.join("]["), key)
    }
}
