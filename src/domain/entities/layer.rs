//! Override layer entity
//!
//! A layer is an ordered list of assignments from a single origin
//! (environment, previous install, optional config, command line).
//! Layers are immutable once built; transformations return new layers.

use std::borrow::Cow;
use std::fmt;

use crate::domain::entities::ConfigNode;
use crate::domain::value_objects::{IgnoreState, TemplateValue, TemplatingSection};

/// Where a layer came from. Variant order is precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerOrigin {
    Base,
    Environment,
    Persisted,
    OptionalConfig(String),
    Cli,
}

impl LayerOrigin {
    /// Lower values are applied first and lose conflicts.
    pub fn precedence(&self) -> u8 {
        match self {
            LayerOrigin::Base => 0,
            LayerOrigin::Environment => 1,
            LayerOrigin::Persisted => 2,
            LayerOrigin::OptionalConfig(_) => 3,
            LayerOrigin::Cli => 4,
        }
    }
}

impl fmt::Display for LayerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerOrigin::Base => f.write_str("rose-suite.conf"),
            LayerOrigin::Environment => f.write_str("environment"),
            LayerOrigin::Persisted => f.write_str("previous install"),
            LayerOrigin::OptionalConfig(name) => write!(f, "optional config '{}'", name),
            LayerOrigin::Cli => f.write_str("command line"),
        }
    }
}

/// Leaf value: raw text still to be evaluated, or an already typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafValue {
    Raw(String),
    Typed(TemplateValue),
}

impl LeafValue {
    /// Text form, as it would be written to a config file.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            LeafValue::Raw(s) => Cow::Borrowed(s),
            LeafValue::Typed(v) => Cow::Owned(v.to_string()),
        }
    }
}

impl From<&str> for LeafValue {
    fn from(value: &str) -> Self {
        LeafValue::Raw(value.to_string())
    }
}

impl From<String> for LeafValue {
    fn from(value: String) -> Self {
        LeafValue::Raw(value)
    }
}

impl From<TemplateValue> for LeafValue {
    fn from(value: TemplateValue) -> Self {
        LeafValue::Typed(value)
    }
}

/// Section an assignment writes into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionTarget {
    Root,
    Path(Vec<String>),
    /// Whichever templating section is active when the layer is applied.
    Templating,
}

impl SectionTarget {
    pub fn section(name: impl Into<String>) -> Self {
        SectionTarget::Path(vec![name.into()])
    }

    /// Explicitly named templating section, if this target is one.
    pub fn explicit_templating(&self) -> Option<TemplatingSection> {
        match self {
            SectionTarget::Path(path) if path.len() == 1 => {
                TemplatingSection::from_section_name(&path[0])
            }
            _ => None,
        }
    }

    pub(crate) fn resolve(&self, templating: TemplatingSection) -> Vec<&str> {
        match self {
            SectionTarget::Root => Vec::new(),
            SectionTarget::Path(path) => path.iter().map(String::as_str).collect(),
            SectionTarget::Templating => vec![templating.section_name()],
        }
    }
}

impl fmt::Display for SectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionTarget::Root => Ok(()),
            SectionTarget::Path(path) => f.write_str(&path.join("][")),
            SectionTarget::Templating => f.write_str("<templating>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentValue {
    Set { value: LeafValue, state: IgnoreState },
    /// Remove the key rather than setting it empty.
    Delete,
    /// Set the ignore state of the target section itself.
    SectionState(IgnoreState),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: SectionTarget,
    pub key: String,
    pub value: AssignmentValue,
    pub comments: Vec<String>,
}

impl Assignment {
    pub fn set(
        target: SectionTarget,
        key: impl Into<String>,
        value: impl Into<LeafValue>,
        state: IgnoreState,
    ) -> Self {
        Self {
            target,
            key: key.into(),
            value: AssignmentValue::Set {
                value: value.into(),
                state,
            },
            comments: Vec::new(),
        }
    }

    pub fn delete(target: SectionTarget, key: impl Into<String>) -> Self {
        Self {
            target,
            key: key.into(),
            value: AssignmentValue::Delete,
            comments: Vec::new(),
        }
    }

    pub fn section_state(target: SectionTarget, state: IgnoreState) -> Self {
        Self {
            target,
            key: String::new(),
            value: AssignmentValue::SectionState(state),
            comments: Vec::new(),
        }
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverrideLayer {
    origin: LayerOrigin,
    assignments: Vec<Assignment>,
}

impl OverrideLayer {
    pub fn new(origin: LayerOrigin, assignments: Vec<Assignment>) -> Self {
        Self {
            origin,
            assignments,
        }
    }

    pub fn empty(origin: LayerOrigin) -> Self {
        Self::new(origin, Vec::new())
    }

    /// Flatten a parsed config file into a layer, keeping comments and any
    /// ignored section states. Active sections carry no state assignment, so
    /// a layer never switches an ignored section back on just by naming it.
    pub fn from_node(origin: LayerOrigin, node: &ConfigNode) -> Self {
        let mut assignments = Vec::new();
        collect_assignments(node, &mut Vec::new(), &mut assignments);
        Self::new(origin, assignments)
    }

    pub fn origin(&self) -> &LayerOrigin {
        &self.origin
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Keep only assignments matching `keep`.
    pub fn filtered(&self, keep: impl Fn(&Assignment) -> bool) -> Self {
        Self::new(
            self.origin.clone(),
            self.assignments.iter().filter(|a| keep(a)).cloned().collect(),
        )
    }

    /// Pin `SectionTarget::Templating` assignments to a concrete section.
    pub fn resolve_templating(&self, templating: TemplatingSection) -> Self {
        let assignments = self
            .assignments
            .iter()
            .map(|a| match a.target {
                SectionTarget::Templating => Assignment {
                    target: SectionTarget::section(templating.section_name()),
                    ..a.clone()
                },
                _ => a.clone(),
            })
            .collect();
        Self::new(self.origin.clone(), assignments)
    }

    /// This layer's assignments followed by `newer`'s, under this layer's origin.
    pub fn followed_by(&self, newer: &OverrideLayer) -> Self {
        let mut assignments = self.assignments.clone();
        assignments.extend(newer.assignments.iter().cloned());
        Self::new(self.origin.clone(), assignments)
    }

    /// Materialise the layer as a config tree (later assignments win).
    pub fn to_node(&self, templating: TemplatingSection) -> ConfigNode {
        let mut node = ConfigNode::new();
        for assignment in &self.assignments {
            node.apply_assignment(assignment, templating, &self.origin);
        }
        node
    }
}

fn collect_assignments(node: &ConfigNode, path: &mut Vec<String>, out: &mut Vec<Assignment>) {
    let target = if path.is_empty() {
        SectionTarget::Root
    } else {
        SectionTarget::Path(path.clone())
    };

    if !path.is_empty() && node.state() != IgnoreState::Active {
        out.push(Assignment::section_state(target.clone(), node.state()));
    }

    for (key, leaf) in node.leaves() {
        out.push(
            Assignment::set(target.clone(), key, leaf.value().clone(), leaf.state())
                .with_comments(leaf.comments().to_vec()),
        );
    }

    for (name, child) in node.sections() {
        path.push(name.to_string());
        collect_assignments(child, path, out);
        path.pop();
    }
}
