//! Config node entity
//!
//! A recursive key/value tree mirroring `rose-suite.conf`: the root holds
//! top-level keys and named sections, each section holds its own keys.
//! Keys are unique per section and keep insertion order.

use std::borrow::Cow;

use crate::domain::entities::{Assignment, AssignmentValue, LayerOrigin, LeafValue};
use crate::domain::value_objects::{IgnoreState, TemplatingSection};

/// A single `key=value` entry.
///
/// Value, ignore state, comments and provenance are replaced together on
/// every write.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    value: LeafValue,
    state: IgnoreState,
    escaped: bool,
    comments: Vec<String>,
    provenance: Option<LayerOrigin>,
}

impl Leaf {
    pub fn new(value: impl Into<LeafValue>) -> Self {
        let value = value.into();
        let escaped = matches!(&value, LeafValue::Raw(raw) if raw.contains("\\$"));
        Self {
            value,
            state: IgnoreState::Active,
            escaped,
            comments: Vec::new(),
            provenance: None,
        }
    }

    pub fn with_state(mut self, state: IgnoreState) -> Self {
        self.state = state;
        self
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_provenance(mut self, origin: LayerOrigin) -> Self {
        self.provenance = Some(origin);
        self
    }

    pub fn value(&self) -> &LeafValue {
        &self.value
    }

    pub fn text(&self) -> Cow<'_, str> {
        self.value.text()
    }

    pub fn state(&self) -> IgnoreState {
        self.state
    }

    pub fn is_ignored(&self) -> bool {
        self.state.is_ignored()
    }

    /// Value contains `\$` and must not be variable-expanded.
    pub fn is_escaped(&self) -> bool {
        self.escaped
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn provenance(&self) -> Option<&LayerOrigin> {
        self.provenance.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    state: IgnoreState,
    comments: Vec<String>,
    leaves: Vec<(String, Leaf)>,
    sections: Vec<(String, ConfigNode)>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> IgnoreState {
        self.state
    }

    pub fn set_state(&mut self, state: IgnoreState) {
        self.state = state;
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn set_comments(&mut self, comments: Vec<String>) {
        self.comments = comments;
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.sections.is_empty()
    }

    pub fn leaves(&self) -> impl Iterator<Item = (&str, &Leaf)> {
        self.leaves.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn leaf(&self, key: &str) -> Option<&Leaf> {
        self.leaves.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn section(&self, name: &str) -> Option<&ConfigNode> {
        self.sections.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut ConfigNode> {
        self.sections
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Section at `path`, where every element names a nested section.
    pub fn node_at(&self, path: &[&str]) -> Option<&ConfigNode> {
        path.iter()
            .try_fold(self, |node, name| node.section(name))
    }

    /// Section at `path`, creating missing sections on the way.
    pub fn ensure_section(&mut self, path: &[&str]) -> &mut ConfigNode {
        let mut node = self;
        for name in path {
            let idx = match node.sections.iter().position(|(k, _)| k == name) {
                Some(idx) => idx,
                None => {
                    node.sections.push((name.to_string(), ConfigNode::new()));
                    node.sections.len() - 1
                }
            };
            node = &mut node.sections[idx].1;
        }
        node
    }

    /// Leaf at `path`; the last element is the key, the rest are sections.
    pub fn get(&self, path: &[&str]) -> Option<&Leaf> {
        let (key, sections) = path.split_last()?;
        self.node_at(sections)?.leaf(key)
    }

    /// Set a raw value at `path`.
    pub fn set(
        &mut self,
        path: &[&str],
        value: impl Into<LeafValue>,
        state: IgnoreState,
    ) -> Option<Leaf> {
        self.set_leaf(path, Leaf::new(value).with_state(state))
    }

    /// Write `leaf` at `path`, returning the leaf it replaced.
    pub fn set_leaf(&mut self, path: &[&str], leaf: Leaf) -> Option<Leaf> {
        let (key, sections) = path.split_last()?;
        let node = self.ensure_section(sections);
        match node.leaves.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, leaf)),
            None => {
                node.leaves.push((key.to_string(), leaf));
                None
            }
        }
    }

    /// Remove the leaf at `path`. Sections are left in place.
    pub fn unset(&mut self, path: &[&str]) -> Option<Leaf> {
        let (key, sections) = path.split_last()?;
        let mut node = self;
        for name in sections {
            node = node.section_mut(name)?;
        }
        let idx = node.leaves.iter().position(|(k, _)| k == key)?;
        Some(node.leaves.remove(idx).1)
    }

    /// Depth-first walk over every leaf, section leaves after their parent's.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![Frame {
                path: Vec::new(),
                node: self,
                ignored: false,
                leaf_idx: 0,
                section_idx: 0,
            }],
        }
    }

    /// Deep-merge `other` into the section at `path`; leaves in `other` win.
    pub fn merge_section(&mut self, path: &[&str], other: &ConfigNode) {
        let target = self.ensure_section(path);
        if !path.is_empty() {
            target.state = other.state;
        }
        for (key, leaf) in &other.leaves {
            target.set_leaf(&[key.as_str()], leaf.clone());
        }
        for (name, child) in &other.sections {
            target.merge_section(&[name.as_str()], child);
        }
    }

    pub fn merge(&mut self, other: &ConfigNode) {
        self.merge_section(&[], other);
    }

    /// Apply one layer assignment, returning the leaf it replaced or removed.
    pub fn apply_assignment(
        &mut self,
        assignment: &Assignment,
        templating: TemplatingSection,
        origin: &LayerOrigin,
    ) -> Option<Leaf> {
        let mut path = assignment.target.resolve(templating);
        match &assignment.value {
            AssignmentValue::Set { value, state } => {
                path.push(assignment.key.as_str());
                let leaf = Leaf::new(value.clone())
                    .with_state(*state)
                    .with_comments(assignment.comments.clone())
                    .with_provenance(origin.clone());
                self.set_leaf(&path, leaf)
            }
            AssignmentValue::Delete => {
                path.push(assignment.key.as_str());
                self.unset(&path)
            }
            AssignmentValue::SectionState(state) => {
                if !path.is_empty() {
                    self.ensure_section(&path).state = *state;
                }
                None
            }
        }
    }
}

/// One leaf yielded by [`ConfigNode::walk`].
#[derive(Debug, Clone, PartialEq)]
pub struct WalkEntry<'a> {
    pub sections: Vec<&'a str>,
    pub key: &'a str,
    pub leaf: &'a Leaf,
    /// Some enclosing section is ignored.
    pub section_ignored: bool,
}

impl WalkEntry<'_> {
    /// Leaf takes part in output: neither it nor any enclosing section is ignored.
    pub fn is_active(&self) -> bool {
        !self.section_ignored && !self.leaf.is_ignored()
    }
}

struct Frame<'a> {
    path: Vec<&'a str>,
    node: &'a ConfigNode,
    ignored: bool,
    leaf_idx: usize,
    section_idx: usize,
}

pub struct Walk<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node: &'a ConfigNode = frame.node;

            if let Some((key, leaf)) = node.leaves.get(frame.leaf_idx) {
                frame.leaf_idx += 1;
                return Some(WalkEntry {
                    sections: frame.path.clone(),
                    key: key.as_str(),
                    leaf,
                    section_ignored: frame.ignored,
                });
            }

            if let Some((name, child)) = node.sections.get(frame.section_idx) {
                frame.section_idx += 1;
                let mut path = frame.path.clone();
                path.push(name.as_str());
                let ignored = frame.ignored || child.state.is_ignored();
                self.stack.push(Frame {
                    path,
                    node: child,
                    ignored,
                    leaf_idx: 0,
                    section_idx: 0,
                });
                continue;
            }

            self.stack.pop();
        }
    }
}

#[cfg(test)]
mod tests;
