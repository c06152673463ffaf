use super::*;
use crate::domain::entities::SectionTarget;
use crate::domain::value_objects::TemplateValue;

fn sample() -> ConfigNode {
    let mut node = ConfigNode::new();
    node.set(&["opts"], "a b", IgnoreState::Active);
    node.set(&["env", "FOO"], "1", IgnoreState::Active);
    node.set(&["env", "BAR"], "2", IgnoreState::Soft);
    node.set(&["template variables", "X"], "42", IgnoreState::Active);
    node
}

#[test]
fn get_returns_leaf_by_path() {
    let node = sample();
    assert_eq!(node.get(&["env", "FOO"]).unwrap().text(), "1");
    assert_eq!(node.get(&["opts"]).unwrap().text(), "a b");
    assert!(node.get(&["env", "MISSING"]).is_none());
    assert!(node.get(&["nope", "FOO"]).is_none());
    assert!(node.get(&[]).is_none());
}

#[test]
fn set_overwrites_value_and_state_together() {
    let mut node = sample();
    let previous = node
        .set(&["env", "BAR"], "3", IgnoreState::Active)
        .unwrap();
    assert_eq!(previous.state(), IgnoreState::Soft);

    let leaf = node.get(&["env", "BAR"]).unwrap();
    assert_eq!(leaf.text(), "3");
    assert!(!leaf.is_ignored());
}

#[test]
fn set_keeps_insertion_order() {
    let node = sample();
    let keys: Vec<&str> = node.section("env").unwrap().leaves().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["FOO", "BAR"]);
}

#[test]
fn unset_removes_leaf_only() {
    let mut node = sample();
    assert!(node.unset(&["env", "FOO"]).is_some());
    assert!(node.get(&["env", "FOO"]).is_none());
    assert!(node.section("env").is_some());
    assert!(node.unset(&["env", "FOO"]).is_none());
}

#[test]
fn escaped_values_are_tagged() {
    assert!(Leaf::new("\\$HOME").is_escaped());
    assert!(!Leaf::new("$HOME").is_escaped());
    assert!(!Leaf::new(TemplateValue::from("\\$HOME")).is_escaped());
}

#[test]
fn walk_visits_every_leaf_depth_first() {
    let node = sample();
    let paths: Vec<String> = node
        .walk()
        .map(|e| {
            let mut p = e.sections.clone();
            p.push(e.key);
            p.join("/")
        })
        .collect();
    assert_eq!(
        paths,
        vec!["opts", "env/FOO", "env/BAR", "template variables/X"]
    );
}

#[test]
fn walk_is_restartable() {
    let node = sample();
    assert_eq!(node.walk().count(), node.walk().count());
}

#[test]
fn walk_flags_leaves_under_ignored_sections() {
    let mut node = sample();
    node.section_mut("env").unwrap().set_state(IgnoreState::Soft);

    let active: Vec<&str> = node.walk().filter(|e| e.is_active()).map(|e| e.key).collect();
    assert_eq!(active, vec!["opts", "X"]);
}

#[test]
fn merge_section_overwrites_leaves_and_keeps_the_rest() {
    let mut node = sample();
    let mut other = ConfigNode::new();
    other.set(&["FOO"], "overridden", IgnoreState::Active);
    other.set(&["NEW"], "value", IgnoreState::Active);

    node.merge_section(&["env"], &other);

    let env = node.section("env").unwrap();
    assert_eq!(env.leaf("FOO").unwrap().text(), "overridden");
    assert_eq!(env.leaf("BAR").unwrap().text(), "2");
    assert_eq!(env.leaf("NEW").unwrap().text(), "value");
}

#[test]
fn merge_into_missing_section_creates_it() {
    let mut node = ConfigNode::new();
    let mut other = ConfigNode::new();
    other.set(&["inner", "K"], "v", IgnoreState::Active);

    node.merge_section(&["outer"], &other);

    assert_eq!(node.get(&["outer", "inner", "K"]).unwrap().text(), "v");
}

#[test]
fn apply_assignment_resolves_templating_target() {
    let mut node = ConfigNode::new();
    let assignment = Assignment::set(SectionTarget::Templating, "X", "1", IgnoreState::Active);

    node.apply_assignment(&assignment, TemplatingSection::Jinja2, &LayerOrigin::Cli);

    let leaf = node.get(&["jinja2:suite.rc", "X"]).unwrap();
    assert_eq!(leaf.text(), "1");
    assert_eq!(leaf.provenance(), Some(&LayerOrigin::Cli));
}

#[test]
fn apply_delete_removes_leaf() {
    let mut node = sample();
    let assignment = Assignment::delete(SectionTarget::section("env"), "FOO");

    let removed = node.apply_assignment(
        &assignment,
        TemplatingSection::TemplateVariables,
        &LayerOrigin::Cli,
    );

    assert_eq!(removed.unwrap().text(), "1");
    assert!(node.get(&["env", "FOO"]).is_none());
}

#[test]
fn apply_section_state_creates_section() {
    let mut node = ConfigNode::new();
    let assignment = Assignment::section_state(SectionTarget::section("env"), IgnoreState::Hard);

    node.apply_assignment(
        &assignment,
        TemplatingSection::TemplateVariables,
        &LayerOrigin::Base,
    );

    assert_eq!(node.section("env").unwrap().state(), IgnoreState::Hard);
}
