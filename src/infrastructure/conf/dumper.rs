//! `rose-suite.conf` writer
//!
//! Output reads back to the same tree through the loader: root keys
//! first, then each section (nested sections as `[a][b]`). Multi-line
//! values continue on lines indented past the `=`; blank lines inside a
//! value keep the indent so they stay part of it.

use crate::domain::entities::{ConfigNode, Leaf};

pub fn dump_conf(node: &ConfigNode) -> String {
    let mut out = String::new();
    for comment in node.comments() {
        out.push('#');
        out.push_str(comment);
        out.push('\n');
    }
    if !node.comments().is_empty() {
        out.push('\n');
    }

    for (key, leaf) in node.leaves() {
        write_leaf(&mut out, key, leaf);
    }

    let mut path = Vec::new();
    for (name, child) in node.sections() {
        path.push(name);
        write_section(&mut out, &mut path, child);
        path.pop();
    }
    out
}

fn write_section<'a>(out: &mut String, path: &mut Vec<&'a str>, node: &'a ConfigNode) {
    if !out.is_empty() {
        out.push('\n');
    }
    for comment in node.comments() {
        out.push('#');
        out.push_str(comment);
        out.push('\n');
    }
    out.push('[');
    out.push_str(node.state().prefix());
    out.push_str(&path.join("]["));
    out.push_str("]\n");

    for (key, leaf) in node.leaves() {
        write_leaf(out, key, leaf);
    }
    for (name, child) in node.sections() {
        path.push(name);
        write_section(out, path, child);
        path.pop();
    }
}

fn write_leaf(out: &mut String, key: &str, leaf: &Leaf) {
    for comment in leaf.comments() {
        out.push('#');
        out.push_str(comment);
        out.push('\n');
    }
    let prefix = leaf.state().prefix();
    out.push_str(prefix);
    out.push_str(key);
    out.push('=');

    let text = leaf.text();
    let indent = " ".repeat(prefix.len() + key.len() + 1);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(&indent);
        }
        out.push_str(line);
    }
    out.push('\n');
}
