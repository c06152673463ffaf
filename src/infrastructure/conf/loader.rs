//! `rose-suite.conf` reader
//!
//! Line syntax:
//! - `# text` - comment, attached to the next key or section
//! - `[name]`, `[!name]`, `[!!name]` - section header; `[a][b]` nests
//! - `key=value`, `!key=value`, `!!key=value` - leaf
//! - a line indented deeper than its key continues the value, even when
//!   it is blank or starts with `#`
//!
//! Comments at the top of the file followed by a blank line belong to the
//! file itself.

use std::path::Path;

use crate::domain::entities::{ConfigNode, Leaf};
use crate::domain::ports::FileSystem;
use crate::domain::value_objects::IgnoreState;
use crate::error::{SuiteConfError, SuiteConfResult};

/// Read and parse a config file.
pub fn load_conf<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> SuiteConfResult<ConfigNode> {
    let text = fs.read(path)?;
    parse_conf(&text, path)
}

/// Parse config text. `source` is only used in error messages.
pub fn parse_conf(text: &str, source: &Path) -> SuiteConfResult<ConfigNode> {
    let mut root = ConfigNode::new();
    let mut section: Vec<String> = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    // (key, indentation of the key line) of the leaf that may be continued
    let mut open: Option<(String, usize)> = None;
    let mut seen_item = false;

    let syntax = |line: usize, message: &str| SuiteConfError::ConfSyntax {
        file: source.to_path_buf(),
        line,
        message: message.to_string(),
    };

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let indent = raw_line.len() - raw_line.trim_start().len();
        let line = raw_line.trim();

        if let Some((key, key_indent)) = &open {
            if indent > *key_indent {
                let path = leaf_path(&section, key);
                let path: Vec<&str> = path.iter().map(String::as_str).collect();
                if let Some(leaf) = root.get(&path).cloned() {
                    let joined = format!("{}\n{}", leaf.text(), line);
                    let continued = Leaf::new(joined)
                        .with_state(leaf.state())
                        .with_comments(leaf.comments().to_vec());
                    root.set_leaf(&path, continued);
                }
                continue;
            }
        }

        if line.is_empty() {
            open = None;
            if !seen_item && !pending.is_empty() {
                let mut comments = root.comments().to_vec();
                comments.append(&mut pending);
                root.set_comments(comments);
            }
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            open = None;
            pending.push(comment.to_string());
            continue;
        }

        open = None;
        seen_item = true;

        if line.starts_with('[') {
            let inner = line
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
                .ok_or_else(|| syntax(line_no, "section header must end with ']'"))?;
            let (state, names) = IgnoreState::split_prefix(inner.trim());
            let names: Vec<String> = names
                .split("][")
                .map(|n| n.trim().to_string())
                .collect();
            if names.iter().any(String::is_empty) {
                section = Vec::new();
                if names.len() == 1 {
                    // `[]` returns to the top level
                    continue;
                }
                return Err(syntax(line_no, "empty section name"));
            }
            let path: Vec<&str> = names.iter().map(String::as_str).collect();
            let node = root.ensure_section(&path);
            node.set_state(state);
            if !pending.is_empty() {
                node.set_comments(std::mem::take(&mut pending));
            }
            section = names;
            continue;
        }

        let (key_part, value) = line
            .split_once('=')
            .ok_or_else(|| syntax(line_no, "expected 'key=value', '[section]' or '#comment'"))?;
        let (state, key) = IgnoreState::split_prefix(key_part.trim());
        let key = key.trim();
        if key.is_empty() {
            return Err(syntax(line_no, "missing key"));
        }

        let path = leaf_path(&section, key);
        let path: Vec<&str> = path.iter().map(String::as_str).collect();
        let leaf = Leaf::new(value.trim())
            .with_state(state)
            .with_comments(std::mem::take(&mut pending));
        root.set_leaf(&path, leaf);
        open = Some((key.to_string(), indent));
    }

    Ok(root)
}

fn leaf_path(section: &[String], key: &str) -> Vec<String> {
    let mut path = section.to_vec();
    path.push(key.to_string());
    path
}
