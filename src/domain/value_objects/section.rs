//! Well-known section names
//!
//! `rose-suite.conf` reserves a handful of section names. The templating
//! section has three spellings, only one of which may be active at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Section exported to the process environment.
pub const ENV_SECTION: &str = "env";

/// Top-level key listing optional config names.
pub const OPTS_KEY: &str = "opts";

/// Aggregate binding holding every template variable.
pub const SUITE_VARIABLES: &str = "ROSE_SUITE_VARIABLES";

/// Section holding template variables for the workflow's templating engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TemplatingSection {
    #[default]
    #[serde(rename = "template variables")]
    TemplateVariables,
    #[serde(rename = "jinja2:suite.rc")]
    Jinja2,
    #[serde(rename = "empy:suite.rc")]
    Empy,
}

impl TemplatingSection {
    pub const ALL: [TemplatingSection; 3] = [
        TemplatingSection::TemplateVariables,
        TemplatingSection::Jinja2,
        TemplatingSection::Empy,
    ];

    pub fn section_name(&self) -> &'static str {
        match self {
            TemplatingSection::TemplateVariables => "template variables",
            TemplatingSection::Jinja2 => "jinja2:suite.rc",
            TemplatingSection::Empy => "empy:suite.rc",
        }
    }

    pub fn from_section_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.section_name() == name)
    }

    /// Engine name reported to callers (`jinja2`, `empy`, `template variables`).
    pub fn engine(&self) -> &'static str {
        match self {
            TemplatingSection::TemplateVariables => "template variables",
            TemplatingSection::Jinja2 => "jinja2",
            TemplatingSection::Empy => "empy",
        }
    }

    /// Engine-specific spellings are kept for back compatibility only.
    pub fn is_deprecated(&self) -> bool {
        !matches!(self, TemplatingSection::TemplateVariables)
    }
}

impl fmt::Display for TemplatingSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}
