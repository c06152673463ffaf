//! Error types for suiteconf
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for suiteconf operations
pub type SuiteConfResult<T> = Result<T, SuiteConfError>;

/// Main error type for suiteconf operations
#[derive(Error, Debug)]
pub enum SuiteConfError {
    /// An override string could not be split into section, key and value
    #[error("malformed override '{raw}': {reason}")]
    MalformedOverride { raw: String, reason: String },

    /// One layer names the same key under two different explicit sections
    /// that resolve to the same target
    #[error(
        "conflicting override for '{key}' in {origin}: set under both [{first}] and [{second}]"
    )]
    ConfigConflict {
        origin: String,
        key: String,
        first: String,
        second: String,
    },

    /// An optional config named via `-O` / `ROSE_SUITE_OPT_CONF_KEYS` is not on disk
    #[error("optional config '{name}' not found (expected {path})")]
    UnknownOptionalConfig { name: String, path: PathBuf },

    /// Overrides were supplied for a workflow with no `rose-suite.conf`
    #[error("no rose-suite.conf in {dir} but override options were supplied")]
    MissingBaseConfig { dir: PathBuf },

    /// More than one templating section is active
    #[error("more than one templating section defined: {}", sections.join("; "))]
    MultipleTemplatingEngines { sections: Vec<String> },

    /// A templating value that looks like a literal but does not parse
    #[error(
        "invalid template variable [{section}]{key}={value}: {reason} (note strings \"must be quoted\")"
    )]
    InvalidTemplateVariable {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// `$VAR` reference with nothing to resolve it against
    #[error("[{section}]{key}: {variable}: unbound variable")]
    UnboundVariable {
        section: String,
        key: String,
        variable: String,
    },

    /// The config reader rejected a line
    #[error("syntax error in {}:{line}: {message}", file.display())]
    ConfSyntax {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// Invalid tool settings file
    #[error("invalid settings in {}: {message}", file.display())]
    ToolConfig { file: PathBuf, message: String },

    /// File system port error
    #[error(transparent)]
    Fs(#[from] crate::domain::ports::FsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SuiteConfError {
    pub(crate) fn malformed(raw: &str, reason: impl Into<String>) -> Self {
        Self::MalformedOverride {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_malformed_override() {
        let err = SuiteConfError::malformed("[env", "unterminated section");
        assert_eq!(
            err.to_string(),
            "malformed override '[env': unterminated section"
        );
    }

    #[test]
    fn test_error_display_unknown_optional_config() {
        let err = SuiteConfError::UnknownOptionalConfig {
            name: "foo".to_string(),
            path: PathBuf::from("src/opt/rose-suite-foo.conf"),
        };
        assert_eq!(
            err.to_string(),
            "optional config 'foo' not found (expected src/opt/rose-suite-foo.conf)"
        );
    }

    #[test]
    fn test_error_display_multiple_engines() {
        let err = SuiteConfError::MultipleTemplatingEngines {
            sections: vec!["jinja2:suite.rc".into(), "template variables".into()],
        };
        assert!(err
            .to_string()
            .contains("jinja2:suite.rc; template variables"));
    }

    #[test]
    fn test_error_display_unbound() {
        let err = SuiteConfError::UnboundVariable {
            section: "env".into(),
            key: "X".into(),
            variable: "MYVAR".into(),
        };
        assert_eq!(err.to_string(), "[env]X: MYVAR: unbound variable");
    }
}
