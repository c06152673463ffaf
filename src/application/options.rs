//! Command-line override options and their one-shot lifecycle
//!
//! An install runs several stages against the same options. Once the
//! command-line layer has been stored, later stages must not apply it a
//! second time, so the holder hands out empty options after that point.

use crate::error::SuiteConfResult;

/// Overrides supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// `-D [section]KEY=VALUE`
    pub defines: Vec<String>,
    /// `-S KEY=VALUE`
    pub template_defines: Vec<String>,
    /// `-O NAME`
    pub opt_conf_keys: Vec<String>,
    /// Forget options stored by earlier installs.
    pub clear_install_options: bool,
}

static NO_OPTIONS: CliOptions = CliOptions {
    defines: Vec::new(),
    template_defines: Vec::new(),
    opt_conf_keys: Vec::new(),
    clear_install_options: false,
};

impl CliOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    pub fn with_template_define(mut self, define: impl Into<String>) -> Self {
        self.template_defines.push(define.into());
        self
    }

    pub fn with_opt_conf_key(mut self, key: impl Into<String>) -> Self {
        self.opt_conf_keys.push(key.into());
        self
    }

    pub fn with_clear_install_options(mut self, clear: bool) -> Self {
        self.clear_install_options = clear;
        self
    }

    /// No overrides were given.
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty() && self.template_defines.is_empty() && self.opt_conf_keys.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HolderState {
    Pending(CliOptions),
    Consumed,
}

/// Holds command-line options until they have been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionHolder {
    state: HolderState,
}

impl OptionHolder {
    pub fn new(options: CliOptions) -> Self {
        Self {
            state: HolderState::Pending(options),
        }
    }

    pub fn is_consumed(&self) -> bool {
        matches!(self.state, HolderState::Consumed)
    }

    /// Current options; empty once consumed.
    pub fn options(&self) -> &CliOptions {
        match &self.state {
            HolderState::Pending(options) => options,
            HolderState::Consumed => &NO_OPTIONS,
        }
    }

    /// Run `store` with the pending options and mark them consumed if it
    /// succeeds. On failure the options stay pending.
    pub fn consume_with<T, F>(&mut self, store: F) -> SuiteConfResult<T>
    where
        F: FnOnce(&CliOptions) -> SuiteConfResult<T>,
    {
        let value = store(self.options())?;
        if !self.is_consumed() {
            tracing::debug!("command line options consumed");
        }
        self.state = HolderState::Consumed;
        Ok(value)
    }
}
