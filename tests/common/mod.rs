//! Common test utilities for suiteconf CLI tests.
//!
//! - `TestEnv`: isolated workflow source, run directory and config home
//! - Fixtures: reusable `rose-suite.conf` content

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A base config with the same key in `[env]` and the templating section.
pub const BASE_CONF: &str = "\
[env]
LOCAL_ENV=base
[template variables]
LOCAL_ENV=\"base\"
";

/// Result of running the suiteconf binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Lines of stdout starting with `prefix`
    pub fn stdout_lines_starting_with(&self, prefix: &str) -> Vec<&str> {
        self.stdout
            .lines()
            .filter(|line| line.starts_with(prefix))
            .collect()
    }
}

/// Isolated test environment.
pub struct TestEnv {
    /// Workflow source directory
    pub source: TempDir,
    /// Installed run directory
    pub run: TempDir,
    /// `XDG_CONFIG_HOME` for the tool settings
    pub config_home: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            source: TempDir::new().expect("Failed to create source temp dir"),
            run: TempDir::new().expect("Failed to create run temp dir"),
            config_home: TempDir::new().expect("Failed to create config temp dir"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_suiteconf")),
        }
    }

    /// Environment with `rose-suite.conf` already written
    pub fn with_base(content: &str) -> Self {
        let env = Self::new();
        env.write_source_file("rose-suite.conf", content);
        env
    }

    pub fn source_path(&self, relative: &str) -> PathBuf {
        self.source.path().join(relative)
    }

    pub fn run_path(&self, relative: &str) -> PathBuf {
        self.run.path().join(relative)
    }

    pub fn write_source_file(&self, relative: &str, content: &str) {
        write_file(&self.source_path(relative), content);
    }

    pub fn write_settings(&self, toml: &str) {
        write_file(
            &self.config_home.path().join("suiteconf").join("config.toml"),
            toml,
        );
    }

    /// Contents of the layer recorded in the run directory
    pub fn stored_layer(&self) -> String {
        std::fs::read_to_string(self.run_path("opt/rose-suite-cylc-install.conf"))
            .expect("Failed to read stored layer")
    }

    /// Run a subcommand against the source directory
    pub fn run_cmd(&self, command: &str, args: &[&str]) -> TestResult {
        self.run_cmd_with_env(command, args, &[])
    }

    pub fn run_cmd_with_env(
        &self,
        command: &str,
        args: &[&str],
        env_vars: &[(&str, &str)],
    ) -> TestResult {
        let mut cmd = Command::new(&self.bin);
        cmd.arg(command)
            .arg(self.source.path())
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env_remove("RUST_LOG")
            .env_remove("ROSE_SUITE_OPT_CONF_KEYS")
            .env_remove("CYLC_VERSION")
            .env_remove("SUITECONF_SITE")
            .env_remove("SUITECONF_LOG_LEVEL")
            .env_remove("SUITECONF_LOG_DUMP");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute suiteconf");
        output_to_result(output)
    }

    /// Install into the run directory
    pub fn install(&self, args: &[&str]) -> TestResult {
        let run_dir = self.run.path().to_string_lossy().to_string();
        let mut all = vec![run_dir.as_str()];
        all.extend_from_slice(args);
        self.run_cmd("install", &all)
    }

    /// `--run-dir` pointing at the run directory
    pub fn run_dir_arg(&self) -> String {
        self.run.path().to_string_lossy().to_string()
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}
