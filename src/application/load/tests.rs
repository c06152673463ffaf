use super::*;
use crate::infrastructure::fs::MemoryFs;
use crate::infrastructure::repositories::FileLayerStore;

const BASE: &str = "\
opts=base
[env]
LOCAL_ENV=base
[template variables]
X=1
";

fn fs() -> MemoryFs {
    MemoryFs::new()
        .with_file("/src/rose-suite.conf", BASE)
        .with_file("/src/opt/rose-suite-base.conf", "[env]\nFROM_BASE_OPT=1\n")
        .with_file(
            "/src/opt/rose-suite-foo.conf",
            "[template variables]\nBAR=\"ab\"\nX=2\n",
        )
        .with_file("/src/opt/rose-suite-bar.conf", "[template variables]\nX=3\n")
}

fn load(fs: &MemoryFs, request: &LoadOptions, cli: &CliOptions) -> SuiteConfResult<LoadedConfig> {
    LoadUseCase::new(FileLayerStore::with_fs(fs), fs).execute(request, cli)
}

fn text(config: &LoadedConfig, path: &[&str]) -> Option<String> {
    config.tree.get(path).map(|l| l.text().into_owned())
}

#[test]
fn base_only() {
    let fs = fs();
    let config = load(&fs, &LoadOptions::new("/src"), &CliOptions::new()).unwrap();
    assert!(config.has_base);
    assert_eq!(config.opt_conf_keys, vec!["base"]);
    assert_eq!(text(&config, &["env", "FROM_BASE_OPT"]).as_deref(), Some("1"));
    assert_eq!(text(&config, &["template variables", "BAR"]), None);
}

#[test]
fn cli_optional_config_is_merged() {
    let fs = fs();
    let cli = CliOptions::new().with_opt_conf_key("foo");
    let config = load(&fs, &LoadOptions::new("/src"), &cli).unwrap();
    assert_eq!(config.opt_conf_keys, vec!["base", "foo"]);
    assert_eq!(
        text(&config, &["template variables", "BAR"]).as_deref(),
        Some("\"ab\"")
    );
    assert_eq!(text(&config, &["opts"]).as_deref(), Some("base foo"));
}

#[test]
fn later_opt_names_win() {
    let fs = fs();
    let cli = CliOptions::new().with_opt_conf_key("bar").with_opt_conf_key("foo");
    let config = load(&fs, &LoadOptions::new("/src"), &cli).unwrap();
    assert_eq!(text(&config, &["template variables", "X"]).as_deref(), Some("2"));

    let cli = CliOptions::new().with_opt_conf_key("foo bar foo");
    let config = load(&fs, &LoadOptions::new("/src"), &cli).unwrap();
    assert_eq!(config.opt_conf_keys, vec!["base", "bar", "foo"]);
}

#[test]
fn env_var_keys_come_before_cli_keys() {
    let fs = fs();
    let request = LoadOptions::new("/src").with_environ(HashMap::from([(
        OPT_CONF_KEYS_VAR.to_string(),
        "foo".to_string(),
    )]));
    let cli = CliOptions::new().with_opt_conf_key("bar");
    let config = load(&fs, &request, &cli).unwrap();
    assert_eq!(config.opt_conf_keys, vec!["base", "foo", "bar"]);
    assert_eq!(text(&config, &["template variables", "X"]).as_deref(), Some("3"));
}

#[test]
fn unknown_optional_config_fails() {
    let fs = fs();
    let cli = CliOptions::new().with_opt_conf_key("nope");
    let err = load(&fs, &LoadOptions::new("/src"), &cli).unwrap_err();
    assert!(matches!(err, SuiteConfError::UnknownOptionalConfig { .. }));

    let cli = CliOptions::new().with_opt_conf_key("(nope)");
    assert!(load(&fs, &LoadOptions::new("/src"), &cli).is_ok());
}

#[test]
fn cli_defines_win_over_everything() {
    let fs = fs();
    let cli = CliOptions::new()
        .with_opt_conf_key("foo")
        .with_define("[env]LOCAL_ENV=cli")
        .with_template_define("X=9");
    let config = load(&fs, &LoadOptions::new("/src"), &cli).unwrap();
    assert_eq!(text(&config, &["env", "LOCAL_ENV"]).as_deref(), Some("cli"));
    assert_eq!(text(&config, &["template variables", "X"]).as_deref(), Some("9"));
    assert_eq!(
        config.cli_layer.assignments()[1].target,
        SectionTarget::section("template variables")
    );
}

#[test]
fn environment_overrides_declared_env_keys() {
    let fs = fs();
    let request = LoadOptions::new("/src").with_environ(HashMap::from([(
        "LOCAL_ENV".to_string(),
        "from-process".to_string(),
    )]));
    let config = load(&fs, &request, &CliOptions::new()).unwrap();
    assert_eq!(
        text(&config, &["env", "LOCAL_ENV"]).as_deref(),
        Some("from-process")
    );
}

#[test]
fn opts_define_adds_names() {
    let fs = fs();
    let cli = CliOptions::new().with_define("[]opts=foo");
    let config = load(&fs, &LoadOptions::new("/src"), &cli).unwrap();
    assert_eq!(config.opt_conf_keys, vec!["base", "foo"]);
}

#[test]
fn previous_layer_applies_below_cli() {
    let fs = fs().with_file(
        "/run/opt/rose-suite-cylc-install.conf",
        "# This file records CLI Options.\n\n!opts=foo\n\n[env]\nLOCAL_ENV=persisted\nKEPT=1\n",
    );
    let request = LoadOptions::new("/src").with_run_dir("/run");

    let config = load(&fs, &request, &CliOptions::new()).unwrap();
    assert_eq!(config.opt_conf_keys, vec!["base", "foo"]);
    assert_eq!(
        text(&config, &["env", "LOCAL_ENV"]).as_deref(),
        Some("persisted")
    );

    let cli = CliOptions::new().with_define("[env]LOCAL_ENV=cli");
    let config = load(&fs, &request, &cli).unwrap();
    assert_eq!(text(&config, &["env", "LOCAL_ENV"]).as_deref(), Some("cli"));
    assert_eq!(text(&config, &["env", "KEPT"]).as_deref(), Some("1"));

    let cli = CliOptions::new().with_clear_install_options(true);
    let config = load(&fs, &request, &cli).unwrap();
    assert!(config.previous_layer.is_empty());
    assert_eq!(text(&config, &["env", "LOCAL_ENV"]).as_deref(), Some("base"));
}

#[test]
fn missing_base_with_overrides_is_error() {
    let fs = MemoryFs::new();
    let cli = CliOptions::new().with_template_define("X=1");
    let err = load(&fs, &LoadOptions::new("/src"), &cli).unwrap_err();
    assert!(matches!(err, SuiteConfError::MissingBaseConfig { .. }));

    let config = load(&fs, &LoadOptions::new("/src"), &CliOptions::new()).unwrap();
    assert!(!config.has_base);
    assert!(config.tree.is_empty());
}

#[test]
fn malformed_define_aborts() {
    let fs = fs();
    let cli = CliOptions::new().with_define("[env");
    let err = load(&fs, &LoadOptions::new("/src"), &cli).unwrap_err();
    assert!(matches!(err, SuiteConfError::MalformedOverride { .. }));
}

#[test]
fn layer_opts_reads_root_assignments() {
    let layer = OverrideLayer::new(
        LayerOrigin::Persisted,
        vec![crate::domain::entities::Assignment::set(
            SectionTarget::Root,
            OPTS_KEY,
            "a (b)",
            IgnoreState::Soft,
        )],
    );
    let names: Vec<String> = layer_opts(&layer, true)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, vec!["a", "(b)"]);
    assert!(layer_opts(&layer, false).unwrap().is_empty());
    assert!(without_opts(&layer).is_empty());
}
