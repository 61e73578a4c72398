use super::*;
use tempfile::tempdir;

#[test]
fn empty_config_uses_defaults() {
    let config = parse_config("", "test.kdl").unwrap();
    assert_eq!(config.settings, Settings::default());
    assert!(config.vars.is_empty());
    assert!(config.hooks.pre_apply.is_empty());
}

#[test]
fn settings_are_parsed() {
    let config = parse_config(
        r#"
        settings {
            default-manager "brew"
            list-timeout 30
            operation-timeout 900
            hook-timeout "10"
            max-parallel-listing 2
            ignore "*.bak" "secret"
        }
        "#,
        "test.kdl",
    )
    .unwrap();

    let settings = &config.settings;
    assert_eq!(settings.default_manager.as_deref(), Some("brew"));
    assert_eq!(settings.list_timeout, Duration::from_secs(30));
    assert_eq!(settings.operation_timeout, Duration::from_secs(900));
    assert_eq!(settings.hook_timeout, Duration::from_secs(10));
    assert_eq!(settings.max_parallel_listing, 2);
    assert!(settings.ignore.contains(&"*.bak".to_string()));
    assert!(settings.ignore.contains(&".git".to_string()));
    assert_eq!(settings.timeouts().discovery, Duration::from_secs(30));
}

#[test]
fn unknown_setting_is_rejected() {
    let err = parse_config("settings {\n colour \"auto\"\n}", "test.kdl").unwrap_err();
    assert!(err.to_string().contains("colour"));
}

#[test]
fn bad_timeout_is_rejected() {
    assert!(parse_config("settings {\n list-timeout \"soon\"\n}", "test.kdl").is_err());
    assert!(parse_config("settings {\n list-timeout -5\n}", "test.kdl").is_err());
}

#[test]
fn list_timeout_must_be_shorter_than_operation_timeout() {
    let err = parse_config(
        "settings {\n list-timeout 600\n operation-timeout 600\n}",
        "test.kdl",
    )
    .unwrap_err();
    assert!(err.to_string().contains("must be shorter than operation-timeout"));

    assert!(parse_config("settings {\n list-timeout 5000\n}", "test.kdl").is_err());
    assert!(parse_config("settings {\n list-timeout 59\n operation-timeout 60\n}", "test.kdl").is_ok());
}

#[test]
fn vars_and_hooks_are_parsed() {
    let config = parse_config(
        r#"
        vars {
            email "me@example.com"
            editor "nvim"
        }
        hooks {
            pre-apply "brew update" timeout=300
            post-apply "echo done"
        }
        "#,
        "test.kdl",
    )
    .unwrap();

    assert_eq!(config.vars["email"], "me@example.com");
    assert_eq!(config.hooks.pre_apply.len(), 1);
    assert_eq!(config.hooks.pre_apply[0].command, "brew update");
    assert_eq!(config.hooks.pre_apply[0].timeout, Some(Duration::from_secs(300)));
    assert_eq!(config.hooks.post_apply[0].timeout, None);
}

#[test]
fn unknown_hook_phase_is_rejected() {
    assert!(parse_config("hooks {\n pre-sync \"x\"\n}", "test.kdl").is_err());
}

#[test]
fn kdl_error_mentions_origin() {
    let err = parse_config("settings {", "homedecl.kdl").unwrap_err();
    assert!(err.to_string().contains("homedecl.kdl"));
}

#[test]
fn managers_file_comes_before_main_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("managers.kdl"),
        "manager \"npm\" {\n install \"npm i -g {package}\"\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("homedecl.kdl"),
        "settings {\n default-manager \"npm\"\n}\nmanager \"npm\" {\n description \"mine\"\n}\n",
    )
    .unwrap();

    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.config_dir, dir.path());
    assert_eq!(config.settings.default_manager.as_deref(), Some("npm"));
    assert_eq!(config.managers.len(), 2);
    assert!(config.managers[0].install.is_some());
    assert_eq!(config.managers[1].description.as_deref(), Some("mine"));
}

#[test]
fn missing_files_load_defaults() {
    let dir = tempdir().unwrap();
    let config = load_config(dir.path()).unwrap();
    assert!(config.managers.is_empty());
    assert_eq!(config.settings, Settings::default());
}
