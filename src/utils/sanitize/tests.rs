use super::*;

#[test]
fn accepts_common_package_names() {
    for name in [
        "ripgrep",
        "python3.12",
        "@angular/cli",
        "node_modules",
        "gcc++",
        "black==24.1.0",
        "homebrew/cask/firefox",
    ] {
        assert!(validate_package_name(name).is_ok(), "{} should be valid", name);
    }
}

#[test]
fn rejects_option_like_names() {
    assert!(validate_package_name("--force").is_err());
    assert!(validate_package_name("-g").is_err());
}

#[test]
fn rejects_shell_metacharacters() {
    assert!(validate_package_name("foo; rm -rf /").is_err());
    assert!(validate_package_name("foo|cat").is_err());
    assert!(validate_package_name("foo$(id)").is_err());
    assert!(validate_package_name("foo bar").is_err());
}

#[test]
fn rejects_path_traversal_and_bad_lengths() {
    assert!(validate_package_name("../../etc/passwd").is_err());
    assert!(validate_package_name("").is_err());
    assert!(validate_package_name(&"a".repeat(300)).is_err());
}

#[test]
fn search_query_allows_spaces() {
    assert!(validate_search_query("json formatter").is_ok());
    assert!(validate_search_query("   ").is_err());
    assert!(validate_search_query("--help").is_err());
}

#[test]
fn display_truncates_long_input() {
    let long = "x".repeat(250);
    let shown = sanitize_for_display(&long);
    assert!(shown.ends_with("..."));
    assert_eq!(shown.len(), 203);
}
