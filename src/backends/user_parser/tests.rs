use super::*;
use crate::backends::descriptor::ManagerDescriptor;

fn parse_one(kdl: &str) -> DescriptorSpec {
    let doc = KdlDocument::parse(kdl).unwrap();
    let node = doc.nodes().first().unwrap();
    parse_manager_node(node).unwrap()
}

#[test]
fn test_parse_simple_manager() {
    let spec = parse_one(
        r#"
        manager "gem" {
            binary "gem"
            description "Ruby gems"
            list "gem list --local --no-versions" {
                skip "^[*]"
            }
            install "gem install {package}" {
                idempotent "already installed"
            }
            uninstall "gem uninstall {package} -x"
        }
        "#,
    );

    assert_eq!(spec.name, "gem");
    assert_eq!(spec.binary.as_deref(), Some("gem"));
    assert_eq!(spec.description.as_deref(), Some("Ruby gems"));

    let list = spec.list.unwrap();
    assert_eq!(list.template.as_deref(), Some("gem list --local --no-versions"));
    assert_eq!(list.output.skip, vec!["^[*]".to_string()]);

    let install = spec.install.unwrap();
    assert_eq!(install.idempotent, vec!["already installed".to_string()]);
    assert_eq!(
        spec.uninstall.unwrap().template.as_deref(),
        Some("gem uninstall {package} -x")
    );
}

#[test]
fn test_parse_json_manager() {
    let spec = parse_one(
        r#"
        manager "npm" {
            binary "npm"
            list "npm list -g --depth=0 --json" {
                parse "json-map"
                json-path "dependencies"
                fatal-exit-codes 2 127
            }
            install "npm install -g {package}"
            uninstall "npm uninstall -g {package}"
            upgrade-target "full-name-preferred"
            name-transform pattern="^@[^/]+/(.*)$" replacement="$1"
            metadata {
                scope pattern="^(@[^/]+)/" source="raw"
                full_name source="raw"
                ver field="version" group=0
            }
        }
        "#,
    );

    let list = spec.list.as_ref().unwrap();
    assert_eq!(list.output.parse.as_deref(), Some("json-map"));
    assert_eq!(list.output.json_path.as_deref(), Some("dependencies"));
    assert_eq!(list.fatal_exit_codes, vec![2, 127]);
    assert_eq!(spec.upgrade_target.as_deref(), Some("full-name-preferred"));

    let transform = spec.name_transform.as_ref().unwrap();
    assert_eq!(transform.pattern, "^@[^/]+/(.*)$");
    assert_eq!(transform.replacement, "$1");

    assert_eq!(spec.metadata.len(), 3);
    assert_eq!(spec.metadata["scope"].source.as_deref(), Some("raw"));
    assert_eq!(spec.metadata["ver"].field.as_deref(), Some("version"));
    assert_eq!(spec.metadata["ver"].group, Some(0));
    assert_eq!(spec.metadata["full_name"].pattern, None);

    assert!(ManagerDescriptor::try_from(spec).is_ok());
}

#[test]
fn test_parse_parseable_options() {
    let spec = parse_one(
        r#"
        manager "conda" {
            binary "conda"
            list "conda list --export" {
                parse "parseable"
                delimiter "="
                normalize "lower"
                skip "^#" "^$"
            }
            install "conda install -y {package}"
            uninstall "conda remove -y {package}"
        }
        "#,
    );

    let output = spec.list.unwrap().output;
    assert_eq!(output.parse.as_deref(), Some("parseable"));
    assert_eq!(output.delimiter.as_deref(), Some("="));
    assert_eq!(output.normalize.as_deref(), Some("lower"));
    assert_eq!(output.skip.len(), 2);
}

#[test]
fn test_manager_without_name_fails() {
    let doc = KdlDocument::parse("manager { binary \"x\" }").unwrap();
    assert!(parse_manager_node(&doc.nodes()[0]).is_err());
}

#[test]
fn test_command_without_template_fails() {
    let doc = KdlDocument::parse("manager \"x\" {\n list\n}").unwrap();
    let err = parse_manager_node(&doc.nodes()[0]).unwrap_err();
    assert!(err.to_string().contains("list"));
}

#[test]
fn test_non_integer_exit_code_fails() {
    let doc = KdlDocument::parse(
        "manager \"x\" {\n list \"x ls\" {\n fatal-exit-codes \"two\"\n }\n}",
    )
    .unwrap();
    assert!(parse_manager_node(&doc.nodes()[0]).is_err());
}

#[test]
fn test_unknown_fields_are_ignored() {
    let spec = parse_one(
        r#"
        manager "x" {
            binary "x"
            future-option "whatever"
        }
        "#,
    );
    assert_eq!(spec.binary.as_deref(), Some("x"));
}

#[test]
fn test_parse_managers_skips_other_nodes() {
    let specs = parse_managers(
        r#"
        settings { default-manager "brew" }
        manager "a" { binary "a" }
        manager "b" { binary "b" }
        "#,
        "test.kdl",
    )
    .unwrap();

    let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_invalid_kdl_reports_origin() {
    let err = parse_managers("manager \"a\" {", "managers.kdl").unwrap_err();
    assert!(err.to_string().contains("managers.kdl"));
}

#[test]
fn test_load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let specs = load_user_managers(&dir.path().join("managers.kdl")).unwrap();
    assert!(specs.is_empty());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("managers.kdl");
    std::fs::write(&path, "manager \"mise\" {\n binary \"mise\"\n}\n").unwrap();

    let specs = load_user_managers(&path).unwrap();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].name, "mise");
}
