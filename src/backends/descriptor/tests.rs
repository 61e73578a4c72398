use super::*;

fn minimal(name: &str) -> DescriptorSpec {
    DescriptorSpec {
        binary: Some(name.to_string()),
        list: Some(CommandSpec::with_template("{binary} list")),
        install: Some(CommandSpec::with_template("{binary} install {package}")),
        uninstall: Some(CommandSpec::with_template("{binary} remove {package}")),
        ..DescriptorSpec::new(name)
    }
}

#[test]
fn minimal_descriptor_builds_with_defaults() {
    let descriptor = ManagerDescriptor::try_from(minimal("tool")).unwrap();

    assert_eq!(descriptor.name, "tool");
    assert_eq!(descriptor.list.format.strategy, ParseStrategy::Lines);
    assert_eq!(descriptor.list.template.argv(), ["tool", "list"]);
    assert_eq!(descriptor.upgrade_target, UpgradeTarget::Name);
    assert!(!descriptor.supports_search());
    assert!(descriptor.extractors.is_empty());
}

#[test]
fn unknown_parse_strategy_fails_at_construction() {
    let mut spec = minimal("tool");
    if let Some(list) = spec.list.as_mut() {
        list.output.parse = Some("xml".to_string());
    }

    let err = ManagerDescriptor::try_from(spec).unwrap_err();
    assert!(err.to_string().contains("xml"));
}

#[test]
fn invalid_regex_fails_at_construction() {
    let mut spec = minimal("tool");
    spec.name_transform = Some(NameTransformSpec {
        pattern: "(unclosed".to_string(),
        replacement: "$1".to_string(),
    });

    assert!(matches!(
        ManagerDescriptor::try_from(spec),
        Err(HomedeclError::InvalidRegex(_))
    ));
}

#[test]
fn missing_required_fields_are_reported() {
    let mut spec = minimal("tool");
    spec.install = None;
    let err = ManagerDescriptor::try_from(spec).unwrap_err();
    assert!(err.to_string().contains("install"));

    let mut spec = minimal("tool");
    spec.binary = None;
    let err = ManagerDescriptor::try_from(spec).unwrap_err();
    assert!(err.to_string().contains("binary"));
}

#[test]
fn mutating_template_requires_package_placeholder() {
    let mut spec = minimal("tool");
    spec.install = Some(CommandSpec::with_template("tool install"));
    let err = ManagerDescriptor::try_from(spec).unwrap_err();
    assert!(err.to_string().contains("{package}"));
}

#[test]
fn search_template_requires_query_placeholder() {
    let mut spec = minimal("tool");
    spec.search = Some(CommandSpec::with_template("tool search {package}"));
    assert!(ManagerDescriptor::try_from(spec).is_err());
}

#[test]
fn template_is_split_with_shell_rules() {
    let template = CommandTemplate::parse("brew info --json=v2 '{package}' \"a b\"", "brew").unwrap();
    assert_eq!(
        template.render(PACKAGE_PLACEHOLDER, "jq; rm -rf /"),
        vec!["brew", "info", "--json=v2", "jq; rm -rf /", "a b"]
    );
}

#[test]
fn template_with_unbalanced_quote_is_rejected() {
    assert!(CommandTemplate::parse("tool 'broken", "tool").is_err());
    assert!(CommandTemplate::parse("   ", "tool").is_err());
}

#[test]
fn extractor_group_must_exist() {
    let mut spec = minimal("tool");
    spec.metadata.insert(
        "scope".to_string(),
        ExtractorSpec {
            pattern: Some("^@([^/]+)/".to_string()),
            group: Some(2),
            ..Default::default()
        },
    );
    assert!(ManagerDescriptor::try_from(spec).is_err());
}

#[test]
fn extractor_sources_are_resolved() {
    let mut spec = minimal("tool");
    spec.metadata.insert(
        "full_name".to_string(),
        ExtractorSpec::default(),
    );
    spec.metadata.insert(
        "origin".to_string(),
        ExtractorSpec {
            source: Some("raw".to_string()),
            ..Default::default()
        },
    );
    spec.metadata.insert(
        "ver".to_string(),
        ExtractorSpec {
            field: Some("version".to_string()),
            ..Default::default()
        },
    );

    let descriptor = ManagerDescriptor::try_from(spec).unwrap();
    let sources: Vec<_> = descriptor
        .extractors
        .iter()
        .map(|e| (e.key.as_str(), e.source.clone()))
        .collect();

    assert_eq!(
        sources,
        vec![
            ("full_name", ExtractorSource::Name),
            ("origin", ExtractorSource::Raw),
            ("ver", ExtractorSource::Field("version".to_string())),
        ]
    );
}

#[test]
fn unknown_extractor_source_is_rejected() {
    let mut spec = minimal("tool");
    spec.metadata.insert(
        "x".to_string(),
        ExtractorSpec {
            source: Some("stdout".to_string()),
            ..Default::default()
        },
    );
    assert!(ManagerDescriptor::try_from(spec).is_err());
}

#[test]
fn merge_overrides_only_set_fields() {
    let mut base = minimal("npm");
    base.description = Some("Node packages".to_string());
    base.install = Some(CommandSpec {
        template: Some("npm install -g {package}".to_string()),
        idempotent: vec!["already installed".to_string()],
        ..Default::default()
    });
    base.metadata.insert(
        "scope".to_string(),
        ExtractorSpec {
            pattern: Some("^(@[^/]+)/".to_string()),
            ..Default::default()
        },
    );

    let mut overlay = DescriptorSpec::new("npm");
    overlay.install = Some(CommandSpec::with_template("npm install --global {package}"));
    overlay.metadata.insert("full_name".to_string(), ExtractorSpec::default());

    base.merge(overlay);

    let install = base.install.as_ref().unwrap();
    assert_eq!(
        install.template.as_deref(),
        Some("npm install --global {package}")
    );
    assert_eq!(install.idempotent, vec!["already installed".to_string()]);
    assert_eq!(base.description.as_deref(), Some("Node packages"));
    assert_eq!(base.metadata.len(), 2);
}

#[test]
fn idempotent_patterns_are_lowercased() {
    let mut spec = minimal("tool");
    spec.install = Some(CommandSpec {
        template: Some("tool install {package}".to_string()),
        idempotent: vec!["Already Present".to_string()],
        ..Default::default()
    });
    let descriptor = ManagerDescriptor::try_from(spec).unwrap();
    assert_eq!(descriptor.install.idempotent, vec!["already present"]);
}
