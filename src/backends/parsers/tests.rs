use super::*;
use crate::utils::regex_cache;

fn format(strategy: ParseStrategy) -> OutputFormat {
    OutputFormat::with_strategy(strategy)
}

#[test]
fn empty_output_is_empty_for_every_strategy() {
    for strategy in [
        ParseStrategy::Lines,
        ParseStrategy::Parseable,
        ParseStrategy::JsonArray,
        ParseStrategy::JsonMap,
    ] {
        assert!(parse("", &format(strategy)).unwrap().is_empty());
        assert!(parse("  \n\t\n", &format(strategy)).unwrap().is_empty());
    }
}

#[test]
fn lines_trims_and_drops_blank_lines() {
    let entries = parse("ripgrep\n\n  fd  \nbat\n", &format(ParseStrategy::Lines)).unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(names, vec!["ripgrep", "fd", "bat"]);
}

#[test]
fn lines_honours_skip_patterns() {
    let fmt = OutputFormat {
        skip: vec![regex_cache::compile("^ ", "test").unwrap()],
        ..format(ParseStrategy::Lines)
    };
    let output = "ripgrep v14.1.0:\n    rg\nfd-find v9.0.0:\n    fd\n";
    let entries = parse(output, &fmt).unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(names, vec!["ripgrep v14.1.0:", "fd-find v9.0.0:"]);
}

#[test]
fn parseable_splits_on_delimiter() {
    let fmt = OutputFormat {
        delimiter: "\t".to_string(),
        ..format(ParseStrategy::Parseable)
    };
    let entries = parse("/usr/lib/node_modules/npm\tnpm@10.2.4\n", &fmt).unwrap();

    assert_eq!(entries[0].identifier, "/usr/lib/node_modules/npm");
    assert_eq!(entries[0].fields.get("1").map(String::as_str), Some("npm@10.2.4"));
}

#[test]
fn parseable_default_delimiter_is_colon() {
    let entries = parse(
        "/opt/lib/node_modules/typescript:typescript@5.4.5:extra\n",
        &format(ParseStrategy::Parseable),
    )
    .unwrap();

    assert_eq!(entries[0].identifier, "/opt/lib/node_modules/typescript");
    assert_eq!(entries[0].fields.len(), 2);
    assert_eq!(entries[0].fields.get("2").map(String::as_str), Some("extra"));
}

#[test]
fn json_array_through_dispatch() {
    let entries = parse(
        r#"[{"name":"jq","version":"1.7"}]"#,
        &format(ParseStrategy::JsonArray),
    )
    .unwrap();
    assert_eq!(entries, vec![RawEntry::new("jq").with_field("version", "1.7")]);
}

#[test]
fn lower_normalization_applies_after_parsing() {
    let fmt = OutputFormat {
        normalize: Normalize::Lower,
        ..format(ParseStrategy::Lines)
    };
    let entries = parse("Django\nRequests\n", &fmt).unwrap();
    assert_eq!(entries[0].identifier, "django");
    assert_eq!(entries[1].identifier, "requests");
}

#[test]
fn malformed_json_never_yields_partial_result() {
    assert!(parse("{\"a\": {}", &format(ParseStrategy::JsonMap)).is_err());
}
