use super::*;

fn is_cached(pattern: &str) -> bool {
    REGEX_CACHE.lock().unwrap().contains_key(pattern)
}

#[test]
fn compiled_pattern_is_cached() {
    let pattern = "^regex_cache_test_[a-z]+$";
    let regex = get_cached_regex(pattern).unwrap();
    assert!(regex.is_match("regex_cache_test_abc"));
    assert!(is_cached(pattern));
}

#[test]
fn invalid_pattern_is_not_cached() {
    let pattern = "[unterminated(";
    assert!(get_cached_regex(pattern).is_err());
    assert!(!is_cached(pattern));
}

#[test]
fn compile_error_names_context() {
    let err = compile("(", "manager 'npm' name-transform").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("name-transform"));
    assert!(msg.contains("npm"));
}
