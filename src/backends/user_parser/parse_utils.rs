use kdl::{KdlEntry, KdlNode};

/// String form of an entry; non-string values use their KDL rendering.
pub(super) fn get_entry_string(entry: &KdlEntry) -> Option<String> {
    if let Some(s) = entry.value().as_string() {
        return Some(s.to_string());
    }
    let val_str = entry.value().to_string();
    if !val_str.is_empty() {
        return Some(val_str);
    }
    None
}

/// First positional argument as a string.
pub(super) fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|entry| entry.name().is_none())
        .and_then(|entry| entry.value().as_string())
        .map(str::to_string)
}

/// All positional string arguments.
pub(super) fn string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|entry| entry.name().is_none())
        .filter_map(|entry| entry.value().as_string())
        .map(str::to_string)
        .collect()
}

/// Property `key=...` of a node.
pub(super) fn property(node: &KdlNode, key: &str) -> Option<String> {
    node.entries()
        .iter()
        .find(|entry| entry.name().map(|n| n.value()) == Some(key))
        .and_then(get_entry_string)
}

/// Positional arguments parsed as integers, e.g. `fatal-exit-codes 1 2`.
pub(super) fn int_args<T: std::str::FromStr>(node: &KdlNode) -> Option<Vec<T>> {
    node.entries()
        .iter()
        .filter(|entry| entry.name().is_none())
        .map(|entry| get_entry_string(entry)?.trim().parse().ok())
        .collect()
}
