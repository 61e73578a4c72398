use super::*;

#[test]
fn expand_home_replaces_tilde() {
    let home = Path::new("/home/alice");
    assert_eq!(
        expand_home_with(Path::new("~/.zshrc"), home).unwrap(),
        PathBuf::from("/home/alice/.zshrc")
    );
    assert_eq!(
        expand_home_with(Path::new("~"), home).unwrap(),
        PathBuf::from("/home/alice")
    );
}

#[test]
fn expand_home_leaves_absolute_paths() {
    let home = Path::new("/home/alice");
    assert_eq!(
        expand_home_with(Path::new("/etc/hosts"), home).unwrap(),
        PathBuf::from("/etc/hosts")
    );
}

#[test]
fn expand_home_rejects_other_users() {
    assert!(expand_home_with(Path::new("~bob/.zshrc"), Path::new("/home/alice")).is_err());
}

#[test]
fn normalize_resolves_dots() {
    assert_eq!(
        normalize(Path::new("/home/alice/./.config/../.zshrc")),
        PathBuf::from("/home/alice/.zshrc")
    );
    assert_eq!(normalize(Path::new("a/b/../c")), PathBuf::from("a/c"));
}

#[test]
fn file_layout_is_relative_to_config_dir() {
    let dir = Path::new("/cfg");
    assert_eq!(config_file(dir), PathBuf::from("/cfg/homedecl.kdl"));
    assert_eq!(lock_file(dir), PathBuf::from("/cfg/homedecl.lock"));
    assert_eq!(managers_file(dir), PathBuf::from("/cfg/managers.kdl"));
    assert_eq!(dotfiles_dir(dir), PathBuf::from("/cfg/dotfiles"));
}
