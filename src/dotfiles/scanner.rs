use crate::constants::TEMPLATE_SUFFIX;
use crate::error::{HomedeclError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One declared dotfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotfileDecl {
    /// Home-relative name, e.g. `.config/nvim/init.lua`
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub is_template: bool,
}

/// Map a source path relative to the dotfiles directory to its home-relative
/// destination: a leading dot is added and a template suffix dropped.
pub fn source_to_target(relative: &str) -> String {
    let relative = relative.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(relative);
    if relative.starts_with('.') {
        relative.to_string()
    } else {
        format!(".{}", relative)
    }
}

/// Ignore patterns matched against each entry's file name and its path
/// relative to the dotfiles directory.
///
/// `**/dir/**` matches `dir` as any path component.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    literals: Vec<String>,
    globs: Vec<Pattern>,
    components: Vec<Pattern>,
}

impl IgnoreFilter {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut filter = Self::default();
        for pattern in patterns {
            let compile = |p: &str| {
                Pattern::new(p).map_err(|e| {
                    HomedeclError::ConfigError(format!("Invalid ignore pattern '{}': {}", pattern, e))
                })
            };

            if let Some(middle) = pattern
                .strip_prefix("**/")
                .and_then(|p| p.strip_suffix("/**"))
            {
                filter.components.push(compile(middle)?);
            } else {
                filter.literals.push(pattern.clone());
                filter.globs.push(compile(pattern)?);
            }
        }
        Ok(filter)
    }

    pub fn is_ignored(&self, relative: &str) -> bool {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);

        if self
            .literals
            .iter()
            .any(|lit| lit == file_name || lit == relative)
        {
            return true;
        }

        if self
            .globs
            .iter()
            .any(|glob| glob.matches(file_name) || glob.matches(relative))
        {
            return true;
        }

        relative
            .split('/')
            .any(|part| self.components.iter().any(|glob| glob.matches(part)))
    }
}

/// Walk `dotfiles_dir` and declare every regular file that is not ignored.
///
/// Ignored directories are not descended into. A missing directory declares
/// nothing. Results are sorted by name.
pub fn scan(dotfiles_dir: &Path, home: &Path, filter: &IgnoreFilter) -> Result<Vec<DotfileDecl>> {
    if !dotfiles_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut decls = Vec::new();
    let walker = WalkDir::new(dotfiles_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            relative_of(dotfiles_dir, entry.path())
                .map(|rel| rel.is_empty() || !filter.is_ignored(&rel))
                .unwrap_or(false)
        });

    for entry in walker {
        let entry = entry.map_err(|e| HomedeclError::IoError {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dotfiles_dir.to_path_buf()),
            source: e.into(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(relative) = relative_of(dotfiles_dir, entry.path()) else {
            continue;
        };

        let name = source_to_target(&relative);
        decls.push(DotfileDecl {
            destination: home.join(&name),
            is_template: relative.ends_with(TEMPLATE_SUFFIX),
            source: entry.path().to_path_buf(),
            name,
        });
    }

    decls.sort_by(|a, b| a.name.cmp(&b.name));
    decls.dedup_by(|later, earlier| later.name == earlier.name);
    Ok(decls)
}

/// `/`-separated path of `path` under `root`.
fn relative_of(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
