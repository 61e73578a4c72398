//! Manager descriptors.
//!
//! A [`DescriptorSpec`] is the raw, mergeable form read from KDL: every field is
//! optional so a user override can replace just one command of a built-in
//! manager. [`ManagerDescriptor`] is the validated form the runtime executes.
//! Validation happens once, in `TryFrom<DescriptorSpec>`: templates are split
//! into argv, regexes compiled and parse strategies resolved, so nothing about
//! a descriptor can fail later at run time.

use crate::error::{HomedeclError, Result};
use crate::utils::regex_cache;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const PACKAGE_PLACEHOLDER: &str = "{package}";
pub const QUERY_PLACEHOLDER: &str = "{query}";
pub const BINARY_PLACEHOLDER: &str = "{binary}";

/// How list and search output is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseStrategy {
    /// One identifier per line
    #[default]
    Lines,
    /// Delimited fields, first field is the identifier
    Parseable,
    /// JSON array of objects
    JsonArray,
    /// JSON object keyed by identifier
    JsonMap,
}

impl ParseStrategy {
    pub const ALL: &'static [&'static str] = &["lines", "parseable", "json-array", "json-map"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStrategy::Lines => "lines",
            ParseStrategy::Parseable => "parseable",
            ParseStrategy::JsonArray => "json-array",
            ParseStrategy::JsonMap => "json-map",
        }
    }
}

impl FromStr for ParseStrategy {
    type Err = HomedeclError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lines" => Ok(ParseStrategy::Lines),
            "parseable" => Ok(ParseStrategy::Parseable),
            "json-array" | "json" => Ok(ParseStrategy::JsonArray),
            "json-map" => Ok(ParseStrategy::JsonMap),
            other => Err(HomedeclError::ConfigError(format!(
                "Unknown parse strategy '{}'. Valid: {}",
                other,
                ParseStrategy::ALL.join(", ")
            ))),
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier normalization applied right after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalize {
    #[default]
    None,
    Lower,
}

impl FromStr for Normalize {
    type Err = HomedeclError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Normalize::None),
            "lower" => Ok(Normalize::Lower),
            other => Err(HomedeclError::ConfigError(format!(
                "Unknown normalize mode '{}'. Valid: none, lower",
                other
            ))),
        }
    }
}

/// Which identifier `upgrade` passes to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpgradeTarget {
    #[default]
    Name,
    /// Use the `full_name` metadata of the installed entry when present
    FullNamePreferred,
}

impl FromStr for UpgradeTarget {
    type Err = HomedeclError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(UpgradeTarget::Name),
            "full-name-preferred" | "full_name_preferred" => Ok(UpgradeTarget::FullNamePreferred),
            other => Err(HomedeclError::ConfigError(format!(
                "Unknown upgrade target '{}'. Valid: name, full-name-preferred",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw, mergeable form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSpec {
    pub parse: Option<String>,
    pub json_path: Option<String>,
    pub name_key: Option<String>,
    pub delimiter: Option<String>,
    pub normalize: Option<String>,
    pub skip: Vec<String>,
}

impl OutputSpec {
    fn merge(&mut self, overlay: OutputSpec) {
        merge_opt(&mut self.parse, overlay.parse);
        merge_opt(&mut self.json_path, overlay.json_path);
        merge_opt(&mut self.name_key, overlay.name_key);
        merge_opt(&mut self.delimiter, overlay.delimiter);
        merge_opt(&mut self.normalize, overlay.normalize);
        merge_vec(&mut self.skip, overlay.skip);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub template: Option<String>,
    /// Output fragments that mean the operation was already satisfied
    pub idempotent: Vec<String>,
    /// Non-zero list exit codes that are real failures
    pub fatal_exit_codes: Vec<i32>,
    pub output: OutputSpec,
}

impl CommandSpec {
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Default::default()
        }
    }

    fn merge(&mut self, overlay: CommandSpec) {
        merge_opt(&mut self.template, overlay.template);
        merge_vec(&mut self.idempotent, overlay.idempotent);
        merge_vec(&mut self.fatal_exit_codes, overlay.fatal_exit_codes);
        self.output.merge(overlay.output);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTransformSpec {
    pub pattern: String,
    pub replacement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorSpec {
    pub pattern: Option<String>,
    pub group: Option<usize>,
    pub source: Option<String>,
    pub field: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorSpec {
    pub name: String,
    pub binary: Option<String>,
    pub description: Option<String>,
    pub install_hint: Option<String>,
    pub help_url: Option<String>,
    pub version: Option<CommandSpec>,
    pub list: Option<CommandSpec>,
    pub install: Option<CommandSpec>,
    pub uninstall: Option<CommandSpec>,
    pub upgrade: Option<CommandSpec>,
    pub upgrade_all: Option<CommandSpec>,
    pub search: Option<CommandSpec>,
    pub info: Option<CommandSpec>,
    pub upgrade_target: Option<String>,
    pub name_transform: Option<NameTransformSpec>,
    pub metadata: BTreeMap<String, ExtractorSpec>,
}

impl DescriptorSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Overlay `overlay` onto `self` field by field.
    ///
    /// Set fields in the overlay win, unset ones inherit; metadata extractors
    /// are merged per key.
    pub fn merge(&mut self, overlay: DescriptorSpec) {
        merge_opt(&mut self.binary, overlay.binary);
        merge_opt(&mut self.description, overlay.description);
        merge_opt(&mut self.install_hint, overlay.install_hint);
        merge_opt(&mut self.help_url, overlay.help_url);
        merge_command(&mut self.version, overlay.version);
        merge_command(&mut self.list, overlay.list);
        merge_command(&mut self.install, overlay.install);
        merge_command(&mut self.uninstall, overlay.uninstall);
        merge_command(&mut self.upgrade, overlay.upgrade);
        merge_command(&mut self.upgrade_all, overlay.upgrade_all);
        merge_command(&mut self.search, overlay.search);
        merge_command(&mut self.info, overlay.info);
        merge_opt(&mut self.upgrade_target, overlay.upgrade_target);
        merge_opt(&mut self.name_transform, overlay.name_transform);
        self.metadata.extend(overlay.metadata);
    }
}

fn merge_opt<T>(base: &mut Option<T>, overlay: Option<T>) {
    if overlay.is_some() {
        *base = overlay;
    }
}

fn merge_vec<T>(base: &mut Vec<T>, overlay: Vec<T>) {
    if !overlay.is_empty() {
        *base = overlay;
    }
}

fn merge_command(base: &mut Option<CommandSpec>, overlay: Option<CommandSpec>) {
    match (base.as_mut(), overlay) {
        (Some(existing), Some(overlay)) => existing.merge(overlay),
        (None, Some(overlay)) => *base = Some(overlay),
        (_, None) => {}
    }
}

// ---------------------------------------------------------------------------
// Validated form
// ---------------------------------------------------------------------------

/// A command split into argv at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    argv: Vec<String>,
}

impl CommandTemplate {
    /// Split `template` with shell-word rules and substitute `{binary}`.
    pub fn parse(template: &str, binary: &str) -> Result<Self> {
        let words = shlex::split(template).ok_or_else(|| {
            HomedeclError::ConfigError(format!("Unbalanced quotes in command: {}", template))
        })?;

        if words.is_empty() {
            return Err(HomedeclError::ConfigError(
                "Command template cannot be empty".to_string(),
            ));
        }

        let argv = words
            .into_iter()
            .map(|word| word.replace(BINARY_PLACEHOLDER, binary))
            .collect();

        Ok(Self { argv })
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn contains(&self, placeholder: &str) -> bool {
        self.argv.iter().any(|arg| arg.contains(placeholder))
    }

    /// argv with `placeholder` replaced inside every word.
    ///
    /// The value always stays inside the word it was substituted into, so a
    /// value with spaces never turns into extra arguments.
    pub fn render(&self, placeholder: &str, value: &str) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| arg.replace(placeholder, value))
            .collect()
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

#[derive(Debug, Clone)]
pub struct OutputFormat {
    pub strategy: ParseStrategy,
    pub json_path: Option<String>,
    pub name_key: String,
    pub delimiter: String,
    pub normalize: Normalize,
    pub skip: Vec<Regex>,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            strategy: ParseStrategy::Lines,
            json_path: None,
            name_key: "name".to_string(),
            delimiter: ":".to_string(),
            normalize: Normalize::None,
            skip: Vec::new(),
        }
    }
}

impl OutputFormat {
    pub fn with_strategy(strategy: ParseStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    fn from_spec(spec: OutputSpec, context: &str) -> Result<Self> {
        let strategy = match spec.parse {
            Some(parse) => parse
                .parse::<ParseStrategy>()
                .map_err(|e| HomedeclError::ConfigError(format!("{}: {}", context, e)))?,
            None => ParseStrategy::Lines,
        };
        let normalize = match spec.normalize {
            Some(mode) => mode.parse::<Normalize>()?,
            None => Normalize::None,
        };
        let skip = spec
            .skip
            .iter()
            .map(|pattern| regex_cache::compile(pattern, &format!("{} skip", context)))
            .collect::<Result<Vec<_>>>()?;

        let delimiter = spec.delimiter.unwrap_or_else(|| ":".to_string());
        if delimiter.is_empty() {
            return Err(HomedeclError::ConfigError(format!(
                "{}: delimiter cannot be empty",
                context
            )));
        }

        Ok(Self {
            strategy,
            json_path: spec.json_path.filter(|p| !p.is_empty()),
            name_key: spec.name_key.unwrap_or_else(|| "name".to_string()),
            delimiter,
            normalize,
            skip,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ListCommand {
    pub template: CommandTemplate,
    pub format: OutputFormat,
    pub fatal_exit_codes: Vec<i32>,
}

#[derive(Debug, Clone)]
pub struct MutatingCommand {
    pub template: CommandTemplate,
    /// Lowercased output fragments treated as "already satisfied"
    pub idempotent: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SearchCommand {
    pub template: CommandTemplate,
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct NameTransform {
    pub pattern: Regex,
    pub replacement: String,
}

impl NameTransform {
    /// Rewrite `identifier`; a non-matching identifier passes through unchanged.
    pub fn apply(&self, identifier: &str) -> String {
        self.pattern
            .replace(identifier, self.replacement.as_str())
            .into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorSource {
    /// Canonical name after the name transform
    Name,
    /// Identifier exactly as parsed
    Raw,
    /// A raw field of the parsed entry
    Field(String),
}

#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    pub key: String,
    pub pattern: Option<Regex>,
    pub group: usize,
    pub source: ExtractorSource,
}

#[derive(Debug, Clone)]
pub struct ManagerDescriptor {
    pub name: String,
    pub binary: String,
    pub description: Option<String>,
    pub install_hint: Option<String>,
    pub help_url: Option<String>,
    pub version: Option<CommandTemplate>,
    pub list: ListCommand,
    pub install: MutatingCommand,
    pub uninstall: MutatingCommand,
    pub upgrade: Option<MutatingCommand>,
    pub upgrade_all: Option<MutatingCommand>,
    pub search: Option<SearchCommand>,
    pub info: Option<CommandTemplate>,
    pub upgrade_target: UpgradeTarget,
    pub name_transform: Option<NameTransform>,
    /// Sorted by key
    pub extractors: Vec<MetadataExtractor>,
}

impl TryFrom<DescriptorSpec> for ManagerDescriptor {
    type Error = HomedeclError;

    fn try_from(spec: DescriptorSpec) -> Result<Self> {
        let name = spec.name.trim().to_string();
        if name.is_empty() {
            return Err(HomedeclError::ConfigError(
                "Manager name cannot be empty".to_string(),
            ));
        }
        if name.contains(':') || name.contains(char::is_whitespace) {
            return Err(HomedeclError::ConfigError(format!(
                "Manager name '{}' cannot contain ':' or whitespace",
                name
            )));
        }

        let ctx = |what: &str| format!("manager '{}' {}", name, what);

        let binary = spec
            .binary
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| missing(&name, "binary"))?;

        let version = match spec.version {
            Some(cmd) => Some(template_of(cmd, &binary, &name, "version")?),
            None => None,
        };

        let list_spec = spec.list.ok_or_else(|| missing(&name, "list"))?;
        let list = ListCommand {
            template: required_template(list_spec.template.as_deref(), &binary, &name, "list")?,
            format: OutputFormat::from_spec(list_spec.output, &ctx("list"))?,
            fatal_exit_codes: list_spec.fatal_exit_codes,
        };

        let install = mutating(spec.install, &binary, &name, "install")?
            .ok_or_else(|| missing(&name, "install"))?;
        let uninstall = mutating(spec.uninstall, &binary, &name, "uninstall")?
            .ok_or_else(|| missing(&name, "uninstall"))?;
        let upgrade = mutating(spec.upgrade, &binary, &name, "upgrade")?;

        let upgrade_all = match spec.upgrade_all {
            Some(cmd) => Some(MutatingCommand {
                idempotent: lowercase_all(&cmd.idempotent),
                template: template_of(cmd, &binary, &name, "upgrade-all")?,
            }),
            None => None,
        };

        let search = match spec.search {
            Some(cmd) => {
                let format = OutputFormat::from_spec(cmd.output.clone(), &ctx("search"))?;
                let template = template_of(cmd, &binary, &name, "search")?;
                require_placeholder(&template, QUERY_PLACEHOLDER, &name, "search")?;
                Some(SearchCommand { template, format })
            }
            None => None,
        };

        let info = match spec.info {
            Some(cmd) => {
                let template = template_of(cmd, &binary, &name, "info")?;
                require_placeholder(&template, PACKAGE_PLACEHOLDER, &name, "info")?;
                Some(template)
            }
            None => None,
        };

        let upgrade_target = match spec.upgrade_target {
            Some(target) => target.parse()?,
            None => UpgradeTarget::Name,
        };

        let name_transform = match spec.name_transform {
            Some(t) => Some(NameTransform {
                pattern: regex_cache::compile(&t.pattern, &ctx("name-transform"))?,
                replacement: t.replacement,
            }),
            None => None,
        };

        let extractors = spec
            .metadata
            .into_iter()
            .map(|(key, extractor)| build_extractor(&name, key, extractor))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name,
            binary,
            description: spec.description,
            install_hint: spec.install_hint,
            help_url: spec.help_url,
            version,
            list,
            install,
            uninstall,
            upgrade,
            upgrade_all,
            search,
            info,
            upgrade_target,
            name_transform,
            extractors,
        })
    }
}

impl ManagerDescriptor {
    pub fn supports_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn supports_info(&self) -> bool {
        self.info.is_some()
    }
}

fn missing(manager: &str, field: &str) -> HomedeclError {
    HomedeclError::ConfigError(format!(
        "Manager '{}' is missing required field '{}'",
        manager, field
    ))
}

fn required_template(
    template: Option<&str>,
    binary: &str,
    manager: &str,
    operation: &str,
) -> Result<CommandTemplate> {
    let template = template
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| missing(manager, operation))?;
    CommandTemplate::parse(template, binary)
        .map_err(|e| HomedeclError::ConfigError(format!("manager '{}' {}: {}", manager, operation, e)))
}

fn template_of(
    cmd: CommandSpec,
    binary: &str,
    manager: &str,
    operation: &str,
) -> Result<CommandTemplate> {
    required_template(cmd.template.as_deref(), binary, manager, operation)
}

fn require_placeholder(
    template: &CommandTemplate,
    placeholder: &str,
    manager: &str,
    operation: &str,
) -> Result<()> {
    if template.contains(placeholder) {
        Ok(())
    } else {
        Err(HomedeclError::ConfigError(format!(
            "Manager '{}' {} command must contain {}",
            manager, operation, placeholder
        )))
    }
}

fn mutating(
    cmd: Option<CommandSpec>,
    binary: &str,
    manager: &str,
    operation: &str,
) -> Result<Option<MutatingCommand>> {
    let Some(cmd) = cmd else {
        return Ok(None);
    };
    let idempotent = lowercase_all(&cmd.idempotent);
    let template = template_of(cmd, binary, manager, operation)?;
    require_placeholder(&template, PACKAGE_PLACEHOLDER, manager, operation)?;
    Ok(Some(MutatingCommand {
        template,
        idempotent,
    }))
}

fn lowercase_all(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|p| p.to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

fn build_extractor(manager: &str, key: String, spec: ExtractorSpec) -> Result<MetadataExtractor> {
    let context = format!("manager '{}' metadata '{}'", manager, key);

    let source = match spec.source.as_deref() {
        None => match spec.field {
            Some(field) => ExtractorSource::Field(field),
            None => ExtractorSource::Name,
        },
        Some("name") => ExtractorSource::Name,
        Some("raw") => ExtractorSource::Raw,
        Some("field") => ExtractorSource::Field(spec.field.ok_or_else(|| {
            HomedeclError::ConfigError(format!(
                "{}: source \"field\" requires field=\"...\"",
                context
            ))
        })?),
        Some(other) => {
            return Err(HomedeclError::ConfigError(format!(
                "{}: unknown source '{}'. Valid: name, raw, field",
                context, other
            )));
        }
    };

    let pattern = match spec.pattern {
        Some(p) => Some(regex_cache::compile(&p, &context)?),
        None => None,
    };

    let group = spec.group.unwrap_or(if pattern.is_some() { 1 } else { 0 });
    if let Some(regex) = &pattern
        && group >= regex.captures_len()
    {
        return Err(HomedeclError::ConfigError(format!(
            "{}: capture group {} does not exist in pattern",
            context, group
        )));
    }

    Ok(MetadataExtractor {
        key,
        pattern,
        group,
        source,
    })
}

#[cfg(test)]
mod tests;
