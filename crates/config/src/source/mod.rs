//! Config sources and their parsers.
//!
//! Responsibilities:
//! - Detect a source's format from its file name.
//! - Parse env, INI, JSON, YAML, TOML and XML files into `SourceData`.
//! - Provide the `Source` trait so callers can plug in their own parsers or
//!   hand over an in-memory mapping.
//!
//! Does NOT handle:
//! - Key expansion (see `expand.rs`; applied by `SourceData::into_mapping`).
//! - Merging sources into settings (see `resolver`).
//!
//! Invariants:
//! - A missing file is `Ok(None)`: optional overlays may be absent.
//! - XML keys have `-AND-` normalized to `+` before they leave this module.
//! - Parse errors never carry source line contents.

mod env;
mod ini;
mod xml;

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants::ENV_FILE_PREFIX;
use crate::error::ConfigError;
use crate::expand::{KeyExpander, KeyExpansion};
use crate::value::{Mapping, Value};

pub(crate) use env::parse_env;

/// Recognized source file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Env,
    Ini,
    Json,
    Yaml,
    Toml,
    Xml,
}

impl SourceFormat {
    /// Detect the format from a file name.
    ///
    /// `.env` and `.env.<name>` are env files regardless of their suffix.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if file_name == ENV_FILE_PREFIX || file_name.starts_with(".env.") {
            return Some(SourceFormat::Env);
        }
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "env" => Some(SourceFormat::Env),
            "ini" => Some(SourceFormat::Ini),
            "json" => Some(SourceFormat::Json),
            "yml" | "yaml" => Some(SourceFormat::Yaml),
            "toml" => Some(SourceFormat::Toml),
            "xml" => Some(SourceFormat::Xml),
            _ => None,
        }
    }

    /// Whether keys in this format are flat by nature.
    pub fn is_flat(self) -> bool {
        matches!(self, SourceFormat::Env | SourceFormat::Ini)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::Env => "env",
            SourceFormat::Ini => "INI",
            SourceFormat::Json => "JSON",
            SourceFormat::Yaml => "YAML",
            SourceFormat::Toml => "TOML",
            SourceFormat::Xml => "XML",
        };
        f.write_str(name)
    }
}

/// Flat `(key, value)` pairs in source order.
pub type Pairs = Vec<(String, Value)>;

/// A named block of flat pairs (an INI section).
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// `None` for pairs that appear before the first section header.
    pub name: Option<String>,
    pub pairs: Pairs,
}

/// Parsed content of a source, before key expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData {
    /// Flat pairs (`.env` files).
    Flat(Pairs),
    /// Sections of flat pairs (INI files).
    Sections(Vec<Section>),
    /// Already nested content (JSON, YAML, TOML, XML, in-memory).
    Tree(Mapping),
}

impl SourceData {
    /// Build the final mapping, expanding keys where `expansion` says so.
    ///
    /// Section names of INI sources and top-level keys of structured sources
    /// are never split; they name environments.
    pub fn into_mapping(self, expansion: KeyExpansion, expander: &KeyExpander) -> Mapping {
        let flat = expansion.applies_to(true);
        match self {
            SourceData::Flat(pairs) => collect_pairs(pairs, flat, expander),
            SourceData::Sections(sections) => {
                let mut root = Mapping::new();
                for section in sections {
                    match section.name {
                        None => {
                            for (key, value) in section.pairs {
                                insert_pair(&mut root, key, value, flat, expander);
                            }
                        }
                        Some(name) => {
                            let body = collect_pairs(section.pairs, flat, expander);
                            let slot = root
                                .entry(name)
                                .or_insert_with(|| Value::Mapping(Mapping::new()));
                            match slot.as_mapping_mut() {
                                Some(existing) => crate::merge::deep_merge_into(existing, body),
                                None => *slot = Value::Mapping(body),
                            }
                        }
                    }
                }
                root
            }
            SourceData::Tree(mapping) if expansion.applies_to(false) => mapping
                .into_iter()
                .map(|(name, value)| match value {
                    Value::Mapping(body) => (name, Value::Mapping(expander.expand_tree(body))),
                    other => (name, other),
                })
                .collect(),
            SourceData::Tree(mapping) => mapping,
        }
    }
}

fn collect_pairs(pairs: Pairs, expand: bool, expander: &KeyExpander) -> Mapping {
    let mut root = Mapping::new();
    for (key, value) in pairs {
        insert_pair(&mut root, key, value, expand, expander);
    }
    root
}

fn insert_pair(root: &mut Mapping, key: String, value: Value, expand: bool, expander: &KeyExpander) {
    if expand {
        expander.insert(root, &key, value);
    } else {
        root.insert(key, value);
    }
}

/// Anything that can produce settings content.
pub trait Source {
    /// Human-readable origin used in logs.
    fn describe(&self) -> String;

    /// Load the source. `Ok(None)` means the source is absent and should be
    /// skipped silently.
    fn load(&self) -> Result<Option<SourceData>, ConfigError>;
}

/// A config file on disk; the format is detected from the file name.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<SourceData>, ConfigError> {
        load_file(&self.path)
    }
}

/// An in-memory mapping handed over directly.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    mapping: Mapping,
}

impl MemorySource {
    pub fn new(mapping: Mapping) -> Self {
        Self { mapping }
    }
}

impl Source for MemorySource {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn load(&self) -> Result<Option<SourceData>, ConfigError> {
        Ok(Some(SourceData::Tree(self.mapping.clone())))
    }
}

/// Read and parse a config file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_file(path: &Path) -> Result<Option<SourceData>, ConfigError> {
    let format = SourceFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Config source not found, skipping");
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::SourceRead {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    parse(format, &content, path).map(Some)
}

/// Parse source content of a known format.
///
/// `path` is only used for error context.
pub fn parse(format: SourceFormat, content: &str, path: &Path) -> Result<SourceData, ConfigError> {
    let parse_error = |message: String| ConfigError::SourceParse {
        path: path.to_path_buf(),
        format,
        message,
    };

    match format {
        SourceFormat::Env => parse_env(content, path).map(SourceData::Flat),
        SourceFormat::Ini => ini::parse_ini(content)
            .map(SourceData::Sections)
            .map_err(parse_error),
        SourceFormat::Xml => xml::parse_xml(content)
            .map(SourceData::Tree)
            .map_err(parse_error),
        SourceFormat::Json => {
            let raw: serde_json::Value =
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            into_tree(Value::from(raw)).ok_or_else(|| parse_error(top_level_message()))
        }
        SourceFormat::Yaml => {
            let raw: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            into_tree(Value::from(raw)).ok_or_else(|| parse_error(top_level_message()))
        }
        SourceFormat::Toml => {
            let raw: toml::Table =
                toml::from_str(content).map_err(|e| parse_error(e.message().to_string()))?;
            into_tree(Value::from(toml::Value::Table(raw)))
                .ok_or_else(|| parse_error(top_level_message()))
        }
    }
}

/// An empty document counts as an empty mapping.
fn into_tree(value: Value) -> Option<SourceData> {
    match value {
        Value::Mapping(map) => Some(SourceData::Tree(map)),
        Value::Null => Some(SourceData::Tree(Mapping::new())),
        _ => None,
    }
}

fn top_level_message() -> String {
    "top level must be a mapping of keys to values".to_string()
}
