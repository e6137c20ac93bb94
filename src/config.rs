//! Configuration management for importfmt.
//!
//! This module provides the [`Config`] struct which controls all formatting
//! behavior. Configuration can be loaded from:
//! - TOML files (`importfmt.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`// importfmt: --indent 2`)
//!
//! Config files are auto-discovered by searching parent directories from the
//! file being formatted up to the filesystem root, plus the user's home
//! directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["importfmt.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    // Try HOME environment variable first (works on Unix and some Windows setups)
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_indent() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_groups() -> Vec<GroupConfig> {
    vec![
        GroupConfig {
            name: "external".to_string(),
            order: None,
            pattern: None,
            default: true,
            priority_patterns: Vec::new(),
        },
        GroupConfig {
            name: "internal".to_string(),
            order: None,
            pattern: Some(r"^\.".to_string()),
            default: false,
            priority_patterns: Vec::new(),
        },
    ]
}

/// Quote style used when rendering module specifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
}

impl QuoteStyle {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// One import group as declared by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Unique group name, used for the rendered comment header
    pub name: String,

    /// Requested position; missing and invalid values are assigned
    /// automatically by the order resolver
    #[serde(default)]
    pub order: Option<f64>,

    /// Matcher applied to module specifiers; the default group carries none
    #[serde(default)]
    pub pattern: Option<String>,

    /// Exactly one group must be the fallback for unmatched specifiers
    #[serde(default)]
    pub default: bool,

    /// Specifier patterns whose imports sort ahead of the rest of the group
    #[serde(default)]
    pub priority_patterns: Vec<String>,
}

/// Main configuration struct for importfmt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of spaces per indent level in multi-line imports (default: 4)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Quote style for module specifiers (default: single)
    #[serde(default)]
    pub quote: QuoteStyle,

    /// Emit a `// name` comment header above each group (default: true)
    #[serde(default = "default_true")]
    pub group_comments: bool,

    /// Import groups, exactly one of which is the default
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupConfig>,

    /// Declaration-kind sort weights
    ///
    /// Keys: `default`, `named`, `type_default`, `type_named`, `side_effect`
    #[serde(default)]
    pub kind_weights: HashMap<String, i64>,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub indent: Option<usize>,
    pub quote: Option<QuoteStyle>,
    pub group_comments: Option<bool>,
    pub groups: Option<Vec<GroupConfig>>,
    #[serde(default)]
    pub kind_weights: HashMap<String, i64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indent: 4,
            quote: QuoteStyle::Single,
            group_comments: true,
            groups: default_groups(),
            kind_weights: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum reasonable indent size
    const MAX_INDENT: usize = 16;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.indent == 0 {
            return Some("indent must be at least 1".to_string());
        }
        if self.indent > Self::MAX_INDENT {
            return Some(format!(
                "indent {} exceeds maximum of {}",
                self.indent,
                Self::MAX_INDENT
            ));
        }
        if self.groups.is_empty() {
            return Some("at least one import group is required".to_string());
        }
        let default_count = self.groups.iter().filter(|g| g.default).count();
        if default_count != 1 {
            return Some(format!(
                "exactly one group must be marked default, found {default_count}"
            ));
        }
        let mut names = std::collections::HashSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                return Some("group names must not be empty".to_string());
            }
            if !names.insert(group.name.as_str()) {
                return Some(format!("duplicate group name '{}'", group.name));
            }
            if let Some(pattern) = &group.pattern {
                if let Err(e) = Regex::new(pattern) {
                    return Some(format!("invalid pattern for group '{}': {e}", group.name));
                }
            }
            for pattern in &group.priority_patterns {
                if let Err(e) = Regex::new(pattern) {
                    return Some(format!(
                        "invalid priority pattern for group '{}': {e}",
                        group.name
                    ));
                }
            }
        }
        None
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.indent {
            self.indent = v;
        }
        if let Some(v) = partial.quote {
            self.quote = v;
        }
        if let Some(v) = partial.group_comments {
            self.group_comments = v;
        }
        // A group list replaces the previous one wholesale: merging two group
        // lists element-wise has no sensible meaning
        if let Some(v) = &partial.groups {
            self.groups = v.clone();
        }
        // Merge weight dictionary (partial values override)
        for (k, v) in &partial.kind_weights {
            self.kind_weights.insert(k.clone(), *v);
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home
    /// directory config. Returns list of config file paths in order of
    /// priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Add home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        // Start from the file's parent directory (or the path itself if it's a directory)
        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            // Path doesn't exist, use current directory
            std::env::current_dir().ok()
        };

        // Collect config files from parent directories (from root to current)
        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Reverse so we go from root to current (less specific to more specific)
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);

        if config_files.is_empty() {
            return Self::default();
        }

        let mut config = Self::default();
        for path in &config_files {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => eprintln!("Warning: failed to parse {}: {e}", path.display()),
                },
                Err(e) => eprintln!("Warning: failed to read {}: {e}", path.display()),
            }
        }
        config
    }

    /// Get the declaration-kind weight array from defaults and dictionary
    /// overrides
    ///
    /// Returns a 5-element array of sort weights, indexed by kind:
    /// 0: default imports
    /// 1: named imports
    /// 2: type default imports
    /// 3: type named imports
    /// 4: side-effect imports
    #[must_use]
    pub fn get_kind_weights(&self) -> [i64; 5] {
        let mut weights = [0, 1, 2, 3, 4];

        // Mapping from dictionary keys to array indices
        let mapping = [
            ("default", 0),
            ("named", 1),
            ("type_default", 2),
            ("type_named", 3),
            ("side_effect", 4),
        ];

        for (key, idx) in &mapping {
            if let Some(&value) = self.kind_weights.get(*key) {
                weights[*idx] = value;
            }
        }

        weights
    }

    /// Index of the default group in `groups`
    #[must_use]
    pub fn default_group_index(&self) -> Option<usize> {
        self.groups.iter().position(|g| g.default)
    }
}
