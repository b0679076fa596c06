use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::grammar::CompareOptions;
use crate::value::ValueOptions;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub values: ValuesConfig,
    #[serde(default)]
    pub expand: ExpandConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ordering of command tokens.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CompareConfig {
    #[serde(default)]
    pub case_insensitive: bool,
    /// Byte-wise ordering; version-aware when false.
    #[serde(default)]
    pub lexicographic: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ValuesConfig {
    #[serde(default)]
    pub bool_on_off: bool,
    #[serde(default)]
    pub bool_enable_disable: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExpandConfig {
    #[serde(default = "default_choice_delimiters")]
    pub choice_delimiters: String,
    /// Keep a callback-expanded variable in the shadow next to its
    /// alternatives.
    #[serde(default)]
    pub keep_expanded_variable: bool,
    /// Labels filtered out of every shadow.
    #[serde(default)]
    pub default_filters: Vec<String>,
    /// Reference label prefix naming a label to filter in the inlined tree.
    #[serde(default = "default_remove_prefix")]
    pub remove_prefix: String,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            choice_delimiters: default_choice_delimiters(),
            keep_expanded_variable: false,
            default_filters: Vec::new(),
            remove_prefix: default_remove_prefix(),
        }
    }
}

fn default_choice_delimiters() -> String {
    ",|".into()
}

fn default_remove_prefix() -> String {
    "@remove:".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    File,
    Stderr,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub target: LogTarget,
    /// Log file for the `file` target; defaults under ~/.local/share/cligen.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            target: LogTarget::File,
            file: None,
        }
    }
}

fn default_level() -> String {
    "warn".into()
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    compare: CompareOverlay,
    #[serde(default)]
    values: ValuesOverlay,
    #[serde(default)]
    expand: ExpandOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct CompareOverlay {
    case_insensitive: Option<bool>,
    lexicographic: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct ValuesOverlay {
    bool_on_off: Option<bool>,
    bool_enable_disable: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct ExpandOverlay {
    #[serde(default)]
    replace: bool,
    choice_delimiters: Option<String>,
    keep_expanded_variable: Option<bool>,
    #[serde(default)]
    default_filters: Vec<String>,
    #[serde(default)]
    remove_default_filters: Vec<String>,
    remove_prefix: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    level: Option<String>,
    target: Option<LogTarget>,
    file: Option<PathBuf>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/cligen/config.toml (if exists)
    ///
    /// User config merges with defaults: lists extend, scalars override.
    /// Set `replace = true` in a section to replace its default lists.
    /// Use `remove_<field>` lists to subtract specific items from defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Embedded defaults with an overlay given as TOML text.
    pub fn from_overlay_str(text: &str) -> Result<Self, toml::de::Error> {
        let overlay: ConfigOverlay = toml::from_str(text)?;
        let mut config = Self::default_config();
        config.apply_overlay(overlay);
        Ok(config)
    }

    /// Try to load user overlay from ~/.config/cligen/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/cligen/config.toml");
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let c = overlay.compare;
        if let Some(v) = c.case_insensitive {
            self.compare.case_insensitive = v;
        }
        if let Some(v) = c.lexicographic {
            self.compare.lexicographic = v;
        }

        let v = overlay.values;
        if let Some(b) = v.bool_on_off {
            self.values.bool_on_off = b;
        }
        if let Some(b) = v.bool_enable_disable {
            self.values.bool_enable_disable = b;
        }

        let e = overlay.expand;
        merge_list(
            &mut self.expand.default_filters,
            e.default_filters,
            &e.remove_default_filters,
            e.replace,
        );
        if let Some(d) = e.choice_delimiters {
            self.expand.choice_delimiters = d;
        }
        if let Some(k) = e.keep_expanded_variable {
            self.expand.keep_expanded_variable = k;
        }
        if let Some(p) = e.remove_prefix {
            self.expand.remove_prefix = p;
        }

        let l = overlay.logging;
        if let Some(level) = l.level {
            self.logging.level = level;
        }
        if let Some(target) = l.target {
            self.logging.target = target;
        }
        if let Some(file) = l.file {
            self.logging.file = Some(file);
        }
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            case_insensitive: self.compare.case_insensitive,
            lexicographic: self.compare.lexicographic,
        }
    }

    pub fn value_options(&self) -> ValueOptions {
        ValueOptions {
            bool_on_off: self.values.bool_on_off,
            bool_enable_disable: self.values.bool_enable_disable,
        }
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
