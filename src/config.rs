//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/wordtree/wordtree.toml`
//! 3. Local config: `<dir>/.wordtree.toml` (`-C <dir>` or current directory)
//! 4. Environment variables: `WORDTREE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::{DictionaryOptions, DEFAULT_SEED_WORDS};
use crate::application::ApplicationError;

/// File name of the local (per-directory) config.
pub const LOCAL_CONFIG_FILE: &str = ".wordtree.toml";

/// Raw settings for intermediate parsing (None = not specified, inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub dictionary_path: Option<PathBuf>,
    pub seed_words: Option<Vec<String>>,
    pub autosave: Option<bool>,
}

/// Unified configuration for wordtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Word list file backing the dictionary
    pub dictionary_path: PathBuf,
    /// Words used to seed a dictionary whose file does not exist yet
    pub seed_words: Vec<String>,
    /// Persist after every change (default: true)
    pub autosave: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dictionary_path: default_dictionary_path(),
            seed_words: DEFAULT_SEED_WORDS.iter().map(|w| w.to_string()).collect(),
            autosave: true,
        }
    }
}

/// Default dictionary location: `<data dir>/wordtree/dictionary.txt`.
fn default_dictionary_path() -> PathBuf {
    ProjectDirs::from("", "", "wordtree")
        .map(|dirs| dirs.data_dir().join("dictionary.txt"))
        .unwrap_or_else(|| PathBuf::from("dictionary.txt"))
}

/// Get the XDG config directory for wordtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wordtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("wordtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for pattern in overlay {
            if let Some(negated) = pattern.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(pattern.clone());
            }
        }

        // Convert to sorted Vec for deterministic output
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Expand shell variables and tilde in the dictionary path.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.dictionary_path.to_string_lossy().as_ref());
        self.dictionary_path = PathBuf::from(expanded);
    }

    /// Apply global config onto defaults.
    ///
    /// Seed words REPLACE the compiled defaults if specified.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            dictionary_path: global
                .dictionary_path
                .clone()
                .unwrap_or_else(|| self.dictionary_path.clone()),
            seed_words: global
                .seed_words
                .clone()
                .unwrap_or_else(|| self.seed_words.clone()),
            autosave: global.autosave.unwrap_or(self.autosave),
        }
    }

    /// Merge local config onto self.
    ///
    /// - Scalars: local wins if specified
    /// - Seed words: union merge with `!word` negation
    /// - A relative dictionary path resolves against the local config's directory
    fn merge_local(&self, local: &RawSettings, local_dir: &Path) -> Self {
        let dictionary_path = match &local.dictionary_path {
            Some(path) => {
                let expanded = PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()));
                if expanded.is_absolute() {
                    expanded
                } else {
                    local_dir.join(expanded)
                }
            }
            None => self.dictionary_path.clone(),
        };

        Self {
            dictionary_path,
            seed_words: local
                .seed_words
                .as_ref()
                .map(|o| Self::merge_array(&self.seed_words, o))
                .unwrap_or_else(|| self.seed_words.clone()),
            autosave: local.autosave.unwrap_or(self.autosave),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.wordtree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config (seed words REPLACE defaults)
    /// 3. Local config (seed words UNION with global)
    /// 4. Environment variables: `WORDTREE_*` prefix (REPLACES - explicit override)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), local_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config file.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global_path {
            debug!("load: global config {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.apply_global(&raw);
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_local(&raw, dir);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply WORDTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("WORDTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("seed_words"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("dictionary_path") {
            settings.dictionary_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("seed_words") {
            settings.seed_words = val;
        }
        if let Ok(val) = config.get_bool("autosave") {
            settings.autosave = val;
        }

        Ok(settings)
    }

    /// Options for opening the dictionary described by these settings.
    pub fn dictionary_options(&self) -> DictionaryOptions {
        DictionaryOptions {
            path: self.dictionary_path.clone(),
            seed_words: self.seed_words.clone(),
            autosave: self.autosave,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# wordtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/wordtree/wordtree.toml  (defines your baseline)
#   Local:  <dir>/.wordtree.toml              (directory-specific additions)
#   Env:    WORDTREE_* environment variables  (explicit overrides)
#
# Seed word merge semantics:
#   Global config REPLACES the compiled defaults.
#   Local config UNIONS with global. Use "!word" to REMOVE an inherited word:
#     seed_words = ["livro", "!mouse"]

# Word list file (one word per line). Relative paths in a local config
# resolve against the config's directory.
# dictionary_path = "~/.local/share/wordtree/dictionary.txt"

# Words inserted when the dictionary file does not exist yet
# seed_words = ["casa", "carro", "mesa"]

# Save after every insert/remove
# autosave = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None).expect("load defaults");
        assert!(settings
            .dictionary_path
            .to_string_lossy()
            .ends_with("dictionary.txt"));
        assert_eq!(settings.seed_words.len(), DEFAULT_SEED_WORDS.len());
        assert!(settings.autosave);
    }

    #[test]
    fn given_tilde_in_dictionary_path_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            dictionary_path: PathBuf::from("~/words.txt"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.dictionary_path.to_string_lossy();
        assert!(path.starts_with(&home), "should start with home: {}", path);
        assert!(!path.contains('~'));
    }

    #[test]
    fn given_global_seed_words_when_loading_then_replaces_defaults() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("wordtree.toml");
        fs::write(&global, "seed_words = [\"alpha\", \"beta\"]\n").unwrap();

        let settings = Settings::load_from(Some(global.as_path()), None).unwrap();

        assert_eq!(settings.seed_words, vec!["alpha", "beta"]);
    }

    #[test]
    fn given_global_and_local_seed_words_when_loading_then_unions_with_negation() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("wordtree.toml");
        fs::write(&global, "seed_words = [\"alpha\", \"beta\"]\n").unwrap();
        let local_dir = dir.path().join("project");
        fs::create_dir_all(&local_dir).unwrap();
        fs::write(
            local_config_path(&local_dir),
            "seed_words = [\"gamma\", \"!alpha\"]\nautosave = false\n",
        )
        .unwrap();

        let settings = Settings::load_from(Some(global.as_path()), Some(local_dir.as_path())).unwrap();

        assert_eq!(settings.seed_words, vec!["beta", "gamma"]);
        assert!(!settings.autosave);
    }

    #[test]
    fn given_relative_local_dictionary_path_then_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            local_config_path(dir.path()),
            "dictionary_path = \"data/words.txt\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(None, Some(dir.path())).unwrap();

        assert_eq!(settings.dictionary_path, dir.path().join("data/words.txt"));
    }

    #[test]
    fn given_invalid_toml_when_loading_then_returns_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(local_config_path(dir.path()), "autosave = [").unwrap();

        let err = Settings::load_from(None, Some(dir.path())).unwrap_err();

        assert!(matches!(err, ApplicationError::Config { .. }));
    }

    #[test]
    fn test_merge_array_union() {
        let base = vec!["a".to_string(), "b".to_string()];
        let overlay = vec!["c".to_string(), "a".to_string()];
        let result = Settings::merge_array(&base, &overlay);

        assert_eq!(result, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_array_negation() {
        let base = vec!["a".to_string(), "b".to_string()];
        let overlay = vec!["!a".to_string(), "c".to_string()];
        let result = Settings::merge_array(&base, &overlay);

        assert_eq!(result, vec!["b", "c"]);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.dictionary_path.is_none());
        assert!(raw.seed_words.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_toml() {
        let settings = Settings::default();
        let rendered = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, settings);
    }
}
