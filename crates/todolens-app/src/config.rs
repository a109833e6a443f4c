//! Aggregator configuration loaded from `.todolens/config.toml`.

use std::{collections::HashSet, fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use todolens_core::SortKey;

const CONFIG_DIR: &str = ".todolens";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TodoConfig {
    /// Ordering of the todo list.
    #[serde(default)]
    pub sort: SortConfig,
    /// Shape of the selection grid.
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Saved-query commit behaviour.
    #[serde(default)]
    pub saved_queries: SavedQueryConfig,
}

impl TodoConfig {
    /// Load configuration from `<dir>/.todolens/config.toml`, falling back to defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to load {}", config_path.display()))
    }

    /// Parse and validate configuration text.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.sort.ensure_valid_keys()?;
        self.selection.ensure_valid_groups()
    }
}

/// Sort key configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SortConfig {
    #[serde(default = "default_sort_keys")]
    keys: Vec<SortKey>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            keys: default_sort_keys(),
        }
    }
}

fn default_sort_keys() -> Vec<SortKey> {
    SortKey::DEFAULT_ORDER.to_vec()
}

impl SortConfig {
    /// Configuration ordering by the given keys.
    pub const fn from_keys(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Composite sort key, most significant first.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    fn ensure_valid_keys(&self) -> Result<()> {
        if self.keys.is_empty() {
            bail!("sort keys must not be empty");
        }
        let mut seen = HashSet::new();
        for key in &self.keys {
            if !seen.insert(key) {
                bail!("duplicate sort key detected: {}", key.as_str());
            }
        }
        Ok(())
    }
}

/// Selection grid configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// Number of page or group columns.
    #[serde(default = "default_groups")]
    pub groups: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
        }
    }
}

const fn default_groups() -> usize {
    1
}

impl SelectionConfig {
    fn ensure_valid_groups(&self) -> Result<()> {
        if self.groups == 0 {
            bail!("selection groups must be at least 1");
        }
        Ok(())
    }
}

/// When a saved-query change is applied to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Apply only once the collaborator confirms.
    #[default]
    AfterConfirm,
    /// Apply locally whatever the collaborator answers.
    Optimistic,
}

/// Saved-query configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SavedQueryConfig {
    /// Commit policy for save and remove.
    #[serde(default)]
    pub commit: CommitPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = TodoConfig::from_dir(dir.path())?;
        assert_eq!(cfg.sort.keys(), &SortKey::DEFAULT_ORDER);
        assert_eq!(cfg.selection.groups, 1);
        assert_eq!(cfg.saved_queries.commit, CommitPolicy::AfterConfirm);
        Ok(())
    }

    #[test]
    fn load_config_from_dir() -> Result<()> {
        let dir = tempdir()?;
        let cfg_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir)?;
        let mut file = fs::File::create(cfg_dir.join(CONFIG_FILE))?;
        writeln!(
            file,
            "[sort]\nkeys = [\"project_name\", \"due_date\"]\n\n[selection]\ngroups = 3\n\n[saved_queries]\ncommit = \"optimistic\""
        )?;

        let cfg = TodoConfig::from_dir(dir.path())?;
        assert_eq!(cfg.sort.keys(), &[SortKey::ProjectName, SortKey::DueDate]);
        assert_eq!(cfg.selection.groups, 3);
        assert_eq!(cfg.saved_queries.commit, CommitPolicy::Optimistic);
        Ok(())
    }

    #[test]
    fn partial_sections_keep_defaults() -> Result<()> {
        let cfg = TodoConfig::from_toml_str("[sort]\n[selection]\n")?;
        assert_eq!(cfg.sort.keys(), &SortKey::DEFAULT_ORDER);
        assert_eq!(cfg.selection.groups, 1);
        Ok(())
    }

    #[test]
    fn duplicate_sort_keys_are_rejected() {
        let Err(err) = TodoConfig::from_toml_str("[sort]\nkeys = [\"name\", \"name\"]") else {
            panic!("duplicate sort key should error");
        };
        assert!(err.to_string().contains("duplicate sort key detected: name"));
    }

    #[test]
    fn empty_sort_keys_are_rejected() {
        let Err(err) = TodoConfig::from_toml_str("[sort]\nkeys = []") else {
            panic!("empty sort keys should error");
        };
        assert!(err.to_string().contains("sort keys must not be empty"));
    }

    #[test]
    fn zero_selection_groups_are_rejected() {
        let Err(err) = TodoConfig::from_toml_str("[selection]\ngroups = 0") else {
            panic!("zero groups should error");
        };
        assert!(err.to_string().contains("selection groups must be at least 1"));
    }

    #[test]
    fn unknown_sort_keys_fail_to_parse() {
        let Err(err) = TodoConfig::from_toml_str("[sort]\nkeys = [\"colour\"]") else {
            panic!("unknown sort key should error");
        };
        assert!(err.to_string().contains("failed to parse configuration"));
    }

    #[test]
    fn invalid_file_reports_path() -> Result<()> {
        let dir = tempdir()?;
        let cfg_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir)?;
        fs::write(cfg_dir.join(CONFIG_FILE), "[selection]\ngroups = 0\n")?;

        let Err(err) = TodoConfig::from_dir(dir.path()) else {
            panic!("invalid config should error");
        };
        assert!(err.to_string().contains("config.toml"));
        assert!(format!("{err:#}").contains("selection groups must be at least 1"));
        Ok(())
    }
}
