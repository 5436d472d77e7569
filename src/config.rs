use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, IoResultExt, Result};

/// default name of the single tracked branch
pub const DEFAULT_BRANCH: &str = "master";

/// repository configuration stored in config.toml
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// branch whose ref acts as head
    #[serde(default = "default_branch")]
    pub branch: String,
    /// glob patterns for top-level names hidden from status
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl Config {
    /// load config from file, validating branch name and ignore patterns
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// load config, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_path(path)?;
        Ok(())
    }

    /// compiled ignore patterns
    pub fn ignore_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.ignore
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| Error::InvalidIgnorePattern {
                    pattern: p.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }

    fn validate(&self) -> Result<()> {
        crate::refs::validate_ref_name(&self.branch)?;
        self.ignore_patterns()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            branch: default_branch(),
            ignore: vec![],
        }
    }
}
