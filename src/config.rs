//! Report configuration.
//!
//! Values come from an optional TOML file; CLI flags override the file,
//! which overrides the defaults below.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT: &str = "family-report.xml";
const DEFAULT_COMMENT: &str = "Families and family types in the project";

/// What to do with a system family type that has no family-name key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Drop the record and log a warning.
    #[default]
    Skip,
    /// Abort the run.
    Fail,
}

/// Element names used in the XML report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    pub root: String,
    pub user_families: String,
    pub system_families: String,
    pub category: String,
    pub family: String,
    pub family_type: String,
    pub system_category: String,
    pub system_type: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            root: "ProjectFamilies".into(),
            user_families: "UserFamilies".into(),
            system_families: "SystemFamilies".into(),
            category: "Category".into(),
            family: "Family".into(),
            family_type: "Type".into(),
            system_category: "SystemCategory".into(),
            system_type: "Type".into(),
        }
    }
}

impl ReportLabels {
    fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("root", &self.root),
            ("user_families", &self.user_families),
            ("system_families", &self.system_families),
            ("category", &self.category),
            ("family", &self.family),
            ("family_type", &self.family_type),
            ("system_category", &self.system_category),
            ("system_type", &self.system_type),
        ]
    }
}

/// Settings for one report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output XML path, overwritten on every run.
    pub output: PathBuf,
    /// Text of the comment written after the XML declaration.
    pub comment: String,
    pub missing_key_policy: MissingKeyPolicy,
    pub labels: ReportLabels,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            comment: DEFAULT_COMMENT.into(),
            missing_key_policy: MissingKeyPolicy::default(),
            labels: ReportLabels::default(),
        }
    }
}

impl ReportConfig {
    /// Checks that every label is a usable element name and that the comment
    /// can be written inside `<!-- -->`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.labels.fields() {
            if !is_element_name(value) {
                return Err(ConfigError::InvalidLabel {
                    field,
                    value: value.to_string(),
                });
            }
        }
        if self.comment.contains("--") || self.comment.ends_with('-') {
            return Err(ConfigError::InvalidComment);
        }
        Ok(())
    }
}

/// Loads a config from a TOML file. Missing keys take their defaults.
pub fn load_config_from(path: &Path) -> Result<ReportConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ReportConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(?path, "loaded report config");
    config.validate()?;
    Ok(config)
}

// Conservative subset of the XML Name production; any Unicode letter is
// accepted so localized labels work.
fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("xml")) {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
