use crate::config::CmsConfig;
use crate::utils::error::{HubError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deployment configuration loaded from a TOML file. Values support `${VAR}`
/// environment substitution, so the same file works across environments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub cms: CmsSection,
    pub backend: BackendSection,
    pub snapshot: Option<SnapshotSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsSection {
    pub internal_url: String,
    pub public_url: Option<String>,
    pub server_side: Option<bool>,
    pub revalidate_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSection {
    pub base_url: String,
    pub session_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSection {
    pub output_path: String,
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HubError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| HubError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` with the environment value; unknown variables are
    /// left in place so validation can point at them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn cms_config(&self) -> CmsConfig {
        let defaults = CmsConfig::default();
        CmsConfig {
            internal_url: self.cms.internal_url.clone(),
            public_url: self
                .cms
                .public_url
                .clone()
                .unwrap_or(defaults.public_url),
            server_side: self.cms.server_side.unwrap_or(true),
            revalidate_seconds: self.cms.revalidate_seconds,
        }
    }

    pub fn output_path(&self) -> &str {
        self.snapshot
            .as_ref()
            .map(|s| s.output_path.as_str())
            .unwrap_or("./output")
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("cms.internal_url", &self.cms.internal_url)?;
        validation::validate_url("backend.base_url", &self.backend.base_url)?;
        if let Some(snapshot) = &self.snapshot {
            validation::validate_path("snapshot.output_path", &snapshot.output_path)?;
        }
        Ok(())
    }
}
