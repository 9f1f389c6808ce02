#[cfg(feature = "cli")]
pub mod cli;
pub mod site_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LocalStorage};
pub use site_config::SiteConfig;

/// Where the CMS is reached from. A server-side deployment talks to the
/// container over the internal network; a browser-facing one goes through the
/// public proxy path to avoid CORS issues.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub internal_url: String,
    pub public_url: String,
    pub server_side: bool,
    /// Default response-cache TTL for queries that do not set their own
    /// `revalidate`. `None` keeps the built-in default.
    pub revalidate_seconds: Option<u64>,
}

pub const DEFAULT_INTERNAL_URL: &str = "http://geotech_cms:8055";
pub const DEFAULT_PUBLIC_URL: &str = "/directus";

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            internal_url: DEFAULT_INTERNAL_URL.to_string(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            server_side: true,
            revalidate_seconds: None,
        }
    }
}

impl CmsConfig {
    /// Resolve URLs from the environment, falling back to the compose-network
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            internal_url: std::env::var("DIRECTUS_URL_INTERNAL")
                .unwrap_or_else(|_| DEFAULT_INTERNAL_URL.to_string()),
            public_url: std::env::var("CMS_PUBLIC_URL")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string()),
            server_side: true,
            revalidate_seconds: None,
        }
    }

    pub fn base_url(&self) -> &str {
        if self.server_side {
            &self.internal_url
        } else {
            &self.public_url
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_resolution_is_a_single_conditional() {
        let mut config = CmsConfig::default();
        assert_eq!(config.base_url(), DEFAULT_INTERNAL_URL);

        config.server_side = false;
        assert_eq!(config.base_url(), DEFAULT_PUBLIC_URL);
    }
}
