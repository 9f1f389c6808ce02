use crate::core::Storage;
use crate::utils::error::Result;
use async_trait::async_trait;
use clap::Parser;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "geotech-hub")]
#[command(about = "Exports all Geotech Hub site content to a JSON snapshot")]
pub struct CliConfig {
    /// CMS base URL (overrides DIRECTUS_URL_INTERNAL)
    #[arg(long)]
    pub cms_url: Option<String>,

    /// Resolve the CMS through the public proxy path instead of the internal
    /// network address
    #[arg(long)]
    pub public_proxy: bool,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Optional TOML site configuration file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
