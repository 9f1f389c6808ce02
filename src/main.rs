use clap::Parser;
use geotech_hub::utils::{logger, validation::Validate};
use geotech_hub::{CliConfig, CmsClient, CmsConfig, LocalStorage, SiteConfig, SnapshotEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting geotech-hub snapshot export");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // Optional TOML site config. CMS flags override it; the snapshot section
    // overrides the default output path.
    let site_config = match &cli.config {
        Some(path) => {
            let config = match SiteConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("❌ Failed to load config {}: {}", path, e);
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
            Some(config)
        }
        None => None,
    };

    let mut cms_config = site_config
        .as_ref()
        .map(|c| c.cms_config())
        .unwrap_or_else(CmsConfig::from_env);
    if let Some(url) = &cli.cms_url {
        cms_config.internal_url = url.clone();
    }
    if cli.public_proxy {
        cms_config.server_side = false;
    }
    tracing::info!("CMS base URL: {}", cms_config.base_url());

    let output_path = site_config
        .as_ref()
        .and_then(|c| c.snapshot.as_ref())
        .map(|s| s.output_path.clone())
        .unwrap_or_else(|| cli.output_path.clone());

    let storage = LocalStorage::new(output_path.clone());
    let engine = SnapshotEngine::new(CmsClient::new(&cms_config), storage);

    match engine.run().await {
        Ok(file) => {
            tracing::info!("✅ Snapshot export completed successfully!");
            println!("✅ Snapshot export completed successfully!");
            println!("📁 Output saved to: {}/{}", output_path, file);
        }
        Err(e) => {
            tracing::error!("❌ Snapshot export failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
