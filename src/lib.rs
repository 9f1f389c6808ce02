pub mod api;
pub mod cms;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use api::{ApiError, BackendClient, Session, SessionStore};
pub use cms::{CmsClient, QueryOptions};
pub use config::{CmsConfig, SiteConfig};
pub use core::{SiteContent, SnapshotEngine, Storage};
pub use utils::error::{HubError, Result};
