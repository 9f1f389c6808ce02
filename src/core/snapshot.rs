use crate::cms::CmsClient;
use crate::core::Storage;
use crate::domain::journal::{self, ArticleQuery};
use crate::domain::{machinery, projects, services, sheet_piles};
use crate::domain::{Article, Machinery, Project, Service, SheetPile, SheetPileSeries};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SNAPSHOT_FILE: &str = "site_content.json";

/// Every content collection the site renders, in its frontend shape.
/// Guaranteed non-empty per domain: fetches that fail degrade to the
/// hardcoded fallback datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteContent {
    pub machinery: Vec<Machinery>,
    pub services: Vec<Service>,
    pub projects: Vec<Project>,
    pub articles: Vec<Article>,
    pub article_categories: Vec<String>,
    pub sheet_piles: Vec<SheetPile>,
    pub sheet_pile_series: Vec<SheetPileSeries>,
    pub generated_at: DateTime<Utc>,
}

/// Pulls all site content concurrently and writes one JSON document through
/// the storage port.
pub struct SnapshotEngine<S: Storage> {
    cms: CmsClient,
    storage: S,
}

impl<S: Storage> SnapshotEngine<S> {
    pub fn new(cms: CmsClient, storage: S) -> Self {
        Self { cms, storage }
    }

    pub async fn collect(&self) -> SiteContent {
        // The fetches are independent and idempotent; fire them together and
        // await the lot.
        let article_query = ArticleQuery::default();
        let (machinery, services, projects, articles, article_categories, sheet_piles) = tokio::join!(
            machinery::fetch_machinery(&self.cms, None),
            services::fetch_services(&self.cms),
            projects::fetch_projects(&self.cms, None),
            journal::fetch_articles(&self.cms, &article_query),
            journal::fetch_article_categories(&self.cms),
            sheet_piles::fetch_sheet_piles(&self.cms, None),
        );
        let sheet_pile_series = sheet_piles::fetch_sheet_pile_series(&self.cms).await;

        SiteContent {
            machinery,
            services,
            projects,
            articles,
            article_categories,
            sheet_piles,
            sheet_pile_series,
            generated_at: Utc::now(),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Collecting site content from CMS");
        let content = self.collect().await;
        tracing::info!(
            machinery = content.machinery.len(),
            services = content.services.len(),
            projects = content.projects.len(),
            articles = content.articles.len(),
            sheet_piles = content.sheet_piles.len(),
            "Content collected"
        );

        let body = serde_json::to_vec_pretty(&content)?;
        self.storage.write_file(SNAPSHOT_FILE, &body).await?;
        tracing::info!(file = SNAPSHOT_FILE, bytes = body.len(), "Snapshot written");

        Ok(SNAPSHOT_FILE.to_string())
    }
}
