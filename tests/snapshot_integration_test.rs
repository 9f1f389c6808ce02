use anyhow::Result;
use geotech_hub::cms::CmsClient;
use geotech_hub::core::{SiteContent, SnapshotEngine, SNAPSHOT_FILE};
use geotech_hub::LocalStorage;
use httpmock::prelude::*;
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn test_snapshot_with_unreachable_cms_writes_full_fallback_content() -> Result<()> {
    let dir = tempdir()?;
    let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());

    // Nothing listens on the discard port; every fetch degrades.
    let cms = CmsClient::with_base_url("http://127.0.0.1:9");
    let engine = SnapshotEngine::new(cms, storage);

    let file = engine.run().await?;
    assert_eq!(file, SNAPSHOT_FILE);

    let raw = std::fs::read_to_string(dir.path().join(SNAPSHOT_FILE))?;
    let content: SiteContent = serde_json::from_str(&raw)?;

    assert_eq!(content.machinery.len(), 8);
    assert_eq!(content.services.len(), 10);
    assert_eq!(content.projects.len(), 5);
    assert_eq!(content.articles.len(), 3);
    assert_eq!(content.article_categories.len(), 6);
    assert_eq!(content.sheet_piles.len(), 11);
    assert_eq!(content.sheet_pile_series.len(), 6);

    Ok(())
}

#[tokio::test]
async fn test_snapshot_mixes_cms_content_with_fallbacks() -> Result<()> {
    let server = MockServer::start();
    // Only the machinery collection answers; everything else errors out.
    server.mock(|when, then| {
        when.method(GET).path("/items/machinery");
        then.status(200).json_body(json!({
            "data": [{
                "id": "liebherr-lb44",
                "name": "Liebherr LB 44",
                "category": "drilling",
                "category_label": "Буровая установка",
                "accent_color": "yellow"
            }]
        }));
    });
    server.mock(|when, then| {
        when.method(GET);
        then.status(503);
    });

    let dir = tempdir()?;
    let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
    let engine = SnapshotEngine::new(CmsClient::with_base_url(server.base_url()), storage);

    let content = engine.collect().await;

    assert_eq!(content.machinery.len(), 1);
    assert_eq!(content.machinery[0].id, "liebherr-lb44");
    // The failing collections still come back populated.
    assert_eq!(content.services.len(), 10);
    assert_eq!(content.projects.len(), 5);

    Ok(())
}

#[tokio::test]
async fn test_snapshot_file_is_nested_under_output_path() -> Result<()> {
    let dir = tempdir()?;
    let nested = dir.path().join("exports").join("latest");
    let storage = LocalStorage::new(nested.to_string_lossy().to_string());

    let engine = SnapshotEngine::new(CmsClient::with_base_url("http://127.0.0.1:9"), storage);
    engine.run().await?;

    assert!(nested.join(SNAPSHOT_FILE).is_file());
    Ok(())
}
