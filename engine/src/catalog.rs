use alerting::ports::CatalogPort;
use anyhow::{Context, Result};
use preorder_core::ItemDetails;
use reqwest::Client;
use tracing::info;

/// HTTP client for the store's preorder item feed. One fetch per run; a
/// failure here is fatal for the whole pass (no partial dispatch).
pub struct StoreCatalog {
    client: Client,
    base_url: String,
}

impl StoreCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl CatalogPort for StoreCatalog {
    async fn fetch_items(&self, fill_preorder_period: bool) -> Result<Vec<ItemDetails>> {
        let url = format!("{}/items", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("fill_preorder_period", fill_preorder_period)])
            .send()
            .await
            .context("catalog request failed")?
            .error_for_status()
            .context("catalog returned an error status")?;

        let items: Vec<ItemDetails> = response
            .json()
            .await
            .context("catalog response did not decode")?;

        info!(count = items.len(), "fetched catalog snapshot");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let catalog = StoreCatalog::new("https://store.example/api/");
        assert_eq!(catalog.base_url, "https://store.example/api");
    }

    #[test]
    fn items_deserialize_with_and_without_windows() {
        let payload = r#"[
            {
                "title": "Figure A",
                "link": "https://store.example/a",
                "preorder_period": {
                    "start_time": "2026-01-01T00:00:00Z",
                    "end_time": "2026-02-01T10:00:00Z"
                }
            },
            { "title": "Figure B", "link": "https://store.example/b" }
        ]"#;

        let items: Vec<ItemDetails> = serde_json::from_str(payload).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].preorder_period.is_some());
        assert!(items[1].preorder_period.is_none());
    }
}
