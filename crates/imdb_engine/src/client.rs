use std::sync::Arc;

use futures_util::{stream, StreamExt};
use imdb_core::{extract_title, result_id, search_results, TitleRecord};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};
use serde_json::Value;
use url::Url;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::page::{decode_body, next_data};
use crate::{FetchError, ScrapeError};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Origin serving the mobile search and title pages.
    pub base_url: String,
    /// Most search results expanded by [`ImdbClient::search_full_info`].
    pub full_info_limit: usize,
    /// Detail fetches in flight at once during a full-info expansion.
    pub full_info_concurrency: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "https://m.imdb.com".to_string(),
            full_info_limit: 20,
            full_info_concurrency: 4,
        }
    }
}

/// Stateless scraping service shared by all requests.
#[derive(Clone)]
pub struct ImdbClient {
    fetcher: Arc<dyn Fetcher>,
    settings: ClientSettings,
}

impl ImdbClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: ClientSettings) -> Self {
        Self { fetcher, settings }
    }

    pub fn with_reqwest(
        fetch: FetchSettings,
        settings: ClientSettings,
    ) -> Result<Self, FetchError> {
        Ok(Self::new(Arc::new(ReqwestFetcher::new(fetch)?), settings))
    }

    /// `{base}/find/?q={query}`
    pub fn search_url(&self, query: &str) -> Result<Url, ScrapeError> {
        let mut url = self.endpoint(&["find", ""])?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    /// `{base}/title/{imdb_id}/`
    pub fn title_url(&self, imdb_id: &str) -> Result<Url, ScrapeError> {
        self.endpoint(&["title", imdb_id, ""])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ScrapeError> {
        let invalid = |message: String| ScrapeError::InvalidUrl {
            base: self.settings.base_url.clone(),
            message,
        };
        let mut url = Url::parse(&self.settings.base_url).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn page_data(&self, url: &Url) -> Result<Value, ScrapeError> {
        let output = self.fetcher.fetch(url.as_str()).await?;
        if output.final_url != url.as_str() {
            scrape_info!("{} redirected to {}", url, output.final_url);
        }
        let html = decode_body(&output.bytes, output.content_type.as_deref());
        Ok(next_data(&html)?)
    }

    /// Search results for `query`, passed through as the upstream lists them.
    pub async fn search(&self, query: &str) -> Result<Vec<Value>, ScrapeError> {
        let url = self.search_url(query)?;
        let results = search_results(&self.page_data(&url).await?);
        scrape_debug!("search {:?}: {} results", query, results.len());
        Ok(results)
    }

    /// Detail record for one title.
    pub async fn title(&self, imdb_id: &str) -> Result<TitleRecord, ScrapeError> {
        let url = self.title_url(imdb_id)?;
        let document = self.page_data(&url).await?;
        Ok(extract_title(&document, imdb_id)?)
    }

    /// Searches, then fetches the detail record of every result.
    ///
    /// Only the search step can fail the call. Results without an id, and
    /// results whose detail fetch fails, are logged and left out; the rest
    /// keep search order.
    pub async fn search_full_info(&self, query: &str) -> Result<Vec<TitleRecord>, ScrapeError> {
        let results = self.search(query).await?;

        let mut ids = Vec::with_capacity(results.len());
        for (position, result) in results.iter().enumerate() {
            match result_id(result) {
                Some(id) => ids.push(id.to_string()),
                None => scrape_warn!("search {:?}: result {} has no id, skipping", query, position),
            }
        }
        if ids.len() > self.settings.full_info_limit {
            scrape_info!(
                "search {:?}: expanding first {} of {} results",
                query,
                self.settings.full_info_limit,
                ids.len()
            );
            ids.truncate(self.settings.full_info_limit);
        }

        let mut outcomes = stream::iter(ids.into_iter().enumerate())
            .map(|(position, id)| {
                let client = self.clone();
                async move {
                    let outcome = client.title(&id).await;
                    (position, id, outcome)
                }
            })
            .buffer_unordered(self.settings.full_info_concurrency.max(1))
            .collect::<Vec<_>>()
            .await;
        outcomes.sort_by_key(|(position, _, _)| *position);

        Ok(outcomes
            .into_iter()
            .filter_map(|(_, id, outcome)| match outcome {
                Ok(record) => Some(record),
                Err(err) => {
                    scrape_warn!("full info for {}: {}", id, err);
                    None
                }
            })
            .collect())
    }
}
