use crate::core::error::FetchError;
use crate::core::history::{EvolutionQuery, HistoryProvider, TotalPurchases, TvlPoint};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

const TOTAL_PURCHASES_PATH: &str = "/api/total-purchases";
const TVL_EVOLUTION_PATH: &str = "/api/tvl-evolution";

/// REST client for the dashboard backend.
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tvldash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(BackendClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let mut url = reqwest::Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| FetchError::Transport(format!("invalid backend URL: {e}")))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        debug!("Requesting {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("{e} for {url}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| FetchError::malformed(path, e))
    }
}

#[async_trait]
impl HistoryProvider for BackendClient {
    #[instrument(name = "TotalPurchasesFetch", skip(self))]
    async fn total_purchases(&self) -> Result<TotalPurchases, FetchError> {
        self.get_json(TOTAL_PURCHASES_PATH, &[]).await
    }

    #[instrument(name = "TvlEvolutionFetch", skip(self), fields(granularity = %query.granularity))]
    async fn tvl_evolution(&self, query: &EvolutionQuery) -> Result<Vec<TvlPoint>, FetchError> {
        self.get_json(TVL_EVOLUTION_PATH, &query.to_params()).await
    }
}
