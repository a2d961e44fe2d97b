use crate::error::SourceError;
use crate::query::redact_api_key;
use reqwest::Url;
use serde_json::Value;
use std::future::Future;

const USER_AGENT: &str = concat!("steel-trade-dashboard/", env!("CARGO_PKG_VERSION"));

/// Transport for the statistics API: one GET, one JSON document back.
pub trait TradeSource: Clone + Send + Sync + 'static {
    fn get_json(&self, url: Url) -> impl Future<Output = Result<Value, SourceError>> + Send;
}

/// `reqwest`-backed source. No timeout is set here; the transport's own
/// behaviour applies.
#[derive(Debug, Clone)]
pub struct HttpTradeSource {
    http_client: reqwest::Client,
}

impl HttpTradeSource {
    pub fn new() -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }
}

impl TradeSource for HttpTradeSource {
    fn get_json(&self, url: Url) -> impl Future<Output = Result<Value, SourceError>> + Send {
        let client = self.http_client.clone();
        async move {
            tracing::debug!(url = %redact_api_key(&url), "Querying steel trade API");

            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| SourceError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(SourceError::Status(status.as_u16(), error_text));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| SourceError::Decode(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpTradeSource::new().is_ok());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let source = HttpTradeSource::new().unwrap();
        let url = Url::parse("http://127.0.0.1:9/steel?api_key=k").unwrap();
        let result = source.get_json(url).await;
        assert!(matches!(result, Err(SourceError::Network(_))));
    }
}
