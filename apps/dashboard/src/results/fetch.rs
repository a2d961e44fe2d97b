use super::{aggregate, ApiResponse, ResultSet};
use crate::config::ApiConfig;
use crate::error::{FetchError, SourceError};
use crate::query::{results_url, QueryParams, ResultsVariant};
use crate::source::TradeSource;
use crate::store::{Notification, Store};
use std::sync::Arc;

/// Issues the paired results queries and reports through the store.
#[derive(Debug, Clone)]
pub struct ResultsFetcher<S> {
    config: Arc<ApiConfig>,
    source: S,
}

impl<S: TradeSource> ResultsFetcher<S> {
    pub fn new(config: ApiConfig, source: S) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }

    /// Runs the guards and, when a fetch is due, dispatches `RequestStarted`.
    ///
    /// `Ok(None)` means the query was empty and an empty success has been
    /// dispatched. `Err(AlreadyFetching)` leaves the store untouched.
    pub fn begin(
        &self,
        store: &mut Store,
        params: &QueryParams,
    ) -> Result<Option<PendingFetch<S>>, FetchError> {
        if params.is_empty_query() {
            tracing::debug!("Empty query, skipping results fetch");
            store.dispatch(Notification::ResultsReceived(None));
            return Ok(None);
        }

        if store.state().results.is_fetching() {
            tracing::debug!("Results fetch already in flight, ignoring request");
            return Err(FetchError::AlreadyFetching);
        }

        store.dispatch(Notification::RequestStarted);
        tracing::info!(
            trade_flow = ?params.trade_flow,
            reporter = ?params.reporter_countries,
            "Starting results fetch"
        );

        Ok(Some(PendingFetch {
            config: Arc::clone(&self.config),
            source: self.source.clone(),
            params: params.clone(),
        }))
    }

    /// Guards, fetches both breakdowns, and dispatches the terminal
    /// notification in one call.
    pub async fn fetch_results_if_needed(
        &self,
        store: &mut Store,
        params: &QueryParams,
    ) -> Result<Option<Arc<ResultSet>>, FetchError> {
        let Some(pending) = self.begin(store, params)? else {
            return Ok(None);
        };

        let notification = pending.run().await;
        let outcome = match &notification {
            Notification::ResultsReceived(data) => Ok(data.clone()),
            Notification::FetchFailed(error) => Err(error.clone()),
            _ => Ok(None),
        };
        store.dispatch(notification);
        outcome
    }
}

/// A started fetch. Owns everything it needs so it can be spawned.
#[derive(Debug)]
pub struct PendingFetch<S> {
    config: Arc<ApiConfig>,
    source: S,
    params: QueryParams,
}

impl<S: TradeSource> PendingFetch<S> {
    pub const fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Fetches both breakdowns concurrently and yields the terminal
    /// notification: `ResultsReceived` or `FetchFailed`.
    pub async fn run(self) -> Notification {
        match self.execute().await {
            Ok(results) => {
                tracing::info!(
                    product_groups = results.product_group_entry.len(),
                    partner_countries = results.partner_country_entry.len(),
                    periods = results.time_periods.len(),
                    "Results fetch succeeded"
                );
                Notification::ResultsReceived(Some(Arc::new(results)))
            }
            Err(error) => {
                tracing::warn!(%error, "Results fetch failed");
                Notification::FetchFailed(error)
            }
        }
    }

    async fn execute(&self) -> Result<ResultSet, FetchError> {
        let product_url = results_url(&self.config, &self.params, ResultsVariant::ProductGroup)?;
        let partner_url = results_url(&self.config, &self.params, ResultsVariant::PartnerCountry)?;

        let (product_group, partner_country) = tokio::try_join!(
            self.fetch_page(product_url),
            self.fetch_page(partner_url)
        )?;

        aggregate(product_group, partner_country, &self.params)
    }

    async fn fetch_page(&self, url: reqwest::Url) -> Result<ApiResponse, SourceError> {
        let body = self.source.get_json(url).await?;
        serde_json::from_value(body).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FlowType, TradeFlow};
    use crate::error::NoResultsReason;
    use crate::store::FetchStatus;
    use reqwest::Url;
    use serde_json::{json, Value};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    /// Answers by variant: URLs carrying `product_groups` get the product
    /// breakdown, the rest the partner breakdown.
    #[derive(Clone)]
    struct FakeSource {
        product_group: Result<Value, SourceError>,
        partner_country: Result<Value, SourceError>,
        calls: Arc<AtomicUsize>,
        /// Holds every answer until this many requests are in flight.
        gate: Option<Arc<Barrier>>,
    }

    impl FakeSource {
        fn new(product_group: Value, partner_country: Value) -> Self {
            Self {
                product_group: Ok(product_group),
                partner_country: Ok(partner_country),
                calls: Arc::new(AtomicUsize::new(0)),
                gate: None,
            }
        }

        fn gated(mut self, in_flight: usize) -> Self {
            self.gate = Some(Arc::new(Barrier::new(in_flight)));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TradeSource for FakeSource {
        fn get_json(&self, url: Url) -> impl Future<Output = Result<Value, SourceError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let is_product = url.query_pairs().any(|(k, _)| k == "product_groups");
            let answer = if is_product {
                self.product_group.clone()
            } else {
                self.partner_country.clone()
            };
            let gate = self.gate.clone();
            async move {
                if let Some(gate) = gate {
                    gate.wait().await;
                }
                answer
            }
        }
    }

    fn config() -> ApiConfig {
        ApiConfig::new("https://api.example.test/steel", "key")
    }

    fn params() -> QueryParams {
        QueryParams {
            trade_flow: Some(TradeFlow::Import),
            reporter_countries: Some("DE".to_string()),
            partner_countries: Some("CN".to_string()),
            product_groups: Some("Flat Products".to_string()),
            flow_type: Some(FlowType::Value),
            ..QueryParams::default()
        }
    }

    fn populated() -> FakeSource {
        FakeSource::new(
            json!({"results": [{"product_group": "Flat Products", "sum_2019": 100, "sum_2020": 200}]}),
            json!({
                "results": [{"partner_country": "China", "sum_2019": 10, "sum_2020": 20}],
                "sources_used": [{"source_last_updated": "2020-06-01"}]
            }),
        )
    }

    #[tokio::test]
    async fn breakdowns_are_requested_concurrently() {
        let source = populated().gated(2);
        let fetcher = ResultsFetcher::new(config(), source.clone());
        let mut store = Store::new();

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            fetcher.fetch_results_if_needed(&mut store, &params()),
        )
        .await;

        let results = match outcome {
            Ok(Ok(Some(results))) => results,
            other => panic!("both breakdown requests should be in flight together: {other:?}"),
        };
        assert_eq!(source.calls(), 2);
        assert_eq!(results.reporter_country.as_deref(), Some("DE"));
    }

    #[tokio::test]
    async fn empty_query_succeeds_without_requests() {
        let source = populated();
        let fetcher = ResultsFetcher::new(config(), source.clone());
        let mut store = Store::new();

        let query = QueryParams {
            offset: Some(0),
            size: Some(100),
            ..QueryParams::default()
        };
        let result = fetcher.fetch_results_if_needed(&mut store, &query).await;

        assert_eq!(result, Ok(None));
        assert_eq!(source.calls(), 0);
        assert_eq!(store.state().results.status, FetchStatus::Succeeded);
        assert!(store.state().results.data.is_none());
    }

    #[tokio::test]
    async fn second_request_while_fetching_is_ignored() {
        let source = populated();
        let fetcher = ResultsFetcher::new(config(), source.clone());
        let mut store = Store::new();

        let pending = fetcher.begin(&mut store, &params()).unwrap();
        assert!(pending.is_some());
        let version = store.version();

        let second = fetcher.fetch_results_if_needed(&mut store, &params()).await;
        assert_eq!(second, Err(FetchError::AlreadyFetching));
        assert_eq!(source.calls(), 0);
        assert_eq!(store.version(), version);
        assert!(store.state().results.is_fetching());
    }

    #[tokio::test]
    async fn successful_fetch_emits_start_then_received() {
        let source = populated();
        let fetcher = ResultsFetcher::new(config(), source.clone());
        let mut store = Store::new();
        let kinds = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = Arc::clone(&kinds);
        store.subscribe(move |state, _| {
            if let Ok(mut kinds) = seen.lock() {
                kinds.push(state.results.status);
            }
        });

        let result = fetcher
            .fetch_results_if_needed(&mut store, &params())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(result.reporter_country.as_deref(), Some("DE"));
        assert_eq!(result.source_last_updated.as_deref(), Some("2020-06-01"));
        assert_eq!(result.time_periods.len(), 2);
        assert_eq!(
            *kinds.lock().unwrap(),
            vec![FetchStatus::Fetching, FetchStatus::Succeeded]
        );
    }

    #[tokio::test]
    async fn transport_failure_short_circuits() {
        let mut source = populated();
        source.partner_country = Err(SourceError::Network("connection reset".to_string()));
        let fetcher = ResultsFetcher::new(config(), source);
        let mut store = Store::new();

        let result = fetcher.fetch_results_if_needed(&mut store, &params()).await;
        let error = result.unwrap_err();

        assert_eq!(
            error.to_string(),
            "There was an error retrieving results from the data source: Network error: connection reset"
        );
        assert_eq!(store.state().results.status, FetchStatus::Failed);
        assert_eq!(store.state().results.error.as_ref(), Some(&error));
        assert_eq!(store.version(), 2);
    }

    #[tokio::test]
    async fn empty_partner_breakdown_is_reported_as_failure() {
        let source = FakeSource::new(
            json!({"results": [{"sum_2019": 1}]}),
            json!({"results": []}),
        );
        let fetcher = ResultsFetcher::new(config(), source);
        let mut store = Store::new();

        let result = fetcher.fetch_results_if_needed(&mut store, &params()).await;

        assert_eq!(
            result,
            Err(FetchError::NoResults(NoResultsReason::ReporterAndPartner))
        );
        assert_eq!(store.state().results.status, FetchStatus::Failed);
    }

    #[tokio::test]
    async fn malformed_body_is_a_transport_failure() {
        let source = FakeSource::new(json!({"results": "nope"}), json!({"results": []}));
        let fetcher = ResultsFetcher::new(config(), source);
        let mut store = Store::new();

        let result = fetcher.fetch_results_if_needed(&mut store, &params()).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn pending_fetch_can_be_spawned() {
        let fetcher = ResultsFetcher::new(config(), populated());
        let mut store = Store::new();

        let pending = fetcher.begin(&mut store, &params()).unwrap().unwrap();
        let notification = tokio::spawn(pending.run()).await.unwrap();
        store.dispatch(notification);

        assert_eq!(store.state().results.status, FetchStatus::Succeeded);
    }

    #[tokio::test]
    async fn fetch_can_run_again_after_completion() {
        let source = populated();
        let fetcher = ResultsFetcher::new(config(), source.clone());
        let mut store = Store::new();

        fetcher
            .fetch_results_if_needed(&mut store, &params())
            .await
            .unwrap();
        fetcher
            .fetch_results_if_needed(&mut store, &params())
            .await
            .unwrap();

        assert_eq!(source.calls(), 4);
    }
}
