//! Form option lookups. The API answers option queries with an
//! `aggregations` object holding one bucket list per field.

use crate::config::ApiConfig;
use crate::domain::SelectOption;
use crate::error::SourceError;
use crate::form::{OptionsRefresh, OptionsRequest};
use crate::query::options_url;
use crate::source::TradeSource;
use crate::store::{FormOptions, Notification};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
struct OptionsResponse {
    #[serde(default)]
    aggregations: Aggregations,
}

#[derive(Debug, Default, Deserialize)]
struct Aggregations {
    #[serde(default)]
    reporter_countries: Vec<Bucket>,
    #[serde(default)]
    partner_countries: Vec<Bucket>,
    #[serde(default)]
    product_groups: Vec<Bucket>,
    #[serde(default)]
    flow_types: Vec<Bucket>,
    #[serde(default)]
    time_periods: Vec<Bucket>,
}

#[derive(Debug, Deserialize)]
struct Bucket {
    key: Value,
}

impl Bucket {
    fn into_option(self) -> Option<SelectOption> {
        let key = match self.key {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            _ => return None,
        };
        Some(SelectOption::new(key.clone(), key))
    }
}

fn to_options(buckets: Vec<Bucket>) -> Vec<SelectOption> {
    buckets.into_iter().filter_map(Bucket::into_option).collect()
}

/// Decodes an options response body into [`FormOptions`].
pub fn parse_form_options(body: Value) -> Result<FormOptions, SourceError> {
    let response: OptionsResponse =
        serde_json::from_value(body).map_err(|e| SourceError::Decode(e.to_string()))?;
    let aggregations = response.aggregations;

    Ok(FormOptions {
        reporter_countries: to_options(aggregations.reporter_countries),
        partner_countries: to_options(aggregations.partner_countries),
        product_groups: to_options(aggregations.product_groups),
        flow_types: to_options(aggregations.flow_types),
        time_periods: to_options(aggregations.time_periods),
    })
}

/// The store update a refresh of kind `refresh` produces.
pub fn options_notification(refresh: OptionsRefresh, options: FormOptions) -> Notification {
    match refresh {
        OptionsRefresh::Full => Notification::SetFormOptions(options),
        OptionsRefresh::SubGroups => Notification::SetSubGroups {
            partner_countries: options.partner_countries,
            product_groups: options.product_groups,
        },
    }
}

#[derive(Debug, Clone)]
pub struct FormOptionsLoader<S> {
    config: Arc<ApiConfig>,
    source: S,
}

impl<S: TradeSource> FormOptionsLoader<S> {
    pub fn new(config: ApiConfig, source: S) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }

    /// Fetches option lists for `request` and returns the matching store
    /// update.
    pub async fn request_form_options(
        &self,
        request: &OptionsRequest,
    ) -> Result<Notification, SourceError> {
        let url = options_url(&self.config, &request.query)?;
        let body = self.source.get_json(url).await?;
        let options = parse_form_options(body)?;

        tracing::info!(
            refresh = ?request.refresh,
            reporters = options.reporter_countries.len(),
            partners = options.partner_countries.len(),
            product_groups = options.product_groups.len(),
            "Form options refreshed"
        );

        Ok(options_notification(request.refresh, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradeFlow;
    use crate::query::QueryParams;
    use reqwest::Url;
    use serde_json::json;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Clone)]
    struct RecordingSource {
        body: Value,
        urls: Arc<Mutex<Vec<Url>>>,
    }

    impl TradeSource for RecordingSource {
        fn get_json(&self, url: Url) -> impl Future<Output = Result<Value, SourceError>> + Send {
            if let Ok(mut urls) = self.urls.lock() {
                urls.push(url);
            }
            let body = self.body.clone();
            async move { Ok(body) }
        }
    }

    fn body() -> Value {
        json!({
            "aggregations": {
                "reporter_countries": [{"key": "Germany"}, {"key": "France"}],
                "partner_countries": [{"key": "China"}],
                "product_groups": [{"key": "Flat Products"}],
                "flow_types": [{"key": "QTY"}, {"key": "VALUE"}],
                "time_periods": [{"key": 2019}, {"key": null}]
            }
        })
    }

    #[test]
    fn parses_buckets_into_options() {
        let options = parse_form_options(body()).unwrap();
        assert_eq!(
            options.reporter_countries,
            vec![
                SelectOption::new("Germany", "Germany"),
                SelectOption::new("France", "France")
            ]
        );
        assert_eq!(options.time_periods, vec![SelectOption::new("2019", "2019")]);
    }

    #[test]
    fn missing_aggregations_yield_empty_lists() {
        let options = parse_form_options(json!({"results": []})).unwrap();
        assert_eq!(options, FormOptions::default());
    }

    #[test]
    fn sub_group_refresh_keeps_only_two_lists() {
        let options = parse_form_options(body()).unwrap();
        let notification = options_notification(OptionsRefresh::SubGroups, options);
        match notification {
            Notification::SetSubGroups {
                partner_countries,
                product_groups,
            } => {
                assert_eq!(partner_countries.len(), 1);
                assert_eq!(product_groups.len(), 1);
            }
            other => panic!("unexpected notification {other:?}"),
        }
    }

    #[tokio::test]
    async fn loader_sends_query_and_returns_full_refresh() {
        let urls = Arc::new(Mutex::new(Vec::new()));
        let source = RecordingSource {
            body: body(),
            urls: Arc::clone(&urls),
        };
        let loader = FormOptionsLoader::new(ApiConfig::new("https://api.example.test/steel", "k"), source);
        let request = OptionsRequest {
            refresh: OptionsRefresh::Full,
            query: QueryParams {
                trade_flow: Some(TradeFlow::Export),
                ..QueryParams::default()
            },
        };

        let notification = loader.request_form_options(&request).await.unwrap();

        assert!(matches!(notification, Notification::SetFormOptions(_)));
        let urls = urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].as_str().contains("trade_flow=EXP"));
        assert!(urls[0].as_str().contains("size=1"));
    }
}
