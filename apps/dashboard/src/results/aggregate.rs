use super::{ApiResponse, ResultSet};
use crate::error::{FetchError, NoResultsReason};
use crate::query::QueryParams;
use crate::time_periods::extract_time_periods;

/// Merges the product-group and partner-country breakdowns.
///
/// Fails with a fixed message when either breakdown is empty. The source
/// timestamp is read from the partner-country response first, then the
/// product-group one.
pub fn aggregate(
    product_group: ApiResponse,
    partner_country: ApiResponse,
    params: &QueryParams,
) -> Result<ResultSet, FetchError> {
    let reason = match (
        product_group.results.is_empty(),
        partner_country.results.is_empty(),
    ) {
        (true, true) => Some(NoResultsReason::TradeFlowAndReporter),
        (false, true) => Some(NoResultsReason::ReporterAndPartner),
        (true, false) => Some(NoResultsReason::ReporterAndProductGroup),
        (false, false) => None,
    };
    if let Some(reason) = reason {
        tracing::info!(%reason, "Results fetch returned an empty breakdown");
        return Err(FetchError::NoResults(reason));
    }

    let source_last_updated = partner_country
        .sources_used
        .first()
        .or_else(|| product_group.sources_used.first())
        .and_then(|source| source.source_last_updated.clone());

    let time_periods = product_group
        .results
        .first()
        .map(extract_time_periods)
        .unwrap_or_default();

    Ok(ResultSet {
        product_group_entry: product_group.results,
        partner_country_entry: partner_country.results,
        reporter_country: params.reporter_countries.clone(),
        source_last_updated,
        time_periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_periods::TimePeriod;
    use serde_json::json;

    fn response(value: serde_json::Value) -> ApiResponse {
        serde_json::from_value(value).unwrap()
    }

    fn params() -> QueryParams {
        QueryParams {
            reporter_countries: Some("DE".to_string()),
            ..QueryParams::default()
        }
    }

    #[test]
    fn both_empty_reports_trade_flow_and_reporter() {
        let result = aggregate(
            response(json!({"results": []})),
            response(json!({"results": []})),
            &params(),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "No results found for this Trade Flow and Reporter Country combination."
        );
    }

    #[test]
    fn empty_partner_breakdown_reports_reporter_and_partner() {
        let result = aggregate(
            response(json!({"results": [{"product_group": "Flat", "sum_2019": 1}]})),
            response(json!({"results": []})),
            &params(),
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "No results found for this Reporter and Partner Country combination."
        );
    }

    #[test]
    fn empty_product_breakdown_reports_reporter_and_product_group() {
        let result = aggregate(
            response(json!({"results": []})),
            response(json!({"results": [{"partner_country": "China", "sum_2019": 1}]})),
            &params(),
        );
        assert_eq!(
            result,
            Err(FetchError::NoResults(NoResultsReason::ReporterAndProductGroup))
        );
    }

    #[test]
    fn success_attaches_reporter_source_and_periods() {
        let result = aggregate(
            response(json!({
                "results": [{"sum_2019": 100, "sum_2020": 200, "name": "Steel"}],
                "sources_used": [{"source_last_updated": "2020-01-02T00:00:00Z"}]
            })),
            response(json!({
                "results": [{"partner_country": "China", "sum_2019": 5, "sum_2020": 7}],
                "sources_used": [{"source": "GTM", "source_last_updated": "2020-03-04T00:00:00Z"}]
            })),
            &params(),
        )
        .unwrap();

        assert_eq!(result.reporter_country.as_deref(), Some("DE"));
        assert_eq!(
            result.source_last_updated.as_deref(),
            Some("2020-03-04T00:00:00Z")
        );
        assert_eq!(
            result.time_periods,
            vec![
                TimePeriod {
                    label: "2019".to_string(),
                    value: "sum_2019".to_string()
                },
                TimePeriod {
                    label: "2020".to_string(),
                    value: "sum_2020".to_string()
                },
            ]
        );
        assert_eq!(result.product_group_entry.len(), 1);
        assert_eq!(result.partner_country_entry.len(), 1);
    }

    #[test]
    fn missing_sources_leave_timestamp_empty() {
        let result = aggregate(
            response(json!({"results": [{"sum_2019": 1}]})),
            response(json!({"results": [{"sum_2019": 1}]})),
            &QueryParams::default(),
        )
        .unwrap();
        assert_eq!(result.source_last_updated, None);
        assert_eq!(result.reporter_country, None);
    }
}
