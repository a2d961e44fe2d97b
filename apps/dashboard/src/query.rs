use crate::config::ApiConfig;
use crate::domain::{FlowType, TradeFlow};
use crate::error::SourceError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Page size for every results request.
pub const RESULTS_PAGE_SIZE: u32 = 100;

/// Page size for the options request; only the aggregations are read.
pub const OPTIONS_PAGE_SIZE: u32 = 1;

/// Filter names as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    TradeFlow,
    ReporterCountries,
    PartnerCountries,
    ProductGroups,
    FlowType,
    ComparisonIntervalStart,
    ComparisonIntervalEnd,
    PiePeriod,
}

impl QueryField {
    /// Querystring order.
    pub const ALL: [Self; 8] = [
        Self::TradeFlow,
        Self::ReporterCountries,
        Self::PartnerCountries,
        Self::ProductGroups,
        Self::FlowType,
        Self::ComparisonIntervalStart,
        Self::ComparisonIntervalEnd,
        Self::PiePeriod,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TradeFlow => "trade_flow",
            Self::ReporterCountries => "reporter_countries",
            Self::PartnerCountries => "partner_countries",
            Self::ProductGroups => "product_groups",
            Self::FlowType => "flow_type",
            Self::ComparisonIntervalStart => "comparison_interval_start",
            Self::ComparisonIntervalEnd => "comparison_interval_end",
            Self::PiePeriod => "pie_period",
        }
    }
}

/// The two breakdowns fetched for every results query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsVariant {
    ProductGroup,
    PartnerCountry,
}

impl ResultsVariant {
    /// Fields left out of this variant's querystring.
    pub const fn omitted_fields(self) -> &'static [QueryField] {
        match self {
            Self::ProductGroup => &[
                QueryField::PartnerCountries,
                QueryField::ComparisonIntervalStart,
                QueryField::ComparisonIntervalEnd,
                QueryField::PiePeriod,
            ],
            Self::PartnerCountry => &[
                QueryField::ProductGroups,
                QueryField::ComparisonIntervalStart,
                QueryField::ComparisonIntervalEnd,
                QueryField::PiePeriod,
            ],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProductGroup => "product_group",
            Self::PartnerCountry => "partner_country",
        }
    }
}

/// Flat filter set shared by the results and options requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub trade_flow: Option<TradeFlow>,
    pub reporter_countries: Option<String>,
    pub partner_countries: Option<String>,
    pub product_groups: Option<String>,
    pub flow_type: Option<FlowType>,
    pub comparison_interval_start: Option<String>,
    pub comparison_interval_end: Option<String>,
    pub pie_period: Option<String>,
    pub offset: Option<u32>,
    pub size: Option<u32>,
}

impl QueryParams {
    pub fn value(&self, field: QueryField) -> Option<String> {
        let value = match field {
            QueryField::TradeFlow => self.trade_flow.map(|flow| flow.as_str().to_string()),
            QueryField::ReporterCountries => self.reporter_countries.clone(),
            QueryField::PartnerCountries => self.partner_countries.clone(),
            QueryField::ProductGroups => self.product_groups.clone(),
            QueryField::FlowType => self.flow_type.map(|flow| flow.as_str().to_string()),
            QueryField::ComparisonIntervalStart => self.comparison_interval_start.clone(),
            QueryField::ComparisonIntervalEnd => self.comparison_interval_end.clone(),
            QueryField::PiePeriod => self.pie_period.clone(),
        };
        value.filter(|value| !value.trim().is_empty())
    }

    /// True when nothing but pagination is set.
    pub fn is_empty_query(&self) -> bool {
        QueryField::ALL
            .iter()
            .all(|field| self.value(*field).is_none())
    }

    /// Set filters as querystring pairs, skipping `omit` and pagination.
    pub fn pairs(&self, omit: &[QueryField]) -> Vec<(&'static str, String)> {
        QueryField::ALL
            .iter()
            .filter(|field| !omit.contains(field))
            .filter_map(|field| self.value(*field).map(|value| (field.as_str(), value)))
            .collect()
    }

    pub fn offset_or_default(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// `{host}?api_key=..&size=100&offset=n&{filters minus the variant's omissions}`
pub fn results_url(
    config: &ApiConfig,
    params: &QueryParams,
    variant: ResultsVariant,
) -> Result<Url, SourceError> {
    let mut pairs = vec![
        ("api_key", config.api_key.clone()),
        ("size", RESULTS_PAGE_SIZE.to_string()),
        ("offset", params.offset_or_default().to_string()),
    ];
    pairs.extend(params.pairs(variant.omitted_fields()));
    build_url(&config.host, &pairs)
}

/// Options lookups send every set filter, comparison and pie fields included.
pub fn options_url(config: &ApiConfig, params: &QueryParams) -> Result<Url, SourceError> {
    let mut pairs = vec![
        ("api_key", config.api_key.clone()),
        ("size", OPTIONS_PAGE_SIZE.to_string()),
    ];
    pairs.extend(params.pairs(&[]));
    build_url(&config.host, &pairs)
}

fn build_url(host: &str, pairs: &[(&str, String)]) -> Result<Url, SourceError> {
    Url::parse_with_params(host, pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .map_err(|e| SourceError::InvalidUrl(format!("{host}: {e}")))
}

/// The URL with the key masked, for logs.
pub fn redact_api_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "api_key" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
