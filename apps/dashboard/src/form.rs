//! The dashboard filter form and its dependent-field cascade.
//!
//! Changing the trade flow invalidates every country and product choice;
//! changing the reporter invalidates the partner and product choices. The
//! stale selections are cleared before the refresh query is built, so the
//! query never carries them.

use crate::domain::{FlowType, TradeFlow};
use crate::query::QueryParams;

pub const REQUIRED_MESSAGE: &str = "This value is required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    TradeFlow,
    ProductGroups,
    ReporterCountries,
    FlowType,
    PartnerCountries,
}

impl FormField {
    /// Display order.
    pub const ALL: [Self; 5] = [
        Self::TradeFlow,
        Self::ProductGroups,
        Self::ReporterCountries,
        Self::FlowType,
        Self::PartnerCountries,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::TradeFlow),
            1 => Some(Self::ProductGroups),
            2 => Some(Self::ReporterCountries),
            3 => Some(Self::FlowType),
            4 => Some(Self::PartnerCountries),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TradeFlow => "Trade Flow",
            Self::ProductGroups => "Product Groups",
            Self::ReporterCountries => "Reporter Country",
            Self::FlowType => "Quantity or Value",
            Self::PartnerCountries => "Partner Country",
        }
    }
}

/// Which option lists a refresh replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsRefresh {
    /// Every list.
    Full,
    /// Partner countries and product groups only.
    SubGroups,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsRequest {
    pub refresh: OptionsRefresh,
    pub query: QueryParams,
}

/// Current selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub trade_flow: Option<TradeFlow>,
    pub reporter_countries: Option<String>,
    pub partner_countries: Option<String>,
    pub product_groups: Option<String>,
    pub flow_type: Option<FlowType>,
}

impl FormValues {
    pub fn to_query(&self) -> QueryParams {
        QueryParams {
            trade_flow: self.trade_flow,
            reporter_countries: self.reporter_countries.clone(),
            partner_countries: self.partner_countries.clone(),
            product_groups: self.product_groups.clone(),
            flow_type: self.flow_type,
            ..QueryParams::default()
        }
    }

    pub fn clear(&mut self, field: FormField) {
        match field {
            FormField::TradeFlow => self.trade_flow = None,
            FormField::ProductGroups => self.product_groups = None,
            FormField::ReporterCountries => self.reporter_countries = None,
            FormField::FlowType => self.flow_type = None,
            FormField::PartnerCountries => self.partner_countries = None,
        }
    }

    pub fn display_value(&self, field: FormField) -> Option<String> {
        match field {
            FormField::TradeFlow => self.trade_flow.map(|flow| flow.label().to_string()),
            FormField::ProductGroups => self.product_groups.clone(),
            FormField::ReporterCountries => self.reporter_countries.clone(),
            FormField::FlowType => self.flow_type.map(|flow| flow.label().to_string()),
            FormField::PartnerCountries => self.partner_countries.clone(),
        }
    }

    /// Every field is required before a submit.
    pub fn missing_required(&self) -> Vec<FormField> {
        FormField::ALL
            .iter()
            .copied()
            .filter(|field| {
                self.display_value(*field)
                    .map_or(true, |value| value.trim().is_empty())
            })
            .collect()
    }
}

/// Trade flow changed or cleared: drop reporter, partner and product
/// selections and ask for a full options refresh under the new flow.
pub fn on_trade_flow_change(
    values: &mut FormValues,
    trade_flow: Option<TradeFlow>,
) -> OptionsRequest {
    values.clear(FormField::ReporterCountries);
    values.clear(FormField::PartnerCountries);
    values.clear(FormField::ProductGroups);
    values.trade_flow = trade_flow;

    tracing::debug!(trade_flow = ?trade_flow.map(TradeFlow::as_str), "Trade flow changed");
    OptionsRequest {
        refresh: OptionsRefresh::Full,
        query: values.to_query(),
    }
}

/// Reporter changed or cleared: drop partner and product selections and ask
/// for fresh sub-group lists.
pub fn on_reporter_country_change(
    values: &mut FormValues,
    reporter: Option<&str>,
) -> OptionsRequest {
    values.clear(FormField::PartnerCountries);
    values.clear(FormField::ProductGroups);
    values.reporter_countries = reporter.map(str::to_string);

    tracing::debug!(?reporter, "Reporter country changed");
    OptionsRequest {
        refresh: OptionsRefresh::SubGroups,
        query: values.to_query(),
    }
}
