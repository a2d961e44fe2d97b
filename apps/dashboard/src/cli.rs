use clap::Parser;
use color_eyre::eyre::eyre;
use steel_trade_dashboard::form::FormValues;
use steel_trade_dashboard::query::QueryParams;
use steel_trade_dashboard::{FlowType, TradeFlow};

#[derive(Debug, Parser)]
#[command(name = "steel-dashboard", version, about = "Steel trade statistics dashboard")]
pub struct CliArgs {
    /// Run one query and print the results instead of opening the UI
    #[arg(long)]
    pub headless: bool,

    /// Print headless results as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the statistics API host
    #[arg(long = "api-host", value_name = "URL")]
    pub api_host: Option<String>,

    /// Override the statistics API key
    #[arg(long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Trade flow for headless mode (IMP or EXP)
    #[arg(long = "trade-flow", value_name = "FLOW")]
    pub trade_flow: Option<String>,

    /// Reporter country for headless mode
    #[arg(long, value_name = "COUNTRY")]
    pub reporter: Option<String>,

    /// Partner country for headless mode
    #[arg(long, value_name = "COUNTRY")]
    pub partner: Option<String>,

    /// Product group for headless mode
    #[arg(long = "product-group", value_name = "GROUP")]
    pub product_group: Option<String>,

    /// Quantity or value for headless mode (QTY or VALUE)
    #[arg(long = "flow-type", value_name = "TYPE")]
    pub flow_type: Option<String>,

    /// Result offset for headless mode
    #[arg(long, value_name = "N")]
    pub offset: Option<u32>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(host) = &self.api_host {
            std::env::set_var("STEEL_API_HOST", host);
        }
        if let Some(key) = &self.api_key {
            std::env::set_var("STEEL_API_KEY", key);
        }
    }

    /// Headless query built from the flags. Unset flags stay unset.
    pub fn headless_query(&self) -> color_eyre::Result<QueryParams> {
        let trade_flow = self
            .trade_flow
            .as_deref()
            .map(|value| {
                TradeFlow::parse(value).ok_or_else(|| eyre!("Unknown trade flow: {value}"))
            })
            .transpose()?;
        let flow_type = self
            .flow_type
            .as_deref()
            .map(|value| FlowType::parse(value).ok_or_else(|| eyre!("Unknown flow type: {value}")))
            .transpose()?;

        let form = FormValues {
            trade_flow,
            reporter_countries: self.reporter.clone(),
            partner_countries: self.partner.clone(),
            product_groups: self.product_group.clone(),
            flow_type,
        };

        Ok(QueryParams {
            offset: self.offset,
            ..form.to_query()
        })
    }
}
