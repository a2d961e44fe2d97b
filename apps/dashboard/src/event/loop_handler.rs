use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::io::Stdout;
use std::time::Duration;
use steel_trade_dashboard::config::ApiConfig;
use steel_trade_dashboard::query::QueryParams;
use steel_trade_dashboard::results::{ResultSet, ResultsFetcher};
use steel_trade_dashboard::source::{HttpTradeSource, TradeSource};
use steel_trade_dashboard::store::Store;
use steel_trade_dashboard::time_periods::TimePeriod;
use steel_trade_dashboard::FetchError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{handle_input, App, TaskEvent};
use crate::cli::CliArgs;
use crate::ui;
use crate::ui::widgets::results::format_last_updated;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    rx: &mut UnboundedReceiver<TaskEvent>,
) -> Result<()> {
    while app.running {
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        app.running = false;
                    } else {
                        handle_input(app, key.code);
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Background requests finish between frames.
        while let Ok(task_event) = rx.try_recv() {
            app.apply_task_event(task_event);
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}

/// Run one query without the UI and print the outcome
pub async fn run_headless(args: &CliArgs) -> Result<()> {
    let query = args.headless_query()?;

    let report = if query.is_empty_query() {
        tracing::info!("Empty headless query, nothing to fetch");
        HeadlessReport::empty(&query)
    } else {
        let fetcher = ResultsFetcher::new(ApiConfig::from_env()?, HttpTradeSource::new()?);
        fetch_report(&fetcher, &query).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_headless_text(&report);
    }

    Ok(())
}

async fn fetch_report<'a, S: TradeSource>(
    fetcher: &ResultsFetcher<S>,
    query: &'a QueryParams,
) -> Result<HeadlessReport<'a>> {
    let mut store = Store::new();
    match fetcher.fetch_results_if_needed(&mut store, query).await {
        Ok(results) => Ok(HeadlessReport::from_results(query, results.as_deref())),
        Err(FetchError::NoResults(reason)) => Ok(HeadlessReport::no_results(query, reason.message())),
        Err(error) => Err(error.into()),
    }
}

fn render_headless_text(report: &HeadlessReport<'_>) {
    println!("\nSteel Trade Statistics");
    println!("======================");

    if let Some(message) = report.message {
        println!("{message}");
        return;
    }

    if report.period.is_none() {
        println!("Nothing to show. Set --trade-flow, --reporter and the other query flags.");
        return;
    }

    println!(
        "Reporter: {}",
        report.reporter_country.as_deref().unwrap_or("(unknown)")
    );
    println!(
        "Source last updated: {}",
        report.source_last_updated.as_deref().unwrap_or("(unknown)")
    );

    let periods: Vec<&str> = report
        .time_periods
        .iter()
        .map(|period| period.label.as_str())
        .collect();
    println!("Time periods: {}", periods.join(", "));

    if let Some(period) = &report.period {
        println!("\nProduct Groups ({}):", period.label);
        for row in &report.product_groups {
            println!("- {}: {}", row.name, display_value(row.value));
        }

        println!("\nPartner Countries ({}):", period.label);
        for row in &report.partner_countries {
            println!("- {}: {}", row.name, display_value(row.value));
        }
    }
}

fn display_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value}"))
}

#[derive(Serialize)]
struct HeadlessReport<'a> {
    query: &'a QueryParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    reporter_country: Option<String>,
    source_last_updated: Option<String>,
    time_periods: Vec<TimePeriod>,
    period: Option<TimePeriod>,
    product_groups: Vec<HeadlessRow>,
    partner_countries: Vec<HeadlessRow>,
}

#[derive(Serialize)]
struct HeadlessRow {
    name: String,
    value: Option<f64>,
}

impl<'a> HeadlessReport<'a> {
    const fn empty(query: &'a QueryParams) -> Self {
        Self {
            query,
            message: None,
            reporter_country: None,
            source_last_updated: None,
            time_periods: Vec::new(),
            period: None,
            product_groups: Vec::new(),
            partner_countries: Vec::new(),
        }
    }

    fn no_results(query: &'a QueryParams, message: &'static str) -> Self {
        Self {
            message: Some(message),
            ..Self::empty(query)
        }
    }

    /// Latest period only; `None` results is the empty-query outcome.
    fn from_results(query: &'a QueryParams, results: Option<&ResultSet>) -> Self {
        let Some(results) = results else {
            return Self::empty(query);
        };

        let period = results.latest_period().cloned();
        let rows = |pairs: Vec<(String, Option<f64>)>| {
            pairs
                .into_iter()
                .map(|(name, value)| HeadlessRow { name, value })
                .collect::<Vec<_>>()
        };
        let (product_groups, partner_countries) = period.as_ref().map_or_else(
            || (Vec::new(), Vec::new()),
            |period| {
                (
                    rows(results.product_group_rows(&period.value)),
                    rows(results.partner_country_rows(&period.value)),
                )
            },
        );

        Self {
            query,
            message: None,
            reporter_country: results.reporter_country.clone(),
            source_last_updated: results
                .source_last_updated
                .as_deref()
                .map(format_last_updated),
            time_periods: results.time_periods.clone(),
            period,
            product_groups,
            partner_countries,
        }
    }
}
