use color_eyre::Result;
use steel_trade_dashboard::config::ApiConfig;
use steel_trade_dashboard::form::OptionsRequest;
use steel_trade_dashboard::options::FormOptionsLoader;
use steel_trade_dashboard::query::QueryParams;
use steel_trade_dashboard::results::ResultsFetcher;
use steel_trade_dashboard::source::HttpTradeSource;
use steel_trade_dashboard::store::{Notification, Store};
use steel_trade_dashboard::FetchError;
use tokio::sync::mpsc::UnboundedSender;

/// Completion of a background request, delivered to the event loop.
#[derive(Debug)]
pub enum TaskEvent {
    Store(Notification),
    /// Options refresh number `generation` finished.
    Options {
        generation: u64,
        notification: Notification,
    },
    OptionsFailed {
        generation: u64,
        message: String,
    },
}

/// Owns the API clients and spawns their requests. Results come back over
/// the task channel so the UI loop never waits on the network.
#[derive(Debug)]
pub struct AppActions {
    fetcher: Option<ResultsFetcher<HttpTradeSource>>,
    loader: Option<FormOptionsLoader<HttpTradeSource>>,
    tx: UnboundedSender<TaskEvent>,
}

impl AppActions {
    pub fn new(tx: UnboundedSender<TaskEvent>) -> Self {
        Self {
            fetcher: None,
            loader: None,
            tx,
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        let config = ApiConfig::from_env()?;
        let source = HttpTradeSource::new()?;

        tracing::info!(host = %config.host, "API configured");
        self.fetcher = Some(ResultsFetcher::new(config.clone(), source.clone()));
        self.loader = Some(FormOptionsLoader::new(config, source));

        Ok(())
    }

    pub const fn is_configured(&self) -> bool {
        self.fetcher.is_some()
    }

    /// Starts a results fetch in the background. Returns `false` when the
    /// guards turned the request into a no-op.
    pub fn fetch_results(&self, store: &mut Store, params: &QueryParams) -> Result<bool> {
        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| color_eyre::eyre::eyre!("API not configured"))?;

        match fetcher.begin(store, params) {
            Ok(Some(pending)) => {
                tracing::debug!(
                    offset = pending.params().offset_or_default(),
                    "Spawning results fetch"
                );
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let notification = pending.run().await;
                    if tx.send(TaskEvent::Store(notification)).is_err() {
                        tracing::debug!("Event loop gone, dropping results");
                    }
                });
                Ok(true)
            }
            Ok(None) | Err(FetchError::AlreadyFetching) => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    /// Spawns an options refresh. `generation` comes back on the task event
    /// so the caller can drop answers overtaken by a later request.
    pub fn request_form_options(&self, request: OptionsRequest, generation: u64) -> Result<()> {
        let loader = self
            .loader
            .clone()
            .ok_or_else(|| color_eyre::eyre::eyre!("API not configured"))?;

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match loader.request_form_options(&request).await {
                Ok(notification) => TaskEvent::Options {
                    generation,
                    notification,
                },
                Err(error) => {
                    tracing::warn!(%error, generation, "Form options request failed");
                    TaskEvent::OptionsFailed {
                        generation,
                        message: error.to_string(),
                    }
                }
            };
            if tx.send(event).is_err() {
                tracing::debug!("Event loop gone, dropping form options");
            }
        });

        Ok(())
    }
}
