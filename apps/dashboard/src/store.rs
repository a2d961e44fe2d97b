//! Process-wide dashboard state.
//!
//! State is a tree of `Arc` snapshots. Every [`Notification`] goes through
//! [`reduce`], which replaces only the slice it touches, so subscribers can
//! detect change by pointer or by [`Store::version`].

use crate::domain::SelectOption;
use crate::error::FetchError;
use crate::results::ResultSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsState {
    pub status: FetchStatus,
    /// `None` after an empty-query success.
    pub data: Option<Arc<ResultSet>>,
    pub error: Option<FetchError>,
}

impl ResultsState {
    pub fn is_fetching(&self) -> bool {
        self.status == FetchStatus::Fetching
    }
}

/// Selectable choices per form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormOptions {
    pub reporter_countries: Vec<SelectOption>,
    pub partner_countries: Vec<SelectOption>,
    pub product_groups: Vec<SelectOption>,
    pub flow_types: Vec<SelectOption>,
    pub time_periods: Vec<SelectOption>,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub results: Arc<ResultsState>,
    pub form_options: Arc<FormOptions>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    RequestStarted,
    /// `None` is the empty-query success.
    ResultsReceived(Option<Arc<ResultSet>>),
    FetchFailed(FetchError),
    SetFormOptions(FormOptions),
    SetSubGroups {
        partner_countries: Vec<SelectOption>,
        product_groups: Vec<SelectOption>,
    },
}

impl Notification {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RequestStarted => "request-started",
            Self::ResultsReceived(_) => "results-received",
            Self::FetchFailed(_) => "fetch-failed",
            Self::SetFormOptions(_) => "set-form-options",
            Self::SetSubGroups { .. } => "set-sub-groups",
        }
    }
}

pub fn reduce(state: &AppState, notification: Notification) -> AppState {
    match notification {
        Notification::RequestStarted => AppState {
            results: Arc::new(ResultsState {
                status: FetchStatus::Fetching,
                data: state.results.data.clone(),
                error: None,
            }),
            form_options: Arc::clone(&state.form_options),
        },
        Notification::ResultsReceived(data) => AppState {
            results: Arc::new(ResultsState {
                status: FetchStatus::Succeeded,
                data,
                error: None,
            }),
            form_options: Arc::clone(&state.form_options),
        },
        Notification::FetchFailed(error) => AppState {
            results: Arc::new(ResultsState {
                status: FetchStatus::Failed,
                data: None,
                error: Some(error),
            }),
            form_options: Arc::clone(&state.form_options),
        },
        Notification::SetFormOptions(options) => AppState {
            results: Arc::clone(&state.results),
            form_options: Arc::new(options),
        },
        Notification::SetSubGroups {
            partner_countries,
            product_groups,
        } => AppState {
            results: Arc::clone(&state.results),
            form_options: Arc::new(FormOptions {
                partner_countries,
                product_groups,
                ..(*state.form_options).clone()
            }),
        },
    }
}

type Subscriber = Box<dyn Fn(&AppState, u64) + Send>;

pub struct Store {
    state: Arc<AppState>,
    version: u64,
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AppState::default()),
            version: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub const fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, subscriber: impl Fn(&AppState, u64) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn dispatch(&mut self, notification: Notification) {
        tracing::debug!(kind = notification.kind(), "Dispatching notification");
        self.state = Arc::new(reduce(&self.state, notification));
        self.version += 1;
        for subscriber in &self.subscribers {
            subscriber(&self.state, self.version);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoResultsReason;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn options(values: &[&str]) -> Vec<SelectOption> {
        values.iter().map(|v| SelectOption::new(*v, *v)).collect()
    }

    fn sample_result() -> Arc<ResultSet> {
        Arc::new(ResultSet {
            product_group_entry: Vec::new(),
            partner_country_entry: Vec::new(),
            reporter_country: Some("DE".to_string()),
            source_last_updated: None,
            time_periods: Vec::new(),
        })
    }

    #[test]
    fn fetch_lifecycle_moves_through_statuses() {
        let mut store = Store::new();
        assert_eq!(store.state().results.status, FetchStatus::Idle);

        store.dispatch(Notification::RequestStarted);
        assert!(store.state().results.is_fetching());

        store.dispatch(Notification::ResultsReceived(Some(sample_result())));
        assert_eq!(store.state().results.status, FetchStatus::Succeeded);
        assert!(store.state().results.data.is_some());

        store.dispatch(Notification::RequestStarted);
        store.dispatch(Notification::FetchFailed(FetchError::NoResults(
            NoResultsReason::ReporterAndPartner,
        )));
        assert_eq!(store.state().results.status, FetchStatus::Failed);
        assert!(store.state().results.data.is_none());
        assert_eq!(store.version(), 4);
    }

    #[test]
    fn results_updates_leave_form_options_untouched() {
        let mut store = Store::new();
        store.dispatch(Notification::SetFormOptions(FormOptions {
            reporter_countries: options(&["DE"]),
            ..FormOptions::default()
        }));
        let before = store.snapshot();

        store.dispatch(Notification::RequestStarted);
        let after = store.snapshot();

        assert!(Arc::ptr_eq(&before.form_options, &after.form_options));
        assert!(!Arc::ptr_eq(&before.results, &after.results));
    }

    #[test]
    fn set_form_options_replaces_every_list() {
        let mut store = Store::new();
        store.dispatch(Notification::SetFormOptions(FormOptions {
            reporter_countries: options(&["DE", "FR"]),
            partner_countries: options(&["CN"]),
            product_groups: options(&["Flat"]),
            flow_types: options(&["QTY"]),
            time_periods: options(&["2019"]),
        }));
        store.dispatch(Notification::SetFormOptions(FormOptions {
            reporter_countries: options(&["US"]),
            ..FormOptions::default()
        }));

        let form_options = &store.state().form_options;
        assert_eq!(form_options.reporter_countries, options(&["US"]));
        assert!(form_options.partner_countries.is_empty());
        assert!(form_options.time_periods.is_empty());
    }

    #[test]
    fn set_sub_groups_only_replaces_partner_and_product_lists() {
        let mut store = Store::new();
        store.dispatch(Notification::SetFormOptions(FormOptions {
            reporter_countries: options(&["DE"]),
            partner_countries: options(&["CN"]),
            product_groups: options(&["Flat"]),
            flow_types: options(&["QTY"]),
            time_periods: options(&["2019"]),
        }));
        store.dispatch(Notification::SetSubGroups {
            partner_countries: options(&["JP", "KR"]),
            product_groups: options(&["Long"]),
        });

        let form_options = &store.state().form_options;
        assert_eq!(form_options.reporter_countries, options(&["DE"]));
        assert_eq!(form_options.partner_countries, options(&["JP", "KR"]));
        assert_eq!(form_options.product_groups, options(&["Long"]));
        assert_eq!(form_options.flow_types, options(&["QTY"]));
    }

    #[test]
    fn subscribers_see_each_version() {
        let seen = Arc::new(AtomicU64::new(0));
        let mut store = Store::new();
        let observer = Arc::clone(&seen);
        store.subscribe(move |_, version| observer.store(version, Ordering::SeqCst));

        store.dispatch(Notification::RequestStarted);
        store.dispatch(Notification::ResultsReceived(None));

        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(store.state().results.status, FetchStatus::Succeeded);
        assert!(store.state().results.data.is_none());
    }
}
