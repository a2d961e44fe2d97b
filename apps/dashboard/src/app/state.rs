use crate::app::actions::{AppActions, TaskEvent};
use crate::app::picker::OptionPicker;
use color_eyre::Result;
use std::time::{Duration, Instant};
use steel_trade_dashboard::form::{
    on_reporter_country_change, on_trade_flow_change, FormField, FormValues, OptionsRefresh,
    OptionsRequest,
};
use steel_trade_dashboard::results::ResultSet;
use steel_trade_dashboard::store::{FormOptions, Notification, Store};
use steel_trade_dashboard::time_periods::TimePeriod;
use steel_trade_dashboard::{FlowType, SelectOption, TradeFlow};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

/// Form fields plus the "Generate Dashboard" button.
pub const FOCUS_SLOTS: usize = FormField::ALL.len() + 1;

const THROBBER_TICK: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub store: Store,
    pub form: FormValues,
    pub focus_index: usize,
    pub picker: Option<OptionPicker>,
    pub validation_errors: Vec<FormField>,
    pub status_message: String,
    pub show_help: bool,
    pub period_index: usize,
    pub table_offset: usize,
    pub options_loading: bool,
    /// Last options refresh issued, and last full one.
    pub options_generation: u64,
    pub full_options_generation: u64,
    pub throbber_state: ThrobberState,
    pub last_tick: Instant,
    pub actions: AppActions,
}

impl App {
    pub fn new(tx: UnboundedSender<TaskEvent>) -> Self {
        Self {
            running: true,
            store: Store::new(),
            form: FormValues::default(),
            focus_index: 0,
            picker: None,
            validation_errors: Vec::new(),
            status_message: String::new(),
            show_help: false,
            period_index: 0,
            table_offset: 0,
            options_loading: false,
            options_generation: 0,
            full_options_generation: 0,
            throbber_state: ThrobberState::default(),
            last_tick: Instant::now(),
            actions: AppActions::new(tx),
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.actions.initialize()
    }

    /// First options load: Import preselected, everything else open.
    pub fn load_initial_options(&mut self) {
        let request = on_trade_flow_change(&mut self.form, Some(TradeFlow::Import));
        self.request_options(request);
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_tick) >= THROBBER_TICK {
            self.last_tick = now;
            if self.is_busy() {
                self.throbber_state.calc_next();
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.options_loading || self.store.state().results.is_fetching()
    }

    pub fn focused_field(&self) -> Option<FormField> {
        FormField::from_index(self.focus_index)
    }

    pub fn options_for(&self, field: FormField) -> Vec<SelectOption> {
        let form_options = &self.store.state().form_options;
        match field {
            FormField::TradeFlow => TradeFlow::options(),
            FormField::ReporterCountries => form_options.reporter_countries.clone(),
            FormField::PartnerCountries => form_options.partner_countries.clone(),
            FormField::ProductGroups => form_options.product_groups.clone(),
            FormField::FlowType if form_options.flow_types.is_empty() => FlowType::options(),
            FormField::FlowType => form_options.flow_types.clone(),
        }
    }

    pub fn open_picker(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let options = self.options_for(field);
        if options.is_empty() {
            self.status_message = format!("No options available for {}", field.label());
            return;
        }
        self.picker = Some(OptionPicker::new(field, options));
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Applies the picker's current choice, running the cascade for trade
    /// flow and reporter changes.
    pub fn confirm_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let Some(option) = picker.selected_option().cloned() else {
            self.picker = Some(picker);
            return;
        };
        self.select_option(picker.field, &option);
    }

    pub fn select_option(&mut self, field: FormField, option: &SelectOption) {
        self.validation_errors.retain(|missing| *missing != field);
        self.status_message.clear();

        match field {
            FormField::TradeFlow => {
                let Some(trade_flow) = TradeFlow::parse(&option.value) else {
                    self.status_message = format!("Error: Unknown trade flow {}", option.value);
                    return;
                };
                if self.form.trade_flow == Some(trade_flow) {
                    return;
                }
                let request = on_trade_flow_change(&mut self.form, Some(trade_flow));
                self.request_options(request);
            }
            FormField::ReporterCountries => {
                if self.form.reporter_countries.as_deref() == Some(option.value.as_str()) {
                    return;
                }
                let request = on_reporter_country_change(&mut self.form, Some(&option.value));
                self.request_options(request);
            }
            FormField::PartnerCountries => {
                self.form.partner_countries = Some(option.value.clone());
            }
            FormField::ProductGroups => {
                self.form.product_groups = Some(option.value.clone());
            }
            FormField::FlowType => match FlowType::parse(&option.value) {
                Some(flow_type) => self.form.flow_type = Some(flow_type),
                None => {
                    self.status_message = format!("Error: Unknown flow type {}", option.value);
                }
            },
        }
    }

    /// Clearing trade flow or reporter cascades like any other change.
    pub fn clear_focused_field(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };

        match field {
            FormField::TradeFlow if self.form.trade_flow.is_some() => {
                let request = on_trade_flow_change(&mut self.form, None);
                self.request_options(request);
            }
            FormField::ReporterCountries if self.form.reporter_countries.is_some() => {
                let request = on_reporter_country_change(&mut self.form, None);
                self.request_options(request);
            }
            _ => self.form.clear(field),
        }
    }

    fn request_options(&mut self, request: OptionsRequest) {
        self.options_generation += 1;
        let generation = self.options_generation;
        if request.refresh == OptionsRefresh::Full {
            self.full_options_generation = generation;
        }

        if !self.actions.is_configured() {
            return;
        }
        let refresh = request.refresh;
        match self.actions.request_form_options(request, generation) {
            Ok(()) => {
                self.options_loading = true;
                tracing::debug!(?refresh, generation, "Options refresh requested");
            }
            Err(e) => self.status_message = format!("Error: {e}"),
        }
    }

    /// Applies an options answer unless a later request overtook it. A full
    /// refresh overtaken only by sub-group refreshes still lands, minus the
    /// partner and product lists.
    fn apply_options(&mut self, generation: u64, notification: Notification) {
        if generation == self.options_generation {
            self.options_loading = false;
            self.store.dispatch(notification);
            return;
        }

        match notification {
            Notification::SetFormOptions(options) if generation == self.full_options_generation => {
                let current = &self.store.state().form_options;
                let merged = FormOptions {
                    partner_countries: current.partner_countries.clone(),
                    product_groups: current.product_groups.clone(),
                    ..options
                };
                tracing::debug!(generation, "Applying overtaken full options refresh");
                self.store.dispatch(Notification::SetFormOptions(merged));
            }
            _ => {
                tracing::debug!(
                    generation,
                    latest = self.options_generation,
                    "Dropping stale options refresh"
                );
            }
        }
    }

    /// Validates the form and starts a results fetch.
    pub fn submit(&mut self) {
        self.validation_errors = self.form.missing_required();
        if !self.validation_errors.is_empty() {
            self.status_message = "Error: Please complete all fields.".to_string();
            return;
        }

        let query = self.form.to_query();
        match self.actions.fetch_results(&mut self.store, &query) {
            Ok(true) => self.status_message = "Retrieving results...".to_string(),
            Ok(false) => {}
            Err(e) => self.status_message = format!("Error: {e}"),
        }
    }

    pub fn apply_task_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Options {
                generation,
                notification,
            } => self.apply_options(generation, notification),
            TaskEvent::OptionsFailed {
                generation,
                message,
            } => {
                if generation == self.options_generation {
                    self.options_loading = false;
                    self.status_message =
                        format!("Error: Could not load form options: {message}");
                }
            }
            TaskEvent::Store(notification) => {
                match &notification {
                    Notification::ResultsReceived(_) => {
                        self.status_message.clear();
                        self.table_offset = 0;
                        // Latest period first.
                        self.period_index = usize::MAX;
                    }
                    Notification::FetchFailed(_) => self.status_message.clear(),
                    Notification::RequestStarted
                    | Notification::SetFormOptions(_)
                    | Notification::SetSubGroups { .. } => {}
                }
                self.store.dispatch(notification);
                self.clamp_period_index();
            }
        }
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.store.state().results.data.as_deref()
    }

    pub fn selected_period(&self) -> Option<&TimePeriod> {
        self.results()
            .and_then(|results| results.time_periods.get(self.period_index))
    }

    pub fn next_period(&mut self) {
        let count = self.period_count();
        self.period_index = crate::app::input::helpers::wrap_increment(self.period_index, count);
        self.table_offset = 0;
    }

    pub fn previous_period(&mut self) {
        let count = self.period_count();
        self.period_index = crate::app::input::helpers::wrap_decrement(self.period_index, count);
        self.table_offset = 0;
    }

    fn period_count(&self) -> usize {
        self.results().map_or(0, |results| results.time_periods.len())
    }

    fn clamp_period_index(&mut self) {
        let count = self.period_count();
        if self.period_index >= count {
            self.period_index = count.saturating_sub(1);
        }
    }
}
