use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use steel_trade_dashboard::form::FormField;
use steel_trade_dashboard::SelectOption;

/// Popup list for choosing one option of a form field, filtered as the user
/// types.
#[derive(Debug, Clone)]
pub struct OptionPicker {
    pub field: FormField,
    pub filter: String,
    pub options: Vec<SelectOption>,
    /// Indexes into `options`, best match first.
    pub visible: Vec<usize>,
    pub selected: usize,
}

impl OptionPicker {
    pub fn new(field: FormField, options: Vec<SelectOption>) -> Self {
        let visible = (0..options.len()).collect();
        Self {
            field,
            filter: String::new(),
            options,
            visible,
            selected: 0,
        }
    }

    pub fn push(&mut self, ch: char) {
        self.filter.push(ch);
        self.refilter();
    }

    pub fn pop(&mut self) {
        self.filter.pop();
        self.refilter();
    }

    pub fn select_next(&mut self) {
        self.selected = crate::app::input::helpers::wrap_increment(self.selected, self.visible.len());
    }

    pub fn select_previous(&mut self) {
        self.selected = crate::app::input::helpers::wrap_decrement(self.selected, self.visible.len());
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        self.visible
            .get(self.selected)
            .and_then(|index| self.options.get(*index))
    }

    pub fn visible_options(&self) -> impl Iterator<Item = &SelectOption> {
        self.visible.iter().filter_map(|index| self.options.get(*index))
    }

    fn refilter(&mut self) {
        let pattern = self.filter.trim();
        if pattern.is_empty() {
            self.visible = (0..self.options.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, usize)> = self
                .options
                .iter()
                .enumerate()
                .filter_map(|(index, option)| {
                    matcher
                        .fuzzy_match(&option.label, pattern)
                        .map(|score| (score, index))
                })
                .collect();
            // Stable on ties so equal scores keep option order.
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            self.visible = scored.into_iter().map(|(_, index)| index).collect();
        }
        self.selected = 0;
    }
}
