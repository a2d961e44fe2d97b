use crate::app::App;
use crate::ui::widgets::tables::{clamp_offset, format_value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap,
};
use ratatui::Frame;
use steel_trade_dashboard::results::ResultSet;
use steel_trade_dashboard::store::FetchStatus;
use throbber_widgets_tui::Throbber;

const CHART_BARS: usize = 10;
const CHART_LABEL_WIDTH: u16 = 6;

pub fn render_results_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let results_state = &app.store.state().results;

    let block = Block::default()
        .title(" Results ")
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if let Some(results) = results_state.data.as_deref() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        render_result_set(app, results, f, inner);
        return;
    }

    let text = match results_state.status {
        FetchStatus::Fetching => Text::from(TextLine::from(vec![
            Throbber::default().to_symbol_span(&app.throbber_state),
            Span::styled(" Retrieving results...", Style::default().fg(Color::Gray)),
        ])),
        FetchStatus::Failed => {
            let message = results_state
                .error
                .as_ref()
                .map_or_else(String::new, ToString::to_string);
            Text::from(Span::styled(message, Style::default().fg(Color::Red)))
        }
        FetchStatus::Idle | FetchStatus::Succeeded => Text::from(Span::styled(
            "Choose the query values and generate the dashboard.",
            Style::default().fg(Color::Gray),
        )),
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_result_set(app: &App, results: &ResultSet, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),      // Reporter and source date
            Constraint::Length(1),      // Period tabs
            Constraint::Percentage(55), // Breakdown tables
            Constraint::Min(6),         // Partner chart
        ])
        .split(area);

    render_summary(app, results, f, chunks[0]);
    render_period_tabs(app, results, f, chunks[1]);

    let Some(period) = app.selected_period() else {
        let paragraph = Paragraph::new("No time periods in the results.")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, chunks[2]);
        return;
    };

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let product_rows = results.product_group_rows(&period.value);
    let partner_rows = results.partner_country_rows(&period.value);

    render_breakdown_table(
        "Product Groups",
        &product_rows,
        app.table_offset,
        f,
        tables[0],
    );
    render_breakdown_table(
        "Partner Countries",
        &partner_rows,
        app.table_offset,
        f,
        tables[1],
    );
    render_partner_chart(&period.label, &partner_rows, f, chunks[3]);
}

fn render_summary(app: &App, results: &ResultSet, f: &mut Frame<'_>, area: Rect) {
    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let mut reporter_line = vec![
        Span::styled("Reporter: ", label_style),
        Span::styled(
            results.reporter_country.clone().unwrap_or_default(),
            value_style,
        ),
    ];
    if app.store.state().results.is_fetching() {
        reporter_line.push(Span::raw("  "));
        reporter_line.push(Throbber::default().to_symbol_span(&app.throbber_state));
    }

    let updated = results
        .source_last_updated
        .as_deref()
        .map_or_else(|| "unknown".to_string(), format_last_updated);

    let summary = Paragraph::new(Text::from(vec![
        TextLine::from(reporter_line),
        TextLine::from(vec![
            Span::styled("Source last updated: ", label_style),
            Span::styled(updated, value_style),
        ]),
    ]));
    f.render_widget(summary, area);
}

fn render_period_tabs(app: &App, results: &ResultSet, f: &mut Frame<'_>, area: Rect) {
    let titles = results
        .time_periods
        .iter()
        .map(|period| TextLine::from(period.label.clone()))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .select(app.period_index)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(0, 0, 238))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

fn render_breakdown_table(
    title: &str,
    rows: &[(String, Option<f64>)],
    offset: usize,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let header = Row::new(vec![Cell::from("Name"), Cell::from("Value")]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = clamp_offset(rows.len(), max_visible_rows, offset);

    let visible = rows
        .iter()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(label.clone()),
                Cell::from(TextLine::from(format_value(*value)).alignment(Alignment::Right)),
            ])
        });

    let table = Table::new(visible, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .header(header)
        .block(
            Block::default()
                .title(format!("{title} ({})", rows.len()))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_partner_chart(
    period_label: &str,
    rows: &[(String, Option<f64>)],
    f: &mut Frame<'_>,
    area: Rect,
) {
    let values = chart_values(rows);
    let block = Block::default()
        .title(format!("Top Partner Countries, {period_label}"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if values.is_empty() {
        let paragraph = Paragraph::new("No values for this period")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let bars: Vec<Bar<'_>> = values
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .value(*value)
                .label(TextLine::from(short_label(label)))
                .style(Style::default().fg(Color::Cyan))
                .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        })
        .collect();

    let max_value = values.iter().map(|(_, value)| *value).max().unwrap_or(0).max(1);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(1)
        .bar_width(CHART_LABEL_WIDTH);

    f.render_widget(chart, area);
}

/// Largest non-negative values first, capped to what the chart can show.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn chart_values(rows: &[(String, Option<f64>)]) -> Vec<(String, u64)> {
    let mut values: Vec<(String, u64)> = rows
        .iter()
        .filter_map(|(label, value)| {
            let value = (*value)?;
            (value >= 0.0).then(|| (label.clone(), value.round() as u64))
        })
        .collect();
    values.sort_by(|a, b| b.1.cmp(&a.1));
    values.truncate(CHART_BARS);
    values
}

fn short_label(label: &str) -> String {
    label.chars().take(usize::from(CHART_LABEL_WIDTH)).collect()
}

/// Renders the source's last-updated stamp as a calendar date, leaving
/// anything unparseable as the API sent it.
pub fn format_last_updated(raw: &str) -> String {
    const DISPLAY: &str = "%B %-d, %Y";

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format(DISPLAY).to_string();
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return timestamp.format(DISPLAY).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(DISPLAY).to_string();
    }
    raw.to_string()
}
