use crate::app::state::FOCUS_SLOTS;
use crate::app::App;
use crate::ui::widgets::results::render_results_panel;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use steel_trade_dashboard::form::{FormField, REQUIRED_MESSAGE};
use throbber_widgets_tui::Throbber;

pub fn render_dashboard(app: &App, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title area
            Constraint::Min(10),   // Form and results
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)));

    render_title_section(app, f, main_layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_layout[1]);

    render_form_section(app, f, body[0]);
    render_results_panel(app, f, body[1]);
    render_status_section(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut spans = vec![
        Span::styled(
            "Steel Trade ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Statistics Dashboard",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if !app.actions.is_configured() {
        spans.push(Span::styled(
            "  (offline: API not configured)",
            Style::default().fg(Color::Red),
        ));
    }

    let title_paragraph = Paragraph::new(TextLine::from(spans))
        .block(title_block)
        .alignment(Alignment::Left);
    f.render_widget(title_paragraph, area);
}

fn render_form_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let form_block = Block::default()
        .title(" Query ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let mut lines = Vec::new();
    for field in FormField::ALL {
        lines.extend(field_lines(app, field));
    }

    lines.push(TextLine::from(""));
    lines.push(generate_button_line(app));

    if app.options_loading {
        let throbber = Throbber::default();
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(vec![
            throbber.to_symbol_span(&app.throbber_state),
            Span::styled(" Loading options...", Style::default().fg(Color::Gray)),
        ]));
    }

    let form_paragraph = Paragraph::new(Text::from(lines))
        .block(form_block)
        .wrap(Wrap { trim: true });
    f.render_widget(form_paragraph, area);
}

fn field_lines(app: &App, field: FormField) -> Vec<TextLine<'static>> {
    let focused = app.focused_field() == Some(field);
    let label_style = if focused {
        Style::default()
            .bg(Color::Rgb(0, 0, 238))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let value = app.form.display_value(field).map_or_else(
        || Span::styled("Select...", Style::default().fg(Color::DarkGray)),
        |value| Span::styled(value, Style::default().fg(Color::Yellow)),
    );

    let mut lines = vec![
        TextLine::from(Span::styled(format!(" {} ", field.label()), label_style)),
        TextLine::from(vec![Span::raw("  "), value]),
    ];

    if app.validation_errors.contains(&field) {
        lines.push(TextLine::from(Span::styled(
            format!("  {REQUIRED_MESSAGE}"),
            Style::default().fg(Color::Red),
        )));
    }

    lines
}

fn generate_button_line(app: &App) -> TextLine<'static> {
    let focused = app.focus_index == FOCUS_SLOTS - 1;
    let style = if focused {
        Style::default()
            .bg(Color::Rgb(0, 0, 238))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };

    TextLine::from(Span::styled("[ Generate Dashboard ]", style))
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let status_paragraph = Paragraph::new(Text::from(Span::styled(&app.status_message, style)))
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(Color::Gray);

    let shortcuts = TextLine::from(vec![
        Span::styled("F1", key_style),
        Span::styled(": Help | ", text_style),
        Span::styled("↑/↓", key_style),
        Span::styled(": Field | ", text_style),
        Span::styled("Enter", key_style),
        Span::styled(": Choose | ", text_style),
        Span::styled("g", key_style),
        Span::styled(": Generate | ", text_style),
        Span::styled("←/→", key_style),
        Span::styled(": Period | ", text_style),
        Span::styled("q", key_style),
        Span::styled(": Quit", text_style),
    ]);

    f.render_widget(
        Paragraph::new(shortcuts).alignment(Alignment::Center),
        area,
    );
}
