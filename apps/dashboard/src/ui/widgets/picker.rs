use crate::app::App;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_picker(app: &App, f: &mut Frame<'_>) {
    let Some(picker) = app.picker.as_ref() else {
        return;
    };

    let popup_area = centered_rect(60, 70, f.area());
    f.render_widget(ClearWidget, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(popup_area);

    let filter = Paragraph::new(TextLine::from(vec![
        Span::styled("> ", Style::default().fg(Color::Yellow)),
        Span::raw(picker.filter.clone()),
        Span::styled("_", Style::default().fg(Color::Gray)),
    ]))
    .block(
        Block::default()
            .title(format!(" {} ", picker.field.label()))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(filter, chunks[0]);

    let total_rows = picker.visible.len();
    let max_visible_rows = chunks[1].height.saturating_sub(2) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, picker.selected);

    let rows = picker
        .visible_options()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, option)| {
            let style = if index == picker.selected {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![Cell::from(option.label.clone())]).style(style)
        });

    let title = if total_rows == 0 {
        "No matches".to_string()
    } else {
        format!("{} of {}", picker.selected + 1, total_rows)
    };

    let table = Table::new(rows, [Constraint::Percentage(100)]).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(table, chunks[1]);
}
