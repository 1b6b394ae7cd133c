use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw_chat(f: &mut Frame, app: &mut App) {
    let size = f.area();
    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
        .margin(1)
        .split(size);

    let chat_vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(2),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(horizontal_chunks[0]);

    draw_messages(f, app, chat_vertical_chunks[0]);

    app.status_indicator.update_spinner();
    app.status_indicator
        .render(f, chat_vertical_chunks[1], app.session.connection);

    draw_input(f, app, chat_vertical_chunks[2]);
    draw_logs(f, app, horizontal_chunks[1], size);
}

fn draw_messages(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for message in app.session.messages.iter() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(message.render(area));
    }

    let total_lines = lines.len() as u16;
    let max_scroll = total_lines.saturating_sub(area.height);
    let chat_scroll = app.chat_scroll.min(max_scroll);

    let msgs_para = Paragraph::new(lines)
        .style(Style::default())
        .block(Block::default())
        .wrap(Wrap { trim: true });
    f.render_widget(msgs_para.scroll((chat_scroll, 0)), area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let separator = "─".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator.clone(),
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );

    let prefix_style = if app.session.is_loading {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let input = Line::from(vec![
        Span::styled("→ ", prefix_style),
        Span::styled(&app.chat_input, Style::default().fg(Color::White)),
    ]);

    let visible_width = area.width.saturating_sub(2);
    let text_width = app.chat_input.width() as u16;
    let scroll_offset = text_width.saturating_sub(visible_width);

    f.render_widget(
        Paragraph::new(input).scroll((0, scroll_offset)),
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        },
    );

    // Validation / turn errors sit at the right edge of the input row.
    let notice = app
        .input_error
        .as_deref()
        .or(app.session.error.as_deref());
    if let Some(notice) = notice {
        let notice_text = format!(" {} (^r retries, ^e dismisses) ", notice);
        let width = (notice_text.len() as u16).min(area.width);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                notice_text,
                Style::default().fg(Color::Red),
            ))),
            Rect {
                x: area.x + area.width - width,
                y: area.y + 1,
                width,
                height: 1,
            },
        );
    }

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        },
    );

    let cursor_x = area.x + 2 + text_width - scroll_offset;
    f.set_cursor_position((cursor_x, area.y + 1));
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect, size: Rect) {
    let vsep = "│".repeat(size.height.saturating_sub(2) as usize);
    f.render_widget(
        Paragraph::new(Span::raw(vsep)).style(Style::default().fg(Color::DarkGray)),
        Rect {
            x: area.x.saturating_sub(1),
            y: 1,
            width: 1,
            height: size.height.saturating_sub(2),
        },
    );

    let log_lines: Vec<Line> = app
        .logs
        .entries
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::DarkGray)),
                Span::raw(entry.as_str()),
            ])
        })
        .collect();

    let total_log_lines = log_lines.len() as u16;
    let max_log_scroll = total_log_lines.saturating_sub(area.height);
    let logs_scroll = app.logs_scroll.min(max_log_scroll);

    let logs_para = Paragraph::new(log_lines)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    f.render_widget(logs_para.scroll((logs_scroll, 0)), area);
}
