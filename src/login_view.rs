use crate::app::{App, LoginField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_login(f: &mut Frame, app: &App) {
    let size = f.area();

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(12),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(size);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(48),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(vertical[1]);
    let form_area = horizontal[1];

    let block = Block::default().borders(Borders::ALL).title(" Makers Tech ");
    let inner = block.inner(form_area);
    f.render_widget(block, form_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(inner);

    f.render_widget(
        Paragraph::new("Sign in to your account")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        rows[0],
    );

    draw_field(
        f,
        rows[2],
        "Email",
        &app.login_email,
        app.login_field == LoginField::Email,
        false,
    );
    draw_field(
        f,
        rows[3],
        "Password",
        &app.login_password,
        app.login_field == LoginField::Password,
        true,
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" switches fields, "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" signs in ('admin' emails get the dashboard)"),
        ]))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center),
        rows[4],
    );

    if app.login_field == LoginField::Email {
        f.set_cursor_position((
            rows[2].x + 10 + app.login_email.len() as u16,
            rows[2].y,
        ));
    } else {
        f.set_cursor_position((
            rows[3].x + 10 + app.login_password.len() as u16,
            rows[3].y,
        ));
    }
}

fn draw_field(f: &mut Frame, area: Rect, label: &str, value: &str, active: bool, mask: bool) {
    let label_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let shown = if mask {
        "•".repeat(value.len())
    } else {
        value.to_string()
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:>8}: ", label), label_style),
            Span::styled(shown, Style::default().fg(Color::White)),
        ])),
        area,
    );
}
