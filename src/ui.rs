use crate::app::{App, AppScreen};
use crate::chat_view::draw_chat;
use crate::dashboard_view::draw_dashboard;
use crate::login_view::draw_login;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn ui(f: &mut Frame, app: &mut App) {
    match app.screen {
        AppScreen::Login => draw_login(f, app),
        AppScreen::Chat => draw_chat(f, app),
        AppScreen::Dashboard => draw_dashboard(f, app),
        AppScreen::QuitConfirm => {
            draw_chat(f, app);
            draw_quit_confirm(f);
        }
        AppScreen::Quit => {}
    }
}

fn draw_quit_confirm(f: &mut Frame) {
    let size = f.area();
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Min(1),
        ])
        .split(size);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(34),
            Constraint::Min(1),
        ])
        .split(vertical[1]);
    let area = horizontal[1];

    f.render_widget(Clear, area);
    let block = Block::default().borders(Borders::ALL).title(" Quit? ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from("Leave stockchat?"),
            Line::from(vec![
                Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to quit, "),
                Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to stay"),
            ]),
        ])
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center),
        inner,
    );
}
