use crate::session::ConnectionStatus;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Spinner plus connection badge drawn between the message pane and the
/// input line.
#[derive(Debug)]
pub struct StatusIndicator {
    thinking: bool,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self {
            thinking: false,
            spinner_idx: 0,
        }
    }

    pub fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, connection: ConnectionStatus) {
        let spinner_frames = ["◐", "◓", "◑", "◒"];
        let thinking_indicator = if self.thinking {
            spinner_frames[self.spinner_idx % spinner_frames.len()]
        } else {
            " "
        };

        let status_text = if self.thinking { "Thinking..." } else { "" };

        let line = Line::from(vec![
            Span::styled("● ", Style::default().fg(connection.color())),
            Span::styled(
                connection.label(),
                Style::default().fg(connection.color()),
            ),
            Span::raw("  "),
            Span::styled(thinking_indicator, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(status_text, Style::default().fg(Color::DarkGray)),
        ]);

        frame.render_widget(
            Paragraph::new(line).alignment(ratatui::layout::Alignment::Left),
            Rect {
                x: area.x,
                y: area.y + area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            },
        );
    }
}
