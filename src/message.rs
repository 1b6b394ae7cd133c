use crate::formatters::{format_currency, format_specifications, format_time, parse_message_content};
use crate::models::Product;
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;

pub const WELCOME_MESSAGE: &str =
    "Hi! Welcome to Makers Tech Inventory Assistant. What can I help you with?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Bot,
}

/// One entry in the conversation log. Immutable once appended; the only bulk
/// mutation is the session dropping `is_error` entries on retry.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: u64,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Local>,
    pub products: Vec<Product>,
    pub is_error: bool,
    pub is_welcome: bool,
}

impl ChatMessage {
    pub fn user(id: u64, content: String) -> Self {
        Self {
            id,
            kind: MessageKind::User,
            content,
            timestamp: Local::now(),
            products: Vec::new(),
            is_error: false,
            is_welcome: false,
        }
    }

    pub fn bot(id: u64, content: String, products: Vec<Product>, timestamp: DateTime<Local>) -> Self {
        Self {
            id,
            kind: MessageKind::Bot,
            content,
            timestamp,
            products,
            is_error: false,
            is_welcome: false,
        }
    }

    pub fn error(id: u64, content: String) -> Self {
        Self {
            id,
            kind: MessageKind::Bot,
            content,
            timestamp: Local::now(),
            products: Vec::new(),
            is_error: true,
            is_welcome: false,
        }
    }

    pub fn welcome(id: u64) -> Self {
        Self {
            id,
            kind: MessageKind::Bot,
            content: WELCOME_MESSAGE.to_string(),
            timestamp: Local::now(),
            products: Vec::new(),
            is_error: false,
            is_welcome: true,
        }
    }

    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }

    pub fn render(&self, area: Rect) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let base_style = self.base_style();
        let indent = if self.is_user() { "  " } else { "" };

        self.render_header(&mut lines, base_style, indent);
        self.render_content(&mut lines, area, base_style, indent);
        self.render_products(&mut lines, base_style, indent);

        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), base_style),
            Span::styled("╰─".to_string(), base_style),
        ]));

        lines
    }

    fn base_style(&self) -> Style {
        if self.is_error {
            return Style::default().fg(Color::Red);
        }
        let mut style = Style::default().fg(if self.is_user() {
            Color::Rgb(255, 223, 128)
        } else {
            Color::Rgb(144, 238, 144)
        });
        // Replies carrying prices/quantities get a bolder treatment
        if !self.is_user() && parse_message_content(&self.content).has_structured_data() {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    fn render_header(&self, lines: &mut Vec<Line<'static>>, style: Style, indent: &str) {
        let who = match (self.kind, self.is_error) {
            (MessageKind::User, _) => "you",
            (_, true) => "assistant ✗",
            (_, false) => "assistant",
        };

        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled("┌─".to_string(), style),
            Span::styled(
                format_time(self.timestamp),
                style.add_modifier(Modifier::DIM),
            ),
            Span::styled(" ", style),
            Span::styled(who.to_string(), style),
        ]));
    }

    fn render_content(&self, lines: &mut Vec<Line<'static>>, area: Rect, style: Style, indent: &str) {
        let wrap_width = (area.width as usize).saturating_sub(4).max(8);
        for wrapped_line in wrap(&self.content, wrap_width) {
            lines.push(Line::from(vec![
                Span::styled(indent.to_string(), style),
                Span::styled("│ ".to_string(), style),
                Span::styled(wrapped_line.to_string(), style),
            ]));
        }
    }

    fn render_products(&self, lines: &mut Vec<Line<'static>>, style: Style, indent: &str) {
        for product in &self.products {
            let status = product.stock_status();
            lines.push(Line::from(vec![
                Span::styled(indent.to_string(), style),
                Span::styled("│ ".to_string(), style),
                Span::styled("▎ ".to_string(), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{} ({})", product.name, product.brand),
                    style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}  ", format_currency(product.price)),
                    style,
                ),
                Span::styled(
                    status.label().to_string(),
                    Style::default().fg(status.color()),
                ),
            ]));

            for (key, value) in format_specifications(&product.specifications) {
                lines.push(Line::from(vec![
                    Span::styled(indent.to_string(), style),
                    Span::styled("│ ".to_string(), style),
                    Span::styled(
                        format!("    {}: {}", key, value),
                        style.add_modifier(Modifier::DIM),
                    ),
                ]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_message_flags() {
        let msg = ChatMessage::welcome(1);
        assert!(msg.is_welcome);
        assert!(!msg.is_error);
        assert_eq!(msg.kind, MessageKind::Bot);
        assert_eq!(msg.content, WELCOME_MESSAGE);
    }

    #[test]
    fn test_error_message_flags() {
        let msg = ChatMessage::error(2, "boom".to_string());
        assert!(msg.is_error);
        assert!(!msg.is_welcome);
        assert_eq!(msg.kind, MessageKind::Bot);
    }

    #[test]
    fn test_render_wraps_long_content() {
        let msg = ChatMessage::user(3, "word ".repeat(40).trim().to_string());
        let area = Rect::new(0, 0, 30, 10);
        let lines = msg.render(area);
        // header + several wrapped lines + footer
        assert!(lines.len() > 4);
    }
}
