// src/formatters.rs
//
// Pure display helpers for the chat and dashboard views.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static CURRENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[\d,]+\.?\d*").expect("valid currency regex"));
static PERCENTAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.?\d*%").expect("valid percentage regex"));
static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s+(unit|units|piece|pieces|item|items)").expect("valid quantity regex")
});

/// Formats a currency amount as `$1,234.56`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let fraction = cents % 100;
    if negative {
        format!("-${}.{:02}", whole, fraction)
    } else {
        format!("${}.{:02}", whole, fraction)
    }
}

/// Formats an integer with thousands separators.
pub fn format_number(number: u64) -> String {
    group_thousands(number)
}

fn group_thousands(number: u64) -> String {
    let digits = number.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a timestamp as `02:35 PM` for message headers.
pub fn format_time(timestamp: DateTime<Local>) -> String {
    timestamp.format("%I:%M %p").to_string()
}

/// Turns a camelCase specification key into a spaced, capitalized label,
/// e.g. `screenSize` -> `Screen Size`.
fn format_spec_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else {
            if c.is_uppercase() {
                label.push(' ');
            }
            label.push(c);
        }
    }
    label.trim().to_string()
}

/// Flattens a specifications map into display pairs, sorted by key so the
/// product card is stable across renders.
pub fn format_specifications(
    specs: &HashMap<String, serde_json::Value>,
) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = specs
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (format_spec_key(key), rendered)
        })
        .collect();
    pairs.sort();
    pairs
}

/// Truncates to `max_len` characters, ellipsis included in the budget.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let truncated: String = text.chars().take(keep).collect();
    format!("{}...", truncated)
}

/// Validates outgoing message text; returns the trimmed text or the error
/// string shown next to the input line.
pub fn validate_message(message: &str, max_len: usize) -> Result<String, String> {
    let trimmed = message.trim();

    if trimmed.is_empty() {
        return Err("Message cannot be empty".to_string());
    }

    if trimmed.chars().count() > max_len {
        return Err(format!(
            "Message too long ({}/{} characters)",
            trimmed.chars().count(),
            max_len
        ));
    }

    Ok(trimmed.to_string())
}

/// Structured patterns detected inside a bot reply; the chat view styles
/// replies that carry them differently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHighlights {
    pub has_currency: bool,
    pub has_percentage: bool,
    pub has_quantity: bool,
}

impl MessageHighlights {
    pub fn has_structured_data(&self) -> bool {
        self.has_currency || self.has_percentage || self.has_quantity
    }
}

pub fn parse_message_content(content: &str) -> MessageHighlights {
    MessageHighlights {
        has_currency: CURRENCY_RE.is_match(content),
        has_percentage: PERCENTAGE_RE.is_match(content),
        has_quantity: QUANTITY_RE.is_match(content),
    }
}
