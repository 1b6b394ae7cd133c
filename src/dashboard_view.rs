use crate::app::{App, DashboardState};
use crate::formatters::format_number;
use crate::metrics::InventoryMetrics;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Gauge, Paragraph},
    Frame,
};

const CHART_COLORS: [Color; 6] = [
    Color::Blue,
    Color::Yellow,
    Color::Green,
    Color::Red,
    Color::Magenta,
    Color::Cyan,
];

pub fn draw_dashboard(f: &mut Frame, app: &App) {
    let size = f.area();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Admin Dashboard — Inventory Metrics ");
    let inner = block.inner(size);
    f.render_widget(block, size);

    match &app.dashboard {
        DashboardState::Loading => {
            f.render_widget(
                Paragraph::new("Loading dashboard...")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                inner,
            );
        }
        DashboardState::Failed(message) => draw_error(f, inner, message),
        DashboardState::Loaded(metrics) => draw_metrics(f, inner, metrics),
    }
}

fn draw_error(f: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Error Loading Dashboard",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw(message.to_string())),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry, Esc for chat",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn draw_metrics(f: &mut Frame, area: Rect, metrics: &InventoryMetrics) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    draw_overview_cards(f, rows[0], metrics);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[1]);

    draw_category_gauges(f, charts[0], metrics);
    draw_brand_chart(f, charts[1], metrics);

    f.render_widget(
        Paragraph::new(Span::styled(
            "r refresh  Esc chat  Ctrl+q quit",
            Style::default().fg(Color::DarkGray),
        )),
        rows[2],
    );
}

fn draw_overview_cards(f: &mut Frame, area: Rect, metrics: &InventoryMetrics) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ]
            .as_ref(),
        )
        .split(area);

    let values = [
        ("Total Products", format_number(metrics.total_products as u64)),
        ("Total Stock Units", format_number(metrics.total_stock)),
        (
            "Product Categories",
            format_number(metrics.categories.len() as u64),
        ),
        (
            "Avg Stock / Product",
            format!("{:.1}", metrics.avg_stock_per_product),
        ),
    ];

    for (i, (title, value)) in values.iter().enumerate() {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                value.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                (*title).to_string(),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(card, cards[i]);
    }
}

fn draw_category_gauges(f: &mut Frame, area: Rect, metrics: &InventoryMetrics) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Stock by Category ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if metrics.stock_by_category.is_empty() {
        f.render_widget(
            Paragraph::new("No inventory").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let mut constraints = vec![Constraint::Length(1); metrics.stock_by_category.len()];
    constraints.push(Constraint::Min(0));
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, entry) in metrics.stock_by_category.iter().enumerate() {
        if i >= slots.len().saturating_sub(1) {
            break;
        }
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(CHART_COLORS[i % CHART_COLORS.len()]))
            .ratio((entry.percentage / 100.0).clamp(0.0, 1.0))
            .label(format!(
                "{} — {} units ({:.1}%)",
                entry.category, entry.stock, entry.percentage
            ));
        f.render_widget(gauge, slots[i]);
    }
}

fn draw_brand_chart(f: &mut Frame, area: Rect, metrics: &InventoryMetrics) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Stock by Brand ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if metrics.stock_by_brand.is_empty() {
        f.render_widget(
            Paragraph::new("No inventory").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    // Already sorted descending, so the chart reads left to right.
    let data: Vec<(&str, u64)> = metrics
        .stock_by_brand
        .iter()
        .map(|b| (b.brand.as_str(), b.stock))
        .collect();

    let chart = BarChart::default()
        .data(&data)
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(chart, inner);
}
