//! Plain-text rendering of the results views for the terminal.
//!
//! Only layout lives here; every number, label and placeholder comes from the
//! view models in `dashboard_engine`.

use dashboard_engine::aggregation::LineSection;
use dashboard_engine::format::{format_currency, CURRENCY_SYMBOL};
use dashboard_engine::{AggregationView, AlertPanel, ChartData, ChartsView, Listing};
use models::{ChatMessage, Doubt};
use session::doubts::NO_DOUBTS;

const BAR_WIDTH: usize = 30;
const INDENT: &str = "  ";

pub fn render_view(view: &AggregationView) -> String {
    let mut lines = vec![format!(
        "Total waste: {} across {} transactions ({} of 4 categories flagged)",
        view.total_waste_display, view.transaction_count, view.categories_with_activity
    )];

    lines.push(String::new());
    lines.push("Waste by category".to_string());
    let width = view
        .category_summary
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0);
    for row in &view.category_summary {
        lines.push(format!(
            "{INDENT}{:<width$}  {:>3}  {}",
            row.label, row.count, row.total_display
        ));
    }

    section(&mut lines, "Top merchants", &view.merchants, |m| {
        format!("{}. {}  {}  {}", m.rank, m.name, m.count_display, m.amount_display)
    });
    section(&mut lines, "Spending by category", &view.category_spending, |s| {
        format!("{} {}  {}", s.icon, s.category, s.amount_display)
    });
    section(&mut lines, "Repeating charges", &view.repeating_charges, |c| {
        format!(
            "{}  {}  {} (avg {CURRENCY_SYMBOL}{})",
            c.merchant, c.occurrences, c.total_display, c.average_display
        )
    });

    for (title, lines_section) in [
        ("Micro transactions", &view.micro_transactions),
        ("Fees & Charges", &view.fees),
        ("Penalties", &view.penalties),
    ] {
        line_section(&mut lines, title, lines_section);
    }

    section(&mut lines, "Suggestions", &view.suggestions, |s| format!("- {s}"));
    lines.join("\n")
}

pub fn render_alerts(panel: &AlertPanel) -> String {
    let counts = panel.counts;
    let mut lines = vec![format!(
        "[{}] {} ({} critical, {} high, {} medium, {} low)",
        panel.tier.as_str().to_uppercase(),
        panel.headline,
        counts.critical,
        counts.high,
        counts.medium,
        counts.low
    )];

    match &panel.alerts {
        Listing::Empty { placeholder } => lines.push(format!("{INDENT}{placeholder}")),
        Listing::Items { items } => {
            for alert in items {
                lines.push(format!(
                    "{INDENT}{:<8}  {}",
                    alert.severity.as_str().to_uppercase(),
                    alert.title
                ));
                let pad = format!("{INDENT}{:<8}  ", "");
                if !alert.description.is_empty() {
                    lines.push(format!("{pad}{}", alert.description));
                }
                if !alert.impact.is_empty() {
                    lines.push(format!("{pad}Impact: {}", alert.impact));
                }
                if !alert.action.is_empty() {
                    lines.push(format!("{pad}Action: {}", alert.action));
                }
            }
        }
    }
    lines.join("\n")
}

pub fn render_charts(charts: &ChartsView) -> String {
    let mut lines = vec!["Waste by category".to_string()];
    chart(&mut lines, &charts.categories);
    lines.push(String::new());
    lines.push("Top merchants".to_string());
    chart(&mut lines, &charts.merchants);
    lines.join("\n")
}

fn chart(lines: &mut Vec<String>, data: &ChartData) {
    match data {
        ChartData::NoData { message } => lines.push(format!("{INDENT}{message}")),
        ChartData::Series { points } => {
            let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
            let width = points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0);
            for p in points {
                lines.push(format!(
                    "{INDENT}{:<width$}  {:<BAR_WIDTH$}  {}",
                    p.label,
                    bar(p.value, max),
                    format_currency(p.value)
                ));
            }
        }
    }
}

/// Proportional to `max`; any positive value gets at least one block.
pub fn bar(value: f64, max: f64) -> String {
    if value <= 0.0 || max <= 0.0 {
        return String::new();
    }
    let blocks = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(blocks.clamp(1, BAR_WIDTH))
}

pub fn render_doubts(doubts: &[Doubt]) -> String {
    if doubts.is_empty() {
        return format!("{INDENT}{NO_DOUBTS}");
    }
    doubts
        .iter()
        .map(|d| {
            format!(
                "{INDENT}[{}] {}  {}  ({})",
                if d.is_resolved() { "x" } else { " " },
                d.id,
                d.text,
                d.created_at.format("%d %b %Y, %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_message(message: &ChatMessage) -> String {
    match message.sender {
        models::Sender::User => format!("you> {}", message.text),
        models::Sender::Ai => format!("assistant> {}", message.text),
    }
}

fn section<T>(lines: &mut Vec<String>, title: &str, listing: &Listing<T>, row: impl Fn(&T) -> String) {
    lines.push(String::new());
    lines.push(title.to_string());
    match listing {
        Listing::Empty { placeholder } => lines.push(format!("{INDENT}{placeholder}")),
        Listing::Items { items } => {
            lines.extend(items.iter().map(|item| format!("{INDENT}{}", row(item))));
        }
    }
}

fn line_section(lines: &mut Vec<String>, title: &str, section_view: &LineSection) {
    lines.push(String::new());
    lines.push(title.to_string());
    if let Some(headline) = &section_view.headline {
        lines.push(format!("{INDENT}{headline}"));
    }
    match &section_view.rows {
        Listing::Empty { placeholder } => lines.push(format!("{INDENT}{placeholder}")),
        Listing::Items { items } => {
            for row in items {
                let badge = row
                    .category
                    .as_ref()
                    .map(|c| format!("  [{c}]"))
                    .unwrap_or_default();
                lines.push(format!("{INDENT}- {}  {}{badge}", row.line, row.amount_display));
            }
        }
    }
    if let Some(more) = &section_view.more {
        lines.push(format!("{INDENT}{more}"));
    }
}
