//! Text output helpers shared by the commands

use chrono::{DateTime, Utc};
use vidstats_analytics::Kpi;

/// Widest a table cell may get before it is truncated
const MAX_CELL_WIDTH: usize = 50;

/// Format a count with thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a ratio as a percentage with two decimals
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Format a count KPI, `N/A` when unavailable
pub fn format_kpi_count(kpi: &Kpi<u64>) -> String {
    kpi.value()
        .map_or_else(|| "N/A".to_string(), |v| format_count(*v))
}

/// Format an average KPI rounded to a whole number
pub fn format_kpi_avg(kpi: &Kpi<f64>) -> String {
    kpi.value().map_or_else(
        || "N/A".to_string(),
        |v| format_count(v.round().max(0.0) as u64),
    )
}

/// Format an optional timestamp
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Print rows as an aligned table
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(no data)");
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count()).min(MAX_CELL_WIDTH);
            }
        }
    }

    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:width$}", h, width = *w))
        .collect();
    println!("{}", header.join(" | "));

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", sep.join("-+-"));

    for row in rows {
        let values: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:width$}", truncate(cell, *w), width = *w))
            .collect();
        println!("{}", values.join(" | "));
    }
}

/// Print rows as CSV
pub fn print_csv(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", headers.join(","));
    for row in rows {
        let values: Vec<String> = row.iter().map(|v| csv_escape(v)).collect();
        println!("{}", values.join(","));
    }
}

/// Shorten to `width` characters, marking the cut with `...`
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Escape value for CSV output
fn csv_escape(s: &str) -> String {
    // Quote if contains comma, newline, or quote
    if s.contains(',') || s.contains('\n') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
