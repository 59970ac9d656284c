//! Text for `log.txt` and the console stats table.

use chrono::{DateTime, TimeZone};

use crate::config::AgencyDescriptor;
use crate::stats::RunStats;

/// Column widths of the stats table, padding included.
const COLUMN_WIDTHS: [usize; 2] = [40, 20];

/// Builds the contents of `log.txt`, one fact per line.
pub fn generate_log_text<Tz: TimeZone>(
    agency: &AgencyDescriptor,
    stats: &RunStats,
    feed_version: Option<&str>,
    tool_version: &str,
    generated_at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let feed_version = feed_version.filter(|v| !v.is_empty()).unwrap_or("Unknown");

    let mut lines = vec![
        format!("Feed Version: {feed_version}"),
        format!("GTFS-to-JSON Version: {tool_version}"),
        format!(
            "Date Generated: {}",
            generated_at.format("%a %b %d %Y %H:%M:%S GMT%z")
        ),
        format!("Route Count: {}", stats.routes),
        format!("Stop Count: {}", stats.stops),
    ];

    if let Some(source) = agency.source() {
        lines.push(format!("Source: {source}"));
    }

    lines.join("\n")
}

/// Renders route and stop counts as a two-column box table.
pub fn stats_table(stats: &RunStats) -> String {
    let rows = [
        ["Item".to_string(), "Count".to_string()],
        ["Routes".to_string(), stats.routes.to_string()],
        ["Stops".to_string(), stats.stops.to_string()],
    ];

    let mut lines = vec![border('┌', '┬', '┐')];
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            lines.push(border('├', '┼', '┤'));
        }
        lines.push(table_row(row));
    }
    lines.push(border('└', '┴', '┘'));

    lines.join("\n")
}

fn border(left: char, middle: char, right: char) -> String {
    let [first, second] = COLUMN_WIDTHS.map(|width| "─".repeat(width));
    format!("{left}{first}{middle}{second}{right}")
}

fn table_row(cells: &[String; 2]) -> String {
    let [first, second] = COLUMN_WIDTHS;
    format!(
        "│ {:<w1$} │ {:<w2$} │",
        truncate(&cells[0], first - 2),
        truncate(&cells[1], second - 2),
        w1 = first - 2,
        w2 = second - 2,
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}
