//! Plain-text rendering of summary tables for the terminal.

use crate::aggregator::table::{OutputTable, StatsTable};

const KEY_WIDTH: usize = 44;
const CELL_WIDTH: usize = 16;

/// Render a stats table as aligned text
///
/// **Public** - printed by `--summary`
///
/// Column headings take three lines (bench, workload, tool). Keys longer
/// than the key column are shortened from the left.
pub fn render_table(table: &StatsTable) -> String {
    let mut lines = Vec::new();
    let rule = "=".repeat(KEY_WIDTH + 3 + table.columns.len() * (CELL_WIDTH + 3));

    lines.push(rule.clone());
    lines.push(format!("  {}", table.title.to_uppercase()));
    lines.push(rule.clone());

    let heading = |labels: Vec<&str>| {
        let cells: Vec<String> = labels
            .iter()
            .map(|l| format!("{:>width$}", clip(l, CELL_WIDTH), width = CELL_WIDTH))
            .collect();
        format!("  {:<width$} | {}", "", cells.join(" | "), width = KEY_WIDTH)
    };
    lines.push(heading(table.columns.iter().map(|c| c.bench.as_str()).collect()));
    lines.push(heading(table.columns.iter().map(|c| c.workload.as_str()).collect()));
    lines.push(heading(table.columns.iter().map(|c| c.tool.as_str()).collect()));
    lines.push(format!("  {}", "-".repeat(rule.len() - 2)));

    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|v| format!("{:>width$}", format_cell(*v), width = CELL_WIDTH))
            .collect();
        lines.push(format!(
            "  {:<width$} | {}",
            clip(&row.key, KEY_WIDTH),
            cells.join(" | "),
            width = KEY_WIDTH
        ));
    }
    lines.push(rule);

    lines.join("\n")
}

/// Render the output table as one line per run
pub fn render_output_table(table: &OutputTable) -> String {
    let mut lines = vec!["  STATS FILES".to_string()];
    for row in &table.rows {
        for (column, file) in table.columns.iter().zip(&row.files) {
            if file.is_empty() {
                continue;
            }
            lines.push(format!(
                "  {:<12} {:<10} trial {:<3} {:<24} {}",
                row.bench, row.workload, column.trial, column.tool, file
            ));
        }
    }
    lines.join("\n")
}

/// **Private** - integers without a fraction, others at table precision
fn format_cell(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.3}", value)
    }
}

/// **Private** - keep the tail of an over-long label
fn clip(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        text.to_string()
    } else {
        let tail: String = text.chars().skip(count - (width - 3)).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::table::{Column, OutputRow, RunColumn, TableRow};

    fn table() -> StatsTable {
        StatsTable {
            title: "Simulator stats".to_string(),
            columns: vec![Column {
                bench: "x264".to_string(),
                workload: "simsmall".to_string(),
                tool: "mesi8".to_string(),
            }],
            rows: vec![
                TableRow {
                    key: "max_BandwidthDrivenCycleCount".to_string(),
                    cells: vec![1200.0],
                },
                TableRow {
                    key: "AverageRegionSize".to_string(),
                    cells: vec![1.6667],
                },
            ],
        }
    }

    #[test]
    fn test_render_table_contents() {
        let text = render_table(&table());

        assert!(text.contains("SIMULATOR STATS"));
        assert!(text.contains("mesi8"));
        assert!(text.contains("1200"));
        assert!(!text.contains("1200.000"));
        assert!(text.contains("1.667"));
    }

    #[test]
    fn test_clip_keeps_tail() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("abcdefghijkl", 8), "...hijkl");
    }

    #[test]
    fn test_render_output_table_skips_absent_runs() {
        let table = OutputTable {
            columns: vec![
                RunColumn {
                    trial: "1".to_string(),
                    tool: "mesi8".to_string(),
                },
                RunColumn {
                    trial: "1".to_string(),
                    tool: "viser8".to_string(),
                },
            ],
            rows: vec![OutputRow {
                bench: "x264".to_string(),
                workload: "simsmall".to_string(),
                files: vec!["simsmall/1/x264/mesi8-stats.py".to_string(), String::new()],
            }],
        };
        let text = render_output_table(&table);

        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("mesi8-stats.py"));
    }
}
