//! Exploratory analysis of the road-test table.
//!
//! - Five-number summaries of a column per transmission group, with a text
//!   box plot on a shared axis
//! - Pearson correlation matrix over the numeric columns, with a text heat
//!   grid
//! - Pairwise scatter matrix of the column and its strongest correlates
//! - Welch two-sample t-test of a column by transmission (the unadjusted
//!   comparison)

use crate::data::{DataFrame, Transmission};
use crate::error::{AnalysisError, Result};
use crate::plot::render_scatter;
use crate::primitives::Vector;
use crate::stats::{corr_matrix, ttest_ind, DescriptiveStats, FiveNumberSummary, TTestResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Column holding the 0/1 transmission code.
pub const TRANSMISSION_COLUMN: &str = "am";

/// Correlates drawn next to the explored column in the scatter matrix.
pub const SCATTER_CORRELATES: usize = 3;

/// Heat-grid glyphs, weakest to strongest |r|.
const SHADES: [char; 5] = [' ', '.', ':', '+', '#'];

/// One transmission group's distribution of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub transmission: Transmission,
    pub n: usize,
    pub mean: f64,
    pub summary: FiveNumberSummary,
}

/// Pearson correlations between named columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationTable {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` squared.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationTable {
    /// Correlation between columns `a` and `b`.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Correlations with `column`, strongest first, excluding itself.
    #[must_use]
    pub fn ranked_against(&self, column: &str) -> Vec<(String, f64)> {
        let Some(i) = self.columns.iter().position(|c| c == column) else {
            return Vec::new();
        };
        let mut ranked: Vec<(String, f64)> = self
            .columns
            .iter()
            .zip(&self.values[i])
            .filter(|(name, _)| name.as_str() != column)
            .map(|(name, r)| (name.clone(), *r))
            .collect();
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        ranked
    }

    /// Numeric grid with two decimals.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{:>6}", "");
        for name in &self.columns {
            let _ = write!(out, "{name:>7}");
        }
        out.push('\n');
        for (name, row) in self.columns.iter().zip(&self.values) {
            let _ = write!(out, "{name:>6}");
            for r in row {
                let _ = write!(out, "{r:>7.2}");
            }
            out.push('\n');
        }
        out
    }

    /// One glyph per cell by |r|: blank below 0.2, `#` from 0.8.
    #[must_use]
    pub fn render_heat(&self) -> String {
        let mut out = format!("{:>6} ", "");
        for name in &self.columns {
            out.push(name.chars().next().unwrap_or(' '));
        }
        out.push('\n');
        for (name, row) in self.columns.iter().zip(&self.values) {
            let _ = write!(out, "{name:>6} ");
            out.extend(row.iter().map(|r| shade(*r)));
            out.push('\n');
        }
        out
    }
}

/// Columns plotted against each other pairwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterMatrix {
    pub columns: Vec<String>,
    /// One series per column, in row order.
    pub data: Vec<Vec<f64>>,
}

impl ScatterMatrix {
    /// k by k cells of `cell_width` x `cell_height`; names on the diagonal,
    /// the row's column on the y axis.
    #[must_use]
    pub fn render(&self, cell_width: usize, cell_height: usize) -> String {
        let w = cell_width.max(2);
        let h = cell_height.max(2);
        let k = self.columns.len();
        let separator = vec!["-".repeat(w); k].join("+");

        let mut out = String::new();
        for (i, y) in self.data.iter().enumerate() {
            if i > 0 {
                out.push_str(&separator);
                out.push('\n');
            }
            let cells: Vec<Vec<String>> = self
                .data
                .iter()
                .enumerate()
                .map(|(j, x)| {
                    if i == j {
                        diagonal_cell(&self.columns[i], w, h)
                    } else {
                        render_scatter(x, y, w, h, None)
                    }
                })
                .collect();
            for line in 0..h {
                let row: Vec<&str> = cells.iter().map(|c| c[line].as_str()).collect();
                out.push_str(&row.join("|"));
                out.push('\n');
            }
        }
        out
    }
}

fn diagonal_cell(name: &str, width: usize, height: usize) -> Vec<String> {
    let name: String = name.chars().take(width).collect();
    (0..height)
        .map(|line| {
            if line == height / 2 {
                format!("{name:^width$}")
            } else {
                " ".repeat(width)
            }
        })
        .collect()
}

fn shade(r: f64) -> char {
    let level = ((r.abs() * 5.0).floor() as usize).min(SHADES.len() - 1);
    SHADES[level]
}

/// Everything the exploratory step reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exploration {
    pub column: String,
    pub groups: Vec<GroupSummary>,
    pub correlation: CorrelationTable,
    pub scatter: ScatterMatrix,
    /// Automatic minus manual.
    pub transmission_test: TTestResult,
}

/// Values of `column` for cars with transmission `level`.
///
/// # Errors
///
/// Returns an error if `column` or the transmission column is missing.
pub fn values_by_transmission(
    frame: &DataFrame,
    column: &str,
    level: Transmission,
) -> Result<Vec<f64>> {
    let values = frame.column(column)?;
    let codes = frame.column(TRANSMISSION_COLUMN)?;
    Ok(values
        .iter()
        .zip(codes.iter())
        .filter(|(_, code)| (**code - level.code()).abs() < 0.5)
        .map(|(v, _)| *v)
        .collect())
}

/// Five-number summary of `column` for each transmission level.
///
/// # Errors
///
/// Returns an error if a column is missing or a group is empty.
pub fn group_summaries(frame: &DataFrame, column: &str) -> Result<Vec<GroupSummary>> {
    Transmission::ALL
        .iter()
        .map(|&transmission| {
            let values = Vector::from_vec(values_by_transmission(frame, column, transmission)?);
            if values.is_empty() {
                return Err(AnalysisError::InsufficientData {
                    needed: 1,
                    actual: 0,
                });
            }
            let summary = DescriptiveStats::new(&values).five_number_summary()?;
            Ok(GroupSummary {
                transmission,
                n: values.len(),
                mean: values.mean(),
                summary,
            })
        })
        .collect()
}

/// Pearson correlation matrix of `columns`.
///
/// # Errors
///
/// Returns an error if a column is missing or has zero variance.
pub fn correlation_table(frame: &DataFrame, columns: &[&str]) -> Result<CorrelationTable> {
    let matrix = corr_matrix(&frame.select(columns)?.to_matrix())?;
    let p = columns.len();
    let values = (0..p)
        .map(|i| (0..p).map(|j| matrix.get(i, j)).collect())
        .collect();
    Ok(CorrelationTable {
        columns: columns.iter().map(|c| (*c).to_string()).collect(),
        values,
    })
}

/// Pairwise scatter data for `columns`.
///
/// # Errors
///
/// Returns an error if a column is missing.
pub fn scatter_matrix(frame: &DataFrame, columns: &[&str]) -> Result<ScatterMatrix> {
    let data = columns
        .iter()
        .map(|c| Ok(frame.column(c)?.as_slice().to_vec()))
        .collect::<Result<Vec<_>>>()?;
    Ok(ScatterMatrix {
        columns: columns.iter().map(|c| (*c).to_string()).collect(),
        data,
    })
}

/// Welch t-test of `column`, automatic group first.
///
/// # Errors
///
/// Returns an error if a column is missing or a group has fewer than two
/// cars.
pub fn transmission_ttest(frame: &DataFrame, column: &str) -> Result<TTestResult> {
    let automatic = values_by_transmission(frame, column, Transmission::Automatic)?;
    let manual = values_by_transmission(frame, column, Transmission::Manual)?;
    ttest_ind(&automatic, &manual, false)
}

/// Runs the whole exploratory step on `column`.
///
/// # Errors
///
/// Propagates any error from the individual steps.
pub fn explore(frame: &DataFrame, column: &str, numeric_columns: &[&str]) -> Result<Exploration> {
    let groups = group_summaries(frame, column)?;
    let correlation = correlation_table(frame, numeric_columns)?;
    let ranked = correlation.ranked_against(column);
    let mut scatter_columns = vec![column];
    scatter_columns.extend(
        ranked
            .iter()
            .take(SCATTER_CORRELATES)
            .map(|(name, _)| name.as_str()),
    );
    let scatter = scatter_matrix(frame, &scatter_columns)?;
    let transmission_test = transmission_ttest(frame, column)?;
    tracing::info!(
        column,
        t = transmission_test.statistic,
        p = transmission_test.pvalue,
        "explored transmission groups"
    );
    Ok(Exploration {
        column: column.to_string(),
        groups,
        correlation,
        scatter,
        transmission_test,
    })
}

/// Horizontal text box plot of `groups` on a shared axis `width` wide.
///
/// Whiskers run min to max (`-`), the box spans Q1 to Q3 (`[` `=` `]`) and
/// the median is `|`.
#[must_use]
pub fn render_box_plot(groups: &[GroupSummary], width: usize) -> String {
    let width = width.max(10);
    let lo = groups
        .iter()
        .map(|g| g.summary.min)
        .fold(f64::INFINITY, f64::min);
    let hi = groups
        .iter()
        .map(|g| g.summary.max)
        .fold(f64::NEG_INFINITY, f64::max);
    if groups.is_empty() || hi.is_nan() || lo.is_nan() || hi <= lo {
        return String::new();
    }
    let pos = |x: f64| (((x - lo) / (hi - lo)) * (width - 1) as f64).round() as usize;

    let mut out = String::new();
    for group in groups {
        let s = &group.summary;
        let mut line = vec![' '; width];
        for c in &mut line[pos(s.min)..=pos(s.max)] {
            *c = '-';
        }
        for c in &mut line[pos(s.q1)..=pos(s.q3)] {
            *c = '=';
        }
        line[pos(s.q1)] = '[';
        line[pos(s.q3)] = ']';
        line[pos(s.median)] = '|';
        let _ = writeln!(
            out,
            "{:>10} {}",
            group.transmission.to_string(),
            line.into_iter().collect::<String>()
        );
    }
    let _ = writeln!(
        out,
        "{:>10} {lo:<w$.1}{hi:>.1}",
        "",
        w = width.saturating_sub(format!("{hi:.1}").len())
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::mtcars::{self, NUMERIC_COLUMNS};

    fn cars() -> DataFrame {
        mtcars::frame().expect("bundled mtcars")
    }

    #[test]
    fn test_group_summaries_reference() {
        // R: tapply(mtcars$mpg, mtcars$am, summary)
        let groups = group_summaries(&cars(), "mpg").expect("both groups");
        assert_eq!(groups.len(), 2);

        let auto = &groups[0];
        assert_eq!(auto.transmission, Transmission::Automatic);
        assert_eq!(auto.n, 19);
        assert!((auto.mean - 17.147).abs() < 1e-3);
        assert!((auto.summary.min - 10.4).abs() < 1e-9);
        assert!((auto.summary.q1 - 14.95).abs() < 1e-9);
        assert!((auto.summary.median - 17.3).abs() < 1e-9);
        assert!((auto.summary.q3 - 19.2).abs() < 1e-9);
        assert!((auto.summary.max - 24.4).abs() < 1e-9);

        let manual = &groups[1];
        assert_eq!(manual.n, 13);
        assert!((manual.mean - 24.392).abs() < 1e-3);
        assert!((manual.summary.q1 - 21.0).abs() < 1e-9);
        assert!((manual.summary.median - 22.8).abs() < 1e-9);
        assert!((manual.summary.q3 - 30.4).abs() < 1e-9);
        assert!((manual.summary.max - 33.9).abs() < 1e-9);
    }

    #[test]
    fn test_welch_reference() {
        let t = transmission_ttest(&cars(), "mpg").expect("two groups");
        assert!((t.statistic + 3.7671).abs() < 1e-3);
        assert!((t.df - 18.332).abs() < 1e-2);
        assert!((t.pvalue - 0.001374).abs() < 1e-5);
    }

    #[test]
    fn test_correlation_table() {
        let table = correlation_table(&cars(), &NUMERIC_COLUMNS).expect("no constant columns");
        assert_eq!(table.columns.len(), 11);
        assert!((table.get("mpg", "wt").expect("both") + 0.867_66).abs() < 1e-4);
        assert!((table.get("mpg", "am").expect("both") - 0.599_83).abs() < 1e-4);
        assert_eq!(table.get("wt", "wt"), Some(1.0));
        assert_eq!(table.get("wt", "torque"), None);

        let ranked = table.ranked_against("mpg");
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].0, "wt");
    }

    #[test]
    fn test_renderings() {
        let frame = cars();
        let table = correlation_table(&frame, &["mpg", "wt", "qsec"]).expect("table");
        let grid = table.render();
        assert_eq!(grid.lines().count(), 4);
        assert!(grid.contains("-0.87"));

        let heat = table.render_heat();
        let mpg_row = heat.lines().nth(1).expect("mpg row");
        assert!(mpg_row.ends_with("##:"));

        let plot = render_box_plot(&group_summaries(&frame, "mpg").expect("groups"), 40);
        let lines: Vec<&str> = plot.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with("automatic"));
        assert!(lines[1].contains('|') && lines[1].contains('['));
        assert!(lines[2].contains("10.4") && lines[2].contains("33.9"));
    }

    #[test]
    fn test_scatter_matrix_of_strongest_correlates() {
        let exploration = explore(&cars(), "mpg", &NUMERIC_COLUMNS).expect("explore");
        let scatter = &exploration.scatter;
        assert_eq!(scatter.columns, vec!["mpg", "wt", "cyl", "disp"]);
        assert!(scatter.data.iter().all(|series| series.len() == 32));

        let text = scatter.render(8, 4);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4 * 4 + 3);
        assert!(lines.iter().all(|l| l.chars().count() == 4 * 8 + 3));
        assert_eq!(lines[4], "--------+--------+--------+--------");
        assert!(lines[2].starts_with("  mpg   |"));
        // mpg falls with weight: top-left to bottom-right in the (mpg, wt) cell
        let wt_cell = |line: &str| line.split('|').nth(1).unwrap_or("").to_string();
        assert_ne!(wt_cell(lines[0]).chars().next(), Some(' '));
        assert_ne!(wt_cell(lines[3]).chars().last(), Some(' '));
    }

    #[test]
    fn test_scatter_matrix_missing_column() {
        assert!(matches!(
            scatter_matrix(&cars(), &["mpg", "torque"]),
            Err(AnalysisError::MissingColumn(ref c)) if c == "torque"
        ));
    }

    #[test]
    fn test_shade_levels() {
        assert_eq!(shade(0.05), ' ');
        assert_eq!(shade(-0.45), ':');
        assert_eq!(shade(1.0), '#');
    }

    #[test]
    fn test_missing_transmission_column() {
        let frame = cars().select(&["mpg", "wt"]).expect("subset");
        assert!(matches!(
            group_summaries(&frame, "mpg"),
            Err(AnalysisError::MissingColumn(ref c)) if c == "am"
        ));
    }
}
