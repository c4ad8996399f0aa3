//! Character-grid scatter plots for the Markdown report.
//!
//! A cell shows how many points fall in it: `.` one, `:` two, `*` three,
//! `#` four or more. Non-finite points are skipped.

use crate::linear_model::ResidualPanels;

/// Glyphs by number of points in a cell.
const DENSITY: [char; 4] = ['.', ':', '*', '#'];

/// Gap between panels laid out side by side.
const GUTTER: &str = "   ";

/// Width of the y-axis label column.
const AXIS_WIDTH: usize = 8;

/// Guide line drawn behind the points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    /// `y = c`, drawn with `-`
    Horizontal(f64),
    /// `y = x`, drawn with `/`
    Identity,
}

/// One titled scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub reference: Option<Reference>,
}

type Range = (f64, f64);

impl Panel {
    #[must_use]
    pub fn new(title: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            title: title.into(),
            x,
            y,
            reference: None,
        }
    }

    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Title, `height` grid rows with the y range at the ends, the x axis and
    /// the x range.
    #[must_use]
    pub fn render(&self, width: usize, height: usize) -> Vec<String> {
        let grid = render_scatter(&self.x, &self.y, width, height, self.reference);
        let ranges = plot_ranges(&self.x, &self.y);
        let last = grid.len().saturating_sub(1);

        let mut lines = vec![self.title.clone()];
        for (i, row) in grid.iter().enumerate() {
            let label = match ranges {
                Some((_, (_, hi))) if i == 0 => format!("{hi:>AXIS_WIDTH$.2}"),
                Some((_, (lo, _))) if i == last => format!("{lo:>AXIS_WIDTH$.2}"),
                _ => " ".repeat(AXIS_WIDTH),
            };
            lines.push(format!("{label} |{row}"));
        }
        let cols = grid.first().map_or(0, |r| r.chars().count());
        lines.push(format!("{} +{}", " ".repeat(AXIS_WIDTH), "-".repeat(cols)));
        if let Some(((lo, hi), _)) = ranges {
            let lo = format!("{lo:.2}");
            let hi = format!("{hi:.2}");
            let pad = (cols + 1).saturating_sub(lo.len() + hi.len()).max(1);
            lines.push(format!("{} {lo}{}{hi}", " ".repeat(AXIS_WIDTH), " ".repeat(pad)));
        }
        lines
    }
}

/// Bare `height` x `width` grid of `(x, y)` points.
#[must_use]
pub fn render_scatter(
    x: &[f64],
    y: &[f64],
    width: usize,
    height: usize,
    reference: Option<Reference>,
) -> Vec<String> {
    let width = width.max(2);
    let height = height.max(2);
    let mut grid = vec![vec![' '; width]; height];

    if let Some((xr, yr)) = plot_ranges(x, y) {
        let row = |v: f64| height - 1 - scale(v, yr, height);
        match reference {
            Some(Reference::Horizontal(level)) if level >= yr.0 && level <= yr.1 => {
                grid[row(level)].fill('-');
            }
            Some(Reference::Identity) => {
                for col in 0..width {
                    let v = xr.0 + (xr.1 - xr.0) * col as f64 / (width - 1) as f64;
                    if v >= yr.0 && v <= yr.1 {
                        grid[row(v)][col] = '/';
                    }
                }
            }
            _ => {}
        }

        let mut counts = vec![vec![0_usize; width]; height];
        for (a, b) in finite_points(x, y) {
            counts[row(b)][scale(a, xr, width)] += 1;
        }
        for (cells, row_counts) in grid.iter_mut().zip(&counts) {
            for (cell, &count) in cells.iter_mut().zip(row_counts) {
                if count > 0 {
                    *cell = DENSITY[(count - 1).min(DENSITY.len() - 1)];
                }
            }
        }
    }

    grid.into_iter().map(|r| r.into_iter().collect()).collect()
}

/// Lays rendered blocks out left to right, padding each to its widest line.
#[must_use]
pub fn side_by_side(blocks: &[Vec<String>]) -> Vec<String> {
    let rows = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = blocks
        .iter()
        .map(|b| b.iter().map(|l| l.chars().count()).max().unwrap_or(0))
        .collect();
    (0..rows)
        .map(|i| {
            let cells: Vec<String> = blocks
                .iter()
                .zip(&widths)
                .map(|(block, &w)| {
                    let line = block.get(i).map_or("", String::as_str);
                    format!("{line:<w$}")
                })
                .collect();
            cells.join(GUTTER).trim_end().to_string()
        })
        .collect()
}

/// `panels` in rows of `per_row`, separated by a blank line.
#[must_use]
pub fn render_panels(panels: &[Panel], per_row: usize, width: usize, height: usize) -> String {
    let mut out = String::new();
    for (i, chunk) in panels.chunks(per_row.max(1)).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let blocks: Vec<Vec<String>> = chunk.iter().map(|p| p.render(width, height)).collect();
        for line in side_by_side(&blocks) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Residuals vs fitted, normal Q-Q, scale-location and residuals vs
/// leverage, in that order.
#[must_use]
pub fn residual_panels(data: &ResidualPanels) -> Vec<Panel> {
    vec![
        Panel::new(
            "Residuals vs Fitted",
            data.fitted.clone(),
            data.residuals.clone(),
        )
        .with_reference(Reference::Horizontal(0.0)),
        Panel::new(
            "Normal Q-Q",
            data.theoretical_quantiles.clone(),
            data.standardized_residuals.clone(),
        )
        .with_reference(Reference::Identity),
        Panel::new("Scale-Location", data.fitted.clone(), data.scale_location()),
        Panel::new(
            "Residuals vs Leverage",
            data.leverage.clone(),
            data.standardized_residuals.clone(),
        )
        .with_reference(Reference::Horizontal(0.0)),
    ]
}

fn finite_points<'a>(x: &'a [f64], y: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
}

fn plot_ranges(x: &[f64], y: &[f64]) -> Option<(Range, Range)> {
    let xs: Vec<f64> = finite_points(x, y).map(|p| p.0).collect();
    let ys: Vec<f64> = finite_points(x, y).map(|p| p.1).collect();
    Some((range(&xs)?, range(&ys)?))
}

/// Min and max, widened by 0.5 each way when they coincide.
fn range(values: &[f64]) -> Option<Range> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() {
        None
    } else if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        Some((lo - 0.5, hi + 0.5))
    } else {
        Some((lo, hi))
    }
}

fn scale(v: f64, (lo, hi): Range, cells: usize) -> usize {
    let pos = ((v - lo) / (hi - lo) * (cells - 1) as f64).round();
    (pos.max(0.0) as usize).min(cells - 1)
}
