//! Markdown and JSON rendering of an [`AnalysisReport`].
//!
//! The section renderers are public so the CLI subcommands can print a
//! single table without running the whole pipeline.

use crate::analysis::{AnalysisReport, InfluenceReport, ModelReport};
use crate::error::Result;
use crate::explore::{render_box_plot, Exploration};
use crate::linear_model::{ModelSummary, ObservationDiagnostics};
use crate::model_selection::{SubsetSearch, ValidationReport};
use crate::plot::{render_panels, residual_panels};
use std::fmt::Write as _;

/// Width of the text box plot.
const BOX_PLOT_WIDTH: usize = 60;

/// Scatter-matrix cell size.
const SCATTER_CELL: (usize, usize) = (12, 6);

/// Residual panel size, two panels per row.
const PANEL_SIZE: (usize, usize) = (32, 10);

/// Output format of the full report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Renders `report` in `format`.
///
/// # Errors
///
/// Returns [`crate::AnalysisError::Serialization`] if JSON encoding fails.
pub fn render(report: &AnalysisReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Json => render_json(report),
    }
}

/// Pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// The Markdown narrative.
#[must_use]
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let config = &report.config;

    let _ = writeln!(out, "# Transmission type and fuel economy\n");
    let _ = writeln!(out, "{}\n", report.conclusion);

    let _ = writeln!(out, "## Data\n");
    let _ = writeln!(
        out,
        "{} cars from the 1974 Motor Trend road tests. Response `{}` (gallons per 100 miles, \
         `100 / mpg`); derived predictor `wthp` = weight / horsepower. Held-out validation on \
         {} Auto MPG cars.\n",
        report.n_cars, config.response, report.validation.n_observations
    );

    out.push_str(&render_exploration(&report.exploration));

    let _ = writeln!(out, "## Best-subset selection\n");
    let _ = writeln!(out, "### Raw candidates\n");
    out.push_str(&render_subsets(&report.raw_search));
    let _ = writeln!(out, "### With weight-to-power ratio\n");
    out.push_str(&render_subsets(&report.ratio_search));

    let _ = writeln!(out, "## Fitted models\n");
    for model in &report.models {
        out.push_str(&render_model(model));
    }

    let influence = &report.influence;
    let _ = writeln!(out, "## Diagnostics of `{}`\n", influence.model);
    out.push_str(&render_influence(influence));
    if let Some(outlier) = &influence.outlier {
        let _ = writeln!(
            out,
            "Removed `{}` (Cook's distance {:.3}, standardized residual {:.2}). Adjusted R² \
             {:.4} -> {:.4}.\n",
            outlier.label,
            outlier.cooks_distance,
            outlier.standardized_residual,
            report.adj_r_squared_full,
            report.adj_r_squared_reduced
        );
    }

    let _ = writeln!(out, "## Diagnostics after the refit\n");
    out.push_str(&render_influence(&report.reduced_influence));
    let sw = &report.residual_normality;
    let _ = writeln!(
        out,
        "Shapiro-Wilk on the refitted residuals: W = {:.4}, p = {:.4}.\n",
        sw.w, sw.p_value
    );

    let _ = writeln!(out, "## Validation on Auto MPG\n");
    out.push_str(&render_validation(&report.validation));

    let effect = &report.transmission_effect;
    let _ = writeln!(out, "## Transmission effect\n");
    out.push_str(&render_summary(&effect.model));
    let _ = writeln!(
        out,
        "`am` estimate {:+.4} ({:.0}% CI {:.4} to {:.4}), p = {:.4}: {}.",
        effect.estimate,
        config.confidence_level * 100.0,
        effect.interval.lower,
        effect.interval.upper,
        effect.p_value,
        if effect.significant { "significant" } else { "not significant" }
    );
    out
}

/// Group table, box plot, Welch test and correlation grids.
#[must_use]
pub fn render_exploration(exploration: &Exploration) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Exploration of `{}`\n", exploration.column);
    let _ = writeln!(out, "| Transmission | n | Mean | Min | Q1 | Median | Q3 | Max |");
    let _ = writeln!(out, "|---|---:|---:|---:|---:|---:|---:|---:|");
    for g in &exploration.groups {
        let s = &g.summary;
        let _ = writeln!(
            out,
            "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |",
            g.transmission, g.n, g.mean, s.min, s.q1, s.median, s.q3, s.max
        );
    }
    let _ = writeln!(out, "\n```text\n{}```\n", render_box_plot(&exploration.groups, BOX_PLOT_WIDTH));

    let t = &exploration.transmission_test;
    let _ = writeln!(
        out,
        "Welch t-test (automatic - manual): t = {:.3}, df = {:.2}, p = {:.5}.\n",
        t.statistic, t.df, t.pvalue
    );

    let corr = &exploration.correlation;
    let _ = writeln!(out, "```text\n{}```\n", corr.render());
    let (w, h) = SCATTER_CELL;
    let _ = writeln!(out, "```text\n{}```\n", exploration.scatter.render(w, h));
    let _ = writeln!(out, "```text\n{}```\n", corr.render_heat());
    if let Some(top) = corr.ranked_against(&exploration.column).first() {
        let _ = writeln!(
            out,
            "Strongest correlate of `{}`: `{}` (r = {:.3}).\n",
            exploration.column, top.0, top.1
        );
    }
    out
}

/// One row per subset size plus the criterion winners.
#[must_use]
pub fn render_subsets(search: &SubsetSearch) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| Size | Predictors | RSS | R² | Adj. R² | BIC | Cp |");
    let _ = writeln!(out, "|---:|---|---:|---:|---:|---:|---:|");
    for r in &search.results {
        let _ = writeln!(
            out,
            "| {} | {} | {:.4} | {:.4} | {:.4} | {:.3} | {:.3} |",
            r.size,
            r.predictors.join(" + "),
            r.rss,
            r.r_squared,
            r.adj_r_squared,
            r.bic,
            r.cp
        );
    }
    out.push('\n');
    let picks = [
        ("adjusted R²", search.best_by_adj_r2()),
        ("BIC", search.best_by_bic()),
        ("Cp", search.best_by_cp()),
    ];
    for (criterion, pick) in picks {
        if let Some(r) = pick {
            let _ = writeln!(out, "- Best by {criterion}: {}", r.predictors.join(" + "));
        }
    }
    out.push('\n');
    out
}

/// Coefficient table with fit statistics.
#[must_use]
pub fn render_summary(summary: &ModelSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "`{}` (n = {})\n", summary.formula, summary.n_observations);
    let _ = writeln!(out, "| Term | Estimate | Std. error | t | p |");
    let _ = writeln!(out, "|---|---:|---:|---:|---:|");
    for t in &summary.terms {
        let _ = writeln!(
            out,
            "| {} | {:.5} | {:.5} | {:.3} | {:.4} |",
            t.name, t.estimate, t.std_error, t.t_value, t.p_value
        );
    }
    let _ = writeln!(
        out,
        "\nR² {:.4}, adjusted R² {:.4}, residual standard error {:.4} on {} df, \
         F = {:.2} (p = {:.3e}).\n",
        summary.r_squared,
        summary.adj_r_squared,
        summary.residual_std_error,
        summary.df_residual,
        summary.f_statistic,
        summary.f_p_value
    );
    out
}

fn render_model(model: &ModelReport) -> String {
    let mut out = format!("### {}\n\n", model.name);
    out.push_str(&render_summary(&model.summary));
    for ci in &model.intervals {
        let _ = writeln!(out, "- {}: [{:.4}, {:.4}]", ci.name, ci.lower, ci.upper);
    }
    out.push('\n');
    out
}

/// Thresholds, flagged observations and the four residual panels.
#[must_use]
pub fn render_influence(influence: &InfluenceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "n = {}. Flag thresholds: Cook's distance > {:.3}, leverage > {:.3}.\n",
        influence.n_observations, influence.cooks_threshold, influence.leverage_threshold
    );
    out.push_str(&render_observations(&influence.flagged));
    let (w, h) = PANEL_SIZE;
    let panels = render_panels(&residual_panels(&influence.panels), 2, w, h);
    let _ = writeln!(out, "```text\n{panels}```\n");
    out
}

/// Table of per-observation diagnostics.
#[must_use]
pub fn render_observations(observations: &[ObservationDiagnostics]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| Car | Leverage | Residual | Std. residual | Cook's D |");
    let _ = writeln!(out, "|---|---:|---:|---:|---:|");
    for o in observations {
        let _ = writeln!(
            out,
            "| {} | {:.3} | {:.3} | {:.3} | {:.3} |",
            o.label, o.leverage, o.residual, o.standardized_residual, o.cooks_distance
        );
    }
    out.push('\n');
    out
}

/// RMSE per candidate, best marked.
#[must_use]
pub fn render_validation(validation: &ValidationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| Model | Fitted on | RMSE |");
    let _ = writeln!(out, "|---|---|---:|");
    for s in &validation.scores {
        let marker = if s.name == validation.best { " **best**" } else { "" };
        let _ = writeln!(
            out,
            "| {}{marker} | {} | {:.4} |",
            s.name,
            if s.reduced { "outlier removed" } else { "all cars" },
            s.rmse
        );
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;

    fn report() -> AnalysisReport {
        Analysis::default().run().expect("bundled data")
    }

    #[test]
    fn test_markdown_sections() {
        let md = render(&report(), ReportFormat::Markdown).expect("markdown");
        for heading in [
            "# Transmission type and fuel economy",
            "## Exploration of `mpg`",
            "## Best-subset selection",
            "## Fitted models",
            "## Diagnostics of `gp100m ~ wt + wthp`",
            "## Diagnostics after the refit",
            "## Validation on Auto MPG",
            "## Transmission effect",
        ] {
            assert!(md.contains(heading), "missing {heading}");
        }
        assert!(md.contains("| wt + wthp (outlier removed) **best** |"));
        assert!(md.contains("Removed `Chrysler Imperial`"));
        assert!(md.contains("not significant"));
    }

    #[test]
    fn test_json_round_trips_key_fields() {
        let json = render(&report(), ReportFormat::Json).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["validation"]["best"], "wt + wthp (outlier removed)");
        assert_eq!(value["config"]["outlier"], "Chrysler Imperial");
        assert_eq!(value["n_cars"], 32);
        assert_eq!(value["transmission_effect"]["significant"], false);
    }

    #[test]
    fn test_markdown_draws_panels_and_scatter_matrix() {
        let md = render(&report(), ReportFormat::Markdown).expect("markdown");
        for title in [
            "Residuals vs Fitted",
            "Normal Q-Q",
            "Scale-Location",
            "Residuals vs Leverage",
        ] {
            // once for the full-data fit, once for the refit
            assert_eq!(md.matches(title).count(), 2, "{title}");
        }
        assert!(md.contains("n = 32. Flag thresholds"));
        assert!(md.contains("n = 31. Flag thresholds"));
        assert!(md.contains("------------+------------+------------+------------"));
    }

    #[test]
    fn test_influence_section_lists_refit_flags() {
        let r = report();
        let text = render_influence(&r.reduced_influence);
        assert!(text.contains("| Cadillac Fleetwood |"));
        assert!(!text.contains("Chrysler Imperial"));
        assert!(text.contains("Normal Q-Q"));
    }

    #[test]
    fn test_subset_table_has_row_per_size() {
        let r = report();
        let table = render_subsets(&r.raw_search);
        let rows = table.lines().filter(|l| l.starts_with("| ") && !l.starts_with("| Size")).count();
        assert_eq!(rows, r.raw_search.results.len());
        assert!(table.contains("- Best by BIC: hp + wt"));
    }
}
