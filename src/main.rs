//! mpg-analysis CLI: transmission type vs fuel economy on the mtcars table.

use clap::{Parser, Subcommand, ValueEnum};
use mpg_analysis::analysis::{
    fit_candidates, influence_report, load_held_out, Analysis, RATIO_PREDICTOR,
};
use mpg_analysis::config::{AnalysisConfig, ValidationSource};
use mpg_analysis::data::mtcars;
use mpg_analysis::linear_model::{Diagnostics, LinearRegression};
use mpg_analysis::model_selection::{best_subset, validate};
use mpg_analysis::report::{self, ReportFormat};
use mpg_analysis::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mpg-analysis")]
#[command(about = "Does a manual gearbox save fuel? Regression analysis of the 1974 Motor Trend road tests")]
#[command(version)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis and print the report
    Report {
        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: Format,

        /// Auto MPG CSV to validate on instead of the bundled excerpt
        #[arg(long)]
        validation: Option<PathBuf>,

        /// Car removed before the final refit
        #[arg(long, default_value = mpg_analysis::config::DEFAULT_OUTLIER)]
        outlier: String,
    },

    /// Best-subset search on the road-test table
    Subsets {
        /// Add the weight-to-power ratio to the candidates
        #[arg(long)]
        with_ratio: bool,

        /// Largest subset size to search (default: every size)
        #[arg(long)]
        max_size: Option<usize>,
    },

    /// Influence diagnostics for one candidate model
    Diagnostics {
        /// Model to diagnose
        #[arg(short, long, value_enum, default_value = "wt-wthp")]
        model: ModelChoice,

        /// Fit without the default outlier
        #[arg(long)]
        reduced: bool,
    },

    /// Held-out RMSE of every candidate model
    Validate {
        /// Auto MPG CSV to validate on instead of the bundled excerpt
        #[arg(long)]
        validation: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl From<Format> for ReportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => Self::Markdown,
            Format::Json => Self::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModelChoice {
    Wt,
    WtHp,
    WtWthp,
}

impl ModelChoice {
    fn predictors(self) -> &'static [&'static str] {
        match self {
            Self::Wt => &["wt"],
            Self::WtHp => &["wt", "hp"],
            Self::WtWthp => &["wt", "wthp"],
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter = if verbose || quiet {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn validation_source(path: Option<PathBuf>) -> ValidationSource {
    path.map_or(ValidationSource::Bundled, ValidationSource::Path)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Report {
            format,
            validation,
            outlier,
        } => cmd_report(format.into(), validation, outlier),
        Commands::Subsets {
            with_ratio,
            max_size,
        } => cmd_subsets(with_ratio, max_size),
        Commands::Diagnostics { model, reduced } => cmd_diagnostics(model, reduced),
        Commands::Validate { validation } => cmd_validate(validation),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn cmd_report(format: ReportFormat, validation: Option<PathBuf>, outlier: String) -> Result<String> {
    let config = AnalysisConfig::default()
        .with_outlier(outlier)
        .with_validation(validation_source(validation));
    let analysis = Analysis::new(config).run()?;
    let mut rendered = report::render(&analysis, format)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

fn cmd_subsets(with_ratio: bool, max_size: Option<usize>) -> Result<String> {
    let config = AnalysisConfig::default();
    let cars = mtcars::frame()?;
    let mut candidates = config.candidate_refs();
    if with_ratio {
        candidates.push(RATIO_PREDICTOR);
    }
    let max_size = max_size.unwrap_or(candidates.len());
    let search = best_subset(&cars, &config.response, &candidates, max_size)?;
    Ok(report::render_subsets(&search))
}

fn cmd_diagnostics(choice: ModelChoice, reduced: bool) -> Result<String> {
    let config = AnalysisConfig::default();
    let mut cars = mtcars::frame()?;
    if reduced {
        cars = cars.drop_row_by_label(&config.outlier)?;
    }
    let mut model = LinearRegression::new();
    model.fit_frame(&cars, &config.response, choice.predictors())?;

    let mut out = report::render_summary(&model.summary()?);
    out.push_str(&report::render_influence(&influence_report(&model, &config.outlier)?));
    let sw = Diagnostics::compute(&model)?.residual_normality()?;
    out.push_str(&format!(
        "Shapiro-Wilk on residuals: W = {:.4}, p = {:.4}.\n",
        sw.w, sw.p_value
    ));
    Ok(out)
}

fn cmd_validate(validation: Option<PathBuf>) -> Result<String> {
    let config = AnalysisConfig::default();
    let cars = mtcars::frame()?;
    let reduced = cars.drop_row_by_label(&config.outlier)?;
    let candidates = fit_candidates(&cars, &reduced, &config.response)?;
    let held_out = load_held_out(&validation_source(validation))?;
    let validation = validate(&candidates, &held_out, &config.response)?;
    Ok(report::render_validation(&validation))
}
