use std::io::Write;
use std::path::PathBuf;

use analysis_core::ValuationResult;
use analytics::Telemetry;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fundamental_analysis::ComparisonChart;
use narrative::NarrativeReport;
use serde::Serialize;

use crate::display::{format_chart, format_results, CHART_WIDTH};
use crate::form::{Field, FormFields};
use crate::view_state::{Action, ViewState};

#[derive(Debug, Parser)]
#[command(
    name = "graham-calc",
    version,
    about = "Graham fair value calculator with an automated fundamentals analysis"
)]
pub struct Cli {
    /// Do not send usage events
    #[arg(long, global = true)]
    pub no_telemetry: bool,

    /// Directory for persisted state (overrides GRAHAM_STATE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute fair prices from flags and exit
    Calculate(CalculateArgs),
    /// Fill in fields step by step (default)
    Interactive,
    /// Show the walkthrough of where each figure comes from
    Tutorial {
        /// Forget that the tutorial was seen so it shows on next start
        #[arg(long)]
        reset: bool,
    },
}

/// Every input as raw text, parsed the same way the interactive form is
#[derive(Debug, Clone, Default, Args)]
pub struct CalculateArgs {
    /// Earnings per share
    #[arg(long, allow_hyphen_values = true)]
    pub eps: Option<String>,
    /// Book value per share
    #[arg(long, allow_hyphen_values = true)]
    pub bvps: Option<String>,
    /// Expected yearly earnings growth, in percent
    #[arg(long, allow_hyphen_values = true)]
    pub growth: Option<String>,
    /// Current share price
    #[arg(long, allow_hyphen_values = true)]
    pub price: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub ev_ebitda: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub net_debt_ebitda: Option<String>,
    /// Return on equity, in percent
    #[arg(long, allow_hyphen_values = true)]
    pub roe: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub net_margin: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub dividend_yield: Option<String>,
    /// Free cash flow, in millions
    #[arg(long, allow_hyphen_values = true)]
    pub fcf: Option<String>,
    #[arg(long)]
    pub sector: Option<String>,

    /// Also generate the automated analysis
    #[arg(long)]
    pub analysis: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl CalculateArgs {
    pub fn to_form(&self) -> FormFields {
        [
            (Field::EarningsPerShare, &self.eps),
            (Field::BookValuePerShare, &self.bvps),
            (Field::GrowthRate, &self.growth),
            (Field::CurrentPrice, &self.price),
            (Field::EvToEbitda, &self.ev_ebitda),
            (Field::NetDebtToEbitda, &self.net_debt_ebitda),
            (Field::ReturnOnEquity, &self.roe),
            (Field::NetMargin, &self.net_margin),
            (Field::DividendYield, &self.dividend_yield),
            (Field::FreeCashFlow, &self.fcf),
            (Field::Sector, &self.sector),
        ]
        .into_iter()
        .fold(FormFields::default(), |form, (field, value)| match value {
            Some(value) => form.with(field, value.as_str()),
            None => form,
        })
    }
}

#[derive(Debug, Serialize)]
struct CalculationOutput<'a> {
    valuation: &'a ValuationResult,
    chart: &'a ComparisonChart,
    narrative: Option<&'a NarrativeReport>,
}

/// One-shot calculation: same state transitions as the interactive session.
pub fn run_calculate<W: Write>(
    args: &CalculateArgs,
    telemetry: &Telemetry,
    mut out: W,
) -> Result<ViewState> {
    let mut state = ViewState {
        form: args.to_form(),
        ..ViewState::default()
    };

    let mut actions = vec![Action::Calculate];
    if args.analysis {
        actions.push(Action::GenerateAnalysis);
    }
    for action in actions {
        let transition = state.apply(action)?;
        if let Some(event) = transition.event {
            telemetry.track(event);
        }
        state = transition.state;
    }

    let Some(calculation) = &state.calculation else {
        anyhow::bail!("Calculation produced no results");
    };

    if args.json {
        let output = CalculationOutput {
            valuation: &calculation.result,
            chart: &calculation.chart,
            narrative: state.narrative.as_ref(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write!(out, "{}", format_results(calculation))?;
        writeln!(out)?;
        write!(out, "{}", format_chart(&calculation.chart, CHART_WIDTH))?;
        if let Some(report) = &state.narrative {
            writeln!(out)?;
            write!(out, "{}", report.to_plain_text())?;
        }
    }

    Ok(state)
}
