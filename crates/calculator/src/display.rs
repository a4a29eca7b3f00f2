//! Terminal rendering of calculator state.

use std::fmt::Write;

use fundamental_analysis::ComparisonChart;

use crate::form::{Field, FormFields};
use crate::view_state::{Calculation, ViewState};

pub const CHART_WIDTH: usize = 40;

/// Presentation band for the safety margin card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginBand {
    Opportunity,
    Thin,
    AboveFairValue,
}

impl MarginBand {
    pub fn classify(safety_margin_percent: f64) -> Self {
        if safety_margin_percent > 20.0 {
            MarginBand::Opportunity
        } else if safety_margin_percent > 0.0 {
            MarginBand::Thin
        } else {
            MarginBand::AboveFairValue
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            MarginBand::Opportunity => "✅",
            MarginBand::Thin => "⚠️",
            MarginBand::AboveFairValue => "❌",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            MarginBand::Opportunity => "Excellent buying opportunity",
            MarginBand::Thin => "Thin margin, evaluate with caution",
            MarginBand::AboveFairValue => "Trading above fair value",
        }
    }
}

pub fn format_results(calculation: &Calculation) -> String {
    let result = &calculation.result;
    let band = MarginBand::classify(result.safety_margin_percent);

    let mut out = String::from("RESULTS\n");
    let _ = writeln!(
        out,
        "  Fair price (defensive): {:>12.2}   sqrt(22.5 x EPS x BVPS)",
        result.defensive_fair_price
    );
    let _ = writeln!(
        out,
        "  Fair price (growth):    {:>12.2}   EPS x (8.5 + 2g)",
        result.growth_fair_price
    );
    let _ = writeln!(
        out,
        "  {} Safety margin:        {:>11.1}%   {}",
        band.marker(),
        result.safety_margin_percent,
        band.verdict()
    );
    out
}

/// Horizontal bars scaled to the largest value; negative values draw no bar.
pub fn format_chart(chart: &ComparisonChart, width: usize) -> String {
    let max = chart.max_value();
    let label_width = chart
        .bars
        .iter()
        .map(|bar| bar.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for bar in &chart.bars {
        let len = if max > 0.0 && bar.value > 0.0 {
            ((bar.value / max) * width as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<label_width$} |{:<width$}| {:.2}",
            bar.label,
            "█".repeat(len),
            bar.value,
        );
    }
    out
}

pub fn format_form(form: &FormFields) -> String {
    let mut out = String::new();
    for field in Field::ALL {
        let value = form.get(field).trim();
        let shown = if value.is_empty() { "-" } else { value };
        let required = if field.is_required() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{required} {:<16} {:<28} {shown}",
            field.key(),
            field.label()
        );
    }
    out
}

/// Everything the state currently has to show
pub fn format_state(state: &ViewState) -> String {
    let mut out = format_form(&state.form);

    match &state.calculation {
        Some(calculation) => {
            out.push('\n');
            out.push_str(&format_results(calculation));
        }
        None => out.push_str("\nFill in the required fields (*) and run `calculate`.\n"),
    }

    if let Some(report) = &state.narrative {
        out.push('\n');
        out.push_str(&report.to_plain_text());
    }
    out
}
