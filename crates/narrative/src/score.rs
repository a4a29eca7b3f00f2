use analysis_core::{SupplementalInput, ValuationInput, ValuationResult};
use serde::{Deserialize, Serialize};

use crate::bands::{classify_valuation, CashFlowAssessment, ValuationBand};
use crate::Tone;

/// One scoring rule that fired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub factor: String,
    pub points: i32,
}

impl ScoreContribution {
    fn new(factor: &str, points: i32) -> Self {
        Self {
            factor: factor.to_string(),
            points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Buy,
    Watch,
    Avoid,
}

impl Recommendation {
    /// score >= 6 buy; 2 <= score < 6 watch; below 2 avoid
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 6 => Recommendation::Buy,
            s if s >= 2 => Recommendation::Watch,
            _ => Recommendation::Avoid,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "BUY",
            Recommendation::Watch => "NEUTRAL/WATCH",
            Recommendation::Avoid => "AVOID/SELL",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Recommendation::Buy => Tone::Positive,
            Recommendation::Watch => Tone::Caution,
            Recommendation::Avoid => Tone::Negative,
        }
    }
}

/// Sum the scoring rules.
///
/// `supplemental` must already be normalized. A missing figure contributes
/// nothing: absent debt is neutral, not zero debt.
pub fn aggregate_score(
    input: &ValuationInput,
    result: &ValuationResult,
    supplemental: &SupplementalInput,
    cash: &CashFlowAssessment,
) -> Vec<ScoreContribution> {
    let mut contributions = Vec::new();

    contributions.push(match classify_valuation(input.current_price, result) {
        ValuationBand::Discounted => ScoreContribution::new("Discount to defensive value", 3),
        ValuationBand::NearFairValue => ScoreContribution::new("Within fair value range", 1),
        ValuationBand::Overvalued => ScoreContribution::new("Above growth fair value", -2),
    });

    if let Some(leverage) = supplemental.net_debt_to_ebitda {
        if leverage < 1.5 {
            contributions.push(ScoreContribution::new("Low leverage", 2));
        } else if leverage > 3.0 {
            contributions.push(ScoreContribution::new("High leverage", -2));
        }
    }

    if let (Some(roe), Some(margin)) = (
        supplemental.return_on_equity_percent,
        supplemental.net_margin_percent,
    ) {
        if roe > 15.0 && margin > 10.0 {
            contributions.push(ScoreContribution::new("Strong profitability", 2));
        }
    }

    if let Some(dividend_yield) = supplemental.dividend_yield_percent {
        if dividend_yield > 5.0 {
            contributions.push(ScoreContribution::new("High dividend yield", 1));
        }
    }

    match cash.figure {
        Some(figure) if figure > 0.0 => {
            contributions.push(ScoreContribution::new("Positive cash generation", 1))
        }
        Some(figure) if figure < 0.0 => {
            contributions.push(ScoreContribution::new("Negative cash generation", -1))
        }
        _ => {}
    }

    contributions
}

pub fn total(contributions: &[ScoreContribution]) -> i32 {
    contributions.iter().map(|c| c.points).sum()
}
