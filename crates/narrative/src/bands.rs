//! Threshold classifiers. Each function maps one figure to a qualitative
//! band; boundaries are inclusive or exclusive exactly as the comments say.

use analysis_core::ValuationResult;
use serde::{Deserialize, Serialize};

use crate::Tone;

/// Price below this fraction of the defensive fair price counts as discounted
pub const DISCOUNT_FACTOR: f64 = 0.8;
/// Share of EPS used as a free-cash-flow proxy when FCF is not given
pub const FCF_ESTIMATE_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationBand {
    Discounted,
    NearFairValue,
    Overvalued,
}

impl ValuationBand {
    pub fn label(&self) -> &'static str {
        match self {
            ValuationBand::Discounted => "discounted",
            ValuationBand::NearFairValue => "near fair value",
            ValuationBand::Overvalued => "overvalued",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            ValuationBand::Discounted => Tone::Positive,
            ValuationBand::NearFairValue => Tone::Neutral,
            ValuationBand::Overvalued => Tone::Caution,
        }
    }
}

/// price < 0.8 x defensive; else price <= growth; else overvalued
pub fn classify_valuation(current_price: f64, result: &ValuationResult) -> ValuationBand {
    if current_price < result.defensive_fair_price * DISCOUNT_FACTOR {
        ValuationBand::Discounted
    } else if current_price <= result.growth_fair_price {
        ValuationBand::NearFairValue
    } else {
        ValuationBand::Overvalued
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthBand {
    Optimistic,
    Sustainable,
    Modest,
    Contraction,
}

impl GrowthBand {
    pub fn label(&self) -> &'static str {
        match self {
            GrowthBand::Optimistic => "optimistic",
            GrowthBand::Sustainable => "sustainable",
            GrowthBand::Modest => "modest",
            GrowthBand::Contraction => "contraction",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            GrowthBand::Optimistic => Tone::Caution,
            GrowthBand::Sustainable => Tone::Positive,
            GrowthBand::Modest => Tone::Neutral,
            GrowthBand::Contraction => Tone::Negative,
        }
    }
}

/// (15, inf) optimistic; [8, 15] sustainable; [0, 8) modest; below 0 contraction
pub fn classify_growth(growth_rate_percent: f64) -> GrowthBand {
    if growth_rate_percent > 15.0 {
        GrowthBand::Optimistic
    } else if growth_rate_percent >= 8.0 {
        GrowthBand::Sustainable
    } else if growth_rate_percent >= 0.0 {
        GrowthBand::Modest
    } else {
        GrowthBand::Contraction
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverageBand {
    HighLeverage,
    Moderate,
    Controlled,
    NetCash,
}

impl LeverageBand {
    pub fn label(&self) -> &'static str {
        match self {
            LeverageBand::HighLeverage => "high leverage",
            LeverageBand::Moderate => "moderate",
            LeverageBand::Controlled => "controlled",
            LeverageBand::NetCash => "net cash positive",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            LeverageBand::HighLeverage => Tone::Negative,
            LeverageBand::Moderate => Tone::Caution,
            LeverageBand::Controlled => Tone::Positive,
            LeverageBand::NetCash => Tone::Exceptional,
        }
    }
}

/// (3, inf) high; [1.5, 3] moderate; [0, 1.5) controlled; below 0 net cash
pub fn classify_leverage(net_debt_to_ebitda: f64) -> LeverageBand {
    if net_debt_to_ebitda > 3.0 {
        LeverageBand::HighLeverage
    } else if net_debt_to_ebitda >= 1.5 {
        LeverageBand::Moderate
    } else if net_debt_to_ebitda >= 0.0 {
        LeverageBand::Controlled
    } else {
        LeverageBand::NetCash
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitabilityBand {
    Excellent,
    Reasonable,
    Low,
}

impl ProfitabilityBand {
    pub fn label(&self) -> &'static str {
        match self {
            ProfitabilityBand::Excellent => "excellent",
            ProfitabilityBand::Reasonable => "reasonable",
            ProfitabilityBand::Low => "low",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            ProfitabilityBand::Excellent => Tone::Positive,
            ProfitabilityBand::Reasonable => Tone::Neutral,
            ProfitabilityBand::Low => Tone::Caution,
        }
    }
}

/// ROE > 15 and margin > 10 excellent; ROE >= 10 or margin >= 5 reasonable
pub fn classify_profitability(
    return_on_equity_percent: f64,
    net_margin_percent: f64,
) -> ProfitabilityBand {
    if return_on_equity_percent > 15.0 && net_margin_percent > 10.0 {
        ProfitabilityBand::Excellent
    } else if return_on_equity_percent >= 10.0 || net_margin_percent >= 5.0 {
        ProfitabilityBand::Reasonable
    } else {
        ProfitabilityBand::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DividendBand {
    Excellent,
    Good,
    Modest,
    NoneOrNegative,
}

impl DividendBand {
    pub fn label(&self) -> &'static str {
        match self {
            DividendBand::Excellent => "excellent",
            DividendBand::Good => "good",
            DividendBand::Modest => "modest",
            DividendBand::NoneOrNegative => "none/negative",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            DividendBand::Excellent => Tone::Positive,
            DividendBand::Good => Tone::Neutral,
            DividendBand::Modest => Tone::Caution,
            DividendBand::NoneOrNegative => Tone::Negative,
        }
    }
}

/// (5, inf) excellent; [3, 5] good; (0, 3) modest; at or below 0 none
pub fn classify_dividend(dividend_yield_percent: f64) -> DividendBand {
    if dividend_yield_percent > 5.0 {
        DividendBand::Excellent
    } else if dividend_yield_percent >= 3.0 {
        DividendBand::Good
    } else if dividend_yield_percent > 0.0 {
        DividendBand::Modest
    } else {
        DividendBand::NoneOrNegative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowBand {
    Positive,
    Negative,
    BreakEven,
    CannotAssess,
}

impl CashFlowBand {
    pub fn label(&self) -> &'static str {
        match self {
            CashFlowBand::Positive => "positive",
            CashFlowBand::Negative => "negative",
            CashFlowBand::BreakEven => "break-even",
            CashFlowBand::CannotAssess => "cannot assess",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            CashFlowBand::Positive => Tone::Positive,
            CashFlowBand::Negative => Tone::Negative,
            CashFlowBand::BreakEven => Tone::Neutral,
            CashFlowBand::CannotAssess => Tone::Caution,
        }
    }
}

/// Cash-generation figure used by both the section text and the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowAssessment {
    pub figure: Option<f64>,
    /// True when `figure` is the EPS-based proxy rather than a reported FCF
    pub estimated: bool,
    pub band: CashFlowBand,
}

/// Reported FCF wins; otherwise 80% of EPS stands in for it.
///
/// The proxy mixes a per-share figure with an absolute one (millions), so
/// only its sign carries meaning.
pub fn assess_cash_generation(
    free_cash_flow: Option<f64>,
    earnings_per_share: Option<f64>,
) -> CashFlowAssessment {
    let (figure, estimated) = match (free_cash_flow, earnings_per_share) {
        (Some(fcf), _) => (Some(fcf), false),
        (None, Some(eps)) => (Some(eps * FCF_ESTIMATE_RATIO), true),
        (None, None) => (None, false),
    };

    let band = match figure {
        Some(value) if value > 0.0 => CashFlowBand::Positive,
        Some(value) if value < 0.0 => CashFlowBand::Negative,
        Some(_) => CashFlowBand::BreakEven,
        None => CashFlowBand::CannotAssess,
    };

    CashFlowAssessment {
        figure,
        estimated,
        band,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorKind {
    Financial,
    Utilities,
    Technology,
    Consumer,
    Industrial,
    /// Non-empty text that matched no keyword, kept verbatim
    Other(String),
}

impl SectorKind {
    pub fn label(&self) -> &'static str {
        match self {
            SectorKind::Financial => "financial",
            SectorKind::Utilities => "utilities",
            SectorKind::Technology => "technology",
            SectorKind::Consumer => "consumer",
            SectorKind::Industrial => "industrial",
            SectorKind::Other(_) => "other",
        }
    }
}

const FINANCIAL_KEYWORDS: &[&str] = &["financ", "bank", "banco"];
const UTILITIES_KEYWORDS: &[&str] = &[
    "utilit",
    "utilidade",
    "energy",
    "energia",
    "sanitation",
    "saneamento",
];
const TECHNOLOGY_KEYWORDS: &[&str] = &["tech", "tecnologia", "software"];
const CONSUMER_KEYWORDS: &[&str] = &["consum", "retail", "varejo"];
const INDUSTRIAL_KEYWORDS: &[&str] = &["industri", "manufactur", "manufatura"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Case-insensitive substring match; blank text yields `None`.
///
/// First match wins, so "financial technology" is financial.
pub fn match_sector(sector: &str) -> Option<SectorKind> {
    let trimmed = sector.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.to_lowercase();
    let kind = if contains_any(&lowered, FINANCIAL_KEYWORDS) {
        SectorKind::Financial
    } else if contains_any(&lowered, UTILITIES_KEYWORDS) {
        SectorKind::Utilities
    } else if contains_any(&lowered, TECHNOLOGY_KEYWORDS) {
        SectorKind::Technology
    } else if contains_any(&lowered, CONSUMER_KEYWORDS) {
        SectorKind::Consumer
    } else if contains_any(&lowered, INDUSTRIAL_KEYWORDS) {
        SectorKind::Industrial
    } else {
        SectorKind::Other(trimmed.to_string())
    };

    Some(kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultipleBand {
    Attractive,
    Reasonable,
    Elevated,
}

impl MultipleBand {
    pub fn label(&self) -> &'static str {
        match self {
            MultipleBand::Attractive => "attractive",
            MultipleBand::Reasonable => "reasonable",
            MultipleBand::Elevated => "elevated",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            MultipleBand::Attractive => Tone::Positive,
            MultipleBand::Reasonable => Tone::Neutral,
            MultipleBand::Elevated => Tone::Caution,
        }
    }
}

/// below 8 attractive; [8, 12] reasonable; above 12 elevated
pub fn classify_ev_ebitda(ev_to_ebitda: f64) -> MultipleBand {
    if ev_to_ebitda < 8.0 {
        MultipleBand::Attractive
    } else if ev_to_ebitda <= 12.0 {
        MultipleBand::Reasonable
    } else {
        MultipleBand::Elevated
    }
}
