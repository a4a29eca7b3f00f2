pub mod bands;
mod render;
mod report;
mod score;


pub use bands::*;
pub use report::{NarrativeReport, NarrativeSection, SectionKind, Tone};
pub use score::{aggregate_score, Recommendation, ScoreContribution};

use analysis_core::{SupplementalInput, ValuationInput, ValuationResult};
use tracing::debug;

pub const DISCLAIMER: &str = "This analysis is automated and for educational purposes only. \
It is not an investment recommendation. Always do your own research and consult qualified professionals.";

/// Build the full report from the engine's figures and the optional ratios.
///
/// Assumes `result` came from a successful valuation of `input`; required
/// inputs are not re-validated and fair prices are never recomputed.
pub fn generate_narrative(
    input: &ValuationInput,
    result: &ValuationResult,
    supplemental: &SupplementalInput,
) -> NarrativeReport {
    let supplemental = supplemental.normalized();
    let mut sections = Vec::with_capacity(SectionKind::ALL.len());

    sections.push(valuation_section(input, result));
    sections.push(growth_section(input.growth_rate_percent));

    if let Some(leverage) = supplemental.net_debt_to_ebitda {
        sections.push(financial_risk_section(leverage));
    }

    if let (Some(roe), Some(margin)) = (
        supplemental.return_on_equity_percent,
        supplemental.net_margin_percent,
    ) {
        sections.push(profitability_section(roe, margin));
    }

    if let Some(dividend_yield) = supplemental.dividend_yield_percent {
        sections.push(dividend_section(dividend_yield));
    }

    let eps = Some(input.earnings_per_share).filter(|v| v.is_finite());
    let cash = assess_cash_generation(supplemental.free_cash_flow, eps);
    sections.push(cash_generation_section(&cash));

    if let Some(kind) = supplemental.sector().and_then(match_sector) {
        sections.push(sector_section(&kind));
    }

    if let Some(ev_to_ebitda) = supplemental.ev_to_ebitda {
        sections.push(multiples_section(ev_to_ebitda));
    }

    let score_breakdown = aggregate_score(input, result, &supplemental, &cash);
    let score = score::total(&score_breakdown);
    let recommendation = Recommendation::from_score(score);
    sections.push(recommendation_section(recommendation));

    sections.push(NarrativeSection {
        kind: SectionKind::Disclaimer,
        band: None,
        tone: Tone::Caution,
        text: DISCLAIMER.to_string(),
    });

    debug!(score, recommendation = recommendation.label(), sections = sections.len(), "narrative generated");

    NarrativeReport {
        sections,
        score,
        score_breakdown,
        recommendation,
    }
}

fn section(kind: SectionKind, band: &str, tone: Tone, text: String) -> NarrativeSection {
    NarrativeSection {
        kind,
        band: Some(band.to_string()),
        tone,
        text,
    }
}

fn valuation_section(input: &ValuationInput, result: &ValuationResult) -> NarrativeSection {
    let band = classify_valuation(input.current_price, result);
    let margin = result.safety_margin_percent;
    let text = match band {
        ValuationBand::Discounted => format!(
            "The stock trades at a significant discount of {:.1}%. \
             By Graham's defensive formula there is a good margin of safety. \
             This may be an interesting entry point, especially for conservative investors.",
            margin.abs()
        ),
        ValuationBand::NearFairValue => format!(
            "The stock is close to fair value (margin: {:.1}%). \
             The current price sits between the defensive and the growth value. \
             Keep it on watch and wait for a better entry point.",
            margin
        ),
        ValuationBand::Overvalued => format!(
            "The stock looks overvalued ({:.1}% above fair value). \
             The current price exceeds Graham's estimates. \
             Better to wait for a correction or look for other opportunities.",
            margin.abs()
        ),
    };
    section(SectionKind::Valuation, band.label(), band.tone(), text)
}

fn growth_section(growth: f64) -> NarrativeSection {
    let band = classify_growth(growth);
    let text = match band {
        GrowthBand::Optimistic => format!(
            "The projected growth rate ({growth}%) is quite optimistic. \
             Make sure the company's track record supports it. \
             Very high growth often fails to materialize."
        ),
        GrowthBand::Sustainable => format!(
            "The growth rate ({growth}%) is reasonable and sustainable. \
             It is consistent with mature, solid companies."
        ),
        GrowthBand::Modest => format!(
            "The growth rate ({growth}%) is modest. \
             The company may be in a mature sector or facing headwinds."
        ),
        GrowthBand::Contraction => format!(
            "The growth rate is negative ({growth}%). \
             Earnings are contracting, so investing calls for extreme caution."
        ),
    };
    section(SectionKind::Growth, band.label(), band.tone(), text)
}

fn financial_risk_section(leverage: f64) -> NarrativeSection {
    let band = classify_leverage(leverage);
    let text = match band {
        LeverageBand::HighLeverage => format!(
            "WARNING: net debt is {leverage:.1}x EBITDA. \
             That is heavy leverage and elevated financial risk. \
             The company may struggle in adverse scenarios."
        ),
        LeverageBand::Moderate => format!(
            "Net debt stands at {leverage:.1}x EBITDA. \
             Leverage is moderate; keep an eye on cash generation."
        ),
        LeverageBand::Controlled => format!(
            "Debt is under control ({leverage:.1}x EBITDA). \
             This shows financial strength and low solvency risk."
        ),
        LeverageBand::NetCash => "The company holds net cash! \
             An excellent financial position, with room for investment and shareholder payouts."
            .to_string(),
    };
    section(SectionKind::FinancialRisk, band.label(), band.tone(), text)
}

fn profitability_section(roe: f64, margin: f64) -> NarrativeSection {
    let band = classify_profitability(roe, margin);
    let text = match band {
        ProfitabilityBand::Excellent => format!(
            "Excellent profitability! ROE of {roe:.1}% and net margin of {margin:.1}%. \
             The company shows operating efficiency and good use of equity."
        ),
        ProfitabilityBand::Reasonable => format!(
            "Reasonable profitability. ROE: {roe:.1}%, margin: {margin:.1}%. \
             The numbers are acceptable, with room for improvement."
        ),
        ProfitabilityBand::Low => format!(
            "Low profitability. ROE: {roe:.1}%, margin: {margin:.1}%. \
             The company may face operating challenges or compressed margins."
        ),
    };
    section(SectionKind::Profitability, band.label(), band.tone(), text)
}

fn dividend_section(dividend_yield: f64) -> NarrativeSection {
    let band = classify_dividend(dividend_yield);
    let text = match band {
        DividendBand::Excellent => format!(
            "Dividend yield of {dividend_yield:.2}%: an excellent dividend payer! \
             Attractive for income-focused investors."
        ),
        DividendBand::Good => format!(
            "Dividend yield of {dividend_yield:.2}%: good dividend payments. \
             Offers a reasonable income return."
        ),
        DividendBand::Modest => format!(
            "Dividend yield of {dividend_yield:.2}%: modest dividends. \
             The company may be reinvesting more into the business."
        ),
        DividendBand::NoneOrNegative => "The company pays no dividends or has a negative yield. \
             Typical of growth companies that reinvest all earnings."
            .to_string(),
    };
    section(SectionKind::Dividends, band.label(), band.tone(), text)
}

fn cash_generation_section(cash: &CashFlowAssessment) -> NarrativeSection {
    let qualifier = if cash.estimated { "estimated " } else { "" };
    let figure = match (cash.figure, cash.estimated) {
        (Some(value), false) => format!(" ({value:.2} million)"),
        _ => String::new(),
    };

    let text = match cash.band {
        CashFlowBand::Positive => {
            let note = if cash.estimated {
                "(Estimate: ~80% of earnings, since FCF was not provided.) "
            } else {
                ""
            };
            format!(
                "Positive {qualifier}free cash flow{figure}. {note}\
                 The company generates consistent cash, essential for a sustainable business."
            )
        }
        CashFlowBand::Negative => {
            let note = if cash.estimated {
                "(Estimate based on negative earnings.) "
            } else {
                ""
            };
            format!(
                "WARNING: negative {qualifier}free cash flow{figure}. {note}\
                 The company is burning cash. Check whether this is temporary or structural."
            )
        }
        CashFlowBand::BreakEven => format!(
            "Free cash flow is at break-even{figure}. \
             The company neither generates nor consumes cash; watch the next results."
        ),
        CashFlowBand::CannotAssess => "Free cash flow was not provided and could not be estimated. \
             Check the company's cash generation capacity."
            .to_string(),
    };
    section(SectionKind::CashGeneration, cash.band.label(), cash.band.tone(), text)
}

fn sector_section(kind: &SectorKind) -> NarrativeSection {
    let text = match kind {
        SectorKind::Financial => "Financial sector: usually stable, but sensitive to interest rates \
             and economic cycles. Watch credit portfolio quality and regulation."
            .to_string(),
        SectorKind::Utilities => "Utilities sector: defensive businesses with predictable revenue. \
             Good dividend payers, but with limited growth."
            .to_string(),
        SectorKind::Technology => "Technology sector: high growth potential, but also higher volatility. \
             Tech companies call for a deeper look at competitive advantages."
            .to_string(),
        SectorKind::Consumer => "Consumer sector: sensitive to the economic cycle and purchasing power. \
             Look for strong brands and pricing power."
            .to_string(),
        SectorKind::Industrial => "Industrial sector: cyclical and capital intensive. \
             The economic moment is crucial for performance."
            .to_string(),
        SectorKind::Other(name) => {
            format!("Sector: {name}. Weigh the particular features and risks of this segment.")
        }
    };
    section(SectionKind::Sector, kind.label(), Tone::Neutral, text)
}

fn multiples_section(ev_to_ebitda: f64) -> NarrativeSection {
    let band = classify_ev_ebitda(ev_to_ebitda);
    let text = match band {
        MultipleBand::Attractive => format!(
            "EV/EBITDA of {ev_to_ebitda:.1}x is at an attractive level. \
             The company is cheap relative to its operating cash generation."
        ),
        MultipleBand::Reasonable => format!(
            "EV/EBITDA of {ev_to_ebitda:.1}x is at a reasonable level. \
             An adequate multiple for quality companies."
        ),
        MultipleBand::Elevated => format!(
            "EV/EBITDA of {ev_to_ebitda:.1}x is elevated. \
             The company may be expensive, or the market is pricing in future growth."
        ),
    };
    section(SectionKind::Multiples, band.label(), band.tone(), text)
}

fn recommendation_section(recommendation: Recommendation) -> NarrativeSection {
    let text = match recommendation {
        Recommendation::Buy => "The stock shows solid fundamentals at an attractive entry point. \
             The indicators point to an opportunity with a good risk-reward balance. \
             Consider opening or adding to a position, always respecting your risk profile and diversification.",
        Recommendation::Watch => "The stock has balanced positive and negative aspects. \
             There is no urgency to buy, but it is worth monitoring for a price correction. \
             Follow the company's upcoming results and news.",
        Recommendation::Avoid => "The indicators suggest caution. \
             The stock carries significant risks or is too expensive. \
             If you hold it, consider reducing exposure; if not, look for other opportunities.",
    };
    section(
        SectionKind::Recommendation,
        recommendation.label(),
        recommendation.tone(),
        text.to_string(),
    )
}
