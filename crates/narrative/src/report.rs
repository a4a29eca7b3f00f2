use serde::{Deserialize, Serialize};

use crate::{Recommendation, ScoreContribution};

/// Report sections in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Valuation,
    Growth,
    FinancialRisk,
    Profitability,
    Dividends,
    CashGeneration,
    Sector,
    Multiples,
    Recommendation,
    Disclaimer,
}

impl SectionKind {
    pub const ALL: [SectionKind; 10] = [
        SectionKind::Valuation,
        SectionKind::Growth,
        SectionKind::FinancialRisk,
        SectionKind::Profitability,
        SectionKind::Dividends,
        SectionKind::CashGeneration,
        SectionKind::Sector,
        SectionKind::Multiples,
        SectionKind::Recommendation,
        SectionKind::Disclaimer,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Valuation => "VALUATION",
            SectionKind::Growth => "GROWTH",
            SectionKind::FinancialRisk => "FINANCIAL RISK",
            SectionKind::Profitability => "PROFITABILITY",
            SectionKind::Dividends => "DIVIDENDS",
            SectionKind::CashGeneration => "CASH GENERATION",
            SectionKind::Sector => "SECTOR ANALYSIS",
            SectionKind::Multiples => "MULTIPLES",
            SectionKind::Recommendation => "FINAL RECOMMENDATION",
            SectionKind::Disclaimer => "DISCLAIMER",
        }
    }
}

/// Overall colour of a section, used for the leading marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Neutral,
    Caution,
    Negative,
    /// Better than positive, e.g. a net cash position
    Exceptional,
}

impl Tone {
    pub fn marker(&self) -> &'static str {
        match self {
            Tone::Positive => "✅",
            Tone::Neutral => "📊",
            Tone::Caution => "⚠️",
            Tone::Negative => "🔴",
            Tone::Exceptional => "💎",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub kind: SectionKind,
    /// Qualitative band the input fell into; `None` for fixed text
    pub band: Option<String>,
    pub tone: Tone,
    pub text: String,
}

/// Sectioned analysis plus the aggregate score.
///
/// Regenerated from scratch on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeReport {
    pub sections: Vec<NarrativeSection>,
    pub score: i32,
    pub score_breakdown: Vec<ScoreContribution>,
    pub recommendation: Recommendation,
}

impl NarrativeReport {
    pub fn section(&self, kind: SectionKind) -> Option<&NarrativeSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|section| section.kind).collect()
    }
}
