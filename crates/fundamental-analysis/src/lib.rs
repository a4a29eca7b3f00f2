mod chart;

pub use chart::{ChartBar, ComparisonChart};

use analysis_core::{AnalysisError, FairValueModel, ValuationInput, ValuationResult};
use tracing::debug;

/// Graham's multiplier cap: P/E 15 x P/B 1.5
pub const DEFENSIVE_MULTIPLIER: f64 = 22.5;
/// Base P/E for a no-growth company
pub const NO_GROWTH_PE: f64 = 8.5;
/// Weight applied to the expected growth rate
pub const GROWTH_WEIGHT: f64 = 2.0;

/// Defensive Graham number: sqrt(22.5 x EPS x BVPS)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefensiveGraham;

impl FairValueModel for DefensiveGraham {
    fn name(&self) -> &'static str {
        "Graham Defensive"
    }

    fn fair_price(&self, input: &ValuationInput) -> Result<f64, AnalysisError> {
        let radicand =
            DEFENSIVE_MULTIPLIER * input.earnings_per_share * input.book_value_per_share;
        if radicand.is_nan() || radicand < 0.0 {
            return Err(AnalysisError::invalid(format!(
                "defensive formula needs a non-negative radicand, got 22.5 x {} x {} = {}",
                input.earnings_per_share, input.book_value_per_share, radicand
            )));
        }
        Ok(radicand.sqrt())
    }
}

/// Graham growth formula: EPS x (8.5 + 2g). Negative growth is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthGraham;

impl FairValueModel for GrowthGraham {
    fn name(&self) -> &'static str {
        "Graham Growth"
    }

    fn fair_price(&self, input: &ValuationInput) -> Result<f64, AnalysisError> {
        Ok(input.earnings_per_share * (NO_GROWTH_PE + GROWTH_WEIGHT * input.growth_rate_percent))
    }
}

pub struct GrahamValuationEngine {
    defensive: Box<dyn FairValueModel>,
    growth: Box<dyn FairValueModel>,
}

impl GrahamValuationEngine {
    pub fn new() -> Self {
        Self {
            defensive: Box::new(DefensiveGraham),
            growth: Box::new(GrowthGraham),
        }
    }

    /// Compute both fair prices and the safety margin.
    ///
    /// Either all three figures are produced or the call fails with
    /// [`AnalysisError::InvalidInput`]; NaN or infinity never escapes.
    pub fn compute(&self, input: &ValuationInput) -> Result<ValuationResult, AnalysisError> {
        input.validate()?;

        let defensive_fair_price = self.defensive.fair_price(input)?;
        let growth_fair_price = self.growth.fair_price(input)?;

        if defensive_fair_price == 0.0 {
            return Err(AnalysisError::invalid(
                "safety margin is undefined when the defensive fair price is zero",
            ));
        }

        let safety_margin_percent =
            self.calculate_safety_margin(defensive_fair_price, input.current_price);

        for (label, value) in [
            (self.defensive.name(), defensive_fair_price),
            (self.growth.name(), growth_fair_price),
            ("Safety Margin", safety_margin_percent),
        ] {
            if !value.is_finite() {
                return Err(AnalysisError::invalid(format!(
                    "{label} overflowed to a non-finite value"
                )));
            }
        }

        debug!(
            defensive_fair_price,
            growth_fair_price, safety_margin_percent, "valuation computed"
        );

        Ok(ValuationResult {
            defensive_fair_price,
            growth_fair_price,
            safety_margin_percent,
        })
    }

    fn calculate_safety_margin(&self, fair_price: f64, current_price: f64) -> f64 {
        ((fair_price - current_price) / fair_price) * 100.0
    }
}

impl Default for GrahamValuationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the default engine over `input`
pub fn compute_valuation(input: &ValuationInput) -> Result<ValuationResult, AnalysisError> {
    GrahamValuationEngine::new().compute(input)
}
