use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Required fundamentals for a Graham valuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    pub earnings_per_share: f64,
    pub book_value_per_share: f64,
    /// Expected annual earnings growth in percent (10.0 = 10%), any sign
    pub growth_rate_percent: f64,
    pub current_price: f64,
}

impl ValuationInput {
    pub fn new(
        earnings_per_share: f64,
        book_value_per_share: f64,
        growth_rate_percent: f64,
        current_price: f64,
    ) -> Self {
        Self {
            earnings_per_share,
            book_value_per_share,
            growth_rate_percent,
            current_price,
        }
    }

    /// EPS, BVPS and price must be finite and strictly positive; growth only finite.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        require_positive("earnings_per_share", self.earnings_per_share)?;
        require_positive("book_value_per_share", self.book_value_per_share)?;
        require_positive("current_price", self.current_price)?;

        if !self.growth_rate_percent.is_finite() {
            return Err(AnalysisError::invalid(format!(
                "growth_rate_percent must be a finite number, got {}",
                self.growth_rate_percent
            )));
        }

        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), AnalysisError> {
    if !value.is_finite() {
        return Err(AnalysisError::invalid(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value <= 0.0 {
        return Err(AnalysisError::invalid(format!(
            "{field} must be strictly positive, got {value}"
        )));
    }
    Ok(())
}

/// Fair-price estimates and safety margin derived from a [`ValuationInput`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// sqrt(22.5 x EPS x BVPS)
    pub defensive_fair_price: f64,
    /// EPS x (8.5 + 2g)
    pub growth_fair_price: f64,
    /// Discount of the current price below the defensive fair price, in percent
    pub safety_margin_percent: f64,
}

/// Optional secondary ratios that only feed the narrative.
///
/// Every figure is an `Option`: `None` means the user left it out, and the
/// matching narrative section and score term are skipped. Never read a
/// missing figure as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplementalInput {
    #[serde(default)]
    pub ev_to_ebitda: Option<f64>,
    #[serde(default)]
    pub net_debt_to_ebitda: Option<f64>,
    #[serde(default)]
    pub return_on_equity_percent: Option<f64>,
    #[serde(default)]
    pub net_margin_percent: Option<f64>,
    #[serde(default)]
    pub dividend_yield_percent: Option<f64>,
    /// Absolute free cash flow, in millions of currency units
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
}

impl SupplementalInput {
    /// Copy with non-finite figures and blank sector text turned into `None`.
    pub fn normalized(&self) -> Self {
        Self {
            ev_to_ebitda: metric(self.ev_to_ebitda),
            net_debt_to_ebitda: metric(self.net_debt_to_ebitda),
            return_on_equity_percent: metric(self.return_on_equity_percent),
            net_margin_percent: metric(self.net_margin_percent),
            dividend_yield_percent: metric(self.dividend_yield_percent),
            free_cash_flow: metric(self.free_cash_flow),
            sector: self.sector().map(str::to_string),
        }
    }

    /// Trimmed sector text, `None` when absent or blank
    pub fn sector(&self) -> Option<&str> {
        self.sector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Treat NaN and infinities as an absent figure
pub fn metric(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_positive_inputs() {
        let input = ValuationInput::new(5.50, 25.00, -3.0, 30.00);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_required_fields() {
        for input in [
            ValuationInput::new(0.0, 25.0, 10.0, 30.0),
            ValuationInput::new(5.5, 0.0, 10.0, 30.0),
            ValuationInput::new(5.5, 25.0, 10.0, 0.0),
            ValuationInput::new(5.5, 25.0, 10.0, -1.0),
            ValuationInput::new(-5.5, -25.0, 10.0, 30.0),
        ] {
            assert!(matches!(
                input.validate(),
                Err(AnalysisError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        assert!(ValuationInput::new(f64::NAN, 25.0, 10.0, 30.0).validate().is_err());
        assert!(ValuationInput::new(5.5, f64::INFINITY, 10.0, 30.0).validate().is_err());
        assert!(ValuationInput::new(5.5, 25.0, f64::NAN, 30.0).validate().is_err());
    }

    #[test]
    fn test_normalized_drops_nan_and_blank_sector() {
        let raw = SupplementalInput {
            ev_to_ebitda: Some(f64::NAN),
            net_debt_to_ebitda: Some(1.2),
            dividend_yield_percent: Some(f64::INFINITY),
            sector: Some("   ".to_string()),
            ..Default::default()
        };
        let clean = raw.normalized();
        assert_eq!(clean.ev_to_ebitda, None);
        assert_eq!(clean.net_debt_to_ebitda, Some(1.2));
        assert_eq!(clean.dividend_yield_percent, None);
        assert_eq!(clean.sector, None);
    }

    #[test]
    fn test_sector_is_trimmed() {
        let input = SupplementalInput {
            sector: Some("  Banking ".to_string()),
            ..Default::default()
        };
        assert_eq!(input.sector(), Some("Banking"));
    }
}
