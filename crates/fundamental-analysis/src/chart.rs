use analysis_core::{ValuationInput, ValuationResult};
use serde::{Deserialize, Serialize};

/// One bar of the price comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
    /// Hex colour, e.g. "#3b82f6"
    pub color: String,
}

/// Current price next to both Graham fair prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonChart {
    pub bars: Vec<ChartBar>,
}

impl ComparisonChart {
    pub fn new(input: &ValuationInput, result: &ValuationResult) -> Self {
        let bars = vec![
            ChartBar {
                label: "Current Price".to_string(),
                value: input.current_price,
                color: "#ef4444".to_string(),
            },
            ChartBar {
                label: "Graham Defensive".to_string(),
                value: result.defensive_fair_price,
                color: "#3b82f6".to_string(),
            },
            ChartBar {
                label: "Graham Growth".to_string(),
                value: result.growth_fair_price,
                color: "#10b981".to_string(),
            },
        ];
        Self { bars }
    }

    /// Largest bar value, floored at zero so negative growth prices don't skew scaling
    pub fn max_value(&self) -> f64 {
        self.bars
            .iter()
            .map(|bar| bar.value)
            .fold(0.0_f64, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_valuation;

    #[test]
    fn test_chart_bar_order_and_colors() {
        let input = ValuationInput::new(5.50, 25.00, 10.0, 30.00);
        let result = compute_valuation(&input).unwrap();
        let chart = ComparisonChart::new(&input, &result);

        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Current Price", "Graham Defensive", "Graham Growth"]);
        assert_eq!(chart.bars[0].color, "#ef4444");
        assert_eq!(chart.bars[0].value, 30.0);
        assert_eq!(chart.max_value(), result.growth_fair_price);
    }

    #[test]
    fn test_max_value_ignores_negative_bars() {
        let input = ValuationInput::new(1.0, 1.0, -20.0, 2.0);
        let result = compute_valuation(&input).unwrap();
        let chart = ComparisonChart::new(&input, &result);
        assert!(chart.bars[2].value < 0.0);
        assert_eq!(chart.max_value(), result.defensive_fair_price);
    }
}
