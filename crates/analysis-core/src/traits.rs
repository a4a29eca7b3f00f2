use crate::{AnalysisError, ValuationInput};

/// Trait for closed-form intrinsic value models
pub trait FairValueModel: Send + Sync {
    /// Short label used in logs and chart legends
    fn name(&self) -> &'static str;

    fn fair_price(&self, input: &ValuationInput) -> Result<f64, AnalysisError>;
}
