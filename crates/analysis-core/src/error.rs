use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A required figure violated its precondition, or a formula hit an
    /// undefined operation (negative radicand, zero denominator).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AnalysisError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AnalysisError::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = AnalysisError::invalid("earnings_per_share must be strictly positive, got 0");
        assert_eq!(
            err.to_string(),
            "Invalid input: earnings_per_share must be strictly positive, got 0"
        );
    }
}
