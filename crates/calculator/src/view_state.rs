//! Calculator state as an immutable value.
//!
//! Every user action produces a fresh [`ViewState`] together with the
//! telemetry event the action should emit, so the presentation layer only
//! renders states and forwards events.

use analysis_core::{AnalysisError, ValuationInput, ValuationResult};
use analytics::TelemetryEvent;
use fundamental_analysis::{compute_valuation, ComparisonChart};
use narrative::{generate_narrative, NarrativeReport};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::form::{Field, FormError, FormFields};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetField(Field, String),
    Calculate,
    GenerateAnalysis,
    Reset,
}

#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Valuation(#[from] AnalysisError),

    #[error("Calculate the fair prices before generating an analysis")]
    NotCalculated,
}

/// A successful calculation and the inputs it was computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub input: ValuationInput,
    pub result: ValuationResult,
    pub chart: ComparisonChart,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub form: FormFields,
    pub calculation: Option<Calculation>,
    pub narrative: Option<NarrativeReport>,
}

/// Next state plus what to report about getting there
#[derive(Debug)]
pub struct Transition {
    pub state: ViewState,
    pub event: Option<TelemetryEvent>,
}

impl Transition {
    fn quiet(state: ViewState) -> Self {
        Self { state, event: None }
    }
}

impl ViewState {
    pub fn has_results(&self) -> bool {
        self.calculation.is_some()
    }

    pub fn apply(&self, action: Action) -> Result<Transition, ActionError> {
        match action {
            Action::SetField(field, value) => Ok(Transition::quiet(self.set_field(field, value))),
            Action::Calculate => self.calculate(),
            Action::GenerateAnalysis => self.generate_analysis(),
            Action::Reset => Ok(Transition {
                state: ViewState::default(),
                event: Some(TelemetryEvent::fields_reset()),
            }),
        }
    }

    fn set_field(&self, field: Field, value: String) -> ViewState {
        let form = self.form.with(field, value);
        if form == self.form {
            return self.clone();
        }

        // Results depend only on the required fields; the narrative reads all of them.
        let calculation = if field.is_required() {
            None
        } else {
            self.calculation.clone()
        };

        ViewState {
            form,
            calculation,
            narrative: None,
        }
    }

    fn calculate(&self) -> Result<Transition, ActionError> {
        let input = self.form.valuation_input()?;
        let result = compute_valuation(&input)?;
        debug!(
            "Calculated defensive {:.2}, growth {:.2}, margin {:.2}%",
            result.defensive_fair_price, result.growth_fair_price, result.safety_margin_percent
        );

        let event = TelemetryEvent::calculation_performed(
            Some(self.form.sector.as_str()),
            result.defensive_fair_price,
        );
        let state = ViewState {
            form: self.form.clone(),
            calculation: Some(Calculation {
                input,
                result,
                chart: ComparisonChart::new(&input, &result),
            }),
            narrative: None,
        };

        Ok(Transition {
            state,
            event: Some(event),
        })
    }

    fn generate_analysis(&self) -> Result<Transition, ActionError> {
        let calculation = self.calculation.as_ref().ok_or(ActionError::NotCalculated)?;
        let supplemental = self.form.supplemental_input()?;
        let report = generate_narrative(&calculation.input, &calculation.result, &supplemental);
        debug!(
            "Generated {} sections, score {}",
            report.sections.len(),
            report.score
        );

        Ok(Transition {
            state: ViewState {
                narrative: Some(report),
                ..self.clone()
            },
            event: Some(TelemetryEvent::analysis_generated()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::EventName;
    use narrative::SectionKind;

    fn apply(state: &ViewState, action: Action) -> ViewState {
        state.apply(action).unwrap().state
    }

    fn filled() -> ViewState {
        [
            (Field::EarningsPerShare, "5.50"),
            (Field::BookValuePerShare, "25.00"),
            (Field::GrowthRate, "10"),
            (Field::CurrentPrice, "30.00"),
        ]
        .into_iter()
        .fold(ViewState::default(), |state, (field, value)| {
            apply(&state, Action::SetField(field, value.to_string()))
        })
    }

    #[test]
    fn test_calculate_produces_results_and_event() {
        let transition = filled().apply(Action::Calculate).unwrap();
        let calculation = transition.state.calculation.as_ref().unwrap();

        let expected = compute_valuation(&ValuationInput::new(5.5, 25.0, 10.0, 30.0)).unwrap();
        assert_eq!(calculation.result, expected);
        assert_eq!(calculation.chart.bars.len(), 3);

        let event = transition.event.unwrap();
        assert_eq!(event.name, EventName::CalculationPerformed);
        assert_eq!(event.params["ticker"], "not_informed");
    }

    #[test]
    fn test_calculate_reports_sector_as_ticker() {
        let state = apply(
            &filled(),
            Action::SetField(Field::Sector, "Banking".to_string()),
        );
        let event = state.apply(Action::Calculate).unwrap().event.unwrap();
        assert_eq!(event.params["ticker"], "Banking");
    }

    #[test]
    fn test_calculate_with_blank_fields_fails_and_keeps_state() {
        let state = ViewState::default();
        let err = state.apply(Action::Calculate).unwrap_err();
        assert!(matches!(err, ActionError::Form(FormError::MissingFields(_))));
        assert!(!state.has_results());
    }

    #[test]
    fn test_calculate_with_invalid_values_fails() {
        let state = apply(
            &filled(),
            Action::SetField(Field::EarningsPerShare, "0".to_string()),
        );
        let err = state.apply(Action::Calculate).unwrap_err();
        assert!(matches!(err, ActionError::Valuation(_)));
    }

    #[test]
    fn test_analysis_requires_calculation() {
        let err = filled().apply(Action::GenerateAnalysis).unwrap_err();
        assert_eq!(err, ActionError::NotCalculated);
    }

    #[test]
    fn test_generate_analysis_uses_optional_fields() {
        let state = apply(&filled(), Action::Calculate);
        let state = apply(
            &state,
            Action::SetField(Field::DividendYield, "6".to_string()),
        );
        let transition = state.apply(Action::GenerateAnalysis).unwrap();

        let report = transition.state.narrative.as_ref().unwrap();
        assert!(report.has_section(SectionKind::Dividends));
        assert_eq!(transition.event.unwrap().name, EventName::AnalysisGenerated);
        assert!(transition.state.has_results());
    }

    #[test]
    fn test_invalid_optional_field_blocks_analysis() {
        let state = apply(&filled(), Action::Calculate);
        let state = apply(&state, Action::SetField(Field::ReturnOnEquity, "x".to_string()));
        let err = state.apply(Action::GenerateAnalysis).unwrap_err();
        assert!(matches!(
            err,
            ActionError::Form(FormError::NotANumber { field: Field::ReturnOnEquity, .. })
        ));
    }

    #[test]
    fn test_editing_required_field_discards_results() {
        let state = apply(&apply(&filled(), Action::Calculate), Action::GenerateAnalysis);
        let state = apply(&state, Action::SetField(Field::CurrentPrice, "31".to_string()));
        assert!(state.calculation.is_none());
        assert!(state.narrative.is_none());
    }

    #[test]
    fn test_editing_optional_field_discards_only_analysis() {
        let state = apply(&apply(&filled(), Action::Calculate), Action::GenerateAnalysis);
        let state = apply(&state, Action::SetField(Field::Sector, "Energy".to_string()));
        assert!(state.calculation.is_some());
        assert!(state.narrative.is_none());
    }

    #[test]
    fn test_setting_identical_value_keeps_everything() {
        let state = apply(&apply(&filled(), Action::Calculate), Action::GenerateAnalysis);
        let same = apply(&state, Action::SetField(Field::GrowthRate, "10".to_string()));
        assert_eq!(same, state);
    }

    #[test]
    fn test_reset_clears_everything() {
        let state = apply(&filled(), Action::Calculate);
        let transition = state.apply(Action::Reset).unwrap();
        assert_eq!(transition.state, ViewState::default());
        assert_eq!(transition.event.unwrap().name, EventName::FieldsReset);
    }
}
