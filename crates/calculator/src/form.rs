//! Input collector: raw text from the user, parsed into engine inputs.

use std::fmt;
use std::str::FromStr;

use analysis_core::{SupplementalInput, ValuationInput};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EarningsPerShare,
    BookValuePerShare,
    GrowthRate,
    CurrentPrice,
    EvToEbitda,
    NetDebtToEbitda,
    ReturnOnEquity,
    NetMargin,
    DividendYield,
    FreeCashFlow,
    Sector,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::EarningsPerShare,
        Field::BookValuePerShare,
        Field::GrowthRate,
        Field::CurrentPrice,
        Field::EvToEbitda,
        Field::NetDebtToEbitda,
        Field::ReturnOnEquity,
        Field::NetMargin,
        Field::DividendYield,
        Field::FreeCashFlow,
        Field::Sector,
    ];

    pub const REQUIRED: [Field; 4] = [
        Field::EarningsPerShare,
        Field::BookValuePerShare,
        Field::GrowthRate,
        Field::CurrentPrice,
    ];

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    /// Short name used on the command line and in the interactive session
    pub fn key(&self) -> &'static str {
        match self {
            Field::EarningsPerShare => "eps",
            Field::BookValuePerShare => "bvps",
            Field::GrowthRate => "growth",
            Field::CurrentPrice => "price",
            Field::EvToEbitda => "ev-ebitda",
            Field::NetDebtToEbitda => "net-debt-ebitda",
            Field::ReturnOnEquity => "roe",
            Field::NetMargin => "net-margin",
            Field::DividendYield => "dividend-yield",
            Field::FreeCashFlow => "fcf",
            Field::Sector => "sector",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::EarningsPerShare => "EPS (earnings per share)",
            Field::BookValuePerShare => "BVPS (book value per share)",
            Field::GrowthRate => "Growth rate (%)",
            Field::CurrentPrice => "Current price",
            Field::EvToEbitda => "EV/EBITDA",
            Field::NetDebtToEbitda => "Net debt/EBITDA",
            Field::ReturnOnEquity => "ROE (%)",
            Field::NetMargin => "Net margin (%)",
            Field::DividendYield => "Dividend yield (%)",
            Field::FreeCashFlow => "FCF (millions)",
            Field::Sector => "Sector",
        }
    }

    /// Example value shown as a hint
    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::EarningsPerShare => "5.50",
            Field::BookValuePerShare => "25.00",
            Field::GrowthRate => "10.0",
            Field::CurrentPrice => "30.00",
            Field::EvToEbitda => "8.5",
            Field::NetDebtToEbitda => "2.0",
            Field::ReturnOnEquity => "18.5",
            Field::NetMargin => "12.0",
            Field::DividendYield => "5.5",
            Field::FreeCashFlow => "150.5",
            Field::Sector => "Banking, Energy, Technology...",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        let field = match normalized.as_str() {
            "eps" | "lpa" => Field::EarningsPerShare,
            "bvps" | "vpa" => Field::BookValuePerShare,
            "growth" | "g" => Field::GrowthRate,
            "price" => Field::CurrentPrice,
            "ev-ebitda" | "ev/ebitda" => Field::EvToEbitda,
            "net-debt-ebitda" | "debt" => Field::NetDebtToEbitda,
            "roe" => Field::ReturnOnEquity,
            "net-margin" | "margin" => Field::NetMargin,
            "dividend-yield" | "dy" => Field::DividendYield,
            "fcf" => Field::FreeCashFlow,
            "sector" => Field::Sector,
            _ => return Err(format!("unknown field '{}'", s.trim())),
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("please fill in at least: {}", labels(.0))]
    MissingFields(Vec<Field>),

    #[error("{} must be a number, got '{value}'", .field.label())]
    NotANumber { field: Field, value: String },
}

fn labels(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw text of every input, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub earnings_per_share: String,
    pub book_value_per_share: String,
    pub growth_rate: String,
    pub current_price: String,
    pub ev_to_ebitda: String,
    pub net_debt_to_ebitda: String,
    pub return_on_equity: String,
    pub net_margin: String,
    pub dividend_yield: String,
    pub free_cash_flow: String,
    pub sector: String,
}

impl FormFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::EarningsPerShare => &self.earnings_per_share,
            Field::BookValuePerShare => &self.book_value_per_share,
            Field::GrowthRate => &self.growth_rate,
            Field::CurrentPrice => &self.current_price,
            Field::EvToEbitda => &self.ev_to_ebitda,
            Field::NetDebtToEbitda => &self.net_debt_to_ebitda,
            Field::ReturnOnEquity => &self.return_on_equity,
            Field::NetMargin => &self.net_margin,
            Field::DividendYield => &self.dividend_yield,
            Field::FreeCashFlow => &self.free_cash_flow,
            Field::Sector => &self.sector,
        }
    }

    /// Copy of the form with one field replaced
    pub fn with(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            Field::EarningsPerShare => &mut next.earnings_per_share,
            Field::BookValuePerShare => &mut next.book_value_per_share,
            Field::GrowthRate => &mut next.growth_rate,
            Field::CurrentPrice => &mut next.current_price,
            Field::EvToEbitda => &mut next.ev_to_ebitda,
            Field::NetDebtToEbitda => &mut next.net_debt_to_ebitda,
            Field::ReturnOnEquity => &mut next.return_on_equity,
            Field::NetMargin => &mut next.net_margin,
            Field::DividendYield => &mut next.dividend_yield,
            Field::FreeCashFlow => &mut next.free_cash_flow,
            Field::Sector => &mut next.sector,
        };
        *slot = value.into();
        next
    }

    pub fn is_blank(&self, field: Field) -> bool {
        self.get(field).trim().is_empty()
    }

    /// Parse the four required fields; blanks are reported together.
    pub fn valuation_input(&self) -> Result<ValuationInput, FormError> {
        let missing: Vec<Field> = Field::REQUIRED
            .iter()
            .copied()
            .filter(|f| self.is_blank(*f))
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        Ok(ValuationInput {
            earnings_per_share: self.required(Field::EarningsPerShare)?,
            book_value_per_share: self.required(Field::BookValuePerShare)?,
            growth_rate_percent: self.required(Field::GrowthRate)?,
            current_price: self.required(Field::CurrentPrice)?,
        })
    }

    /// Parse the optional ratios; blank fields become `None`.
    pub fn supplemental_input(&self) -> Result<SupplementalInput, FormError> {
        let sector = self.sector.trim();

        Ok(SupplementalInput {
            ev_to_ebitda: self.optional(Field::EvToEbitda)?,
            net_debt_to_ebitda: self.optional(Field::NetDebtToEbitda)?,
            return_on_equity_percent: self.optional(Field::ReturnOnEquity)?,
            net_margin_percent: self.optional(Field::NetMargin)?,
            dividend_yield_percent: self.optional(Field::DividendYield)?,
            free_cash_flow: self.optional(Field::FreeCashFlow)?,
            sector: (!sector.is_empty()).then(|| sector.to_string()),
        })
    }

    fn required(&self, field: Field) -> Result<f64, FormError> {
        self.optional(field)?
            .ok_or_else(|| FormError::MissingFields(vec![field]))
    }

    fn optional(&self, field: Field) -> Result<Option<f64>, FormError> {
        parse_number(field, self.get(field))
    }
}

fn parse_number(field: Field, raw: &str) -> Result<Option<f64>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(FormError::NotANumber {
            field,
            value: trimmed.to_string(),
        }),
    }
}
