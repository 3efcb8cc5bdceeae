//! Term-deposit projections: rate lookup, simple interest, and maturity dates.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::currency::Currency;
use crate::errors::ConfigurationError;

/// Term lengths, in months, offered for fixed-term savings.
pub const TERM_OPTIONS: [u32; 5] = [3, 6, 12, 24, 36];

static STANDARD_RATES: Lazy<InterestRateTable> = Lazy::new(|| {
    InterestRateTable::from_entries([
        (Currency::Htg, 3, 6.0),
        (Currency::Htg, 6, 7.0),
        (Currency::Htg, 12, 8.5),
        (Currency::Htg, 24, 10.0),
        (Currency::Htg, 36, 11.5),
        (Currency::Usd, 3, 4.5),
        (Currency::Usd, 6, 5.5),
        (Currency::Usd, 12, 7.0),
        (Currency::Usd, 24, 8.5),
        (Currency::Usd, 36, 10.0),
    ])
});

/// Annual rate percentage keyed by currency and term length.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRateTable {
    rates: BTreeMap<(Currency, u32), f64>,
}

impl InterestRateTable {
    pub fn from_entries(entries: impl IntoIterator<Item = (Currency, u32, f64)>) -> Self {
        let rates = entries
            .into_iter()
            .map(|(currency, term, rate)| ((currency, term), rate))
            .collect();
        Self { rates }
    }

    /// The product table shipped with the console.
    pub fn standard() -> &'static InterestRateTable {
        &STANDARD_RATES
    }

    pub fn rate(&self, currency: Currency, term_months: u32) -> Result<f64, ConfigurationError> {
        self.rates
            .get(&(currency, term_months))
            .copied()
            .ok_or(ConfigurationError::MissingRate {
                currency,
                term_months,
            })
    }

    pub fn entries(&self) -> impl Iterator<Item = (Currency, u32, f64)> + '_ {
        self.rates
            .iter()
            .map(|((currency, term), rate)| (*currency, *term, *rate))
    }
}

/// Values derived from a term deposit's inputs. Always rederivable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedProjection {
    pub interest_rate: f64,
    pub projected_interest: f64,
    pub total_at_maturity: f64,
    pub maturity_date: NaiveDate,
}

/// Projects a term deposit against the standard rate table.
pub fn compute_projection(
    principal: f64,
    currency: Currency,
    term_months: u32,
    start_date: NaiveDate,
) -> Result<DerivedProjection, ConfigurationError> {
    compute_projection_with(
        InterestRateTable::standard(),
        principal,
        currency,
        term_months,
        start_date,
    )
}

/// Simple interest paid at maturity; nothing is capitalized along the way.
pub fn compute_projection_with(
    table: &InterestRateTable,
    principal: f64,
    currency: Currency,
    term_months: u32,
    start_date: NaiveDate,
) -> Result<DerivedProjection, ConfigurationError> {
    let interest_rate = table.rate(currency, term_months)?;
    let projected_interest =
        round_to_cents(principal * interest_rate / 100.0 * (term_months as f64 / 12.0));
    let maturity_date = add_months(start_date, term_months)?;

    Ok(DerivedProjection {
        interest_rate,
        projected_interest,
        total_at_maturity: principal + projected_interest,
        maturity_date,
    })
}

/// Calendar-aware month addition; day-of-month clamps to the target month's end.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, ConfigurationError> {
    date.checked_add_months(Months::new(months))
        .ok_or(ConfigurationError::DateOutOfRange {
            start: date,
            months,
        })
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
