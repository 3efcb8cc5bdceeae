//! Fields the account wizard computes from other fields.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::currency::{format_amount, Currency};
use crate::errors::ConfigurationError;
use crate::projection::{compute_projection, DerivedProjection};
use crate::wizard::validation::parse_decimal;
use crate::wizard::{Field, WizardEvent};

use super::state::{AccountKind, AccountState};

/// Limit fields pre-filled from the currency's default table.
pub const DEFAULTED_FIELDS: [Field; 5] = [
    Field::MinimumBalance,
    Field::DailyWithdrawalLimit,
    Field::MonthlyWithdrawalLimit,
    Field::MaintenanceFee,
    Field::CheckbookFee,
];

/// What happens to limit fields the operator already typed when the
/// currency, term, or account type changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultsPolicy {
    /// Keep values typed during this session; refresh the rest.
    #[default]
    PreserveUserEdits,
    /// Overwrite every limit field with the currency default.
    AlwaysReset,
}

/// Resets the limit fields to the current currency's defaults under `policy`.
/// Returns the fields that were written.
pub fn apply_currency_defaults(state: &mut AccountState, policy: DefaultsPolicy) -> Vec<Field> {
    let defaults = state.currency.defaults();
    let mut written = Vec::new();
    for field in DEFAULTED_FIELDS {
        if policy == DefaultsPolicy::PreserveUserEdits && state.is_user_edited(field) {
            continue;
        }
        let value = match field {
            Field::MinimumBalance => defaults.minimum_balance,
            Field::DailyWithdrawalLimit => defaults.daily_withdrawal_limit,
            Field::MonthlyWithdrawalLimit => defaults.monthly_withdrawal_limit,
            Field::MaintenanceFee => defaults.maintenance_fee,
            _ => defaults.checkbook_fee,
        };
        state.write_default(field, format_amount(value));
        written.push(field);
    }
    written
}

/// Smallest opening deposit accepted for a currency and account type. Term
/// deposits share one floor across currencies.
pub fn minimum_deposit(currency: Currency, kind: AccountKind) -> f64 {
    match (currency, kind) {
        (Currency::Htg, AccountKind::Current) => 5_000.0,
        (Currency::Usd, AccountKind::Current) => 50.0,
        (_, AccountKind::TermSavings) => 1_000.0,
    }
}

/// Projection for the state as it stands. `Ok(None)` when the account is not
/// a term deposit or its inputs are incomplete.
pub fn projection_for(state: &AccountState) -> Result<Option<DerivedProjection>, ConfigurationError> {
    if !state.is_term_savings() {
        return Ok(None);
    }
    let principal = match parse_decimal(&state.principal_amount) {
        Ok(value) if value > 0.0 => value,
        _ => return Ok(None),
    };
    let (Some(term), Some(start)) = (state.term(), state.start()) else {
        return Ok(None);
    };
    compute_projection(principal, state.currency, term, start).map(Some)
}

/// Recomputes whatever depends on `field` and reports what changed.
pub fn recompute(state: &mut AccountState, field: Field, policy: DefaultsPolicy) -> Vec<WizardEvent> {
    let mut events = Vec::new();

    if matches!(field, Field::Currency | Field::TermMonths | Field::AccountKind) {
        let fields = apply_currency_defaults(state, policy);
        if !fields.is_empty() {
            debug!(currency = %state.currency, ?fields, "currency defaults applied");
            events.push(WizardEvent::DefaultsApplied {
                currency: state.currency,
                fields,
            });
        }
    }

    if matches!(
        field,
        Field::PrincipalAmount
            | Field::Currency
            | Field::TermMonths
            | Field::StartDate
            | Field::AccountKind
    ) {
        match projection_for(state) {
            Ok(Some(projection)) => events.push(WizardEvent::ProjectionUpdated(projection)),
            Ok(None) => events.push(WizardEvent::ProjectionCleared),
            Err(err) => {
                error!(error = %err, "projection unavailable");
                events.push(WizardEvent::ProjectionCleared);
            }
        }
    }

    events
}
