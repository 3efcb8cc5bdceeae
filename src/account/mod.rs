//! Account-opening wizard: client identity, contact, financial profile,
//! authorized person, account configuration, and security.

pub mod derived;
pub mod payload;
pub mod state;
pub mod steps;

use chrono::NaiveDate;
use tracing::error;

use crate::api::{AccountApi, Branch, RemoteError, SubmissionReceipt};
use crate::config::Config;
use crate::currency::Currency;
use crate::errors::WizardError;
use crate::projection::DerivedProjection;
use crate::utils::Clock;
use crate::wizard::{Field, FormFlow, StepDefinition, Wizard, WizardEvent};

pub use derived::{apply_currency_defaults, minimum_deposit, projection_for, DefaultsPolicy};
pub use payload::SubmissionPayload;
pub use state::{
    AccountKind, AccountState, AuthorizedPerson, ClientIdentity, ClientType, DepositMode,
    IndividualIdentity, OrganizationIdentity,
};

/// Inputs that shape one account-opening session.
#[derive(Debug, Clone)]
pub struct FlowOptions {
    pub today: NaiveDate,
    pub default_currency: Currency,
    pub defaults_policy: DefaultsPolicy,
    pub country: String,
    pub minimum_age: u32,
    /// Known branches. Empty means the branch ID is not checked against a list.
    pub branches: Vec<Branch>,
}

impl FlowOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self::from_config(&Config::default(), today)
    }

    pub fn from_config(config: &Config, today: NaiveDate) -> Self {
        Self {
            today,
            default_currency: config.default_currency,
            defaults_policy: config.defaults_policy,
            country: config.country.clone(),
            minimum_age: config.minimum_age,
            branches: Vec::new(),
        }
    }

    pub fn with_clock(config: &Config, clock: &dyn Clock) -> Self {
        Self::from_config(config, clock.today())
    }

    pub fn with_branches(mut self, branches: Vec<Branch>) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_policy(mut self, policy: DefaultsPolicy) -> Self {
        self.defaults_policy = policy;
        self
    }
}

pub struct AccountFlow {
    options: FlowOptions,
    steps: Vec<StepDefinition<AccountState>>,
}

impl AccountFlow {
    pub fn new(options: FlowOptions) -> Self {
        let steps = steps::account_steps(&options);
        Self { options, steps }
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }
}

impl FormFlow for AccountFlow {
    type State = AccountState;
    type Payload = SubmissionPayload;

    fn name(&self) -> &'static str {
        "account-opening"
    }

    fn steps(&self) -> &[StepDefinition<AccountState>] {
        &self.steps
    }

    fn initial_state(&self) -> AccountState {
        let mut state = AccountState::new(
            self.options.default_currency,
            &self.options.country,
            self.options.today,
        );
        apply_currency_defaults(&mut state, self.options.defaults_policy);
        state
    }

    fn on_change(&self, state: &mut AccountState, field: Field) -> Vec<WizardEvent> {
        derived::recompute(state, field, self.options.defaults_policy)
    }

    fn build_payload(&self, state: &AccountState) -> Result<SubmissionPayload, WizardError> {
        let projection = projection_for(state)?;
        payload::build_payload(state, projection.as_ref())
    }

    fn submit(
        &self,
        api: &dyn AccountApi,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, RemoteError> {
        api.create_account(payload)
    }
}

impl Wizard<AccountFlow> {
    /// Term-deposit projection for the current inputs, computed on demand.
    pub fn projection(&self) -> Option<DerivedProjection> {
        projection_for(self.state()).unwrap_or_else(|err| {
            error!(error = %err, "projection unavailable");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::FixedClock;
    use crate::wizard::FormState;

    fn wizard() -> Wizard<AccountFlow> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        Wizard::new(AccountFlow::new(FlowOptions::new(today))).unwrap()
    }

    #[test]
    fn initial_state_carries_currency_defaults() {
        let wizard = wizard();
        let state = wizard.state();
        assert_eq!(state.currency, Currency::Htg);
        assert_eq!(state.minimum_balance, "5000");
        assert_eq!(state.daily_withdrawal_limit, "50000");
        assert_eq!(state.checkbook_fee, "500");
        assert_eq!(state.start_date, "2024-06-01");
        assert_eq!(state.country, "Haiti");
    }

    #[test]
    fn clock_sets_the_session_day() {
        let day = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let options = FlowOptions::with_clock(&Config::default(), &FixedClock(day));
        assert_eq!(options.today, day);
    }

    #[test]
    fn currency_switch_refreshes_defaults() {
        let mut wizard = wizard();
        wizard.edit(Field::Currency, "USD").unwrap();
        assert_eq!(wizard.state().maintenance_fee, "5");
        assert_eq!(wizard.state().raw(Field::MonthlyWithdrawalLimit).as_deref(), Some("5000"));
        assert_eq!(wizard.state().checkbook_fee, "25");
    }

    #[test]
    fn projection_follows_the_inputs() {
        let mut wizard = wizard();
        assert_eq!(wizard.projection(), None);
        wizard.edit(Field::AccountKind, "Term savings").unwrap();
        wizard.edit(Field::PrincipalAmount, "10000").unwrap();
        wizard.edit(Field::TermMonths, "12").unwrap();
        let projection = wizard.projection().unwrap();
        assert_eq!(projection.projected_interest, 850.0);
        wizard.edit(Field::AccountKind, "Current account").unwrap();
        assert_eq!(wizard.projection(), None);
    }
}
