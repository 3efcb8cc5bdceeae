//! Administrator creation wizard: identity, department and branch assignment,
//! and login credentials.

pub mod payload;
pub mod state;
pub mod steps;

use crate::api::{AccountApi, Branch, RemoteError, SubmissionReceipt};
use crate::errors::WizardError;
use crate::wizard::{FormFlow, StepDefinition};

pub use payload::{build_admin_payload, split_full_name, AdminPayload};
pub use state::{AdminRole, AdminState, DEPARTMENTS};

pub struct AdminFlow {
    steps: Vec<StepDefinition<AdminState>>,
}

impl AdminFlow {
    /// `branches` restricts the home branch and overseen branches to active
    /// entries; pass an empty list when the branch listing is unavailable.
    pub fn new(branches: &[Branch]) -> Self {
        let active: Vec<u32> = branches
            .iter()
            .filter(|branch| branch.active)
            .map(|branch| branch.id)
            .collect();
        Self {
            steps: steps::admin_steps(&active),
        }
    }
}

impl FormFlow for AdminFlow {
    type State = AdminState;
    type Payload = AdminPayload;

    fn name(&self) -> &'static str {
        "administrator"
    }

    fn steps(&self) -> &[StepDefinition<AdminState>] {
        &self.steps
    }

    fn initial_state(&self) -> AdminState {
        AdminState::default()
    }

    fn build_payload(&self, state: &AdminState) -> Result<AdminPayload, WizardError> {
        build_admin_payload(state)
    }

    fn submit(
        &self,
        api: &dyn AccountApi,
        payload: &AdminPayload,
    ) -> Result<SubmissionReceipt, RemoteError> {
        api.create_administrator(payload)
    }
}
