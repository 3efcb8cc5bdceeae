//! Linear multi-step wizard shared by every onboarding flow.
//!
//! A [`FormFlow`] describes the steps, the state record, how derived fields
//! react to edits, and how the finished state becomes a backend payload. The
//! [`Wizard`] controller owns one state record and walks it through the steps:
//! `advance` is gated by the active step's validator, `retreat` never loses
//! data, and `submit_final` is only reachable from the last step.

pub mod events;
pub mod field;
pub mod policy;
pub mod validation;

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{AccountApi, RemoteError, SubmissionReceipt};
use crate::errors::{ConfigurationError, WizardError};

pub use events::{EventBus, WizardEvent};
pub use field::Field;
pub use policy::{PasswordPolicy, PinPolicy};
pub use validation::{
    Check, FieldKind, FieldRule, FormState, StepDefinition, ValidationError, ValidationResult,
};

/// High-level form contract for a concrete onboarding flow.
pub trait FormFlow {
    type State: FormState;
    type Payload: Serialize + fmt::Debug;

    fn name(&self) -> &'static str;

    /// Ordered step definitions; numbered from 1. Must not be empty:
    /// [`Wizard::new`] rejects a flow without steps.
    fn steps(&self) -> &[StepDefinition<Self::State>];

    fn initial_state(&self) -> Self::State;

    /// Reacts to an edit of `field`, recomputing whatever depends on it.
    fn on_change(&self, _state: &mut Self::State, _field: Field) -> Vec<WizardEvent> {
        Vec::new()
    }

    /// Maps the finished state into the backend request shape.
    fn build_payload(&self, state: &Self::State) -> Result<Self::Payload, WizardError>;

    /// Sends the payload to the backend.
    fn submit(
        &self,
        api: &dyn AccountApi,
        payload: &Self::Payload,
    ) -> Result<SubmissionReceipt, RemoteError>;
}

/// Drives one [`FormFlow`] session. Each instance owns its state exclusively.
pub struct Wizard<F: FormFlow> {
    flow: F,
    state: F::State,
    step: usize,
    session_id: Uuid,
    in_flight: bool,
    events: EventBus,
}

impl<F: FormFlow> Wizard<F> {
    pub fn new(flow: F) -> Result<Self, ConfigurationError> {
        if flow.steps().is_empty() {
            return Err(ConfigurationError::EmptyFlow { flow: flow.name() });
        }
        let state = flow.initial_state();
        let session_id = Uuid::new_v4();
        info!(session = %session_id, flow = flow.name(), "wizard session started");
        Ok(Self {
            flow,
            state,
            step: 1,
            session_id,
            in_flight: false,
            events: EventBus::default(),
        })
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn state(&self) -> &F::State {
        &self.state
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Active step, 1-based.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.flow.steps().len()
    }

    pub fn is_terminal(&self) -> bool {
        self.step == self.step_count()
    }

    pub fn current_step(&self) -> &StepDefinition<F::State> {
        &self.flow.steps()[self.step - 1]
    }

    /// Rules of the active step that apply to the current state.
    pub fn visible_fields(&self) -> Vec<FieldRule<F::State>> {
        self.current_step()
            .visible_rules(&self.state)
            .cloned()
            .collect()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&WizardEvent) + 'static) {
        self.events.subscribe(listener);
    }

    /// Writes one field, then lets the flow recompute its derived fields.
    pub fn edit(&mut self, field: Field, raw: &str) -> Result<(), ValidationError> {
        self.state
            .assign(field, raw)
            .map_err(|message| ValidationError::single(field, message))?;
        debug!(session = %self.session_id, field = %field, "field edited");
        self.events.emit(&WizardEvent::FieldChanged { field });
        for event in self.flow.on_change(&mut self.state, field) {
            self.events.emit(&event);
        }
        Ok(())
    }

    pub fn validate_current(&self) -> ValidationResult {
        self.current_step().validate(&self.state)
    }

    /// Moves to the next step when the active step validates. On failure the
    /// step index is left untouched.
    pub fn advance(&mut self) -> Result<usize, ValidationError> {
        if let Err(err) = self.validate_current().into_result() {
            warn!(
                session = %self.session_id,
                step = self.step,
                fields = ?err.fields().collect::<Vec<_>>(),
                "advance blocked by validation"
            );
            return Err(err);
        }
        if !self.is_terminal() {
            self.move_to(self.step + 1);
        }
        Ok(self.step)
    }

    /// Steps back by one; a no-op on the first step. Entered data is kept.
    pub fn retreat(&mut self) -> usize {
        if self.step > 1 {
            self.move_to(self.step - 1);
        }
        self.step
    }

    fn move_to(&mut self, to: usize) {
        let from = self.step;
        self.step = to;
        info!(session = %self.session_id, from, to, "wizard step changed");
        self.events.emit(&WizardEvent::StepChanged { from, to });
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Validates the terminal step, builds the payload, and marks the session
    /// as in flight. Nothing is sent; pair with [`Wizard::finish_submission`].
    pub fn begin_submission(&mut self) -> Result<F::Payload, WizardError> {
        if !self.is_terminal() {
            return Err(WizardError::NotTerminalStep {
                current: self.step,
                total: self.step_count(),
            });
        }
        if self.in_flight {
            return Err(WizardError::SubmissionInFlight);
        }
        self.validate_current().into_result()?;
        let payload = self.flow.build_payload(&self.state)?;
        self.in_flight = true;
        debug!(session = %self.session_id, "payload built");
        self.events.emit(&WizardEvent::SubmissionStarted);
        Ok(payload)
    }

    /// Clears the in-flight guard after the backend answered, either way.
    pub fn finish_submission(&mut self, success: bool) {
        self.in_flight = false;
        self.events.emit(&WizardEvent::SubmissionFinished { success });
    }

    /// Runs the whole submission: terminal validation, mapping, backend call.
    pub fn submit_final(&mut self, api: &dyn AccountApi) -> Result<SubmissionReceipt, WizardError> {
        let payload = self.begin_submission()?;
        info!(session = %self.session_id, flow = self.flow.name(), "submitting");
        let outcome = self.flow.submit(api, &payload);
        self.finish_submission(outcome.is_ok());
        match outcome {
            Ok(receipt) => {
                info!(session = %self.session_id, reference = ?receipt.reference, "submission accepted");
                Ok(receipt)
            }
            Err(err) => {
                warn!(session = %self.session_id, error = %err, "submission rejected");
                Err(WizardError::Remote(err))
            }
        }
    }

    /// Label/value pairs for every applicable, filled field. Secrets are masked.
    pub fn summary(&self) -> Vec<(Field, String)> {
        let mut entries = Vec::new();
        for step in self.flow.steps() {
            for rule in step.visible_rules(&self.state) {
                if let Some(value) = self.state.raw(rule.field) {
                    let shown = if rule.field.is_secret() {
                        "•".repeat(value.chars().count())
                    } else {
                        value
                    };
                    entries.push((rule.field, shown));
                }
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank;

    impl FormState for Blank {
        fn raw(&self, _field: Field) -> Option<String> {
            None
        }

        fn assign(&mut self, field: Field, _raw: &str) -> Result<(), String> {
            Err(format!("{} is not collected", field.label()))
        }
    }

    struct NoSteps(Vec<StepDefinition<Blank>>);

    impl FormFlow for NoSteps {
        type State = Blank;
        type Payload = ();

        fn name(&self) -> &'static str {
            "empty"
        }

        fn steps(&self) -> &[StepDefinition<Blank>] {
            &self.0
        }

        fn initial_state(&self) -> Blank {
            Blank
        }

        fn build_payload(&self, _state: &Blank) -> Result<(), WizardError> {
            Ok(())
        }

        fn submit(
            &self,
            _api: &dyn AccountApi,
            _payload: &(),
        ) -> Result<SubmissionReceipt, RemoteError> {
            Err(RemoteError::transport("nothing to send"))
        }
    }

    #[test]
    fn flow_without_steps_is_rejected() {
        match Wizard::new(NoSteps(Vec::new())) {
            Err(err) => assert_eq!(err, ConfigurationError::EmptyFlow { flow: "empty" }),
            Ok(_) => panic!("expected an empty flow to be rejected"),
        }
    }
}
