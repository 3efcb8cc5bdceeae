use tracing::warn;

use crate::api::{AccountApi, SubmissionReceipt};
use crate::errors::WizardError;
use crate::wizard::{Field, FormFlow, FormState, Wizard};

use super::interaction::{ConfirmationResponse, FormInteraction, PromptContext, PromptResponse};
use super::output;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Walks a [`Wizard`] field by field through a [`FormInteraction`], then
/// submits through `api` once the operator confirms.
pub struct WizardRunner<'a, F: FormFlow> {
    wizard: &'a mut Wizard<F>,
    api: &'a dyn AccountApi,
}

impl<'a, F: FormFlow> WizardRunner<'a, F> {
    pub fn new(wizard: &'a mut Wizard<F>, api: &'a dyn AccountApi) -> Self {
        Self { wizard, api }
    }

    pub fn run(
        &mut self,
        interaction: &mut dyn FormInteraction,
    ) -> Result<FormResult<SubmissionReceipt>, WizardError> {
        let mut index = 0;
        loop {
            let rules = self.wizard.visible_fields();
            if index >= rules.len() {
                match self.finish_step(interaction, rules.len())? {
                    StepOutcome::Next(next) => index = next,
                    StepOutcome::Done(result) => return Ok(result),
                }
                continue;
            }

            let rule = &rules[index];
            let step = self.wizard.current_step();
            let context = PromptContext {
                field: rule.field,
                kind: &rule.kind,
                required: rule.required,
                help: rule.help,
                current: self.current_value(rule.field),
                step: step.number,
                step_count: self.wizard.step_count(),
                step_title: step.title,
                can_go_back: index > 0 || self.wizard.step() > 1,
            };

            match interaction.prompt_field(&context) {
                PromptResponse::Cancel => return Ok(FormResult::Cancelled),
                PromptResponse::Keep => index += 1,
                PromptResponse::Back => index = self.back_from(index),
                PromptResponse::Value(raw) => match self.wizard.edit(rule.field, &raw) {
                    Ok(()) => index += 1,
                    Err(err) => {
                        for (field, message) in &err.field_errors {
                            output::warning(format!("{}: {}", field.label(), message));
                        }
                    }
                },
            }
        }
    }

    /// Secrets are never offered back as a default.
    fn current_value(&self, field: Field) -> Option<String> {
        if field.is_secret() {
            return None;
        }
        self.wizard.state().raw(field)
    }

    fn back_from(&mut self, index: usize) -> usize {
        if index > 0 {
            return index - 1;
        }
        if self.wizard.step() == 1 {
            output::warning("Already at the first field.");
            return 0;
        }
        self.wizard.retreat();
        self.wizard.visible_fields().len().saturating_sub(1)
    }

    fn finish_step(
        &mut self,
        interaction: &mut dyn FormInteraction,
        visible: usize,
    ) -> Result<StepOutcome, WizardError> {
        let terminal = self.wizard.is_terminal();
        if let Err(err) = self.wizard.advance() {
            let rules = self.wizard.visible_fields();
            for (field, message) in &err.field_errors {
                output::warning(format!("{}: {}", field.label(), message));
            }
            let first = err
                .fields()
                .find_map(|field| rules.iter().position(|rule| rule.field == field))
                .unwrap_or(0);
            return Ok(StepOutcome::Next(first));
        }
        if !terminal {
            return Ok(StepOutcome::Next(0));
        }

        loop {
            let lines: Vec<String> = self
                .wizard
                .summary()
                .into_iter()
                .map(|(field, value)| format!("{}: {}", field.label(), value))
                .collect();
            match interaction.confirm(&lines) {
                ConfirmationResponse::Cancel => return Ok(StepOutcome::Done(FormResult::Cancelled)),
                ConfirmationResponse::Back => {
                    return Ok(StepOutcome::Next(visible.saturating_sub(1)))
                }
                ConfirmationResponse::Confirm => match self.wizard.submit_final(self.api) {
                    Ok(receipt) => return Ok(StepOutcome::Done(FormResult::Completed(receipt))),
                    Err(err) if err.is_recoverable() => {
                        warn!(error = %err, "submission not accepted");
                        output::error(err.user_message());
                        if let WizardError::Remote(remote) = &err {
                            for (field, message) in &remote.field_errors {
                                output::warning(format!("{}: {}", field, message));
                            }
                        }
                    }
                    Err(err) => return Err(err),
                },
            }
        }
    }
}

enum StepOutcome {
    Next(usize),
    Done(FormResult<SubmissionReceipt>),
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use chrono::NaiveDate;

    use super::*;
    use crate::account::{AccountFlow, FlowOptions};
    use crate::api::{InMemoryAccountApi, RemoteError};

    struct MockInteraction {
        prompts: VecDeque<PromptResponse>,
        confirmations: VecDeque<ConfirmationResponse>,
        asked: Vec<Field>,
    }

    impl MockInteraction {
        fn new(prompts: Vec<PromptResponse>, confirmations: Vec<ConfirmationResponse>) -> Self {
            Self {
                prompts: prompts.into(),
                confirmations: confirmations.into(),
                asked: Vec::new(),
            }
        }
    }

    impl FormInteraction for MockInteraction {
        fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
            self.asked.push(context.field);
            self.prompts.pop_front().unwrap_or(PromptResponse::Cancel)
        }

        fn confirm(&mut self, _lines: &[String]) -> ConfirmationResponse {
            self.confirmations
                .pop_front()
                .unwrap_or(ConfirmationResponse::Cancel)
        }
    }

    fn value(text: &str) -> PromptResponse {
        PromptResponse::Value(text.into())
    }

    fn wizard() -> Wizard<AccountFlow> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        Wizard::new(AccountFlow::new(FlowOptions::new(today))).unwrap()
    }

    /// Answers for a current account, in prompt order.
    fn current_account_answers() -> Vec<PromptResponse> {
        vec![
            // Client
            PromptResponse::Keep,
            value("Marie"),
            value("Joseph"),
            value("001-234-567"),
            PromptResponse::Keep,
            PromptResponse::Keep,
            PromptResponse::Keep,
            // Contact
            value("12 Rue Capois"),
            value("Port-au-Prince"),
            PromptResponse::Keep,
            PromptResponse::Keep,
            // Financial
            value("Merchant"),
            PromptResponse::Keep,
            PromptResponse::Keep,
            value("Salary"),
            // Authorized person
            PromptResponse::Keep,
            // Account
            PromptResponse::Keep,
            PromptResponse::Keep,
            value("1"),
            value("7500"),
            value("Cash"),
            PromptResponse::Keep,
            PromptResponse::Keep,
            PromptResponse::Keep,
            PromptResponse::Keep,
            PromptResponse::Keep,
            PromptResponse::Keep,
            PromptResponse::Keep,
            // Security
            value("4821"),
            value("4821"),
            PromptResponse::Keep,
        ]
    }

    #[test]
    fn scripted_session_submits_once() {
        let api = InMemoryAccountApi::new();
        let mut wizard = wizard();
        let mut interaction =
            MockInteraction::new(current_account_answers(), vec![ConfirmationResponse::Confirm]);

        let result = WizardRunner::new(&mut wizard, &api)
            .run(&mut interaction)
            .unwrap();

        match result {
            FormResult::Completed(receipt) => {
                assert_eq!(receipt.reference.as_deref(), Some("ACC-00001"))
            }
            FormResult::Cancelled => panic!("expected completion"),
        }
        assert_eq!(api.calls(), 1);
        assert_eq!(api.submissions()[0]["initialDeposit"], 7500.0);
        assert_eq!(api.submissions()[0]["depositMode"], "CASH");
    }

    #[test]
    fn cancel_leaves_backend_untouched() {
        let api = InMemoryAccountApi::new();
        let mut wizard = wizard();
        let mut interaction = MockInteraction::new(vec![PromptResponse::Cancel], vec![]);
        let result = WizardRunner::new(&mut wizard, &api)
            .run(&mut interaction)
            .unwrap();
        assert_eq!(result, FormResult::Cancelled);
        assert_eq!(api.calls(), 0);
    }

    #[test]
    fn blocked_step_returns_to_the_failing_field() {
        let api = InMemoryAccountApi::new();
        let mut wizard = wizard();
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Keep,
                PromptResponse::Keep,
                value("Joseph"),
                PromptResponse::Keep,
                PromptResponse::Keep,
                PromptResponse::Keep,
                PromptResponse::Keep,
            ],
            vec![],
        );
        let result = WizardRunner::new(&mut wizard, &api)
            .run(&mut interaction)
            .unwrap();
        assert_eq!(result, FormResult::Cancelled);
        assert_eq!(wizard.step(), 1);
        assert_eq!(interaction.asked.last(), Some(&Field::FirstName));
    }

    #[test]
    fn rejected_submission_can_be_retried() {
        let api = InMemoryAccountApi::new();
        api.fail_next(RemoteError::transport("Backend unreachable"));
        let mut wizard = wizard();
        let mut interaction = MockInteraction::new(
            current_account_answers(),
            vec![ConfirmationResponse::Confirm, ConfirmationResponse::Confirm],
        );
        let result = WizardRunner::new(&mut wizard, &api)
            .run(&mut interaction)
            .unwrap();
        assert!(matches!(result, FormResult::Completed(_)));
        assert_eq!(api.calls(), 2);
        assert!(!wizard.is_submitting());
    }
}
