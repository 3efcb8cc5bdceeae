//! Prompt surface used by [`super::runner::WizardRunner`]. The terminal
//! implementation relies on dialoguer; tests script responses instead.

use dialoguer::{theme::ColorfulTheme, Input, Password, Select};

use crate::wizard::{Field, FieldKind};

/// Typed in a text prompt to return to the previous field.
pub const BACK_COMMAND: &str = ":back";
/// Typed in a text prompt to abandon the wizard.
pub const CANCEL_COMMAND: &str = ":cancel";

const BACK_LABEL: &str = "← Back";

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value.
    Value(String),
    /// User kept the current value.
    Keep,
    /// Go back to the previous field.
    Back,
    /// Abort the entire wizard immediately.
    Cancel,
}

/// Responses accepted when confirming the collected data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirm,
    Back,
    Cancel,
}

pub struct PromptContext<'a> {
    pub field: Field,
    pub kind: &'a FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub current: Option<String>,
    pub step: usize,
    pub step_count: usize,
    pub step_title: &'static str,
    /// Whether there is anything to go back to.
    pub can_go_back: bool,
}

impl PromptContext<'_> {
    pub fn title(&self) -> String {
        format!(
            "Step {}/{} {}: {}",
            self.step,
            self.step_count,
            self.step_title,
            self.field.label()
        )
    }
}

pub trait FormInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    fn confirm(&mut self, lines: &[String]) -> ConfirmationResponse;
}

/// Interactive terminal implementation.
pub struct TerminalInteraction {
    theme: ColorfulTheme,
}

impl Default for TerminalInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn prompt_text(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        let mut label = context.title();
        if !context.required {
            label.push_str(" (optional)");
        }
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true);
        if let Some(current) = &context.current {
            input = input.default(current.clone());
        }
        match input.interact_text() {
            Ok(value) => interpret_text(&value, context),
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn prompt_secret(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        let result = Password::with_theme(&self.theme)
            .with_prompt(context.title())
            .allow_empty_password(true)
            .interact();
        match result {
            Ok(value) if value.is_empty() && context.current.is_some() => PromptResponse::Keep,
            Ok(value) => interpret_text(&value, context),
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn prompt_choice(&mut self, context: &PromptContext<'_>, options: &[String]) -> PromptResponse {
        let mut items: Vec<String> = options.to_vec();
        if context.can_go_back {
            items.push(BACK_LABEL.to_string());
        }
        let default = context
            .current
            .as_ref()
            .and_then(|current| {
                options
                    .iter()
                    .position(|option| option.eq_ignore_ascii_case(current))
            })
            .unwrap_or(0);

        let selection = Select::with_theme(&self.theme)
            .with_prompt(context.title())
            .items(&items)
            .default(default)
            .interact_opt();
        match selection {
            Ok(Some(index)) if index >= options.len() => PromptResponse::Back,
            Ok(Some(index)) => {
                let value = &items[index];
                if context
                    .current
                    .as_deref()
                    .is_some_and(|current| current.eq_ignore_ascii_case(value))
                {
                    PromptResponse::Keep
                } else {
                    PromptResponse::Value(value.clone())
                }
            }
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }
}

impl FormInteraction for TerminalInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        if let Some(help) = context.help {
            println!("  {}", help);
        }
        match context.kind {
            FieldKind::Choice(options) => self.prompt_choice(context, options),
            FieldKind::Boolean => {
                let options = vec!["Yes".to_string(), "No".to_string()];
                match self.prompt_choice(context, &options) {
                    PromptResponse::Value(choice) => {
                        PromptResponse::Value(choice.eq_ignore_ascii_case("yes").to_string())
                    }
                    other => other,
                }
            }
            FieldKind::Secret => self.prompt_secret(context),
            _ => self.prompt_text(context),
        }
    }

    fn confirm(&mut self, lines: &[String]) -> ConfirmationResponse {
        for line in lines {
            println!("  {}", line);
        }
        let items = ["Submit", "Go back", "Cancel"];
        match Select::with_theme(&self.theme)
            .with_prompt("Review the details above")
            .items(&items)
            .default(0)
            .interact_opt()
        {
            Ok(Some(0)) => ConfirmationResponse::Confirm,
            Ok(Some(1)) => ConfirmationResponse::Back,
            _ => ConfirmationResponse::Cancel,
        }
    }
}

fn interpret_text(value: &str, context: &PromptContext<'_>) -> PromptResponse {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case(BACK_COMMAND) {
        PromptResponse::Back
    } else if trimmed.eq_ignore_ascii_case(CANCEL_COMMAND) {
        PromptResponse::Cancel
    } else if context.current.as_deref() == Some(value) {
        PromptResponse::Keep
    } else {
        PromptResponse::Value(value.to_string())
    }
}
