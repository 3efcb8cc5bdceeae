//! Declarative step definitions and the validators that gate each step.
//!
//! A step is an ordered list of [`FieldRule`]s. Each rule names a field, how
//! it is collected, whether it applies given the rest of the state, and which
//! [`Check`] its value must pass. Rules are evaluated against the state as it
//! is right now, so revisiting an earlier step can change what a later step
//! requires.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use super::field::Field;
use super::policy::{PasswordPolicy, PinPolicy};

/// Field-keyed validation failure. Carries every offending field of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field_errors: BTreeMap<Field, String>,
}

impl ValidationError {
    pub fn new(field_errors: BTreeMap<Field, String>) -> Self {
        Self { field_errors }
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut field_errors = BTreeMap::new();
        field_errors.insert(field, message.into());
        Self { field_errors }
    }

    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.field_errors.keys().copied()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .field_errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field.label(), message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of running one step's validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid { field_errors: BTreeMap<Field, String> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid { field_errors } => Err(ValidationError::new(field_errors)),
        }
    }
}

/// Read/write access a validator and controller need on a flow's state.
pub trait FormState {
    /// Current value rendered as text; `None` when empty or not applicable.
    fn raw(&self, field: Field) -> Option<String>;

    /// Stores user input for `field`. Text is stored trimmed (passwords are
    /// kept verbatim); flags and choices are parsed because the state can
    /// only hold valid variants.
    fn assign(&mut self, field: Field, raw: &str) -> Result<(), String>;
}

/// How the value is collected; drives prompt rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
    Boolean,
    Secret,
    Choice(Vec<String>),
}

type CustomCheck<S> = dyn Fn(&S, &str) -> Result<(), String> + Send + Sync;

/// Built-in value checks, run only when a value is present.
pub enum Check<S> {
    None,
    Decimal,
    NonNegativeDecimal,
    PositiveDecimal,
    PositiveInteger,
    Date,
    Email,
    Phone,
    Pin(PinPolicy),
    Password(PasswordPolicy),
    OneOf(Vec<String>),
    Custom(Arc<CustomCheck<S>>),
}

impl<S> Clone for Check<S> {
    fn clone(&self) -> Self {
        match self {
            Check::None => Check::None,
            Check::Decimal => Check::Decimal,
            Check::NonNegativeDecimal => Check::NonNegativeDecimal,
            Check::PositiveDecimal => Check::PositiveDecimal,
            Check::PositiveInteger => Check::PositiveInteger,
            Check::Date => Check::Date,
            Check::Email => Check::Email,
            Check::Phone => Check::Phone,
            Check::Pin(policy) => Check::Pin(*policy),
            Check::Password(policy) => Check::Password(*policy),
            Check::OneOf(options) => Check::OneOf(options.clone()),
            Check::Custom(func) => Check::Custom(Arc::clone(func)),
        }
    }
}

impl<S> Check<S> {
    pub fn custom(func: impl Fn(&S, &str) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Check::Custom(Arc::new(func))
    }

    fn run(&self, state: &S, input: &str) -> Result<(), String> {
        match self {
            Check::None => Ok(()),
            Check::Decimal => parse_decimal(input).map(|_| ()),
            Check::NonNegativeDecimal => parse_decimal(input).and_then(|value| {
                if value < 0.0 {
                    Err("Amount must be zero or positive".into())
                } else {
                    Ok(())
                }
            }),
            Check::PositiveDecimal => parse_decimal(input).and_then(|value| {
                if value > 0.0 {
                    Ok(())
                } else {
                    Err("Amount must be greater than zero".into())
                }
            }),
            Check::PositiveInteger => input
                .trim()
                .parse::<u32>()
                .map_err(|_| "Enter a whole number (1 or greater)".to_string())
                .and_then(|value| {
                    if value == 0 {
                        Err("Value must be at least 1".into())
                    } else {
                        Ok(())
                    }
                }),
            Check::Date => parse_date(input).map(|_| ()),
            Check::Email => check_email(input),
            Check::Phone => check_phone(input),
            Check::Pin(policy) => policy.check(input),
            Check::Password(policy) => policy.check(input),
            Check::OneOf(options) => {
                let normalized = input.trim().to_lowercase();
                if options
                    .iter()
                    .any(|candidate| candidate.to_lowercase() == normalized)
                {
                    Ok(())
                } else {
                    Err(format!("Value must be one of: {}", options.join(", ")))
                }
            }
            Check::Custom(func) => func(state, input),
        }
    }
}

/// Predicate deciding whether a field applies to the current state.
pub type Applies<S> = fn(&S) -> bool;

/// Declarative description of one field inside a step.
pub struct FieldRule<S> {
    pub field: Field,
    pub kind: FieldKind,
    pub required: bool,
    pub applies: Option<Applies<S>>,
    pub help: Option<&'static str>,
    pub check: Check<S>,
}

impl<S> Clone for FieldRule<S> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            kind: self.kind.clone(),
            required: self.required,
            applies: self.applies,
            help: self.help,
            check: self.check.clone(),
        }
    }
}

impl<S> FieldRule<S> {
    pub fn new(field: Field, kind: FieldKind, check: Check<S>) -> Self {
        Self {
            field,
            kind,
            required: true,
            applies: None,
            help: None,
            check,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Restricts the rule to states where `applies` holds; otherwise the
    /// field is neither prompted nor validated.
    pub fn when(mut self, applies: Applies<S>) -> Self {
        self.applies = Some(applies);
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn applies_to(&self, state: &S) -> bool {
        self.applies.map_or(true, |predicate| predicate(state))
    }
}

/// Cross-field rule reporting at most one offending field.
pub type StepCheck<S> = fn(&S) -> Option<(Field, String)>;

/// One page of a wizard.
pub struct StepDefinition<S> {
    pub number: usize,
    pub title: &'static str,
    pub rules: Vec<FieldRule<S>>,
    pub checks: Vec<StepCheck<S>>,
}

impl<S: FormState> StepDefinition<S> {
    pub fn new(number: usize, title: &'static str, rules: Vec<FieldRule<S>>) -> Self {
        Self {
            number,
            title,
            rules,
            checks: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: StepCheck<S>) -> Self {
        self.checks.push(check);
        self
    }

    /// Rules that apply to the given state, in prompt order.
    pub fn visible_rules<'a>(&'a self, state: &'a S) -> impl Iterator<Item = &'a FieldRule<S>> {
        self.rules.iter().filter(move |rule| rule.applies_to(state))
    }

    pub fn validate(&self, state: &S) -> ValidationResult {
        let mut field_errors = BTreeMap::new();

        for rule in self.visible_rules(state) {
            match state.raw(rule.field) {
                None if rule.required => {
                    field_errors.insert(rule.field, format!("{} is required", rule.field.label()));
                }
                None => {}
                Some(value) => {
                    if let Err(message) = rule.check.run(state, &value) {
                        field_errors.insert(rule.field, message);
                    }
                }
            }
        }

        for check in &self.checks {
            if let Some((field, message)) = check(state) {
                field_errors.entry(field).or_insert(message);
            }
        }

        if field_errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { field_errors }
        }
    }
}

pub fn parse_decimal(input: &str) -> Result<f64, String> {
    let cleaned: String = input.trim().chars().filter(|ch| *ch != ',').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| "Enter a numeric amount".to_string())
}

pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| "Use YYYY-MM-DD format".to_string())
}

pub fn parse_flag(input: &str) -> Result<bool, String> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        _ => Err("Enter yes/no, true/false, or 1/0".into()),
    }
}

fn check_email(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    let invalid = || Err("Enter a valid email address (name@example.com)".to_string());
    if trimmed.chars().any(char::is_whitespace) {
        return invalid();
    }
    let Some((local, domain)) = trimmed.split_once('@') else {
        return invalid();
    };
    if local.is_empty() || domain.contains('@') {
        return invalid();
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && tld.len() >= 2 => Ok(()),
        _ => invalid(),
    }
}

fn check_phone(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if !body
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, ' ' | '-' | '(' | ')'))
    {
        return Err("Phone may only contain digits, spaces, dashes, and a leading +".into());
    }
    let digits = body.chars().filter(char::is_ascii_digit).count();
    if (8..=15).contains(&digits) {
        Ok(())
    } else {
        Err("Phone must contain between 8 and 15 digits".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        name: String,
        amount: String,
        notify: bool,
        email: String,
    }

    impl FormState for Sample {
        fn raw(&self, field: Field) -> Option<String> {
            let value = match field {
                Field::FirstName => self.name.clone(),
                Field::PrincipalAmount => self.amount.clone(),
                Field::Email => self.email.clone(),
                Field::HasAuthorizedPerson => self.notify.to_string(),
                _ => String::new(),
            };
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }

        fn assign(&mut self, field: Field, raw: &str) -> Result<(), String> {
            match field {
                Field::FirstName => self.name = raw.into(),
                Field::PrincipalAmount => self.amount = raw.into(),
                Field::Email => self.email = raw.into(),
                _ => return Err("unsupported".into()),
            }
            Ok(())
        }
    }

    fn step() -> StepDefinition<Sample> {
        StepDefinition::new(
            1,
            "Sample",
            vec![
                FieldRule::new(Field::FirstName, FieldKind::Text, Check::None),
                FieldRule::new(Field::PrincipalAmount, FieldKind::Decimal, Check::PositiveDecimal)
                    .with_optional(),
                FieldRule::new(Field::Email, FieldKind::Text, Check::Email)
                    .when(|state: &Sample| state.notify),
            ],
        )
    }

    #[test]
    fn empty_optional_fields_are_valid() {
        let state = Sample {
            name: "Rose".into(),
            ..Sample::default()
        };
        assert!(step().validate(&state).is_valid());
    }

    #[test]
    fn required_field_reports_label() {
        let err = step().validate(&Sample::default()).into_result().unwrap_err();
        assert_eq!(err.message_for(Field::FirstName), Some("First name is required"));
    }

    #[test]
    fn conditional_field_follows_current_state() {
        let mut state = Sample {
            name: "Rose".into(),
            ..Sample::default()
        };
        assert!(step().validate(&state).is_valid());
        state.notify = true;
        let err = step().validate(&state).into_result().unwrap_err();
        assert!(err.message_for(Field::Email).is_some());
        state.email = "rose@example.ht".into();
        assert!(step().validate(&state).is_valid());
    }

    #[test]
    fn numeric_checks_reject_garbage_and_negatives() {
        let state = Sample {
            name: "Rose".into(),
            amount: "-5".into(),
            ..Sample::default()
        };
        let err = step().validate(&state).into_result().unwrap_err();
        assert_eq!(
            err.message_for(Field::PrincipalAmount),
            Some("Amount must be greater than zero")
        );
        assert_eq!(parse_decimal("10,000.50").unwrap(), 10000.5);
        assert!(parse_decimal("ten").is_err());
    }

    #[test]
    fn email_and_phone_shapes() {
        let state = Sample::default();
        assert!(Check::Email.run(&state, "a@b.co").is_ok());
        assert!(Check::Email.run(&state, "a@b").is_err());
        assert!(Check::Email.run(&state, "a b@c.com").is_err());
        assert!(Check::Phone.run(&state, "+509 3712-4455").is_ok());
        assert!(Check::Phone.run(&state, "12345").is_err());
        assert!(Check::Phone.run(&state, "509-CALL-NOW").is_err());
    }
}
