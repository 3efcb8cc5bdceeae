use chrono::{Datelike, NaiveDate};

use crate::currency::{format_money, Currency};
use crate::projection::TERM_OPTIONS;
use crate::wizard::validation::{parse_date, parse_decimal};
use crate::wizard::{Check, Field, FieldKind, FieldRule, PinPolicy, StepDefinition};

use super::derived::minimum_deposit;
use super::state::{AccountKind, AccountState, ClientType, DepositMode};
use super::FlowOptions;

pub const SOURCES_OF_FUNDS: [&str; 5] = [
    "Salary",
    "Business income",
    "Remittances",
    "Savings",
    "Other",
];

/// The six steps of the account-opening wizard, in order.
pub fn account_steps(options: &FlowOptions) -> Vec<StepDefinition<AccountState>> {
    vec![
        client_step(options),
        contact_step(),
        financial_step(),
        authorized_person_step(),
        account_step(options),
        security_step(),
    ]
}

fn client_step(options: &FlowOptions) -> StepDefinition<AccountState> {
    let today = options.today;
    let minimum_age = options.minimum_age;

    StepDefinition::new(
        1,
        "Client",
        vec![
            FieldRule::new(
                Field::ClientType,
                FieldKind::Choice(ClientType::options()),
                Check::None,
            ),
            FieldRule::new(Field::FirstName, FieldKind::Text, Check::None)
                .when(AccountState::is_individual),
            FieldRule::new(Field::LastName, FieldKind::Text, Check::None)
                .when(AccountState::is_individual),
            FieldRule::new(Field::NationalId, FieldKind::Text, identifier_check())
                .with_optional()
                .when(AccountState::is_individual)
                .with_help("National ID (CIN/NIF). Leave blank to identify the client by phone."),
            FieldRule::new(
                Field::BirthDate,
                FieldKind::Date,
                Check::custom(move |_: &AccountState, input| {
                    check_birth_date(input, today, minimum_age)
                }),
            )
            .with_optional()
            .when(AccountState::is_individual)
            .with_help("YYYY-MM-DD"),
            FieldRule::new(Field::CompanyName, FieldKind::Text, Check::None)
                .when(AccountState::is_organization),
            FieldRule::new(Field::TaxId, FieldKind::Text, identifier_check())
                .when(AccountState::is_organization),
            FieldRule::new(Field::RegistrationNumber, FieldKind::Text, Check::None)
                .with_optional()
                .when(AccountState::is_organization),
            FieldRule::new(Field::LegalRepName, FieldKind::Text, Check::None)
                .when(AccountState::is_organization)
                .with_help("Person who signs for the organization."),
            FieldRule::new(Field::LegalRepTitle, FieldKind::Text, Check::None)
                .when(AccountState::is_organization),
            FieldRule::new(Field::LegalRepIdNumber, FieldKind::Text, identifier_check())
                .when(AccountState::is_organization),
            FieldRule::new(Field::Phone, FieldKind::Text, Check::Phone)
                .when(AccountState::is_organization),
            FieldRule::new(Field::Phone, FieldKind::Text, Check::Phone)
                .with_optional()
                .when(AccountState::is_individual),
            FieldRule::new(Field::Email, FieldKind::Text, Check::Email).with_optional(),
        ],
    )
    .with_check(|state| {
        (state.is_individual() && state.client.governing_identifier().is_none()).then(|| {
            (
                Field::NationalId,
                "Provide a national ID or a phone number".to_string(),
            )
        })
    })
}

fn contact_step() -> StepDefinition<AccountState> {
    StepDefinition::new(
        2,
        "Contact",
        vec![
            FieldRule::new(Field::Address, FieldKind::Text, Check::None),
            FieldRule::new(Field::City, FieldKind::Text, Check::None),
            FieldRule::new(Field::Department, FieldKind::Text, Check::None).with_optional(),
            FieldRule::new(Field::Country, FieldKind::Text, Check::None),
        ],
    )
}

fn financial_step() -> StepDefinition<AccountState> {
    let sources: Vec<String> = SOURCES_OF_FUNDS.iter().map(|s| s.to_string()).collect();
    StepDefinition::new(
        3,
        "Professional & financial",
        vec![
            FieldRule::new(Field::Occupation, FieldKind::Text, Check::None),
            FieldRule::new(Field::Employer, FieldKind::Text, Check::None).with_optional(),
            FieldRule::new(
                Field::MonthlyIncome,
                FieldKind::Decimal,
                Check::NonNegativeDecimal,
            )
            .with_optional(),
            FieldRule::new(
                Field::SourceOfFunds,
                FieldKind::Choice(sources.clone()),
                Check::OneOf(sources),
            ),
        ],
    )
}

fn has_authorized_person(state: &AccountState) -> bool {
    state.has_authorized_person
}

fn authorized_person_step() -> StepDefinition<AccountState> {
    StepDefinition::new(
        4,
        "Authorized person",
        vec![
            FieldRule::new(Field::HasAuthorizedPerson, FieldKind::Boolean, Check::None)
                .with_help("Someone else allowed to transact on this account."),
            FieldRule::new(Field::AuthPersonName, FieldKind::Text, Check::None)
                .when(has_authorized_person),
            FieldRule::new(Field::AuthPersonIdNumber, FieldKind::Text, identifier_check())
                .when(has_authorized_person),
            FieldRule::new(Field::AuthPersonRelationship, FieldKind::Text, Check::None)
                .when(has_authorized_person),
            FieldRule::new(Field::AuthPersonPhone, FieldKind::Text, Check::Phone)
                .with_optional()
                .when(has_authorized_person),
            FieldRule::new(
                Field::AuthPersonSigningLimit,
                FieldKind::Decimal,
                Check::PositiveDecimal,
            )
            .with_optional()
            .when(has_authorized_person)
            .with_help("Largest single transaction the authorized person may sign."),
        ],
    )
}

fn has_overdraft(state: &AccountState) -> bool {
    state.is_current() && state.has_overdraft
}

fn account_step(options: &FlowOptions) -> StepDefinition<AccountState> {
    let today = options.today;
    let branch_ids: Vec<u32> = options
        .branches
        .iter()
        .filter(|branch| branch.active)
        .map(|branch| branch.id)
        .collect();
    let terms: Vec<String> = TERM_OPTIONS.iter().map(u32::to_string).collect();
    let currencies: Vec<String> = Currency::ALL
        .iter()
        .map(|currency| currency.label().to_string())
        .collect();

    StepDefinition::new(
        5,
        "Account configuration",
        vec![
            FieldRule::new(
                Field::AccountKind,
                FieldKind::Choice(AccountKind::options()),
                Check::None,
            ),
            FieldRule::new(Field::Currency, FieldKind::Choice(currencies), Check::None),
            FieldRule::new(
                Field::BranchId,
                FieldKind::Integer,
                Check::custom(move |_: &AccountState, input| check_branch(input, &branch_ids)),
            ),
            FieldRule::new(
                Field::PrincipalAmount,
                FieldKind::Decimal,
                Check::custom(|state: &AccountState, input| check_principal(state, input)),
            ),
            FieldRule::new(
                Field::DepositMode,
                FieldKind::Choice(DepositMode::options()),
                Check::None,
            ),
            FieldRule::new(
                Field::TermMonths,
                FieldKind::Choice(terms.clone()),
                Check::OneOf(terms),
            )
            .when(AccountState::is_term_savings),
            FieldRule::new(
                Field::StartDate,
                FieldKind::Date,
                Check::custom(move |_: &AccountState, input| {
                    let date = parse_date(input)?;
                    if date < today {
                        Err(format!("Start date cannot be before {}", today.format("%Y-%m-%d")))
                    } else {
                        Ok(())
                    }
                }),
            )
            .when(AccountState::is_term_savings),
            FieldRule::new(Field::AutoRenew, FieldKind::Boolean, Check::None)
                .when(AccountState::is_term_savings)
                .with_help("Roll the deposit over for the same term at maturity."),
            FieldRule::new(Field::HasOverdraft, FieldKind::Boolean, Check::None)
                .when(AccountState::is_current),
            FieldRule::new(Field::OverdraftLimit, FieldKind::Decimal, Check::PositiveDecimal)
                .when(has_overdraft),
            FieldRule::new(
                Field::MinimumBalance,
                FieldKind::Decimal,
                Check::NonNegativeDecimal,
            )
            .with_optional(),
            FieldRule::new(
                Field::DailyWithdrawalLimit,
                FieldKind::Decimal,
                Check::NonNegativeDecimal,
            )
            .with_optional(),
            FieldRule::new(
                Field::MonthlyWithdrawalLimit,
                FieldKind::Decimal,
                Check::NonNegativeDecimal,
            )
            .with_optional(),
            FieldRule::new(
                Field::DailyDepositLimit,
                FieldKind::Decimal,
                Check::NonNegativeDecimal,
            )
            .with_optional()
            .when(AccountState::is_current),
            FieldRule::new(
                Field::MaintenanceFee,
                FieldKind::Decimal,
                Check::NonNegativeDecimal,
            )
            .with_optional(),
            FieldRule::new(Field::CheckbookFee, FieldKind::Decimal, Check::NonNegativeDecimal)
                .with_optional()
                .when(AccountState::is_current),
        ],
    )
    .with_check(|state| {
        let daily = parse_decimal(&state.daily_withdrawal_limit).ok()?;
        let monthly = parse_decimal(&state.monthly_withdrawal_limit).ok()?;
        (daily > monthly).then(|| {
            (
                Field::DailyWithdrawalLimit,
                "Daily limit cannot exceed the monthly limit".to_string(),
            )
        })
    })
}

fn has_security_question(state: &AccountState) -> bool {
    !state.security_question.trim().is_empty()
}

fn security_step() -> StepDefinition<AccountState> {
    StepDefinition::new(
        6,
        "Security",
        vec![
            FieldRule::new(Field::Pin, FieldKind::Secret, Check::Pin(PinPolicy::default()))
                .with_help("Four-digit PIN for teller-assisted transactions."),
            FieldRule::new(
                Field::PinConfirmation,
                FieldKind::Secret,
                Check::custom(|state: &AccountState, input| {
                    if input == state.pin {
                        Ok(())
                    } else {
                        Err("PIN confirmation does not match".into())
                    }
                }),
            ),
            FieldRule::new(Field::SecurityQuestion, FieldKind::Text, Check::None).with_optional(),
            FieldRule::new(Field::SecurityAnswer, FieldKind::Text, Check::None)
                .when(has_security_question),
        ],
    )
}

fn identifier_check() -> Check<AccountState> {
    Check::custom(|_: &AccountState, input| {
        let trimmed = input.trim();
        let significant = trimmed.chars().filter(char::is_ascii_alphanumeric).count();
        if !trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | ' ' | '/'))
        {
            Err("Identifiers may only contain letters, digits, dashes, and slashes".into())
        } else if !(6..=20).contains(&significant) {
            Err("Identifiers must contain between 6 and 20 letters or digits".into())
        } else {
            Ok(())
        }
    })
}

fn check_birth_date(input: &str, today: NaiveDate, minimum_age: u32) -> Result<(), String> {
    let born = parse_date(input)?;
    if born > today {
        return Err("Date of birth cannot be in the future".into());
    }
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    if age < minimum_age as i32 {
        Err(format!("Client must be at least {} years old", minimum_age))
    } else {
        Ok(())
    }
}

pub(crate) fn check_branch(input: &str, active: &[u32]) -> Result<(), String> {
    let id = input
        .trim()
        .parse::<u32>()
        .map_err(|_| "Enter the numeric branch ID".to_string())?;
    if id == 0 {
        return Err("Select a branch".into());
    }
    if !active.is_empty() && !active.contains(&id) {
        return Err(format!("Branch #{} is not an active branch", id));
    }
    Ok(())
}

fn check_principal(state: &AccountState, input: &str) -> Result<(), String> {
    let amount = parse_decimal(input)?;
    let minimum = minimum_deposit(state.currency, state.account_kind);
    if amount < minimum {
        Err(format!(
            "Minimum opening deposit for a {} in {} is {}",
            state.account_kind.label().to_lowercase(),
            state.currency.code(),
            format_money(minimum, state.currency)
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn steps_are_numbered_in_order() {
        let steps = account_steps(&FlowOptions::new(day(2024, 6, 1)));
        let numbers: Vec<usize> = steps.iter().map(|step| step.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn birth_date_enforces_minimum_age() {
        let today = day(2024, 6, 1);
        assert!(check_birth_date("2006-06-01", today, 18).is_ok());
        assert_eq!(
            check_birth_date("2006-06-02", today, 18).unwrap_err(),
            "Client must be at least 18 years old"
        );
        assert!(check_birth_date("2030-01-01", today, 18).is_err());
        assert!(check_birth_date("01/02/1990", today, 18).is_err());
    }

    #[test]
    fn branch_must_be_active_when_list_is_known() {
        assert!(check_branch("2", &[1, 2]).is_ok());
        assert!(check_branch("3", &[1, 2]).is_err());
        assert!(check_branch("3", &[]).is_ok());
        assert_eq!(check_branch("0", &[]).unwrap_err(), "Select a branch");
    }

    #[test]
    fn principal_below_minimum_names_the_threshold() {
        let mut state = AccountState::new(Currency::Htg, "Haiti", day(2024, 6, 1));
        assert_eq!(
            check_principal(&state, "4999").unwrap_err(),
            "Minimum opening deposit for a current account in HTG is 5,000.00 HTG"
        );
        assert!(check_principal(&state, "5000").is_ok());

        state.account_kind = AccountKind::TermSavings;
        assert_eq!(
            check_principal(&state, "999.99").unwrap_err(),
            "Minimum opening deposit for a term savings in HTG is 1,000.00 HTG"
        );
        assert!(check_principal(&state, "1000").is_ok());
    }
}
