//! Maps the finished account wizard into the backend's request shape.

use chrono::NaiveDate;
use serde::Serialize;

use crate::currency::Currency;
use crate::errors::WizardError;
use crate::projection::DerivedProjection;
use crate::wizard::validation::{parse_date, parse_decimal};
use crate::wizard::{Field, ValidationError};

use super::state::{AccountKind, AccountState, ClientIdentity, DepositMode};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub customer_id: String,
    pub customer: CustomerPayload,
    pub profile: ProfilePayload,
    pub account_type: AccountKind,
    pub currency: Currency,
    pub initial_deposit: f64,
    pub branch_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_mode: Option<DepositMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_interest: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_at_maturity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overdraft_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_withdrawal_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_withdrawal_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_deposit_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkbook_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_answer: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authorized_signers: Vec<AuthorizedSignerPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "clientType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerPayload {
    Individual(IndividualPayload),
    Organization(OrganizationPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualPayload {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPayload {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    pub legal_representative: LegalRepresentativePayload,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalRepresentativePayload {
    pub full_name: String,
    pub title: String,
    pub id_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub country: String,
    pub occupation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<f64>,
    pub source_of_funds: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedSignerPayload {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_limit: Option<f64>,
}

/// Builds the request body. Re-checks the governing identifier and branch on
/// its own, independent of the step validators, and coerces numeric text.
pub fn build_payload(
    state: &AccountState,
    projection: Option<&DerivedProjection>,
) -> Result<SubmissionPayload, WizardError> {
    let customer_id = state
        .client
        .governing_identifier()
        .ok_or(WizardError::MissingIdentifier(state.client.identifier_label()))?
        .to_string();
    let branch_id = branch_id(&state.branch_id)?;

    let initial_deposit = optional_amount(Field::PrincipalAmount, &state.principal_amount)?
        .ok_or_else(|| ValidationError::single(Field::PrincipalAmount, "Initial deposit is required"))?;

    let (term_months, start_date, auto_renew, projection) = if state.is_term_savings() {
        let projection = projection.ok_or_else(|| {
            ValidationError::single(
                Field::TermMonths,
                "Term and start date are required for term savings",
            )
        })?;
        (state.term(), state.start(), Some(state.auto_renew), Some(projection))
    } else {
        (None, None, None, None)
    };

    let overdraft_limit = if state.is_current() && state.has_overdraft {
        optional_amount(Field::OverdraftLimit, &state.overdraft_limit)?
    } else {
        None
    };
    let (daily_deposit_limit, checkbook_fee) = if state.is_current() {
        (
            optional_amount(Field::DailyDepositLimit, &state.daily_deposit_limit)?,
            optional_amount(Field::CheckbookFee, &state.checkbook_fee)?,
        )
    } else {
        (None, None)
    };

    let security_question = text(&state.security_question);
    let security_answer = security_question
        .as_ref()
        .and_then(|_| text(&state.security_answer));

    Ok(SubmissionPayload {
        customer_id,
        customer: customer(&state.client)?,
        profile: profile(state)?,
        account_type: state.account_kind,
        currency: state.currency,
        initial_deposit,
        branch_id,
        deposit_mode: state.deposit_mode,
        term_months,
        start_date,
        interest_rate: projection.map(|p| p.interest_rate),
        projected_interest: projection.map(|p| p.projected_interest),
        total_at_maturity: projection.map(|p| p.total_at_maturity),
        maturity_date: projection.map(|p| p.maturity_date),
        auto_renew,
        overdraft_limit,
        minimum_balance: optional_amount(Field::MinimumBalance, &state.minimum_balance)?,
        daily_withdrawal_limit: optional_amount(
            Field::DailyWithdrawalLimit,
            &state.daily_withdrawal_limit,
        )?,
        monthly_withdrawal_limit: optional_amount(
            Field::MonthlyWithdrawalLimit,
            &state.monthly_withdrawal_limit,
        )?,
        daily_deposit_limit,
        maintenance_fee: optional_amount(Field::MaintenanceFee, &state.maintenance_fee)?,
        checkbook_fee,
        pin: text(&state.pin),
        security_question,
        security_answer,
        authorized_signers: authorized_signers(state)?,
    })
}

fn branch_id(raw: &str) -> Result<u32, WizardError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WizardError::MissingBranch);
    }
    let id = trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::single(Field::BranchId, "Enter the numeric branch ID"))?;
    if id == 0 {
        Err(WizardError::MissingBranch)
    } else {
        Ok(id)
    }
}

fn customer(identity: &ClientIdentity) -> Result<CustomerPayload, WizardError> {
    Ok(match identity {
        ClientIdentity::Individual(person) => CustomerPayload::Individual(IndividualPayload {
            first_name: person.first_name.trim().to_string(),
            last_name: person.last_name.trim().to_string(),
            national_id: text(&person.national_id),
            birth_date: optional_date(Field::BirthDate, &person.birth_date)?,
            phone: text(&person.phone),
            email: text(&person.email),
        }),
        ClientIdentity::Organization(org) => CustomerPayload::Organization(OrganizationPayload {
            company_name: org.company_name.trim().to_string(),
            tax_id: text(&org.tax_id),
            registration_number: text(&org.registration_number),
            legal_representative: LegalRepresentativePayload {
                full_name: org.legal_rep_name.trim().to_string(),
                title: org.legal_rep_title.trim().to_string(),
                id_number: org.legal_rep_id_number.trim().to_string(),
            },
            phone: org.phone.trim().to_string(),
            email: text(&org.email),
        }),
    })
}

fn profile(state: &AccountState) -> Result<ProfilePayload, WizardError> {
    Ok(ProfilePayload {
        address: state.address.trim().to_string(),
        city: state.city.trim().to_string(),
        department: text(&state.department),
        country: state.country.trim().to_string(),
        occupation: state.occupation.trim().to_string(),
        employer: text(&state.employer),
        monthly_income: optional_amount(Field::MonthlyIncome, &state.monthly_income)?,
        source_of_funds: state.source_of_funds.trim().to_string(),
    })
}

/// The signer list exists only when the flag is set and the signer is named.
fn authorized_signers(state: &AccountState) -> Result<Vec<AuthorizedSignerPayload>, WizardError> {
    let person = &state.authorized_person;
    let Some(full_name) = text(&person.name).filter(|_| state.has_authorized_person) else {
        return Ok(Vec::new());
    };
    Ok(vec![AuthorizedSignerPayload {
        full_name,
        id_number: text(&person.id_number),
        relationship: text(&person.relationship),
        phone: text(&person.phone),
        signing_limit: optional_amount(Field::AuthPersonSigningLimit, &person.signing_limit)?,
    }])
}

fn text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn optional_amount(field: Field, raw: &str) -> Result<Option<f64>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_decimal(raw)
        .map(Some)
        .map_err(|message| ValidationError::single(field, message))
}

fn optional_date(field: Field, raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_date(raw)
        .map(Some)
        .map_err(|message| ValidationError::single(field, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::FormState;

    fn ready_state() -> AccountState {
        let mut state = AccountState::new(
            Currency::Htg,
            "Haiti",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        for (field, value) in [
            (Field::FirstName, "Marie"),
            (Field::LastName, "Joseph"),
            (Field::NationalId, "001-234-567"),
            (Field::Address, "12 Rue Capois"),
            (Field::City, "Port-au-Prince"),
            (Field::Occupation, "Merchant"),
            (Field::SourceOfFunds, "Business income"),
            (Field::BranchId, "1"),
            (Field::PrincipalAmount, "7,500"),
        ] {
            state.assign(field, value).unwrap();
        }
        state
    }

    #[test]
    fn empty_optionals_are_omitted_from_json() {
        let payload = build_payload(&ready_state(), None).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["initialDeposit"], 7500.0);
        assert_eq!(json["customer"]["clientType"], "INDIVIDUAL");
        assert_eq!(json["accountType"], "CURRENT");
        assert!(json.get("pin").is_none());
        assert!(json.get("termMonths").is_none());
        assert!(json.get("autoRenew").is_none());
        assert!(json.get("depositMode").is_none());
        assert!(json.get("authorizedSigners").is_none());
        assert!(json["customer"].get("email").is_none());
        assert!(json["profile"].get("employer").is_none());
    }

    #[test]
    fn bad_number_is_reported_on_its_field() {
        let mut state = ready_state();
        state.assign(Field::MaintenanceFee, "free").unwrap();
        match build_payload(&state, None) {
            Err(WizardError::Validation(err)) => {
                assert!(err.message_for(Field::MaintenanceFee).is_some())
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn term_savings_without_projection_is_rejected() {
        let mut state = ready_state();
        state.assign(Field::AccountKind, "Term savings").unwrap();
        assert!(matches!(
            build_payload(&state, None),
            Err(WizardError::Validation(_))
        ));
    }

    #[test]
    fn current_only_fees_are_dropped_for_term_savings() {
        let mut state = ready_state();
        state.assign(Field::CheckbookFee, "500").unwrap();
        state.assign(Field::DailyDepositLimit, "20000").unwrap();
        let payload = build_payload(&state, None).unwrap();
        assert_eq!(payload.checkbook_fee, Some(500.0));
        assert_eq!(payload.daily_deposit_limit, Some(20_000.0));
        assert_eq!(payload.auto_renew, None);

        state.assign(Field::AccountKind, "Term savings").unwrap();
        state.assign(Field::TermMonths, "6").unwrap();
        state.assign(Field::AutoRenew, "yes").unwrap();
        let projection = crate::account::projection_for(&state).unwrap();
        let payload = build_payload(&state, projection.as_ref()).unwrap();
        assert_eq!(payload.checkbook_fee, None);
        assert_eq!(payload.daily_deposit_limit, None);
        assert_eq!(payload.auto_renew, Some(true));
    }

    #[test]
    fn security_answer_requires_a_question() {
        let mut state = ready_state();
        state.assign(Field::SecurityAnswer, "Blue").unwrap();
        let payload = build_payload(&state, None).unwrap();
        assert_eq!(payload.security_answer, None);
    }
}
