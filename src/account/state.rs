use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::currency::Currency;
use crate::projection::TERM_OPTIONS;
use crate::wizard::validation::{parse_date, parse_flag};
use crate::wizard::{Field, FormState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientType {
    Individual,
    Organization,
}

impl ClientType {
    pub fn label(&self) -> &'static str {
        match self {
            ClientType::Individual => "Individual",
            ClientType::Organization => "Organization",
        }
    }

    pub fn options() -> Vec<String> {
        vec!["Individual".into(), "Organization".into()]
    }
}

impl FromStr for ClientType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "individual" | "person" | "1" => Ok(ClientType::Individual),
            "organization" | "organisation" | "company" | "2" => Ok(ClientType::Organization),
            _ => Err("Client type must be Individual or Organization".into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    Current,
    TermSavings,
}

impl AccountKind {
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Current => "Current account",
            AccountKind::TermSavings => "Term savings",
        }
    }

    pub fn options() -> Vec<String> {
        vec!["Current account".into(), "Term savings".into()]
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "current" | "current account" | "checking" | "1" => Ok(AccountKind::Current),
            "term" | "term savings" | "term_savings" | "savings" | "2" => {
                Ok(AccountKind::TermSavings)
            }
            _ => Err("Account type must be Current account or Term savings".into()),
        }
    }
}

/// How the opening deposit reaches the institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositMode {
    Cash,
    Check,
    WireTransfer,
}

impl DepositMode {
    pub const ALL: [DepositMode; 3] = [DepositMode::Cash, DepositMode::Check, DepositMode::WireTransfer];

    pub fn label(&self) -> &'static str {
        match self {
            DepositMode::Cash => "Cash",
            DepositMode::Check => "Check",
            DepositMode::WireTransfer => "Wire transfer",
        }
    }

    pub fn options() -> Vec<String> {
        Self::ALL.iter().map(|mode| mode.label().to_string()).collect()
    }
}

impl FromStr for DepositMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "cash" | "1" => Ok(DepositMode::Cash),
            "check" | "cheque" | "2" => Ok(DepositMode::Check),
            "wire transfer" | "wire_transfer" | "transfer" | "wire" | "3" => {
                Ok(DepositMode::WireTransfer)
            }
            _ => Err("Deposit method must be Cash, Check or Wire transfer".into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndividualIdentity {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub birth_date: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationIdentity {
    pub company_name: String,
    pub tax_id: String,
    pub registration_number: String,
    pub legal_rep_name: String,
    pub legal_rep_title: String,
    pub legal_rep_id_number: String,
    pub phone: String,
    pub email: String,
}

/// Exactly one identity shape exists at a time, selected by client type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIdentity {
    Individual(IndividualIdentity),
    Organization(OrganizationIdentity),
}

impl ClientIdentity {
    pub fn empty(client_type: ClientType) -> Self {
        match client_type {
            ClientType::Individual => ClientIdentity::Individual(IndividualIdentity::default()),
            ClientType::Organization => {
                ClientIdentity::Organization(OrganizationIdentity::default())
            }
        }
    }

    pub fn client_type(&self) -> ClientType {
        match self {
            ClientIdentity::Individual(_) => ClientType::Individual,
            ClientIdentity::Organization(_) => ClientType::Organization,
        }
    }

    pub fn phone(&self) -> &str {
        match self {
            ClientIdentity::Individual(person) => &person.phone,
            ClientIdentity::Organization(org) => &org.phone,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            ClientIdentity::Individual(person) => &person.email,
            ClientIdentity::Organization(org) => &org.email,
        }
    }

    pub fn tax_id(&self) -> &str {
        match self {
            ClientIdentity::Individual(_) => "",
            ClientIdentity::Organization(org) => &org.tax_id,
        }
    }

    pub fn national_id(&self) -> &str {
        match self {
            ClientIdentity::Individual(person) => &person.national_id,
            ClientIdentity::Organization(_) => "",
        }
    }

    /// The identifier the backend keys the customer on. One fallback chain
    /// for both shapes: tax ID, then national ID, then phone.
    pub fn governing_identifier(&self) -> Option<&str> {
        non_blank(self.tax_id())
            .or_else(|| non_blank(self.national_id()))
            .or_else(|| non_blank(self.phone()))
    }

    pub fn identifier_label(&self) -> &'static str {
        "tax ID, national ID or phone"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizedPerson {
    pub name: String,
    pub id_number: String,
    pub phone: String,
    pub relationship: String,
    pub signing_limit: String,
}

/// Everything the account-opening wizard collects, across all steps.
/// Amounts stay as typed; they become numbers only in the payload mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    pub client: ClientIdentity,
    pub address: String,
    pub city: String,
    pub department: String,
    pub country: String,
    pub occupation: String,
    pub employer: String,
    pub monthly_income: String,
    pub source_of_funds: String,
    pub has_authorized_person: bool,
    pub authorized_person: AuthorizedPerson,
    pub account_kind: AccountKind,
    pub currency: Currency,
    pub branch_id: String,
    pub principal_amount: String,
    pub deposit_mode: Option<DepositMode>,
    pub term_months: String,
    pub start_date: String,
    pub auto_renew: bool,
    pub has_overdraft: bool,
    pub overdraft_limit: String,
    pub minimum_balance: String,
    pub daily_withdrawal_limit: String,
    pub monthly_withdrawal_limit: String,
    pub daily_deposit_limit: String,
    pub maintenance_fee: String,
    pub checkbook_fee: String,
    pub pin: String,
    pub pin_confirmation: String,
    pub security_question: String,
    pub security_answer: String,
    user_edited: BTreeSet<Field>,
}

impl AccountState {
    pub fn new(currency: Currency, country: &str, start_date: NaiveDate) -> Self {
        Self {
            client: ClientIdentity::empty(ClientType::Individual),
            address: String::new(),
            city: String::new(),
            department: String::new(),
            country: country.to_string(),
            occupation: String::new(),
            employer: String::new(),
            monthly_income: String::new(),
            source_of_funds: String::new(),
            has_authorized_person: false,
            authorized_person: AuthorizedPerson::default(),
            account_kind: AccountKind::Current,
            currency,
            branch_id: String::new(),
            principal_amount: String::new(),
            deposit_mode: None,
            term_months: String::new(),
            start_date: start_date.to_string(),
            auto_renew: false,
            has_overdraft: false,
            overdraft_limit: String::new(),
            minimum_balance: String::new(),
            daily_withdrawal_limit: String::new(),
            monthly_withdrawal_limit: String::new(),
            daily_deposit_limit: String::new(),
            maintenance_fee: String::new(),
            checkbook_fee: String::new(),
            pin: String::new(),
            pin_confirmation: String::new(),
            security_question: String::new(),
            security_answer: String::new(),
            user_edited: BTreeSet::new(),
        }
    }

    pub fn client_type(&self) -> ClientType {
        self.client.client_type()
    }

    pub fn is_individual(&self) -> bool {
        self.client_type() == ClientType::Individual
    }

    pub fn is_organization(&self) -> bool {
        self.client_type() == ClientType::Organization
    }

    pub fn is_term_savings(&self) -> bool {
        self.account_kind == AccountKind::TermSavings
    }

    pub fn is_current(&self) -> bool {
        self.account_kind == AccountKind::Current
    }

    /// Whether the operator typed a value into this field during the session.
    /// Clearing a field hands it back to the currency defaults.
    pub fn is_user_edited(&self, field: Field) -> bool {
        self.user_edited.contains(&field)
    }

    /// Term in months, only when it is one of the offered options.
    pub fn term(&self) -> Option<u32> {
        self.term_months
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|term| TERM_OPTIONS.contains(term))
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_date(&self.start_date).ok()
    }

    /// Switches identity shape. Phone and email carry over; everything else
    /// belongs to the old shape and is dropped.
    pub fn set_client_type(&mut self, client_type: ClientType) {
        if self.client_type() == client_type {
            return;
        }
        let phone = self.client.phone().to_string();
        let email = self.client.email().to_string();
        self.client = match client_type {
            ClientType::Individual => ClientIdentity::Individual(IndividualIdentity {
                phone,
                email,
                ..IndividualIdentity::default()
            }),
            ClientType::Organization => ClientIdentity::Organization(OrganizationIdentity {
                phone,
                email,
                ..OrganizationIdentity::default()
            }),
        };
    }

    /// Mutable slot for a free-text field, if the field belongs to this form
    /// and to the current identity shape.
    fn text_slot(&mut self, field: Field) -> Result<&mut String, String> {
        let shape_error = |shape: &str| format!("{} only applies to {} clients", field.label(), shape);
        let slot = match field {
            Field::FirstName | Field::LastName | Field::NationalId | Field::BirthDate => {
                match &mut self.client {
                    ClientIdentity::Individual(person) => match field {
                        Field::FirstName => &mut person.first_name,
                        Field::LastName => &mut person.last_name,
                        Field::NationalId => &mut person.national_id,
                        _ => &mut person.birth_date,
                    },
                    ClientIdentity::Organization(_) => return Err(shape_error("individual")),
                }
            }
            Field::CompanyName
            | Field::TaxId
            | Field::RegistrationNumber
            | Field::LegalRepName
            | Field::LegalRepTitle
            | Field::LegalRepIdNumber => match &mut self.client {
                ClientIdentity::Organization(org) => match field {
                    Field::CompanyName => &mut org.company_name,
                    Field::TaxId => &mut org.tax_id,
                    Field::LegalRepName => &mut org.legal_rep_name,
                    Field::LegalRepTitle => &mut org.legal_rep_title,
                    Field::LegalRepIdNumber => &mut org.legal_rep_id_number,
                    _ => &mut org.registration_number,
                },
                ClientIdentity::Individual(_) => return Err(shape_error("organization")),
            },
            Field::Phone => match &mut self.client {
                ClientIdentity::Individual(person) => &mut person.phone,
                ClientIdentity::Organization(org) => &mut org.phone,
            },
            Field::Email => match &mut self.client {
                ClientIdentity::Individual(person) => &mut person.email,
                ClientIdentity::Organization(org) => &mut org.email,
            },
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
            Field::Department => &mut self.department,
            Field::Country => &mut self.country,
            Field::Occupation => &mut self.occupation,
            Field::Employer => &mut self.employer,
            Field::MonthlyIncome => &mut self.monthly_income,
            Field::SourceOfFunds => &mut self.source_of_funds,
            Field::AuthPersonName => &mut self.authorized_person.name,
            Field::AuthPersonIdNumber => &mut self.authorized_person.id_number,
            Field::AuthPersonPhone => &mut self.authorized_person.phone,
            Field::AuthPersonRelationship => &mut self.authorized_person.relationship,
            Field::AuthPersonSigningLimit => &mut self.authorized_person.signing_limit,
            Field::BranchId => &mut self.branch_id,
            Field::PrincipalAmount => &mut self.principal_amount,
            Field::TermMonths => &mut self.term_months,
            Field::StartDate => &mut self.start_date,
            Field::OverdraftLimit => &mut self.overdraft_limit,
            Field::MinimumBalance => &mut self.minimum_balance,
            Field::DailyWithdrawalLimit => &mut self.daily_withdrawal_limit,
            Field::MonthlyWithdrawalLimit => &mut self.monthly_withdrawal_limit,
            Field::DailyDepositLimit => &mut self.daily_deposit_limit,
            Field::MaintenanceFee => &mut self.maintenance_fee,
            Field::CheckbookFee => &mut self.checkbook_fee,
            Field::Pin => &mut self.pin,
            Field::PinConfirmation => &mut self.pin_confirmation,
            Field::SecurityQuestion => &mut self.security_question,
            Field::SecurityAnswer => &mut self.security_answer,
            other => return Err(format!("{} is not part of the account form", other.label())),
        };
        Ok(slot)
    }

    /// Writes a computed default without marking the field as user-edited.
    pub(crate) fn write_default(&mut self, field: Field, value: String) {
        if let Ok(slot) = self.text_slot(field) {
            *slot = value;
        }
    }
}

impl FormState for AccountState {
    fn raw(&self, field: Field) -> Option<String> {
        let individual = match &self.client {
            ClientIdentity::Individual(person) => Some(person),
            ClientIdentity::Organization(_) => None,
        };
        let organization = match &self.client {
            ClientIdentity::Organization(org) => Some(org),
            ClientIdentity::Individual(_) => None,
        };

        match field {
            Field::ClientType => Some(self.client_type().label().to_string()),
            Field::FirstName => individual.and_then(|p| present(&p.first_name)),
            Field::LastName => individual.and_then(|p| present(&p.last_name)),
            Field::NationalId => individual.and_then(|p| present(&p.national_id)),
            Field::BirthDate => individual.and_then(|p| present(&p.birth_date)),
            Field::CompanyName => organization.and_then(|o| present(&o.company_name)),
            Field::TaxId => organization.and_then(|o| present(&o.tax_id)),
            Field::RegistrationNumber => organization.and_then(|o| present(&o.registration_number)),
            Field::LegalRepName => organization.and_then(|o| present(&o.legal_rep_name)),
            Field::LegalRepTitle => organization.and_then(|o| present(&o.legal_rep_title)),
            Field::LegalRepIdNumber => organization.and_then(|o| present(&o.legal_rep_id_number)),
            Field::Phone => present(self.client.phone()),
            Field::Email => present(self.client.email()),
            Field::Address => present(&self.address),
            Field::City => present(&self.city),
            Field::Department => present(&self.department),
            Field::Country => present(&self.country),
            Field::Occupation => present(&self.occupation),
            Field::Employer => present(&self.employer),
            Field::MonthlyIncome => present(&self.monthly_income),
            Field::SourceOfFunds => present(&self.source_of_funds),
            Field::HasAuthorizedPerson => Some(self.has_authorized_person.to_string()),
            Field::AuthPersonName => present(&self.authorized_person.name),
            Field::AuthPersonIdNumber => present(&self.authorized_person.id_number),
            Field::AuthPersonPhone => present(&self.authorized_person.phone),
            Field::AuthPersonRelationship => present(&self.authorized_person.relationship),
            Field::AuthPersonSigningLimit => present(&self.authorized_person.signing_limit),
            Field::AccountKind => Some(self.account_kind.label().to_string()),
            Field::Currency => Some(self.currency.label().to_string()),
            Field::BranchId => present(&self.branch_id),
            Field::PrincipalAmount => present(&self.principal_amount),
            Field::DepositMode => self.deposit_mode.map(|mode| mode.label().to_string()),
            Field::TermMonths => present(&self.term_months),
            Field::StartDate => present(&self.start_date),
            Field::AutoRenew => Some(self.auto_renew.to_string()),
            Field::HasOverdraft => Some(self.has_overdraft.to_string()),
            Field::OverdraftLimit => present(&self.overdraft_limit),
            Field::MinimumBalance => present(&self.minimum_balance),
            Field::DailyWithdrawalLimit => present(&self.daily_withdrawal_limit),
            Field::MonthlyWithdrawalLimit => present(&self.monthly_withdrawal_limit),
            Field::DailyDepositLimit => present(&self.daily_deposit_limit),
            Field::MaintenanceFee => present(&self.maintenance_fee),
            Field::CheckbookFee => present(&self.checkbook_fee),
            Field::Pin => present(&self.pin),
            Field::PinConfirmation => present(&self.pin_confirmation),
            Field::SecurityQuestion => present(&self.security_question),
            Field::SecurityAnswer => present(&self.security_answer),
            _ => None,
        }
    }

    fn assign(&mut self, field: Field, raw: &str) -> Result<(), String> {
        match field {
            Field::ClientType => self.set_client_type(raw.parse()?),
            Field::HasAuthorizedPerson => self.has_authorized_person = parse_flag(raw)?,
            Field::HasOverdraft => self.has_overdraft = parse_flag(raw)?,
            Field::AutoRenew => self.auto_renew = parse_flag(raw)?,
            Field::AccountKind => self.account_kind = raw.parse()?,
            Field::Currency => self.currency = raw.parse()?,
            Field::DepositMode => {
                self.deposit_mode = match raw.trim() {
                    "" => None,
                    choice => Some(choice.parse()?),
                }
            }
            text_field => {
                *self.text_slot(text_field)? = raw.trim().to_string();
            }
        }
        if self.raw(field).is_some() {
            self.user_edited.insert(field);
        } else {
            self.user_edited.remove(&field);
        }
        Ok(())
    }
}

fn present(value: &str) -> Option<String> {
    non_blank(value).map(str::to_string)
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AccountState {
        AccountState::new(
            Currency::Htg,
            "Haiti",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    #[test]
    fn switching_client_type_swaps_identity_shape() {
        let mut state = state();
        state.assign(Field::FirstName, "Marie").unwrap();
        state.assign(Field::Phone, "+509 3700 0000").unwrap();
        state.assign(Field::ClientType, "Organization").unwrap();

        assert!(state.is_organization());
        assert_eq!(state.raw(Field::FirstName), None);
        assert_eq!(state.raw(Field::Phone).as_deref(), Some("+509 3700 0000"));
        let err = state.assign(Field::FirstName, "Marie").unwrap_err();
        assert_eq!(err, "First name only applies to individual clients");
    }

    #[test]
    fn governing_identifier_falls_back_to_phone() {
        let mut state = state();
        assert_eq!(state.client.governing_identifier(), None);
        state.assign(Field::Phone, "37001234").unwrap();
        assert_eq!(state.client.governing_identifier(), Some("37001234"));
        state.assign(Field::NationalId, "003-456-789").unwrap();
        assert_eq!(state.client.governing_identifier(), Some("003-456-789"));
    }

    #[test]
    fn organizations_use_the_same_identifier_chain() {
        let mut state = state();
        state.assign(Field::ClientType, "Organization").unwrap();
        state.assign(Field::Phone, "2811 0000").unwrap();
        assert_eq!(state.client.governing_identifier(), Some("2811 0000"));
        state.assign(Field::TaxId, "000-123-456-7").unwrap();
        assert_eq!(state.client.governing_identifier(), Some("000-123-456-7"));
    }

    #[test]
    fn pin_is_trimmed_like_other_text() {
        let mut state = state();
        state.assign(Field::Pin, " 4821").unwrap();
        state.assign(Field::PinConfirmation, "4821 ").unwrap();
        assert_eq!(state.pin, "4821");
        assert_eq!(state.pin_confirmation, "4821");
    }

    #[test]
    fn clearing_a_field_drops_the_edit_mark() {
        let mut state = state();
        state.assign(Field::MinimumBalance, "250").unwrap();
        assert!(state.is_user_edited(Field::MinimumBalance));
        state.assign(Field::MinimumBalance, "  ").unwrap();
        assert!(!state.is_user_edited(Field::MinimumBalance));
    }

    #[test]
    fn deposit_mode_parses_and_clears() {
        let mut state = state();
        state.assign(Field::DepositMode, "cheque").unwrap();
        assert_eq!(state.deposit_mode, Some(DepositMode::Check));
        assert_eq!(state.raw(Field::DepositMode).as_deref(), Some("Check"));
        assert!(state.assign(Field::DepositMode, "barter").is_err());
        state.assign(Field::DepositMode, "").unwrap();
        assert_eq!(state.deposit_mode, None);
    }

    #[test]
    fn flags_and_choices_are_parsed_on_assign() {
        let mut state = state();
        state.assign(Field::HasAuthorizedPerson, "yes").unwrap();
        assert!(state.has_authorized_person);
        assert!(state.assign(Field::HasOverdraft, "maybe").is_err());
        state.assign(Field::AccountKind, "Term savings").unwrap();
        assert!(state.is_term_savings());
        state.assign(Field::Currency, "usd").unwrap();
        assert_eq!(state.currency, Currency::Usd);
    }

    #[test]
    fn amounts_are_kept_as_typed() {
        let mut state = state();
        state.assign(Field::PrincipalAmount, " 10,000 ").unwrap();
        assert_eq!(state.principal_amount, "10,000");
        assert!(state.is_user_edited(Field::PrincipalAmount));
        assert!(!state.is_user_edited(Field::MinimumBalance));
    }

    #[test]
    fn admin_fields_are_rejected() {
        let mut state = state();
        assert!(state.assign(Field::HireDate, "2024-01-02").is_err());
        assert_eq!(state.raw(Field::HireDate), None);
    }
}
