use std::fmt;

use serde::Serialize;

/// Every field a wizard can collect. Flows use a subset each; error maps are
/// keyed by this enum so a misspelled field name cannot compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    // Client identity
    ClientType,
    FirstName,
    LastName,
    NationalId,
    BirthDate,
    CompanyName,
    TaxId,
    RegistrationNumber,
    LegalRepName,
    LegalRepTitle,
    LegalRepIdNumber,
    Phone,
    Email,
    // Contact
    Address,
    City,
    Department,
    Country,
    // Professional and financial
    Occupation,
    Employer,
    MonthlyIncome,
    SourceOfFunds,
    // Authorized person
    HasAuthorizedPerson,
    AuthPersonName,
    AuthPersonIdNumber,
    AuthPersonPhone,
    AuthPersonRelationship,
    AuthPersonSigningLimit,
    // Account configuration
    AccountKind,
    Currency,
    BranchId,
    PrincipalAmount,
    DepositMode,
    TermMonths,
    StartDate,
    AutoRenew,
    HasOverdraft,
    OverdraftLimit,
    MinimumBalance,
    DailyWithdrawalLimit,
    MonthlyWithdrawalLimit,
    DailyDepositLimit,
    MaintenanceFee,
    CheckbookFee,
    // Security
    Pin,
    PinConfirmation,
    SecurityQuestion,
    SecurityAnswer,
    // Administrator
    AdminType,
    FullName,
    HireDate,
    AssignedBranches,
    Password,
    PasswordConfirmation,
}

impl Field {
    /// Wire-facing identifier, matching the backend's camelCase naming.
    pub fn key(&self) -> &'static str {
        match self {
            Field::ClientType => "clientType",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::NationalId => "nationalId",
            Field::BirthDate => "birthDate",
            Field::CompanyName => "companyName",
            Field::TaxId => "taxId",
            Field::RegistrationNumber => "registrationNumber",
            Field::LegalRepName => "legalRepName",
            Field::LegalRepTitle => "legalRepTitle",
            Field::LegalRepIdNumber => "legalRepIdNumber",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Address => "address",
            Field::City => "city",
            Field::Department => "department",
            Field::Country => "country",
            Field::Occupation => "occupation",
            Field::Employer => "employer",
            Field::MonthlyIncome => "monthlyIncome",
            Field::SourceOfFunds => "sourceOfFunds",
            Field::HasAuthorizedPerson => "hasAuthorizedPerson",
            Field::AuthPersonName => "authPersonName",
            Field::AuthPersonIdNumber => "authPersonIdNumber",
            Field::AuthPersonPhone => "authPersonPhone",
            Field::AuthPersonRelationship => "authPersonRelationship",
            Field::AuthPersonSigningLimit => "authPersonSigningLimit",
            Field::AccountKind => "accountKind",
            Field::Currency => "currency",
            Field::BranchId => "branchId",
            Field::PrincipalAmount => "principalAmount",
            Field::DepositMode => "depositMode",
            Field::TermMonths => "termMonths",
            Field::StartDate => "startDate",
            Field::AutoRenew => "autoRenew",
            Field::HasOverdraft => "hasOverdraft",
            Field::OverdraftLimit => "overdraftLimit",
            Field::MinimumBalance => "minimumBalance",
            Field::DailyWithdrawalLimit => "dailyWithdrawalLimit",
            Field::MonthlyWithdrawalLimit => "monthlyWithdrawalLimit",
            Field::DailyDepositLimit => "dailyDepositLimit",
            Field::MaintenanceFee => "maintenanceFee",
            Field::CheckbookFee => "checkbookFee",
            Field::Pin => "pin",
            Field::PinConfirmation => "pinConfirmation",
            Field::SecurityQuestion => "securityQuestion",
            Field::SecurityAnswer => "securityAnswer",
            Field::AdminType => "adminType",
            Field::FullName => "fullName",
            Field::HireDate => "hireDate",
            Field::AssignedBranches => "assignedBranches",
            Field::Password => "password",
            Field::PasswordConfirmation => "passwordConfirmation",
        }
    }

    /// Human label used in prompts and error summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Field::ClientType => "Client type",
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::NationalId => "National ID",
            Field::BirthDate => "Date of birth",
            Field::CompanyName => "Company name",
            Field::TaxId => "Tax ID",
            Field::RegistrationNumber => "Registration number",
            Field::LegalRepName => "Legal representative",
            Field::LegalRepTitle => "Representative title",
            Field::LegalRepIdNumber => "Representative ID",
            Field::Phone => "Phone",
            Field::Email => "Email",
            Field::Address => "Address",
            Field::City => "City",
            Field::Department => "Department",
            Field::Country => "Country",
            Field::Occupation => "Occupation",
            Field::Employer => "Employer",
            Field::MonthlyIncome => "Monthly income",
            Field::SourceOfFunds => "Source of funds",
            Field::HasAuthorizedPerson => "Authorized person",
            Field::AuthPersonName => "Authorized person name",
            Field::AuthPersonIdNumber => "Authorized person ID",
            Field::AuthPersonPhone => "Authorized person phone",
            Field::AuthPersonRelationship => "Relationship",
            Field::AuthPersonSigningLimit => "Signing limit",
            Field::AccountKind => "Account type",
            Field::Currency => "Currency",
            Field::BranchId => "Branch",
            Field::PrincipalAmount => "Initial deposit",
            Field::DepositMode => "Deposit method",
            Field::TermMonths => "Term (months)",
            Field::StartDate => "Start date",
            Field::AutoRenew => "Automatic renewal",
            Field::HasOverdraft => "Overdraft",
            Field::OverdraftLimit => "Overdraft limit",
            Field::MinimumBalance => "Minimum balance",
            Field::DailyWithdrawalLimit => "Daily withdrawal limit",
            Field::MonthlyWithdrawalLimit => "Monthly withdrawal limit",
            Field::DailyDepositLimit => "Daily deposit limit",
            Field::MaintenanceFee => "Maintenance fee",
            Field::CheckbookFee => "Checkbook fee",
            Field::Pin => "PIN",
            Field::PinConfirmation => "Confirm PIN",
            Field::SecurityQuestion => "Security question",
            Field::SecurityAnswer => "Security answer",
            Field::AdminType => "Administrator type",
            Field::FullName => "Full name",
            Field::HireDate => "Hire date",
            Field::AssignedBranches => "Assigned branches",
            Field::Password => "Password",
            Field::PasswordConfirmation => "Confirm password",
        }
    }

    /// Secrets are masked in summaries and prompted without echo.
    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            Field::Pin | Field::PinConfirmation | Field::Password | Field::PasswordConfirmation
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
