#![allow(dead_code)]

use std::sync::Mutex;

use account_opening::{
    account::{AccountFlow, FlowOptions},
    config::ConfigManager,
    wizard::{Field, FormFlow, Wizard},
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a config manager backed by a unique directory.
pub fn config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn today() -> NaiveDate {
    day(2024, 6, 1)
}

pub fn account_wizard() -> Wizard<AccountFlow> {
    Wizard::new(AccountFlow::new(FlowOptions::new(today()))).expect("account flow has steps")
}

pub fn fill<F: FormFlow>(wizard: &mut Wizard<F>, entries: &[(Field, &str)]) {
    for (field, value) in entries {
        wizard
            .edit(*field, value)
            .unwrap_or_else(|err| panic!("editing {} failed: {}", field, err));
    }
}

pub fn fill_and_advance<F: FormFlow>(wizard: &mut Wizard<F>, entries: &[(Field, &str)]) {
    fill(wizard, entries);
    wizard
        .advance()
        .unwrap_or_else(|err| panic!("step {} blocked: {}", wizard.step(), err));
}

/// Completes steps 1 to 4 for an individual client without an authorized person.
pub fn individual_through_step_four(wizard: &mut Wizard<AccountFlow>) {
    fill_and_advance(
        wizard,
        &[
            (Field::FirstName, "Marie"),
            (Field::LastName, "Joseph"),
            (Field::NationalId, "001-234-567"),
        ],
    );
    fill_and_advance(
        wizard,
        &[(Field::Address, "12 Rue Capois"), (Field::City, "Port-au-Prince")],
    );
    fill_and_advance(
        wizard,
        &[(Field::Occupation, "Merchant"), (Field::SourceOfFunds, "Salary")],
    );
    fill_and_advance(wizard, &[(Field::HasAuthorizedPerson, "no")]);
}

/// Reaches the security step with a 7500 HTG current account at branch 1.
pub fn current_account_at_security(wizard: &mut Wizard<AccountFlow>) {
    individual_through_step_four(wizard);
    fill_and_advance(
        wizard,
        &[
            (Field::BranchId, "1"),
            (Field::PrincipalAmount, "7500"),
            (Field::DepositMode, "Cash"),
        ],
    );
}

/// Reaches the security step with a 12-month HTG term deposit of 10000.
pub fn term_deposit_at_security(wizard: &mut Wizard<AccountFlow>) {
    individual_through_step_four(wizard);
    fill_and_advance(
        wizard,
        &[
            (Field::AccountKind, "Term savings"),
            (Field::BranchId, "1"),
            (Field::PrincipalAmount, "10000"),
            (Field::DepositMode, "Wire transfer"),
            (Field::TermMonths, "12"),
        ],
    );
}

/// Enters a matching PIN on the security step.
pub fn with_pin(wizard: &mut Wizard<AccountFlow>) {
    fill(
        wizard,
        &[(Field::Pin, "4821"), (Field::PinConfirmation, "4821")],
    );
}
