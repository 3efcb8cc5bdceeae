mod common;

use account_opening::{
    currency::Currency,
    errors::ConfigurationError,
    projection::{add_months, compute_projection, compute_projection_with, InterestRateTable, TERM_OPTIONS},
    wizard::{Field, WizardEvent},
};
use common::{account_wizard, day};
use std::{cell::RefCell, rc::Rc};

#[test]
fn every_offered_term_has_a_rate_in_both_currencies() {
    let start = day(2024, 3, 10);
    for currency in Currency::ALL {
        for term in TERM_OPTIONS {
            let principal = 12_345.67;
            let projection = compute_projection(principal, currency, term, start)
                .unwrap_or_else(|err| panic!("{currency}/{term}: {err}"));
            assert!(projection.interest_rate > 0.0);
            assert_eq!(
                projection.total_at_maturity,
                principal + projection.projected_interest
            );
        }
    }
}

#[test]
fn reference_deposit_matches_the_product_sheet() {
    let projection = compute_projection(10_000.0, Currency::Htg, 12, day(2024, 6, 1)).unwrap();
    assert_eq!(projection.interest_rate, 8.5);
    assert_eq!(projection.projected_interest, 850.0);
    assert_eq!(projection.total_at_maturity, 10_850.0);
    assert_eq!(projection.maturity_date, day(2025, 6, 1));
}

#[test]
fn product_sheet_rates_for_every_term() {
    let expected = [
        (Currency::Htg, 3, 6.0, 150.0),
        (Currency::Htg, 6, 7.0, 350.0),
        (Currency::Htg, 12, 8.5, 850.0),
        (Currency::Htg, 24, 10.0, 2_000.0),
        (Currency::Htg, 36, 11.5, 3_450.0),
        (Currency::Usd, 3, 4.5, 112.5),
        (Currency::Usd, 6, 5.5, 275.0),
        (Currency::Usd, 12, 7.0, 700.0),
        (Currency::Usd, 24, 8.5, 1_700.0),
        (Currency::Usd, 36, 10.0, 3_000.0),
    ];
    for (currency, term, rate, interest) in expected {
        let projection = compute_projection(10_000.0, currency, term, day(2024, 6, 1)).unwrap();
        assert_eq!(projection.interest_rate, rate, "{currency}/{term}");
        assert_eq!(projection.projected_interest, interest, "{currency}/{term}");
    }
}

#[test]
fn usd_rates_are_lower_than_htg() {
    let table = InterestRateTable::standard();
    for term in TERM_OPTIONS {
        assert!(table.rate(Currency::Usd, term).unwrap() < table.rate(Currency::Htg, term).unwrap());
    }
}

#[test]
fn projection_is_idempotent() {
    let first = compute_projection(7_500.0, Currency::Usd, 24, day(2024, 8, 31)).unwrap();
    let second = compute_projection(7_500.0, Currency::Usd, 24, day(2024, 8, 31)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn month_end_dates_clamp() {
    assert_eq!(add_months(day(2024, 1, 31), 1).unwrap(), day(2024, 2, 29));
    assert_eq!(add_months(day(2023, 1, 31), 1).unwrap(), day(2023, 2, 28));
    assert_eq!(add_months(day(2024, 8, 31), 3).unwrap(), day(2024, 11, 30));
    assert_eq!(add_months(day(2024, 2, 29), 12).unwrap(), day(2025, 2, 28));
}

#[test]
fn interest_is_rounded_to_cents() {
    let projection = compute_projection(1_234.56, Currency::Usd, 6, day(2024, 1, 1)).unwrap();
    assert_eq!(projection.projected_interest, 33.95);
}

#[test]
fn missing_rate_is_a_configuration_error() {
    let table = InterestRateTable::from_entries([(Currency::Htg, 12, 8.5)]);
    let err = compute_projection_with(&table, 1_000.0, Currency::Usd, 12, day(2024, 1, 1))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::MissingRate {
            currency: Currency::Usd,
            term_months: 12
        }
    );
    assert!(compute_projection(1_000.0, Currency::Htg, 7, day(2024, 1, 1)).is_err());
}

#[test]
fn wizard_emits_projection_events_as_inputs_change() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut wizard = account_wizard();
    wizard.subscribe(move |event| {
        if matches!(
            event,
            WizardEvent::ProjectionUpdated(_) | WizardEvent::ProjectionCleared
        ) {
            sink.borrow_mut().push(event.clone());
        }
    });

    wizard.edit(Field::AccountKind, "Term savings").unwrap();
    wizard.edit(Field::PrincipalAmount, "10000").unwrap();
    wizard.edit(Field::TermMonths, "12").unwrap();
    wizard.edit(Field::PrincipalAmount, "ten thousand").unwrap();

    let events = events.borrow();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], WizardEvent::ProjectionCleared);
    assert_eq!(events[1], WizardEvent::ProjectionCleared);
    match &events[2] {
        WizardEvent::ProjectionUpdated(projection) => {
            assert_eq!(projection.total_at_maturity, 10_850.0)
        }
        other => panic!("Unexpected event: {:?}", other),
    }
    assert_eq!(events[3], WizardEvent::ProjectionCleared);
    assert_eq!(wizard.projection(), None);
}

#[test]
fn unrelated_edits_do_not_touch_the_projection() {
    let events = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&events);
    let mut wizard = account_wizard();
    wizard.subscribe(move |event| {
        if matches!(event, WizardEvent::ProjectionUpdated(_) | WizardEvent::ProjectionCleared) {
            *sink.borrow_mut() += 1;
        }
    });
    wizard.edit(Field::City, "Jacmel").unwrap();
    wizard.edit(Field::Occupation, "Teacher").unwrap();
    assert_eq!(*events.borrow(), 0);
}
