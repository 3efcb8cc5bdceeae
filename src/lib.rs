#![doc(test(attr(deny(warnings))))]

//! Account Opening provides the stateful core of a microfinance console's
//! onboarding wizards: step navigation, conditional cross-step validation,
//! term-deposit projections, and mapping of the collected answers into the
//! backend's request payloads.

pub mod account;
pub mod admin;
pub mod api;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod projection;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Account opening tracing initialized.");
    });
}
