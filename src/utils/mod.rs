use std::env;
use std::path::PathBuf;
use std::sync::Once;

use chrono::{DateTime, NaiveDate, Utc};
use dirs::home_dir;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIR_NAME: &str = ".account_opening";
const HOME_ENV: &str = "ACCOUNT_OPENING_HOME";

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env();
        let filter = match "account_opening=info".parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        };

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Returns the application data directory, defaulting to `~/.account_opening`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Clock abstracts access to the current date so flows stay deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single calendar day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let midnight = self.0.and_hms_opt(0, 0, 0).unwrap_or_default();
        DateTime::from_naive_utc_and_offset(midnight, Utc)
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_pinned_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let clock = FixedClock(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date_naive(), day);
    }
}
