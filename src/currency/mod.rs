use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Currencies an account can be opened in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Currency {
    #[serde(rename = "HTG")]
    Htg,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Htg, Currency::Usd];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Htg => "HTG",
            Currency::Usd => "USD",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Htg => "HTG (Gourde)",
            Currency::Usd => "USD (US Dollar)",
        }
    }

    /// Fixed per-currency defaults for the account limit fields.
    pub fn defaults(&self) -> CurrencyDefaults {
        match self {
            Currency::Htg => CurrencyDefaults {
                minimum_balance: 5_000.0,
                daily_withdrawal_limit: 50_000.0,
                monthly_withdrawal_limit: 500_000.0,
                maintenance_fee: 100.0,
                checkbook_fee: 500.0,
            },
            Currency::Usd => CurrencyDefaults {
                minimum_balance: 50.0,
                daily_withdrawal_limit: 500.0,
                monthly_withdrawal_limit: 5_000.0,
                maintenance_fee: 5.0,
                checkbook_fee: 25.0,
            },
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Htg
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "HTG" | "GOURDE" | "HTG (GOURDE)" => Ok(Currency::Htg),
            "USD" | "DOLLAR" | "USD (US DOLLAR)" => Ok(Currency::Usd),
            _ => Err(format!("Unsupported currency `{}` (use HTG or USD)", value.trim())),
        }
    }
}

/// Limit fields pre-filled whenever the currency changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyDefaults {
    pub minimum_balance: f64,
    pub daily_withdrawal_limit: f64,
    pub monthly_withdrawal_limit: f64,
    pub maintenance_fee: f64,
    pub checkbook_fee: f64,
}

/// Renders an amount with thousands grouping and the currency code suffix.
pub fn format_money(value: f64, currency: Currency) -> String {
    format!("{} {}", format_grouped(value), currency.code())
}

/// Renders amounts the way operators type them: no decimals for whole values.
pub fn format_amount(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Two decimals with thousands grouping, no currency code.
pub fn format_grouped(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let mut grouped = String::new();
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
