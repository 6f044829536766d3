//! Display-only currency conversion.
//!
//! Prices are stored in USD minor units; a session picks the currency used
//! when prices are rendered. Rates are fixed.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Sar,
    Egp,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Sar,
        Currency::Egp,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Sar => "SAR",
            Currency::Egp => "EGP",
        }
    }

    /// Units of this currency per one USD.
    pub fn rate(&self) -> Decimal {
        match self {
            Currency::Usd => Decimal::ONE,
            Currency::Eur => Decimal::new(92, 2),
            Currency::Gbp => Decimal::new(79, 2),
            Currency::Sar => Decimal::new(375, 2),
            Currency::Egp => Decimal::new(4850, 2),
        }
    }

    fn symbol(&self) -> Option<&'static str> {
        match self {
            Currency::Usd => Some("$"),
            Currency::Eur => Some("€"),
            Currency::Gbp => Some("£"),
            Currency::Sar | Currency::Egp => None,
        }
    }

    /// Convert a base-currency amount in minor units, rounded to two places.
    pub fn convert(&self, minor_units: i64) -> Decimal {
        (Decimal::new(minor_units, 2) * self.rate())
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn format(&self, minor_units: i64) -> String {
        let amount = self.convert(minor_units);
        match self.symbol() {
            Some(symbol) if amount.is_sign_negative() => format!("-{symbol}{:.2}", amount.abs()),
            Some(symbol) => format!("{symbol}{amount:.2}"),
            None => format!("{amount:.2} {}", self.code()),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|currency| currency.code() == wanted)
            .ok_or_else(|| format!("unsupported currency '{s}'"))
    }
}

pub fn format_price(minor_units: i64, currency: Currency) -> String {
    currency.format(minor_units)
}
