use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{LedgerError, Money};

/// Currency of a recorded amount.
///
/// The ledger is home to a single base currency (`PEN`); the only alternate
/// currency in use is `USD`. Foreign amounts are never stored as the
/// authoritative value: they are converted into base cents through
/// [`normalize`] and the original amount plus the exchange rate are kept for
/// traceability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Pen,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Pen => "PEN",
            Currency::Usd => "USD",
        }
    }

    /// Returns `true` for the ledger's home currency.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Currency::Pen)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PEN" => Ok(Currency::Pen),
            "USD" => Ok(Currency::Usd),
            other => Err(LedgerError::Validation(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

/// Converts an amount into base-currency cents.
///
/// Contract:
/// - base currency: the amount is rounded half-up to 2 fraction digits.
/// - foreign currency: `rate` is mandatory and must be `> 0`, otherwise the
///   call fails with [`LedgerError::InvalidExchangeRate`]; the result is
///   `round(amount × rate, 2)`.
///
/// Every expense write passes through this single boundary so the stored
/// base amount can never drift from the retained original amount.
pub fn normalize(
    amount: Decimal,
    currency: Currency,
    rate: Option<Decimal>,
) -> Result<Money, LedgerError> {
    if currency.is_base() {
        return Money::from_decimal(amount);
    }

    let rate = rate.ok_or(LedgerError::InvalidExchangeRate)?;
    if rate <= Decimal::ZERO {
        return Err(LedgerError::InvalidExchangeRate);
    }
    Money::from_decimal(amount * rate)
}
