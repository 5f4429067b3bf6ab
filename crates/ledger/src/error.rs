//! The module contains the errors the ledger core can raise.
//!
//! Validation and state-machine errors are raised before anything is written;
//! [`Database`] wraps a failed call to the persistence layer and is propagated
//! unchanged so the caller decides whether to retry.
//!
//! [`Database`]: LedgerError::Database

use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("entry direction is required")]
    MissingDirection,
    #[error("a cash box with this name already exists for the period")]
    DuplicateCashBox,
    #[error("cash box is not open")]
    CashBoxClosed,
    #[error("closed cash boxes cannot be deleted")]
    CashBoxLocked,
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),
    #[error("exchange rate must be > 0 for foreign currency amounts")]
    InvalidExchangeRate,
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::MissingDirection, Self::MissingDirection) => true,
            (Self::DuplicateCashBox, Self::DuplicateCashBox) => true,
            (Self::CashBoxClosed, Self::CashBoxClosed) => true,
            (Self::CashBoxLocked, Self::CashBoxLocked) => true,
            (Self::InvalidStateTransition(a), Self::InvalidStateTransition(b)) => a == b,
            (Self::InvalidExchangeRate, Self::InvalidExchangeRate) => true,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
