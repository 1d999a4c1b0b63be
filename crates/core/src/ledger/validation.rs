//! Posting validation rules.
//!
//! Pure checks applied before any store interaction. A posting that fails
//! here never reaches the commit path.

use tresor_shared::types::Money;

use super::account::Account;
use super::error::LedgerError;

/// Validates a posting amount: strictly positive and within the currency's
/// minor-unit scale.
///
/// # Errors
///
/// Returns `ZeroAmount`, `NegativeAmount`, or `InvalidScale`.
pub fn validate_amount(amount: &Money) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if amount.is_negative() {
        return Err(LedgerError::NegativeAmount);
    }
    if !amount.fits_minor_units() {
        return Err(LedgerError::InvalidScale {
            currency: amount.currency,
            amount: amount.amount,
        });
    }
    Ok(())
}

/// Validates that an account can accept a posting of the given amount:
/// not frozen, and currencies match.
///
/// # Errors
///
/// Returns `AccountFrozen` or `CurrencyMismatch`.
pub fn validate_account(account: &Account, amount: &Money) -> Result<(), LedgerError> {
    if account.is_frozen() {
        return Err(LedgerError::AccountFrozen(account.id));
    }
    if amount.currency != account.balance.currency {
        return Err(LedgerError::CurrencyMismatch {
            expected: account.balance.currency,
            actual: amount.currency,
        });
    }
    Ok(())
}
