//! Validation Helpers
//!
//! Small guard functions shared by the pool and registry contracts.

use crate::errors::{ContestError, ContestResult};
use crate::types::{Address, ZERO_ADDRESS};

/// Require the caller to be the expected owner.
pub fn require_owner(owner: Address, caller: Address) -> ContestResult<()> {
    if owner != caller {
        return Err(ContestError::Unauthorized {
            expected: owner,
            actual: caller,
        });
    }
    Ok(())
}

/// Require address to not be zero.
pub fn require_valid_address(address: &Address, reason: &'static str) -> ContestResult<()> {
    if *address == ZERO_ADDRESS {
        return Err(ContestError::InvalidAddress { reason });
    }
    Ok(())
}

/// Require a non-zero amount.
pub fn require_positive(amount: u64) -> ContestResult<()> {
    if amount == 0 {
        return Err(ContestError::ZeroAmount);
    }
    Ok(())
}

/// Require a balance to cover the requested amount.
pub fn require_sufficient_balance(available: u64, requested: u64) -> ContestResult<()> {
    if available < requested {
        return Err(ContestError::InsufficientBalance {
            available,
            requested,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_owner() {
        assert!(require_owner([1u8; 32], [1u8; 32]).is_ok());
        assert_eq!(
            require_owner([1u8; 32], [2u8; 32]),
            Err(ContestError::Unauthorized {
                expected: [1u8; 32],
                actual: [2u8; 32],
            })
        );
    }

    #[test]
    fn test_require_valid_address() {
        assert!(require_valid_address(&[1u8; 32], "player").is_ok());
        assert!(matches!(
            require_valid_address(&ZERO_ADDRESS, "player"),
            Err(ContestError::InvalidAddress { reason: "player" })
        ));
    }

    #[test]
    fn test_require_positive_and_balance() {
        assert_eq!(require_positive(0), Err(ContestError::ZeroAmount));
        assert!(require_positive(1).is_ok());
        assert!(require_sufficient_balance(10, 10).is_ok());
        assert!(require_sufficient_balance(9, 10).is_err());
    }
}
