//! Access Control Module
//!
//! Owner capability for privileged pool operations. A pool is owned by
//! the registry that created it; only the owner may fund, close, or
//! reclaim settlement dust.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ContestResult;
use crate::types::{short, Address};
use crate::validation::{require_owner, require_valid_address};

/// Capability check: "is caller the registered owner"
pub trait OwnerCheck {
    /// Returns true if `caller` holds the owner capability
    fn is_owner(&self, caller: &Address) -> bool;

    /// Fails with `Unauthorized` unless `caller` is the owner
    fn ensure_owner(&self, caller: &Address) -> ContestResult<()>;
}

/// Single-owner capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    /// Create a capability held by `owner`
    pub fn new(owner: Address) -> ContestResult<Self> {
        require_valid_address(&owner, "owner cannot be the zero address")?;
        Ok(Self { owner })
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Hand the capability to `new_owner`. Returns the previous owner.
    pub fn transfer(&mut self, caller: &Address, new_owner: Address) -> ContestResult<Address> {
        self.ensure_owner(caller)?;
        require_valid_address(&new_owner, "new owner cannot be the zero address")?;

        let previous = self.owner;
        self.owner = new_owner;
        info!(previous = %short(&previous), new = %short(&new_owner), "ownership transferred");
        Ok(previous)
    }
}

impl OwnerCheck for Ownership {
    fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    fn ensure_owner(&self, caller: &Address) -> ContestResult<()> {
        require_owner(self.owner, *caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ContestError;
    use crate::types::ZERO_ADDRESS;

    #[test]
    fn test_owner_check() {
        let ownership = Ownership::new([1u8; 32]).unwrap();

        assert!(ownership.is_owner(&[1u8; 32]));
        assert!(!ownership.is_owner(&[2u8; 32]));
        assert!(ownership.ensure_owner(&[1u8; 32]).is_ok());
        assert!(matches!(
            ownership.ensure_owner(&[2u8; 32]),
            Err(ContestError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_zero_owner_rejected() {
        assert!(matches!(
            Ownership::new(ZERO_ADDRESS),
            Err(ContestError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_transfer_requires_current_owner() {
        let mut ownership = Ownership::new([1u8; 32]).unwrap();

        let result = ownership.transfer(&[2u8; 32], [2u8; 32]);
        assert!(matches!(result, Err(ContestError::Unauthorized { .. })));
        assert_eq!(ownership.owner(), [1u8; 32]);

        let previous = ownership.transfer(&[1u8; 32], [3u8; 32]).unwrap();
        assert_eq!(previous, [1u8; 32]);
        assert!(ownership.is_owner(&[3u8; 32]));
    }

    #[test]
    fn test_transfer_to_zero_rejected() {
        let mut ownership = Ownership::new([1u8; 32]).unwrap();
        assert!(ownership.transfer(&[1u8; 32], ZERO_ADDRESS).is_err());
        assert_eq!(ownership.owner(), [1u8; 32]);
    }
}
