//! Core Types for Contest Pools
//!
//! Identifiers, the settlement policy, the pool status machine, and the
//! per-call context shared by both contracts.

use core::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::{limits, policy, storage};
use crate::errors::{ContestError, ContestResult};

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for token (asset) identifiers on the ledger
pub type TokenId = [u8; 32];

/// Sequential contest index assigned by the registry
pub type PoolId = u64;

/// Unix timestamp in seconds
pub type Timestamp = u64;

/// The all-zero address, never a valid participant
pub const ZERO_ADDRESS: Address = [0u8; 32];

// ============ Address Formatting ============

/// Compact `Display` form of an address for logs and error messages
#[derive(Clone, Copy)]
pub struct ShortAddress<'a>(&'a Address);

impl fmt::Display for ShortAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0[..4] {
            write!(f, "{:02x}", byte)?;
        }
        f.write_str("..")
    }
}

impl fmt::Debug for ShortAddress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Wrap an address for compact display
pub fn short(address: &Address) -> ShortAddress<'_> {
    ShortAddress(address)
}

// ============ Policy ============

/// Settlement policy captured by each pool at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PoolPolicy {
    /// Seconds after deployment before the pool can be closed
    pub lock_duration: u64,
    /// Manager cut = remaining / manager_cut_divisor
    pub manager_cut_divisor: u64,
}

impl Default for PoolPolicy {
    fn default() -> Self {
        Self {
            lock_duration: policy::LOCK_DURATION_SECS,
            manager_cut_divisor: policy::MANAGER_CUT_DIVISOR,
        }
    }
}

impl PoolPolicy {
    /// Creates a policy with explicit parameters
    pub fn new(lock_duration: u64, manager_cut_divisor: u64) -> Self {
        Self {
            lock_duration,
            manager_cut_divisor,
        }
    }

    /// Check the parameters are usable
    pub fn validate(&self) -> ContestResult<()> {
        if self.manager_cut_divisor == 0 {
            return Err(ContestError::InvalidPolicy {
                reason: "manager cut divisor must be non-zero",
            });
        }
        if self.lock_duration > limits::MAX_LOCK_DURATION_SECS {
            return Err(ContestError::InvalidPolicy {
                reason: "lock duration exceeds maximum",
            });
        }
        Ok(())
    }
}

// ============ Pool Status ============

/// Lifecycle of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum PoolStatus {
    /// Created, custody not yet funded by the manager
    #[default]
    AwaitingFunds,
    /// Funded; claims and settlement allowed
    Open,
    /// Unclaimed balance has been swept. Terminal.
    Settled,
}

// ============ Call Context ============

/// Caller identity and clock for a single state-changing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Immediate caller of the operation
    pub caller: Address,
    /// Current time (unix seconds)
    pub now: Timestamp,
}

impl CallContext {
    /// Creates a new call context
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self { caller, now }
    }

    /// Same clock, different immediate caller (used when a contract
    /// forwards a call on behalf of its own caller)
    pub fn forwarded_by(&self, caller: Address) -> Self {
        Self { caller, now: self.now }
    }
}

// ============ Helper Functions ============

/// Derive a deterministic pool address from its registry and index
pub fn derive_pool_address(registry: &Address, pool_id: PoolId) -> Address {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(storage::POOL_ADDRESS_DOMAIN);
    hasher.update(registry);
    hasher.update(pool_id.to_le_bytes());
    let result = hasher.finalize();
    let mut address = [0u8; 32];
    address.copy_from_slice(&result);
    address
}
