//! Error Types for Contest Pools
//!
//! Every failing operation surfaces one of these variants and leaves the
//! pool and registry exactly as they were before the call.

use crate::types::{short, Address, PoolId};

/// Result type alias for contest operations
pub type ContestResult<T> = Result<T, ContestError>;

/// Main error enum for all contest pool errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContestError {
    // ============ Creation Errors ============
    /// Players and rewards have different lengths
    #[error("{players} players but {rewards} rewards")]
    LengthMismatch { players: usize, rewards: usize },

    /// Sum of assigned rewards exceeds the declared total
    #[error("rewards allocate {allocated} but total rewards is {total}")]
    OverAllocated { allocated: u128, total: u64 },

    /// Declared total rewards is zero
    #[error("total rewards must be greater than zero")]
    ZeroTotalRewards,

    /// Player list exceeds the per-contest limit
    #[error("{count} players exceeds the maximum of {maximum}")]
    TooManyPlayers { count: usize, maximum: usize },

    /// Invalid address (e.g., zero address)
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: &'static str },

    /// Pool policy parameters are out of range
    #[error("invalid pool policy: {reason}")]
    InvalidPolicy { reason: &'static str },

    // ============ Pool Errors ============
    /// Caller has no unclaimed entitlement
    #[error("no reward available for {}", short(.player))]
    NoRewardAvailable { player: Address },

    /// Operation would drive remaining rewards below zero
    #[error("pool has {available} remaining, {requested} requested")]
    InsufficientPool { available: u64, requested: u64 },

    /// Lock period has not elapsed
    #[error("pool is locked until {unlocks_at} (now {now})")]
    StillLocked { unlocks_at: u64, now: u64 },

    /// Pool has already received its funding
    #[error("pool {} is already funded", short(.pool))]
    AlreadyFunded { pool: Address },

    /// Pool custody was never funded
    #[error("pool {} has not been funded", short(.pool))]
    NotFunded { pool: Address },

    /// Operation requires a settled pool
    #[error("pool {} has not been settled", short(.pool))]
    NotSettled { pool: Address },

    // ============ Registry Errors ============
    /// Pool id is out of range
    #[error("contest {pool_id} not found")]
    NotFound { pool_id: PoolId },

    /// Caller is not authorized for this operation
    #[error("caller {} is not authorized (expected {})", short(.actual), short(.expected))]
    Unauthorized { expected: Address, actual: Address },

    // ============ Token Errors ============
    /// Ledger balance too low for the transfer
    #[error("insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance { available: u64, requested: u64 },

    /// Spender allowance too low for transfer_from
    #[error("insufficient allowance: {available} approved, {requested} requested")]
    InsufficientAllowance { available: u64, requested: u64 },

    /// Zero amount not allowed
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// Ledger rejected the transfer
    #[error("transfer of {amount} from {} to {} failed", short(.from), short(.to))]
    TransferFailed { from: Address, to: Address, amount: u64 },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic underflow occurred
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,

    // ============ Storage Errors ============
    /// Record could not be read or written
    #[error("storage error: {reason}")]
    Storage { reason: &'static str },
}

impl ContestError {
    /// Returns a human-readable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. } => "E001_LENGTH_MISMATCH",
            Self::OverAllocated { .. } => "E002_OVER_ALLOCATED",
            Self::ZeroTotalRewards => "E003_ZERO_TOTAL",
            Self::TooManyPlayers { .. } => "E004_TOO_MANY_PLAYERS",
            Self::InvalidAddress { .. } => "E005_INVALID_ADDRESS",
            Self::InvalidPolicy { .. } => "E006_INVALID_POLICY",
            Self::NoRewardAvailable { .. } => "E010_NO_REWARD",
            Self::InsufficientPool { .. } => "E011_POOL_INSUFFICIENT",
            Self::StillLocked { .. } => "E012_STILL_LOCKED",
            Self::AlreadyFunded { .. } => "E013_ALREADY_FUNDED",
            Self::NotSettled { .. } => "E014_NOT_SETTLED",
            Self::NotFunded { .. } => "E015_NOT_FUNDED",
            Self::NotFound { .. } => "E020_NOT_FOUND",
            Self::Unauthorized { .. } => "E021_UNAUTHORIZED",
            Self::InsufficientBalance { .. } => "E030_INSUFFICIENT_BALANCE",
            Self::InsufficientAllowance { .. } => "E031_INSUFFICIENT_ALLOWANCE",
            Self::ZeroAmount => "E032_ZERO_AMOUNT",
            Self::TransferFailed { .. } => "E033_TRANSFER_FAILED",
            Self::Overflow => "E040_OVERFLOW",
            Self::Underflow => "E041_UNDERFLOW",
            Self::DivisionByZero => "E042_DIV_ZERO",
            Self::Storage { .. } => "E050_STORAGE",
        }
    }

    /// Returns true if this error is recoverable (caller can retry later
    /// or fix it)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::StillLocked { .. } => true,           // Wait for the lock
            Self::InsufficientBalance { .. } => true,   // Get more funds
            Self::InsufficientAllowance { .. } => true, // Approve the registry
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            ContestError::LengthMismatch { players: 3, rewards: 2 },
            ContestError::OverAllocated { allocated: 5, total: 4 },
            ContestError::ZeroTotalRewards,
            ContestError::NoRewardAvailable { player: [1u8; 32] },
            ContestError::InsufficientPool { available: 0, requested: 1 },
            ContestError::StillLocked { unlocks_at: 10, now: 5 },
            ContestError::NotFound { pool_id: 7 },
            ContestError::Unauthorized { expected: [1u8; 32], actual: [2u8; 32] },
            ContestError::InsufficientBalance { available: 0, requested: 1 },
            ContestError::Overflow,
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_still_locked_is_recoverable() {
        assert!(ContestError::StillLocked { unlocks_at: 10, now: 5 }.is_recoverable());
        assert!(!ContestError::NoRewardAvailable { player: [1u8; 32] }.is_recoverable());
    }

    #[test]
    fn test_display_uses_short_addresses() {
        let err = ContestError::Unauthorized {
            expected: [0xab; 32],
            actual: [0x01; 32],
        };
        assert_eq!(
            err.to_string(),
            "caller 0x01010101.. is not authorized (expected 0xabababab..)"
        );
    }
}
