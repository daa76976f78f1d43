//! Settlement Arithmetic
//!
//! Checked math for reward allocation and the post-lock sweep.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::errors::{ContestError, ContestResult};
use crate::types::Timestamp;

/// Breakdown of a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Settlement {
    /// Paid to the manager
    pub manager_cut: u64,
    /// Paid to each claimant
    pub claimant_share: u64,
    /// Number of claimants paid
    pub claimant_count: u32,
    /// Floor-division remainder kept by the pool
    pub unallocated: u64,
}

impl Settlement {
    /// Total leaving custody (manager cut plus every claimant share)
    pub fn distributed(&self) -> u64 {
        // split_settlement guarantees this never exceeds the swept amount
        self.manager_cut
            .saturating_add(self.claimant_share.saturating_mul(self.claimant_count as u64))
    }
}

/// Split the unclaimed balance between the manager and the claimants
///
/// manager_cut    = floor(remaining / divisor)
/// claimant_share = floor((remaining - manager_cut) / claimants)
/// unallocated    = remaining - manager_cut - claimant_share * claimants
///
/// With no claimants the whole post-cut balance is unallocated.
///
/// # Arguments
/// * `remaining` - Unclaimed balance being swept
/// * `divisor` - Manager cut divisor from the pool policy
/// * `claimant_count` - Players who claimed before settlement
pub fn split_settlement(
    remaining: u64,
    divisor: u64,
    claimant_count: u32,
) -> ContestResult<Settlement> {
    let manager_cut = remaining
        .checked_div(divisor)
        .ok_or(ContestError::DivisionByZero)?;

    let pot = remaining
        .checked_sub(manager_cut)
        .ok_or(ContestError::Underflow)?;

    let claimant_share = if claimant_count == 0 {
        0
    } else {
        pot / claimant_count as u64
    };

    let shared = claimant_share
        .checked_mul(claimant_count as u64)
        .ok_or(ContestError::Overflow)?;

    let unallocated = pot.checked_sub(shared).ok_or(ContestError::Underflow)?;

    Ok(Settlement {
        manager_cut,
        claimant_share,
        claimant_count,
        unallocated,
    })
}

/// Sum reward amounts without overflow
pub fn sum_rewards(rewards: &[u64]) -> u128 {
    rewards.iter().map(|&r| r as u128).sum()
}

/// Timestamp at which a pool deployed at `deployed_at` unlocks
pub fn unlock_time(deployed_at: Timestamp, lock_duration: u64) -> ContestResult<Timestamp> {
    deployed_at
        .checked_add(lock_duration)
        .ok_or(ContestError::Overflow)
}

// ============ Safe Math Helpers ============

/// Checked addition
pub fn safe_add(a: u64, b: u64) -> ContestResult<u64> {
    a.checked_add(b).ok_or(ContestError::Overflow)
}

/// Checked subtraction
pub fn safe_sub(a: u64, b: u64) -> ContestResult<u64> {
    a.checked_sub(b).ok_or(ContestError::Underflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_split() {
        // 150 unclaimed, 10% cut, two claimants
        let s = split_settlement(150, 10, 2).unwrap();
        assert_eq!(s.manager_cut, 15);
        assert_eq!(s.claimant_share, 67);
        assert_eq!(s.unallocated, 1);
        assert_eq!(s.distributed(), 149);
    }

    #[test]
    fn test_split_conserves_every_unit() {
        for remaining in [1u64, 7, 99, 1_000, 123_457, u64::MAX] {
            for claimants in [0u32, 1, 3, 7, 1_000] {
                let s = split_settlement(remaining, 10, claimants).unwrap();
                assert_eq!(
                    s.distributed() as u128 + s.unallocated as u128,
                    remaining as u128,
                    "remaining={} claimants={}",
                    remaining,
                    claimants
                );
            }
        }
    }

    #[test]
    fn test_no_claimants_leaves_pot_unallocated() {
        let s = split_settlement(450, 10, 0).unwrap();
        assert_eq!(s.manager_cut, 45);
        assert_eq!(s.claimant_share, 0);
        assert_eq!(s.unallocated, 405);
    }

    #[test]
    fn test_tiny_remainder_goes_to_claimants() {
        // Cut floors to zero below the divisor
        let s = split_settlement(9, 10, 3).unwrap();
        assert_eq!(s.manager_cut, 0);
        assert_eq!(s.claimant_share, 3);
        assert_eq!(s.unallocated, 0);
    }

    #[test]
    fn test_zero_divisor() {
        assert_eq!(split_settlement(100, 0, 1), Err(ContestError::DivisionByZero));
    }

    #[test]
    fn test_sum_rewards_never_overflows() {
        assert_eq!(sum_rewards(&[u64::MAX, u64::MAX]), 2 * u64::MAX as u128);
        assert_eq!(sum_rewards(&[]), 0);
    }

    #[test]
    fn test_unlock_time_overflow() {
        assert_eq!(unlock_time(100, 50), Ok(150));
        assert_eq!(unlock_time(u64::MAX, 1), Err(ContestError::Overflow));
    }

    #[test]
    fn test_safe_math() {
        assert_eq!(safe_add(1, 2), Ok(3));
        assert_eq!(safe_add(u64::MAX, 1), Err(ContestError::Overflow));
        assert_eq!(safe_sub(1, 2), Err(ContestError::Underflow));
    }
}
