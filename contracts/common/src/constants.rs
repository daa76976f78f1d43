//! Protocol Constants
//!
//! Reference policy values for contest pools. A registry may be built
//! with a different [`PoolPolicy`](crate::types::PoolPolicy); these are
//! the values used by `PoolPolicy::default()`.

/// Time-related constants (timestamps are unix seconds)
pub mod time {
    /// Seconds per minute
    pub const SECONDS_PER_MINUTE: u64 = 60;

    /// Seconds per hour
    pub const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;

    /// Seconds per day
    pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
}

/// Reference settlement policy
pub mod policy {
    use super::time::SECONDS_PER_DAY;

    /// Lock period before a pool can be closed, in days
    pub const LOCK_DURATION_DAYS: u64 = 90;

    /// Lock period before a pool can be closed, in seconds
    pub const LOCK_DURATION_SECS: u64 = LOCK_DURATION_DAYS * SECONDS_PER_DAY;

    /// Manager cut divisor: cut = remaining / 10 (10%)
    pub const MANAGER_CUT_DIVISOR: u64 = 10;
}

/// Size limits
pub mod limits {
    /// Maximum players per contest.
    /// Settlement pays every claimant in one batch, so this bounds close().
    pub const MAX_PLAYERS: usize = 1_000;

    /// Upper bound on the lock period a policy may request (10 years)
    pub const MAX_LOCK_DURATION_SECS: u64 = 3_650 * super::time::SECONDS_PER_DAY;
}

/// Storage key namespaces
pub mod storage {
    /// Prefix for the registry record
    pub const REGISTRY_PREFIX: &[u8] = b"contest-registry/";

    /// Prefix for pool records
    pub const POOL_PREFIX: &[u8] = b"contest-pool/";

    /// Domain separator for pool address derivation
    pub const POOL_ADDRESS_DOMAIN: &[u8] = b"contest-pools:pool-address:v1";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_lock_is_ninety_days() {
        assert_eq!(policy::LOCK_DURATION_SECS, 7_776_000);
    }

    #[test]
    fn test_lock_bound_covers_reference_policy() {
        assert!(policy::LOCK_DURATION_SECS <= limits::MAX_LOCK_DURATION_SECS);
    }
}
