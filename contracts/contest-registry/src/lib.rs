//! Contest Registry Contract
//!
//! Factory and index for contest pools. The registry is the owner of every
//! pool it creates and gates the privileged pool operations on the
//! identity of the contest's manager.
//!
//! ## Core Operations
//!
//! - **create_contest**: validate and deploy a new pool, caller becomes its manager
//! - **fund_contest**: move the declared rewards from the manager into the pool
//! - **close_contest**: settle the pool once its lock has elapsed
//! - **claim**: forward a player's claim to the pool
//! - **reclaim_unallocated**: pay settlement dust back to the manager
//!
//! ## Funding
//!
//! The registry pulls funds with `transfer_from`, spending the allowance the
//! manager granted to the registry's address on the token ledger.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use contest_common::{
    access_control::{OwnerCheck, Ownership},
    errors::{ContestError, ContestResult},
    events::{ContestEvent, EventLog},
    ledger::TokenLedger,
    storage::{load_record, pool_key, registry_key, save_record, StateStore},
    types::{derive_pool_address, short, Address, CallContext, PoolId, PoolPolicy, TokenId},
    validation::require_valid_address,
};
use contest_pool::{CloseOutcome, ContestPool, CreatePoolRequest};


// ============ Requests ============

/// Parameters of `create_contest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateContestRequest {
    /// Participants, in order
    pub players: Vec<Address>,
    /// Reward per participant, parallel to `players`
    pub rewards: Vec<u64>,
    /// Asset being distributed
    pub token: TokenId,
    /// Amount the manager will fund
    pub total_rewards: u64,
}

// ============ Registry State ============

/// A pool together with the manager allowed to drive it
#[derive(Debug, Clone, PartialEq, Eq)]
struct ContestEntry {
    manager: Ownership,
    pool: ContestPool,
}

/// Persisted registry record; pools are stored under their own keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
struct RegistryRecord {
    address: Address,
    policy: PoolPolicy,
    contests: Vec<ContestRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
struct ContestRecord {
    pool: Address,
    manager: Ownership,
}

/// Registry of contest pools, indexed by creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestRegistry {
    address: Address,
    policy: PoolPolicy,
    contests: Vec<ContestEntry>,
}

impl ContestRegistry {
    /// Creates an empty registry.
    ///
    /// # Arguments
    /// * `address` - Ledger account of the registry; owns every pool and
    ///   spends managers' allowances when funding
    /// * `policy` - Lock duration and manager cut stamped on each new pool
    pub fn new(address: Address, policy: PoolPolicy) -> ContestResult<Self> {
        require_valid_address(&address, "registry address cannot be the zero address")?;
        policy.validate()?;

        Ok(Self {
            address,
            policy,
            contests: Vec::new(),
        })
    }

    // ============ Operations ============

    /// Deploy a new pool. The caller becomes its manager.
    ///
    /// Returns the new pool's id. Nothing is appended if validation fails.
    pub fn create_contest(
        &mut self,
        ctx: &CallContext,
        request: CreateContestRequest,
        events: &mut EventLog,
    ) -> ContestResult<PoolId> {
        let manager = Ownership::new(ctx.caller)?;
        let pool_id = self.contests.len() as PoolId;
        let address = derive_pool_address(&self.address, pool_id);

        let pool = ContestPool::create(CreatePoolRequest {
            address,
            owner: self.address,
            token: request.token,
            players: request.players,
            rewards: request.rewards,
            total_rewards: request.total_rewards,
            deployed_at: ctx.now,
            policy: self.policy,
        })
        .inspect_err(|err| {
            debug!(manager = %short(&ctx.caller), code = err.code(), "contest rejected");
        })?;

        let player_count = u32::try_from(pool.player_count()).map_err(|_| ContestError::Overflow)?;

        events.emit(ContestEvent::ContestCreated {
            pool_id,
            pool: address,
            manager: ctx.caller,
            token: pool.token(),
            total_rewards: pool.total_rewards(),
            player_count,
            timestamp: ctx.now,
        });
        info!(
            pool_id,
            pool = %short(&address),
            manager = %short(&ctx.caller),
            total_rewards = pool.total_rewards(),
            players = player_count,
            "contest created"
        );

        self.contests.push(ContestEntry { manager, pool });
        Ok(pool_id)
    }

    /// Move the contest's total rewards from the manager into the pool.
    ///
    /// Manager-only. The manager must have approved the registry's address
    /// for at least `total_rewards` on the ledger.
    pub fn fund_contest<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        pool_id: PoolId,
        ledger: &mut L,
        events: &mut EventLog,
    ) -> ContestResult<u64> {
        let forwarded = ctx.forwarded_by(self.address);
        let entry = self.managed_entry_mut(pool_id, &ctx.caller)?;
        entry.pool.fund(&forwarded, &ctx.caller, ledger, events)
    }

    /// Settle the contest once its lock has elapsed.
    ///
    /// Manager-only; the manager receives the cut. `StillLocked` from the
    /// pool is propagated unchanged.
    pub fn close_contest<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        pool_id: PoolId,
        ledger: &mut L,
        events: &mut EventLog,
    ) -> ContestResult<CloseOutcome> {
        let forwarded = ctx.forwarded_by(self.address);
        let entry = self.managed_entry_mut(pool_id, &ctx.caller)?;
        entry.pool.close(&forwarded, &ctx.caller, ledger, events)
    }

    /// Claim the caller's reward from a contest
    pub fn claim<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        pool_id: PoolId,
        ledger: &mut L,
        events: &mut EventLog,
    ) -> ContestResult<u64> {
        let entry = self.entry_mut(pool_id)?;
        entry.pool.claim(ctx, ledger, events)
    }

    /// Pay a settled contest's dust to its manager. Manager-only.
    pub fn reclaim_unallocated<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        pool_id: PoolId,
        ledger: &mut L,
        events: &mut EventLog,
    ) -> ContestResult<u64> {
        let forwarded = ctx.forwarded_by(self.address);
        let entry = self.managed_entry_mut(pool_id, &ctx.caller)?;
        entry.pool.reclaim_unallocated(&forwarded, &ctx.caller, ledger, events)
    }

    /// Hand a contest over to a new manager. Returns the previous manager.
    pub fn transfer_management(
        &mut self,
        ctx: &CallContext,
        pool_id: PoolId,
        new_manager: Address,
    ) -> ContestResult<Address> {
        let entry = self.entry_mut(pool_id)?;
        entry.manager.transfer(&ctx.caller, new_manager)
    }

    // ============ Queries ============

    /// Pool addresses in creation order
    pub fn get_contests(&self) -> Vec<Address> {
        self.contests.iter().map(|entry| entry.pool.address()).collect()
    }

    /// Declared total rewards of a contest
    pub fn get_contest_total_rewards(&self, pool_id: PoolId) -> ContestResult<u64> {
        Ok(self.pool(pool_id)?.total_rewards())
    }

    /// Read-only view of a contest's pool
    pub fn pool(&self, pool_id: PoolId) -> ContestResult<&ContestPool> {
        Ok(&self.entry(pool_id)?.pool)
    }

    /// Find a pool and its id by custody address
    pub fn pool_by_address(&self, address: &Address) -> Option<(PoolId, &ContestPool)> {
        self.contests
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.pool.address() == *address)
            .map(|(index, entry)| (index as PoolId, &entry.pool))
    }

    /// Current manager of a contest
    pub fn manager_of(&self, pool_id: PoolId) -> ContestResult<Address> {
        Ok(self.entry(pool_id)?.manager.owner())
    }

    /// Ids of every contest managed by `manager`
    pub fn contests_by_manager(&self, manager: &Address) -> Vec<PoolId> {
        self.contests
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.manager.is_owner(manager))
            .map(|(index, _)| index as PoolId)
            .collect()
    }

    pub fn contest_count(&self) -> usize {
        self.contests.len()
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn policy(&self) -> PoolPolicy {
        self.policy
    }

    // ============ Persistence ============

    /// Write the registry record and every pool record to `store`
    pub fn save<S: StateStore + ?Sized>(&self, store: &mut S) -> ContestResult<()> {
        let record = RegistryRecord {
            address: self.address,
            policy: self.policy,
            contests: self
                .contests
                .iter()
                .map(|entry| ContestRecord {
                    pool: entry.pool.address(),
                    manager: entry.manager,
                })
                .collect(),
        };

        for entry in &self.contests {
            save_record(store, pool_key(&entry.pool.address()), &entry.pool)?;
        }
        save_record(store, registry_key(&self.address), &record)?;

        debug!(registry = %short(&self.address), contests = self.contests.len(), "registry saved");
        Ok(())
    }

    /// Restore the registry stored at `address`, if any
    pub fn load<S: StateStore + ?Sized>(store: &S, address: &Address) -> ContestResult<Option<Self>> {
        let Some(record) = load_record::<_, RegistryRecord>(store, &registry_key(address))? else {
            return Ok(None);
        };

        let mut contests = Vec::with_capacity(record.contests.len());
        for contest in record.contests {
            let pool: ContestPool = load_record(store, &pool_key(&contest.pool))?.ok_or_else(|| {
                warn!(registry = %short(address), pool = %short(&contest.pool), "pool record missing");
                ContestError::Storage {
                    reason: "pool record missing",
                }
            })?;
            contests.push(ContestEntry {
                manager: contest.manager,
                pool,
            });
        }

        debug!(registry = %short(address), contests = contests.len(), "registry loaded");
        Ok(Some(Self {
            address: record.address,
            policy: record.policy,
            contests,
        }))
    }

    // ============ Internal ============

    fn index(&self, pool_id: PoolId) -> ContestResult<usize> {
        usize::try_from(pool_id)
            .ok()
            .filter(|index| *index < self.contests.len())
            .ok_or(ContestError::NotFound { pool_id })
    }

    fn entry(&self, pool_id: PoolId) -> ContestResult<&ContestEntry> {
        let index = self.index(pool_id)?;
        Ok(&self.contests[index])
    }

    fn entry_mut(&mut self, pool_id: PoolId) -> ContestResult<&mut ContestEntry> {
        let index = self.index(pool_id)?;
        Ok(&mut self.contests[index])
    }

    /// Entry for `pool_id`, provided `caller` manages it
    fn managed_entry_mut(&mut self, pool_id: PoolId, caller: &Address) -> ContestResult<&mut ContestEntry> {
        let entry = self.entry_mut(pool_id)?;
        if let Err(err) = entry.manager.ensure_owner(caller) {
            warn!(pool_id, caller = %short(caller), "caller does not manage contest");
            return Err(err);
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contest_common::types::ZERO_ADDRESS;

    fn registry_address() -> Address {
        [0xaau8; 32]
    }

    fn manager() -> Address {
        [0xbbu8; 32]
    }

    fn request(rewards: &[u64], total_rewards: u64) -> CreateContestRequest {
        CreateContestRequest {
            players: (1..=rewards.len() as u8).map(|n| [n; 32]).collect(),
            rewards: rewards.to_vec(),
            token: [7u8; 32],
            total_rewards,
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ContestRegistry::new(registry_address(), PoolPolicy::default()).unwrap();
        assert_eq!(registry.contest_count(), 0);
        assert!(registry.get_contests().is_empty());
    }

    #[test]
    fn test_new_rejects_zero_address() {
        let result = ContestRegistry::new(ZERO_ADDRESS, PoolPolicy::default());
        assert!(matches!(result, Err(ContestError::InvalidAddress { .. })));
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut registry = ContestRegistry::new(registry_address(), PoolPolicy::default()).unwrap();
        let mut events = EventLog::new();
        let ctx = CallContext::new(manager(), 100);

        let first = registry.create_contest(&ctx, request(&[3, 1], 4), &mut events).unwrap();
        let second = registry.create_contest(&ctx, request(&[5], 5), &mut events).unwrap();

        assert_eq!((first, second), (0, 1));
        assert_eq!(registry.get_contests().len(), 2);
        assert_ne!(registry.get_contests()[0], registry.get_contests()[1]);
        assert_eq!(registry.get_contest_total_rewards(1), Ok(5));
        assert_eq!(registry.manager_of(0), Ok(manager()));
        assert_eq!(registry.pool(0).unwrap().owner(), registry_address());
        assert_eq!(registry.pool(0).unwrap().deployed_at(), 100);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_rejected_create_appends_nothing() {
        let mut registry = ContestRegistry::new(registry_address(), PoolPolicy::default()).unwrap();
        let mut events = EventLog::new();
        let mut bad = request(&[1, 2], 3);
        bad.players.push([9u8; 32]);

        let result = registry.create_contest(&CallContext::new(manager(), 0), bad, &mut events);

        assert_eq!(result, Err(ContestError::LengthMismatch { players: 3, rewards: 2 }));
        assert_eq!(registry.contest_count(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_unknown_pool_id_not_found() {
        let registry = ContestRegistry::new(registry_address(), PoolPolicy::default()).unwrap();

        assert_eq!(
            registry.get_contest_total_rewards(3),
            Err(ContestError::NotFound { pool_id: 3 })
        );
        assert!(registry.pool_by_address(&[1u8; 32]).is_none());
    }

    #[test]
    fn test_pool_lookup_by_address() {
        let mut registry = ContestRegistry::new(registry_address(), PoolPolicy::default()).unwrap();
        let mut events = EventLog::new();
        let ctx = CallContext::new(manager(), 0);
        registry.create_contest(&ctx, request(&[1], 1), &mut events).unwrap();
        registry.create_contest(&ctx, request(&[2], 2), &mut events).unwrap();

        let address = registry.get_contests()[1];
        let (pool_id, pool) = registry.pool_by_address(&address).unwrap();

        assert_eq!(pool_id, 1);
        assert_eq!(pool.total_rewards(), 2);
    }

    #[test]
    fn test_contests_by_manager() {
        let mut registry = ContestRegistry::new(registry_address(), PoolPolicy::default()).unwrap();
        let mut events = EventLog::new();
        let other = [0xccu8; 32];
        registry.create_contest(&CallContext::new(manager(), 0), request(&[1], 1), &mut events).unwrap();
        registry.create_contest(&CallContext::new(other, 0), request(&[1], 1), &mut events).unwrap();
        registry.create_contest(&CallContext::new(manager(), 0), request(&[1], 1), &mut events).unwrap();

        assert_eq!(registry.contests_by_manager(&manager()), vec![0, 2]);
        assert_eq!(registry.contests_by_manager(&other), vec![1]);
    }

    #[test]
    fn test_transfer_management() {
        let mut registry = ContestRegistry::new(registry_address(), PoolPolicy::default()).unwrap();
        let mut events = EventLog::new();
        let ctx = CallContext::new(manager(), 0);
        registry.create_contest(&ctx, request(&[1], 1), &mut events).unwrap();
        let successor = [0xddu8; 32];

        let stranger = CallContext::new(successor, 0);
        assert!(matches!(
            registry.transfer_management(&stranger, 0, successor),
            Err(ContestError::Unauthorized { .. })
        ));

        assert_eq!(registry.transfer_management(&ctx, 0, successor), Ok(manager()));
        assert_eq!(registry.manager_of(0), Ok(successor));
    }

    #[test]
    fn test_policy_stamped_on_pools() {
        let policy = PoolPolicy::new(3_600, 20);
        let mut registry = ContestRegistry::new(registry_address(), policy).unwrap();
        let mut events = EventLog::new();
        registry
            .create_contest(&CallContext::new(manager(), 0), request(&[1], 1), &mut events)
            .unwrap();

        assert_eq!(registry.pool(0).unwrap().policy(), policy);
        assert_eq!(registry.policy(), policy);
    }
}
