//! Contest Pool Contract
//!
//! Holds one contest's rewards and enforces who may withdraw what, and
//! when.
//!
//! ## Lifecycle
//!
//! ```text
//! create ──► AwaitingFunds ──fund──► Open ──close──► Settled
//!                                     │ ▲
//!                                     └─┘ claim × N
//! ```
//!
//! - **claim**: a player withdraws their pre-assigned reward, once
//! - **close**: after the lock period the owner sweeps the unclaimed
//!   balance: a cut to the manager, the rest split evenly among the
//!   players who claimed
//! - **reclaim_unallocated**: the owner pays settlement dust to the
//!   manager
//!
//! Every state-changing call mutates the pool before it touches the
//! ledger, and undoes its own mutation if the ledger rejects the
//! transfer. A failed call leaves the pool exactly as it was.
//!
//! ## Conservation
//!
//! `total_rewards == paid_out + remaining_rewards + unallocated` holds
//! after every call.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use contest_common::{
    access_control::{OwnerCheck, Ownership},
    constants::limits::MAX_PLAYERS,
    errors::{ContestError, ContestResult},
    events::{ContestEvent, EventLog},
    ledger::{Payout, TokenLedger},
    math::{safe_add, split_settlement, sum_rewards, unlock_time, Settlement},
    types::{short, Address, CallContext, PoolPolicy, PoolStatus, Timestamp, TokenId},
    validation::require_valid_address,
};

// ============ Requests & Outcomes ============

/// Parameters for a new pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePoolRequest {
    /// Custody account of the pool on the ledger
    pub address: Address,
    /// Capability holder for fund/close (the registry)
    pub owner: Address,
    /// Asset being distributed
    pub token: TokenId,
    /// Participants, in order
    pub players: Vec<Address>,
    /// Reward per participant, parallel to `players`
    pub rewards: Vec<u64>,
    /// Amount the manager will fund
    pub total_rewards: u64,
    /// Creation time; anchors the lock period
    pub deployed_at: Timestamp,
    /// Lock duration and manager cut
    pub policy: PoolPolicy,
}

/// Result of a successful `close`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Nothing left to sweep; no transfers were made
    NothingToSettle,
    /// Unclaimed balance was swept
    Settled(Settlement),
}

// ============ Pool State ============

/// A single contest's reward-holding and distribution unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct ContestPool {
    address: Address,
    owner: Ownership,
    token: TokenId,
    players: Vec<Address>,
    entitlements: BTreeMap<Address, u64>,
    total_rewards: u64,
    remaining_rewards: u64,
    claimants: Vec<Address>,
    deployed_at: Timestamp,
    policy: PoolPolicy,
    status: PoolStatus,
    paid_out: u64,
    unallocated: u64,
}

impl ContestPool {
    /// Create a pool, validating the reward table before any state exists.
    ///
    /// Duplicate players are accepted: the later entry's reward replaces
    /// the earlier one. The over-allocation check still counts both, so a
    /// duplicate can only leave funds unassigned, never over-assign them.
    pub fn create(request: CreatePoolRequest) -> ContestResult<Self> {
        let CreatePoolRequest {
            address,
            owner,
            token,
            players,
            rewards,
            total_rewards,
            deployed_at,
            policy,
        } = request;

        // 1. Reward table shape
        if players.len() != rewards.len() {
            return Err(ContestError::LengthMismatch {
                players: players.len(),
                rewards: rewards.len(),
            });
        }

        if players.len() > MAX_PLAYERS {
            return Err(ContestError::TooManyPlayers {
                count: players.len(),
                maximum: MAX_PLAYERS,
            });
        }

        // 2. Funding covers every assignment
        let allocated = sum_rewards(&rewards);
        if allocated > total_rewards as u128 {
            return Err(ContestError::OverAllocated {
                allocated,
                total: total_rewards,
            });
        }

        if total_rewards == 0 {
            return Err(ContestError::ZeroTotalRewards);
        }

        // 3. Identities and policy
        policy.validate()?;
        require_valid_address(&address, "pool address cannot be the zero address")?;
        let owner = Ownership::new(owner)?;
        for player in &players {
            require_valid_address(player, "player cannot be the zero address")?;
        }

        // 4. Entitlements (last writer wins)
        let mut entitlements = BTreeMap::new();
        for (player, reward) in players.iter().zip(&rewards) {
            if entitlements.insert(*player, *reward).is_some() {
                warn!(pool = %short(&address), player = %short(player), "duplicate player overwrites earlier reward");
            }
        }

        debug!(
            pool = %short(&address),
            players = players.len(),
            total_rewards,
            allocated = allocated as u64,
            "pool created"
        );

        Ok(Self {
            address,
            owner,
            token,
            players,
            entitlements,
            total_rewards,
            remaining_rewards: total_rewards,
            claimants: Vec::new(),
            deployed_at,
            policy,
            status: PoolStatus::AwaitingFunds,
            paid_out: 0,
            unallocated: 0,
        })
    }

    // ============ Operations ============

    /// Move `total_rewards` from `funder` into pool custody.
    ///
    /// Owner-only. The owner (`ctx.caller`) spends the allowance `funder`
    /// granted it on the ledger. Accepted once; `remaining_rewards` is
    /// untouched.
    pub fn fund<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        funder: &Address,
        ledger: &mut L,
        events: &mut EventLog,
    ) -> ContestResult<u64> {
        self.owner.ensure_owner(&ctx.caller)?;

        if self.status != PoolStatus::AwaitingFunds {
            warn!(pool = %short(&self.address), status = ?self.status, "repeat funding rejected");
            return Err(ContestError::AlreadyFunded { pool: self.address });
        }

        self.status = PoolStatus::Open;

        if let Err(err) = ledger.transfer_from(
            &self.token,
            &ctx.caller,
            funder,
            &self.address,
            self.total_rewards,
        ) {
            self.status = PoolStatus::AwaitingFunds;
            warn!(pool = %short(&self.address), code = err.code(), "funding transfer failed");
            return Err(err);
        }

        events.emit(ContestEvent::ContestFunded {
            pool: self.address,
            manager: *funder,
            amount: self.total_rewards,
            timestamp: ctx.now,
        });
        info!(pool = %short(&self.address), amount = self.total_rewards, "pool funded");

        Ok(self.total_rewards)
    }

    /// Pay the caller their entitlement. Succeeds at most once per player.
    pub fn claim<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        ledger: &mut L,
        events: &mut EventLog,
    ) -> ContestResult<u64> {
        let player = ctx.caller;

        // 1. Caller must have something to claim
        let amount = self.entitlement(&player);
        if amount == 0 {
            debug!(pool = %short(&self.address), player = %short(&player), "nothing to claim");
            return Err(ContestError::NoRewardAvailable { player });
        }

        // 2. Pool must cover it
        let remaining = self.remaining_rewards.checked_sub(amount).ok_or(
            ContestError::InsufficientPool {
                available: self.remaining_rewards,
                requested: amount,
            },
        )?;
        let paid_out = safe_add(self.paid_out, amount)?;

        // 3. Effects
        let previous_remaining = self.remaining_rewards;
        let previous_paid_out = self.paid_out;
        self.entitlements.insert(player, 0);
        self.remaining_rewards = remaining;
        self.paid_out = paid_out;
        self.claimants.push(player);

        // 4. Interaction
        if let Err(err) = ledger.transfer(&self.token, &self.address, &player, amount) {
            self.claimants.pop();
            self.paid_out = previous_paid_out;
            self.remaining_rewards = previous_remaining;
            self.entitlements.insert(player, amount);
            warn!(pool = %short(&self.address), player = %short(&player), code = err.code(), "claim transfer failed");
            return Err(err);
        }

        events.emit(ContestEvent::RewardClaimed {
            pool: self.address,
            player,
            amount,
            remaining_rewards: remaining,
            timestamp: ctx.now,
        });
        info!(pool = %short(&self.address), player = %short(&player), amount, remaining, "reward claimed");

        Ok(amount)
    }

    /// Sweep the unclaimed balance once the lock has elapsed.
    ///
    /// Owner-only. `manager` receives the cut; it is passed explicitly
    /// because the immediate caller is the registry, not the beneficiary.
    /// After a non-empty sweep the pool is `Settled` with nothing
    /// remaining, so repeated calls are no-ops.
    pub fn close<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        manager: &Address,
        ledger: &mut L,
        events: &mut EventLog,
    ) -> ContestResult<CloseOutcome> {
        // 1. Authorization
        self.owner.ensure_owner(&ctx.caller)?;
        require_valid_address(manager, "manager cannot be the zero address")?;

        // 2. Lock
        let unlocks_at = self.unlocks_at()?;
        if ctx.now < unlocks_at {
            debug!(pool = %short(&self.address), unlocks_at, now = ctx.now, "close before unlock");
            return Err(ContestError::StillLocked {
                unlocks_at,
                now: ctx.now,
            });
        }

        // 3. Empty pool is a no-op
        if self.remaining_rewards == 0 {
            debug!(pool = %short(&self.address), "nothing to settle");
            return Ok(CloseOutcome::NothingToSettle);
        }

        if self.status == PoolStatus::AwaitingFunds {
            return Err(ContestError::NotFunded { pool: self.address });
        }

        // 4. Split
        let swept = self.remaining_rewards;
        let claimant_count =
            u32::try_from(self.claimants.len()).map_err(|_| ContestError::Overflow)?;
        let settlement = split_settlement(swept, self.policy.manager_cut_divisor, claimant_count)?;
        let paid_out = safe_add(self.paid_out, settlement.distributed())?;
        let unallocated = safe_add(self.unallocated, settlement.unallocated)?;

        let mut payouts = Vec::with_capacity(self.claimants.len() + 1);
        payouts.push(Payout::new(*manager, settlement.manager_cut));
        payouts.extend(
            self.claimants
                .iter()
                .map(|claimant| Payout::new(*claimant, settlement.claimant_share)),
        );

        // 5. Effects
        let previous = (self.paid_out, self.unallocated, self.status);
        self.remaining_rewards = 0;
        self.paid_out = paid_out;
        self.unallocated = unallocated;
        self.status = PoolStatus::Settled;

        // 6. Interaction
        if let Err(err) = ledger.transfer_batch(&self.token, &self.address, &payouts) {
            (self.paid_out, self.unallocated, self.status) = previous;
            self.remaining_rewards = swept;
            warn!(pool = %short(&self.address), code = err.code(), "settlement transfer failed");
            return Err(err);
        }

        events.emit(ContestEvent::ContestSettled {
            pool: self.address,
            manager: *manager,
            manager_cut: settlement.manager_cut,
            claimant_share: settlement.claimant_share,
            claimant_count,
            unallocated: settlement.unallocated,
            timestamp: ctx.now,
        });
        info!(
            pool = %short(&self.address),
            swept,
            manager_cut = settlement.manager_cut,
            claimant_share = settlement.claimant_share,
            claimants = claimant_count,
            unallocated = settlement.unallocated,
            "pool settled"
        );

        Ok(CloseOutcome::Settled(settlement))
    }

    /// Pay accumulated settlement dust to `manager`.
    ///
    /// Owner-only, settled pools only. Returns the amount paid (0 when
    /// there is no dust).
    pub fn reclaim_unallocated<L: TokenLedger + ?Sized>(
        &mut self,
        ctx: &CallContext,
        manager: &Address,
        ledger: &mut L,
        events: &mut EventLog,
    ) -> ContestResult<u64> {
        self.owner.ensure_owner(&ctx.caller)?;
        require_valid_address(manager, "manager cannot be the zero address")?;

        if self.status != PoolStatus::Settled {
            return Err(ContestError::NotSettled { pool: self.address });
        }

        let amount = self.unallocated;
        if amount == 0 {
            return Ok(0);
        }
        let paid_out = safe_add(self.paid_out, amount)?;

        let previous_paid_out = self.paid_out;
        self.unallocated = 0;
        self.paid_out = paid_out;

        if let Err(err) = ledger.transfer(&self.token, &self.address, manager, amount) {
            self.unallocated = amount;
            self.paid_out = previous_paid_out;
            warn!(pool = %short(&self.address), code = err.code(), "reclaim transfer failed");
            return Err(err);
        }

        events.emit(ContestEvent::UnallocatedReclaimed {
            pool: self.address,
            manager: *manager,
            amount,
            timestamp: ctx.now,
        });
        info!(pool = %short(&self.address), amount, "unallocated reclaimed");

        Ok(amount)
    }

    // ============ Accessors ============

    /// Custody account of the pool
    pub fn address(&self) -> Address {
        self.address
    }

    /// Capability holder for privileged calls
    pub fn owner(&self) -> Address {
        self.owner.owner()
    }

    /// Asset being distributed
    pub fn token(&self) -> TokenId {
        self.token
    }

    /// Participants in creation order (duplicates included)
    pub fn players(&self) -> &[Address] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Unclaimed reward assigned to `player` (0 once claimed)
    pub fn entitlement(&self, player: &Address) -> u64 {
        self.entitlements.get(player).copied().unwrap_or(0)
    }

    /// Whether `player` has claimed
    pub fn has_claimed(&self, player: &Address) -> bool {
        self.claimants.contains(player)
    }

    pub fn total_rewards(&self) -> u64 {
        self.total_rewards
    }

    pub fn remaining_rewards(&self) -> u64 {
        self.remaining_rewards
    }

    /// Players who claimed, in claim order
    pub fn claimants(&self) -> &[Address] {
        &self.claimants
    }

    pub fn deployed_at(&self) -> Timestamp {
        self.deployed_at
    }

    /// First timestamp at which `close` is allowed
    pub fn unlocks_at(&self) -> ContestResult<Timestamp> {
        unlock_time(self.deployed_at, self.policy.lock_duration)
    }

    /// Whether `close` would fail with `StillLocked` at `now`
    pub fn is_locked(&self, now: Timestamp) -> bool {
        match self.unlocks_at() {
            Ok(unlocks_at) => now < unlocks_at,
            Err(_) => true,
        }
    }

    pub fn status(&self) -> PoolStatus {
        self.status
    }

    /// Everything transferred out of custody so far
    pub fn paid_out(&self) -> u64 {
        self.paid_out
    }

    /// Settlement dust awaiting reclaim
    pub fn unallocated(&self) -> u64 {
        self.unallocated
    }

    pub fn policy(&self) -> PoolPolicy {
        self.policy
    }

    /// `total_rewards == paid_out + remaining_rewards + unallocated`
    pub fn check_conservation(&self) -> bool {
        self.total_rewards as u128
            == self.paid_out as u128 + self.remaining_rewards as u128 + self.unallocated as u128
    }
}

// ============ Tests ============
