//! Token Ledger Collaborator
//!
//! The pools never hold balances themselves: custody lives on an external
//! token ledger that debits and credits accounts atomically per call.
//! [`TokenLedger`] is that seam; [`MemoryLedger`] is a complete in-memory
//! implementation used by tests and local simulations.
//!
//! ## Rules
//!
//! - **Atomic**: every call either fully applies or changes nothing
//! - **Authenticated sender**: `from` in `transfer`/`transfer_batch` is
//!   the calling contract's own account
//! - **Allowances**: `transfer_from` spends an allowance the owner granted
//!   to the spender
//! - **Failures propagate**: callers never swallow a ledger error

use tracing::debug;

use crate::errors::{ContestError, ContestResult};
use crate::types::{short, Address, TokenId};
use crate::validation::{require_positive, require_sufficient_balance};
use crate::BTreeMap;

/// One leg of a batch payout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    /// Recipient address
    pub to: Address,
    /// Amount to transfer
    pub amount: u64,
}

impl Payout {
    /// Create a payout leg
    pub fn new(to: Address, amount: u64) -> Self {
        Self { to, amount }
    }
}

/// External token ledger
pub trait TokenLedger {
    /// Balance of `owner` in `token`
    fn balance_of(&self, token: &TokenId, owner: &Address) -> u64;

    /// Amount `spender` may still move out of `owner`'s balance
    fn allowance(&self, token: &TokenId, owner: &Address, spender: &Address) -> u64;

    /// Move `amount` from the caller's account `from` to `to`
    fn transfer(
        &mut self,
        token: &TokenId,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> ContestResult<()>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance
    fn transfer_from(
        &mut self,
        token: &TokenId,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> ContestResult<()>;

    /// Pay every leg from `from`, all-or-nothing. Zero-amount legs are
    /// skipped.
    fn transfer_batch(
        &mut self,
        token: &TokenId,
        from: &Address,
        payouts: &[Payout],
    ) -> ContestResult<()>;
}

// ============================================================================
// In-memory ledger
// ============================================================================

/// Token ledger held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: BTreeMap<(TokenId, Address), u64>,
    allowances: BTreeMap<(TokenId, Address, Address), u64>,
    supply: BTreeMap<TokenId, u64>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit newly issued tokens to `to`
    pub fn mint(&mut self, token: &TokenId, to: &Address, amount: u64) -> ContestResult<()> {
        require_positive(amount)?;

        let supply = self.supply.get(token).copied().unwrap_or(0);
        let new_supply = supply.checked_add(amount).ok_or(ContestError::Overflow)?;
        let new_balance = self
            .balance_of(token, to)
            .checked_add(amount)
            .ok_or(ContestError::Overflow)?;

        self.supply.insert(*token, new_supply);
        self.balances.insert((*token, *to), new_balance);

        debug!(to = %short(to), amount, "minted");
        Ok(())
    }

    /// Set the allowance `owner` grants to `spender`
    pub fn approve(&mut self, token: &TokenId, owner: &Address, spender: &Address, amount: u64) {
        if amount == 0 {
            self.allowances.remove(&(*token, *owner, *spender));
        } else {
            self.allowances.insert((*token, *owner, *spender), amount);
        }
        debug!(owner = %short(owner), spender = %short(spender), amount, "allowance set");
    }

    /// Total issued amount of `token`
    pub fn total_supply(&self, token: &TokenId) -> u64 {
        self.supply.get(token).copied().unwrap_or(0)
    }

    fn set_balance(&mut self, token: &TokenId, owner: &Address, amount: u64) {
        if amount == 0 {
            self.balances.remove(&(*token, *owner));
        } else {
            self.balances.insert((*token, *owner), amount);
        }
    }

    /// Validate and apply a single move. Nothing changes on error.
    fn move_tokens(
        &mut self,
        token: &TokenId,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> ContestResult<()> {
        let from_balance = self.balance_of(token, from);
        require_sufficient_balance(from_balance, amount)?;

        if from == to {
            return Ok(());
        }

        let to_balance = self
            .balance_of(token, to)
            .checked_add(amount)
            .ok_or(ContestError::Overflow)?;

        self.set_balance(token, from, from_balance - amount);
        self.set_balance(token, to, to_balance);
        Ok(())
    }
}

impl TokenLedger for MemoryLedger {
    fn balance_of(&self, token: &TokenId, owner: &Address) -> u64 {
        self.balances.get(&(*token, *owner)).copied().unwrap_or(0)
    }

    fn allowance(&self, token: &TokenId, owner: &Address, spender: &Address) -> u64 {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(
        &mut self,
        token: &TokenId,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> ContestResult<()> {
        require_positive(amount)?;
        self.move_tokens(token, from, to, amount)?;
        debug!(from = %short(from), to = %short(to), amount, "transfer");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: &TokenId,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> ContestResult<()> {
        require_positive(amount)?;

        let allowance = self.allowance(token, from, spender);
        if allowance < amount {
            return Err(ContestError::InsufficientAllowance {
                available: allowance,
                requested: amount,
            });
        }

        self.move_tokens(token, from, to, amount)?;
        self.approve(token, from, spender, allowance - amount);
        debug!(
            spender = %short(spender),
            from = %short(from),
            to = %short(to),
            amount,
            "transfer_from"
        );
        Ok(())
    }

    fn transfer_batch(
        &mut self,
        token: &TokenId,
        from: &Address,
        payouts: &[Payout],
    ) -> ContestResult<()> {
        // 1. Total must be covered by the sender
        let total = payouts
            .iter()
            .try_fold(0u64, |acc, p| acc.checked_add(p.amount))
            .ok_or(ContestError::Overflow)?;
        let from_balance = self.balance_of(token, from);
        require_sufficient_balance(from_balance, total)?;

        // 2. Stage every credit so an overflow aborts before any write
        let mut staged: BTreeMap<Address, u64> = BTreeMap::new();
        staged.insert(*from, from_balance - total);
        for payout in payouts.iter().filter(|p| p.amount > 0) {
            let current = match staged.get(&payout.to) {
                Some(balance) => *balance,
                None => self.balance_of(token, &payout.to),
            };
            let credited = current
                .checked_add(payout.amount)
                .ok_or(ContestError::Overflow)?;
            staged.insert(payout.to, credited);
        }

        // 3. Apply
        for (owner, balance) in &staged {
            self.set_balance(token, owner, *balance);
        }

        debug!(from = %short(from), legs = payouts.len(), total, "batch transfer");
        Ok(())
    }
}
