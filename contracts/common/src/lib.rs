//! Contest Pools Common Library
//!
//! Shared types, constants, and collaborators for the contest reward
//! pool contracts.
//!
//! ## Model
//!
//! A manager creates a contest through the registry, funds it once, and
//! pre-assigns a reward to each player. Players claim their own share.
//! After the lock period the manager closes the pool: a cut goes to the
//! manager and whatever is left is split evenly among the players who
//! already claimed.
//!
//! The pieces that live here are the ones both contracts need:
//!
//! - **Errors**: one typed error enum with stable codes
//! - **Events**: indexable records of every state transition
//! - **Ledger**: the token-transfer collaborator (trait + in-memory ledger)
//! - **Access Control**: the owner capability check
//! - **Storage**: key-value persistence for pool and registry records
//! - **Math**: checked settlement arithmetic
//!
//! This crate is `no_std` compatible when built without the `std`
//! feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, vec::Vec};

pub mod access_control;
pub mod constants;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod math;
pub mod storage;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use access_control::{OwnerCheck, Ownership};
pub use errors::*;
pub use events::*;
pub use ledger::{MemoryLedger, Payout, TokenLedger};
pub use math::*;
pub use storage::{MemoryStore, StateStore};
pub use types::*;
