//! Contest Events
//!
//! Events are emitted during contract execution and can be indexed
//! off-chain for building UIs, analytics, and notifications.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::types::{Address, PoolId, Timestamp, TokenId};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Registry Events (0x01 - 0x1F)
    ContestCreated = 0x01,
    ContestFunded = 0x02,

    // Pool Events (0x20 - 0x3F)
    RewardClaimed = 0x20,
    ContestSettled = 0x21,
    UnallocatedReclaimed = 0x22,
}

/// Main event enum containing all contest events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum ContestEvent {
    // ============ Registry Events ============

    /// Emitted when the registry creates a new pool
    ContestCreated {
        pool_id: PoolId,
        pool: Address,
        manager: Address,
        token: TokenId,
        total_rewards: u64,
        player_count: u32,
        timestamp: Timestamp,
    },

    /// Emitted when the manager moves the rewards into pool custody
    ContestFunded {
        pool: Address,
        manager: Address,
        amount: u64,
        timestamp: Timestamp,
    },

    // ============ Pool Events ============

    /// Emitted when a player claims their entitlement
    RewardClaimed {
        pool: Address,
        player: Address,
        amount: u64,
        remaining_rewards: u64,
        timestamp: Timestamp,
    },

    /// Emitted when the unclaimed balance is swept
    ContestSettled {
        pool: Address,
        manager: Address,
        manager_cut: u64,
        claimant_share: u64,
        claimant_count: u32,
        unallocated: u64,
        timestamp: Timestamp,
    },

    /// Emitted when settlement dust is paid to the manager
    UnallocatedReclaimed {
        pool: Address,
        manager: Address,
        amount: u64,
        timestamp: Timestamp,
    },
}

impl ContestEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::ContestCreated { .. } => EventType::ContestCreated,
            Self::ContestFunded { .. } => EventType::ContestFunded,
            Self::RewardClaimed { .. } => EventType::RewardClaimed,
            Self::ContestSettled { .. } => EventType::ContestSettled,
            Self::UnallocatedReclaimed { .. } => EventType::UnallocatedReclaimed,
        }
    }

    /// Get the time the event occurred
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::ContestCreated { timestamp, .. }
            | Self::ContestFunded { timestamp, .. }
            | Self::RewardClaimed { timestamp, .. }
            | Self::ContestSettled { timestamp, .. }
            | Self::UnallocatedReclaimed { timestamp, .. } => *timestamp,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting multiple events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<ContestEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: ContestEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[ContestEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<ContestEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&ContestEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type() {
        let event = ContestEvent::RewardClaimed {
            pool: [1u8; 32],
            player: [2u8; 32],
            amount: 150,
            remaining_rewards: 300,
            timestamp: 1_700_000_000,
        };

        assert_eq!(event.event_type(), EventType::RewardClaimed);
        assert_eq!(event.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_settlement_event_survives_encoding() {
        let event = ContestEvent::ContestSettled {
            pool: [1u8; 32],
            manager: [2u8; 32],
            manager_cut: 15,
            claimant_share: 67,
            claimant_count: 2,
            unallocated: 1,
            timestamp: 42,
        };

        let restored = ContestEvent::from_bytes(&event.to_bytes()).unwrap();
        assert_eq!(event, restored);
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();

        log.emit(ContestEvent::ContestFunded {
            pool: [1u8; 32],
            manager: [2u8; 32],
            amount: 450,
            timestamp: 10,
        });

        log.emit(ContestEvent::RewardClaimed {
            pool: [1u8; 32],
            player: [3u8; 32],
            amount: 100,
            remaining_rewards: 350,
            timestamp: 11,
        });

        assert_eq!(log.len(), 2);
        assert!(log.has_events());

        let claims = log.filter_by_type(EventType::RewardClaimed);
        assert_eq!(claims.len(), 1);
    }
}
