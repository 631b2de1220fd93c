//! Verification Events for zkPyth
//!
//! A `VerificationEvent` is the receipt that a price attestation passed
//! every enforced check. Receipts are append-only: there is no update or
//! delete, and the same feed id may appear any number of times.

use crate::constants::verifier::EVENT_CHANNEL;
use crate::types::FeedId;
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Receipt emitted on the `pythCheck` channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VerificationEvent {
    /// Identifier of the verified attestation
    pub id: FeedId,
}

impl VerificationEvent {
    /// Creates a receipt for the given attestation id
    pub fn new(id: FeedId) -> Self {
        Self { id }
    }

    /// Channel this event is published on
    pub fn channel(&self) -> &'static str {
        EVENT_CHANNEL
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

/// Append-only log of verification receipts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct EventLog {
    events: Vec<VerificationEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append a receipt. No deduplication.
    pub fn append(&mut self, event: VerificationEvent) {
        self.events.push(event);
    }

    /// Whether the given id was ever verified
    pub fn query(&self, id: &FeedId) -> bool {
        self.events.iter().any(|e| e.id == *id)
    }

    /// Number of receipts recorded for the given id
    pub fn count(&self, id: &FeedId) -> usize {
        self.events.iter().filter(|e| e.id == *id).count()
    }

    /// Receipts published on a channel
    pub fn filter_by_channel(&self, channel: &str) -> Vec<&VerificationEvent> {
        self.events
            .iter()
            .filter(|e| e.channel() == channel)
            .collect()
    }

    /// Get all events
    pub fn events(&self) -> &[VerificationEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<VerificationEvent> {
        self.events
    }

    /// True if `self` is `prefix` followed by exactly `appended`
    pub fn extends(&self, prefix: &EventLog, appended: &[VerificationEvent]) -> bool {
        self.events.len() == prefix.events.len() + appended.len()
            && self.events.starts_with(&prefix.events)
            && self.events[prefix.events.len()..] == *appended
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no events were recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
