//! Bounded, single-consumer event log.
//!
//! Producers append; exactly one consumer drains. The log never grows past its
//! capacity: when full, the oldest envelope is discarded so a consumer that
//! stops draining cannot make memory use unbounded.

use std::collections::VecDeque;

use aksi_core::AggregateId;
use uuid::Uuid;

use crate::{Event, EventEnvelope};

/// Append log of enveloped events for one stream.
#[derive(Debug, Clone)]
pub struct EventLog<E> {
    stream_id: AggregateId,
    capacity: usize,
    next_sequence: u64,
    dropped: u64,
    entries: VecDeque<EventEnvelope<E>>,
}

impl<E> EventLog<E>
where
    E: Event,
{
    /// Create an empty log. A capacity of zero is treated as one.
    pub fn new(stream_id: AggregateId, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            stream_id,
            capacity,
            next_sequence: 1,
            dropped: 0,
            entries: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    pub fn stream_id(&self) -> AggregateId {
        self.stream_id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of envelopes discarded because the log was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Append an event and return its sequence number.
    pub fn append(&mut self, event: E) -> u64 {
        if self.entries.len() == self.capacity {
            if let Some(oldest) = self.entries.pop_front() {
                self.dropped += 1;
                tracing::warn!(
                    stream_id = %self.stream_id,
                    sequence_number = oldest.sequence_number(),
                    event_type = %oldest.payload().qualified_type(),
                    "event log full; dropping oldest undrained event"
                );
            }
        }

        let sequence_number = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push_back(EventEnvelope::new(
            Uuid::now_v7(),
            self.stream_id,
            sequence_number,
            event,
        ));
        sequence_number
    }

    /// Copies of the undrained envelopes, oldest first.
    pub fn envelopes(&self) -> Vec<EventEnvelope<E>> {
        self.entries.iter().cloned().collect()
    }

    /// Copies of the undrained payloads, oldest first.
    pub fn payloads(&self) -> Vec<E> {
        self.entries.iter().map(|e| e.payload().clone()).collect()
    }

    /// Remove and return everything appended since the last drain.
    pub fn drain(&mut self) -> Vec<EventEnvelope<E>> {
        self.entries.drain(..).collect()
    }

    /// Discard undrained envelopes. Sequence numbering continues.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
