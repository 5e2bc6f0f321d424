use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aksi_core::AggregateId;

/// Envelope for an event, carrying stream metadata.
///
/// Notes:
/// - `stream_id` is the aggregate that produced the event.
/// - **Append-only**: `sequence_number` is monotonically increasing per stream
///   and keeps counting across drains.
/// - `payload` is the domain event itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    stream_id: AggregateId,

    /// Monotonically increasing position in the stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: Uuid, stream_id: AggregateId, sequence_number: u64, payload: E) -> Self {
        Self {
            event_id,
            stream_id,
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn stream_id(&self) -> AggregateId {
        self.stream_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
