//! Domain events: the event trait, stream envelopes, and the bounded log
//! producers append to and a single consumer drains.

mod envelope;
mod event;
mod log;

pub use envelope::EventEnvelope;
pub use event::Event;
pub use log::EventLog;
