//! Event sink adapters
//!
//! Implements the RotationEventSink port.

use crate::events::RotationEvent;
use crate::ports::RotationEventSink;
use parking_lot::RwLock;
use tracing::info;

/// In-memory event sink adapter for testing
pub struct InMemoryEventSink {
    events: RwLock<Vec<RotationEvent>>,
}

impl InMemoryEventSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// All events published so far
    pub fn get_events(&self) -> Vec<RotationEvent> {
        self.events.read().clone()
    }

    /// Number of events published so far
    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    /// Take and clear the published events
    pub fn drain(&self) -> Vec<RotationEvent> {
        std::mem::take(&mut *self.events.write())
    }
}

impl Default for InMemoryEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationEventSink for InMemoryEventSink {
    fn publish(&self, event: RotationEvent) {
        self.events.write().push(event);
    }
}

/// Sink that only writes events to the log
#[derive(Default)]
pub struct TracingEventSink;

impl RotationEventSink for TracingEventSink {
    fn publish(&self, event: RotationEvent) {
        info!(kind = event.kind(), ?event, "[qc-18] Rotation event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RotationPair;

    fn event(at: u64) -> RotationEvent {
        RotationEvent::PairAdvanced {
            pair: RotationPair::new("prodq".into(), "runnerup1".into()),
            at,
        }
    }

    #[test]
    fn test_in_memory_event_sink() {
        let sink = InMemoryEventSink::new();

        sink.publish(event(1));
        sink.publish(event(2));

        assert_eq!(sink.event_count(), 2);
        assert_eq!(sink.get_events()[1], event(2));
    }

    #[test]
    fn test_drain_clears() {
        let sink = InMemoryEventSink::new();
        sink.publish(event(1));

        assert_eq!(sink.drain(), vec![event(1)]);
        assert_eq!(sink.event_count(), 0);
    }

    #[test]
    fn test_tracing_sink_accepts_events() {
        TracingEventSink.publish(event(1));
    }
}
