//! Event channel built on crossbeam-channel.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use super::Event;

/// Sending half, handed to the pipeline
///
/// Cheap to clone. Sends never fail from the caller's point of view: once
/// the receiver is gone, events are dropped.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receiving half, held by whoever displays progress
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event, or `None` once every sender is dropped
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for sender/receiver pairs
pub struct EventChannel;

impl EventChannel {
    /// Unbounded channel; the pipeline never blocks on a slow listener
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }

    /// Bounded channel; the pipeline waits when `capacity` events are queued
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// Sender whose receiver is already gone, for runs nobody watches
pub fn null_sender() -> EventSender {
    EventChannel::new().0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PipelineEvent, PipelinePhase};
    use std::thread;

    #[test]
    fn events_cross_threads_in_order() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Pipeline(PipelineEvent::Started));
            sender.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Matching,
            }));
        });
        handle.join().unwrap();

        let events: Vec<Event> = receiver.iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Matching
            })
        ));
    }

    #[test]
    fn null_sender_swallows_events() {
        null_sender().send(Event::Pipeline(PipelineEvent::Started));
    }

    #[test]
    fn try_recv_drains_bounded_channel() {
        let (sender, receiver) = EventChannel::bounded(1);
        sender.send(Event::Pipeline(PipelineEvent::Started));

        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_none());
    }
}
