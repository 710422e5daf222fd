//! Typed publish/subscribe for sketch events
//!
//! Replaces string-keyed callback maps: listeners register for an `EventKind` and
//! get back a `Subscription` handle used to unregister. Everything runs on the
//! sketch's single frame thread, so callbacks are plain `FnMut`.

use std::fmt;

use crate::geom::Vector2;
use crate::sim::collision::ContactKind;

/// Event categories a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Collision,
    SegmentMoved,
    PaletteChanged,
    SerialLine,
    SerialConnection,
}

/// An event and its payload
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A ball reflected off a segment this frame
    Collision {
        ball_id: u32,
        segment_index: usize,
        point: Vector2,
        kind: ContactKind,
    },
    /// A mouse-tracked segment's `pt2` moved
    SegmentMoved { index: usize, pt2: Vector2 },
    /// A color panel selected a different palette entry
    PaletteChanged { index: usize },
    /// A complete line arrived from the serial port
    SerialLine(String),
    SerialConnection { connected: bool },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Collision { .. } => EventKind::Collision,
            Event::SegmentMoved { .. } => EventKind::SegmentMoved,
            Event::PaletteChanged { .. } => EventKind::PaletteChanged,
            Event::SerialLine(_) => EventKind::SerialLine,
            Event::SerialConnection { .. } => EventKind::SerialConnection,
        }
    }
}

/// Handle returned by `subscribe`; pass it to `unsubscribe` to stop listening
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    kind: EventKind,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

type Listener = Box<dyn FnMut(&Event)>;

/// Event dispatcher owned by a scene
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(Subscription, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of `kind`
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> Subscription
    where
        F: FnMut(&Event) + 'static,
    {
        let subscription = Subscription {
            id: self.next_id,
            kind,
        };
        self.next_id += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener of its kind, in subscription order
    ///
    /// Returns the number of listeners notified.
    pub fn publish(&mut self, event: &Event) -> usize {
        let kind = event.kind();
        let mut notified = 0;
        for (subscription, listener) in &mut self.listeners {
            if subscription.kind == kind {
                listener(event);
                notified += 1;
            }
        }
        notified
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(s, _)| s.kind == kind).count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_reaches_only_matching_kind() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let _sub = bus.subscribe(EventKind::PaletteChanged, move |e| sink.borrow_mut().push(e.clone()));

        assert_eq!(bus.publish(&Event::PaletteChanged { index: 2 }), 1);
        assert_eq!(bus.publish(&Event::SerialLine("1,0.5,0".into())), 0);
        assert_eq!(*seen.borrow(), vec![Event::PaletteChanged { index: 2 }]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let c1 = Rc::clone(&count);
        let first = bus.subscribe(EventKind::SerialConnection, move |_| *c1.borrow_mut() += 1);
        let c2 = Rc::clone(&count);
        let _second = bus.subscribe(EventKind::SerialConnection, move |_| *c2.borrow_mut() += 10);
        assert_eq!(bus.listener_count(EventKind::SerialConnection), 2);

        bus.publish(&Event::SerialConnection { connected: true });
        assert_eq!(*count.borrow(), 11);

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.publish(&Event::SerialConnection { connected: false });
        assert_eq!(*count.borrow(), 21);
        assert_eq!(first.kind(), EventKind::SerialConnection);
    }

    #[test]
    fn test_event_kind() {
        let event = Event::SegmentMoved {
            index: 0,
            pt2: Vector2::ONE,
        };
        assert_eq!(event.kind(), EventKind::SegmentMoved);
    }
}
