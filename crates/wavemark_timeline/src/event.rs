// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed notifications and the listener bus.
//!
//! Delivery is synchronous and in emission order; listeners are pure
//! consumers and return nothing. This preserves the total ordering the
//! crossing engine and drag resolver guarantee.

/// A notification pushed to registered listeners
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    /// The playback cursor crossed a point (`points.enter`)
    PointEnter {
        /// Id of the crossed point
        point: String,
        /// Cursor time at detection, not the point's own time
        time: f64,
    },
    /// The playback cursor entered a segment (`segments.enter`)
    SegmentEnter {
        /// Id of the entered segment
        segment: String,
        /// Cursor time at detection
        time: f64,
    },
    /// The playback cursor left a segment (`segments.exit`)
    SegmentExit {
        /// Id of the exited segment
        segment: String,
        /// Cursor time at detection
        time: f64,
    },
    /// A segment was moved by a drag gesture (`segments.dragged`)
    SegmentDragged {
        /// Id of the dragged segment
        segment: String,
        /// `true` if a single boundary marker was dragged, `false` for a
        /// whole-body drag
        marker: bool,
    },
}

type Listener = Box<dyn FnMut(&TimelineEvent)>;

/// Synchronous fan-out of timeline events to registered listeners
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    /// Create a bus with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all timeline events
    pub fn subscribe(&mut self, listener: impl FnMut(&TimelineEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Push one event to every listener, in registration order
    pub fn emit(&mut self, event: &TimelineEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
