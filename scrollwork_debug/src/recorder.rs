// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends every event to a
//! `Vec<RecordedEvent>` in arrival order. Wrap it in `Rc<RefCell<_>>`, hand a
//! clone to [`Tracer::new`](scrollwork_core::trace::Tracer::new), and read
//! the log back through the other clone.

use scrollwork_core::trace::{
    FrameEvent, IntersectionEvent, ParallaxStateEvent, RevealAttachEvent, RevealDetachEvent,
    RevealEvent, ScrollEvent, TraceSink,
};

/// A single recorded trace event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A reveal target was attached.
    RevealAttach(RevealAttachEvent),
    /// An intersection report reached a pending target.
    Intersection(IntersectionEvent),
    /// A target became visible.
    Reveal(RevealEvent),
    /// A target was detached.
    RevealDetach(RevealDetachEvent),
    /// A parallax controller received a scroll notification.
    Scroll(ScrollEvent),
    /// A parallax update pass ran.
    Frame(FrameEvent),
    /// A parallax controller changed lifecycle state.
    ParallaxState(ParallaxStateEvent),
}

impl RecordedEvent {
    /// Short kind name, as used by the pretty printer and JSON export.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RevealAttach(_) => "reveal_attach",
            Self::Intersection(_) => "intersection",
            Self::Reveal(_) => "reveal",
            Self::RevealDetach(_) => "reveal_detach",
            Self::Scroll(_) => "scroll",
            Self::Frame(_) => "frame",
            Self::ParallaxState(_) => "parallax_state",
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of recorded events of the given [`kind`](RecordedEvent::kind).
    #[must_use]
    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_reveal_attach(&mut self, e: &RevealAttachEvent) {
        self.events.push(RecordedEvent::RevealAttach(*e));
    }

    fn on_intersection(&mut self, e: &IntersectionEvent) {
        self.events.push(RecordedEvent::Intersection(*e));
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        self.events.push(RecordedEvent::Reveal(*e));
    }

    fn on_reveal_detach(&mut self, e: &RevealDetachEvent) {
        self.events.push(RecordedEvent::RevealDetach(*e));
    }

    fn on_scroll(&mut self, e: &ScrollEvent) {
        self.events.push(RecordedEvent::Scroll(*e));
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.events.push(RecordedEvent::Frame(*e));
    }

    fn on_parallax_state(&mut self, e: &ParallaxStateEvent) {
        self.events.push(RecordedEvent::ParallaxState(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use scrollwork_core::parallax::{ParallaxConfig, ParallaxController};
    use scrollwork_core::reveal::{RevealOptions, ScrollReveal};
    use scrollwork_core::testing::{FakeElement, FakeHost};
    use scrollwork_core::trace::{ParallaxState, RevealCause, Tracer};

    fn recording() -> (Rc<RefCell<RecorderSink>>, Tracer) {
        let sink = Rc::new(RefCell::new(RecorderSink::new()));
        let tracer = Tracer::new(sink.clone());
        (sink, tracer)
    }

    #[test]
    fn records_reveal_lifecycle() {
        let (sink, tracer) = recording();
        let host = Rc::new(FakeHost::new());
        let reveal = ScrollReveal::new(Rc::clone(&host), RevealOptions::new()).with_tracer(tracer);

        let handle = reveal.attach(FakeElement(1), None);
        host.report_ratio(FakeElement(1), 0.05);
        host.report_ratio(FakeElement(1), 0.5);
        drop(handle);

        let sink = sink.borrow();
        let kinds: Vec<_> = sink.events().iter().map(RecordedEvent::kind).collect();
        assert_eq!(
            kinds,
            [
                "reveal_attach",
                "intersection",
                "intersection",
                "reveal",
                "reveal_detach"
            ]
        );
        assert!(matches!(
            sink.events()[3],
            RecordedEvent::Reveal(RevealEvent {
                cause: RevealCause::Intersection,
                ..
            })
        ));
        assert!(matches!(
            sink.events()[4],
            RecordedEvent::RevealDetach(RevealDetachEvent { visible: true, .. })
        ));
    }

    #[test]
    fn records_reduced_motion_fallback() {
        let (sink, tracer) = recording();
        let host = Rc::new(FakeHost::new());
        host.set_reduced_motion(true);
        let reveal = ScrollReveal::new(Rc::clone(&host), RevealOptions::new()).with_tracer(tracer);

        let _handle = reveal.attach(FakeElement(1), None);

        let sink = sink.borrow();
        assert_eq!(sink.count("intersection"), 0);
        assert!(sink.events().iter().any(|e| matches!(
            e,
            RecordedEvent::Reveal(RevealEvent {
                cause: RevealCause::ReducedMotion,
                ..
            })
        )));
    }

    #[test]
    fn records_parallax_frames_and_coalescing() {
        let (sink, tracer) = recording();
        let host = Rc::new(FakeHost::new());
        let ctl = ParallaxController::with_tracer(
            Rc::clone(&host),
            ParallaxConfig::default(),
            tracer,
        );
        ctl.register_layer(FakeElement(1), 0.5);
        host.run_frame();

        host.scroll_to(100.0);
        host.scroll_to(200.0);
        host.run_frame();
        ctl.teardown();

        let sink = sink.borrow();
        assert_eq!(sink.count("scroll"), 2);
        let coalesced: Vec<_> = sink
            .events()
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Scroll(s) => Some(s.coalesced),
                _ => None,
            })
            .collect();
        assert_eq!(coalesced, [false, true]);

        let last_frame = sink.events().iter().rev().find_map(|e| match e {
            RecordedEvent::Frame(f) => Some(*f),
            _ => None,
        });
        let last_frame = last_frame.unwrap();
        assert_eq!(last_frame.scroll_offset, 200.0);
        assert_eq!(last_frame.layers, 1);

        assert!(matches!(
            sink.events().last(),
            Some(RecordedEvent::ParallaxState(ParallaxStateEvent {
                state: ParallaxState::TornDown,
                ..
            }))
        ));
    }
}
