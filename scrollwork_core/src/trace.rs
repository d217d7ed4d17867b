// Copyright 2026 the Scrollwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the behaviors.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! reveal and parallax behaviors call at each state change. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional shared sink. Behaviors keep a clone of it and
//! call it from inside host callbacks. When the `trace` feature is **off**,
//! every `Tracer` method compiles to nothing (zero overhead). When **on**,
//! each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use alloc::rc::Rc;
use core::cell::RefCell;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a reveal target became visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealCause {
    /// The host cannot observe intersection (no viewport or no primitive).
    Unsupported,
    /// Reduced motion was requested when the target was attached.
    ReducedMotion,
    /// An intersection report reached the threshold.
    Intersection,
}

/// Lifecycle transitions of a parallax controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParallaxState {
    /// Listeners attached; scroll drives layer offsets.
    Enabled,
    /// Listeners released; registry kept.
    Disabled,
    /// `enable` was refused because the host has no viewport or frames.
    Unsupported,
    /// Reduced motion turned on while enabled; updates stopped.
    Suspended,
    /// Reduced motion turned off again; updates resumed.
    Resumed,
    /// Final teardown.
    TornDown,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a reveal target is attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealAttachEvent {
    /// Per-behavior serial number of the target.
    pub target: u64,
    /// Effective threshold.
    pub threshold: f64,
    /// Whether an intersection watch was started (false on fallback paths).
    pub watching: bool,
}

/// Emitted for every intersection report delivered to a pending target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEvent {
    /// Target serial number.
    pub target: u64,
    /// Reported ratio.
    pub ratio: f64,
    /// Reported intersecting flag.
    pub is_intersecting: bool,
    /// Whether the report triggered the reveal.
    pub accepted: bool,
}

/// Emitted when a target transitions to visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealEvent {
    /// Target serial number.
    pub target: u64,
    /// What caused the transition.
    pub cause: RevealCause,
}

/// Emitted when a target is detached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealDetachEvent {
    /// Target serial number.
    pub target: u64,
    /// Whether the target had been revealed before detaching.
    pub visible: bool,
}

/// Emitted for every scroll notification a parallax controller receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollEvent {
    /// `true` if a frame was already pending and the notification was folded
    /// into it.
    pub coalesced: bool,
}

/// Emitted after a parallax update pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameEvent {
    /// Monotonic per-controller update counter.
    pub frame_index: u64,
    /// Scroll offset read for this pass.
    pub scroll_offset: f64,
    /// Number of layers updated.
    pub layers: usize,
}

/// Emitted on parallax lifecycle transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallaxStateEvent {
    /// The new state.
    pub state: ParallaxState,
    /// Registered layer count at the time of the transition.
    pub layers: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the behaviors.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a reveal target is attached.
    fn on_reveal_attach(&mut self, e: &RevealAttachEvent) {
        _ = e;
    }

    /// Called for each intersection report on a pending target.
    fn on_intersection(&mut self, e: &IntersectionEvent) {
        _ = e;
    }

    /// Called when a target becomes visible.
    fn on_reveal(&mut self, e: &RevealEvent) {
        _ = e;
    }

    /// Called when a target is detached.
    fn on_reveal_detach(&mut self, e: &RevealDetachEvent) {
        _ = e;
    }

    /// Called for each scroll notification.
    fn on_scroll(&mut self, e: &ScrollEvent) {
        _ = e;
    }

    /// Called after each parallax update pass.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called on parallax lifecycle transitions.
    fn on_parallax_state(&mut self, e: &ParallaxStateEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// A shared, dynamically typed sink.
pub type SharedSink = Rc<RefCell<dyn TraceSink>>;

/// Thin, cloneable wrapper around an optional shared [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink. A sink that is already borrowed (an event fired
/// from inside another sink call) drops the nested event.
#[derive(Clone, Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<SharedSink>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: SharedSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    fn emit(&self, f: impl FnOnce(&mut dyn TraceSink)) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &self.sink
            && let Ok(mut sink) = sink.try_borrow_mut()
        {
            f(&mut *sink);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = f;
        }
    }

    /// Emits a [`RevealAttachEvent`].
    #[inline]
    pub fn reveal_attach(&self, e: &RevealAttachEvent) {
        self.emit(|s| s.on_reveal_attach(e));
    }

    /// Emits an [`IntersectionEvent`].
    #[inline]
    pub fn intersection(&self, e: &IntersectionEvent) {
        self.emit(|s| s.on_intersection(e));
    }

    /// Emits a [`RevealEvent`].
    #[inline]
    pub fn reveal(&self, e: &RevealEvent) {
        self.emit(|s| s.on_reveal(e));
    }

    /// Emits a [`RevealDetachEvent`].
    #[inline]
    pub fn reveal_detach(&self, e: &RevealDetachEvent) {
        self.emit(|s| s.on_reveal_detach(e));
    }

    /// Emits a [`ScrollEvent`].
    #[inline]
    pub fn scroll(&self, e: &ScrollEvent) {
        self.emit(|s| s.on_scroll(e));
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&self, e: &FrameEvent) {
        self.emit(|s| s.on_frame(e));
    }

    /// Emits a [`ParallaxStateEvent`].
    #[inline]
    pub fn parallax_state(&self, e: &ParallaxStateEvent) {
        self.emit(|s| s.on_parallax_state(e));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_reveal(&RevealEvent {
            target: 0,
            cause: RevealCause::Intersection,
        });
        sink.on_frame(&FrameEvent {
            frame_index: 0,
            scroll_offset: 0.0,
            layers: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let tracer = Tracer::none();
        tracer.scroll(&ScrollEvent { coalesced: false });
        tracer.parallax_state(&ParallaxStateEvent {
            state: ParallaxState::Enabled,
            layers: 0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        #[derive(Default)]
        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_frame(&mut self, e: &FrameEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let sink = Rc::new(RefCell::new(RecordingSink::default()));
        let tracer = Tracer::new(sink.clone());
        tracer.frame(&FrameEvent {
            frame_index: 3,
            scroll_offset: 120.0,
            layers: 2,
        });
        let clone = tracer.clone();
        clone.frame(&FrameEvent {
            frame_index: 4,
            scroll_offset: 130.0,
            layers: 2,
        });
        assert_eq!(sink.borrow().frames, &[3, 4]);
    }
}
